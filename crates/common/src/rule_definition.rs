use serde::{Deserialize, Serialize};

/// Marker operators put in the notify list to keep an alert away from the customer.
pub const INTERNAL_ONLY_MARKER: &str = "only_cdn_devops";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RuleDefinition {
    pub domain_id: i64,
    pub domain: String,
    pub rule_id: i64,
    pub rule_code: String,
    pub rule_name: String,
    pub threshold_high: f64,
    pub threshold_low: f64,
    pub unit: String,
    pub attention_threshold: i64,
    pub customer_id: i64,
    pub notify_email: String,
    pub response_code: String,
    pub diff_type: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Audience {
    Customer,
    InternalOnly,
}

impl Audience {
    pub fn label_value(&self) -> &'static str {
        match self {
            Self::Customer => "yes",
            Self::InternalOnly => "no",
        }
    }
}

impl RuleDefinition {
    /// Who may see notifications for this rule. Derived from the notify list,
    /// which is the only place the routing hint is stored today.
    pub fn audience(&self) -> Audience {
        if self.notify_email.contains(INTERNAL_ONLY_MARKER) {
            Audience::InternalOnly
        } else {
            Audience::Customer
        }
    }
}

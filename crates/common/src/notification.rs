use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const LABEL_ALERT_NAME: &str = "alertname";
pub const LABEL_SEVERITY: &str = "severity";
pub const LABEL_RULE_ID: &str = "rule_id";
pub const LABEL_DOMAIN: &str = "domain";
pub const LABEL_CUSTOMER: &str = "customer";
pub const LABEL_TO_CUSTOMER: &str = "to_customer";
pub const LABEL_PROVENANCE: &str = "zenlayer_aiop";

pub const SEVERITY_CRITICAL: &str = "critical";
pub const PROVENANCE_VALUE: &str = "yes";

pub const ANNOTATION_DESCRIPTION: &str = "description";

/// Alertmanager-compatible alert, one per enriched record.
///
/// Maps are ordered so that serializing the same notification twice gives
/// the same bytes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompiledNotification {
    pub starts_at: DateTime<FixedOffset>,
    pub labels: BTreeMap<String, String>,
    pub annotations: BTreeMap<String, String>,
}

impl CompiledNotification {
    pub fn label(&self, key: &str) -> Option<&str> {
        self.labels.get(key).map(String::as_str)
    }

    pub fn description(&self) -> &str {
        self.annotations
            .get(ANNOTATION_DESCRIPTION)
            .map(String::as_str)
            .unwrap_or_default()
    }
}

use std::collections::HashMap;

use alertrelay_common::{AlertRecord, RuleDefinition};

#[derive(Debug, Clone, PartialEq)]
pub struct UnresolvedRule {
    pub alert_id: i64,
    pub rule_id: i64,
}

impl std::fmt::Display for UnresolvedRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "alert {}: missing rule id {}", self.alert_id, self.rule_id)
    }
}

impl std::error::Error for UnresolvedRule {}

/// Rules keyed by id. The source query joins rules to domains, so one rule
/// can arrive several times; the last row wins.
#[derive(Debug, Default)]
pub struct RuleIndex {
    rules: HashMap<i64, RuleDefinition>,
    domains: HashMap<i64, Vec<String>>,
}

impl RuleIndex {
    pub fn build(rules: impl IntoIterator<Item = RuleDefinition>) -> Self {
        let mut index = Self::default();
        for rule in rules {
            index
                .domains
                .entry(rule.rule_id)
                .or_default()
                .push(rule.domain.clone());
            index.rules.insert(rule.rule_id, rule);
        }
        index
    }

    pub fn get(&self, rule_id: i64) -> Option<&RuleDefinition> {
        self.rules.get(&rule_id)
    }

    pub fn resolve(&self, alert: &AlertRecord) -> Result<&RuleDefinition, UnresolvedRule> {
        self.get(alert.rule_id).ok_or(UnresolvedRule {
            alert_id: alert.id,
            rule_id: alert.rule_id,
        })
    }

    /// Every domain row seen for the rule, in source order.
    pub fn domains(&self, rule_id: i64) -> &[String] {
        self.domains.get(&rule_id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Number of distinct rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Pairs each alert with its rule. Alerts without one are returned separately.
    pub fn join<'a>(
        &'a self,
        alerts: &'a [AlertRecord],
    ) -> (Vec<(&'a RuleDefinition, &'a AlertRecord)>, Vec<UnresolvedRule>) {
        let mut matched = Vec::with_capacity(alerts.len());
        let mut missing = Vec::new();
        for alert in alerts {
            match self.resolve(alert) {
                Ok(rule) => matched.push((rule, alert)),
                Err(e) => missing.push(e),
            }
        }
        (matched, missing)
    }
}

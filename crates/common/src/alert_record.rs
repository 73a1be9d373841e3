use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::kind::AlertKind;

/// One row raised by the upstream monitoring process.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AlertRecord {
    pub id: i64,
    pub alert_type: i64,
    pub rule_id: i64,
    pub code: String,
    pub threshold_high: f64,
    pub threshold_low: f64,
    pub unit: String,
    pub value: f64,
    pub first_seen: Option<DateTime<Utc>>,
    pub last_updated: Option<DateTime<Utc>>,
    pub repeat_count: i64,
    pub status: i64,
    pub customer_id: i64,
    pub customer_name: String,
    pub diagnostic: String,
}

impl AlertRecord {
    pub fn kind(&self) -> AlertKind {
        AlertKind::from_code(&self.code)
    }

    /// The instant the alert started, falling back to its last update.
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.first_seen.or(self.last_updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record() -> AlertRecord {
        AlertRecord {
            id: 1,
            alert_type: 1,
            rule_id: 10,
            code: "0401".into(),
            threshold_high: 100.0,
            threshold_low: 0.0,
            unit: "Mbps".into(),
            value: 120.0,
            first_seen: None,
            last_updated: None,
            repeat_count: 3,
            status: 1,
            customer_id: 7,
            customer_name: "acme".into(),
            diagnostic: String::new(),
        }
    }

    #[test]
    fn kind_follows_code() {
        assert_eq!(record().kind(), AlertKind::OriginBandwidthHigh);
    }

    #[test]
    fn started_at_prefers_first_seen() {
        let first = Utc.timestamp_opt(1_600_000_000, 0).unwrap();
        let last = Utc.timestamp_opt(1_600_000_600, 0).unwrap();

        let mut r = record();
        assert_eq!(r.started_at(), None);

        r.last_updated = Some(last);
        assert_eq!(r.started_at(), Some(last));

        r.first_seen = Some(first);
        assert_eq!(r.started_at(), Some(first));
    }
}

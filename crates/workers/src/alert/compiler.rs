use std::collections::BTreeMap;

use alertrelay_common::notification::{
    ANNOTATION_DESCRIPTION, LABEL_ALERT_NAME, LABEL_CUSTOMER, LABEL_DOMAIN, LABEL_PROVENANCE,
    LABEL_RULE_ID, LABEL_SEVERITY, LABEL_TO_CUSTOMER, PROVENANCE_VALUE, SEVERITY_CRITICAL,
};
use alertrelay_common::{AlertKind, AlertRecord, Audience, CompiledNotification, RuleDefinition};
use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use chrono_tz::Tz;

use super::diagnostic::{self, BandwidthDelta, Diagnostic, DiagnosticError, StatusCountDetail};

pub const DEFAULT_TIMEZONE: &str = "Asia/Shanghai";

/// Diff types for which an edge bandwidth rule compares against a baseline sample.
const BANDWIDTH_DIFF_TYPES: [i64; 2] = [1, 7];

#[derive(Debug, Clone, PartialEq)]
pub enum CompileError {
    MalformedDiagnostic {
        alert_id: i64,
        source: DiagnosticError,
    },
    DiffTypeNotAllowed {
        alert_id: i64,
        rule_id: i64,
        diff_type: i64,
    },
    MissingStartTime {
        alert_id: i64,
    },
}

impl std::fmt::Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedDiagnostic { alert_id, source } => {
                write!(f, "alert {alert_id}: malformed diagnostic: {source}")
            }
            Self::DiffTypeNotAllowed {
                alert_id,
                rule_id,
                diff_type,
            } => write!(
                f,
                "alert {alert_id}, rule {rule_id}: diff_type {diff_type} not in allowed set {BANDWIDTH_DIFF_TYPES:?}"
            ),
            Self::MissingStartTime { alert_id } => {
                write!(f, "alert {alert_id}: no first-seen or last-updated timestamp")
            }
        }
    }
}

impl std::error::Error for CompileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::MalformedDiagnostic { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Renders enriched alerts into notifications. Holds no state besides the
/// zone timestamps are displayed in, so compiling is repeatable.
#[derive(Debug, Clone)]
pub struct Compiler {
    zone: Option<Tz>,
}

impl Compiler {
    /// Falls back to unconverted UTC timestamps when `zone_name` is not a known zone.
    pub fn new(zone_name: &str) -> Self {
        match zone_name.parse::<Tz>() {
            Ok(tz) => Self { zone: Some(tz) },
            Err(e) => {
                tracing::warn!(zone = zone_name, error = %e, "unknown time zone, timestamps stay in UTC");
                Self { zone: None }
            }
        }
    }

    pub fn zone(&self) -> Option<Tz> {
        self.zone
    }

    pub fn compile(
        &self,
        rule: &RuleDefinition,
        alert: &AlertRecord,
    ) -> Result<CompiledNotification, CompileError> {
        let kind = alert.kind();
        let started = alert
            .started_at()
            .ok_or(CompileError::MissingStartTime { alert_id: alert.id })?;

        if kind == AlertKind::EdgeBandwidth && !BANDWIDTH_DIFF_TYPES.contains(&rule.diff_type) {
            return Err(CompileError::DiffTypeNotAllowed {
                alert_id: alert.id,
                rule_id: rule.rule_id,
                diff_type: rule.diff_type,
            });
        }

        let parsed = diagnostic::parse(&kind, &alert.diagnostic).map_err(|source| {
            CompileError::MalformedDiagnostic {
                alert_id: alert.id,
                source,
            }
        })?;

        let audience = match kind {
            AlertKind::OriginBandwidthDelta => Audience::Customer,
            _ => rule.audience(),
        };

        let description = match (&kind, &parsed) {
            (AlertKind::StatusCodeSum, _) => format!(
                "{}, http code: {}",
                above_high(rule, alert),
                rule.response_code
            ),
            (_, Diagnostic::StatusCount(detail)) => status_count(rule, alert, detail),
            (_, Diagnostic::BandwidthDelta(delta)) => self.bandwidth_delta(rule, alert, delta),
            (AlertKind::OriginBandwidthDelta | AlertKind::OriginBandwidthHigh, _) => {
                above_high(rule, alert)
            }
            (AlertKind::HitRate, _) => format!(
                "threshold: lt {:.2}{}, VALUE: {:.2}{}",
                rule.threshold_low, rule.unit, alert.value, alert.unit
            ),
            _ => String::new(),
        };

        let mut labels = BTreeMap::new();
        labels.insert(
            LABEL_ALERT_NAME.to_string(),
            kind.display_name().unwrap_or_default().to_string(),
        );
        labels.insert(LABEL_SEVERITY.to_string(), SEVERITY_CRITICAL.to_string());
        labels.insert(LABEL_RULE_ID.to_string(), alert.code.clone());
        labels.insert(LABEL_DOMAIN.to_string(), rule.domain.clone());
        labels.insert(LABEL_CUSTOMER.to_string(), alert.customer_name.clone());
        labels.insert(
            LABEL_TO_CUSTOMER.to_string(),
            audience.label_value().to_string(),
        );
        labels.insert(LABEL_PROVENANCE.to_string(), PROVENANCE_VALUE.to_string());

        let mut annotations = BTreeMap::new();
        annotations.insert(ANNOTATION_DESCRIPTION.to_string(), description);

        Ok(CompiledNotification {
            starts_at: self.localize(started),
            labels,
            annotations,
        })
    }

    fn bandwidth_delta(
        &self,
        rule: &RuleDefinition,
        alert: &AlertRecord,
        delta: &BandwidthDelta,
    ) -> String {
        format!(
            "threshold: (gt {:.2}{unit} || lt -{:.2}{unit}), VALUE: {:.2}{}, detail: {} > {}Mb/s, {} > {}Mb/s",
            rule.threshold_high,
            rule.threshold_low,
            alert.value,
            alert.unit,
            self.rfc3339(delta.current.at),
            delta.current.magnitude,
            self.rfc3339(delta.baseline.at),
            delta.baseline.magnitude,
            unit = rule.unit,
        )
    }

    fn localize(&self, t: DateTime<Utc>) -> DateTime<FixedOffset> {
        match self.zone {
            Some(tz) => t.with_timezone(&tz).fixed_offset(),
            None => t.fixed_offset(),
        }
    }

    fn rfc3339(&self, t: DateTime<Utc>) -> String {
        self.localize(t).to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self {
            zone: Some(chrono_tz::Asia::Shanghai),
        }
    }
}

fn above_high(rule: &RuleDefinition, alert: &AlertRecord) -> String {
    format!(
        "threshold: gt {:.2}{}, VALUE: {:.2}{}",
        rule.threshold_high, rule.unit, alert.value, alert.unit
    )
}

fn status_count(rule: &RuleDefinition, alert: &AlertRecord, detail: &StatusCountDetail) -> String {
    format!(
        "{}, count: {}, detail: {}",
        above_high(rule, alert),
        detail.count,
        detail.detail
    )
}

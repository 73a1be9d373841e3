use std::fmt;

/// Classifies an alert record by the item code the monitoring process stamps on it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AlertKind {
    /// `1002`: number of responses with a configured status code.
    StatusCodeSum,
    /// `1005`: error status codes above threshold.
    ErrorCodeHigh,
    /// `1007`: share of a status code among all responses.
    StatusCodeRatio,
    /// `0302`: edge bandwidth compared against an earlier sample.
    EdgeBandwidth,
    /// `0303`: origin bandwidth day-over-day change.
    OriginBandwidthDelta,
    /// `0401`: origin bandwidth above threshold.
    OriginBandwidthHigh,
    /// `0701`: request hit rate below threshold.
    HitRate,
    Unknown(String),
}

impl AlertKind {
    pub fn from_code(code: &str) -> Self {
        match code {
            "1002" => Self::StatusCodeSum,
            "1005" => Self::ErrorCodeHigh,
            "1007" => Self::StatusCodeRatio,
            "0302" => Self::EdgeBandwidth,
            "0303" => Self::OriginBandwidthDelta,
            "0401" => Self::OriginBandwidthHigh,
            "0701" => Self::HitRate,
            other => Self::Unknown(other.to_string()),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Self::StatusCodeSum => "1002",
            Self::ErrorCodeHigh => "1005",
            Self::StatusCodeRatio => "1007",
            Self::EdgeBandwidth => "0302",
            Self::OriginBandwidthDelta => "0303",
            Self::OriginBandwidthHigh => "0401",
            Self::HitRate => "0701",
            Self::Unknown(code) => code,
        }
    }

    /// English name used as the `alertname` label. `None` for codes outside the table.
    pub fn display_name(&self) -> Option<&'static str> {
        match self {
            Self::StatusCodeSum => Some("HTTP Code Sum Error(1002)"),
            Self::ErrorCodeHigh => Some("HTTP Error Code High(1005)"),
            Self::StatusCodeRatio => Some("HTTP Code Percentage Error(1007)"),
            Self::EdgeBandwidth => Some("Edge Server Bandwidth Error(0302)"),
            Self::OriginBandwidthDelta => Some("Origin Server Bandwidth D2D Error(0303)"),
            Self::OriginBandwidthHigh => Some("Origin Server Bandwidth High(0401)"),
            Self::HitRate => Some("Request Hit Rate Error(0701)"),
            Self::Unknown(_) => None,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KNOWN: [AlertKind; 7] = [
        AlertKind::StatusCodeSum,
        AlertKind::ErrorCodeHigh,
        AlertKind::StatusCodeRatio,
        AlertKind::EdgeBandwidth,
        AlertKind::OriginBandwidthDelta,
        AlertKind::OriginBandwidthHigh,
        AlertKind::HitRate,
    ];

    #[test]
    fn codes_round_trip_through_table() {
        for kind in KNOWN {
            assert_eq!(AlertKind::from_code(kind.code()), kind);
            assert!(kind.display_name().unwrap().ends_with(&format!("({})", kind.code())));
        }
    }

    #[test]
    fn leading_zero_is_significant() {
        assert_eq!(AlertKind::from_code("0302"), AlertKind::EdgeBandwidth);
        assert_eq!(AlertKind::from_code("302"), AlertKind::Unknown("302".into()));
    }

    #[test]
    fn unknown_code_has_no_display_name() {
        let kind = AlertKind::from_code("9999");
        assert!(!kind.is_known());
        assert_eq!(kind.display_name(), None);
        assert_eq!(kind.to_string(), "9999");
    }
}

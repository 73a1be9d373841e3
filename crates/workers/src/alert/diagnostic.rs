use alertrelay_common::AlertKind;
use chrono::{DateTime, Utc};

const STATUS_COUNT_FIELDS: usize = 5;
const BANDWIDTH_SEGMENTS: usize = 2;
const BANDWIDTH_SAMPLE_FIELDS: usize = 2;

/// `timestamp:ratio:count:codes:detail`,
/// e.g. `1600706700:8.670:(6935/79986):410 499:410/6914 499/21`.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusCountDetail {
    pub timestamp: String,
    pub ratio: String,
    pub count: String,
    pub codes: String,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BandwidthSample {
    pub at: DateTime<Utc>,
    pub magnitude: String,
}

/// `ts:magnitude,ts:magnitude`, e.g. `1600755000:7.2886,1600150200:26158.3969`.
#[derive(Debug, Clone, PartialEq)]
pub struct BandwidthDelta {
    pub current: BandwidthSample,
    pub baseline: BandwidthSample,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    StatusCount(StatusCountDetail),
    BandwidthDelta(BandwidthDelta),
    /// Kinds rendered from the value and thresholds alone.
    Unused,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DiagnosticError {
    FieldCount {
        expected: usize,
        found: usize,
        raw: String,
    },
    SegmentCount {
        expected: usize,
        found: usize,
        raw: String,
    },
    SampleFieldCount {
        segment: usize,
        found: usize,
        raw: String,
    },
}

impl DiagnosticError {
    pub fn raw(&self) -> &str {
        match self {
            Self::FieldCount { raw, .. }
            | Self::SegmentCount { raw, .. }
            | Self::SampleFieldCount { raw, .. } => raw,
        }
    }
}

impl std::fmt::Display for DiagnosticError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FieldCount { expected, found, raw } => write!(
                f,
                "expected {expected} ':'-separated fields, found {found} in {raw:?}"
            ),
            Self::SegmentCount { expected, found, raw } => write!(
                f,
                "expected {expected} ','-separated segments, found {found} in {raw:?}"
            ),
            Self::SampleFieldCount { segment, found, raw } => write!(
                f,
                "segment {segment} has {found} ':'-separated fields, expected {BANDWIDTH_SAMPLE_FIELDS} in {raw:?}"
            ),
        }
    }
}

impl std::error::Error for DiagnosticError {}

/// Interprets the diagnostic string with the grammar of the given kind.
pub fn parse(kind: &AlertKind, raw: &str) -> Result<Diagnostic, DiagnosticError> {
    match kind {
        AlertKind::ErrorCodeHigh | AlertKind::StatusCodeRatio => {
            parse_status_count(raw).map(Diagnostic::StatusCount)
        }
        AlertKind::EdgeBandwidth => parse_bandwidth_delta(raw).map(Diagnostic::BandwidthDelta),
        _ => Ok(Diagnostic::Unused),
    }
}

pub fn parse_status_count(raw: &str) -> Result<StatusCountDetail, DiagnosticError> {
    let fields: Vec<&str> = raw.split(':').collect();
    let &[timestamp, ratio, count, codes, detail] = fields.as_slice() else {
        return Err(DiagnosticError::FieldCount {
            expected: STATUS_COUNT_FIELDS,
            found: fields.len(),
            raw: raw.to_string(),
        });
    };

    Ok(StatusCountDetail {
        timestamp: timestamp.to_string(),
        ratio: ratio.to_string(),
        count: count.to_string(),
        codes: codes.to_string(),
        detail: detail.to_string(),
    })
}

pub fn parse_bandwidth_delta(raw: &str) -> Result<BandwidthDelta, DiagnosticError> {
    let segments: Vec<&str> = raw.split(',').collect();
    if segments.len() != BANDWIDTH_SEGMENTS {
        return Err(DiagnosticError::SegmentCount {
            expected: BANDWIDTH_SEGMENTS,
            found: segments.len(),
            raw: raw.to_string(),
        });
    }

    let current = parse_sample(raw, 0, segments[0])?;
    let baseline = parse_sample(raw, 1, segments[1])?;
    Ok(BandwidthDelta { current, baseline })
}

fn parse_sample(raw: &str, segment: usize, text: &str) -> Result<BandwidthSample, DiagnosticError> {
    let fields: Vec<&str> = text.split(':').collect();
    let &[ts, magnitude] = fields.as_slice() else {
        return Err(DiagnosticError::SampleFieldCount {
            segment,
            found: fields.len(),
            raw: raw.to_string(),
        });
    };

    Ok(BandwidthSample {
        at: decode_unix_seconds(ts),
        magnitude: magnitude.to_string(),
    })
}

/// Undecodable timestamps degrade to the epoch instead of failing the record.
fn decode_unix_seconds(text: &str) -> DateTime<Utc> {
    text.parse::<i64>()
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .unwrap_or(DateTime::UNIX_EPOCH)
}

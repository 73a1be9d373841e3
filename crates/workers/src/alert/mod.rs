mod compiler;
mod diagnostic;
mod resolver;

pub use compiler::{CompileError, Compiler, DEFAULT_TIMEZONE};
pub use diagnostic::{
    BandwidthDelta, BandwidthSample, Diagnostic, DiagnosticError, StatusCountDetail, parse,
    parse_bandwidth_delta, parse_status_count,
};
pub use resolver::{RuleIndex, UnresolvedRule};

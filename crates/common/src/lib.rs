pub mod alert_record;
pub mod cycle_id;
pub mod kind;
pub mod notification;
pub mod rule_definition;

pub use alert_record::AlertRecord;
pub use kind::AlertKind;
pub use notification::CompiledNotification;
pub use rule_definition::{Audience, RuleDefinition};

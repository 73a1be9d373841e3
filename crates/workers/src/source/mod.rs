mod mysql;
mod provider;

pub use mysql::{MySqlSource, create_pool};
pub use provider::{AlertSource, RuleSource, SourceError};

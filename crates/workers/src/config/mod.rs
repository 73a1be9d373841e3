pub mod cli;
pub mod loader;
pub mod schema;

pub use cli::Args;
pub use loader::LoadError;
pub use schema::RelayConfig;

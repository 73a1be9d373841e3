pub mod exposition;
pub mod relay_metrics;

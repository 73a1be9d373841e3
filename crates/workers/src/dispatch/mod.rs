mod cycle;
mod scheduler;

pub use cycle::{CycleOutcome, DispatchCycle};
pub use scheduler::IntervalScheduler;

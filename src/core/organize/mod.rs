//! Media organization module.
//!
//! Derives `{YYYY-MM}_{img|vid}/...` destination paths from capture
//! timestamps and copies files there without overwriting anything.

mod executor;
mod planner;
mod types;

pub use executor::CopyExecutor;
pub use planner::{DestinationPlanner, FILE_NAME_TS_FORMAT};
pub use types::*;

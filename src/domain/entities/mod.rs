//! Core domain entities.

mod cycle;
mod link;

pub use cycle::{CheckCycleResult, SourceError};
pub use link::LinkRecord;

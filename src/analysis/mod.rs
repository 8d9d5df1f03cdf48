//! Competitor analysis: aggregation, own-domain tracking and the keyword sweep.

pub mod aggregator;
pub mod sweep;
pub mod tracking;

pub use aggregator::*;
pub use sweep::{run_sweep, KeywordOutcome, SweepOutcome, SweepSettings};
pub use tracking::summarize;

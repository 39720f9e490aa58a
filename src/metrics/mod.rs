//! Breath statistics collection and formatting.

mod breath_stats;

pub use breath_stats::*;

//! Breath tuner core.
//!
//! This module contains the phase clock, the timeline renderer, the session
//! facade tying them to the statistics ledger, and session export.

pub mod clock;
pub mod report;
pub mod session;
pub mod timeline;

pub use clock::*;
pub use report::*;
pub use session::*;
pub use timeline::*;

//! # Breath Tuner
//!
//! A real-time breath pacing visualizer. The user switches between exhaling
//! and inhaling; each half-breath is drawn as a colored bar on a scrolling
//! timeline while running per-breath statistics are kept.
//!
//! ## Modules
//!
//! - [`tuner`]: Phase clock, timeline renderer and the session core
//! - [`metrics`]: Per-breath statistics ledger and formatting
//! - [`ui`]: Dashboard, controls and timeline canvas
//! - [`config`]: Configuration constants
//! - [`state`]: Breath phase and clock state
//! - [`error`]: Error types

pub mod config;
pub mod error;
pub mod metrics;
pub mod plugin;
pub mod state;
pub mod tuner;
pub mod ui;

pub use error::BreathError;
pub use plugin::{BreathCommand, BreathTunerPlugin};
pub use tuner::BreathTuner;
pub use ui::BreathUiPlugin;

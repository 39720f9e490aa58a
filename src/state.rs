//! Breath phase and clock state shared by the core and the front-end.

use serde::{Deserialize, Serialize};

/// One half of a breath
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Exhaling,
    Inhaling,
}

impl Phase {
    /// The alternating phase
    pub fn flipped(self) -> Self {
        match self {
            Self::Exhaling => Self::Inhaling,
            Self::Inhaling => Self::Exhaling,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Exhaling => "Exhaling",
            Self::Inhaling => "Inhaling",
        }
    }
}

/// Whether the phase timer is active
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash)]
pub enum ClockState {
    /// No phase running; the last phase (if any) is kept for display
    #[default]
    Idle,
    /// A phase timer is running
    Running(Phase),
}

impl ClockState {
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running(_))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Running(phase) => phase.name(),
        }
    }
}

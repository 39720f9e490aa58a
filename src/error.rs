//! Error types for the breath tuner.

/// Errors raised by the statistics ledger and the session facade.
///
/// Only [`BreathError::Sequence`] indicates a bug; the other variants are
/// user-reachable and are absorbed by [`crate::tuner::BreathTuner`].
#[derive(Debug, thiserror::Error)]
pub enum BreathError {
    /// A breath was recorded out of order, e.g. an inhale without its exhale
    #[error("breath {index} out of sequence: {reason}")]
    Sequence { index: i32, reason: &'static str },

    /// Undo requested with no breaths recorded
    #[error("no breaths recorded")]
    Empty,

    /// A new breath would exceed the session capacity
    #[error("breath capacity of {max} reached")]
    CapacityExceeded { max: i32 },
}

/// Failures writing a session report to disk
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("nothing to export")]
    NothingRecorded,

    #[error("failed to create directory: {0}")]
    CreateDir(#[source] std::io::Error),

    #[error("failed to serialize: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write file: {0}")]
    Write(#[source] std::io::Error),
}

pub type Result<T, E = BreathError> = std::result::Result<T, E>;

use alloc::string::String;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    #[error("Invalid configuration for `{key}`: {reason}")]
    Configuration { key: &'static str, reason: String },
    #[error("Coordinates ({row}, {col}) are outside the grid")]
    OutOfBounds { row: u32, col: u32 },
    #[error("Persisted state does not match the grid")]
    MalformedSnapshot,
    #[error("Session storage is unavailable")]
    StorageUnavailable,
}

impl TaskError {
    pub(crate) fn configuration(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Configuration {
            key,
            reason: reason.into(),
        }
    }

    /// Errors that mean a persisted round can't be resumed on the current grid.
    pub const fn is_stale_snapshot(&self) -> bool {
        matches!(self, Self::OutOfBounds { .. } | Self::MalformedSnapshot)
    }
}

pub type Result<T> = core::result::Result<T, TaskError>;

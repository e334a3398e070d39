//! Error surface of the public API.

use thiserror::Error;

/// Errors returned by [`crate::Simulator`]. Everything the kernel itself
/// can hit (out-of-range world reads and writes) is absorbed by the
/// Wall-sentinel / dropped-write rules instead of surfacing here.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SimError {
    #[error("cell ({x}, {y}) is outside the {width}x{height} world")]
    OutOfRange { x: i32, y: i32, width: u32, height: u32 },

    #[error("config rejected: {field}: {reason}")]
    ConfigRejected { field: String, reason: String },

    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),
}

impl SimError {
    pub(crate) fn rejected(field: &str, reason: impl Into<String>) -> Self {
        SimError::ConfigRejected {
            field: field.to_owned(),
            reason: reason.into(),
        }
    }
}

//! Application error type shared across services and collaborators.

use serde_json::Value;

/// Unified error type for the aggregation engine.
///
/// Carries a human-readable message plus structured JSON details for logging
/// and diagnostics. Collaborator transport failures and persistence failures
/// get their own variants so callers can apply the right policy: transport
/// errors are caught per-source inside the coordinator, persistence errors
/// are logged and never unwind in-memory state.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    Validation { message: String, details: Value },

    #[error("{message}")]
    NotFound { message: String, details: Value },

    #[error("{message}")]
    Conflict { message: String, details: Value },

    #[error("{message}")]
    Transport { message: String, details: Value },

    #[error("{message}")]
    Persistence { message: String, details: Value },

    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }

    pub fn transport(message: impl Into<String>, details: Value) -> Self {
        Self::Transport {
            message: message.into(),
            details,
        }
    }

    pub fn persistence(message: impl Into<String>, details: Value) -> Self {
        Self::Persistence {
            message: message.into(),
            details,
        }
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// Returns true for collaborator transport failures.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Transport-level failure reported by the shell for a service request.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum ServiceError {
    #[error("network error: {reason}")]
    Network { reason: String },

    #[error("request timed out")]
    Timeout,

    #[error("not signed in")]
    Unauthorized,

    #[error("unexpected status {code}")]
    Status { code: u16 },
}

impl ServiceError {
    #[must_use]
    pub fn network(reason: impl Into<String>) -> Self {
        Self::Network {
            reason: reason.into(),
        }
    }

    #[must_use]
    pub const fn from_status(code: u16) -> Self {
        match code {
            401 | 403 => Self::Unauthorized,
            408 | 504 => Self::Timeout,
            _ => Self::Status { code },
        }
    }
}

/// The catalog response could not be read as a keyed collection.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("catalog response was empty")]
    Missing,

    #[error("expected a keyed collection of trails, got {found}")]
    NotACollection { found: &'static str },
}

/// Faults inside a favorite action that are not service failures.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BrowserError {
    #[error("no trail card at index {index} (have {len})")]
    UnknownTrail { index: usize, len: usize },

    #[error("trail {name:?} has no hiking activity")]
    NotAHike { name: String },

    #[error("user profile not loaded")]
    NoProfile,

    #[error("user profile could not be decoded: {reason}")]
    ProfileDecode { reason: String },

    #[error("user profile request failed: {0}")]
    ProfileUnavailable(#[from] ServiceError),
}

impl From<serde_json::Error> for BrowserError {
    fn from(e: serde_json::Error) -> Self {
        Self::ProfileDecode {
            reason: e.to_string(),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("image_pool_size must be > 0")]
    EmptyImagePool,

    #[error("{field} cannot be empty")]
    EmptyField { field: &'static str },
}

//! Error classification shared with clients.

use serde::{Deserialize, Serialize};

/// Error classification codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    // === Client Errors ===
    /// Request was malformed or invalid for the current state
    BadRequest,
    /// Requested resource not found
    NotFound,
    /// Connection has not joined a game yet
    NotJoined,

    // === Server Errors ===
    /// Internal server error
    InternalError,

    /// Unknown variant for forward compatibility
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BadRequest => write!(f, "bad_request"),
            Self::NotFound => write!(f, "not_found"),
            Self::NotJoined => write!(f, "not_joined"),
            Self::InternalError => write!(f, "internal_error"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

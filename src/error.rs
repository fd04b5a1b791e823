//! Error model for permission resolution.
//! Every failure is captured inside the loader and converted into a message plus a
//! still-usable access state; evaluator predicates never see these values.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why the loader refused to contact the remote authority.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TokenProblem {
    Missing,
    Invalid,
}

impl TokenProblem {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenProblem::Missing => "missing",
            TokenProblem::Invalid => "invalid",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TransientCause {
    /// Transport failure, timeout or an unexpected HTTP status.
    Network,
    /// Body could not be decoded as the permission envelope.
    Malformed,
    /// Remote answered successfully but no entry carried a usable name.
    Empty,
    /// Envelope arrived with `success = false`.
    Rejected,
}

impl TransientCause {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransientCause::Network => "network",
            TransientCause::Malformed => "malformed",
            TransientCause::Empty => "empty",
            TransientCause::Rejected => "rejected",
        }
    }
}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LoadError {
    #[error("no_token: {}", .problem.as_str())]
    NoToken { problem: TokenProblem },
    #[error("authentication: {message}")]
    Authentication { message: String },
    #[error("authorization: {message}")]
    Authorization { message: String },
    #[error("transient/{}: {message}", .cause.as_str())]
    Transient { cause: TransientCause, message: String },
}

impl LoadError {
    pub fn no_token(problem: TokenProblem) -> Self { LoadError::NoToken { problem } }
    pub fn authentication<S: Into<String>>(msg: S) -> Self { LoadError::Authentication { message: msg.into() } }
    pub fn authorization<S: Into<String>>(msg: S) -> Self { LoadError::Authorization { message: msg.into() } }
    pub fn transient<S: Into<String>>(cause: TransientCause, msg: S) -> Self {
        LoadError::Transient { cause, message: msg.into() }
    }
    pub fn network<S: Into<String>>(msg: S) -> Self { Self::transient(TransientCause::Network, msg) }
    pub fn malformed<S: Into<String>>(msg: S) -> Self { Self::transient(TransientCause::Malformed, msg) }

    pub fn code_str(&self) -> &'static str {
        match self {
            LoadError::NoToken { .. } => "no_token",
            LoadError::Authentication { .. } => "authentication",
            LoadError::Authorization { .. } => "authorization",
            LoadError::Transient { .. } => "transient",
        }
    }

    /// Only transient failures are eligible for automatic retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, LoadError::Transient { .. })
    }

    /// Remote rejected the token or the principal; only re-authentication clears it.
    pub fn is_terminal(&self) -> bool {
        matches!(self, LoadError::Authentication { .. } | LoadError::Authorization { .. })
    }

    /// Message suitable for a diagnostic banner.
    pub fn user_message(&self) -> String {
        match self {
            LoadError::NoToken { problem: TokenProblem::Missing } => {
                "No authentication token available. Please login first.".to_string()
            }
            LoadError::NoToken { problem: TokenProblem::Invalid } => {
                "Invalid authentication token. Please login again.".to_string()
            }
            LoadError::Authentication { .. } => {
                "Authentication required. Please login to access permissions.".to_string()
            }
            LoadError::Authorization { .. } => {
                "Access denied. You do not have permission to view permissions.".to_string()
            }
            LoadError::Transient { cause: TransientCause::Rejected, .. } => {
                "Failed to load permissions from server".to_string()
            }
            LoadError::Transient { message, .. } => format!("Failed to load permissions: {}", message),
        }
    }
}

pub type LoadResult<T> = Result<T, LoadError>;

/// Failures of the persisted snapshot slot. Reads swallow these (a broken slot is "no snapshot").
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache io: {0}")]
    Io(#[from] std::io::Error),
    #[error("cache serde: {0}")]
    Serde(#[from] serde_json::Error),
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;

//! Shared error type across reqpolicy crates.

use thiserror::Error;

use crate::rule::{PatternField, RuleList};

/// Stable error categories (used by the gateway and in tests).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A rule pattern failed to compile.
    InvalidPattern,
    /// Configuration is structurally wrong.
    BadConfig,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Internal error (I/O, startup).
    Internal,
}

impl ErrorKind {
    /// String representation used in logs and test assertions.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::InvalidPattern => "INVALID_PATTERN",
            ErrorKind::BadConfig => "BAD_CONFIG",
            ErrorKind::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ErrorKind::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, ReqPolicyError>;

/// Unified error type used by core and gateway.
#[derive(Debug, Error)]
pub enum ReqPolicyError {
    #[error("invalid {field} regex in {list}[{index}] ({pattern:?}): {source}")]
    InvalidPattern {
        list: RuleList,
        index: usize,
        field: PatternField,
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("bad config: {0}")]
    BadConfig(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl ReqPolicyError {
    /// Map to a stable error category.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ReqPolicyError::InvalidPattern { .. } => ErrorKind::InvalidPattern,
            ReqPolicyError::BadConfig(_) => ErrorKind::BadConfig,
            ReqPolicyError::UnsupportedVersion => ErrorKind::UnsupportedVersion,
            ReqPolicyError::Internal(_) => ErrorKind::Internal,
        }
    }
}

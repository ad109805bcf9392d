use std::borrow::Cow;

use thiserror::Error;

use crate::types::DocumentRef;

/// Top-level error type returned by Sharuco operations.
#[derive(Debug, Error)]
pub enum SharucoError {
    /// Validation failed for one or more fields. Raised before any store call.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// A user tried to follow themselves.
    #[error("'{id}' cannot follow themselves")]
    SelfRelation { id: String },

    /// The operation needs a signed-in user.
    #[error("sign in required")]
    Unauthenticated,

    /// A referenced document does not exist. Nothing was written.
    #[error("document not found: {document}")]
    NotFound { document: DocumentRef },

    /// One side of a mirrored relation was written, the other was not.
    #[error("relation left asymmetric: {written} was updated but {failed} was not ({source})")]
    PartialFailure {
        written: DocumentRef,
        failed: DocumentRef,
        #[source]
        source: Box<SharucoError>,
    },

    /// The document store could not be reached.
    #[error("store unavailable: {0}")]
    RemoteUnavailable(String),

    /// Underlying Redis command failed.
    #[error("redis error: {0}")]
    Redis(redis::RedisError),

    /// A stored document could not be encoded or decoded.
    #[error("malformed document: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A list attribute holds something other than strings.
    #[error("attribute '{attribute}' on {document} is not a list of strings")]
    InvalidAttribute { document: DocumentRef, attribute: String },

    #[error("{message}")]
    Other { message: Cow<'static, str> },
}

impl SharucoError {
    pub fn not_found(document: DocumentRef) -> Self {
        Self::NotFound { document }
    }

    /// Whether the error leaves the social graph asymmetric.
    pub fn is_partial(&self) -> bool {
        matches!(self, Self::PartialFailure { .. })
    }
}

impl From<redis::RedisError> for SharucoError {
    fn from(err: redis::RedisError) -> Self {
        if err.is_io_error() || err.is_connection_refusal() || err.is_connection_dropped() || err.is_timeout() {
            Self::RemoteUnavailable(err.to_string())
        } else {
            Self::Redis(err)
        }
    }
}

/// Collection of validation issues encountered while preparing a mutation.
#[derive(Debug, Error)]
#[error("{}", summarize(.issues))]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationError {
    pub fn new<I>(issues: I) -> Self
    where
        I: IntoIterator<Item = ValidationIssue>,
    {
        Self {
            issues: issues.into_iter().collect(),
        }
    }

    /// Convenience helper for constructing a single-field validation error.
    pub fn single(field: impl Into<String>, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new([ValidationIssue::new(field, code, message)])
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// First issue reported for `field`, if any.
    pub fn issue_for(&self, field: &str) -> Option<&ValidationIssue> {
        self.issues.iter().find(|issue| issue.field == field)
    }
}

fn summarize(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(|issue| format!("{}: {}", issue.field, issue.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Detailed validation failure for a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub field: String,
    pub code: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(field: impl Into<String>, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            code: code.into(),
            message: message.into(),
        }
    }
}

pub type ValidationResult<T> = Result<T, ValidationError>;

pub type Result<T, E = SharucoError> = std::result::Result<T, E>;

//! Error types for the message resource model.
//!
//! Every operation returns either a fully valid result or one of these
//! errors. Validation errors are raised before any request reaches the
//! transport.

use http::StatusCode;
use thiserror::Error;

/// Convenience type alias for Results using [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rejected locally before any network call.
    Validation,
    /// Failed while building the request body.
    Encoding,
    /// The transport failed or answered with an unexpected status.
    Transport,
    /// The response body did not match the expected entity shape.
    Decode,
}

/// Top-level errors of the resource operations and entity methods.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A required snowflake was zero.
    #[error("missing required identifier: {0} must be set")]
    MissingSnowflake(&'static str),

    /// A message draft carried neither content, an embed nor files.
    #[error("message draft is empty: content, embed or files must be set")]
    EmptyMessage,

    /// A list filter was out of range or combined exclusive keys.
    #[error("invalid message filter: {0}")]
    InvalidFilter(&'static str),

    /// More bulk-delete targets than allowed.
    #[error("must be {limit} or less messages to delete, got {count}")]
    TooManyMessages {
        /// Number of targets after the attempted change.
        count: usize,
        /// Inclusive upper bound.
        limit: usize,
    },

    /// Fewer bulk-delete targets than required.
    #[error("must be at least {minimum} messages to delete, got {count}")]
    TooFewMessages {
        /// Number of collected targets.
        count: usize,
        /// Inclusive lower bound.
        minimum: usize,
    },

    /// `copy_over_to` was handed an incompatible target.
    #[error("unsupported type: {0}")]
    UnsupportedType(&'static str),

    /// The request body could not be built.
    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),

    /// The transport failed before producing a response.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The transport answered with a status other than the expected one.
    #[error("unexpected http response code. got {got}, wants {wants}: {body}")]
    UnexpectedStatus {
        /// Status observed.
        got: StatusCode,
        /// Status (or status class) required for success.
        wants: &'static str,
        /// Response body text, possibly empty.
        body: String,
    },

    /// The response body could not be decoded.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingSnowflake(_)
            | Self::EmptyMessage
            | Self::InvalidFilter(_)
            | Self::TooManyMessages { .. }
            | Self::TooFewMessages { .. }
            | Self::UnsupportedType(_) => ErrorKind::Validation,
            Self::Encode(_) => ErrorKind::Encoding,
            Self::Transport(_) | Self::UnexpectedStatus { .. } => ErrorKind::Transport,
            Self::Decode(_) => ErrorKind::Decode,
        }
    }

    /// True for errors raised before any network call.
    #[inline]
    pub fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }

    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingSnowflake(_) => "missing_snowflake",
            Self::EmptyMessage => "empty_message",
            Self::InvalidFilter(_) => "invalid_filter",
            Self::TooManyMessages { .. } => "too_many_messages",
            Self::TooFewMessages { .. } => "too_few_messages",
            Self::UnsupportedType(_) => "unsupported_type",
            Self::Encode(_) => "encode_error",
            Self::Transport(_) => "transport_error",
            Self::UnexpectedStatus { .. } => "unexpected_status",
            Self::Decode(_) => "decode_error",
        }
    }
}

/// Failures while encoding a message draft.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EncodeError {
    /// Reading an attachment stream failed.
    #[error("failed to copy attachment {index} ({file_name}): {source}")]
    Attachment {
        /// Zero-based position of the attachment.
        index: usize,
        /// File name after spoiler renaming.
        file_name: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The JSON part of the payload could not be serialized.
    #[error("failed to serialize payload json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Opaque failures reported by a transport implementation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TransportError {
    /// The request did not complete in time.
    #[error("request timed out")]
    Timeout,

    /// The connection could not be established or was lost.
    #[error("connection failed: {0}")]
    Connection(String),

    /// Any other transport failure.
    #[error(transparent)]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

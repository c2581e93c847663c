// SPDX-License-Identifier: MPL-2.0
//! Typed errors surfaced to the host application.
//!
//! Every failure the host has to act on (capture, validation, submission) is a
//! [`ShakeNbakeError`] carrying an [`ErrorCode`]. The code decides the default
//! user-facing message and whether a retry makes sense; the original cause is kept
//! behind [`std::error::Error::source`] for diagnostics only.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type returned by plugin implementations.
///
/// Plugins may return a [`ShakeNbakeError`] (boxed) to choose the code themselves;
/// anything else is wrapped by the caller.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Stable error kinds exposed to the host application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Credentials were rejected by the destination.
    AuthFailed,
    /// The destination throttled the request.
    RateLimited,
    /// Capturing or uploading the report payload failed.
    UploadFailed,
    /// The destination could not be reached.
    NetworkError,
    /// Validation failures, missing plugins and anything else.
    Unknown,
}

impl ErrorCode {
    /// Returns the wire name of this code (e.g. `"RATE_LIMITED"`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AuthFailed => "AUTH_FAILED",
            Self::RateLimited => "RATE_LIMITED",
            Self::UploadFailed => "UPLOAD_FAILED",
            Self::NetworkError => "NETWORK_ERROR",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Whether errors of this kind are retryable unless overridden.
    #[must_use]
    pub fn default_retryable(self) -> bool {
        matches!(self, Self::NetworkError | Self::RateLimited)
    }

    /// Message safe to show to end users.
    #[must_use]
    pub fn default_user_message(self) -> &'static str {
        match self {
            Self::AuthFailed => "Authentication failed. Please check your credentials.",
            Self::RateLimited => "Too many requests. Please wait a moment and try again.",
            Self::UploadFailed => "Failed to upload the bug report. Please try again.",
            Self::NetworkError => "Network error. Please check your connection and try again.",
            Self::Unknown => "An unexpected error occurred.",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error surfaced by the report flow.
#[derive(Debug, Error)]
#[error("{code}: {message}")]
pub struct ShakeNbakeError {
    code: ErrorCode,
    message: String,
    user_message: String,
    retryable: bool,
    #[source]
    source: Option<BoxError>,
}

impl ShakeNbakeError {
    /// Creates an error with the defaults of `code`.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            user_message: code.default_user_message().to_string(),
            retryable: code.default_retryable(),
            source: None,
        }
    }

    /// Shorthand for an [`ErrorCode::Unknown`] error.
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unknown, message)
    }

    /// Shorthand for an [`ErrorCode::UploadFailed`] error.
    pub fn upload_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::UploadFailed, message)
    }

    /// Shorthand for an [`ErrorCode::NetworkError`] error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NetworkError, message)
    }

    /// Shorthand for an [`ErrorCode::AuthFailed`] error.
    pub fn auth_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AuthFailed, message)
    }

    /// Shorthand for an [`ErrorCode::RateLimited`] error.
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::RateLimited, message)
    }

    /// Attaches the underlying cause.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<BoxError>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Overrides the default retryability of the code.
    #[must_use]
    pub fn with_retryable(mut self, retryable: bool) -> Self {
        self.retryable = retryable;
        self
    }

    /// Overrides the default user-facing message.
    #[must_use]
    pub fn with_user_message(mut self, user_message: impl Into<String>) -> Self {
        self.user_message = user_message.into();
        self
    }

    /// Converts a plugin error into a typed error.
    ///
    /// Errors that already are a [`ShakeNbakeError`] pass through unchanged; anything
    /// else becomes a `code` error carrying `message` with the original as source.
    pub fn from_plugin(err: BoxError, code: ErrorCode, message: impl Into<String>) -> Self {
        match err.downcast::<ShakeNbakeError>() {
            Ok(typed) => *typed,
            Err(other) => Self::new(code, message).with_source(other),
        }
    }

    #[must_use]
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Developer-facing description.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn user_message(&self) -> &str {
        &self.user_message
    }

    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.retryable
    }
}

pub type Result<T> = std::result::Result<T, ShakeNbakeError>;

//! Error handling for the blobkit library
//!
//! Every fallible operation in the crate returns [`BlobkitError`]. The enum is
//! deliberately flat: each variant carries a human readable message that can be
//! shown to an end user or fed back to a language model as corrective feedback.
//!
//! # Error Categories
//!
//! - **Format** - model output did not contain the expected code or JSON blob
//! - **Input Validation** - caller supplied arguments are unusable (empty markers,
//!   invalid identifiers)
//! - **Configuration** - config files, environment variables, logging setup
//! - **Serialization** - JSON encoding/decoding outside of blob extraction
//!
//! # Example
//!
//! ```rust
//! use blobkit::extract::{parse_code_blobs, DelimiterPair};
//!
//! let err = parse_code_blobs("Wrong blob!", &DelimiterPair::code_tags()).unwrap_err();
//! assert!(err.is_format_error());
//! assert!(!err.is_retryable());
//! ```

use thiserror::Error;

/// Main error type for the blobkit library
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BlobkitError {
    /// Model output is missing the expected blob or the blob is malformed
    #[error("{message}")]
    FormatError { message: String },

    /// Input validation errors (caller-provided data is invalid)
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// Configuration errors (files, environment, logging setup)
    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {message}")]
    SerializationError { message: String },

    /// Internal library errors
    #[error("Internal error: {message}")]
    InternalError { message: String },
}

impl BlobkitError {
    /// Create a FormatError
    pub fn format_error(message: impl Into<String>) -> Self {
        Self::FormatError {
            message: message.into(),
        }
    }

    /// Create a simple InvalidInput error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a simple ConfigurationError
    pub fn configuration_error(message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
        }
    }

    /// Create a SerializationError
    pub fn serialization_error(message: impl Into<String>) -> Self {
        Self::SerializationError {
            message: message.into(),
        }
    }

    /// Create an InternalError
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }

    /// Check if the model output was malformed
    pub fn is_format_error(&self) -> bool {
        matches!(self, BlobkitError::FormatError { .. })
    }

    /// Check if this error is due to caller input
    pub fn is_user_error(&self) -> bool {
        matches!(self, BlobkitError::InvalidInput { .. })
    }

    /// Check if this error is retryable
    ///
    /// Extraction is a pure function of its input, so nothing here is. Retrying
    /// belongs to the agent loop, which has to ask the model for new output.
    pub fn is_retryable(&self) -> bool {
        false
    }
}

impl From<serde_json::Error> for BlobkitError {
    fn from(error: serde_json::Error) -> Self {
        BlobkitError::SerializationError {
            message: error.to_string(),
        }
    }
}

impl From<regex::Error> for BlobkitError {
    fn from(error: regex::Error) -> Self {
        BlobkitError::InternalError {
            message: format!("Failed to compile pattern: {}", error),
        }
    }
}

impl From<crate::config::ConfigError> for BlobkitError {
    fn from(error: crate::config::ConfigError) -> Self {
        BlobkitError::ConfigurationError {
            message: error.to_string(),
        }
    }
}

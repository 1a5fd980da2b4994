//! Error types for Aria Player

use thiserror::Error;

/// Result type alias using [`AriaError`]
pub type Result<T> = std::result::Result<T, AriaError>;

/// Unified error type for playlist, decoder, controller and providers
#[derive(Error, Debug)]
pub enum AriaError {
    /// Seek past playlist bounds without repeat, or nothing to select
    #[error("not found: {0}")]
    NotFound(String),

    /// Malformed location or scheme
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Decoder task cancelled mid-track
    #[error("operation cancelled")]
    OperationCancelled,

    /// Decode-layer failure
    #[error("bad message: {0}")]
    BadMessage(String),

    /// No provider registered for a scheme
    #[error("no provider available for '{0}'")]
    ProviderUnavailable(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl AriaError {
    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create an invalid argument error
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a bad message error
    pub fn bad_message(msg: impl Into<String>) -> Self {
        Self::BadMessage(msg.into())
    }

    /// Create a provider unavailable error for a scheme or location
    pub fn provider_unavailable(scheme: impl Into<String>) -> Self {
        Self::ProviderUnavailable(scheme.into())
    }

    /// Whether this error is a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::OperationCancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats() {
        assert_eq!(
            AriaError::not_found("end of playlist").to_string(),
            "not found: end of playlist"
        );
        assert_eq!(
            AriaError::provider_unavailable("spotify").to_string(),
            "no provider available for 'spotify'"
        );
        assert!(AriaError::OperationCancelled.is_cancelled());
        assert!(!AriaError::bad_message("x").is_cancelled());
    }
}

//! Error types for location-picker

use thiserror::Error;

/// Main error type for location-picker operations
#[derive(Error, Debug)]
pub enum Error {
    /// Geocoding request rejected, timed out or answered with a failure status
    #[error("Network failure: {0}")]
    Network(String),

    /// Provider answered with unexpected or missing fields
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    #[error("Invalid pincode: {0}")]
    InvalidPincode(String),

    /// Operation not allowed in the current selection phase
    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Server error: {0}")]
    Server(String),
}

impl Error {
    /// True for failures of the external geocoding provider.
    ///
    /// These are logged and swallowed by the picker instead of being surfaced.
    pub fn is_provider_failure(&self) -> bool {
        matches!(self, Self::Network(_) | Self::MalformedResponse(_))
    }
}

/// Result type alias for location-picker operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_failure_classification() {
        assert!(Error::Network("timeout".to_string()).is_provider_failure());
        assert!(Error::MalformedResponse("no address".to_string()).is_provider_failure());
        assert!(!Error::InvalidCoordinates("abc".to_string()).is_provider_failure());
        assert!(!Error::InvalidState("confirmed".to_string()).is_provider_failure());
    }

    #[test]
    fn test_display() {
        let err = Error::InvalidPincode("".to_string());
        assert_eq!(err.to_string(), "Invalid pincode: ");
    }
}

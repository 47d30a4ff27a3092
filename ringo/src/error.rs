//! Error types for Ringo.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, RingoError>;

#[derive(Error, Debug)]
pub enum RingoError {
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// The dependency barrier stayed closed for the whole time box.
    #[error("Timed out waiting for the dependency barrier")]
    Timeout,
}

impl RingoError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::InvalidConfig { message: message.into() }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_message() {
        let err = RingoError::config("Ring size must be power of 2");
        assert_eq!(err.to_string(), "Invalid configuration: Ring size must be power of 2");
        assert!(!err.is_timeout());
    }

    #[test]
    fn test_timeout_error() {
        assert!(RingoError::Timeout.is_timeout());
    }

    #[test]
    fn test_variants_display() {
        assert_eq!(
            RingoError::Timeout.to_string(),
            "Timed out waiting for the dependency barrier"
        );
        assert!(matches!(RingoError::config("x"), RingoError::InvalidConfig { .. }));
    }
}

//! Error taxonomy for the dialogue engine.

use thiserror::Error;

/// Errors surfaced while processing a turn.
///
/// None of these are fatal: the engine converts every variant into a reply
/// so the hosting turn loop never crashes on bad input or a flaky API.
#[derive(Debug, Clone, Error)]
pub enum DialogError {
    /// User input failed a guard before any API call was made.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The booking API answered with a non-success status.
    #[error("booking API returned status {status}: {detail}")]
    Api { status: u16, detail: String },

    /// The call never completed (connect failure, timeout, bad body).
    #[error("network error: {0}")]
    Network(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_display() {
        let err = DialogError::Validation("party size must be between 1 and 20".to_string());
        assert_eq!(
            err.to_string(),
            "validation failed: party size must be between 1 and 20"
        );
    }

    #[test]
    fn test_api_display_includes_status() {
        let err = DialogError::Api {
            status: 502,
            detail: "upstream unavailable".to_string(),
        };
        assert!(err.to_string().contains("502"));
        assert!(err.to_string().contains("upstream unavailable"));
    }

    #[test]
    fn test_network_display() {
        let err = DialogError::Network("connection refused".to_string());
        assert_eq!(err.to_string(), "network error: connection refused");
    }
}

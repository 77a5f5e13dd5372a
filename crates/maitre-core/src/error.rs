use thiserror::Error;

/// Top-level error type for the maitre system.
///
/// Subsystem crates define their own error types and implement
/// `From<SubsystemError> for MaitreError` so that the `?` operator works
/// across crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MaitreError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for MaitreError {
    fn from(err: toml::de::Error) -> Self {
        MaitreError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for MaitreError {
    fn from(err: toml::ser::Error) -> Self {
        MaitreError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for MaitreError {
    fn from(err: serde_json::Error) -> Self {
        MaitreError::Serialization(err.to_string())
    }
}

/// Convenience result type used throughout the workspace.
pub type Result<T> = std::result::Result<T, MaitreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = MaitreError::Config("missing section".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing section");
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err: MaitreError = io.into();
        assert!(matches!(err, MaitreError::Io(_)));
        assert!(err.to_string().contains("no such file"));
    }

    #[test]
    fn test_toml_error_converts_to_config() {
        let bad: std::result::Result<toml::Value, _> = toml::from_str("not = = toml");
        let err: MaitreError = bad.unwrap_err().into();
        assert!(matches!(err, MaitreError::Config(_)));
    }

    #[test]
    fn test_json_error_converts_to_serialization() {
        let bad: std::result::Result<serde_json::Value, _> = serde_json::from_str("{nope");
        let err: MaitreError = bad.unwrap_err().into();
        assert!(matches!(err, MaitreError::Serialization(_)));
    }
}

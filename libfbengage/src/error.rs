//! Error types for fbengage

use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngageError>;

#[derive(Error, Debug)]
pub enum EngageError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngageError {
    /// Returns the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            EngageError::InvalidInput(_) => 3,
            EngageError::Backend(BackendError::Authentication(_)) => 2,
            EngageError::Backend(_) => 1,
            EngageError::Config(_) => 1,
            EngageError::Store(_) => 1,
            EngageError::Io(_) => 1,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to read state file: {0}")]
    ReadError(std::io::Error),

    #[error("Failed to write state file: {0}")]
    WriteError(std::io::Error),

    #[error("Malformed state document: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Error, Debug, Clone)]
pub enum BackendError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Scrape failed: {0}")]
    Scrape(String),

    #[error("Not implemented: {0}")]
    NotImplemented(String),
}

impl BackendError {
    /// Classify a transport failure from the HTTP client, keeping the
    /// request context in the message.
    pub fn from_transport(context: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            BackendError::Network(format!("{} timed out: {}", context, err))
        } else if err.is_connect() {
            BackendError::Network(format!("{} could not connect: {}", context, err))
        } else {
            BackendError::Network(format!("{} failed: {}", context, err))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_invalid_input() {
        let error = EngageError::InvalidInput("Empty message".to_string());
        assert_eq!(error.exit_code(), 3);
    }

    #[test]
    fn test_exit_code_authentication_error() {
        let backend_error = BackendError::Authentication("Token rejected".to_string());
        let error = EngageError::Backend(backend_error);
        assert_eq!(error.exit_code(), 2);
    }

    #[test]
    fn test_exit_code_network_error() {
        let backend_error = BackendError::Network("Connection refused".to_string());
        let error = EngageError::Backend(backend_error);
        assert_eq!(error.exit_code(), 1);
    }

    #[test]
    fn test_exit_code_scrape_error() {
        let backend_error = BackendError::Scrape("Missing fb_dtsg".to_string());
        let error = EngageError::Backend(backend_error);
        assert_eq!(error.exit_code(), 1);
    }

    #[test]
    fn test_exit_code_config_error() {
        let config_error = ConfigError::MissingField("data directory".to_string());
        let error = EngageError::Config(config_error);
        assert_eq!(error.exit_code(), 1);
    }

    #[test]
    fn test_exit_code_store_error() {
        let store_error = StoreError::ReadError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "File not found",
        ));
        let error = EngageError::Store(store_error);
        assert_eq!(error.exit_code(), 1);
    }

    #[test]
    fn test_exit_code_io_error() {
        let error: EngageError =
            std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "stdin closed").into();
        assert!(matches!(error, EngageError::Io(_)));
        assert_eq!(error.exit_code(), 1);
    }

    #[test]
    fn test_error_message_formatting_invalid_input() {
        let error = EngageError::InvalidInput("Could not resolve a post ID".to_string());
        let message = format!("{}", error);
        assert_eq!(message, "Invalid input: Could not resolve a post ID");
    }

    #[test]
    fn test_error_message_formatting_backend() {
        let backend_error = BackendError::Api("comment rejected (status 400)".to_string());
        let error = EngageError::Backend(backend_error);
        let message = format!("{}", error);
        assert_eq!(message, "Backend error: API error: comment rejected (status 400)");
    }

    #[test]
    fn test_error_message_formatting_not_implemented() {
        let backend_error =
            BackendError::NotImplemented("cookie backend does not support react".to_string());
        let message = format!("{}", backend_error);
        assert_eq!(
            message,
            "Not implemented: cookie backend does not support react"
        );
    }

    #[test]
    fn test_error_conversion_from_config_error() {
        let config_error = ConfigError::MissingField("test".to_string());
        let engage_error: EngageError = config_error.into();

        match engage_error {
            EngageError::Config(_) => {}
            _ => panic!("Expected EngageError::Config"),
        }
    }

    #[test]
    fn test_error_conversion_from_store_error() {
        let store_error = StoreError::WriteError(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "test",
        ));
        let engage_error: EngageError = store_error.into();

        match engage_error {
            EngageError::Store(_) => {}
            _ => panic!("Expected EngageError::Store"),
        }
    }

    #[test]
    fn test_error_conversion_from_backend_error() {
        let backend_error = BackendError::Network("test".to_string());
        let engage_error: EngageError = backend_error.into();

        match engage_error {
            EngageError::Backend(_) => {}
            _ => panic!("Expected EngageError::Backend"),
        }
    }

    #[test]
    fn test_backend_error_clone() {
        let original = BackendError::Network("Connection failed".to_string());
        let cloned = original.clone();

        assert_eq!(format!("{}", original), format!("{}", cloned));
    }

    #[test]
    fn test_exit_code_consistency() {
        // All authentication failures map to exit code 2
        let auth1 = EngageError::Backend(BackendError::Authentication("a".to_string()));
        let auth2 = EngageError::Backend(BackendError::Authentication("b".to_string()));
        assert_eq!(auth1.exit_code(), auth2.exit_code());
        assert_eq!(auth1.exit_code(), 2);

        // All non-auth backend failures map to exit code 1
        let network = EngageError::Backend(BackendError::Network("x".to_string()));
        let api = EngageError::Backend(BackendError::Api("x".to_string()));
        let scrape = EngageError::Backend(BackendError::Scrape("x".to_string()));
        let not_impl = EngageError::Backend(BackendError::NotImplemented("x".to_string()));

        assert_eq!(network.exit_code(), 1);
        assert_eq!(api.exit_code(), 1);
        assert_eq!(scrape.exit_code(), 1);
        assert_eq!(not_impl.exit_code(), 1);

        // Invalid input maps to exit code 3
        let invalid = EngageError::InvalidInput("x".to_string());
        assert_eq!(invalid.exit_code(), 3);
    }

    #[test]
    fn test_error_debug_output() {
        let error = EngageError::Backend(BackendError::Scrape("No comment form".to_string()));

        let debug_output = format!("{:?}", error);
        assert!(debug_output.contains("Backend"));
        assert!(debug_output.contains("Scrape"));
    }
}

//! Error types and exit codes for the CloudSearch client.

use thiserror::Error;

/// Exit codes used by the `cloudsearch` binary.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const CONFIG_ERROR: i32 = 2;
    pub const TRANSPORT_ERROR: i32 = 3;
    pub const SERVICE_ERROR: i32 = 4;
}

/// Main error type for client operations.
#[derive(Error, Debug)]
pub enum CloudSearchError {
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Empty response from {0}")]
    EmptyResponse(String),

    #[error("Service error: {0}")]
    Service(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("{0}")]
    Other(String),
}

impl CloudSearchError {
    /// Returns the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CloudSearchError::ConfigError(_) | CloudSearchError::TomlParse(_) => {
                exit_code::CONFIG_ERROR
            }
            CloudSearchError::Http(_) | CloudSearchError::EmptyResponse(_) => {
                exit_code::TRANSPORT_ERROR
            }
            CloudSearchError::Service(_) | CloudSearchError::MalformedResponse(_) => {
                exit_code::SERVICE_ERROR
            }
            _ => exit_code::GENERAL_ERROR,
        }
    }

    /// True for failures that happened before the service produced a reply.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            CloudSearchError::Http(_) | CloudSearchError::EmptyResponse(_)
        )
    }
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, CloudSearchError>;

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success,
    /// The command ran but the service rejected the request.
    ServiceError,
}

impl ExitCode {
    /// Convert to exit code integer.
    pub fn code(self) -> i32 {
        match self {
            ExitCode::Success => exit_code::SUCCESS,
            ExitCode::ServiceError => exit_code::SERVICE_ERROR,
        }
    }
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Backend API error: {0}")]
    Api(#[from] ApiError),

    #[error("Bad configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Could not reach the backend: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },
}

/// Failures reported by the sentiment backend itself.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("Request to {endpoint} failed with status {status_code}: {message}")]
    Status {
        endpoint: String,
        status_code: u16,
        message: String,
    },

    #[error("Backend returned HTTP {status_code}")]
    ServerError { status_code: u16 },

    #[error("No such endpoint: {endpoint}")]
    NotFound { endpoint: String },

    #[error("Unexpected payload: {details}")]
    InvalidResponse { details: String },

    #[error("Request timed out")]
    RequestTimeout,

    #[error("Ingestion failed: {message}")]
    IngestionFailed { message: String },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file {path} could not be read")]
    FileNotFound { path: String },

    #[error("{field} has an unusable value {value:?}")]
    InvalidValue { field: String, value: String },

    #[error("Malformed TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

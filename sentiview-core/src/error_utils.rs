use crate::error::*;
use std::time::Duration;
use tracing::{error, info, warn};

/// How a failure should be treated by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Worth retrying; the backend may recover.
    Transient,
    /// The request itself is wrong or the backend refused it.
    Permanent,
    /// Nothing works until the configuration is fixed.
    Fatal,
}

pub trait ErrorExt {
    fn severity(&self) -> Severity;
    fn retry_after(&self) -> Option<Duration>;
    fn user_friendly_message(&self) -> String;
    fn error_code(&self) -> &'static str;

    fn is_retryable(&self) -> bool {
        self.severity() == Severity::Transient
    }
}

impl ErrorExt for CoreError {
    fn severity(&self) -> Severity {
        match self {
            CoreError::Api(e) => e.severity(),
            CoreError::Config(e) => e.severity(),
            CoreError::Network(e) if e.is_timeout() || e.is_connect() => Severity::Transient,
            CoreError::Network(_) | CoreError::InvalidInput { .. } => Severity::Permanent,
        }
    }

    fn retry_after(&self) -> Option<Duration> {
        match self {
            CoreError::Api(e) => e.retry_after(),
            _ if self.is_retryable() => Some(Duration::from_secs(1)),
            _ => None,
        }
    }

    fn user_friendly_message(&self) -> String {
        match self {
            CoreError::Api(e) => e.user_friendly_message(),
            CoreError::Config(e) => e.user_friendly_message(),
            CoreError::Network(_) => {
                "Could not reach the sentiment backend. Is the API server running?".to_string()
            }
            CoreError::InvalidInput { message } => format!("Invalid input: {}", message),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            CoreError::Api(e) => e.error_code(),
            CoreError::Config(e) => e.error_code(),
            CoreError::Network(_) => "NETWORK",
            CoreError::InvalidInput { .. } => "INVALID_INPUT",
        }
    }
}

impl ErrorExt for ApiError {
    fn severity(&self) -> Severity {
        match self {
            ApiError::ServerError { .. } | ApiError::RequestTimeout => Severity::Transient,
            ApiError::Status { status_code, .. } if *status_code == 429 || *status_code >= 500 => {
                Severity::Transient
            }
            ApiError::NotFound { .. } => Severity::Fatal,
            ApiError::Status { .. }
            | ApiError::InvalidResponse { .. }
            | ApiError::IngestionFailed { .. } => Severity::Permanent,
        }
    }

    fn retry_after(&self) -> Option<Duration> {
        match self {
            ApiError::Status {
                status_code: 429, ..
            } => Some(Duration::from_secs(5)),
            _ if self.is_retryable() => Some(Duration::from_secs(1)),
            _ => None,
        }
    }

    fn user_friendly_message(&self) -> String {
        match self {
            ApiError::Status { message, .. } => format!("The backend rejected the request: {}", message),
            ApiError::ServerError { .. } => {
                "The sentiment backend is having trouble. Please try again later.".to_string()
            }
            ApiError::NotFound { endpoint } => {
                format!("The backend does not provide {}. Check the API base URL.", endpoint)
            }
            ApiError::InvalidResponse { .. } => "Received unexpected data from the backend.".to_string(),
            ApiError::RequestTimeout => "The request timed out. Please try again.".to_string(),
            ApiError::IngestionFailed { message } => format!("Error: {}", message),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            ApiError::Status { .. } => "API_STATUS",
            ApiError::ServerError { .. } => "API_SERVER_ERROR",
            ApiError::NotFound { .. } => "API_NOT_FOUND",
            ApiError::InvalidResponse { .. } => "API_INVALID_RESPONSE",
            ApiError::RequestTimeout => "API_TIMEOUT",
            ApiError::IngestionFailed { .. } => "API_INGESTION_FAILED",
        }
    }
}

impl ErrorExt for ConfigError {
    fn severity(&self) -> Severity {
        Severity::Fatal
    }

    fn retry_after(&self) -> Option<Duration> {
        None
    }

    fn user_friendly_message(&self) -> String {
        match self {
            ConfigError::FileNotFound { path } => format!("No readable configuration at {}", path),
            ConfigError::InvalidValue { field, value } => {
                format!("Configuration value '{}' is not valid for {}", value, field)
            }
            ConfigError::Parse(e) => format!("The configuration file is not valid TOML: {}", e),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            ConfigError::FileNotFound { .. } => "CONFIG_NOT_FOUND",
            ConfigError::InvalidValue { .. } => "CONFIG_INVALID_VALUE",
            ConfigError::Parse(_) => "CONFIG_PARSE",
        }
    }
}

/// Logs failures with their code. Transient ones go out at `warn`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorReporter {
    quiet_transient: bool,
}

impl ErrorReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops transient failures to `info`.
    pub fn quiet_transient(mut self, quiet: bool) -> Self {
        self.quiet_transient = quiet;
        self
    }

    pub fn report_error<E>(&self, failure: &E)
    where
        E: ErrorExt + std::fmt::Display,
    {
        let code = failure.error_code();
        match failure.severity() {
            Severity::Transient if self.quiet_transient => {
                info!("[{}] {}", code, failure);
            }
            Severity::Transient => {
                warn!("[{}] {}", code, failure);
                if let Some(delay) = failure.retry_after() {
                    info!("[{}] may succeed if retried after {:?}", code, delay);
                }
            }
            Severity::Permanent | Severity::Fatal => {
                error!("[{}] {}", code, failure);
                info!("[{}] shown to user as: {}", code, failure.user_friendly_message());
            }
        }
    }
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Resource not found: {url}")]
    NotFound { url: String },

    #[error("HTTP {status} returned by {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Malformed response from {url}: {message}")]
    MalformedResponse { url: String, message: String },

    #[error("Missing required field '{field}' in {context}")]
    MissingField { field: String, context: String },

    #[error("Field '{field}' in {context} has an unexpected shape: {message}")]
    InvalidField {
        field: String,
        context: String,
        message: String,
    },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration '{field}'")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::ApiError(_) | EtlError::NotFound { .. } | EtlError::HttpStatus { .. } => {
                ErrorCategory::Network
            }
            EtlError::MalformedResponse { .. }
            | EtlError::MissingField { .. }
            | EtlError::InvalidField { .. }
            | EtlError::CsvError(_)
            | EtlError::SerializationError(_) => ErrorCategory::Data,
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => ErrorCategory::Configuration,
            EtlError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 暫時性錯誤，重試可能成功
            EtlError::ApiError(_) => ErrorSeverity::Medium,
            EtlError::HttpStatus { status, .. } if *status >= 500 || *status == 429 => {
                ErrorSeverity::Medium
            }
            EtlError::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    /// Whether the error came from the remote side rather than from local setup.
    pub fn is_remote(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Network | ErrorCategory::Data
        ) && !matches!(self, EtlError::CsvError(_) | EtlError::SerializationError(_))
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            EtlError::ApiError(e) if e.is_timeout() => {
                "The request timed out; raise --timeout-seconds or try again later".to_string()
            }
            EtlError::ApiError(_) => {
                "Check network connectivity and that the base URL is reachable".to_string()
            }
            EtlError::NotFound { .. } => {
                "The work or edition does not exist; use --on-book-error skip to continue past it"
                    .to_string()
            }
            EtlError::HttpStatus { status, .. } if *status >= 500 => {
                "The API is having trouble; wait a moment and retry".to_string()
            }
            EtlError::HttpStatus { .. } => {
                "Check the base URL and author query".to_string()
            }
            EtlError::MalformedResponse { .. }
            | EtlError::MissingField { .. }
            | EtlError::InvalidField { .. } => {
                "The API returned an unexpected document; use --on-book-error skip to ignore incomplete books"
                    .to_string()
            }
            EtlError::CsvError(_) | EtlError::SerializationError(_) => {
                "Try a different output format".to_string()
            }
            EtlError::IoError(_) => {
                "Check that the output path exists and is writable".to_string()
            }
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => {
                "Review the configuration values and run again".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not reach the book API: {}", self),
            ErrorCategory::Data => format!("The book data could not be processed: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;

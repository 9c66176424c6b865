use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("API returned status code {status}")]
    UnexpectedStatus { status: u16 },

    #[error("Malformed API response: {message}")]
    MalformedResponse { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Worker task failed: {message}")]
    WorkerError { message: String },
}

pub type Result<T> = std::result::Result<T, ScanError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Storage,
    Configuration,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ScanError {
    /// 可在同一號碼上重試的錯誤（網路、狀態碼、回應格式）
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ScanError::ApiError(_)
                | ScanError::UnexpectedStatus { .. }
                | ScanError::MalformedResponse { .. }
        )
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ScanError::ApiError(_)
            | ScanError::UnexpectedStatus { .. }
            | ScanError::MalformedResponse { .. } => ErrorCategory::Network,
            ScanError::IoError(_) | ScanError::SerializationError(_) => ErrorCategory::Storage,
            ScanError::ConfigError { .. }
            | ScanError::InvalidConfigValueError { .. }
            | ScanError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            ScanError::WorkerError { .. } => ErrorCategory::Internal,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Storage | ErrorCategory::Internal => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ScanError::ApiError(_) => "Check network connectivity and the API endpoint",
            ScanError::UnexpectedStatus { .. } => {
                "The API may be rate limiting; lower --workers or raise the jitter"
            }
            ScanError::MalformedResponse { .. } => {
                "Verify the endpoint returns a JSON object with an 'available' field"
            }
            ScanError::IoError(_) => "Check the output directory exists and is writable",
            ScanError::SerializationError(_) => "Check the request payload settings",
            ScanError::ConfigError { .. }
            | ScanError::InvalidConfigValueError { .. }
            | ScanError::ConfigValidationError { .. } => "Fix the configuration value and retry",
            ScanError::WorkerError { .. } => "Re-run with --verbose and report the failure",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not reach the availability API: {}", self),
            ErrorCategory::Storage => format!("Could not write results: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Internal => format!("Scan aborted: {}", self),
        }
    }
}

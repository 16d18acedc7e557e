use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "message")]
pub enum AppError {
    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("Disambiguation cancelled: {0}")]
    DisambiguationCancelled(String),

    #[error("Metric evaluation error: {0}")]
    MetricEvaluation(String),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl AppError {
    /// Cancellation is the only error that aborts a whole matching run.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, AppError::Cancelled)
    }

    /// Errors that stay scoped to the batch that raised them.
    pub fn is_batch_scoped(&self) -> bool {
        matches!(
            self,
            AppError::ProviderError(_)
                | AppError::DisambiguationCancelled(_)
                | AppError::MetricEvaluation(_)
        )
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::SerializationError(err.to_string())
    }
}

impl From<chrono::ParseError> for AppError {
    fn from(err: chrono::ParseError) -> Self {
        AppError::InvalidInput(format!("Invalid date: {}", err))
    }
}

impl From<std::num::ParseIntError> for AppError {
    fn from(err: std::num::ParseIntError) -> Self {
        AppError::InvalidInput(format!("Invalid number: {}", err))
    }
}

impl From<std::num::ParseFloatError> for AppError {
    fn from(err: std::num::ParseFloatError) -> Self {
        AppError::InvalidInput(format!("Invalid decimal number: {}", err))
    }
}

impl From<regex::Error> for AppError {
    fn from(err: regex::Error) -> Self {
        AppError::ConfigError(format!("Invalid pattern: {}", err))
    }
}

// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancellation_is_not_batch_scoped() {
        assert!(AppError::Cancelled.is_cancellation());
        assert!(!AppError::Cancelled.is_batch_scoped());
    }

    #[test]
    fn test_provider_error_is_batch_scoped() {
        let err = AppError::ProviderError("timeout".to_string());
        assert!(err.is_batch_scoped());
        assert!(!err.is_cancellation());
    }

    #[test]
    fn test_serializes_with_type_tag() {
        let err = AppError::InvalidInput("bad".to_string());
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(json, r#"{"type":"InvalidInput","message":"bad"}"#);
    }

    #[test]
    fn test_parse_int_conversion() {
        let err: AppError = "x1".parse::<u32>().unwrap_err().into();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }
}

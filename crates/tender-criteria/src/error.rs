use crate::config::ConfigError;
use crate::criteria::{CriteriaServiceError, ValidationError};
use crate::telemetry::TelemetryError;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Payload(serde_json::Error),
    Criteria(CriteriaServiceError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Payload(err) => write!(f, "payload error: {}", err),
            AppError::Criteria(err) => write!(f, "criteria error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Payload(err) => Some(err),
            AppError::Criteria(err) => Some(err),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Payload(value)
    }
}

impl From<CriteriaServiceError> for AppError {
    fn from(value: CriteriaServiceError) -> Self {
        Self::Criteria(value)
    }
}

impl From<ValidationError> for AppError {
    fn from(value: ValidationError) -> Self {
        Self::Criteria(CriteriaServiceError::Validation(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::RepositoryError;
    use std::error::Error as _;

    #[test]
    fn validation_errors_become_criteria_errors() {
        let error = AppError::from(ValidationError::EmptyList("items must not be empty".to_string()));

        assert!(matches!(
            error,
            AppError::Criteria(CriteriaServiceError::Validation(ValidationError::EmptyList(_)))
        ));
        assert!(error.to_string().starts_with("criteria error:"));
    }

    #[test]
    fn source_exposes_the_wrapped_error() {
        let error = AppError::from(CriteriaServiceError::Repository(RepositoryError::NotFound));

        let source = error.source().expect("wrapped error");
        assert_eq!(source.to_string(), RepositoryError::NotFound.to_string());
    }
}

use serde::Serialize;

/// Closed set of validation failures raised by the checks and the builder.
///
/// Every failure is terminal for the call that produced it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("invalid criteria: {0}")]
    InvalidCriteria(String),
    #[error("invalid conversion: {0}")]
    InvalidConversion(String),
    #[error("invalid requirement value: {0}")]
    InvalidRequirementValue(String),
    #[error("invalid period value: {0}")]
    InvalidPeriodValue(String),
    #[error("invalid award criteria: {0}")]
    InvalidAwardCriteria(String),
    #[error("invalid coefficient: {0}")]
    InvalidCoefficient(String),
    #[error("ids are not unique: {0}")]
    NotUniqueIds(String),
    #[error("empty list: {0}")]
    EmptyList(String),
}

impl ValidationError {
    /// Stable machine-readable code.
    pub const fn code(&self) -> &'static str {
        match self {
            ValidationError::InvalidCriteria(_) => "invalid_criteria",
            ValidationError::InvalidConversion(_) => "invalid_conversion",
            ValidationError::InvalidRequirementValue(_) => "invalid_requirement_value",
            ValidationError::InvalidPeriodValue(_) => "invalid_period_value",
            ValidationError::InvalidAwardCriteria(_) => "invalid_award_criteria",
            ValidationError::InvalidCoefficient(_) => "invalid_coefficient",
            ValidationError::NotUniqueIds(_) => "not_unique_ids",
            ValidationError::EmptyList(_) => "empty_list",
        }
    }

    pub fn description(&self) -> &str {
        match self {
            ValidationError::InvalidCriteria(detail)
            | ValidationError::InvalidConversion(detail)
            | ValidationError::InvalidRequirementValue(detail)
            | ValidationError::InvalidPeriodValue(detail)
            | ValidationError::InvalidAwardCriteria(detail)
            | ValidationError::InvalidCoefficient(detail)
            | ValidationError::NotUniqueIds(detail)
            | ValidationError::EmptyList(detail) => detail,
        }
    }

    pub fn view(&self) -> ValidationErrorView {
        ValidationErrorView {
            code: self.code(),
            description: self.description().to_string(),
        }
    }
}

/// Wire shape of a validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationErrorView {
    pub code: &'static str,
    pub description: String,
}

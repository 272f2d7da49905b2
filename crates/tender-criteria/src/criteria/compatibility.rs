//! Datatype and bound compatibility shared by the criteria checks and the response matcher.

use rust_decimal::Decimal;

use super::domain::{
    CoefficientValue, DataType, ExpectedValue, Requirement, RequirementValue, Typed,
};

/// Whether a value's implied datatype is the declared one.
pub fn conforms<T: Typed + ?Sized>(value: &T, declared: DataType) -> bool {
    value.data_type() == declared
}

/// Whether every part of a requirement value agrees with `declared`.
pub fn requirement_value_conforms(value: &RequirementValue, declared: DataType) -> bool {
    match value {
        RequirementValue::NoValue => true,
        RequirementValue::Expected(expected) => conforms(expected, declared),
        RequirementValue::Min(bound) | RequirementValue::Max(bound) => conforms(bound, declared),
        RequirementValue::Range { min, max } => conforms(min, declared) && conforms(max, declared),
    }
}

/// Reason a coefficient value cannot be attached to a requirement.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoefficientMismatch {
    #[error("coefficient value of type {found} does not fit requirement datatype {expected}")]
    DataType { expected: DataType, found: DataType },
    #[error("coefficient value {found} differs from the expected value {expected}")]
    NotExpected { expected: String, found: String },
    #[error("coefficient value {found} is outside the requirement {bound}")]
    OutOfBound { bound: String, found: Decimal },
}

/// Check a coefficient value against the requirement it scores.
pub fn check_coefficient(
    requirement: &Requirement,
    value: &CoefficientValue,
) -> Result<(), CoefficientMismatch> {
    let mismatch = || CoefficientMismatch::DataType {
        expected: requirement.data_type,
        found: value.data_type(),
    };

    match requirement.data_type {
        DataType::Boolean => {
            let CoefficientValue::Boolean(flag) = value else {
                return Err(mismatch());
            };
            match &requirement.value {
                RequirementValue::Expected(ExpectedValue::Boolean(expected)) if expected != flag => {
                    Err(CoefficientMismatch::NotExpected {
                        expected: expected.to_string(),
                        found: flag.to_string(),
                    })
                }
                _ => Ok(()),
            }
        }
        DataType::String => match value {
            CoefficientValue::String(_) => Ok(()),
            CoefficientValue::Boolean(_)
            | CoefficientValue::Integer(_)
            | CoefficientValue::Number(_) => Err(mismatch()),
        },
        DataType::Integer | DataType::Number => {
            let found = value.as_decimal().ok_or_else(mismatch)?;
            check_numeric_bound(&requirement.value, found)
        }
    }
}

fn check_numeric_bound(value: &RequirementValue, found: Decimal) -> Result<(), CoefficientMismatch> {
    let within = match value {
        RequirementValue::NoValue => return Ok(()),
        RequirementValue::Expected(expected) => {
            return match expected.as_decimal() {
                Some(target) if target == found => Ok(()),
                _ => Err(CoefficientMismatch::NotExpected {
                    expected: describe_expected(expected),
                    found: found.normalize().to_string(),
                }),
            };
        }
        RequirementValue::Min(min) => found >= min.as_decimal(),
        RequirementValue::Max(max) => found <= max.as_decimal(),
        RequirementValue::Range { min, max } => {
            found >= min.as_decimal() && found <= max.as_decimal()
        }
    };

    if within {
        Ok(())
    } else {
        Err(CoefficientMismatch::OutOfBound {
            bound: describe_bound(value),
            found: found.normalize(),
        })
    }
}

fn describe_expected(expected: &ExpectedValue) -> String {
    match expected {
        ExpectedValue::Boolean(flag) => flag.to_string(),
        ExpectedValue::String(text) => format!("'{text}'"),
        ExpectedValue::Integer(integer) => integer.to_string(),
        ExpectedValue::Number(number) => number.normalize().to_string(),
    }
}

fn describe_bound(value: &RequirementValue) -> String {
    match value {
        RequirementValue::Min(min) => format!("min value {}", min.as_decimal().normalize()),
        RequirementValue::Max(max) => format!("max value {}", max.as_decimal().normalize()),
        RequirementValue::Range { min, max } => format!(
            "range [{}, {}]",
            min.as_decimal().normalize(),
            max.as_decimal().normalize()
        ),
        RequirementValue::NoValue | RequirementValue::Expected(_) => value.variant_label().to_string(),
    }
}

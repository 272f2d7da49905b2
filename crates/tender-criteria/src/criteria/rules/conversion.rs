use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;

use super::RuleContext;
use crate::criteria::compatibility::check_coefficient;
use crate::criteria::domain::{CoefficientValue, ConversionRelatesTo, DataType};
use crate::criteria::error::ValidationError;

/// Every conversion targets an existing requirement, and no requirement twice.
pub(super) fn requirement_relation(ctx: &RuleContext<'_>) -> Result<(), ValidationError> {
    let requirements = ctx.requirements_by_id();
    let mut claimed: HashMap<&str, &str> = HashMap::new();

    for conversion in ctx.tender.conversions() {
        match conversion.relates_to {
            ConversionRelatesTo::Requirement => {}
        }

        let target = conversion.related_item.as_str();
        if !requirements.contains_key(target) {
            return Err(ValidationError::InvalidConversion(format!(
                "conversion '{}' relates to unknown requirement '{}'",
                conversion.id, target
            )));
        }
        if let Some(previous) = claimed.insert(target, conversion.id.as_str()) {
            return Err(ValidationError::InvalidConversion(format!(
                "conversions '{}' and '{}' both relate to requirement '{}'",
                previous, conversion.id, target
            )));
        }
    }
    Ok(())
}

pub(super) fn rate_bounds(ctx: &RuleContext<'_>) -> Result<(), ValidationError> {
    let policy = ctx.policy;
    for conversion in ctx.tender.conversions() {
        if let Some(coefficient) = conversion
            .coefficients
            .iter()
            .find(|coefficient| !policy.rate_in_bounds(coefficient.coefficient))
        {
            return Err(ValidationError::InvalidConversion(format!(
                "coefficient '{}' of conversion '{}' has rate {}, allowed range is [{}, {}]",
                coefficient.id,
                conversion.id,
                coefficient.coefficient.normalize(),
                policy.min_rate().normalize(),
                policy.max_rate().normalize()
            )));
        }
    }
    Ok(())
}

#[derive(Debug, PartialEq, Eq, Hash)]
enum ValueKey {
    Boolean(bool),
    Numeric(Decimal),
}

/// Non-string values must differ within a conversion; `1` and `1.0` collide.
pub(super) fn value_uniqueness(ctx: &RuleContext<'_>) -> Result<(), ValidationError> {
    for conversion in ctx.tender.conversions() {
        let mut seen = HashSet::new();
        for coefficient in &conversion.coefficients {
            let key = match &coefficient.value {
                CoefficientValue::Boolean(flag) => ValueKey::Boolean(*flag),
                CoefficientValue::Integer(integer) => ValueKey::Numeric(Decimal::from(*integer)),
                CoefficientValue::Number(number) => ValueKey::Numeric(number.normalize()),
                CoefficientValue::String(_) => continue,
            };

            if !seen.insert(key) {
                return Err(ValidationError::InvalidConversion(format!(
                    "conversion '{}' repeats the value of coefficient '{}'",
                    conversion.id, coefficient.id
                )));
            }
        }
    }
    Ok(())
}

pub(super) fn datatype_and_value_compatibility(
    ctx: &RuleContext<'_>,
) -> Result<(), ValidationError> {
    let requirements = ctx.requirements_by_id();

    for conversion in ctx.tender.conversions() {
        let Some(requirement) = requirements.get(conversion.related_item.as_str()) else {
            continue;
        };

        for coefficient in &conversion.coefficients {
            check_coefficient(requirement, &coefficient.value).map_err(|mismatch| {
                ValidationError::InvalidConversion(format!(
                    "coefficient '{}' of conversion '{}' for requirement '{}': {}",
                    coefficient.id, conversion.id, requirement.id, mismatch
                ))
            })?;
        }
    }
    Ok(())
}

pub(super) fn related_option_required(ctx: &RuleContext<'_>) -> Result<(), ValidationError> {
    let requirements = ctx.requirements_by_id();

    for conversion in ctx.tender.conversions() {
        let is_string = requirements
            .get(conversion.related_item.as_str())
            .is_some_and(|requirement| requirement.data_type == DataType::String);
        if !is_string {
            continue;
        }

        if let Some(coefficient) = conversion
            .coefficients
            .iter()
            .find(|coefficient| coefficient.related_option.is_none())
        {
            return Err(ValidationError::InvalidCoefficient(format!(
                "coefficient '{}' of conversion '{}' targets string requirement '{}' and needs relatedOption",
                coefficient.id, conversion.id, conversion.related_item
            )));
        }
    }
    Ok(())
}

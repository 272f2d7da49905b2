use chrono::Datelike;

use super::{first_duplicate, RuleContext};
use crate::criteria::compatibility::requirement_value_conforms;
use crate::criteria::domain::{CriteriaRelatesTo, RequirementValue};
use crate::criteria::error::ValidationError;

pub(super) fn related_item_exists(ctx: &RuleContext<'_>) -> Result<(), ValidationError> {
    let tender = ctx.tender;
    for criteria in tender.criteria() {
        let (Some(scope), Some(related)) = (criteria.relates_to, criteria.related_item.as_deref())
        else {
            continue;
        };

        let known = match scope {
            CriteriaRelatesTo::Item => tender.items().iter().any(|item| item.id == related),
            CriteriaRelatesTo::Lot => tender.lots().iter().any(|lot| lot.id == related),
            CriteriaRelatesTo::Tenderer => continue,
        };

        if !known {
            return Err(ValidationError::InvalidCriteria(format!(
                "criteria '{}' relates to unknown {} '{}'",
                criteria.id,
                scope.label(),
                related
            )));
        }
    }
    Ok(())
}

pub(super) fn relation_consistency(ctx: &RuleContext<'_>) -> Result<(), ValidationError> {
    for criteria in ctx.tender.criteria() {
        let problem = match (criteria.relates_to, &criteria.related_item) {
            (None, Some(_)) => Some("declares relatedItem without relatesTo"),
            (Some(CriteriaRelatesTo::Tenderer), Some(_)) => {
                Some("relates to tenderer and must not declare relatedItem")
            }
            (Some(CriteriaRelatesTo::Lot | CriteriaRelatesTo::Item), None) => {
                Some("relates to a lot or item but declares no relatedItem")
            }
            (None, None)
            | (Some(CriteriaRelatesTo::Tenderer), None)
            | (Some(CriteriaRelatesTo::Lot | CriteriaRelatesTo::Item), Some(_)) => None,
        };

        if let Some(problem) = problem {
            return Err(ValidationError::InvalidCriteria(format!(
                "criteria '{}' {}",
                criteria.id, problem
            )));
        }
    }
    Ok(())
}

pub(super) fn datatype_compliance(ctx: &RuleContext<'_>) -> Result<(), ValidationError> {
    match ctx
        .tender
        .requirements()
        .find(|requirement| !requirement_value_conforms(&requirement.value, requirement.data_type))
    {
        Some(requirement) => Err(ValidationError::InvalidCriteria(format!(
            "requirement '{}' declares datatype {} but its {} does not match",
            requirement.id,
            requirement.data_type,
            requirement.value.variant_label()
        ))),
        None => Ok(()),
    }
}

pub(super) fn min_max_ordering(ctx: &RuleContext<'_>) -> Result<(), ValidationError> {
    for requirement in ctx.tender.requirements() {
        if let RequirementValue::Range { min, max } = requirement.value {
            let (min, max) = (min.as_decimal(), max.as_decimal());
            if min >= max {
                return Err(ValidationError::InvalidRequirementValue(format!(
                    "requirement '{}' min value {} must be lower than max value {}",
                    requirement.id,
                    min.normalize(),
                    max.normalize()
                )));
            }
        }
    }
    Ok(())
}

pub(super) fn period_sanity(ctx: &RuleContext<'_>) -> Result<(), ValidationError> {
    let current_year = ctx.now.year();
    for requirement in ctx.tender.requirements() {
        let Some(period) = requirement.period else {
            continue;
        };

        if period.start_date.year() > current_year || period.end_date.year() > current_year {
            return Err(ValidationError::InvalidPeriodValue(format!(
                "requirement '{}' period ({} - {}) reaches past the current year {}",
                requirement.id, period.start_date, period.end_date, current_year
            )));
        }
        if period.start_date >= period.end_date {
            return Err(ValidationError::InvalidPeriodValue(format!(
                "requirement '{}' period start {} must precede end {}",
                requirement.id, period.start_date, period.end_date
            )));
        }
    }
    Ok(())
}

/// Ids are unique across the whole tree, not only within their parent list.
pub(super) fn ids_unique_and_non_empty(ctx: &RuleContext<'_>) -> Result<(), ValidationError> {
    let criteria = ctx.tender.criteria();

    if let Some(id) = first_duplicate(criteria.iter().map(|criteria| criteria.id.as_str())) {
        return Err(ValidationError::InvalidCriteria(format!(
            "criteria id '{id}' is used more than once"
        )));
    }

    let groups = criteria
        .iter()
        .flat_map(|criteria| criteria.requirement_groups.iter());
    if let Some(id) = first_duplicate(groups.map(|group| group.id.as_str())) {
        return Err(ValidationError::InvalidCriteria(format!(
            "requirement group id '{id}' is used more than once"
        )));
    }

    if let Some(id) = first_duplicate(
        ctx.tender
            .requirements()
            .map(|requirement| requirement.id.as_str()),
    ) {
        return Err(ValidationError::InvalidCriteria(format!(
            "requirement id '{id}' is used more than once"
        )));
    }

    for criteria in criteria {
        if criteria.requirement_groups.is_empty() {
            return Err(ValidationError::InvalidCriteria(format!(
                "criteria '{}' has no requirement groups",
                criteria.id
            )));
        }
        if let Some(group) = criteria
            .requirement_groups
            .iter()
            .find(|group| group.requirements.is_empty())
        {
            return Err(ValidationError::InvalidCriteria(format!(
                "requirement group '{}' of criteria '{}' has no requirements",
                group.id, criteria.id
            )));
        }
    }
    Ok(())
}

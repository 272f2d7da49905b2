use super::{first_duplicate, RuleContext};
use crate::criteria::error::ValidationError;

fn check_list<'a, T: 'a>(
    label: &str,
    owner: Option<&str>,
    list: &'a [T],
    id: impl Fn(&'a T) -> &'a str,
) -> Result<(), ValidationError> {
    let location = match owner {
        Some(owner) => format!("{label} of '{owner}'"),
        None => label.to_string(),
    };

    if list.is_empty() {
        return Err(ValidationError::EmptyList(format!("{location} must not be empty")));
    }
    if let Some(duplicate) = first_duplicate(list.iter().map(id)) {
        return Err(ValidationError::NotUniqueIds(format!(
            "{location} repeats id '{duplicate}'"
        )));
    }
    Ok(())
}

/// Lists that are present must be non-empty and unique by id.
pub(super) fn arrays_non_empty_and_unique(ctx: &RuleContext<'_>) -> Result<(), ValidationError> {
    let tender = ctx.tender;

    if let Some(lots) = &tender.lots {
        check_list("lots", None, lots, |lot| lot.id.as_str())?;
    }
    if let Some(items) = &tender.items {
        check_list("items", None, items, |item| item.id.as_str())?;
    }

    if let Some(criteria) = &tender.criteria {
        check_list("criteria", None, criteria, |criteria| criteria.id.as_str())?;
        for criteria in criteria {
            check_list(
                "requirementGroups",
                Some(criteria.id.as_str()),
                &criteria.requirement_groups,
                |group| group.id.as_str(),
            )?;
            for group in &criteria.requirement_groups {
                check_list(
                    "requirements",
                    Some(group.id.as_str()),
                    &group.requirements,
                    |requirement| requirement.id.as_str(),
                )?;
            }
        }
    }

    if let Some(conversions) = &tender.conversions {
        check_list("conversions", None, conversions, |conversion| {
            conversion.id.as_str()
        })?;
        for conversion in conversions {
            check_list(
                "coefficients",
                Some(conversion.id.as_str()),
                &conversion.coefficients,
                |coefficient| coefficient.id.as_str(),
            )?;
        }
    }
    Ok(())
}

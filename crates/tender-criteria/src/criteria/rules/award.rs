use super::RuleContext;
use crate::criteria::domain::{AwardCriteria, AwardCriteriaDetails, CriteriaRelatesTo};
use crate::criteria::error::ValidationError;

pub(super) fn conversions_require_criteria(ctx: &RuleContext<'_>) -> Result<(), ValidationError> {
    if ctx.tender.conversions.is_some() && ctx.tender.criteria.is_none() {
        return Err(ValidationError::InvalidConversion(
            "conversions are present but the tender declares no criteria".to_string(),
        ));
    }
    Ok(())
}

pub(super) fn award_criteria_details_required(
    ctx: &RuleContext<'_>,
) -> Result<(), ValidationError> {
    let award = ctx.tender.award_criteria;
    let needs_details = match award {
        AwardCriteria::CostOnly | AwardCriteria::QualityOnly | AwardCriteria::RatedCriteria => {
            true
        }
        AwardCriteria::PriceOnly => false,
    };

    if needs_details && ctx.tender.award_criteria_details.is_none() {
        return Err(ValidationError::InvalidAwardCriteria(format!(
            "award criteria '{}' requires awardCriteriaDetails",
            award.label()
        )));
    }
    Ok(())
}

pub(super) fn automated_award_needs_criteria(
    ctx: &RuleContext<'_>,
) -> Result<(), ValidationError> {
    let tender = ctx.tender;
    if tender.award_criteria.is_price_only()
        || tender.award_criteria_details != Some(AwardCriteriaDetails::Automated)
    {
        return Ok(());
    }

    if tender.criteria.is_none() || tender.conversions.is_none() {
        return Err(ValidationError::InvalidAwardCriteria(format!(
            "award criteria '{}' with automated details requires both criteria and conversions",
            tender.award_criteria.label()
        )));
    }
    Ok(())
}

/// Price-only tenders cannot score non-price criteria.
pub(super) fn award_criteria_compatibility(ctx: &RuleContext<'_>) -> Result<(), ValidationError> {
    let tender = ctx.tender;
    if !tender.award_criteria.is_price_only() {
        return Ok(());
    }

    if let Some(conversion) = tender.conversions().first() {
        return Err(ValidationError::InvalidConversion(format!(
            "price-only award cannot carry conversions, found '{}'",
            conversion.id
        )));
    }

    if let Some(criteria) = tender
        .criteria()
        .iter()
        .find(|criteria| criteria.relates_to != Some(CriteriaRelatesTo::Tenderer))
    {
        let scope = criteria
            .relates_to
            .map(CriteriaRelatesTo::label)
            .unwrap_or("tender");
        return Err(ValidationError::InvalidCriteria(format!(
            "price-only award accepts tenderer criteria only, criteria '{}' relates to {}",
            criteria.id, scope
        )));
    }
    Ok(())
}

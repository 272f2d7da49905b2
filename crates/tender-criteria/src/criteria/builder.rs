//! Construction of the persisted criteria tree from a tender payload.

use std::collections::BTreeMap;

use super::domain::{
    AwardCriteria, AwardCriteriaDetails, Coefficient, Conversion, ConversionRelatesTo, Criteria,
    CriteriaRelatesTo, CriteriaSource, CriteriaTree, Requirement, RequirementGroup, TenderPayload,
};
use super::error::ValidationError;

/// Source of permanent ids for each kind of node in the tree.
pub trait IdGenerator {
    fn new_criteria_id(&self) -> String;
    fn new_requirement_group_id(&self) -> String;
    fn new_requirement_id(&self) -> String;
    fn new_conversion_id(&self) -> String;
    fn new_coefficient_id(&self) -> String;
}

/// Random UUID v4 ids for every node kind.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn new_criteria_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }

    fn new_requirement_group_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }

    fn new_requirement_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }

    fn new_conversion_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }

    fn new_coefficient_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Temporary requirement id to permanent id.
type RequirementIds = BTreeMap<String, String>;

/// Build the persisted tree, assigning permanent ids throughout.
///
/// No validation happens here beyond resolving conversion targets; run the
/// criteria checks first.
pub fn build_criteria<G>(tender: &TenderPayload, ids: &G) -> Result<CriteriaTree, ValidationError>
where
    G: IdGenerator + ?Sized,
{
    let (criteria, mapped): (Vec<Criteria>, Vec<RequirementIds>) = tender
        .criteria()
        .iter()
        .map(|criteria| build_one_criteria(criteria, ids))
        .unzip();
    let requirement_ids: RequirementIds = mapped.into_iter().flatten().collect();

    let conversions = tender
        .conversions()
        .iter()
        .map(|conversion| build_conversion(conversion, &requirement_ids, ids))
        .collect::<Result<Vec<_>, _>>()?;

    let award_criteria_details = match (tender.award_criteria, tender.award_criteria_details) {
        (_, Some(details)) => Some(details),
        (AwardCriteria::PriceOnly, None) => Some(AwardCriteriaDetails::Automated),
        (
            AwardCriteria::CostOnly | AwardCriteria::QualityOnly | AwardCriteria::RatedCriteria,
            None,
        ) => None,
    };

    Ok(CriteriaTree {
        award_criteria: tender.award_criteria,
        award_criteria_details,
        criteria,
        conversions,
    })
}

fn build_one_criteria<G>(criteria: &Criteria, ids: &G) -> (Criteria, RequirementIds)
where
    G: IdGenerator + ?Sized,
{
    let (requirement_groups, mapped): (Vec<RequirementGroup>, Vec<RequirementIds>) = criteria
        .requirement_groups
        .iter()
        .map(|group| build_group(group, ids))
        .unzip();

    let source = match criteria.relates_to {
        Some(CriteriaRelatesTo::Tenderer) => None,
        Some(CriteriaRelatesTo::Lot | CriteriaRelatesTo::Item) | None => {
            Some(CriteriaSource::Tenderer)
        }
    };

    let built = Criteria {
        id: ids.new_criteria_id(),
        title: criteria.title.clone(),
        description: criteria.description.clone(),
        relates_to: criteria.relates_to,
        related_item: criteria.related_item.clone(),
        source,
        requirement_groups,
    };
    (built, mapped.into_iter().flatten().collect())
}

fn build_group<G>(group: &RequirementGroup, ids: &G) -> (RequirementGroup, RequirementIds)
where
    G: IdGenerator + ?Sized,
{
    let (requirements, mapped): (Vec<Requirement>, RequirementIds) = group
        .requirements
        .iter()
        .map(|requirement| {
            let permanent = ids.new_requirement_id();
            let entry = (requirement.id.clone(), permanent.clone());
            let built = Requirement {
                id: permanent,
                ..requirement.clone()
            };
            (built, entry)
        })
        .unzip();

    let built = RequirementGroup {
        id: ids.new_requirement_group_id(),
        description: group.description.clone(),
        requirements,
    };
    (built, mapped)
}

fn build_conversion<G>(
    conversion: &Conversion,
    requirement_ids: &RequirementIds,
    ids: &G,
) -> Result<Conversion, ValidationError>
where
    G: IdGenerator + ?Sized,
{
    let related_item = match conversion.relates_to {
        ConversionRelatesTo::Requirement => requirement_ids
            .get(&conversion.related_item)
            .cloned()
            .ok_or_else(|| {
                ValidationError::InvalidConversion(format!(
                    "conversion '{}' relates to requirement '{}' which is not part of the criteria",
                    conversion.id, conversion.related_item
                ))
            })?,
    };

    let coefficients = conversion
        .coefficients
        .iter()
        .map(|coefficient| Coefficient {
            id: ids.new_coefficient_id(),
            ..coefficient.clone()
        })
        .collect();

    Ok(Conversion {
        id: ids.new_conversion_id(),
        relates_to: conversion.relates_to,
        related_item,
        rationale: conversion.rationale.clone(),
        description: conversion.description.clone(),
        coefficients,
    })
}

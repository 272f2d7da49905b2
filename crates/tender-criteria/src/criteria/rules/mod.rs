//! Fail-fast consistency checks over a tender's criteria and conversions.

mod award;
mod cast;
mod conversion;
mod requirement;
mod structure;

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use super::domain::{Requirement, TenderPayload};
use super::error::ValidationError;
use super::policy::ConversionPolicy;

/// Inputs shared by every stage of one check.
pub(crate) struct RuleContext<'a> {
    pub tender: &'a TenderPayload,
    pub policy: &'a ConversionPolicy,
    pub now: DateTime<Utc>,
}

impl<'a> RuleContext<'a> {
    /// Requirement lookup by id. Only meaningful once ids are known to be unique.
    pub fn requirements_by_id(&self) -> HashMap<&'a str, &'a Requirement> {
        self.tender
            .requirements()
            .map(|requirement| (requirement.id.as_str(), requirement))
            .collect()
    }
}

type Rule = fn(&RuleContext<'_>) -> Result<(), ValidationError>;

// Datatype compliance and coefficient compatibility must run before the cast
// aggregation, which reads coefficient rates without re-checking them.
const RULES: &[(&str, Rule)] = &[
    ("conversions_require_criteria", award::conversions_require_criteria),
    ("award_criteria_details_required", award::award_criteria_details_required),
    ("automated_award_needs_criteria", award::automated_award_needs_criteria),
    ("related_item_exists", requirement::related_item_exists),
    ("relation_consistency", requirement::relation_consistency),
    ("datatype_compliance", requirement::datatype_compliance),
    ("min_max_ordering", requirement::min_max_ordering),
    ("period_sanity", requirement::period_sanity),
    ("ids_unique_and_non_empty", requirement::ids_unique_and_non_empty),
    ("conversion_requirement_relation", conversion::requirement_relation),
    ("coefficient_rate_bounds", conversion::rate_bounds),
    ("coefficient_value_uniqueness", conversion::value_uniqueness),
    ("award_criteria_compatibility", award::award_criteria_compatibility),
    ("coefficient_compatibility", conversion::datatype_and_value_compatibility),
    ("coefficient_related_option", conversion::related_option_required),
    ("cast_coefficient_limit", cast::cast_coefficient_limit),
    ("arrays_non_empty_and_unique", structure::arrays_non_empty_and_unique),
];

/// Runs the rule chain with a given policy.
#[derive(Debug, Clone, Default)]
pub struct CriteriaChecker {
    policy: ConversionPolicy,
}

impl CriteriaChecker {
    pub fn with_policy(policy: ConversionPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ConversionPolicy {
        &self.policy
    }

    /// Apply every rule in order, returning the first violation.
    pub fn check(&self, tender: &TenderPayload, now: DateTime<Utc>) -> Result<(), ValidationError> {
        let context = RuleContext {
            tender,
            policy: &self.policy,
            now,
        };

        for (name, rule) in RULES {
            if let Err(error) = rule(&context) {
                warn!(rule = name, code = error.code(), %error, "criteria check failed");
                return Err(error);
            }
            debug!(rule = name, "criteria rule passed");
        }

        Ok(())
    }
}

/// Validate a tender's criteria and conversions against the default policy.
pub fn check_criteria(tender: &TenderPayload) -> Result<(), ValidationError> {
    check_criteria_at(tender, Utc::now())
}

/// Same as [`check_criteria`] with an explicit clock for period checks.
pub fn check_criteria_at(tender: &TenderPayload, now: DateTime<Utc>) -> Result<(), ValidationError> {
    CriteriaChecker::default().check(tender, now)
}

/// Report the first duplicate in `ids`, if any.
pub(crate) fn first_duplicate<'a, I>(ids: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = std::collections::HashSet::new();
    ids.into_iter().find(|id| !seen.insert(*id))
}

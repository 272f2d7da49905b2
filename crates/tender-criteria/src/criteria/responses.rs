//! Matching of bidder requirement responses against a persisted criteria tree.

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use super::compatibility::conforms;
use super::domain::{
    BidPayload, Criteria, CriteriaRelatesTo, CriteriaTree, Requirement, RequirementResponse,
};
use super::error::ValidationError;
use super::rules::first_duplicate;

struct MatchContext<'a> {
    bid: &'a BidPayload,
    requirements: HashMap<&'a str, &'a Requirement>,
    tree: &'a CriteriaTree,
    now: DateTime<Utc>,
}

type ResponseRule = fn(&MatchContext<'_>) -> Result<(), ValidationError>;

// Duplicates are reported before completeness so a repeated answer is not
// mistaken for a count mismatch.
const RESPONSE_RULES: &[(&str, ResponseRule)] = &[
    ("relation_relevance", relation_relevance),
    ("answered_once", answered_once),
    ("answer_completeness", answer_completeness),
    ("datatype_value", datatype_value),
    ("period_validity", period_validity),
    ("response_ids_unique", response_ids_unique),
];

/// Validate a bid's requirement responses against the stored criteria.
pub fn check_responses(bid: &BidPayload, tree: &CriteriaTree) -> Result<(), ValidationError> {
    check_responses_at(bid, tree, Utc::now())
}

/// Same as [`check_responses`] with an explicit clock for period checks.
pub fn check_responses_at(
    bid: &BidPayload,
    tree: &CriteriaTree,
    now: DateTime<Utc>,
) -> Result<(), ValidationError> {
    let context = MatchContext {
        bid,
        requirements: tree
            .requirements()
            .map(|requirement| (requirement.id.as_str(), requirement))
            .collect(),
        tree,
        now,
    };

    for (name, rule) in RESPONSE_RULES {
        if let Err(error) = rule(&context) {
            warn!(rule = name, code = error.code(), %error, "response check failed");
            return Err(error);
        }
        debug!(rule = name, "response rule passed");
    }
    Ok(())
}

fn responses<'a>(ctx: &MatchContext<'a>) -> std::slice::Iter<'a, RequirementResponse> {
    ctx.bid.requirement_responses.iter()
}

fn relation_relevance(ctx: &MatchContext<'_>) -> Result<(), ValidationError> {
    let unknown = responses(ctx)
        .find(|response| !ctx.requirements.contains_key(response.requirement.id.as_str()));
    match unknown {
        Some(response) => Err(ValidationError::InvalidRequirementValue(format!(
            "response '{}' answers unknown requirement '{}'",
            response.id, response.requirement.id
        ))),
        None => Ok(()),
    }
}

fn answered_once(ctx: &MatchContext<'_>) -> Result<(), ValidationError> {
    match first_duplicate(responses(ctx).map(|response| response.requirement.id.as_str())) {
        Some(requirement) => Err(ValidationError::InvalidRequirementValue(format!(
            "requirement '{requirement}' is answered more than once"
        ))),
        None => Ok(()),
    }
}

/// Requirements the bid has to answer: tender-wide and tenderer criteria plus
/// the criteria of the bid's lots and items.
fn applicable_requirements<'a>(tree: &'a CriteriaTree, bid: &BidPayload) -> BTreeSet<&'a str> {
    let applies = |criteria: &Criteria| {
        criteria.is_tender_level()
            || criteria.relates_to == Some(CriteriaRelatesTo::Tenderer)
            || bid.related_lots.iter().any(|lot| criteria.relates_to_lot(lot))
            || bid.related_items.iter().any(|item| criteria.relates_to_item(item))
    };

    tree.criteria
        .iter()
        .filter(|&criteria| applies(criteria))
        .flat_map(Criteria::requirements)
        .map(|requirement| requirement.id.as_str())
        .collect()
}

fn answer_completeness(ctx: &MatchContext<'_>) -> Result<(), ValidationError> {
    let expected = applicable_requirements(ctx.tree, ctx.bid);
    let answered: BTreeSet<&str> = responses(ctx)
        .map(|response| response.requirement.id.as_str())
        .collect();

    if expected == answered {
        return Ok(());
    }

    let missing: Vec<&str> = expected.difference(&answered).copied().collect();
    let extra: Vec<&str> = answered.difference(&expected).copied().collect();
    Err(ValidationError::InvalidRequirementValue(format!(
        "responses do not cover the applicable requirements (missing: [{}], not applicable: [{}])",
        missing.join(", "),
        extra.join(", ")
    )))
}

fn datatype_value(ctx: &MatchContext<'_>) -> Result<(), ValidationError> {
    for response in responses(ctx) {
        let Some(requirement) = ctx.requirements.get(response.requirement.id.as_str()) else {
            continue;
        };
        if !conforms(&response.value, requirement.data_type) {
            return Err(ValidationError::InvalidRequirementValue(format!(
                "response '{}' for requirement '{}' must be {}",
                response.id, requirement.id, requirement.data_type
            )));
        }
    }
    Ok(())
}

fn period_validity(ctx: &MatchContext<'_>) -> Result<(), ValidationError> {
    for response in responses(ctx) {
        let Some(period) = response.period else {
            continue;
        };
        if period.end_date >= ctx.now {
            return Err(ValidationError::InvalidPeriodValue(format!(
                "response '{}' period end {} must be in the past",
                response.id, period.end_date
            )));
        }
        if period.start_date >= period.end_date {
            return Err(ValidationError::InvalidPeriodValue(format!(
                "response '{}' period start {} must precede end {}",
                response.id, period.start_date, period.end_date
            )));
        }
    }
    Ok(())
}

fn response_ids_unique(ctx: &MatchContext<'_>) -> Result<(), ValidationError> {
    match first_duplicate(responses(ctx).map(|response| response.id.as_str())) {
        Some(id) => Err(ValidationError::InvalidRequirementValue(format!(
            "requirement response id '{id}' is used more than once"
        ))),
        None => Ok(()),
    }
}

use std::collections::{BTreeSet, HashMap};

use rust_decimal::Decimal;
use tracing::debug;

use super::RuleContext;
use crate::criteria::domain::{Conversion, Criteria, CriteriaRelatesTo, TenderPayload};
use crate::criteria::error::ValidationError;

/// Caps the total price reduction non-price criteria can apply to each lot.
///
/// For every lot named by a lot-scoped criteria, requirements are gathered from
/// tender-level criteria, that lot's criteria and the criteria of items in the
/// lot. Each requirement with a conversion contributes `1 - lowest rate`.
pub(super) fn cast_coefficient_limit(ctx: &RuleContext<'_>) -> Result<(), ValidationError> {
    let tender = ctx.tender;
    let conversions: HashMap<&str, &Conversion> = tender
        .conversions()
        .iter()
        .map(|conversion| (conversion.related_item.as_str(), conversion))
        .collect();
    let ceiling = ctx.policy.cast_ceiling(tender.main_procurement_category);

    for lot_id in scoped_lots(tender) {
        let cast = lot_criteria(tender, lot_id)
            .flat_map(Criteria::requirements)
            .filter_map(|requirement| conversions.get(requirement.id.as_str()))
            .filter_map(|conversion| conversion.lowest_rate())
            .map(|rate| Decimal::ONE - rate)
            .sum::<Decimal>();

        debug!(lot = lot_id, %cast, %ceiling, "cast coefficient for lot");

        if cast > ceiling {
            return Err(ValidationError::InvalidConversion(format!(
                "cast coefficient {} for lot '{}' exceeds the {} limit {}",
                cast.normalize(),
                lot_id,
                tender.main_procurement_category.label(),
                ceiling.normalize()
            )));
        }
    }
    Ok(())
}

fn scoped_lots(tender: &TenderPayload) -> BTreeSet<&str> {
    tender
        .criteria()
        .iter()
        .filter(|criteria| criteria.relates_to == Some(CriteriaRelatesTo::Lot))
        .filter_map(|criteria| criteria.related_item.as_deref())
        .collect()
}

/// Tender-level, lot-level and item-level criteria that weigh on `lot_id`.
fn lot_criteria<'a>(
    tender: &'a TenderPayload,
    lot_id: &'a str,
) -> impl Iterator<Item = &'a Criteria> + 'a {
    let items_in_lot: Vec<&str> = tender
        .items()
        .iter()
        .filter(|item| item.related_lot == lot_id)
        .map(|item| item.id.as_str())
        .collect();

    tender.criteria().iter().filter(move |criteria| {
        criteria.is_tender_level()
            || criteria.relates_to_lot(lot_id)
            || items_in_lot.iter().any(|item| criteria.relates_to_item(item))
    })
}

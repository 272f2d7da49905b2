use std::collections::HashMap;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde_json::Value;

use crate::criteria::builder::IdGenerator;
use crate::criteria::domain::{
    AwardCriteria, AwardCriteriaDetails, BidPayload, Coefficient, CoefficientValue, Conversion,
    ConversionRelatesTo, Criteria, CriteriaRelatesTo, CriteriaTree, DataType, ExpectedValue, Item,
    Lot, NumericValue, Period, ProcurementCategory, Requirement, RequirementGroup,
    RequirementReference, RequirementResponse, RequirementValue, ResponseValue, TenderPayload,
};
use crate::criteria::repository::{CriteriaRepository, ProcessId, RepositoryError};
use crate::criteria::service::CriteriaService;

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn rate(raw: &str) -> Decimal {
    Decimal::from_str(raw).expect("valid decimal")
}

pub(super) fn requirement(id: &str, data_type: DataType, value: RequirementValue) -> Requirement {
    Requirement {
        id: id.to_string(),
        title: format!("Requirement {id}"),
        description: None,
        data_type,
        value,
        period: None,
    }
}

pub(super) fn criteria(
    id: &str,
    relates_to: Option<CriteriaRelatesTo>,
    related_item: Option<&str>,
    group_id: &str,
    requirements: Vec<Requirement>,
) -> Criteria {
    Criteria {
        id: id.to_string(),
        title: format!("Criteria {id}"),
        description: None,
        relates_to,
        related_item: related_item.map(str::to_string),
        source: None,
        requirement_groups: vec![RequirementGroup {
            id: group_id.to_string(),
            description: None,
            requirements,
        }],
    }
}

pub(super) fn coefficient(id: &str, value: CoefficientValue, rate_raw: &str) -> Coefficient {
    Coefficient {
        id: id.to_string(),
        value,
        coefficient: rate(rate_raw),
        related_option: None,
    }
}

pub(super) fn option_coefficient(id: &str, value: &str, rate_raw: &str, option: &str) -> Coefficient {
    Coefficient {
        related_option: Some(option.to_string()),
        ..coefficient(id, CoefficientValue::String(value.to_string()), rate_raw)
    }
}

pub(super) fn conversion(id: &str, requirement_id: &str, coefficients: Vec<Coefficient>) -> Conversion {
    Conversion {
        id: id.to_string(),
        relates_to: ConversionRelatesTo::Requirement,
        related_item: requirement_id.to_string(),
        rationale: format!("Scoring for {requirement_id}"),
        description: None,
        coefficients,
    }
}

/// Goods tender with one lot and one item; the cast coefficient of `lot-1` is 0.45.
pub(super) fn tender() -> TenderPayload {
    TenderPayload {
        award_criteria: AwardCriteria::RatedCriteria,
        award_criteria_details: Some(AwardCriteriaDetails::Automated),
        main_procurement_category: ProcurementCategory::Goods,
        lots: Some(vec![Lot {
            id: "lot-1".to_string(),
        }]),
        items: Some(vec![Item {
            id: "item-1".to_string(),
            related_lot: "lot-1".to_string(),
        }]),
        criteria: Some(vec![
            criteria(
                "crit-tender",
                None,
                None,
                "rg-tender",
                vec![requirement(
                    "req-warranty",
                    DataType::Integer,
                    RequirementValue::Range {
                        min: NumericValue::Integer(1),
                        max: NumericValue::Integer(5),
                    },
                )],
            ),
            criteria(
                "crit-lot",
                Some(CriteriaRelatesTo::Lot),
                Some("lot-1"),
                "rg-lot",
                vec![requirement(
                    "req-iso",
                    DataType::Boolean,
                    RequirementValue::Expected(ExpectedValue::Boolean(true)),
                )],
            ),
            criteria(
                "crit-item",
                Some(CriteriaRelatesTo::Item),
                Some("item-1"),
                "rg-item",
                vec![requirement("req-finish", DataType::String, RequirementValue::NoValue)],
            ),
            criteria(
                "crit-tenderer",
                Some(CriteriaRelatesTo::Tenderer),
                None,
                "rg-tenderer",
                vec![requirement(
                    "req-experience",
                    DataType::Number,
                    RequirementValue::Min(NumericValue::Number(rate("2.5"))),
                )],
            ),
        ]),
        conversions: Some(vec![
            conversion(
                "conv-warranty",
                "req-warranty",
                vec![
                    coefficient("coef-w1", CoefficientValue::Integer(1), "0.95"),
                    coefficient("coef-w5", CoefficientValue::Integer(5), "0.85"),
                ],
            ),
            conversion(
                "conv-iso",
                "req-iso",
                vec![coefficient("coef-iso", CoefficientValue::Boolean(true), "0.90")],
            ),
            conversion(
                "conv-finish",
                "req-finish",
                vec![
                    option_coefficient("coef-matte", "matte", "0.95", "opt-matte"),
                    option_coefficient("coef-gloss", "gloss", "0.80", "opt-gloss"),
                ],
            ),
        ]),
    }
}

pub(super) fn criteria_mut<'a>(tender: &'a mut TenderPayload, id: &str) -> &'a mut Criteria {
    tender
        .criteria
        .as_mut()
        .and_then(|criteria| criteria.iter_mut().find(|criteria| criteria.id == id))
        .expect("criteria fixture exists")
}

pub(super) fn requirement_mut<'a>(tender: &'a mut TenderPayload, id: &str) -> &'a mut Requirement {
    tender
        .criteria
        .as_mut()
        .into_iter()
        .flatten()
        .flat_map(|criteria| criteria.requirement_groups.iter_mut())
        .flat_map(|group| group.requirements.iter_mut())
        .find(|requirement| requirement.id == id)
        .expect("requirement fixture exists")
}

pub(super) fn conversion_mut<'a>(tender: &'a mut TenderPayload, id: &str) -> &'a mut Conversion {
    tender
        .conversions
        .as_mut()
        .and_then(|conversions| conversions.iter_mut().find(|conversion| conversion.id == id))
        .expect("conversion fixture exists")
}

/// Stored tree mirroring [`tender`] with its original ids.
pub(super) fn tree() -> CriteriaTree {
    let tender = tender();
    CriteriaTree {
        award_criteria: tender.award_criteria,
        award_criteria_details: tender.award_criteria_details,
        criteria: tender.criteria.unwrap_or_default(),
        conversions: tender.conversions.unwrap_or_default(),
    }
}

pub(super) fn response(id: &str, requirement_id: &str, value: ResponseValue) -> RequirementResponse {
    RequirementResponse {
        id: id.to_string(),
        requirement: RequirementReference {
            id: requirement_id.to_string(),
        },
        related_candidate: None,
        value,
        period: None,
        evidences: Vec::new(),
    }
}

/// Bid on `lot-1`/`item-1` answering every applicable requirement of [`tree`].
pub(super) fn bid() -> BidPayload {
    let mut experience = response("rr-experience", "req-experience", ResponseValue::Number(rate("3.5")));
    experience.period = Some(Period {
        start_date: at(2020, 1, 1),
        end_date: at(2023, 12, 31),
    });

    BidPayload {
        related_lots: vec!["lot-1".to_string()],
        related_items: vec!["item-1".to_string()],
        requirement_responses: vec![
            response("rr-warranty", "req-warranty", ResponseValue::Integer(3)),
            response("rr-iso", "req-iso", ResponseValue::Boolean(true)),
            response("rr-finish", "req-finish", ResponseValue::String("matte".to_string())),
            experience,
        ],
    }
}

/// Deterministic ids: `<kind>-<n>` with an independent counter per kind.
#[derive(Default)]
pub(super) struct SequenceIds {
    criteria: AtomicU32,
    groups: AtomicU32,
    requirements: AtomicU32,
    conversions: AtomicU32,
    coefficients: AtomicU32,
}

fn next(counter: &AtomicU32, kind: &str) -> String {
    format!("{kind}-{}", counter.fetch_add(1, Ordering::Relaxed) + 1)
}

impl IdGenerator for SequenceIds {
    fn new_criteria_id(&self) -> String {
        next(&self.criteria, "criteria")
    }

    fn new_requirement_group_id(&self) -> String {
        next(&self.groups, "group")
    }

    fn new_requirement_id(&self) -> String {
        next(&self.requirements, "requirement")
    }

    fn new_conversion_id(&self) -> String {
        next(&self.conversions, "conversion")
    }

    fn new_coefficient_id(&self) -> String {
        next(&self.coefficients, "coefficient")
    }
}

#[derive(Default)]
pub(super) struct MemoryRepository {
    trees: Mutex<HashMap<ProcessId, CriteriaTree>>,
}

impl CriteriaRepository for MemoryRepository {
    fn insert(&self, process_id: &ProcessId, tree: CriteriaTree) -> Result<(), RepositoryError> {
        let mut guard = self.trees.lock().expect("repository mutex poisoned");
        if guard.contains_key(process_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(process_id.clone(), tree);
        Ok(())
    }

    fn fetch(&self, process_id: &ProcessId) -> Result<Option<CriteriaTree>, RepositoryError> {
        let guard = self.trees.lock().expect("repository mutex poisoned");
        Ok(guard.get(process_id).cloned())
    }
}

pub(super) struct UnavailableRepository;

impl CriteriaRepository for UnavailableRepository {
    fn insert(&self, _process_id: &ProcessId, _tree: CriteriaTree) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("cassandra offline".to_string()))
    }

    fn fetch(&self, _process_id: &ProcessId) -> Result<Option<CriteriaTree>, RepositoryError> {
        Err(RepositoryError::Unavailable("cassandra offline".to_string()))
    }
}

pub(super) fn build_service() -> Arc<CriteriaService<MemoryRepository, SequenceIds>> {
    Arc::new(CriteriaService::new(
        Arc::new(MemoryRepository::default()),
        Arc::new(SequenceIds::default()),
    ))
}

pub(super) fn process_id() -> ProcessId {
    ProcessId("ocds-b3wdp1-MD-1580458690892".to_string())
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

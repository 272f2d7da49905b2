use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// Award method declared on the tender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AwardCriteria {
    PriceOnly,
    CostOnly,
    QualityOnly,
    RatedCriteria,
}

impl AwardCriteria {
    pub const fn label(self) -> &'static str {
        match self {
            AwardCriteria::PriceOnly => "priceOnly",
            AwardCriteria::CostOnly => "costOnly",
            AwardCriteria::QualityOnly => "qualityOnly",
            AwardCriteria::RatedCriteria => "ratedCriteria",
        }
    }

    pub const fn is_price_only(self) -> bool {
        matches!(self, AwardCriteria::PriceOnly)
    }
}

/// How the award method is applied once bids are open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AwardCriteriaDetails {
    Automated,
    Manual,
}

impl AwardCriteriaDetails {
    pub const fn label(self) -> &'static str {
        match self {
            AwardCriteriaDetails::Automated => "automated",
            AwardCriteriaDetails::Manual => "manual",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProcurementCategory {
    Goods,
    Works,
    Services,
}

impl ProcurementCategory {
    pub const fn label(self) -> &'static str {
        match self {
            ProcurementCategory::Goods => "goods",
            ProcurementCategory::Works => "works",
            ProcurementCategory::Services => "services",
        }
    }
}

/// Scope a criteria applies to. An absent scope means the whole tender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CriteriaRelatesTo {
    Tenderer,
    Lot,
    Item,
}

impl CriteriaRelatesTo {
    pub const fn label(self) -> &'static str {
        match self {
            CriteriaRelatesTo::Tenderer => "tenderer",
            CriteriaRelatesTo::Lot => "lot",
            CriteriaRelatesTo::Item => "item",
        }
    }
}

/// Party expected to answer a criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CriteriaSource {
    Tenderer,
    Buyer,
    ProcuringEntity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConversionRelatesTo {
    Requirement,
}

/// Datatype a requirement declares for its answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DataType {
    Boolean,
    String,
    Integer,
    Number,
}

impl DataType {
    pub const fn label(self) -> &'static str {
        match self {
            DataType::Boolean => "boolean",
            DataType::String => "string",
            DataType::Integer => "integer",
            DataType::Number => "number",
        }
    }

    pub const fn is_numeric(self) -> bool {
        matches!(self, DataType::Integer | DataType::Number)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Anything carrying a value whose shape implies a [`DataType`].
pub trait Typed {
    fn data_type(&self) -> DataType;
}

/// Raised when a JSON value cannot be read into one of the value variants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ValueShapeError(pub String);

fn decimal_from_json(number: &Number) -> Result<Decimal, ValueShapeError> {
    let raw = number.to_string();
    Decimal::from_str(&raw)
        .or_else(|_| Decimal::from_scientific(&raw))
        .map_err(|_| ValueShapeError(format!("number {raw} is out of decimal range")))
}

/// Integer literals keep the integer datatype, so they must fit an `i64`.
fn integer_out_of_range(number: &Number) -> ValueShapeError {
    ValueShapeError(format!("integer {number} is out of range"))
}

fn decimal_to_json(value: Decimal) -> Value {
    value
        .to_f64()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

// Integer literals are kept apart from fractional ones so `5` reads as an
// integer and `5.0` as a number.
macro_rules! scalar_value {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(try_from = "Value", into = "Value")]
        pub enum $name {
            Boolean(bool),
            String(String),
            Integer(i64),
            Number(Decimal),
        }

        impl $name {
            /// Numeric view for bound comparisons; `None` for booleans and strings.
            pub fn as_decimal(&self) -> Option<Decimal> {
                match self {
                    $name::Integer(value) => Some(Decimal::from(*value)),
                    $name::Number(value) => Some(*value),
                    $name::Boolean(_) | $name::String(_) => None,
                }
            }
        }

        impl Typed for $name {
            fn data_type(&self) -> DataType {
                match self {
                    $name::Boolean(_) => DataType::Boolean,
                    $name::String(_) => DataType::String,
                    $name::Integer(_) => DataType::Integer,
                    $name::Number(_) => DataType::Number,
                }
            }
        }

        impl TryFrom<Value> for $name {
            type Error = ValueShapeError;

            fn try_from(value: Value) -> Result<Self, Self::Error> {
                match value {
                    Value::Bool(flag) => Ok($name::Boolean(flag)),
                    Value::String(text) => Ok($name::String(text)),
                    Value::Number(number) => match number.as_i64() {
                        Some(integer) => Ok($name::Integer(integer)),
                        None if number.is_u64() => Err(integer_out_of_range(&number)),
                        None => decimal_from_json(&number).map($name::Number),
                    },
                    other => Err(ValueShapeError(format!(
                        "expected boolean, string or number, found {other}"
                    ))),
                }
            }
        }

        impl From<$name> for Value {
            fn from(value: $name) -> Self {
                match value {
                    $name::Boolean(flag) => Value::Bool(flag),
                    $name::String(text) => Value::String(text),
                    $name::Integer(integer) => Value::from(integer),
                    $name::Number(number) => decimal_to_json(number),
                }
            }
        }
    };
}

scalar_value!(
    /// Exact value a requirement expects.
    ExpectedValue
);

scalar_value!(
    /// Value that triggers a coefficient.
    CoefficientValue
);

scalar_value!(
    /// Value a bidder submits for a requirement.
    ResponseValue
);

/// Numeric bound used by min/max/range requirements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub enum NumericValue {
    Integer(i64),
    Number(Decimal),
}

impl NumericValue {
    pub fn as_decimal(self) -> Decimal {
        match self {
            NumericValue::Integer(value) => Decimal::from(value),
            NumericValue::Number(value) => value,
        }
    }
}

impl Typed for NumericValue {
    fn data_type(&self) -> DataType {
        match self {
            NumericValue::Integer(_) => DataType::Integer,
            NumericValue::Number(_) => DataType::Number,
        }
    }
}

impl TryFrom<Value> for NumericValue {
    type Error = ValueShapeError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Number(number) => match number.as_i64() {
                Some(integer) => Ok(NumericValue::Integer(integer)),
                None if number.is_u64() => Err(integer_out_of_range(&number)),
                None => decimal_from_json(&number).map(NumericValue::Number),
            },
            other => Err(ValueShapeError(format!(
                "expected a numeric bound, found {other}"
            ))),
        }
    }
}

impl From<NumericValue> for Value {
    fn from(value: NumericValue) -> Self {
        match value {
            NumericValue::Integer(integer) => Value::from(integer),
            NumericValue::Number(number) => decimal_to_json(number),
        }
    }
}

/// Constraint a requirement places on acceptable answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequirementValue {
    NoValue,
    Expected(ExpectedValue),
    Min(NumericValue),
    Max(NumericValue),
    Range { min: NumericValue, max: NumericValue },
}

impl RequirementValue {
    pub fn variant_label(&self) -> &'static str {
        match self {
            RequirementValue::NoValue => "no value",
            RequirementValue::Expected(_) => "expected value",
            RequirementValue::Min(_) => "min value",
            RequirementValue::Max(_) => "max value",
            RequirementValue::Range { .. } => "range",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Period {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

/// A single answerable condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RequirementWire", into = "RequirementWire")]
pub struct Requirement {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub data_type: DataType,
    pub value: RequirementValue,
    pub period: Option<Period>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RequirementWire {
    id: String,
    title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    data_type: DataType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    expected_value: Option<ExpectedValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    min_value: Option<NumericValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_value: Option<NumericValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    period: Option<Period>,
}

impl TryFrom<RequirementWire> for Requirement {
    type Error = ValueShapeError;

    fn try_from(wire: RequirementWire) -> Result<Self, Self::Error> {
        let value = match (wire.expected_value, wire.min_value, wire.max_value) {
            (None, None, None) => RequirementValue::NoValue,
            (Some(expected), None, None) => RequirementValue::Expected(expected),
            (None, Some(min), None) => RequirementValue::Min(min),
            (None, None, Some(max)) => RequirementValue::Max(max),
            (None, Some(min), Some(max)) => RequirementValue::Range { min, max },
            (Some(_), _, _) => {
                return Err(ValueShapeError(format!(
                    "requirement '{}' combines expectedValue with minValue/maxValue",
                    wire.id
                )))
            }
        };

        Ok(Requirement {
            id: wire.id,
            title: wire.title,
            description: wire.description,
            data_type: wire.data_type,
            value,
            period: wire.period,
        })
    }
}

impl From<Requirement> for RequirementWire {
    fn from(requirement: Requirement) -> Self {
        let (expected_value, min_value, max_value) = match requirement.value {
            RequirementValue::NoValue => (None, None, None),
            RequirementValue::Expected(expected) => (Some(expected), None, None),
            RequirementValue::Min(min) => (None, Some(min), None),
            RequirementValue::Max(max) => (None, None, Some(max)),
            RequirementValue::Range { min, max } => (None, Some(min), Some(max)),
        };

        RequirementWire {
            id: requirement.id,
            title: requirement.title,
            description: requirement.description,
            data_type: requirement.data_type,
            expected_value,
            min_value,
            max_value,
            period: requirement.period,
        }
    }
}

/// Alternative set of requirements under one criteria.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequirementGroup {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub requirements: Vec<Requirement>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Criteria {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relates_to: Option<CriteriaRelatesTo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_item: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<CriteriaSource>,
    #[serde(default)]
    pub requirement_groups: Vec<RequirementGroup>,
}

impl Criteria {
    pub fn requirements(&self) -> impl Iterator<Item = &Requirement> {
        self.requirement_groups
            .iter()
            .flat_map(|group| group.requirements.iter())
    }

    /// Tender-wide criteria carry no `relatesTo`.
    pub fn is_tender_level(&self) -> bool {
        self.relates_to.is_none()
    }

    pub fn relates_to_lot(&self, lot_id: &str) -> bool {
        self.relates_to == Some(CriteriaRelatesTo::Lot) && self.related_item.as_deref() == Some(lot_id)
    }

    pub fn relates_to_item(&self, item_id: &str) -> bool {
        self.relates_to == Some(CriteriaRelatesTo::Item) && self.related_item.as_deref() == Some(item_id)
    }
}

/// Scoring entry pairing a triggering value with a price multiplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coefficient {
    pub id: String,
    pub value: CoefficientValue,
    #[serde(with = "rust_decimal::serde::float")]
    pub coefficient: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_option: Option<String>,
}

/// Translates a non-price requirement into price-equivalent coefficients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversion {
    pub id: String,
    pub relates_to: ConversionRelatesTo,
    pub related_item: String,
    pub rationale: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub coefficients: Vec<Coefficient>,
}

impl Conversion {
    /// Lowest coefficient rate, i.e. the largest possible price reduction.
    pub fn lowest_rate(&self) -> Option<Decimal> {
        self.coefficients
            .iter()
            .map(|coefficient| coefficient.coefficient)
            .min()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lot {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    pub related_lot: String,
}

/// Tender definition submitted for checking or for building the criteria tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenderPayload {
    pub award_criteria: AwardCriteria,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub award_criteria_details: Option<AwardCriteriaDetails>,
    pub main_procurement_category: ProcurementCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lots: Option<Vec<Lot>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<Item>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub criteria: Option<Vec<Criteria>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversions: Option<Vec<Conversion>>,
}

impl TenderPayload {
    pub fn lots(&self) -> &[Lot] {
        self.lots.as_deref().unwrap_or_default()
    }

    pub fn items(&self) -> &[Item] {
        self.items.as_deref().unwrap_or_default()
    }

    pub fn criteria(&self) -> &[Criteria] {
        self.criteria.as_deref().unwrap_or_default()
    }

    pub fn conversions(&self) -> &[Conversion] {
        self.conversions.as_deref().unwrap_or_default()
    }

    pub fn requirements(&self) -> impl Iterator<Item = &Requirement> {
        self.criteria().iter().flat_map(Criteria::requirements)
    }
}

/// Persisted, immutable criteria snapshot for one contracting process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriteriaTree {
    pub award_criteria: AwardCriteria,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub award_criteria_details: Option<AwardCriteriaDetails>,
    #[serde(default)]
    pub criteria: Vec<Criteria>,
    #[serde(default)]
    pub conversions: Vec<Conversion>,
}

impl CriteriaTree {
    pub fn requirements(&self) -> impl Iterator<Item = &Requirement> {
        self.criteria.iter().flat_map(Criteria::requirements)
    }

    pub fn requirement(&self, id: &str) -> Option<&Requirement> {
        self.requirements().find(|requirement| requirement.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementReference {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedCandidate {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentReference {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evidence {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_document: Option<DocumentReference>,
}

/// A bidder's answer to one requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequirementResponse {
    pub id: String,
    pub requirement: RequirementReference,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_candidate: Option<RelatedCandidate>,
    pub value: ResponseValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<Period>,
    #[serde(default)]
    pub evidences: Vec<Evidence>,
}

/// Bid fragment carrying the requirement responses to match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BidPayload {
    #[serde(default)]
    pub related_lots: Vec<String>,
    #[serde(default)]
    pub related_items: Vec<String>,
    #[serde(default)]
    pub requirement_responses: Vec<RequirementResponse>,
}

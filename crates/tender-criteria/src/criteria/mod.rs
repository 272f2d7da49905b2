//! Tender criteria and conversions: checking, building and response matching.
//!
//! The checks, the builder and the matcher are pure functions over in-memory
//! payloads. The service and router wrap them with snapshot storage for the
//! HTTP surface.

pub mod builder;
pub mod compatibility;
pub mod domain;
pub mod error;
pub mod policy;
pub mod repository;
pub mod responses;
pub mod router;
pub mod rules;
pub mod service;

#[cfg(test)]
mod tests;

pub use builder::{build_criteria, IdGenerator, UuidIdGenerator};
pub use domain::{
    AwardCriteria, AwardCriteriaDetails, BidPayload, Coefficient, CoefficientValue, Conversion,
    ConversionRelatesTo, Criteria, CriteriaRelatesTo, CriteriaSource, CriteriaTree, DataType,
    Evidence, ExpectedValue, Item, Lot, NumericValue, Period, ProcurementCategory, Requirement,
    RequirementGroup, RequirementReference, RequirementResponse, RequirementValue, ResponseValue,
    TenderPayload,
};
pub use error::{ValidationError, ValidationErrorView};
pub use policy::{ConversionPolicy, PolicyError};
pub use repository::{CriteriaRepository, ProcessId, RepositoryError};
pub use responses::{check_responses, check_responses_at};
pub use router::criteria_router;
pub use rules::{check_criteria, check_criteria_at, CriteriaChecker};
pub use service::{CriteriaService, CriteriaServiceError};

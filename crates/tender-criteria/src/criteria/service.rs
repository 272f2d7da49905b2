use std::sync::Arc;

use tracing::info;

use super::builder::{build_criteria, IdGenerator};
use super::domain::{BidPayload, CriteriaTree, TenderPayload};
use super::error::ValidationError;
use super::repository::{CriteriaRepository, ProcessId, RepositoryError};
use super::responses::check_responses;
use super::rules::CriteriaChecker;

/// Service composing the rule chain, the builder and snapshot storage.
pub struct CriteriaService<R, G> {
    checker: CriteriaChecker,
    repository: Arc<R>,
    ids: Arc<G>,
}

impl<R, G> CriteriaService<R, G>
where
    R: CriteriaRepository + 'static,
    G: IdGenerator + Send + Sync + 'static,
{
    pub fn new(repository: Arc<R>, ids: Arc<G>) -> Self {
        Self::with_checker(CriteriaChecker::default(), repository, ids)
    }

    pub fn with_checker(checker: CriteriaChecker, repository: Arc<R>, ids: Arc<G>) -> Self {
        Self {
            checker,
            repository,
            ids,
        }
    }

    /// Run the criteria checks without storing anything.
    pub fn check(&self, tender: &TenderPayload) -> Result<(), CriteriaServiceError> {
        self.checker.check(tender, chrono::Utc::now())?;
        Ok(())
    }

    /// Check, build and store the criteria tree of a process.
    pub fn create(
        &self,
        process_id: &ProcessId,
        tender: &TenderPayload,
    ) -> Result<CriteriaTree, CriteriaServiceError> {
        self.check(tender)?;
        let tree = build_criteria(tender, self.ids.as_ref())?;
        self.repository.insert(process_id, tree.clone())?;

        info!(
            %process_id,
            criteria = tree.criteria.len(),
            conversions = tree.conversions.len(),
            "criteria tree stored"
        );
        Ok(tree)
    }

    pub fn snapshot(&self, process_id: &ProcessId) -> Result<CriteriaTree, CriteriaServiceError> {
        let tree = self
            .repository
            .fetch(process_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(tree)
    }

    /// Match a bid's responses against the stored tree of the process.
    pub fn check_responses(
        &self,
        process_id: &ProcessId,
        bid: &BidPayload,
    ) -> Result<(), CriteriaServiceError> {
        let tree = self.snapshot(process_id)?;
        check_responses(bid, &tree)?;

        info!(
            %process_id,
            responses = bid.requirement_responses.len(),
            "requirement responses accepted"
        );
        Ok(())
    }
}

/// Error raised by the criteria service.
#[derive(Debug, thiserror::Error)]
pub enum CriteriaServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

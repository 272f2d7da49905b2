use serde::{Deserialize, Serialize};

use super::domain::CriteriaTree;

/// Identifier of the contracting process a criteria tree belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProcessId(pub String);

impl std::fmt::Display for ProcessId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Snapshot storage for built criteria trees. Trees are written once.
pub trait CriteriaRepository: Send + Sync {
    fn insert(&self, process_id: &ProcessId, tree: CriteriaTree) -> Result<(), RepositoryError>;
    fn fetch(&self, process_id: &ProcessId) -> Result<Option<CriteriaTree>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("criteria already exist for this process")]
    Conflict,
    #[error("criteria not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

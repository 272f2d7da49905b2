use metrics_exporter_prometheus::PrometheusHandle;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tender_criteria::criteria::{CriteriaRepository, CriteriaTree, ProcessId, RepositoryError};
use tender_criteria::error::AppError;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local snapshot store; trees are lost on restart.
#[derive(Default, Clone)]
pub(crate) struct InMemoryCriteriaRepository {
    trees: Arc<Mutex<HashMap<ProcessId, CriteriaTree>>>,
}

fn poisoned<T>(_: T) -> RepositoryError {
    RepositoryError::Unavailable("criteria store lock poisoned".to_string())
}

impl CriteriaRepository for InMemoryCriteriaRepository {
    fn insert(&self, process_id: &ProcessId, tree: CriteriaTree) -> Result<(), RepositoryError> {
        let mut guard = self.trees.lock().map_err(poisoned)?;
        if guard.contains_key(process_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(process_id.clone(), tree);
        Ok(())
    }

    fn fetch(&self, process_id: &ProcessId) -> Result<Option<CriteriaTree>, RepositoryError> {
        let guard = self.trees.lock().map_err(poisoned)?;
        Ok(guard.get(process_id).cloned())
    }
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, AppError> {
    let raw = std::fs::read(path)?;
    Ok(serde_json::from_slice(&raw)?)
}

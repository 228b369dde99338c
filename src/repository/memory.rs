//! Process-local preference store.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use serde_json::Value;

use crate::domain::types::WorkspaceId;
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{PreferenceReader, PreferenceWriter};

/// Keeps preferences in memory for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    values: Mutex<HashMap<(WorkspaceId, String), Value>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn values(&self) -> RepositoryResult<MutexGuard<'_, HashMap<(WorkspaceId, String), Value>>> {
        self.values
            .lock()
            .map_err(|_| RepositoryError::Unexpected("preference store lock poisoned".into()))
    }
}

impl PreferenceReader for MemoryPreferenceStore {
    fn get_preference(
        &self,
        workspace_id: WorkspaceId,
        key: &str,
    ) -> RepositoryResult<Option<Value>> {
        Ok(self.values()?.get(&(workspace_id, key.to_string())).cloned())
    }
}

impl PreferenceWriter for MemoryPreferenceStore {
    fn set_preference(
        &self,
        workspace_id: WorkspaceId,
        key: &str,
        value: &Value,
    ) -> RepositoryResult<()> {
        self.values()?
            .insert((workspace_id, key.to_string()), value.clone());
        Ok(())
    }
}

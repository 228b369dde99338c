use serde_json::Value;

use crate::db::DbPool;
use crate::domain::item::ManagedItem;
use crate::domain::types::{ItemId, WorkspaceId};
use crate::repository::errors::RepositoryResult;
use crate::state::filter::DEFAULT_LIST_LIMIT;

pub mod booking;
pub mod errors;
pub mod memory;
#[cfg(any(test, feature = "test-mocks"))]
pub mod mock;
pub mod notification;
pub mod preference;
pub mod support_ticket;
pub mod work_order;

pub use memory::MemoryPreferenceStore;

/// Bounds a collection load to one workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemListQuery {
    pub workspace_id: WorkspaceId,
    pub limit: usize,
}

impl ItemListQuery {
    pub fn new(workspace_id: WorkspaceId) -> Self {
        Self {
            workspace_id,
            limit: DEFAULT_LIST_LIMIT,
        }
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

pub trait ItemReader<T: ManagedItem> {
    fn get_item(&self, workspace_id: WorkspaceId, id: &ItemId) -> RepositoryResult<Option<T>>;
    /// Newest first, at most `query.limit` rows.
    fn list_items(&self, query: &ItemListQuery) -> RepositoryResult<Vec<T>>;
}

pub trait ItemWriter<T: ManagedItem> {
    /// Stores a new item, returning it with its generated id and timestamps.
    fn create_item(&self, draft: &T::Draft) -> RepositoryResult<T>;
    fn patch_item(
        &self,
        workspace_id: WorkspaceId,
        id: &ItemId,
        patch: &T::Patch,
    ) -> RepositoryResult<T>;
    /// Fails with `NotFound` when nothing was deleted.
    fn delete_item(&self, workspace_id: WorkspaceId, id: &ItemId) -> RepositoryResult<()>;
}

pub trait PreferenceReader {
    fn get_preference(&self, workspace_id: WorkspaceId, key: &str)
    -> RepositoryResult<Option<Value>>;
}

pub trait PreferenceWriter {
    fn set_preference(
        &self,
        workspace_id: WorkspaceId,
        key: &str,
        value: &Value,
    ) -> RepositoryResult<()>;
}

/// Diesel-backed store implementing every reader/writer trait.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<crate::db::DbConnection> {
        Ok(self.pool.get()?)
    }
}

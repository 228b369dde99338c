//! Workflows behind the dashboard endpoints.
//!
//! Services are plain generic functions over the repository traits so they can
//! run against [`crate::repository::DieselRepository`] in production and the
//! `mockall` stores in tests.

use chrono::{NaiveDateTime, Utc};
use thiserror::Error;

use crate::domain::item::{ItemFlag, ManagedItem};
use crate::domain::types::{ItemId, WorkspaceId};
use crate::dto::CsvExport;
use crate::export::{CsvRecord, ExportError, export_csv, export_filename};
use crate::forms::FormError;
use crate::repository::errors::RepositoryError;
use crate::repository::{ItemListQuery, ItemReader, ItemWriter};
use crate::state::ListState;
use crate::state::filter::{DEFAULT_LIST_LIMIT, ListFilter};
use crate::state::sync::SyncedList;

pub mod bookings;
pub mod notifications;
pub mod preferences;
pub mod support_tickets;
pub mod work_orders;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("not found")]
    NotFound,

    #[error("invalid form: {0}")]
    Form(String),

    #[error("invalid value: {0}")]
    TypeConstraint(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ServiceError::NotFound,
            RepositoryError::ConstraintViolation(msg) => ServiceError::Conflict(msg),
            RepositoryError::ValidationError(msg) => ServiceError::TypeConstraint(msg),
            other => ServiceError::Internal(other.to_string()),
        }
    }
}

impl From<FormError> for ServiceError {
    fn from(err: FormError) -> Self {
        ServiceError::Form(err.to_string())
    }
}

impl From<ExportError> for ServiceError {
    fn from(err: ExportError) -> Self {
        ServiceError::Internal(err.to_string())
    }
}

/// Tenant, load bound and clock shared by one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scope {
    pub workspace_id: WorkspaceId,
    pub limit: usize,
    pub now: NaiveDateTime,
}

impl Scope {
    pub fn new(workspace_id: WorkspaceId) -> Self {
        Self {
            workspace_id,
            limit: DEFAULT_LIST_LIMIT,
            now: Utc::now().naive_utc(),
        }
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn at(mut self, now: NaiveDateTime) -> Self {
        self.now = now;
        self
    }

    fn query(&self) -> ItemListQuery {
        ItemListQuery::new(self.workspace_id).limit(self.limit)
    }
}

/// Loads the workspace collection into a fresh [`ListState`].
pub fn load_state<T, R>(repo: &R, scope: &Scope) -> ServiceResult<ListState<T>>
where
    T: ManagedItem,
    R: ItemReader<T> + ?Sized,
{
    let items = repo.list_items(&scope.query()).map_err(|e| {
        log::error!("Failed to load items for workspace {}: {e}", scope.workspace_id);
        ServiceError::from(e)
    })?;
    Ok(ListState::from_items(items))
}

/// Loads the collection and returns the owned projection for `filter`.
pub fn list_projection<T, R>(
    repo: &R,
    scope: &Scope,
    filter: &ListFilter<T::Status>,
) -> ServiceResult<(ListState<T>, Vec<T>)>
where
    T: ManagedItem,
    R: ItemReader<T> + ?Sized,
{
    let state = load_state(repo, scope)?;
    let items = state.project(filter).into_iter().cloned().collect();
    Ok((state, items))
}

/// Wraps one stored item in a [`SyncedList`] so it can be mutated with
/// rollback.
fn synced_item<'r, T, R>(
    repo: &'r R,
    scope: &Scope,
    id: &ItemId,
) -> ServiceResult<SyncedList<'r, T, R>>
where
    T: ManagedItem,
    R: ItemReader<T> + ItemWriter<T> + ?Sized,
{
    let item = repo
        .get_item(scope.workspace_id, id)?
        .ok_or(ServiceError::NotFound)?;
    Ok(SyncedList::new(ListState::from_items(vec![item]), repo))
}

/// Builds a patch from the stored item and applies it.
pub fn update_item<T, R, F>(repo: &R, scope: &Scope, id: &ItemId, build: F) -> ServiceResult<T>
where
    T: ManagedItem,
    R: ItemReader<T> + ItemWriter<T> + ?Sized,
    F: FnOnce(&T) -> ServiceResult<T::Patch>,
{
    let mut list = synced_item(repo, scope, id)?;
    let current = list.state().get(id).ok_or(ServiceError::NotFound)?;
    let patch = build(current)?;
    Ok(list.patch(id, &patch)?)
}

/// Sets one boolean flag; an item already carrying `value` skips the store.
pub fn set_flag<T, R>(
    repo: &R,
    scope: &Scope,
    id: &ItemId,
    flag: ItemFlag,
    value: bool,
) -> ServiceResult<T>
where
    T: ManagedItem,
    R: ItemReader<T> + ItemWriter<T> + ?Sized,
{
    let mut list = synced_item(repo, scope, id)?;
    Ok(list.mark_flag(id, flag, value)?)
}

pub fn set_archived<T, R>(
    repo: &R,
    scope: &Scope,
    id: &ItemId,
    archived: bool,
) -> ServiceResult<T>
where
    T: ManagedItem,
    R: ItemReader<T> + ItemWriter<T> + ?Sized,
{
    let item = set_flag(repo, scope, id, ItemFlag::Archived, archived)?;
    log::info!(
        "Item {id} {} in workspace {}",
        if archived { "archived" } else { "restored" },
        scope.workspace_id
    );
    Ok(item)
}

pub fn delete_item<T, R>(repo: &R, scope: &Scope, id: &ItemId) -> ServiceResult<T>
where
    T: ManagedItem,
    R: ItemReader<T> + ItemWriter<T> + ?Sized,
{
    let mut list = synced_item(repo, scope, id)?;
    Ok(list.remove(id)?)
}

/// Renders the projection for `filter` as a CSV attachment.
pub fn export_items<T, R>(
    repo: &R,
    scope: &Scope,
    filter: &ListFilter<T::Status>,
    collection: &str,
) -> ServiceResult<CsvExport>
where
    T: ManagedItem + CsvRecord,
    R: ItemReader<T> + ?Sized,
{
    let state = load_state(repo, scope)?;
    let content = export_csv(state.project(filter))?;
    Ok(CsvExport {
        filename: export_filename(collection, scope.now.date()),
        content,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::support_ticket::tests::ticket;
    use crate::domain::support_ticket::{SupportTicket, TicketStatus};
    use crate::repository::mock::MockTicketStore;
    use crate::state::filter::{ArchiveView, StatusFilter};

    pub(crate) fn scope() -> Scope {
        Scope::new(WorkspaceId::new(1).unwrap()).at(
            NaiveDate::from_ymd_opt(2026, 3, 5)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
        )
    }

    #[test]
    fn repository_errors_map_to_service_errors() {
        assert!(matches!(
            ServiceError::from(RepositoryError::NotFound),
            ServiceError::NotFound
        ));
        assert!(matches!(
            ServiceError::from(RepositoryError::ConstraintViolation("dup".into())),
            ServiceError::Conflict(_)
        ));
        assert!(matches!(
            ServiceError::from(RepositoryError::ConnectionError("down".into())),
            ServiceError::Internal(_)
        ));
    }

    #[test]
    fn load_uses_scope_limit() {
        let mut repo = MockTicketStore::new();
        repo.expect_list_items()
            .withf(|query| query.limit == 5 && query.workspace_id.get() == 1)
            .returning(|_| Ok(vec![ticket("1", TicketStatus::Open)]));

        let state: ListState<SupportTicket> = load_state(&repo, &scope().limit(5)).unwrap();
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn archive_of_unknown_item_is_not_found() {
        let mut repo = MockTicketStore::new();
        repo.expect_get_item().returning(|_, _| Ok(None));
        repo.expect_patch_item().never();

        let result: ServiceResult<SupportTicket> =
            set_archived(&repo, &scope(), &ItemId::new("x").unwrap(), true);
        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[test]
    fn export_covers_filtered_view() {
        let mut repo = MockTicketStore::new();
        repo.expect_list_items().returning(|_| {
            let mut archived = ticket("3", TicketStatus::Open);
            archived.archived = true;
            Ok(vec![
                ticket("1", TicketStatus::Open),
                ticket("2", TicketStatus::Closed),
                archived,
            ])
        });
        let filter = ListFilter::default()
            .archive(ArchiveView::Active)
            .status(StatusFilter::Only(TicketStatus::Open));

        let export = export_items::<SupportTicket, _>(&repo, &scope(), &filter, "tickets").unwrap();

        assert_eq!(export.filename, "tickets-2026-03-05.csv");
        assert_eq!(export.content.lines().count(), 2);
        assert!(export.content.contains("TKT-1"));
    }
}

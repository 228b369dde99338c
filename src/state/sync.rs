//! Local-first mutations mirrored to a persistence collaborator.
//!
//! Creates wait for the store to assign the id and timestamps. Every other
//! mutation is applied locally first and rolled back to the previous item,
//! at the same position, when the store rejects it.

use serde::Serialize;

use crate::domain::item::{ItemFlag, ItemPatch, ManagedItem};
use crate::domain::types::ItemId;
use crate::repository::ItemWriter;
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::state::{ListAction, ListState};

/// Result of applying one patch to several items.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct BatchOutcome {
    pub succeeded: Vec<ItemId>,
    /// Ids whose remote update failed, with the error message.
    pub failed: Vec<(ItemId, String)>,
}

impl BatchOutcome {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    fn record(&mut self, id: &ItemId, result: RepositoryResult<()>) {
        match result {
            Ok(()) => self.succeeded.push(id.clone()),
            Err(e) => self.failed.push((id.clone(), e.to_string())),
        }
    }

    fn log(&self, attempted: usize) {
        if !self.is_complete() {
            log::warn!(
                "Batch update finished with {} failures out of {attempted}",
                self.failed.len()
            );
        }
    }
}

/// A [`ListState`] whose mutations are persisted through `store`.
pub struct SyncedList<'r, T, R>
where
    T: ManagedItem,
    R: ItemWriter<T> + ?Sized,
{
    state: ListState<T>,
    store: &'r R,
}

impl<'r, T, R> SyncedList<'r, T, R>
where
    T: ManagedItem,
    R: ItemWriter<T> + ?Sized,
{
    pub fn new(state: ListState<T>, store: &'r R) -> Self {
        Self { state, store }
    }

    pub fn state(&self) -> &ListState<T> {
        &self.state
    }

    pub fn into_state(self) -> ListState<T> {
        self.state
    }

    /// Persists `draft` and prepends the stored row.
    pub fn create(&mut self, draft: &T::Draft) -> RepositoryResult<T> {
        let created = self.store.create_item(draft).map_err(|e| {
            log::error!("Failed to create item: {e}");
            e
        })?;
        self.state.dispatch(ListAction::Upsert(created.clone()));
        Ok(created)
    }

    /// Applies `patch` locally, then remotely, keeping the stored row.
    pub fn patch(&mut self, id: &ItemId, patch: &T::Patch) -> RepositoryResult<T> {
        if patch.is_empty() {
            return self.state.get(id).cloned().ok_or(RepositoryError::NotFound);
        }

        let previous = self
            .state
            .patch_one(id, patch)
            .ok_or(RepositoryError::NotFound)?;

        match self.store.patch_item(previous.workspace_id(), id, patch) {
            Ok(stored) => {
                self.state.dispatch(ListAction::Upsert(stored.clone()));
                Ok(stored)
            }
            Err(e) => {
                log::error!("Failed to update item {id}: {e}");
                self.state.dispatch(ListAction::Upsert(previous));
                Err(e)
            }
        }
    }

    /// Sets `flag`; an item that already carries `value` is returned as is.
    pub fn mark_flag(&mut self, id: &ItemId, flag: ItemFlag, value: bool) -> RepositoryResult<T> {
        let patch = T::Patch::flag(flag, value).ok_or_else(|| {
            RepositoryError::ValidationError(format!("flag `{flag}` is not supported"))
        })?;
        let current = self.state.get(id).ok_or(RepositoryError::NotFound)?;
        if current.flag(flag) == Some(value) {
            return Ok(current.clone());
        }
        self.patch(id, &patch)
    }

    pub fn archive(&mut self, id: &ItemId) -> RepositoryResult<T> {
        self.mark_flag(id, ItemFlag::Archived, true)
    }

    pub fn unarchive(&mut self, id: &ItemId) -> RepositoryResult<T> {
        self.mark_flag(id, ItemFlag::Archived, false)
    }

    /// Removes the item locally and remotely; it reappears in place on
    /// failure.
    pub fn remove(&mut self, id: &ItemId) -> RepositoryResult<T> {
        let (index, removed) = self.state.remove_one(id).ok_or(RepositoryError::NotFound)?;

        match self.store.delete_item(removed.workspace_id(), id) {
            Ok(()) => Ok(removed),
            Err(e) => {
                log::error!("Failed to delete item {id}: {e}");
                self.state.restore(index, removed);
                Err(e)
            }
        }
    }

    /// Applies `patch` to each id independently.
    pub fn patch_many(&mut self, ids: &[ItemId], patch: &T::Patch) -> BatchOutcome {
        self.patch_each(ids, |_| patch.clone())
    }

    /// Applies a patch built from each current item; unknown ids fail.
    pub fn patch_each<F>(&mut self, ids: &[ItemId], mut build: F) -> BatchOutcome
    where
        F: FnMut(&T) -> T::Patch,
    {
        let mut outcome = BatchOutcome::default();
        for id in ids {
            let result = match self.state.get(id).map(&mut build) {
                Some(patch) => self.patch(id, &patch),
                None => Err(RepositoryError::NotFound),
            };
            outcome.record(id, result.map(|_| ()));
        }
        outcome.log(ids.len());
        outcome
    }

    /// Removes each id independently.
    pub fn remove_many(&mut self, ids: &[ItemId]) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();
        for id in ids {
            let result = self.remove(id).map(|_| ());
            outcome.record(id, result);
        }
        outcome.log(ids.len());
        outcome
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::domain::support_ticket::tests::{opened_at, ticket};
    use crate::domain::support_ticket::{
        NewSupportTicket, SupportTicketPatch, TicketChannel, TicketPriority, TicketStatus,
    };
    use crate::domain::types::WorkspaceId;
    use crate::repository::mock::MockTicketStore;

    fn id(value: &str) -> ItemId {
        ItemId::new(value).unwrap()
    }

    fn seeded() -> ListState<crate::domain::support_ticket::SupportTicket> {
        ListState::from_items(vec![
            ticket("1", TicketStatus::Open),
            ticket("2", TicketStatus::Pending),
            ticket("3", TicketStatus::Closed),
        ])
    }

    #[test]
    fn failed_patch_rolls_back_in_place() {
        let mut store = MockTicketStore::new();
        store
            .expect_patch_item()
            .times(1)
            .returning(|_, _, _| Err(RepositoryError::ConnectionError("down".into())));
        let before = seeded().into_items();
        let mut list = SyncedList::new(seeded(), &store);

        let result = list.patch(&id("2"), &SupportTicketPatch::status(TicketStatus::Solved));

        assert!(matches!(result, Err(RepositoryError::ConnectionError(_))));
        assert_eq!(list.state().items(), before.as_slice());
    }

    #[test]
    fn successful_patch_keeps_stored_row() {
        let mut store = MockTicketStore::new();
        store
            .expect_patch_item()
            .withf(|ws, id, patch| {
                ws.get() == 1 && id.as_str() == "1" && patch.status == Some(TicketStatus::Solved)
            })
            .returning(|_, _, _| {
                let mut stored = ticket("1", TicketStatus::Solved);
                stored.updated_at = opened_at() + Duration::minutes(5);
                Ok(stored)
            });
        let mut list = SyncedList::new(seeded(), &store);

        let stored = list
            .patch(&id("1"), &SupportTicketPatch::status(TicketStatus::Solved))
            .unwrap();

        assert_eq!(stored.updated_at, opened_at() + Duration::minutes(5));
        assert_eq!(list.state().items()[0], stored);
    }

    #[test]
    fn unknown_id_never_reaches_the_store() {
        let mut store = MockTicketStore::new();
        store.expect_patch_item().never();
        store.expect_delete_item().never();
        let mut list = SyncedList::new(seeded(), &store);

        assert!(matches!(
            list.archive(&id("missing")),
            Err(RepositoryError::NotFound)
        ));
        assert!(matches!(
            list.remove(&id("missing")),
            Err(RepositoryError::NotFound)
        ));
        assert_eq!(list.state().len(), 3);
    }

    #[test]
    fn flag_already_set_skips_the_store() {
        let mut store = MockTicketStore::new();
        store.expect_patch_item().never();
        let mut state = seeded();
        state.mark_flag(&id("3"), ItemFlag::Archived, true);
        let mut list = SyncedList::new(state, &store);

        let item = list.archive(&id("3")).unwrap();

        assert!(item.archived);
    }

    #[test]
    fn failed_delete_restores_position() {
        let mut store = MockTicketStore::new();
        store
            .expect_delete_item()
            .returning(|_, _| Err(RepositoryError::DatabaseError("locked".into())));
        let before = seeded().into_items();
        let mut list = SyncedList::new(seeded(), &store);

        assert!(list.remove(&id("2")).is_err());
        assert_eq!(list.state().items(), before.as_slice());
    }

    #[test]
    fn create_waits_for_stored_row() {
        let mut store = MockTicketStore::new();
        store
            .expect_create_item()
            .returning(|_| Ok(ticket("new", TicketStatus::New)));
        let mut list = SyncedList::new(seeded(), &store);
        let draft = NewSupportTicket {
            workspace_id: WorkspaceId::new(1).unwrap(),
            ticket_code: "TKT-NEW".to_string(),
            subject: "Printer on fire".to_string(),
            description: None,
            category: "Technical".to_string(),
            priority: TicketPriority::Urgent,
            channel: TicketChannel::Phone,
            customer_name: None,
            customer_email: None,
        };

        let created = list.create(&draft).unwrap();

        assert_eq!(list.state().items()[0], created);
        assert_eq!(list.state().len(), 4);
    }

    #[test]
    fn failed_create_leaves_state_alone() {
        let mut store = MockTicketStore::new();
        store
            .expect_create_item()
            .returning(|_| Err(RepositoryError::ConstraintViolation("dup".into())));
        let mut list = SyncedList::new(seeded(), &store);
        let draft = NewSupportTicket {
            workspace_id: WorkspaceId::new(1).unwrap(),
            ticket_code: "TKT-1".to_string(),
            subject: "Duplicate".to_string(),
            description: None,
            category: "General".to_string(),
            priority: TicketPriority::Low,
            channel: TicketChannel::Web,
            customer_name: None,
            customer_email: None,
        };

        assert!(list.create(&draft).is_err());
        assert_eq!(list.state().len(), 3);
    }

    #[test]
    fn patch_many_reports_each_item() {
        let mut store = MockTicketStore::new();
        store.expect_patch_item().returning(|_, id, patch| {
            if id.as_str() == "2" {
                return Err(RepositoryError::ConnectionError("timeout".into()));
            }
            let mut stored = ticket(id.as_str(), TicketStatus::Open);
            stored.apply_patch(patch);
            Ok(stored)
        });
        let mut list = SyncedList::new(seeded(), &store);
        let patch = SupportTicketPatch::status(TicketStatus::Closed);

        let outcome = list.patch_many(&[id("1"), id("2"), id("9")], &patch);

        assert_eq!(outcome.succeeded, vec![id("1")]);
        assert_eq!(outcome.failed.len(), 2);
        assert_eq!(
            list.state().get(&id("2")).unwrap().status,
            TicketStatus::Pending
        );
        assert_eq!(list.state().get(&id("1")).unwrap().status, TicketStatus::Closed);
    }

    #[test]
    fn patch_each_builds_from_current_item() {
        let mut store = MockTicketStore::new();
        store
            .expect_patch_item()
            .times(2)
            .returning(|_, id, patch| {
                let mut stored = ticket(id.as_str(), TicketStatus::Open);
                stored.apply_patch(patch);
                Ok(stored)
            });
        let mut list = SyncedList::new(seeded(), &store);

        let outcome = list.patch_each(&[id("1"), id("3")], |t| {
            SupportTicketPatch::assign(format!("agent-{}", t.id))
        });

        assert!(outcome.is_complete());
        assert_eq!(
            list.state().get(&id("3")).unwrap().assigned_to.as_deref(),
            Some("agent-3")
        );
    }

    #[test]
    fn remove_many_keeps_failed_items() {
        let mut store = MockTicketStore::new();
        store.expect_delete_item().returning(|_, id| {
            if id.as_str() == "1" {
                Err(RepositoryError::DatabaseError("locked".into()))
            } else {
                Ok(())
            }
        });
        let mut list = SyncedList::new(seeded(), &store);

        let outcome = list.remove_many(&[id("1"), id("2")]);

        assert_eq!(outcome.succeeded, vec![id("2")]);
        assert_eq!(list.state().len(), 2);
        assert_eq!(list.state().items()[0].id, id("1"));
    }

    #[test]
    fn unsupported_flag_is_rejected_before_any_call() {
        let mut store = MockTicketStore::new();
        store.expect_patch_item().never();
        let mut list = SyncedList::new(seeded(), &store);

        assert!(matches!(
            list.mark_flag(&id("1"), ItemFlag::Read, true),
            Err(RepositoryError::ValidationError(_))
        ));
    }
}

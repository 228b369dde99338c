//! In-memory list state shared by every dashboard collection.
//!
//! [`ListState`] is the authoritative ordered collection for one entity type.
//! Filters never mutate it; they produce borrowed projections through
//! [`ListState::project`]. Remote persistence is layered on top by
//! [`sync::SyncedList`].

use std::collections::HashSet;

use crate::domain::item::{ItemFlag, ItemPatch, ManagedItem};
use crate::domain::types::ItemId;

pub mod filter;
pub mod sync;

use filter::{ListFilter, project};

/// Reducer-style operations accepted by [`ListState::dispatch`].
#[derive(Debug, Clone)]
pub enum ListAction<T: ManagedItem> {
    SetAll(Vec<T>),
    Upsert(T),
    Remove(ItemId),
    Patch(ItemId, T::Patch),
}

/// Ordered collection keyed by [`ManagedItem::id`].
///
/// New items are prepended so the collection reads newest first.
#[derive(Debug, Clone)]
pub struct ListState<T> {
    items: Vec<T>,
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: ManagedItem> ListState<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items(items: Vec<T>) -> Self {
        let mut state = Self::new();
        state.set_all(items);
        state
    }

    /// Replaces the whole collection.
    ///
    /// Ids are not deduplicated; repeated ids are only reported.
    pub fn set_all(&mut self, items: Vec<T>) {
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if !seen.insert(item.id()) {
                log::warn!("Duplicate item id {} in loaded collection", item.id());
            }
        }
        self.items = items;
    }

    /// Replaces the item with the same id, or prepends it when absent.
    ///
    /// Returns the replaced item.
    pub fn upsert_one(&mut self, item: T) -> Option<T> {
        match self.position(item.id()) {
            Some(index) => Some(std::mem::replace(&mut self.items[index], item)),
            None => {
                self.items.insert(0, item);
                None
            }
        }
    }

    /// Removes the item with `id`, returning its former position and value.
    pub fn remove_one(&mut self, id: &ItemId) -> Option<(usize, T)> {
        let index = self.position(id)?;
        Some((index, self.items.remove(index)))
    }

    /// Puts `item` back at `index`, clamped to the current length.
    pub fn restore(&mut self, index: usize, item: T) {
        if self.position(item.id()).is_some() {
            self.upsert_one(item);
            return;
        }
        let index = index.min(self.items.len());
        self.items.insert(index, item);
    }

    /// Merges `patch` into the item with `id`, returning the item as it was.
    pub fn patch_one(&mut self, id: &ItemId, patch: &T::Patch) -> Option<T> {
        let index = self.position(id)?;
        let previous = self.items[index].clone();
        self.items[index].apply_patch(patch);
        Some(previous)
    }

    /// Sets a boolean flag on one item.
    ///
    /// Returns `None` and leaves the state untouched when the id is unknown or
    /// the item type does not carry the flag.
    pub fn mark_flag(&mut self, id: &ItemId, flag: ItemFlag, value: bool) -> Option<T> {
        let patch = T::Patch::flag(flag, value)?;
        self.patch_one(id, &patch)
    }

    pub fn dispatch(&mut self, action: ListAction<T>) {
        match action {
            ListAction::SetAll(items) => self.set_all(items),
            ListAction::Upsert(item) => {
                self.upsert_one(item);
            }
            ListAction::Remove(id) => {
                self.remove_one(&id);
            }
            ListAction::Patch(id, patch) => {
                self.patch_one(&id, &patch);
            }
        }
    }

    pub fn get(&self, id: &ItemId) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items visible through `filter`, in collection order.
    pub fn project(&self, filter: &ListFilter<T::Status>) -> Vec<&T> {
        project(&self.items, filter)
    }

    fn position(&self, id: &ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::domain::support_ticket::tests::{opened_at, ticket};
    use crate::domain::support_ticket::{SupportTicket, SupportTicketPatch, TicketStatus};
    use crate::state::filter::StatusFilter;

    fn id(value: &str) -> ItemId {
        ItemId::new(value).unwrap()
    }

    fn ids(items: &[&SupportTicket]) -> Vec<String> {
        items.iter().map(|t| t.id.to_string()).collect()
    }

    #[test]
    fn upsert_prepends_new_and_replaces_existing() {
        let mut state = ListState::from_items(vec![ticket("1", TicketStatus::Open)]);

        assert!(state.upsert_one(ticket("2", TicketStatus::New)).is_none());
        assert_eq!(state.items()[0].id, id("2"));

        let mut changed = ticket("1", TicketStatus::Open);
        changed.subject = "Changed".to_string();
        let previous = state.upsert_one(changed.clone()).unwrap();
        assert_eq!(previous.subject, "Ticket 1");
        assert_eq!(state.len(), 2);
        assert_eq!(state.items()[1], changed);
    }

    #[test]
    fn upsert_is_idempotent() {
        let mut state = ListState::from_items(vec![ticket("1", TicketStatus::Open)]);
        let item = ticket("2", TicketStatus::Pending);

        state.upsert_one(item.clone());
        let once = state.items().to_vec();
        state.upsert_one(item);

        assert_eq!(state.items(), once.as_slice());
    }

    #[test]
    fn removing_missing_id_changes_nothing() {
        let mut state = ListState::from_items(vec![
            ticket("1", TicketStatus::Open),
            ticket("2", TicketStatus::Closed),
        ]);
        let before = state.items().to_vec();

        assert!(state.remove_one(&id("404")).is_none());
        assert_eq!(state.items(), before.as_slice());
    }

    #[test]
    fn restore_puts_item_back_in_place() {
        let mut state = ListState::from_items(vec![
            ticket("1", TicketStatus::Open),
            ticket("2", TicketStatus::Open),
            ticket("3", TicketStatus::Open),
        ]);
        let before = state.items().to_vec();

        let (index, item) = state.remove_one(&id("2")).unwrap();
        assert_eq!(index, 1);
        state.restore(index, item);

        assert_eq!(state.items(), before.as_slice());
    }

    #[test]
    fn mark_flag_ignores_unsupported_flags() {
        let mut state = ListState::from_items(vec![ticket("1", TicketStatus::Open)]);

        assert!(state.mark_flag(&id("1"), ItemFlag::Read, true).is_none());
        assert!(state.mark_flag(&id("9"), ItemFlag::Archived, true).is_none());

        let previous = state.mark_flag(&id("1"), ItemFlag::Archived, true).unwrap();
        assert!(!previous.archived);
        assert!(state.get(&id("1")).unwrap().archived);
    }

    #[test]
    fn duplicate_ids_are_kept_on_bulk_load() {
        let state = ListState::from_items(vec![
            ticket("1", TicketStatus::Open),
            ticket("1", TicketStatus::Closed),
        ]);
        assert_eq!(state.len(), 2);
    }

    #[test]
    fn dispatch_routes_each_action() {
        let mut state = ListState::new();
        state.dispatch(ListAction::SetAll(vec![
            ticket("1", TicketStatus::Open),
            ticket("2", TicketStatus::New),
        ]));

        state.dispatch(ListAction::Patch(
            id("1"),
            SupportTicketPatch::status(TicketStatus::Closed),
        ));
        state.dispatch(ListAction::Remove(id("2")));
        state.dispatch(ListAction::Upsert(ticket("3", TicketStatus::New)));

        let ids: Vec<&str> = state.items().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "1"]);
        assert_eq!(state.items()[1].status, TicketStatus::Closed);
    }

    #[test]
    fn open_closed_archive_scenario() {
        let mut state = ListState::new();
        state.set_all(vec![
            ticket("A", TicketStatus::Open),
            ticket("B", TicketStatus::Closed),
        ]);

        let open = ListFilter::default().status(StatusFilter::Only(TicketStatus::Open));
        assert_eq!(ids(&state.project(&open)), vec!["A"]);

        state.mark_flag(&id("A"), ItemFlag::Archived, true);
        assert!(state.project(&open).is_empty());

        let all = ListFilter::default();
        assert_eq!(ids(&state.project(&all)), vec!["B"]);
    }

    #[test]
    fn projection_leaves_state_untouched() {
        let mut late = ticket("2", TicketStatus::Open);
        late.created_at = opened_at() + Duration::days(2);
        let state = ListState::from_items(vec![ticket("1", TicketStatus::Open), late]);
        let before = state.items().to_vec();
        let filter = ListFilter::default().search("ticket 2");

        let first = ids(&state.project(&filter));
        let second = ids(&state.project(&filter));

        assert_eq!(first, second);
        assert_eq!(first, vec!["2"]);
        assert_eq!(state.items(), before.as_slice());
    }
}

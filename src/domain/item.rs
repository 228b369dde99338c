//! The shape shared by every list managed by the dashboard.

use std::fmt::{Debug, Display};
use std::str::FromStr;

use chrono::NaiveDateTime;

use crate::domain::types::{ItemId, TypeConstraintError, WorkspaceId, labelled_enum};

labelled_enum!(
    /// Boolean markers that can be toggled generically on an item.
    ItemFlag {
        Archived => "archived",
        Read => "read",
        ReminderSent => "reminder_sent",
    }
);

/// A record held by a [`crate::state::ListState`].
///
/// The id is the only key used for lookup, replacement and removal. Nothing
/// else about the item is assumed to be unique.
pub trait ManagedItem: Clone + Debug {
    /// Closed set of lifecycle states driving filter membership.
    type Status: Copy + PartialEq + Debug + Display + FromStr<Err = TypeConstraintError>;
    /// Partial update merged by [`ManagedItem::apply_patch`].
    type Patch: ItemPatch;
    /// Payload accepted by the persistence layer to create a new item.
    type Draft: Debug;

    fn id(&self) -> &ItemId;

    fn workspace_id(&self) -> WorkspaceId;

    fn status(&self) -> Self::Status;

    /// Soft-removal marker. Archived items stay in the collection.
    fn is_archived(&self) -> bool;

    fn created_at(&self) -> NaiveDateTime;

    /// Timestamp matched by date-range filters.
    fn occurs_at(&self) -> NaiveDateTime {
        self.created_at()
    }

    /// Text fields matched by the free-text search.
    fn search_fields(&self) -> Vec<&str>;

    /// Auxiliary category used by the category filter.
    fn category(&self) -> Option<&str> {
        None
    }

    /// Current value of `flag`, or `None` when the item has no such flag.
    fn flag(&self, flag: ItemFlag) -> Option<bool>;

    /// Merges the non-empty fields of `patch` into the item.
    fn apply_patch(&mut self, patch: &Self::Patch);
}

/// Partial update of a [`ManagedItem`]. Every field is optional.
pub trait ItemPatch: Clone + Debug + Default {
    /// Builds a patch that only sets `flag` to `value`.
    ///
    /// Returns `None` when the item type does not carry the flag.
    fn flag(flag: ItemFlag, value: bool) -> Option<Self>;

    /// `true` when the patch would not change anything.
    fn is_empty(&self) -> bool;
}

/// Assigns `value` to `target` when present.
pub(crate) fn merge<T: Clone>(target: &mut T, value: &Option<T>) {
    if let Some(value) = value {
        *target = value.clone();
    }
}

/// Assigns `value` to an optional `target` when present.
pub(crate) fn merge_opt<T: Clone>(target: &mut Option<T>, value: &Option<T>) {
    if let Some(value) = value {
        *target = Some(value.clone());
    }
}

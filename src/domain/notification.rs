use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::item::{ItemFlag, ItemPatch, ManagedItem, merge};
use crate::domain::types::{ActionUrl, ItemId, WorkspaceId, labelled_enum};

labelled_enum!(
    NotificationKind {
        Info => "info",
        Success => "success",
        Warning => "warning",
        Error => "error",
        Payment => "payment",
        Project => "project",
        Message => "message",
        System => "system",
    }
);

labelled_enum!(
    NotificationPriority {
        Low => "low",
        Medium => "medium",
        High => "high",
        Urgent => "urgent",
    }
);

labelled_enum!(
    /// Status of a notification as seen by the inbox filters.
    ReadState {
        Unread => "unread",
        Read => "read",
    }
);

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    pub id: ItemId,
    pub workspace_id: WorkspaceId,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub category: String,
    pub priority: NotificationPriority,
    pub read: bool,
    pub action_url: Option<ActionUrl>,
    pub archived: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewNotification {
    pub workspace_id: WorkspaceId,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub category: String,
    pub priority: NotificationPriority,
    pub action_url: Option<ActionUrl>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NotificationPatch {
    pub read: Option<bool>,
    pub archived: Option<bool>,
}

impl NotificationPatch {
    pub fn read() -> Self {
        Self {
            read: Some(true),
            ..Self::default()
        }
    }

    pub fn archived(value: bool) -> Self {
        Self {
            archived: Some(value),
            ..Self::default()
        }
    }
}

impl ItemPatch for NotificationPatch {
    fn flag(flag: ItemFlag, value: bool) -> Option<Self> {
        match flag {
            ItemFlag::Read => Some(Self {
                read: Some(value),
                ..Self::default()
            }),
            ItemFlag::Archived => Some(Self::archived(value)),
            ItemFlag::ReminderSent => None,
        }
    }

    fn is_empty(&self) -> bool {
        self.read.is_none() && self.archived.is_none()
    }
}

impl ManagedItem for Notification {
    type Status = ReadState;
    type Patch = NotificationPatch;
    type Draft = NewNotification;

    fn id(&self) -> &ItemId {
        &self.id
    }

    fn workspace_id(&self) -> WorkspaceId {
        self.workspace_id
    }

    fn status(&self) -> ReadState {
        if self.read {
            ReadState::Read
        } else {
            ReadState::Unread
        }
    }

    fn is_archived(&self) -> bool {
        self.archived
    }

    fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.message.as_str()]
    }

    fn category(&self) -> Option<&str> {
        Some(self.category.as_str())
    }

    fn flag(&self, flag: ItemFlag) -> Option<bool> {
        match flag {
            ItemFlag::Read => Some(self.read),
            ItemFlag::Archived => Some(self.archived),
            ItemFlag::ReminderSent => None,
        }
    }

    fn apply_patch(&mut self, patch: &NotificationPatch) {
        merge(&mut self.read, &patch.read);
        merge(&mut self.archived, &patch.archived);
    }
}

#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
pub struct NotificationStats {
    pub total: usize,
    /// Unread and not archived.
    pub unread: usize,
    pub archived: usize,
}

impl NotificationStats {
    pub fn from_items(notifications: &[Notification]) -> Self {
        Self {
            total: notifications.len(),
            unread: notifications
                .iter()
                .filter(|n| !n.read && !n.archived)
                .count(),
            archived: notifications.iter().filter(|n| n.archived).count(),
        }
    }
}

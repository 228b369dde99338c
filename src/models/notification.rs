use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::notification::{NewNotification, Notification, NotificationPatch};
use crate::domain::types::{ActionUrl, ItemId, TypeConstraintError, WorkspaceId};

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = crate::schema::notifications)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct NotificationRow {
    pub id: String,
    pub workspace_id: i32,
    pub title: String,
    pub message: String,
    pub kind: String,
    pub category: String,
    pub priority: String,
    pub read: bool,
    pub action_url: Option<String>,
    pub archived: bool,
    pub created_at: NaiveDateTime,
}

impl NotificationRow {
    pub fn from_new(notification: &NewNotification, id: ItemId, now: NaiveDateTime) -> Self {
        Self {
            id: id.into_inner(),
            workspace_id: notification.workspace_id.get(),
            title: notification.title.clone(),
            message: notification.message.clone(),
            kind: notification.kind.as_str().to_string(),
            category: notification.category.clone(),
            priority: notification.priority.as_str().to_string(),
            read: false,
            action_url: notification
                .action_url
                .as_ref()
                .map(|url| url.as_str().to_string()),
            archived: false,
            created_at: now,
        }
    }
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::notifications)]
pub struct NotificationChanges {
    pub read: Option<bool>,
    pub archived: Option<bool>,
}

impl From<&NotificationPatch> for NotificationChanges {
    fn from(patch: &NotificationPatch) -> Self {
        Self {
            read: patch.read,
            archived: patch.archived,
        }
    }
}

impl TryFrom<NotificationRow> for Notification {
    type Error = TypeConstraintError;

    fn try_from(row: NotificationRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ItemId::new(row.id)?,
            workspace_id: WorkspaceId::new(row.workspace_id)?,
            title: row.title,
            message: row.message,
            kind: row.kind.parse()?,
            category: row.category,
            priority: row.priority.parse()?,
            read: row.read,
            action_url: row.action_url.map(ActionUrl::new).transpose()?,
            archived: row.archived,
            created_at: row.created_at,
        })
    }
}

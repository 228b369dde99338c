use serde::Deserialize;
use validator::Validate;

use crate::domain::notification::{NewNotification, NotificationKind, NotificationPriority};
use crate::domain::types::{ActionUrl, WorkspaceId};
use crate::forms::{FormError, optional_text, required_text};

#[derive(Debug, Deserialize, Validate)]
/// Form data for posting a notification into a workspace inbox.
pub struct NewNotificationForm {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1))]
    pub message: String,
    #[serde(default = "default_kind")]
    pub kind: NotificationKind,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default = "default_priority")]
    pub priority: NotificationPriority,
    pub action_url: Option<String>,
}

fn default_kind() -> NotificationKind {
    NotificationKind::Info
}

fn default_category() -> String {
    "general".to_string()
}

fn default_priority() -> NotificationPriority {
    NotificationPriority::Medium
}

impl NewNotificationForm {
    pub fn into_new_notification(
        self,
        workspace_id: WorkspaceId,
    ) -> Result<NewNotification, FormError> {
        self.validate()?;

        let action_url = optional_text(self.action_url)
            .map(ActionUrl::new)
            .transpose()
            .map_err(|_| FormError::InvalidUrl)?;

        Ok(NewNotification {
            workspace_id,
            title: required_text(self.title, "title")?,
            message: required_text(self.message, "message")?,
            kind: self.kind,
            category: optional_text(Some(self.category)).unwrap_or_else(default_category),
            priority: self.priority,
            action_url,
        })
    }
}

use serde::Deserialize;
use validator::Validate;

use crate::domain::support_ticket::{
    NewSupportTicket, TicketChannel, TicketPriority, TicketStatus,
};
use crate::domain::types::{WorkspaceId, reference_code};
use crate::forms::{FormError, optional_email, optional_text, required_text};

#[derive(Debug, Deserialize, Validate)]
/// Form data for opening a support ticket.
pub struct NewTicketForm {
    #[validate(length(min = 1, max = 200))]
    pub subject: String,
    pub description: Option<String>,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default = "default_priority")]
    pub priority: TicketPriority,
    #[serde(default = "default_channel")]
    pub channel: TicketChannel,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
}

fn default_category() -> String {
    "General".to_string()
}

fn default_priority() -> TicketPriority {
    TicketPriority::Normal
}

fn default_channel() -> TicketChannel {
    TicketChannel::Web
}

impl NewTicketForm {
    pub fn into_new_ticket(self, workspace_id: WorkspaceId) -> Result<NewSupportTicket, FormError> {
        self.validate()?;

        Ok(NewSupportTicket {
            workspace_id,
            ticket_code: reference_code("TKT"),
            subject: required_text(self.subject, "subject")?,
            description: optional_text(self.description),
            category: optional_text(Some(self.category)).unwrap_or_else(default_category),
            priority: self.priority,
            channel: self.channel,
            customer_name: optional_text(self.customer_name),
            customer_email: optional_email(self.customer_email)?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct TicketStatusForm {
    pub status: TicketStatus,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AssignTicketForm {
    #[validate(length(min = 1, max = 200))]
    pub assignee: String,
}

impl AssignTicketForm {
    pub fn into_assignee(self) -> Result<String, FormError> {
        self.validate()?;
        required_text(self.assignee, "assignee")
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ResolveTicketForm {
    pub notes: Option<String>,
}

impl ResolveTicketForm {
    pub fn into_notes(self) -> Option<String> {
        optional_text(self.notes)
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct RateTicketForm {
    #[validate(range(min = 1, max = 5))]
    pub rating: i32,
}

impl RateTicketForm {
    pub fn into_rating(self) -> Result<i32, FormError> {
        self.validate()?;
        Ok(self.rating)
    }
}

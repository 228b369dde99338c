use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::support_ticket::{
    NewSupportTicket, SupportTicket, SupportTicketPatch, TicketStatus,
};
use crate::domain::types::{CustomerEmail, ItemId, TypeConstraintError, WorkspaceId};

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = crate::schema::support_tickets)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SupportTicketRow {
    pub id: String,
    pub workspace_id: i32,
    pub ticket_code: String,
    pub subject: String,
    pub description: Option<String>,
    pub category: String,
    pub priority: String,
    pub status: String,
    pub channel: String,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub assigned_to: Option<String>,
    pub first_response_at: Option<NaiveDateTime>,
    pub resolved_at: Option<NaiveDateTime>,
    pub resolution_notes: Option<String>,
    pub satisfaction_rating: Option<i32>,
    pub archived: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl SupportTicketRow {
    /// New tickets always start in the `new` status.
    pub fn from_new(ticket: &NewSupportTicket, id: ItemId, now: NaiveDateTime) -> Self {
        Self {
            id: id.into_inner(),
            workspace_id: ticket.workspace_id.get(),
            ticket_code: ticket.ticket_code.clone(),
            subject: ticket.subject.clone(),
            description: ticket.description.clone(),
            category: ticket.category.clone(),
            priority: ticket.priority.as_str().to_string(),
            status: TicketStatus::New.as_str().to_string(),
            channel: ticket.channel.as_str().to_string(),
            customer_name: ticket.customer_name.clone(),
            customer_email: ticket
                .customer_email
                .as_ref()
                .map(|e| e.as_str().to_string()),
            assigned_to: None,
            first_response_at: None,
            resolved_at: None,
            resolution_notes: None,
            satisfaction_rating: None,
            archived: false,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::support_tickets)]
pub struct SupportTicketChanges<'a> {
    pub status: Option<&'static str>,
    pub priority: Option<&'static str>,
    pub assigned_to: Option<&'a str>,
    pub first_response_at: Option<NaiveDateTime>,
    pub resolved_at: Option<Option<NaiveDateTime>>,
    pub resolution_notes: Option<&'a str>,
    pub satisfaction_rating: Option<i32>,
    pub archived: Option<bool>,
    pub updated_at: NaiveDateTime,
}

impl<'a> SupportTicketChanges<'a> {
    pub fn new(patch: &'a SupportTicketPatch, now: NaiveDateTime) -> Self {
        Self {
            status: patch.status.map(|s| s.as_str()),
            priority: patch.priority.map(|p| p.as_str()),
            assigned_to: patch.assigned_to.as_deref(),
            first_response_at: patch.first_response_at,
            resolved_at: patch.resolved_at,
            resolution_notes: patch.resolution_notes.as_deref(),
            satisfaction_rating: patch.satisfaction_rating,
            archived: patch.archived,
            updated_at: now,
        }
    }
}

impl TryFrom<SupportTicketRow> for SupportTicket {
    type Error = TypeConstraintError;

    fn try_from(row: SupportTicketRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ItemId::new(row.id)?,
            workspace_id: WorkspaceId::new(row.workspace_id)?,
            ticket_code: row.ticket_code,
            subject: row.subject,
            description: row.description,
            category: row.category,
            priority: row.priority.parse()?,
            status: row.status.parse()?,
            channel: row.channel.parse()?,
            customer_name: row.customer_name,
            customer_email: row.customer_email.map(CustomerEmail::new).transpose()?,
            assigned_to: row.assigned_to,
            first_response_at: row.first_response_at,
            resolved_at: row.resolved_at,
            resolution_notes: row.resolution_notes,
            satisfaction_rating: row.satisfaction_rating,
            archived: row.archived,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

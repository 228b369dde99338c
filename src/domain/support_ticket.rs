use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::booking::percent;
use crate::domain::item::{ItemFlag, ItemPatch, ManagedItem, merge, merge_opt};
use crate::domain::types::{CustomerEmail, ItemId, WorkspaceId, labelled_enum};
use crate::sla::{SlaIndicator, SlaPolicy};

labelled_enum!(
    TicketStatus {
        New => "new",
        Open => "open",
        Pending => "pending",
        OnHold => "on_hold",
        Solved => "solved",
        Closed => "closed",
    }
);

labelled_enum!(
    TicketPriority {
        Low => "low",
        Normal => "normal",
        High => "high",
        Urgent => "urgent",
    }
);

labelled_enum!(
    TicketChannel {
        Chat => "chat",
        Email => "email",
        Phone => "phone",
        Social => "social",
        Web => "web",
        Api => "api",
    }
);

impl TicketStatus {
    /// Statuses counted as open work.
    pub fn is_open(self) -> bool {
        matches!(self, Self::New | Self::Open | Self::Pending)
    }

    /// Statuses that stop the resolution clock.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Solved | Self::Closed)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SupportTicket {
    pub id: ItemId,
    pub workspace_id: WorkspaceId,
    pub ticket_code: String,
    pub subject: String,
    pub description: Option<String>,
    pub category: String,
    pub priority: TicketPriority,
    pub status: TicketStatus,
    pub channel: TicketChannel,
    pub customer_name: Option<String>,
    pub customer_email: Option<CustomerEmail>,
    pub assigned_to: Option<String>,
    pub first_response_at: Option<NaiveDateTime>,
    pub resolved_at: Option<NaiveDateTime>,
    pub resolution_notes: Option<String>,
    pub satisfaction_rating: Option<i32>,
    pub archived: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// First response and resolution readings for one ticket.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TicketSla {
    pub first_response: SlaIndicator,
    pub resolution: SlaIndicator,
}

impl SupportTicket {
    /// Readings against the ticket's priority target, `None` without a target.
    ///
    /// Each clock stops when its milestone is reached.
    pub fn sla(&self, policy: &SlaPolicy<TicketPriority>, now: NaiveDateTime) -> Option<TicketSla> {
        let target = policy.target(&self.priority)?;
        Some(TicketSla {
            first_response: SlaIndicator::evaluate(
                self.created_at,
                self.first_response_at.unwrap_or(now),
                target.first_response_minutes,
            ),
            resolution: SlaIndicator::evaluate(
                self.created_at,
                self.resolved_at.unwrap_or(now),
                target.resolution_minutes,
            ),
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewSupportTicket {
    pub workspace_id: WorkspaceId,
    pub ticket_code: String,
    pub subject: String,
    pub description: Option<String>,
    pub category: String,
    pub priority: TicketPriority,
    pub channel: TicketChannel,
    pub customer_name: Option<String>,
    pub customer_email: Option<CustomerEmail>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SupportTicketPatch {
    pub status: Option<TicketStatus>,
    pub priority: Option<TicketPriority>,
    pub assigned_to: Option<String>,
    pub first_response_at: Option<NaiveDateTime>,
    /// `Some(None)` clears the resolution time.
    pub resolved_at: Option<Option<NaiveDateTime>>,
    pub resolution_notes: Option<String>,
    pub satisfaction_rating: Option<i32>,
    pub archived: Option<bool>,
}

impl SupportTicketPatch {
    pub fn status(status: TicketStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Status change that keeps `resolved_at` consistent: entering a
    /// terminal status stamps it once, leaving one clears it.
    pub fn transition(ticket: &SupportTicket, status: TicketStatus, at: NaiveDateTime) -> Self {
        let resolved_at = match (status.is_terminal(), ticket.resolved_at) {
            (true, None) => Some(Some(at)),
            (false, Some(_)) => Some(None),
            _ => None,
        };
        Self {
            status: Some(status),
            resolved_at,
            ..Self::default()
        }
    }

    pub fn assign(assignee: String) -> Self {
        Self {
            assigned_to: Some(assignee),
            ..Self::default()
        }
    }

    /// Marks the first agent reply; a new ticket moves to `open`.
    pub fn first_response(ticket: &SupportTicket, at: NaiveDateTime) -> Self {
        Self {
            first_response_at: Some(at),
            status: (ticket.status == TicketStatus::New).then_some(TicketStatus::Open),
            ..Self::default()
        }
    }

    pub fn resolve(notes: Option<String>, at: NaiveDateTime) -> Self {
        Self {
            status: Some(TicketStatus::Solved),
            resolved_at: Some(Some(at)),
            resolution_notes: notes,
            ..Self::default()
        }
    }

    pub fn rating(rating: i32) -> Self {
        Self {
            satisfaction_rating: Some(rating),
            ..Self::default()
        }
    }
}

impl ItemPatch for SupportTicketPatch {
    fn flag(flag: ItemFlag, value: bool) -> Option<Self> {
        match flag {
            ItemFlag::Archived => Some(Self {
                archived: Some(value),
                ..Self::default()
            }),
            ItemFlag::Read | ItemFlag::ReminderSent => None,
        }
    }

    fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl ManagedItem for SupportTicket {
    type Status = TicketStatus;
    type Patch = SupportTicketPatch;
    type Draft = NewSupportTicket;

    fn id(&self) -> &ItemId {
        &self.id
    }

    fn workspace_id(&self) -> WorkspaceId {
        self.workspace_id
    }

    fn status(&self) -> TicketStatus {
        self.status
    }

    fn is_archived(&self) -> bool {
        self.archived
    }

    fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.subject.as_str(), self.ticket_code.as_str()];
        if let Some(name) = &self.customer_name {
            fields.push(name.as_str());
        }
        fields
    }

    fn category(&self) -> Option<&str> {
        Some(self.category.as_str())
    }

    fn flag(&self, flag: ItemFlag) -> Option<bool> {
        match flag {
            ItemFlag::Archived => Some(self.archived),
            ItemFlag::Read | ItemFlag::ReminderSent => None,
        }
    }

    fn apply_patch(&mut self, patch: &SupportTicketPatch) {
        merge(&mut self.status, &patch.status);
        merge(&mut self.priority, &patch.priority);
        merge_opt(&mut self.assigned_to, &patch.assigned_to);
        merge_opt(&mut self.first_response_at, &patch.first_response_at);
        merge(&mut self.resolved_at, &patch.resolved_at);
        merge_opt(&mut self.resolution_notes, &patch.resolution_notes);
        merge_opt(&mut self.satisfaction_rating, &patch.satisfaction_rating);
        merge(&mut self.archived, &patch.archived);
    }
}

#[derive(Clone, Debug, Default, Serialize, PartialEq)]
pub struct TicketStats {
    pub total: usize,
    pub open: usize,
    pub solved: usize,
    /// Tickets past their resolution budget.
    pub breached: usize,
    /// Share of tickets within their resolution budget, in percent.
    pub sla_compliance: f64,
    pub avg_satisfaction: Option<f64>,
}

impl TicketStats {
    /// Aggregates over the non-archived tickets.
    pub fn from_items(
        tickets: &[SupportTicket],
        policy: &SlaPolicy<TicketPriority>,
        now: NaiveDateTime,
    ) -> Self {
        let active: Vec<&SupportTicket> = tickets.iter().filter(|t| !t.archived).collect();
        let total = active.len();
        let breached = active
            .iter()
            .filter_map(|t| t.sla(policy, now))
            .filter(|sla| sla.resolution.breached)
            .count();
        let ratings: Vec<i32> = active.iter().filter_map(|t| t.satisfaction_rating).collect();
        let avg_satisfaction = (!ratings.is_empty()).then(|| {
            let avg = f64::from(ratings.iter().sum::<i32>()) / ratings.len() as f64;
            (avg * 10.0).round() / 10.0
        });

        Self {
            total,
            open: active.iter().filter(|t| t.status.is_open()).count(),
            solved: active
                .iter()
                .filter(|t| matches!(t.status, TicketStatus::Solved | TicketStatus::Closed))
                .count(),
            breached,
            sla_compliance: if total == 0 {
                100.0
            } else {
                percent(total - breached, total)
            },
            avg_satisfaction,
        }
    }
}

use serde::Serialize;

use crate::domain::booking::{Booking, BookingStats};
use crate::domain::notification::{Notification, NotificationStats};
use crate::domain::support_ticket::{SupportTicket, TicketSla, TicketStats};
use crate::domain::work_order::{WorkOrder, WorkOrderStats};
use crate::sla::SlaIndicator;

/// Visible bookings plus headline numbers for the whole collection.
///
/// `total` counts the items matched by the query; `stats` cover every
/// non-archived item regardless of the filter.
#[derive(Debug, Serialize)]
pub struct BookingsPage {
    pub items: Vec<Booking>,
    pub total: usize,
    pub stats: BookingStats,
}

#[derive(Debug, Serialize)]
pub struct NotificationsPage {
    pub items: Vec<Notification>,
    pub total: usize,
    pub stats: NotificationStats,
}

#[derive(Debug, Serialize)]
pub struct TicketRow {
    #[serde(flatten)]
    pub ticket: SupportTicket,
    pub sla: Option<TicketSla>,
}

#[derive(Debug, Serialize)]
pub struct TicketsPage {
    pub items: Vec<TicketRow>,
    pub total: usize,
    pub stats: TicketStats,
}

#[derive(Debug, Serialize)]
pub struct WorkOrderRow {
    #[serde(flatten)]
    pub work_order: WorkOrder,
    pub sla: Option<SlaIndicator>,
}

#[derive(Debug, Serialize)]
pub struct WorkOrdersPage {
    pub items: Vec<WorkOrderRow>,
    pub total: usize,
    pub stats: WorkOrderStats,
}

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::item::{ItemFlag, ItemPatch, ManagedItem, merge, merge_opt};
use crate::domain::types::{CustomerEmail, ItemId, PhoneNumber, WorkspaceId, labelled_enum};

labelled_enum!(
    /// Lifecycle of an appointment.
    BookingStatus {
        Pending => "pending",
        Confirmed => "confirmed",
        Completed => "completed",
        Cancelled => "cancelled",
        Rescheduled => "rescheduled",
        NoShow => "no_show",
    }
);

labelled_enum!(
    PaymentStatus {
        Unpaid => "unpaid",
        Partial => "partial",
        Paid => "paid",
        Refunded => "refunded",
    }
);

labelled_enum!(
    BookingType {
        Appointment => "appointment",
        Consultation => "consultation",
        Meeting => "meeting",
        Event => "event",
        Reservation => "reservation",
    }
);

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Booking {
    pub id: ItemId,
    pub workspace_id: WorkspaceId,
    pub booking_number: String,
    pub title: String,
    pub description: Option<String>,
    pub booking_type: BookingType,
    pub customer_name: String,
    pub customer_email: Option<CustomerEmail>,
    pub customer_phone: Option<PhoneNumber>,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub duration_minutes: i32,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub price: f64,
    pub paid_amount: f64,
    pub balance_due: f64,
    pub confirmation_code: Option<String>,
    pub confirmed_at: Option<NaiveDateTime>,
    pub cancelled_at: Option<NaiveDateTime>,
    pub cancellation_reason: Option<String>,
    pub reminder_sent: bool,
    pub reminder_sent_at: Option<NaiveDateTime>,
    pub archived: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Booking {
    /// Whether a reminder should still go out for this booking at `now`.
    pub fn needs_reminder(&self, now: NaiveDateTime) -> bool {
        self.start_time > now
            && !self.reminder_sent
            && self.customer_email.is_some()
            && matches!(
                self.status,
                BookingStatus::Pending | BookingStatus::Confirmed
            )
    }
}

/// Validated payload for a booking that has not been persisted yet.
#[derive(Clone, Debug, PartialEq)]
pub struct NewBooking {
    pub workspace_id: WorkspaceId,
    pub booking_number: String,
    pub title: String,
    pub description: Option<String>,
    pub booking_type: BookingType,
    pub customer_name: String,
    pub customer_email: Option<CustomerEmail>,
    pub customer_phone: Option<PhoneNumber>,
    pub start_time: NaiveDateTime,
    pub duration_minutes: i32,
    pub price: f64,
}

/// `start + minutes`, or `None` past the representable calendar.
pub fn checked_end(start: NaiveDateTime, minutes: i32) -> Option<NaiveDateTime> {
    start.checked_add_signed(Duration::minutes(i64::from(minutes)))
}

impl NewBooking {
    /// End of the appointment derived from its start and duration.
    ///
    /// Saturates at [`NaiveDateTime::MAX`]; forms reject such starts.
    pub fn end_time(&self) -> NaiveDateTime {
        checked_end(self.start_time, self.duration_minutes).unwrap_or(NaiveDateTime::MAX)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BookingPatch {
    pub title: Option<String>,
    pub status: Option<BookingStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub start_time: Option<NaiveDateTime>,
    pub end_time: Option<NaiveDateTime>,
    pub paid_amount: Option<f64>,
    pub balance_due: Option<f64>,
    pub confirmation_code: Option<String>,
    pub confirmed_at: Option<NaiveDateTime>,
    pub cancelled_at: Option<NaiveDateTime>,
    pub cancellation_reason: Option<String>,
    pub reminder_sent: Option<bool>,
    pub reminder_sent_at: Option<NaiveDateTime>,
    pub archived: Option<bool>,
}

impl BookingPatch {
    pub fn confirm(code: String, at: NaiveDateTime) -> Self {
        Self {
            status: Some(BookingStatus::Confirmed),
            confirmation_code: Some(code),
            confirmed_at: Some(at),
            ..Self::default()
        }
    }

    pub fn cancel(reason: String, at: NaiveDateTime) -> Self {
        Self {
            status: Some(BookingStatus::Cancelled),
            cancellation_reason: Some(reason),
            cancelled_at: Some(at),
            ..Self::default()
        }
    }

    /// Moves the booking keeping its duration.
    ///
    /// Returns `None` when the new end is not representable.
    pub fn reschedule(booking: &Booking, start_time: NaiveDateTime) -> Option<Self> {
        let end_time = checked_end(start_time, booking.duration_minutes)?;
        Some(Self {
            status: Some(BookingStatus::Rescheduled),
            start_time: Some(start_time),
            end_time: Some(end_time),
            ..Self::default()
        })
    }

    pub fn reminder_sent(at: NaiveDateTime) -> Self {
        Self {
            reminder_sent: Some(true),
            reminder_sent_at: Some(at),
            ..Self::default()
        }
    }
}

impl ItemPatch for BookingPatch {
    fn flag(flag: ItemFlag, value: bool) -> Option<Self> {
        match flag {
            ItemFlag::Archived => Some(Self {
                archived: Some(value),
                ..Self::default()
            }),
            ItemFlag::ReminderSent => Some(Self {
                reminder_sent: Some(value),
                ..Self::default()
            }),
            ItemFlag::Read => None,
        }
    }

    fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl ManagedItem for Booking {
    type Status = BookingStatus;
    type Patch = BookingPatch;
    type Draft = NewBooking;

    fn id(&self) -> &ItemId {
        &self.id
    }

    fn workspace_id(&self) -> WorkspaceId {
        self.workspace_id
    }

    fn status(&self) -> BookingStatus {
        self.status
    }

    fn is_archived(&self) -> bool {
        self.archived
    }

    fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }

    fn occurs_at(&self) -> NaiveDateTime {
        self.start_time
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.title.as_str(),
            self.customer_name.as_str(),
            self.booking_number.as_str(),
        ]
    }

    fn category(&self) -> Option<&str> {
        Some(self.booking_type.as_str())
    }

    fn flag(&self, flag: ItemFlag) -> Option<bool> {
        match flag {
            ItemFlag::Archived => Some(self.archived),
            ItemFlag::ReminderSent => Some(self.reminder_sent),
            ItemFlag::Read => None,
        }
    }

    fn apply_patch(&mut self, patch: &BookingPatch) {
        merge(&mut self.title, &patch.title);
        merge(&mut self.status, &patch.status);
        merge(&mut self.payment_status, &patch.payment_status);
        merge(&mut self.start_time, &patch.start_time);
        merge(&mut self.end_time, &patch.end_time);
        merge(&mut self.paid_amount, &patch.paid_amount);
        merge(&mut self.balance_due, &patch.balance_due);
        merge_opt(&mut self.confirmation_code, &patch.confirmation_code);
        merge_opt(&mut self.confirmed_at, &patch.confirmed_at);
        merge_opt(&mut self.cancelled_at, &patch.cancelled_at);
        merge_opt(&mut self.cancellation_reason, &patch.cancellation_reason);
        merge(&mut self.reminder_sent, &patch.reminder_sent);
        merge_opt(&mut self.reminder_sent_at, &patch.reminder_sent_at);
        merge(&mut self.archived, &patch.archived);
    }
}

/// Headline numbers of the bookings dashboard.
#[derive(Clone, Debug, Default, Serialize, PartialEq)]
pub struct BookingStats {
    pub total: usize,
    pub confirmed: usize,
    pub pending: usize,
    pub completed: usize,
    pub cancelled: usize,
    pub total_revenue: f64,
    pub paid_revenue: f64,
    pub pending_payments: f64,
    pub avg_duration_minutes: i64,
    pub no_show_rate: f64,
    pub conversion_rate: f64,
}

impl BookingStats {
    /// Aggregates over the non-archived bookings.
    pub fn from_items(bookings: &[Booking]) -> Self {
        let active: Vec<&Booking> = bookings.iter().filter(|b| !b.archived).collect();
        let total = active.len();
        let count = |status: BookingStatus| active.iter().filter(|b| b.status == status).count();

        let cancelled = count(BookingStatus::Cancelled);
        let completed = count(BookingStatus::Completed);
        let avg_duration = if total > 0 {
            let sum: i64 = active.iter().map(|b| i64::from(b.duration_minutes)).sum();
            (sum as f64 / total as f64).round() as i64
        } else {
            0
        };

        Self {
            total,
            confirmed: count(BookingStatus::Confirmed),
            pending: count(BookingStatus::Pending),
            completed,
            cancelled,
            total_revenue: active.iter().map(|b| b.price).sum(),
            paid_revenue: active
                .iter()
                .filter(|b| b.payment_status == PaymentStatus::Paid)
                .map(|b| b.price)
                .sum(),
            pending_payments: active
                .iter()
                .filter(|b| b.payment_status != PaymentStatus::Paid)
                .map(|b| b.balance_due)
                .sum(),
            avg_duration_minutes: avg_duration,
            no_show_rate: percent(cancelled, total),
            conversion_rate: percent(completed, total),
        }
    }
}

/// Percentage rounded to one decimal place; zero when `total` is zero.
pub(crate) fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (part as f64 / total as f64 * 1000.0).round() / 10.0
}

#[cfg(test)]
pub(crate) mod tests {
    use chrono::NaiveDate;

    use super::*;

    pub(crate) fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    pub(crate) fn booking(id: &str, status: BookingStatus) -> Booking {
        Booking {
            id: ItemId::new(id).unwrap(),
            workspace_id: WorkspaceId::new(1).unwrap(),
            booking_number: format!("BK-{id}"),
            title: format!("Session {id}"),
            description: None,
            booking_type: BookingType::Appointment,
            customer_name: "Jane Client".to_string(),
            customer_email: Some(CustomerEmail::new("jane@example.com").unwrap()),
            customer_phone: None,
            start_time: at(10, 9),
            end_time: at(10, 10),
            duration_minutes: 60,
            status,
            payment_status: PaymentStatus::Unpaid,
            price: 100.0,
            paid_amount: 0.0,
            balance_due: 100.0,
            confirmation_code: None,
            confirmed_at: None,
            cancelled_at: None,
            cancellation_reason: None,
            reminder_sent: false,
            reminder_sent_at: None,
            archived: false,
            created_at: at(1, 8),
            updated_at: at(1, 8),
        }
    }

    #[test]
    fn stats_cover_non_archived_bookings() {
        let mut paid = booking("1", BookingStatus::Completed);
        paid.payment_status = PaymentStatus::Paid;
        paid.balance_due = 0.0;
        let mut archived = booking("4", BookingStatus::Pending);
        archived.archived = true;
        let mut long = booking("3", BookingStatus::Cancelled);
        long.duration_minutes = 90;

        let stats = BookingStats::from_items(&[
            paid,
            booking("2", BookingStatus::Pending),
            long,
            archived,
        ]);

        assert_eq!(stats.total, 3);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.cancelled, 1);
        assert_eq!(stats.total_revenue, 300.0);
        assert_eq!(stats.paid_revenue, 100.0);
        assert_eq!(stats.pending_payments, 200.0);
        assert_eq!(stats.avg_duration_minutes, 70);
        assert_eq!(stats.no_show_rate, 33.3);
        assert_eq!(stats.conversion_rate, 33.3);
    }

    #[test]
    fn stats_of_empty_collection_are_zero() {
        assert_eq!(BookingStats::from_items(&[]), BookingStats::default());
    }

    #[test]
    fn reschedule_keeps_duration() {
        let booking = booking("1", BookingStatus::Confirmed);
        let patch = BookingPatch::reschedule(&booking, at(12, 14)).unwrap();
        assert_eq!(patch.end_time, Some(at(12, 15)));
        assert_eq!(patch.status, Some(BookingStatus::Rescheduled));
    }

    #[test]
    fn reschedule_past_the_calendar_is_refused() {
        let booking = booking("1", BookingStatus::Confirmed);
        let start = NaiveDateTime::MAX - Duration::minutes(1);

        assert_eq!(BookingPatch::reschedule(&booking, start), None);
    }

    #[test]
    fn draft_end_saturates_instead_of_overflowing() {
        let booking = booking("1", BookingStatus::Pending);
        let draft = NewBooking {
            workspace_id: booking.workspace_id,
            booking_number: booking.booking_number,
            title: booking.title,
            description: None,
            booking_type: booking.booking_type,
            customer_name: booking.customer_name,
            customer_email: None,
            customer_phone: None,
            start_time: NaiveDateTime::MAX - Duration::minutes(1),
            duration_minutes: 60,
            price: 0.0,
        };

        assert_eq!(draft.end_time(), NaiveDateTime::MAX);
    }

    #[test]
    fn reminder_candidates_are_upcoming_with_email() {
        let now = at(5, 12);
        let mut booking = booking("1", BookingStatus::Confirmed);
        assert!(booking.needs_reminder(now));

        booking.reminder_sent = true;
        assert!(!booking.needs_reminder(now));

        booking.reminder_sent = false;
        booking.customer_email = None;
        assert!(!booking.needs_reminder(now));

        booking.customer_email = Some(CustomerEmail::new("a@b.co").unwrap());
        assert!(!booking.needs_reminder(at(11, 0)));
    }

    #[test]
    fn read_flag_is_not_supported() {
        assert!(BookingPatch::flag(ItemFlag::Read, true).is_none());
        assert!(booking("1", BookingStatus::Pending).flag(ItemFlag::Read).is_none());
    }
}

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::booking::{Booking, BookingPatch, BookingStatus, NewBooking, PaymentStatus};
use crate::domain::types::{CustomerEmail, ItemId, PhoneNumber, TypeConstraintError, WorkspaceId};

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = crate::schema::bookings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
/// Diesel model for [`Booking`].
pub struct BookingRow {
    pub id: String,
    pub workspace_id: i32,
    pub booking_number: String,
    pub title: String,
    pub description: Option<String>,
    pub booking_type: String,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub duration_minutes: i32,
    pub status: String,
    pub payment_status: String,
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

impl BookingRow {
    /// Builds the row stored for a new booking: pending, unpaid, full balance.
    pub fn from_new(booking: &NewBooking, id: ItemId, now: NaiveDateTime) -> Self {
        Self {
            id: id.into_inner(),
            workspace_id: booking.workspace_id.get(),
            booking_number: booking.booking_number.clone(),
            title: booking.title.clone(),
            description: booking.description.clone(),
            booking_type: booking.booking_type.as_str().to_string(),
            customer_name: booking.customer_name.clone(),
            customer_email: booking.customer_email.as_ref().map(|e| e.as_str().to_string()),
            customer_phone: booking.customer_phone.as_ref().map(|p| p.as_str().to_string()),
            start_time: booking.start_time,
            end_time: booking.end_time(),
            duration_minutes: booking.duration_minutes,
            status: BookingStatus::Pending.as_str().to_string(),
            payment_status: PaymentStatus::Unpaid.as_str().to_string(),
            price: booking.price,
            paid_amount: 0.0,
            balance_due: booking.price,
            confirmation_code: None,
            confirmed_at: None,
            cancelled_at: None,
            cancellation_reason: None,
            reminder_sent: false,
            reminder_sent_at: None,
            archived: false,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::bookings)]
/// Columns touched by a [`BookingPatch`].
pub struct BookingChanges<'a> {
    pub title: Option<&'a str>,
    pub status: Option<&'static str>,
    pub payment_status: Option<&'static str>,
    pub start_time: Option<NaiveDateTime>,
    pub end_time: Option<NaiveDateTime>,
    pub paid_amount: Option<f64>,
    pub balance_due: Option<f64>,
    pub confirmation_code: Option<&'a str>,
    pub confirmed_at: Option<NaiveDateTime>,
    pub cancelled_at: Option<NaiveDateTime>,
    pub cancellation_reason: Option<&'a str>,
    pub reminder_sent: Option<bool>,
    pub reminder_sent_at: Option<NaiveDateTime>,
    pub archived: Option<bool>,
    pub updated_at: NaiveDateTime,
}

impl<'a> BookingChanges<'a> {
    pub fn new(patch: &'a BookingPatch, now: NaiveDateTime) -> Self {
        Self {
            title: patch.title.as_deref(),
            status: patch.status.map(|s| s.as_str()),
            payment_status: patch.payment_status.map(|s| s.as_str()),
            start_time: patch.start_time,
            end_time: patch.end_time,
            paid_amount: patch.paid_amount,
            balance_due: patch.balance_due,
            confirmation_code: patch.confirmation_code.as_deref(),
            confirmed_at: patch.confirmed_at,
            cancelled_at: patch.cancelled_at,
            cancellation_reason: patch.cancellation_reason.as_deref(),
            reminder_sent: patch.reminder_sent,
            reminder_sent_at: patch.reminder_sent_at,
            archived: patch.archived,
            updated_at: now,
        }
    }
}

impl TryFrom<BookingRow> for Booking {
    type Error = TypeConstraintError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ItemId::new(row.id)?,
            workspace_id: WorkspaceId::new(row.workspace_id)?,
            booking_number: row.booking_number,
            title: row.title,
            description: row.description,
            booking_type: row.booking_type.parse()?,
            customer_name: row.customer_name,
            customer_email: row.customer_email.map(CustomerEmail::new).transpose()?,
            customer_phone: row.customer_phone.map(PhoneNumber::new).transpose()?,
            start_time: row.start_time,
            end_time: row.end_time,
            duration_minutes: row.duration_minutes,
            status: row.status.parse()?,
            payment_status: row.payment_status.parse()?,
            price: row.price,
            paid_amount: row.paid_amount,
            balance_due: row.balance_due,
            confirmation_code: row.confirmation_code,
            confirmed_at: row.confirmed_at,
            cancelled_at: row.cancelled_at,
            cancellation_reason: row.cancellation_reason,
            reminder_sent: row.reminder_sent,
            reminder_sent_at: row.reminder_sent_at,
            archived: row.archived,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::booking::tests::at;
    use crate::domain::booking::BookingType;

    fn draft() -> NewBooking {
        NewBooking {
            workspace_id: WorkspaceId::new(3).unwrap(),
            booking_number: "BK-1".to_string(),
            title: "Strategy call".to_string(),
            description: None,
            booking_type: BookingType::Consultation,
            customer_name: "Sam".to_string(),
            customer_email: Some(CustomerEmail::new("sam@example.com").unwrap()),
            customer_phone: None,
            start_time: at(20, 10),
            duration_minutes: 45,
            price: 150.0,
        }
    }

    #[test]
    fn new_row_starts_pending_with_full_balance() {
        let row = BookingRow::from_new(&draft(), ItemId::new("b1").unwrap(), at(1, 0));
        let booking = Booking::try_from(row).unwrap();

        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.payment_status, PaymentStatus::Unpaid);
        assert_eq!(booking.balance_due, 150.0);
        assert_eq!(booking.end_time, at(20, 10) + chrono::Duration::minutes(45));
    }

    #[test]
    fn unknown_status_is_rejected() {
        let mut row = BookingRow::from_new(&draft(), ItemId::new("b1").unwrap(), at(1, 0));
        row.status = "lost".to_string();
        assert!(Booking::try_from(row).is_err());
    }

    #[test]
    fn changes_only_carry_patched_columns() {
        let patch = BookingPatch::cancel("Client sick".to_string(), at(2, 9));
        let changes = BookingChanges::new(&patch, at(2, 9));

        assert_eq!(changes.status, Some("cancelled"));
        assert_eq!(changes.cancellation_reason, Some("Client sick"));
        assert!(changes.title.is_none());
        assert!(changes.archived.is_none());
    }
}

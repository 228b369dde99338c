use chrono::NaiveDateTime;
use serde::Deserialize;
use validator::Validate;

use crate::domain::booking::{BookingType, NewBooking, checked_end};
use crate::domain::types::{WorkspaceId, reference_code};
use crate::forms::{FormError, optional_email, optional_phone, optional_text, required_text};

#[derive(Debug, Deserialize, Validate)]
/// Form data for scheduling a new booking.
pub struct NewBookingForm {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub description: Option<String>,
    #[serde(default = "default_booking_type")]
    pub booking_type: BookingType,
    #[validate(length(min = 1, max = 200))]
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub start_time: NaiveDateTime,
    #[validate(range(min = 1, max = 1440))]
    pub duration_minutes: i32,
    #[validate(range(min = 0.0))]
    #[serde(default)]
    pub price: f64,
}

/// Upper bound enforced on `duration_minutes`.
const MAX_DURATION_MINUTES: i32 = 1440;

fn default_booking_type() -> BookingType {
    BookingType::Appointment
}

impl NewBookingForm {
    /// Validates the form and assigns a fresh booking number.
    pub fn into_new_booking(
        self,
        workspace_id: WorkspaceId,
        now: NaiveDateTime,
    ) -> Result<NewBooking, FormError> {
        self.validate()?;
        if self.start_time < now {
            return Err(FormError::PastStartTime);
        }
        if checked_end(self.start_time, self.duration_minutes).is_none() {
            return Err(FormError::InvalidSchedule);
        }

        Ok(NewBooking {
            workspace_id,
            booking_number: reference_code("BK"),
            title: required_text(self.title, "title")?,
            description: optional_text(self.description),
            booking_type: self.booking_type,
            customer_name: required_text(self.customer_name, "customer name")?,
            customer_email: optional_email(self.customer_email)?,
            customer_phone: optional_phone(self.customer_phone)?,
            start_time: self.start_time,
            duration_minutes: self.duration_minutes,
            price: self.price,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct RescheduleForm {
    pub start_time: NaiveDateTime,
}

impl RescheduleForm {
    /// Rejects past starts and starts with no room for a full-day booking.
    pub fn into_start_time(self, now: NaiveDateTime) -> Result<NaiveDateTime, FormError> {
        if self.start_time < now {
            return Err(FormError::PastStartTime);
        }
        if checked_end(self.start_time, MAX_DURATION_MINUTES).is_none() {
            return Err(FormError::InvalidSchedule);
        }
        Ok(self.start_time)
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CancelBookingForm {
    #[validate(length(min = 1, max = 500))]
    pub reason: String,
}

impl CancelBookingForm {
    pub fn into_reason(self) -> Result<String, FormError> {
        self.validate()?;
        required_text(self.reason, "reason")
    }
}

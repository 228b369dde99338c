//! CSV rendering of list projections.

use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

use crate::domain::booking::Booking;
use crate::domain::notification::Notification;
use crate::domain::support_ticket::SupportTicket;
use crate::domain::work_order::WorkOrder;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to flush csv writer: {0}")]
    Flush(String),

    #[error("csv output is not valid utf-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// A row type that can be written to a CSV export.
pub trait CsvRecord {
    const HEADERS: &'static [&'static str];

    /// Cell values in [`CsvRecord::HEADERS`] order.
    fn record(&self) -> Vec<String>;
}

/// Writes a header row followed by one row per item.
///
/// Cells containing delimiters, quotes or line breaks are quoted.
pub fn export_csv<'a, T, I>(items: I) -> Result<String, ExportError>
where
    T: CsvRecord + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(T::HEADERS)?;
    for item in items {
        writer.write_record(item.record())?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Flush(e.error().to_string()))?;
    Ok(String::from_utf8(bytes)?)
}

/// `<collection>-<YYYY-MM-DD>.csv`
pub fn export_filename(collection: &str, date: NaiveDate) -> String {
    format!("{collection}-{}.csv", date.format("%Y-%m-%d"))
}

fn timestamp(value: NaiveDateTime) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

fn optional_timestamp(value: Option<NaiveDateTime>) -> String {
    value.map(timestamp).unwrap_or_default()
}

fn optional<T: ToString>(value: Option<&T>) -> String {
    value.map(ToString::to_string).unwrap_or_default()
}

impl CsvRecord for Booking {
    const HEADERS: &'static [&'static str] = &[
        "Booking Number",
        "Title",
        "Customer",
        "Email",
        "Type",
        "Start",
        "End",
        "Duration (min)",
        "Status",
        "Payment Status",
        "Price",
        "Paid",
        "Balance Due",
        "Confirmation Code",
        "Archived",
    ];

    fn record(&self) -> Vec<String> {
        vec![
            self.booking_number.clone(),
            self.title.clone(),
            self.customer_name.clone(),
            optional(self.customer_email.as_ref()),
            self.booking_type.to_string(),
            timestamp(self.start_time),
            timestamp(self.end_time),
            self.duration_minutes.to_string(),
            self.status.to_string(),
            self.payment_status.to_string(),
            format!("{:.2}", self.price),
            format!("{:.2}", self.paid_amount),
            format!("{:.2}", self.balance_due),
            self.confirmation_code.clone().unwrap_or_default(),
            self.archived.to_string(),
        ]
    }
}

impl CsvRecord for Notification {
    const HEADERS: &'static [&'static str] = &[
        "Title", "Message", "Type", "Category", "Priority", "Read", "Archived", "Created",
    ];

    fn record(&self) -> Vec<String> {
        vec![
            self.title.clone(),
            self.message.clone(),
            self.kind.to_string(),
            self.category.clone(),
            self.priority.to_string(),
            self.read.to_string(),
            self.archived.to_string(),
            timestamp(self.created_at),
        ]
    }
}

impl CsvRecord for SupportTicket {
    const HEADERS: &'static [&'static str] = &[
        "Ticket",
        "Subject",
        "Customer",
        "Email",
        "Category",
        "Priority",
        "Status",
        "Channel",
        "Assigned To",
        "Created",
        "First Response",
        "Resolved",
        "Satisfaction",
    ];

    fn record(&self) -> Vec<String> {
        vec![
            self.ticket_code.clone(),
            self.subject.clone(),
            self.customer_name.clone().unwrap_or_default(),
            optional(self.customer_email.as_ref()),
            self.category.clone(),
            self.priority.to_string(),
            self.status.to_string(),
            self.channel.to_string(),
            self.assigned_to.clone().unwrap_or_default(),
            timestamp(self.created_at),
            optional_timestamp(self.first_response_at),
            optional_timestamp(self.resolved_at),
            optional(self.satisfaction_rating.as_ref()),
        ]
    }
}

impl CsvRecord for WorkOrder {
    const HEADERS: &'static [&'static str] = &[
        "Order Number",
        "Title",
        "Type",
        "Asset",
        "Location",
        "Priority",
        "Status",
        "Scheduled Start",
        "Scheduled End",
        "Estimated Hours",
        "Actual Hours",
        "Progress",
        "Downtime (min)",
    ];

    fn record(&self) -> Vec<String> {
        vec![
            self.order_number.clone(),
            self.title.clone(),
            self.maintenance_type.to_string(),
            self.asset.clone(),
            self.location.clone().unwrap_or_default(),
            self.priority.to_string(),
            self.status.to_string(),
            timestamp(self.scheduled_start),
            timestamp(self.scheduled_end),
            format!("{:.1}", self.estimated_hours),
            format!("{:.1}", self.actual_hours),
            self.progress.to_string(),
            self.downtime_minutes.to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::booking::BookingStatus;
    use crate::domain::booking::tests::booking;
    use crate::domain::support_ticket::TicketStatus;
    use crate::domain::support_ticket::tests::ticket;

    #[test]
    fn special_characters_are_quoted() {
        let mut item = ticket("1", TicketStatus::Open);
        item.subject = "Broken, \"urgent\"\nsecond line".to_string();

        let csv = export_csv([&item]).unwrap();
        let mut lines = csv.splitn(2, '\n');

        assert!(lines.next().unwrap().starts_with("Ticket,Subject,"));
        assert!(csv.contains("\"Broken, \"\"urgent\"\"\nsecond line\""));
    }

    #[test]
    fn empty_projection_yields_header_only() {
        let csv = export_csv::<Booking, _>(Vec::<&Booking>::new()).unwrap();
        assert_eq!(csv.lines().count(), 1);
        assert!(csv.starts_with("Booking Number,Title,Customer"));
    }

    #[test]
    fn booking_row_follows_headers() {
        let item = booking("1", BookingStatus::Confirmed);
        let csv = export_csv([&item]).unwrap();
        let reader_rows: Vec<csv::StringRecord> = csv::Reader::from_reader(csv.as_bytes())
            .records()
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(reader_rows.len(), 1);
        assert_eq!(reader_rows[0].len(), Booking::HEADERS.len());
        assert_eq!(&reader_rows[0][0], "BK-1");
        assert_eq!(&reader_rows[0][8], "confirmed");
        assert_eq!(&reader_rows[0][10], "100.00");
    }

    #[test]
    fn filename_uses_collection_and_date() {
        let date = NaiveDate::from_ymd_opt(2026, 7, 1).unwrap();
        assert_eq!(export_filename("bookings", date), "bookings-2026-07-01.csv");
    }
}

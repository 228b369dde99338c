use crate::domain::booking::{Booking, BookingPatch, BookingStats, BookingStatus};
use crate::domain::types::{ItemId, reference_code};
use crate::dto::pages::BookingsPage;
use crate::dto::{CsvExport, ListQuery};
use crate::forms::FormError;
use crate::forms::bookings::{CancelBookingForm, NewBookingForm, RescheduleForm};
use crate::repository::{ItemReader, ItemWriter};
use crate::services::{
    Scope, ServiceError, ServiceResult, export_items, list_projection, load_state, update_item,
};
use crate::state::ListState;
use crate::state::sync::{BatchOutcome, SyncedList};

pub fn list_bookings<R>(repo: &R, scope: &Scope, query: &ListQuery) -> ServiceResult<BookingsPage>
where
    R: ItemReader<Booking> + ?Sized,
{
    let filter = query.to_filter::<BookingStatus>()?;
    let (state, items) = list_projection(repo, scope, &filter)?;
    Ok(BookingsPage {
        total: items.len(),
        items,
        stats: BookingStats::from_items(state.items()),
    })
}

pub fn export_bookings<R>(repo: &R, scope: &Scope, query: &ListQuery) -> ServiceResult<CsvExport>
where
    R: ItemReader<Booking> + ?Sized,
{
    let filter = query.to_filter::<BookingStatus>()?;
    export_items::<Booking, _>(repo, scope, &filter, "bookings")
}

pub fn create_booking<R>(repo: &R, scope: &Scope, form: NewBookingForm) -> ServiceResult<Booking>
where
    R: ItemWriter<Booking> + ?Sized,
{
    let draft = form.into_new_booking(scope.workspace_id, scope.now)?;
    let booking = SyncedList::new(ListState::new(), repo).create(&draft)?;
    log::info!(
        "Booking {} created in workspace {}",
        booking.booking_number,
        scope.workspace_id
    );
    Ok(booking)
}

/// Confirms a pending or rescheduled booking with a fresh confirmation code.
pub fn confirm_booking<R>(repo: &R, scope: &Scope, id: &ItemId) -> ServiceResult<Booking>
where
    R: ItemReader<Booking> + ItemWriter<Booking> + ?Sized,
{
    update_item(repo, scope, id, |booking: &Booking| {
        if !matches!(
            booking.status,
            BookingStatus::Pending | BookingStatus::Rescheduled
        ) {
            return Err(ServiceError::Conflict(format!(
                "booking is {}",
                booking.status
            )));
        }
        Ok(BookingPatch::confirm(reference_code("CONF"), scope.now))
    })
}

pub fn cancel_booking<R>(
    repo: &R,
    scope: &Scope,
    id: &ItemId,
    form: CancelBookingForm,
) -> ServiceResult<Booking>
where
    R: ItemReader<Booking> + ItemWriter<Booking> + ?Sized,
{
    let reason = form.into_reason()?;
    update_item(repo, scope, id, |booking: &Booking| {
        ensure_open(booking)?;
        Ok(BookingPatch::cancel(reason, scope.now))
    })
}

pub fn reschedule_booking<R>(
    repo: &R,
    scope: &Scope,
    id: &ItemId,
    form: RescheduleForm,
) -> ServiceResult<Booking>
where
    R: ItemReader<Booking> + ItemWriter<Booking> + ?Sized,
{
    let start_time = form.into_start_time(scope.now)?;
    update_item(repo, scope, id, |booking: &Booking| {
        ensure_open(booking)?;
        BookingPatch::reschedule(booking, start_time)
            .ok_or_else(|| FormError::InvalidSchedule.into())
    })
}

/// Flags the reminder as sent; delivery itself happens elsewhere.
pub fn send_reminder<R>(repo: &R, scope: &Scope, id: &ItemId) -> ServiceResult<Booking>
where
    R: ItemReader<Booking> + ItemWriter<Booking> + ?Sized,
{
    update_item(repo, scope, id, |booking: &Booking| {
        if booking.customer_email.is_none() {
            return Err(ServiceError::Conflict(
                "booking has no customer email".to_string(),
            ));
        }
        Ok(BookingPatch::reminder_sent(scope.now))
    })
}

pub fn confirm_all_pending<R>(repo: &R, scope: &Scope) -> ServiceResult<BatchOutcome>
where
    R: ItemReader<Booking> + ItemWriter<Booking> + ?Sized,
{
    let state = load_state(repo, scope)?;
    let ids = select_ids(&state, |b| b.status == BookingStatus::Pending);
    let outcome = SyncedList::new(state, repo)
        .patch_each(&ids, |_| BookingPatch::confirm(reference_code("CONF"), scope.now));
    log::info!(
        "Confirmed {} pending bookings in workspace {}",
        outcome.succeeded.len(),
        scope.workspace_id
    );
    Ok(outcome)
}

pub fn cancel_all_pending<R>(
    repo: &R,
    scope: &Scope,
    form: CancelBookingForm,
) -> ServiceResult<BatchOutcome>
where
    R: ItemReader<Booking> + ItemWriter<Booking> + ?Sized,
{
    let reason = form.into_reason()?;
    let state = load_state(repo, scope)?;
    let ids = select_ids(&state, |b| b.status == BookingStatus::Pending);
    let outcome =
        SyncedList::new(state, repo).patch_many(&ids, &BookingPatch::cancel(reason, scope.now));
    log::info!(
        "Cancelled {} pending bookings in workspace {}",
        outcome.succeeded.len(),
        scope.workspace_id
    );
    Ok(outcome)
}

/// Marks reminders for every upcoming booking that still needs one.
pub fn send_all_reminders<R>(repo: &R, scope: &Scope) -> ServiceResult<BatchOutcome>
where
    R: ItemReader<Booking> + ItemWriter<Booking> + ?Sized,
{
    let state = load_state(repo, scope)?;
    let ids = select_ids(&state, |b| b.needs_reminder(scope.now));
    Ok(SyncedList::new(state, repo).patch_many(&ids, &BookingPatch::reminder_sent(scope.now)))
}

fn ensure_open(booking: &Booking) -> ServiceResult<()> {
    match booking.status {
        BookingStatus::Cancelled | BookingStatus::Completed => Err(ServiceError::Conflict(
            format!("booking is {}", booking.status),
        )),
        _ => Ok(()),
    }
}

fn select_ids<F>(state: &ListState<Booking>, predicate: F) -> Vec<ItemId>
where
    F: Fn(&Booking) -> bool,
{
    state
        .items()
        .iter()
        .filter(|b| !b.archived && predicate(b))
        .map(|b| b.id.clone())
        .collect()
}

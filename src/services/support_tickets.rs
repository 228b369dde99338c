use crate::domain::support_ticket::{
    SupportTicket, SupportTicketPatch, TicketStats, TicketStatus,
};
use crate::domain::types::ItemId;
use crate::dto::pages::{TicketRow, TicketsPage};
use crate::dto::{CsvExport, ListQuery};
use crate::forms::support_tickets::{
    AssignTicketForm, NewTicketForm, RateTicketForm, ResolveTicketForm, TicketStatusForm,
};
use crate::repository::{ItemReader, ItemWriter};
use crate::services::{
    Scope, ServiceError, ServiceResult, export_items, list_projection, update_item,
};
use crate::sla::SlaPolicy;
use crate::state::ListState;
use crate::state::sync::SyncedList;

/// Visible tickets with their SLA readings at `scope.now`.
pub fn list_tickets<R>(repo: &R, scope: &Scope, query: &ListQuery) -> ServiceResult<TicketsPage>
where
    R: ItemReader<SupportTicket> + ?Sized,
{
    let filter = query.to_filter::<TicketStatus>()?;
    let policy = SlaPolicy::support_desk();
    let (state, items) = list_projection(repo, scope, &filter)?;

    Ok(TicketsPage {
        total: items.len(),
        items: items
            .into_iter()
            .map(|ticket| TicketRow {
                sla: ticket.sla(&policy, scope.now),
                ticket,
            })
            .collect(),
        stats: TicketStats::from_items(state.items(), &policy, scope.now),
    })
}

pub fn export_tickets<R>(repo: &R, scope: &Scope, query: &ListQuery) -> ServiceResult<CsvExport>
where
    R: ItemReader<SupportTicket> + ?Sized,
{
    let filter = query.to_filter::<TicketStatus>()?;
    export_items::<SupportTicket, _>(repo, scope, &filter, "tickets")
}

pub fn create_ticket<R>(repo: &R, scope: &Scope, form: NewTicketForm) -> ServiceResult<SupportTicket>
where
    R: ItemWriter<SupportTicket> + ?Sized,
{
    let draft = form.into_new_ticket(scope.workspace_id)?;
    let ticket = SyncedList::new(ListState::new(), repo).create(&draft)?;
    log::info!(
        "Ticket {} opened in workspace {}",
        ticket.ticket_code,
        scope.workspace_id
    );
    Ok(ticket)
}

/// Entering `solved` or `closed` stamps the resolution time; reopening
/// clears it.
pub fn change_status<R>(
    repo: &R,
    scope: &Scope,
    id: &ItemId,
    form: TicketStatusForm,
) -> ServiceResult<SupportTicket>
where
    R: ItemReader<SupportTicket> + ItemWriter<SupportTicket> + ?Sized,
{
    update_item(repo, scope, id, |ticket: &SupportTicket| {
        Ok(SupportTicketPatch::transition(
            ticket,
            form.status,
            scope.now,
        ))
    })
}

pub fn assign_ticket<R>(
    repo: &R,
    scope: &Scope,
    id: &ItemId,
    form: AssignTicketForm,
) -> ServiceResult<SupportTicket>
where
    R: ItemReader<SupportTicket> + ItemWriter<SupportTicket> + ?Sized,
{
    let assignee = form.into_assignee()?;
    update_item(repo, scope, id, |_: &SupportTicket| {
        Ok(SupportTicketPatch::assign(assignee))
    })
}

pub fn record_first_response<R>(
    repo: &R,
    scope: &Scope,
    id: &ItemId,
) -> ServiceResult<SupportTicket>
where
    R: ItemReader<SupportTicket> + ItemWriter<SupportTicket> + ?Sized,
{
    update_item(repo, scope, id, |ticket: &SupportTicket| {
        if ticket.first_response_at.is_some() {
            return Err(ServiceError::Conflict(
                "first response already recorded".to_string(),
            ));
        }
        Ok(SupportTicketPatch::first_response(ticket, scope.now))
    })
}

pub fn resolve_ticket<R>(
    repo: &R,
    scope: &Scope,
    id: &ItemId,
    form: ResolveTicketForm,
) -> ServiceResult<SupportTicket>
where
    R: ItemReader<SupportTicket> + ItemWriter<SupportTicket> + ?Sized,
{
    let notes = form.into_notes();
    update_item(repo, scope, id, |ticket: &SupportTicket| {
        if !ticket.status.is_open() && ticket.status != TicketStatus::OnHold {
            return Err(ServiceError::Conflict(format!(
                "ticket is already {}",
                ticket.status
            )));
        }
        Ok(SupportTicketPatch::resolve(notes, scope.now))
    })
}

/// Records customer satisfaction for a solved or closed ticket.
pub fn rate_ticket<R>(
    repo: &R,
    scope: &Scope,
    id: &ItemId,
    form: RateTicketForm,
) -> ServiceResult<SupportTicket>
where
    R: ItemReader<SupportTicket> + ItemWriter<SupportTicket> + ?Sized,
{
    let rating = form.into_rating()?;
    update_item(repo, scope, id, |ticket: &SupportTicket| {
        if !ticket.status.is_terminal() {
            return Err(ServiceError::Conflict(
                "only solved tickets can be rated".to_string(),
            ));
        }
        Ok(SupportTicketPatch::rating(rating))
    })
}

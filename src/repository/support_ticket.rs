use chrono::Utc;
use diesel::prelude::*;

use crate::domain::item::ItemPatch;
use crate::domain::support_ticket::{NewSupportTicket, SupportTicket, SupportTicketPatch};
use crate::domain::types::{ItemId, WorkspaceId};
use crate::models::support_ticket::{SupportTicketChanges, SupportTicketRow};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, ItemListQuery, ItemReader, ItemWriter};
use crate::schema::support_tickets;

impl ItemReader<SupportTicket> for DieselRepository {
    fn get_item(
        &self,
        workspace_id: WorkspaceId,
        id: &ItemId,
    ) -> RepositoryResult<Option<SupportTicket>> {
        let mut conn = self.conn()?;
        let row = support_tickets::table
            .filter(support_tickets::workspace_id.eq(workspace_id.get()))
            .filter(support_tickets::id.eq(id.as_str()))
            .select(SupportTicketRow::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(row.map(SupportTicket::try_from).transpose()?)
    }

    fn list_items(&self, query: &ItemListQuery) -> RepositoryResult<Vec<SupportTicket>> {
        let mut conn = self.conn()?;
        let rows = support_tickets::table
            .filter(support_tickets::workspace_id.eq(query.workspace_id.get()))
            .order((support_tickets::created_at.desc(), support_tickets::id.desc()))
            .limit(query.limit as i64)
            .select(SupportTicketRow::as_select())
            .load(&mut conn)?;

        Ok(rows
            .into_iter()
            .map(SupportTicket::try_from)
            .collect::<Result<Vec<_>, _>>()?)
    }
}

impl ItemWriter<SupportTicket> for DieselRepository {
    fn create_item(&self, draft: &NewSupportTicket) -> RepositoryResult<SupportTicket> {
        let mut conn = self.conn()?;
        let row = SupportTicketRow::from_new(draft, ItemId::generate(), Utc::now().naive_utc());

        let stored = diesel::insert_into(support_tickets::table)
            .values(&row)
            .returning(SupportTicketRow::as_returning())
            .get_result(&mut conn)?;

        Ok(SupportTicket::try_from(stored)?)
    }

    fn patch_item(
        &self,
        workspace_id: WorkspaceId,
        id: &ItemId,
        patch: &SupportTicketPatch,
    ) -> RepositoryResult<SupportTicket> {
        if patch.is_empty() {
            return ItemReader::<SupportTicket>::get_item(self, workspace_id, id)?
                .ok_or(RepositoryError::NotFound);
        }

        let mut conn = self.conn()?;
        let changes = SupportTicketChanges::new(patch, Utc::now().naive_utc());
        let updated = diesel::update(
            support_tickets::table
                .filter(support_tickets::workspace_id.eq(workspace_id.get()))
                .filter(support_tickets::id.eq(id.as_str())),
        )
        .set(&changes)
        .returning(SupportTicketRow::as_returning())
        .get_result(&mut conn)?;

        Ok(SupportTicket::try_from(updated)?)
    }

    fn delete_item(&self, workspace_id: WorkspaceId, id: &ItemId) -> RepositoryResult<()> {
        let mut conn = self.conn()?;
        let affected = diesel::delete(
            support_tickets::table
                .filter(support_tickets::workspace_id.eq(workspace_id.get()))
                .filter(support_tickets::id.eq(id.as_str())),
        )
        .execute(&mut conn)?;

        if affected == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

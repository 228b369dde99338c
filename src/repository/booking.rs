use chrono::Utc;
use diesel::prelude::*;

use crate::domain::booking::{Booking, BookingPatch, NewBooking};
use crate::domain::item::ItemPatch;
use crate::domain::types::{ItemId, WorkspaceId};
use crate::models::booking::{BookingChanges, BookingRow};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, ItemListQuery, ItemReader, ItemWriter};
use crate::schema::bookings;

impl ItemReader<Booking> for DieselRepository {
    fn get_item(
        &self,
        workspace_id: WorkspaceId,
        id: &ItemId,
    ) -> RepositoryResult<Option<Booking>> {
        let mut conn = self.conn()?;
        let row = bookings::table
            .filter(bookings::workspace_id.eq(workspace_id.get()))
            .filter(bookings::id.eq(id.as_str()))
            .select(BookingRow::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(row.map(Booking::try_from).transpose()?)
    }

    fn list_items(&self, query: &ItemListQuery) -> RepositoryResult<Vec<Booking>> {
        let mut conn = self.conn()?;
        let rows = bookings::table
            .filter(bookings::workspace_id.eq(query.workspace_id.get()))
            .order((bookings::created_at.desc(), bookings::id.desc()))
            .limit(query.limit as i64)
            .select(BookingRow::as_select())
            .load(&mut conn)?;

        Ok(rows
            .into_iter()
            .map(Booking::try_from)
            .collect::<Result<Vec<_>, _>>()?)
    }
}

impl ItemWriter<Booking> for DieselRepository {
    fn create_item(&self, draft: &NewBooking) -> RepositoryResult<Booking> {
        let mut conn = self.conn()?;
        let row = BookingRow::from_new(draft, ItemId::generate(), Utc::now().naive_utc());

        let stored = diesel::insert_into(bookings::table)
            .values(&row)
            .returning(BookingRow::as_returning())
            .get_result(&mut conn)?;

        Ok(Booking::try_from(stored)?)
    }

    fn patch_item(
        &self,
        workspace_id: WorkspaceId,
        id: &ItemId,
        patch: &BookingPatch,
    ) -> RepositoryResult<Booking> {
        if patch.is_empty() {
            return ItemReader::<Booking>::get_item(self, workspace_id, id)?
                .ok_or(RepositoryError::NotFound);
        }

        let mut conn = self.conn()?;
        let changes = BookingChanges::new(patch, Utc::now().naive_utc());
        let updated = diesel::update(
            bookings::table
                .filter(bookings::workspace_id.eq(workspace_id.get()))
                .filter(bookings::id.eq(id.as_str())),
        )
        .set(&changes)
        .returning(BookingRow::as_returning())
        .get_result(&mut conn)?;

        Ok(Booking::try_from(updated)?)
    }

    fn delete_item(&self, workspace_id: WorkspaceId, id: &ItemId) -> RepositoryResult<()> {
        let mut conn = self.conn()?;
        let affected = diesel::delete(
            bookings::table
                .filter(bookings::workspace_id.eq(workspace_id.get()))
                .filter(bookings::id.eq(id.as_str())),
        )
        .execute(&mut conn)?;

        if affected == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

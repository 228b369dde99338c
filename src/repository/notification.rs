use chrono::Utc;
use diesel::prelude::*;

use crate::domain::item::ItemPatch;
use crate::domain::notification::{NewNotification, Notification, NotificationPatch};
use crate::domain::types::{ItemId, WorkspaceId};
use crate::models::notification::{NotificationChanges, NotificationRow};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, ItemListQuery, ItemReader, ItemWriter};
use crate::schema::notifications;

impl ItemReader<Notification> for DieselRepository {
    fn get_item(
        &self,
        workspace_id: WorkspaceId,
        id: &ItemId,
    ) -> RepositoryResult<Option<Notification>> {
        let mut conn = self.conn()?;
        let row = notifications::table
            .filter(notifications::workspace_id.eq(workspace_id.get()))
            .filter(notifications::id.eq(id.as_str()))
            .select(NotificationRow::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(row.map(Notification::try_from).transpose()?)
    }

    fn list_items(&self, query: &ItemListQuery) -> RepositoryResult<Vec<Notification>> {
        let mut conn = self.conn()?;
        let rows = notifications::table
            .filter(notifications::workspace_id.eq(query.workspace_id.get()))
            .order((notifications::created_at.desc(), notifications::id.desc()))
            .limit(query.limit as i64)
            .select(NotificationRow::as_select())
            .load(&mut conn)?;

        Ok(rows
            .into_iter()
            .map(Notification::try_from)
            .collect::<Result<Vec<_>, _>>()?)
    }
}

impl ItemWriter<Notification> for DieselRepository {
    fn create_item(&self, draft: &NewNotification) -> RepositoryResult<Notification> {
        let mut conn = self.conn()?;
        let row = NotificationRow::from_new(draft, ItemId::generate(), Utc::now().naive_utc());

        let stored = diesel::insert_into(notifications::table)
            .values(&row)
            .returning(NotificationRow::as_returning())
            .get_result(&mut conn)?;

        Ok(Notification::try_from(stored)?)
    }

    fn patch_item(
        &self,
        workspace_id: WorkspaceId,
        id: &ItemId,
        patch: &NotificationPatch,
    ) -> RepositoryResult<Notification> {
        if patch.is_empty() {
            return ItemReader::<Notification>::get_item(self, workspace_id, id)?
                .ok_or(RepositoryError::NotFound);
        }

        let mut conn = self.conn()?;
        let updated = diesel::update(
            notifications::table
                .filter(notifications::workspace_id.eq(workspace_id.get()))
                .filter(notifications::id.eq(id.as_str())),
        )
        .set(&NotificationChanges::from(patch))
        .returning(NotificationRow::as_returning())
        .get_result(&mut conn)?;

        Ok(Notification::try_from(updated)?)
    }

    fn delete_item(&self, workspace_id: WorkspaceId, id: &ItemId) -> RepositoryResult<()> {
        let mut conn = self.conn()?;
        let affected = diesel::delete(
            notifications::table
                .filter(notifications::workspace_id.eq(workspace_id.get()))
                .filter(notifications::id.eq(id.as_str())),
        )
        .execute(&mut conn)?;

        if affected == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

use chrono::Utc;
use diesel::prelude::*;

use crate::domain::item::ItemPatch;
use crate::domain::types::{ItemId, WorkspaceId};
use crate::domain::work_order::{NewWorkOrder, WorkOrder, WorkOrderPatch};
use crate::models::work_order::{WorkOrderChanges, WorkOrderRow};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, ItemListQuery, ItemReader, ItemWriter};
use crate::schema::work_orders;

impl ItemReader<WorkOrder> for DieselRepository {
    fn get_item(
        &self,
        workspace_id: WorkspaceId,
        id: &ItemId,
    ) -> RepositoryResult<Option<WorkOrder>> {
        let mut conn = self.conn()?;
        let row = work_orders::table
            .filter(work_orders::workspace_id.eq(workspace_id.get()))
            .filter(work_orders::id.eq(id.as_str()))
            .select(WorkOrderRow::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(row.map(WorkOrder::try_from).transpose()?)
    }

    fn list_items(&self, query: &ItemListQuery) -> RepositoryResult<Vec<WorkOrder>> {
        let mut conn = self.conn()?;
        let rows = work_orders::table
            .filter(work_orders::workspace_id.eq(query.workspace_id.get()))
            .order((work_orders::created_at.desc(), work_orders::id.desc()))
            .limit(query.limit as i64)
            .select(WorkOrderRow::as_select())
            .load(&mut conn)?;

        Ok(rows
            .into_iter()
            .map(WorkOrder::try_from)
            .collect::<Result<Vec<_>, _>>()?)
    }
}

impl ItemWriter<WorkOrder> for DieselRepository {
    fn create_item(&self, draft: &NewWorkOrder) -> RepositoryResult<WorkOrder> {
        let mut conn = self.conn()?;
        let row = WorkOrderRow::from_new(draft, ItemId::generate(), Utc::now().naive_utc());

        let stored = diesel::insert_into(work_orders::table)
            .values(&row)
            .returning(WorkOrderRow::as_returning())
            .get_result(&mut conn)?;

        Ok(WorkOrder::try_from(stored)?)
    }

    fn patch_item(
        &self,
        workspace_id: WorkspaceId,
        id: &ItemId,
        patch: &WorkOrderPatch,
    ) -> RepositoryResult<WorkOrder> {
        if patch.is_empty() {
            return ItemReader::<WorkOrder>::get_item(self, workspace_id, id)?
                .ok_or(RepositoryError::NotFound);
        }

        let mut conn = self.conn()?;
        let changes = WorkOrderChanges::new(patch, Utc::now().naive_utc());
        let updated = diesel::update(
            work_orders::table
                .filter(work_orders::workspace_id.eq(workspace_id.get()))
                .filter(work_orders::id.eq(id.as_str())),
        )
        .set(&changes)
        .returning(WorkOrderRow::as_returning())
        .get_result(&mut conn)?;

        Ok(WorkOrder::try_from(updated)?)
    }

    fn delete_item(&self, workspace_id: WorkspaceId, id: &ItemId) -> RepositoryResult<()> {
        let mut conn = self.conn()?;
        let affected = diesel::delete(
            work_orders::table
                .filter(work_orders::workspace_id.eq(workspace_id.get()))
                .filter(work_orders::id.eq(id.as_str())),
        )
        .execute(&mut conn)?;

        if affected == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

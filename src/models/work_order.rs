use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::types::{ItemId, TypeConstraintError, WorkspaceId};
use crate::domain::work_order::{NewWorkOrder, WorkOrder, WorkOrderPatch, WorkOrderStatus};

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = crate::schema::work_orders)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct WorkOrderRow {
    pub id: String,
    pub workspace_id: i32,
    pub order_number: String,
    pub title: String,
    pub description: Option<String>,
    pub maintenance_type: String,
    pub status: String,
    pub priority: String,
    pub asset: String,
    pub location: Option<String>,
    pub scheduled_start: NaiveDateTime,
    pub scheduled_end: NaiveDateTime,
    pub actual_start: Option<NaiveDateTime>,
    pub actual_end: Option<NaiveDateTime>,
    pub estimated_hours: f64,
    pub actual_hours: f64,
    pub progress: i32,
    pub downtime_minutes: i32,
    pub archived: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl WorkOrderRow {
    pub fn from_new(order: &NewWorkOrder, id: ItemId, now: NaiveDateTime) -> Self {
        Self {
            id: id.into_inner(),
            workspace_id: order.workspace_id.get(),
            order_number: order.order_number.clone(),
            title: order.title.clone(),
            description: order.description.clone(),
            maintenance_type: order.maintenance_type.as_str().to_string(),
            status: WorkOrderStatus::Scheduled.as_str().to_string(),
            priority: order.priority.as_str().to_string(),
            asset: order.asset.clone(),
            location: order.location.clone(),
            scheduled_start: order.scheduled_start,
            scheduled_end: order.scheduled_end,
            actual_start: None,
            actual_end: None,
            estimated_hours: order.estimated_hours,
            actual_hours: 0.0,
            progress: 0,
            downtime_minutes: 0,
            archived: false,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::work_orders)]
pub struct WorkOrderChanges {
    pub status: Option<&'static str>,
    pub progress: Option<i32>,
    pub actual_start: Option<NaiveDateTime>,
    pub actual_end: Option<NaiveDateTime>,
    pub actual_hours: Option<f64>,
    pub downtime_minutes: Option<i32>,
    pub archived: Option<bool>,
    pub updated_at: NaiveDateTime,
}

impl WorkOrderChanges {
    pub fn new(patch: &WorkOrderPatch, now: NaiveDateTime) -> Self {
        Self {
            status: patch.status.map(|s| s.as_str()),
            progress: patch.progress,
            actual_start: patch.actual_start,
            actual_end: patch.actual_end,
            actual_hours: patch.actual_hours,
            downtime_minutes: patch.downtime_minutes,
            archived: patch.archived,
            updated_at: now,
        }
    }
}

impl TryFrom<WorkOrderRow> for WorkOrder {
    type Error = TypeConstraintError;

    fn try_from(row: WorkOrderRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ItemId::new(row.id)?,
            workspace_id: WorkspaceId::new(row.workspace_id)?,
            order_number: row.order_number,
            title: row.title,
            description: row.description,
            maintenance_type: row.maintenance_type.parse()?,
            status: row.status.parse()?,
            priority: row.priority.parse()?,
            asset: row.asset,
            location: row.location,
            scheduled_start: row.scheduled_start,
            scheduled_end: row.scheduled_end,
            actual_start: row.actual_start,
            actual_end: row.actual_end,
            estimated_hours: row.estimated_hours,
            actual_hours: row.actual_hours,
            progress: row.progress,
            downtime_minutes: row.downtime_minutes,
            archived: row.archived,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

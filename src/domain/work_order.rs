use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::item::{ItemFlag, ItemPatch, ManagedItem, merge, merge_opt};
use crate::domain::types::{ItemId, WorkspaceId, labelled_enum};
use crate::sla::{SlaIndicator, SlaPolicy};

labelled_enum!(
    WorkOrderStatus {
        Scheduled => "scheduled",
        InProgress => "in_progress",
        Completed => "completed",
        Cancelled => "cancelled",
        OnHold => "on_hold",
        Overdue => "overdue",
    }
);

labelled_enum!(
    MaintenanceType {
        Preventive => "preventive",
        Corrective => "corrective",
        Emergency => "emergency",
        Upgrade => "upgrade",
        Inspection => "inspection",
        Calibration => "calibration",
    }
);

labelled_enum!(
    WorkOrderPriority {
        Critical => "critical",
        High => "high",
        Medium => "medium",
        Low => "low",
    }
);

/// A maintenance job against one asset.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkOrder {
    pub id: ItemId,
    pub workspace_id: WorkspaceId,
    pub order_number: String,
    pub title: String,
    pub description: Option<String>,
    pub maintenance_type: MaintenanceType,
    pub status: WorkOrderStatus,
    pub priority: WorkOrderPriority,
    pub asset: String,
    pub location: Option<String>,
    pub scheduled_start: NaiveDateTime,
    pub scheduled_end: NaiveDateTime,
    pub actual_start: Option<NaiveDateTime>,
    pub actual_end: Option<NaiveDateTime>,
    pub estimated_hours: f64,
    pub actual_hours: f64,
    /// Completion percentage, `0..=100`.
    pub progress: i32,
    pub downtime_minutes: i32,
    pub archived: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl WorkOrder {
    /// Completion budget reading; the clock stops when the job ends.
    pub fn sla(
        &self,
        policy: &SlaPolicy<WorkOrderPriority>,
        now: NaiveDateTime,
    ) -> Option<SlaIndicator> {
        let target = policy.target(&self.priority)?;
        Some(SlaIndicator::evaluate(
            self.created_at,
            self.actual_end.unwrap_or(now),
            target.resolution_minutes,
        ))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewWorkOrder {
    pub workspace_id: WorkspaceId,
    pub order_number: String,
    pub title: String,
    pub description: Option<String>,
    pub maintenance_type: MaintenanceType,
    pub priority: WorkOrderPriority,
    pub asset: String,
    pub location: Option<String>,
    pub scheduled_start: NaiveDateTime,
    pub scheduled_end: NaiveDateTime,
    pub estimated_hours: f64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct WorkOrderPatch {
    pub status: Option<WorkOrderStatus>,
    pub progress: Option<i32>,
    pub actual_start: Option<NaiveDateTime>,
    pub actual_end: Option<NaiveDateTime>,
    pub actual_hours: Option<f64>,
    pub downtime_minutes: Option<i32>,
    pub archived: Option<bool>,
}

impl WorkOrderPatch {
    pub fn start(at: NaiveDateTime) -> Self {
        Self {
            status: Some(WorkOrderStatus::InProgress),
            actual_start: Some(at),
            ..Self::default()
        }
    }

    pub fn progress(progress: i32) -> Self {
        Self {
            progress: Some(progress),
            ..Self::default()
        }
    }

    pub fn complete(actual_hours: f64, at: NaiveDateTime) -> Self {
        Self {
            status: Some(WorkOrderStatus::Completed),
            progress: Some(100),
            actual_end: Some(at),
            actual_hours: Some(actual_hours),
            ..Self::default()
        }
    }
}

impl ItemPatch for WorkOrderPatch {
    fn flag(flag: ItemFlag, value: bool) -> Option<Self> {
        match flag {
            ItemFlag::Archived => Some(Self {
                archived: Some(value),
                ..Self::default()
            }),
            ItemFlag::Read | ItemFlag::ReminderSent => None,
        }
    }

    fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl ManagedItem for WorkOrder {
    type Status = WorkOrderStatus;
    type Patch = WorkOrderPatch;
    type Draft = NewWorkOrder;

    fn id(&self) -> &ItemId {
        &self.id
    }

    fn workspace_id(&self) -> WorkspaceId {
        self.workspace_id
    }

    fn status(&self) -> WorkOrderStatus {
        self.status
    }

    fn is_archived(&self) -> bool {
        self.archived
    }

    fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }

    fn occurs_at(&self) -> NaiveDateTime {
        self.scheduled_start
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.title.as_str(),
            self.order_number.as_str(),
            self.asset.as_str(),
        ]
    }

    fn category(&self) -> Option<&str> {
        Some(self.maintenance_type.as_str())
    }

    fn flag(&self, flag: ItemFlag) -> Option<bool> {
        match flag {
            ItemFlag::Archived => Some(self.archived),
            ItemFlag::Read | ItemFlag::ReminderSent => None,
        }
    }

    fn apply_patch(&mut self, patch: &WorkOrderPatch) {
        merge(&mut self.status, &patch.status);
        merge(&mut self.progress, &patch.progress);
        merge_opt(&mut self.actual_start, &patch.actual_start);
        merge_opt(&mut self.actual_end, &patch.actual_end);
        merge(&mut self.actual_hours, &patch.actual_hours);
        merge(&mut self.downtime_minutes, &patch.downtime_minutes);
        merge(&mut self.archived, &patch.archived);
    }
}

#[derive(Clone, Debug, Default, Serialize, PartialEq)]
pub struct WorkOrderStats {
    pub total: usize,
    pub scheduled: usize,
    pub in_progress: usize,
    pub completed: usize,
    /// Orders past their completion budget.
    pub overdue: usize,
    /// Mean of actual over estimated hours for completed orders, in percent.
    pub avg_completion: i64,
    pub total_downtime_minutes: i64,
}

impl WorkOrderStats {
    /// Aggregates over the non-archived work orders.
    pub fn from_items(
        orders: &[WorkOrder],
        policy: &SlaPolicy<WorkOrderPriority>,
        now: NaiveDateTime,
    ) -> Self {
        let active: Vec<&WorkOrder> = orders.iter().filter(|o| !o.archived).collect();
        let count = |status: WorkOrderStatus| active.iter().filter(|o| o.status == status).count();

        let completed: Vec<&&WorkOrder> = active
            .iter()
            .filter(|o| o.status == WorkOrderStatus::Completed && o.estimated_hours > 0.0)
            .collect();
        let avg_completion = if completed.is_empty() {
            0
        } else {
            let sum: f64 = completed
                .iter()
                .map(|o| o.actual_hours / o.estimated_hours * 100.0)
                .sum();
            (sum / completed.len() as f64).round() as i64
        };

        Self {
            total: active.len(),
            scheduled: count(WorkOrderStatus::Scheduled),
            in_progress: count(WorkOrderStatus::InProgress),
            completed: count(WorkOrderStatus::Completed),
            overdue: active
                .iter()
                .filter_map(|o| o.sla(policy, now))
                .filter(|sla| sla.breached)
                .count(),
            avg_completion,
            total_downtime_minutes: active.iter().map(|o| i64::from(o.downtime_minutes)).sum(),
        }
    }
}

use chrono::NaiveDateTime;
use serde::Deserialize;
use validator::Validate;

use crate::domain::types::{WorkspaceId, reference_code};
use crate::domain::work_order::{
    MaintenanceType, NewWorkOrder, WorkOrderPatch, WorkOrderPriority,
};
use crate::forms::{FormError, optional_text, required_text};

#[derive(Debug, Deserialize, Validate)]
/// Form data for scheduling maintenance work.
pub struct NewWorkOrderForm {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub description: Option<String>,
    pub maintenance_type: MaintenanceType,
    pub priority: WorkOrderPriority,
    #[validate(length(min = 1, max = 200))]
    pub asset: String,
    pub location: Option<String>,
    pub scheduled_start: NaiveDateTime,
    pub scheduled_end: NaiveDateTime,
    #[validate(range(min = 0.0))]
    #[serde(default)]
    pub estimated_hours: f64,
}

impl NewWorkOrderForm {
    pub fn into_new_work_order(self, workspace_id: WorkspaceId) -> Result<NewWorkOrder, FormError> {
        self.validate()?;
        if self.scheduled_end < self.scheduled_start {
            return Err(FormError::InvalidSchedule);
        }

        Ok(NewWorkOrder {
            workspace_id,
            order_number: reference_code("WO"),
            title: required_text(self.title, "title")?,
            description: optional_text(self.description),
            maintenance_type: self.maintenance_type,
            priority: self.priority,
            asset: required_text(self.asset, "asset")?,
            location: optional_text(self.location),
            scheduled_start: self.scheduled_start,
            scheduled_end: self.scheduled_end,
            estimated_hours: self.estimated_hours,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct ProgressForm {
    #[validate(range(min = 0, max = 100))]
    pub progress: i32,
}

impl ProgressForm {
    pub fn into_patch(self) -> Result<WorkOrderPatch, FormError> {
        self.validate()?;
        Ok(WorkOrderPatch::progress(self.progress))
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CompleteWorkOrderForm {
    #[validate(range(min = 0.0))]
    pub actual_hours: f64,
    #[validate(range(min = 0))]
    pub downtime_minutes: Option<i32>,
}

impl CompleteWorkOrderForm {
    pub fn into_patch(self, now: NaiveDateTime) -> Result<WorkOrderPatch, FormError> {
        self.validate()?;
        let mut patch = WorkOrderPatch::complete(self.actual_hours, now);
        patch.downtime_minutes = self.downtime_minutes;
        Ok(patch)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate};

    use super::*;
    use crate::domain::work_order::WorkOrderStatus;

    fn start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 4, 2)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    fn form() -> NewWorkOrderForm {
        NewWorkOrderForm {
            title: "Replace belt".into(),
            description: None,
            maintenance_type: MaintenanceType::Corrective,
            priority: WorkOrderPriority::Medium,
            asset: "Conveyor 3".into(),
            location: Some("Line B".into()),
            scheduled_start: start(),
            scheduled_end: start() + Duration::hours(2),
            estimated_hours: 2.0,
        }
    }

    #[test]
    fn valid_form_gets_order_number() {
        let draft = form().into_new_work_order(WorkspaceId::new(1).unwrap()).unwrap();
        assert!(draft.order_number.starts_with("WO-"));
        assert_eq!(draft.location.as_deref(), Some("Line B"));
    }

    #[test]
    fn end_before_start_is_rejected() {
        let mut form = form();
        form.scheduled_end = start() - Duration::minutes(1);
        assert!(matches!(
            form.into_new_work_order(WorkspaceId::new(1).unwrap()),
            Err(FormError::InvalidSchedule)
        ));
    }

    #[test]
    fn negative_estimate_fails_validation() {
        let mut form = form();
        form.estimated_hours = -1.0;
        assert!(matches!(
            form.into_new_work_order(WorkspaceId::new(1).unwrap()),
            Err(FormError::Validation(_))
        ));
    }

    #[test]
    fn progress_is_bounded() {
        assert!(ProgressForm { progress: 101 }.into_patch().is_err());
        assert_eq!(
            ProgressForm { progress: 40 }.into_patch().unwrap().progress,
            Some(40)
        );
    }

    #[test]
    fn completion_carries_downtime() {
        let patch = CompleteWorkOrderForm {
            actual_hours: 3.5,
            downtime_minutes: Some(45),
        }
        .into_patch(start())
        .unwrap();
        assert_eq!(patch.status, Some(WorkOrderStatus::Completed));
        assert_eq!(patch.downtime_minutes, Some(45));
    }
}

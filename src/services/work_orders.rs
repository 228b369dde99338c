use crate::domain::types::ItemId;
use crate::domain::work_order::{WorkOrder, WorkOrderPatch, WorkOrderStats, WorkOrderStatus};
use crate::dto::pages::{WorkOrderRow, WorkOrdersPage};
use crate::dto::{CsvExport, ListQuery};
use crate::forms::work_orders::{CompleteWorkOrderForm, NewWorkOrderForm, ProgressForm};
use crate::repository::{ItemReader, ItemWriter};
use crate::services::{
    Scope, ServiceError, ServiceResult, export_items, list_projection, update_item,
};
use crate::sla::SlaPolicy;
use crate::state::ListState;
use crate::state::sync::SyncedList;

pub fn list_work_orders<R>(
    repo: &R,
    scope: &Scope,
    query: &ListQuery,
) -> ServiceResult<WorkOrdersPage>
where
    R: ItemReader<WorkOrder> + ?Sized,
{
    let filter = query.to_filter::<WorkOrderStatus>()?;
    let policy = SlaPolicy::maintenance();
    let (state, items) = list_projection(repo, scope, &filter)?;

    Ok(WorkOrdersPage {
        total: items.len(),
        items: items
            .into_iter()
            .map(|work_order| WorkOrderRow {
                sla: work_order.sla(&policy, scope.now),
                work_order,
            })
            .collect(),
        stats: WorkOrderStats::from_items(state.items(), &policy, scope.now),
    })
}

pub fn export_work_orders<R>(
    repo: &R,
    scope: &Scope,
    query: &ListQuery,
) -> ServiceResult<CsvExport>
where
    R: ItemReader<WorkOrder> + ?Sized,
{
    let filter = query.to_filter::<WorkOrderStatus>()?;
    export_items::<WorkOrder, _>(repo, scope, &filter, "work-orders")
}

pub fn create_work_order<R>(
    repo: &R,
    scope: &Scope,
    form: NewWorkOrderForm,
) -> ServiceResult<WorkOrder>
where
    R: ItemWriter<WorkOrder> + ?Sized,
{
    let draft = form.into_new_work_order(scope.workspace_id)?;
    let work_order = SyncedList::new(ListState::new(), repo).create(&draft)?;
    log::info!(
        "Work order {} scheduled in workspace {}",
        work_order.order_number,
        scope.workspace_id
    );
    Ok(work_order)
}

pub fn start_work_order<R>(repo: &R, scope: &Scope, id: &ItemId) -> ServiceResult<WorkOrder>
where
    R: ItemReader<WorkOrder> + ItemWriter<WorkOrder> + ?Sized,
{
    update_item(repo, scope, id, |order: &WorkOrder| {
        match order.status {
            WorkOrderStatus::Scheduled | WorkOrderStatus::OnHold | WorkOrderStatus::Overdue => {
                Ok(WorkOrderPatch::start(scope.now))
            }
            status => Err(ServiceError::Conflict(format!("work order is {status}"))),
        }
    })
}

pub fn update_progress<R>(
    repo: &R,
    scope: &Scope,
    id: &ItemId,
    form: ProgressForm,
) -> ServiceResult<WorkOrder>
where
    R: ItemReader<WorkOrder> + ItemWriter<WorkOrder> + ?Sized,
{
    let patch = form.into_patch()?;
    update_item(repo, scope, id, |order: &WorkOrder| {
        ensure_active(order)?;
        Ok(patch)
    })
}

pub fn complete_work_order<R>(
    repo: &R,
    scope: &Scope,
    id: &ItemId,
    form: CompleteWorkOrderForm,
) -> ServiceResult<WorkOrder>
where
    R: ItemReader<WorkOrder> + ItemWriter<WorkOrder> + ?Sized,
{
    let patch = form.into_patch(scope.now)?;
    update_item(repo, scope, id, |order: &WorkOrder| {
        ensure_active(order)?;
        Ok(patch)
    })
}

fn ensure_active(order: &WorkOrder) -> ServiceResult<()> {
    match order.status {
        WorkOrderStatus::Completed | WorkOrderStatus::Cancelled => Err(ServiceError::Conflict(
            format!("work order is {}", order.status),
        )),
        _ => Ok(()),
    }
}

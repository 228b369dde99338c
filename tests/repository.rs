use chrono::{Duration, NaiveDate, NaiveDateTime};
use freeflow_ops::domain::booking::{Booking, BookingPatch, BookingStatus, BookingType, NewBooking};
use freeflow_ops::domain::notification::{
    NewNotification, Notification, NotificationKind, NotificationPriority, NotificationPatch,
};
use freeflow_ops::domain::support_ticket::{
    NewSupportTicket, SupportTicket, SupportTicketPatch, TicketChannel, TicketPriority,
    TicketStatus,
};
use freeflow_ops::domain::types::{CustomerEmail, ItemId, WorkspaceId};
use freeflow_ops::domain::work_order::{
    MaintenanceType, NewWorkOrder, WorkOrder, WorkOrderPatch, WorkOrderPriority, WorkOrderStatus,
};
use freeflow_ops::repository::errors::RepositoryError;
use freeflow_ops::repository::{
    DieselRepository, ItemListQuery, ItemReader, ItemWriter, PreferenceReader, PreferenceWriter,
};
use freeflow_ops::state::ListState;
use freeflow_ops::state::filter::{ArchiveView, ListFilter, StatusFilter};
use freeflow_ops::state::sync::SyncedList;
use serde_json::json;

mod common;

fn workspace(id: i32) -> WorkspaceId {
    WorkspaceId::new(id).unwrap()
}

fn start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2030, 5, 1)
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap()
}

fn new_booking(ws: i32, number: &str) -> NewBooking {
    NewBooking {
        workspace_id: workspace(ws),
        booking_number: number.to_string(),
        title: "Portfolio review".to_string(),
        description: None,
        booking_type: BookingType::Consultation,
        customer_name: "Jane Client".to_string(),
        customer_email: Some(CustomerEmail::new("jane@example.com").unwrap()),
        customer_phone: None,
        start_time: start(),
        duration_minutes: 45,
        price: 120.0,
    }
}

fn new_ticket(ws: i32, code: &str) -> NewSupportTicket {
    NewSupportTicket {
        workspace_id: workspace(ws),
        ticket_code: code.to_string(),
        subject: "Invoice missing".to_string(),
        description: Some("Customer cannot find March invoice".to_string()),
        category: "Billing".to_string(),
        priority: TicketPriority::High,
        channel: TicketChannel::Email,
        customer_name: Some("Acme Corp".to_string()),
        customer_email: None,
    }
}

#[test]
fn test_booking_repository_crud() {
    let test_db = common::TestDb::new("test_booking_repository_crud.db");
    let repo = DieselRepository::new(test_db.pool());

    let created =
        ItemWriter::<Booking>::create_item(&repo, &new_booking(1, "BK-0001")).unwrap();
    assert_eq!(created.status, BookingStatus::Pending);
    assert_eq!(created.balance_due, 120.0);
    assert_eq!(created.end_time, start() + Duration::minutes(45));

    let confirmed = ItemWriter::<Booking>::patch_item(
        &repo,
        workspace(1),
        &created.id,
        &BookingPatch::confirm("CONF-1".to_string(), start()),
    )
    .unwrap();
    assert_eq!(confirmed.status, BookingStatus::Confirmed);
    assert_eq!(confirmed.confirmation_code.as_deref(), Some("CONF-1"));
    assert_eq!(confirmed.title, created.title);

    let fetched = ItemReader::<Booking>::get_item(&repo, workspace(1), &created.id)
        .unwrap()
        .unwrap();
    assert_eq!(fetched, confirmed);

    ItemWriter::<Booking>::delete_item(&repo, workspace(1), &created.id).unwrap();
    let missing = ItemReader::<Booking>::get_item(&repo, workspace(1), &created.id).unwrap();
    assert!(missing.is_none());

    let again = ItemWriter::<Booking>::delete_item(&repo, workspace(1), &created.id);
    assert!(matches!(again, Err(RepositoryError::NotFound)));
}

#[test]
fn test_duplicate_booking_number_is_a_constraint_violation() {
    let test_db = common::TestDb::new("test_duplicate_booking_number.db");
    let repo = DieselRepository::new(test_db.pool());

    ItemWriter::<Booking>::create_item(&repo, &new_booking(1, "BK-DUP")).unwrap();
    let result = ItemWriter::<Booking>::create_item(&repo, &new_booking(1, "BK-DUP"));

    assert!(matches!(result, Err(RepositoryError::ConstraintViolation(_))));
    assert!(ItemWriter::<Booking>::create_item(&repo, &new_booking(2, "BK-DUP")).is_ok());
}

#[test]
fn test_items_are_scoped_by_workspace() {
    let test_db = common::TestDb::new("test_items_are_scoped_by_workspace.db");
    let repo = DieselRepository::new(test_db.pool());

    let own = ItemWriter::<SupportTicket>::create_item(&repo, &new_ticket(1, "TKT-1")).unwrap();
    ItemWriter::<SupportTicket>::create_item(&repo, &new_ticket(2, "TKT-2")).unwrap();

    let listed =
        ItemReader::<SupportTicket>::list_items(&repo, &ItemListQuery::new(workspace(1))).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, own.id);

    let foreign = ItemWriter::<SupportTicket>::patch_item(
        &repo,
        workspace(2),
        &own.id,
        &SupportTicketPatch::status(TicketStatus::Closed),
    );
    assert!(matches!(foreign, Err(RepositoryError::NotFound)));

    let foreign_delete = ItemWriter::<SupportTicket>::delete_item(&repo, workspace(2), &own.id);
    assert!(matches!(foreign_delete, Err(RepositoryError::NotFound)));
}

#[test]
fn test_reopening_clears_resolution_time_in_store() {
    let test_db = common::TestDb::new("test_reopening_clears_resolution_time.db");
    let repo = DieselRepository::new(test_db.pool());

    let created =
        ItemWriter::<SupportTicket>::create_item(&repo, &new_ticket(1, "TKT-R")).unwrap();
    let closed = ItemWriter::<SupportTicket>::patch_item(
        &repo,
        workspace(1),
        &created.id,
        &SupportTicketPatch::transition(&created, TicketStatus::Closed, start()),
    )
    .unwrap();
    assert_eq!(closed.resolved_at, Some(start()));

    let reopened = ItemWriter::<SupportTicket>::patch_item(
        &repo,
        workspace(1),
        &created.id,
        &SupportTicketPatch::transition(&closed, TicketStatus::Open, start()),
    )
    .unwrap();
    assert_eq!(reopened.status, TicketStatus::Open);
    assert_eq!(reopened.resolved_at, None);
}

#[test]
fn test_list_is_newest_first_and_bounded() {
    let test_db = common::TestDb::new("test_list_is_newest_first_and_bounded.db");
    let repo = DieselRepository::new(test_db.pool());

    for i in 0..5 {
        ItemWriter::<SupportTicket>::create_item(&repo, &new_ticket(1, &format!("TKT-{i}")))
            .unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));
    }

    let listed = ItemReader::<SupportTicket>::list_items(
        &repo,
        &ItemListQuery::new(workspace(1)).limit(3),
    )
    .unwrap();
    let codes: Vec<&str> = listed.iter().map(|t| t.ticket_code.as_str()).collect();
    assert_eq!(codes, vec!["TKT-4", "TKT-3", "TKT-2"]);
}

#[test]
fn test_notification_flags_round_trip() {
    let test_db = common::TestDb::new("test_notification_flags_round_trip.db");
    let repo = DieselRepository::new(test_db.pool());

    let created = ItemWriter::<Notification>::create_item(
        &repo,
        &NewNotification {
            workspace_id: workspace(1),
            title: "Payment received".to_string(),
            message: "Acme paid INV-7".to_string(),
            kind: NotificationKind::Payment,
            category: "Finance".to_string(),
            priority: NotificationPriority::High,
            action_url: None,
        },
    )
    .unwrap();
    assert!(!created.read);

    let read = ItemWriter::<Notification>::patch_item(
        &repo,
        workspace(1),
        &created.id,
        &NotificationPatch::read(),
    )
    .unwrap();
    assert!(read.read);
    assert!(!read.archived);

    let archived = ItemWriter::<Notification>::patch_item(
        &repo,
        workspace(1),
        &created.id,
        &NotificationPatch::archived(true),
    )
    .unwrap();
    assert!(archived.read);
    assert!(archived.archived);
}

#[test]
fn test_work_order_progress_and_completion() {
    let test_db = common::TestDb::new("test_work_order_progress_and_completion.db");
    let repo = DieselRepository::new(test_db.pool());

    let created = ItemWriter::<WorkOrder>::create_item(
        &repo,
        &NewWorkOrder {
            workspace_id: workspace(1),
            order_number: "WO-1".to_string(),
            title: "Boiler inspection".to_string(),
            description: None,
            maintenance_type: MaintenanceType::Inspection,
            priority: WorkOrderPriority::Medium,
            asset: "Boiler 1".to_string(),
            location: None,
            scheduled_start: start(),
            scheduled_end: start() + Duration::hours(4),
            estimated_hours: 4.0,
        },
    )
    .unwrap();
    assert_eq!(created.status, WorkOrderStatus::Scheduled);
    assert_eq!(created.progress, 0);

    let progressed = ItemWriter::<WorkOrder>::patch_item(
        &repo,
        workspace(1),
        &created.id,
        &WorkOrderPatch::progress(60),
    )
    .unwrap();
    assert_eq!(progressed.progress, 60);

    let done = ItemWriter::<WorkOrder>::patch_item(
        &repo,
        workspace(1),
        &created.id,
        &WorkOrderPatch::complete(3.5, start() + Duration::hours(3)),
    )
    .unwrap();
    assert_eq!(done.status, WorkOrderStatus::Completed);
    assert_eq!(done.progress, 100);
    assert_eq!(done.actual_hours, 3.5);
}

#[test]
fn test_out_of_range_progress_is_rejected_by_the_database() {
    let test_db = common::TestDb::new("test_out_of_range_progress.db");
    let repo = DieselRepository::new(test_db.pool());

    let created = ItemWriter::<WorkOrder>::create_item(
        &repo,
        &NewWorkOrder {
            workspace_id: workspace(1),
            order_number: "WO-2".to_string(),
            title: "Chiller check".to_string(),
            description: None,
            maintenance_type: MaintenanceType::Preventive,
            priority: WorkOrderPriority::Low,
            asset: "Chiller".to_string(),
            location: None,
            scheduled_start: start(),
            scheduled_end: start(),
            estimated_hours: 1.0,
        },
    )
    .unwrap();

    let result = ItemWriter::<WorkOrder>::patch_item(
        &repo,
        workspace(1),
        &created.id,
        &WorkOrderPatch::progress(150),
    );
    assert!(result.is_err());

    let unchanged = ItemReader::<WorkOrder>::get_item(&repo, workspace(1), &created.id)
        .unwrap()
        .unwrap();
    assert_eq!(unchanged.progress, 0);
}

#[test]
fn test_synced_list_rolls_back_against_real_store() {
    let test_db = common::TestDb::new("test_synced_list_rolls_back.db");
    let repo = DieselRepository::new(test_db.pool());

    let mut list = SyncedList::new(ListState::<SupportTicket>::new(), &repo);
    let open = list.create(&new_ticket(1, "TKT-A")).unwrap();
    let closed = list.create(&new_ticket(1, "TKT-B")).unwrap();
    list.patch(&closed.id, &SupportTicketPatch::status(TicketStatus::Closed))
        .unwrap();
    list.archive(&open.id).unwrap();

    // Gone from the store, so the local item must be restored.
    ItemWriter::<SupportTicket>::delete_item(&repo, workspace(1), &closed.id).unwrap();
    let before = list.state().items().to_vec();
    assert!(list.archive(&closed.id).is_err());
    assert_eq!(list.state().items(), before.as_slice());

    let active = ListFilter::default().archive(ArchiveView::Active);
    let visible: Vec<&ItemId> = list.state().project(&active).into_iter().map(|t| &t.id).collect();
    assert_eq!(visible, vec![&closed.id]);

    let archived_open = ListFilter::default()
        .archive(ArchiveView::Archived)
        .status(StatusFilter::Only(TicketStatus::New));
    assert_eq!(list.state().project(&archived_open).len(), 1);
}

#[test]
fn test_preferences_upsert_per_workspace() {
    let test_db = common::TestDb::new("test_preferences_upsert_per_workspace.db");
    let repo = DieselRepository::new(test_db.pool());

    assert_eq!(repo.get_preference(workspace(1), "sound").unwrap(), None);

    repo.set_preference(workspace(1), "sound", &json!(true)).unwrap();
    repo.set_preference(workspace(1), "sound", &json!(false)).unwrap();
    repo.set_preference(workspace(2), "sound", &json!({"volume": 3}))
        .unwrap();

    assert_eq!(
        repo.get_preference(workspace(1), "sound").unwrap(),
        Some(json!(false))
    );
    assert_eq!(
        repo.get_preference(workspace(2), "sound").unwrap(),
        Some(json!({"volume": 3}))
    );
}

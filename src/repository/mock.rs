//! Mock stores for isolating services and list state in tests.

use mockall::mock;
use serde_json::Value;

use crate::domain::booking::{Booking, BookingPatch, NewBooking};
use crate::domain::notification::{NewNotification, Notification, NotificationPatch};
use crate::domain::support_ticket::{NewSupportTicket, SupportTicket, SupportTicketPatch};
use crate::domain::types::{ItemId, WorkspaceId};
use crate::domain::work_order::{NewWorkOrder, WorkOrder, WorkOrderPatch};
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    ItemListQuery, ItemReader, ItemWriter, PreferenceReader, PreferenceWriter,
};

mock! {
    pub BookingStore {}

    impl ItemReader<Booking> for BookingStore {
        fn get_item(&self, workspace_id: WorkspaceId, id: &ItemId) -> RepositoryResult<Option<Booking>>;
        fn list_items(&self, query: &ItemListQuery) -> RepositoryResult<Vec<Booking>>;
    }

    impl ItemWriter<Booking> for BookingStore {
        fn create_item(&self, draft: &NewBooking) -> RepositoryResult<Booking>;
        fn patch_item(
            &self,
            workspace_id: WorkspaceId,
            id: &ItemId,
            patch: &BookingPatch,
        ) -> RepositoryResult<Booking>;
        fn delete_item(&self, workspace_id: WorkspaceId, id: &ItemId) -> RepositoryResult<()>;
    }
}

mock! {
    pub NotificationStore {}

    impl ItemReader<Notification> for NotificationStore {
        fn get_item(&self, workspace_id: WorkspaceId, id: &ItemId) -> RepositoryResult<Option<Notification>>;
        fn list_items(&self, query: &ItemListQuery) -> RepositoryResult<Vec<Notification>>;
    }

    impl ItemWriter<Notification> for NotificationStore {
        fn create_item(&self, draft: &NewNotification) -> RepositoryResult<Notification>;
        fn patch_item(
            &self,
            workspace_id: WorkspaceId,
            id: &ItemId,
            patch: &NotificationPatch,
        ) -> RepositoryResult<Notification>;
        fn delete_item(&self, workspace_id: WorkspaceId, id: &ItemId) -> RepositoryResult<()>;
    }
}

mock! {
    pub TicketStore {}

    impl ItemReader<SupportTicket> for TicketStore {
        fn get_item(&self, workspace_id: WorkspaceId, id: &ItemId) -> RepositoryResult<Option<SupportTicket>>;
        fn list_items(&self, query: &ItemListQuery) -> RepositoryResult<Vec<SupportTicket>>;
    }

    impl ItemWriter<SupportTicket> for TicketStore {
        fn create_item(&self, draft: &NewSupportTicket) -> RepositoryResult<SupportTicket>;
        fn patch_item(
            &self,
            workspace_id: WorkspaceId,
            id: &ItemId,
            patch: &SupportTicketPatch,
        ) -> RepositoryResult<SupportTicket>;
        fn delete_item(&self, workspace_id: WorkspaceId, id: &ItemId) -> RepositoryResult<()>;
    }
}

mock! {
    pub WorkOrderStore {}

    impl ItemReader<WorkOrder> for WorkOrderStore {
        fn get_item(&self, workspace_id: WorkspaceId, id: &ItemId) -> RepositoryResult<Option<WorkOrder>>;
        fn list_items(&self, query: &ItemListQuery) -> RepositoryResult<Vec<WorkOrder>>;
    }

    impl ItemWriter<WorkOrder> for WorkOrderStore {
        fn create_item(&self, draft: &NewWorkOrder) -> RepositoryResult<WorkOrder>;
        fn patch_item(
            &self,
            workspace_id: WorkspaceId,
            id: &ItemId,
            patch: &WorkOrderPatch,
        ) -> RepositoryResult<WorkOrder>;
        fn delete_item(&self, workspace_id: WorkspaceId, id: &ItemId) -> RepositoryResult<()>;
    }
}

mock! {
    pub PreferenceStore {}

    impl PreferenceReader for PreferenceStore {
        fn get_preference(&self, workspace_id: WorkspaceId, key: &str) -> RepositoryResult<Option<Value>>;
    }

    impl PreferenceWriter for PreferenceStore {
        fn set_preference(
            &self,
            workspace_id: WorkspaceId,
            key: &str,
            value: &Value,
        ) -> RepositoryResult<()>;
    }
}

use crate::domain::item::ItemFlag;
use crate::domain::notification::{Notification, NotificationPatch, NotificationStats, ReadState};
use crate::domain::types::ItemId;
use crate::dto::pages::NotificationsPage;
use crate::dto::{CsvExport, ListQuery};
use crate::forms::notifications::NewNotificationForm;
use crate::repository::{ItemReader, ItemWriter};
use crate::services::{
    Scope, ServiceResult, export_items, list_projection, load_state, set_flag,
};
use crate::state::ListState;
use crate::state::sync::{BatchOutcome, SyncedList};

pub fn list_notifications<R>(
    repo: &R,
    scope: &Scope,
    query: &ListQuery,
) -> ServiceResult<NotificationsPage>
where
    R: ItemReader<Notification> + ?Sized,
{
    let filter = query.to_filter::<ReadState>()?;
    let (state, items) = list_projection(repo, scope, &filter)?;
    Ok(NotificationsPage {
        total: items.len(),
        items,
        stats: NotificationStats::from_items(state.items()),
    })
}

pub fn export_notifications<R>(
    repo: &R,
    scope: &Scope,
    query: &ListQuery,
) -> ServiceResult<CsvExport>
where
    R: ItemReader<Notification> + ?Sized,
{
    let filter = query.to_filter::<ReadState>()?;
    export_items::<Notification, _>(repo, scope, &filter, "notifications")
}

pub fn create_notification<R>(
    repo: &R,
    scope: &Scope,
    form: NewNotificationForm,
) -> ServiceResult<Notification>
where
    R: ItemWriter<Notification> + ?Sized,
{
    let draft = form.into_new_notification(scope.workspace_id)?;
    Ok(SyncedList::new(ListState::new(), repo).create(&draft)?)
}

pub fn mark_read<R>(repo: &R, scope: &Scope, id: &ItemId) -> ServiceResult<Notification>
where
    R: ItemReader<Notification> + ItemWriter<Notification> + ?Sized,
{
    set_flag(repo, scope, id, ItemFlag::Read, true)
}

/// Marks every unread, non-archived notification as read.
pub fn mark_all_read<R>(repo: &R, scope: &Scope) -> ServiceResult<BatchOutcome>
where
    R: ItemReader<Notification> + ItemWriter<Notification> + ?Sized,
{
    let state = load_state(repo, scope)?;
    let ids: Vec<ItemId> = state
        .items()
        .iter()
        .filter(|n| !n.read && !n.archived)
        .map(|n| n.id.clone())
        .collect();
    Ok(SyncedList::new(state, repo).patch_many(&ids, &NotificationPatch::read()))
}

/// Deletes every archived notification.
pub fn clear_archived<R>(repo: &R, scope: &Scope) -> ServiceResult<BatchOutcome>
where
    R: ItemReader<Notification> + ItemWriter<Notification> + ?Sized,
{
    let state = load_state(repo, scope)?;
    let ids: Vec<ItemId> = state
        .items()
        .iter()
        .filter(|n| n.archived)
        .map(|n| n.id.clone())
        .collect();
    let outcome = SyncedList::new(state, repo).remove_many(&ids);
    log::info!(
        "Cleared {} archived notifications in workspace {}",
        outcome.succeeded.len(),
        scope.workspace_id
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::item::ManagedItem;
    use crate::domain::notification::tests::notification;
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::MockNotificationStore;
    use crate::services::tests::scope;

    fn id(value: &str) -> ItemId {
        ItemId::new(value).unwrap()
    }

    fn inbox() -> Vec<Notification> {
        vec![
            notification("1", false, false),
            notification("2", true, false),
            notification("3", false, true),
            notification("4", false, false),
        ]
    }

    #[test]
    fn unread_filter_hides_read_and_archived() {
        let mut repo = MockNotificationStore::new();
        repo.expect_list_items().returning(|_| Ok(inbox()));
        let query = ListQuery {
            status: Some("unread".into()),
            ..ListQuery::default()
        };

        let page = list_notifications(&repo, &scope(), &query).unwrap();

        let ids: Vec<&str> = page.items.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "4"]);
        assert_eq!(page.stats.unread, 2);
        assert_eq!(page.stats.archived, 1);
    }

    #[test]
    fn mark_all_read_skips_archived() {
        let mut repo = MockNotificationStore::new();
        repo.expect_list_items().returning(|_| Ok(inbox()));
        repo.expect_patch_item()
            .times(2)
            .withf(|_, id, patch| id.as_str() != "3" && patch.read == Some(true))
            .returning(|_, id, patch| {
                let mut stored = notification(id.as_str(), false, false);
                stored.apply_patch(patch);
                Ok(stored)
            });

        let outcome = mark_all_read(&repo, &scope()).unwrap();
        assert_eq!(outcome.succeeded, vec![id("1"), id("4")]);
    }

    #[test]
    fn marking_read_twice_skips_the_store() {
        let mut repo = MockNotificationStore::new();
        repo.expect_get_item()
            .returning(|_, _| Ok(Some(notification("2", true, false))));
        repo.expect_patch_item().never();

        let item = mark_read(&repo, &scope(), &id("2")).unwrap();
        assert!(item.read);
    }

    #[test]
    fn clear_archived_reports_failures() {
        let mut repo = MockNotificationStore::new();
        repo.expect_list_items().returning(|_| {
            let mut items = inbox();
            items.push(notification("5", true, true));
            Ok(items)
        });
        repo.expect_delete_item().returning(|_, id| {
            if id.as_str() == "5" {
                Err(RepositoryError::DatabaseError("locked".into()))
            } else {
                Ok(())
            }
        });

        let outcome = clear_archived(&repo, &scope()).unwrap();

        assert_eq!(outcome.succeeded, vec![id("3")]);
        assert_eq!(outcome.failed.len(), 1);
    }
}

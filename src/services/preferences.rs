//! Workspace-scoped UI preferences such as notification sound or sidebar state.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::types::WorkspaceId;
use crate::repository::{PreferenceReader, PreferenceWriter};
use crate::services::{ServiceError, ServiceResult};

const MAX_KEY_LEN: usize = 64;

fn check_key(key: &str) -> ServiceResult<()> {
    let valid = !key.is_empty()
        && key.len() <= MAX_KEY_LEN
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if valid {
        Ok(())
    } else {
        Err(ServiceError::TypeConstraint(format!(
            "invalid preference key `{key}`"
        )))
    }
}

/// Raw stored value, `None` when never set.
pub fn get<R>(repo: &R, workspace_id: WorkspaceId, key: &str) -> ServiceResult<Option<Value>>
where
    R: PreferenceReader + ?Sized,
{
    check_key(key)?;
    repo.get_preference(workspace_id, key).map_err(|e| {
        log::error!("Failed to read preference {key} for workspace {workspace_id}: {e}");
        ServiceError::from(e)
    })
}

/// Typed value, falling back to `default` when missing or unreadable.
pub fn get_or_default<T, R>(
    repo: &R,
    workspace_id: WorkspaceId,
    key: &str,
    default: T,
) -> ServiceResult<T>
where
    T: DeserializeOwned,
    R: PreferenceReader + ?Sized,
{
    let Some(value) = get(repo, workspace_id, key)? else {
        return Ok(default);
    };
    match serde_json::from_value(value) {
        Ok(parsed) => Ok(parsed),
        Err(e) => {
            log::warn!("Ignoring unreadable preference {key} for workspace {workspace_id}: {e}");
            Ok(default)
        }
    }
}

pub fn set<T, R>(repo: &R, workspace_id: WorkspaceId, key: &str, value: &T) -> ServiceResult<()>
where
    T: Serialize + ?Sized,
    R: PreferenceWriter + ?Sized,
{
    check_key(key)?;
    let value = serde_json::to_value(value).map_err(|e| ServiceError::Internal(e.to_string()))?;
    repo.set_preference(workspace_id, key, &value).map_err(|e| {
        log::error!("Failed to store preference {key} for workspace {workspace_id}: {e}");
        ServiceError::from(e)
    })
}

/// Flips a boolean preference (unset counts as `false`) and returns the new
/// value.
pub fn toggle<R>(repo: &R, workspace_id: WorkspaceId, key: &str) -> ServiceResult<bool>
where
    R: PreferenceReader + PreferenceWriter + ?Sized,
{
    let next = !get_or_default(repo, workspace_id, key, false)?;
    set(repo, workspace_id, key, &next)?;
    Ok(next)
}

use chrono::Utc;
use diesel::prelude::*;
use serde_json::Value;

use crate::domain::types::WorkspaceId;
use crate::models::preference::PreferenceRow;
use crate::repository::errors::RepositoryResult;
use crate::repository::{DieselRepository, PreferenceReader, PreferenceWriter};
use crate::schema::preferences;

impl PreferenceReader for DieselRepository {
    fn get_preference(
        &self,
        workspace_id: WorkspaceId,
        key: &str,
    ) -> RepositoryResult<Option<Value>> {
        let mut conn = self.conn()?;
        let raw = preferences::table
            .filter(preferences::workspace_id.eq(workspace_id.get()))
            .filter(preferences::name.eq(key))
            .select(preferences::value)
            .first::<String>(&mut conn)
            .optional()?;

        Ok(raw.map(|raw| serde_json::from_str(&raw)).transpose()?)
    }
}

impl PreferenceWriter for DieselRepository {
    fn set_preference(
        &self,
        workspace_id: WorkspaceId,
        key: &str,
        value: &Value,
    ) -> RepositoryResult<()> {
        let mut conn = self.conn()?;
        let row = PreferenceRow {
            workspace_id: workspace_id.get(),
            name: key.to_string(),
            value: serde_json::to_string(value)?,
            updated_at: Utc::now().naive_utc(),
        };

        diesel::replace_into(preferences::table)
            .values(&row)
            .execute(&mut conn)?;
        Ok(())
    }
}

use chrono::NaiveDateTime;
use diesel::prelude::*;

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = crate::schema::preferences)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
/// One JSON-encoded preference value scoped to a workspace.
pub struct PreferenceRow {
    pub workspace_id: i32,
    pub name: String,
    pub value: String,
    pub updated_at: NaiveDateTime,
}

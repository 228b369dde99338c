use actix_web::{Responder, get, post, put, web};
use serde_json::Value;

use crate::dto::PreferenceValue;
use crate::repository::DieselRepository;
use crate::routes::{Workspace, json_response};
use crate::services::preferences;

#[get("/preferences/{key}")]
pub async fn show(
    workspace: Workspace,
    key: web::Path<String>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let key = key.into_inner();
    json_response(
        preferences::get(repo.get_ref(), workspace.0, &key).map(|value| PreferenceValue {
            key,
            value: value.unwrap_or(Value::Null),
        }),
    )
}

#[put("/preferences/{key}")]
pub async fn save(
    workspace: Workspace,
    key: web::Path<String>,
    web::Json(value): web::Json<Value>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let key = key.into_inner();
    json_response(
        preferences::set(repo.get_ref(), workspace.0, &key, &value)
            .map(|()| PreferenceValue { key, value }),
    )
}

#[post("/preferences/{key}/toggle")]
pub async fn toggle(
    workspace: Workspace,
    key: web::Path<String>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let key = key.into_inner();
    json_response(
        preferences::toggle(repo.get_ref(), workspace.0, &key).map(|value| PreferenceValue {
            key,
            value: Value::Bool(value),
        }),
    )
}

use actix_web::{Responder, delete as delete_route, get, post, web};

use crate::domain::notification::Notification;
use crate::dto::ListQuery;
use crate::forms::notifications::NewNotificationForm;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{
    Workspace, archive_response, created_response, csv_response, delete_response, json_response,
    parse_id,
};
use crate::services::notifications;

#[get("/notifications")]
pub async fn index(
    workspace: Workspace,
    query: web::Query<ListQuery>,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    json_response(notifications::list_notifications(
        repo.get_ref(),
        &workspace.scope(&config),
        &query,
    ))
}

#[get("/notifications/export")]
pub async fn export(
    workspace: Workspace,
    query: web::Query<ListQuery>,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    csv_response(notifications::export_notifications(
        repo.get_ref(),
        &workspace.scope(&config),
        &query,
    ))
}

#[post("/notifications")]
pub async fn create(
    workspace: Workspace,
    web::Json(form): web::Json<NewNotificationForm>,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    created_response(notifications::create_notification(
        repo.get_ref(),
        &workspace.scope(&config),
        form,
    ))
}

#[post("/notifications/read-all")]
pub async fn read_all(
    workspace: Workspace,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    json_response(notifications::mark_all_read(
        repo.get_ref(),
        &workspace.scope(&config),
    ))
}

#[post("/notifications/clear-archived")]
pub async fn clear_archived(
    workspace: Workspace,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    json_response(notifications::clear_archived(
        repo.get_ref(),
        &workspace.scope(&config),
    ))
}

#[post("/notifications/{id}/read")]
pub async fn read(
    workspace: Workspace,
    path: web::Path<String>,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    let id = match parse_id(&path) {
        Ok(id) => id,
        Err(response) => return response,
    };
    json_response(notifications::mark_read(
        repo.get_ref(),
        &workspace.scope(&config),
        &id,
    ))
}

#[post("/notifications/{id}/archive")]
pub async fn archive(
    workspace: Workspace,
    path: web::Path<String>,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    archive_response::<Notification>(workspace, &path, &repo, &config, true)
}

#[post("/notifications/{id}/unarchive")]
pub async fn unarchive(
    workspace: Workspace,
    path: web::Path<String>,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    archive_response::<Notification>(workspace, &path, &repo, &config, false)
}

#[delete_route("/notifications/{id}")]
pub async fn delete(
    workspace: Workspace,
    path: web::Path<String>,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    delete_response::<Notification>(workspace, &path, &repo, &config)
}

use actix_web::{Responder, delete as delete_route, get, post, web};

use crate::domain::work_order::WorkOrder;
use crate::dto::ListQuery;
use crate::forms::work_orders::{CompleteWorkOrderForm, NewWorkOrderForm, ProgressForm};
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{
    Workspace, archive_response, created_response, csv_response, delete_response, json_response,
    parse_id,
};
use crate::services::work_orders;

#[get("/work-orders")]
pub async fn index(
    workspace: Workspace,
    query: web::Query<ListQuery>,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    json_response(work_orders::list_work_orders(
        repo.get_ref(),
        &workspace.scope(&config),
        &query,
    ))
}

#[get("/work-orders/export")]
pub async fn export(
    workspace: Workspace,
    query: web::Query<ListQuery>,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    csv_response(work_orders::export_work_orders(
        repo.get_ref(),
        &workspace.scope(&config),
        &query,
    ))
}

#[post("/work-orders")]
pub async fn create(
    workspace: Workspace,
    web::Json(form): web::Json<NewWorkOrderForm>,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    created_response(work_orders::create_work_order(
        repo.get_ref(),
        &workspace.scope(&config),
        form,
    ))
}

#[post("/work-orders/{id}/start")]
pub async fn start(
    workspace: Workspace,
    path: web::Path<String>,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    let id = match parse_id(&path) {
        Ok(id) => id,
        Err(response) => return response,
    };
    json_response(work_orders::start_work_order(
        repo.get_ref(),
        &workspace.scope(&config),
        &id,
    ))
}

#[post("/work-orders/{id}/progress")]
pub async fn progress(
    workspace: Workspace,
    path: web::Path<String>,
    web::Json(form): web::Json<ProgressForm>,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    let id = match parse_id(&path) {
        Ok(id) => id,
        Err(response) => return response,
    };
    json_response(work_orders::update_progress(
        repo.get_ref(),
        &workspace.scope(&config),
        &id,
        form,
    ))
}

#[post("/work-orders/{id}/complete")]
pub async fn complete(
    workspace: Workspace,
    path: web::Path<String>,
    web::Json(form): web::Json<CompleteWorkOrderForm>,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    let id = match parse_id(&path) {
        Ok(id) => id,
        Err(response) => return response,
    };
    json_response(work_orders::complete_work_order(
        repo.get_ref(),
        &workspace.scope(&config),
        &id,
        form,
    ))
}

#[post("/work-orders/{id}/archive")]
pub async fn archive(
    workspace: Workspace,
    path: web::Path<String>,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    archive_response::<WorkOrder>(workspace, &path, &repo, &config, true)
}

#[post("/work-orders/{id}/unarchive")]
pub async fn unarchive(
    workspace: Workspace,
    path: web::Path<String>,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    archive_response::<WorkOrder>(workspace, &path, &repo, &config, false)
}

#[delete_route("/work-orders/{id}")]
pub async fn delete(
    workspace: Workspace,
    path: web::Path<String>,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    delete_response::<WorkOrder>(workspace, &path, &repo, &config)
}

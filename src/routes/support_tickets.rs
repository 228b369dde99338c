use actix_web::{Responder, delete as delete_route, get, post, web};

use crate::domain::support_ticket::SupportTicket;
use crate::dto::ListQuery;
use crate::forms::support_tickets::{
    AssignTicketForm, NewTicketForm, RateTicketForm, ResolveTicketForm, TicketStatusForm,
};
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{
    Workspace, archive_response, created_response, csv_response, delete_response, json_response,
    parse_id,
};
use crate::services::support_tickets;

#[get("/tickets")]
pub async fn index(
    workspace: Workspace,
    query: web::Query<ListQuery>,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    json_response(support_tickets::list_tickets(
        repo.get_ref(),
        &workspace.scope(&config),
        &query,
    ))
}

#[get("/tickets/export")]
pub async fn export(
    workspace: Workspace,
    query: web::Query<ListQuery>,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    csv_response(support_tickets::export_tickets(
        repo.get_ref(),
        &workspace.scope(&config),
        &query,
    ))
}

#[post("/tickets")]
pub async fn create(
    workspace: Workspace,
    web::Json(form): web::Json<NewTicketForm>,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    created_response(support_tickets::create_ticket(
        repo.get_ref(),
        &workspace.scope(&config),
        form,
    ))
}

#[post("/tickets/{id}/status")]
pub async fn status(
    workspace: Workspace,
    path: web::Path<String>,
    web::Json(form): web::Json<TicketStatusForm>,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    let id = match parse_id(&path) {
        Ok(id) => id,
        Err(response) => return response,
    };
    json_response(support_tickets::change_status(
        repo.get_ref(),
        &workspace.scope(&config),
        &id,
        form,
    ))
}

#[post("/tickets/{id}/assign")]
pub async fn assign(
    workspace: Workspace,
    path: web::Path<String>,
    web::Json(form): web::Json<AssignTicketForm>,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    let id = match parse_id(&path) {
        Ok(id) => id,
        Err(response) => return response,
    };
    json_response(support_tickets::assign_ticket(
        repo.get_ref(),
        &workspace.scope(&config),
        &id,
        form,
    ))
}

#[post("/tickets/{id}/respond")]
pub async fn respond(
    workspace: Workspace,
    path: web::Path<String>,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    let id = match parse_id(&path) {
        Ok(id) => id,
        Err(response) => return response,
    };
    json_response(support_tickets::record_first_response(
        repo.get_ref(),
        &workspace.scope(&config),
        &id,
    ))
}

#[post("/tickets/{id}/resolve")]
pub async fn resolve(
    workspace: Workspace,
    path: web::Path<String>,
    form: Option<web::Json<ResolveTicketForm>>,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    let id = match parse_id(&path) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let form = form.map(web::Json::into_inner).unwrap_or_default();
    json_response(support_tickets::resolve_ticket(
        repo.get_ref(),
        &workspace.scope(&config),
        &id,
        form,
    ))
}

#[post("/tickets/{id}/rate")]
pub async fn rate(
    workspace: Workspace,
    path: web::Path<String>,
    web::Json(form): web::Json<RateTicketForm>,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    let id = match parse_id(&path) {
        Ok(id) => id,
        Err(response) => return response,
    };
    json_response(support_tickets::rate_ticket(
        repo.get_ref(),
        &workspace.scope(&config),
        &id,
        form,
    ))
}

#[post("/tickets/{id}/archive")]
pub async fn archive(
    workspace: Workspace,
    path: web::Path<String>,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    archive_response::<SupportTicket>(workspace, &path, &repo, &config, true)
}

#[post("/tickets/{id}/unarchive")]
pub async fn unarchive(
    workspace: Workspace,
    path: web::Path<String>,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    archive_response::<SupportTicket>(workspace, &path, &repo, &config, false)
}

#[delete_route("/tickets/{id}")]
pub async fn delete(
    workspace: Workspace,
    path: web::Path<String>,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    delete_response::<SupportTicket>(workspace, &path, &repo, &config)
}

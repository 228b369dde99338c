use actix_web::{Responder, delete as delete_route, get, post, web};

use crate::domain::booking::Booking;
use crate::dto::ListQuery;
use crate::forms::bookings::{CancelBookingForm, NewBookingForm, RescheduleForm};
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{
    Workspace, archive_response, created_response, csv_response, delete_response, json_response,
    parse_id,
};
use crate::services::bookings;

#[get("/bookings")]
pub async fn index(
    workspace: Workspace,
    query: web::Query<ListQuery>,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    json_response(bookings::list_bookings(
        repo.get_ref(),
        &workspace.scope(&config),
        &query,
    ))
}

#[get("/bookings/export")]
pub async fn export(
    workspace: Workspace,
    query: web::Query<ListQuery>,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    csv_response(bookings::export_bookings(
        repo.get_ref(),
        &workspace.scope(&config),
        &query,
    ))
}

#[post("/bookings")]
pub async fn create(
    workspace: Workspace,
    web::Json(form): web::Json<NewBookingForm>,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    created_response(bookings::create_booking(
        repo.get_ref(),
        &workspace.scope(&config),
        form,
    ))
}

#[post("/bookings/confirm-pending")]
pub async fn confirm_all(
    workspace: Workspace,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    json_response(bookings::confirm_all_pending(
        repo.get_ref(),
        &workspace.scope(&config),
    ))
}

#[post("/bookings/cancel-pending")]
pub async fn cancel_all(
    workspace: Workspace,
    web::Json(form): web::Json<CancelBookingForm>,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    json_response(bookings::cancel_all_pending(
        repo.get_ref(),
        &workspace.scope(&config),
        form,
    ))
}

#[post("/bookings/send-reminders")]
pub async fn remind_all(
    workspace: Workspace,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    json_response(bookings::send_all_reminders(
        repo.get_ref(),
        &workspace.scope(&config),
    ))
}

#[post("/bookings/{id}/confirm")]
pub async fn confirm(
    workspace: Workspace,
    path: web::Path<String>,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    let id = match parse_id(&path) {
        Ok(id) => id,
        Err(response) => return response,
    };
    json_response(bookings::confirm_booking(
        repo.get_ref(),
        &workspace.scope(&config),
        &id,
    ))
}

#[post("/bookings/{id}/cancel")]
pub async fn cancel(
    workspace: Workspace,
    path: web::Path<String>,
    web::Json(form): web::Json<CancelBookingForm>,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    let id = match parse_id(&path) {
        Ok(id) => id,
        Err(response) => return response,
    };
    json_response(bookings::cancel_booking(
        repo.get_ref(),
        &workspace.scope(&config),
        &id,
        form,
    ))
}

#[post("/bookings/{id}/reschedule")]
pub async fn reschedule(
    workspace: Workspace,
    path: web::Path<String>,
    web::Json(form): web::Json<RescheduleForm>,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    let id = match parse_id(&path) {
        Ok(id) => id,
        Err(response) => return response,
    };
    json_response(bookings::reschedule_booking(
        repo.get_ref(),
        &workspace.scope(&config),
        &id,
        form,
    ))
}

#[post("/bookings/{id}/remind")]
pub async fn remind(
    workspace: Workspace,
    path: web::Path<String>,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    let id = match parse_id(&path) {
        Ok(id) => id,
        Err(response) => return response,
    };
    json_response(bookings::send_reminder(
        repo.get_ref(),
        &workspace.scope(&config),
        &id,
    ))
}

#[post("/bookings/{id}/archive")]
pub async fn archive(
    workspace: Workspace,
    path: web::Path<String>,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    archive_response::<Booking>(workspace, &path, &repo, &config, true)
}

#[post("/bookings/{id}/unarchive")]
pub async fn unarchive(
    workspace: Workspace,
    path: web::Path<String>,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    archive_response::<Booking>(workspace, &path, &repo, &config, false)
}

#[delete_route("/bookings/{id}")]
pub async fn delete(
    workspace: Workspace,
    path: web::Path<String>,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    delete_response::<Booking>(workspace, &path, &repo, &config)
}

//! JSON API handlers.

use std::future::{Ready, ready};

use actix_web::dev::Payload;
use actix_web::http::header::{self, ContentDisposition, DispositionParam, DispositionType};
use actix_web::{FromRequest, HttpRequest, HttpResponse, web};
use serde::Serialize;
use serde_json::json;

use crate::domain::item::ManagedItem;
use crate::domain::types::{ItemId, WorkspaceId};
use crate::dto::CsvExport;
use crate::models::config::ServerConfig;
use crate::repository::{DieselRepository, ItemReader, ItemWriter};
use crate::services::{self, Scope, ServiceError, ServiceResult};

pub mod bookings;
pub mod notifications;
pub mod preferences;
pub mod support_tickets;
pub mod work_orders;

pub const WORKSPACE_HEADER: &str = "X-Workspace-Id";

/// Tenant resolved from the `X-Workspace-Id` header.
#[derive(Debug, Clone, Copy)]
pub struct Workspace(pub WorkspaceId);

impl FromRequest for Workspace {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let workspace = req
            .headers()
            .get(WORKSPACE_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<i32>().ok())
            .and_then(|value| WorkspaceId::new(value).ok());

        ready(match workspace {
            Some(id) => Ok(Workspace(id)),
            None => Err(actix_web::error::ErrorUnauthorized(
                json!({ "error": "missing or invalid workspace" }).to_string(),
            )),
        })
    }
}

impl Workspace {
    /// Request scope bounded by the configured list limit.
    pub fn scope(&self, config: &ServerConfig) -> Scope {
        Scope::new(self.0).limit(config.list_limit)
    }
}

/// Registers every handler under `/api/v1`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .service(bookings::index)
            .service(bookings::export)
            .service(bookings::create)
            .service(bookings::confirm_all)
            .service(bookings::cancel_all)
            .service(bookings::remind_all)
            .service(bookings::confirm)
            .service(bookings::cancel)
            .service(bookings::reschedule)
            .service(bookings::remind)
            .service(bookings::archive)
            .service(bookings::unarchive)
            .service(bookings::delete)
            .service(notifications::index)
            .service(notifications::export)
            .service(notifications::create)
            .service(notifications::read_all)
            .service(notifications::clear_archived)
            .service(notifications::read)
            .service(notifications::archive)
            .service(notifications::unarchive)
            .service(notifications::delete)
            .service(support_tickets::index)
            .service(support_tickets::export)
            .service(support_tickets::create)
            .service(support_tickets::status)
            .service(support_tickets::assign)
            .service(support_tickets::respond)
            .service(support_tickets::resolve)
            .service(support_tickets::rate)
            .service(support_tickets::archive)
            .service(support_tickets::unarchive)
            .service(support_tickets::delete)
            .service(work_orders::index)
            .service(work_orders::export)
            .service(work_orders::create)
            .service(work_orders::start)
            .service(work_orders::progress)
            .service(work_orders::complete)
            .service(work_orders::archive)
            .service(work_orders::unarchive)
            .service(work_orders::delete)
            .service(preferences::show)
            .service(preferences::save)
            .service(preferences::toggle),
    );
}

/// Archives or restores one item of any collection.
pub(crate) fn archive_response<T>(
    workspace: Workspace,
    raw_id: &str,
    repo: &DieselRepository,
    config: &ServerConfig,
    archived: bool,
) -> HttpResponse
where
    T: ManagedItem + Serialize,
    DieselRepository: ItemReader<T> + ItemWriter<T>,
{
    let id = match parse_id(raw_id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    json_response(services::set_archived::<T, _>(
        repo,
        &workspace.scope(config),
        &id,
        archived,
    ))
}

pub(crate) fn delete_response<T>(
    workspace: Workspace,
    raw_id: &str,
    repo: &DieselRepository,
    config: &ServerConfig,
) -> HttpResponse
where
    T: ManagedItem + Serialize,
    DieselRepository: ItemReader<T> + ItemWriter<T>,
{
    let id = match parse_id(raw_id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    json_response(services::delete_item::<T, _>(
        repo,
        &workspace.scope(config),
        &id,
    ))
}

pub(crate) fn parse_id(raw: &str) -> Result<ItemId, HttpResponse> {
    ItemId::new(raw)
        .map_err(|e| HttpResponse::BadRequest().json(json!({ "error": e.to_string() })))
}

/// Maps service failures onto HTTP statuses with a JSON body.
pub(crate) fn error_response(err: ServiceError) -> HttpResponse {
    match err {
        ServiceError::NotFound => HttpResponse::NotFound().json(json!({ "error": "not found" })),
        ServiceError::Form(_) | ServiceError::TypeConstraint(_) => {
            HttpResponse::BadRequest().json(json!({ "error": err.to_string() }))
        }
        ServiceError::Conflict(_) => {
            HttpResponse::Conflict().json(json!({ "error": err.to_string() }))
        }
        ServiceError::Internal(e) => {
            log::error!("Request failed: {e}");
            HttpResponse::InternalServerError().json(json!({ "error": "internal error" }))
        }
    }
}

pub(crate) fn json_response<T: Serialize>(result: ServiceResult<T>) -> HttpResponse {
    match result {
        Ok(value) => HttpResponse::Ok().json(value),
        Err(e) => error_response(e),
    }
}

pub(crate) fn created_response<T: Serialize>(result: ServiceResult<T>) -> HttpResponse {
    match result {
        Ok(value) => HttpResponse::Created().json(value),
        Err(e) => error_response(e),
    }
}

pub(crate) fn csv_response(result: ServiceResult<CsvExport>) -> HttpResponse {
    match result {
        Ok(export) => HttpResponse::Ok()
            .insert_header((header::CONTENT_TYPE, "text/csv; charset=utf-8"))
            .insert_header(ContentDisposition {
                disposition: DispositionType::Attachment,
                parameters: vec![DispositionParam::Filename(export.filename)],
            })
            .body(export.content),
        Err(e) => error_response(e),
    }
}

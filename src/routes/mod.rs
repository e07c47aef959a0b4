//! HTTP routes of the member search API.

use actix_web::{HttpResponse, Responder, get, web};

use crate::services::ServiceError;

pub mod members;

/// Liveness check.
#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().finish()
}

/// Registers every route of the API on the given service config.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health)
        .service(members::search_members_v1)
        .service(members::show_member)
        .service(members::search_members_v2)
        .service(members::search_members_v3);
}

/// Maps a service failure onto an HTTP response, logging unexpected errors.
pub fn error_response(action: &str, err: ServiceError) -> HttpResponse {
    match err {
        ServiceError::TypeConstraint(message) => HttpResponse::BadRequest().body(message),
        ServiceError::NotFound => HttpResponse::NotFound().finish(),
        err => {
            log::error!("Failed to {action}: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

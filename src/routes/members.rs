use actix_web::{HttpResponse, Responder, get, web};

use crate::dto::members::MemberSearchParams;
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::members::{self as members_service, PageStrategy};

#[get("/v1/members")]
pub async fn search_members_v1(
    params: web::Query<MemberSearchParams>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match members_service::search_members(repo.get_ref(), &params) {
        Ok(rows) => HttpResponse::Ok().json(rows),
        Err(err) => error_response("search members", err),
    }
}

#[get("/v1/members/{member_id}")]
pub async fn show_member(
    member_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match members_service::get_member(repo.get_ref(), member_id.into_inner()) {
        Ok(member) => HttpResponse::Ok().json(member),
        Err(err) => error_response("show member", err),
    }
}

#[get("/v2/members")]
pub async fn search_members_v2(
    params: web::Query<MemberSearchParams>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match members_service::search_members_page(repo.get_ref(), &params, PageStrategy::Simple) {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(err) => error_response("search member page", err),
    }
}

#[get("/v3/members")]
pub async fn search_members_v3(
    params: web::Query<MemberSearchParams>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match members_service::search_members_page(repo.get_ref(), &params, PageStrategy::Optimized) {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(err) => error_response("search member page", err),
    }
}

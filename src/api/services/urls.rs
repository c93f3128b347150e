//! 短链接 CRUD（管理域 `/api/urls`）

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use url::Url;

use super::helpers::{ListQuery, PaginationInfo, error_json, internal_error};
use crate::storage::{AppStorage, NewShortLink, SessionInfo, ShortLink, ShortLinkUpdate};
use crate::utils::{SLUG_FORMAT_MESSAGE, is_valid_slug};

#[derive(Debug, Deserialize)]
pub struct CreateUrlBody {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub destination: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUrlBody {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub destination: Option<String>,
}

#[derive(Serialize)]
struct UrlList {
    urls: Vec<ShortLink>,
    pagination: PaginationInfo,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UrlWithCount {
    #[serde(flatten)]
    link: ShortLink,
    visit_count: u64,
}

pub async fn list_urls(
    query: web::Query<ListQuery>,
    storage: web::Data<Arc<AppStorage>>,
) -> HttpResponse {
    let (page, limit) = (query.page(), query.limit());

    match storage.list_links(page, limit, query.search.as_deref()).await {
        Ok((urls, total)) => HttpResponse::Ok().json(UrlList {
            urls,
            pagination: PaginationInfo::new(page, limit, total),
        }),
        Err(e) => internal_error("Failed to fetch URLs", &e),
    }
}

pub async fn create_url(
    body: web::Json<CreateUrlBody>,
    storage: web::Data<Arc<AppStorage>>,
    session: web::ReqData<SessionInfo>,
) -> HttpResponse {
    let body = body.into_inner();
    let (Some(name), Some(slug), Some(destination)) = (body.name, body.slug, body.destination)
    else {
        return error_json(
            StatusCode::BAD_REQUEST,
            "Name, slug, and destination are required",
        );
    };

    if !is_valid_slug(&slug) {
        return error_json(StatusCode::BAD_REQUEST, SLUG_FORMAT_MESSAGE);
    }

    match storage.link_slug_taken(&slug).await {
        Ok(true) => return error_json(StatusCode::BAD_REQUEST, "Slug already exists"),
        Ok(false) => {}
        Err(e) => return internal_error("Failed to create URL", &e),
    }

    if Url::parse(&destination).is_err() {
        return error_json(StatusCode::BAD_REQUEST, "Invalid destination URL");
    }

    let new = NewShortLink {
        name,
        slug,
        destination,
        user_id: session.user_id.clone(),
    };

    match storage.create_link(new).await {
        Ok(link) => HttpResponse::Created().json(link),
        Err(e) => internal_error("Failed to create URL", &e),
    }
}

pub async fn get_url(
    id: web::Path<String>,
    storage: web::Data<Arc<AppStorage>>,
) -> HttpResponse {
    let id = id.into_inner();

    let link = match storage.get_link(&id).await {
        Ok(Some(link)) => link,
        Ok(None) => return error_json(StatusCode::NOT_FOUND, "URL not found"),
        Err(e) => return internal_error("Failed to fetch URL", &e),
    };

    match storage.link_click_count(&id).await {
        Ok(visit_count) => HttpResponse::Ok().json(UrlWithCount { link, visit_count }),
        Err(e) => internal_error("Failed to fetch URL", &e),
    }
}

pub async fn update_url(
    id: web::Path<String>,
    body: web::Json<UpdateUrlBody>,
    storage: web::Data<Arc<AppStorage>>,
    session: web::ReqData<SessionInfo>,
) -> HttpResponse {
    let id = id.into_inner();
    let body = body.into_inner();

    let existing = match storage.get_link(&id).await {
        Ok(Some(link)) => link,
        Ok(None) => return error_json(StatusCode::NOT_FOUND, "URL not found"),
        Err(e) => return internal_error("Failed to update URL", &e),
    };

    if let Some(ref slug) = body.slug {
        if !is_valid_slug(slug) {
            return error_json(StatusCode::BAD_REQUEST, SLUG_FORMAT_MESSAGE);
        }
        if *slug != existing.slug {
            match storage.link_slug_taken(slug).await {
                Ok(true) => return error_json(StatusCode::BAD_REQUEST, "Slug already exists"),
                Ok(false) => {}
                Err(e) => return internal_error("Failed to update URL", &e),
            }
        }
    }

    if let Some(ref destination) = body.destination
        && Url::parse(destination).is_err()
    {
        return error_json(StatusCode::BAD_REQUEST, "Invalid destination URL");
    }

    let update = ShortLinkUpdate {
        name: body.name,
        slug: body.slug,
        destination: body.destination,
        user_id: session.user_id.clone(),
    };

    match storage.update_link(&id, update).await {
        Ok(Some(link)) => HttpResponse::Ok().json(link),
        Ok(None) => error_json(StatusCode::NOT_FOUND, "URL not found"),
        Err(e) => internal_error("Failed to update URL", &e),
    }
}

pub async fn delete_url(
    id: web::Path<String>,
    storage: web::Data<Arc<AppStorage>>,
) -> HttpResponse {
    let id = id.into_inner();

    match storage.get_link(&id).await {
        Ok(Some(_)) => {}
        Ok(None) => return error_json(StatusCode::NOT_FOUND, "URL not found"),
        Err(e) => return internal_error("Failed to delete URL", &e),
    }

    match storage.delete_link(&id).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "success": true })),
        Err(e) => internal_error("Failed to delete URL", &e),
    }
}

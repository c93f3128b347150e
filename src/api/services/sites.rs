//! 站点 CRUD（管理域 `/api/sites`）
//!
//! 站点删除的顺序约定：先尽力清理对象存储子树（失败只记日志），
//! 再删分析记录和站点行。对象清理失败绝不阻塞删库。

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::helpers::{ListQuery, PaginationInfo, error_json, internal_error};
use crate::object_store::ObjectStore;
use crate::storage::{AppStorage, NewSite, SessionInfo, Site, SiteUpdate};
use crate::utils::{SLUG_FORMAT_MESSAGE, is_valid_slug};

#[derive(Debug, Deserialize)]
pub struct CreateSiteBody {
    pub name: Option<String>,
    pub slug: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSiteBody {
    pub name: Option<String>,
    pub slug: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SiteWithFileCount {
    #[serde(flatten)]
    site: Site,
    file_count: usize,
}

#[derive(Serialize)]
struct SiteList {
    sites: Vec<SiteWithFileCount>,
    pagination: PaginationInfo,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SiteDetails {
    #[serde(flatten)]
    site: Site,
    visit_count: u64,
    file_count: usize,
}

/// 站点文件数，对象存储不可用时按 0 处理
async fn file_count(store: &dyn ObjectStore, site: &Site) -> usize {
    match store.list(&site.object_prefix()).await {
        Ok(objects) => objects.len(),
        Err(e) => {
            warn!("File count for site '{}' unavailable: {}", site.id, e);
            0
        }
    }
}

pub async fn list_sites(
    query: web::Query<ListQuery>,
    storage: web::Data<Arc<AppStorage>>,
    store: web::Data<Arc<dyn ObjectStore>>,
) -> HttpResponse {
    let (page, limit) = (query.page(), query.limit());

    let (sites, total) = match storage.list_sites(page, limit, query.search.as_deref()).await {
        Ok(result) => result,
        Err(e) => return internal_error("Failed to fetch sites", &e),
    };

    let mut enriched = Vec::with_capacity(sites.len());
    for site in sites {
        let file_count = file_count(store.as_ref().as_ref(), &site).await;
        enriched.push(SiteWithFileCount { site, file_count });
    }

    HttpResponse::Ok().json(SiteList {
        sites: enriched,
        pagination: PaginationInfo::new(page, limit, total),
    })
}

pub async fn create_site(
    body: web::Json<CreateSiteBody>,
    storage: web::Data<Arc<AppStorage>>,
    session: web::ReqData<SessionInfo>,
) -> HttpResponse {
    let body = body.into_inner();
    let (Some(name), Some(slug)) = (body.name, body.slug) else {
        return error_json(StatusCode::BAD_REQUEST, "Name and slug are required");
    };

    if !is_valid_slug(&slug) {
        return error_json(StatusCode::BAD_REQUEST, SLUG_FORMAT_MESSAGE);
    }

    match storage.site_slug_taken(&slug).await {
        Ok(true) => return error_json(StatusCode::BAD_REQUEST, "Slug already exists"),
        Ok(false) => {}
        Err(e) => return internal_error("Failed to create site", &e),
    }

    let new = NewSite {
        name,
        slug,
        user_id: session.user_id.clone(),
    };

    match storage.create_site(new).await {
        Ok(site) => HttpResponse::Created().json(site),
        Err(e) => internal_error("Failed to create site", &e),
    }
}

pub async fn get_site(
    id: web::Path<String>,
    storage: web::Data<Arc<AppStorage>>,
    store: web::Data<Arc<dyn ObjectStore>>,
) -> HttpResponse {
    let id = id.into_inner();

    let site = match storage.get_site(&id).await {
        Ok(Some(site)) => site,
        Ok(None) => return error_json(StatusCode::NOT_FOUND, "Site not found"),
        Err(e) => return internal_error("Failed to fetch site", &e),
    };

    let visit_count = match storage.site_visit_count(&id).await {
        Ok(count) => count,
        Err(e) => return internal_error("Failed to fetch site", &e),
    };
    let file_count = file_count(store.as_ref().as_ref(), &site).await;

    HttpResponse::Ok().json(SiteDetails {
        site,
        visit_count,
        file_count,
    })
}

pub async fn update_site(
    id: web::Path<String>,
    body: web::Json<UpdateSiteBody>,
    storage: web::Data<Arc<AppStorage>>,
    session: web::ReqData<SessionInfo>,
) -> HttpResponse {
    let id = id.into_inner();
    let body = body.into_inner();

    let existing = match storage.get_site(&id).await {
        Ok(Some(site)) => site,
        Ok(None) => return error_json(StatusCode::NOT_FOUND, "Site not found"),
        Err(e) => return internal_error("Failed to update site", &e),
    };

    if let Some(ref slug) = body.slug {
        if !is_valid_slug(slug) {
            return error_json(StatusCode::BAD_REQUEST, SLUG_FORMAT_MESSAGE);
        }
        if *slug != existing.slug {
            match storage.site_slug_taken(slug).await {
                Ok(true) => return error_json(StatusCode::BAD_REQUEST, "Slug already exists"),
                Ok(false) => {}
                Err(e) => return internal_error("Failed to update site", &e),
            }
        }
    }

    let update = SiteUpdate {
        name: body.name,
        slug: body.slug,
        user_id: session.user_id.clone(),
    };

    match storage.update_site(&id, update).await {
        Ok(Some(site)) => HttpResponse::Ok().json(site),
        Ok(None) => error_json(StatusCode::NOT_FOUND, "Site not found"),
        Err(e) => internal_error("Failed to update site", &e),
    }
}

pub async fn delete_site(
    id: web::Path<String>,
    storage: web::Data<Arc<AppStorage>>,
    store: web::Data<Arc<dyn ObjectStore>>,
) -> HttpResponse {
    let id = id.into_inner();

    let existing = match storage.get_site(&id).await {
        Ok(Some(site)) => site,
        Ok(None) => return error_json(StatusCode::NOT_FOUND, "Site not found"),
        Err(e) => return internal_error("Failed to delete site", &e),
    };

    // 尽力清掉对象子树；失败不阻塞删库
    match store.delete_folder(&existing.object_prefix()).await {
        Ok(deleted) => info!("Deleted {} objects for site '{}'", deleted, id),
        Err(e) => warn!("Failed to delete objects for site '{}': {}", id, e),
    }

    match storage.delete_site(&id).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "success": true })),
        Err(e) => internal_error("Failed to delete site", &e),
    }
}

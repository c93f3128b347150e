//! 公开站点文件服务（站点托管域）

use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, web};
use tracing::{debug, error};

use crate::config::get_config;
use crate::errors::ShorthostError;
use crate::object_store::ObjectStore;
use crate::services::{VisitDetail, VisitRecorder, resolve_asset};
use crate::storage::AppStorage;
use crate::utils::generate_correlation_id;

/// `/{slug}`（无路径）
pub async fn serve_site_root(
    req: HttpRequest,
    path: web::Path<String>,
    storage: web::Data<Arc<AppStorage>>,
    store: web::Data<Arc<dyn ObjectStore>>,
    recorder: web::Data<VisitRecorder>,
) -> HttpResponse {
    let slug = path.into_inner();
    serve(req, slug, String::new(), storage, store, recorder).await
}

/// `/{slug}/{path...}`
pub async fn serve_site_asset(
    req: HttpRequest,
    path: web::Path<(String, String)>,
    storage: web::Data<Arc<AppStorage>>,
    store: web::Data<Arc<dyn ObjectStore>>,
    recorder: web::Data<VisitRecorder>,
) -> HttpResponse {
    let (slug, asset_path) = path.into_inner();
    serve(req, slug, asset_path, storage, store, recorder).await
}

async fn serve(
    req: HttpRequest,
    slug: String,
    asset_path: String,
    storage: web::Data<Arc<AppStorage>>,
    store: web::Data<Arc<dyn ObjectStore>>,
    recorder: web::Data<VisitRecorder>,
) -> HttpResponse {
    let site = match storage.get_site_by_slug(&slug).await {
        Ok(Some(site)) => site,
        Ok(None) => {
            debug!("Unknown site slug: {}", slug);
            return not_found("Site not found");
        }
        Err(e) => return server_error("Site lookup", &e),
    };

    // `/{slug}/sub/` 的结尾斜杠要进解析策略，丢了就从原始 URI 补回来
    let raw_path = if !asset_path.is_empty()
        && !asset_path.ends_with('/')
        && req.path().ends_with('/')
    {
        format!("{}/", asset_path)
    } else {
        asset_path
    };

    let resolved = match resolve_asset(store.as_ref().as_ref(), &site.fs_path, &raw_path).await {
        Ok(resolved) => resolved,
        Err(e) => return server_error("Asset resolution", &e),
    };

    let region_header = &get_config().analytics.region_header;
    recorder.record_site_visit(&site.id, VisitDetail::from_request(&req, region_header));

    match store.get(&resolved.key).await {
        Ok(body) => {
            let mut builder = HttpResponse::Ok();
            builder
                .insert_header(("Content-Type", resolved.content_type))
                .insert_header(("Cache-Control", resolved.cache_control));
            if let Some(length) = body.content_length {
                builder.no_chunking(length);
            }
            builder.streaming(body.stream)
        }
        Err(ShorthostError::ObjectNotFound(_)) => {
            debug!("Object missing for site '{}': {}", slug, resolved.key);
            not_found("File not found")
        }
        Err(e) => server_error("Object fetch", &e),
    }
}

fn not_found(message: &str) -> HttpResponse {
    HttpResponse::NotFound()
        .insert_header(("Content-Type", "text/plain; charset=utf-8"))
        .body(message.to_string())
}

fn server_error(context: &str, err: &ShorthostError) -> HttpResponse {
    let correlation_id = generate_correlation_id();
    error!("[{}] {} failed: {}", correlation_id, context, err);
    HttpResponse::InternalServerError()
        .insert_header(("Content-Type", "text/plain; charset=utf-8"))
        .body(format!("Internal Server Error (ref: {})", correlation_id))
}

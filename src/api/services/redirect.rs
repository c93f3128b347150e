//! 短链接跳转服务
//!
//! 公开面上的失败永远是跳到类型化错误页，不暴露原始错误。

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;
use tracing::{debug, error, trace};

use crate::config::get_config;
use crate::services::{VisitDetail, VisitRecorder};
use crate::storage::AppStorage;
use crate::utils::ip::extract_client_ip;
use crate::utils::{generate_correlation_id, is_valid_slug};

/// 裸索引请求对应的保留 slug
pub const INDEX_SENTINEL: &str = "_<index";

pub struct RedirectService {}

impl RedirectService {
    pub async fn handle_redirect(
        req: HttpRequest,
        path: web::Path<String>,
        storage: web::Data<Arc<AppStorage>>,
        recorder: web::Data<VisitRecorder>,
    ) -> HttpResponse {
        let captured_path = path.into_inner();

        let slug = if captured_path.is_empty() {
            // 裸索引走保留 slug，不做字符校验
            INDEX_SENTINEL.to_string()
        } else {
            let segments: Vec<&str> =
                captured_path.split('/').filter(|s| !s.is_empty()).collect();
            if let Some(bad) = segments.iter().find(|s| !is_valid_slug(s)) {
                trace!("Illegal path segment rejected: {}", bad);
                return Self::error_redirect("ERR_ILLEGAL_PATH", None);
            }
            segments.join("/")
        };

        match storage.get_link_by_slug(&slug).await {
            Ok(Some(link)) => {
                let detail = VisitDetail {
                    ip: extract_client_ip(&req),
                    // 短链接的地区一律走 GeoIP
                    region: None,
                    user_agent: req
                        .headers()
                        .get("user-agent")
                        .and_then(|h| h.to_str().ok())
                        .map(String::from),
                };
                recorder.record_link_click(&link.id, detail);

                HttpResponse::build(StatusCode::TEMPORARY_REDIRECT)
                    .insert_header(("Location", link.destination))
                    .finish()
            }
            Ok(None) => {
                debug!("Short link not found: {}", slug);
                Self::error_redirect("ERR_NOT_FOUND", None)
            }
            Err(e) => {
                let correlation_id = generate_correlation_id();
                error!("[{}] Redirect lookup for '{}' failed: {}", correlation_id, slug, e);
                Self::error_redirect("SERVER_SIDE_ERR", Some(&correlation_id))
            }
        }
    }

    /// 跳转到类型化错误页
    fn error_redirect(error_type: &str, correlation_id: Option<&str>) -> HttpResponse {
        let base = &get_config().domains.public_base_url;
        let location = match correlation_id {
            Some(id) => format!("{}/err?type={}&id={}", base, error_type, id),
            None => format!("{}/err?type={}", base, error_type),
        };

        HttpResponse::build(StatusCode::TEMPORARY_REDIRECT)
            .insert_header(("Location", location))
            .finish()
    }
}

#[derive(Debug, Deserialize)]
pub struct ErrorPageQuery {
    #[serde(rename = "type")]
    pub error_type: Option<String>,
    pub id: Option<String>,
}

/// 类型化错误页（短链接域 `/err`）
pub async fn error_page(query: web::Query<ErrorPageQuery>) -> HttpResponse {
    let (title, detail) = match query.error_type.as_deref() {
        Some("ERR_ILLEGAL_PATH") => (
            "Illegal path",
            "The requested path contains characters that are not allowed.".to_string(),
        ),
        Some("ERR_NOT_FOUND") => (
            "Not found",
            "This short link does not exist or has been removed.".to_string(),
        ),
        Some("SERVER_SIDE_ERR") => (
            "Server error",
            match query.id.as_deref() {
                Some(id) => format!(
                    "Something went wrong on our side. Reference: {}",
                    id
                ),
                None => "Something went wrong on our side.".to_string(),
            },
        ),
        _ => ("Error", "An unknown error occurred.".to_string()),
    };

    HttpResponse::Ok()
        .insert_header(("Content-Type", "text/html; charset=utf-8"))
        .insert_header(("Cache-Control", "no-store"))
        .body(format!(
            "<!DOCTYPE html>\n<html>\n<head><title>{title}</title></head>\n\
             <body>\n<h1>{title}</h1>\n<p>{detail}</p>\n</body>\n</html>\n"
        ))
}

//! Admin API 帮助函数
//!
//! 所有 JSON 错误响应统一为 `{ "error": string }`。上游存储错误
//! 生成关联 ID：细节进日志，客户端只拿到带 ref 的通用文案。

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::errors::ShorthostError;
use crate::utils::generate_correlation_id;

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// 构建 JSON 错误响应
pub fn error_json(status: StatusCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ErrorBody {
            error: message.into(),
        })
}

/// 上游存储错误：真实错误以关联 ID 记入日志，客户端只见通用文案
pub fn internal_error(context: &str, err: &ShorthostError) -> HttpResponse {
    let correlation_id = generate_correlation_id();
    error!("[{}] {}: {}", correlation_id, context, err);
    error_json(
        StatusCode::INTERNAL_SERVER_ERROR,
        format!("{} (ref: {})", context, correlation_id),
    )
}

/// 按错误类型映射响应：校验/未找到原样返回，存储错误走关联 ID
pub fn error_from_shorthost(context: &str, err: &ShorthostError) -> HttpResponse {
    if err.is_upstream() {
        internal_error(context, err)
    } else {
        error_json(err.http_status(), err.message())
    }
}

/// 列表接口通用分页参数
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub search: Option<String>,
}

impl ListQuery {
    pub fn page(&self) -> u64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit(&self) -> u64 {
        self.limit.unwrap_or(20).max(1)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationInfo {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub total_pages: u64,
}

impl PaginationInfo {
    pub fn new(page: u64, limit: u64, total: u64) -> Self {
        Self {
            page,
            limit,
            total,
            total_pages: total.div_ceil(limit.max(1)),
        }
    }
}

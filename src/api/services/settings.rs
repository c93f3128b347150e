//! Key-Value 配置读写（管理域 `/api/settings/{key}`）
//!
//! 外部认证服务与管理面板共用的 kv_data 表。

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use serde_json::json;

use super::helpers::{error_json, internal_error};
use crate::storage::AppStorage;

pub async fn get_setting(
    key: web::Path<String>,
    storage: web::Data<Arc<AppStorage>>,
) -> HttpResponse {
    let key = key.into_inner();

    match storage.kv_get(&key).await {
        Ok(Some(value)) => HttpResponse::Ok().json(json!({ "key": key, "value": value })),
        Ok(None) => error_json(StatusCode::NOT_FOUND, "Setting not found"),
        Err(e) => internal_error("Failed to fetch setting", &e),
    }
}

pub async fn put_setting(
    key: web::Path<String>,
    body: web::Json<serde_json::Value>,
    storage: web::Data<Arc<AppStorage>>,
) -> HttpResponse {
    let key = key.into_inner();
    let value = body.into_inner();

    match storage.kv_set(&key, value.clone()).await {
        Ok(()) => HttpResponse::Ok().json(json!({ "key": key, "value": value })),
        Err(e) => internal_error("Failed to update setting", &e),
    }
}

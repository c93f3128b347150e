//! 站点文件管理（管理域 `/api/sites/{id}/...`）
//!
//! 文件列表、上传、下载、删除与 ZIP 导入。

use std::sync::Arc;

use actix_multipart::Multipart;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use super::helpers::{error_from_shorthost, error_json, internal_error};
use crate::errors::ShorthostError;
use crate::object_store::ObjectStore;
use crate::services::{FileTreeNode, ImportMode, build_file_tree, import_archive};
use crate::storage::{AppStorage, Site};
use crate::utils::{mime, normalize_object_key};

/// 单个上传文件上限
const MAX_FILE_SIZE: usize = 50 * 1024 * 1024;
/// ZIP 归档上限
const MAX_ZIP_SIZE: usize = 200 * 1024 * 1024;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FlatFile {
    key: String,
    path: String,
    size: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_modified: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
struct FileListing {
    tree: Vec<FileTreeNode>,
    files: Vec<FlatFile>,
    prefix: String,
}

#[derive(Serialize)]
struct UploadResult {
    uploaded: Vec<String>,
    count: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ZipResult {
    uploaded: Vec<String>,
    errors: Vec<String>,
    count: usize,
    error_count: usize,
}

#[derive(Debug, Deserialize)]
pub struct DeleteFileQuery {
    pub folder: Option<String>,
}

async fn load_site(
    storage: &AppStorage,
    id: &str,
    context: &str,
) -> Result<Site, HttpResponse> {
    match storage.get_site(id).await {
        Ok(Some(site)) => Ok(site),
        Ok(None) => Err(error_json(StatusCode::NOT_FOUND, "Site not found")),
        Err(e) => Err(internal_error(context, &e)),
    }
}

/// GET /api/sites/{id}/files: 树形 + 扁平文件列表
pub async fn list_files(
    id: web::Path<String>,
    storage: web::Data<Arc<AppStorage>>,
    store: web::Data<Arc<dyn ObjectStore>>,
) -> HttpResponse {
    let site = match load_site(&storage, &id, "Failed to list files").await {
        Ok(site) => site,
        Err(resp) => return resp,
    };

    let prefix = site.object_prefix();
    let objects = match store.list(&prefix).await {
        Ok(objects) => objects,
        Err(e) => return internal_error("Failed to list files", &e),
    };

    let tree = build_file_tree(&objects, &prefix);
    let files = objects
        .iter()
        .map(|object| FlatFile {
            key: object.key.clone(),
            path: object.key[prefix.len().min(object.key.len())..].to_string(),
            size: object.size.unwrap_or(0),
            last_modified: object.last_modified,
        })
        .collect();

    HttpResponse::Ok().json(FileListing {
        tree,
        files,
        prefix,
    })
}

/// POST /api/sites/{id}/files: multipart 上传（`path` + `files[]`）
pub async fn upload_files(
    id: web::Path<String>,
    mut payload: Multipart,
    storage: web::Data<Arc<AppStorage>>,
    store: web::Data<Arc<dyn ObjectStore>>,
) -> HttpResponse {
    let site = match load_site(&storage, &id, "Failed to upload files").await {
        Ok(site) => site,
        Err(resp) => return resp,
    };

    let mut upload_path = String::new();
    let mut files: Vec<(String, Vec<u8>)> = Vec::new();

    while let Some(item) = payload.next().await {
        let mut field = match item {
            Ok(field) => field,
            Err(e) => {
                error!("Failed to parse multipart field: {}", e);
                return error_from_shorthost(
                    "Failed to upload files",
                    &ShorthostError::invalid_multipart(format!("Invalid multipart data: {}", e)),
                );
            }
        };

        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "path" => {
                let mut data = Vec::new();
                while let Some(chunk) = field.next().await {
                    if let Ok(bytes) = chunk {
                        data.extend_from_slice(&bytes);
                    }
                }
                upload_path = String::from_utf8_lossy(&data).trim().to_string();
            }
            "files" => {
                let filename = field
                    .content_disposition()
                    .and_then(|cd| cd.get_filename())
                    .unwrap_or("unnamed")
                    .to_string();

                let mut data = Vec::new();
                while let Some(chunk) = field.next().await {
                    match chunk {
                        Ok(bytes) => {
                            if data.len() + bytes.len() > MAX_FILE_SIZE {
                                return error_json(
                                    StatusCode::BAD_REQUEST,
                                    format!(
                                        "File '{}' exceeds maximum {} MB",
                                        filename,
                                        MAX_FILE_SIZE / 1024 / 1024
                                    ),
                                );
                            }
                            data.extend_from_slice(&bytes);
                        }
                        Err(e) => {
                            error!("Failed to read file chunk: {}", e);
                            return error_json(
                                StatusCode::BAD_REQUEST,
                                format!("Failed to read file: {}", e),
                            );
                        }
                    }
                }
                files.push((filename, data));
            }
            _ => {}
        }
    }

    if files.is_empty() {
        return error_json(StatusCode::BAD_REQUEST, "No files provided");
    }

    let prefix = site.object_prefix();
    let mut uploaded = Vec::with_capacity(files.len());

    for (filename, data) in files {
        let raw_key = if upload_path.is_empty() {
            format!("{}{}", prefix, filename)
        } else {
            format!("{}{}/{}", prefix, upload_path, filename)
        };
        let key = normalize_object_key(&raw_key);
        let content_type = mime::mime_type(&filename);

        if let Err(e) = store.put(&key, Bytes::from(data), content_type).await {
            return internal_error("Failed to upload files", &e);
        }
        uploaded.push(key);
    }

    info!("Uploaded {} files to site '{}'", uploaded.len(), site.id);
    HttpResponse::Ok().json(UploadResult {
        count: uploaded.len(),
        uploaded,
    })
}

/// GET /api/sites/{id}/files/{path...}: 下载单个文件
pub async fn download_file(
    path: web::Path<(String, String)>,
    storage: web::Data<Arc<AppStorage>>,
    store: web::Data<Arc<dyn ObjectStore>>,
) -> HttpResponse {
    let (id, file_path) = path.into_inner();

    let site = match load_site(&storage, &id, "Failed to download file").await {
        Ok(site) => site,
        Err(resp) => return resp,
    };

    let key = normalize_object_key(&format!("{}/{}", site.fs_path, file_path));
    let filename = file_path.rsplit('/').next().unwrap_or(&file_path);

    match store.get(&key).await {
        Ok(body) => {
            let mut builder = HttpResponse::Ok();
            builder
                .insert_header(("Content-Type", mime::mime_type(&file_path)))
                .insert_header((
                    "Content-Disposition",
                    format!("attachment; filename=\"{}\"", filename),
                ));
            if let Some(length) = body.content_length {
                builder.no_chunking(length);
            }
            builder.streaming(body.stream)
        }
        Err(ShorthostError::ObjectNotFound(_)) => {
            error_json(StatusCode::NOT_FOUND, "File not found")
        }
        Err(e) => internal_error("Failed to download file", &e),
    }
}

/// DELETE /api/sites/{id}/files/{path...}?folder=true|false
pub async fn delete_file(
    path: web::Path<(String, String)>,
    query: web::Query<DeleteFileQuery>,
    storage: web::Data<Arc<AppStorage>>,
    store: web::Data<Arc<dyn ObjectStore>>,
) -> HttpResponse {
    let (id, file_path) = path.into_inner();

    let site = match load_site(&storage, &id, "Failed to delete file").await {
        Ok(site) => site,
        Err(resp) => return resp,
    };

    let key = normalize_object_key(&format!("{}/{}", site.fs_path, file_path));
    let is_folder = query.folder.as_deref() == Some("true");

    if is_folder {
        match store.delete_folder(&format!("{}/", key)).await {
            Ok(deleted) => {
                HttpResponse::Ok().json(serde_json::json!({ "success": true, "deleted": deleted }))
            }
            Err(e) => internal_error("Failed to delete file", &e),
        }
    } else {
        match store.delete(&key).await {
            Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "success": true })),
            Err(e) => internal_error("Failed to delete file", &e),
        }
    }
}

/// POST /api/sites/{id}/upload-zip: 归档导入（merge | replace）
pub async fn upload_zip(
    id: web::Path<String>,
    mut payload: Multipart,
    storage: web::Data<Arc<AppStorage>>,
    store: web::Data<Arc<dyn ObjectStore>>,
) -> HttpResponse {
    let site = match load_site(&storage, &id, "Failed to process ZIP file").await {
        Ok(site) => site,
        Err(resp) => return resp,
    };

    let mut zip_data: Option<Vec<u8>> = None;
    let mut zip_name = String::new();
    let mut zip_mime: Option<String> = None;
    let mut mode = ImportMode::Merge;

    while let Some(item) = payload.next().await {
        let mut field = match item {
            Ok(field) => field,
            Err(e) => {
                error!("Failed to parse multipart field: {}", e);
                return error_from_shorthost(
                    "Failed to process ZIP file",
                    &ShorthostError::invalid_multipart(format!("Invalid multipart data: {}", e)),
                );
            }
        };

        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "file" => {
                zip_name = field
                    .content_disposition()
                    .and_then(|cd| cd.get_filename())
                    .unwrap_or("")
                    .to_string();
                zip_mime = field.content_type().map(|m| m.essence_str().to_string());

                let mut data = Vec::new();
                while let Some(chunk) = field.next().await {
                    match chunk {
                        Ok(bytes) => {
                            if data.len() + bytes.len() > MAX_ZIP_SIZE {
                                return error_json(
                                    StatusCode::BAD_REQUEST,
                                    format!(
                                        "ZIP size exceeds maximum {} MB",
                                        MAX_ZIP_SIZE / 1024 / 1024
                                    ),
                                );
                            }
                            data.extend_from_slice(&bytes);
                        }
                        Err(e) => {
                            error!("Failed to read ZIP chunk: {}", e);
                            return error_json(
                                StatusCode::BAD_REQUEST,
                                format!("Failed to read file: {}", e),
                            );
                        }
                    }
                }
                zip_data = Some(data);
            }
            "mode" => {
                let mut data = Vec::new();
                while let Some(chunk) = field.next().await {
                    if let Ok(bytes) = chunk {
                        data.extend_from_slice(&bytes);
                    }
                }
                mode = ImportMode::parse(&String::from_utf8_lossy(&data));
            }
            _ => {}
        }
    }

    let Some(zip_data) = zip_data else {
        return error_json(StatusCode::BAD_REQUEST, "No ZIP file provided");
    };

    let mime_is_zip = matches!(
        zip_mime.as_deref(),
        Some("application/zip") | Some("application/x-zip-compressed")
    );
    if !zip_name.ends_with(".zip") && !mime_is_zip {
        return error_json(StatusCode::BAD_REQUEST, "File must be a ZIP archive");
    }

    match import_archive(
        store.as_ref().as_ref(),
        &site.object_prefix(),
        Bytes::from(zip_data),
        mode,
    )
    .await
    {
        Ok(report) => HttpResponse::Ok().json(ZipResult {
            count: report.uploaded.len(),
            error_count: report.errors.len(),
            uploaded: report.uploaded,
            errors: report.errors,
        }),
        // 归档不可解析 → 400，其余按上游错误处理
        Err(e) => error_from_shorthost("Failed to process ZIP file", &e),
    }
}

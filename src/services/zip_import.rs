//! ZIP 导入管线
//!
//! 解包上传的归档并逐条写入站点前缀。单条失败只记入错误列表，
//! 不影响其余条目（尽力而为语义）。

use std::io::{Cursor, Read};

use bytes::Bytes;
use tracing::{info, warn};
use zip::ZipArchive;

use crate::errors::{Result, ShorthostError};
use crate::object_store::ObjectStore;
use crate::utils::{mime, normalize_object_key};

/// macOS 资源派生目录，整目录跳过
const MACOS_RESOURCE_FORK: &str = "__MACOSX";
/// Finder 元数据文件，路径中出现即跳过
const MACOS_METADATA_FILE: &str = ".DS_Store";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportMode {
    /// 保留现有对象，新条目覆盖同名 key
    Merge,
    /// 导入前清空站点前缀
    Replace,
}

impl ImportMode {
    /// 未知取值回退 merge，与管理端表单默认一致
    pub fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "replace" => ImportMode::Replace,
            _ => ImportMode::Merge,
        }
    }
}

/// 导入结果：成功与失败的条目路径
#[derive(Debug, Default)]
pub struct ZipImportReport {
    pub uploaded: Vec<String>,
    pub errors: Vec<String>,
}

/// 解包归档并上传全部条目
///
/// `prefix` 为站点对象前缀（含结尾 `/`）。replace 模式先尽力清空前缀，
/// 清空失败只记日志，导入继续。归档本身不可解析时返回错误。
pub async fn import_archive(
    store: &dyn ObjectStore,
    prefix: &str,
    data: Bytes,
    mode: ImportMode,
) -> Result<ZipImportReport> {
    if mode == ImportMode::Replace {
        match store.delete_folder(prefix).await {
            Ok(deleted) => info!("Cleared {} objects under '{}' before import", deleted, prefix),
            Err(e) => warn!("Failed to clear '{}' before import: {}", prefix, e),
        }
    }

    let mut archive = ZipArchive::new(Cursor::new(data.as_ref()))
        .map_err(|e| ShorthostError::archive_read(format!("Invalid ZIP archive: {}", e)))?;

    let mut report = ZipImportReport::default();

    for index in 0..archive.len() {
        // 解压与上传分开，entry 的可变借用不能跨 await
        let extracted = {
            let mut entry = match archive.by_index(index) {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Failed to open archive entry #{}: {}", index, e);
                    report.errors.push(format!("entry #{}", index));
                    continue;
                }
            };

            let name = entry.name().to_string();
            if entry.is_dir()
                || name.starts_with(MACOS_RESOURCE_FORK)
                || name.contains(MACOS_METADATA_FILE)
            {
                continue;
            }

            let mut content = Vec::with_capacity(entry.size() as usize);
            match entry.read_to_end(&mut content) {
                Ok(_) => Some((name, content)),
                Err(e) => {
                    warn!("Failed to extract '{}': {}", name, e);
                    report.errors.push(name);
                    None
                }
            }
        };

        let Some((name, content)) = extracted else {
            continue;
        };

        let key = normalize_object_key(&format!("{}{}", prefix, name));
        let content_type = mime::mime_type(&name);

        match store.put(&key, Bytes::from(content), content_type).await {
            Ok(()) => report.uploaded.push(name),
            Err(e) => {
                warn!("Failed to upload '{}': {}", name, e);
                report.errors.push(name);
            }
        }
    }

    info!(
        "ZIP import into '{}': {} uploaded, {} failed",
        prefix,
        report.uploaded.len(),
        report.errors.len()
    );

    Ok(report)
}

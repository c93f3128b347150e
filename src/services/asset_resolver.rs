//! 静态资源路径解析
//!
//! 把站点请求路径翻译成对象存储 key：
//! 1. 空路径或以 `/` 结尾 → 追加 `index.html`
//! 2. 末段不含 `.`（疑似目录）→ 探测 `path/index.html`，不存在则按字面 key 回退
//! 3. 其余按字面 key
//!
//! 末段不含扩展名的真实文件会先多付一次存在性探测，这是既定取舍。

use crate::errors::Result;
use crate::object_store::ObjectStore;
use crate::utils::mime;
use crate::utils::normalize_object_key;

/// 解析结果：最终 key 与由它导出的响应头
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAsset {
    pub key: String,
    pub content_type: &'static str,
    pub cache_control: &'static str,
}

pub async fn resolve_asset(
    store: &dyn ObjectStore,
    fs_path: &str,
    raw_path: &str,
) -> Result<ResolvedAsset> {
    let segments: Vec<&str> = raw_path.split('/').filter(|s| !s.is_empty()).collect();
    let joined = segments.join("/");

    let relative = if joined.is_empty() || raw_path.ends_with('/') {
        if joined.is_empty() {
            "index.html".to_string()
        } else {
            format!("{}/index.html", joined)
        }
    } else if !segments.last().is_some_and(|s| s.contains('.')) {
        let candidate = normalize_object_key(&format!("{}/{}/index.html", fs_path, joined));
        if store.exists(&candidate).await? {
            format!("{}/index.html", joined)
        } else {
            joined
        }
    } else {
        joined
    };

    let key = normalize_object_key(&format!("{}/{}", fs_path, relative));

    Ok(ResolvedAsset {
        content_type: mime::mime_type(&key),
        cache_control: mime::cache_control(&key),
        key,
    })
}

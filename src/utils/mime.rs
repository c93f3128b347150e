//! 扩展名 → Content-Type / Cache-Control 纯映射
//!
//! 无 I/O，静态站点服务和文件上传共用。

/// 默认回退类型
pub const OCTET_STREAM: &str = "application/octet-stream";

/// 一年 immutable：脚本 / 样式 / 字体
const CACHE_IMMUTABLE: &str = "public, max-age=31536000, immutable";
/// 一周：图片
const CACHE_ONE_WEEK: &str = "public, max-age=604800";
/// HTML 永远重新验证
const CACHE_NO_STORE: &str = "no-store";
/// 其余内容一小时
const CACHE_ONE_HOUR: &str = "public, max-age=3600";

/// 取文件名的扩展名（最后一个 `.` 之后，小写）
fn extension(filename: &str) -> Option<String> {
    let name = filename.rsplit('/').next().unwrap_or(filename);
    let (_, ext) = name.rsplit_once('.')?;
    if ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// 根据文件名推断 Content-Type
pub fn mime_type(filename: &str) -> &'static str {
    let Some(ext) = extension(filename) else {
        return OCTET_STREAM;
    };

    match ext.as_str() {
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "js" | "mjs" | "cjs" => "application/javascript",
        "json" => "application/json",
        "xml" => "application/xml",
        "txt" => "text/plain",
        "md" => "text/markdown",
        "csv" => "text/csv",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "bmp" => "image/bmp",
        "avif" => "image/avif",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "otf" => "font/otf",
        "eot" => "application/vnd.ms-fontobject",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",
        "m4a" => "audio/mp4",
        "flac" => "audio/flac",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "ogv" => "video/ogg",
        "avi" => "video/x-msvideo",
        "mov" => "video/quicktime",
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "ppt" => "application/vnd.ms-powerpoint",
        "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "zip" => "application/zip",
        "tar" => "application/x-tar",
        "gz" => "application/gzip",
        "rar" => "application/vnd.rar",
        "7z" => "application/x-7z-compressed",
        "wasm" => "application/wasm",
        "webmanifest" => "application/manifest+json",
        "manifest" => "text/cache-manifest",
        "map" => "application/json",
        "ts" | "tsx" => "application/typescript",
        "yaml" | "yml" => "application/x-yaml",
        _ => OCTET_STREAM,
    }
}

/// 根据文件名推断 Cache-Control 策略
pub fn cache_control(filename: &str) -> &'static str {
    let Some(ext) = extension(filename) else {
        return CACHE_ONE_HOUR;
    };

    match ext.as_str() {
        "css" | "js" | "mjs" | "cjs" | "woff" | "woff2" | "ttf" | "otf" | "eot" => CACHE_IMMUTABLE,
        "png" | "jpg" | "jpeg" | "gif" | "webp" | "svg" | "ico" | "bmp" | "avif" => CACHE_ONE_WEEK,
        "html" | "htm" => CACHE_NO_STORE,
        _ => CACHE_ONE_HOUR,
    }
}

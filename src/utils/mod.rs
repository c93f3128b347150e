pub mod ip;
pub mod mime;

/// slug 合法字符校验
///
/// 允许字母、数字、点、连字符、下划线，与管理端建链时的校验一致。
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

/// 管理端 slug 校验失败时的统一提示文案
pub const SLUG_FORMAT_MESSAGE: &str =
    "Slug can only contain letters, numbers, dots, hyphens, and underscores";

pub fn generate_random_code(length: usize) -> String {
    use std::iter;

    let chars = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

    iter::repeat_with(|| chars[rand::random_range(0..chars.len())] as char)
        .take(length)
        .collect()
}

/// 错误关联 ID，打进日志并回传给客户端用于排障
pub fn generate_correlation_id() -> String {
    generate_random_code(12)
}

/// 合并对象 key 中重复的 `/`
pub fn normalize_object_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut prev_slash = false;
    for c in key.chars() {
        if c == '/' {
            if !prev_slash {
                out.push(c);
            }
            prev_slash = true;
        } else {
            out.push(c);
            prev_slash = false;
        }
    }
    out
}

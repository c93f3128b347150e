//! 基于 Host header 的域名分发
//!
//! 每个主机名恰好落到一个子系统（全函数）：
//! 站点托管域 → 静态文件服务；管理域 → 管理面板/API；其余 → 短链接。
//! 通过按优先级注册的三个 scope + [`HostGuard`] 实现，请求路径与
//! query string 原样保留，分发本身不携带任何跨请求状态。

use actix_web::guard::{Guard, GuardContext};
use actix_web::http::header;

use crate::config::DomainConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostClass {
    SiteHosting,
    Admin,
    Shortener,
}

/// 去掉端口部分，保留主机名
fn host_name(host: &str) -> &str {
    if let Some(rest) = host.strip_prefix('[') {
        // IPv6 字面量：[::1]:8080
        rest.split(']').next().unwrap_or(rest)
    } else {
        match host.rsplit_once(':') {
            Some((name, port)) if port.chars().all(|c| c.is_ascii_digit()) => name,
            _ => host,
        }
    }
}

/// 主机名分类（纯函数）
///
/// 优先级：站点托管域 → 管理域 → 默认短链接。缺失 Host 的请求
/// 一律按短链接处理。
pub fn classify_host(host: Option<&str>, domains: &DomainConfig) -> HostClass {
    let Some(host) = host else {
        return HostClass::Shortener;
    };
    let name = host_name(host.trim());

    if name.eq_ignore_ascii_case(&domains.site_hosting_domain) {
        HostClass::SiteHosting
    } else if name.eq_ignore_ascii_case(&domains.admin_domain) {
        HostClass::Admin
    } else {
        HostClass::Shortener
    }
}

/// 将请求主机名按 [`classify_host`] 归类后与期望类别比对的 scope guard
pub struct HostGuard {
    domains: DomainConfig,
    class: HostClass,
}

impl HostGuard {
    pub fn new(domains: DomainConfig, class: HostClass) -> Self {
        Self { domains, class }
    }
}

impl Guard for HostGuard {
    fn check(&self, ctx: &GuardContext<'_>) -> bool {
        let head = ctx.head();
        let host = head
            .headers()
            .get(header::HOST)
            .and_then(|h| h.to_str().ok())
            .or_else(|| head.uri.authority().map(|a| a.as_str()));

        classify_host(host, &self.domains) == self.class
    }
}

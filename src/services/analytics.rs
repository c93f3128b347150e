//! 访问事件记录
//!
//! 分析写入完全不阻塞主响应路径：每个事件 spawn 一个后台任务，
//! 失败只记日志，绝不向调用方传播。

use std::net::IpAddr;
use std::sync::Arc;

use actix_web::HttpRequest;
use tracing::warn;

use super::geoip::GeoIpProvider;
use crate::storage::AppStorage;
use crate::utils::ip::{extract_client_ip, is_private_or_local};

const UNKNOWN: &str = "unknown";

/// 一次访问的原始上下文，在请求线程上同步提取
#[derive(Debug, Clone, Default)]
pub struct VisitDetail {
    pub ip: Option<String>,
    /// CDN 注入的粗粒度地区 header（如有则免查 GeoIP）
    pub region: Option<String>,
    pub user_agent: Option<String>,
}

impl VisitDetail {
    pub fn from_request(req: &HttpRequest, region_header: &str) -> Self {
        let region = req
            .headers()
            .get(region_header)
            .and_then(|h| h.to_str().ok())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let user_agent = req
            .headers()
            .get("user-agent")
            .and_then(|h| h.to_str().ok())
            .map(String::from);

        Self {
            ip: extract_client_ip(req),
            region,
            user_agent,
        }
    }
}

enum VisitKind {
    LinkClick,
    SiteVisit,
}

/// 分析事件记录器
#[derive(Clone)]
pub struct VisitRecorder {
    storage: Arc<AppStorage>,
    geoip: Option<GeoIpProvider>,
}

impl VisitRecorder {
    pub fn new(storage: Arc<AppStorage>, geoip: Option<GeoIpProvider>) -> Self {
        Self { storage, geoip }
    }

    /// 记录短链接点击（fire-and-forget）
    pub fn record_link_click(&self, link_id: &str, detail: VisitDetail) {
        self.spawn(VisitKind::LinkClick, link_id.to_string(), detail);
    }

    /// 记录站点访问（fire-and-forget）
    pub fn record_site_visit(&self, site_id: &str, detail: VisitDetail) {
        self.spawn(VisitKind::SiteVisit, site_id.to_string(), detail);
    }

    fn spawn(&self, kind: VisitKind, ref_id: String, detail: VisitDetail) {
        let storage = Arc::clone(&self.storage);
        let geoip = self.geoip.clone();

        tokio::spawn(async move {
            let ip = detail.ip.as_deref().unwrap_or(UNKNOWN);
            let user_agent = detail.user_agent.as_deref().unwrap_or(UNKNOWN);
            let region = match detail.region {
                Some(region) => region,
                None => resolve_region(geoip.as_ref(), detail.ip.as_deref()).await,
            };

            let result = match kind {
                VisitKind::LinkClick => {
                    storage
                        .insert_link_click(&ref_id, ip, &region, user_agent)
                        .await
                }
                VisitKind::SiteVisit => {
                    storage
                        .insert_site_visit(&ref_id, ip, &region, user_agent)
                        .await
                }
            };

            if let Err(e) = result {
                warn!("Analytics write for '{}' failed: {}", ref_id, e);
            }
        });
    }
}

/// 解析粗粒度地区；私有地址与解析失败一律 "unknown"
async fn resolve_region(geoip: Option<&GeoIpProvider>, ip: Option<&str>) -> String {
    let (Some(geoip), Some(ip)) = (geoip, ip) else {
        return UNKNOWN.to_string();
    };

    let Ok(ip_addr) = ip.parse::<IpAddr>() else {
        return UNKNOWN.to_string();
    };
    if is_private_or_local(&ip_addr) {
        return UNKNOWN.to_string();
    }

    geoip
        .lookup(ip)
        .await
        .and_then(|info| info.country)
        .unwrap_or_else(|| UNKNOWN.to_string())
}

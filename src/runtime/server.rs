//! HTTP server startup
//!
//! 组装共享依赖（数据库、对象存储、分析记录器），按优先级挂载
//! 三个域的路由：站点托管 → 管理 → 短链接（默认兜底）。

use std::sync::Arc;

use actix_web::middleware::Compress;
use actix_web::{App, HttpServer, web};
use anyhow::Result;
use tracing::info;

use crate::api::{HostClass, HostGuard};
use crate::api::middleware::SessionGate;
use crate::api::services::{admin_routes, shortener_routes, site_routes};
use crate::config::get_config;
use crate::object_store::{ObjectStore, S3ObjectStore};
use crate::services::{GeoIpProvider, VisitRecorder};
use crate::storage::StorageFactory;

pub async fn run_server() -> Result<()> {
    let config = get_config();

    let storage = StorageFactory::create().await?;
    let object_store: Arc<dyn ObjectStore> =
        Arc::new(S3ObjectStore::from_config(&config.object_store).await);
    let geoip = GeoIpProvider::new(&config.analytics);
    let recorder = VisitRecorder::new(Arc::clone(&storage), Some(geoip));

    let domains = config.domains.clone();

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    info!("Starting server at http://{}", bind_address);
    info!(
        "Domains: sites='{}' admin='{}' shortener=default",
        domains.site_hosting_domain, domains.admin_domain
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Compress::default())
            .app_data(web::Data::new(Arc::clone(&storage)))
            .app_data(web::Data::new(Arc::clone(&object_store)))
            .app_data(web::Data::new(recorder.clone()))
            .service(
                web::scope("")
                    .guard(HostGuard::new(domains.clone(), HostClass::SiteHosting))
                    .configure(site_routes),
            )
            .service(
                web::scope("")
                    .guard(HostGuard::new(domains.clone(), HostClass::Admin))
                    .wrap(SessionGate::new(
                        Arc::clone(&storage),
                        domains.session_cookie.clone(),
                    ))
                    .configure(admin_routes),
            )
            .configure(shortener_routes)
    })
    .workers(config.server.workers)
    .bind(&bind_address)?
    .run()
    .await?;

    Ok(())
}

//! 路由装配
//!
//! 三个域各自一组路由，由 server 按优先级挂载：
//! 站点托管 → 管理 → 短链接（默认）。

use actix_web::web;

use super::redirect::{RedirectService, error_page};
use super::static_site::{serve_site_asset, serve_site_root};
use super::{auth, settings, site_files, sites, urls};

/// 短链接域：`/err` 错误页 + 全路径 catch-all
///
/// `/err` 必须先注册，否则会被 catch-all 当成 slug 吞掉。
pub fn shortener_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/err").route(web::get().to(error_page)))
        .service(
            web::resource("/{path:.*}").route(web::route().to(RedirectService::handle_redirect)),
        );
}

/// 站点托管域：`/{slug}` 与 `/{slug}/{path...}`，全方法
pub fn site_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/{slug}").route(web::route().to(serve_site_root)))
        .service(web::resource("/{slug}/{path:.*}").route(web::route().to(serve_site_asset)));
}

/// 管理域：JSON API + 登出；会话门禁由外层 scope 挂载
pub fn admin_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/auth/logout").route(web::get().to(auth::logout)))
        .service(
            web::scope("/api")
                .service(
                    web::resource("/urls")
                        .route(web::get().to(urls::list_urls))
                        .route(web::post().to(urls::create_url)),
                )
                .service(
                    web::resource("/urls/{id}")
                        .route(web::get().to(urls::get_url))
                        .route(web::patch().to(urls::update_url))
                        .route(web::delete().to(urls::delete_url)),
                )
                .service(
                    web::resource("/sites")
                        .route(web::get().to(sites::list_sites))
                        .route(web::post().to(sites::create_site)),
                )
                .service(
                    web::resource("/sites/{id}")
                        .route(web::get().to(sites::get_site))
                        .route(web::patch().to(sites::update_site))
                        .route(web::delete().to(sites::delete_site)),
                )
                .service(
                    web::resource("/sites/{id}/files")
                        .route(web::get().to(site_files::list_files))
                        .route(web::post().to(site_files::upload_files)),
                )
                .service(
                    web::resource("/sites/{id}/upload-zip")
                        .route(web::post().to(site_files::upload_zip)),
                )
                .service(
                    web::resource("/sites/{id}/files/{path:.*}")
                        .route(web::get().to(site_files::download_file))
                        .route(web::delete().to(site_files::delete_file)),
                )
                .service(
                    web::resource("/settings/{key}")
                        .route(web::get().to(settings::get_setting))
                        .route(web::put().to(settings::put_setting)),
                ),
        );
}

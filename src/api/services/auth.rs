//! 登出端点（管理域 `/auth/logout`）
//!
//! 登录、注册与会话签发归外部认证服务；这里只负责销毁会话行
//! 并清掉 Cookie。

use std::sync::Arc;

use actix_web::cookie::Cookie;
use actix_web::{HttpResponse, web};
use tracing::error;

use crate::config::get_config;
use crate::storage::{AppStorage, SessionInfo};

pub async fn logout(
    storage: web::Data<Arc<AppStorage>>,
    session: Option<web::ReqData<SessionInfo>>,
) -> HttpResponse {
    let Some(session) = session else {
        return HttpResponse::Unauthorized()
            .insert_header(("Content-Type", "text/plain; charset=utf-8"))
            .body("Sorry, but you are not authorized to use this endpoint.");
    };

    if let Err(e) = storage.delete_session(&session.token).await {
        error!("Failed to destroy session: {}", e);
        return HttpResponse::InternalServerError()
            .insert_header(("Content-Type", "text/plain; charset=utf-8"))
            .body("There was an error trying to log you out.");
    }

    let cookie_name = get_config().domains.session_cookie.clone();
    let mut removal = Cookie::new(cookie_name, "");
    removal.set_path("/");
    removal.make_removal();

    HttpResponse::TemporaryRedirect()
        .insert_header(("Location", "/auth/login"))
        .cookie(removal)
        .finish()
}

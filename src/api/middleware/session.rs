//! 管理域会话门禁
//!
//! 每个进入管理域的请求先按 Cookie 校验会话（session 表由外部认证
//! 服务维护）：
//! - `/auth/*` 免校验放行；已登录访问 `/auth/*`（登出除外）反向跳回首页
//! - API 路径（`/api/*`）未登录返回 401 JSON
//! - 其余路径未登录 307 跳转登录页

use std::rc::Rc;
use std::sync::Arc;

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::header::CONTENT_TYPE,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use serde_json::json;
use tracing::{debug, error};

use crate::storage::AppStorage;
use crate::utils::generate_correlation_id;

const LOGIN_PATH: &str = "/auth/login";
const LOGOUT_PATH: &str = "/auth/logout";

/// 管理域会话校验中间件
#[derive(Clone)]
pub struct SessionGate {
    storage: Arc<AppStorage>,
    cookie_name: String,
}

impl SessionGate {
    pub fn new(storage: Arc<AppStorage>, cookie_name: impl Into<String>) -> Self {
        Self {
            storage,
            cookie_name: cookie_name.into(),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for SessionGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = SessionGateMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionGateMiddleware {
            service: Rc::new(service),
            storage: Arc::clone(&self.storage),
            cookie_name: self.cookie_name.clone(),
        }))
    }
}

pub struct SessionGateMiddleware<S> {
    service: Rc<S>,
    storage: Arc<AppStorage>,
    cookie_name: String,
}

impl<S, B> SessionGateMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    fn unauthorized_json(req: ServiceRequest) -> ServiceResponse<EitherBody<B>> {
        req.into_response(
            HttpResponse::Unauthorized()
                .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
                .json(json!({ "error": "Unauthorized" }))
                .map_into_right_body(),
        )
    }

    fn redirect(req: ServiceRequest, location: &str) -> ServiceResponse<EitherBody<B>> {
        req.into_response(
            HttpResponse::TemporaryRedirect()
                .insert_header(("Location", location))
                .finish()
                .map_into_right_body(),
        )
    }

    fn storage_failure(req: ServiceRequest, err: &crate::errors::ShorthostError) -> ServiceResponse<EitherBody<B>> {
        let correlation_id = generate_correlation_id();
        error!("[{}] Session lookup failed: {}", correlation_id, err);
        req.into_response(
            HttpResponse::InternalServerError()
                .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
                .json(json!({
                    "error": format!("Internal server error (ref: {})", correlation_id)
                }))
                .map_into_right_body(),
        )
    }
}

impl<S, B> Service<ServiceRequest> for SessionGateMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let storage = Arc::clone(&self.storage);
        let cookie_name = self.cookie_name.clone();

        Box::pin(async move {
            let token = req.cookie(&cookie_name).map(|c| c.value().to_string());

            let session = match token {
                Some(token) => match storage.find_valid_session(&token).await {
                    Ok(session) => session,
                    Err(e) => return Ok(Self::storage_failure(req, &e)),
                },
                None => None,
            };

            let path = req.path().to_string();
            let is_auth_path = path.starts_with("/auth");
            let is_api_path = path.starts_with("/api");

            match session {
                Some(info) => {
                    if is_auth_path && path != LOGOUT_PATH {
                        // 已登录不该停留在认证页面
                        return Ok(Self::redirect(req, "/"));
                    }
                    req.extensions_mut().insert(info);
                }
                None => {
                    if !is_auth_path {
                        debug!("No valid session for {}", path);
                        if is_api_path {
                            return Ok(Self::unauthorized_json(req));
                        }
                        return Ok(Self::redirect(req, LOGIN_PATH));
                    }
                }
            }

            let response = srv.call(req).await?.map_into_left_body();
            Ok(response)
        })
    }
}

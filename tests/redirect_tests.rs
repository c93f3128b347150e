//! Shortener resolver tests
//!
//! The critical path: slug validation → lookup → 307 redirect, with
//! typed error-page redirects on every failure.

mod common;

use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use actix_web::{App, web};
use sea_orm::{EntityTrait, PaginatorTrait};

use shorthost::api::services::shortener_routes;
use shorthost::entities::shortener_analytics;
use shorthost::services::VisitRecorder;

use common::{init_test_env, seed_link};

macro_rules! shortener_app {
    ($db:expr) => {{
        let recorder = VisitRecorder::new($db.storage.clone(), None);
        test::init_service(
            App::new()
                .app_data(web::Data::new($db.storage.clone()))
                .app_data(web::Data::new(recorder))
                .configure(shortener_routes),
        )
        .await
    }};
}

fn location(resp: &actix_web::dev::ServiceResponse) -> String {
    resp.headers()
        .get("location")
        .and_then(|h| h.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

async fn analytics_rows(db: &common::TestDb) -> u64 {
    shortener_analytics::Entity::find()
        .count(db.storage.db())
        .await
        .unwrap()
}

#[actix_rt::test]
async fn valid_slug_redirects_with_307() {
    let db = init_test_env().await;
    seed_link(&db.storage, "abc", "https://example.com").await;
    let app = shortener_app!(db);

    let resp = test::call_service(&app, TestRequest::get().uri("/abc").to_request()).await;

    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&resp), "https://example.com");
}

#[actix_rt::test]
async fn illegal_segment_redirects_before_any_lookup() {
    let db = init_test_env().await;
    seed_link(&db.storage, "good", "https://example.com").await;
    let app = shortener_app!(db);

    let resp = test::call_service(&app, TestRequest::get().uri("/bad!slug").to_request()).await;
    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        location(&resp),
        "http://localhost:8080/err?type=ERR_ILLEGAL_PATH"
    );

    // 多段路径：任一非法段都立即失败
    let resp = test::call_service(
        &app,
        TestRequest::get().uri("/good/bad(segment)").to_request(),
    )
    .await;
    assert_eq!(
        location(&resp),
        "http://localhost:8080/err?type=ERR_ILLEGAL_PATH"
    );

    // 没有查库副作用：分析表保持为空
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(analytics_rows(&db).await, 0);
}

#[actix_rt::test]
async fn unknown_slug_redirects_to_not_found_page() {
    let db = init_test_env().await;
    let app = shortener_app!(db);

    let resp = test::call_service(&app, TestRequest::get().uri("/missing").to_request()).await;

    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        location(&resp),
        "http://localhost:8080/err?type=ERR_NOT_FOUND"
    );
}

#[actix_rt::test]
async fn multi_segment_path_joins_into_one_slug() {
    let db = init_test_env().await;
    seed_link(&db.storage, "docs/intro", "https://example.com/docs").await;
    let app = shortener_app!(db);

    let resp = test::call_service(&app, TestRequest::get().uri("/docs/intro").to_request()).await;

    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&resp), "https://example.com/docs");
}

#[actix_rt::test]
async fn bare_index_uses_reserved_sentinel_slug() {
    let db = init_test_env().await;
    seed_link(&db.storage, "_<index", "https://landing.example.com").await;
    let app = shortener_app!(db);

    let resp = test::call_service(&app, TestRequest::get().uri("/").to_request()).await;

    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&resp), "https://landing.example.com");
}

#[actix_rt::test]
async fn redirect_records_click_without_blocking() {
    let db = init_test_env().await;
    let link = seed_link(&db.storage, "tracked", "https://example.com").await;
    let app = shortener_app!(db);

    let resp = test::call_service(
        &app,
        TestRequest::get()
            .uri("/tracked")
            .insert_header(("user-agent", "integration-test"))
            .insert_header(("x-forwarded-for", "203.0.113.5, 10.0.0.1"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);

    // fire-and-forget：等后台任务落库
    tokio::time::sleep(Duration::from_millis(100)).await;

    let rows = shortener_analytics::Entity::find()
        .all(db.storage.db())
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].ref_id, link.id);
    assert_eq!(rows[0].ip, "203.0.113.5");
    assert_eq!(rows[0].user_agent, "integration-test");
    // 没配 GeoIP，地区回退 unknown
    assert_eq!(rows[0].ip_region, "unknown");
}

#[actix_rt::test]
async fn missing_headers_fall_back_to_unknown() {
    let db = init_test_env().await;
    seed_link(&db.storage, "bare", "https://example.com").await;
    let app = shortener_app!(db);

    let resp = test::call_service(&app, TestRequest::get().uri("/bare").to_request()).await;
    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);

    tokio::time::sleep(Duration::from_millis(100)).await;

    let rows = shortener_analytics::Entity::find()
        .all(db.storage.db())
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].user_agent, "unknown");
}

#[actix_rt::test]
async fn all_methods_funnel_to_the_redirect_handler() {
    let db = init_test_env().await;
    seed_link(&db.storage, "any", "https://example.com").await;
    let app = shortener_app!(db);

    for req in [
        TestRequest::post().uri("/any").to_request(),
        TestRequest::put().uri("/any").to_request(),
        TestRequest::delete().uri("/any").to_request(),
        TestRequest::with_uri("/any")
            .method(actix_web::http::Method::HEAD)
            .to_request(),
    ] {
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(location(&resp), "https://example.com");
    }
}

#[actix_rt::test]
async fn error_page_renders_typed_messages() {
    let db = init_test_env().await;
    let app = shortener_app!(db);

    let resp = test::call_service(
        &app,
        TestRequest::get().uri("/err?type=ERR_NOT_FOUND").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    let html = String::from_utf8_lossy(&body);
    assert!(html.contains("Not found"));

    // 服务端错误页带关联 ID
    let resp = test::call_service(
        &app,
        TestRequest::get()
            .uri("/err?type=SERVER_SIDE_ERR&id=Xy12Ab34Cd56")
            .to_request(),
    )
    .await;
    let body = test::read_body(resp).await;
    let html = String::from_utf8_lossy(&body);
    assert!(html.contains("Xy12Ab34Cd56"));
}

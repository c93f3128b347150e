//! Admin JSON API tests: URL and site CRUD
//!
//! Error responses always carry the `{ "error": string }` shape and the
//! slug validation message is identical across endpoints.

mod common;

use std::sync::Arc;

use actix_web::cookie::Cookie;
use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use actix_web::{App, web};
use bytes::Bytes;
use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::{Value, json};

use shorthost::api::middleware::SessionGate;
use shorthost::api::services::admin_routes;
use shorthost::entities::{shortener_analytics, site_analytics};
use shorthost::object_store::{MemoryObjectStore, ObjectStore};
use shorthost::services::VisitRecorder;

use common::{init_test_env, seed_link, seed_session, seed_site};

const SLUG_MESSAGE: &str =
    "Slug can only contain letters, numbers, dots, hyphens, and underscores";

macro_rules! admin_app {
    ($db:expr, $store:expr) => {{
        let store: Arc<dyn ObjectStore> = $store.clone();
        let recorder = VisitRecorder::new($db.storage.clone(), None);
        test::init_service(
            App::new()
                .app_data(web::Data::new($db.storage.clone()))
                .app_data(web::Data::new(store))
                .app_data(web::Data::new(recorder))
                .service(
                    web::scope("")
                        .wrap(SessionGate::new($db.storage.clone(), "session_token"))
                        .configure(admin_routes),
                ),
        )
        .await
    }};
}

fn authed(req: TestRequest) -> TestRequest {
    req.cookie(Cookie::new("session_token", "test-token"))
}

async fn setup() -> (common::TestDb, Arc<MemoryObjectStore>) {
    let db = init_test_env().await;
    seed_session(&db.storage, "test-token", "user-1").await;
    (db, Arc::new(MemoryObjectStore::new()))
}

// =============================================================================
// URLs
// =============================================================================

#[actix_rt::test]
async fn create_url_validates_required_fields() {
    let (db, store) = setup().await;
    let app = admin_app!(db, store);

    let resp = test::call_service(
        &app,
        authed(TestRequest::post().uri("/api/urls").set_json(json!({ "name": "x" })))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Name, slug, and destination are required");
}

#[actix_rt::test]
async fn create_url_validates_slug_grammar() {
    let (db, store) = setup().await;
    let app = admin_app!(db, store);

    let resp = test::call_service(
        &app,
        authed(TestRequest::post().uri("/api/urls").set_json(json!({
            "name": "bad",
            "slug": "no spaces!",
            "destination": "https://example.com"
        })))
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], SLUG_MESSAGE);
}

#[actix_rt::test]
async fn create_url_rejects_duplicate_slug_and_bad_destination() {
    let (db, store) = setup().await;
    seed_link(&db.storage, "taken", "https://example.com").await;
    let app = admin_app!(db, store);

    let resp = test::call_service(
        &app,
        authed(TestRequest::post().uri("/api/urls").set_json(json!({
            "name": "dup",
            "slug": "taken",
            "destination": "https://example.org"
        })))
        .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Slug already exists");

    let resp = test::call_service(
        &app,
        authed(TestRequest::post().uri("/api/urls").set_json(json!({
            "name": "bad dest",
            "slug": "fresh",
            "destination": "not a url"
        })))
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Invalid destination URL");
}

#[actix_rt::test]
async fn create_get_update_delete_url_roundtrip() {
    let (db, store) = setup().await;
    let app = admin_app!(db, store);

    // Create
    let resp = test::call_service(
        &app,
        authed(TestRequest::post().uri("/api/urls").set_json(json!({
            "name": "My link",
            "slug": "mine",
            "destination": "https://example.com/page"
        })))
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["slug"], "mine");
    assert_eq!(created["createdBy"], "user-1");
    let id = created["id"].as_str().unwrap().to_string();

    // 访问计数
    db.storage
        .insert_link_click(&id, "1.2.3.4", "US", "agent")
        .await
        .unwrap();

    // Get
    let resp = test::call_service(
        &app,
        authed(TestRequest::get().uri(&format!("/api/urls/{}", id))).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["visitCount"], 1);
    assert_eq!(body["destination"], "https://example.com/page");

    // Update
    let resp = test::call_service(
        &app,
        authed(
            TestRequest::patch()
                .uri(&format!("/api/urls/{}", id))
                .set_json(json!({ "slug": "renamed" })),
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["slug"], "renamed");

    // Delete（连同分析记录）
    let resp = test::call_service(
        &app,
        authed(TestRequest::delete().uri(&format!("/api/urls/{}", id))).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let clicks = shortener_analytics::Entity::find()
        .count(db.storage.db())
        .await
        .unwrap();
    assert_eq!(clicks, 0);

    let resp = test::call_service(
        &app,
        authed(TestRequest::get().uri(&format!("/api/urls/{}", id))).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn list_urls_paginates_and_searches() {
    let (db, store) = setup().await;
    for i in 0..25 {
        seed_link(
            &db.storage,
            &format!("link-{:02}", i),
            "https://example.com",
        )
        .await;
    }
    seed_link(&db.storage, "special", "https://special.example.com").await;
    let app = admin_app!(db, store);

    let resp = test::call_service(
        &app,
        authed(TestRequest::get().uri("/api/urls?page=2&limit=10")).to_request(),
    )
    .await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["urls"].as_array().unwrap().len(), 10);
    assert_eq!(body["pagination"]["total"], 26);
    assert_eq!(body["pagination"]["totalPages"], 3);

    let resp = test::call_service(
        &app,
        authed(TestRequest::get().uri("/api/urls?search=special")).to_request(),
    )
    .await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["urls"].as_array().unwrap().len(), 1);
    assert_eq!(body["urls"][0]["slug"], "special");
}

// =============================================================================
// Sites
// =============================================================================

#[actix_rt::test]
async fn create_site_generates_opaque_prefix() {
    let (db, store) = setup().await;
    let app = admin_app!(db, store);

    let resp = test::call_service(
        &app,
        authed(
            TestRequest::post()
                .uri("/api/sites")
                .set_json(json!({ "name": "Blog", "slug": "blog" })),
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    let id = created["id"].as_str().unwrap();
    assert_eq!(created["fsPath"], format!("sites/{}", id));

    // 第二个站点的前缀一定不同
    let resp = test::call_service(
        &app,
        authed(
            TestRequest::post()
                .uri("/api/sites")
                .set_json(json!({ "name": "Docs", "slug": "docs" })),
        )
        .to_request(),
    )
    .await;
    let other: Value = test::read_body_json(resp).await;
    assert_ne!(other["fsPath"], created["fsPath"]);
}

#[actix_rt::test]
async fn site_slug_validation_matches_url_validation() {
    let (db, store) = setup().await;
    let app = admin_app!(db, store);

    let resp = test::call_service(
        &app,
        authed(
            TestRequest::post()
                .uri("/api/sites")
                .set_json(json!({ "name": "Bad", "slug": "bad slug" })),
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], SLUG_MESSAGE);
}

#[actix_rt::test]
async fn get_site_reports_visit_and_file_counts() {
    let (db, store) = setup().await;
    let site = seed_site(&db.storage, "counted").await;
    store
        .put(
            &format!("{}/index.html", site.fs_path),
            Bytes::from_static(b"x"),
            "text/html",
        )
        .await
        .unwrap();
    store
        .put(
            &format!("{}/a/b.css", site.fs_path),
            Bytes::from_static(b"x"),
            "text/css",
        )
        .await
        .unwrap();
    db.storage
        .insert_site_visit(&site.id, "1.2.3.4", "DE", "agent")
        .await
        .unwrap();
    let app = admin_app!(db, store);

    let resp = test::call_service(
        &app,
        authed(TestRequest::get().uri(&format!("/api/sites/{}", site.id))).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["visitCount"], 1);
    assert_eq!(body["fileCount"], 2);
}

#[actix_rt::test]
async fn delete_site_clears_objects_then_rows() {
    let (db, store) = setup().await;
    let site = seed_site(&db.storage, "doomed").await;
    let keeper = seed_site(&db.storage, "keeper").await;
    store
        .put(
            &format!("{}/index.html", site.fs_path),
            Bytes::from_static(b"x"),
            "text/html",
        )
        .await
        .unwrap();
    store
        .put(
            &format!("{}/index.html", keeper.fs_path),
            Bytes::from_static(b"x"),
            "text/html",
        )
        .await
        .unwrap();
    db.storage
        .insert_site_visit(&site.id, "1.2.3.4", "DE", "agent")
        .await
        .unwrap();
    let app = admin_app!(db, store);

    let resp = test::call_service(
        &app,
        authed(TestRequest::delete().uri(&format!("/api/sites/{}", site.id))).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);

    // 对象子树与分析记录一并消失，其他站点不受影响
    assert!(store.list(&site.object_prefix()).await.unwrap().is_empty());
    assert_eq!(store.list(&keeper.object_prefix()).await.unwrap().len(), 1);
    let visits = site_analytics::Entity::find()
        .count(db.storage.db())
        .await
        .unwrap();
    assert_eq!(visits, 0);
    assert!(db.storage.get_site(&site.id).await.unwrap().is_none());
}

#[actix_rt::test]
async fn unknown_ids_return_404_json() {
    let (db, store) = setup().await;
    let app = admin_app!(db, store);

    for uri in ["/api/urls/nope", "/api/sites/nope"] {
        let resp =
            test::call_service(&app, authed(TestRequest::get().uri(uri)).to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "uri {}", uri);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].is_string());
    }
}

// =============================================================================
// Settings (kv)
// =============================================================================

#[actix_rt::test]
async fn settings_roundtrip_through_kv_table() {
    let (db, store) = setup().await;
    let app = admin_app!(db, store);

    let resp = test::call_service(
        &app,
        authed(TestRequest::get().uri("/api/settings/setup-completed")).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = test::call_service(
        &app,
        authed(
            TestRequest::put()
                .uri("/api/settings/setup-completed")
                .set_json(json!(true)),
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(
        &app,
        authed(TestRequest::get().uri("/api/settings/setup-completed")).to_request(),
    )
    .await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["value"], true);

    // upsert 覆盖旧值
    let resp = test::call_service(
        &app,
        authed(
            TestRequest::put()
                .uri("/api/settings/setup-completed")
                .set_json(json!(false)),
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["value"], false);
}

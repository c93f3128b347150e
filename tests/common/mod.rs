//! Shared test setup
//!
//! File-backed SQLite with tables created from the entity definitions,
//! plus seeding helpers. Each test binary gets its own database.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{Duration, Utc};
use sea_orm::{ActiveModelTrait, ConnectionTrait, DatabaseConnection, Schema, Set};
use tempfile::TempDir;

use shorthost::entities;
use shorthost::storage::{AppStorage, NewShortLink, NewSite, ShortLink, Site, connect_sqlite};

/// Keeps the temp dir alive for the duration of the test
pub struct TestDb {
    pub storage: Arc<AppStorage>,
    _dir: TempDir,
}

pub async fn init_test_env() -> TestDb {
    // 处理器里会读全局配置（公开基地址、Cookie 名等），用默认值即可
    shorthost::config::init_config();

    let dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = dir.path().join("shorthost_test.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    let db = connect_sqlite(&db_url)
        .await
        .expect("Failed to connect to SQLite");
    create_tables(&db).await;

    TestDb {
        storage: Arc::new(AppStorage::new(db)),
        _dir: dir,
    }
}

async fn create_tables(db: &DatabaseConnection) {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    let statements = [
        schema.create_table_from_entity(entities::shortener_data::Entity),
        schema.create_table_from_entity(entities::shortener_analytics::Entity),
        schema.create_table_from_entity(entities::site_data::Entity),
        schema.create_table_from_entity(entities::site_analytics::Entity),
        schema.create_table_from_entity(entities::kv_data::Entity),
        schema.create_table_from_entity(entities::session::Entity),
    ];

    for statement in statements {
        db.execute(&statement)
            .await
            .expect("Failed to create table");
    }
}

pub async fn seed_link(storage: &AppStorage, slug: &str, destination: &str) -> ShortLink {
    storage
        .create_link(NewShortLink {
            name: format!("link {}", slug),
            slug: slug.to_string(),
            destination: destination.to_string(),
            user_id: "user-1".to_string(),
        })
        .await
        .expect("Failed to seed link")
}

pub async fn seed_site(storage: &AppStorage, slug: &str) -> Site {
    storage
        .create_site(NewSite {
            name: format!("site {}", slug),
            slug: slug.to_string(),
            user_id: "user-1".to_string(),
        })
        .await
        .expect("Failed to seed site")
}

/// 写入一条一小时内有效的会话（认证服务在生产中负责这件事）
pub async fn seed_session(storage: &AppStorage, token: &str, user_id: &str) {
    let now = Utc::now();
    entities::session::ActiveModel {
        id: Set(format!("session-{}", token)),
        expires_at: Set(now + Duration::hours(1)),
        token: Set(token.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        ip_address: Set(None),
        user_agent: Set(None),
        user_id: Set(user_id.to_string()),
    }
    .insert(storage.db())
    .await
    .expect("Failed to seed session");
}

/// 写入一条已过期的会话
pub async fn seed_expired_session(storage: &AppStorage, token: &str, user_id: &str) {
    let now = Utc::now();
    entities::session::ActiveModel {
        id: Set(format!("session-{}", token)),
        expires_at: Set(now - Duration::hours(1)),
        token: Set(token.to_string()),
        created_at: Set(now - Duration::hours(2)),
        updated_at: Set(now - Duration::hours(2)),
        ip_address: Set(None),
        user_agent: Set(None),
        user_id: Set(user_id.to_string()),
    }
    .insert(storage.db())
    .await
    .expect("Failed to seed session");
}

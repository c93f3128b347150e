//! 数据访问层
//!
//! Sea-ORM 之上的薄封装。按领域拆分 impl 块：
//! - `links`: 短链接查询与增删改
//! - `sites`: 站点查询与增删改
//! - `analytics`: 访问事件写入与统计
//! - `sessions`: 会话校验（表由外部认证服务维护）
//! - `kv`: key-value 配置

pub mod connection;
mod analytics;
mod kv;
mod links;
mod models;
mod sessions;
mod sites;

pub use connection::{connect_generic, connect_sqlite, infer_backend_from_url};
pub use models::{
    NewShortLink, NewSite, SessionInfo, ShortLink, ShortLinkUpdate, Site, SiteUpdate,
};

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tracing::info;

use crate::errors::Result;

pub struct AppStorage {
    db: DatabaseConnection,
}

impl AppStorage {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

pub struct StorageFactory;

impl StorageFactory {
    pub async fn create() -> Result<Arc<AppStorage>> {
        let config = crate::config::get_config();
        let database_url = &config.database.database_url;

        let backend = infer_backend_from_url(database_url)?;
        let db = match backend {
            "sqlite" => connect_sqlite(database_url).await?,
            _ => connect_generic(database_url, config.database.pool_size).await?,
        };
        info!("Using database backend: {}", backend);

        Ok(Arc::new(AppStorage::new(db)))
    }
}

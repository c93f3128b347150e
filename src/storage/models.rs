use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{shortener_data, site_data};

/// 短链接记录
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortLink {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub destination: String,
    pub created_by: String,
    pub updated_by: String,
    pub qr_code_path: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<shortener_data::Model> for ShortLink {
    fn from(model: shortener_data::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            slug: model.slug,
            destination: model.destination,
            created_by: model.created_by,
            updated_by: model.updated_by,
            qr_code_path: model.qr_code_path,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// 托管站点记录
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    pub id: String,
    pub name: String,
    pub slug: String,
    /// 对象存储 key 前缀，站点删除时连同其子树一起清理
    pub fs_path: String,
    pub created_by: String,
    pub updated_by: String,
    pub qr_code_path: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Site {
    /// 该站点在对象存储中的完整前缀（含结尾 `/`）
    pub fn object_prefix(&self) -> String {
        format!("{}/", self.fs_path)
    }
}

impl From<site_data::Model> for Site {
    fn from(model: site_data::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            slug: model.slug,
            fs_path: model.fs_path,
            created_by: model.created_by,
            updated_by: model.updated_by,
            qr_code_path: model.qr_code_path,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// 新建短链接的输入
#[derive(Debug, Clone)]
pub struct NewShortLink {
    pub name: String,
    pub slug: String,
    pub destination: String,
    pub user_id: String,
}

/// 短链接部分更新
#[derive(Debug, Clone, Default)]
pub struct ShortLinkUpdate {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub destination: Option<String>,
    pub user_id: String,
}

/// 新建站点的输入
#[derive(Debug, Clone)]
pub struct NewSite {
    pub name: String,
    pub slug: String,
    pub user_id: String,
}

/// 站点部分更新
#[derive(Debug, Clone, Default)]
pub struct SiteUpdate {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub user_id: String,
}

/// 有效会话信息（外部认证服务写入 session 表）
#[derive(Debug, Clone)]
pub struct SessionInfo {
    pub token: String,
    pub user_id: String,
}

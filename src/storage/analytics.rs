use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};
use uuid::Uuid;

use super::AppStorage;
use crate::entities::{shortener_analytics, site_analytics};
use crate::errors::Result;

impl AppStorage {
    /// 写入一条短链接点击事件
    pub async fn insert_link_click(
        &self,
        ref_id: &str,
        ip: &str,
        ip_region: &str,
        user_agent: &str,
    ) -> Result<()> {
        shortener_analytics::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            ref_id: Set(ref_id.to_string()),
            ip: Set(ip.to_string()),
            ip_region: Set(ip_region.to_string()),
            user_agent: Set(user_agent.to_string()),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await?;
        Ok(())
    }

    /// 写入一条站点访问事件
    pub async fn insert_site_visit(
        &self,
        site_id: &str,
        ip: &str,
        ip_region: &str,
        user_agent: &str,
    ) -> Result<()> {
        site_analytics::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            site_id: Set(site_id.to_string()),
            ip: Set(ip.to_string()),
            ip_region: Set(ip_region.to_string()),
            user_agent: Set(user_agent.to_string()),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await?;
        Ok(())
    }

    pub async fn link_click_count(&self, ref_id: &str) -> Result<u64> {
        let count = shortener_analytics::Entity::find()
            .filter(shortener_analytics::Column::RefId.eq(ref_id))
            .count(&self.db)
            .await?;
        Ok(count)
    }

    pub async fn site_visit_count(&self, site_id: &str) -> Result<u64> {
        let count = site_analytics::Entity::find()
            .filter(site_analytics::Column::SiteId.eq(site_id))
            .count(&self.db)
            .await?;
        Ok(count)
    }

    pub async fn delete_link_clicks(&self, ref_id: &str) -> Result<u64> {
        let result = shortener_analytics::Entity::delete_many()
            .filter(shortener_analytics::Column::RefId.eq(ref_id))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }

    pub async fn delete_site_visits(&self, site_id: &str) -> Result<u64> {
        let result = site_analytics::Entity::delete_many()
            .filter(site_analytics::Column::SiteId.eq(site_id))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }
}

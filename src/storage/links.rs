use chrono::Utc;
use sea_orm::sea_query::Condition;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::models::{NewShortLink, ShortLink, ShortLinkUpdate};
use super::AppStorage;
use crate::entities::shortener_data;
use crate::errors::Result;

impl AppStorage {
    pub async fn get_link_by_slug(&self, slug: &str) -> Result<Option<ShortLink>> {
        let found = shortener_data::Entity::find()
            .filter(shortener_data::Column::Slug.eq(slug))
            .one(&self.db)
            .await?;
        Ok(found.map(ShortLink::from))
    }

    pub async fn get_link(&self, id: &str) -> Result<Option<ShortLink>> {
        let found = shortener_data::Entity::find_by_id(id).one(&self.db).await?;
        Ok(found.map(ShortLink::from))
    }

    pub async fn link_slug_taken(&self, slug: &str) -> Result<bool> {
        let count = shortener_data::Entity::find()
            .filter(shortener_data::Column::Slug.eq(slug))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    /// 分页列出短链接，支持 name/slug/destination 模糊搜索，新建在前
    pub async fn list_links(
        &self,
        page: u64,
        limit: u64,
        search: Option<&str>,
    ) -> Result<(Vec<ShortLink>, u64)> {
        let mut query = shortener_data::Entity::find();

        if let Some(term) = search.filter(|t| !t.is_empty()) {
            query = query.filter(
                Condition::any()
                    .add(shortener_data::Column::Name.contains(term))
                    .add(shortener_data::Column::Slug.contains(term))
                    .add(shortener_data::Column::Destination.contains(term)),
            );
        }

        let total = query.clone().count(&self.db).await?;
        let models = query
            .order_by_desc(shortener_data::Column::CreatedAt)
            .paginate(&self.db, limit.max(1))
            .fetch_page(page.saturating_sub(1))
            .await?;

        Ok((models.into_iter().map(ShortLink::from).collect(), total))
    }

    pub async fn create_link(&self, new: NewShortLink) -> Result<ShortLink> {
        let now = Utc::now();
        let model = shortener_data::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            name: Set(new.name),
            slug: Set(new.slug),
            destination: Set(new.destination),
            created_by: Set(new.user_id.clone()),
            updated_by: Set(new.user_id),
            qr_code_path: Set(String::new()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        Ok(ShortLink::from(model))
    }

    pub async fn update_link(&self, id: &str, update: ShortLinkUpdate) -> Result<Option<ShortLink>> {
        let Some(existing) = shortener_data::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let mut active: shortener_data::ActiveModel = existing.into();
        if let Some(name) = update.name {
            active.name = Set(name);
        }
        if let Some(slug) = update.slug {
            active.slug = Set(slug);
        }
        if let Some(destination) = update.destination {
            active.destination = Set(destination);
        }
        active.updated_by = Set(update.user_id);
        active.updated_at = Set(Utc::now());

        let model = active.update(&self.db).await?;
        Ok(Some(ShortLink::from(model)))
    }

    /// 删除短链接及其全部分析记录
    pub async fn delete_link(&self, id: &str) -> Result<()> {
        self.delete_link_clicks(id).await?;
        shortener_data::Entity::delete_by_id(id)
            .exec(&self.db)
            .await?;
        Ok(())
    }
}

use chrono::Utc;
use sea_orm::sea_query::Condition;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::models::{NewSite, Site, SiteUpdate};
use super::AppStorage;
use crate::entities::site_data;
use crate::errors::Result;

impl AppStorage {
    pub async fn get_site_by_slug(&self, slug: &str) -> Result<Option<Site>> {
        let found = site_data::Entity::find()
            .filter(site_data::Column::Slug.eq(slug))
            .one(&self.db)
            .await?;
        Ok(found.map(Site::from))
    }

    pub async fn get_site(&self, id: &str) -> Result<Option<Site>> {
        let found = site_data::Entity::find_by_id(id).one(&self.db).await?;
        Ok(found.map(Site::from))
    }

    pub async fn site_slug_taken(&self, slug: &str) -> Result<bool> {
        let count = site_data::Entity::find()
            .filter(site_data::Column::Slug.eq(slug))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    pub async fn list_sites(
        &self,
        page: u64,
        limit: u64,
        search: Option<&str>,
    ) -> Result<(Vec<Site>, u64)> {
        let mut query = site_data::Entity::find();

        if let Some(term) = search.filter(|t| !t.is_empty()) {
            query = query.filter(
                Condition::any()
                    .add(site_data::Column::Name.contains(term))
                    .add(site_data::Column::Slug.contains(term)),
            );
        }

        let total = query.clone().count(&self.db).await?;
        let models = query
            .order_by_desc(site_data::Column::CreatedAt)
            .paginate(&self.db, limit.max(1))
            .fetch_page(page.saturating_sub(1))
            .await?;

        Ok((models.into_iter().map(Site::from).collect(), total))
    }

    /// 新建站点
    ///
    /// 每个站点生成一个全新的不透明 id，`fs_path = sites/<id>`，
    /// 保证不同站点的对象前缀永不重叠。
    pub async fn create_site(&self, new: NewSite) -> Result<Site> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        let model = site_data::ActiveModel {
            id: Set(id.clone()),
            name: Set(new.name),
            slug: Set(new.slug),
            fs_path: Set(format!("sites/{}", id)),
            created_by: Set(new.user_id.clone()),
            updated_by: Set(new.user_id),
            qr_code_path: Set(String::new()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        Ok(Site::from(model))
    }

    pub async fn update_site(&self, id: &str, update: SiteUpdate) -> Result<Option<Site>> {
        let Some(existing) = site_data::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let mut active: site_data::ActiveModel = existing.into();
        if let Some(name) = update.name {
            active.name = Set(name);
        }
        if let Some(slug) = update.slug {
            active.slug = Set(slug);
        }
        active.updated_by = Set(update.user_id);
        active.updated_at = Set(Utc::now());

        let model = active.update(&self.db).await?;
        Ok(Some(Site::from(model)))
    }

    /// 删除站点行及其全部分析记录
    ///
    /// 对象存储子树的清理由调用方先行发起（尽力而为，失败不阻塞删库）。
    pub async fn delete_site(&self, id: &str) -> Result<()> {
        self.delete_site_visits(id).await?;
        site_data::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(())
    }
}

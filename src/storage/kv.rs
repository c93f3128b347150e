use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, Set};

use super::AppStorage;
use crate::entities::kv_data;
use crate::errors::Result;

impl AppStorage {
    pub async fn kv_get(&self, key: &str) -> Result<Option<serde_json::Value>> {
        let found = kv_data::Entity::find()
            .filter(kv_data::Column::Key.eq(key))
            .one(&self.db)
            .await?;
        Ok(found.map(|model| model.value))
    }

    /// 使用 ON CONFLICT 的原子 upsert
    pub async fn kv_set(&self, key: &str, value: serde_json::Value) -> Result<()> {
        let now = Utc::now();
        let active = kv_data::ActiveModel {
            id: sea_orm::ActiveValue::NotSet,
            key: Set(key.to_string()),
            value: Set(value),
            created_at: Set(now),
            updated_at: Set(now),
        };

        kv_data::Entity::insert(active)
            .on_conflict(
                OnConflict::column(kv_data::Column::Key)
                    .update_columns([kv_data::Column::Value, kv_data::Column::UpdatedAt])
                    .to_owned(),
            )
            .exec(&self.db)
            .await?;
        Ok(())
    }
}

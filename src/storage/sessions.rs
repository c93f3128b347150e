use chrono::Utc;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

use super::models::SessionInfo;
use super::AppStorage;
use crate::entities::session;
use crate::errors::Result;

impl AppStorage {
    /// 按 token 查找未过期会话
    ///
    /// 会话的创建与续期归外部认证服务，这里只做存在性校验。
    pub async fn find_valid_session(&self, token: &str) -> Result<Option<SessionInfo>> {
        let found = session::Entity::find()
            .filter(session::Column::Token.eq(token))
            .filter(session::Column::ExpiresAt.gt(Utc::now()))
            .one(&self.db)
            .await?;

        Ok(found.map(|model| SessionInfo {
            token: model.token,
            user_id: model.user_id,
        }))
    }

    /// 登出：删除会话行
    pub async fn delete_session(&self, token: &str) -> Result<()> {
        session::Entity::delete_many()
            .filter(session::Column::Token.eq(token))
            .exec(&self.db)
            .await?;
        Ok(())
    }
}

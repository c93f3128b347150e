use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "site_data")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    #[sea_orm(unique)]
    pub slug: String,
    /// 对象存储中该站点独占的 key 前缀
    pub fs_path: String,
    pub created_by: String,
    pub updated_by: String,
    pub qr_code_path: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::site_analytics::Entity")]
    SiteAnalytics,
}

impl Related<super::site_analytics::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SiteAnalytics.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "site_analytics")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub site_id: String,
    pub ip: String,
    pub ip_region: String,
    #[sea_orm(column_type = "Text")]
    pub user_agent: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::site_data::Entity",
        from = "Column::SiteId",
        to = "super::site_data::Column::Id"
    )]
    SiteData,
}

impl Related<super::site_data::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SiteData.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

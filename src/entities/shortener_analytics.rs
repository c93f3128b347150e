use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "shortener_analytics")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub ref_id: String,
    pub ip: String,
    pub ip_region: String,
    #[sea_orm(column_type = "Text")]
    pub user_agent: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::shortener_data::Entity",
        from = "Column::RefId",
        to = "super::shortener_data::Column::Id"
    )]
    ShortenerData,
}

impl Related<super::shortener_data::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ShortenerData.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

use sea_orm::entity::prelude::*;

use super::sea_orm_active_enums::{SignalResult, UserTier};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "signal")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub author_id: i32,
    pub title: String,
    pub competition: String,
    pub event_name: String,
    pub market: String,
    pub pick: String,
    pub odds: f64,
    pub stake_units: Option<f64>,
    #[sea_orm(column_type = "Text", nullable)]
    pub analysis: Option<String>,
    pub tier: UserTier,
    pub result: SignalResult,
    pub starts_at: DateTimeUtc,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AuthorId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

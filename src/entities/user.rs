use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Minimal identity row; credentials live with the upstream session layer.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::factory::Entity")]
    Factory,
    #[sea_orm(has_many = "super::favorite_list::Entity")]
    FavoriteLists,
}

impl Related<super::factory::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Factory.def()
    }
}

impl Related<super::favorite_list::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FavoriteLists.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

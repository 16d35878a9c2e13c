use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Kind of stone or inlay set into a piece.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "insert_types")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(unique)]
    pub slug: String,
    pub category: InsertCategory,
    #[sea_orm(column_type = "Text")]
    pub description: String,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum InsertCategory {
    #[sea_orm(string_value = "precious")]
    Precious,
    #[sea_orm(string_value = "semi_precious")]
    SemiPrecious,
    #[sea_orm(string_value = "organic")]
    Organic,
    #[sea_orm(string_value = "synthetic")]
    Synthetic,
    #[sea_orm(string_value = "other")]
    Other,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        super::product_insert_type::Relation::Product.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::product_insert_type::Relation::InsertType.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

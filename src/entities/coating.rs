use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Surface coating such as rhodium or enamel
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "coatings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(unique)]
    pub slug: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        super::product_coating::Relation::Product.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::product_coating::Relation::Coating.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

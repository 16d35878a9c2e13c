use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::material::MaterialType;

/// Assay grade such as 585 or 925, unique per metal family.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "purities")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub material_type: MaterialType,
    pub value: String,
    /// Hallmarking system, e.g. "metric" or "karat"
    pub system: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

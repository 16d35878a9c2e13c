use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A jewelry item listed by a factory, addressed publicly by its article code.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub factory_id: i32,
    pub category_id: i32,
    pub material_id: i32,
    pub purity_id: Option<i32>,
    pub metal_color_id: Option<i32>,
    pub style_id: Option<i32>,

    pub name: String,
    #[sea_orm(unique)]
    pub article: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,

    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub price: Decimal,
    pub stock_quantity: i32,

    #[sea_orm(column_type = "Decimal(Some((8, 2)))")]
    pub metal_weight: Decimal,
    #[sea_orm(column_type = "Decimal(Some((8, 2)))", nullable)]
    pub total_weight: Option<Decimal>,
    pub size: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((8, 2)))", nullable)]
    pub length_mm: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((8, 2)))", nullable)]
    pub width_mm: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((8, 2)))", nullable)]
    pub height_mm: Option<Decimal>,

    pub has_inserts: bool,
    #[sea_orm(column_type = "Text")]
    pub insert_description: String,
    pub has_stamp: bool,
    pub manufacturer_brand: Option<String>,

    pub is_active: bool,
    pub views_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Model {
    pub fn in_stock(&self) -> bool {
        self.stock_quantity > 0
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::factory::Entity",
        from = "Column::FactoryId",
        to = "super::factory::Column::Id",
        on_delete = "Cascade"
    )]
    Factory,
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id",
        on_delete = "Restrict"
    )]
    Category,
    #[sea_orm(
        belongs_to = "super::material::Entity",
        from = "Column::MaterialId",
        to = "super::material::Column::Id",
        on_delete = "Restrict"
    )]
    Material,
    #[sea_orm(has_many = "super::product_image::Entity")]
    Images,
    #[sea_orm(has_many = "super::favorite::Entity")]
    Favorites,
}

impl Related<super::factory::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Factory.def()
    }
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::material::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Material.def()
    }
}

impl Related<super::product_image::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Images.def()
    }
}

impl Related<super::insert_type::Entity> for Entity {
    fn to() -> RelationDef {
        super::product_insert_type::Relation::InsertType.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::product_insert_type::Relation::Product.def().rev())
    }
}

impl Related<super::coating::Entity> for Entity {
    fn to() -> RelationDef {
        super::product_coating::Relation::Coating.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::product_coating::Relation::Product.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Storefront color and typography settings.
///
/// At most one row is the default and at most one is active; the default row
/// has no owner. Both rules are maintained by `ThemeService`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "themes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub user_id: Option<i32>,
    pub is_default: bool,
    pub is_active: bool,
    pub primary_color: String,
    pub secondary_color: String,
    pub color_scheme: String,
    pub gradient_enabled: bool,
    pub sharp_corners: bool,
    pub heading_font: String,
    pub body_font: String,
    pub heading_font_weight: i32,
    pub body_font_weight: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl ActiveModelBehavior for ActiveModel {}

use crate::{
    entities::{factory, product, user},
    errors::ServiceError,
    services::{
        catalog::{summarize, CatalogItem},
        favorites::ensure_default_list_in,
        products::ProductView,
    },
};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct FactoryRegistration {
    #[validate(length(min = 1, max = 150))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 200))]
    pub factory_name: String,
    #[validate(length(min = 1, max = 300))]
    pub address: String,
    #[validate(length(min = 1, max = 20))]
    pub phone: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct CustomerRegistration {
    #[validate(length(min = 1, max = 150))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[serde(default)]
    #[validate(length(max = 30))]
    pub first_name: String,
    #[serde(default)]
    #[validate(length(max = 30))]
    pub last_name: String,
}

/// Partial factory profile update.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct ProfileUpdate {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(length(min = 1, max = 300))]
    pub address: Option<String>,
    #[validate(length(min = 1, max = 20))]
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FactoryView {
    pub id: i32,
    pub user_id: i32,
    pub name: String,
    pub description: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl From<factory::Model> for FactoryView {
    fn from(f: factory::Model) -> Self {
        Self {
            id: f.id,
            user_id: f.user_id,
            name: f.name,
            description: f.description,
            address: f.address,
            phone: f.phone,
            email: f.email,
            is_verified: f.is_verified,
            created_at: f.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserView {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<user::Model> for UserView {
    fn from(u: user::Model) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            first_name: u.first_name,
            last_name: u.last_name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RegisteredFactory {
    pub user: UserView,
    pub factory: FactoryView,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DashboardStats {
    pub total_products: usize,
    pub active_products: usize,
    pub total_views: i64,
    pub in_stock: usize,
}

impl DashboardStats {
    pub fn from_products(products: &[product::Model]) -> Self {
        Self {
            total_products: products.len(),
            active_products: products.iter().filter(|p| p.is_active).count(),
            total_views: products.iter().map(|p| i64::from(p.views_count)).sum(),
            in_stock: products.iter().filter(|p| p.in_stock()).count(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Dashboard {
    pub factory: FactoryView,
    pub products: Vec<ProductView>,
    pub stats: DashboardStats,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FactoryDetail {
    pub factory: FactoryView,
    pub products: Vec<CatalogItem>,
}

async fn insert_user(
    txn: &DatabaseTransaction,
    username: &str,
    email: &str,
    first_name: &str,
    last_name: &str,
) -> Result<user::Model, ServiceError> {
    user::ActiveModel {
        username: Set(username.trim().to_string()),
        email: Set(email.trim().to_string()),
        first_name: Set(first_name.trim().to_string()),
        last_name: Set(last_name.trim().to_string()),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(txn)
    .await
    .map_err(|err| ServiceError::unique_or(err, format!("username {} is taken", username.trim())))
}

#[derive(Clone)]
pub struct FactoryService {
    db: Arc<DatabaseConnection>,
}

impl FactoryService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Creates the owning user and the factory profile together.
    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn register_factory(
        &self,
        input: FactoryRegistration,
    ) -> Result<RegisteredFactory, ServiceError> {
        input.validate()?;

        let txn = self.db.begin().await?;
        let user = insert_user(&txn, &input.username, &input.email, "", "").await?;
        let factory = factory::ActiveModel {
            user_id: Set(user.id),
            name: Set(input.factory_name.trim().to_string()),
            description: Set(input.description),
            address: Set(input.address.trim().to_string()),
            phone: Set(input.phone.trim().to_string()),
            email: Set(input.email.trim().to_string()),
            is_verified: Set(false),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;

        info!(factory_id = factory.id, user_id = user.id, "factory registered");
        Ok(RegisteredFactory {
            user: user.into(),
            factory: factory.into(),
        })
    }

    /// Creates a customer account with its default favorites list.
    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn register_customer(
        &self,
        input: CustomerRegistration,
    ) -> Result<UserView, ServiceError> {
        input.validate()?;

        let txn = self.db.begin().await?;
        let user = insert_user(
            &txn,
            &input.username,
            &input.email,
            &input.first_name,
            &input.last_name,
        )
        .await?;
        ensure_default_list_in(&txn, user.id).await?;
        txn.commit().await?;

        info!(user_id = user.id, "customer registered");
        Ok(user.into())
    }

    /// The factory owned by `user_id`; users without one are refused.
    pub async fn factory_for_user(&self, user_id: i32) -> Result<factory::Model, ServiceError> {
        factory::Entity::find()
            .filter(factory::Column::UserId.eq(user_id))
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::Forbidden("no factory profile for this user".to_string()))
    }

    #[instrument(skip(self, update))]
    pub async fn update_profile(
        &self,
        user_id: i32,
        update: ProfileUpdate,
    ) -> Result<FactoryView, ServiceError> {
        update.validate()?;
        let current = self.factory_for_user(user_id).await?;

        let mut active: factory::ActiveModel = current.into();
        if let Some(name) = update.name {
            active.name = Set(name.trim().to_string());
        }
        if let Some(description) = update.description {
            active.description = Set(description);
        }
        if let Some(address) = update.address {
            active.address = Set(address.trim().to_string());
        }
        if let Some(phone) = update.phone {
            active.phone = Set(phone.trim().to_string());
        }
        if let Some(email) = update.email {
            active.email = Set(email.trim().to_string());
        }
        Ok(active.update(&*self.db).await?.into())
    }

    /// The owner's view: every product, active or not, newest first.
    #[instrument(skip(self))]
    pub async fn dashboard(&self, user_id: i32) -> Result<Dashboard, ServiceError> {
        let factory = self.factory_for_user(user_id).await?;
        let products = product::Entity::find()
            .filter(product::Column::FactoryId.eq(factory.id))
            .order_by_desc(product::Column::CreatedAt)
            .order_by_desc(product::Column::Id)
            .all(&*self.db)
            .await?;

        Ok(Dashboard {
            stats: DashboardStats::from_products(&products),
            products: products.iter().map(ProductView::from).collect(),
            factory: factory.into(),
        })
    }

    /// Public factory page with its active products.
    #[instrument(skip(self))]
    pub async fn factory_detail(&self, factory_id: i32) -> Result<FactoryDetail, ServiceError> {
        let factory = factory::Entity::find_by_id(factory_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("factory {factory_id} not found")))?;

        let products = product::Entity::find()
            .filter(product::Column::FactoryId.eq(factory.id))
            .filter(product::Column::IsActive.eq(true))
            .order_by_desc(product::Column::CreatedAt)
            .order_by_desc(product::Column::Id)
            .all(&*self.db)
            .await?;

        Ok(FactoryDetail {
            products: summarize(&*self.db, products).await?,
            factory: factory.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn product(id: i32, is_active: bool, stock_quantity: i32, views_count: i32) -> product::Model {
        let now = Utc::now();
        product::Model {
            id,
            factory_id: 1,
            category_id: 1,
            material_id: 1,
            purity_id: None,
            metal_color_id: None,
            style_id: None,
            name: format!("Piece {id}"),
            article: format!("1-{id:06}"),
            description: String::new(),
            price: dec!(100),
            stock_quantity,
            metal_weight: dec!(1.5),
            total_weight: None,
            size: None,
            length_mm: None,
            width_mm: None,
            height_mm: None,
            has_inserts: false,
            insert_description: String::new(),
            has_stamp: true,
            manufacturer_brand: None,
            is_active,
            views_count,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn stats_count_every_product() {
        let stats = DashboardStats::from_products(&[
            product(1, true, 3, 10),
            product(2, false, 0, 5),
            product(3, true, 0, 0),
        ]);
        assert_eq!(
            stats,
            DashboardStats {
                total_products: 3,
                active_products: 2,
                total_views: 15,
                in_stock: 1,
            }
        );
    }

    #[test]
    fn registration_requires_a_valid_email() {
        let input = FactoryRegistration {
            username: "zlato".into(),
            email: "not-an-email".into(),
            factory_name: "Zlato".into(),
            address: "Moscow".into(),
            phone: "+7 495 000".into(),
            description: String::new(),
        };
        let errors = input.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }
}

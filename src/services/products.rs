use crate::{
    entities::{
        category, coating, favorite, insert_type, material, metal_color, product, product_coating,
        product_image, product_insert_type, purity, style,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::article_numbers::{next_article, MAX_ARTICLE_ATTEMPTS},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection,
    DatabaseTransaction, EntityTrait, PaginatorTrait, PrimaryKeyTrait, QueryFilter, Set,
    TransactionTrait,
};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

fn non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::new("must not be negative"));
    }
    Ok(())
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("must not be blank"));
    }
    Ok(())
}

/// Keeps "absent" and "explicit null" apart in partial updates.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct NewProduct {
    #[validate(length(min = 1, max = 200), custom = "not_blank")]
    pub name: String,
    /// Left empty to have the next code for the factory assigned
    #[validate(length(max = 50))]
    pub article: Option<String>,
    #[serde(default)]
    pub description: String,
    pub category_id: i32,
    pub material_id: i32,
    pub purity_id: Option<i32>,
    pub metal_color_id: Option<i32>,
    pub style_id: Option<i32>,
    #[validate(custom = "non_negative")]
    #[schema(value_type = String, example = "15000.00")]
    pub price: Decimal,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub stock_quantity: i32,
    #[validate(custom = "non_negative")]
    #[schema(value_type = String, example = "3.20")]
    pub metal_weight: Decimal,
    #[schema(value_type = Option<String>)]
    pub total_weight: Option<Decimal>,
    #[validate(length(max = 20))]
    pub size: Option<String>,
    #[schema(value_type = Option<String>)]
    pub length_mm: Option<Decimal>,
    #[schema(value_type = Option<String>)]
    pub width_mm: Option<Decimal>,
    #[schema(value_type = Option<String>)]
    pub height_mm: Option<Decimal>,
    #[serde(default)]
    pub has_inserts: bool,
    #[serde(default)]
    pub insert_description: String,
    #[serde(default)]
    pub has_stamp: bool,
    #[validate(length(max = 100))]
    pub manufacturer_brand: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub insert_type_ids: Vec<i32>,
    #[serde(default)]
    pub coating_ids: Vec<i32>,
    /// Path of an already stored picture to attach as the main image
    pub main_image: Option<String>,
}

/// Partial product update. Omitted fields are left unchanged; `null` clears
/// optional ones.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct ProductPatch {
    #[validate(length(min = 1, max = 200), custom = "not_blank")]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 50), custom = "not_blank")]
    pub article: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<i32>,
    pub material_id: Option<i32>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<i32>)]
    pub purity_id: Option<Option<i32>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<i32>)]
    pub metal_color_id: Option<Option<i32>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<i32>)]
    pub style_id: Option<Option<i32>>,
    #[validate(custom = "non_negative")]
    #[schema(value_type = Option<String>)]
    pub price: Option<Decimal>,
    #[validate(range(min = 0))]
    pub stock_quantity: Option<i32>,
    #[validate(custom = "non_negative")]
    #[schema(value_type = Option<String>)]
    pub metal_weight: Option<Decimal>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub total_weight: Option<Option<Decimal>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub size: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub length_mm: Option<Option<Decimal>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub width_mm: Option<Option<Decimal>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub height_mm: Option<Option<Decimal>>,
    pub has_inserts: Option<bool>,
    pub insert_description: Option<String>,
    pub has_stamp: Option<bool>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub manufacturer_brand: Option<Option<String>>,
    pub is_active: Option<bool>,
    /// Replaces the whole set when present
    pub insert_type_ids: Option<Vec<i32>>,
    /// Replaces the whole set when present
    pub coating_ids: Option<Vec<i32>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct NewImage {
    #[validate(length(min = 1, max = 500))]
    pub image: String,
    #[serde(default)]
    pub is_main: bool,
    #[serde(default)]
    pub sort_order: i32,
}

/// A product as its owning factory sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductView {
    pub id: i32,
    pub article: String,
    pub name: String,
    pub description: String,
    pub category_id: i32,
    pub material_id: i32,
    pub purity_id: Option<i32>,
    pub metal_color_id: Option<i32>,
    pub style_id: Option<i32>,
    #[schema(value_type = String)]
    pub price: Decimal,
    pub stock_quantity: i32,
    pub in_stock: bool,
    #[schema(value_type = String)]
    pub metal_weight: Decimal,
    pub has_inserts: bool,
    pub has_stamp: bool,
    pub is_active: bool,
    pub views_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&product::Model> for ProductView {
    fn from(p: &product::Model) -> Self {
        Self {
            id: p.id,
            article: p.article.clone(),
            name: p.name.clone(),
            description: p.description.clone(),
            category_id: p.category_id,
            material_id: p.material_id,
            purity_id: p.purity_id,
            metal_color_id: p.metal_color_id,
            style_id: p.style_id,
            price: p.price,
            stock_quantity: p.stock_quantity,
            in_stock: p.in_stock(),
            metal_weight: p.metal_weight,
            has_inserts: p.has_inserts,
            has_stamp: p.has_stamp,
            is_active: p.is_active,
            views_count: p.views_count,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

async fn ensure_exists<E, C>(conn: &C, id: i32, label: &str) -> Result<(), ServiceError>
where
    E: EntityTrait,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i32>,
    C: ConnectionTrait,
{
    match E::find_by_id(id).one(conn).await? {
        Some(_) => Ok(()),
        None => Err(ServiceError::ValidationError(format!("unknown {label} {id}"))),
    }
}

fn unique_ids(ids: &[i32]) -> Vec<i32> {
    ids.iter().copied().collect::<BTreeSet<_>>().into_iter().collect()
}

async fn ensure_insert_types<C: ConnectionTrait>(conn: &C, ids: &[i32]) -> Result<(), ServiceError> {
    if ids.is_empty() {
        return Ok(());
    }
    let found = insert_type::Entity::find()
        .filter(insert_type::Column::Id.is_in(ids.to_vec()))
        .count(conn)
        .await?;
    if found as usize != ids.len() {
        return Err(ServiceError::ValidationError("unknown insert type".to_string()));
    }
    Ok(())
}

async fn ensure_coatings<C: ConnectionTrait>(conn: &C, ids: &[i32]) -> Result<(), ServiceError> {
    if ids.is_empty() {
        return Ok(());
    }
    let found = coating::Entity::find()
        .filter(coating::Column::Id.is_in(ids.to_vec()))
        .count(conn)
        .await?;
    if found as usize != ids.len() {
        return Err(ServiceError::ValidationError("unknown coating".to_string()));
    }
    Ok(())
}

async fn replace_insert_types(
    txn: &DatabaseTransaction,
    product_id: i32,
    ids: &[i32],
) -> Result<(), ServiceError> {
    product_insert_type::Entity::delete_many()
        .filter(product_insert_type::Column::ProductId.eq(product_id))
        .exec(txn)
        .await?;
    if ids.is_empty() {
        return Ok(());
    }
    product_insert_type::Entity::insert_many(ids.iter().map(|&id| {
        product_insert_type::ActiveModel {
            product_id: Set(product_id),
            insert_type_id: Set(id),
        }
    }))
    .exec_without_returning(txn)
    .await?;
    Ok(())
}

async fn replace_coatings(
    txn: &DatabaseTransaction,
    product_id: i32,
    ids: &[i32],
) -> Result<(), ServiceError> {
    product_coating::Entity::delete_many()
        .filter(product_coating::Column::ProductId.eq(product_id))
        .exec(txn)
        .await?;
    if ids.is_empty() {
        return Ok(());
    }
    product_coating::Entity::insert_many(ids.iter().map(|&id| product_coating::ActiveModel {
        product_id: Set(product_id),
        coating_id: Set(id),
    }))
    .exec_without_returning(txn)
    .await?;
    Ok(())
}

/// Product management for the owning factory.
#[derive(Clone)]
pub struct ProductService {
    db: Arc<DatabaseConnection>,
    event_sender: Arc<EventSender>,
}

impl ProductService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: Arc<EventSender>) -> Self {
        Self { db, event_sender }
    }

    /// A product of `factory_id`; other factories' articles read as missing.
    pub async fn owned(&self, factory_id: i32, article: &str) -> Result<product::Model, ServiceError> {
        product::Entity::find()
            .filter(product::Column::Article.eq(article))
            .filter(product::Column::FactoryId.eq(factory_id))
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("product {article} not found")))
    }

    async fn check_references(
        &self,
        category_id: Option<i32>,
        material_id: Option<i32>,
        purity_id: Option<i32>,
        metal_color_id: Option<i32>,
        style_id: Option<i32>,
    ) -> Result<(), ServiceError> {
        let db = &*self.db;
        if let Some(id) = category_id {
            ensure_exists::<category::Entity, _>(db, id, "category").await?;
        }
        if let Some(id) = material_id {
            ensure_exists::<material::Entity, _>(db, id, "material").await?;
        }
        if let Some(id) = purity_id {
            ensure_exists::<purity::Entity, _>(db, id, "purity").await?;
        }
        if let Some(id) = metal_color_id {
            ensure_exists::<metal_color::Entity, _>(db, id, "metal color").await?;
        }
        if let Some(id) = style_id {
            ensure_exists::<style::Entity, _>(db, id, "style").await?;
        }
        Ok(())
    }

    /// Reserves an article in its own transaction so the counter survives a
    /// failed product insert.
    async fn allocate_article(&self, factory_id: i32) -> Result<String, ServiceError> {
        let txn = self.db.begin().await?;
        let article = next_article(&txn, factory_id).await?;
        txn.commit().await?;
        Ok(article)
    }

    /// Creates a product, assigning the next article code when none is given.
    ///
    /// A generated code that collides with an existing article is replaced by
    /// a freshly allocated one, up to `MAX_ARTICLE_ATTEMPTS` times. A
    /// caller-supplied code that collides is a conflict.
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_product(
        &self,
        factory_id: i32,
        input: NewProduct,
    ) -> Result<product::Model, ServiceError> {
        input.validate()?;
        self.check_references(
            Some(input.category_id),
            Some(input.material_id),
            input.purity_id,
            input.metal_color_id,
            input.style_id,
        )
        .await?;
        let insert_type_ids = unique_ids(&input.insert_type_ids);
        let coating_ids = unique_ids(&input.coating_ids);
        ensure_insert_types(&*self.db, &insert_type_ids).await?;
        ensure_coatings(&*self.db, &coating_ids).await?;

        let manual = input
            .article
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(str::to_string);

        let mut attempt = 0;
        let created = loop {
            attempt += 1;
            let article = match &manual {
                Some(article) => article.clone(),
                None => self.allocate_article(factory_id).await?,
            };

            match self
                .insert_product(factory_id, &article, &input, &insert_type_ids, &coating_ids)
                .await
            {
                Ok(created) => break created,
                Err(err) if err.is_unique_violation() => {
                    if manual.is_none() && attempt < MAX_ARTICLE_ATTEMPTS {
                        warn!(article = %article, attempt, "generated article already taken; retrying");
                        continue;
                    }
                    return Err(ServiceError::Conflict(format!(
                        "article {article} is already in use"
                    )));
                }
                Err(err) => return Err(err),
            }
        };

        metrics::counter!("auroom.products.created", 1);
        self.event_sender.send_or_log(Event::ProductCreated {
            factory_id,
            article: created.article.clone(),
        });
        info!(product_id = created.id, article = %created.article, "product created");
        Ok(created)
    }

    async fn insert_product(
        &self,
        factory_id: i32,
        article: &str,
        input: &NewProduct,
        insert_type_ids: &[i32],
        coating_ids: &[i32],
    ) -> Result<product::Model, ServiceError> {
        let now = Utc::now();
        let txn = self.db.begin().await?;

        let created = product::ActiveModel {
            factory_id: Set(factory_id),
            category_id: Set(input.category_id),
            material_id: Set(input.material_id),
            purity_id: Set(input.purity_id),
            metal_color_id: Set(input.metal_color_id),
            style_id: Set(input.style_id),
            name: Set(input.name.trim().to_string()),
            article: Set(article.to_string()),
            description: Set(input.description.clone()),
            price: Set(input.price),
            stock_quantity: Set(input.stock_quantity),
            metal_weight: Set(input.metal_weight),
            total_weight: Set(input.total_weight),
            size: Set(input.size.clone()),
            length_mm: Set(input.length_mm),
            width_mm: Set(input.width_mm),
            height_mm: Set(input.height_mm),
            has_inserts: Set(input.has_inserts),
            insert_description: Set(input.insert_description.clone()),
            has_stamp: Set(input.has_stamp),
            manufacturer_brand: Set(input.manufacturer_brand.clone()),
            is_active: Set(input.is_active),
            views_count: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        replace_insert_types(&txn, created.id, insert_type_ids).await?;
        replace_coatings(&txn, created.id, coating_ids).await?;

        if let Some(path) = input.main_image.as_deref().filter(|p| !p.trim().is_empty()) {
            product_image::ActiveModel {
                product_id: Set(created.id),
                image: Set(path.trim().to_string()),
                is_main: Set(true),
                sort_order: Set(0),
                uploaded_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await?;
        Ok(created)
    }

    /// Applies a partial update to one of the factory's products.
    #[instrument(skip(self, patch))]
    pub async fn update_product(
        &self,
        factory_id: i32,
        article: &str,
        patch: ProductPatch,
    ) -> Result<product::Model, ServiceError> {
        patch.validate()?;
        let current = self.owned(factory_id, article).await?;

        self.check_references(
            patch.category_id,
            patch.material_id,
            patch.purity_id.flatten(),
            patch.metal_color_id.flatten(),
            patch.style_id.flatten(),
        )
        .await?;
        let insert_type_ids = patch.insert_type_ids.as_deref().map(unique_ids);
        let coating_ids = patch.coating_ids.as_deref().map(unique_ids);
        if let Some(ids) = &insert_type_ids {
            ensure_insert_types(&*self.db, ids).await?;
        }
        if let Some(ids) = &coating_ids {
            ensure_coatings(&*self.db, ids).await?;
        }

        let product_id = current.id;
        let mut active: product::ActiveModel = current.into();
        if let Some(name) = patch.name {
            active.name = Set(name.trim().to_string());
        }
        if let Some(code) = patch.article {
            active.article = Set(code.trim().to_string());
        }
        if let Some(description) = patch.description {
            active.description = Set(description);
        }
        if let Some(id) = patch.category_id {
            active.category_id = Set(id);
        }
        if let Some(id) = patch.material_id {
            active.material_id = Set(id);
        }
        if let Some(id) = patch.purity_id {
            active.purity_id = Set(id);
        }
        if let Some(id) = patch.metal_color_id {
            active.metal_color_id = Set(id);
        }
        if let Some(id) = patch.style_id {
            active.style_id = Set(id);
        }
        if let Some(price) = patch.price {
            active.price = Set(price);
        }
        if let Some(quantity) = patch.stock_quantity {
            active.stock_quantity = Set(quantity);
        }
        if let Some(weight) = patch.metal_weight {
            active.metal_weight = Set(weight);
        }
        if let Some(weight) = patch.total_weight {
            active.total_weight = Set(weight);
        }
        if let Some(size) = patch.size {
            active.size = Set(size);
        }
        if let Some(v) = patch.length_mm {
            active.length_mm = Set(v);
        }
        if let Some(v) = patch.width_mm {
            active.width_mm = Set(v);
        }
        if let Some(v) = patch.height_mm {
            active.height_mm = Set(v);
        }
        if let Some(flag) = patch.has_inserts {
            active.has_inserts = Set(flag);
        }
        if let Some(text) = patch.insert_description {
            active.insert_description = Set(text);
        }
        if let Some(flag) = patch.has_stamp {
            active.has_stamp = Set(flag);
        }
        if let Some(brand) = patch.manufacturer_brand {
            active.manufacturer_brand = Set(brand);
        }
        if let Some(flag) = patch.is_active {
            active.is_active = Set(flag);
        }
        active.updated_at = Set(Utc::now());

        let txn = self.db.begin().await?;
        let updated = active
            .update(&txn)
            .await
            .map_err(|err| ServiceError::unique_or(err, "article is already in use"))?;
        if let Some(ids) = &insert_type_ids {
            replace_insert_types(&txn, product_id, ids).await?;
        }
        if let Some(ids) = &coating_ids {
            replace_coatings(&txn, product_id, ids).await?;
        }
        txn.commit().await?;

        self.event_sender.send_or_log(Event::ProductUpdated {
            factory_id,
            article: updated.article.clone(),
        });
        Ok(updated)
    }

    /// Removes a product together with its images, attribute links and favorites.
    #[instrument(skip(self))]
    pub async fn delete_product(&self, factory_id: i32, article: &str) -> Result<(), ServiceError> {
        let target = self.owned(factory_id, article).await?;

        let txn = self.db.begin().await?;
        favorite::Entity::delete_many()
            .filter(favorite::Column::ProductId.eq(target.id))
            .exec(&txn)
            .await?;
        product_insert_type::Entity::delete_many()
            .filter(product_insert_type::Column::ProductId.eq(target.id))
            .exec(&txn)
            .await?;
        product_coating::Entity::delete_many()
            .filter(product_coating::Column::ProductId.eq(target.id))
            .exec(&txn)
            .await?;
        product_image::Entity::delete_many()
            .filter(product_image::Column::ProductId.eq(target.id))
            .exec(&txn)
            .await?;
        product::Entity::delete_by_id(target.id).exec(&txn).await?;
        txn.commit().await?;

        self.event_sender.send_or_log(Event::ProductDeleted {
            factory_id,
            article: target.article.clone(),
        });
        info!(article = %target.article, "product deleted");
        Ok(())
    }

    /// Attaches an image; a new main image demotes the previous one.
    #[instrument(skip(self, input))]
    pub async fn add_image(
        &self,
        factory_id: i32,
        article: &str,
        input: NewImage,
    ) -> Result<product_image::Model, ServiceError> {
        input.validate()?;
        let target = self.owned(factory_id, article).await?;

        let txn = self.db.begin().await?;
        if input.is_main {
            product_image::Entity::update_many()
                .col_expr(product_image::Column::IsMain, Expr::value(false))
                .filter(product_image::Column::ProductId.eq(target.id))
                .exec(&txn)
                .await?;
        }
        let image = product_image::ActiveModel {
            product_id: Set(target.id),
            image: Set(input.image.trim().to_string()),
            is_main: Set(input.is_main),
            sort_order: Set(input.sort_order),
            uploaded_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;
        Ok(image)
    }

    #[instrument(skip(self))]
    pub async fn remove_image(
        &self,
        factory_id: i32,
        article: &str,
        image_id: i32,
    ) -> Result<(), ServiceError> {
        let target = self.owned(factory_id, article).await?;
        let result = product_image::Entity::delete_many()
            .filter(product_image::Column::Id.eq(image_id))
            .filter(product_image::Column::ProductId.eq(target.id))
            .exec(&*self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!("image {image_id} not found")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn patch_distinguishes_null_from_absent() {
        let patch: ProductPatch =
            serde_json::from_str(r#"{"purity_id": null, "style_id": 4, "price": "10.50"}"#).unwrap();
        assert_eq!(patch.purity_id, Some(None));
        assert_eq!(patch.style_id, Some(Some(4)));
        assert_eq!(patch.metal_color_id, None);
        assert_eq!(patch.price, Some(dec!(10.50)));
    }

    #[test]
    fn negative_price_is_rejected() {
        let input = NewProduct {
            name: "Ring".into(),
            price: dec!(-1),
            metal_weight: dec!(2.5),
            ..Default::default()
        };
        let errors = input.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("price"));
    }

    #[test]
    fn blank_article_or_name_in_patch_is_rejected() {
        let patch = ProductPatch {
            article: Some("   ".into()),
            name: Some("\t".into()),
            ..Default::default()
        };
        let errors = patch.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("article"));
        assert!(fields.contains_key("name"));

        let ok = ProductPatch {
            article: Some(" 7-000001 ".into()),
            ..Default::default()
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn new_product_defaults_to_active() {
        let input: NewProduct = serde_json::from_str(
            r#"{"name":"Ring","category_id":1,"material_id":1,"price":"100","metal_weight":"2"}"#,
        )
        .unwrap();
        assert!(input.is_active);
        assert!(input.article.is_none());
        assert!(input.insert_type_ids.is_empty());
        assert!(input.validate().is_ok());
    }

    #[test]
    fn duplicate_link_ids_collapse() {
        assert_eq!(unique_ids(&[3, 1, 3, 2, 1]), vec![1, 2, 3]);
    }
}

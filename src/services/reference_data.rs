use crate::{
    cache::InMemoryCache,
    entities::{
        category, coating, insert_type, insert_type::InsertCategory, material, metal_color, purity,
        style, MaterialType,
    },
    errors::ServiceError,
    services::{categories::build_tree, categories::CategoryNode, slug::slugify},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};
use utoipa::ToSchema;

const REFERENCE_CACHE_KEY: &str = "reference:all";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MaterialView {
    pub id: i32,
    pub name: String,
    pub material_type: MaterialType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PurityView {
    pub id: i32,
    pub material_type: MaterialType,
    pub value: String,
    pub system: String,
    pub description: String,
}

/// A named, slugged attribute value (metal color, style, coating).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SluggedItem {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct InsertTypeView {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub category: InsertCategory,
    pub description: String,
}

impl From<material::Model> for MaterialView {
    fn from(m: material::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            material_type: m.material_type,
        }
    }
}

impl From<purity::Model> for PurityView {
    fn from(p: purity::Model) -> Self {
        Self {
            id: p.id,
            material_type: p.material_type,
            value: p.value,
            system: p.system,
            description: p.description,
        }
    }
}

impl From<insert_type::Model> for InsertTypeView {
    fn from(i: insert_type::Model) -> Self {
        Self {
            id: i.id,
            name: i.name,
            slug: i.slug,
            category: i.category,
            description: i.description,
        }
    }
}

macro_rules! slugged_from {
    ($($module:ident),+) => {
        $(impl From<$module::Model> for SluggedItem {
            fn from(m: $module::Model) -> Self {
                Self {
                    id: m.id,
                    name: m.name,
                    slug: m.slug,
                    description: m.description,
                }
            }
        })+
    };
}

slugged_from!(metal_color, style, coating);

/// Every list a product form or catalog filter needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ReferenceData {
    pub categories: Vec<CategoryNode>,
    pub materials: Vec<MaterialView>,
    pub purities: Vec<PurityView>,
    pub metal_colors: Vec<SluggedItem>,
    pub styles: Vec<SluggedItem>,
    pub insert_types: Vec<InsertTypeView>,
    pub coatings: Vec<SluggedItem>,
}

/// A new attribute value, tagged by `kind`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NewCharacteristic {
    Purity {
        material_type: MaterialType,
        value: String,
        #[serde(default = "default_purity_system")]
        system: String,
        #[serde(default)]
        description: String,
    },
    MetalColor {
        name: String,
        #[serde(default)]
        description: String,
    },
    Style {
        name: String,
        #[serde(default)]
        description: String,
    },
    InsertType {
        name: String,
        category: InsertCategory,
        #[serde(default)]
        description: String,
    },
    Coating {
        name: String,
        #[serde(default)]
        description: String,
    },
}

fn default_purity_system() -> String {
    "metric".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Characteristic {
    Purity(PurityView),
    MetalColor(SluggedItem),
    Style(SluggedItem),
    InsertType(InsertTypeView),
    Coating(SluggedItem),
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewMaterial {
    pub name: String,
    pub material_type: MaterialType,
}

fn required(field: &str, value: &str) -> Result<String, ServiceError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::ValidationError(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

fn taken(what: &'static str) -> impl Fn(DbErr) -> ServiceError {
    move |err| ServiceError::unique_or(err, format!("{what} already exists"))
}

fn slug_for(name: &str) -> Result<String, ServiceError> {
    let slug = slugify(name);
    if slug.is_empty() {
        return Err(ServiceError::ValidationError(
            "a slug cannot be derived from this name".to_string(),
        ));
    }
    Ok(slug)
}

/// Reference lists, served from the in-process cache for `ttl`.
///
/// Writes do not evict the cached lists.
#[derive(Clone)]
pub struct ReferenceDataService {
    db: Arc<DatabaseConnection>,
    cache: Arc<InMemoryCache>,
    ttl: Duration,
    cache_enabled: bool,
}

impl ReferenceDataService {
    pub fn new(
        db: Arc<DatabaseConnection>,
        cache: Arc<InMemoryCache>,
        ttl: Duration,
        cache_enabled: bool,
    ) -> Self {
        Self {
            db,
            cache,
            ttl,
            cache_enabled,
        }
    }

    #[instrument(skip(self))]
    pub async fn reference_data(&self) -> Result<ReferenceData, ServiceError> {
        if self.cache_enabled {
            match self.cache.get_json::<ReferenceData>(REFERENCE_CACHE_KEY).await {
                Ok(Some(cached)) => {
                    metrics::counter!("auroom.reference_cache.hit", 1);
                    return Ok(cached);
                }
                Ok(None) => {
                    metrics::counter!("auroom.reference_cache.miss", 1);
                }
                Err(err) => warn!(error = %err, "reference cache read failed"),
            }
        }

        let data = self.load().await?;
        if self.cache_enabled {
            if let Err(err) = self.cache.set_json(REFERENCE_CACHE_KEY, &data, self.ttl).await {
                warn!(error = %err, "reference cache write failed");
            }
        }
        Ok(data)
    }

    async fn load(&self) -> Result<ReferenceData, ServiceError> {
        let db = &*self.db;
        debug!("loading reference data from the database");

        let categories = category::Entity::find()
            .filter(category::Column::IsActive.eq(true))
            .all(db)
            .await?;
        let materials = material::Entity::find()
            .order_by_asc(material::Column::Name)
            .all(db)
            .await?;
        let purities = purity::Entity::find()
            .order_by_asc(purity::Column::MaterialType)
            .order_by_asc(purity::Column::Value)
            .all(db)
            .await?;
        let metal_colors = metal_color::Entity::find()
            .order_by_asc(metal_color::Column::Name)
            .all(db)
            .await?;
        let styles = style::Entity::find()
            .order_by_asc(style::Column::Name)
            .all(db)
            .await?;
        let insert_types = insert_type::Entity::find()
            .order_by_asc(insert_type::Column::Category)
            .order_by_asc(insert_type::Column::Name)
            .all(db)
            .await?;
        let coatings = coating::Entity::find()
            .order_by_asc(coating::Column::Name)
            .all(db)
            .await?;

        Ok(ReferenceData {
            categories: build_tree(categories),
            materials: materials.into_iter().map(Into::into).collect(),
            purities: purities.into_iter().map(Into::into).collect(),
            metal_colors: metal_colors.into_iter().map(Into::into).collect(),
            styles: styles.into_iter().map(Into::into).collect(),
            insert_types: insert_types.into_iter().map(Into::into).collect(),
            coatings: coatings.into_iter().map(Into::into).collect(),
        })
    }

    /// Adds one attribute value. Slugs come from the name; duplicates conflict.
    #[instrument(skip(self))]
    pub async fn add_characteristic(
        &self,
        input: NewCharacteristic,
    ) -> Result<Characteristic, ServiceError> {
        let db = &*self.db;

        let added = match input {
            NewCharacteristic::Purity {
                material_type,
                value,
                system,
                description,
            } => {
                let value = required("value", &value)?;
                let row = purity::ActiveModel {
                    material_type: Set(material_type),
                    value: Set(value),
                    system: Set(system),
                    description: Set(description),
                    ..Default::default()
                }
                .insert(db)
                .await
                .map_err(taken("purity"))?;
                Characteristic::Purity(row.into())
            }
            NewCharacteristic::MetalColor { name, description } => {
                let name = required("name", &name)?;
                let row = metal_color::ActiveModel {
                    slug: Set(slug_for(&name)?),
                    name: Set(name),
                    description: Set(description),
                    ..Default::default()
                }
                .insert(db)
                .await
                .map_err(taken("metal color"))?;
                Characteristic::MetalColor(row.into())
            }
            NewCharacteristic::Style { name, description } => {
                let name = required("name", &name)?;
                let row = style::ActiveModel {
                    slug: Set(slug_for(&name)?),
                    name: Set(name),
                    description: Set(description),
                    ..Default::default()
                }
                .insert(db)
                .await
                .map_err(taken("style"))?;
                Characteristic::Style(row.into())
            }
            NewCharacteristic::InsertType {
                name,
                category,
                description,
            } => {
                let name = required("name", &name)?;
                let row = insert_type::ActiveModel {
                    slug: Set(slug_for(&name)?),
                    name: Set(name),
                    category: Set(category),
                    description: Set(description),
                    ..Default::default()
                }
                .insert(db)
                .await
                .map_err(taken("insert type"))?;
                Characteristic::InsertType(row.into())
            }
            NewCharacteristic::Coating { name, description } => {
                let name = required("name", &name)?;
                let row = coating::ActiveModel {
                    slug: Set(slug_for(&name)?),
                    name: Set(name),
                    description: Set(description),
                    ..Default::default()
                }
                .insert(db)
                .await
                .map_err(taken("coating"))?;
                Characteristic::Coating(row.into())
            }
        };
        Ok(added)
    }

    #[instrument(skip(self))]
    pub async fn add_material(&self, input: NewMaterial) -> Result<MaterialView, ServiceError> {
        let name = required("name", &input.name)?;
        let existing = material::Entity::find()
            .filter(material::Column::Name.eq(name.as_str()))
            .one(&*self.db)
            .await?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(format!("material {name} already exists")));
        }

        let row = material::ActiveModel {
            name: Set(name),
            material_type: Set(input.material_type),
            ..Default::default()
        }
        .insert(&*self.db)
        .await?;
        Ok(row.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn characteristic_payloads_are_tagged_by_kind() {
        let purity: NewCharacteristic =
            serde_json::from_str(r#"{"kind":"purity","material_type":"gold","value":"585"}"#).unwrap();
        match purity {
            NewCharacteristic::Purity { system, value, .. } => {
                assert_eq!(value, "585");
                assert_eq!(system, "metric");
            }
            other => panic!("unexpected {other:?}"),
        }

        let insert: NewCharacteristic = serde_json::from_str(
            r#"{"kind":"insert_type","name":"Фианит","category":"synthetic"}"#,
        )
        .unwrap();
        assert!(matches!(
            insert,
            NewCharacteristic::InsertType {
                category: InsertCategory::Synthetic,
                ..
            }
        ));
    }

    #[test]
    fn blank_names_are_rejected() {
        assert!(matches!(
            required("name", "   "),
            Err(ServiceError::ValidationError(_))
        ));
        assert!(matches!(slug_for("!!!"), Err(ServiceError::ValidationError(_))));
        assert_eq!(slug_for("Родий").unwrap(), "rodiy");
    }
}

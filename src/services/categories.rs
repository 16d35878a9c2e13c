use crate::{
    entities::{category, product},
    errors::ServiceError,
    services::slug::slugify,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct NewCategory {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    /// Derived from the name when omitted
    #[validate(length(max = 100))]
    pub slug: Option<String>,
    pub parent_id: Option<i32>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub sort_order: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CategoryNode {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub description: String,
    #[schema(no_recursion)]
    pub children: Vec<CategoryNode>,
}

impl From<category::Model> for CategoryNode {
    fn from(c: category::Model) -> Self {
        Self {
            id: c.id,
            name: c.name,
            slug: c.slug,
            description: c.description,
            children: Vec::new(),
        }
    }
}

/// Arranges active categories into top-level nodes with their children,
/// both ordered by (`sort_order`, `name`).
pub fn build_tree(mut categories: Vec<category::Model>) -> Vec<CategoryNode> {
    categories.retain(|c| c.is_active);
    categories.sort_by(|a, b| (a.sort_order, &a.name).cmp(&(b.sort_order, &b.name)));

    let (top, nested): (Vec<_>, Vec<_>) = categories.into_iter().partition(|c| c.is_top_level());
    top.into_iter()
        .map(|parent| {
            let children = nested
                .iter()
                .filter(|c| c.parent_id == Some(parent.id))
                .cloned()
                .map(CategoryNode::from)
                .collect();
            CategoryNode {
                children,
                ..CategoryNode::from(parent)
            }
        })
        .collect()
}

#[derive(Clone)]
pub struct CategoryService {
    db: Arc<DatabaseConnection>,
}

impl CategoryService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Creates a category owned by `factory_id`. Only one level of nesting is
    /// allowed, so a parent must itself be top-level.
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_category(
        &self,
        factory_id: i32,
        input: NewCategory,
    ) -> Result<category::Model, ServiceError> {
        input.validate()?;

        let slug = match input.slug.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(slug) => slugify(slug),
            None => slugify(&input.name),
        };
        if slug.is_empty() {
            return Err(ServiceError::ValidationError(
                "a slug cannot be derived from this name".to_string(),
            ));
        }

        if let Some(parent_id) = input.parent_id {
            let parent = category::Entity::find_by_id(parent_id)
                .one(&*self.db)
                .await?
                .ok_or_else(|| {
                    ServiceError::ValidationError(format!("unknown parent category {parent_id}"))
                })?;
            if !parent.is_top_level() {
                return Err(ServiceError::ValidationError(
                    "subcategories cannot have subcategories".to_string(),
                ));
            }
        }

        let created = category::ActiveModel {
            name: Set(input.name.trim().to_string()),
            slug: Set(slug.clone()),
            parent_id: Set(input.parent_id),
            factory_id: Set(Some(factory_id)),
            description: Set(input.description),
            is_active: Set(true),
            sort_order: Set(input.sort_order),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&*self.db)
        .await
        .map_err(|err| ServiceError::unique_or(err, format!("category slug {slug} is taken")))?;

        info!(category_id = created.id, slug = %created.slug, "category created");
        Ok(created)
    }

    pub async fn category_tree(&self) -> Result<Vec<CategoryNode>, ServiceError> {
        let all = category::Entity::find()
            .filter(category::Column::IsActive.eq(true))
            .order_by_asc(category::Column::SortOrder)
            .order_by_asc(category::Column::Name)
            .all(&*self.db)
            .await?;
        Ok(build_tree(all))
    }

    /// Deletes a category created by `factory_id` that has no products and
    /// no subcategories.
    #[instrument(skip(self))]
    pub async fn delete_category(&self, factory_id: i32, id: i32) -> Result<(), ServiceError> {
        let target = category::Entity::find_by_id(id)
            .filter(category::Column::FactoryId.eq(factory_id))
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("category {id} not found")))?;

        let products = product::Entity::find()
            .filter(product::Column::CategoryId.eq(target.id))
            .count(&*self.db)
            .await?;
        if products > 0 {
            return Err(ServiceError::ProtectedEntity(format!(
                "category {} still has {products} product(s)",
                target.name
            )));
        }

        let children = category::Entity::find()
            .filter(category::Column::ParentId.eq(target.id))
            .count(&*self.db)
            .await?;
        if children > 0 {
            return Err(ServiceError::ProtectedEntity(format!(
                "category {} still has subcategories",
                target.name
            )));
        }

        category::Entity::delete_by_id(target.id).exec(&*self.db).await?;
        info!(category_id = id, "category deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: i32, name: &str, parent_id: Option<i32>, sort_order: i32) -> category::Model {
        category::Model {
            id,
            name: name.to_string(),
            slug: slugify(name),
            parent_id,
            factory_id: None,
            description: String::new(),
            is_active: true,
            sort_order,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn tree_groups_children_under_parents() {
        let mut hidden = node(6, "Hidden", None, 0);
        hidden.is_active = false;

        let tree = build_tree(vec![
            node(1, "Rings", None, 1),
            node(2, "Earrings", None, 0),
            node(3, "Wedding Rings", Some(1), 0),
            node(4, "Signet Rings", Some(1), 0),
            node(5, "Studs", Some(2), 0),
            hidden,
        ]);

        let names: Vec<_> = tree.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, ["Earrings", "Rings"]);
        let ring_children: Vec<_> = tree[1].children.iter().map(|n| n.slug.as_str()).collect();
        assert_eq!(ring_children, ["signet-rings", "wedding-rings"]);
        assert_eq!(tree[0].children.len(), 1);
    }
}

use crate::{
    entities::{
        favorite,
        favorite_list::{self, DEFAULT_LIST_NAME},
        product, user,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::catalog::{summarize, CatalogItem},
};
use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::{Expr, Func},
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::Validate;

pub const ADDED_MESSAGE: &str = "Added to favorites";
pub const REMOVED_MESSAGE: &str = "Removed from favorites";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ToggleResult {
    pub is_favorite: bool,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ListName {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ListView {
    pub id: i32,
    pub name: String,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}

impl From<favorite_list::Model> for ListView {
    fn from(list: favorite_list::Model) -> Self {
        Self {
            id: list.id,
            name: list.name,
            is_default: list.is_default,
            created_at: list.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ListSummary {
    pub id: i32,
    pub name: String,
    pub is_default: bool,
    pub item_count: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FavoriteItem {
    pub list_id: i32,
    pub added_at: DateTime<Utc>,
    pub product: CatalogItem,
}

/// Creates the user's default list when it is missing.
pub async fn ensure_default_list_in<C: ConnectionTrait>(
    conn: &C,
    user_id: i32,
) -> Result<favorite_list::Model, ServiceError> {
    if let Some(list) = favorite_list::Entity::find()
        .filter(favorite_list::Column::UserId.eq(user_id))
        .filter(favorite_list::Column::IsDefault.eq(true))
        .one(conn)
        .await?
    {
        return Ok(list);
    }

    let list = favorite_list::ActiveModel {
        user_id: Set(user_id),
        name: Set(DEFAULT_LIST_NAME.to_string()),
        is_default: Set(true),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(conn)
    .await
    .map_err(|err| {
        ServiceError::unique_or(err, format!("a list named {DEFAULT_LIST_NAME} already exists"))
    })?;
    Ok(list)
}

fn list_name(input: &ListName) -> Result<String, ServiceError> {
    input.validate()?;
    let name = input.name.trim();
    if name.is_empty() {
        return Err(ServiceError::ValidationError("list name is required".to_string()));
    }
    Ok(name.to_string())
}

#[derive(Clone)]
pub struct FavoriteService {
    db: Arc<DatabaseConnection>,
    event_sender: Arc<EventSender>,
}

impl FavoriteService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: Arc<EventSender>) -> Self {
        Self { db, event_sender }
    }

    async fn require_user(&self, user_id: i32) -> Result<(), ServiceError> {
        user::Entity::find_by_id(user_id)
            .one(&*self.db)
            .await?
            .map(|_| ())
            .ok_or_else(|| ServiceError::Unauthorized(format!("unknown user {user_id}")))
    }

    async fn owned_list(&self, user_id: i32, list_id: i32) -> Result<favorite_list::Model, ServiceError> {
        favorite_list::Entity::find_by_id(list_id)
            .filter(favorite_list::Column::UserId.eq(user_id))
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("favorite list {list_id} not found")))
    }

    pub async fn ensure_default_list(&self, user_id: i32) -> Result<favorite_list::Model, ServiceError> {
        self.require_user(user_id).await?;
        ensure_default_list_in(&*self.db, user_id).await
    }

    /// Adds the product to the list, or removes it when already there.
    /// Without `list_id` the user's default list is used.
    #[instrument(skip(self))]
    pub async fn toggle_favorite(
        &self,
        user_id: i32,
        article: &str,
        list_id: Option<i32>,
    ) -> Result<ToggleResult, ServiceError> {
        self.require_user(user_id).await?;
        let target = product::Entity::find()
            .filter(product::Column::Article.eq(article))
            .filter(product::Column::IsActive.eq(true))
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("product {article} not found")))?;

        let list = match list_id {
            Some(id) => self.owned_list(user_id, id).await?,
            None => ensure_default_list_in(&*self.db, user_id).await?,
        };

        let txn = self.db.begin().await?;
        let existing = favorite::Entity::find()
            .filter(favorite::Column::ListId.eq(list.id))
            .filter(favorite::Column::ProductId.eq(target.id))
            .one(&txn)
            .await?;

        let is_favorite = match existing {
            Some(entry) => {
                favorite::Entity::delete_by_id(entry.id).exec(&txn).await?;
                false
            }
            None => {
                favorite::ActiveModel {
                    user_id: Set(user_id),
                    product_id: Set(target.id),
                    list_id: Set(list.id),
                    added_at: Set(Utc::now()),
                    ..Default::default()
                }
                .insert(&txn)
                .await?;
                true
            }
        };
        txn.commit().await?;

        self.event_sender.send_or_log(Event::FavoriteToggled {
            user_id,
            product_id: target.id,
            is_favorite,
        });

        Ok(ToggleResult {
            is_favorite,
            message: if is_favorite { ADDED_MESSAGE } else { REMOVED_MESSAGE }.to_string(),
        })
    }

    #[instrument(skip(self, input))]
    pub async fn create_list(
        &self,
        user_id: i32,
        input: ListName,
    ) -> Result<favorite_list::Model, ServiceError> {
        let name = list_name(&input)?;
        self.require_user(user_id).await?;
        ensure_default_list_in(&*self.db, user_id).await?;

        let list = favorite_list::ActiveModel {
            user_id: Set(user_id),
            name: Set(name.clone()),
            is_default: Set(false),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&*self.db)
        .await
        .map_err(|err| ServiceError::unique_or(err, format!("a list named {name} already exists")))?;

        info!(list_id = list.id, "favorite list created");
        Ok(list)
    }

    #[instrument(skip(self, input))]
    pub async fn rename_list(
        &self,
        user_id: i32,
        list_id: i32,
        input: ListName,
    ) -> Result<favorite_list::Model, ServiceError> {
        let name = list_name(&input)?;
        let list = self.owned_list(user_id, list_id).await?;

        let mut active: favorite_list::ActiveModel = list.into();
        active.name = Set(name.clone());
        active
            .update(&*self.db)
            .await
            .map_err(|err| ServiceError::unique_or(err, format!("a list named {name} already exists")))
    }

    /// Deletes a non-default list together with its entries.
    #[instrument(skip(self))]
    pub async fn delete_list(&self, user_id: i32, list_id: i32) -> Result<(), ServiceError> {
        let list = self.owned_list(user_id, list_id).await?;
        if list.is_default {
            return Err(ServiceError::ProtectedEntity(
                "the default favorites list cannot be deleted".to_string(),
            ));
        }

        let txn = self.db.begin().await?;
        favorite::Entity::delete_many()
            .filter(favorite::Column::ListId.eq(list.id))
            .exec(&txn)
            .await?;
        favorite_list::Entity::delete_by_id(list.id).exec(&txn).await?;
        txn.commit().await?;
        Ok(())
    }

    /// The user's lists, default first, with the number of entries in each.
    #[instrument(skip(self))]
    pub async fn lists(&self, user_id: i32) -> Result<Vec<ListSummary>, ServiceError> {
        self.require_user(user_id).await?;
        ensure_default_list_in(&*self.db, user_id).await?;

        let lists = favorite_list::Entity::find()
            .filter(favorite_list::Column::UserId.eq(user_id))
            .order_by_desc(favorite_list::Column::IsDefault)
            .order_by_asc(favorite_list::Column::Name)
            .all(&*self.db)
            .await?;

        let counts: HashMap<i32, i64> = favorite::Entity::find()
            .select_only()
            .column(favorite::Column::ListId)
            .column_as(Expr::expr(Func::count(Expr::col(favorite::Column::Id))), "item_count")
            .filter(favorite::Column::UserId.eq(user_id))
            .group_by(favorite::Column::ListId)
            .into_tuple::<(i32, i64)>()
            .all(&*self.db)
            .await?
            .into_iter()
            .collect();

        Ok(lists
            .into_iter()
            .map(|list| ListSummary {
                item_count: counts.get(&list.id).copied().unwrap_or(0),
                id: list.id,
                name: list.name,
                is_default: list.is_default,
                created_at: list.created_at,
            })
            .collect())
    }

    /// Favorited products, most recently added first, across all lists or
    /// within one.
    #[instrument(skip(self))]
    pub async fn favorites(
        &self,
        user_id: i32,
        list_id: Option<i32>,
    ) -> Result<Vec<FavoriteItem>, ServiceError> {
        self.require_user(user_id).await?;
        let mut query = favorite::Entity::find().filter(favorite::Column::UserId.eq(user_id));
        if let Some(list_id) = list_id {
            self.owned_list(user_id, list_id).await?;
            query = query.filter(favorite::Column::ListId.eq(list_id));
        }

        let entries = query
            .order_by_desc(favorite::Column::AddedAt)
            .order_by_desc(favorite::Column::Id)
            .all(&*self.db)
            .await?;
        if entries.is_empty() {
            return Ok(Vec::new());
        }

        let products = product::Entity::find()
            .filter(product::Column::Id.is_in(entries.iter().map(|e| e.product_id).collect::<Vec<_>>()))
            .all(&*self.db)
            .await?;
        let ids: Vec<i32> = products.iter().map(|p| p.id).collect();
        let items: HashMap<i32, CatalogItem> = ids
            .into_iter()
            .zip(summarize(&*self.db, products).await?)
            .collect();

        Ok(entries
            .into_iter()
            .filter_map(|entry| {
                items.get(&entry.product_id).map(|product| FavoriteItem {
                    list_id: entry.list_id,
                    added_at: entry.added_at,
                    product: product.clone(),
                })
            })
            .collect())
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_list_names_are_rejected() {
        let err = list_name(&ListName { name: "   ".into() }).unwrap_err();
        assert!(matches!(err, ServiceError::ValidationError(_)));
        assert_eq!(
            list_name(&ListName {
                name: " Wedding ideas ".into()
            })
            .unwrap(),
            "Wedding ideas"
        );
    }
}

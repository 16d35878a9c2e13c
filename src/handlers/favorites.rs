use axum::{
    extract::{Json, Path, Query, State},
    response::Response,
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use utoipa::IntoParams;

use super::common::{created_response, no_content_response, success_response, validate_input, Caller};
use crate::{
    errors::ApiError,
    services::favorites::{FavoriteItem, ListName, ListSummary, ListView, ToggleResult},
    AppState,
};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Restrict to one of the caller's lists
    pub list_id: Option<i32>,
}

/// The caller's favorites, newest first
#[utoipa::path(
    get,
    path = "/api/v1/favorites",
    params(ListQuery),
    responses(
        (status = 200, description = "Favorited products", body = [FavoriteItem]),
        (status = 401, description = "Missing identity", body = crate::errors::ErrorResponse),
        (status = 404, description = "List not found", body = crate::errors::ErrorResponse)
    ),
    tag = "favorites"
)]
pub async fn favorites(
    State(state): State<AppState>,
    caller: Caller,
    Query(query): Query<ListQuery>,
) -> Result<Response, ApiError> {
    let items = state.services.favorites.favorites(caller.0, query.list_id).await?;
    Ok(success_response(items))
}

/// Add the product to a list, or remove it when already present
#[utoipa::path(
    post,
    path = "/api/v1/favorites/toggle/{article}",
    params(("article" = String, Path, description = "Article code"), ListQuery),
    responses(
        (status = 200, description = "New membership state", body = ToggleResult),
        (status = 404, description = "Product or list not found", body = crate::errors::ErrorResponse)
    ),
    tag = "favorites"
)]
pub async fn toggle_favorite(
    State(state): State<AppState>,
    caller: Caller,
    Path(article): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<Response, ApiError> {
    let result = state
        .services
        .favorites
        .toggle_favorite(caller.0, &article, query.list_id)
        .await?;
    Ok(success_response(result))
}

#[utoipa::path(
    get,
    path = "/api/v1/favorites/lists",
    responses((status = 200, description = "The caller's lists with item counts", body = [ListSummary])),
    tag = "favorites"
)]
pub async fn lists(State(state): State<AppState>, caller: Caller) -> Result<Response, ApiError> {
    let lists = state.services.favorites.lists(caller.0).await?;
    Ok(success_response(lists))
}

#[utoipa::path(
    post,
    path = "/api/v1/favorites/lists",
    request_body = ListName,
    responses(
        (status = 201, description = "List created", body = ListView),
        (status = 409, description = "Name already used", body = crate::errors::ErrorResponse)
    ),
    tag = "favorites"
)]
pub async fn create_list(
    State(state): State<AppState>,
    caller: Caller,
    Json(input): Json<ListName>,
) -> Result<Response, ApiError> {
    validate_input(&input)?;
    let list = state.services.favorites.create_list(caller.0, input).await?;
    Ok(created_response(ListView::from(list)))
}

#[utoipa::path(
    put,
    path = "/api/v1/favorites/lists/{id}",
    params(("id" = i32, Path, description = "List id")),
    request_body = ListName,
    responses(
        (status = 200, description = "List renamed", body = ListView),
        (status = 404, description = "List not found", body = crate::errors::ErrorResponse)
    ),
    tag = "favorites"
)]
pub async fn rename_list(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i32>,
    Json(input): Json<ListName>,
) -> Result<Response, ApiError> {
    validate_input(&input)?;
    let list = state.services.favorites.rename_list(caller.0, id, input).await?;
    Ok(success_response(ListView::from(list)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/favorites/lists/{id}",
    params(("id" = i32, Path, description = "List id")),
    responses(
        (status = 204, description = "List deleted"),
        (status = 409, description = "The default list cannot be deleted", body = crate::errors::ErrorResponse)
    ),
    tag = "favorites"
)]
pub async fn delete_list(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i32>,
) -> Result<Response, ApiError> {
    state.services.favorites.delete_list(caller.0, id).await?;
    Ok(no_content_response())
}

pub fn favorite_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(favorites))
        .route("/toggle/:article", post(toggle_favorite))
        .route("/lists", get(lists).post(create_list))
        .route("/lists/:id", put(rename_list).delete(delete_list))
}

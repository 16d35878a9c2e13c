use axum::{
    extract::{Json, Path, State},
    response::Response,
    routing::{delete, get, post, put},
    Router,
};
use serde::Serialize;
use utoipa::ToSchema;

use super::common::{created_response, no_content_response, success_response, validate_input, Caller};
use crate::{
    errors::ApiError,
    services::{
        catalog::ImageView,
        categories::NewCategory,
        factories::{Dashboard, FactoryView, ProfileUpdate},
        products::{NewImage, NewProduct, ProductPatch, ProductView},
        reference_data::{Characteristic, MaterialView, NewCharacteristic, NewMaterial},
    },
    AppState,
};

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CategoryCreated {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub parent_id: Option<i32>,
}

/// Resolves the caller's factory id or fails with 403.
async fn factory_id(state: &AppState, caller: Caller) -> Result<i32, ApiError> {
    Ok(state.services.factories.factory_for_user(caller.0).await?.id)
}

/// The caller's factory, all of its products and summary stats
#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    params(("x-user-id" = i32, Header, description = "Caller user id")),
    responses(
        (status = 200, description = "Dashboard", body = Dashboard),
        (status = 401, description = "Missing identity", body = crate::errors::ErrorResponse),
        (status = 403, description = "Caller has no factory", body = crate::errors::ErrorResponse)
    ),
    tag = "dashboard"
)]
pub async fn dashboard(State(state): State<AppState>, caller: Caller) -> Result<Response, ApiError> {
    let dashboard = state.services.factories.dashboard(caller.0).await?;
    Ok(success_response(dashboard))
}

#[utoipa::path(
    put,
    path = "/api/v1/dashboard/profile",
    request_body = ProfileUpdate,
    responses(
        (status = 200, description = "Profile updated", body = FactoryView),
        (status = 400, description = "Invalid input", body = crate::errors::ErrorResponse),
        (status = 403, description = "Caller has no factory", body = crate::errors::ErrorResponse)
    ),
    tag = "dashboard"
)]
pub async fn update_profile(
    State(state): State<AppState>,
    caller: Caller,
    Json(update): Json<ProfileUpdate>,
) -> Result<Response, ApiError> {
    validate_input(&update)?;
    let factory = state.services.factories.update_profile(caller.0, update).await?;
    Ok(success_response(factory))
}

/// Create a product; the article is generated when omitted
#[utoipa::path(
    post,
    path = "/api/v1/dashboard/products",
    request_body = NewProduct,
    responses(
        (status = 201, description = "Product created", body = ProductView),
        (status = 400, description = "Invalid input", body = crate::errors::ErrorResponse),
        (status = 403, description = "Caller has no factory", body = crate::errors::ErrorResponse),
        (status = 409, description = "Article already in use", body = crate::errors::ErrorResponse)
    ),
    tag = "dashboard"
)]
pub async fn create_product(
    State(state): State<AppState>,
    caller: Caller,
    Json(input): Json<NewProduct>,
) -> Result<Response, ApiError> {
    validate_input(&input)?;
    let factory_id = factory_id(&state, caller).await?;
    let created = state.services.products.create_product(factory_id, input).await?;
    Ok(created_response(ProductView::from(&created)))
}

#[utoipa::path(
    put,
    path = "/api/v1/dashboard/products/{article}",
    params(("article" = String, Path, description = "Article code")),
    request_body = ProductPatch,
    responses(
        (status = 200, description = "Product updated", body = ProductView),
        (status = 404, description = "Not one of the caller's products", body = crate::errors::ErrorResponse),
        (status = 409, description = "Article already in use", body = crate::errors::ErrorResponse)
    ),
    tag = "dashboard"
)]
pub async fn update_product(
    State(state): State<AppState>,
    caller: Caller,
    Path(article): Path<String>,
    Json(patch): Json<ProductPatch>,
) -> Result<Response, ApiError> {
    validate_input(&patch)?;
    let factory_id = factory_id(&state, caller).await?;
    let updated = state
        .services
        .products
        .update_product(factory_id, &article, patch)
        .await?;
    Ok(success_response(ProductView::from(&updated)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/dashboard/products/{article}",
    params(("article" = String, Path, description = "Article code")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 404, description = "Not one of the caller's products", body = crate::errors::ErrorResponse)
    ),
    tag = "dashboard"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    caller: Caller,
    Path(article): Path<String>,
) -> Result<Response, ApiError> {
    let factory_id = factory_id(&state, caller).await?;
    state.services.products.delete_product(factory_id, &article).await?;
    Ok(no_content_response())
}

#[utoipa::path(
    post,
    path = "/api/v1/dashboard/products/{article}/images",
    params(("article" = String, Path, description = "Article code")),
    request_body = NewImage,
    responses(
        (status = 201, description = "Image attached", body = ImageView),
        (status = 404, description = "Not one of the caller's products", body = crate::errors::ErrorResponse)
    ),
    tag = "dashboard"
)]
pub async fn add_image(
    State(state): State<AppState>,
    caller: Caller,
    Path(article): Path<String>,
    Json(input): Json<NewImage>,
) -> Result<Response, ApiError> {
    validate_input(&input)?;
    let factory_id = factory_id(&state, caller).await?;
    let image = state
        .services
        .products
        .add_image(factory_id, &article, input)
        .await?;
    Ok(created_response(ImageView::from(image)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/dashboard/products/{article}/images/{id}",
    params(
        ("article" = String, Path, description = "Article code"),
        ("id" = i32, Path, description = "Image id")
    ),
    responses(
        (status = 204, description = "Image removed"),
        (status = 404, description = "Image or product not found", body = crate::errors::ErrorResponse)
    ),
    tag = "dashboard"
)]
pub async fn remove_image(
    State(state): State<AppState>,
    caller: Caller,
    Path((article, image_id)): Path<(String, i32)>,
) -> Result<Response, ApiError> {
    let factory_id = factory_id(&state, caller).await?;
    state
        .services
        .products
        .remove_image(factory_id, &article, image_id)
        .await?;
    Ok(no_content_response())
}

#[utoipa::path(
    post,
    path = "/api/v1/dashboard/categories",
    request_body = NewCategory,
    responses(
        (status = 201, description = "Category created", body = CategoryCreated),
        (status = 400, description = "Invalid name or parent", body = crate::errors::ErrorResponse),
        (status = 409, description = "Slug already taken", body = crate::errors::ErrorResponse)
    ),
    tag = "dashboard"
)]
pub async fn create_category(
    State(state): State<AppState>,
    caller: Caller,
    Json(input): Json<NewCategory>,
) -> Result<Response, ApiError> {
    validate_input(&input)?;
    let factory_id = factory_id(&state, caller).await?;
    let created = state
        .services
        .categories
        .create_category(factory_id, input)
        .await?;
    Ok(created_response(CategoryCreated {
        id: created.id,
        name: created.name,
        slug: created.slug,
        parent_id: created.parent_id,
    }))
}

#[utoipa::path(
    delete,
    path = "/api/v1/dashboard/categories/{id}",
    params(("id" = i32, Path, description = "Category id")),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 404, description = "Not a category created by the caller", body = crate::errors::ErrorResponse),
        (status = 409, description = "Category still has products or subcategories", body = crate::errors::ErrorResponse)
    ),
    tag = "dashboard"
)]
pub async fn delete_category(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i32>,
) -> Result<Response, ApiError> {
    let factory_id = factory_id(&state, caller).await?;
    state.services.categories.delete_category(factory_id, id).await?;
    Ok(no_content_response())
}

/// Add a purity, metal color, style, insert type or coating
#[utoipa::path(
    post,
    path = "/api/v1/dashboard/characteristics",
    request_body = NewCharacteristic,
    responses(
        (status = 201, description = "Value added", body = Characteristic),
        (status = 409, description = "Value already exists", body = crate::errors::ErrorResponse)
    ),
    tag = "dashboard"
)]
pub async fn add_characteristic(
    State(state): State<AppState>,
    caller: Caller,
    Json(input): Json<NewCharacteristic>,
) -> Result<Response, ApiError> {
    factory_id(&state, caller).await?;
    let added = state.services.reference.add_characteristic(input).await?;
    Ok(created_response(added))
}

#[utoipa::path(
    post,
    path = "/api/v1/dashboard/materials",
    request_body = NewMaterial,
    responses(
        (status = 201, description = "Material added", body = MaterialView),
        (status = 409, description = "Material already exists", body = crate::errors::ErrorResponse)
    ),
    tag = "dashboard"
)]
pub async fn add_material(
    State(state): State<AppState>,
    caller: Caller,
    Json(input): Json<NewMaterial>,
) -> Result<Response, ApiError> {
    factory_id(&state, caller).await?;
    let added = state.services.reference.add_material(input).await?;
    Ok(created_response(added))
}

pub fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard))
        .route("/profile", put(update_profile))
        .route("/products", post(create_product))
        .route("/products/:article", put(update_product).delete(delete_product))
        .route("/products/:article/images", post(add_image))
        .route("/products/:article/images/:id", delete(remove_image))
        .route("/categories", post(create_category))
        .route("/categories/:id", delete(delete_category))
        .route("/characteristics", post(add_characteristic))
        .route("/materials", post(add_material))
}

use axum::{
    extract::{Path, Query, State},
    response::Response,
    routing::get,
    Router,
};
use serde::Serialize;
use utoipa::ToSchema;

use super::common::success_response;
use crate::{
    errors::ApiError,
    services::{
        catalog::{CatalogFilter, CatalogItem, CatalogPage, CatalogParams, PageInfo, ProductDetail},
        categories::CategoryNode,
        factories::FactoryDetail,
        reference_data::{MaterialView, PurityView, ReferenceData, SluggedItem},
    },
    AppState,
};

/// Option lists for the catalog filter form.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FilterOptions {
    pub categories: Vec<CategoryNode>,
    pub materials: Vec<MaterialView>,
    pub purities: Vec<PurityView>,
    pub metal_colors: Vec<SluggedItem>,
    pub styles: Vec<SluggedItem>,
}

impl From<ReferenceData> for FilterOptions {
    fn from(data: ReferenceData) -> Self {
        Self {
            categories: data.categories,
            materials: data.materials,
            purities: data.purities,
            metal_colors: data.metal_colors,
            styles: data.styles,
        }
    }
}

/// The full catalog page: listing, pagination, echoed filters and options.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CatalogView {
    pub products: Vec<CatalogItem>,
    pub pagination: PageInfo,
    pub filters: CatalogParams,
    pub options: FilterOptions,
}

/// Browse active products
///
/// With `format=json` only the product cards and pagination flags are
/// returned; otherwise the response also carries the filter state and the
/// option lists.
#[utoipa::path(
    get,
    path = "/api/v1/catalog",
    params(CatalogParams),
    responses(
        (status = 200, description = "Catalog page (full view, or the compact listing with format=json)", body = CatalogView,
            headers(("x-cache" = String, description = "HIT when served from the page cache"))
        ),
        (status = 400, description = "Malformed filter value", body = crate::errors::ErrorResponse)
    ),
    tag = "catalog"
)]
pub async fn catalog(
    State(state): State<AppState>,
    Query(params): Query<CatalogParams>,
) -> Result<Response, ApiError> {
    let filter = CatalogFilter::try_from(&params)?;
    let page: CatalogPage = state
        .services
        .catalog
        .list(&filter, params.page.as_deref())
        .await?;

    if params.wants_json() {
        return Ok(success_response(page));
    }

    let options = state.services.reference.reference_data().await?.into();
    let filters = CatalogParams {
        format: None,
        ..params
    };
    Ok(success_response(CatalogView {
        products: page.products,
        pagination: page.page,
        filters,
        options,
    }))
}

/// Product page; each call counts one view
#[utoipa::path(
    get,
    path = "/api/v1/products/{article}",
    params(("article" = String, Path, description = "Article code")),
    responses(
        (status = 200, description = "Product found", body = ProductDetail),
        (status = 404, description = "No active product with this article", body = crate::errors::ErrorResponse)
    ),
    tag = "catalog"
)]
pub async fn product_detail(
    State(state): State<AppState>,
    Path(article): Path<String>,
) -> Result<Response, ApiError> {
    let detail = state.services.catalog.product_detail(&article).await?;
    Ok(success_response(detail))
}

/// Public factory page
#[utoipa::path(
    get,
    path = "/api/v1/factories/{id}",
    params(("id" = i32, Path, description = "Factory id")),
    responses(
        (status = 200, description = "Factory with its active products", body = FactoryDetail),
        (status = 404, description = "Factory not found", body = crate::errors::ErrorResponse)
    ),
    tag = "catalog"
)]
pub async fn factory_detail(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, ApiError> {
    let detail = state.services.factories.factory_detail(id).await?;
    Ok(success_response(detail))
}

/// Active categories as a two-level tree
#[utoipa::path(
    get,
    path = "/api/v1/categories",
    responses((status = 200, description = "Category tree", body = [CategoryNode])),
    tag = "catalog"
)]
pub async fn category_tree(State(state): State<AppState>) -> Result<Response, ApiError> {
    let tree = state.services.categories.category_tree().await?;
    Ok(success_response(tree))
}

/// Every reference list (cached)
#[utoipa::path(
    get,
    path = "/api/v1/reference",
    responses((status = 200, description = "Reference lists", body = ReferenceData)),
    tag = "catalog"
)]
pub async fn reference_data(State(state): State<AppState>) -> Result<Response, ApiError> {
    let data = state.services.reference.reference_data().await?;
    Ok(success_response(data))
}

/// Listing and factory pages, fronted by the page cache.
pub fn cached_routes() -> Router<AppState> {
    Router::new()
        .route("/catalog", get(catalog))
        .route("/factories/:id", get(factory_detail))
}

pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/products/:article", get(product_detail))
        .route("/categories", get(category_tree))
        .route("/reference", get(reference_data))
}

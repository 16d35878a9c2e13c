pub mod accounts;
pub mod catalog;
pub mod common;
pub mod dashboard;
pub mod favorites;
pub mod health;
pub mod themes;

use axum::{middleware, Router};

use crate::cache::middleware::{page_cache_middleware, PageCache};

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Every `/api/v1` route. The catalog listing and factory pages go through
/// the page cache; nothing else is cached at the response level.
pub fn api_v1_routes(page_cache: PageCache) -> Router<AppState> {
    let cached = catalog::cached_routes().layer(middleware::from_fn_with_state(
        page_cache,
        page_cache_middleware,
    ));

    Router::new()
        .merge(cached)
        .merge(catalog::catalog_routes())
        .nest("/register", accounts::account_routes())
        .nest("/dashboard", dashboard::dashboard_routes())
        .nest("/favorites", favorites::favorite_routes())
        .nest("/themes", themes::theme_routes())
}

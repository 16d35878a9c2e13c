//! AuRoom marketplace API
//!
//! Factories publish jewelry catalogs, customers browse and filter them, keep
//! favorites lists, and the storefront renders with a configurable theme.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod cache;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod middleware_helpers;
pub mod migrator;
pub mod openapi;
pub mod services;
pub mod tracing;

use std::sync::Arc;

use axum::{http::HeaderValue, middleware, routing::get, Router};
use sea_orm::DatabaseConnection;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
};

use crate::{
    cache::{
        middleware::{PageCache, PageCacheOptions},
        InMemoryCache,
    },
    config::AppConfig,
    events::EventSender,
    services::ServiceContainer,
};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: AppConfig,
    pub event_sender: Arc<EventSender>,
    pub services: ServiceContainer,
    /// Whole-page responses for the catalog and factory pages
    pub page_cache: Arc<InMemoryCache>,
    /// Reference data (categories and characteristics)
    pub reference_cache: Arc<InMemoryCache>,
}

impl AppState {
    pub fn new(db: Arc<DatabaseConnection>, config: AppConfig, event_sender: EventSender) -> Self {
        let event_sender = Arc::new(event_sender);
        let page_cache = Arc::new(InMemoryCache::with_max_entries(config.cache.max_entries));
        let reference_cache = Arc::new(InMemoryCache::with_max_entries(config.cache.max_entries));
        let services = ServiceContainer::new(
            db.clone(),
            event_sender.clone(),
            reference_cache.clone(),
            &config,
        );
        Self {
            db,
            config,
            event_sender,
            services,
            page_cache,
            reference_cache,
        }
    }

    fn page_cache_layer(&self) -> PageCache {
        PageCache::new(
            self.page_cache.clone(),
            PageCacheOptions {
                ttl: self.config.page_cache_ttl(),
                session_cookie: self.config.cache.session_cookie_name.clone(),
                enabled: self.config.cache.enabled,
                ..Default::default()
            },
        )
    }
}

/// CORS from `cors_allowed_origins`, falling back to permissive outside
/// production when nothing is configured.
pub fn cors_layer(cfg: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = cfg
        .cors_allowed_origins
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    if !origins.is_empty() {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    } else if cfg.should_allow_permissive_cors() {
        ::tracing::info!("using permissive CORS; no explicit origins configured");
        CorsLayer::permissive()
    } else {
        ::tracing::warn!("no CORS origins configured; cross-origin requests will be refused");
        CorsLayer::new()
    }
}

/// The complete HTTP surface: `/api/v1`, `/health` and the Swagger UI.
pub fn build_router(state: AppState) -> Router {
    let api = handlers::api_v1_routes(state.page_cache_layer());
    let cors = cors_layer(&state.config);

    Router::<AppState>::new()
        .route("/", get(|| async { "auroom-api up" }))
        .nest("/api/v1", api)
        .nest("/health", handlers::health::health_routes())
        .merge(openapi::swagger_ui())
        .layer(crate::tracing::configure_http_tracing())
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(middleware::from_fn(
            middleware_helpers::request_id::request_id_middleware,
        ))
        .with_state(state)
}

// Catalog core
pub mod article_numbers;
pub mod catalog;
pub mod slug;
pub mod themes;

// Seller-side management
pub mod categories;
pub mod factories;
pub mod products;
pub mod reference_data;

// Customer features
pub mod favorites;

use std::sync::Arc;

use crate::{
    cache::InMemoryCache,
    config::AppConfig,
    db::DbPool,
    events::EventSender,
};

use self::{
    catalog::CatalogService, categories::CategoryService, factories::FactoryService,
    favorites::FavoriteService, products::ProductService, reference_data::ReferenceDataService,
    themes::ThemeService,
};

/// Service container holding all service instances
#[derive(Clone)]
pub struct ServiceContainer {
    pub catalog: Arc<CatalogService>,
    pub products: Arc<ProductService>,
    pub categories: Arc<CategoryService>,
    pub reference: Arc<ReferenceDataService>,
    pub factories: Arc<FactoryService>,
    pub favorites: Arc<FavoriteService>,
    pub themes: Arc<ThemeService>,
}

impl ServiceContainer {
    /// Wires every service to the shared pool, event channel and reference cache
    pub fn new(
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
        reference_cache: Arc<InMemoryCache>,
        config: &AppConfig,
    ) -> Self {
        Self {
            catalog: Arc::new(CatalogService::new(
                db_pool.clone(),
                config.catalog_page_size,
            )),
            products: Arc::new(ProductService::new(db_pool.clone(), event_sender.clone())),
            categories: Arc::new(CategoryService::new(db_pool.clone())),
            reference: Arc::new(ReferenceDataService::new(
                db_pool.clone(),
                reference_cache,
                config.reference_cache_ttl(),
                config.cache.enabled,
            )),
            factories: Arc::new(FactoryService::new(db_pool.clone())),
            favorites: Arc::new(FavoriteService::new(db_pool.clone(), event_sender.clone())),
            themes: Arc::new(ThemeService::new(db_pool, event_sender)),
        }
    }
}

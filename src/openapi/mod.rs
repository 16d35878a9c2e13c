use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{handlers, services};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "AuRoom API",
        version = "1.0.0",
        description = r#"
# AuRoom Jewelry Marketplace

Factories publish jewelry catalogs; customers browse, filter and save products
to favorites lists.

## Identity

Session handling lives in front of this service. Requests on behalf of a
signed-in user carry the numeric user id in the `x-user-id` header. Endpoints
that act for a user answer 401 without it; dashboard endpoints answer 403 when
the user has no factory.

## Caching

`GET /api/v1/catalog` and `GET /api/v1/factories/{id}` are served from a page
cache keyed by URL and session cookie. Cached pages are not invalidated on
writes and may be stale until their TTL expires; `x-cache: HIT` marks them.
"#,
        contact(name = "AuRoom", email = "dev@auroom.example"),
        license(name = "MIT")
    ),
    tags(
        (name = "catalog", description = "Public catalog browsing"),
        (name = "accounts", description = "Factory and customer registration"),
        (name = "dashboard", description = "Factory self-service management"),
        (name = "favorites", description = "Customer favorites lists"),
        (name = "themes", description = "Storefront display themes"),
        (name = "health", description = "Health check endpoints")
    ),
    paths(
        handlers::catalog::catalog,
        handlers::catalog::product_detail,
        handlers::catalog::factory_detail,
        handlers::catalog::category_tree,
        handlers::catalog::reference_data,

        handlers::accounts::register_factory,
        handlers::accounts::register_customer,

        handlers::dashboard::dashboard,
        handlers::dashboard::update_profile,
        handlers::dashboard::create_product,
        handlers::dashboard::update_product,
        handlers::dashboard::delete_product,
        handlers::dashboard::add_image,
        handlers::dashboard::remove_image,
        handlers::dashboard::create_category,
        handlers::dashboard::delete_category,
        handlers::dashboard::add_characteristic,
        handlers::dashboard::add_material,

        handlers::favorites::favorites,
        handlers::favorites::toggle_favorite,
        handlers::favorites::lists,
        handlers::favorites::create_list,
        handlers::favorites::rename_list,
        handlers::favorites::delete_list,

        handlers::themes::list_themes,
        handlers::themes::default_theme,
        handlers::themes::active_theme,
        handlers::themes::create_theme,
        handlers::themes::update_theme,
        handlers::themes::delete_theme,
        handlers::themes::activate_theme,

        handlers::health::health_check,
    ),
    components(
        schemas(
            services::catalog::CatalogParams,
            services::catalog::SortOrder,
            services::catalog::PageInfo,
            services::catalog::CatalogItem,
            services::catalog::CatalogPage,
            services::catalog::ImageView,
            services::catalog::ProductDetail,
            handlers::catalog::FilterOptions,
            handlers::catalog::CatalogView,

            services::categories::NewCategory,
            services::categories::CategoryNode,
            handlers::dashboard::CategoryCreated,

            services::reference_data::MaterialView,
            services::reference_data::PurityView,
            services::reference_data::SluggedItem,
            services::reference_data::InsertTypeView,
            services::reference_data::ReferenceData,
            services::reference_data::NewCharacteristic,
            services::reference_data::Characteristic,
            services::reference_data::NewMaterial,

            services::products::NewProduct,
            services::products::ProductPatch,
            services::products::NewImage,
            services::products::ProductView,

            services::factories::FactoryRegistration,
            services::factories::CustomerRegistration,
            services::factories::ProfileUpdate,
            services::factories::FactoryView,
            services::factories::UserView,
            services::factories::RegisteredFactory,
            services::factories::DashboardStats,
            services::factories::Dashboard,
            services::factories::FactoryDetail,

            services::favorites::ToggleResult,
            services::favorites::ListName,
            services::favorites::ListView,
            services::favorites::ListSummary,
            services::favorites::FavoriteItem,

            handlers::themes::ThemeRequest,
            handlers::themes::ThemeView,

            handlers::health::ComponentStatus,
            handlers::health::ComponentHealth,
            handlers::health::HealthResponse,

            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDocV1;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDocV1::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_marketplace_routes() {
        let json = serde_json::to_string(&ApiDocV1::openapi()).unwrap();
        assert!(json.contains("AuRoom API"));
        assert!(json.contains("/api/v1/catalog"));
        assert!(json.contains("/api/v1/favorites/toggle/{article}"));
        assert!(json.contains("/api/v1/themes/{id}/activate"));
    }

    #[test]
    fn category_tree_schema_is_registered() {
        let doc = ApiDocV1::openapi();
        let components = doc.components.expect("components");
        assert!(components.schemas.contains_key("CategoryNode"));
    }
}

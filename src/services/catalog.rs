use crate::{
    entities::{
        category, coating, factory, insert_type, material, metal_color, product, product_image,
        purity, style,
    },
    errors::ServiceError,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    sea_query::{Expr, Func, LikeExpr},
    ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbBackend, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, instrument};
use utoipa::{IntoParams, ToSchema};

/// Raw catalog query string, exactly as received.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct CatalogParams {
    /// Category slug; a top-level slug includes its direct subcategories
    pub category: Option<String>,
    pub material: Option<String>,
    pub purity: Option<String>,
    pub metal_color: Option<String>,
    pub style: Option<String>,
    /// "true" keeps pieces with inserts, any other value keeps pieces without
    pub has_inserts: Option<String>,
    /// "true" keeps stamped pieces, any other value keeps unstamped ones
    pub has_stamp: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    /// Case-insensitive match on name, article, description or brand
    pub search: Option<String>,
    /// price_asc | price_desc | popular | name; newest first otherwise
    pub sort: Option<String>,
    pub page: Option<String>,
    /// "json" selects the compact listing
    pub format: Option<String>,
}

impl CatalogParams {
    pub fn wants_json(&self) -> bool {
        self.format.as_deref() == Some("json")
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
    Popular,
    Name,
}

impl SortOrder {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("price_asc") => Self::PriceAsc,
            Some("price_desc") => Self::PriceDesc,
            Some("popular") => Self::Popular,
            Some("name") => Self::Name,
            _ => Self::Newest,
        }
    }

    fn apply(self, select: Select<product::Entity>) -> Select<product::Entity> {
        let ordered = match self {
            Self::PriceAsc => select.order_by_asc(product::Column::Price),
            Self::PriceDesc => select.order_by_desc(product::Column::Price),
            Self::Popular => select.order_by_desc(product::Column::ViewsCount),
            Self::Name => select.order_by_asc(product::Column::Name),
            Self::Newest => select.order_by_desc(product::Column::CreatedAt),
        };
        ordered.order_by_desc(product::Column::Id)
    }
}

/// Parsed and typed catalog filters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogFilter {
    pub category: Option<String>,
    pub material_id: Option<i32>,
    pub purity_id: Option<i32>,
    pub metal_color_id: Option<i32>,
    pub style_id: Option<i32>,
    pub has_inserts: Option<bool>,
    pub has_stamp: Option<bool>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub search: Option<String>,
    pub sort: SortOrder,
}

fn present(raw: &Option<String>) -> Option<&str> {
    raw.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_id(field: &str, raw: &Option<String>) -> Result<Option<i32>, ServiceError> {
    present(raw)
        .map(|v| {
            v.parse::<i32>()
                .map_err(|_| ServiceError::ValidationError(format!("{field} must be an integer id")))
        })
        .transpose()
}

fn parse_price(field: &str, raw: &Option<String>) -> Result<Option<Decimal>, ServiceError> {
    present(raw)
        .map(|v| {
            Decimal::from_str(v)
                .map_err(|_| ServiceError::ValidationError(format!("{field} must be a number")))
        })
        .transpose()
}

impl TryFrom<&CatalogParams> for CatalogFilter {
    type Error = ServiceError;

    fn try_from(params: &CatalogParams) -> Result<Self, Self::Error> {
        Ok(Self {
            category: present(&params.category).map(str::to_string),
            material_id: parse_id("material", &params.material)?,
            purity_id: parse_id("purity", &params.purity)?,
            metal_color_id: parse_id("metal_color", &params.metal_color)?,
            style_id: parse_id("style", &params.style)?,
            has_inserts: present(&params.has_inserts).map(|v| v == "true"),
            has_stamp: present(&params.has_stamp).map(|v| v == "true"),
            min_price: parse_price("min_price", &params.min_price)?,
            max_price: parse_price("max_price", &params.max_price)?,
            search: present(&params.search).map(str::to_string),
            sort: SortOrder::parse(params.sort.as_deref()),
        })
    }
}

/// A resolved page position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct PageInfo {
    pub current_page: u64,
    pub total_pages: u64,
    pub total_count: u64,
    pub has_next: bool,
    pub has_previous: bool,
}

impl PageInfo {
    /// Missing or non-numeric input selects page 1; numbers outside
    /// `1..=total_pages` select the last page. An empty result still has one page.
    pub fn resolve(raw: Option<&str>, total_count: u64, page_size: u64) -> Self {
        let page_size = page_size.max(1);
        let total_pages = total_count.div_ceil(page_size).max(1);
        let current_page = match raw.map(str::trim).map(str::parse::<i64>) {
            Some(Ok(n)) if n >= 1 && (n as u64) <= total_pages => n as u64,
            Some(Ok(_)) => total_pages,
            Some(Err(_)) | None => 1,
        };
        Self {
            current_page,
            total_pages,
            total_count,
            has_next: current_page < total_pages,
            has_previous: current_page > 1,
        }
    }

    pub fn offset(&self, page_size: u64) -> u64 {
        (self.current_page - 1) * page_size
    }
}

/// One product card in listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CatalogItem {
    pub article: String,
    pub name: String,
    #[schema(value_type = String, example = "1500.00")]
    pub price: Decimal,
    pub image_url: Option<String>,
    pub category_name: String,
    pub in_stock: bool,
    pub stock_quantity: i32,
    pub material_name: String,
    #[schema(value_type = String, example = "3.45")]
    pub metal_weight: Decimal,
    pub factory_name: String,
    pub detail_url: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CatalogPage {
    pub products: Vec<CatalogItem>,
    #[serde(flatten)]
    pub page: PageInfo,
}

pub fn detail_url(article: &str) -> String {
    format!("/api/v1/products/{article}")
}

/// Main image of each product: the `is_main` one, else the first by
/// (`sort_order`, `uploaded_at`).
pub fn main_images(images: Vec<product_image::Model>) -> HashMap<i32, String> {
    let mut chosen: HashMap<i32, product_image::Model> = HashMap::new();
    for image in images {
        let replace = match chosen.get(&image.product_id) {
            None => true,
            Some(current) => {
                (image.is_main && !current.is_main)
                    || (image.is_main == current.is_main
                        && (image.sort_order, image.uploaded_at, image.id)
                            < (current.sort_order, current.uploaded_at, current.id))
            }
        };
        if replace {
            chosen.insert(image.product_id, image);
        }
    }
    chosen
        .into_iter()
        .map(|(product_id, image)| (product_id, image.image))
        .collect()
}

/// Builds listing cards, loading the referenced names in one query per table.
pub async fn summarize<C: ConnectionTrait>(
    conn: &C,
    products: Vec<product::Model>,
) -> Result<Vec<CatalogItem>, ServiceError> {
    if products.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<i32> = products.iter().map(|p| p.id).collect();
    let category_ids: Vec<i32> = products.iter().map(|p| p.category_id).collect();
    let material_ids: Vec<i32> = products.iter().map(|p| p.material_id).collect();
    let factory_ids: Vec<i32> = products.iter().map(|p| p.factory_id).collect();

    let categories: HashMap<i32, String> = category::Entity::find()
        .filter(category::Column::Id.is_in(category_ids))
        .all(conn)
        .await?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect();
    let materials: HashMap<i32, String> = material::Entity::find()
        .filter(material::Column::Id.is_in(material_ids))
        .all(conn)
        .await?
        .into_iter()
        .map(|m| (m.id, m.name))
        .collect();
    let factories: HashMap<i32, String> = factory::Entity::find()
        .filter(factory::Column::Id.is_in(factory_ids))
        .all(conn)
        .await?
        .into_iter()
        .map(|f| (f.id, f.name))
        .collect();
    let images = main_images(
        product_image::Entity::find()
            .filter(product_image::Column::ProductId.is_in(ids))
            .all(conn)
            .await?,
    );

    Ok(products
        .into_iter()
        .map(|p| CatalogItem {
            in_stock: p.in_stock(),
            image_url: images.get(&p.id).cloned(),
            category_name: categories.get(&p.category_id).cloned().unwrap_or_default(),
            material_name: materials.get(&p.material_id).cloned().unwrap_or_default(),
            factory_name: factories.get(&p.factory_id).cloned().unwrap_or_default(),
            detail_url: detail_url(&p.article),
            article: p.article,
            name: p.name,
            price: p.price,
            stock_quantity: p.stock_quantity,
            metal_weight: p.metal_weight,
        })
        .collect())
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// Substring match over name, article, description and brand.
///
/// SQLite's `LOWER()` folds only ASCII, so there the raw term goes to `LIKE`,
/// which is already ASCII case-insensitive and matches other scripts in
/// their exact case. Postgres compares lowered text on both sides.
fn search_condition(backend: DbBackend, term: &str) -> Condition {
    let columns = [
        product::Column::Name,
        product::Column::Article,
        product::Column::Description,
        product::Column::ManufacturerBrand,
    ];
    match backend {
        DbBackend::Sqlite => {
            let pattern = escape_like(term);
            columns.into_iter().fold(Condition::any(), |any, column| {
                any.add(Expr::col(column).like(LikeExpr::new(pattern.clone()).escape('\\')))
            })
        }
        _ => {
            let pattern = escape_like(&term.to_lowercase());
            columns.into_iter().fold(Condition::any(), |any, column| {
                any.add(
                    Expr::expr(Func::lower(Expr::col(column)))
                        .like(LikeExpr::new(pattern.clone()).escape('\\')),
                )
            })
        }
    }
}

/// Number of same-category products shown beside a product.
pub const SIMILAR_PRODUCTS: u64 = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ImageView {
    pub id: i32,
    pub url: String,
    pub is_main: bool,
    pub sort_order: i32,
}

impl From<product_image::Model> for ImageView {
    fn from(image: product_image::Model) -> Self {
        Self {
            id: image.id,
            url: image.image,
            is_main: image.is_main,
            sort_order: image.sort_order,
        }
    }
}

/// Everything shown on a product page.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductDetail {
    pub article: String,
    pub name: String,
    pub description: String,
    #[schema(value_type = String)]
    pub price: Decimal,
    pub stock_quantity: i32,
    pub in_stock: bool,
    #[schema(value_type = String)]
    pub metal_weight: Decimal,
    #[schema(value_type = Option<String>)]
    pub total_weight: Option<Decimal>,
    pub size: Option<String>,
    #[schema(value_type = Option<String>)]
    pub length_mm: Option<Decimal>,
    #[schema(value_type = Option<String>)]
    pub width_mm: Option<Decimal>,
    #[schema(value_type = Option<String>)]
    pub height_mm: Option<Decimal>,
    pub has_inserts: bool,
    pub insert_description: String,
    pub has_stamp: bool,
    pub manufacturer_brand: Option<String>,
    pub views_count: i32,
    pub created_at: DateTime<Utc>,
    pub factory_id: i32,
    pub factory_name: String,
    pub category_name: String,
    pub category_slug: String,
    pub material_name: String,
    pub purity: Option<String>,
    pub metal_color: Option<String>,
    pub style: Option<String>,
    pub insert_types: Vec<String>,
    pub coatings: Vec<String>,
    pub images: Vec<ImageView>,
    pub similar_products: Vec<CatalogItem>,
}

/// Public catalog browsing.
#[derive(Clone)]
pub struct CatalogService {
    db: Arc<DatabaseConnection>,
    page_size: u64,
}

impl CatalogService {
    pub fn new(db: Arc<DatabaseConnection>, page_size: u64) -> Self {
        Self {
            db,
            page_size: page_size.max(1),
        }
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Category ids selected by `slug`: a top-level category contributes
    /// itself and its direct children, a subcategory only itself. An unknown
    /// slug selects nothing, meaning no category restriction.
    pub async fn resolve_category(&self, slug: &str) -> Result<Option<Vec<i32>>, ServiceError> {
        let Some(found) = category::Entity::find()
            .filter(category::Column::Slug.eq(slug))
            .one(&*self.db)
            .await?
        else {
            debug!(slug, "unknown category slug; not filtering by category");
            return Ok(None);
        };

        if !found.is_top_level() {
            return Ok(Some(vec![found.id]));
        }

        let mut ids: Vec<i32> = category::Entity::find()
            .select_only()
            .column(category::Column::Id)
            .filter(category::Column::ParentId.eq(found.id))
            .into_tuple()
            .all(&*self.db)
            .await?;
        ids.push(found.id);
        Ok(Some(ids))
    }

    async fn filtered(&self, filter: &CatalogFilter) -> Result<Select<product::Entity>, ServiceError> {
        let mut condition = Condition::all().add(product::Column::IsActive.eq(true));

        if let Some(slug) = &filter.category {
            if let Some(ids) = self.resolve_category(slug).await? {
                condition = condition.add(product::Column::CategoryId.is_in(ids));
            }
        }
        if let Some(id) = filter.material_id {
            condition = condition.add(product::Column::MaterialId.eq(id));
        }
        if let Some(id) = filter.purity_id {
            condition = condition.add(product::Column::PurityId.eq(id));
        }
        if let Some(id) = filter.metal_color_id {
            condition = condition.add(product::Column::MetalColorId.eq(id));
        }
        if let Some(id) = filter.style_id {
            condition = condition.add(product::Column::StyleId.eq(id));
        }
        if let Some(flag) = filter.has_inserts {
            condition = condition.add(product::Column::HasInserts.eq(flag));
        }
        if let Some(flag) = filter.has_stamp {
            condition = condition.add(product::Column::HasStamp.eq(flag));
        }
        if let Some(min) = filter.min_price {
            condition = condition.add(product::Column::Price.gte(min));
        }
        if let Some(max) = filter.max_price {
            condition = condition.add(product::Column::Price.lte(max));
        }
        if let Some(term) = &filter.search {
            condition = condition.add(search_condition(self.db.get_database_backend(), term));
        }

        Ok(filter.sort.apply(product::Entity::find().filter(condition)))
    }

    /// One page of active products matching `filter`.
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        filter: &CatalogFilter,
        page: Option<&str>,
    ) -> Result<CatalogPage, ServiceError> {
        if let (Some(min), Some(max)) = (filter.min_price, filter.max_price) {
            if min > max {
                return Ok(CatalogPage {
                    products: Vec::new(),
                    page: PageInfo::resolve(page, 0, self.page_size),
                });
            }
        }

        let select = self.filtered(filter).await?;
        let total_count = select.clone().count(&*self.db).await?;
        let page = PageInfo::resolve(page, total_count, self.page_size);

        let products = select
            .offset(page.offset(self.page_size))
            .limit(self.page_size)
            .all(&*self.db)
            .await?;

        Ok(CatalogPage {
            products: summarize(&*self.db, products).await?,
            page,
        })
    }

    /// Shows an active product and counts the view.
    #[instrument(skip(self))]
    pub async fn product_detail(&self, article: &str) -> Result<ProductDetail, ServiceError> {
        let not_found = || ServiceError::NotFound(format!("product {article} not found"));
        let db = &*self.db;

        let found = product::Entity::find()
            .filter(product::Column::Article.eq(article))
            .filter(product::Column::IsActive.eq(true))
            .one(db)
            .await?
            .ok_or_else(not_found)?;

        product::Entity::update_many()
            .col_expr(
                product::Column::ViewsCount,
                Expr::col(product::Column::ViewsCount).add(1),
            )
            .filter(product::Column::Id.eq(found.id))
            .exec(db)
            .await?;
        metrics::counter!("auroom.products.views", 1);

        let p = product::Entity::find_by_id(found.id)
            .one(db)
            .await?
            .ok_or_else(not_found)?;

        let factory = p.find_related(factory::Entity).one(db).await?;
        let category = p.find_related(category::Entity).one(db).await?;
        let material = p.find_related(material::Entity).one(db).await?;
        let purity = match p.purity_id {
            Some(id) => purity::Entity::find_by_id(id).one(db).await?,
            None => None,
        };
        let metal_color = match p.metal_color_id {
            Some(id) => metal_color::Entity::find_by_id(id).one(db).await?,
            None => None,
        };
        let style = match p.style_id {
            Some(id) => style::Entity::find_by_id(id).one(db).await?,
            None => None,
        };
        let insert_types = p
            .find_related(insert_type::Entity)
            .order_by_asc(insert_type::Column::Name)
            .all(db)
            .await?;
        let coatings = p
            .find_related(coating::Entity)
            .order_by_asc(coating::Column::Name)
            .all(db)
            .await?;
        let images = product_image::Entity::find()
            .filter(product_image::Column::ProductId.eq(p.id))
            .order_by_desc(product_image::Column::IsMain)
            .order_by_asc(product_image::Column::SortOrder)
            .order_by_asc(product_image::Column::UploadedAt)
            .all(db)
            .await?;

        let similar = product::Entity::find()
            .filter(product::Column::CategoryId.eq(p.category_id))
            .filter(product::Column::IsActive.eq(true))
            .filter(product::Column::Id.ne(p.id))
            .order_by_desc(product::Column::CreatedAt)
            .order_by_desc(product::Column::Id)
            .limit(SIMILAR_PRODUCTS)
            .all(db)
            .await?;

        let (category_name, category_slug) = category
            .map(|c| (c.name, c.slug))
            .unwrap_or_default();

        Ok(ProductDetail {
            in_stock: p.in_stock(),
            similar_products: summarize(db, similar).await?,
            factory_name: factory.map(|f| f.name).unwrap_or_default(),
            category_name,
            category_slug,
            material_name: material.map(|m| m.name).unwrap_or_default(),
            purity: purity.map(|v| v.value),
            metal_color: metal_color.map(|c| c.name),
            style: style.map(|s| s.name),
            insert_types: insert_types.into_iter().map(|i| i.name).collect(),
            coatings: coatings.into_iter().map(|c| c.name).collect(),
            images: images.into_iter().map(ImageView::from).collect(),
            article: p.article,
            name: p.name,
            description: p.description,
            price: p.price,
            stock_quantity: p.stock_quantity,
            metal_weight: p.metal_weight,
            total_weight: p.total_weight,
            size: p.size,
            length_mm: p.length_mm,
            width_mm: p.width_mm,
            height_mm: p.height_mm,
            has_inserts: p.has_inserts,
            insert_description: p.insert_description,
            has_stamp: p.has_stamp,
            manufacturer_brand: p.manufacturer_brand,
            views_count: p.views_count,
            created_at: p.created_at,
            factory_id: p.factory_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use rstest::rstest;

    #[rstest]
    #[case(None, 30, 1)]
    #[case(Some("2"), 30, 2)]
    #[case(Some(" 3 "), 30, 3)]
    #[case(Some("abc"), 30, 1)]
    #[case(Some("2.5"), 30, 1)]
    #[case(Some("99"), 30, 3)]
    #[case(Some("0"), 30, 3)]
    #[case(Some("-4"), 30, 3)]
    #[case(Some("5"), 0, 1)]
    fn page_resolution(#[case] raw: Option<&str>, #[case] total: u64, #[case] expected: u64) {
        assert_eq!(PageInfo::resolve(raw, total, 12).current_page, expected);
    }

    #[test]
    fn page_flags_and_counts() {
        let page = PageInfo::resolve(Some("2"), 25, 12);
        assert_eq!(page.total_pages, 3);
        assert!(page.has_next);
        assert!(page.has_previous);
        assert_eq!(page.offset(12), 12);

        let empty = PageInfo::resolve(None, 0, 12);
        assert_eq!(empty.total_pages, 1);
        assert!(!empty.has_next);
        assert!(!empty.has_previous);
    }

    #[test]
    fn filter_parsing_follows_query_conventions() {
        let params = CatalogParams {
            category: Some("rings".into()),
            material: Some("3".into()),
            purity: Some("".into()),
            has_inserts: Some("true".into()),
            has_stamp: Some("no".into()),
            min_price: Some("100.50".into()),
            search: Some("  ".into()),
            sort: Some("popular".into()),
            ..Default::default()
        };
        let filter = CatalogFilter::try_from(&params).unwrap();
        assert_eq!(filter.category.as_deref(), Some("rings"));
        assert_eq!(filter.material_id, Some(3));
        assert_eq!(filter.purity_id, None);
        assert_eq!(filter.has_inserts, Some(true));
        assert_eq!(filter.has_stamp, Some(false));
        assert_eq!(filter.min_price, Some(Decimal::new(10050, 2)));
        assert_eq!(filter.search, None);
        assert_eq!(filter.sort, SortOrder::Popular);
    }

    #[test]
    fn malformed_numbers_are_validation_errors() {
        let params = CatalogParams {
            max_price: Some("cheap".into()),
            ..Default::default()
        };
        assert!(matches!(
            CatalogFilter::try_from(&params),
            Err(ServiceError::ValidationError(_))
        ));
    }

    #[test]
    fn unknown_sort_means_newest() {
        assert_eq!(SortOrder::parse(Some("-created_at")), SortOrder::Newest);
        assert_eq!(SortOrder::parse(None), SortOrder::Newest);
        assert_eq!(SortOrder::parse(Some("price_desc")), SortOrder::PriceDesc);
    }

    #[test]
    fn like_patterns_escape_wildcards() {
        assert_eq!(escape_like("Gold"), "%Gold%");
        assert_eq!(escape_like("50%_off"), "%50\\%\\_off%");
    }

    proptest::proptest! {
        #[test]
        fn resolved_page_is_always_in_range(
            raw in proptest::option::of("-?[0-9]{1,4}|[a-z]{0,3}"),
            total in 0u64..500,
            size in 1u64..50,
        ) {
            let page = PageInfo::resolve(raw.as_deref(), total, size);
            proptest::prop_assert!(page.current_page >= 1);
            proptest::prop_assert!(page.current_page <= page.total_pages);
            proptest::prop_assert!(page.offset(size) < total.max(1));
            proptest::prop_assert_eq!(page.has_next, page.current_page < page.total_pages);
        }
    }

    fn image(id: i32, product_id: i32, is_main: bool, sort_order: i32, minutes: i64) -> product_image::Model {
        let base = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        product_image::Model {
            id,
            product_id,
            image: format!("img-{id}.jpg"),
            is_main,
            sort_order,
            uploaded_at: base + Duration::minutes(minutes),
        }
    }

    #[test]
    fn main_image_prefers_flag_then_order() {
        let chosen = main_images(vec![
            image(1, 10, false, 2, 0),
            image(2, 10, true, 5, 9),
            image(3, 11, false, 1, 5),
            image(4, 11, false, 1, 1),
            image(5, 11, false, 3, 0),
        ]);
        assert_eq!(chosen[&10], "img-2.jpg");
        assert_eq!(chosen[&11], "img-4.jpg");
    }
}

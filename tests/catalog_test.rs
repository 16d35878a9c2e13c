mod common;

use assert_matches::assert_matches;
use auroom_api::{
    entities::MaterialType,
    errors::ServiceError,
    services::{
        catalog::{CatalogFilter, CatalogParams},
        products::NewProduct,
        reference_data::{Characteristic, NewCharacteristic},
    },
};
use common::{new_product, TestApp};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

struct Seeded {
    app: TestApp,
    factory: i32,
    rings: i32,
    wedding: i32,
    earrings: i32,
    gold: i32,
}

async fn seeded() -> Seeded {
    let app = TestApp::new().await;
    let factory = app.register_factory("catalogue").await.factory.id;
    let gold = app.material("Yellow gold").await;
    let rings = app.category(factory, "Rings", None).await;
    let wedding = app.category(factory, "Wedding rings", Some(rings)).await;
    let earrings = app.category(factory, "Earrings", None).await;
    Seeded {
        app,
        factory,
        rings,
        wedding,
        earrings,
        gold,
    }
}

fn filter(params: CatalogParams) -> CatalogFilter {
    CatalogFilter::try_from(&params).unwrap()
}

impl Seeded {
    async fn add(&self, name: &str, category: i32, price: Decimal) {
        self.app
            .product(self.factory, new_product(name, category, self.gold, price))
            .await;
    }

    async fn add_with(&self, name: &str, tweak: impl FnOnce(&mut NewProduct)) {
        let mut input = new_product(name, self.rings, self.gold, dec!(100));
        tweak(&mut input);
        self.app.product(self.factory, input).await;
    }

    async fn characteristic(&self, input: NewCharacteristic) -> i32 {
        let added = self
            .app
            .state
            .services
            .reference
            .add_characteristic(input)
            .await
            .unwrap();
        match added {
            Characteristic::Purity(p) => p.id,
            Characteristic::MetalColor(c) | Characteristic::Style(c) | Characteristic::Coating(c) => {
                c.id
            }
            Characteristic::InsertType(t) => t.id,
        }
    }

    async fn sorted_by(&self, sort: Option<&str>) -> Vec<String> {
        self.names(CatalogParams {
            sort: sort.map(str::to_string),
            ..Default::default()
        })
        .await
    }

    async fn names(&self, params: CatalogParams) -> Vec<String> {
        let page = self
            .app
            .state
            .services
            .catalog
            .list(&filter(params), None)
            .await
            .unwrap();
        page.products.into_iter().map(|p| p.name).collect()
    }
}

#[tokio::test]
async fn parent_category_includes_subcategories() {
    let s = seeded().await;
    s.add("Solitaire", s.rings, dec!(900)).await;
    s.add("Band", s.wedding, dec!(400)).await;
    s.add("Hoops", s.earrings, dec!(300)).await;

    let mut by_parent = s
        .names(CatalogParams {
            category: Some("rings".into()),
            ..Default::default()
        })
        .await;
    by_parent.sort();
    assert_eq!(by_parent, vec!["Band", "Solitaire"]);

    let by_child = s
        .names(CatalogParams {
            category: Some("wedding-rings".into()),
            ..Default::default()
        })
        .await;
    assert_eq!(by_child, vec!["Band"]);

    let unknown = s
        .names(CatalogParams {
            category: Some("no-such-category".into()),
            ..Default::default()
        })
        .await;
    assert_eq!(unknown.len(), 3);
}

#[tokio::test]
async fn price_range_is_inclusive_and_inverted_range_is_empty() {
    let s = seeded().await;
    s.add("Cheap", s.rings, dec!(100)).await;
    s.add("Middle", s.rings, dec!(500)).await;
    s.add("Dear", s.rings, dec!(1000)).await;

    let names = s
        .names(CatalogParams {
            min_price: Some("100".into()),
            max_price: Some("500".into()),
            sort: Some("price_asc".into()),
            ..Default::default()
        })
        .await;
    assert_eq!(names, vec!["Cheap", "Middle"]);

    let exact = s
        .names(CatalogParams {
            min_price: Some("500".into()),
            max_price: Some("500".into()),
            ..Default::default()
        })
        .await;
    assert_eq!(exact, vec!["Middle"]);

    let inverted = s
        .names(CatalogParams {
            min_price: Some("900".into()),
            max_price: Some("100".into()),
            ..Default::default()
        })
        .await;
    assert!(inverted.is_empty());
}

#[test]
fn malformed_price_is_rejected() {
    let params = CatalogParams {
        min_price: Some("cheap".into()),
        ..Default::default()
    };
    assert_matches!(
        CatalogFilter::try_from(&params),
        Err(ServiceError::ValidationError(_))
    );
}

#[tokio::test]
async fn search_is_case_insensitive_across_fields() {
    let s = seeded().await;
    s.add("Emerald Halo", s.rings, dec!(700)).await;
    s.add("Plain Band", s.wedding, dec!(200)).await;

    let by_name = s
        .names(CatalogParams {
            search: Some("emerald".into()),
            ..Default::default()
        })
        .await;
    assert_eq!(by_name, vec!["Emerald Halo"]);

    let by_article = s
        .names(CatalogParams {
            search: Some(format!("{}-000002", s.factory)),
            ..Default::default()
        })
        .await;
    assert_eq!(by_article, vec!["Plain Band"]);

    let wildcard = s
        .names(CatalogParams {
            search: Some("%".into()),
            ..Default::default()
        })
        .await;
    assert!(wildcard.is_empty());
}

#[tokio::test]
async fn search_matches_cyrillic_names() {
    let s = seeded().await;
    s.add("Кольцо Изумруд", s.rings, dec!(700)).await;
    s.add("Plain Band", s.wedding, dec!(200)).await;

    for term in ["Кольцо", "Изумруд"] {
        let found = s
            .names(CatalogParams {
                search: Some(term.into()),
                ..Default::default()
            })
            .await;
        assert_eq!(found, vec!["Кольцо Изумруд"], "searching {term}");
    }

    let mixed_case = s
        .names(CatalogParams {
            search: Some("pLAIN".into()),
            ..Default::default()
        })
        .await;
    assert_eq!(mixed_case, vec!["Plain Band"]);
}

#[tokio::test]
async fn attribute_filters_narrow_the_listing() {
    let s = seeded().await;
    let silver = s.app.material("Silver 925").await;
    let purity = s
        .characteristic(NewCharacteristic::Purity {
            material_type: MaterialType::Gold,
            value: "585".into(),
            system: "metric".into(),
            description: String::new(),
        })
        .await;
    let rose = s
        .characteristic(NewCharacteristic::MetalColor {
            name: "Rose".into(),
            description: String::new(),
        })
        .await;
    let classic = s
        .characteristic(NewCharacteristic::Style {
            name: "Classic".into(),
            description: String::new(),
        })
        .await;

    s.add_with("Plain", |_| {}).await;
    s.add_with("Silver", |p| p.material_id = silver).await;
    s.add_with("Hallmarked", |p| {
        p.purity_id = Some(purity);
        p.has_stamp = true;
    })
    .await;
    s.add_with("Rosy", |p| p.metal_color_id = Some(rose)).await;
    s.add_with("Timeless", |p| {
        p.style_id = Some(classic);
        p.has_inserts = true;
    })
    .await;

    assert_eq!(
        s.names(CatalogParams {
            material: Some(silver.to_string()),
            ..Default::default()
        })
        .await,
        vec!["Silver"]
    );
    assert_eq!(
        s.names(CatalogParams {
            purity: Some(purity.to_string()),
            ..Default::default()
        })
        .await,
        vec!["Hallmarked"]
    );
    assert_eq!(
        s.names(CatalogParams {
            metal_color: Some(rose.to_string()),
            ..Default::default()
        })
        .await,
        vec!["Rosy"]
    );
    assert_eq!(
        s.names(CatalogParams {
            style: Some(classic.to_string()),
            ..Default::default()
        })
        .await,
        vec!["Timeless"]
    );
    assert_eq!(
        s.names(CatalogParams {
            has_inserts: Some("true".into()),
            ..Default::default()
        })
        .await,
        vec!["Timeless"]
    );
    assert_eq!(
        s.names(CatalogParams {
            has_stamp: Some("true".into()),
            ..Default::default()
        })
        .await,
        vec!["Hallmarked"]
    );

    let mut unstamped = s
        .names(CatalogParams {
            has_stamp: Some("false".into()),
            material: Some(s.gold.to_string()),
            ..Default::default()
        })
        .await;
    unstamped.sort();
    assert_eq!(unstamped, vec!["Plain", "Rosy", "Timeless"]);
}

#[tokio::test]
async fn every_ordering_is_honoured() {
    let s = seeded().await;
    s.add("Beta", s.rings, dec!(300)).await;
    s.add("Alpha", s.rings, dec!(100)).await;
    s.add("Gamma", s.rings, dec!(200)).await;

    let catalog = &s.app.state.services.catalog;
    let article = |n: u32| format!("{}-{n:06}", s.factory);
    for _ in 0..3 {
        catalog.product_detail(&article(3)).await.unwrap();
    }
    catalog.product_detail(&article(1)).await.unwrap();

    assert_eq!(s.sorted_by(None).await, vec!["Gamma", "Alpha", "Beta"]);
    assert_eq!(s.sorted_by(Some("price_asc")).await, vec!["Alpha", "Gamma", "Beta"]);
    assert_eq!(s.sorted_by(Some("price_desc")).await, vec!["Beta", "Gamma", "Alpha"]);
    assert_eq!(s.sorted_by(Some("popular")).await, vec!["Gamma", "Beta", "Alpha"]);
    assert_eq!(s.sorted_by(Some("name")).await, vec!["Alpha", "Beta", "Gamma"]);
}

#[tokio::test]
async fn out_of_range_pages_clamp_to_last() {
    let s = seeded().await;
    let page_size = s.app.state.services.catalog.page_size();
    for n in 0..=page_size {
        s.add(&format!("Ring {n}"), s.rings, dec!(100)).await;
    }

    let catalog = &s.app.state.services.catalog;
    let all = filter(CatalogParams::default());

    let last = catalog.list(&all, Some("99")).await.unwrap();
    assert_eq!(last.page.current_page, 2);
    assert_eq!(last.page.total_pages, 2);
    assert_eq!(last.products.len(), 1);
    assert!(last.page.has_previous);
    assert!(!last.page.has_next);

    let garbage = catalog.list(&all, Some("abc")).await.unwrap();
    assert_eq!(garbage.page.current_page, 1);
    assert_eq!(garbage.products.len() as u64, page_size);
}

#[tokio::test]
async fn inactive_products_are_hidden() {
    let s = seeded().await;
    let mut hidden = new_product("Hidden", s.rings, s.gold, dec!(100));
    hidden.is_active = false;
    s.app.product(s.factory, hidden).await;
    s.add("Shown", s.rings, dec!(100)).await;

    assert_eq!(s.names(CatalogParams::default()).await, vec!["Shown"]);
}

#[tokio::test]
async fn product_detail_counts_views() {
    let s = seeded().await;
    s.add("Viewed", s.rings, dec!(100)).await;
    let article = format!("{}-000001", s.factory);
    let catalog = &s.app.state.services.catalog;

    catalog.product_detail(&article).await.unwrap();
    let detail = catalog.product_detail(&article).await.unwrap();
    assert_eq!(detail.views_count, 2);

    assert_matches!(
        catalog.product_detail("missing").await,
        Err(ServiceError::NotFound(_))
    );
}

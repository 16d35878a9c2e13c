mod common;

use assert_matches::assert_matches;
use auroom_api::{
    errors::ServiceError,
    services::{article_numbers::format_article, products::ProductPatch},
};
use common::{new_product, TestApp};
use rust_decimal_macros::dec;

#[tokio::test]
async fn generated_articles_count_up_per_factory() {
    let app = TestApp::new().await;
    let first = app.register_factory("aurum").await.factory.id;
    let second = app.register_factory("argentum").await.factory.id;
    let material = app.material("Yellow gold").await;
    let rings = app.category(first, "Rings", None).await;

    for n in 1..=3 {
        let created = app
            .product(first, new_product(&format!("Ring {n}"), rings, material, dec!(1000)))
            .await;
        assert_eq!(created.article, format_article(first, n));
    }

    let other = app
        .product(second, new_product("Chain", rings, material, dec!(500)))
        .await;
    assert_eq!(other.article, format_article(second, 1));
}

#[tokio::test]
async fn first_allocation_continues_from_existing_codes() {
    let app = TestApp::new().await;
    let factory = app.register_factory("legacy").await.factory.id;
    let material = app.material("Rose gold").await;
    let rings = app.category(factory, "Rings", None).await;

    let mut imported = new_product("Imported", rings, material, dec!(100));
    imported.article = Some(format_article(factory, 41));
    app.product(factory, imported).await;

    let next = app
        .product(factory, new_product("Fresh", rings, material, dec!(100)))
        .await;
    assert_eq!(next.article, format_article(factory, 42));
}

#[tokio::test]
async fn generated_code_skips_manually_taken_article() {
    let app = TestApp::new().await;
    let factory = app.register_factory("skipper").await.factory.id;
    let material = app.material("White gold").await;
    let rings = app.category(factory, "Rings", None).await;

    let first = app
        .product(factory, new_product("One", rings, material, dec!(100)))
        .await;
    assert_eq!(first.article, format_article(factory, 1));

    let mut manual = new_product("Manual", rings, material, dec!(100));
    manual.article = Some(format_article(factory, 2));
    app.product(factory, manual).await;

    let third = app
        .product(factory, new_product("Three", rings, material, dec!(100)))
        .await;
    assert_eq!(third.article, format_article(factory, 3));
}

#[tokio::test]
async fn manual_article_collision_is_a_conflict() {
    let app = TestApp::new().await;
    let factory = app.register_factory("dupes").await.factory.id;
    let material = app.material("Silver 925").await;
    let rings = app.category(factory, "Rings", None).await;

    let mut input = new_product("Signet", rings, material, dec!(100));
    input.article = Some("SIGNET-1".to_string());
    app.product(factory, input.clone()).await;

    let err = app
        .state
        .services
        .products
        .create_product(factory, input)
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::Conflict(_));
}

#[tokio::test]
async fn renaming_to_a_blank_article_is_rejected() {
    let app = TestApp::new().await;
    let factory = app.register_factory("blank").await.factory.id;
    let material = app.material("Yellow gold").await;
    let rings = app.category(factory, "Rings", None).await;
    let created = app
        .product(factory, new_product("Ring", rings, material, dec!(100)))
        .await;
    let products = &app.state.services.products;

    let blank = ProductPatch {
        article: Some("   ".into()),
        ..Default::default()
    };
    assert_matches!(
        products.update_product(factory, &created.article, blank).await,
        Err(ServiceError::ValidationError(_))
    );
    assert!(products.owned(factory, &created.article).await.is_ok());

    let renamed = ProductPatch {
        article: Some(" custom-7 ".into()),
        ..Default::default()
    };
    let updated = products
        .update_product(factory, &created.article, renamed)
        .await
        .unwrap();
    assert_eq!(updated.article, "custom-7");
}

mod common;

use assert_matches::assert_matches;
use auroom_api::{errors::ServiceError, services::categories::NewCategory};
use common::{new_product, TestApp};
use rust_decimal_macros::dec;

fn named(name: &str, parent_id: Option<i32>) -> NewCategory {
    NewCategory {
        name: name.to_string(),
        parent_id,
        ..Default::default()
    }
}

#[tokio::test]
async fn slugs_are_transliterated_and_unique() {
    let app = TestApp::new().await;
    let factory = app.register_factory("atelier").await.factory.id;
    let categories = &app.state.services.categories;

    let rings = categories
        .create_category(factory, named("Кольца", None))
        .await
        .unwrap();
    assert_eq!(rings.slug, "koltsa");

    assert_matches!(
        categories.create_category(factory, named("Кольца", None)).await,
        Err(ServiceError::Conflict(_))
    );
}

#[tokio::test]
async fn nesting_is_one_level_deep() {
    let app = TestApp::new().await;
    let factory = app.register_factory("nester").await.factory.id;
    let rings = app.category(factory, "Rings", None).await;
    let wedding = app.category(factory, "Wedding", Some(rings)).await;

    assert_matches!(
        app.state
            .services
            .categories
            .create_category(factory, named("Engagement", Some(wedding)))
            .await,
        Err(ServiceError::ValidationError(_))
    );

    let tree = app.state.services.categories.category_tree().await.unwrap();
    assert_eq!(tree.len(), 1);
    assert_eq!(tree[0].children.len(), 1);
    assert_eq!(tree[0].children[0].slug, "wedding");
}

#[tokio::test]
async fn categories_in_use_are_protected() {
    let app = TestApp::new().await;
    let factory = app.register_factory("keeper").await.factory.id;
    let other = app.register_factory("rival").await.factory.id;
    let material = app.material("White gold").await;
    let rings = app.category(factory, "Rings", None).await;
    let chains = app.category(factory, "Chains", None).await;
    let wedding = app.category(factory, "Wedding", Some(chains)).await;
    app.product(factory, new_product("Signet", rings, material, dec!(300)))
        .await;
    let categories = &app.state.services.categories;

    assert_matches!(
        categories.delete_category(factory, rings).await,
        Err(ServiceError::ProtectedEntity(_))
    );
    assert_matches!(
        categories.delete_category(factory, chains).await,
        Err(ServiceError::ProtectedEntity(_))
    );
    assert_matches!(
        categories.delete_category(other, wedding).await,
        Err(ServiceError::NotFound(_))
    );

    categories.delete_category(factory, wedding).await.unwrap();
    categories.delete_category(factory, chains).await.unwrap();
}

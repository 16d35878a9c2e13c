mod common;

use assert_matches::assert_matches;
use auroom_api::{
    errors::ServiceError,
    services::favorites::{ListName, ADDED_MESSAGE, REMOVED_MESSAGE},
};
use common::{new_product, TestApp};
use rust_decimal_macros::dec;

async fn with_product() -> (TestApp, i32, i32, String) {
    let app = TestApp::new().await;
    let factory = app.register_factory("maker").await.factory.id;
    let material = app.material("Platinum 950").await;
    let rings = app.category(factory, "Rings", None).await;
    let product = app
        .product(factory, new_product("Eternity", rings, material, dec!(2500)))
        .await;
    let customer = app.register_customer("buyer").await.id;
    (app, factory, customer, product.article)
}

#[tokio::test]
async fn toggling_twice_adds_then_removes() {
    let (app, _, customer, article) = with_product().await;
    let favorites = &app.state.services.favorites;

    let added = favorites.toggle_favorite(customer, &article, None).await.unwrap();
    assert!(added.is_favorite);
    assert_eq!(added.message, ADDED_MESSAGE);
    assert_eq!(favorites.favorites(customer, None).await.unwrap().len(), 1);

    let removed = favorites.toggle_favorite(customer, &article, None).await.unwrap();
    assert!(!removed.is_favorite);
    assert_eq!(removed.message, REMOVED_MESSAGE);
    assert!(favorites.favorites(customer, None).await.unwrap().is_empty());
}

#[tokio::test]
async fn lists_report_item_counts_with_default_first() {
    let (app, _, customer, article) = with_product().await;
    let favorites = &app.state.services.favorites;

    let wishlist = favorites
        .create_list(
            customer,
            ListName {
                name: "Anniversary".to_string(),
            },
        )
        .await
        .unwrap();
    favorites
        .toggle_favorite(customer, &article, Some(wishlist.id))
        .await
        .unwrap();

    let lists = favorites.lists(customer).await.unwrap();
    assert_eq!(lists.len(), 2);
    assert!(lists[0].is_default);
    assert_eq!(lists[0].item_count, 0);
    assert_eq!(lists[1].name, "Anniversary");
    assert_eq!(lists[1].item_count, 1);

    let in_list = favorites.favorites(customer, Some(wishlist.id)).await.unwrap();
    assert_eq!(in_list.len(), 1);
    assert_eq!(in_list[0].product.article, article);
}

#[tokio::test]
async fn default_list_is_protected() {
    let (app, _, customer, _) = with_product().await;
    let favorites = &app.state.services.favorites;

    let default = favorites.ensure_default_list(customer).await.unwrap();
    assert_matches!(
        favorites.delete_list(customer, default.id).await,
        Err(ServiceError::ProtectedEntity(_))
    );
}

#[tokio::test]
async fn someone_elses_list_is_not_found() {
    let (app, _, customer, article) = with_product().await;
    let favorites = &app.state.services.favorites;
    let other = app.register_customer("other").await.id;
    let theirs = favorites.ensure_default_list(other).await.unwrap();

    assert_matches!(
        favorites.toggle_favorite(customer, &article, Some(theirs.id)).await,
        Err(ServiceError::NotFound(_))
    );
    assert_matches!(
        favorites.delete_list(customer, theirs.id).await,
        Err(ServiceError::NotFound(_))
    );
}

#[tokio::test]
async fn duplicate_list_names_conflict() {
    let (app, _, customer, _) = with_product().await;
    let favorites = &app.state.services.favorites;
    let name = || ListName {
        name: "Gifts".to_string(),
    };

    favorites.create_list(customer, name()).await.unwrap();
    assert_matches!(
        favorites.create_list(customer, name()).await,
        Err(ServiceError::Conflict(_))
    );
}

#[tokio::test]
async fn deleting_a_product_removes_its_favorites() {
    let (app, factory, customer, article) = with_product().await;
    let favorites = &app.state.services.favorites;
    favorites.toggle_favorite(customer, &article, None).await.unwrap();

    app.state
        .services
        .products
        .delete_product(factory, &article)
        .await
        .unwrap();

    assert!(favorites.favorites(customer, None).await.unwrap().is_empty());
}

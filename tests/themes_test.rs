mod common;

use assert_matches::assert_matches;
use auroom_api::{
    entities::{theme, Theme},
    errors::ServiceError,
    services::themes::{ThemeDraft, DEFAULT_THEME_NAME},
};
use common::TestApp;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

fn draft(name: &str) -> ThemeDraft {
    ThemeDraft {
        name: name.to_string(),
        is_default: false,
        is_active: false,
        ..ThemeDraft::stock_default()
    }
}

async fn count_where(app: &TestApp, column: theme::Column) -> u64 {
    Theme::find()
        .filter(column.eq(true))
        .count(&*app.state.db)
        .await
        .unwrap()
}

#[tokio::test]
async fn stock_default_is_created_once() {
    let app = TestApp::new().await;
    let themes = &app.state.services.themes;

    let first = themes.ensure_default_theme().await.unwrap();
    let again = themes.ensure_default_theme().await.unwrap();

    assert_eq!(first.id, again.id);
    assert_eq!(first.name, DEFAULT_THEME_NAME);
    assert!(first.is_default);
    assert!(first.is_active);
    assert_eq!(first.user_id, None);
}

#[tokio::test]
async fn default_and_active_flags_stay_unique() {
    let app = TestApp::new().await;
    let themes = &app.state.services.themes;
    let owner = app.register_customer("stylist").await.id;
    themes.ensure_default_theme().await.unwrap();

    let mut dark = draft("Dark");
    dark.is_active = true;
    let dark = themes.save(None, Some(owner), dark).await.unwrap();

    let mut light = draft("Light");
    light.is_default = true;
    light.is_active = true;
    let light = themes.save(None, Some(owner), light).await.unwrap();

    assert_eq!(count_where(&app, theme::Column::IsDefault).await, 1);
    assert_eq!(count_where(&app, theme::Column::IsActive).await, 1);
    assert_eq!(themes.default_theme().await.unwrap().unwrap().id, light.id);
    assert_eq!(light.user_id, None);

    let activated = themes.activate(dark.id).await.unwrap();
    assert!(activated.is_active);
    assert_eq!(count_where(&app, theme::Column::IsActive).await, 1);
    assert_eq!(themes.active_theme().await.unwrap().unwrap().id, dark.id);
}

#[tokio::test]
async fn default_theme_cannot_be_deleted_or_unset() {
    let app = TestApp::new().await;
    let themes = &app.state.services.themes;
    let default = themes.ensure_default_theme().await.unwrap();

    assert_matches!(
        themes.delete(default.id).await,
        Err(ServiceError::ProtectedEntity(_))
    );

    let mut unset = ThemeDraft::from(&default);
    unset.is_default = false;
    assert_matches!(
        themes.save(Some(default.id), None, unset).await,
        Err(ServiceError::InvalidOperation(_))
    );
    assert!(themes.get(default.id).await.unwrap().is_default);
}

#[tokio::test]
async fn other_users_themes_read_as_missing() {
    let app = TestApp::new().await;
    let themes = &app.state.services.themes;
    let owner = app.register_customer("owner").await.id;
    let stranger = app.register_customer("stranger").await.id;

    let mine = themes.save(None, Some(owner), draft("Mine")).await.unwrap();

    assert!(themes.editable_by(mine.id, owner).await.is_ok());
    assert_matches!(
        themes.editable_by(mine.id, stranger).await,
        Err(ServiceError::NotFound(_))
    );

    let visible = themes.visible_to(Some(stranger)).await.unwrap();
    assert!(visible.iter().all(|t| t.id != mine.id));
}

#[tokio::test]
async fn non_default_theme_can_be_deleted() {
    let app = TestApp::new().await;
    let themes = &app.state.services.themes;
    themes.ensure_default_theme().await.unwrap();

    let spare = themes.save(None, None, draft("Spare")).await.unwrap();
    themes.delete(spare.id).await.unwrap();
    assert_matches!(themes.get(spare.id).await, Err(ServiceError::NotFound(_)));
}

use axum::{
    extract::{Json, Path, State},
    response::Response,
    routing::{get, post, put},
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use super::common::{
    created_response, no_content_response, success_response, validate_input, Caller, MaybeCaller,
};
use crate::{
    entities::ThemeModel,
    errors::{ApiError, ServiceError},
    services::themes::ThemeDraft,
    AppState,
};

fn hex_color(value: &str) -> Result<(), ValidationError> {
    let digits = value.strip_prefix('#').unwrap_or_default();
    if matches!(digits.len(), 3 | 6) && digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        Ok(())
    } else {
        Err(ValidationError::new("hex_color"))
    }
}

fn default_heading_weight() -> i32 {
    700
}

fn default_body_weight() -> i32 {
    400
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ThemeRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub is_active: bool,
    #[validate(custom = "hex_color")]
    #[schema(example = "#6366f1")]
    pub primary_color: String,
    #[validate(custom = "hex_color")]
    #[schema(example = "#8b5cf6")]
    pub secondary_color: String,
    #[validate(length(min = 1, max = 50))]
    pub color_scheme: String,
    #[serde(default)]
    pub gradient_enabled: bool,
    #[serde(default)]
    pub sharp_corners: bool,
    #[validate(length(min = 1, max = 100))]
    pub heading_font: String,
    #[validate(length(min = 1, max = 100))]
    pub body_font: String,
    #[serde(default = "default_heading_weight")]
    #[validate(range(min = 100, max = 900))]
    pub heading_font_weight: i32,
    #[serde(default = "default_body_weight")]
    #[validate(range(min = 100, max = 900))]
    pub body_font_weight: i32,
}

impl From<ThemeRequest> for ThemeDraft {
    fn from(r: ThemeRequest) -> Self {
        Self {
            name: r.name,
            is_default: r.is_default,
            is_active: r.is_active,
            primary_color: r.primary_color,
            secondary_color: r.secondary_color,
            color_scheme: r.color_scheme,
            gradient_enabled: r.gradient_enabled,
            sharp_corners: r.sharp_corners,
            heading_font: r.heading_font,
            body_font: r.body_font,
            heading_font_weight: r.heading_font_weight,
            body_font_weight: r.body_font_weight,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ThemeView {
    pub id: i32,
    pub name: String,
    pub user_id: Option<i32>,
    pub is_default: bool,
    pub is_active: bool,
    pub primary_color: String,
    pub secondary_color: String,
    pub color_scheme: String,
    pub gradient_enabled: bool,
    pub sharp_corners: bool,
    pub heading_font: String,
    pub body_font: String,
    pub heading_font_weight: i32,
    pub body_font_weight: i32,
    pub updated_at: DateTime<Utc>,
}

impl From<ThemeModel> for ThemeView {
    fn from(t: ThemeModel) -> Self {
        Self {
            id: t.id,
            name: t.name,
            user_id: t.user_id,
            is_default: t.is_default,
            is_active: t.is_active,
            primary_color: t.primary_color,
            secondary_color: t.secondary_color,
            color_scheme: t.color_scheme,
            gradient_enabled: t.gradient_enabled,
            sharp_corners: t.sharp_corners,
            heading_font: t.heading_font,
            body_font: t.body_font,
            heading_font_weight: t.heading_font_weight,
            body_font_weight: t.body_font_weight,
            updated_at: t.updated_at,
        }
    }
}

fn no_default() -> ApiError {
    ServiceError::NotFound("no default theme is configured".to_string()).into()
}

/// The default theme followed by the caller's own
#[utoipa::path(
    get,
    path = "/api/v1/themes",
    responses((status = 200, description = "Visible themes", body = [ThemeView])),
    tag = "themes"
)]
pub async fn list_themes(
    State(state): State<AppState>,
    caller: MaybeCaller,
) -> Result<Response, ApiError> {
    let themes = state.services.themes.visible_to(caller.0).await?;
    Ok(success_response(
        themes.into_iter().map(ThemeView::from).collect::<Vec<_>>(),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/themes/default",
    responses(
        (status = 200, description = "Default theme", body = ThemeView),
        (status = 404, description = "No default theme", body = crate::errors::ErrorResponse)
    ),
    tag = "themes"
)]
pub async fn default_theme(State(state): State<AppState>) -> Result<Response, ApiError> {
    let theme = state.services.themes.default_theme().await?.ok_or_else(no_default)?;
    Ok(success_response(ThemeView::from(theme)))
}

/// The active theme, or the default one when nothing is active
#[utoipa::path(
    get,
    path = "/api/v1/themes/active",
    responses(
        (status = 200, description = "Theme in effect", body = ThemeView),
        (status = 404, description = "No theme configured", body = crate::errors::ErrorResponse)
    ),
    tag = "themes"
)]
pub async fn active_theme(State(state): State<AppState>) -> Result<Response, ApiError> {
    let themes = &state.services.themes;
    let theme = match themes.active_theme().await? {
        Some(theme) => theme,
        None => themes.default_theme().await?.ok_or_else(no_default)?,
    };
    Ok(success_response(ThemeView::from(theme)))
}

#[utoipa::path(
    post,
    path = "/api/v1/themes",
    request_body = ThemeRequest,
    responses(
        (status = 201, description = "Theme created", body = ThemeView),
        (status = 400, description = "Invalid input", body = crate::errors::ErrorResponse),
        (status = 409, description = "Name already used", body = crate::errors::ErrorResponse)
    ),
    tag = "themes"
)]
pub async fn create_theme(
    State(state): State<AppState>,
    caller: Caller,
    Json(input): Json<ThemeRequest>,
) -> Result<Response, ApiError> {
    validate_input(&input)?;
    let saved = state
        .services
        .themes
        .save(None, Some(caller.0), input.into())
        .await?;
    Ok(created_response(ThemeView::from(saved)))
}

#[utoipa::path(
    put,
    path = "/api/v1/themes/{id}",
    params(("id" = i32, Path, description = "Theme id")),
    request_body = ThemeRequest,
    responses(
        (status = 200, description = "Theme saved", body = ThemeView),
        (status = 400, description = "Invalid input or default unset", body = crate::errors::ErrorResponse),
        (status = 404, description = "Theme not found", body = crate::errors::ErrorResponse)
    ),
    tag = "themes"
)]
pub async fn update_theme(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i32>,
    Json(input): Json<ThemeRequest>,
) -> Result<Response, ApiError> {
    validate_input(&input)?;
    let themes = &state.services.themes;
    let current = themes.editable_by(id, caller.0).await?;
    let saved = themes.save(Some(id), current.user_id, input.into()).await?;
    Ok(success_response(ThemeView::from(saved)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/themes/{id}",
    params(("id" = i32, Path, description = "Theme id")),
    responses(
        (status = 204, description = "Theme deleted"),
        (status = 404, description = "Theme not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "The default theme cannot be deleted", body = crate::errors::ErrorResponse)
    ),
    tag = "themes"
)]
pub async fn delete_theme(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i32>,
) -> Result<Response, ApiError> {
    let themes = &state.services.themes;
    themes.editable_by(id, caller.0).await?;
    themes.delete(id).await?;
    Ok(no_content_response())
}

#[utoipa::path(
    post,
    path = "/api/v1/themes/{id}/activate",
    params(("id" = i32, Path, description = "Theme id")),
    responses(
        (status = 200, description = "Theme is now the only active one", body = ThemeView),
        (status = 404, description = "Theme not found", body = crate::errors::ErrorResponse)
    ),
    tag = "themes"
)]
pub async fn activate_theme(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i32>,
) -> Result<Response, ApiError> {
    let themes = &state.services.themes;
    themes.editable_by(id, caller.0).await?;
    let theme = themes.activate(id).await?;
    Ok(success_response(ThemeView::from(theme)))
}

pub fn theme_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_themes).post(create_theme))
        .route("/default", get(default_theme))
        .route("/active", get(active_theme))
        .route("/:id", put(update_theme).delete(delete_theme))
        .route("/:id/activate", post(activate_theme))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors_accept_short_and_long_forms() {
        assert!(hex_color("#6366f1").is_ok());
        assert!(hex_color("#FFF").is_ok());
        assert!(hex_color("6366f1").is_err());
        assert!(hex_color("#12345g").is_err());
        assert!(hex_color("#1234").is_err());
    }
}

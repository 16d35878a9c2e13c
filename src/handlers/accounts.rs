use axum::{
    extract::{Json, State},
    response::Response,
    routing::post,
    Router,
};

use super::common::{created_response, validate_input};
use crate::{
    errors::ApiError,
    services::factories::{CustomerRegistration, FactoryRegistration, RegisteredFactory, UserView},
    AppState,
};

/// Register a factory together with its owning user
#[utoipa::path(
    post,
    path = "/api/v1/register/factory",
    request_body = FactoryRegistration,
    responses(
        (status = 201, description = "Factory registered", body = RegisteredFactory),
        (status = 400, description = "Invalid input", body = crate::errors::ErrorResponse),
        (status = 409, description = "Username taken", body = crate::errors::ErrorResponse)
    ),
    tag = "accounts"
)]
pub async fn register_factory(
    State(state): State<AppState>,
    Json(input): Json<FactoryRegistration>,
) -> Result<Response, ApiError> {
    validate_input(&input)?;
    let registered = state.services.factories.register_factory(input).await?;
    Ok(created_response(registered))
}

/// Register a customer; a default favorites list is created
#[utoipa::path(
    post,
    path = "/api/v1/register/customer",
    request_body = CustomerRegistration,
    responses(
        (status = 201, description = "Customer registered", body = UserView),
        (status = 400, description = "Invalid input", body = crate::errors::ErrorResponse),
        (status = 409, description = "Username taken", body = crate::errors::ErrorResponse)
    ),
    tag = "accounts"
)]
pub async fn register_customer(
    State(state): State<AppState>,
    Json(input): Json<CustomerRegistration>,
) -> Result<Response, ApiError> {
    validate_input(&input)?;
    let user = state.services.factories.register_customer(input).await?;
    Ok(created_response(user))
}

pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/factory", post(register_factory))
        .route("/customer", post(register_customer))
}

use crate::errors::ApiError;
use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use validator::Validate;

/// Header carrying the caller's user id, set by the upstream session layer.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Standard success response
pub fn success_response<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(data)).into_response()
}

/// Standard created response
pub fn created_response<T: Serialize>(data: T) -> Response {
    (StatusCode::CREATED, Json(data)).into_response()
}

/// Standard no content response
pub fn no_content_response() -> Response {
    StatusCode::NO_CONTENT.into_response()
}

/// Validate request input, reporting messages per field
pub fn validate_input<T: Validate>(input: &T) -> Result<(), ApiError> {
    input.validate().map_err(ApiError::from)
}

fn parse_user_id(parts: &Parts) -> Result<Option<i32>, ApiError> {
    let Some(raw) = parts.headers.get(USER_ID_HEADER) else {
        return Ok(None);
    };
    raw.to_str()
        .ok()
        .and_then(|v| v.trim().parse::<i32>().ok())
        .filter(|id| *id > 0)
        .map(Some)
        .ok_or_else(|| ApiError::Unauthorized(format!("invalid {USER_ID_HEADER} header")))
}

/// Identified caller; requests without a valid identity are rejected with 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller(pub i32);

#[async_trait]
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parse_user_id(parts)?
            .map(Caller)
            .ok_or_else(|| ApiError::Unauthorized("authentication required".to_string()))
    }
}

/// Caller identity on public routes, where anonymous access is allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MaybeCaller(pub Option<i32>);

#[async_trait]
impl<S> FromRequestParts<S> for MaybeCaller
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parse_user_id(parts).map(MaybeCaller)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract<T>(header: Option<&str>) -> Result<T, ApiError>
    where
        T: FromRequestParts<(), Rejection = ApiError>,
    {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = header {
            builder = builder.header(USER_ID_HEADER, value);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        T::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn caller_requires_a_positive_id() {
        assert_eq!(extract::<Caller>(Some(" 42 ")).await.unwrap(), Caller(42));
        assert!(matches!(
            extract::<Caller>(None).await,
            Err(ApiError::Unauthorized(_))
        ));
        assert!(matches!(
            extract::<Caller>(Some("abc")).await,
            Err(ApiError::Unauthorized(_))
        ));
        assert!(matches!(
            extract::<Caller>(Some("0")).await,
            Err(ApiError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn anonymous_callers_are_allowed_where_optional() {
        assert_eq!(extract::<MaybeCaller>(None).await.unwrap(), MaybeCaller(None));
        assert_eq!(
            extract::<MaybeCaller>(Some("7")).await.unwrap(),
            MaybeCaller(Some(7))
        );
        assert!(extract::<MaybeCaller>(Some("x")).await.is_err());
    }
}

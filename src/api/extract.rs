use crate::errors::Error;
use axum::{
    extract::{FromRequest, FromRequestParts},
    http::request::Parts,
};

/// Header carrying the caller's user id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The user a request acts for, taken from the `X-User-Id` header.
///
/// ```ignore
/// async fn handler(CurrentUser(user_id): CurrentUser) -> Result<Json<()>> { ... }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser(pub String);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(|id| Self(id.to_string()))
            .ok_or(Error::MissingUser)
    }
}

/// `axum::Json` whose rejection is reported as a JSON validation error.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct ApiJson<T>(pub T);

/// `axum::extract::Path` whose rejection is reported as a JSON validation error.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(Error))]
pub struct ApiPath<T>(pub T);

/// `axum::extract::Query` whose rejection is reported as a JSON validation error.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(Error))]
pub struct ApiQuery<T>(pub T);

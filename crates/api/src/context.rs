use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use supplyhub_auth::{Identity, Principal};

use crate::app::errors::ApiError;

/// The verified caller of the current request.
///
/// Rejects with `401` when the request carries no valid bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser(pub Principal);

impl CurrentUser {
    pub fn principal(&self) -> &Principal {
        &self.0
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<Identity>() {
            Some(Identity::Authenticated(principal)) => Ok(Self(principal.clone())),
            _ => Err(ApiError::Unauthorized),
        }
    }
}

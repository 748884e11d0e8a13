use axum::Router;

use crate::authz::Authorizer;

pub mod accounts;
pub mod common;
pub mod products;
pub mod suppliers;
pub mod system;

/// Router for everything under `/api/v1`.
pub fn router(authz: &Authorizer) -> Router {
    Router::new()
        .merge(accounts::router(authz))
        .nest("/suppliers", suppliers::router(authz))
        .nest("/products", products::router(authz))
}

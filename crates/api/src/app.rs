//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: collaborators and the shared application services
//! - `routes/`: HTTP routes + handlers (one file per resource)
//! - `dto.rs`: request/response DTOs and entity mapping
//! - `errors.rs`: consistent error responses
//! - `extract.rs`: validated JSON bodies
//! - `bootstrap.rs`: optional admin account

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use thiserror::Error;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use supplyhub_auth::{AuthorizationPolicy, ConfigError, Hs256JwtValidator, IdentityErrors, TokenIssuer};

use crate::authz::Authorizer;
use crate::config::AppConfig;
use crate::middleware;

pub mod bootstrap;
pub mod dto;
pub mod errors;
pub mod extract;
pub mod routes;
pub mod services;

pub use services::{AppServices, Collaborators};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to provision bootstrap admin: {0}")]
    Bootstrap(#[from] IdentityErrors),
}

/// Build the full HTTP router (public entrypoint used by `main.rs` and the
/// black-box tests).
pub async fn build_app(config: &AppConfig, collaborators: Collaborators) -> Result<Router, StartupError> {
    let issuer = Arc::new(TokenIssuer::new(config.jwt.clone())?);
    let jwt = Arc::new(Hs256JwtValidator::new(&config.jwt)?);
    let auth_state = middleware::AuthState { jwt };

    let policy = Arc::new(AuthorizationPolicy::from_superuser_roles(
        config.authorization.superuser_roles.clone(),
    ));
    let authz = Authorizer::new(policy);

    let services = Arc::new(AppServices::new(collaborators, issuer));
    if let Some(admin) = &config.bootstrap {
        bootstrap::seed_admin(services.identities.as_ref(), admin).await?;
    }

    let api = routes::router(&authz).layer(Extension(services));

    Ok(Router::new()
        .route("/health", get(routes::system::health))
        .nest("/api/v1", api)
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::identity_middleware,
        ))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CatchPanicLayer::custom(errors::panic_response)),
        ))
}

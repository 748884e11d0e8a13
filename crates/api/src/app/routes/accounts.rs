use std::sync::Arc;

use axum::{
    extract::Extension,
    response::Response,
    routing::{get, post},
    Router,
};

use supplyhub_auth::Credentials;
use supplyhub_core::Notifier;

use crate::app::dto::{LoginUserDto, RegisterUserDto};
use crate::app::errors::ApiError;
use crate::app::extract::ValidatedJson;
use crate::app::routes::system;
use crate::app::services::AppServices;
use crate::authz::Authorizer;
use crate::respond::respond;

pub fn router(authz: &Authorizer) -> Router {
    Router::new()
        .route("/accounts", post(register))
        .route("/accounts/me", authz.authenticated(get(system::whoami)))
        .route("/sessions", post(login))
}

pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    ValidatedJson(body): ValidatedJson<RegisterUserDto>,
) -> Result<Response, ApiError> {
    let mut notifier = Notifier::new();
    let response = services
        .accounts
        .register(
            &mut notifier,
            Credentials {
                email: body.email,
                password: body.password,
            },
        )
        .await?;
    Ok(respond(notifier, response))
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    ValidatedJson(body): ValidatedJson<LoginUserDto>,
) -> Result<Response, ApiError> {
    let mut notifier = Notifier::new();
    let response = services
        .accounts
        .login(
            &mut notifier,
            Credentials {
                email: body.email,
                password: body.password,
            },
        )
        .await?;
    Ok(respond(notifier, response))
}

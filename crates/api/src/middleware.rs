use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use supplyhub_auth::{Identity, JwtValidator};

#[derive(Clone)]
pub struct AuthState {
    pub jwt: Arc<dyn JwtValidator>,
}

/// Resolve the caller's [`Identity`] and attach it to the request.
///
/// Never rejects: a missing or invalid token yields `Identity::Anonymous`, and
/// the per-route policy guard decides whether that is acceptable.
pub async fn identity_middleware(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Response {
    let identity = match extract_bearer(req.headers()) {
        None => Identity::Anonymous,
        Some(token) => match state.jwt.validate(token) {
            Ok(principal) => Identity::Authenticated(principal),
            Err(e) => {
                tracing::debug!(error = %e, "bearer token rejected");
                Identity::Anonymous
            }
        },
    };

    req.extensions_mut().insert(identity);
    next.run(req).await
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(axum::http::header::AUTHORIZATION)?;
    let token = header.to_str().ok()?.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}

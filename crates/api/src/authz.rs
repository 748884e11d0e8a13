//! Route-level policy guard.
//!
//! Authorization runs as a route layer: it sees the request before any
//! extractor of the handler (body included) and before the handler itself, so
//! a denied request has no side effects.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::MethodRouter,
};

use supplyhub_auth::{authorize_all, AuthorizationPolicy, Identity, PolicyRequirement};

use crate::app::errors::ApiError;

/// `(resource, action)` pairs demanded by the catalog endpoints.
pub mod requirements {
    use supplyhub_auth::PolicyRequirement;

    pub const SUPPLIER: &str = "Fornecedor";
    pub const PRODUCT: &str = "Produto";

    pub const ADD: &str = "Adicionar";
    pub const UPDATE: &str = "Atualizar";
    pub const DELETE: &str = "Excluir";

    pub const SUPPLIER_ADD: PolicyRequirement = PolicyRequirement::new_static(SUPPLIER, ADD);
    pub const SUPPLIER_UPDATE: PolicyRequirement = PolicyRequirement::new_static(SUPPLIER, UPDATE);
    pub const SUPPLIER_DELETE: PolicyRequirement = PolicyRequirement::new_static(SUPPLIER, DELETE);

    pub const PRODUCT_ADD: PolicyRequirement = PolicyRequirement::new_static(PRODUCT, ADD);
    pub const PRODUCT_UPDATE: PolicyRequirement = PolicyRequirement::new_static(PRODUCT, UPDATE);
    pub const PRODUCT_DELETE: PolicyRequirement = PolicyRequirement::new_static(PRODUCT, DELETE);

    /// Every catalog requirement; used to provision the bootstrap admin.
    pub fn all() -> [PolicyRequirement; 6] {
        [
            SUPPLIER_ADD,
            SUPPLIER_UPDATE,
            SUPPLIER_DELETE,
            PRODUCT_ADD,
            PRODUCT_UPDATE,
            PRODUCT_DELETE,
        ]
    }
}

/// Wraps method routes with the shared [`AuthorizationPolicy`].
#[derive(Clone)]
pub struct Authorizer {
    policy: Arc<AuthorizationPolicy>,
}

impl Authorizer {
    pub fn new(policy: Arc<AuthorizationPolicy>) -> Self {
        Self { policy }
    }

    /// Any verified caller.
    pub fn authenticated(&self, route: MethodRouter) -> MethodRouter {
        self.guard(route, Vec::new())
    }

    /// A verified caller whose claims satisfy `requirement`.
    pub fn require(&self, route: MethodRouter, requirement: PolicyRequirement) -> MethodRouter {
        self.guard(route, vec![requirement])
    }

    fn guard(&self, route: MethodRouter, requirements: Vec<PolicyRequirement>) -> MethodRouter {
        let guard = Guard {
            policy: self.policy.clone(),
            requirements: requirements.into(),
        };
        route.route_layer(middleware::from_fn_with_state(guard, enforce))
    }
}

#[derive(Clone)]
struct Guard {
    policy: Arc<AuthorizationPolicy>,
    requirements: Arc<[PolicyRequirement]>,
}

async fn enforce(State(guard): State<Guard>, req: Request, next: Next) -> Response {
    let decision = {
        let anonymous = Identity::Anonymous;
        let identity = req.extensions().get::<Identity>().unwrap_or(&anonymous);
        authorize_all(identity, &guard.policy, &guard.requirements, true)
    };

    match decision {
        Ok(()) => next.run(req).await,
        Err(e) => {
            tracing::info!(method = %req.method(), path = %req.uri().path(), error = %e, "request denied");
            ApiError::from(e).into_response()
        }
    }
}

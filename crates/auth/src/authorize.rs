use thiserror::Error;

use crate::policy::{AuthorizationPolicy, PolicyRequirement};
use crate::principal::Identity;

/// Why a requirement was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialKind {
    Unauthenticated,
    MissingClaim,
}

/// Outcome of evaluating one requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenialKind),
}

impl Decision {
    pub fn is_allowed(self) -> bool {
        matches!(self, Decision::Allow)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("authentication required")]
    Unauthenticated,

    #[error("forbidden: missing claim '{0}'")]
    Forbidden(String),
}

/// Decide whether `identity` satisfies `requirement` under `policy`.
///
/// - No IO
/// - No panics
/// - Anonymous callers are always denied
pub fn authorize(
    identity: &Identity,
    policy: &AuthorizationPolicy,
    requirement: &PolicyRequirement,
) -> Decision {
    let Some(principal) = identity.principal() else {
        return Decision::Deny(DenialKind::Unauthenticated);
    };

    if policy.predicate_for(requirement).is_satisfied(principal, requirement) {
        Decision::Allow
    } else {
        Decision::Deny(DenialKind::MissingClaim)
    }
}

/// Every requirement must hold (logical AND). An empty slice only demands an
/// authenticated caller when `require_authenticated` is set.
pub fn authorize_all(
    identity: &Identity,
    policy: &AuthorizationPolicy,
    requirements: &[PolicyRequirement],
    require_authenticated: bool,
) -> Result<(), AuthzError> {
    if require_authenticated && !identity.is_authenticated() {
        return Err(AuthzError::Unauthenticated);
    }

    for requirement in requirements {
        match authorize(identity, policy, requirement) {
            Decision::Allow => {}
            Decision::Deny(DenialKind::Unauthenticated) => return Err(AuthzError::Unauthenticated),
            Decision::Deny(DenialKind::MissingClaim) => {
                return Err(AuthzError::Forbidden(requirement.to_string()));
            }
        }
    }

    Ok(())
}

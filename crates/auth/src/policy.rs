//! Declarative authorization policy: `(resource, action) -> predicate`.

use std::borrow::Cow;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::principal::Principal;
use crate::roles::Role;

/// A `(resource, action)` pair an operation demands of its caller,
/// e.g. `("Produto", "Adicionar")`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PolicyRequirement {
    resource: Cow<'static, str>,
    action: Cow<'static, str>,
}

impl PolicyRequirement {
    pub const fn new_static(resource: &'static str, action: &'static str) -> Self {
        Self {
            resource: Cow::Borrowed(resource),
            action: Cow::Borrowed(action),
        }
    }

    pub fn new(resource: impl Into<Cow<'static, str>>, action: impl Into<Cow<'static, str>>) -> Self {
        Self {
            resource: resource.into(),
            action: action.into(),
        }
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn action(&self) -> &str {
        &self.action
    }
}

impl core::fmt::Display for PolicyRequirement {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}:{}", self.resource, self.action)
    }
}

/// What a principal's claims must contain for a requirement to hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimPredicate {
    /// A claim typed as the requirement's resource whose comma-separated
    /// value lists the requirement's action.
    ResourceAction,
    /// An exact `(type, value)` claim.
    HasClaim { claim_type: String, value: String },
    /// A `role` claim with this value.
    HasRole(Role),
    /// At least one of the inner predicates.
    AnyOf(Vec<ClaimPredicate>),
}

impl ClaimPredicate {
    pub fn is_satisfied(&self, principal: &Principal, requirement: &PolicyRequirement) -> bool {
        match self {
            ClaimPredicate::ResourceAction => principal.claims.iter().any(|c| {
                c.claim_type == requirement.resource()
                    && c.value.split(',').map(str::trim).any(|a| a == requirement.action())
            }),
            ClaimPredicate::HasClaim { claim_type, value } => principal.has_claim(claim_type, value),
            ClaimPredicate::HasRole(role) => principal.is_in_role(role.as_str()),
            ClaimPredicate::AnyOf(inner) => inner.iter().any(|p| p.is_satisfied(principal, requirement)),
        }
    }
}

/// Policy table consulted by [`crate::authorize`].
///
/// Requirements without an explicit rule fall back to `fallback`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationPolicy {
    rules: HashMap<PolicyRequirement, ClaimPredicate>,
    fallback: ClaimPredicate,
}

impl Default for AuthorizationPolicy {
    fn default() -> Self {
        Self {
            rules: HashMap::new(),
            fallback: ClaimPredicate::ResourceAction,
        }
    }
}

impl AuthorizationPolicy {
    /// Resource/action claims, plus any of `roles` as a superset of every pair.
    pub fn from_superuser_roles<I, R>(roles: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<Cow<'static, str>>,
    {
        let roles: Vec<ClaimPredicate> = roles
            .into_iter()
            .map(|r| ClaimPredicate::HasRole(Role::new(r)))
            .collect();

        if roles.is_empty() {
            return Self::default();
        }

        let mut any = vec![ClaimPredicate::ResourceAction];
        any.extend(roles);
        Self::default().with_fallback(ClaimPredicate::AnyOf(any))
    }

    pub fn with_rule(mut self, requirement: PolicyRequirement, predicate: ClaimPredicate) -> Self {
        self.rules.insert(requirement, predicate);
        self
    }

    pub fn with_fallback(mut self, predicate: ClaimPredicate) -> Self {
        self.fallback = predicate;
        self
    }

    pub fn predicate_for(&self, requirement: &PolicyRequirement) -> &ClaimPredicate {
        self.rules.get(requirement).unwrap_or(&self.fallback)
    }
}

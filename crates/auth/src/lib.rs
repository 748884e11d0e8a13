//! `supplyhub-auth`: authentication and claims-based authorization.
//!
//! This crate is decoupled from HTTP: it issues and validates tokens, decides
//! authorization for a `(resource, action)` requirement, and runs the
//! register/login flows against an [`IdentityStore`].

pub mod authorize;
pub mod claims;
pub mod config;
pub mod error;
pub mod identity;
pub mod password;
pub mod policy;
pub mod principal;
pub mod roles;
pub mod service;
pub mod token;

pub use authorize::{authorize, authorize_all, AuthzError, Decision, DenialKind};
pub use claims::{claim_types, Claim, JwtClaims};
pub use config::{ConfigError, JwtSettings, LockoutSettings};
pub use error::AuthError;
pub use identity::{IdentityErrors, IdentityStore, InMemoryIdentityStore, SignInResult, UserAccount};
pub use policy::{AuthorizationPolicy, ClaimPredicate, PolicyRequirement};
pub use principal::{Identity, Principal};
pub use roles::Role;
pub use service::{AccountService, Credentials, LoginOutcome, LoginResponse, UserToken};
pub use token::{Hs256JwtValidator, IssuedToken, JwtValidator, TokenIssuer};

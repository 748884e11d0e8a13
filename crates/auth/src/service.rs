//! Account service: registration and login orchestration.
//!
//! Outcomes are reported through the request's [`Notifier`]; the caller turns
//! the notifier into a response.

use std::sync::Arc;

use serde::Serialize;

use supplyhub_core::{Notifier, UserId};

use crate::claims::Claim;
use crate::error::AuthError;
use crate::identity::{IdentityErrors, IdentityStore, SignInResult, UserAccount};
use crate::token::{IssuedToken, TokenIssuer};

/// Uniform rejection for bad credentials. Never varies with whether the
/// account exists.
pub const INVALID_CREDENTIALS: &str = "Incorrect username or password";
pub const LOCKED_OUT: &str = "User temporarily locked out due to invalid attempts";

#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Token plus the user summary handed back to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub expires_in_seconds: i64,
    pub user: UserToken,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserToken {
    pub id: UserId,
    pub email: String,
    pub claims: Vec<Claim>,
}

impl From<IssuedToken> for LoginResponse {
    fn from(token: IssuedToken) -> Self {
        Self {
            expires_in_seconds: token.expires_in_seconds(),
            user: UserToken {
                id: token.subject,
                email: token.email,
                claims: token.claims,
            },
            access_token: token.access_token,
        }
    }
}

/// Terminal states of the login flow.
///
/// `Unauthenticated → CredentialsSubmitted → {Authenticated, LockedOut, Rejected}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    Authenticated(LoginResponse),
    LockedOut,
    Rejected,
}

/// Account service.
///
/// Generic over the identity store so that this crate has no dependency on
/// any concrete persistence.
pub struct AccountService<S: IdentityStore + ?Sized> {
    store: Arc<S>,
    issuer: Arc<TokenIssuer>,
}

impl<S: IdentityStore + ?Sized> Clone for AccountService<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            issuer: self.issuer.clone(),
        }
    }
}

impl<S: IdentityStore + ?Sized> AccountService<S> {
    pub fn new(store: Arc<S>, issuer: Arc<TokenIssuer>) -> Self {
        Self { store, issuer }
    }

    /// Create an account and sign it in.
    ///
    /// Registration reports each specific rejection reason; that feedback is
    /// what the caller needs to fix the request.
    pub async fn register(
        &self,
        notifier: &mut Notifier,
        credentials: Credentials,
    ) -> Result<Option<LoginResponse>, AuthError> {
        match self.store.create_user(&credentials.email, &credentials.password).await {
            Ok(account) => {
                tracing::info!(user_id = %account.id, "account registered");
                self.issue_for(&account).await.map(Some)
            }
            Err(IdentityErrors::Rejected(errors)) => {
                for error in errors {
                    notifier.notify(error);
                }
                Ok(None)
            }
            Err(IdentityErrors::Store(e)) => Err(e),
        }
    }

    /// Run the credential check and report the terminal state on `notifier`.
    pub async fn login(
        &self,
        notifier: &mut Notifier,
        credentials: Credentials,
    ) -> Result<Option<LoginResponse>, AuthError> {
        match self.authenticate(&credentials).await? {
            LoginOutcome::Authenticated(response) => Ok(Some(response)),
            LoginOutcome::LockedOut => {
                notifier.notify(LOCKED_OUT);
                Ok(None)
            }
            LoginOutcome::Rejected => {
                notifier.notify(INVALID_CREDENTIALS);
                Ok(None)
            }
        }
    }

    pub async fn authenticate(&self, credentials: &Credentials) -> Result<LoginOutcome, AuthError> {
        match self
            .store
            .check_password(&credentials.email, &credentials.password)
            .await?
        {
            SignInResult::Succeeded(account) => {
                tracing::info!(user_id = %account.id, "user signed in");
                Ok(LoginOutcome::Authenticated(self.issue_for(&account).await?))
            }
            SignInResult::LockedOut => {
                tracing::warn!("sign-in refused: account locked out");
                Ok(LoginOutcome::LockedOut)
            }
            SignInResult::Failed => {
                tracing::warn!("sign-in refused: bad credentials");
                Ok(LoginOutcome::Rejected)
            }
        }
    }

    async fn issue_for(&self, account: &UserAccount) -> Result<LoginResponse, AuthError> {
        let claims = self.store.get_claims(account).await?;
        let roles = self.store.get_roles(account).await?;
        let token = self.issuer.issue(account, &claims, &roles)?;
        Ok(token.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claims::claim_types;
    use crate::config::{JwtSettings, LockoutSettings};
    use crate::identity::InMemoryIdentityStore;
    use crate::roles::Role;

    fn service(max_failed_attempts: u32) -> (AccountService<InMemoryIdentityStore>, Arc<InMemoryIdentityStore>) {
        let store = Arc::new(InMemoryIdentityStore::new(LockoutSettings {
            max_failed_attempts,
            lockout_minutes: 5,
        }));
        let issuer = TokenIssuer::new(JwtSettings {
            secret: "an-hs256-secret-of-at-least-32-bytes!".into(),
            issuer: "supplyhub".into(),
            audience: "https://localhost".into(),
            expiration_hours: 2,
        })
        .unwrap();
        (AccountService::new(store.clone(), Arc::new(issuer)), store)
    }

    fn creds(email: &str, password: &str) -> Credentials {
        Credentials {
            email: email.into(),
            password: password.into(),
        }
    }

    #[tokio::test]
    async fn register_returns_token_with_email_claim() {
        let (svc, _) = service(5);
        let mut notifier = Notifier::new();

        let response = svc
            .register(&mut notifier, creds("a@x.com", "P@ss1234"))
            .await
            .unwrap()
            .expect("registration should succeed");

        assert!(!notifier.has_notifications());
        assert_eq!(response.user.email, "a@x.com");
        assert!(response
            .user
            .claims
            .iter()
            .any(|c| c.claim_type == claim_types::EMAIL && c.value == "a@x.com"));
        assert_eq!(response.expires_in_seconds, 7200);
    }

    #[tokio::test]
    async fn register_reports_each_rejection() {
        let (svc, _) = service(5);
        let mut notifier = Notifier::new();

        let response = svc.register(&mut notifier, creds("a@x.com", "weak")).await.unwrap();

        assert!(response.is_none());
        assert!(notifier.notifications().len() > 1);
    }

    #[tokio::test]
    async fn login_embeds_store_claims_and_roles() {
        let (svc, store) = service(5);
        let account = store.create_user("a@x.com", "P@ss1234").await.unwrap();
        store.add_claim(&account, Claim::new("Produto", "Adicionar")).await.unwrap();
        store.add_to_role(&account, Role::new("Admin")).await.unwrap();

        let mut notifier = Notifier::new();
        let response = svc
            .login(&mut notifier, creds("a@x.com", "P@ss1234"))
            .await
            .unwrap()
            .unwrap();

        let claims = &response.user.claims;
        assert!(claims.contains(&Claim::new("Produto", "Adicionar")));
        assert!(claims.contains(&Claim::new("role", "Admin")));
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user_get_the_same_message() {
        let (svc, store) = service(5);
        store.create_user("a@x.com", "P@ss1234").await.unwrap();

        let mut wrong = Notifier::new();
        assert!(svc.login(&mut wrong, creds("a@x.com", "nope")).await.unwrap().is_none());

        let mut unknown = Notifier::new();
        assert!(svc.login(&mut unknown, creds("b@x.com", "nope")).await.unwrap().is_none());

        assert_eq!(wrong.notifications(), unknown.notifications());
        assert_eq!(wrong.notifications()[0].message(), INVALID_CREDENTIALS);
    }

    #[tokio::test]
    async fn lockout_is_reported_without_token() {
        let (svc, store) = service(1);
        store.create_user("a@x.com", "P@ss1234").await.unwrap();

        let outcome = svc.authenticate(&creds("a@x.com", "nope")).await.unwrap();
        assert_eq!(outcome, LoginOutcome::LockedOut);

        let mut notifier = Notifier::new();
        let response = svc.login(&mut notifier, creds("a@x.com", "P@ss1234")).await.unwrap();
        assert!(response.is_none());
        assert_eq!(notifier.notifications()[0].message(), LOCKED_OUT);
    }
}

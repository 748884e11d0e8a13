//! Identity store contract and an in-memory implementation.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use supplyhub_core::UserId;

use crate::claims::Claim;
use crate::config::LockoutSettings;
use crate::error::AuthError;
use crate::password;
use crate::roles::Role;

/// Public view of a stored user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    pub id: UserId,
    pub email: String,
}

#[derive(Debug, Error)]
pub enum IdentityErrors {
    /// The store refused the user; one message per broken rule.
    #[error("user rejected: {}", .0.join(" "))]
    Rejected(Vec<String>),

    #[error(transparent)]
    Store(#[from] AuthError),
}

/// Result of a password check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignInResult {
    Succeeded(UserAccount),
    LockedOut,
    /// Unknown user or wrong password; callers cannot tell which.
    Failed,
}

/// Persistence for accounts, credentials, claims and roles.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, AuthError>;

    async fn create_user(&self, email: &str, password: &str) -> Result<UserAccount, IdentityErrors>;

    /// Verify credentials, applying the lockout policy.
    async fn check_password(&self, email: &str, password: &str) -> Result<SignInResult, AuthError>;

    async fn get_claims(&self, user: &UserAccount) -> Result<Vec<Claim>, AuthError>;

    async fn get_roles(&self, user: &UserAccount) -> Result<Vec<Role>, AuthError>;

    async fn add_claim(&self, user: &UserAccount, claim: Claim) -> Result<(), AuthError>;

    async fn add_to_role(&self, user: &UserAccount, role: Role) -> Result<(), AuthError>;
}

#[derive(Debug, Clone)]
struct StoredUser {
    account: UserAccount,
    password_hash: String,
    claims: Vec<Claim>,
    roles: Vec<Role>,
    failed_attempts: u32,
    lockout_end: Option<DateTime<Utc>>,
}

/// In-memory identity store for tests/dev.
#[derive(Debug)]
pub struct InMemoryIdentityStore {
    users: RwLock<HashMap<String, StoredUser>>,
    lockout: LockoutSettings,
}

impl Default for InMemoryIdentityStore {
    fn default() -> Self {
        Self::new(LockoutSettings::default())
    }
}

impl InMemoryIdentityStore {
    pub fn new(lockout: LockoutSettings) -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            lockout,
        }
    }

    fn poisoned() -> AuthError {
        AuthError::Store("identity store lock poisoned".into())
    }

    fn with_user<T>(
        &self,
        user: &UserAccount,
        f: impl FnOnce(&mut StoredUser) -> T,
    ) -> Result<T, AuthError> {
        let mut users = self.users.write().map_err(|_| Self::poisoned())?;
        let stored = users
            .get_mut(&normalize(&user.email))
            .ok_or_else(|| AuthError::Store(format!("unknown user {}", user.id)))?;
        Ok(f(stored))
    }
}

fn normalize(email: &str) -> String {
    email.trim().to_lowercase()
}

#[async_trait]
impl IdentityStore for InMemoryIdentityStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, AuthError> {
        let users = self.users.read().map_err(|_| Self::poisoned())?;
        Ok(users.get(&normalize(email)).map(|u| u.account.clone()))
    }

    async fn create_user(&self, email: &str, password: &str) -> Result<UserAccount, IdentityErrors> {
        let key = normalize(email);
        let mut errors = Vec::new();

        if self.find_by_email(&key).await?.is_some() {
            errors.push(format!("Email '{email}' is already taken."));
        }
        errors.extend(password::password_policy_violations(password));
        if !errors.is_empty() {
            return Err(IdentityErrors::Rejected(errors));
        }

        let password_hash = password::hash_password(password)?;
        let account = UserAccount {
            id: UserId::new(),
            email: email.trim().to_string(),
        };

        let mut users = self.users.write().map_err(|_| Self::poisoned())?;
        if users.contains_key(&key) {
            return Err(IdentityErrors::Rejected(vec![format!(
                "Email '{email}' is already taken."
            )]));
        }
        users.insert(
            key,
            StoredUser {
                account: account.clone(),
                password_hash,
                claims: Vec::new(),
                roles: Vec::new(),
                failed_attempts: 0,
                lockout_end: None,
            },
        );

        Ok(account)
    }

    async fn check_password(&self, email: &str, password: &str) -> Result<SignInResult, AuthError> {
        let key = normalize(email);
        let now = Utc::now();

        let (account, hash) = {
            let users = self.users.read().map_err(|_| Self::poisoned())?;
            let Some(stored) = users.get(&key) else {
                drop(users);
                password::verify_dummy(password);
                return Ok(SignInResult::Failed);
            };
            if stored.lockout_end.is_some_and(|end| end > now) {
                return Ok(SignInResult::LockedOut);
            }
            (stored.account.clone(), stored.password_hash.clone())
        };

        let valid = password::verify_password(password, &hash)?;

        self.with_user(&account, |stored| {
            if valid {
                stored.failed_attempts = 0;
                stored.lockout_end = None;
                return SignInResult::Succeeded(stored.account.clone());
            }

            stored.failed_attempts += 1;
            if stored.failed_attempts >= self.lockout.max_failed_attempts {
                stored.failed_attempts = 0;
                stored.lockout_end = Some(now + Duration::minutes(self.lockout.lockout_minutes));
                tracing::warn!(user_id = %stored.account.id, "account locked out after repeated failures");
                SignInResult::LockedOut
            } else {
                SignInResult::Failed
            }
        })
    }

    async fn get_claims(&self, user: &UserAccount) -> Result<Vec<Claim>, AuthError> {
        self.with_user(user, |u| u.claims.clone())
    }

    async fn get_roles(&self, user: &UserAccount) -> Result<Vec<Role>, AuthError> {
        self.with_user(user, |u| u.roles.clone())
    }

    async fn add_claim(&self, user: &UserAccount, claim: Claim) -> Result<(), AuthError> {
        self.with_user(user, |u| u.claims.push(claim))
    }

    async fn add_to_role(&self, user: &UserAccount, role: Role) -> Result<(), AuthError> {
        self.with_user(user, |u| {
            if !u.roles.contains(&role) {
                u.roles.push(role);
            }
        })
    }
}

//! HS256 JWT issuance and verification.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use supplyhub_core::UserId;

use crate::claims::{claim_types, Claim, JwtClaims};
use crate::config::{ConfigError, JwtSettings};
use crate::error::AuthError;
use crate::identity::UserAccount;
use crate::principal::Principal;
use crate::roles::Role;

/// A signed token plus the facts it asserts. Never mutated once issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub access_token: String,
    pub token_id: Uuid,
    pub subject: UserId,
    pub email: String,
    /// Full claim set embedded at issuance, in issuance order.
    pub claims: Vec<Claim>,
    pub issuer: String,
    pub audience: String,
    pub issued_at: DateTime<Utc>,
    pub not_before: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl IssuedToken {
    pub fn expires_in_seconds(&self) -> i64 {
        (self.expires_at - self.issued_at).num_seconds()
    }
}

/// Builds signed access tokens. Constructed once at startup.
pub struct TokenIssuer {
    settings: JwtSettings,
    key: EncodingKey,
}

impl core::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("issuer", &self.settings.issuer)
            .field("audience", &self.settings.audience)
            .field("expiration_hours", &self.settings.expiration_hours)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    /// Fails when the settings could only ever produce unverifiable tokens.
    pub fn new(settings: JwtSettings) -> Result<Self, ConfigError> {
        settings.check()?;
        let key = EncodingKey::from_secret(settings.secret.as_bytes());
        Ok(Self { settings, key })
    }

    pub fn lifetime(&self) -> Duration {
        Duration::hours(self.settings.expiration_hours)
    }

    /// Issue a token for `account` carrying `claims` and one `role` claim per role.
    pub fn issue(
        &self,
        account: &UserAccount,
        claims: &[Claim],
        roles: &[Role],
    ) -> Result<IssuedToken, AuthError> {
        self.issue_at(Utc::now(), Uuid::new_v4(), account, claims, roles)
    }

    /// Deterministic core of [`TokenIssuer::issue`]: identical inputs yield an
    /// identical token.
    pub fn issue_at(
        &self,
        now: DateTime<Utc>,
        token_id: Uuid,
        account: &UserAccount,
        claims: &[Claim],
        roles: &[Role],
    ) -> Result<IssuedToken, AuthError> {
        // JWT timestamps have second precision.
        let iat = now.timestamp();
        let issued_at = DateTime::<Utc>::from_timestamp(iat, 0).unwrap_or(now);
        let expires_at = issued_at + self.lifetime();

        let mut payload = JwtClaims {
            sub: account.id,
            email: account.email.clone(),
            jti: token_id,
            iss: self.settings.issuer.clone(),
            aud: self.settings.audience.clone(),
            nbf: iat,
            iat,
            exp: expires_at.timestamp(),
            role: roles.iter().map(|r| r.as_str().to_string()).collect(),
            custom: Default::default(),
        };

        let mut embedded: Vec<Claim> = Vec::with_capacity(claims.len() + 5 + roles.len());
        for claim in claims {
            if claim_types::is_reserved(&claim.claim_type) {
                tracing::debug!(claim_type = %claim.claim_type, "skipping claim that shadows a registered claim");
                continue;
            }
            payload
                .custom
                .entry(claim.claim_type.clone())
                .or_default()
                .push(claim.value.clone());
            embedded.push(claim.clone());
        }
        embedded.push(Claim::new(claim_types::SUBJECT, account.id.to_string()));
        embedded.push(Claim::new(claim_types::EMAIL, account.email.clone()));
        embedded.push(Claim::new(claim_types::TOKEN_ID, token_id.to_string()));
        embedded.push(Claim::new(claim_types::NOT_BEFORE, iat.to_string()));
        embedded.push(Claim::new(claim_types::ISSUED_AT, iat.to_string()));
        embedded.extend(roles.iter().map(|r| Claim::new(claim_types::ROLE, r.as_str())));

        let access_token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &payload, &self.key)
            .map_err(|e| AuthError::Crypto(format!("JWT encode: {e}")))?;

        Ok(IssuedToken {
            access_token,
            token_id,
            subject: account.id,
            email: account.email.clone(),
            claims: embedded,
            issuer: self.settings.issuer.clone(),
            audience: self.settings.audience.clone(),
            issued_at,
            not_before: issued_at,
            expires_at,
        })
    }
}

/// Verifies bearer tokens and rebuilds the caller's [`Principal`].
pub trait JwtValidator: Send + Sync {
    fn validate(&self, token: &str) -> Result<Principal, AuthError>;
}

/// Stateless HS256 validator: needs only the shared secret/issuer/audience.
pub struct Hs256JwtValidator {
    key: DecodingKey,
    validation: Validation,
}

impl Hs256JwtValidator {
    pub fn new(settings: &JwtSettings) -> Result<Self, ConfigError> {
        settings.check()?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&settings.issuer]);
        validation.set_audience(&[&settings.audience]);
        validation.validate_nbf = true;
        validation.set_required_spec_claims(&["exp", "nbf", "sub", "iss", "aud"]);

        Ok(Self {
            key: DecodingKey::from_secret(settings.secret.as_bytes()),
            validation,
        })
    }

    pub fn decode(&self, token: &str) -> Result<JwtClaims, AuthError> {
        jsonwebtoken::decode::<JwtClaims>(token, &self.key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::TokenInvalid(e.to_string()),
            })
    }
}

impl JwtValidator for Hs256JwtValidator {
    fn validate(&self, token: &str) -> Result<Principal, AuthError> {
        let claims = self.decode(token)?;
        Ok(Principal::new(claims.sub, claims.email.clone(), claims.to_claims()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> JwtSettings {
        JwtSettings {
            secret: "an-hs256-secret-of-at-least-32-bytes!".into(),
            issuer: "supplyhub".into(),
            audience: "https://localhost".into(),
            expiration_hours: 2,
        }
    }

    fn account() -> UserAccount {
        UserAccount {
            id: UserId::new(),
            email: "a@x.com".into(),
        }
    }

    #[test]
    fn new_rejects_short_secret() {
        let s = JwtSettings { secret: "too-short".into(), ..settings() };
        assert!(matches!(TokenIssuer::new(s), Err(ConfigError::SecretTooShort { .. })));
    }

    #[test]
    fn new_rejects_zero_lifetime() {
        let s = JwtSettings { expiration_hours: 0, ..settings() };
        assert!(matches!(TokenIssuer::new(s), Err(ConfigError::NonPositiveLifetime(0))));
    }

    #[test]
    fn expiry_is_issued_at_plus_lifetime() {
        let issuer = TokenIssuer::new(settings()).unwrap();
        let token = issuer.issue(&account(), &[], &[]).unwrap();
        assert_eq!(token.expires_at, token.issued_at + Duration::hours(2));
        assert_eq!(token.not_before, token.issued_at);
        assert_eq!(token.expires_in_seconds(), 7200);
    }

    #[test]
    fn one_role_claim_per_role() {
        let issuer = TokenIssuer::new(settings()).unwrap();
        let roles = [Role::new("Admin"), Role::new("Buyer")];
        let token = issuer.issue(&account(), &[], &roles).unwrap();

        let role_claims: Vec<_> = token
            .claims
            .iter()
            .filter(|c| c.claim_type == claim_types::ROLE)
            .map(|c| c.value.as_str())
            .collect();
        assert_eq!(role_claims, vec!["Admin", "Buyer"]);
    }

    #[test]
    fn claim_set_order_is_input_then_registered_then_roles() {
        let issuer = TokenIssuer::new(settings()).unwrap();
        let token = issuer
            .issue(&account(), &[Claim::new("Produto", "Adicionar")], &[Role::new("Admin")])
            .unwrap();

        let types: Vec<_> = token.claims.iter().map(|c| c.claim_type.as_str()).collect();
        assert_eq!(types, vec!["Produto", "sub", "email", "jti", "nbf", "iat", "role"]);
    }

    #[test]
    fn reserved_claims_cannot_be_shadowed() {
        let issuer = TokenIssuer::new(settings()).unwrap();
        let acct = account();
        let token = issuer
            .issue(&acct, &[Claim::new("sub", "someone-else")], &[])
            .unwrap();

        let subs: Vec<_> = token.claims.iter().filter(|c| c.claim_type == "sub").collect();
        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0].value, acct.id.to_string());
    }

    #[test]
    fn token_ids_are_unique_per_call() {
        let issuer = TokenIssuer::new(settings()).unwrap();
        let acct = account();
        let t1 = issuer.issue(&acct, &[], &[]).unwrap();
        let t2 = issuer.issue(&acct, &[], &[]).unwrap();
        assert_ne!(t1.token_id, t2.token_id);
        assert_ne!(t1.access_token, t2.access_token);
    }

    #[test]
    fn signing_is_deterministic_for_identical_inputs() {
        let issuer = TokenIssuer::new(settings()).unwrap();
        let acct = account();
        let now = Utc::now();
        let id = Uuid::new_v4();
        let t1 = issuer.issue_at(now, id, &acct, &[], &[]).unwrap();
        let t2 = issuer.issue_at(now, id, &acct, &[], &[]).unwrap();
        assert_eq!(t1, t2);
    }

    #[test]
    fn validator_reproduces_principal() {
        let issuer = TokenIssuer::new(settings()).unwrap();
        let validator = Hs256JwtValidator::new(&settings()).unwrap();
        let acct = account();
        let token = issuer
            .issue(&acct, &[Claim::new("Produto", "Adicionar")], &[Role::new("Admin")])
            .unwrap();

        let principal = validator.validate(&token.access_token).unwrap();
        assert_eq!(principal.user_id, acct.id);
        assert_eq!(principal.email, "a@x.com");
        assert!(principal.is_in_role("Admin"));
        assert!(principal.has_claim("Produto", "Adicionar"));
    }

    #[test]
    fn validator_rejects_foreign_secret() {
        let other = JwtSettings {
            secret: "a-completely-different-32-byte-secret".into(),
            ..settings()
        };
        let token = TokenIssuer::new(other).unwrap().issue(&account(), &[], &[]).unwrap();
        let validator = Hs256JwtValidator::new(&settings()).unwrap();
        assert!(matches!(validator.validate(&token.access_token), Err(AuthError::TokenInvalid(_))));
    }

    #[test]
    fn validator_rejects_wrong_audience() {
        let other = JwtSettings { audience: "https://elsewhere".into(), ..settings() };
        let token = TokenIssuer::new(other).unwrap().issue(&account(), &[], &[]).unwrap();
        let validator = Hs256JwtValidator::new(&settings()).unwrap();
        assert!(validator.validate(&token.access_token).is_err());
    }

    #[test]
    fn validator_rejects_expired_token() {
        let issuer = TokenIssuer::new(settings()).unwrap();
        let token = issuer
            .issue_at(Utc::now() - Duration::hours(3), Uuid::new_v4(), &account(), &[], &[])
            .unwrap();
        let validator = Hs256JwtValidator::new(&settings()).unwrap();
        assert!(matches!(validator.validate(&token.access_token), Err(AuthError::TokenExpired)));
    }
}

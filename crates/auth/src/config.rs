//! Authentication configuration.

use serde::Deserialize;
use thiserror::Error;
use validator::Validate;

/// Minimum HS256 key size in bytes (256 bits).
pub const MIN_SECRET_BYTES: usize = 32;

/// Token signing/verification settings, shared by issuer and validator.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct JwtSettings {
    /// Symmetric HS256 secret.
    #[validate(length(min = 32, message = "jwt secret must be at least 32 bytes"))]
    pub secret: String,
    /// `iss` claim.
    #[validate(length(min = 1))]
    pub issuer: String,
    /// `aud` claim.
    #[validate(length(min = 1))]
    pub audience: String,
    /// Token lifetime in hours.
    #[validate(range(min = 1, message = "token lifetime must be positive"))]
    pub expiration_hours: i64,
}

impl JwtSettings {
    /// Fail fast on settings that would produce unusable tokens.
    ///
    /// The byte length is checked here as well as by the derive: `validator`
    /// counts characters, HS256 cares about bytes.
    pub fn check(&self) -> Result<(), ConfigError> {
        if self.secret.is_empty() {
            return Err(ConfigError::MissingSecret);
        }
        if self.secret.len() < MIN_SECRET_BYTES {
            return Err(ConfigError::SecretTooShort {
                min: MIN_SECRET_BYTES,
                actual: self.secret.len(),
            });
        }
        if self.expiration_hours <= 0 {
            return Err(ConfigError::NonPositiveLifetime(self.expiration_hours));
        }
        if self.issuer.trim().is_empty() {
            return Err(ConfigError::Missing("issuer"));
        }
        if self.audience.trim().is_empty() {
            return Err(ConfigError::Missing("audience"));
        }
        self.validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))
    }
}

/// Lockout after repeated failed sign-ins.
#[derive(Debug, Clone, Copy, Deserialize, Validate)]
pub struct LockoutSettings {
    #[validate(range(min = 1))]
    pub max_failed_attempts: u32,
    #[validate(range(min = 1))]
    pub lockout_minutes: i64,
}

impl Default for LockoutSettings {
    fn default() -> Self {
        Self {
            max_failed_attempts: 5,
            lockout_minutes: 5,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("jwt secret is not configured")]
    MissingSecret,

    #[error("jwt secret must be at least {min} bytes (got {actual})")]
    SecretTooShort { min: usize, actual: usize },

    #[error("token lifetime must be a positive number of hours (got {0})")]
    NonPositiveLifetime(i64),

    #[error("jwt {0} is not configured")]
    Missing(&'static str),

    #[error("invalid auth configuration: {0}")]
    Invalid(String),
}

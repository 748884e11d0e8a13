use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use supplyhub_core::UserId;

/// Registered claim type names used by issued tokens.
pub mod claim_types {
    pub const SUBJECT: &str = "sub";
    pub const EMAIL: &str = "email";
    pub const TOKEN_ID: &str = "jti";
    pub const NOT_BEFORE: &str = "nbf";
    pub const ISSUED_AT: &str = "iat";
    pub const ROLE: &str = "role";

    /// Claim types the issuer owns; user-supplied claims may not shadow them.
    pub const RESERVED: &[&str] = &[
        SUBJECT, EMAIL, TOKEN_ID, NOT_BEFORE, ISSUED_AT, ROLE, "exp", "iss", "aud",
    ];

    pub fn is_reserved(claim_type: &str) -> bool {
        RESERVED.contains(&claim_type)
    }
}

/// A typed assertion about an identity, e.g. `("role", "Admin")` or
/// `("Produto", "Adicionar,Atualizar")`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Claim {
    #[serde(rename = "type")]
    pub claim_type: String,
    pub value: String,
}

impl Claim {
    pub fn new(claim_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            claim_type: claim_type.into(),
            value: value.into(),
        }
    }
}

/// JWT payload as it travels on the wire.
///
/// Custom claims are grouped by type so that repeated types (several values
/// for the same resource) survive the JSON object encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: UserId,
    pub email: String,
    pub jti: Uuid,
    pub iss: String,
    pub aud: String,
    pub nbf: i64,
    pub iat: i64,
    pub exp: i64,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub role: Vec<String>,

    #[serde(flatten)]
    pub custom: BTreeMap<String, Vec<String>>,
}

impl JwtClaims {
    /// Flatten the payload back into the claim list a principal carries.
    ///
    /// Order: custom claims (by type), then the registered claims, then roles.
    pub fn to_claims(&self) -> Vec<Claim> {
        let mut claims: Vec<Claim> = self
            .custom
            .iter()
            .flat_map(|(t, values)| values.iter().map(move |v| Claim::new(t.clone(), v.clone())))
            .collect();

        claims.push(Claim::new(claim_types::SUBJECT, self.sub.to_string()));
        claims.push(Claim::new(claim_types::EMAIL, self.email.clone()));
        claims.push(Claim::new(claim_types::TOKEN_ID, self.jti.to_string()));
        claims.push(Claim::new(claim_types::NOT_BEFORE, self.nbf.to_string()));
        claims.push(Claim::new(claim_types::ISSUED_AT, self.iat.to_string()));
        claims.extend(self.role.iter().map(|r| Claim::new(claim_types::ROLE, r.clone())));
        claims
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> JwtClaims {
        let mut custom = BTreeMap::new();
        custom.insert("Produto".to_string(), vec!["Adicionar".to_string(), "Excluir".to_string()]);
        JwtClaims {
            sub: UserId::new(),
            email: "a@x.com".into(),
            jti: Uuid::new_v4(),
            iss: "issuer".into(),
            aud: "audience".into(),
            nbf: 10,
            iat: 10,
            exp: 20,
            role: vec!["Admin".into()],
            custom,
        }
    }

    #[test]
    fn custom_claims_flatten_into_payload() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["Produto"], serde_json::json!(["Adicionar", "Excluir"]));
        assert_eq!(json["role"], serde_json::json!(["Admin"]));
    }

    #[test]
    fn payload_deserializes_back() {
        let claims = sample();
        let json = serde_json::to_string(&claims).unwrap();
        let back: JwtClaims = serde_json::from_str(&json).unwrap();
        assert_eq!(back, claims);
    }

    #[test]
    fn to_claims_keeps_repeated_types() {
        let claims = sample().to_claims();
        let produto: Vec<_> = claims.iter().filter(|c| c.claim_type == "Produto").collect();
        assert_eq!(produto.len(), 2);
        assert!(claims.iter().any(|c| c.claim_type == "role" && c.value == "Admin"));
        assert!(claims.iter().any(|c| c.claim_type == "email" && c.value == "a@x.com"));
    }
}

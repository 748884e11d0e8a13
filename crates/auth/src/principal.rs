use supplyhub_core::UserId;

use crate::claims::{claim_types, Claim};

/// An authenticated caller, as reconstructed from a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: UserId,
    pub email: String,
    pub claims: Vec<Claim>,
}

impl Principal {
    pub fn new(user_id: UserId, email: impl Into<String>, claims: Vec<Claim>) -> Self {
        Self {
            user_id,
            email: email.into(),
            claims,
        }
    }

    pub fn has_claim(&self, claim_type: &str, value: &str) -> bool {
        self.claims
            .iter()
            .any(|c| c.claim_type == claim_type && c.value == value)
    }

    pub fn is_in_role(&self, role: &str) -> bool {
        self.has_claim(claim_types::ROLE, role)
    }

    pub fn roles(&self) -> impl Iterator<Item = &str> {
        self.claims
            .iter()
            .filter(|c| c.claim_type == claim_types::ROLE)
            .map(|c| c.value.as_str())
    }
}

/// Who is calling: nobody we know, or a verified principal.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Identity {
    #[default]
    Anonymous,
    Authenticated(Principal),
}

impl Identity {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Identity::Authenticated(_))
    }

    pub fn principal(&self) -> Option<&Principal> {
        match self {
            Identity::Authenticated(p) => Some(p),
            Identity::Anonymous => None,
        }
    }
}

//! Optional administrator account provisioned at startup.

use supplyhub_auth::{Claim, IdentityErrors, IdentityStore};

use crate::authz::requirements;
use crate::config::BootstrapSettings;

/// One claim per resource listing every action, e.g.
/// `("Fornecedor", "Adicionar,Atualizar,Excluir")`.
pub fn catalog_claims() -> Vec<Claim> {
    let mut claims: Vec<Claim> = Vec::new();
    for requirement in requirements::all() {
        match claims.iter_mut().find(|c| c.claim_type == requirement.resource()) {
            Some(claim) => {
                claim.value.push(',');
                claim.value.push_str(requirement.action());
            }
            None => claims.push(Claim::new(requirement.resource(), requirement.action())),
        }
    }
    claims
}

/// Create the admin account unless it already exists.
pub async fn seed_admin(
    store: &dyn IdentityStore,
    settings: &BootstrapSettings,
) -> Result<(), IdentityErrors> {
    if store.find_by_email(&settings.admin_email).await?.is_some() {
        tracing::info!("bootstrap admin already present");
        return Ok(());
    }

    let account = store
        .create_user(&settings.admin_email, &settings.admin_password)
        .await?;
    for claim in catalog_claims() {
        store.add_claim(&account, claim).await?;
    }
    tracing::info!(user_id = %account.id, "bootstrap admin created");
    Ok(())
}

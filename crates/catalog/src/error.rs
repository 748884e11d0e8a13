use thiserror::Error;

use crate::repository::{ImageStoreError, RepositoryError};

/// Infrastructure faults surfaced by the catalog services.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Image(#[from] ImageStoreError),
}

impl CatalogError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Repository(RepositoryError::NotFound))
    }
}

//! Persistence contracts for the catalog.
//!
//! Implementations live in `supplyhub-infra`. Services hold them as trait
//! objects (`Arc<dyn SupplierRepository>` etc.) so the backing store can be
//! swapped without touching business logic.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use supplyhub_core::{Entity, ProductId, SupplierId};

use crate::product::{Product, ProductDetails};
use crate::supplier::{Address, Supplier, SupplierDetails};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,

    #[error("record already exists")]
    Duplicate,

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Predicate passed to [`Repository::find`].
pub type Predicate<'a, T> = &'a (dyn Fn(&T) -> bool + Send + Sync);

/// Generic CRUD over one entity type.
#[async_trait]
pub trait Repository<T>: Send + Sync
where
    T: Entity + Send + Sync + 'static,
{
    async fn get_all(&self) -> Result<Vec<T>, RepositoryError>;

    async fn get_by_id(&self, id: T::Id) -> Result<Option<T>, RepositoryError>;

    /// Insert a new record; `Duplicate` if the id is taken.
    async fn add(&self, entity: T) -> Result<(), RepositoryError>;

    /// Replace an existing record; `NotFound` if absent.
    async fn update(&self, entity: T) -> Result<(), RepositoryError>;

    /// Delete by id; `NotFound` if absent.
    async fn remove(&self, id: T::Id) -> Result<(), RepositoryError>;

    async fn find(&self, predicate: Predicate<'_, T>) -> Result<Vec<T>, RepositoryError>;
}

#[async_trait]
pub trait SupplierRepository: Repository<Supplier> {
    /// Supplier with its address attached.
    async fn get_with_address(&self, id: SupplierId) -> Result<Option<Supplier>, RepositoryError>;

    async fn get_with_products_and_address(
        &self,
        id: SupplierId,
    ) -> Result<Option<SupplierDetails>, RepositoryError>;
}

#[async_trait]
pub trait AddressRepository: Repository<Address> {
    async fn get_by_supplier(&self, supplier_id: SupplierId) -> Result<Option<Address>, RepositoryError>;
}

#[async_trait]
pub trait ProductRepository: Repository<Product> {
    async fn get_by_supplier(&self, supplier_id: SupplierId) -> Result<Vec<Product>, RepositoryError>;

    async fn get_with_supplier(&self, id: ProductId) -> Result<Option<ProductDetails>, RepositoryError>;

    /// Every product with its supplier, ordered by name.
    async fn list_with_suppliers(&self) -> Result<Vec<ProductDetails>, RepositoryError>;
}

#[derive(Debug, Error)]
pub enum ImageStoreError {
    #[error("file already exists: {0}")]
    AlreadyExists(String),

    #[error("invalid file name: {0}")]
    InvalidName(String),

    #[error("image storage I/O: {0}")]
    Io(#[from] std::io::Error),
}

/// Write-once storage for product images.
#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn exists(&self, file_name: &str) -> Result<bool, ImageStoreError>;

    /// Store `bytes` under `file_name`. Never overwrites.
    async fn save(&self, file_name: &str, bytes: &[u8]) -> Result<(), ImageStoreError>;
}

#[async_trait]
impl<S: ImageStore + ?Sized> ImageStore for Arc<S> {
    async fn exists(&self, file_name: &str) -> Result<bool, ImageStoreError> {
        (**self).exists(file_name).await
    }

    async fn save(&self, file_name: &str, bytes: &[u8]) -> Result<(), ImageStoreError> {
        (**self).save(file_name, bytes).await
    }
}

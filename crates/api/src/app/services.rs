//! Service wiring: collaborators in, shared application services out.

use std::sync::Arc;

use supplyhub_auth::{AccountService, IdentityStore, InMemoryIdentityStore, TokenIssuer};
use supplyhub_catalog::{
    AddressRepository, ImageStore, ProductRepository, ProductService, SupplierRepository,
    SupplierService,
};
use supplyhub_infra::{
    InMemoryAddressRepository, InMemoryDatabase, InMemoryProductRepository,
    InMemorySupplierRepository, LocalImageStore,
};

use crate::config::AppConfig;

/// Persistence and identity collaborators the application runs against.
#[derive(Clone)]
pub struct Collaborators {
    pub identities: Arc<dyn IdentityStore>,
    pub suppliers: Arc<dyn SupplierRepository>,
    pub addresses: Arc<dyn AddressRepository>,
    pub products: Arc<dyn ProductRepository>,
    pub images: Arc<dyn ImageStore>,
}

impl Collaborators {
    /// In-memory stores sharing one database; images on local disk.
    pub fn in_memory(config: &AppConfig) -> Self {
        Self::in_memory_with_images(config, Arc::new(LocalImageStore::new(&config.storage.image_dir)))
    }

    pub fn in_memory_with_images(config: &AppConfig, images: Arc<dyn ImageStore>) -> Self {
        let db = Arc::new(InMemoryDatabase::new());
        Self {
            identities: Arc::new(InMemoryIdentityStore::new(config.identity)),
            suppliers: Arc::new(InMemorySupplierRepository::new(db.clone())),
            addresses: Arc::new(InMemoryAddressRepository::new(db.clone())),
            products: Arc::new(InMemoryProductRepository::new(db)),
            images,
        }
    }
}

/// Application services shared by every request (read-only after startup).
pub struct AppServices {
    pub accounts: AccountService<dyn IdentityStore>,
    pub identities: Arc<dyn IdentityStore>,
    pub suppliers: SupplierService,
    pub products: ProductService,
    pub supplier_repo: Arc<dyn SupplierRepository>,
    pub address_repo: Arc<dyn AddressRepository>,
    pub product_repo: Arc<dyn ProductRepository>,
}

impl AppServices {
    pub fn new(collaborators: Collaborators, issuer: Arc<TokenIssuer>) -> Self {
        let Collaborators {
            identities,
            suppliers,
            addresses,
            products,
            images,
        } = collaborators;

        Self {
            accounts: AccountService::new(identities.clone(), issuer),
            identities,
            suppliers: SupplierService::new(suppliers.clone(), addresses.clone(), products.clone()),
            products: ProductService::new(products.clone(), suppliers.clone(), images),
            supplier_repo: suppliers,
            address_repo: addresses,
            product_repo: products,
        }
    }
}

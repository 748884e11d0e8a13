//! Catalog domain module (suppliers, addresses, products).
//!
//! Entities and their validation rules are pure; the application services
//! enforce business invariants, record violations on the request's
//! [`supplyhub_core::Notifier`], and delegate persistence to the repository
//! traits declared here.

pub mod document;
pub mod error;
pub mod product;
pub mod product_service;
pub mod repository;
pub mod supplier;
pub mod supplier_service;
mod rules;

pub use document::{is_valid_cnpj, is_valid_cpf};
pub use error::CatalogError;
pub use product::{Product, ProductDetails};
pub use product_service::{ImageUpload, ProductService};
pub use repository::{
    AddressRepository, ImageStore, ImageStoreError, Predicate, ProductRepository, Repository,
    RepositoryError, SupplierRepository,
};
pub use supplier::{Address, Supplier, SupplierDetails, SupplierKind};
pub use supplier_service::SupplierService;

//! In-memory persistence for the catalog.
//!
//! One [`InMemoryDatabase`] holds every table; the repositories are thin views
//! over it sharing the same `Arc`, so joins (supplier + address + products)
//! see a consistent set of tables.

mod repositories;
mod table;

use supplyhub_catalog::{Address, Product, Supplier};
use supplyhub_core::{AddressId, ProductId, SupplierId};

pub use repositories::{
    InMemoryAddressRepository, InMemoryProductRepository, InMemorySupplierRepository,
};
pub use table::InMemoryTable;

#[derive(Debug, Default)]
pub struct InMemoryDatabase {
    /// Suppliers are stored without their address; it lives in `addresses`.
    pub suppliers: InMemoryTable<SupplierId, Supplier>,
    pub addresses: InMemoryTable<AddressId, Address>,
    pub products: InMemoryTable<ProductId, Product>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }
}

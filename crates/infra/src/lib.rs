//! Infrastructure layer: collaborator implementations for the catalog.

pub mod images;
pub mod memory;

pub use images::{InMemoryImageStore, LocalImageStore};
pub use memory::{
    InMemoryAddressRepository, InMemoryDatabase, InMemoryProductRepository,
    InMemorySupplierRepository, InMemoryTable,
};

#[cfg(test)]
mod integration_tests;

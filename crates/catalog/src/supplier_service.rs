use std::sync::Arc;

use supplyhub_core::{Notifier, SupplierId};

use crate::error::CatalogError;
use crate::repository::{AddressRepository, ProductRepository, SupplierRepository};
use crate::supplier::{Address, Supplier};

pub const DUPLICATE_DOCUMENT: &str = "A supplier with this document already exists.";
pub const HAS_PRODUCTS: &str = "The supplier has registered products!";
pub const ADDRESS_REQUIRED: &str = "The supplier address must be provided.";
pub const SUPPLIER_EXISTS: &str = "A supplier with this id already exists.";
pub const ADDRESS_EXISTS: &str = "An address with this id already exists.";

/// Supplier application service.
///
/// Business-rule violations go to the caller's [`Notifier`]; `Err` is
/// reserved for storage faults and missing records.
#[derive(Clone)]
pub struct SupplierService {
    suppliers: Arc<dyn SupplierRepository>,
    addresses: Arc<dyn AddressRepository>,
    products: Arc<dyn ProductRepository>,
}

impl SupplierService {
    pub fn new(
        suppliers: Arc<dyn SupplierRepository>,
        addresses: Arc<dyn AddressRepository>,
        products: Arc<dyn ProductRepository>,
    ) -> Self {
        Self {
            suppliers,
            addresses,
            products,
        }
    }

    /// Register a supplier together with its address.
    ///
    /// Returns `false` (with notifications) when nothing was persisted.
    pub async fn add(&self, notifier: &mut Notifier, mut supplier: Supplier) -> Result<bool, CatalogError> {
        let supplier_ok = supplier.validate(notifier);
        let address = match supplier.address.take() {
            Some(mut address) => {
                address.supplier_id = supplier.id;
                address.validate(notifier).then_some(address)
            }
            None => {
                notifier.notify(ADDRESS_REQUIRED);
                None
            }
        };
        let Some(address) = address.filter(|_| supplier_ok) else {
            return Ok(false);
        };

        // Both rows must be insertable before either is written.
        let mut free = true;
        if self.suppliers.get_by_id(supplier.id).await?.is_some() {
            notifier.notify(SUPPLIER_EXISTS);
            free = false;
        }
        if self.addresses.get_by_id(address.id).await?.is_some() {
            notifier.notify(ADDRESS_EXISTS);
            free = false;
        }
        if !free {
            return Ok(false);
        }

        if self.document_taken(&supplier.document, None).await? {
            notifier.notify(DUPLICATE_DOCUMENT);
            return Ok(false);
        }

        let supplier_id = supplier.id;
        self.suppliers.add(supplier).await?;
        self.addresses.add(address).await?;
        tracing::info!(%supplier_id, "supplier registered");
        Ok(true)
    }

    /// Update the supplier's own fields. The address is left untouched.
    pub async fn update(&self, notifier: &mut Notifier, mut supplier: Supplier) -> Result<bool, CatalogError> {
        supplier.address = None;
        if !supplier.validate(notifier) {
            return Ok(false);
        }

        if self.document_taken(&supplier.document, Some(supplier.id)).await? {
            notifier.notify(DUPLICATE_DOCUMENT);
            return Ok(false);
        }

        self.suppliers.update(supplier).await?;
        Ok(true)
    }

    pub async fn update_address(&self, notifier: &mut Notifier, address: Address) -> Result<bool, CatalogError> {
        if !address.validate(notifier) {
            return Ok(false);
        }

        self.addresses.update(address).await?;
        Ok(true)
    }

    /// Delete a supplier and its address. Refused while products reference it.
    pub async fn remove(&self, notifier: &mut Notifier, id: SupplierId) -> Result<bool, CatalogError> {
        if !self.products.get_by_supplier(id).await?.is_empty() {
            notifier.notify(HAS_PRODUCTS);
            return Ok(false);
        }

        if let Some(address) = self.addresses.get_by_supplier(id).await? {
            self.addresses.remove(address.id).await?;
        }
        self.suppliers.remove(id).await?;
        tracing::info!(supplier_id = %id, "supplier removed");
        Ok(true)
    }

    async fn document_taken(&self, document: &str, except: Option<SupplierId>) -> Result<bool, CatalogError> {
        let document = document.to_string();
        let matches = self
            .suppliers
            .find(&move |s: &Supplier| s.document == document && Some(s.id) != except)
            .await?;
        Ok(!matches.is_empty())
    }
}

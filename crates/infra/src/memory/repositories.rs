use std::sync::Arc;

use async_trait::async_trait;

use supplyhub_catalog::{
    Address, AddressRepository, Predicate, Product, ProductDetails, ProductRepository, Repository,
    RepositoryError, Supplier, SupplierDetails, SupplierRepository,
};
use supplyhub_core::{Entity, ProductId, SupplierId};

use super::InMemoryDatabase;

/// Generic CRUD over one table of the shared database.
macro_rules! impl_table_repository {
    ($repo:ident, $entity:ty, $table:ident) => {
        #[derive(Debug, Clone)]
        pub struct $repo {
            db: Arc<InMemoryDatabase>,
        }

        impl $repo {
            pub fn new(db: Arc<InMemoryDatabase>) -> Self {
                Self { db }
            }
        }

        #[async_trait]
        impl Repository<$entity> for $repo {
            async fn get_all(&self) -> Result<Vec<$entity>, RepositoryError> {
                self.db.$table.list()
            }

            async fn get_by_id(
                &self,
                id: <$entity as Entity>::Id,
            ) -> Result<Option<$entity>, RepositoryError> {
                self.db.$table.get(&id)
            }

            async fn add(&self, entity: $entity) -> Result<(), RepositoryError> {
                let entity = Self::stored(entity);
                self.db.$table.insert(entity.id(), entity)
            }

            async fn update(&self, entity: $entity) -> Result<(), RepositoryError> {
                let entity = Self::stored(entity);
                self.db.$table.replace(entity.id(), entity)
            }

            async fn remove(&self, id: <$entity as Entity>::Id) -> Result<(), RepositoryError> {
                self.db.$table.remove(&id).map(|_| ())
            }

            async fn find(
                &self,
                predicate: Predicate<'_, $entity>,
            ) -> Result<Vec<$entity>, RepositoryError> {
                self.db.$table.filter(predicate)
            }
        }
    };
}

impl_table_repository!(InMemorySupplierRepository, Supplier, suppliers);
impl_table_repository!(InMemoryAddressRepository, Address, addresses);
impl_table_repository!(InMemoryProductRepository, Product, products);

impl InMemorySupplierRepository {
    /// Addresses are owned by the address table.
    fn stored(mut supplier: Supplier) -> Supplier {
        supplier.address = None;
        supplier
    }
}

impl InMemoryAddressRepository {
    fn stored(address: Address) -> Address {
        address
    }
}

impl InMemoryProductRepository {
    fn stored(product: Product) -> Product {
        product
    }
}

fn address_of(db: &InMemoryDatabase, supplier_id: SupplierId) -> Result<Option<Address>, RepositoryError> {
    Ok(db
        .addresses
        .filter(|a| a.supplier_id == supplier_id)?
        .into_iter()
        .next())
}

#[async_trait]
impl SupplierRepository for InMemorySupplierRepository {
    async fn get_with_address(&self, id: SupplierId) -> Result<Option<Supplier>, RepositoryError> {
        let Some(mut supplier) = self.db.suppliers.get(&id)? else {
            return Ok(None);
        };
        supplier.address = address_of(&self.db, id)?;
        Ok(Some(supplier))
    }

    async fn get_with_products_and_address(
        &self,
        id: SupplierId,
    ) -> Result<Option<SupplierDetails>, RepositoryError> {
        let Some(supplier) = self.get_with_address(id).await? else {
            return Ok(None);
        };
        let mut products = self.db.products.filter(|p| p.supplier_id == id)?;
        products.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(Some(SupplierDetails { supplier, products }))
    }
}

#[async_trait]
impl AddressRepository for InMemoryAddressRepository {
    async fn get_by_supplier(&self, supplier_id: SupplierId) -> Result<Option<Address>, RepositoryError> {
        address_of(&self.db, supplier_id)
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn get_by_supplier(&self, supplier_id: SupplierId) -> Result<Vec<Product>, RepositoryError> {
        self.db.products.filter(|p| p.supplier_id == supplier_id)
    }

    async fn get_with_supplier(&self, id: ProductId) -> Result<Option<ProductDetails>, RepositoryError> {
        let Some(product) = self.db.products.get(&id)? else {
            return Ok(None);
        };
        let supplier = self.db.suppliers.get(&product.supplier_id)?;
        Ok(Some(ProductDetails { product, supplier }))
    }

    async fn list_with_suppliers(&self) -> Result<Vec<ProductDetails>, RepositoryError> {
        let mut products = self.db.products.list()?;
        products.sort_by(|a, b| a.name.cmp(&b.name));
        products
            .into_iter()
            .map(|product| {
                let supplier = self.db.suppliers.get(&product.supplier_id)?;
                Ok(ProductDetails { product, supplier })
            })
            .collect()
    }
}

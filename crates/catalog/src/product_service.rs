use std::sync::Arc;

use supplyhub_core::{Notifier, ProductId};

use crate::error::CatalogError;
use crate::product::Product;
use crate::repository::{ImageStore, ImageStoreError, ProductRepository, RepositoryError, SupplierRepository};

pub const UNKNOWN_SUPPLIER: &str = "The informed supplier does not exist.";
pub const IMAGE_REQUIRED: &str = "Provide an image for this product!";
pub const IMAGE_EXISTS: &str = "A file with this name already exists!";
pub const PRODUCT_EXISTS: &str = "A product with this id already exists.";

/// Decoded image upload, already carrying its final file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Clone)]
pub struct ProductService {
    products: Arc<dyn ProductRepository>,
    suppliers: Arc<dyn SupplierRepository>,
    images: Arc<dyn ImageStore>,
}

impl ProductService {
    pub fn new(
        products: Arc<dyn ProductRepository>,
        suppliers: Arc<dyn SupplierRepository>,
        images: Arc<dyn ImageStore>,
    ) -> Self {
        Self {
            products,
            suppliers,
            images,
        }
    }

    /// Register a product. The image is written only after every rule
    /// passed and the id is known to be free, and before the product row.
    pub async fn add(
        &self,
        notifier: &mut Notifier,
        mut product: Product,
        upload: ImageUpload,
    ) -> Result<bool, CatalogError> {
        product.image = upload.file_name.clone();
        if !self.check(notifier, &product).await? {
            return Ok(false);
        }
        if self.products.get_by_id(product.id).await?.is_some() {
            notifier.notify(PRODUCT_EXISTS);
            return Ok(false);
        }
        if !self.store_image(notifier, &upload.bytes, &upload.file_name).await? {
            return Ok(false);
        }

        let product_id = product.id;
        self.products.add(product).await?;
        tracing::info!(%product_id, "product registered");
        Ok(true)
    }

    /// Update a product. Without an upload the stored image name is kept.
    pub async fn update(
        &self,
        notifier: &mut Notifier,
        mut product: Product,
        upload: Option<ImageUpload>,
    ) -> Result<bool, CatalogError> {
        let existing = self
            .products
            .get_by_id(product.id)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        product.registered_at = existing.registered_at;
        product.image = match &upload {
            Some(upload) => upload.file_name.clone(),
            None => existing.image,
        };
        if !self.check(notifier, &product).await? {
            return Ok(false);
        }
        if let Some(upload) = upload {
            if !self.store_image(notifier, &upload.bytes, &upload.file_name).await? {
                return Ok(false);
            }
        }

        self.products.update(product).await?;
        Ok(true)
    }

    pub async fn remove(&self, id: ProductId) -> Result<(), CatalogError> {
        self.products.remove(id).await?;
        tracing::info!(product_id = %id, "product removed");
        Ok(())
    }

    /// Write an uploaded image. Returns `false` (with a notification) for an
    /// empty upload or a name that is already taken.
    pub async fn store_image(
        &self,
        notifier: &mut Notifier,
        upload: &[u8],
        file_name: &str,
    ) -> Result<bool, CatalogError> {
        if upload.is_empty() {
            notifier.notify(IMAGE_REQUIRED);
            return Ok(false);
        }
        if self.images.exists(file_name).await? {
            notifier.notify(IMAGE_EXISTS);
            return Ok(false);
        }

        match self.images.save(file_name, upload).await {
            Ok(()) => Ok(true),
            // Lost a race with a concurrent upload of the same name.
            Err(ImageStoreError::AlreadyExists(_)) => {
                notifier.notify(IMAGE_EXISTS);
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn check(&self, notifier: &mut Notifier, product: &Product) -> Result<bool, CatalogError> {
        let valid = product.validate(notifier);
        if self.suppliers.get_by_id(product.supplier_id).await?.is_none() {
            notifier.notify(UNKNOWN_SUPPLIER);
            return Ok(false);
        }
        Ok(valid)
    }
}

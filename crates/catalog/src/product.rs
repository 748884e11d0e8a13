use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use supplyhub_core::{Entity, Notifier, ProductId, SupplierId};

use crate::rules;
use crate::supplier::Supplier;

/// Product entity. Always belongs to exactly one supplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub supplier_id: SupplierId,
    pub name: String,
    pub description: String,
    /// Stored image file name.
    pub image: String,
    /// Price in smallest currency unit (e.g., cents).
    pub price: u64,
    pub registered_at: DateTime<Utc>,
    pub active: bool,
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> ProductId {
        self.id
    }
}

impl Product {
    pub fn validate(&self, notifier: &mut Notifier) -> bool {
        let name = rules::length_between(notifier, "Name", &self.name, 2, 200);
        let description = rules::length_between(notifier, "Description", &self.description, 2, 1000);
        let price = if self.price == 0 {
            notifier.notify("The field Price must be greater than 0.");
            false
        } else {
            true
        };
        name && description && price
    }
}

/// Read model: a product joined with the supplier it references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDetails {
    pub product: Product,
    pub supplier: Option<Supplier>,
}

impl ProductDetails {
    pub fn supplier_name(&self) -> Option<&str> {
        self.supplier.as_ref().map(|s| s.name.as_str())
    }
}

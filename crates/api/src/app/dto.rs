//! Request/response DTOs and explicit entity mapping.
//!
//! Every field translation is listed by hand. Asymmetries:
//! - `ProductDto::image_upload` is accepted but never returned
//! - `ProductDto::supplier_name` and `SupplierDto::products` are computed on
//!   the way out and ignored on the way in

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use supplyhub_catalog::{Address, Product, ProductDetails, Supplier, SupplierKind};
use supplyhub_core::{AddressId, ProductId, SupplierId};

// -------------------------
// Accounts
// -------------------------

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserDto {
    #[validate(email(message = "The field Email is not a valid e-mail address."))]
    pub email: String,
    #[validate(length(min = 6, max = 100, message = "The field Password must be between 6 and 100 characters."))]
    pub password: String,
    #[validate(must_match(other = "password", message = "The passwords do not match."))]
    pub confirm_password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginUserDto {
    #[validate(email(message = "The field Email is not a valid e-mail address."))]
    pub email: String,
    #[validate(length(min = 1, message = "The field Password must be provided."))]
    pub password: String,
}

// -------------------------
// Suppliers
// -------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddressDto {
    #[serde(default)]
    pub id: Option<AddressId>,
    #[serde(default)]
    pub supplier_id: Option<SupplierId>,
    pub street: String,
    pub number: String,
    #[serde(default)]
    pub complement: Option<String>,
    pub zip_code: String,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SupplierDto {
    #[serde(default)]
    pub id: Option<SupplierId>,
    pub name: String,
    pub document: String,
    /// 1 = individual, 2 = company.
    #[validate(range(min = 1, max = 2, message = "The field Kind must be 1 (individual) or 2 (company)."))]
    pub kind: u8,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    #[validate(nested)]
    pub address: Option<AddressDto>,
    #[serde(default, skip_deserializing)]
    pub products: Vec<ProductDto>,
}

fn default_active() -> bool {
    true
}

// -------------------------
// Products
// -------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    #[serde(default)]
    pub id: Option<ProductId>,
    pub supplier_id: SupplierId,
    pub name: String,
    pub description: String,
    /// Base64 image content. Write-only.
    #[serde(default, skip_serializing)]
    pub image_upload: Option<String>,
    /// Client file name on the way in, stored file name on the way out.
    #[serde(default)]
    #[validate(length(max = 100, message = "The field Image must be at most 100 characters."))]
    pub image: Option<String>,
    pub price: u64,
    #[serde(default, skip_deserializing)]
    pub registered_at: Option<DateTime<Utc>>,
    #[serde(default = "default_active")]
    pub active: bool,
    /// Read-only, from the linked supplier.
    #[serde(default, skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub supplier_name: Option<String>,
}

// -------------------------
// Mapping
// -------------------------

pub fn address_to_dto(address: &Address) -> AddressDto {
    AddressDto {
        id: Some(address.id),
        supplier_id: Some(address.supplier_id),
        street: address.street.clone(),
        number: address.number.clone(),
        complement: address.complement.clone(),
        zip_code: address.zip_code.clone(),
        neighborhood: address.neighborhood.clone(),
        city: address.city.clone(),
        state: address.state.clone(),
    }
}

/// `supplier_id` falls back to the owner when the payload omits it.
pub fn address_from_dto(dto: AddressDto, supplier_id: SupplierId) -> Address {
    Address {
        id: dto.id.unwrap_or_default(),
        supplier_id: dto.supplier_id.unwrap_or(supplier_id),
        street: dto.street,
        number: dto.number,
        complement: dto.complement,
        zip_code: dto.zip_code,
        neighborhood: dto.neighborhood,
        city: dto.city,
        state: dto.state,
    }
}

pub fn supplier_to_dto(supplier: &Supplier, products: &[Product]) -> SupplierDto {
    SupplierDto {
        id: Some(supplier.id),
        name: supplier.name.clone(),
        document: supplier.document.clone(),
        kind: supplier.kind.code(),
        active: supplier.active,
        address: supplier.address.as_ref().map(address_to_dto),
        products: products
            .iter()
            .map(|p| product_to_dto(p, Some(&supplier.name)))
            .collect(),
    }
}

/// A payload without an id maps to a new supplier id. `kind` is range-checked
/// by validation; an out-of-range code maps to `Company`.
pub fn supplier_from_dto(dto: SupplierDto) -> Supplier {
    let id = dto.id.unwrap_or_default();
    Supplier {
        id,
        name: dto.name,
        document: dto.document,
        kind: SupplierKind::from_code(dto.kind).unwrap_or(SupplierKind::Company),
        active: dto.active,
        address: dto.address.map(|a| address_from_dto(a, id)),
    }
}

/// Map a creation payload. Client-sent supplier and address ids are
/// discarded and fresh ones assigned.
pub fn new_supplier_from_dto(mut dto: SupplierDto) -> Supplier {
    dto.id = None;
    if let Some(address) = dto.address.as_mut() {
        address.id = None;
        address.supplier_id = None;
    }
    supplier_from_dto(dto)
}

pub fn product_to_dto(product: &Product, supplier_name: Option<&str>) -> ProductDto {
    ProductDto {
        id: Some(product.id),
        supplier_id: product.supplier_id,
        name: product.name.clone(),
        description: product.description.clone(),
        image_upload: None,
        image: Some(product.image.clone()),
        price: product.price,
        registered_at: Some(product.registered_at),
        active: product.active,
        supplier_name: supplier_name.map(str::to_string),
    }
}

pub fn product_details_to_dto(details: &ProductDetails) -> ProductDto {
    product_to_dto(&details.product, details.supplier_name())
}

/// `image` is the stored file name chosen by the caller (the service may
/// replace it); `registered_at` defaults to now for new products.
pub fn product_from_dto(dto: ProductDto, image: String) -> Product {
    Product {
        id: dto.id.unwrap_or_default(),
        supplier_id: dto.supplier_id,
        name: dto.name,
        description: dto.description,
        image,
        price: dto.price,
        registered_at: dto.registered_at.unwrap_or_else(Utc::now),
        active: dto.active,
    }
}

/// Map a creation payload; a client-sent product id is discarded.
pub fn new_product_from_dto(mut dto: ProductDto, image: String) -> Product {
    dto.id = None;
    product_from_dto(dto, image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn supplier() -> Supplier {
        let id = SupplierId::new();
        Supplier {
            id,
            name: "Acme Ltda".into(),
            document: "11222333000181".into(),
            kind: SupplierKind::Company,
            active: true,
            address: Some(Address {
                id: AddressId::new(),
                supplier_id: id,
                street: "Rua das Flores".into(),
                number: "100".into(),
                complement: None,
                zip_code: "01001000".into(),
                neighborhood: "Centro".into(),
                city: "Sao Paulo".into(),
                state: "SP".into(),
            }),
        }
    }

    fn product(supplier_id: SupplierId) -> Product {
        Product {
            id: ProductId::new(),
            supplier_id,
            name: "Widget".into(),
            description: "A useful thing".into(),
            image: "0000_widget.png".into(),
            price: 1999,
            registered_at: Utc::now(),
            active: false,
        }
    }

    #[test]
    fn supplier_mapping_preserves_every_field() {
        let original = supplier();
        assert_eq!(supplier_from_dto(supplier_to_dto(&original, &[])), original);
    }

    #[test]
    fn product_mapping_preserves_every_stored_field() {
        let original = product(SupplierId::new());
        let dto = product_to_dto(&original, Some("Acme Ltda"));
        assert_eq!(dto.supplier_name.as_deref(), Some("Acme Ltda"));

        // `registered_at` is read-only on the wire; mapping itself keeps it.
        let image = dto.image.clone().unwrap();
        assert_eq!(product_from_dto(dto, image), original);
    }

    #[test]
    fn creation_mapping_assigns_fresh_ids() {
        let original = supplier();
        let created = new_supplier_from_dto(supplier_to_dto(&original, &[]));
        assert_ne!(created.id, original.id);
        let (address, old) = (created.address.unwrap(), original.address.unwrap());
        assert_ne!(address.id, old.id);
        assert_eq!(address.supplier_id, created.id);
        assert_eq!(address.street, old.street);

        let p = product(original.id);
        let dto = product_to_dto(&p, None);
        let created = new_product_from_dto(dto, p.image.clone());
        assert_ne!(created.id, p.id);
        assert_eq!(created.name, p.name);
    }

    #[test]
    fn supplier_name_comes_from_details() {
        let s = supplier();
        let details = ProductDetails {
            product: product(s.id),
            supplier: Some(s),
        };
        assert_eq!(product_details_to_dto(&details).supplier_name.as_deref(), Some("Acme Ltda"));
    }

    #[test]
    fn upload_is_write_only_and_computed_fields_are_read_only() {
        let dto: ProductDto = serde_json::from_value(json!({
            "supplierId": SupplierId::new(),
            "name": "Widget",
            "description": "A useful thing",
            "imageUpload": "aGVsbG8=",
            "image": "widget.png",
            "price": 10,
            "supplierName": "Injected",
            "registeredAt": "2020-01-01T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(dto.image_upload.as_deref(), Some("aGVsbG8="));
        assert!(dto.supplier_name.is_none());
        assert!(dto.registered_at.is_none());
        assert!(dto.active);

        let out = serde_json::to_value(&dto).unwrap();
        assert!(out.get("imageUpload").is_none());
    }

    #[test]
    fn supplier_kind_must_be_known() {
        let mut dto = supplier_to_dto(&supplier(), &[]);
        dto.kind = 3;
        assert!(dto.validate().is_err());
    }

    #[test]
    fn register_requires_matching_passwords() {
        let dto: RegisterUserDto = serde_json::from_value(json!({
            "email": "a@x.com",
            "password": "P@ss1234",
            "confirmPassword": "P@ss12345"
        }))
        .unwrap();
        assert!(dto.validate().is_err());
    }
}

//! Catalog services wired to the in-memory collaborators.
//!
//! Verifies:
//! - Rule violations land on the notifier and nothing is persisted
//! - Supplier/address/product joins through the shared database
//! - Image names are never reused

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;

    use supplyhub_catalog::product_service::{
        IMAGE_EXISTS, IMAGE_REQUIRED, PRODUCT_EXISTS, UNKNOWN_SUPPLIER,
    };
    use supplyhub_catalog::supplier_service::{
        ADDRESS_EXISTS, ADDRESS_REQUIRED, DUPLICATE_DOCUMENT, HAS_PRODUCTS, SUPPLIER_EXISTS,
    };
    use supplyhub_catalog::{
        Address, AddressRepository, ImageUpload, Product, ProductRepository, ProductService,
        Repository, Supplier, SupplierKind, SupplierRepository, SupplierService,
    };
    use supplyhub_core::{AddressId, Notifier, ProductId, SupplierId};

    use crate::{
        InMemoryAddressRepository, InMemoryDatabase, InMemoryImageStore, InMemoryProductRepository,
        InMemorySupplierRepository,
    };

    struct Fixture {
        db: Arc<InMemoryDatabase>,
        images: Arc<InMemoryImageStore>,
        suppliers: SupplierService,
        products: ProductService,
        supplier_repo: Arc<InMemorySupplierRepository>,
        product_repo: Arc<InMemoryProductRepository>,
    }

    fn setup() -> Fixture {
        let db = Arc::new(InMemoryDatabase::new());
        let supplier_repo = Arc::new(InMemorySupplierRepository::new(db.clone()));
        let address_repo = Arc::new(InMemoryAddressRepository::new(db.clone()));
        let product_repo = Arc::new(InMemoryProductRepository::new(db.clone()));
        let images = Arc::new(InMemoryImageStore::new());

        Fixture {
            suppliers: SupplierService::new(supplier_repo.clone(), address_repo, product_repo.clone()),
            products: ProductService::new(product_repo.clone(), supplier_repo.clone(), images.clone()),
            db,
            images,
            supplier_repo,
            product_repo,
        }
    }

    fn address(supplier_id: SupplierId) -> Address {
        Address {
            id: AddressId::new(),
            supplier_id,
            street: "Rua das Flores".into(),
            number: "100".into(),
            complement: Some("Sala 2".into()),
            zip_code: "01001000".into(),
            neighborhood: "Centro".into(),
            city: "Sao Paulo".into(),
            state: "SP".into(),
        }
    }

    fn supplier(document: &str) -> Supplier {
        let id = SupplierId::new();
        Supplier {
            id,
            name: "Acme Ltda".into(),
            document: document.into(),
            kind: SupplierKind::Company,
            active: true,
            address: Some(address(id)),
        }
    }

    fn product(supplier_id: SupplierId, name: &str) -> Product {
        Product {
            id: ProductId::new(),
            supplier_id,
            name: name.into(),
            description: "A useful thing".into(),
            image: String::new(),
            price: 1999,
            registered_at: Utc::now(),
            active: true,
        }
    }

    fn upload(name: &str) -> ImageUpload {
        ImageUpload {
            file_name: name.into(),
            bytes: vec![0x89, b'P', b'N', b'G'],
        }
    }

    async fn seeded_supplier(fx: &Fixture) -> Supplier {
        let s = supplier("11222333000181");
        let mut notifier = Notifier::new();
        assert!(fx.suppliers.add(&mut notifier, s.clone()).await.unwrap());
        s
    }

    #[tokio::test]
    async fn supplier_is_stored_with_its_address() {
        let fx = setup();
        let s = seeded_supplier(&fx).await;

        let loaded = fx.supplier_repo.get_with_address(s.id).await.unwrap().unwrap();
        assert_eq!(loaded, s);
        assert_eq!(fx.db.addresses.len(), 1);
    }

    #[tokio::test]
    async fn supplier_without_address_is_refused() {
        let fx = setup();
        let mut s = supplier("11222333000181");
        s.address = None;

        let mut notifier = Notifier::new();
        assert!(!fx.suppliers.add(&mut notifier, s).await.unwrap());
        assert_eq!(notifier.notifications()[0].message(), ADDRESS_REQUIRED);
        assert!(fx.db.suppliers.is_empty());
    }

    #[tokio::test]
    async fn duplicate_document_is_refused() {
        let fx = setup();
        seeded_supplier(&fx).await;

        let mut notifier = Notifier::new();
        assert!(!fx.suppliers.add(&mut notifier, supplier("11222333000181")).await.unwrap());
        assert_eq!(notifier.notifications()[0].message(), DUPLICATE_DOCUMENT);
        assert_eq!(fx.db.suppliers.len(), 1);
    }

    #[tokio::test]
    async fn reused_address_id_writes_nothing() {
        let fx = setup();
        let first = seeded_supplier(&fx).await;

        let mut second = supplier("11444777000161");
        if let (Some(a), Some(taken)) = (second.address.as_mut(), first.address.as_ref()) {
            a.id = taken.id;
        }

        let mut notifier = Notifier::new();
        assert!(!fx.suppliers.add(&mut notifier, second.clone()).await.unwrap());
        assert_eq!(notifier.notifications()[0].message(), ADDRESS_EXISTS);
        assert!(fx.supplier_repo.get_by_id(second.id).await.unwrap().is_none());
        assert_eq!(fx.db.suppliers.len(), 1);
        assert_eq!(fx.db.addresses.len(), 1);
    }

    #[tokio::test]
    async fn reused_supplier_id_is_reported() {
        let fx = setup();
        let first = seeded_supplier(&fx).await;

        let mut second = supplier("11444777000161");
        second.id = first.id;

        let mut notifier = Notifier::new();
        assert!(!fx.suppliers.add(&mut notifier, second).await.unwrap());
        assert_eq!(notifier.notifications()[0].message(), SUPPLIER_EXISTS);
        assert_eq!(fx.db.addresses.len(), 1);
        let stored = fx.supplier_repo.get_by_id(first.id).await.unwrap().unwrap();
        assert_eq!(stored.document, "11222333000181");
    }

    #[tokio::test]
    async fn update_may_keep_its_own_document_but_not_take_another() {
        let fx = setup();
        let first = seeded_supplier(&fx).await;
        let mut notifier = Notifier::new();
        let second = supplier("11444777000161");
        assert!(fx.suppliers.add(&mut notifier, second.clone()).await.unwrap());

        let mut renamed = first.clone();
        renamed.name = "Acme Industria".into();
        let mut notifier = Notifier::new();
        assert!(fx.suppliers.update(&mut notifier, renamed).await.unwrap());

        let mut stolen = second.clone();
        stolen.document = first.document.clone();
        let mut notifier = Notifier::new();
        assert!(!fx.suppliers.update(&mut notifier, stolen).await.unwrap());
        assert_eq!(notifier.notifications()[0].message(), DUPLICATE_DOCUMENT);

        // Address survives a supplier update.
        let loaded = fx.supplier_repo.get_with_address(first.id).await.unwrap().unwrap();
        assert_eq!(loaded.name, "Acme Industria");
        assert!(loaded.address.is_some());
    }

    #[tokio::test]
    async fn supplier_with_products_cannot_be_removed() {
        let fx = setup();
        let s = seeded_supplier(&fx).await;
        let mut notifier = Notifier::new();
        assert!(fx
            .products
            .add(&mut notifier, product(s.id, "Widget"), upload("w.png"))
            .await
            .unwrap());

        let mut notifier = Notifier::new();
        assert!(!fx.suppliers.remove(&mut notifier, s.id).await.unwrap());
        assert_eq!(notifier.notifications()[0].message(), HAS_PRODUCTS);
        assert_eq!(fx.db.suppliers.len(), 1);
        assert_eq!(fx.db.addresses.len(), 1);
    }

    #[tokio::test]
    async fn removing_a_supplier_removes_its_address() {
        let fx = setup();
        let s = seeded_supplier(&fx).await;

        let mut notifier = Notifier::new();
        assert!(fx.suppliers.remove(&mut notifier, s.id).await.unwrap());
        assert!(fx.db.suppliers.is_empty());
        assert!(fx.db.addresses.is_empty());
    }

    #[tokio::test]
    async fn removing_unknown_supplier_is_not_found() {
        let fx = setup();
        let mut notifier = Notifier::new();
        let err = fx.suppliers.remove(&mut notifier, SupplierId::new()).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn address_update_is_validated() {
        let fx = setup();
        let s = seeded_supplier(&fx).await;
        let mut changed = s.address.clone().unwrap();
        changed.zip_code = "123".into();

        let mut notifier = Notifier::new();
        assert!(!fx.suppliers.update_address(&mut notifier, changed.clone()).await.unwrap());

        changed.zip_code = "20040002".into();
        let mut notifier = Notifier::new();
        assert!(fx.suppliers.update_address(&mut notifier, changed.clone()).await.unwrap());
        let addresses = InMemoryAddressRepository::new(fx.db.clone());
        assert_eq!(addresses.get_by_supplier(s.id).await.unwrap(), Some(changed));
    }

    #[tokio::test]
    async fn product_for_unknown_supplier_stores_nothing() {
        let fx = setup();
        let mut notifier = Notifier::new();

        let added = fx
            .products
            .add(&mut notifier, product(SupplierId::new(), "Widget"), upload("w.png"))
            .await
            .unwrap();

        assert!(!added);
        assert_eq!(notifier.notifications()[0].message(), UNKNOWN_SUPPLIER);
        assert!(fx.db.products.is_empty());
        assert!(fx.images.file_names().is_empty());
    }

    #[tokio::test]
    async fn product_requires_non_empty_image() {
        let fx = setup();
        let s = seeded_supplier(&fx).await;
        let mut notifier = Notifier::new();
        let empty = ImageUpload {
            file_name: "w.png".into(),
            bytes: Vec::new(),
        };

        assert!(!fx.products.add(&mut notifier, product(s.id, "Widget"), empty).await.unwrap());
        assert_eq!(notifier.notifications()[0].message(), IMAGE_REQUIRED);
        assert!(fx.db.products.is_empty());
    }

    #[tokio::test]
    async fn image_name_cannot_be_reused() {
        let fx = setup();
        let s = seeded_supplier(&fx).await;
        let mut notifier = Notifier::new();
        assert!(fx.products.add(&mut notifier, product(s.id, "A"), upload("x.png")).await.unwrap());

        let mut notifier = Notifier::new();
        assert!(!fx.products.add(&mut notifier, product(s.id, "B"), upload("x.png")).await.unwrap());
        assert_eq!(notifier.notifications()[0].message(), IMAGE_EXISTS);
        assert_eq!(fx.db.products.len(), 1);
    }

    #[tokio::test]
    async fn reused_product_id_leaves_no_orphan_image() {
        let fx = setup();
        let s = seeded_supplier(&fx).await;
        let p = product(s.id, "Widget");
        let mut notifier = Notifier::new();
        assert!(fx.products.add(&mut notifier, p.clone(), upload("a.png")).await.unwrap());

        let mut copy = p.clone();
        copy.name = "Copy".into();
        let mut notifier = Notifier::new();
        assert!(!fx.products.add(&mut notifier, copy, upload("b.png")).await.unwrap());

        assert_eq!(notifier.notifications()[0].message(), PRODUCT_EXISTS);
        assert!(fx.images.get("b.png").is_none());
        assert_eq!(fx.product_repo.get_by_id(p.id).await.unwrap().unwrap().name, "Widget");
    }

    #[tokio::test]
    async fn update_without_upload_keeps_image() {
        let fx = setup();
        let s = seeded_supplier(&fx).await;
        let p = product(s.id, "Widget");
        let mut notifier = Notifier::new();
        assert!(fx.products.add(&mut notifier, p.clone(), upload("w.png")).await.unwrap());

        let mut changed = p.clone();
        changed.price = 2500;
        changed.image = String::new();
        let mut notifier = Notifier::new();
        assert!(fx.products.update(&mut notifier, changed, None).await.unwrap());

        let stored = fx.product_repo.get_by_id(p.id).await.unwrap().unwrap();
        assert_eq!(stored.image, "w.png");
        assert_eq!(stored.price, 2500);
    }

    #[tokio::test]
    async fn products_are_listed_with_supplier_by_name() {
        let fx = setup();
        let s = seeded_supplier(&fx).await;
        for (name, file) in [("Zeta", "z.png"), ("Alpha", "a.png")] {
            let mut notifier = Notifier::new();
            assert!(fx.products.add(&mut notifier, product(s.id, name), upload(file)).await.unwrap());
        }

        let listed = fx.product_repo.list_with_suppliers().await.unwrap();
        let names: Vec<_> = listed.iter().map(|d| d.product.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Zeta"]);
        assert_eq!(listed[0].supplier_name(), Some("Acme Ltda"));

        let details = fx.supplier_repo.get_with_products_and_address(s.id).await.unwrap().unwrap();
        assert_eq!(details.products.len(), 2);
    }
}

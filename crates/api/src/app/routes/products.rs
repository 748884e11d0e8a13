use std::path::Path as FsPath;
use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Extension, Path},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use uuid::Uuid;

use supplyhub_catalog::{ImageUpload, ProductRepository as _, Repository as _};
use supplyhub_core::{Notifier, ProductId};

use crate::app::dto::{self, ProductDto};
use crate::app::errors::ApiError;
use crate::app::extract::ValidatedJson;
use crate::app::routes::common::{parse_id, IDS_NOT_EQUAL};
use crate::app::services::AppServices;
use crate::authz::{requirements, Authorizer};
use crate::respond::respond;

const DEFAULT_IMAGE_NAME: &str = "image";

/// Largest accepted image, before base64 encoding.
pub const MAX_IMAGE_BYTES: usize = 25_000_000;

/// Product bodies carry the image as base64 (4 chars per 3 bytes) plus the
/// other JSON fields.
pub const MAX_PRODUCT_BODY_BYTES: usize = MAX_IMAGE_BYTES / 3 * 4 + 64 * 1024;

pub fn router(authz: &Authorizer) -> Router {
    Router::new()
        .route(
            "/",
            get(list_products).merge(authz.require(post(add_product), requirements::PRODUCT_ADD)),
        )
        .route(
            "/:id",
            get(get_product)
                .merge(authz.require(put(update_product), requirements::PRODUCT_UPDATE))
                .merge(authz.require(delete(remove_product), requirements::PRODUCT_DELETE)),
        )
        .layer(DefaultBodyLimit::max(MAX_PRODUCT_BODY_BYTES))
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
) -> Result<Response, ApiError> {
    let items: Vec<ProductDto> = services
        .product_repo
        .list_with_suppliers()
        .await?
        .iter()
        .map(dto::product_details_to_dto)
        .collect();
    Ok(Json(items).into_response())
}

pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id: ProductId = parse_id(&id)?;
    let details = services
        .product_repo
        .get_with_supplier(id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(dto::product_details_to_dto(&details)).into_response())
}

pub async fn add_product(
    Extension(services): Extension<Arc<AppServices>>,
    ValidatedJson(mut body): ValidatedJson<ProductDto>,
) -> Result<Response, ApiError> {
    let mut notifier = Notifier::new();
    let upload = match decode_upload(&mut notifier, &body) {
        Some(upload) => upload.unwrap_or_else(|| ImageUpload {
            file_name: stored_name(body.image.as_deref()),
            bytes: Vec::new(),
        }),
        None => return Ok(respond(notifier, body)),
    };

    body.image_upload = None;
    let product = dto::new_product_from_dto(body, upload.file_name.clone());
    services.products.add(&mut notifier, product.clone(), upload).await?;
    Ok(respond(notifier, dto::product_to_dto(&product, None)))
}

pub async fn update_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    ValidatedJson(mut body): ValidatedJson<ProductDto>,
) -> Result<Response, ApiError> {
    let id: ProductId = parse_id(&id)?;
    let mut notifier = Notifier::new();
    if body.id != Some(id) {
        notifier.notify(IDS_NOT_EQUAL);
        return Ok(respond(notifier, body));
    }

    let Some(upload) = decode_upload(&mut notifier, &body) else {
        return Ok(respond(notifier, body));
    };

    body.image_upload = None;
    let image = upload
        .as_ref()
        .map(|u| u.file_name.clone())
        .unwrap_or_default();
    let product = dto::product_from_dto(body, image);
    let product_id = product.id;
    services.products.update(&mut notifier, product, upload).await?;

    if notifier.has_notifications() {
        return Ok(respond(notifier, ()));
    }
    let details = services
        .product_repo
        .get_with_supplier(product_id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(respond(notifier, dto::product_details_to_dto(&details)))
}

pub async fn remove_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id: ProductId = parse_id(&id)?;
    let details = services
        .product_repo
        .get_with_supplier(id)
        .await?
        .ok_or(ApiError::NotFound)?;

    services.products.remove(id).await?;
    Ok(respond(Notifier::new(), dto::product_details_to_dto(&details)))
}

/// Decode the base64 upload, if any.
///
/// `None` means the payload was unusable (recorded on `notifier`);
/// `Some(None)` means no upload was sent.
fn decode_upload(notifier: &mut Notifier, body: &ProductDto) -> Option<Option<ImageUpload>> {
    let Some(encoded) = body.image_upload.as_deref().filter(|s| !s.trim().is_empty()) else {
        return Some(None);
    };
    match STANDARD.decode(encoded.trim()) {
        Ok(bytes) => Some(Some(ImageUpload {
            file_name: stored_name(body.image.as_deref()),
            bytes,
        })),
        Err(_) => {
            notifier.notify("The field ImageUpload is not valid base64.");
            None
        }
    }
}

/// `<uuid>_<client file name>`, keeping only the final path component.
fn stored_name(client_name: Option<&str>) -> String {
    let base = client_name
        .and_then(|name| FsPath::new(name).file_name())
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty() && !name.contains('\\'))
        .unwrap_or(DEFAULT_IMAGE_NAME);
    format!("{}_{}", Uuid::new_v4(), base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_name_is_prefixed_and_stripped_of_directories() {
        let name = stored_name(Some("../../etc/photo.png"));
        let (prefix, rest) = name.split_once('_').unwrap();
        assert!(Uuid::parse_str(prefix).is_ok());
        assert_eq!(rest, "photo.png");
    }

    #[test]
    fn body_limit_fits_the_largest_encoded_image() {
        let encoded = (MAX_IMAGE_BYTES + 2) / 3 * 4;
        assert!(encoded < MAX_PRODUCT_BODY_BYTES);
    }

    #[test]
    fn missing_client_name_gets_a_default() {
        assert!(stored_name(None).ends_with("_image"));
        assert!(stored_name(Some("a\\b.png")).ends_with("_image"));
    }
}

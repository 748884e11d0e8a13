use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};

use supplyhub_catalog::{AddressRepository as _, Repository as _, SupplierRepository as _};
use supplyhub_core::{AddressId, Notifier, SupplierId};

use crate::app::dto::{self, AddressDto, SupplierDto};
use crate::app::errors::ApiError;
use crate::app::extract::ValidatedJson;
use crate::app::routes::common::{parse_id, IDS_NOT_EQUAL};
use crate::app::services::AppServices;
use crate::authz::{requirements, Authorizer};
use crate::context::CurrentUser;
use crate::respond::respond;

pub fn router(authz: &Authorizer) -> Router {
    Router::new()
        .route(
            "/",
            authz
                .authenticated(get(list_suppliers))
                .merge(authz.require(post(add_supplier), requirements::SUPPLIER_ADD)),
        )
        .route(
            "/:id",
            authz
                .authenticated(get(get_supplier))
                .merge(authz.require(put(update_supplier), requirements::SUPPLIER_UPDATE))
                .merge(authz.require(delete(remove_supplier), requirements::SUPPLIER_DELETE)),
        )
        .route(
            "/addresses/:id",
            authz
                .authenticated(get(get_address))
                .merge(authz.require(put(update_address), requirements::SUPPLIER_UPDATE)),
        )
}

pub async fn list_suppliers(
    Extension(services): Extension<Arc<AppServices>>,
) -> Result<Response, ApiError> {
    let suppliers = services.supplier_repo.get_all().await?;
    let items: Vec<SupplierDto> = suppliers.iter().map(|s| dto::supplier_to_dto(s, &[])).collect();
    Ok(Json(items).into_response())
}

pub async fn get_supplier(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id: SupplierId = parse_id(&id)?;
    let details = services
        .supplier_repo
        .get_with_products_and_address(id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(dto::supplier_to_dto(&details.supplier, &details.products)).into_response())
}

pub async fn add_supplier(
    Extension(services): Extension<Arc<AppServices>>,
    CurrentUser(user): CurrentUser,
    ValidatedJson(body): ValidatedJson<SupplierDto>,
) -> Result<Response, ApiError> {
    let mut notifier = Notifier::new();
    let supplier = dto::new_supplier_from_dto(body);
    let added = services.suppliers.add(&mut notifier, supplier.clone()).await?;
    if added {
        tracing::info!(user_id = %user.user_id, supplier_id = %supplier.id, "supplier added");
    }
    Ok(respond(notifier, dto::supplier_to_dto(&supplier, &[])))
}

pub async fn update_supplier(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    ValidatedJson(body): ValidatedJson<SupplierDto>,
) -> Result<Response, ApiError> {
    let id: SupplierId = parse_id(&id)?;
    let mut notifier = Notifier::new();
    if body.id != Some(id) {
        notifier.notify(IDS_NOT_EQUAL);
        return Ok(respond(notifier, body));
    }

    let supplier = dto::supplier_from_dto(body);
    services.suppliers.update(&mut notifier, supplier.clone()).await?;
    Ok(respond(notifier, dto::supplier_to_dto(&supplier, &[])))
}

pub async fn remove_supplier(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id: SupplierId = parse_id(&id)?;
    let supplier = services
        .supplier_repo
        .get_with_address(id)
        .await?
        .ok_or(ApiError::NotFound)?;

    let mut notifier = Notifier::new();
    services.suppliers.remove(&mut notifier, id).await?;
    Ok(respond(notifier, dto::supplier_to_dto(&supplier, &[])))
}

pub async fn get_address(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id: AddressId = parse_id(&id)?;
    let address = services
        .address_repo
        .get_by_id(id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(dto::address_to_dto(&address)).into_response())
}

pub async fn update_address(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    ValidatedJson(body): ValidatedJson<AddressDto>,
) -> Result<Response, ApiError> {
    let id: AddressId = parse_id(&id)?;
    let mut notifier = Notifier::new();
    if body.id != Some(id) {
        notifier.notify(IDS_NOT_EQUAL);
        return Ok(respond(notifier, body));
    }

    let existing = services
        .address_repo
        .get_by_id(id)
        .await?
        .ok_or(ApiError::NotFound)?;
    let mut address = dto::address_from_dto(body, existing.supplier_id);
    address.supplier_id = existing.supplier_id;
    services.suppliers.update_address(&mut notifier, address.clone()).await?;
    Ok(respond(notifier, dto::address_to_dto(&address)))
}

//! Result Responder: turns a request's [`Notifier`] into the HTTP response.
//!
//! Handlers call exactly one of these, once, at the end of the request. The
//! notifier is taken by value, so it cannot be consulted or reused afterwards.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use supplyhub_core::Notifier;

use crate::app::errors::json_error;

/// `200 OK` with `payload` when nothing was notified, otherwise
/// `400 Bad Request` with every message in record order.
pub fn respond<T: Serialize>(notifier: Notifier, payload: T) -> Response {
    respond_with(notifier, StatusCode::OK, payload)
}

pub fn respond_with<T: Serialize>(notifier: Notifier, status: StatusCode, payload: T) -> Response {
    match failure(notifier) {
        Some(response) => response,
        None => (status, Json(payload)).into_response(),
    }
}

/// Like [`respond`], with an empty `200 OK` body on success.
pub fn respond_empty(notifier: Notifier) -> Response {
    failure(notifier).unwrap_or_else(|| StatusCode::OK.into_response())
}

fn failure(notifier: Notifier) -> Option<Response> {
    if !notifier.has_notifications() {
        return None;
    }
    let errors = notifier
        .into_notifications()
        .into_iter()
        .map(String::from)
        .collect();
    Some(json_error(StatusCode::BAD_REQUEST, errors))
}

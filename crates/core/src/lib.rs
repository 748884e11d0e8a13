//! `supplyhub-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! identifiers, the domain error model and the per-request [`Notifier`].

pub mod entity;
pub mod error;
pub mod id;
pub mod notification;

pub use entity::Entity;
pub use error::DomainError;
pub use id::{AddressId, ProductId, SupplierId, UserId};
pub use notification::{Notification, Notifier};

//! HTTP API: configuration, routing, authorization and response mapping.

pub mod app;
pub mod authz;
pub mod config;
pub mod context;
pub mod middleware;
pub mod respond;

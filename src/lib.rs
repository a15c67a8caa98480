//! itemstore - a CRUD HTTP service for Item records
//!
//! Layers, leaf first:
//! - `store`: record store over the `items` table
//! - `session`: connection pool handle and per-request unit of work
//! - `api`: wire types, validation, and the four item handlers
//! - `http_server`: router assembly and serving
//! - `cli`: config loading and process lifecycle

pub mod api;
pub mod cli;
pub mod http_server;
pub mod observability;
pub mod session;
pub mod store;

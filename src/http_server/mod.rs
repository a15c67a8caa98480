//! # HTTP Server Module
//!
//! Binds the item API to a TCP listener.
//!
//! # Endpoints
//!
//! - `POST /items/` - create
//! - `GET|PUT|DELETE /items/{id}` - read, update, delete

pub mod config;
pub mod server;

pub use config::HttpServerConfig;
pub use server::{shutdown_signal, HttpServer};

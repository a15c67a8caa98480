//! # Session Lifecycle
//!
//! Provides each request exactly one scoped unit of work bound to the
//! record store.
//!
//! - [`Database`] - explicitly constructed handle owning the connection pool
//! - [`UnitOfWork`] - one pooled connection with an open transaction
//!
//! A unit of work is committed explicitly. Every other exit path (error,
//! early return, the request future being dropped) rolls it back and returns
//! its connection to the pool when the guard is dropped.

mod database;
mod unit_of_work;

pub use database::{Database, DatabaseConfig};
pub use unit_of_work::UnitOfWork;

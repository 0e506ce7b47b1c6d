//! usuarios-server: HTTP CRUD service for user accounts and roles
//!
//! Translates a small JSON API into parameterized PostgreSQL statements.
//! The store is injected through the [`db::Store`] trait so the router can
//! run against a live database or the in-memory double.

pub mod db;
pub mod http;
pub mod models;
pub mod password;

pub use db::{Database, DatabaseConfig, DbError, MemoryStore, Store};
pub use http::{build_router, run_server, ApiError, ServerConfig};
pub use password::{hash_password, verify_password, PasswordError};

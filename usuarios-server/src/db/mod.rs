//! Database layer - connection provider, repositories and the store seam
//!
//! # Design Principles
//!
//! - One sqlx pool, owned by [`Database`], injected into the router
//! - List and fetch use JOINs against `rol` - no N+1
//! - Check-then-write sequences run in a transaction under an advisory lock
//! - Unique violations are reported as conflicts, not 500s

pub mod error;
pub mod memory;
pub mod pool;
pub mod repos;
pub mod store;

pub use error::DbError;
pub use memory::MemoryStore;
pub use pool::{Database, DatabaseConfig};
pub use repos::*;
pub use store::Store;

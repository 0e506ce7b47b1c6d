//! Domain models with validation at construction
//!
//! Request payloads are checked here before any store access.
//! Invalid input returns ValidationError, not panic.

pub mod usuario;
pub mod validation;

pub use usuario::{NewUser, UserUpdate, UsuarioFields, UsuarioPayload};
pub use validation::ValidationError;

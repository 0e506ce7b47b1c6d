//! Route handlers organized by resource

pub mod health;
pub mod roles;
pub mod usuarios;

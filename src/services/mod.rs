//! Services module
//!
//! Lógica de negocio pura, sin acceso a base de datos.

pub mod slot_allocation;

pub use slot_allocation::*;

//! Modelos del sistema
//!
//! Este módulo contiene los modelos de datos del control de acceso y su
//! mapeo al schema PostgreSQL.

pub mod access;
pub mod occupancy;

pub use access::*;
pub use occupancy::*;

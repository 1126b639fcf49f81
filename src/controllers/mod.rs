//! Controladores
//!
//! Orquestan validación, repositorios y reglas de negocio.

pub mod access_controller;

pub use access_controller::AccessController;

//! Configuración del proyecto
//!
//! Este módulo contiene la configuración de base de datos, variables de entorno
//! y las constantes fijas del parqueadero.

pub mod database;
pub mod environment;
pub mod parking;

pub use database::DatabaseConfig;
pub use environment::*;

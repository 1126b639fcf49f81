//! Control de acceso vehicular para el parqueadero
//!
//! Dada una placa, decide si el dueño es beneficiario autorizado, alterna el
//! vehículo entre ingreso y salida y asigna uno de los puestos fijos.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

pub use routes::create_app_router;
pub use state::AppState;

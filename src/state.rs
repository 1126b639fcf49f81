//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum. No hay estado mutable en proceso: todo vive
//! en los registros persistidos.

use std::sync::Arc;

use crate::config::environment::EnvironmentConfig;
use crate::controllers::AccessController;
use crate::repositories::ParkingStore;

#[derive(Clone)]
pub struct AppState {
    pub controller: AccessController,
    pub config: EnvironmentConfig,
}

impl AppState {
    pub fn new(store: Arc<dyn ParkingStore>, config: EnvironmentConfig) -> Self {
        Self {
            controller: AccessController::new(store),
            config,
        }
    }
}

//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del servidor HTTP.

use std::env;

use crate::utils::errors::{AppError, AppResult};

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub host: String,
    pub port: u16,
    /// Vacío significa CORS abierto a cualquier origen
    pub cors_origins: Vec<String>,
    pub run_migrations: bool,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origins: Vec::new(),
            run_migrations: false,
        }
    }
}

impl EnvironmentConfig {
    pub fn from_env() -> AppResult<Self> {
        let defaults = Self::default();

        let port = match env::var("PORT") {
            Ok(value) => value
                .trim()
                .parse()
                .map_err(|_| AppError::Configuration(format!("PORT must be a valid number, got '{}'", value)))?,
            Err(_) => defaults.port,
        };

        let cors_origins = env::var("CORS_ORIGINS")
            .map(|value| parse_origins(&value))
            .unwrap_or_default();

        let run_migrations = env::var("DB_RUN_MIGRATIONS")
            .map(|value| matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(defaults.run_migrations);

        Ok(Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port,
            cors_origins,
            run_migrations,
        })
    }

    /// Obtener la dirección del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

//! Configuración de base de datos
//!
//! Este módulo maneja la configuración de PostgreSQL con SQLx a partir de
//! las variables `DB_HOST`, `DB_USER`, `DB_PASSWORD`, `DB_NAME` y `DB_PORT`.

use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use std::time::Duration;

use crate::utils::errors::{AppError, AppResult};

/// Configuración de la base de datos
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub user: String,
    pub password: String,
    pub name: String,
    pub port: u16,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
}

impl DatabaseConfig {
    /// Leer la configuración desde las variables de entorno.
    /// Ninguna variable tiene valor por defecto.
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Construir la configuración con una función de búsqueda arbitraria
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| {
            lookup(key)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| AppError::Configuration(format!("{} must be set", key)))
        };

        let port = require("DB_PORT")?;
        let port = port
            .trim()
            .parse::<u16>()
            .map_err(|_| AppError::Configuration(format!("DB_PORT must be a valid port, got '{}'", port)))?;

        Ok(Self {
            host: require("DB_HOST")?,
            user: require("DB_USER")?,
            // puede estar vacía, pero debe existir
            password: lookup("DB_PASSWORD")
                .ok_or_else(|| AppError::Configuration("DB_PASSWORD must be set".to_string()))?,
            name: require("DB_NAME")?,
            port,
            max_connections: 20,
            min_connections: 0,
            acquire_timeout: Duration::from_secs(10),
            idle_timeout: Duration::from_secs(300),
            max_lifetime: Duration::from_secs(3600),
        })
    }

    /// Opciones de conexión de PostgreSQL
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.name)
    }

    /// Crear el pool de conexiones. Es perezoso: la primera conexión se abre
    /// en la primera petición, así que una base caída se reporta por llamada.
    pub fn create_pool(&self) -> PgPool {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .acquire_timeout(self.acquire_timeout)
            .idle_timeout(self.idle_timeout)
            .max_lifetime(self.max_lifetime)
            .connect_lazy_with(self.connect_options())
    }

    /// Destino de la conexión sin la contraseña, para logs
    pub fn describe(&self) -> String {
        format!("postgres://{}:***@{}:{}/{}", self.user, self.host, self.port, self.name)
    }
}

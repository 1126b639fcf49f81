//! Sistema de manejo de errores
//!
//! Este módulo define los tipos de errores del sistema
//! y su conversión a respuestas HTTP apropiadas.
//!
//! Las negaciones de negocio (vehículo no registrado, documento no autorizado,
//! sin puestos) no son errores: viajan como respuestas con `permitido: false`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::{error, warn};

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Error al conectar con la base de datos: {0}")]
    DatabaseConnection(sqlx::Error),

    #[error("Error en la base de datos: {0}")]
    Database(#[from] sqlx::Error),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Configuración inválida: {0}")]
    Configuration(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::DatabaseConnection(_)
            | AppError::Database(_)
            | AppError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn kind(&self) -> (&'static str, &'static str) {
        match self {
            AppError::DatabaseConnection(_) => ("Database Unavailable", "DB_CONNECTION_ERROR"),
            AppError::Database(_) => ("Database Error", "DB_ERROR"),
            AppError::BadRequest(_) => ("Bad Request", "BAD_REQUEST"),
            AppError::Conflict(_) => ("Conflict", "CONFLICT"),
            AppError::Configuration(_) => ("Configuration Error", "CONFIG_ERROR"),
        }
    }
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    detail: String,
    error: String,
    code: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let (kind, code) = self.kind();

        if status.is_server_error() {
            error!("❌ {}", self);
        } else {
            warn!("⚠️ {}", self);
        }

        let body = ErrorResponse {
            detail: self.to_string(),
            error: kind.to_string(),
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de solicitud incorrecta
pub fn bad_request_error(message: &str) -> AppError {
    AppError::BadRequest(message.to_string())
}

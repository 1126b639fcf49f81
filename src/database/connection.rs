//! Configuración de conexión a PostgreSQL
//!
//! Este módulo crea el pool y aplica el schema del parqueadero.

use sqlx::PgPool;
use tracing::info;

use crate::config::database::DatabaseConfig;
use crate::utils::errors::AppResult;

/// Crear un pool de conexiones a la base de datos
pub fn create_pool(config: &DatabaseConfig) -> PgPool {
    info!("🔗 Pool de PostgreSQL hacia {}", config.describe());
    config.create_pool()
}

/// Ejecutar migraciones de la base de datos
pub async fn run_migrations(pool: &PgPool) -> AppResult<()> {
    info!("🗄️ Aplicando migraciones");
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| sqlx::Error::Migrate(Box::new(e)))?;
    info!("✅ Migraciones aplicadas");
    Ok(())
}

use anyhow::Result;
use dotenvy::dotenv;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use parking_access_control::config::parking::NUM_SLOTS;
use parking_access_control::config::{DatabaseConfig, EnvironmentConfig};
use parking_access_control::database::{create_pool, run_migrations};
use parking_access_control::repositories::PgParkingStore;
use parking_access_control::{create_app_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("🅿️ Control de acceso del parqueadero");
    info!("===================================");

    let config = EnvironmentConfig::from_env()?;
    let db_config = match DatabaseConfig::from_env() {
        Ok(db_config) => db_config,
        Err(e) => {
            error!("❌ Configuración de base de datos incompleta: {}", e);
            return Err(anyhow::anyhow!("Error de configuración: {}", e));
        }
    };

    let pool = create_pool(&db_config);
    if config.run_migrations {
        run_migrations(&pool).await?;
    }

    let app_state = AppState::new(Arc::new(PgParkingStore::new(pool)), config.clone());
    let app = create_app_router(app_state);

    let addr: SocketAddr = config.server_url().parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🚗 Puestos disponibles: {}", NUM_SLOTS);
    info!("🔍 Endpoints disponibles:");
    info!("   POST /validar_placa/ - Validar placa (ingreso/salida)");
    info!("   GET  /puestos        - Ocupación actual");
    info!("   GET  /health         - Estado del servicio");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Error del servidor: {}", e);
        return Err(e.into());
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo escuchar Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo escuchar SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}

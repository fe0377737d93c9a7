use anyhow::Result;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};
use dotenvy::dotenv;

use car_rental::config::database::DatabaseConfig;
use car_rental::config::EnvironmentConfig;
use car_rental::routes::create_router;
use car_rental::state::AppState;
use car_rental::store::{MemoryStore, PgStore};
use car_rental::utils::jwt::JwtConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    let config = EnvironmentConfig::default();

    // Configurar logging
    let level = if config.is_development() {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    info!("🚗 Car Rental System - API");
    info!("==========================");

    let jwt = JwtConfig::from(&config);

    // Elegir backend de almacenamiento según DATABASE_URL
    let state = match config.database_url.clone() {
        Some(url) => {
            let pool = match DatabaseConfig::new(url).create_pool().await {
                Ok(pool) => pool,
                Err(e) => {
                    error!("❌ Error conectando a la base de datos: {}", e);
                    return Err(anyhow::anyhow!("database error: {}", e));
                }
            };
            let store = PgStore::new(pool);
            store.ensure_schema().await?;
            info!("✅ PostgreSQL conectado exitosamente");
            AppState::new(Arc::new(store), jwt)
        }
        None => {
            info!("📦 DATABASE_URL no definida, usando almacenamiento en memoria");
            AppState::new(Arc::new(MemoryStore::new()), jwt)
        }
    };

    let app = create_router(state);

    let addr = config.server_url();
    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("👤 Auth:");
    info!("   POST /api/auth/register - Registrar usuario");
    info!("   POST /api/auth/login - Login");
    info!("🚗 Coches:");
    info!("   GET  /api/cars/available - Listar coches disponibles");
    info!("   GET  /api/cars/:number - Consultar coche");
    info!("   POST /api/cars - Registrar coche");
    info!("   PUT  /api/cars/:number/status - Cambiar estado (mantenimiento)");
    info!("📋 Alquileres:");
    info!("   POST /api/rentals - Alquilar coche");
    info!("   POST /api/rentals/return - Devolver coche");
    info!("   GET  /api/rentals/mine - Mis alquileres activos");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
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

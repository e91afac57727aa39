use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use livraison_demandes::config::{DatabaseConfig, EnvironmentConfig, StorageBackend};
use livraison_demandes::database::DatabaseConnection;
use livraison_demandes::repositories::{
    DeliveryRepository, InMemoryDeliveryRepository, PgDeliveryRepository,
};
use livraison_demandes::routes::create_app;
use livraison_demandes::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("🚚 Servicio de demandes de livraison");
    info!("====================================");

    let config = EnvironmentConfig::from_env().context("configuración inválida")?;
    let repository = build_repository(&config).await?;
    let backend = repository.backend_name();

    let addr: SocketAddr = config
        .server_url()
        .parse()
        .with_context(|| format!("dirección inválida: {}", config.server_url()))?;
    let role = config.role;

    let app = create_app(AppState::new(repository, config));

    info!("🌐 Servidor iniciando en http://{} (almacenamiento: {})", addr, backend);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Estado del servicio");
    if role.serves_demandes() {
        info!("📋 Endpoints - Demandes:");
        info!("   GET  /api/demandes - Listar demandes");
        info!("   POST /api/demandes?managerId=&livreurId= - Crear demande");
        info!("   GET  /api/demandes/:id - Obtener demande");
        info!("   PUT  /api/demandes/:id - Actualizar demande");
        info!("   DELETE /api/demandes/:id - Eliminar demande");
        info!("   GET  /api/demandes/manager/:id - Demandes de un manager");
        info!("   GET  /api/demandes/livreur/:id - Demandes de un livreur");
        info!("   GET  /api/demandes/unassigned - Demandes sin livreur");
        info!("   POST /api/demandes/:id/assign-livreur?livreurId=&managerId= - Asignar livreur");
    }
    if role.serves_livreurs() {
        info!("🛵 Endpoints - Livreurs:");
        info!("   GET  /api/livreurs?disponible= - Listar livreurs");
        info!("   POST /api/livreurs - Crear livreur");
        info!("   GET  /api/livreurs/:id - Obtener livreur");
        info!("   PUT  /api/livreurs/:id - Actualizar livreur");
        info!("   DELETE /api/livreurs/:id - Eliminar livreur");
        info!("👔 Endpoints - Managers:");
        info!("   GET  /api/managers - Listar managers");
        info!("   GET  /api/managers/:id - Obtener manager");
    }

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("no se pudo escuchar en {}", addr))?;

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

/// Crear el repositorio según el backend configurado
async fn build_repository(config: &EnvironmentConfig) -> Result<Arc<dyn DeliveryRepository>> {
    match config.storage {
        StorageBackend::Postgres => {
            let db_config = DatabaseConfig::from_env()?;
            let connection = DatabaseConnection::connect(&db_config)
                .await
                .context("error conectando a la base de datos")?;
            connection
                .run_migrations()
                .await
                .context("error ejecutando migraciones")?;
            info!("✅ Base de datos lista");
            Ok(Arc::new(PgDeliveryRepository::new(connection.pool().clone())))
        }
        StorageBackend::Memory => {
            warn!("⚠️ Usando almacenamiento en memoria, los datos no se persisten");
            Ok(Arc::new(InMemoryDeliveryRepository::seeded()))
        }
    }
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo instalar el handler de Ctrl+C: {}", e);
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
                error!("❌ No se pudo instalar el handler de SIGTERM: {}", e);
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

//! Configuración de conexión a PostgreSQL
//!
//! Este módulo abre el pool y aplica las migraciones embebidas.

use sqlx::PgPool;
use tracing::info;

use crate::config::DatabaseConfig;

/// Conexión a la base de datos
pub struct DatabaseConnection {
    pool: PgPool,
}

impl DatabaseConnection {
    /// Crear el pool de conexiones
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        info!("🔗 Conectando a PostgreSQL: {}", mask_database_url(&config.url));
        let pool = config.create_pool().await?;
        info!("✅ PostgreSQL conectado exitosamente");
        Ok(Self { pool })
    }

    /// Ejecutar migraciones de la base de datos
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("✅ Migraciones aplicadas");
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Función helper para enmascarar la URL de la base de datos en logs
fn mask_database_url(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };

    match rest.rsplit_once('@') {
        Some((credentials, host)) if credentials.contains(':') => {
            format!("{}://***:***@{}", scheme, host)
        }
        _ => url.to_string(),
    }
}

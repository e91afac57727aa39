//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del servidor. Todas las variables
//! tienen un valor por defecto; un valor presente pero inválido es un error.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use super::ConfigError;

/// Backend de almacenamiento
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(other.to_string()),
        }
    }
}

/// Qué servicio REST expone este proceso
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceRole {
    /// Demandes, livreurs y managers
    All,
    /// Solo /api/demandes
    Demandes,
    /// Solo /api/livreurs y /api/managers
    Livreurs,
}

impl ServiceRole {
    pub fn serves_demandes(&self) -> bool {
        matches!(self, ServiceRole::All | ServiceRole::Demandes)
    }

    pub fn serves_livreurs(&self) -> bool {
        matches!(self, ServiceRole::All | ServiceRole::Livreurs)
    }
}

impl FromStr for ServiceRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(ServiceRole::All),
            "demandes" => Ok(ServiceRole::Demandes),
            "livreurs" => Ok(ServiceRole::Livreurs),
            other => Err(other.to_string()),
        }
    }
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub request_timeout: Duration,
    pub storage: StorageBackend,
    pub role: ServiceRole,
    pub bcrypt_cost: u32,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            host: "0.0.0.0".to_string(),
            port: 8080,
            cors_origins: Vec::new(),
            request_timeout: Duration::from_secs(30),
            storage: StorageBackend::Postgres,
            role: ServiceRole::All,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

/// Leer una variable opcional y parsearla
pub(crate) fn parse_var<T: FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { name, value }),
        _ => Ok(None),
    }
}

impl EnvironmentConfig {
    /// Cargar la configuración desde las variables de entorno
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let bcrypt_cost =
            parse_var::<u32>("BCRYPT_COST")?.unwrap_or(defaults.bcrypt_cost);
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(ConfigError::Invalid {
                name: "BCRYPT_COST",
                value: bcrypt_cost.to_string(),
            });
        }

        Ok(Self {
            environment: env::var("ENVIRONMENT").unwrap_or(defaults.environment),
            host: env::var("HOST").unwrap_or(defaults.host),
            port: parse_var("PORT")?.unwrap_or(defaults.port),
            cors_origins: env::var("CORS_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or(defaults.cors_origins),
            request_timeout: parse_var::<u64>("REQUEST_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            storage: parse_var("STORAGE_BACKEND")?.unwrap_or(defaults.storage),
            role: parse_var("SERVICE_ROLE")?.unwrap_or(defaults.role),
            bcrypt_cost,
        })
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Obtener la dirección del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

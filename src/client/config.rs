use std::env;
use std::time::Duration;

use crate::config::environment::parse_var;
use crate::config::ConfigError;

pub const DEFAULT_DEMANDE_API_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_LIVREUR_API_URL: &str = "http://localhost:8083/api";

/// Configuración del cliente HTTP de los dos servicios
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub demande_api_url: String,
    pub livreur_api_url: String,
    /// Manager que actúa en las operaciones de escritura
    pub manager_id: i64,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            demande_api_url: DEFAULT_DEMANDE_API_URL.to_string(),
            livreur_api_url: DEFAULT_LIVREUR_API_URL.to_string(),
            manager_id: 1,
            timeout: Duration::from_secs(10),
        }
    }
}

impl ClientConfig {
    /// Ambos servicios detrás de la misma URL base (SERVICE_ROLE=all)
    pub fn for_base_url(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            demande_api_url: base_url.clone(),
            livreur_api_url: base_url,
            ..Self::default()
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            demande_api_url: env::var("DEMANDE_API_URL")
                .unwrap_or(defaults.demande_api_url),
            livreur_api_url: env::var("LIVREUR_API_URL")
                .unwrap_or(defaults.livreur_api_url),
            manager_id: parse_var("MANAGER_ID")?.unwrap_or(defaults.manager_id),
            timeout: parse_var::<u64>("CLIENT_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
        })
    }

    pub(crate) fn http_client(&self) -> Result<reqwest::Client, reqwest::Error> {
        reqwest::Client::builder().timeout(self.timeout).build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_deployed_services() {
        let config = ClientConfig::default();
        assert_eq!(config.demande_api_url, "http://localhost:8080/api");
        assert_eq!(config.livreur_api_url, "http://localhost:8083/api");
        assert_eq!(config.manager_id, 1);
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_single_base_url() {
        let config = ClientConfig::for_base_url("http://127.0.0.1:9000/api");
        assert_eq!(config.demande_api_url, config.livreur_api_url);
    }
}

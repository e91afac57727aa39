use super::config::ClientConfig;
use super::error::{check_status, read_json, ClientError};
use crate::dto::livreur_dto::{CreateLivreurRequest, UpdateLivreurRequest};
use crate::models::{Livreur, Manager};

/// Cliente del servicio de livreurs y managers
#[derive(Debug, Clone)]
pub struct LivreurApiClient {
    http: reqwest::Client,
    api_url: String,
}

impl LivreurApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        Ok(Self::with_client(
            config.http_client()?,
            &config.livreur_api_url,
        ))
    }

    pub fn with_client(http: reqwest::Client, api_url: &str) -> Self {
        Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    fn livreurs_url(&self, path: &str) -> String {
        format!("{}/livreurs{}", self.api_url, path)
    }

    fn managers_url(&self, path: &str) -> String {
        format!("{}/managers{}", self.api_url, path)
    }

    pub async fn get_all_livreurs(&self) -> Result<Vec<Livreur>, ClientError> {
        let response = self.http.get(self.livreurs_url("")).send().await?;
        read_json(response).await
    }

    /// Livreurs que se pueden ofrecer en el formulario de asignación
    pub async fn get_available_livreurs(&self) -> Result<Vec<Livreur>, ClientError> {
        let response = self
            .http
            .get(self.livreurs_url(""))
            .query(&[("disponible", true)])
            .send()
            .await?;
        read_json(response).await
    }

    pub async fn get_livreur_by_id(&self, id: i64) -> Result<Livreur, ClientError> {
        let response = self
            .http
            .get(self.livreurs_url(&format!("/{}", id)))
            .send()
            .await?;
        read_json(response).await
    }

    pub async fn create_livreur(
        &self,
        request: &CreateLivreurRequest,
    ) -> Result<Livreur, ClientError> {
        let response = self
            .http
            .post(self.livreurs_url(""))
            .json(request)
            .send()
            .await?;
        read_json(response).await
    }

    pub async fn update_livreur(
        &self,
        id: i64,
        request: &UpdateLivreurRequest,
    ) -> Result<Livreur, ClientError> {
        let response = self
            .http
            .put(self.livreurs_url(&format!("/{}", id)))
            .json(request)
            .send()
            .await?;
        read_json(response).await
    }

    pub async fn delete_livreur(&self, id: i64) -> Result<(), ClientError> {
        let response = self
            .http
            .delete(self.livreurs_url(&format!("/{}", id)))
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    pub async fn get_all_managers(&self) -> Result<Vec<Manager>, ClientError> {
        let response = self.http.get(self.managers_url("")).send().await?;
        read_json(response).await
    }

    pub async fn get_manager_by_id(&self, id: i64) -> Result<Manager, ClientError> {
        let response = self
            .http
            .get(self.managers_url(&format!("/{}", id)))
            .send()
            .await?;
        read_json(response).await
    }
}

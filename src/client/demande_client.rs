use tracing::debug;

use super::config::ClientConfig;
use super::error::{check_status, read_json, ClientError};
use crate::dto::demande_dto::{CreateDemandeRequest, UpdateDemandeRequest};
use crate::models::Demande;

/// Cliente del servicio de demandes
#[derive(Debug, Clone)]
pub struct DemandeApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl DemandeApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        Ok(Self::with_client(
            config.http_client()?,
            &config.demande_api_url,
        ))
    }

    pub fn with_client(http: reqwest::Client, api_url: &str) -> Self {
        Self {
            http,
            base_url: format!("{}/demandes", api_url.trim_end_matches('/')),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get_all_demandes(&self) -> Result<Vec<Demande>, ClientError> {
        let response = self.http.get(&self.base_url).send().await?;
        read_json(response).await
    }

    pub async fn get_demande_by_id(&self, id: i64) -> Result<Demande, ClientError> {
        let response = self.http.get(self.url(&format!("/{}", id))).send().await?;
        read_json(response).await
    }

    pub async fn create_demande(
        &self,
        request: &CreateDemandeRequest,
        manager_id: i64,
    ) -> Result<Demande, ClientError> {
        debug!("📤 POST {} (manager {})", self.base_url, manager_id);
        let response = self
            .http
            .post(&self.base_url)
            .query(&[("managerId", manager_id)])
            .json(request)
            .send()
            .await?;
        read_json(response).await
    }

    /// Crear y asignar en una sola llamada; el servidor hace ambos pasos o ninguno
    pub async fn create_and_assign(
        &self,
        request: &CreateDemandeRequest,
        manager_id: i64,
        livreur_id: i64,
    ) -> Result<Demande, ClientError> {
        let response = self
            .http
            .post(&self.base_url)
            .query(&[("managerId", manager_id), ("livreurId", livreur_id)])
            .json(request)
            .send()
            .await?;
        read_json(response).await
    }

    pub async fn update_demande(
        &self,
        id: i64,
        request: &UpdateDemandeRequest,
    ) -> Result<Demande, ClientError> {
        let response = self
            .http
            .put(self.url(&format!("/{}", id)))
            .json(request)
            .send()
            .await?;
        read_json(response).await
    }

    pub async fn delete_demande(&self, id: i64) -> Result<(), ClientError> {
        let response = self.http.delete(self.url(&format!("/{}", id))).send().await?;
        check_status(response).await?;
        Ok(())
    }

    pub async fn get_demandes_by_manager_id(
        &self,
        manager_id: i64,
    ) -> Result<Vec<Demande>, ClientError> {
        let response = self
            .http
            .get(self.url(&format!("/manager/{}", manager_id)))
            .send()
            .await?;
        read_json(response).await
    }

    pub async fn get_demandes_by_livreur_id(
        &self,
        livreur_id: i64,
    ) -> Result<Vec<Demande>, ClientError> {
        let response = self
            .http
            .get(self.url(&format!("/livreur/{}", livreur_id)))
            .send()
            .await?;
        read_json(response).await
    }

    pub async fn assign_livreur_to_demande(
        &self,
        demande_id: i64,
        livreur_id: i64,
        manager_id: i64,
    ) -> Result<Demande, ClientError> {
        debug!(
            "📤 assign livreur {} -> demande {} (manager {})",
            livreur_id, demande_id, manager_id
        );
        let response = self
            .http
            .post(self.url(&format!("/{}/assign-livreur", demande_id)))
            .query(&[("livreurId", livreur_id), ("managerId", manager_id)])
            .send()
            .await?;
        read_json(response).await
    }

    pub async fn get_unassigned_demandes(&self) -> Result<Vec<Demande>, ClientError> {
        let response = self.http.get(self.url("/unassigned")).send().await?;
        read_json(response).await
    }
}

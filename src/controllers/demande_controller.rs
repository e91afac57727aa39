use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};
use validator::Validate;

use crate::dto::demande_dto::{CreateDemandeRequest, UpdateDemandeRequest};
use crate::models::{Assignment, Demande, NewDemande};
use crate::repositories::DeliveryRepository;
use crate::utils::errors::{not_found_error, AppResult};

pub struct DemandeController {
    repository: Arc<dyn DeliveryRepository>,
}

impl DemandeController {
    pub fn new(repository: Arc<dyn DeliveryRepository>) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Demande>> {
        self.repository.list_demandes().await
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<Demande> {
        self.repository
            .find_demande(id)
            .await?
            .ok_or_else(|| not_found_error("Demande", id))
    }

    pub async fn list_by_manager(&self, manager_id: i64) -> AppResult<Vec<Demande>> {
        self.repository.demandes_by_manager(manager_id).await
    }

    pub async fn list_by_livreur(&self, livreur_id: i64) -> AppResult<Vec<Demande>> {
        self.repository.demandes_by_livreur(livreur_id).await
    }

    pub async fn list_unassigned(&self) -> AppResult<Vec<Demande>> {
        self.repository.unassigned_demandes().await
    }

    /// Crear una demande; con `livreur_id` se crea y asigna en una sola unidad de trabajo
    pub async fn create(
        &self,
        manager_id: i64,
        livreur_id: Option<i64>,
        request: CreateDemandeRequest,
    ) -> AppResult<Demande> {
        request.validate()?;

        let new_demande =
            NewDemande::new(&request.lieu_depart, &request.lieu_arrivee, manager_id);

        let demande = match livreur_id {
            Some(livreur_id) => {
                self.repository
                    .create_and_assign(new_demande, livreur_id, Utc::now())
                    .await?
            }
            None => self.repository.create_demande(new_demande).await?,
        };

        info!(
            demande_id = demande.id,
            manager_id,
            livreur_id = ?livreur_id,
            "📦 Demande creada: {} → {}",
            demande.lieu_depart,
            demande.lieu_arrivee
        );

        Ok(demande)
    }

    pub async fn update(&self, id: i64, request: UpdateDemandeRequest) -> AppResult<Demande> {
        request.validate()?;

        let demande = self.repository.update_demande(id, request.into()).await?;
        info!(demande_id = id, statut = %demande.statut, "✏️ Demande actualizada");

        Ok(demande)
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        self.repository.delete_demande(id).await?;
        info!(demande_id = id, "🗑️ Demande eliminada");
        Ok(())
    }

    /// Asignar un livreur. `manager_id` es la identidad del manager que actúa.
    pub async fn assign_livreur(
        &self,
        demande_id: i64,
        livreur_id: i64,
        manager_id: i64,
    ) -> AppResult<Demande> {
        let assignment = Assignment {
            demande_id,
            livreur_id,
            manager_id,
            at: Utc::now(),
        };

        match self.repository.assign_livreur(assignment).await {
            Ok(demande) => {
                info!(
                    demande_id,
                    livreur_id,
                    manager_id,
                    statut = %demande.statut,
                    "🚚 Livreur asignado"
                );
                Ok(demande)
            }
            Err(e) => {
                warn!(
                    demande_id,
                    livreur_id,
                    manager_id,
                    "⚠️ Asignación rechazada: {}",
                    e
                );
                Err(e)
            }
        }
    }
}

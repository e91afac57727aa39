use bcrypt::hash;
use std::sync::Arc;
use tracing::info;
use validator::Validate;

use crate::dto::livreur_dto::{CreateLivreurRequest, UpdateLivreurRequest};
use crate::models::{Livreur, LivreurPatch, NewLivreur};
use crate::repositories::DeliveryRepository;
use crate::utils::errors::{not_found_error, AppError, AppResult};

pub struct LivreurController {
    repository: Arc<dyn DeliveryRepository>,
    bcrypt_cost: u32,
}

impl LivreurController {
    pub fn new(repository: Arc<dyn DeliveryRepository>, bcrypt_cost: u32) -> Self {
        Self {
            repository,
            bcrypt_cost,
        }
    }

    fn hash_password(&self, password: &str) -> AppResult<String> {
        hash(password, self.bcrypt_cost)
            .map_err(|e| AppError::Internal(format!("Error hashing password: {}", e)))
    }

    pub async fn list(&self, disponible: Option<bool>) -> AppResult<Vec<Livreur>> {
        self.repository.list_livreurs(disponible).await
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<Livreur> {
        self.repository
            .find_livreur(id)
            .await?
            .ok_or_else(|| not_found_error("Livreur", id))
    }

    pub async fn create(&self, request: CreateLivreurRequest) -> AppResult<Livreur> {
        request.validate()?;

        let password_hash = self.hash_password(&request.password)?;
        let livreur = self
            .repository
            .create_livreur(NewLivreur {
                nom: request.nom.trim().to_string(),
                email: request.email.trim().to_string(),
                disponible: request.disponible,
                password_hash,
            })
            .await?;

        info!(livreur_id = livreur.id, "🧑‍✈️ Livreur creado: {}", livreur.nom);
        Ok(livreur)
    }

    pub async fn update(&self, id: i64, request: UpdateLivreurRequest) -> AppResult<Livreur> {
        request.validate()?;

        let password_hash = match request.password.as_deref() {
            Some(password) => Some(self.hash_password(password)?),
            None => None,
        };

        let patch = LivreurPatch {
            nom: request.nom.map(|nom| nom.trim().to_string()),
            email: request.email.map(|email| email.trim().to_string()),
            disponible: request.disponible,
            password_hash,
        };

        let livreur = self.repository.update_livreur(id, patch).await?;
        info!(
            livreur_id = id,
            disponible = livreur.disponible,
            "✏️ Livreur actualizado"
        );

        Ok(livreur)
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        self.repository.delete_livreur(id).await?;
        info!(livreur_id = id, "🗑️ Livreur eliminado");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::InMemoryDeliveryRepository;

    const TEST_COST: u32 = 4;

    fn controller() -> LivreurController {
        LivreurController::new(Arc::new(InMemoryDeliveryRepository::new()), TEST_COST)
    }

    fn request(email: &str) -> CreateLivreurRequest {
        CreateLivreurRequest {
            nom: "Jean Dupont".to_string(),
            email: email.to_string(),
            disponible: true,
            password: "defaultPassword123".to_string(),
        }
    }

    #[tokio::test]
    async fn test_password_is_hashed() {
        let controller = controller();
        let livreur = controller.create(request("jean@example.com")).await.unwrap();

        assert_ne!(livreur.password_hash, "defaultPassword123");
        let matches = bcrypt::verify("defaultPassword123", &livreur.password_hash).unwrap();
        assert!(matches);
    }

    #[tokio::test]
    async fn test_invalid_email_is_rejected() {
        let controller = controller();
        let err = controller.create(request("jean")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_toggle_availability_keeps_password() {
        let controller = controller();
        let livreur = controller.create(request("jean@example.com")).await.unwrap();

        let updated = controller
            .update(
                livreur.id,
                UpdateLivreurRequest {
                    disponible: Some(false),
                    ..UpdateLivreurRequest::default()
                },
            )
            .await
            .unwrap();

        assert!(!updated.disponible);
        assert_eq!(updated.password_hash, livreur.password_hash);
        assert!(controller.list(Some(true)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let controller = controller();
        let livreur = controller.create(request("jean@example.com")).await.unwrap();

        controller.delete(livreur.id).await.unwrap();
        assert!(matches!(
            controller.delete(livreur.id).await,
            Err(AppError::NotFound(_))
        ));
    }
}

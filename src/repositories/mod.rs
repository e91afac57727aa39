//! Repositorios
//!
//! `DeliveryRepository` es el contrato de almacenamiento de demandes,
//! livreurs y managers. Hay dos implementaciones:
//! - `PgDeliveryRepository`: PostgreSQL vía sqlx (producción)
//! - `InMemoryDeliveryRepository`: mapas en memoria (tests y demos locales)
//!
//! Las lecturas de un id inexistente devuelven `Ok(None)` en `find_*`; el resto
//! de operaciones sobre un id inexistente falla con `AppError::NotFound`.
//! Las listas nunca fallan por estar vacías.

pub mod memory_repository;
pub mod postgres_repository;

use async_trait::async_trait;

use crate::models::{
    Assignment, Demande, DemandePatch, Livreur, LivreurPatch, Manager, NewDemande, NewLivreur,
};
use crate::utils::errors::AppResult;

pub use memory_repository::InMemoryDeliveryRepository;
pub use postgres_repository::PgDeliveryRepository;

#[async_trait]
pub trait DeliveryRepository: Send + Sync {
    /// Nombre del backend, para logs y health check
    fn backend_name(&self) -> &'static str;

    // Demandes

    async fn list_demandes(&self) -> AppResult<Vec<Demande>>;

    async fn find_demande(&self, id: i64) -> AppResult<Option<Demande>>;

    async fn demandes_by_manager(&self, manager_id: i64) -> AppResult<Vec<Demande>>;

    async fn demandes_by_livreur(&self, livreur_id: i64) -> AppResult<Vec<Demande>>;

    async fn unassigned_demandes(&self) -> AppResult<Vec<Demande>>;

    /// Falla con `NotFound` si el manager no existe
    async fn create_demande(&self, demande: NewDemande) -> AppResult<Demande>;

    async fn update_demande(&self, id: i64, patch: DemandePatch) -> AppResult<Demande>;

    /// Borrado definitivo; un segundo borrado falla con `NotFound`
    async fn delete_demande(&self, id: i64) -> AppResult<()>;

    /// Asignación atómica (ver `Demande::assign_to`)
    async fn assign_livreur(&self, assignment: Assignment) -> AppResult<Demande>;

    /// Crear y asignar en una sola unidad de trabajo: o las dos cosas o ninguna
    async fn create_and_assign(
        &self,
        demande: NewDemande,
        livreur_id: i64,
        at: chrono::DateTime<chrono::Utc>,
    ) -> AppResult<Demande>;

    // Livreurs

    async fn list_livreurs(&self, disponible: Option<bool>) -> AppResult<Vec<Livreur>>;

    async fn find_livreur(&self, id: i64) -> AppResult<Option<Livreur>>;

    /// Falla con `Conflict` si el email ya existe
    async fn create_livreur(&self, livreur: NewLivreur) -> AppResult<Livreur>;

    async fn update_livreur(&self, id: i64, patch: LivreurPatch) -> AppResult<Livreur>;

    /// Desvincula al livreur de sus demandes antes de borrarlo
    async fn delete_livreur(&self, id: i64) -> AppResult<()>;

    // Managers

    async fn list_managers(&self) -> AppResult<Vec<Manager>>;

    async fn find_manager(&self, id: i64) -> AppResult<Option<Manager>>;
}

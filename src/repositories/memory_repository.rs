//! Repositorio en memoria
//!
//! Guarda los registros normalizados (la demande referencia manager y livreur
//! por id) detrás de un único `RwLock`; cada operación de escritura es una
//! unidad de trabajo completa bajo el guard de escritura.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tracing::debug;

use super::DeliveryRepository;
use crate::models::{
    Assignment, Demande, DemandePatch, Livreur, LivreurPatch, Manager, NewDemande, NewLivreur,
    StatusDemande,
};
use crate::utils::errors::{conflict_error, not_found_error, AppError, AppResult};

#[derive(Debug, Clone)]
struct DemandeRecord {
    id: i64,
    lieu_depart: String,
    lieu_arrivee: String,
    statut: StatusDemande,
    created_at: DateTime<Utc>,
    assigned_at: Option<DateTime<Utc>>,
    manager_id: i64,
    livreur_id: Option<i64>,
}

#[derive(Debug, Default)]
struct Store {
    managers: BTreeMap<i64, Manager>,
    livreurs: BTreeMap<i64, Livreur>,
    demandes: BTreeMap<i64, DemandeRecord>,
    last_demande_id: i64,
    last_livreur_id: i64,
}

impl Store {
    fn materialize(&self, record: &DemandeRecord) -> AppResult<Demande> {
        let manager = self.managers.get(&record.manager_id).cloned().ok_or_else(|| {
            AppError::Internal(format!(
                "demande {} references missing manager {}",
                record.id, record.manager_id
            ))
        })?;

        Ok(Demande {
            id: record.id,
            lieu_depart: record.lieu_depart.clone(),
            lieu_arrivee: record.lieu_arrivee.clone(),
            statut: record.statut,
            created_at: record.created_at,
            assigned_at: record.assigned_at,
            manager,
            livreur: record
                .livreur_id
                .and_then(|id| self.livreurs.get(&id).cloned()),
        })
    }

    fn collect_demandes<F>(&self, filter: F) -> AppResult<Vec<Demande>>
    where
        F: Fn(&DemandeRecord) -> bool,
    {
        self.demandes
            .values()
            .filter(|record| filter(record))
            .map(|record| self.materialize(record))
            .collect()
    }

    fn demande(&self, id: i64) -> AppResult<Demande> {
        let record = self
            .demandes
            .get(&id)
            .ok_or_else(|| not_found_error("Demande", id))?;
        self.materialize(record)
    }

    fn livreur(&self, id: i64) -> AppResult<Livreur> {
        self.livreurs
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found_error("Livreur", id))
    }

    fn insert_demande(&mut self, demande: NewDemande) -> AppResult<i64> {
        if !self.managers.contains_key(&demande.manager_id) {
            return Err(not_found_error("Manager", demande.manager_id));
        }

        self.last_demande_id += 1;
        let id = self.last_demande_id;
        self.demandes.insert(
            id,
            DemandeRecord {
                id,
                lieu_depart: demande.lieu_depart,
                lieu_arrivee: demande.lieu_arrivee,
                statut: StatusDemande::Created,
                created_at: Utc::now(),
                assigned_at: None,
                manager_id: demande.manager_id,
                livreur_id: None,
            },
        );
        Ok(id)
    }

    fn save_demande(&mut self, demande: &Demande) {
        if let Some(record) = self.demandes.get_mut(&demande.id) {
            record.lieu_depart = demande.lieu_depart.clone();
            record.lieu_arrivee = demande.lieu_arrivee.clone();
            record.statut = demande.statut;
            record.assigned_at = demande.assigned_at;
            record.livreur_id = demande.livreur.as_ref().map(|l| l.id);
        }
    }

    fn assign(&mut self, assignment: Assignment) -> AppResult<Demande> {
        let mut demande = self.demande(assignment.demande_id)?;
        let livreur = self.livreur(assignment.livreur_id)?;
        if !self.managers.contains_key(&assignment.manager_id) {
            return Err(not_found_error("Manager", assignment.manager_id));
        }

        demande.ensure_owned_by(assignment.manager_id)?;
        demande.assign_to(livreur, assignment.at)?;
        self.save_demande(&demande);

        Ok(demande)
    }

    fn ensure_email_free(&self, email: &str, except: Option<i64>) -> AppResult<()> {
        let taken = self
            .livreurs
            .values()
            .any(|l| l.email == email && Some(l.id) != except);
        if taken {
            return Err(conflict_error("Livreur", "email", email));
        }
        Ok(())
    }
}

/// Repositorio en memoria, seguro entre tareas
#[derive(Debug, Default)]
pub struct InMemoryDeliveryRepository {
    store: RwLock<Store>,
}

impl InMemoryDeliveryRepository {
    /// Repositorio vacío, sin managers
    pub fn new() -> Self {
        Self::default()
    }

    /// Repositorio con los managers dados
    pub fn with_managers(managers: Vec<Manager>) -> Self {
        let store = Store {
            managers: managers.into_iter().map(|m| (m.id, m)).collect(),
            ..Store::default()
        };
        Self {
            store: RwLock::new(store),
        }
    }

    /// Repositorio con el manager por defecto (id 1), igual que la migración inicial
    pub fn seeded() -> Self {
        Self::with_managers(vec![Manager::new(
            1,
            "Manager Principal",
            "manager@livraison.local",
        )])
    }
}

#[async_trait]
impl DeliveryRepository for InMemoryDeliveryRepository {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn list_demandes(&self) -> AppResult<Vec<Demande>> {
        self.store.read().await.collect_demandes(|_| true)
    }

    async fn find_demande(&self, id: i64) -> AppResult<Option<Demande>> {
        let store = self.store.read().await;
        store
            .demandes
            .get(&id)
            .map(|record| store.materialize(record))
            .transpose()
    }

    async fn demandes_by_manager(&self, manager_id: i64) -> AppResult<Vec<Demande>> {
        self.store
            .read()
            .await
            .collect_demandes(|record| record.manager_id == manager_id)
    }

    async fn demandes_by_livreur(&self, livreur_id: i64) -> AppResult<Vec<Demande>> {
        self.store
            .read()
            .await
            .collect_demandes(|record| record.livreur_id == Some(livreur_id))
    }

    async fn unassigned_demandes(&self) -> AppResult<Vec<Demande>> {
        self.store
            .read()
            .await
            .collect_demandes(|record| record.livreur_id.is_none())
    }

    async fn create_demande(&self, demande: NewDemande) -> AppResult<Demande> {
        let mut store = self.store.write().await;
        let id = store.insert_demande(demande)?;
        debug!("💾 Demande {} guardada en memoria", id);
        store.demande(id)
    }

    async fn update_demande(&self, id: i64, patch: DemandePatch) -> AppResult<Demande> {
        let mut store = self.store.write().await;
        let mut demande = store.demande(id)?;

        let livreur = match patch.livreur_id {
            None => None,
            Some(None) => Some(None),
            Some(Some(livreur_id)) => Some(Some(store.livreur(livreur_id)?)),
        };

        demande.apply_update(patch, livreur)?;
        store.save_demande(&demande);

        Ok(demande)
    }

    async fn delete_demande(&self, id: i64) -> AppResult<()> {
        let mut store = self.store.write().await;
        store
            .demandes
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| not_found_error("Demande", id))
    }

    async fn assign_livreur(&self, assignment: Assignment) -> AppResult<Demande> {
        self.store.write().await.assign(assignment)
    }

    async fn create_and_assign(
        &self,
        demande: NewDemande,
        livreur_id: i64,
        at: DateTime<Utc>,
    ) -> AppResult<Demande> {
        let mut store = self.store.write().await;
        let manager_id = demande.manager_id;
        let id = store.insert_demande(demande)?;

        let assignment = Assignment {
            demande_id: id,
            livreur_id,
            manager_id,
            at,
        };

        match store.assign(assignment) {
            Ok(demande) => Ok(demande),
            Err(e) => {
                // Deshacer la creación
                store.demandes.remove(&id);
                Err(e)
            }
        }
    }

    async fn list_livreurs(&self, disponible: Option<bool>) -> AppResult<Vec<Livreur>> {
        let store = self.store.read().await;
        Ok(store
            .livreurs
            .values()
            .filter(|l| disponible.map_or(true, |d| l.disponible == d))
            .cloned()
            .collect())
    }

    async fn find_livreur(&self, id: i64) -> AppResult<Option<Livreur>> {
        Ok(self.store.read().await.livreurs.get(&id).cloned())
    }

    async fn create_livreur(&self, livreur: NewLivreur) -> AppResult<Livreur> {
        let mut store = self.store.write().await;
        store.ensure_email_free(&livreur.email, None)?;

        store.last_livreur_id += 1;
        let created = Livreur {
            id: store.last_livreur_id,
            nom: livreur.nom,
            email: livreur.email,
            disponible: livreur.disponible,
            password_hash: livreur.password_hash,
        };
        store.livreurs.insert(created.id, created.clone());

        Ok(created)
    }

    async fn update_livreur(&self, id: i64, patch: LivreurPatch) -> AppResult<Livreur> {
        let mut store = self.store.write().await;
        let mut livreur = store.livreur(id)?;
        if let Some(email) = &patch.email {
            store.ensure_email_free(email, Some(id))?;
        }

        livreur.apply_patch(patch);
        store.livreurs.insert(id, livreur.clone());

        Ok(livreur)
    }

    async fn delete_livreur(&self, id: i64) -> AppResult<()> {
        let mut store = self.store.write().await;
        if store.livreurs.remove(&id).is_none() {
            return Err(not_found_error("Livreur", id));
        }

        for record in store.demandes.values_mut() {
            if record.livreur_id == Some(id) {
                record.livreur_id = None;
            }
        }

        Ok(())
    }

    async fn list_managers(&self) -> AppResult<Vec<Manager>> {
        Ok(self.store.read().await.managers.values().cloned().collect())
    }

    async fn find_manager(&self, id: i64) -> AppResult<Option<Manager>> {
        Ok(self.store.read().await.managers.get(&id).cloned())
    }
}

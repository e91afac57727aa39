//! Modelo de Demande
//!
//! Una demande de livraison pertenece a un manager durante toda su vida y
//! tiene como máximo un livreur asignado. Las reglas de asignación y de
//! actualización viven aquí, de forma pura, para que ambos repositorios
//! (PostgreSQL y memoria) apliquen exactamente la misma semántica dentro
//! de su unidad de trabajo.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::livreur::Livreur;
use super::manager::Manager;
use super::status::StatusDemande;
use crate::utils::errors::{forbidden_error, AppError, AppResult};

/// Demande de livraison tal como la expone la API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Demande {
    pub id: i64,
    pub lieu_depart: String,
    pub lieu_arrivee: String,
    pub statut: StatusDemande,
    pub created_at: DateTime<Utc>,
    pub assigned_at: Option<DateTime<Utc>>,
    pub manager: Manager,
    pub livreur: Option<Livreur>,
}

/// Datos de creación, ya validados
#[derive(Debug, Clone)]
pub struct NewDemande {
    pub lieu_depart: String,
    pub lieu_arrivee: String,
    pub manager_id: i64,
}

impl NewDemande {
    pub fn new(lieu_depart: &str, lieu_arrivee: &str, manager_id: i64) -> Self {
        Self {
            lieu_depart: lieu_depart.trim().to_string(),
            lieu_arrivee: lieu_arrivee.trim().to_string(),
            manager_id,
        }
    }
}

/// Actualización parcial de una demande.
///
/// `livreur_id`: `None` = sin cambios, `Some(None)` = desasignar,
/// `Some(Some(id))` = vincular otro livreur (sin efectos de asignación).
#[derive(Debug, Clone, Default)]
pub struct DemandePatch {
    pub lieu_depart: Option<String>,
    pub lieu_arrivee: Option<String>,
    pub statut: Option<StatusDemande>,
    pub livreur_id: Option<Option<i64>>,
}

/// Petición de asignación de un livreur a una demande
#[derive(Debug, Clone, Copy)]
pub struct Assignment {
    pub demande_id: i64,
    pub livreur_id: i64,
    pub manager_id: i64,
    pub at: DateTime<Utc>,
}

impl Demande {
    pub fn is_assigned(&self) -> bool {
        self.livreur.is_some()
    }

    /// El manager que actúa debe ser el propietario de la demande
    pub fn ensure_owned_by(&self, manager_id: i64) -> AppResult<()> {
        if self.manager.id != manager_id {
            return Err(forbidden_error(
                "assign livreur",
                &format!(
                    "demande {} belongs to manager {}, not {}",
                    self.id, self.manager.id, manager_id
                ),
            ));
        }
        Ok(())
    }

    /// Vincular un livreur.
    ///
    /// `CREATED` pasa a `ASSIGNED`; `assigned_at` solo se fija la primera vez.
    /// Reasignar el mismo livreur no cambia nada.
    pub fn assign_to(&mut self, livreur: Livreur, at: DateTime<Utc>) -> AppResult<()> {
        if self.statut.is_terminal() {
            return Err(AppError::Conflict(format!(
                "Demande {} is {} and can no longer be assigned",
                self.id, self.statut
            )));
        }

        let already_bound = self.livreur.as_ref().map(|l| l.id) == Some(livreur.id);
        if !already_bound && !livreur.disponible {
            return Err(AppError::Conflict(format!(
                "Livreur {} is not available",
                livreur.id
            )));
        }

        if self.statut == StatusDemande::Created {
            self.statut = StatusDemande::Assigned;
        }
        if self.assigned_at.is_none() {
            self.assigned_at = Some(at);
        }
        self.livreur = Some(livreur);

        Ok(())
    }

    /// Fusionar una actualización parcial.
    ///
    /// `livreur` es el `patch.livreur_id` ya resuelto por el repositorio.
    /// Vincular un livreur por aquí no toca ni `assigned_at` ni el estado.
    /// Pasar a `ASSIGNED` o `EN_COURS` exige un livreur vinculado tras el
    /// merge; si la demande llega a `ASSIGNED` así, `assigned_at` se fija.
    pub fn apply_update(
        &mut self,
        patch: DemandePatch,
        livreur: Option<Option<Livreur>>,
    ) -> AppResult<()> {
        if let Some(next) = patch.statut {
            if !self.statut.can_transition_to(next) {
                return Err(AppError::Conflict(format!(
                    "Demande {} cannot move from {} to {}",
                    self.id, self.statut, next
                )));
            }

            let bound = match &livreur {
                Some(resolved) => resolved.is_some(),
                None => self.is_assigned(),
            };
            if next != self.statut && next.requires_livreur() && !bound {
                return Err(AppError::Conflict(format!(
                    "Demande {} needs a livreur before moving to {}",
                    self.id, next
                )));
            }
        }

        if let Some(lieu_depart) = patch.lieu_depart {
            self.lieu_depart = lieu_depart.trim().to_string();
        }
        if let Some(lieu_arrivee) = patch.lieu_arrivee {
            self.lieu_arrivee = lieu_arrivee.trim().to_string();
        }
        if let Some(statut) = patch.statut {
            if statut == StatusDemande::Assigned && self.assigned_at.is_none() {
                self.assigned_at = Some(Utc::now());
            }
            self.statut = statut;
        }
        if let Some(livreur) = livreur {
            self.livreur = livreur;
        }

        Ok(())
    }
}

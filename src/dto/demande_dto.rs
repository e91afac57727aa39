use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{DemandePatch, StatusDemande};
use crate::utils::nullable::deserialize_nullable;

// Body de POST /demandes
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateDemandeRequest {
    #[validate(custom = "crate::utils::validation::validate_place")]
    pub lieu_depart: String,

    #[validate(custom = "crate::utils::validation::validate_place")]
    pub lieu_arrivee: String,
}

// Query de POST /demandes?managerId=..[&livreurId=..]
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDemandeParams {
    pub manager_id: i64,
    pub livreur_id: Option<i64>,
}

// Query de POST /demandes/{id}/assign-livreur
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignLivreurParams {
    pub livreur_id: i64,
    pub manager_id: i64,
}

// Referencia a un livreur dentro de un body parcial; el resto de campos se ignora
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LivreurRef {
    pub id: i64,
}

// Body de PUT /demandes/{id}: cualquier subconjunto de campos de una Demande.
// Los campos de solo lectura (id, createdAt, assignedAt, manager) se ignoran.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDemandeRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom = "crate::utils::validation::validate_place")]
    pub lieu_depart: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom = "crate::utils::validation::validate_place")]
    pub lieu_arrivee: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub statut: Option<StatusDemande>,

    #[serde(
        default,
        deserialize_with = "deserialize_nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub livreur: Option<Option<LivreurRef>>,
}

impl From<UpdateDemandeRequest> for DemandePatch {
    fn from(request: UpdateDemandeRequest) -> Self {
        Self {
            lieu_depart: request.lieu_depart,
            lieu_arrivee: request.lieu_arrivee,
            statut: request.statut,
            livreur_id: request.livreur.map(|livreur| livreur.map(|l| l.id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_request_validation() {
        let ok = CreateDemandeRequest {
            lieu_depart: "Lyon".to_string(),
            lieu_arrivee: "Paris".to_string(),
        };
        assert!(ok.validate().is_ok());

        let short = CreateDemandeRequest {
            lieu_depart: "L".to_string(),
            lieu_arrivee: "".to_string(),
        };
        let errors = short.validate().unwrap_err();
        assert_eq!(errors.field_errors().len(), 2);
    }

    #[test]
    fn test_partial_body_from_frontend() {
        // El formulario de edición envía solo lieuDepart, lieuArrivee y statut
        let request: UpdateDemandeRequest = serde_json::from_value(json!({
            "lieuDepart": "Lyon",
            "lieuArrivee": "Nice",
            "statut": "EN_COURS"
        }))
        .unwrap();
        assert!(request.validate().is_ok());

        let patch = DemandePatch::from(request);
        assert_eq!(patch.statut, Some(StatusDemande::EnCours));
        assert_eq!(patch.livreur_id, None);
    }

    #[test]
    fn test_full_demande_body_is_accepted() {
        let request: UpdateDemandeRequest = serde_json::from_value(json!({
            "id": 3,
            "lieuDepart": "Lyon",
            "lieuArrivee": "Nice",
            "statut": "ASSIGNED",
            "createdAt": "2025-01-01T10:00:00Z",
            "manager": { "id": 1, "nom": "M", "email": "m@example.com" },
            "livreur": { "id": 9, "nom": "L", "email": "l@example.com", "disponible": true }
        }))
        .unwrap();

        let patch = DemandePatch::from(request);
        assert_eq!(patch.livreur_id, Some(Some(9)));
    }

    #[test]
    fn test_explicit_null_livreur_unassigns() {
        let request: UpdateDemandeRequest =
            serde_json::from_value(json!({ "livreur": null })).unwrap();
        assert_eq!(DemandePatch::from(request).livreur_id, Some(None));
    }

    #[test]
    fn test_update_request_serializes_only_supplied_fields() {
        let request = UpdateDemandeRequest {
            statut: Some(StatusDemande::Livre),
            ..UpdateDemandeRequest::default()
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({ "statut": "LIVRE" })
        );

        let unassign = UpdateDemandeRequest {
            livreur: Some(None),
            ..UpdateDemandeRequest::default()
        };
        assert_eq!(
            serde_json::to_value(&unassign).unwrap(),
            json!({ "livreur": null })
        );
    }
}

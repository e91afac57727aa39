use serde::{Deserialize, Serialize};
use validator::Validate;

fn default_disponible() -> bool {
    true
}

// Body de POST /livreurs
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateLivreurRequest {
    #[validate(custom = "crate::utils::validation::validate_name")]
    pub nom: String,

    #[validate(email)]
    pub email: String,

    #[serde(default = "default_disponible")]
    pub disponible: bool,

    #[validate(custom = "crate::utils::validation::validate_password")]
    pub password: String,
}

// Body de PUT /livreurs/{id}; el front-end envía el objeto completo (id incluido)
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLivreurRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom = "crate::utils::validation::validate_name")]
    pub nom: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(email)]
    pub email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub disponible: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom = "crate::utils::validation::validate_password")]
    pub password: Option<String>,
}

// Filtros de GET /livreurs
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct LivreurFilters {
    pub disponible: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_defaults_to_available() {
        let request: CreateLivreurRequest = serde_json::from_value(json!({
            "nom": "Jean",
            "email": "jean@example.com",
            "password": "secret"
        }))
        .unwrap();

        assert!(request.disponible);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_create_validation_errors() {
        let request = CreateLivreurRequest {
            nom: "J".to_string(),
            email: "not-an-email".to_string(),
            disponible: true,
            password: String::new(),
        };

        let errors = request.validate().unwrap_err();
        assert_eq!(errors.field_errors().len(), 3);
    }

    #[test]
    fn test_update_accepts_full_object() {
        let request: UpdateLivreurRequest = serde_json::from_value(json!({
            "id": 4,
            "nom": "Jean",
            "email": "jean@example.com",
            "disponible": false,
            "password": "defaultPassword123"
        }))
        .unwrap();

        assert!(request.validate().is_ok());
        assert_eq!(request.disponible, Some(false));
    }
}

//! Modelo de Livreur
//!
//! La contraseña solo existe como hash bcrypt y nunca se serializa.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Livreur - mapea a la tabla livreurs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Livreur {
    pub id: i64,
    pub nom: String,
    pub email: String,
    pub disponible: bool,
    #[serde(skip)]
    pub password_hash: String,
}

/// Datos de un livreur nuevo, ya validados y con la contraseña hasheada
#[derive(Debug, Clone)]
pub struct NewLivreur {
    pub nom: String,
    pub email: String,
    pub disponible: bool,
    pub password_hash: String,
}

/// Actualización parcial de un livreur
#[derive(Debug, Clone, Default)]
pub struct LivreurPatch {
    pub nom: Option<String>,
    pub email: Option<String>,
    pub disponible: Option<bool>,
    pub password_hash: Option<String>,
}

impl Livreur {
    pub fn apply_patch(&mut self, patch: LivreurPatch) {
        if let Some(nom) = patch.nom {
            self.nom = nom;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(disponible) = patch.disponible {
            self.disponible = disponible;
        }
        if let Some(password_hash) = patch.password_hash {
            self.password_hash = password_hash;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_never_serialized() {
        let livreur = Livreur {
            id: 1,
            nom: "Jean".to_string(),
            email: "jean@example.com".to_string(),
            disponible: true,
            password_hash: "$2b$04$secret".to_string(),
        };

        let json = serde_json::to_value(&livreur).unwrap();
        assert_eq!(json["nom"], "Jean");
        assert!(json.get("password_hash").is_none());
        assert!(json.get("passwordHash").is_none());
    }

    #[test]
    fn test_apply_patch_merges_only_supplied_fields() {
        let mut livreur = Livreur {
            id: 1,
            nom: "Jean".to_string(),
            email: "jean@example.com".to_string(),
            disponible: true,
            password_hash: "hash".to_string(),
        };

        livreur.apply_patch(LivreurPatch {
            disponible: Some(false),
            ..LivreurPatch::default()
        });

        assert_eq!(livreur.nom, "Jean");
        assert!(!livreur.disponible);
        assert_eq!(livreur.password_hash, "hash");
    }
}

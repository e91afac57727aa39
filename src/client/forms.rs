//! Estado de los formularios de demande y de livreur
//!
//! Un error de campo solo se muestra cuando el campo fue tocado; un submit
//! inválido marca todos los campos como tocados.

use std::collections::HashSet;

use validator::ValidationError;

use crate::dto::demande_dto::{CreateDemandeRequest, UpdateDemandeRequest};
use crate::dto::livreur_dto::{CreateLivreurRequest, UpdateLivreurRequest};
use crate::models::{Demande, Livreur, StatusDemande};
use crate::utils::validation::{
    validate_email, validate_name, validate_password, validate_place, MAX_TEXT_LENGTH,
    MIN_TEXT_LENGTH,
};

/// Mensaje de un error de validación de texto para la interfaz
fn text_error_message(display_name: &str, value: &str, error: &ValidationError) -> String {
    match error.code.as_ref() {
        "required" => format!("{} is required", display_name),
        "email" => "Please enter a valid email address".to_string(),
        "length" if value.trim().chars().count() < MIN_TEXT_LENGTH => format!(
            "{} must be at least {} characters",
            display_name, MIN_TEXT_LENGTH
        ),
        "length" => format!(
            "{} must be at most {} characters",
            display_name, MAX_TEXT_LENGTH
        ),
        other => format!("{} is invalid ({})", display_name, other),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DemandeField {
    LieuDepart,
    LieuArrivee,
}

impl DemandeField {
    pub const ALL: [DemandeField; 2] = [DemandeField::LieuDepart, DemandeField::LieuArrivee];

    pub fn display_name(&self) -> &'static str {
        match self {
            DemandeField::LieuDepart => "Departure location",
            DemandeField::LieuArrivee => "Arrival location",
        }
    }
}

/// Formulario de creación / edición de una demande
#[derive(Debug, Clone)]
pub struct DemandeForm {
    pub lieu_depart: String,
    pub lieu_arrivee: String,
    pub statut: StatusDemande,
    /// Livreur elegido al crear (opcional)
    pub livreur_id: Option<i64>,
    touched: HashSet<DemandeField>,
}

impl Default for DemandeForm {
    fn default() -> Self {
        Self {
            lieu_depart: String::new(),
            lieu_arrivee: String::new(),
            statut: StatusDemande::Created,
            livreur_id: None,
            touched: HashSet::new(),
        }
    }
}

impl DemandeForm {
    /// Rellenar el formulario con una demande existente (modo edición)
    pub fn from_demande(demande: &Demande) -> Self {
        Self {
            lieu_depart: demande.lieu_depart.clone(),
            lieu_arrivee: demande.lieu_arrivee.clone(),
            statut: demande.statut,
            livreur_id: demande.livreur.as_ref().map(|l| l.id),
            touched: HashSet::new(),
        }
    }

    pub fn value(&self, field: DemandeField) -> &str {
        match field {
            DemandeField::LieuDepart => &self.lieu_depart,
            DemandeField::LieuArrivee => &self.lieu_arrivee,
        }
    }

    pub fn touch(&mut self, field: DemandeField) {
        self.touched.insert(field);
    }

    pub fn is_touched(&self, field: DemandeField) -> bool {
        self.touched.contains(&field)
    }

    pub fn mark_all_touched(&mut self) {
        self.touched.extend(DemandeField::ALL);
    }

    fn check(&self, field: DemandeField) -> Option<String> {
        let value = self.value(field);
        validate_place(value)
            .err()
            .map(|e| text_error_message(field.display_name(), value, &e))
    }

    /// Error visible del campo, solo si fue tocado
    pub fn field_error(&self, field: DemandeField) -> Option<String> {
        if !self.is_touched(field) {
            return None;
        }
        self.check(field)
    }

    pub fn is_valid(&self) -> bool {
        DemandeField::ALL.iter().all(|f| self.check(*f).is_none())
    }

    pub fn status_options() -> [StatusDemande; 5] {
        StatusDemande::all()
    }

    pub fn to_create_request(&self) -> CreateDemandeRequest {
        CreateDemandeRequest {
            lieu_depart: self.lieu_depart.trim().to_string(),
            lieu_arrivee: self.lieu_arrivee.trim().to_string(),
        }
    }

    /// Body parcial del modo edición: lugares y estado, sin tocar el livreur
    pub fn to_update_request(&self) -> UpdateDemandeRequest {
        UpdateDemandeRequest {
            lieu_depart: Some(self.lieu_depart.trim().to_string()),
            lieu_arrivee: Some(self.lieu_arrivee.trim().to_string()),
            statut: Some(self.statut),
            livreur: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LivreurField {
    Nom,
    Email,
    Password,
}

impl LivreurField {
    pub const ALL: [LivreurField; 3] = [
        LivreurField::Nom,
        LivreurField::Email,
        LivreurField::Password,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            LivreurField::Nom => "Name",
            LivreurField::Email => "Email",
            LivreurField::Password => "Password",
        }
    }
}

/// Formulario de alta / edición de un livreur.
///
/// En edición la contraseña es opcional: vacía significa "no cambiar".
#[derive(Debug, Clone)]
pub struct LivreurForm {
    pub nom: String,
    pub email: String,
    pub disponible: bool,
    pub password: String,
    editing: bool,
    touched: HashSet<LivreurField>,
}

impl Default for LivreurForm {
    fn default() -> Self {
        Self {
            nom: String::new(),
            email: String::new(),
            disponible: true,
            password: String::new(),
            editing: false,
            touched: HashSet::new(),
        }
    }
}

impl LivreurForm {
    pub fn for_livreur(livreur: &Livreur) -> Self {
        Self {
            nom: livreur.nom.clone(),
            email: livreur.email.clone(),
            disponible: livreur.disponible,
            password: String::new(),
            editing: true,
            touched: HashSet::new(),
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn touch(&mut self, field: LivreurField) {
        self.touched.insert(field);
    }

    pub fn mark_all_touched(&mut self) {
        self.touched.extend(LivreurField::ALL);
    }

    fn check(&self, field: LivreurField) -> Option<String> {
        let (value, result) = match field {
            LivreurField::Nom => (&self.nom, validate_name(&self.nom)),
            LivreurField::Email => {
                let email = self.email.trim();
                let result = if email.is_empty() {
                    Err(ValidationError::new("required"))
                } else {
                    validate_email(email)
                };
                (&self.email, result)
            }
            LivreurField::Password if self.editing && self.password.is_empty() => return None,
            LivreurField::Password => (&self.password, validate_password(&self.password)),
        };
        result
            .err()
            .map(|e| text_error_message(field.display_name(), value, &e))
    }

    pub fn field_error(&self, field: LivreurField) -> Option<String> {
        if !self.touched.contains(&field) {
            return None;
        }
        self.check(field)
    }

    pub fn is_valid(&self) -> bool {
        LivreurField::ALL.iter().all(|f| self.check(*f).is_none())
    }

    pub fn to_create_request(&self) -> CreateLivreurRequest {
        CreateLivreurRequest {
            nom: self.nom.trim().to_string(),
            email: self.email.trim().to_string(),
            disponible: self.disponible,
            password: self.password.clone(),
        }
    }

    pub fn to_update_request(&self) -> UpdateLivreurRequest {
        UpdateLivreurRequest {
            nom: Some(self.nom.trim().to_string()),
            email: Some(self.email.trim().to_string()),
            disponible: Some(self.disponible),
            password: (!self.password.is_empty()).then(|| self.password.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untouched_fields_show_no_error() {
        let form = DemandeForm::default();
        assert!(!form.is_valid());
        assert_eq!(form.field_error(DemandeField::LieuDepart), None);
    }

    #[test]
    fn test_demande_messages() {
        let mut form = DemandeForm {
            lieu_arrivee: "P".to_string(),
            ..DemandeForm::default()
        };
        form.mark_all_touched();

        assert_eq!(
            form.field_error(DemandeField::LieuDepart).as_deref(),
            Some("Departure location is required")
        );
        assert_eq!(
            form.field_error(DemandeField::LieuArrivee).as_deref(),
            Some("Arrival location must be at least 2 characters")
        );
    }

    #[test]
    fn test_demande_requests_are_trimmed() {
        let form = DemandeForm {
            lieu_depart: "  Lyon ".to_string(),
            lieu_arrivee: "Paris".to_string(),
            ..DemandeForm::default()
        };
        assert!(form.is_valid());
        assert_eq!(form.to_create_request().lieu_depart, "Lyon");

        let update = form.to_update_request();
        assert_eq!(update.statut, Some(StatusDemande::Created));
        assert_eq!(update.livreur, None);
    }

    #[test]
    fn test_livreur_messages() {
        let mut form = LivreurForm {
            nom: "J".to_string(),
            email: "jean-at-example".to_string(),
            ..LivreurForm::default()
        };
        form.mark_all_touched();

        assert_eq!(
            form.field_error(LivreurField::Nom).as_deref(),
            Some("Name must be at least 2 characters")
        );
        assert_eq!(
            form.field_error(LivreurField::Email).as_deref(),
            Some("Please enter a valid email address")
        );
        assert_eq!(
            form.field_error(LivreurField::Password).as_deref(),
            Some("Password is required")
        );

        form.email = String::new();
        assert_eq!(
            form.field_error(LivreurField::Email).as_deref(),
            Some("Email is required")
        );
    }

    #[test]
    fn test_password_optional_when_editing() {
        let livreur = Livreur {
            id: 4,
            nom: "Jean".to_string(),
            email: "jean@example.com".to_string(),
            disponible: false,
            password_hash: String::new(),
        };
        let form = LivreurForm::for_livreur(&livreur);

        assert!(form.is_editing());
        assert!(form.is_valid());
        assert_eq!(form.to_update_request().password, None);
        assert_eq!(form.to_update_request().disponible, Some(false));
    }
}

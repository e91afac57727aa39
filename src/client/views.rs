//! Estado de las vistas del front-end
//!
//! Cada vista guarda los flags `loading` / `error` y muestra un mensaje
//! genérico por operación; el error tipado se registra con `tracing`.

use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

use super::demande_client::DemandeApiClient;
use super::error::ClientError;
use super::forms::{DemandeForm, LivreurForm};
use super::livreur_client::LivreurApiClient;
use crate::dto::livreur_dto::UpdateLivreurRequest;
use crate::models::{Demande, Livreur};

pub const LOAD_DEMANDES_ERROR: &str = "Failed to load demandes. Please try again.";
pub const DELETE_DEMANDE_ERROR: &str = "Failed to delete demande. Please try again.";
pub const LOAD_DEMANDE_ERROR: &str = "Failed to load demande. Please try again.";
pub const CREATE_DEMANDE_ERROR: &str = "Failed to create demande. Please try again.";
pub const UPDATE_DEMANDE_ERROR: &str = "Failed to update demande. Please try again.";
pub const LOAD_LIVREURS_ERROR: &str = "Failed to load livreurs. Please try again.";
pub const CREATE_LIVREUR_ERROR: &str = "Failed to create livreur. Please try again.";
pub const UPDATE_LIVREUR_ERROR: &str = "Failed to update livreur. Please try again.";
pub const AVAILABILITY_ERROR: &str = "Failed to update livreur availability.";
pub const DELETE_LIVREUR_ERROR: &str = "Failed to delete livreur. Please try again.";

/// Fecha para las tablas: "Jan 5, 2025, 02:30 PM", o "N/A" si no hay fecha
pub fn format_date(date: Option<DateTime<Utc>>) -> String {
    match date {
        Some(date) => date.format("%b %-d, %Y, %I:%M %p").to_string(),
        None => "N/A".to_string(),
    }
}

fn report(message: &'static str, err: &ClientError) -> Option<String> {
    error!("❌ {}: {}", message, err);
    Some(message.to_string())
}

/// Lista de demandes
pub struct DemandeListView {
    client: DemandeApiClient,
    pub demandes: Vec<Demande>,
    pub loading: bool,
    pub error: Option<String>,
}

impl DemandeListView {
    pub fn new(client: DemandeApiClient) -> Self {
        Self {
            client,
            demandes: Vec::new(),
            loading: false,
            error: None,
        }
    }

    pub async fn load(&mut self) {
        self.loading = true;
        self.error = None;

        match self.client.get_all_demandes().await {
            Ok(demandes) => self.demandes = demandes,
            Err(e) => self.error = report(LOAD_DEMANDES_ERROR, &e),
        }
        self.loading = false;
    }

    /// Eliminar y recargar la lista
    pub async fn delete(&mut self, id: i64) -> bool {
        match self.client.delete_demande(id).await {
            Ok(()) => {
                self.load().await;
                true
            }
            Err(e) => {
                self.error = report(DELETE_DEMANDE_ERROR, &e);
                false
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(i64),
}

/// Formulario de demande, en modo creación o edición
pub struct DemandeFormView {
    demandes: DemandeApiClient,
    livreurs: LivreurApiClient,
    manager_id: i64,
    mode: FormMode,
    pub form: DemandeForm,
    /// Livreurs ofrecidos en el selector (solo disponibles)
    pub available_livreurs: Vec<Livreur>,
    pub loading: bool,
    pub error: Option<String>,
    pub submit_error: Option<String>,
}

impl DemandeFormView {
    pub fn new(
        demandes: DemandeApiClient,
        livreurs: LivreurApiClient,
        manager_id: i64,
        mode: FormMode,
    ) -> Self {
        Self {
            demandes,
            livreurs,
            manager_id,
            mode,
            form: DemandeForm::default(),
            available_livreurs: Vec::new(),
            loading: false,
            error: None,
            submit_error: None,
        }
    }

    pub async fn load(&mut self) {
        self.loading = true;
        self.error = None;

        match self.mode {
            FormMode::Edit(id) => match self.demandes.get_demande_by_id(id).await {
                Ok(demande) => self.form = DemandeForm::from_demande(&demande),
                Err(e) => self.error = report(LOAD_DEMANDE_ERROR, &e),
            },
            FormMode::Create => match self.livreurs.get_available_livreurs().await {
                Ok(livreurs) => self.available_livreurs = livreurs,
                Err(e) => self.error = report(LOAD_LIVREURS_ERROR, &e),
            },
        }
        self.loading = false;
    }

    /// Enviar el formulario. Con un livreur elegido, la creación y la
    /// asignación se hacen en una sola operación del servidor.
    pub async fn submit(&mut self) -> Option<Demande> {
        if !self.form.is_valid() {
            self.form.mark_all_touched();
            return None;
        }
        self.loading = true;
        self.submit_error = None;

        let result = match (self.mode, self.form.livreur_id) {
            (FormMode::Edit(id), _) => self
                .demandes
                .update_demande(id, &self.form.to_update_request())
                .await
                .map_err(|e| (UPDATE_DEMANDE_ERROR, e)),
            (FormMode::Create, Some(livreur_id)) => self
                .demandes
                .create_and_assign(&self.form.to_create_request(), self.manager_id, livreur_id)
                .await
                .map_err(|e| (CREATE_DEMANDE_ERROR, e)),
            (FormMode::Create, None) => self
                .demandes
                .create_demande(&self.form.to_create_request(), self.manager_id)
                .await
                .map_err(|e| (CREATE_DEMANDE_ERROR, e)),
        };

        self.loading = false;
        match result {
            Ok(demande) => Some(demande),
            Err((message, e)) => {
                self.submit_error = report(message, &e);
                None
            }
        }
    }

    /// Creación en dos llamadas (crear y luego asignar). Si la asignación
    /// falla la demande queda creada sin livreur y se devuelve igualmente.
    pub async fn submit_two_step(&mut self) -> Option<Demande> {
        if self.mode != FormMode::Create || !self.form.is_valid() {
            self.form.mark_all_touched();
            return None;
        }
        self.loading = true;
        self.submit_error = None;

        let created = match self
            .demandes
            .create_demande(&self.form.to_create_request(), self.manager_id)
            .await
        {
            Ok(demande) => demande,
            Err(e) => {
                self.loading = false;
                self.submit_error = report(CREATE_DEMANDE_ERROR, &e);
                return None;
            }
        };

        let result = match self.form.livreur_id {
            Some(livreur_id) => match self
                .demandes
                .assign_livreur_to_demande(created.id, livreur_id, self.manager_id)
                .await
            {
                Ok(assigned) => assigned,
                Err(e) => {
                    warn!(
                        "⚠️ Demande {} creada pero sin asignar al livreur {}: {}",
                        created.id, livreur_id, e
                    );
                    created
                }
            },
            None => created,
        };

        self.loading = false;
        Some(result)
    }
}

/// Lista de livreurs con su formulario de alta / edición
pub struct LivreurListView {
    client: LivreurApiClient,
    pub livreurs: Vec<Livreur>,
    pub loading: bool,
    pub error: Option<String>,
    pub show_form: bool,
    pub editing: Option<Livreur>,
    pub form: LivreurForm,
}

impl LivreurListView {
    pub fn new(client: LivreurApiClient) -> Self {
        Self {
            client,
            livreurs: Vec::new(),
            loading: false,
            error: None,
            show_form: false,
            editing: None,
            form: LivreurForm::default(),
        }
    }

    pub async fn load(&mut self) {
        self.loading = true;
        self.error = None;

        match self.client.get_all_livreurs().await {
            Ok(livreurs) => self.livreurs = livreurs,
            Err(e) => self.error = report(LOAD_LIVREURS_ERROR, &e),
        }
        self.loading = false;
    }

    pub fn available_livreurs(&self) -> Vec<&Livreur> {
        self.livreurs.iter().filter(|l| l.disponible).collect()
    }

    pub fn add_new(&mut self) {
        self.editing = None;
        self.form = LivreurForm::default();
        self.show_form = true;
    }

    pub fn edit(&mut self, livreur: &Livreur) {
        self.form = LivreurForm::for_livreur(livreur);
        self.editing = Some(livreur.clone());
        self.show_form = true;
    }

    pub fn cancel_form(&mut self) {
        self.show_form = false;
        self.editing = None;
        self.form = LivreurForm::default();
    }

    pub async fn submit(&mut self) -> bool {
        if !self.form.is_valid() {
            self.form.mark_all_touched();
            return false;
        }
        self.loading = true;

        let result = match &self.editing {
            Some(livreur) => self
                .client
                .update_livreur(livreur.id, &self.form.to_update_request())
                .await
                .map_err(|e| (UPDATE_LIVREUR_ERROR, e)),
            None => self
                .client
                .create_livreur(&self.form.to_create_request())
                .await
                .map_err(|e| (CREATE_LIVREUR_ERROR, e)),
        };

        match result {
            Ok(livreur) => {
                info!("✅ Livreur {} guardado", livreur.id);
                self.show_form = false;
                self.editing = None;
                self.load().await;
                true
            }
            Err((message, e)) => {
                self.error = report(message, &e);
                self.loading = false;
                false
            }
        }
    }

    pub async fn toggle_availability(&mut self, id: i64) -> bool {
        let Some(current) = self.livreurs.iter().find(|l| l.id == id) else {
            return false;
        };
        let request = UpdateLivreurRequest {
            disponible: Some(!current.disponible),
            ..UpdateLivreurRequest::default()
        };

        match self.client.update_livreur(id, &request).await {
            Ok(_) => {
                self.load().await;
                true
            }
            Err(e) => {
                self.error = report(AVAILABILITY_ERROR, &e);
                false
            }
        }
    }

    pub async fn delete(&mut self, id: i64) -> bool {
        match self.client.delete_livreur(id).await {
            Ok(()) => {
                self.load().await;
                true
            }
            Err(e) => {
                self.error = report(DELETE_LIVREUR_ERROR, &e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(None), "N/A");

        let date = Utc.with_ymd_and_hms(2025, 1, 5, 14, 30, 0).unwrap();
        assert_eq!(format_date(Some(date)), "Jan 5, 2025, 02:30 PM");
    }
}

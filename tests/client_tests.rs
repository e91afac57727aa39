use std::sync::Arc;

use livraison_demandes::client::forms::{DemandeForm, LivreurField};
use livraison_demandes::client::views::{
    DemandeFormView, DemandeListView, FormMode, LivreurListView, LOAD_DEMANDES_ERROR,
};
use livraison_demandes::client::{ClientConfig, ClientError, DemandeApiClient, LivreurApiClient};
use livraison_demandes::config::{EnvironmentConfig, StorageBackend};
use livraison_demandes::dto::demande_dto::{CreateDemandeRequest, LivreurRef, UpdateDemandeRequest};
use livraison_demandes::dto::livreur_dto::CreateLivreurRequest;
use livraison_demandes::models::StatusDemande;
use livraison_demandes::repositories::InMemoryDeliveryRepository;
use livraison_demandes::routes::create_app;
use livraison_demandes::state::AppState;

/// Levantar el servidor completo en un puerto efímero y devolver su URL `/api`
async fn spawn_server() -> String {
    let config = EnvironmentConfig {
        storage: StorageBackend::Memory,
        bcrypt_cost: 4,
        ..EnvironmentConfig::default()
    };
    let app = create_app(AppState::new(
        Arc::new(InMemoryDeliveryRepository::seeded()),
        config,
    ));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}/api", addr)
}

async fn clients() -> (ClientConfig, DemandeApiClient, LivreurApiClient) {
    let config = ClientConfig::for_base_url(spawn_server().await);
    let demandes = DemandeApiClient::new(&config).unwrap();
    let livreurs = LivreurApiClient::new(&config).unwrap();
    (config, demandes, livreurs)
}

fn livreur_request(nom: &str, email: &str, disponible: bool) -> CreateLivreurRequest {
    CreateLivreurRequest {
        nom: nom.to_string(),
        email: email.to_string(),
        disponible,
        password: "secret123".to_string(),
    }
}

fn demande_request(depart: &str, arrivee: &str) -> CreateDemandeRequest {
    CreateDemandeRequest {
        lieu_depart: depart.to_string(),
        lieu_arrivee: arrivee.to_string(),
    }
}

#[tokio::test]
async fn test_demande_client_roundtrip() {
    let (config, demandes, livreurs) = clients().await;

    let created = demandes
        .create_demande(&demande_request("AA", "BB"), config.manager_id)
        .await
        .unwrap();
    assert_eq!(created.statut, StatusDemande::Created);
    assert_eq!(created.manager.id, 1);

    let first = livreurs
        .create_livreur(&livreur_request("Jean", "jean@example.com", true))
        .await
        .unwrap();
    let second = livreurs
        .create_livreur(&livreur_request("Paul", "paul@example.com", true))
        .await
        .unwrap();

    let assigned = demandes
        .assign_livreur_to_demande(created.id, first.id, config.manager_id)
        .await
        .unwrap();
    assert_eq!(assigned.statut, StatusDemande::Assigned);
    assert!(assigned.assigned_at.is_some());

    let reassigned = demandes
        .assign_livreur_to_demande(created.id, second.id, config.manager_id)
        .await
        .unwrap();
    assert_eq!(reassigned.livreur.as_ref().map(|l| l.id), Some(second.id));
    assert_eq!(reassigned.assigned_at, assigned.assigned_at);

    let by_livreur = demandes.get_demandes_by_livreur_id(second.id).await.unwrap();
    assert_eq!(by_livreur.len(), 1);
    assert!(demandes
        .get_demandes_by_livreur_id(first.id)
        .await
        .unwrap()
        .is_empty());
    assert_eq!(demandes.get_demandes_by_manager_id(1).await.unwrap().len(), 1);
    assert!(demandes.get_unassigned_demandes().await.unwrap().is_empty());

    let unbound = demandes
        .update_demande(
            created.id,
            &UpdateDemandeRequest {
                livreur: Some(None),
                ..UpdateDemandeRequest::default()
            },
        )
        .await
        .unwrap();
    assert!(unbound.livreur.is_none());
    assert_eq!(unbound.assigned_at, assigned.assigned_at);

    let rebound = demandes
        .update_demande(
            created.id,
            &UpdateDemandeRequest {
                livreur: Some(Some(LivreurRef { id: first.id })),
                ..UpdateDemandeRequest::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(rebound.livreur.map(|l| l.id), Some(first.id));

    demandes.delete_demande(created.id).await.unwrap();
    let err = demandes.delete_demande(created.id).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_client_error_taxonomy() {
    let (config, demandes, livreurs) = clients().await;

    let err = demandes.get_demande_by_id(404).await.unwrap_err();
    assert!(matches!(err, ClientError::NotFound(_)));

    let err = demandes
        .create_demande(&demande_request("A", "BB"), config.manager_id)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));

    let busy = livreurs
        .create_livreur(&livreur_request("Paul", "paul@example.com", false))
        .await
        .unwrap();
    let demande = demandes
        .create_demande(&demande_request("Lyon", "Paris"), config.manager_id)
        .await
        .unwrap();
    let err = demandes
        .assign_livreur_to_demande(demande.id, busy.id, config.manager_id)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Conflict(_)));

    let err = livreurs
        .create_livreur(&livreur_request("Autre", "paul@example.com", true))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Conflict(_)));

    // Nadie escucha en este puerto
    let offline = DemandeApiClient::new(&ClientConfig::for_base_url("http://127.0.0.1:9/api"))
        .unwrap();
    let err = offline.get_all_demandes().await.unwrap_err();
    assert!(matches!(err, ClientError::Unavailable(_)));
}

#[tokio::test]
async fn test_livreur_client_and_managers() {
    let (_, _, livreurs) = clients().await;

    let jean = livreurs
        .create_livreur(&livreur_request("Jean", "jean@example.com", true))
        .await
        .unwrap();
    livreurs
        .create_livreur(&livreur_request("Paul", "paul@example.com", false))
        .await
        .unwrap();

    assert_eq!(livreurs.get_all_livreurs().await.unwrap().len(), 2);
    let available = livreurs.get_available_livreurs().await.unwrap();
    assert_eq!(available.len(), 1);
    assert_eq!(available[0].id, jean.id);
    assert_eq!(livreurs.get_livreur_by_id(jean.id).await.unwrap().nom, "Jean");

    let managers = livreurs.get_all_managers().await.unwrap();
    assert_eq!(managers.len(), 1);
    assert_eq!(livreurs.get_manager_by_id(1).await.unwrap().id, 1);
    assert!(livreurs.get_manager_by_id(2).await.unwrap_err().is_not_found());

    livreurs.delete_livreur(jean.id).await.unwrap();
    assert!(livreurs.get_livreur_by_id(jean.id).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_demande_views() {
    let (config, demandes, livreurs) = clients().await;
    let jean = livreurs
        .create_livreur(&livreur_request("Jean", "jean@example.com", true))
        .await
        .unwrap();

    // Formulario inválido: no hay llamada, todos los campos quedan tocados
    let mut create = DemandeFormView::new(
        demandes.clone(),
        livreurs.clone(),
        config.manager_id,
        FormMode::Create,
    );
    create.load().await;
    assert_eq!(create.available_livreurs.len(), 1);
    assert!(create.submit().await.is_none());
    assert!(create.submit_error.is_none());

    create.form.lieu_depart = "Lyon".to_string();
    create.form.lieu_arrivee = "Paris".to_string();
    create.form.livreur_id = Some(jean.id);
    let created = create.submit().await.unwrap();
    assert_eq!(created.statut, StatusDemande::Assigned);
    assert!(created.assigned_at.is_some());

    // Edición
    let mut edit = DemandeFormView::new(
        demandes.clone(),
        livreurs.clone(),
        config.manager_id,
        FormMode::Edit(created.id),
    );
    edit.load().await;
    assert_eq!(edit.form.lieu_depart, "Lyon");
    edit.form.statut = StatusDemande::EnCours;
    let updated = edit.submit().await.unwrap();
    assert_eq!(updated.statut, StatusDemande::EnCours);

    // Transición inválida: error genérico de actualización
    edit.form.statut = StatusDemande::Created;
    assert!(edit.submit().await.is_none());
    assert_eq!(
        edit.submit_error.as_deref(),
        Some("Failed to update demande. Please try again.")
    );

    let mut missing = DemandeFormView::new(
        demandes.clone(),
        livreurs.clone(),
        config.manager_id,
        FormMode::Edit(999),
    );
    missing.load().await;
    assert_eq!(
        missing.error.as_deref(),
        Some("Failed to load demande. Please try again.")
    );

    let mut list = DemandeListView::new(demandes.clone());
    list.load().await;
    assert!(!list.loading);
    assert_eq!(list.demandes.len(), 1);
    assert!(list.delete(created.id).await);
    assert!(list.demandes.is_empty());
    assert!(!list.delete(created.id).await);
    assert_eq!(
        list.error.as_deref(),
        Some("Failed to delete demande. Please try again.")
    );
}

#[tokio::test]
async fn test_two_step_submit_keeps_partial_success() {
    let (config, demandes, livreurs) = clients().await;
    let busy = livreurs
        .create_livreur(&livreur_request("Paul", "paul@example.com", false))
        .await
        .unwrap();

    let mut view = DemandeFormView::new(
        demandes.clone(),
        livreurs.clone(),
        config.manager_id,
        FormMode::Create,
    );
    view.form = DemandeForm::default();
    view.form.lieu_depart = "Lyon".to_string();
    view.form.lieu_arrivee = "Paris".to_string();
    view.form.livreur_id = Some(busy.id);

    // La asignación falla (livreur no disponible) pero la demande queda creada
    let created = view.submit_two_step().await.unwrap();
    assert!(created.livreur.is_none());
    assert!(view.submit_error.is_none());
    assert_eq!(demandes.get_unassigned_demandes().await.unwrap().len(), 1);

    // En una sola operación, el mismo caso no deja nada creado
    assert!(view.submit().await.is_none());
    assert!(view.submit_error.is_some());
    assert_eq!(demandes.get_all_demandes().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_livreur_list_view() {
    let (_, _, livreurs) = clients().await;
    let mut view = LivreurListView::new(livreurs.clone());

    view.add_new();
    assert!(view.show_form);
    assert!(!view.submit().await);
    assert_eq!(
        view.form.field_error(LivreurField::Nom).as_deref(),
        Some("Name is required")
    );

    view.form.nom = "Jean".to_string();
    view.form.email = "jean@example.com".to_string();
    view.form.password = "secret123".to_string();
    assert!(view.submit().await);
    assert!(!view.show_form);
    assert_eq!(view.livreurs.len(), 1);
    assert_eq!(view.available_livreurs().len(), 1);

    let jean = view.livreurs[0].clone();
    assert!(view.toggle_availability(jean.id).await);
    assert!(!view.livreurs[0].disponible);
    assert!(view.available_livreurs().is_empty());

    view.edit(&jean);
    view.form.nom = "Jean Dupont".to_string();
    assert!(view.submit().await);
    assert_eq!(view.livreurs[0].nom, "Jean Dupont");

    let renamed = view.livreurs[0].clone();
    view.edit(&renamed);
    view.cancel_form();
    assert!(!view.show_form);
    assert!(view.editing.is_none());

    assert!(view.delete(jean.id).await);
    assert!(view.livreurs.is_empty());
    assert!(!view.delete(jean.id).await);
    assert_eq!(
        view.error.as_deref(),
        Some("Failed to delete livreur. Please try again.")
    );
}

#[tokio::test]
async fn test_list_view_reports_unavailable_backend() {
    let offline = DemandeApiClient::new(&ClientConfig::for_base_url("http://127.0.0.1:9/api"))
        .unwrap();
    let mut list = DemandeListView::new(offline);

    list.load().await;
    assert!(!list.loading);
    assert_eq!(list.error.as_deref(), Some(LOAD_DEMANDES_ERROR));
}

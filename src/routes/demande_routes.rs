use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use crate::controllers::demande_controller::DemandeController;
use crate::dto::demande_dto::{
    AssignLivreurParams, CreateDemandeParams, CreateDemandeRequest, UpdateDemandeRequest,
};
use crate::models::Demande;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::{ApiJson, ApiPath, ApiQuery};

pub fn create_demande_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_demandes).post(create_demande))
        .route("/unassigned", get(list_unassigned))
        .route("/manager/:manager_id", get(list_by_manager))
        .route("/livreur/:livreur_id", get(list_by_livreur))
        .route(
            "/:id",
            get(get_demande).put(update_demande).delete(delete_demande),
        )
        .route("/:id/assign-livreur", post(assign_livreur))
}

fn controller(state: &AppState) -> DemandeController {
    DemandeController::new(state.repository.clone())
}

async fn list_demandes(State(state): State<AppState>) -> Result<Json<Vec<Demande>>, AppError> {
    let demandes = controller(&state).list().await?;
    Ok(Json(demandes))
}

async fn get_demande(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Demande>, AppError> {
    let demande = controller(&state).get_by_id(id).await?;
    Ok(Json(demande))
}

async fn create_demande(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<CreateDemandeParams>,
    ApiJson(request): ApiJson<CreateDemandeRequest>,
) -> Result<(StatusCode, Json<Demande>), AppError> {
    let demande = controller(&state)
        .create(params.manager_id, params.livreur_id, request)
        .await?;
    Ok((StatusCode::CREATED, Json(demande)))
}

async fn update_demande(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(request): ApiJson<UpdateDemandeRequest>,
) -> Result<Json<Demande>, AppError> {
    let demande = controller(&state).update(id, request).await?;
    Ok(Json(demande))
}

async fn delete_demande(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, AppError> {
    controller(&state).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_by_manager(
    State(state): State<AppState>,
    ApiPath(manager_id): ApiPath<i64>,
) -> Result<Json<Vec<Demande>>, AppError> {
    let demandes = controller(&state).list_by_manager(manager_id).await?;
    Ok(Json(demandes))
}

async fn list_by_livreur(
    State(state): State<AppState>,
    ApiPath(livreur_id): ApiPath<i64>,
) -> Result<Json<Vec<Demande>>, AppError> {
    let demandes = controller(&state).list_by_livreur(livreur_id).await?;
    Ok(Json(demandes))
}

async fn list_unassigned(State(state): State<AppState>) -> Result<Json<Vec<Demande>>, AppError> {
    let demandes = controller(&state).list_unassigned().await?;
    Ok(Json(demandes))
}

async fn assign_livreur(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiQuery(params): ApiQuery<AssignLivreurParams>,
) -> Result<Json<Demande>, AppError> {
    let demande = controller(&state)
        .assign_livreur(id, params.livreur_id, params.manager_id)
        .await?;
    Ok(Json(demande))
}

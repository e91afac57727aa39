use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::controllers::livreur_controller::LivreurController;
use crate::dto::livreur_dto::{CreateLivreurRequest, LivreurFilters, UpdateLivreurRequest};
use crate::models::Livreur;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::{ApiJson, ApiPath, ApiQuery};

pub fn create_livreur_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_livreurs).post(create_livreur))
        .route(
            "/:id",
            get(get_livreur).put(update_livreur).delete(delete_livreur),
        )
}

fn controller(state: &AppState) -> LivreurController {
    LivreurController::new(state.repository.clone(), state.config.bcrypt_cost)
}

async fn list_livreurs(
    State(state): State<AppState>,
    ApiQuery(filters): ApiQuery<LivreurFilters>,
) -> Result<Json<Vec<Livreur>>, AppError> {
    let livreurs = controller(&state).list(filters.disponible).await?;
    Ok(Json(livreurs))
}

async fn get_livreur(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Livreur>, AppError> {
    let livreur = controller(&state).get_by_id(id).await?;
    Ok(Json(livreur))
}

async fn create_livreur(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateLivreurRequest>,
) -> Result<(StatusCode, Json<Livreur>), AppError> {
    let livreur = controller(&state).create(request).await?;
    Ok((StatusCode::CREATED, Json(livreur)))
}

async fn update_livreur(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(request): ApiJson<UpdateLivreurRequest>,
) -> Result<Json<Livreur>, AppError> {
    let livreur = controller(&state).update(id, request).await?;
    Ok(Json(livreur))
}

async fn delete_livreur(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, AppError> {
    controller(&state).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

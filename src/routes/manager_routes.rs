use axum::{
    extract::State,
    routing::get,
    Json, Router,
};

use crate::controllers::manager_controller::ManagerController;
use crate::models::Manager;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::ApiPath;

pub fn create_manager_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_managers))
        .route("/:id", get(get_manager))
}

async fn list_managers(State(state): State<AppState>) -> Result<Json<Vec<Manager>>, AppError> {
    let managers = ManagerController::new(state.repository.clone()).list().await?;
    Ok(Json(managers))
}

async fn get_manager(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Manager>, AppError> {
    let manager = ManagerController::new(state.repository.clone())
        .get_by_id(id)
        .await?;
    Ok(Json(manager))
}

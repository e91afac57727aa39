use std::sync::Arc;

use crate::models::Manager;
use crate::repositories::DeliveryRepository;
use crate::utils::errors::{not_found_error, AppResult};

pub struct ManagerController {
    repository: Arc<dyn DeliveryRepository>,
}

impl ManagerController {
    pub fn new(repository: Arc<dyn DeliveryRepository>) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Manager>> {
        self.repository.list_managers().await
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<Manager> {
        self.repository
            .find_manager(id)
            .await?
            .ok_or_else(|| not_found_error("Manager", id))
    }
}

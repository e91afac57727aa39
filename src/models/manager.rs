//! Modelo de Manager
//!
//! Los managers son de solo lectura para este servicio: los crea la migración
//! inicial (o el repositorio en memoria).

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Manager - mapea a la tabla managers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Manager {
    pub id: i64,
    pub nom: String,
    pub email: String,
}

impl Manager {
    pub fn new(id: i64, nom: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            nom: nom.into(),
            email: email.into(),
        }
    }
}

//! Controladores
//!
//! Lógica de cada caso de uso por encima del repositorio: validación de
//! requests, hash de contraseñas y logs de auditoría.

pub mod demande_controller;
pub mod livreur_controller;
pub mod manager_controller;

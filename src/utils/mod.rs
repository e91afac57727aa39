//! Utilidades del sistema
//!
//! Este módulo contiene utilidades para manejo de errores, extractores, validación
//! y deserialización de actualizaciones parciales.

pub mod errors;
pub mod extract;
pub mod nullable;
pub mod validation;

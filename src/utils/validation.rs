//! Utilidades de validación
//!
//! Validadores custom usados por los requests de demandes y livreurs
//! (a través de `#[validate(custom = "...")]`) y por los formularios del cliente.

use validator::ValidationError;

/// Longitud mínima de un lugar de salida / llegada y del nombre de un livreur
pub const MIN_TEXT_LENGTH: usize = 2;

/// Longitud máxima de los campos de texto (columnas VARCHAR(255))
pub const MAX_TEXT_LENGTH: usize = 255;

/// Validar que un string no esté vacío
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("required");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar longitud mínima y máxima, sobre el valor sin espacios exteriores
pub fn validate_length(value: &str, min: usize, max: usize) -> Result<(), ValidationError> {
    let len = value.trim().chars().count();
    if len < min || len > max {
        let mut error = ValidationError::new("length");
        error.add_param("min".into(), &min);
        error.add_param("max".into(), &max);
        error.add_param("actual".into(), &len);
        return Err(error);
    }
    Ok(())
}

/// Lugar de salida o de llegada de una demande
pub fn validate_place(value: &str) -> Result<(), ValidationError> {
    validate_not_empty(value)?;
    validate_length(value, MIN_TEXT_LENGTH, MAX_TEXT_LENGTH)
}

/// Nombre de un livreur
pub fn validate_name(value: &str) -> Result<(), ValidationError> {
    validate_not_empty(value)?;
    validate_length(value, MIN_TEXT_LENGTH, MAX_TEXT_LENGTH)
}

/// Contraseña de un livreur: opaca, solo se exige que no esté vacía
pub fn validate_password(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

/// Formato de email, con las mismas reglas que `#[validate(email)]`
pub fn validate_email(value: &str) -> Result<(), ValidationError> {
    if !validator::validate_email(value) {
        let mut error = ValidationError::new("email");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

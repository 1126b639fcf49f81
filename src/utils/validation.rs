//! Utilidades de validación
//!
//! Normalización y validación de placas.

use validator::ValidationError;

/// Quitar todos los guiones de una placa
pub fn normalize_plate(raw: &str) -> String {
    raw.chars().filter(|c| *c != '-').collect()
}

/// Validar que un string no esté vacío
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::new("not_empty"));
    }
    Ok(())
}

/// Normalizar una placa y exigir que no quede vacía
pub fn validate_plate(raw: &str) -> Result<String, ValidationError> {
    let plate = normalize_plate(raw);
    validate_not_empty(&plate)?;
    Ok(plate)
}

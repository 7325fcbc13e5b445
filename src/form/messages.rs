//! Error messages
//!
//! Maps a field's errors to the single line of text shown under it.

use crate::form::errors::{ErrorKind, ValidationError};

/// Order in which errors are reported when several are active.
const PRIORITY: [ErrorKind; 8] = [
    ErrorKind::Required,
    ErrorKind::MinLength,
    ErrorKind::MaxLength,
    ErrorKind::Pattern,
    ErrorKind::InvalidDate,
    ErrorKind::MinDate,
    ErrorKind::IdExists,
    ErrorKind::Other,
];

/// Message for the highest-priority error in `errors`, or an empty string when
/// there is none.
pub fn error_message(errors: &[ValidationError]) -> String {
    PRIORITY
        .iter()
        .find_map(|kind| errors.iter().find(|error| error.kind() == *kind))
        .map(describe)
        .unwrap_or_default()
}

fn describe(error: &ValidationError) -> String {
    match error {
        ValidationError::Required => "Este campo es obligatorio".to_string(),
        ValidationError::MinLength {
            required_length, ..
        } => format!("La longitud mínima es {required_length}"),
        ValidationError::MaxLength {
            required_length, ..
        } => format!("La longitud máxima es {required_length}"),
        ValidationError::Pattern { .. } => {
            "Por favor ingrese una URL válida (http:// o https://)".to_string()
        }
        ValidationError::InvalidDate => "Por favor ingrese una fecha válida".to_string(),
        ValidationError::MinDate { .. } => "La fecha debe ser hoy o posterior".to_string(),
        ValidationError::IdExists => "Este ID ya existe".to_string(),
        ValidationError::Other(_) => "Valor inválido".to_string(),
    }
}

//! Validation error types

use std::fmt;

/// Validation error for request input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required field is absent, blank, or zero
    Missing { field: &'static str },

    /// Path id is not an integer
    InvalidId { value: String },

    /// Body is not valid JSON for the expected shape
    MalformedBody { reason: String },
}

impl ValidationError {
    /// Name of the offending field, when there is one.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::Missing { field } => Some(field),
            Self::InvalidId { .. } => Some("id"),
            Self::MalformedBody { .. } => None,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { .. } => write!(f, "Todos los campos son obligatorios"),
            Self::InvalidId { .. } => write!(f, "Identificador de usuario inválido"),
            Self::MalformedBody { .. } => write!(f, "Cuerpo JSON inválido"),
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ValidationError::Missing { field: "gmail" };
        assert_eq!(err.to_string(), "Todos los campos son obligatorios");
        assert_eq!(err.field(), Some("gmail"));
    }

    #[test]
    fn malformed_body_has_no_field() {
        let err = ValidationError::MalformedBody {
            reason: "EOF while parsing".into(),
        };
        assert_eq!(err.field(), None);
        assert_eq!(err.to_string(), "Cuerpo JSON inválido");
    }
}

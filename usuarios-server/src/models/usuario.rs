//! User payload validation
//!
//! Create and update share one contract: `nombre`, `gmail` and `contrasena`
//! must be non-blank and `id_rol` must be present and non-zero. `estado`
//! is optional on both paths.

use serde::{de, Deserialize, Deserializer};

use super::ValidationError;

/// Raw body of `POST /api/usuarios` and `PUT /api/usuarios/{id}`.
///
/// Every field is optional so that a missing field becomes a
/// [`ValidationError`] instead of a deserialization failure.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct UsuarioPayload {
    pub nombre: Option<String>,
    pub gmail: Option<String>,
    pub contrasena: Option<String>,
    pub estado: Option<bool>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub id_rol: Option<i32>,
}

/// Accept `1` or `"1"`. A blank string counts as absent.
fn lenient_id<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IdValue {
        Int(i32),
        Text(String),
    }

    match Option::<IdValue>::deserialize(deserializer)? {
        None => Ok(None),
        Some(IdValue::Int(id)) => Ok(Some(id)),
        Some(IdValue::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(IdValue::Text(text)) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("id_rol is not an integer: {text:?}"))),
    }
}

/// Payload that passed validation. The password is still plaintext.
#[derive(Debug, Clone)]
pub struct UsuarioFields {
    pub nombre: String,
    pub gmail: String,
    pub contrasena: String,
    pub estado: Option<bool>,
    pub id_rol: i32,
}

impl UsuarioPayload {
    /// Check required fields in declaration order, reporting the first gap.
    pub fn validate(self) -> Result<UsuarioFields, ValidationError> {
        let nombre = required_text(self.nombre, "nombre")?;
        let gmail = required_text(self.gmail, "gmail")?;
        let contrasena = required_text(self.contrasena, "contrasena")?;
        let id_rol = match self.id_rol {
            Some(id) if id != 0 => id,
            _ => return Err(ValidationError::Missing { field: "id_rol" }),
        };

        Ok(UsuarioFields {
            nombre,
            gmail,
            contrasena,
            estado: self.estado,
            id_rol,
        })
    }
}

fn required_text(value: Option<String>, field: &'static str) -> Result<String, ValidationError> {
    match value {
        Some(s) if !s.trim().is_empty() => Ok(s),
        _ => Err(ValidationError::Missing { field }),
    }
}

/// Row to insert. `password_hash` is a PHC string, never plaintext.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub nombre: String,
    pub gmail: String,
    pub password_hash: String,
    pub estado: bool,
    pub id_rol: i32,
}

/// Full replacement of a user's mutable fields.
///
/// `estado: None` keeps the stored flag.
#[derive(Debug, Clone)]
pub struct UserUpdate {
    pub nombre: String,
    pub gmail: String,
    pub password_hash: String,
    pub estado: Option<bool>,
    pub id_rol: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full() -> UsuarioPayload {
        UsuarioPayload {
            nombre: Some("Ana".into()),
            gmail: Some("ana@x.com".into()),
            contrasena: Some("p1".into()),
            estado: None,
            id_rol: Some(1),
        }
    }

    #[test]
    fn accepts_complete_payload() {
        let fields = full().validate().unwrap();
        assert_eq!(fields.nombre, "Ana");
        assert_eq!(fields.id_rol, 1);
        assert_eq!(fields.estado, None);
    }

    #[test]
    fn reports_first_missing_field() {
        let payload = UsuarioPayload {
            gmail: None,
            contrasena: None,
            ..full()
        };
        let err = payload.validate().unwrap_err();
        assert_eq!(err, ValidationError::Missing { field: "gmail" });
    }

    #[test]
    fn rejects_blank_strings() {
        let payload = UsuarioPayload {
            nombre: Some("   ".into()),
            ..full()
        };
        let err = payload.validate().unwrap_err();
        assert_eq!(err, ValidationError::Missing { field: "nombre" });
    }

    #[test]
    fn rejects_zero_role() {
        let payload = UsuarioPayload {
            id_rol: Some(0),
            ..full()
        };
        assert_eq!(
            payload.validate().unwrap_err(),
            ValidationError::Missing { field: "id_rol" }
        );
    }

    #[test]
    fn deserializes_partial_body() {
        let payload: UsuarioPayload =
            serde_json::from_str(r#"{"nombre":"Ana","estado":false}"#).unwrap();
        assert_eq!(payload.estado, Some(false));
        assert!(payload.gmail.is_none());
    }

    #[test]
    fn role_id_accepts_numeric_string() {
        let payload: UsuarioPayload = serde_json::from_str(r#"{"id_rol":" 2 "}"#).unwrap();
        assert_eq!(payload.id_rol, Some(2));
    }

    #[test]
    fn blank_or_null_role_id_is_missing() {
        for body in [r#"{"id_rol":""}"#, r#"{"id_rol":null}"#, "{}"] {
            let payload: UsuarioPayload = serde_json::from_str(body).unwrap();
            assert_eq!(payload.id_rol, None, "{body}");
        }

        let payload = UsuarioPayload {
            id_rol: None,
            ..full()
        };
        assert_eq!(
            payload.validate().unwrap_err(),
            ValidationError::Missing { field: "id_rol" }
        );
    }

    #[test]
    fn non_numeric_role_id_is_rejected() {
        assert!(serde_json::from_str::<UsuarioPayload>(r#"{"id_rol":"abc"}"#).is_err());
        assert!(serde_json::from_str::<UsuarioPayload>(r#"{"id_rol":true}"#).is_err());
    }
}

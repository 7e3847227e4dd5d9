//! Author (autor) model and the shared name-only form

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::table::{FieldValue, Row};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Autor {
    #[serde(deserialize_with = "super::id_from_string_or_number")]
    pub id: String,
    pub nombre: String,
}

impl Row for Autor {
    fn field_names(&self) -> Vec<&str> {
        vec!["id", "nombre"]
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(self.id.as_str().into()),
            "nombre" => Some(self.nombre.as_str().into()),
            _ => None,
        }
    }
}

/// Create / update request for entities identified only by a name
/// (authors and genres)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Validate)]
pub struct NombreForm {
    #[validate(length(min = 3, max = 200, message = "El nombre debe tener entre 3 y 200 caracteres"))]
    pub nombre: String,
}

impl NombreForm {
    pub fn new(nombre: impl Into<String>) -> Self {
        Self { nombre: nombre.into() }
    }
}

impl From<&Autor> for NombreForm {
    fn from(autor: &Autor) -> Self {
        NombreForm::new(autor.nombre.clone())
    }
}

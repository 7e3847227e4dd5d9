//! Genre (género) model

use serde::{Deserialize, Serialize};

use super::autor::NombreForm;
use crate::table::{FieldValue, Row};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genero {
    #[serde(deserialize_with = "super::id_from_string_or_number")]
    pub id: String,
    pub nombre: String,
}

impl Row for Genero {
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

impl From<&Genero> for NombreForm {
    fn from(genero: &Genero) -> Self {
        NombreForm::new(genero.nombre.clone())
    }
}

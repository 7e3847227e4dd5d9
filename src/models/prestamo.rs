//! Loan (préstamo) model and form

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::table::{FieldValue, Row};

/// Loan as listed by `GET /prestamos`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prestamo {
    #[serde(deserialize_with = "super::id_from_string_or_number")]
    pub prestamo_id: String,
    #[serde(deserialize_with = "super::id_from_string_or_number")]
    pub libro_id: String,
    #[serde(default)]
    pub libro_titulo: String,
    #[serde(deserialize_with = "super::id_from_string_or_number")]
    pub usuario_id: String,
    #[serde(default)]
    pub usuario_nombre: String,
    #[serde(deserialize_with = "super::date_lenient")]
    pub fecha_prestamo: NaiveDate,
    #[serde(deserialize_with = "super::date_lenient")]
    pub fecha_devolucion_esperada: NaiveDate,
    /// Set once the book has been returned
    #[serde(default, deserialize_with = "super::optional_date_lenient")]
    pub fecha_devolucion_real: Option<NaiveDate>,
}

impl Prestamo {
    pub fn is_returned(&self) -> bool {
        self.fecha_devolucion_real.is_some()
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.is_returned() && self.fecha_devolucion_esperada < today
    }
}

impl Row for Prestamo {
    fn field_names(&self) -> Vec<&str> {
        vec![
            "prestamo_id",
            "libro_id",
            "libro_titulo",
            "usuario_id",
            "usuario_nombre",
            "fecha_prestamo",
            "fecha_devolucion_esperada",
            "fecha_devolucion_real",
        ]
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "prestamo_id" => Some(self.prestamo_id.as_str().into()),
            "libro_id" => Some(self.libro_id.as_str().into()),
            "libro_titulo" => Some(self.libro_titulo.as_str().into()),
            "usuario_id" => Some(self.usuario_id.as_str().into()),
            "usuario_nombre" => Some(self.usuario_nombre.as_str().into()),
            "fecha_prestamo" => Some(self.fecha_prestamo.into()),
            "fecha_devolucion_esperada" => Some(self.fecha_devolucion_esperada.into()),
            "fecha_devolucion_real" => Some(self.fecha_devolucion_real.into()),
            _ => None,
        }
    }
}

/// Create loan request (`fecha_prestamo` is sent as `YYYY-MM-DD`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Validate)]
pub struct PrestamoForm {
    #[validate(length(min = 1, message = "El libro es obligatorio"))]
    pub libro_id: String,
    #[validate(length(min = 1, message = "El usuario es obligatorio"))]
    pub usuario_id: String,
    pub fecha_prestamo: NaiveDate,
}

impl From<&Prestamo> for PrestamoForm {
    fn from(prestamo: &Prestamo) -> Self {
        PrestamoForm {
            libro_id: prestamo.libro_id.clone(),
            usuario_id: prestamo.usuario_id.clone(),
            fecha_prestamo: prestamo.fecha_prestamo,
        }
    }
}

//! Book (libro) model and form

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::table::{FieldValue, FilterOption, Row};

/// Circulation status of a book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LibroEstado {
    #[serde(alias = "DISPONIBLE")]
    Disponible,
    #[serde(alias = "PRESTADO")]
    Prestado,
    #[serde(alias = "RESERVADO")]
    Reservado,
}

impl LibroEstado {
    pub const ALL: [LibroEstado; 3] = [
        LibroEstado::Disponible,
        LibroEstado::Prestado,
        LibroEstado::Reservado,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LibroEstado::Disponible => "disponible",
            LibroEstado::Prestado => "prestado",
            LibroEstado::Reservado => "reservado",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LibroEstado::Disponible => "Disponible",
            LibroEstado::Prestado => "Prestado",
            LibroEstado::Reservado => "Reservado",
        }
    }

    /// Status filter options for the books table
    pub fn filter_options() -> Vec<FilterOption> {
        Self::ALL
            .iter()
            .map(|e| FilterOption::new(e.as_str(), e.label()))
            .collect()
    }
}

impl std::fmt::Display for LibroEstado {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for LibroEstado {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "disponible" => Ok(LibroEstado::Disponible),
            "prestado" => Ok(LibroEstado::Prestado),
            "reservado" => Ok(LibroEstado::Reservado),
            _ => Err(format!("Invalid book status: {}", s)),
        }
    }
}

/// Book as listed by `GET /libros`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Libro {
    #[serde(deserialize_with = "super::id_from_string_or_number")]
    pub id: String,
    pub titulo: String,
    #[serde(default, deserialize_with = "super::id_from_string_or_number")]
    pub autor_id: String,
    #[serde(default)]
    pub nombre_autor: String,
    #[serde(default, deserialize_with = "super::id_from_string_or_number")]
    pub genero_id: String,
    #[serde(default)]
    pub nombre_genero: String,
    #[serde(default)]
    pub descripcion: String,
    pub imagen: Option<String>,
    pub estado: LibroEstado,
}

impl Row for Libro {
    fn field_names(&self) -> Vec<&str> {
        vec![
            "id",
            "titulo",
            "autor_id",
            "nombre_autor",
            "genero_id",
            "nombre_genero",
            "descripcion",
            "imagen",
            "estado",
        ]
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(self.id.as_str().into()),
            "titulo" => Some(self.titulo.as_str().into()),
            "autor_id" => Some(self.autor_id.as_str().into()),
            "nombre_autor" => Some(self.nombre_autor.as_str().into()),
            "genero_id" => Some(self.genero_id.as_str().into()),
            "nombre_genero" => Some(self.nombre_genero.as_str().into()),
            "descripcion" => Some(self.descripcion.as_str().into()),
            "imagen" => Some(self.imagen.as_deref().into()),
            "estado" => Some(self.estado.as_str().into()),
            _ => None,
        }
    }
}

/// Create / update book request
#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
pub struct LibroForm {
    #[validate(length(min = 3, max = 200, message = "El título debe tener entre 3 y 200 caracteres"))]
    pub titulo: String,
    #[validate(length(min = 1, message = "El autor es obligatorio"))]
    pub autor_id: String,
    pub imagen: Option<String>,
    #[validate(length(min = 1, message = "El género es obligatorio"))]
    pub genero_id: String,
    #[validate(length(min = 1, message = "La descripción es obligatoria"))]
    pub descripcion: String,
    pub estado: LibroEstado,
}

impl From<&Libro> for LibroForm {
    fn from(libro: &Libro) -> Self {
        LibroForm {
            titulo: libro.titulo.clone(),
            autor_id: libro.autor_id.clone(),
            imagen: libro.imagen.clone(),
            genero_id: libro.genero_id.clone(),
            descripcion: libro.descripcion.clone(),
            estado: libro.estado,
        }
    }
}

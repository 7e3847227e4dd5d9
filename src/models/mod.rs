//! Data models for the Biblioteca admin client

pub mod autor;
pub mod genero;
pub mod libro;
pub mod prestamo;
pub mod user;

// Re-export commonly used types
pub use autor::{Autor, NombreForm};
pub use genero::Genero;
pub use libro::{Libro, LibroEstado, LibroForm};
pub use prestamo::{Prestamo, PrestamoForm};
pub use user::{AuthResponse, LoginForm, LoginRequest, Role, User};

use chrono::NaiveDate;
use serde::{de, Deserialize, Deserializer};

/// Backend identifiers arrive as strings or integers; both are kept as text.
pub(crate) fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Int(i) => i.to_string(),
    })
}

fn parse_date_prefix<E: de::Error>(s: &str) -> Result<NaiveDate, E> {
    let prefix = s.get(..10).unwrap_or(s);
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d")
        .map_err(|e| E::custom(format!("invalid date '{}': {}", s, e)))
}

/// Dates arrive either as `YYYY-MM-DD` or as full ISO 8601 timestamps.
pub(crate) fn date_lenient<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_date_prefix(&s)
}

pub(crate) fn optional_date_lenient<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(s) if !s.is_empty() => parse_date_prefix(&s).map(Some),
        _ => Ok(None),
    }
}

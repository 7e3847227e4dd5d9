//! Read-only detail view of a single entity

use serde::Serialize;

use crate::table::{FieldValue, Row};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailKind {
    Text,
    Image,
    Boolean,
}

/// Describes one labelled line of a detail view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailField {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: DetailKind,
}

impl DetailField {
    pub const fn text(key: &'static str, label: &'static str) -> Self {
        Self { key, label, kind: DetailKind::Text }
    }

    pub const fn image(key: &'static str, label: &'static str) -> Self {
        Self { key, label, kind: DetailKind::Image }
    }

    pub const fn boolean(key: &'static str, label: &'static str) -> Self {
        Self { key, label, kind: DetailKind::Boolean }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DetailValue {
    Text { text: String },
    Image { src: String },
    /// Rendered as "Activo" / "Inactivo"
    Flag { active: bool },
    /// Image field without a value
    Empty,
}

impl DetailValue {
    pub fn display(&self) -> String {
        match self {
            DetailValue::Text { text } => text.clone(),
            DetailValue::Image { src } => src.clone(),
            DetailValue::Flag { active: true } => "Activo".to_string(),
            DetailValue::Flag { active: false } => "Inactivo".to_string(),
            DetailValue::Empty => String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailLine {
    pub label: String,
    pub value: DetailValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailView {
    pub title: String,
    pub lines: Vec<DetailLine>,
}

impl DetailView {
    pub fn render<T: Row>(title: impl Into<String>, entity: &T, fields: &[DetailField]) -> Self {
        let lines = fields
            .iter()
            .map(|field| DetailLine {
                label: field.label.to_string(),
                value: Self::value_of(entity, field),
            })
            .collect();
        Self { title: title.into(), lines }
    }

    fn value_of<T: Row>(entity: &T, field: &DetailField) -> DetailValue {
        let raw = entity.field(field.key).unwrap_or(FieldValue::Null);
        match field.kind {
            DetailKind::Text => DetailValue::Text { text: raw.to_string() },
            DetailKind::Image => match raw.to_string() {
                src if src.is_empty() => DetailValue::Empty,
                src => DetailValue::Image { src },
            },
            DetailKind::Boolean => DetailValue::Flag { active: truthy(&raw) },
        }
    }
}

fn truthy(value: &FieldValue) -> bool {
    match value {
        FieldValue::Null => false,
        FieldValue::Bool(b) => *b,
        FieldValue::Int(i) => *i != 0,
        FieldValue::Float(f) => *f != 0.0,
        FieldValue::Text(s) => !s.is_empty(),
        FieldValue::Date(_) => true,
    }
}

impl std::fmt::Display for DetailView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.title.to_uppercase())?;
        for line in &self.lines {
            writeln!(f, "{}: {}", line.label, line.value.display())?;
        }
        Ok(())
    }
}

//! Scalar field values and the `Row` abstraction over entity collections

use chrono::NaiveDate;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Scalar value of a named field on a row
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
}

impl FieldValue {
    fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Int(v) => Some(*v as f64),
            FieldValue::Float(v) => Some(*v),
            FieldValue::Text(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    /// Ordering within a column sorted as `kind`: nulls first, then numeric
    /// or lexicographic. Dates compare through their ISO form.
    pub fn compare(&self, other: &FieldValue, kind: SortKind) -> Ordering {
        match (self, other) {
            (FieldValue::Null, FieldValue::Null) => Ordering::Equal,
            (FieldValue::Null, _) => Ordering::Less,
            (_, FieldValue::Null) => Ordering::Greater,
            (a, b) => match (kind, a.as_number(), b.as_number()) {
                (SortKind::Numeric, Some(x), Some(y)) => x.total_cmp(&y),
                _ => a.to_string().cmp(&b.to_string()),
            },
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }
}

/// How a column orders its values, decided once over the whole column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKind {
    Numeric,
    Lexical,
}

impl SortKind {
    /// Numeric only when every non-null value reads as a number
    pub fn of<'a>(values: impl IntoIterator<Item = &'a FieldValue>) -> Self {
        let numeric = values
            .into_iter()
            .filter(|v| !v.is_null())
            .all(|v| v.as_number().is_some());
        if numeric {
            SortKind::Numeric
        } else {
            SortKind::Lexical
        }
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Null => Ok(()),
            FieldValue::Bool(v) => write!(f, "{}", v),
            FieldValue::Int(v) => write!(f, "{}", v),
            FieldValue::Float(v) => write!(f, "{}", v),
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<&String> for FieldValue {
    fn from(s: &String) -> Self {
        FieldValue::Text(s.clone())
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Int(v)
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        FieldValue::Int(v.into())
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Float(v)
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Bool(v)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(d: NaiveDate) -> Self {
        FieldValue::Date(d)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

/// A record that exposes named scalar fields to the table and detail views
pub trait Row {
    /// Names of every field this row exposes, in display order
    fn field_names(&self) -> Vec<&str>;

    /// Value of a field, `None` when the row has no such field
    fn field(&self, name: &str) -> Option<FieldValue>;
}

/// Free-form row keyed by field name
pub type Record = BTreeMap<String, FieldValue>;

impl Row for Record {
    fn field_names(&self) -> Vec<&str> {
        self.keys().map(String::as_str).collect()
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        self.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_column_orders_numerically() {
        let values = [FieldValue::from("9"), FieldValue::from("10"), FieldValue::Int(3)];
        let kind = SortKind::of(&values);
        assert_eq!(kind, SortKind::Numeric);
        assert_eq!(values[0].compare(&values[1], kind), Ordering::Less);
        assert_eq!(values[2].compare(&values[0], kind), Ordering::Less);
    }

    #[test]
    fn test_text_orders_lexicographically() {
        let a = FieldValue::from("Borges");
        let b = FieldValue::from("Allende");
        assert_eq!(a.compare(&b, SortKind::Lexical), Ordering::Greater);
    }

    #[test]
    fn test_mixed_titles_are_lexical_and_transitive() {
        let values = [FieldValue::from("300"), FieldValue::from("1984"), FieldValue::from("1Q84")];
        let kind = SortKind::of(&values);
        assert_eq!(kind, SortKind::Lexical);
        assert_eq!(values[1].compare(&values[2], kind), Ordering::Less);
        assert_eq!(values[2].compare(&values[0], kind), Ordering::Less);
        assert_eq!(values[1].compare(&values[0], kind), Ordering::Less);
    }

    #[test]
    fn test_null_sorts_first_and_displays_empty() {
        assert_eq!(FieldValue::Null.compare(&FieldValue::Int(0), SortKind::Numeric), Ordering::Less);
        assert_eq!(SortKind::of(&[FieldValue::Null, FieldValue::Int(1)]), SortKind::Numeric);
        assert_eq!(FieldValue::Null.to_string(), "");
        assert_eq!(FieldValue::from(None::<String>), FieldValue::Null);
    }

    #[test]
    fn test_dates_display_iso() {
        let d = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(FieldValue::from(d).to_string(), "2024-03-09");
    }
}

//! Column descriptors and rendered cell values

use serde::{Deserialize, Serialize};

/// Output of a column formatter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Formatted {
    Text(String),
    Styled { text: String, class: String },
}

impl From<String> for Formatted {
    fn from(text: String) -> Self {
        Formatted::Text(text)
    }
}

impl From<&str> for Formatted {
    fn from(text: &str) -> Self {
        Formatted::Text(text.to_string())
    }
}

pub type Formatter<T> = Box<dyn Fn(&T) -> Formatted + Send + Sync>;

/// Selectable value for a status filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
    pub value: String,
    pub view_value: String,
}

impl FilterOption {
    pub fn new(value: impl Into<String>, view_value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            view_value: view_value.into(),
        }
    }
}

pub struct ColumnConfig<T> {
    /// Field rendered by this column
    pub name: String,
    pub header: String,
    pub sortable: bool,
    pub filterable: bool,
    pub filter_options: Option<Vec<FilterOption>>,
    formatter: Option<Formatter<T>>,
}

impl<T> ColumnConfig<T> {
    pub fn new(name: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            header: header.into(),
            sortable: true,
            filterable: true,
            filter_options: None,
            formatter: None,
        }
    }

    pub fn not_sortable(mut self) -> Self {
        self.sortable = false;
        self
    }

    pub fn not_filterable(mut self) -> Self {
        self.filterable = false;
        self
    }

    pub fn with_filter_options(mut self, options: Vec<FilterOption>) -> Self {
        self.filter_options = Some(options);
        self
    }

    pub fn with_formatter<F>(mut self, formatter: F) -> Self
    where
        F: Fn(&T) -> Formatted + Send + Sync + 'static,
    {
        self.formatter = Some(Box::new(formatter));
        self
    }

    pub(crate) fn format(&self, row: &T) -> Option<Formatted> {
        self.formatter.as_ref().map(|f| f(row))
    }
}

impl<T> std::fmt::Debug for ColumnConfig<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColumnConfig")
            .field("name", &self.name)
            .field("header", &self.header)
            .field("sortable", &self.sortable)
            .field("filterable", &self.filterable)
            .field("filter_options", &self.filter_options)
            .field("formatter", &self.formatter.is_some())
            .finish()
    }
}

/// Rendered table cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellValue {
    Text { text: String, class: Option<String> },
    Image { src: String, class: String },
}

impl CellValue {
    pub fn text(text: impl Into<String>) -> Self {
        CellValue::Text {
            text: text.into(),
            class: None,
        }
    }

    /// Plain-text rendering of the cell (image cells render their source)
    pub fn as_text(&self) -> &str {
        match self {
            CellValue::Text { text, .. } => text,
            CellValue::Image { src, .. } => src,
        }
    }
}

impl From<Formatted> for CellValue {
    fn from(f: Formatted) -> Self {
        match f {
            Formatted::Text(text) => CellValue::Text { text, class: None },
            Formatted::Styled { text, class } => CellValue::Text {
                text,
                class: Some(class),
            },
        }
    }
}

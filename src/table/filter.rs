//! Combined search-text / status predicate

use super::value::Row;

/// Status value that disables status filtering
pub const STATUS_ALL: &str = "all";

/// Field consulted by the status filter unless configured otherwise
pub const DEFAULT_STATUS_FIELD: &str = "estado";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    /// Trimmed, lowercased search text
    pub search_term: String,
    pub status: String,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            status: STATUS_ALL.to_string(),
        }
    }
}

impl FilterState {
    pub fn set_search(&mut self, text: &str) {
        self.search_term = text.trim().to_lowercase();
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = if status.is_empty() {
            STATUS_ALL.to_string()
        } else {
            status.to_string()
        };
    }

    pub fn is_identity(&self) -> bool {
        self.search_term.is_empty() && self.status == STATUS_ALL
    }

    pub fn matches<T: Row>(&self, row: &T, status_field: &str) -> bool {
        self.matches_search(row) && self.matches_status(row, status_field)
    }

    fn matches_search<T: Row>(&self, row: &T) -> bool {
        if self.search_term.is_empty() {
            return true;
        }
        row.field_names().into_iter().any(|name| {
            row.field(name)
                .map(|v| v.to_string().to_lowercase())
                .unwrap_or_default()
                .contains(&self.search_term)
        })
    }

    // Rows without the status field always pass.
    fn matches_status<T: Row>(&self, row: &T, status_field: &str) -> bool {
        if self.status == STATUS_ALL {
            return true;
        }
        match row.field(status_field) {
            Some(value) => value.to_string() == self.status,
            None => true,
        }
    }
}

//! Sort indicator (active column + direction)

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
    /// Sorting disabled; rows keep their collection order
    #[serde(rename = "")]
    None,
}

impl SortDirection {
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc | SortDirection::None => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

impl std::str::FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            "" | "none" => Ok(SortDirection::None),
            _ => Err(format!("Invalid sort direction: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Sort {
    pub active: Option<String>,
    pub direction: SortDirection,
}

impl Sort {
    pub fn new(active: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            active: Some(active.into()),
            direction,
        }
    }

    /// Active column when sorting is in effect
    pub fn column(&self) -> Option<&str> {
        match self.direction {
            SortDirection::None => None,
            _ => self.active.as_deref().filter(|c| !c.is_empty()),
        }
    }
}

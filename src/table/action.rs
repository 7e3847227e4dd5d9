//! Per-row action buttons

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionIcon {
    Visibility,
    Edit,
    Delete,
    Other(String),
}

impl ActionIcon {
    pub fn as_str(&self) -> &str {
        match self {
            ActionIcon::Visibility => "visibility",
            ActionIcon::Edit => "edit",
            ActionIcon::Delete => "delete",
            ActionIcon::Other(s) => s.as_str(),
        }
    }

    /// Button colour for the known icons
    pub fn color(&self) -> Option<&'static str> {
        match self {
            ActionIcon::Visibility => Some("#8a09bdee"),
            ActionIcon::Edit => Some("#1f516f"),
            ActionIcon::Delete => Some("#e70b0b"),
            ActionIcon::Other(_) => None,
        }
    }
}

impl std::fmt::Display for ActionIcon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for ActionIcon {
    fn from(s: &str) -> Self {
        match s {
            "visibility" => ActionIcon::Visibility,
            "edit" => ActionIcon::Edit,
            "delete" => ActionIcon::Delete,
            other => ActionIcon::Other(other.to_string()),
        }
    }
}

pub type ActionCallback<T> = Box<dyn Fn(&T) + Send + Sync>;

pub struct RowAction<T> {
    pub icon: ActionIcon,
    pub tooltip: String,
    callback: ActionCallback<T>,
}

impl<T> RowAction<T> {
    pub fn new<F>(icon: impl Into<ActionIcon>, tooltip: impl Into<String>, callback: F) -> Self
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        Self {
            icon: icon.into(),
            tooltip: tooltip.into(),
            callback: Box::new(callback),
        }
    }

    pub fn invoke(&self, row: &T) {
        (self.callback)(row)
    }
}

impl<T> std::fmt::Debug for RowAction<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RowAction")
            .field("icon", &self.icon)
            .field("tooltip", &self.tooltip)
            .finish()
    }
}

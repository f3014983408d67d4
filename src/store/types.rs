use serde::{Deserialize, Serialize};

/// Ordering requested for multi-document reads
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Sort {
    /// Field to order by; `None` keeps the backend's natural order.
    pub field: Option<String>,
    pub ascending: bool,
}

impl Sort {
    pub fn by(field: impl Into<String>, ascending: bool) -> Self {
        Self {
            field: Some(field.into()).filter(|f: &String| !f.is_empty()),
            ascending,
        }
    }

    pub fn unsorted() -> Self {
        Self::default()
    }
}

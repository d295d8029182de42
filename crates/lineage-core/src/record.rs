use serde::{Deserialize, Serialize};

/// One row of lineage input, as handed over by the ingestion layer.
///
/// `name` is the identifier used for parent resolution and search; `id` keys per-node render
/// state (highlight classes, minimap dots).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub year: Option<i64>,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub pledge_label: Option<String>,
    #[serde(default)]
    pub year_label: Option<String>,
}

impl RawRecord {
    pub fn new(id: i64, name: impl Into<String>, year: i64) -> Self {
        Self {
            id,
            name: name.into(),
            parent: None,
            year: Some(year),
            active: false,
            pledge_label: None,
            year_label: None,
        }
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn with_pledge_label(mut self, label: impl Into<String>) -> Self {
        self.pledge_label = Some(label.into());
        self
    }

    pub fn with_year_label(mut self, label: impl Into<String>) -> Self {
        self.year_label = Some(label.into());
        self
    }

    /// Label shown next to the name; falls back to the bare year.
    pub fn display_year(&self) -> String {
        match (&self.year_label, self.year) {
            (Some(label), _) => label.clone(),
            (None, Some(year)) => year.to_string(),
            (None, None) => String::new(),
        }
    }
}

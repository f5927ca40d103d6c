use crate::model::Selectable;
use serde::Serialize;
use serde_json::Value;

/// The host form's own copy of what was chosen. Written only by the selector's
/// confirm callback.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CommittedSelection {
    pub ids: Vec<i64>,
    pub rows: Vec<Value>,
    #[serde(skip)]
    names: Vec<(i64, String)>,
}

impl CommittedSelection {
    /// Ids committed up front, before any row is known.
    pub fn seeded(ids: Vec<i64>) -> Self {
        Self {
            ids,
            ..Self::default()
        }
    }

    pub fn record<T: Selectable>(&mut self, ids: Vec<i64>, rows: Vec<T>) {
        self.names = rows
            .iter()
            .map(|row| (row.id(), row.display_name()))
            .collect();
        self.rows = rows
            .iter()
            .filter_map(|row| serde_json::to_value(row).ok())
            .collect();
        self.ids = ids;
    }

    /// Display name of a committed id, when its row is known.
    pub fn name_of(&self, id: i64) -> Option<&str> {
        self.names
            .iter()
            .find(|(known, _)| *known == id)
            .map(|(_, name)| name.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub(super) enum ExitMode {
    Running,
    Accepted,
    Aborted,
}

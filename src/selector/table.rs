//! Column descriptors and the row-selection control of the selector table.

use crate::model::{Selectable, SelectionMode};
use serde_json::Value;

pub type CellRenderer<T> = Box<dyn Fn(&Value, &T) -> String>;

/// One table column: header text, the record field it reads, and an optional
/// custom renderer receiving `(field value, full row)`.
pub struct Column<T> {
    pub header: String,
    pub key: String,
    pub render: Option<CellRenderer<T>>,
}

impl<T: Selectable> Column<T> {
    pub fn new(header: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            key: key.into(),
            render: None,
        }
    }

    pub fn with_renderer(mut self, render: impl Fn(&Value, &T) -> String + 'static) -> Self {
        self.render = Some(Box::new(render));
        self
    }

    pub fn cell_text(&self, row: &T) -> String {
        let value = field_value(row, &self.key);
        match &self.render {
            Some(render) => render(&value, row),
            None => plain_text(&value),
        }
    }
}

/// Read a field from the serialized form of a record. Unknown keys are null.
pub fn field_value<T: Selectable>(row: &T, key: &str) -> Value {
    match serde_json::to_value(row) {
        Ok(Value::Object(mut map)) => map.remove(key).unwrap_or(Value::Null),
        _ => Value::Null,
    }
}

pub fn plain_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// `(id, name, localized name)`, shared by the taxonomy and label selectors.
pub fn id_name_columns<T: Selectable>() -> Vec<Column<T>> {
    vec![
        Column::new("ID", "id"),
        Column::new("Nombre", "name"),
        Column::new("Nombre (inglés)", "nameEng"),
    ]
}

/// Cursor over the current page plus the event a toggle produces.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RowCursor {
    pub index: usize,
}

impl RowCursor {
    pub fn move_by(&mut self, delta: i32, len: usize) {
        if len == 0 {
            self.index = 0;
            return;
        }
        self.index = (self.index as i32 + delta).rem_euclid(len as i32) as usize;
    }

    pub fn clamp(&mut self, len: usize) {
        if self.index >= len {
            self.index = len.saturating_sub(1);
        }
    }
}

/// Compute the `(ids, rows)` a table selection control reports when `target`
/// is toggled. Radio replaces the selection; checkbox flips membership.
/// Materialized rows are looked up on the current page first, then among the
/// previously pending rows, in id order. Ids with no known row have no entry.
pub fn toggle_event<T: Selectable>(
    mode: SelectionMode,
    target: &T,
    page_rows: &[T],
    pending_ids: &[i64],
    pending_rows: &[T],
) -> (Vec<i64>, Vec<T>) {
    let target_id = target.id();
    let ids: Vec<i64> = match mode {
        SelectionMode::Single => vec![target_id],
        SelectionMode::Multiple => {
            if pending_ids.contains(&target_id) {
                pending_ids
                    .iter()
                    .copied()
                    .filter(|id| *id != target_id)
                    .collect()
            } else {
                let mut next = pending_ids.to_vec();
                next.push(target_id);
                next
            }
        }
    };

    let rows = ids
        .iter()
        .filter_map(|id| {
            page_rows
                .iter()
                .chain(pending_rows.iter())
                .find(|row| row.id() == *id)
                .cloned()
        })
        .collect();
    (ids, rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Label, Video};

    fn label(id: i64) -> Label {
        Label {
            id,
            name: format!("label-{id}"),
            name_eng: format!("tag-{id}"),
        }
    }

    #[test]
    fn default_cells_read_serialized_fields() {
        let columns = id_name_columns::<Label>();
        let row = label(7);
        let cells: Vec<String> = columns.iter().map(|c| c.cell_text(&row)).collect();
        assert_eq!(cells, vec!["7", "label-7", "tag-7"]);
    }

    #[test]
    fn renderer_gets_value_and_row() {
        let column = Column::<Video>::new("URL", "url")
            .with_renderer(|value, row| format!("{}#{}", plain_text(value), row.id));
        let row = Video {
            id: 3,
            name: "demo".into(),
            url: "https://youtu.be/x".into(),
        };
        assert_eq!(column.cell_text(&row), "https://youtu.be/x#3");
        assert_eq!(Column::<Video>::new("?", "missing").cell_text(&row), "");
    }

    #[test]
    fn checkbox_toggle_adds_and_removes() {
        let page = vec![label(1), label(2), label(3)];
        let (ids, rows) = toggle_event(SelectionMode::Multiple, &page[1], &page, &[], &[]);
        assert_eq!(ids, vec![2]);
        assert_eq!(rows, vec![label(2)]);

        let (ids, rows) = toggle_event(SelectionMode::Multiple, &page[0], &page, &ids, &rows);
        assert_eq!(ids, vec![2, 1]);
        assert_eq!(rows, vec![label(2), label(1)]);

        let (ids, rows) = toggle_event(SelectionMode::Multiple, &page[1], &page, &ids, &rows);
        assert_eq!(ids, vec![1]);
        assert_eq!(rows, vec![label(1)]);
    }

    #[test]
    fn radio_toggle_replaces() {
        let page = vec![label(1), label(2)];
        let (ids, rows) = toggle_event(SelectionMode::Single, &page[1], &page, &[1], &[label(1)]);
        assert_eq!(ids, vec![2]);
        assert_eq!(rows, vec![label(2)]);
    }

    #[test]
    fn rows_from_other_pages_survive_via_pending_rows() {
        let page_two = vec![label(11), label(12)];
        let (ids, rows) =
            toggle_event(SelectionMode::Multiple, &page_two[0], &page_two, &[1], &[label(1)]);
        assert_eq!(ids, vec![1, 11]);
        assert_eq!(rows, vec![label(1), label(11)]);
    }

    #[test]
    fn seeded_ids_without_rows_stay_id_only() {
        let page = vec![label(5)];
        let (ids, rows) = toggle_event(SelectionMode::Multiple, &page[0], &page, &[40], &[]);
        assert_eq!(ids, vec![40, 5]);
        assert_eq!(rows, vec![label(5)]);
    }

    #[test]
    fn cursor_wraps_and_clamps() {
        let mut cursor = RowCursor::default();
        cursor.move_by(-1, 3);
        assert_eq!(cursor.index, 2);
        cursor.move_by(1, 3);
        assert_eq!(cursor.index, 0);
        cursor.index = 9;
        cursor.clamp(4);
        assert_eq!(cursor.index, 3);
        cursor.move_by(1, 0);
        assert_eq!(cursor.index, 0);
    }
}

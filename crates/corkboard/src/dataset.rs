//! Dataset model: named columns plus rows of loosely-typed cells.
//!
//! A [`Dataset`] is the canonical `{columns, rows}` shape the rest of the
//! pipeline operates on. Cells are raw JSON values; only strings and numbers
//! are displayable, everything else renders as the [`PLACEHOLDER`] glyph.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Glyph render layers show for an absent or non-displayable cell.
pub const PLACEHOLDER: &str = "—";

/// A named column of a dataset.
///
/// `key` addresses cells inside [`Row`]s and is unique within a dataset;
/// `label` is the human-readable name shown on cards and filter controls.
/// Column order is display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Cell lookup key.
    pub key: String,
    /// Display name.
    pub label: String,
}

impl Column {
    /// Create a column from a key and a display label.
    #[must_use]
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
        }
    }
}

/// A single record: cell values addressed by column key.
///
/// Rows are not required to populate every column, and may carry extra keys
/// no column declares; lookups go through the column `key`, never the label.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row(Map<String, Value>);

impl Row {
    /// Create an empty row.
    #[must_use]
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Set a cell value, replacing any previous value under `key`.
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    /// Raw cell value under `key`, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Displayable text for the cell under `key`.
    ///
    /// Strings display as-is and numbers via their canonical JSON form.
    /// Booleans, nulls, arrays, objects, and absent cells are not
    /// displayable; callers substitute [`PLACEHOLDER`] for those.
    #[must_use]
    pub fn display(&self, key: &str) -> Option<String> {
        match self.0.get(key) {
            Some(Value::String(text)) => Some(text.clone()),
            Some(Value::Number(number)) => Some(number.to_string()),
            _ => None,
        }
    }

    /// All cells in insertion order.
    #[must_use]
    pub fn cells(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Number of cells in the row.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the row holds no cells at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for Row {
    fn from(cells: Map<String, Value>) -> Self {
        Self(cells)
    }
}

/// The data a card grid presents: columns in display order plus rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Columns in display order.
    pub columns: Vec<Column>,
    /// Rows in arrival order.
    pub rows: Vec<Row>,
}

impl Dataset {
    /// Create a dataset from columns and rows.
    #[must_use]
    pub fn new(columns: Vec<Column>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    /// The single-card dataset a component shows until real data arrives,
    /// doubling as a smoke signal that the embedding works end to end.
    #[must_use]
    pub fn fallback() -> Self {
        let mut row = Row::new();
        row.set("status", Value::String("UI loaded correctly".to_owned()));
        Self {
            columns: vec![Column::new("status", "Status")],
            rows: vec![row],
        }
    }

    /// The column declared under `key`, if any.
    #[must_use]
    pub fn column(&self, key: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.key == key)
    }

    /// True when some column is declared under `key`.
    #[must_use]
    pub fn has_column(&self, key: &str) -> bool {
        self.column(key).is_some()
    }

    /// Distinct displayable values under `key` across all rows, in
    /// first-seen row order.
    ///
    /// Only non-empty strings and numbers qualify; note that the number `0`
    /// does qualify even though it is falsy in some host languages. Rows
    /// without the key contribute nothing.
    #[must_use]
    pub fn distinct_values(&self, key: &str) -> Vec<Value> {
        let mut seen: Vec<Value> = Vec::new();
        for row in &self.rows {
            let Some(value) = row.get(key) else { continue };
            let displayable = match value {
                Value::String(text) => !text.is_empty(),
                Value::Number(_) => true,
                _ => false,
            };
            if displayable && !seen.contains(value) {
                seen.push(value.clone());
            }
        }
        seen
    }
}

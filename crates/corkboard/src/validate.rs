//! Structural validation of candidate payloads.
//!
//! [`validate`] is the single gate between untrusted inbound data and the
//! typed [`Dataset`]: everything that passes it can be converted without
//! surprises, everything that fails is rejected whole. Checks run in a
//! fixed order and stop at the first failure, so equal inputs always
//! produce the same [`PayloadError`].
//!
//! Deliberately tolerated here: empty `columns`, empty `rows`, rows that
//! are not objects, rows missing declared keys, and rows carrying keys no
//! column declares. Those all have defined downstream behavior.

use serde_json::Value;
use thiserror::Error;

use crate::dataset::{Column, Dataset, Row};

/// Why a candidate payload was rejected.
///
/// Variants are ordered the way the checks run; the index in the
/// column-level variants refers to the offending entry of `columns`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    /// The candidate is not a JSON object.
    #[error("payload is not an object")]
    NotAnObject,
    /// `columns` is missing or not an array.
    #[error("payload field `columns` is missing or not an array")]
    ColumnsNotArray,
    /// `rows` is missing or not an array.
    #[error("payload field `rows` is missing or not an array")]
    RowsNotArray,
    /// A column entry has no usable `key`.
    #[error("column {index} has no usable `key` (want a non-empty string)")]
    ColumnMissingKey {
        /// Position of the offending column entry.
        index: usize,
    },
    /// A column entry has no usable `label`.
    #[error("column {index} has no usable `label` (want a non-empty string)")]
    ColumnMissingLabel {
        /// Position of the offending column entry.
        index: usize,
    },
    /// A column entry reuses a key an earlier entry already declared.
    #[error("column {index} reuses key `{key}`")]
    DuplicateColumnKey {
        /// Position of the offending column entry.
        index: usize,
        /// The duplicated key.
        key: String,
    },
}

/// Check one candidate payload against the canonical shape.
///
/// Pure and read-only; the caller decides what a rejection means. Checks
/// run in order: object, `columns` array, `rows` array, then per column
/// (in order) key, label, and key uniqueness, stopping at the first
/// failure.
pub fn validate(candidate: &Value) -> Result<(), PayloadError> {
    let Some(object) = candidate.as_object() else {
        return Err(PayloadError::NotAnObject);
    };

    let columns = object
        .get("columns")
        .and_then(Value::as_array)
        .ok_or(PayloadError::ColumnsNotArray)?;
    if !object.get("rows").is_some_and(Value::is_array) {
        return Err(PayloadError::RowsNotArray);
    }

    let mut seen: Vec<&str> = Vec::with_capacity(columns.len());
    for (index, column) in columns.iter().enumerate() {
        let Some(key) = usable_string(column.get("key")) else {
            return Err(PayloadError::ColumnMissingKey { index });
        };
        if usable_string(column.get("label")).is_none() {
            return Err(PayloadError::ColumnMissingLabel { index });
        }
        if seen.contains(&key) {
            return Err(PayloadError::DuplicateColumnKey {
                index,
                key: key.to_owned(),
            });
        }
        seen.push(key);
    }

    Ok(())
}

/// A usable identifier is a non-empty JSON string. `Value::get` returns
/// `None` on non-objects, so malformed column entries fall out here too.
fn usable_string(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|text| !text.is_empty())
}

impl Dataset {
    /// Validate a candidate payload and convert it into a typed dataset.
    ///
    /// Conversion is lossless for well-formed rows; a row that is not a
    /// JSON object is kept as an empty row so that row count and row
    /// positions survive.
    pub fn from_payload(candidate: &Value) -> Result<Self, PayloadError> {
        validate(candidate)?;

        let object = candidate.as_object().ok_or(PayloadError::NotAnObject)?;
        let raw_columns = object
            .get("columns")
            .and_then(Value::as_array)
            .ok_or(PayloadError::ColumnsNotArray)?;
        let raw_rows = object
            .get("rows")
            .and_then(Value::as_array)
            .ok_or(PayloadError::RowsNotArray)?;

        let columns = raw_columns
            .iter()
            .map(|entry| {
                Column::new(
                    entry.get("key").and_then(Value::as_str).unwrap_or_default(),
                    entry.get("label").and_then(Value::as_str).unwrap_or_default(),
                )
            })
            .collect();
        let rows = raw_rows
            .iter()
            .map(|raw| match raw {
                Value::Object(cells) => Row::from(cells.clone()),
                _ => Row::default(),
            })
            .collect();

        Ok(Self::new(columns, rows))
    }
}

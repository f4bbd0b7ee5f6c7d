//! The view-state engine behind one card-grid component.
//!
//! A [`CardGrid`] owns the canonical dataset, the active filters, the
//! filtered view, and the single selection, and runs the inbound pipeline
//! (normalize, validate, replace) over every received message. It never
//! touches a rendering surface itself: presentation layers subscribe to
//! [`ViewEvent`]s and read state back through the accessors.
//!
//! # Example
//!
//! ```rust
//! use corkboard::engine::{CardGrid, SurfaceId};
//! use serde_json::json;
//!
//! let mut grid = CardGrid::new().filterable_columns(["risk"]);
//! grid.receive(json!({
//!     "columns": [{"key": "risk", "label": "Risk"}],
//!     "rows": [{"risk": "High"}, {"risk": "Low"}]
//! }))?;
//!
//! grid.set_filter("risk", Some(json!("High")));
//! assert_eq!(grid.visible_len(), 1);
//! assert!(grid.select(0, SurfaceId(7)));
//! # Ok::<(), corkboard::validate::PayloadError>(())
//! ```

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;

use crate::dataset::{Dataset, Row};
use crate::diag::{DiagnosticEvent, DiagnosticSink, TracingSink};
use crate::envelope::{Envelope, EnvelopeKind};
use crate::outbound::{NullChannel, OutboundChannel, TRACE_INSTRUCTION, UserMessage};
use crate::validate::PayloadError;

/// Opaque handle to the rendered surface element of a selected card.
///
/// Minted and interpreted by the presentation layer; the engine stores it
/// alongside the selection and hands it back unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(pub u64);

/// The current selection: one visible row plus its surface handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    /// Index into the current filtered view.
    pub row: usize,
    /// Render-layer handle for the selected card.
    pub surface: SurfaceId,
}

/// State-change notification delivered to subscribed render layers.
///
/// Events say *what kind* of change happened; subscribers read the new
/// state back through the engine's accessors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewEvent {
    /// The dataset was replaced: rebuild filter controls and cards.
    DatasetReplaced,
    /// A filter changed: the visible set was recomputed and any selection
    /// dropped.
    ViewRecomputed,
    /// The selection moved: restyle cards, nothing else changed.
    SelectionChanged,
}

/// One filter control a presentation layer should expose.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterControl {
    /// Column key the control filters on.
    pub key: String,
    /// Display label of the matching dataset column.
    pub label: String,
    /// Distinct choices across the full dataset, first-seen order.
    pub options: Vec<Value>,
    /// Currently active value, if any.
    pub active: Option<Value>,
}

type ChangeObserver = Box<dyn FnMut(ViewEvent)>;

/// One card-grid component instance.
///
/// All state is instance-owned; two grids never share anything. Everything
/// here is synchronous and single-threaded: each operation runs to
/// completion before the next begins, which is what keeps dataset
/// replacement atomic without locks.
pub struct CardGrid {
    dataset: Dataset,
    filterable: Vec<String>,
    filters: HashMap<String, Value>,
    visible: Vec<usize>,
    selection: Option<Selection>,
    sink: Box<dyn DiagnosticSink>,
    outbound: Box<dyn OutboundChannel>,
    observers: Vec<ChangeObserver>,
}

impl Default for CardGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl CardGrid {
    /// Create a grid showing the built-in fallback dataset, with no
    /// filterable columns, diagnostics to `tracing`, and no host attached.
    #[must_use]
    pub fn new() -> Self {
        let dataset = Dataset::fallback();
        let visible = (0..dataset.rows.len()).collect();
        Self {
            dataset,
            filterable: Vec::new(),
            filters: HashMap::new(),
            visible,
            selection: None,
            sink: Box::new(TracingSink),
            outbound: Box::new(NullChannel),
            observers: Vec::new(),
        }
    }

    /// Declare which column keys get filter controls.
    ///
    /// Keys absent from the current dataset stay declared but dormant; they
    /// come back to life when a dataset that carries them arrives.
    #[must_use]
    pub fn filterable_columns<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filterable = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Route diagnostics into `sink` instead of the default `tracing` sink.
    #[must_use]
    pub fn with_sink(mut self, sink: impl DiagnosticSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Deliver outbound trace requests through `channel`.
    #[must_use]
    pub fn with_outbound(mut self, channel: impl OutboundChannel + 'static) -> Self {
        self.outbound = Box::new(channel);
        self
    }

    /// Subscribe a render layer to state-change notifications.
    ///
    /// Observers run synchronously, in subscription order, after the state
    /// change is complete; reading state happens afterwards, through the
    /// accessors.
    pub fn on_change(&mut self, observer: impl FnMut(ViewEvent) + 'static) {
        self.observers.push(Box::new(observer));
    }

    // =========================================================================
    // Inbound pipeline
    // =========================================================================

    /// Run the full inbound pipeline on one message.
    ///
    /// The message is normalized, validated, and, on a pass, atomically
    /// replaces the dataset: filters are cleared, the filtered view becomes
    /// all rows, and any selection is dropped. On rejection nothing changes;
    /// the prior dataset, filters, and selection stay exactly as they were,
    /// including a previously selected row.
    pub fn receive(&mut self, message: Value) -> Result<(), PayloadError> {
        self.sink.report(&DiagnosticEvent::InboundReceived);

        let envelope = Envelope::decode(message);
        let kind = envelope.kind();
        if kind == EnvelopeKind::Unrecognized {
            self.sink.report(&DiagnosticEvent::MalformedEnvelope);
        } else {
            self.sink.report(&DiagnosticEvent::EnvelopeDecoded { kind });
        }

        match Dataset::from_payload(&envelope.into_candidate()) {
            Ok(dataset) => {
                self.replace_dataset(dataset);
                Ok(())
            }
            Err(error) => {
                self.sink.report(&DiagnosticEvent::InvalidPayload(error.clone()));
                Err(error)
            }
        }
    }

    /// Test hook: re-inject an arbitrary value as an inbound message.
    ///
    /// External harnesses drive the pipeline through this without a real
    /// host; the verdict is discarded, rejections surface as diagnostics.
    pub fn inject(&mut self, message: Value) {
        let _ = self.receive(message);
    }

    fn replace_dataset(&mut self, dataset: Dataset) {
        let columns = dataset.columns.len();
        let rows = dataset.rows.len();
        self.dataset = dataset;
        self.filters.clear();
        self.recompute_view();
        self.sink.report(&DiagnosticEvent::DatasetReplaced { columns, rows });
        if rows == 0 {
            self.sink.report(&DiagnosticEvent::EmptyDataset);
        }
        self.notify(ViewEvent::DatasetReplaced);
    }

    // =========================================================================
    // Filters
    // =========================================================================

    /// Set or clear the filter on a declared filterable column.
    ///
    /// `None`, an empty string, and JSON null all mean "clear this filter".
    /// Any call on a declared key recomputes the filtered view and drops the
    /// selection, even when the stored filter did not actually change; the
    /// selection is defined relative to the visible set, and whenever that
    /// set may change the contract is to let go rather than risk pointing
    /// at a hidden or shifted row. Calls on undeclared keys are ignored
    /// entirely and touch nothing.
    pub fn set_filter(&mut self, key: &str, value: Option<Value>) {
        if !self.is_filterable(key) {
            self.sink
                .report(&DiagnosticEvent::UnknownFilterColumn { key: key.to_owned() });
            return;
        }

        let cleared = match value {
            Some(value) if !clears_filter(&value) => {
                self.filters.insert(key.to_owned(), value);
                false
            }
            _ => {
                self.filters.remove(key);
                true
            }
        };
        self.sink.report(&DiagnosticEvent::FilterChanged {
            key: key.to_owned(),
            cleared,
        });
        self.recompute_view();
        self.notify(ViewEvent::ViewRecomputed);
    }

    /// Distinct choices for a filter control on `key`.
    ///
    /// Drawn from the full dataset, never the filtered subset, so a chosen
    /// value stays representable while it exists in any row.
    #[must_use]
    pub fn filter_options(&self, key: &str) -> Vec<Value> {
        self.dataset.distinct_values(key)
    }

    /// The filter controls to expose right now: declared keys that the
    /// current dataset actually carries, in declared order. Stale filters
    /// on absent columns stay stored but get no control.
    #[must_use]
    pub fn filter_controls(&self) -> Vec<FilterControl> {
        self.filterable
            .iter()
            .filter_map(|key| {
                let column = self.dataset.column(key)?;
                Some(FilterControl {
                    key: key.clone(),
                    label: column.label.clone(),
                    options: self.dataset.distinct_values(key),
                    active: self.filters.get(key).cloned(),
                })
            })
            .collect()
    }

    // =========================================================================
    // Selection and tracing
    // =========================================================================

    /// Select the card at `index` in the filtered view.
    ///
    /// Replaces any prior selection; re-selecting the current row is a
    /// normal new selection, not a toggle. Returns `false` when `index` is
    /// past the visible set, leaving any prior selection untouched.
    pub fn select(&mut self, index: usize, surface: SurfaceId) -> bool {
        if index >= self.visible.len() {
            self.sink.report(&DiagnosticEvent::SelectionOutOfRange {
                index,
                len: self.visible.len(),
            });
            return false;
        }
        self.selection = Some(Selection { row: index, surface });
        self.sink.report(&DiagnosticEvent::SelectionSet { row: index });
        self.notify(ViewEvent::SelectionChanged);
        true
    }

    /// Emit a trace request for the selected row.
    ///
    /// Composes the human-readable summary (`"label: value"` per displayable
    /// cell, column order, comma-joined) and the machine payload (full row
    /// plus instruction) and sends both through the outbound channel. Takes
    /// `&self`: tracing reads the selection and never transitions it. With
    /// no selection this is a no-op that returns `false`.
    pub fn trace_selected(&self) -> bool {
        let Some(row) = self.selected_row() else {
            self.sink.report(&DiagnosticEvent::NoSelection);
            return false;
        };

        let summary = self.summarize(row);
        let payload = serde_json::json!({
            "instruction": TRACE_INSTRUCTION,
            "row": row,
        });
        let message = UserMessage::new(summary, payload.to_string());
        self.outbound.send(&message);
        self.sink.report(&DiagnosticEvent::TraceEmitted);
        true
    }

    /// `"label: value"` for every displayable cell of `row`, in column
    /// order, joined with `", "`.
    fn summarize(&self, row: &Row) -> String {
        let parts: Vec<String> = self
            .dataset
            .columns
            .iter()
            .filter_map(|column| {
                row.display(&column.key)
                    .map(|value| format!("{}: {value}", column.label))
            })
            .collect();
        parts.join(", ")
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The current dataset.
    #[must_use]
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// The declared filterable column keys, in declared order.
    #[must_use]
    pub fn filterable(&self) -> &[String] {
        &self.filterable
    }

    /// True when `key` is in the declared filterable set.
    #[must_use]
    pub fn is_filterable(&self, key: &str) -> bool {
        self.filterable.iter().any(|declared| declared == key)
    }

    /// The active filter value on `key`, if one is set.
    #[must_use]
    pub fn filter_value(&self, key: &str) -> Option<&Value> {
        self.filters.get(key)
    }

    /// Number of active filters.
    #[must_use]
    pub fn active_filter_count(&self) -> usize {
        self.filters.len()
    }

    /// Dataset row indices of the filtered view, in dataset order.
    #[must_use]
    pub fn visible_indices(&self) -> &[usize] {
        &self.visible
    }

    /// Number of rows in the filtered view.
    #[must_use]
    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    /// Rows of the filtered view, in dataset order.
    pub fn visible_rows(&self) -> impl Iterator<Item = &Row> {
        self.visible
            .iter()
            .filter_map(|&index| self.dataset.rows.get(index))
    }

    /// The row at `index` of the filtered view.
    #[must_use]
    pub fn visible_row(&self, index: usize) -> Option<&Row> {
        self.visible
            .get(index)
            .and_then(|&row| self.dataset.rows.get(row))
    }

    /// The current selection, if any.
    #[must_use]
    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    /// The currently selected row, if any.
    #[must_use]
    pub fn selected_row(&self) -> Option<&Row> {
        self.selection.and_then(|selection| self.visible_row(selection.row))
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Rebuild the filtered view and drop the selection. The selection is
    /// only meaningful relative to the visible set it was made in.
    fn recompute_view(&mut self) {
        let next: Vec<usize> = self
            .dataset
            .rows
            .iter()
            .enumerate()
            .filter(|(_, row)| Self::row_matches(&self.filters, row))
            .map(|(index, _)| index)
            .collect();
        self.visible = next;
        self.selection = None;
    }

    /// A row is visible when every active filter matches its raw cell value
    /// exactly, JSON equality, no coercion. The number `2` and the string
    /// `"2"` are different values.
    fn row_matches(filters: &HashMap<String, Value>, row: &Row) -> bool {
        filters.iter().all(|(key, value)| row.get(key) == Some(value))
    }

    fn notify(&mut self, event: ViewEvent) {
        for observer in &mut self.observers {
            observer(event);
        }
    }
}

/// Filter values that mean "show everything": the empty-string choice a
/// select control produces, and JSON null.
fn clears_filter(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.is_empty(),
        _ => false,
    }
}

impl fmt::Debug for CardGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardGrid")
            .field("dataset", &self.dataset)
            .field("filterable", &self.filterable)
            .field("filters", &self.filters)
            .field("visible", &self.visible)
            .field("selection", &self.selection)
            .finish_non_exhaustive()
    }
}

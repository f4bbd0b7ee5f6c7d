//! Structured diagnostics for every pipeline decision and state change.
//!
//! The engine narrates what it does through [`DiagnosticEvent`]s pushed
//! into a [`DiagnosticSink`]. Events carry an explicit category and
//! severity instead of preformatted text, so tests assert on what
//! happened rather than on log wording. The default sink forwards to the
//! `tracing` ecosystem; tests usually install a recording sink instead.

use std::fmt;

use crate::envelope::EnvelopeKind;
use crate::validate::PayloadError;

/// How serious a diagnostic event is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Routine progress.
    Info,
    /// Something was ignored or degraded, last good state retained.
    Warning,
    /// Inbound data was rejected.
    Error,
}

impl Severity {
    /// Stable lowercase name, for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One pipeline decision or state transition.
///
/// None of these are fatal; the engine always retains its last good state.
#[derive(Debug, Clone, PartialEq)]
pub enum DiagnosticEvent {
    /// An inbound message entered the pipeline.
    InboundReceived,
    /// The normalizer recognized an envelope shape.
    EnvelopeDecoded {
        /// Which shape matched.
        kind: EnvelopeKind,
    },
    /// The normalizer recognized nothing and passed the value through.
    MalformedEnvelope,
    /// The validator rejected the candidate payload.
    InvalidPayload(PayloadError),
    /// A valid payload replaced the dataset.
    DatasetReplaced {
        /// Number of columns in the new dataset.
        columns: usize,
        /// Number of rows in the new dataset.
        rows: usize,
    },
    /// The new dataset has zero rows. Valid, but worth flagging.
    EmptyDataset,
    /// A filter was set or cleared on a declared filterable column.
    FilterChanged {
        /// The filterable column key.
        key: String,
        /// True when the filter was cleared rather than set.
        cleared: bool,
    },
    /// A filter request named a key outside the declared filterable set.
    UnknownFilterColumn {
        /// The undeclared key, ignored.
        key: String,
    },
    /// A row of the filtered view was selected.
    SelectionSet {
        /// Index into the filtered view.
        row: usize,
    },
    /// A selection request pointed past the end of the filtered view.
    SelectionOutOfRange {
        /// The requested index.
        index: usize,
        /// Current filtered-view length.
        len: usize,
    },
    /// A trace was requested with no row selected.
    NoSelection,
    /// A trace request went out on the outbound channel.
    TraceEmitted,
}

impl DiagnosticEvent {
    /// The severity this event reports at.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        match self {
            Self::InboundReceived
            | Self::EnvelopeDecoded { .. }
            | Self::DatasetReplaced { .. }
            | Self::FilterChanged { .. }
            | Self::SelectionSet { .. }
            | Self::TraceEmitted => Severity::Info,
            Self::MalformedEnvelope
            | Self::EmptyDataset
            | Self::UnknownFilterColumn { .. }
            | Self::SelectionOutOfRange { .. }
            | Self::NoSelection => Severity::Warning,
            Self::InvalidPayload(_) => Severity::Error,
        }
    }
}

impl fmt::Display for DiagnosticEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InboundReceived => f.write_str("inbound message received"),
            Self::EnvelopeDecoded { kind } => {
                write!(f, "decoded {} envelope", kind.as_str())
            }
            Self::MalformedEnvelope => {
                f.write_str("message shape not recognized, passing through")
            }
            Self::InvalidPayload(error) => write!(f, "payload rejected: {error}"),
            Self::DatasetReplaced { columns, rows } => {
                write!(f, "dataset replaced: {columns} column(s), {rows} row(s)")
            }
            Self::EmptyDataset => f.write_str("dataset has no rows"),
            Self::FilterChanged { key, cleared } => {
                if *cleared {
                    write!(f, "filter cleared on `{key}`")
                } else {
                    write!(f, "filter set on `{key}`")
                }
            }
            Self::UnknownFilterColumn { key } => {
                write!(f, "ignoring filter on undeclared column `{key}`")
            }
            Self::SelectionSet { row } => write!(f, "selected visible row {row}"),
            Self::SelectionOutOfRange { index, len } => {
                write!(f, "selection index {index} out of range (visible rows: {len})")
            }
            Self::NoSelection => f.write_str("trace requested with no selection"),
            Self::TraceEmitted => f.write_str("trace request emitted"),
        }
    }
}

/// Observability seam the engine reports through.
///
/// Implementations must not panic and must not call back into the engine;
/// they see every event in the order it happened.
pub trait DiagnosticSink {
    /// Record one event.
    fn report(&self, event: &DiagnosticEvent);
}

/// Default sink: forwards events to `tracing` at their severity.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, event: &DiagnosticEvent) {
        match event.severity() {
            Severity::Info => tracing::info!(target: "corkboard", "{event}"),
            Severity::Warning => tracing::warn!(target: "corkboard", "{event}"),
            Severity::Error => tracing::error!(target: "corkboard", "{event}"),
        }
    }
}

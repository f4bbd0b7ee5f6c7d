#![forbid(unsafe_code)]
// Allow pedantic lints for early-stage API ergonomics.
#![allow(clippy::doc_markdown)]
#![allow(clippy::nursery)]
#![allow(clippy::pedantic)]

//! # Corkboard
//!
//! The message-driven data pipeline behind an embeddable card-grid UI
//! component. Hosts post loosely-shaped messages at the component;
//! corkboard normalizes the envelope, validates the payload, and keeps the
//! view state (dataset, filters, filtered view, selection) that a
//! presentation layer renders from.
//!
//! The pipeline runs in three stages per inbound message:
//! - **envelope** - recognizes known envelope shapes and unwraps the
//!   candidate payload
//! - **validate** - structurally verifies the candidate before any state
//!   may change
//! - **engine** - owns the state, recomputes the filtered view, and emits
//!   outbound trace requests
//!
//! Around those:
//! - **dataset** - the canonical `{columns, rows}` model
//! - **diag** - categorized diagnostic events and the sink they flow into
//! - **outbound** - the trace-request message and its delivery seam
//! - **harness** - recording sink and capture channel for tests
//!
//! ## Example
//!
//! ```rust
//! use corkboard::engine::{CardGrid, SurfaceId};
//! use corkboard::harness::CaptureChannel;
//! use serde_json::json;
//!
//! let outbound = CaptureChannel::new();
//! let mut grid = CardGrid::new()
//!     .filterable_columns(["risk"])
//!     .with_outbound(outbound.clone());
//!
//! // A host message, in the current wrapped envelope.
//! grid.inject(json!({
//!     "type": "ui_component_render",
//!     "source": "agentos",
//!     "payload": {
//!         "columns": [
//!             {"key": "owner", "label": "Owner"},
//!             {"key": "risk", "label": "Risk"}
//!         ],
//!         "rows": [
//!             {"owner": "Alice", "risk": "High"},
//!             {"owner": "Bob", "risk": "Low"}
//!         ]
//!     }
//! }));
//!
//! grid.set_filter("risk", Some(json!("High")));
//! assert!(grid.select(0, SurfaceId(1)));
//! assert!(grid.trace_selected());
//! assert_eq!(outbound.sent()[0].message, "Owner: Alice, Risk: High");
//! ```

pub mod dataset;
pub mod diag;
pub mod engine;
pub mod envelope;
pub mod harness;
pub mod outbound;
pub mod validate;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::dataset::{Column, Dataset, PLACEHOLDER, Row};
    pub use crate::diag::{DiagnosticEvent, DiagnosticSink, Severity, TracingSink};
    pub use crate::engine::{CardGrid, FilterControl, Selection, SurfaceId, ViewEvent};
    pub use crate::envelope::{Envelope, EnvelopeKind};
    pub use crate::harness::{CaptureChannel, RecordingSink};
    pub use crate::outbound::{NullChannel, OutboundChannel, UserMessage};
    pub use crate::validate::{PayloadError, validate};
}

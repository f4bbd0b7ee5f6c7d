//! End-to-end tests for the inbound pipeline driven through the public API.
//!
//! Everything here goes through the test hook or `receive`, the way an
//! external harness would drive an embedded component: no reaching into
//! internals, assertions are made on accessors, captured diagnostics, and
//! captured outbound messages.
//!
//! Test categories:
//! - Render scenarios: canonical and wrapped messages replacing the view
//! - Rejection scenarios: malformed input leaving the last good view alone
//! - Interaction scenarios: filters, selection, and source tracing

#![forbid(unsafe_code)]

use corkboard::dataset::Dataset;
use corkboard::diag::{DiagnosticEvent, Severity};
use corkboard::engine::{CardGrid, SurfaceId, ViewEvent};
use corkboard::harness::{CaptureChannel, RecordingSink};
use corkboard::validate::PayloadError;
use serde_json::{Value, json};

fn status_payload() -> Value {
    json!({
        "columns": [{"key": "s", "label": "Status"}],
        "rows": [{"s": "OK"}, {"s": "FAIL"}]
    })
}

// ============================================================================
// Render scenarios
// ============================================================================

mod render_tests {
    use super::*;

    #[test]
    fn test_canonical_message_renders_two_rows() {
        let mut grid = CardGrid::new();
        grid.inject(status_payload());
        assert_eq!(grid.visible_len(), 2);
        let values: Vec<_> = grid
            .visible_rows()
            .map(|row| row.display("s").unwrap())
            .collect();
        assert_eq!(values, vec!["OK", "FAIL"]);
    }

    #[test]
    fn test_wrapped_message_replaces_dataset_and_clears_selection() {
        let mut grid = CardGrid::new();
        grid.inject(status_payload());
        assert!(grid.select(0, SurfaceId(1)));

        grid.inject(json!({
            "type": "ui_component_render",
            "source": "agentos",
            "payload": {
                "columns": [{"key": "s", "label": "Status"}],
                "rows": [{"s": "FAIL"}]
            }
        }));

        assert_eq!(grid.visible_len(), 1);
        assert_eq!(
            grid.visible_row(0).and_then(|row| row.display("s")),
            Some("FAIL".to_owned())
        );
        assert_eq!(grid.selection(), None);
    }

    #[test]
    fn test_dropdown_envelope_is_equivalent() {
        let mut current = CardGrid::new();
        let mut dropdown = CardGrid::new();
        current.inject(json!({
            "type": "ui_component_render",
            "source": "agentos",
            "payload": status_payload()
        }));
        dropdown.inject(json!({
            "type": "ui_component_render_card_dropdown",
            "source": "agentos",
            "payload": status_payload()
        }));
        assert_eq!(current.dataset(), dropdown.dataset());
    }

    #[test]
    fn test_legacy_wrapper_still_works() {
        let mut grid = CardGrid::new();
        grid.inject(json!({"payload": status_payload()}));
        assert_eq!(grid.visible_len(), 2);
    }

    #[test]
    fn test_fallback_is_shown_until_first_valid_message() {
        let grid = CardGrid::new();
        assert_eq!(grid.dataset(), &Dataset::fallback());
        assert_eq!(
            grid.visible_row(0).and_then(|row| row.display("status")),
            Some("UI loaded correctly".to_owned())
        );
    }

    #[test]
    fn test_replacement_is_total_not_a_merge() {
        let mut grid = CardGrid::new();
        grid.inject(status_payload());
        grid.inject(json!({
            "columns": [{"key": "other", "label": "Other"}],
            "rows": [{"other": 1}]
        }));
        assert_eq!(grid.dataset().columns.len(), 1);
        assert_eq!(grid.dataset().columns[0].key, "other");
        assert_eq!(grid.visible_len(), 1);
    }
}

// ============================================================================
// Rejection scenarios
// ============================================================================

mod rejection_tests {
    use super::*;

    #[test]
    fn test_rejected_message_retains_prior_view() {
        let sink = RecordingSink::new();
        let mut grid = CardGrid::new()
            .filterable_columns(["s"])
            .with_sink(sink.clone());
        grid.inject(status_payload());
        grid.set_filter("s", Some(json!("OK")));
        assert!(grid.select(0, SurfaceId(3)));

        let dataset_before = grid.dataset().clone();
        let selection_before = grid.selection();
        sink.clear();

        grid.inject(json!({"columns": [{"key": "a"}], "rows": []}));

        assert_eq!(grid.dataset(), &dataset_before);
        assert_eq!(grid.filter_value("s"), Some(&json!("OK")));
        assert_eq!(grid.selection(), selection_before);
        assert!(sink.contains(&DiagnosticEvent::InvalidPayload(
            PayloadError::ColumnMissingLabel { index: 0 }
        )));
    }

    #[test]
    fn test_unrecognized_shape_is_warned_then_rejected() {
        let sink = RecordingSink::new();
        let mut grid = CardGrid::new().with_sink(sink.clone());
        grid.inject(json!({"hello": "world"}));

        assert_eq!(grid.dataset(), &Dataset::fallback());
        assert!(sink.contains(&DiagnosticEvent::MalformedEnvelope));
        assert!(sink.contains(&DiagnosticEvent::InvalidPayload(
            PayloadError::ColumnsNotArray
        )));
        assert_eq!(sink.max_severity(), Some(Severity::Error));
    }

    #[test]
    fn test_wrapped_envelope_without_payload_is_rejected() {
        let sink = RecordingSink::new();
        let mut grid = CardGrid::new().with_sink(sink.clone());
        grid.inject(json!({"type": "ui_component_render", "source": "agentos"}));
        assert_eq!(grid.dataset(), &Dataset::fallback());
        assert!(sink.contains(&DiagnosticEvent::InvalidPayload(
            PayloadError::NotAnObject
        )));
    }

    #[test]
    fn test_rejection_does_not_notify_render_layers() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let seen: Rc<RefCell<Vec<ViewEvent>>> = Rc::default();
        let log = Rc::clone(&seen);
        let mut grid = CardGrid::new();
        grid.on_change(move |event| log.borrow_mut().push(event));

        grid.inject(json!(null));
        assert!(seen.borrow().is_empty());

        grid.inject(status_payload());
        assert_eq!(*seen.borrow(), vec![ViewEvent::DatasetReplaced]);
    }
}

// ============================================================================
// Interaction scenarios
// ============================================================================

mod interaction_tests {
    use super::*;

    #[test]
    fn test_filter_select_trace_round() {
        let outbound = CaptureChannel::new();
        let mut grid = CardGrid::new()
            .filterable_columns(["risk"])
            .with_outbound(outbound.clone());
        grid.inject(json!({
            "columns": [
                {"key": "clause", "label": "Clause/Section"},
                {"key": "risk", "label": "Risk Ranking"}
            ],
            "rows": [
                {"clause": "3.1", "risk": "Low"},
                {"clause": "4.2", "risk": "High"},
                {"clause": "7.9", "risk": "High"}
            ]
        }));

        grid.set_filter("risk", Some(json!("High")));
        assert_eq!(grid.visible_len(), 2);
        assert!(grid.select(1, SurfaceId(42)));
        assert!(grid.trace_selected());

        let sent = outbound.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].message, "Clause/Section: 7.9, Risk Ranking: High");
        let machine: Value = serde_json::from_str(&sent[0].llm_message).unwrap();
        assert_eq!(machine["row"], json!({"clause": "7.9", "risk": "High"}));
    }

    #[test]
    fn test_trace_summary_contract() {
        let outbound = CaptureChannel::new();
        let mut grid = CardGrid::new().with_outbound(outbound.clone());
        grid.inject(json!({
            "columns": [{"key": "a", "label": "Owner"}],
            "rows": [{"a": "Alice"}]
        }));
        assert!(grid.select(0, SurfaceId(0)));
        assert!(grid.trace_selected());
        assert_eq!(outbound.sent()[0].message, "Owner: Alice");
    }

    #[test]
    fn test_selection_cleared_by_any_filter_change() {
        let mut grid = CardGrid::new().filterable_columns(["s"]);
        grid.inject(status_payload());
        assert!(grid.select(1, SurfaceId(5)));
        grid.set_filter("s", Some(json!("OK")));
        assert_eq!(grid.selection(), None);

        assert!(grid.select(0, SurfaceId(6)));
        // Same value again still recomputes, so the selection goes again.
        grid.set_filter("s", Some(json!("OK")));
        assert_eq!(grid.selection(), None);
    }

    #[test]
    fn test_filter_options_stay_stable_under_filtering() {
        let mut grid = CardGrid::new().filterable_columns(["s"]);
        grid.inject(status_payload());
        grid.set_filter("s", Some(json!("FAIL")));
        // A previously chosen value that still exists anywhere stays
        // representable.
        assert_eq!(grid.filter_options("s"), vec![json!("OK"), json!("FAIL")]);
    }

    #[test]
    fn test_selection_survives_trace_but_not_replace() {
        let outbound = CaptureChannel::new();
        let mut grid = CardGrid::new().with_outbound(outbound.clone());
        grid.inject(status_payload());
        assert!(grid.select(0, SurfaceId(8)));
        assert!(grid.trace_selected());
        assert!(grid.selection().is_some());

        grid.inject(status_payload());
        assert_eq!(grid.selection(), None);
        assert!(!grid.trace_selected());
        assert_eq!(outbound.sent().len(), 1);
    }
}

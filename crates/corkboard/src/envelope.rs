//! Inbound message envelopes and the decoder that normalizes them.
//!
//! Hosts have shipped data to the component in several shapes over time:
//! a wrapped form tagged with an action and an originator, an older form
//! that only wraps a `payload`, and the bare canonical `{columns, rows}`
//! object. [`Envelope::decode`] sniffs one inbound value into exactly one
//! variant; unwrapping never validates, so a recognized envelope can still
//! carry garbage. Validation happens downstream.
//!
//! Recognition order matters and is part of the contract:
//!
//! 1. wrapped, current action
//! 2. wrapped, dropdown action
//! 3. canonical passthrough
//! 4. legacy `payload` wrapper
//! 5. everything else, carried unchanged

use serde_json::Value;

/// Action tag of the current wrapped render envelope.
pub const RENDER_ACTION: &str = "ui_component_render";

/// Action tag of the card-dropdown render envelope.
pub const DROPDOWN_ACTION: &str = "ui_component_render_card_dropdown";

/// Originator tag a wrapped envelope must carry to be unwrapped.
pub const ORIGINATOR: &str = "agentos";

/// Which envelope shape [`Envelope::decode`] recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnvelopeKind {
    /// Bare `{columns, rows}` object.
    Canonical,
    /// Wrapped with [`RENDER_ACTION`] from [`ORIGINATOR`].
    WrappedCurrent,
    /// Wrapped with [`DROPDOWN_ACTION`] from [`ORIGINATOR`].
    WrappedDropdown,
    /// Older wrapper recognized only by its `payload` field.
    LegacyWrapped,
    /// None of the known shapes matched.
    Unrecognized,
}

impl EnvelopeKind {
    /// Stable lowercase name, for logs and diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Canonical => "canonical",
            Self::WrappedCurrent => "wrapped_current",
            Self::WrappedDropdown => "wrapped_dropdown",
            Self::LegacyWrapped => "legacy_wrapped",
            Self::Unrecognized => "unrecognized",
        }
    }
}

/// One inbound message, sorted into the shape it arrived in.
///
/// Every variant carries the candidate payload extracted from the message;
/// for [`Envelope::Unrecognized`] that is the original message itself, which
/// lets validation report on exactly what arrived.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    /// The message already was the candidate payload.
    Canonical(Value),
    /// Unwrapped from the current wrapped form.
    WrappedCurrent(Value),
    /// Unwrapped from the dropdown wrapped form.
    WrappedDropdown(Value),
    /// Unwrapped from the legacy `payload` wrapper.
    LegacyWrapped(Value),
    /// Unknown shape, passed through untouched.
    Unrecognized(Value),
}

impl Envelope {
    /// Sort one inbound message into its envelope shape.
    ///
    /// Wrapped forms require both the matching action tag and the
    /// [`ORIGINATOR`] source; a wrapped envelope without a `payload` field
    /// yields `Value::Null` as its candidate. A message carrying both
    /// top-level `columns`/`rows` and a `payload` field is canonical, the
    /// wrapper checks having already failed by then.
    #[must_use]
    pub fn decode(message: Value) -> Self {
        let mut object = match message {
            Value::Object(object) => object,
            other => return Self::Unrecognized(other),
        };

        let (current, dropdown) = {
            let from_originator =
                object.get("source").and_then(Value::as_str) == Some(ORIGINATOR);
            let action = object.get("type").and_then(Value::as_str);
            (
                from_originator && action == Some(RENDER_ACTION),
                from_originator && action == Some(DROPDOWN_ACTION),
            )
        };
        if current || dropdown {
            let payload = object.remove("payload").unwrap_or(Value::Null);
            return if current {
                Self::WrappedCurrent(payload)
            } else {
                Self::WrappedDropdown(payload)
            };
        }

        if object.contains_key("columns") && object.contains_key("rows") {
            return Self::Canonical(Value::Object(object));
        }

        if let Some(payload) = object.remove("payload") {
            return Self::LegacyWrapped(payload);
        }

        Self::Unrecognized(Value::Object(object))
    }

    /// The shape this envelope was recognized as.
    #[must_use]
    pub const fn kind(&self) -> EnvelopeKind {
        match self {
            Self::Canonical(_) => EnvelopeKind::Canonical,
            Self::WrappedCurrent(_) => EnvelopeKind::WrappedCurrent,
            Self::WrappedDropdown(_) => EnvelopeKind::WrappedDropdown,
            Self::LegacyWrapped(_) => EnvelopeKind::LegacyWrapped,
            Self::Unrecognized(_) => EnvelopeKind::Unrecognized,
        }
    }

    /// Borrow the candidate payload.
    #[must_use]
    pub const fn candidate(&self) -> &Value {
        match self {
            Self::Canonical(value)
            | Self::WrappedCurrent(value)
            | Self::WrappedDropdown(value)
            | Self::LegacyWrapped(value)
            | Self::Unrecognized(value) => value,
        }
    }

    /// Take the candidate payload out of the envelope.
    #[must_use]
    pub fn into_candidate(self) -> Value {
        match self {
            Self::Canonical(value)
            | Self::WrappedCurrent(value)
            | Self::WrappedDropdown(value)
            | Self::LegacyWrapped(value)
            | Self::Unrecognized(value) => value,
        }
    }
}

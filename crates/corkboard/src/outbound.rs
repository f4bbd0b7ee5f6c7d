//! Outbound trace requests and the channel that carries them to the host.

use serde::{Deserialize, Serialize};

/// `type` tag every outbound user message carries.
pub const USER_MESSAGE_TYPE: &str = "ui_component_user_message";

/// Instruction sent alongside the full row in the machine-oriented half of
/// a trace request.
pub const TRACE_INSTRUCTION: &str =
    "Trace the source of this record and summarize where each field value came from.";

/// A trace request, addressed to the hosting context.
///
/// Wire shape:
/// `{"type": "ui_component_user_message", "message": "...", "llmMessage": "..."}`.
/// `message` is the human-readable row summary; `llm_message` is a
/// serialized JSON document carrying the full row plus
/// [`TRACE_INSTRUCTION`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserMessage {
    /// Always [`USER_MESSAGE_TYPE`].
    #[serde(rename = "type")]
    pub message_type: String,
    /// Human-readable summary of the selected row.
    pub message: String,
    /// Serialized machine payload.
    #[serde(rename = "llmMessage")]
    pub llm_message: String,
}

impl UserMessage {
    /// Build a trace request from its two halves.
    #[must_use]
    pub fn new(message: impl Into<String>, llm_message: impl Into<String>) -> Self {
        Self {
            message_type: USER_MESSAGE_TYPE.to_owned(),
            message: message.into(),
            llm_message: llm_message.into(),
        }
    }
}

/// Transport seam between the engine and whatever embeds it.
///
/// Implementations deliver to the hosting context; when the host origin is
/// determinable, delivery should be restricted to it, otherwise broadcast.
/// The engine never observes delivery failures.
pub trait OutboundChannel {
    /// Deliver one message to the host.
    fn send(&self, message: &UserMessage);
}

/// Channel with no host attached: messages are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullChannel;

impl OutboundChannel for NullChannel {
    fn send(&self, _message: &UserMessage) {}
}

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::kernel::{DialogAction, RawSlotValue};

/// `{ value: {...} }` wrapper Lex puts around every slot. Unknown keys
/// (`shape`, `values`) are carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlotEnvelope {
    #[serde(default)]
    pub value: Option<RawSlotValue>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentFrame {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub slots: BTreeMap<String, Option<SlotEnvelope>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl IntentFrame {
    /// Interpreted value, else original; empty strings count as missing.
    pub fn slot_value(&self, name: &str) -> Option<&str> {
        let value = self.slots.get(name)?.as_ref()?.value.as_ref()?;
        value
            .interpreted_value
            .as_deref()
            .filter(|v| !v.is_empty())
            .or_else(|| value.original_value.as_deref().filter(|v| !v.is_empty()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    #[serde(default)]
    pub intent: IntentFrame,
    #[serde(default)]
    pub session_attributes: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dialog_action: Option<DialogAction>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Code-hook invocation event. Only `sessionState` is interpreted; the rest
/// (`inputTranscript`, `invocationSource`, `bot`, ...) lands in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FulfillmentEvent {
    #[serde(default)]
    pub session_state: SessionState,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LexMessage {
    pub content_type: String,
    pub content: String,
}

impl LexMessage {
    pub fn plain(content: String) -> Self {
        Self {
            content_type: "PlainText".to_string(),
            content,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FulfillmentResponse {
    pub session_state: SessionState,
    pub messages: Vec<LexMessage>,
}

/// Snapshot of the last reservation, kept JSON-encoded in session attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationRecord {
    pub reservation_id: String,
    pub branch: Option<String>,
    pub course: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
}

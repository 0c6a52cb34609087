use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use super::error::FormatError;

/// Directive type emitted by the recognizer for the next conversation step.
///
/// The set is open upstream: anything outside the three known tags is kept
/// verbatim in `Other` so it can be surfaced for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DialogActionType {
    ElicitSlot,
    ConfirmIntent,
    Close,
    Other(String),
}

impl DialogActionType {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "ElicitSlot" => Self::ElicitSlot,
            "ConfirmIntent" => Self::ConfirmIntent,
            "Close" => Self::Close,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_tag(&self) -> &str {
        match self {
            Self::ElicitSlot => "ElicitSlot",
            Self::ConfirmIntent => "ConfirmIntent",
            Self::Close => "Close",
            Self::Other(tag) => tag,
        }
    }
}

impl From<String> for DialogActionType {
    fn from(tag: String) -> Self {
        Self::from_tag(&tag)
    }
}

impl From<DialogActionType> for String {
    fn from(kind: DialogActionType) -> Self {
        kind.as_tag().to_string()
    }
}

/// Tag used when the recognizer omits the dialog action type entirely.
pub const UNKNOWN_ACTION_TAG: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogAction {
    #[serde(rename = "type")]
    pub kind: DialogActionType,
    #[serde(default)]
    pub slot_to_elicit: Option<String>,
}

impl DialogAction {
    pub fn new(kind: DialogActionType) -> Self {
        Self { kind, slot_to_elicit: None }
    }

    pub fn elicit(slot: &str) -> Self {
        Self {
            kind: DialogActionType::ElicitSlot,
            slot_to_elicit: Some(slot.to_string()),
        }
    }
}

/// One recognized slot value in its three upstream forms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSlotValue {
    #[serde(default)]
    pub original_value: Option<String>,
    #[serde(default)]
    pub interpreted_value: Option<String>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub resolved_values: Vec<String>,
}

/// Slot name -> value, `None` when the slot is declared but not yet filled.
pub type RawSlots = HashMap<String, Option<RawSlotValue>>;

/// One recognition turn as delivered by the NLU runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecognitionResult {
    #[serde(default)]
    pub intent_name: Option<String>,
    #[serde(default)]
    pub intent_state: Option<String>,
    pub dialog_action: DialogAction,
    #[serde(default)]
    pub slots: RawSlots,
    #[serde(default)]
    pub messages: Vec<String>,
}

impl RawRecognitionResult {
    /// Reads a Lex V2 RecognizeText response body.
    ///
    /// Only `sessionState.intent.slots` can make this fail, and only when it is
    /// present but not an object.
    pub fn from_lex(raw: &Value) -> Result<Self, FormatError> {
        let session_state = raw.get("sessionState");
        let intent = session_state.and_then(|s| s.get("intent"));
        let action = session_state.and_then(|s| s.get("dialogAction"));

        let kind = action
            .and_then(|a| a.get("type"))
            .and_then(Value::as_str)
            .map(DialogActionType::from_tag)
            .unwrap_or_else(|| DialogActionType::Other(UNKNOWN_ACTION_TAG.to_string()));

        let slots = match intent.and_then(|i| i.get("slots")) {
            Some(value) => raw_slots_from_value(value)?,
            None => RawSlots::new(),
        };

        Ok(Self {
            intent_name: string_at(intent, "name"),
            intent_state: string_at(intent, "state"),
            dialog_action: DialogAction {
                kind,
                slot_to_elicit: string_at(action, "slotToElicit"),
            },
            slots,
            messages: text_messages(raw),
        })
    }
}

/// Converts an untyped Lex slot map into typed raw slots.
///
/// Each entry is either null or `{ value: { originalValue, interpretedValue,
/// resolvedValues } }`; anything else about an entry counts as "not filled".
pub fn raw_slots_from_value(value: &Value) -> Result<RawSlots, FormatError> {
    let map = match value {
        Value::Null => return Ok(RawSlots::new()),
        Value::Object(map) => map,
        other => {
            return Err(FormatError::InvalidInput(format!(
                "slots must be an object, got {}",
                json_kind(other)
            )))
        }
    };

    let slots = map
        .iter()
        .map(|(name, entry)| {
            let value = entry
                .get("value")
                .filter(|v| v.is_object())
                .map(|v| RawSlotValue {
                    original_value: v.get("originalValue").and_then(Value::as_str).map(str::to_string),
                    interpreted_value: v
                        .get("interpretedValue")
                        .and_then(Value::as_str)
                        .map(str::to_string),
                    resolved_values: v
                        .get("resolvedValues")
                        .map(strings_of)
                        .unwrap_or_default(),
                });
            (name.clone(), value)
        })
        .collect();

    Ok(slots)
}

/// Plain-text message contents, trimmed, empties dropped.
pub fn text_messages(raw: &Value) -> Vec<String> {
    raw.get("messages")
        .and_then(Value::as_array)
        .map(|msgs| {
            msgs.iter()
                .filter_map(|m| m.get("content").and_then(Value::as_str))
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn string_at(parent: Option<&Value>, key: &str) -> Option<String> {
    parent
        .and_then(|p| p.get(key))
        .and_then(Value::as_str)
        .map(str::to_string)
}

// Non-arrays count as empty; non-string elements are skipped.
fn strings_of(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

fn lenient_strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(strings_of(&value))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::catalog::SlotCatalog;
use super::error::FormatError;
use super::recognition::RawRecognitionResult;
use super::slots::{normalize, NormalizedSlots};
use super::summary::{project, SummaryItem};
use super::ui::{map_ui, UiDirective};

/// Combined per-turn response sent to the chat client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub session_id: String,
    pub intent: Option<String>,
    pub state: Option<String>,
    pub ui: UiDirective,
    pub messages: Vec<String>,
    pub slots: NormalizedSlots,
    pub summary: Vec<SummaryItem>,
    /// Engine that produced the turn, set for on-prem engines only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine: Option<String>,
    /// Trimmed echo of the upstream payload for debugging in the client.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<Value>,
}

/// PURE FUNCTION: one recognition turn -> combined response.
pub fn format_response(
    catalog: &SlotCatalog,
    session_id: &str,
    result: &RawRecognitionResult,
) -> ChatResponse {
    let slots = normalize(&result.slots);
    let ui = map_ui(catalog, &result.dialog_action, &result.messages);
    let summary = project(catalog, &slots);

    ChatResponse {
        session_id: session_id.to_string(),
        intent: result.intent_name.clone(),
        state: result.intent_state.clone(),
        ui,
        messages: result.messages.clone(),
        slots,
        summary,
        engine: None,
        raw: None,
    }
}

/// Formats a Lex V2 RecognizeText body and attaches the debug echo.
pub fn format_lex_response(
    catalog: &SlotCatalog,
    session_id: &str,
    raw: &Value,
) -> Result<ChatResponse, FormatError> {
    let result = RawRecognitionResult::from_lex(raw)?;
    let mut response = format_response(catalog, session_id, &result);
    response.raw = Some(raw_lite(raw));
    Ok(response)
}

/// Wraps a free-text answer from a non-Lex engine into the same shape.
pub fn engine_response(session_id: &str, engine: &str, answer: &str) -> ChatResponse {
    ChatResponse {
        session_id: session_id.to_string(),
        intent: Some("OnPremChat".to_string()),
        state: Some("Fulfilled".to_string()),
        ui: UiDirective::Message {
            prompt: Some(answer.to_string()),
            original_tag: engine.to_string(),
        },
        messages: vec![answer.to_string()],
        slots: NormalizedSlots::new(),
        summary: Vec::new(),
        engine: Some(engine.to_string()),
        raw: None,
    }
}

fn raw_lite(raw: &Value) -> Value {
    let interpretations = raw
        .get("interpretations")
        .and_then(Value::as_array)
        .map(|items| Value::Array(items.iter().take(2).cloned().collect()))
        .unwrap_or(Value::Null);

    json!({
        "sessionId": raw.get("sessionId").cloned().unwrap_or(Value::Null),
        "messages": raw.get("messages").cloned().unwrap_or(Value::Null),
        "sessionState": raw.get("sessionState").cloned().unwrap_or(Value::Null),
        "interpretations": interpretations,
        "metadata": raw.get("$metadata").cloned().unwrap_or(Value::Null),
    })
}

use serde::{Deserialize, Serialize};

use super::catalog::SlotCatalog;
use super::recognition::{DialogAction, DialogActionType};

/// What the client should render as the input affordance for the next turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum UiDirective {
    ElicitSlot {
        slot_name: Option<String>,
        slot_label: Option<String>,
        prompt: String,
        placeholder: String,
        /// Left empty here; the suggestion provider fills it before sending.
        quick_replies: Vec<String>,
    },
    ConfirmIntent {
        prompt: String,
        quick_replies: Vec<String>,
    },
    Close {
        prompt: String,
    },
    /// Catch-all for any dialog action outside the known set.
    Message {
        prompt: Option<String>,
        original_tag: String,
    },
}

impl UiDirective {
    pub fn mode(&self) -> &'static str {
        match self {
            Self::ElicitSlot { .. } => "elicit_slot",
            Self::ConfirmIntent { .. } => "confirm_intent",
            Self::Close { .. } => "close",
            Self::Message { .. } => "message",
        }
    }

    pub fn prompt(&self) -> Option<&str> {
        match self {
            Self::ElicitSlot { prompt, .. }
            | Self::ConfirmIntent { prompt, .. }
            | Self::Close { prompt } => Some(prompt.as_str()),
            Self::Message { prompt, .. } => prompt.as_deref(),
        }
    }

    pub fn quick_replies(&self) -> &[String] {
        match self {
            Self::ElicitSlot { quick_replies, .. } | Self::ConfirmIntent { quick_replies, .. } => {
                quick_replies.as_slice()
            }
            _ => &[],
        }
    }

    /// Slot being elicited, if this is an ElicitSlot directive.
    pub fn elicited_slot(&self) -> Option<&str> {
        match self {
            Self::ElicitSlot { slot_name, .. } => slot_name.as_deref(),
            _ => None,
        }
    }

    /// Replaces the quick replies of an ElicitSlot directive. No-op otherwise.
    pub fn fill_quick_replies(&mut self, replies: Vec<String>) {
        if let Self::ElicitSlot { quick_replies, .. } = self {
            *quick_replies = replies;
        }
    }
}

/// Maps a dialog action and the turn's messages to a UI directive.
///
/// Total over every action type, unknown tags included.
pub fn map_ui(catalog: &SlotCatalog, action: &DialogAction, messages: &[String]) -> UiDirective {
    let first = messages.first().cloned();
    let prompts = catalog.prompts();

    match &action.kind {
        DialogActionType::ElicitSlot => {
            let slot = action.slot_to_elicit.as_deref();
            UiDirective::ElicitSlot {
                slot_name: slot.map(str::to_string),
                slot_label: slot.map(|s| catalog.label(s).to_string()),
                prompt: first.unwrap_or_else(|| prompts.elicit.clone()),
                placeholder: match slot {
                    Some(s) => catalog.placeholder(s).to_string(),
                    None => prompts.placeholder.clone(),
                },
                quick_replies: Vec::new(),
            }
        }
        DialogActionType::ConfirmIntent => UiDirective::ConfirmIntent {
            prompt: first.unwrap_or_else(|| prompts.confirm.clone()),
            quick_replies: prompts.confirm_replies.to_vec(),
        },
        DialogActionType::Close => UiDirective::Close {
            prompt: first.unwrap_or_else(|| prompts.close.clone()),
        },
        DialogActionType::Other(tag) => UiDirective::Message {
            prompt: first,
            original_tag: tag.clone(),
        },
    }
}

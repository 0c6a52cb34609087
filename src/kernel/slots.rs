use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::error::FormatError;
use super::recognition::{raw_slots_from_value, RawSlots};

/// Canonical per-slot record. An unfilled slot has every field empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedSlot {
    pub original: Option<String>,
    pub interpreted: Option<String>,
    pub resolved: Vec<String>,
}

impl NormalizedSlot {
    pub fn is_empty(&self) -> bool {
        self.original.is_none() && self.interpreted.is_none() && self.resolved.is_empty()
    }

    /// Display value: interpreted, then original. Empty strings count as absent.
    pub fn display_value(&self) -> Option<&str> {
        self.interpreted
            .as_deref()
            .filter(|v| !v.is_empty())
            .or_else(|| self.original.as_deref().filter(|v| !v.is_empty()))
    }
}

/// Slot name -> normalized record. Ordered so serialized output is stable.
pub type NormalizedSlots = BTreeMap<String, NormalizedSlot>;

/// Normalizes a typed raw slot map. Every key survives; nothing is invented.
pub fn normalize(raw: &RawSlots) -> NormalizedSlots {
    raw.iter()
        .map(|(name, value)| {
            let slot = match value {
                Some(v) => NormalizedSlot {
                    original: v.original_value.clone(),
                    interpreted: v.interpreted_value.clone(),
                    resolved: v.resolved_values.clone(),
                },
                None => NormalizedSlot::default(),
            };
            (name.clone(), slot)
        })
        .collect()
}

/// Normalizes an untyped slot payload; fails only when it is not a mapping.
pub fn normalize_value(raw: &Value) -> Result<NormalizedSlots, FormatError> {
    raw_slots_from_value(raw).map(|slots| normalize(&slots))
}

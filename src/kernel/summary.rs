use serde::{Deserialize, Serialize};

use super::catalog::SlotCatalog;
use super::slots::NormalizedSlots;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryItem {
    pub key: String,
    pub label: String,
    pub value: Option<String>,
}

/// Projects slots onto the catalog's summary order.
///
/// Always one item per declared key, in declaration order, so the side panel
/// keeps its layout across turns. Slots the catalog does not declare are not
/// shown.
pub fn project(catalog: &SlotCatalog, slots: &NormalizedSlots) -> Vec<SummaryItem> {
    catalog
        .summary_order()
        .iter()
        .map(|key| SummaryItem {
            key: key.clone(),
            label: catalog.label(key).to_string(),
            value: slots
                .get(key)
                .and_then(|slot| slot.display_value())
                .map(str::to_string),
        })
        .collect()
}

/// Number of declared keys that currently hold a value.
pub fn filled_count(summary: &[SummaryItem]) -> usize {
    summary.iter().filter(|item| item.value.is_some()).count()
}

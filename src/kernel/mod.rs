//! Response normalization kernel.
//!
//! Turns one raw recognition result into the client-facing turn: normalized
//! slots, a UI directive and a fixed-layout summary.
//!
//! # INVARIANT
//! Everything in here is a pure function of its inputs. No I/O, no clock, no
//! randomness, no logging. Callers may run it concurrently per chat turn.

pub mod catalog;
pub mod error;
pub mod formatter;
pub mod recognition;
pub mod slots;
pub mod summary;
pub mod ui;

pub use catalog::{FallbackPrompts, SlotCatalog};
pub use error::FormatError;
pub use formatter::{engine_response, format_lex_response, format_response, ChatResponse};
pub use recognition::{DialogAction, DialogActionType, RawRecognitionResult, RawSlotValue, RawSlots};
pub use slots::{normalize, normalize_value, NormalizedSlot, NormalizedSlots};
pub use summary::{project, SummaryItem};
pub use ui::{map_ui, UiDirective};

//! Reservation fulfillment code hook for the Lex bot.
//!
//! Stateless apart from Lex session attributes: a reservation made in a session
//! can be checked or cancelled later in the same session, nothing else.

pub mod handler;
pub mod types;

pub use handler::{fulfill, reservation_id};
pub use types::{FulfillmentEvent, FulfillmentResponse, IntentFrame, LexMessage, ReservationRecord, SessionState, SlotEnvelope};

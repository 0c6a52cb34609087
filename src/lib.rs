pub mod config;
pub mod fulfillment;
pub mod kernel;
pub mod server;
pub mod services;

// Re-export specific items for convenient access
pub use config::AppConfig;
pub use kernel::{format_lex_response, format_response, ChatResponse, SlotCatalog, UiDirective};

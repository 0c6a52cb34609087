pub mod models;
pub mod runtime;

use async_trait::async_trait;
use serde_json::Value;

use crate::services::error::ServiceError;

pub use models::LexModelsClient;
pub use runtime::LexRuntimeClient;

/// Signing name shared by the Lex runtime and models APIs.
pub const LEX_SERVICE: &str = "lex";

/// Source of raw recognition payloads, one call per chat turn.
///
/// Implementations return the upstream RecognizeText body untouched; the
/// kernel does all interpretation.
#[async_trait]
pub trait Recognizer: Send + Sync {
    async fn recognize(&self, text: &str, session_id: &str) -> Result<Value, ServiceError>;
}

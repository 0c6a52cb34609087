//! I/O collaborators around the kernel: AWS signing, the Lex runtime and
//! models APIs, quick-reply suggestions and on-prem LLM engines.

pub mod aws;
pub mod error;
pub mod lex;
pub mod llm;
pub mod suggestions;

pub use error::ServiceError;

use thiserror::Error;

/// The only failure the normalization kernel can produce.
///
/// Missing or null fields are valid absent states and never end up here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

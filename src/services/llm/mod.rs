pub mod client;

pub use client::{enabled_engines, EngineInfo, OnPremClient, AWS_LEX, OLLAMA, OPENAI_COMPATIBLE};

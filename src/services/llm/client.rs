use anyhow::{anyhow, bail, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::EngineSettings;

pub const AWS_LEX: &str = "aws-lex";
pub const OLLAMA: &str = "ollama";
pub const OPENAI_COMPATIBLE: &str = "openai-compatible";

const SYSTEM_PROMPT: &str = "당신은 사내 업무용 챗봇입니다. 간결하고 정확하게 답하세요.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineInfo {
    pub key: &'static str,
    pub label: &'static str,
    pub deployment: &'static str,
    pub description: &'static str,
}

pub const ENGINE_CATALOG: [EngineInfo; 3] = [
    EngineInfo {
        key: AWS_LEX,
        label: "AWS Lex (Managed)",
        deployment: "aws",
        description: "기존 Amazon Lex V2 런타임",
    },
    EngineInfo {
        key: OLLAMA,
        label: "Ollama (Docker On-Prem)",
        deployment: "onprem",
        description: "사내 서버 Docker의 Ollama REST API",
    },
    EngineInfo {
        key: OPENAI_COMPATIBLE,
        label: "OpenAI-Compatible (vLLM/TGI)",
        deployment: "onprem",
        description: "사내 OpenAI 호환 엔드포인트(vLLM/TGI 등)",
    },
];

/// Catalog entries named in `enabled`, in the configured order. Unknown keys are skipped.
pub fn enabled_engines(enabled: &[String]) -> Vec<EngineInfo> {
    enabled
        .iter()
        .filter_map(|key| ENGINE_CATALOG.iter().find(|e| e.key == key.as_str()))
        .cloned()
        .collect()
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Free-text chat against self-hosted LLM servers.
#[derive(Clone)]
pub struct OnPremClient {
    client: Client,
    settings: EngineSettings,
}

impl OnPremClient {
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(60))
                .build()
                .unwrap_or_default(),
            settings,
        }
    }

    pub fn is_enabled(&self, engine: &str) -> bool {
        self.settings.enabled.iter().any(|e| e == engine)
    }

    pub fn engines(&self) -> Vec<EngineInfo> {
        enabled_engines(&self.settings.enabled)
    }

    pub async fn chat(&self, engine: &str, text: &str) -> Result<String> {
        match engine {
            OLLAMA => self.chat_ollama(text).await,
            OPENAI_COMPATIBLE => self.chat_openai_compatible(text).await,
            other => Err(anyhow!("Unsupported engine: {}", other)),
        }
    }

    async fn chat_ollama(&self, text: &str) -> Result<String> {
        let url = format!("{}/api/generate", self.settings.ollama_base_url.trim_end_matches('/'));
        let request_body = GenerateRequest {
            model: &self.settings.ollama_model,
            prompt: text,
            stream: false, // One-shot only
        };

        let response = self.client.post(url).json(&request_body).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("ollama error ({}): {}", status.as_u16(), body);
        }

        let resp_json: GenerateResponse = response.json().await?;
        Ok(resp_json.response.trim().to_string())
    }

    async fn chat_openai_compatible(&self, text: &str) -> Result<String> {
        let base_url = self
            .settings
            .openai_base_url
            .as_deref()
            .ok_or_else(|| anyhow!("OPENAI_COMPAT_BASE_URL is required for openai-compatible engine"))?;
        let url = format!("{}/v1/chat/completions", base_url.trim_end_matches('/'));

        let request_body = ChatCompletionRequest {
            model: &self.settings.openai_model,
            messages: vec![
                ChatMessage { role: "system", content: SYSTEM_PROMPT },
                ChatMessage { role: "user", content: text },
            ],
            temperature: 0.2,
        };

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.settings.openai_api_key)
            .json(&request_body)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("openai-compatible error ({}): {}", status.as_u16(), body);
        }

        let resp_json: ChatCompletionResponse = response.json().await?;
        Ok(resp_json
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default()
            .trim()
            .to_string())
    }
}

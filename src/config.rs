use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_LOCALE_ID: &str = "ko_KR";
pub const DEFAULT_MODEL_BOT_VERSION: &str = "DRAFT";
pub const DEFAULT_ENGINES: &str = "aws-lex,ollama,openai-compatible";

/// Lex bot coordinates. Everything optional except the locale so the server
/// can still start (and serve on-prem engines) without a bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexSettings {
    pub region: Option<String>,
    pub bot_id: Option<String>,
    pub bot_alias_id: Option<String>,
    pub locale_id: String,
    pub model_bot_version: String,
    pub runtime_endpoint: Option<String>,
    pub models_endpoint: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionSettings {
    pub branch_values: Vec<String>,
    pub course_values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    pub enabled: Vec<String>,
    pub ollama_base_url: String,
    pub ollama_model: String,
    pub openai_base_url: Option<String>,
    pub openai_model: String,
    pub openai_api_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    pub static_dir: PathBuf,
    pub lex: LexSettings,
    pub suggestions: SuggestionSettings,
    pub engines: EngineSettings,
}

impl AppConfig {
    /// Reads the process environment. Call `dotenvy::dotenv()` first if a
    /// `.env` file should be honoured.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Self {
            port: get("PORT")
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(DEFAULT_PORT),
            static_dir: PathBuf::from(get("STATIC_DIR").unwrap_or_else(|| "public".to_string())),
            lex: LexSettings {
                region: get("AWS_REGION"),
                bot_id: get("LEX_BOT_ID"),
                bot_alias_id: get("LEX_BOT_ALIAS_ID"),
                locale_id: get("LEX_LOCALE_ID").unwrap_or_else(|| DEFAULT_LOCALE_ID.to_string()),
                model_bot_version: get("LEX_MODEL_BOT_VERSION")
                    .unwrap_or_else(|| DEFAULT_MODEL_BOT_VERSION.to_string()),
                runtime_endpoint: get("LEX_RUNTIME_ENDPOINT"),
                models_endpoint: get("LEX_MODELS_ENDPOINT"),
            },
            suggestions: SuggestionSettings {
                branch_values: parse_csv(get("BRANCH_VALUES").as_deref()),
                course_values: parse_csv(get("COURSE_VALUES").as_deref()),
            },
            engines: EngineSettings {
                enabled: parse_csv(Some(
                    get("ENABLED_AI_ENGINES")
                        .as_deref()
                        .unwrap_or(DEFAULT_ENGINES),
                )),
                ollama_base_url: get("OLLAMA_BASE_URL")
                    .unwrap_or_else(|| "http://localhost:11434".to_string()),
                ollama_model: get("OLLAMA_MODEL").unwrap_or_else(|| "llama3.1:8b".to_string()),
                openai_base_url: get("OPENAI_COMPAT_BASE_URL"),
                openai_model: get("OPENAI_COMPAT_MODEL")
                    .unwrap_or_else(|| "qwen2.5-7b-instruct".to_string()),
                openai_api_key: get("OPENAI_COMPAT_API_KEY").unwrap_or_else(|| "dummy".to_string()),
            },
        }
    }
}

/// Splits a comma-separated list, trimming entries and dropping empties.
pub fn parse_csv(raw: Option<&str>) -> Vec<String> {
    raw.map(|v| {
        v.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

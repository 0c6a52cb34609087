use async_trait::async_trait;
use reqwest::{Client, Method, Url};
use serde_json::{json, Value};
use tracing::info;

use super::{Recognizer, LEX_SERVICE};
use crate::config::LexSettings;
use crate::services::aws::{endpoint_url, AwsClient, Credentials};
use crate::services::error::ServiceError;

/// RecognizeText client for one bot alias and locale.
#[derive(Clone)]
pub struct LexRuntimeClient {
    aws: AwsClient,
    endpoint: String,
    bot_id: String,
    bot_alias_id: String,
    locale_id: String,
}

impl LexRuntimeClient {
    pub fn from_settings(
        settings: &LexSettings,
        http: Client,
        credentials: Credentials,
    ) -> Result<Self, ServiceError> {
        let region = settings
            .region
            .as_deref()
            .ok_or(ServiceError::MissingConfig("AWS_REGION"))?;
        let bot_id = settings
            .bot_id
            .clone()
            .ok_or(ServiceError::MissingConfig("LEX_BOT_ID"))?;
        let bot_alias_id = settings
            .bot_alias_id
            .clone()
            .ok_or(ServiceError::MissingConfig("LEX_BOT_ALIAS_ID"))?;

        Ok(Self {
            aws: AwsClient::new(http, credentials, region),
            endpoint: settings
                .runtime_endpoint
                .clone()
                .unwrap_or_else(|| format!("https://runtime-v2-lex.{}.amazonaws.com", region)),
            bot_id,
            bot_alias_id,
            locale_id: settings.locale_id.clone(),
        })
    }

    pub fn request_url(&self, session_id: &str) -> Result<Url, ServiceError> {
        endpoint_url(
            &self.endpoint,
            &[
                "bots",
                &self.bot_id,
                "botAliases",
                &self.bot_alias_id,
                "botLocales",
                &self.locale_id,
                "sessions",
                session_id,
                "text",
            ],
        )
    }
}

#[async_trait]
impl Recognizer for LexRuntimeClient {
    async fn recognize(&self, text: &str, session_id: &str) -> Result<Value, ServiceError> {
        let url = self.request_url(session_id)?;
        info!("RecognizeText session={} locale={}", session_id, self.locale_id);
        self.aws
            .send_json(LEX_SERVICE, Method::POST, url, Some(&json!({ "text": text })))
            .await
    }
}

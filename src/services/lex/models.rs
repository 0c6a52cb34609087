use reqwest::{Client, Method, Url};
use serde_json::{json, Value};

use super::LEX_SERVICE;
use crate::config::LexSettings;
use crate::services::aws::{endpoint_url, AwsClient, Credentials};
use crate::services::error::ServiceError;

/// Read-only view of a bot's slot types through the Lex models API.
#[derive(Clone)]
pub struct LexModelsClient {
    aws: AwsClient,
    endpoint: String,
    bot_id: String,
    bot_version: String,
    locale_id: String,
}

impl LexModelsClient {
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

        Ok(Self {
            aws: AwsClient::new(http, credentials, region),
            endpoint: settings
                .models_endpoint
                .clone()
                .unwrap_or_else(|| format!("https://models-v2-lex.{}.amazonaws.com", region)),
            bot_id,
            bot_version: settings.model_bot_version.clone(),
            locale_id: settings.locale_id.clone(),
        })
    }

    /// Cache identity of one slot type on this bot version and locale.
    pub fn cache_key(&self, slot_type_name: &str) -> String {
        format!(
            "{}:{}:{}:{}:{}",
            self.aws.region(),
            self.bot_id,
            self.bot_version,
            self.locale_id,
            slot_type_name
        )
    }

    /// Sample values of the named slot type, de-duplicated, in declaration
    /// order. Unknown slot type -> empty list.
    pub async fn slot_type_values(&self, slot_type_name: &str) -> Result<Vec<String>, ServiceError> {
        let listed = self
            .aws
            .send_json(
                LEX_SERVICE,
                Method::POST,
                self.slot_types_url(None)?,
                Some(&json!({ "maxResults": 100 })),
            )
            .await?;

        let slot_type_id = listed
            .get("slotTypeSummaries")
            .and_then(Value::as_array)
            .and_then(|summaries| {
                summaries
                    .iter()
                    .find(|s| s.get("slotTypeName").and_then(Value::as_str) == Some(slot_type_name))
            })
            .and_then(|s| s.get("slotTypeId"))
            .and_then(Value::as_str);

        let Some(slot_type_id) = slot_type_id else {
            return Ok(Vec::new());
        };

        let described = self
            .aws
            .send_json(LEX_SERVICE, Method::GET, self.slot_types_url(Some(slot_type_id))?, None)
            .await?;

        Ok(sample_values(&described))
    }

    fn slot_types_url(&self, slot_type_id: Option<&str>) -> Result<Url, ServiceError> {
        let mut segments = vec![
            "bots",
            self.bot_id.as_str(),
            "botversions",
            self.bot_version.as_str(),
            "botlocales",
            self.locale_id.as_str(),
            "slottypes",
        ];
        if let Some(id) = slot_type_id {
            segments.push(id);
        }
        // The models API routes end in a slash.
        segments.push("");
        endpoint_url(&self.endpoint, &segments)
    }
}

/// Extracts `slotTypeValues[].sampleValue.value`, keeping first occurrences.
pub fn sample_values(described: &Value) -> Vec<String> {
    let mut values: Vec<String> = Vec::new();
    let samples = described
        .get("slotTypeValues")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|v| v.get("sampleValue")?.get("value")?.as_str())
        .filter(|s| !s.is_empty());

    for sample in samples {
        if !values.iter().any(|v| v == sample) {
            values.push(sample.to_string());
        }
    }
    values
}

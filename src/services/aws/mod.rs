//! Minimal signed JSON transport for the AWS APIs the chat server talks to.

pub mod signer;

use chrono::Utc;
use reqwest::{Client, Method, Url};
use serde_json::Value;
use tracing::debug;

use crate::services::error::ServiceError;
pub use signer::Credentials;

#[derive(Clone)]
pub struct AwsClient {
    http: Client,
    credentials: Credentials,
    region: String,
}

impl AwsClient {
    pub fn new(http: Client, credentials: Credentials, region: &str) -> Self {
        Self {
            http,
            credentials,
            region: region.to_string(),
        }
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// Sends a SigV4-signed request and decodes the JSON reply.
    ///
    /// An empty success body decodes to `Value::Null`.
    pub async fn send_json(
        &self,
        service: &str,
        method: Method,
        url: Url,
        body: Option<&Value>,
    ) -> Result<Value, ServiceError> {
        let payload = match body {
            Some(b) => serde_json::to_vec(b)?,
            None => Vec::new(),
        };
        let content_type = body.map(|_| "application/json");
        let headers = signer::sign(
            &self.credentials,
            &self.region,
            service,
            &method,
            &url,
            content_type,
            &payload,
            Utc::now(),
        )?;

        debug!("{} {} {}", service, method, url.path());
        let mut request = self.http.request(method, url).headers(headers);
        if body.is_some() {
            request = request.body(payload);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(ServiceError::Upstream {
                status: status.as_u16(),
                body: text,
            });
        }
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}

/// Appends percent-encoded path segments to a base endpoint.
pub fn endpoint_url(base: &str, segments: &[&str]) -> Result<Url, ServiceError> {
    let mut url = Url::parse(base).map_err(|e| ServiceError::InvalidEndpoint(format!("{}: {}", base, e)))?;
    url.path_segments_mut()
        .map_err(|_| ServiceError::InvalidEndpoint(base.to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

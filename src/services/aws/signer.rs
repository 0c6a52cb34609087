use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, Url};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;

use crate::services::error::ServiceError;

// SigV4 constants
pub const ALGORITHM: &str = "AWS4-HMAC-SHA256";
pub const KEY_TYPE: &str = "aws4_request";
pub const AMZ_DATE_HEADER: &str = "x-amz-date";
pub const SECURITY_TOKEN_HEADER: &str = "x-amz-security-token";
pub const DATE_TIME_FORMAT: &str = "%Y%m%dT%H%M%SZ";

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("session_token", &self.session_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Credentials {
    pub fn new(access_key_id: &str, secret_access_key: &str) -> Self {
        Self {
            access_key_id: access_key_id.to_string(),
            secret_access_key: secret_access_key.to_string(),
            session_token: None,
        }
    }

    /// Static credentials from the standard AWS environment variables.
    pub fn from_env() -> Result<Self, ServiceError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ServiceError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Ok(Self {
            access_key_id: get("AWS_ACCESS_KEY_ID").ok_or(ServiceError::MissingConfig("AWS_ACCESS_KEY_ID"))?,
            secret_access_key: get("AWS_SECRET_ACCESS_KEY")
                .ok_or(ServiceError::MissingConfig("AWS_SECRET_ACCESS_KEY"))?,
            session_token: get("AWS_SESSION_TOKEN"),
        })
    }
}

/// Signs a request and returns the headers to attach to it.
///
/// Signed headers are `content-type` (when given), `host`, `x-amz-date` and
/// `x-amz-security-token` (when the credentials carry one).
#[allow(clippy::too_many_arguments)]
pub fn sign(
    credentials: &Credentials,
    region: &str,
    service: &str,
    method: &Method,
    url: &Url,
    content_type: Option<&str>,
    payload: &[u8],
    now: DateTime<Utc>,
) -> Result<HeaderMap, ServiceError> {
    let date_time = now.format(DATE_TIME_FORMAT).to_string();
    let host = match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => format!("{}:{}", host, port),
        (Some(host), None) => host.to_string(),
        (None, _) => return Err(ServiceError::Signing(format!("url has no host: {}", url))),
    };

    let mut signed = BTreeMap::new();
    if let Some(ct) = content_type {
        signed.insert(CONTENT_TYPE.as_str().to_string(), ct.to_string());
    }
    signed.insert("host".to_string(), host);
    signed.insert(AMZ_DATE_HEADER.to_string(), date_time.clone());
    if let Some(token) = &credentials.session_token {
        signed.insert(SECURITY_TOKEN_HEADER.to_string(), token.clone());
    }

    let query: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let auth = authorization(
        credentials,
        &date_time,
        region,
        service,
        method.as_str(),
        url.path(),
        &query,
        &signed,
        &hex::encode(sha256(payload)),
    )?;

    // Host is set by the HTTP client from the URL.
    let mut headers = HeaderMap::new();
    for (name, value) in signed.iter().filter(|(name, _)| name.as_str() != "host") {
        headers.insert(header_name(name)?, header_value(value)?);
    }
    headers.insert(AUTHORIZATION, header_value(&auth)?);
    Ok(headers)
}

/// Builds the `Authorization` header value for already-canonicalizable parts.
///
/// `headers` must hold lowercase names; all of them are signed.
#[allow(clippy::too_many_arguments)]
pub fn authorization(
    credentials: &Credentials,
    date_time: &str,
    region: &str,
    service: &str,
    method: &str,
    path: &str,
    query: &[(String, String)],
    headers: &BTreeMap<String, String>,
    payload_hash: &str,
) -> Result<String, ServiceError> {
    let date = date_time.get(0..8).ok_or_else(|| {
        ServiceError::Signing(format!("malformed date-time: {}", date_time))
    })?;
    let scope = format!("{}/{}/{}/{}", date, region, service, KEY_TYPE);
    let signed_headers = headers.keys().cloned().collect::<Vec<_>>().join(";");

    let canonical = canonical_request(method, path, query, headers, payload_hash);
    let to_sign = format!(
        "{}\n{}\n{}\n{}",
        ALGORITHM,
        date_time,
        scope,
        hex::encode(sha256(canonical.as_bytes()))
    );

    let key = derive_signing_key(&credentials.secret_access_key, date, region, service)?;
    let signature = hex::encode(hmac_sign(&key, to_sign.as_bytes())?);

    Ok(format!(
        "{} Credential={}/{}, SignedHeaders={}, Signature={}",
        ALGORITHM, credentials.access_key_id, scope, signed_headers, signature
    ))
}

pub fn canonical_request(
    method: &str,
    path: &str,
    query: &[(String, String)],
    headers: &BTreeMap<String, String>,
    payload_hash: &str,
) -> String {
    let mut pairs: Vec<(String, String)> = query
        .iter()
        .map(|(k, v)| (uri_encode(k), uri_encode(v)))
        .collect();
    pairs.sort();
    let canonical_query = pairs
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    let canonical_headers: String = headers
        .iter()
        .map(|(name, value)| format!("{}:{}\n", name, collapse_whitespace(value)))
        .collect();
    let signed_headers = headers.keys().cloned().collect::<Vec<_>>().join(";");

    format!(
        "{}\n{}\n{}\n{}\n{}\n{}",
        method,
        canonical_path(path),
        canonical_query,
        canonical_headers,
        signed_headers,
        payload_hash
    )
}

pub fn derive_signing_key(
    secret: &str,
    date: &str,
    region: &str,
    service: &str,
) -> Result<Vec<u8>, ServiceError> {
    let k_date = hmac_sign(format!("AWS4{}", secret).as_bytes(), date.as_bytes())?;
    let k_region = hmac_sign(&k_date, region.as_bytes())?;
    let k_service = hmac_sign(&k_region, service.as_bytes())?;
    hmac_sign(&k_service, KEY_TYPE.as_bytes())
}

/// Percent-encodes everything except the RFC 3986 unreserved set.
pub fn uri_encode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

// Non-S3 services want each segment encoded twice; the URL path already
// carries the first pass.
fn canonical_path(path: &str) -> String {
    if path.is_empty() {
        return "/".to_string();
    }
    path.split('/').map(uri_encode).collect::<Vec<_>>().join("/")
}

fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn sha256(data: &[u8]) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().to_vec()
}

fn hmac_sign(key: &[u8], data: &[u8]) -> Result<Vec<u8>, ServiceError> {
    let mut mac = Hmac::<Sha256>::new_from_slice(key)
        .map_err(|e| ServiceError::Signing(e.to_string()))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

fn header_name(name: &str) -> Result<HeaderName, ServiceError> {
    HeaderName::from_bytes(name.as_bytes()).map_err(|e| ServiceError::Signing(e.to_string()))
}

fn header_value(value: &str) -> Result<HeaderValue, ServiceError> {
    HeaderValue::from_str(value).map_err(|e| ServiceError::Signing(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uri_encode_keeps_unreserved() {
        assert_eq!(uri_encode("web-Ab_1.~"), "web-Ab_1.~");
        assert_eq!(uri_encode("a b/c"), "a%20b%2Fc");
    }

    #[test]
    fn test_canonical_path_double_encodes() {
        assert_eq!(canonical_path(""), "/");
        assert_eq!(canonical_path("/"), "/");
        assert_eq!(canonical_path("/bots/a%20b/text"), "/bots/a%2520b/text");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a   b  "), "a b");
    }
}

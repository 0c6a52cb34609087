use axum::http::header::COOKIE;
use axum::http::HeaderMap;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "lex_session_id";

/// `web-` plus ten random hex characters.
pub fn new_session_id() -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("web-{}", &id[..10])
}

/// Session id for a chat turn: request body, then cookie, then a fresh one.
pub fn resolve_session_id(provided: Option<&str>, headers: &HeaderMap) -> String {
    provided
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .or_else(|| cookie_value(headers, SESSION_COOKIE))
        .unwrap_or_else(new_session_id)
}

/// Reads one cookie out of every `Cookie` header on the request.
///
/// Values are percent-decoded; a value that does not decode to UTF-8 is kept as sent.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| {
            let value = value.trim();
            urlencoding::decode(value)
                .map(|decoded| decoded.into_owned())
                .unwrap_or_else(|_| value.to_string())
        })
        .filter(|value| !value.is_empty())
}

/// `Set-Cookie` value for the session. The id is percent-encoded so it can
/// never carry its own cookie attributes.
pub fn session_cookie(session_id: &str) -> String {
    format!(
        "{}={}; Path=/; SameSite=Lax",
        SESSION_COOKIE,
        urlencoding::encode(session_id)
    )
}

use anyhow::anyhow;
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::{header::SET_COOKIE, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use super::session::{resolve_session_id, session_cookie};
use super::AppState;
use crate::fulfillment::{fulfill, FulfillmentEvent, FulfillmentResponse};
use crate::kernel::{engine_response, format_lex_response, ChatResponse};
use crate::services::llm::AWS_LEX;
use crate::services::suggestions::quick_replies;

pub const CONFIG_HINT: &str = "AWS_REGION / LEX_BOT_ID / LEX_BOT_ALIAS_ID / (옵션) LEX_LOCALE_ID 환경변수와 AWS 자격증명 설정을 확인하세요.";

/// Error-shaped JSON response: `{ error, hint? }`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    hint: Option<&'static str>,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
            hint: None,
        }
    }

    pub fn upstream(err: anyhow::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
            hint: Some(CONFIG_HINT),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.hint {
            Some(hint) => json!({ "error": self.message, "hint": hint }),
            None => json!({ "error": self.message }),
        };
        (self.status, Json(body)).into_response()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub engine: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SuggestionQuery {
    #[serde(default)]
    pub slot: Option<String>,
}

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "ok": true }))
}

pub async fn list_engines(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "engines": state.engines.engines(),
        "defaultEngine": AWS_LEX,
    }))
}

pub async fn suggestions(
    State(state): State<AppState>,
    Query(query): Query<SuggestionQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if state.region.is_none() {
        return Err(ApiError::bad_request("AWS_REGION is required"));
    }
    let slot = query.slot.unwrap_or_default();
    let suggestions = state.suggestions.suggestions(&slot).await;
    Ok(Json(json!({ "slot": slot, "suggestions": suggestions })))
}

pub async fn chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = body.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
    let text = request.text.as_deref().map(str::trim).unwrap_or_default();
    if text.is_empty() {
        return Err(ApiError::bad_request("text is required"));
    }

    let session_id = resolve_session_id(request.session_id.as_deref(), &headers);
    let engine = request
        .engine
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .unwrap_or(AWS_LEX);
    if !state.engines.is_enabled(engine) {
        return Err(ApiError::bad_request(format!("engine is not enabled: {}", engine)));
    }

    info!("chat turn session={} engine={}", session_id, engine);
    let result = if engine == AWS_LEX {
        lex_turn(&state, text, &session_id).await
    } else {
        state
            .engines
            .chat(engine, text)
            .await
            .map(|answer| engine_response(&session_id, engine, &answer))
    };
    let out = result.map_err(|e| {
        warn!("chat turn failed session={}: {:#}", session_id, e);
        ApiError::upstream(e)
    })?;

    let mut response = Json(out).into_response();
    match HeaderValue::from_str(&session_cookie(&session_id)) {
        Ok(cookie) => {
            response.headers_mut().insert(SET_COOKIE, cookie);
        }
        Err(_) => warn!("session id is not cookie-safe, skipping cookie"),
    }
    Ok(response)
}

pub async fn fulfillment(Json(event): Json<FulfillmentEvent>) -> Json<FulfillmentResponse> {
    Json(fulfill(event, Utc::now()))
}

// Recognize -> format -> quick replies for the elicited slot.
async fn lex_turn(state: &AppState, text: &str, session_id: &str) -> anyhow::Result<ChatResponse> {
    let recognizer = state
        .recognizer
        .as_ref()
        .ok_or_else(|| anyhow!("Lex recognizer is not configured"))?;

    let raw = recognizer.recognize(text, session_id).await?;
    let mut out = format_lex_response(&state.catalog, session_id, &raw)?;

    if let Some(slot) = out.ui.elicited_slot().map(str::to_string) {
        let suggestions = state.suggestions.suggestions(&slot).await;
        if !suggestions.is_empty() {
            out.ui.fill_quick_replies(quick_replies(suggestions));
        }
    }
    Ok(out)
}

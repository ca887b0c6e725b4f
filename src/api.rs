use std::{convert::Infallible, sync::Arc};

use anyhow::{Error, Result};
use axum::{
    Router,
    body::Bytes,
    extract::{RawQuery, State},
    http::{HeaderMap, Method, StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Json, Response},
    routing::get,
};
use futures_util::stream;
use serde_json::Value;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{Instrument, error, info, info_span};
use uuid::Uuid;

use crate::{
    clients::uazapi::UazapiClient,
    config::Config,
    error::DispatchError,
    models::{
        health::HealthCheckResponse,
        message::RawRequest,
        response::{ValidationErrorResponse, WebhookResponse},
    },
    utils::process_message,
};

pub struct AppState {
    config: Config,
    uazapi_client: UazapiClient,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, Error> {
        let uazapi_client = UazapiClient::new(config.uazapi_timeout())?;

        Ok(Self {
            config,
            uazapi_client,
        })
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/webhook/sgp", get(receive_from_sgp).post(receive_from_sgp))
        .route(
            "/webhooks/evolution-uazapi/",
            get(receive_from_sgp).post(receive_from_sgp),
        )
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_api_server(config: Config) -> Result<(), Error> {
    let addr = config.bind_address();
    let state = Arc::new(AppState::new(config)?);

    let listener = TcpListener::bind(&addr).await?;

    info!(address = %addr, "SGP webhook server started");

    axum::serve(listener, router(state)).await?;

    Ok(())
}

async fn receive_from_sgp(
    State(state): State<Arc<AppState>>,
    method: Method,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
    body: Bytes,
) -> Response {
    let request_id = Uuid::new_v4();
    let span = info_span!("sgp_webhook", %request_id, %method);

    async move {
        let result = match flatten_request(&method, &headers, query.as_deref(), body).await {
            Ok(raw) => {
                process_message(raw, &state.uazapi_client, &state.config.uazapi_default_url).await
            }
            Err(e) => Err(e),
        };

        match result {
            Ok(outcome) => {
                info!(kind = ?outcome.kind, "SGP request processed");
                (StatusCode::OK, Json(WebhookResponse::success(outcome.uazapi_response)))
                    .into_response()
            }
            Err(e) if e.is_validation() => (
                StatusCode::BAD_REQUEST,
                Json(ValidationErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response(),
            Err(e) => {
                error!(error = %e, "Failed to process SGP request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(WebhookResponse::error(e.to_string())),
                )
                    .into_response()
            }
        }
    }
    .instrument(span)
    .await
}

async fn health_check() -> impl IntoResponse {
    Json(HealthCheckResponse::healthy())
}

/// POST reads a JSON, urlencoded or multipart form body, GET reads the query
/// string. Any other POST body is treated as carrying no data.
pub async fn flatten_request(
    method: &Method,
    headers: &HeaderMap,
    query: Option<&str>,
    body: Bytes,
) -> Result<RawRequest, DispatchError> {
    if *method != Method::POST {
        return parse_urlencoded(query.unwrap_or_default().as_bytes());
    }

    let mime = mime_essence(headers);

    if is_json(&mime) {
        return match serde_json::from_slice::<Value>(&body) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(DispatchError::MalformedBody(format!(
                "expected a JSON object, got {}",
                json_type_name(&other)
            ))),
            Err(e) => Err(DispatchError::MalformedBody(e.to_string())),
        };
    }

    if mime == "application/x-www-form-urlencoded" {
        return parse_urlencoded(&body);
    }

    if mime == "multipart/form-data" {
        return parse_multipart(headers, body).await;
    }

    Ok(RawRequest::new())
}

fn parse_urlencoded(input: &[u8]) -> Result<RawRequest, DispatchError> {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(input)
        .map_err(|e| DispatchError::MalformedBody(e.to_string()))?;

    let mut raw = RawRequest::new();
    for (key, value) in pairs {
        raw.entry(key).or_insert(Value::String(value));
    }

    Ok(raw)
}

/// File parts are skipped; only plain form fields carry webhook data.
async fn parse_multipart(headers: &HeaderMap, body: Bytes) -> Result<RawRequest, DispatchError> {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    let boundary = multer::parse_boundary(content_type)
        .map_err(|e| DispatchError::MalformedBody(e.to_string()))?;

    let mut multipart = multer::Multipart::new(
        stream::once(async move { Ok::<_, Infallible>(body) }),
        boundary,
    );

    let mut raw = RawRequest::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| DispatchError::MalformedBody(e.to_string()))?
    {
        if field.file_name().is_some() {
            continue;
        }
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        let value = field
            .text()
            .await
            .map_err(|e| DispatchError::MalformedBody(e.to_string()))?;
        raw.entry(name).or_insert(Value::String(value));
    }

    Ok(raw)
}

fn mime_essence(headers: &HeaderMap) -> String {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|content_type| content_type.split(';').next())
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

fn is_json(mime: &str) -> bool {
    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

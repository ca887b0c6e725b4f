use serde_json::Value;
use tracing::{error, info, warn};

use crate::{
    clients::uazapi::UazapiClient,
    error::{DispatchError, GatewayError},
    models::{
        message::{GatewayConfig, MessageKind, NormalizedMessage, RawRequest},
        payload::{InteractivePayload, InvoiceTemplate, TextPayload},
    },
};

pub const COMPOSITION_FALLBACK_TEXT: &str = "Erro ao montar mensagem.";

const COUNTRY_CODE: &str = "55";

#[derive(Debug, Clone)]
pub struct DispatchOutcome {
    pub kind: MessageKind,
    pub uazapi_response: Value,
}

/// Runs one inbound request through normalize, classify, build and send.
///
/// Only input problems come back as `Err`; gateway failures are folded into
/// `uazapi_response` as `{"error": ...}` so the caller always gets an answer.
pub async fn process_message(
    raw: RawRequest,
    client: &UazapiClient,
    default_base_url: &str,
) -> Result<DispatchOutcome, DispatchError> {
    let mut message = NormalizedMessage::normalize(raw)?;
    let gateway = message.take_gateway_config(default_base_url);

    info!(
        data = %serde_json::to_string_pretty(message.as_map()).unwrap_or_default(),
        "Data received from SGP"
    );

    let kind = message.kind();
    let uazapi_response = match kind {
        MessageKind::Interactive => send_interactive_message(&message, &gateway, client).await,
        MessageKind::Plain => send_text_message(&message, &gateway, client).await,
    };

    Ok(DispatchOutcome {
        kind,
        uazapi_response,
    })
}

pub async fn send_text_message(
    message: &NormalizedMessage,
    gateway: &GatewayConfig,
    client: &UazapiClient,
) -> Value {
    let payload = TextPayload::from_message(message);

    relay(client.send_text(gateway, &payload).await)
}

pub async fn send_interactive_message(
    message: &NormalizedMessage,
    gateway: &GatewayConfig,
    client: &UazapiClient,
) -> Value {
    if gateway.instance_token.is_none() {
        return GatewayError::MissingToken.to_soft_response();
    }

    let template = match InvoiceTemplate::from_message(message) {
        Ok(template) => template,
        Err(e) => {
            error!(error = %e, "Failed to compose interactive message, sending plain text instead");
            let fallback = message.with_text(COMPOSITION_FALLBACK_TEXT.to_string());
            return send_text_message(&fallback, gateway, client).await;
        }
    };

    let text = template.render();
    let choices = template.choices(message);

    if choices.is_empty() {
        warn!("No data for interactive buttons found, sending as text message");
        return send_text_message(&message.with_text(text), gateway, client).await;
    }

    let payload = InteractivePayload::new(message, text, choices);

    relay(client.send_menu(gateway, &payload).await)
}

fn relay(result: Result<Value, GatewayError>) -> Value {
    match result {
        Ok(response) => response,
        Err(e) => {
            error!(error = %e, "Failed to send message to UAZAPI");
            e.to_soft_response()
        }
    }
}

/// Canonical `55`-prefixed digit string: strips non-digits and collapses
/// repeated country codes down to one.
pub fn format_number(number: &str) -> String {
    let digits: String = number.chars().filter(char::is_ascii_digit).collect();
    let mut cleaned = digits.as_str();

    while cleaned.starts_with(COUNTRY_CODE) && cleaned.len() > COUNTRY_CODE.len() {
        cleaned = &cleaned[COUNTRY_CODE.len()..];
    }

    if cleaned.starts_with(COUNTRY_CODE) {
        cleaned.to_string()
    } else {
        format!("{}{}", COUNTRY_CODE, cleaned)
    }
}

/// Truthiness used for optional fields: empty strings, zero, false, null and
/// empty collections count as absent.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

pub fn render_scalar(value: &Value) -> Option<String> {
    match value {
        Value::Null => Some(String::new()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

pub fn render_lossy(value: &Value) -> String {
    render_scalar(value).unwrap_or_else(|| value.to_string())
}

use serde::Serialize;
use serde_json::Value;

pub const SUCCESS_MESSAGE: &str = "Mensagem processada com sucesso";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct WebhookResponse {
    pub status: ResponseStatus,

    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub uazapi_response: Option<Value>,
}

/// Body of a 400: the caller sent something we cannot route.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationErrorResponse {
    pub error: String,
}

impl WebhookResponse {
    pub fn success(uazapi_response: Value) -> Self {
        Self {
            status: ResponseStatus::Success,
            message: SUCCESS_MESSAGE.to_string(),
            uazapi_response: Some(uazapi_response),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            status: ResponseStatus::Error,
            message,
            uazapi_response: None,
        }
    }
}

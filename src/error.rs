use reqwest::StatusCode;
use serde_json::{Value, json};
use thiserror::Error;

/// Failures that stop the pipeline before anything is sent.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Dados não fornecidos")]
    EmptyRequest,

    #[error("Campo 'number' (ou 'to') é obrigatório")]
    MissingNumber,

    #[error("Corpo da requisição inválido: {0}")]
    MalformedBody(String),
}

impl DispatchError {
    /// Validation problems are the caller's fault; anything else is a fault of ours.
    pub fn is_validation(&self) -> bool {
        matches!(self, DispatchError::EmptyRequest | DispatchError::MissingNumber)
    }
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Token da instância não fornecido")]
    MissingToken,

    #[error("Não autorizado - verifique o token da instância")]
    Unauthorized,

    #[error("{status} error from gateway: {body}")]
    Status { status: StatusCode, body: String },

    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid gateway response: {0}")]
    InvalidResponse(#[from] serde_json::Error),
}

impl GatewayError {
    /// Gateway failures are relayed to the caller as a value, never as an HTTP error.
    pub fn to_soft_response(&self) -> Value {
        json!({ "error": self.to_string() })
    }
}

#[derive(Debug, Error)]
pub enum CompositionError {
    #[error("Unsupported value for template field '{0}'")]
    UnsupportedValue(String),
}

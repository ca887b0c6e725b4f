use serde_json::{Map, Value};

use crate::{
    error::DispatchError,
    models::validation::validate_number,
    utils::{is_truthy, render_lossy},
};

/// Inbound fields as flattened from a JSON body, form body or query string.
pub type RawRequest = Map<String, Value>;

/// Billing fields whose presence marks a message as interactive.
pub const TEMPLATE_FIELDS: [&str; 5] = ["cliente", "valor", "linhadigitavel", "link_pix", "provedor"];

const URL_KEYS: [&str; 2] = ["uazapi_url", "uazapi_base_url"];
const TOKEN_KEYS: [&str; 2] = ["instance_token", "token"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Interactive,
    Plain,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GatewayConfig {
    pub base_url: String,
    pub instance_token: Option<String>,
}

impl GatewayConfig {
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedMessage {
    fields: Map<String, Value>,
}

impl NormalizedMessage {
    /// Resolves `to`/`msg` aliases onto `number`/`text`, keeping canonical keys when both exist.
    pub fn normalize(mut raw: RawRequest) -> Result<Self, DispatchError> {
        if !raw.contains_key("number") {
            if let Some(to) = raw.get("to").cloned() {
                raw.insert("number".to_string(), to);
            }
        }
        if !raw.contains_key("text") {
            if let Some(msg) = raw.get("msg").cloned() {
                raw.insert("text".to_string(), msg);
            }
        }

        if raw.is_empty() {
            return Err(DispatchError::EmptyRequest);
        }

        validate_number(raw.get("number"))?;

        Ok(Self { fields: raw })
    }

    /// Removes the per-request gateway overrides so they are never forwarded.
    pub fn take_gateway_config(&mut self, default_base_url: &str) -> GatewayConfig {
        let base_url = self.first_truthy(&URL_KEYS);
        let instance_token = self.first_truthy(&TOKEN_KEYS);

        for key in URL_KEYS.iter().chain(TOKEN_KEYS.iter()) {
            self.fields.remove(*key);
        }

        GatewayConfig {
            base_url: base_url.unwrap_or_else(|| default_base_url.to_string()),
            instance_token,
        }
    }

    /// Presence alone decides; an empty `valor` still counts.
    pub fn kind(&self) -> MessageKind {
        if TEMPLATE_FIELDS.iter().any(|key| self.fields.contains_key(*key)) {
            MessageKind::Interactive
        } else {
            MessageKind::Plain
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn number(&self) -> String {
        self.fields.get("number").map(render_lossy).unwrap_or_default()
    }

    /// Copy with `text` replaced, used by the fallbacks into the text path.
    pub fn with_text(&self, text: String) -> Self {
        let mut fields = self.fields.clone();
        fields.insert("text".to_string(), Value::String(text));
        Self { fields }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }

    fn first_truthy(&self, keys: &[&str]) -> Option<String> {
        keys.iter()
            .filter_map(|key| self.fields.get(*key))
            .find(|value| is_truthy(value))
            .map(render_lossy)
    }
}

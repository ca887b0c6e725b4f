use serde::Serialize;
use serde_json::{Map, Value};

use crate::{
    error::CompositionError,
    models::message::NormalizedMessage,
    utils::{format_number, is_truthy, render_lossy, render_scalar},
};

pub const DEFAULT_TEXT: &str = "Mensagem recebida.";
pub const NOT_INFORMED: &str = "Não informado";
pub const MENU_FOOTER: &str = "Escolha uma das opções abaixo";

/// Delivery-control fields the gateway understands; anything else is dropped.
pub const DELIVERY_FIELDS: [&str; 11] = [
    "linkPreview",
    "linkPreviewTitle",
    "linkPreviewDescription",
    "linkPreviewImage",
    "linkPreviewLarge",
    "replyid",
    "mentions",
    "readchat",
    "readmessages",
    "delay",
    "forward",
];

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TextPayload {
    pub number: String,
    pub text: String,

    #[serde(flatten)]
    pub delivery: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InteractivePayload {
    pub number: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
    pub choices: Vec<String>,
    pub footer_text: String,
}

impl TextPayload {
    pub fn from_message(message: &NormalizedMessage) -> Self {
        let body = ["text", "msg", "message"]
            .iter()
            .find_map(|key| message.get(key))
            .map(render_lossy)
            .unwrap_or_else(|| DEFAULT_TEXT.to_string());

        let text = match message.get("teste").filter(|extra| is_truthy(extra)) {
            Some(extra) => format!("{}\n\n{}", body, render_lossy(extra)),
            None => body,
        };

        let delivery = DELIVERY_FIELDS
            .iter()
            .filter_map(|key| message.get(key).map(|value| (key.to_string(), value.clone())))
            .collect();

        Self {
            number: format_number(&message.number()),
            text,
            delivery,
        }
    }
}

/// Billing fields read for the interactive template, with their defaults applied.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceTemplate {
    pub cliente: String,
    pub valor: String,
    pub linhadigitavel: String,
    pub link_pix: String,
    pub provedor: String,
    pub extra: Option<String>,
}

impl InvoiceTemplate {
    pub fn from_message(message: &NormalizedMessage) -> Result<Self, CompositionError> {
        let field = |key: &str, default: &str| -> Result<String, CompositionError> {
            match message.get(key) {
                Some(value) => render_scalar(value)
                    .ok_or_else(|| CompositionError::UnsupportedValue(key.to_string())),
                None => Ok(default.to_string()),
            }
        };

        let extra = match message.get("teste").filter(|extra| is_truthy(extra)) {
            Some(value) => Some(
                render_scalar(value)
                    .ok_or_else(|| CompositionError::UnsupportedValue("teste".to_string()))?,
            ),
            None => None,
        };

        Ok(Self {
            cliente: field("cliente", "Cliente")?,
            valor: field("valor", "0,00")?,
            linhadigitavel: field("linhadigitavel", NOT_INFORMED)?,
            link_pix: field("link_pix", NOT_INFORMED)?,
            provedor: field("provedor", NOT_INFORMED)?,
            extra,
        })
    }

    pub fn render(&self) -> String {
        let mut lines = vec![
            format!("Prezado(a) {},", self.cliente),
            String::new(),
            "Identificamos um título em aberto em seu nome. Seguem os dados para regularização:"
                .to_string(),
            String::new(),
            format!("Valor: R$ {}", self.valor),
            format!("Linha Digitável: {}", self.linhadigitavel),
            format!("Código PIX: {}", self.link_pix),
            format!("Beneficiário: {}", self.provedor),
        ];

        if let Some(extra) = &self.extra {
            lines.push(String::new());
            lines.push(extra.clone());
        }

        lines.extend([
            String::new(),
            "Agradecemos pela pronta atenção e permanecemos à disposição para qualquer esclarecimento."
                .to_string(),
            String::new(),
            "Atenciosamente,".to_string(),
            format!("Equipe {}", self.provedor),
        ]);

        lines.join("\n")
    }

    /// Copy buttons, digit line first; placeholder or empty values get no button.
    pub fn choices(&self, message: &NormalizedMessage) -> Vec<String> {
        let mut choices = Vec::new();

        if Self::has_button_value(message, "linhadigitavel") {
            choices.push(format!("Copiar Linha Digitável|copy:{}", self.linhadigitavel));
        }
        if Self::has_button_value(message, "link_pix") {
            choices.push(format!("Copiar PIX|copy:{}", self.link_pix));
        }

        choices
    }

    fn has_button_value(message: &NormalizedMessage, key: &str) -> bool {
        message
            .get(key)
            .is_some_and(|value| is_truthy(value) && value.as_str() != Some(NOT_INFORMED))
    }
}

impl InteractivePayload {
    pub fn new(message: &NormalizedMessage, text: String, choices: Vec<String>) -> Self {
        Self {
            number: format_number(&message.number()),
            kind: "button".to_string(),
            text,
            choices,
            footer_text: MENU_FOOTER.to_string(),
        }
    }
}

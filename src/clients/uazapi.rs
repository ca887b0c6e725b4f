use std::time::Duration;

use anyhow::{Error, Result, anyhow};
use reqwest::{
    Client, StatusCode,
    header::{ACCEPT, CONTENT_TYPE},
};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info};

use crate::{
    error::GatewayError,
    models::{
        message::GatewayConfig,
        payload::{InteractivePayload, TextPayload},
    },
};

/// Outbound side of the bridge: one POST per call, no retries.
#[derive(Clone)]
pub struct UazapiClient {
    http_client: Client,
}

impl UazapiClient {
    pub fn new(timeout: Duration) -> Result<Self, Error> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow!("Failed to create HTTP client: {}", e))?;

        info!(timeout_seconds = timeout.as_secs(), "UAZAPI client initialized");

        Ok(Self { http_client })
    }

    pub async fn send_text(
        &self,
        gateway: &GatewayConfig,
        payload: &TextPayload,
    ) -> Result<Value, GatewayError> {
        self.post(gateway, "send/text", payload).await
    }

    pub async fn send_menu(
        &self,
        gateway: &GatewayConfig,
        payload: &InteractivePayload,
    ) -> Result<Value, GatewayError> {
        self.post(gateway, "send/menu", payload).await
    }

    async fn post<P: Serialize>(
        &self,
        gateway: &GatewayConfig,
        path: &str,
        payload: &P,
    ) -> Result<Value, GatewayError> {
        let token = gateway
            .instance_token
            .as_deref()
            .ok_or(GatewayError::MissingToken)?;

        let url = gateway.endpoint(path);
        debug!(url = %url, "Posting message to UAZAPI");

        let response = self
            .http_client
            .post(&url)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .header("token", token)
            .json(payload)
            .send()
            .await
            .inspect_err(|e| error!(error = %e, url = %url, "Failed to reach UAZAPI"))?;

        let status = response.status();
        let body = response.text().await?;

        info!(status = status.as_u16(), body = %body, "UAZAPI response received");

        if status == StatusCode::UNAUTHORIZED {
            return Err(GatewayError::Unauthorized);
        }

        if !status.is_success() {
            return Err(GatewayError::Status { status, body });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

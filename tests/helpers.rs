use std::{sync::Arc, time::Duration};

use anyhow::Result;
use serde_json::{Map, Value};
use sgp_uazapi_bridge::{
    api::{AppState, router},
    clients::uazapi::UazapiClient,
    config::Config,
    models::message::{NormalizedMessage, RawRequest},
};
use tokio::net::TcpListener;

pub const TOKEN: &str = "instance-token-123";

/// Serves the bridge on an ephemeral port and returns its base URL.
pub async fn spawn_app(gateway_url: &str) -> Result<String> {
    let config = Config {
        uazapi_default_url: gateway_url.to_string(),
        uazapi_timeout_seconds: 2,
        ..Config::default()
    };

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let state = Arc::new(AppState::new(config)?);

    tokio::spawn(async move { axum::serve(listener, router(state)).await });

    Ok(format!("http://{}", addr))
}

pub fn test_client() -> Result<UazapiClient> {
    UazapiClient::new(Duration::from_secs(1))
}

pub fn raw_request(value: Value) -> RawRequest {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

pub fn normalized(value: Value) -> Result<NormalizedMessage> {
    Ok(NormalizedMessage::normalize(raw_request(value))?)
}

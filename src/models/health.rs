use serde::{Deserialize, Serialize};

pub const HEALTH_MESSAGE: &str = "API SGP-UAZAPI está funcionando";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    pub status: HealthStatus,
    pub message: String,
}

impl HealthCheckResponse {
    pub fn healthy() -> Self {
        Self {
            status: HealthStatus::Healthy,
            message: HEALTH_MESSAGE.to_string(),
        }
    }
}

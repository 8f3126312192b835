use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Connection settings for the screening event channel.
#[derive(Clone, Debug)]
pub struct StreamConfig {
    /// Endpoint of the pipeline's event channel.
    pub endpoint: String,
    /// Reconnect attempts before the feed gives up.
    pub max_reconnect_attempts: u32,
    /// First reconnect delay; doubles per attempt.
    pub base_delay: Duration,
    /// Ceiling for the reconnect delay.
    pub max_delay: Duration,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self::new(None)
    }
}

impl StreamConfig {
    pub const DEFAULT_ENDPOINT: &'static str = "ws://127.0.0.1:8000/ws/run-screening";

    /// Build a config with the given endpoint, or resolve one from the
    /// environment (`SCREENFLOW_WS_URL`, `.env` honored) when `None`.
    pub fn new(endpoint: Option<String>) -> Self {
        Self {
            endpoint: endpoint.unwrap_or_else(Self::endpoint_from_env),
            max_reconnect_attempts: 5,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
        }
    }

    fn endpoint_from_env() -> String {
        dotenvy::dotenv().ok();
        std::env::var("SCREENFLOW_WS_URL").unwrap_or_else(|_| Self::DEFAULT_ENDPOINT.to_string())
    }

    #[must_use]
    pub fn with_max_reconnect_attempts(mut self, attempts: u32) -> Self {
        self.max_reconnect_attempts = attempts;
        self
    }

    /// Delay before reconnect attempt `attempt` (1-based):
    /// `min(base * 2^attempt, max)`.
    pub fn reconnect_delay(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.min(16));
        self.base_delay
            .saturating_mul(factor)
            .min(self.max_delay)
    }
}

/// File payload inside a [`ScreeningRequest`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreeningPayload {
    #[serde(rename = "fileName")]
    pub file_name: String,
    /// Base64-encoded file bytes.
    #[serde(rename = "fileContent")]
    pub file_content: String,
}

/// Initiating payload sent when the connection opens: a generated run id
/// plus the CV to screen.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreeningRequest {
    pub run_id: String,
    pub payload: ScreeningPayload,
}

impl ScreeningRequest {
    /// Build a request for one CV upload, generating the run id and
    /// encoding the file bytes.
    pub fn for_upload(file_name: impl Into<String>, file_bytes: &[u8]) -> Self {
        Self {
            run_id: format!("cv-screening-{}", Uuid::new_v4()),
            payload: ScreeningPayload {
                file_name: file_name.into(),
                file_content: BASE64.encode(file_bytes),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reconnect_delay_doubles_and_caps() {
        let config = StreamConfig {
            endpoint: StreamConfig::DEFAULT_ENDPOINT.to_string(),
            max_reconnect_attempts: 5,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
        };
        assert_eq!(config.reconnect_delay(1), Duration::from_secs(2));
        assert_eq!(config.reconnect_delay(2), Duration::from_secs(4));
        assert_eq!(config.reconnect_delay(4), Duration::from_secs(16));
        assert_eq!(config.reconnect_delay(5), Duration::from_secs(30));
        assert_eq!(config.reconnect_delay(60), Duration::from_secs(30));
    }

    #[test]
    fn explicit_endpoint_wins_over_environment() {
        std::env::set_var("SCREENFLOW_WS_URL", "ws://env.invalid/ws/run-screening");
        let config = StreamConfig::new(Some("ws://explicit.invalid/ws/run-screening".into()));
        assert_eq!(config.endpoint, "ws://explicit.invalid/ws/run-screening");
        std::env::remove_var("SCREENFLOW_WS_URL");
    }

    #[test]
    fn request_encodes_file_and_generates_run_id() {
        let request = ScreeningRequest::for_upload("cv.pdf", b"hello");
        assert!(request.run_id.starts_with("cv-screening-"));
        assert_eq!(request.payload.file_name, "cv.pdf");
        assert_eq!(request.payload.file_content, "aGVsbG8=");
    }

    #[test]
    fn request_serializes_with_upstream_field_names() {
        let request = ScreeningRequest {
            run_id: "cv-screening-1".into(),
            payload: ScreeningPayload {
                file_name: "cv.pdf".into(),
                file_content: "aGVsbG8=".into(),
            },
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["run_id"], "cv-screening-1");
        assert_eq!(json["payload"]["fileName"], "cv.pdf");
        assert_eq!(json["payload"]["fileContent"], "aGVsbG8=");
    }
}

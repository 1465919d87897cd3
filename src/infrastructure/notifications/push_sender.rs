use crate::application::ports::notifications::{PushMessage, PushSender};
use crate::shared::config::PushConfig;
use crate::shared::error::AppError;
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum PushError {
    #[error("Push request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Push gateway rejected the message: HTTP {0}")]
    Rejected(u16),
}

impl From<PushError> for AppError {
    fn from(err: PushError) -> Self {
        AppError::Notification(err.to_string())
    }
}

#[derive(Serialize)]
struct PushPayload<'a> {
    to: &'a str,
    body: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<&'a str>,
}

/// Posts messages to the configured push gateway. The request timeout is a
/// hard bound; the caller side additionally races against its own timeout.
pub struct HttpPushSender {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpPushSender {
    pub fn new(config: &PushConfig) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(PushError::Request)?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }
}

#[async_trait]
impl PushSender for HttpPushSender {
    async fn send(&self, message: &PushMessage) -> Result<(), AppError> {
        let payload = PushPayload {
            to: &message.token,
            body: &message.message,
            image: message.image_url.as_deref(),
        };
        let response = self
            .client
            .post(&self.endpoint)
            .json(&payload)
            .send()
            .await
            .map_err(PushError::Request)?;
        if !response.status().is_success() {
            return Err(PushError::Rejected(response.status().as_u16()).into());
        }
        debug!(token = %message.token, "push accepted by gateway");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_omits_absent_image() {
        let payload = PushPayload {
            to: "tok",
            body: "hello",
            image: None,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["to"], "tok");
        assert!(json.get("image").is_none());

        let payload = PushPayload {
            to: "tok",
            body: "hello",
            image: Some("https://img/1.jpg"),
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["image"], "https://img/1.jpg");
    }
}

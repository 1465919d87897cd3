use crate::shared::error::AppError;
use async_trait::async_trait;

/// A resolved outbound push: the device token plus the rendered message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushMessage {
    pub token: String,
    pub message: String,
    pub image_url: Option<String>,
}

/// Fire-and-forget delivery; callers never await this on the request path
/// and must not fail their transaction on a delivery error.
#[async_trait]
pub trait PushSender: Send + Sync {
    async fn send(&self, message: &PushMessage) -> Result<(), AppError>;
}

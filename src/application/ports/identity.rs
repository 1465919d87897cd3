use crate::shared::error::AppError;
use async_trait::async_trait;

/// Turns an opaque transport credential into a caller user id. The core
/// never sees raw credentials beyond this boundary; failures surface as
/// `Unauthorized`.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    async fn resolve(&self, credential: &str) -> Result<String, AppError>;
}

use crate::application::ports::identity::IdentityResolver;
use crate::application::ports::notifications::PushSender;
use crate::application::services::{
    ItemService, NotificationService, OfferService, PricingService, UserService,
};
use crate::infrastructure::database::{ConnectionPool, SqliteRepository};
use crate::infrastructure::notifications::HttpPushSender;
use crate::shared::config::AppConfig;
use crate::shared::error::AppError;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Composition root. Owns the pool, wires every service against the single
/// SQLite repository, and holds the externally provided identity resolver.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserService>,
    pub items: Arc<ItemService>,
    pub pricing: Arc<PricingService>,
    pub offers: Arc<OfferService>,
    identity: Arc<dyn IdentityResolver>,
    pool: ConnectionPool,
}

impl AppState {
    pub async fn new(
        config: AppConfig,
        identity: Arc<dyn IdentityResolver>,
    ) -> anyhow::Result<Self> {
        let pool = ConnectionPool::new(&config.database).await?;
        pool.migrate().await?;

        let sender: Arc<dyn PushSender> = Arc::new(HttpPushSender::new(&config.push)?);
        Self::assemble(pool, config, identity, sender)
    }

    /// Same wiring with the outbound sender swapped, for embedding and
    /// tests.
    pub fn with_sender(
        pool: ConnectionPool,
        config: AppConfig,
        identity: Arc<dyn IdentityResolver>,
        sender: Arc<dyn PushSender>,
    ) -> anyhow::Result<Self> {
        Self::assemble(pool, config, identity, sender)
    }

    fn assemble(
        pool: ConnectionPool,
        config: AppConfig,
        identity: Arc<dyn IdentityResolver>,
        sender: Arc<dyn PushSender>,
    ) -> anyhow::Result<Self> {
        let repository = Arc::new(SqliteRepository::new(pool.clone()));

        let notifications = Arc::new(NotificationService::new(
            repository.clone(),
            sender,
            Duration::from_secs(config.push.timeout_secs),
        ));

        let users = Arc::new(UserService::new(repository.clone()));
        let items = Arc::new(ItemService::new(
            repository.clone(),
            repository.clone(),
            repository.clone(),
        ));
        let pricing = Arc::new(PricingService::new(
            repository.clone(),
            repository.clone(),
            notifications.clone(),
            config.pricing.clone(),
        ));
        let offers = Arc::new(OfferService::new(
            repository.clone(),
            repository.clone(),
            repository.clone(),
            notifications,
        ));

        info!("application state assembled");
        Ok(Self {
            users,
            items,
            pricing,
            offers,
            identity,
            pool,
        })
    }

    /// Resolves a transport credential to the caller's user id.
    pub async fn authenticate(&self, credential: &str) -> Result<String, AppError> {
        self.identity.resolve(credential).await
    }

    pub async fn shutdown(&self) {
        self.pool.close().await;
    }
}

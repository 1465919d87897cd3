use crate::application::ports::repositories::{
    InteractionRepository, ItemRepository, LikeOutcome, UnlikeOutcome,
};
use crate::application::services::notifier::NotificationService;
use crate::domain::entities::{Interaction, Item};
use crate::shared::config::PricingPolicy;
use crate::shared::error::AppError;
use chrono::Utc;
use std::sync::Arc;
use tracing::debug;

/// Drives the like/unlike price ladder. The transactional work lives behind
/// `InteractionRepository`; this layer gates visibility and ownership,
/// supplies the policy, and fires the owner notification after commit.
pub struct PricingService {
    items: Arc<dyn ItemRepository>,
    interactions: Arc<dyn InteractionRepository>,
    notifications: Arc<NotificationService>,
    policy: PricingPolicy,
}

impl PricingService {
    pub fn new(
        items: Arc<dyn ItemRepository>,
        interactions: Arc<dyn InteractionRepository>,
        notifications: Arc<NotificationService>,
        policy: PricingPolicy,
    ) -> Self {
        Self {
            items,
            interactions,
            notifications,
            policy,
        }
    }

    pub async fn like_item(&self, caller_id: &str, item_id: &str) -> Result<LikeOutcome, AppError> {
        let item = self.visible_item(caller_id, item_id).await?;
        if item.user_id == caller_id {
            return Err(AppError::invalid_input(format!(
                "Cannot like your own item: {item_id}"
            )));
        }

        let now = Utc::now().timestamp_millis();
        let outcome = self
            .interactions
            .apply_like(caller_id, item_id, &self.policy, now)
            .await?;

        if outcome.changed {
            debug!(
                item_id = %item_id,
                current_price = outcome.current_price,
                "like applied, price stepped up"
            );
            self.notifications.notify_later(
                &item.user_id,
                format!(
                    "Someone liked your {}! Its price is now {}.",
                    item.name,
                    format_price(outcome.current_price)
                ),
                item.images.first().cloned(),
            );
        }
        Ok(outcome)
    }

    pub async fn unlike_item(
        &self,
        caller_id: &str,
        item_id: &str,
    ) -> Result<UnlikeOutcome, AppError> {
        // No visibility gate: a like may be withdrawn from an item that has
        // since been hidden.
        self.items
            .get_item_record(item_id)
            .await?
            .ok_or_else(|| AppError::not_found("item", item_id))?;
        self.interactions.apply_unlike(caller_id, item_id).await
    }

    /// Stamps a favorite; no pricing effect. Idempotent per user.
    pub async fn favorite_item(&self, caller_id: &str, item_id: &str) -> Result<bool, AppError> {
        self.visible_item(caller_id, item_id).await?;
        let now = Utc::now().timestamp_millis();
        self.interactions.set_favorite(caller_id, item_id, now).await
    }

    pub async fn unfavorite_item(&self, caller_id: &str, item_id: &str) -> Result<bool, AppError> {
        self.items
            .get_item_record(item_id)
            .await?
            .ok_or_else(|| AppError::not_found("item", item_id))?;
        self.interactions.clear_favorite(caller_id, item_id).await
    }

    /// Active likes of an item, top lock-in first; owner-only.
    pub async fn get_item_likes(
        &self,
        caller_id: &str,
        item_id: &str,
    ) -> Result<Vec<Interaction>, AppError> {
        let item = self
            .items
            .get_item_record(item_id)
            .await?
            .ok_or_else(|| AppError::not_found("item", item_id))?;
        if item.user_id != caller_id {
            return Err(AppError::unauthorized(format!(
                "Only the owner can list likes of item {item_id}"
            )));
        }
        self.interactions.get_active_likes(item_id).await
    }

    /// Fetches the raw item and applies the visible-or-owned gate.
    async fn visible_item(&self, caller_id: &str, item_id: &str) -> Result<Item, AppError> {
        let item = self
            .items
            .get_item_record(item_id)
            .await?
            .ok_or_else(|| AppError::not_found("item", item_id))?;
        if !item.is_visible && item.user_id != caller_id {
            return Err(AppError::not_found("item", item_id));
        }
        Ok(item)
    }
}

fn format_price(cents: i64) -> String {
    format!("${}.{:02}", cents / 100, cents % 100)
}

use crate::domain::entities::{Interaction, Item, ItemInfo, Offer, OfferResponse, User};
use crate::domain::value_objects::{Coordinates, ItemQuery};
use crate::shared::config::PricingPolicy;
use crate::shared::error::AppError;
use async_trait::async_trait;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(&self, user: &User) -> Result<(), AppError>;
    async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError>;
    async fn update_user(&self, user: &User) -> Result<(), AppError>;
    async fn set_push_token(&self, user_id: &str, token: Option<&str>) -> Result<(), AppError>;
}

#[async_trait]
pub trait ItemRepository: Send + Sync {
    async fn create_item(&self, item: &Item) -> Result<(), AppError>;

    /// Rewrites descriptive and derived fields; counters and the price
    /// ladder are owned by the pricing statements and left untouched.
    async fn update_item(&self, item: &Item) -> Result<(), AppError>;

    /// Resets `min_price = last_price = current_price` to a new floor,
    /// guarded in-store against any active like appearing concurrently.
    async fn reset_price_floor(&self, item_id: &str, min_price: i64) -> Result<(), AppError>;

    async fn delete_item(&self, item_id: &str) -> Result<(), AppError>;

    /// Raw row without the viewer join or visibility gate; internal use.
    async fn get_item_record(&self, item_id: &str) -> Result<Option<Item>, AppError>;

    /// Single item with the viewer's interaction state; gated to items that
    /// are visible or owned by the viewer.
    async fn get_item(
        &self,
        viewer_id: &str,
        item_id: &str,
        origin: Option<Coordinates>,
    ) -> Result<Option<ItemInfo>, AppError>;

    /// Items by id set. With `bypass_visibility` the visible-or-owned gate is
    /// skipped (offer manifest reconstruction); invisible items are silently
    /// dropped otherwise.
    async fn get_items_by_ids(
        &self,
        viewer_id: &str,
        item_ids: &[String],
        origin: Option<Coordinates>,
        bypass_visibility: bool,
    ) -> Result<Vec<ItemInfo>, AppError>;

    async fn get_user_items(
        &self,
        viewer_id: &str,
        owner_id: &str,
        origin: Option<Coordinates>,
    ) -> Result<Vec<ItemInfo>, AppError>;

    /// Items the viewer currently holds a like on.
    async fn get_liked_items(
        &self,
        viewer_id: &str,
        origin: Option<Coordinates>,
    ) -> Result<Vec<ItemInfo>, AppError>;

    /// The filter/search engine. Ordering and the result limit are applied
    /// per the query; `is_visible = true` is always force-applied.
    async fn get_filtered_items(
        &self,
        viewer_id: &str,
        query: &ItemQuery,
        origin: Option<Coordinates>,
    ) -> Result<Vec<ItemInfo>, AppError>;

    /// Stamps the viewer's `view_time` and bumps `view_count` for each item,
    /// in one transaction. Callers are expected to have excluded the
    /// viewer's own items.
    async fn record_views(
        &self,
        viewer_id: &str,
        item_ids: &[String],
        now: i64,
    ) -> Result<(), AppError>;
}

/// Result of a like mutation. When `changed` is false the caller already
/// held the top bid and nothing moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeOutcome {
    pub changed: bool,
    pub like_time: i64,
    pub like_price: i64,
    pub last_price: i64,
    pub current_price: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnlikeOutcome {
    pub last_price: i64,
    pub current_price: i64,
}

#[async_trait]
pub trait InteractionRepository: Send + Sync {
    /// The like transaction: ledger upsert plus the item price/count update
    /// commit together or not at all.
    async fn apply_like(
        &self,
        user_id: &str,
        item_id: &str,
        policy: &PricingPolicy,
        now: i64,
    ) -> Result<LikeOutcome, AppError>;

    /// The unlike transaction with the ladder rollback rule.
    async fn apply_unlike(
        &self,
        user_id: &str,
        item_id: &str,
    ) -> Result<UnlikeOutcome, AppError>;

    /// Sets the favorite stamp; returns false when it was already set.
    async fn set_favorite(&self, user_id: &str, item_id: &str, now: i64)
        -> Result<bool, AppError>;

    /// Clears the favorite stamp; returns false when none was set.
    async fn clear_favorite(&self, user_id: &str, item_id: &str) -> Result<bool, AppError>;

    /// Active likes for an item, highest lock-in price first.
    async fn get_active_likes(&self, item_id: &str) -> Result<Vec<Interaction>, AppError>;

    async fn get_interaction(
        &self,
        user_id: &str,
        item_id: &str,
    ) -> Result<Option<Interaction>, AppError>;
}

#[async_trait]
pub trait OfferRepository: Send + Sync {
    /// Persists the offer row and its item manifest atomically.
    async fn create_offer(&self, offer: &Offer, item_ids: &[String]) -> Result<(), AppError>;

    async fn get_offer(&self, offer_id: &str) -> Result<Option<Offer>, AppError>;
    async fn get_offers_with_user(&self, user_id: &str) -> Result<Vec<Offer>, AppError>;
    async fn get_offers_with_item(&self, item_id: &str) -> Result<Vec<Offer>, AppError>;
    async fn get_offer_item_ids(&self, offer_id: &str) -> Result<Vec<String>, AppError>;

    /// Stamps a response on a still-pending offer; a concurrent response
    /// surfaces as `Conflict`.
    async fn record_response(
        &self,
        offer_id: &str,
        response: OfferResponse,
        response_time: i64,
        exchange_id: Option<&str>,
    ) -> Result<(), AppError>;

    /// Atomically rejects the pending original, links it forward, and
    /// persists the superseding offer with its manifest.
    async fn record_counter(
        &self,
        original_id: &str,
        counter: &Offer,
        item_ids: &[String],
        response_time: i64,
    ) -> Result<(), AppError>;
}

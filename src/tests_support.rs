//! Mock ports shared by service unit tests.

use crate::application::ports::notifications::{PushMessage, PushSender};
use crate::application::ports::repositories::{
    InteractionRepository, ItemRepository, LikeOutcome, OfferRepository, UnlikeOutcome,
    UserRepository,
};
use crate::domain::entities::{Interaction, Item, ItemInfo, Offer, OfferResponse, User};
use crate::domain::value_objects::{Coordinates, ItemQuery};
use crate::shared::config::PricingPolicy;
use crate::shared::error::AppError;
use async_trait::async_trait;
use mockall::mock;

mock! {
    pub UsersRepo {}

    #[async_trait]
    impl UserRepository for UsersRepo {
        async fn create_user(&self, user: &User) -> Result<(), AppError>;
        async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError>;
        async fn update_user(&self, user: &User) -> Result<(), AppError>;
        async fn set_push_token<'a, 'b, 'c>(&'a self, user_id: &'b str, token: Option<&'c str>) -> Result<(), AppError>;
    }
}

mock! {
    pub Items {}

    #[async_trait]
    impl ItemRepository for Items {
        async fn create_item(&self, item: &Item) -> Result<(), AppError>;
        async fn update_item(&self, item: &Item) -> Result<(), AppError>;
        async fn reset_price_floor(&self, item_id: &str, min_price: i64) -> Result<(), AppError>;
        async fn delete_item(&self, item_id: &str) -> Result<(), AppError>;
        async fn get_item_record(&self, item_id: &str) -> Result<Option<Item>, AppError>;
        async fn get_item(
            &self,
            viewer_id: &str,
            item_id: &str,
            origin: Option<Coordinates>,
        ) -> Result<Option<ItemInfo>, AppError>;
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
        async fn get_liked_items(
            &self,
            viewer_id: &str,
            origin: Option<Coordinates>,
        ) -> Result<Vec<ItemInfo>, AppError>;
        async fn get_filtered_items(
            &self,
            viewer_id: &str,
            query: &ItemQuery,
            origin: Option<Coordinates>,
        ) -> Result<Vec<ItemInfo>, AppError>;
        async fn record_views(
            &self,
            viewer_id: &str,
            item_ids: &[String],
            now: i64,
        ) -> Result<(), AppError>;
    }
}

mock! {
    pub InteractionsRepo {}

    #[async_trait]
    impl InteractionRepository for InteractionsRepo {
        async fn apply_like(
            &self,
            user_id: &str,
            item_id: &str,
            policy: &PricingPolicy,
            now: i64,
        ) -> Result<LikeOutcome, AppError>;
        async fn apply_unlike(
            &self,
            user_id: &str,
            item_id: &str,
        ) -> Result<UnlikeOutcome, AppError>;
        async fn set_favorite(
            &self,
            user_id: &str,
            item_id: &str,
            now: i64,
        ) -> Result<bool, AppError>;
        async fn clear_favorite(&self, user_id: &str, item_id: &str) -> Result<bool, AppError>;
        async fn get_active_likes(&self, item_id: &str) -> Result<Vec<Interaction>, AppError>;
        async fn get_interaction(
            &self,
            user_id: &str,
            item_id: &str,
        ) -> Result<Option<Interaction>, AppError>;
    }
}

mock! {
    pub Offers {}

    #[async_trait]
    impl OfferRepository for Offers {
        async fn create_offer(&self, offer: &Offer, item_ids: &[String]) -> Result<(), AppError>;
        async fn get_offer(&self, offer_id: &str) -> Result<Option<Offer>, AppError>;
        async fn get_offers_with_user(&self, user_id: &str) -> Result<Vec<Offer>, AppError>;
        async fn get_offers_with_item(&self, item_id: &str) -> Result<Vec<Offer>, AppError>;
        async fn get_offer_item_ids(&self, offer_id: &str) -> Result<Vec<String>, AppError>;
        async fn record_response<'a, 'b, 'c>(
            &'a self,
            offer_id: &'b str,
            response: OfferResponse,
            response_time: i64,
            exchange_id: Option<&'c str>,
        ) -> Result<(), AppError>;
        async fn record_counter(
            &self,
            original_id: &str,
            counter: &Offer,
            item_ids: &[String],
            response_time: i64,
        ) -> Result<(), AppError>;
    }
}

/// A sender that accepts everything; notification paths under test only
/// need to not explode.
pub struct NullSender;

#[async_trait]
impl PushSender for NullSender {
    async fn send(&self, _message: &PushMessage) -> Result<(), AppError> {
        Ok(())
    }
}

pub fn mock_users() -> MockUsersRepo {
    MockUsersRepo::new()
}

pub fn mock_items() -> MockItems {
    MockItems::new()
}

pub fn mock_interactions() -> MockInteractionsRepo {
    MockInteractionsRepo::new()
}

pub fn mock_offers() -> MockOffers {
    MockOffers::new()
}

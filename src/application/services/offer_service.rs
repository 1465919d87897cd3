use crate::application::ports::repositories::{ItemRepository, OfferRepository, UserRepository};
use crate::application::services::notifier::NotificationService;
use crate::domain::entities::offer::{Offer, OfferInfo, OfferResponse};
use crate::domain::entities::{Item, ItemInfo};
use crate::shared::error::AppError;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Payload of a new offer from the caller to `to_id`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SendOfferRequest {
    #[serde(rename = "toID")]
    pub to_id: String,
    #[serde(rename = "fromItemIDs")]
    pub from_item_ids: Vec<String>,
    #[serde(rename = "toItemIDs")]
    pub to_item_ids: Vec<String>,
    pub from_payment: i64,
    pub to_payment: i64,
}

/// Payload of a counter-offer; the recipient is the original's other party.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CounterOfferRequest {
    #[serde(rename = "fromItemIDs")]
    pub from_item_ids: Vec<String>,
    #[serde(rename = "toItemIDs")]
    pub to_item_ids: Vec<String>,
    pub from_payment: i64,
    pub to_payment: i64,
}

/// The `pending -> {accepted, rejected}` state machine plus counter-offer
/// links, and the three enriched offer queries.
pub struct OfferService {
    offers: Arc<dyn OfferRepository>,
    items: Arc<dyn ItemRepository>,
    users: Arc<dyn UserRepository>,
    notifications: Arc<NotificationService>,
}

impl OfferService {
    pub fn new(
        offers: Arc<dyn OfferRepository>,
        items: Arc<dyn ItemRepository>,
        users: Arc<dyn UserRepository>,
        notifications: Arc<NotificationService>,
    ) -> Self {
        Self {
            offers,
            items,
            users,
            notifications,
        }
    }

    pub async fn send_offer(
        &self,
        caller_id: &str,
        request: SendOfferRequest,
    ) -> Result<Offer, AppError> {
        if request.to_id == caller_id {
            return Err(AppError::invalid_input("Cannot send an offer to yourself"));
        }
        self.users
            .get_user(&request.to_id)
            .await?
            .ok_or_else(|| AppError::not_found("user", &request.to_id))?;

        let manifest = self
            .validate_manifest(
                caller_id,
                &request.to_id,
                &request.from_item_ids,
                &request.to_item_ids,
                request.from_payment,
                request.to_payment,
            )
            .await?;

        let now = Utc::now().timestamp_millis();
        let offer = Offer::new(
            Uuid::new_v4().to_string(),
            caller_id,
            request.to_id.clone(),
            request.from_payment,
            request.to_payment,
            now,
        );
        let item_ids: Vec<String> = request
            .from_item_ids
            .iter()
            .chain(request.to_item_ids.iter())
            .cloned()
            .collect();
        self.offers.create_offer(&offer, &item_ids).await?;
        info!(offer_id = %offer.offer_id, from = %caller_id, to = %request.to_id, "offer sent");

        self.notifications.notify_later(
            &request.to_id,
            "You received a new offer!".to_string(),
            manifest.first_image,
        );
        Ok(offer)
    }

    /// Reject as the recipient, cancel as the sender; either way the offer
    /// must still be pending.
    pub async fn reject_offer(&self, caller_id: &str, offer_id: &str) -> Result<Offer, AppError> {
        let mut offer = self.pending_offer_for_party(caller_id, offer_id).await?;
        let now = Utc::now().timestamp_millis();
        self.offers
            .record_response(offer_id, OfferResponse::Rejected, now, None)
            .await?;
        offer.response_type = Some(OfferResponse::Rejected);
        offer.response_time = Some(now);

        let (target, message) = if offer.from_id == caller_id {
            (offer.to_id.clone(), "An offer to you was cancelled.")
        } else {
            (offer.from_id.clone(), "Your offer was rejected.")
        };
        self.notifications
            .notify_later(&target, message.to_string(), None);
        Ok(offer)
    }

    /// Recipient-only and terminal: stamps the response and a fresh
    /// exchange id.
    pub async fn accept_offer(&self, caller_id: &str, offer_id: &str) -> Result<Offer, AppError> {
        let mut offer = self
            .offers
            .get_offer(offer_id)
            .await?
            .ok_or_else(|| AppError::not_found("offer", offer_id))?;
        if offer.to_id != caller_id {
            return Err(AppError::unauthorized(format!(
                "Only the recipient can accept offer {offer_id}"
            )));
        }
        if !offer.is_pending() {
            return Err(AppError::invalid_input(format!(
                "Offer {offer_id} has already been responded to"
            )));
        }
        let now = Utc::now().timestamp_millis();
        let exchange_id = Uuid::new_v4().to_string();
        self.offers
            .record_response(offer_id, OfferResponse::Accepted, now, Some(&exchange_id))
            .await?;
        offer.response_type = Some(OfferResponse::Accepted);
        offer.response_time = Some(now);
        offer.exchange_id = Some(exchange_id);
        info!(offer_id = %offer_id, "offer accepted");

        self.notifications.notify_later(
            &offer.from_id,
            "Your offer was accepted!".to_string(),
            None,
        );
        Ok(offer)
    }

    /// Rejects the pending original and supersedes it with a new pending
    /// offer from the caller, linked via `counter_offer_id`.
    pub async fn counter_offer(
        &self,
        caller_id: &str,
        offer_id: &str,
        request: CounterOfferRequest,
    ) -> Result<Offer, AppError> {
        let original = self.pending_offer_for_party(caller_id, offer_id).await?;
        let other_party = original
            .other_party(caller_id)
            .unwrap_or_default()
            .to_string();

        self.validate_manifest(
            caller_id,
            &other_party,
            &request.from_item_ids,
            &request.to_item_ids,
            request.from_payment,
            request.to_payment,
        )
        .await?;

        let now = Utc::now().timestamp_millis();
        let counter = Offer::new(
            Uuid::new_v4().to_string(),
            caller_id,
            other_party.clone(),
            request.from_payment,
            request.to_payment,
            now,
        );
        let item_ids: Vec<String> = request
            .from_item_ids
            .iter()
            .chain(request.to_item_ids.iter())
            .cloned()
            .collect();
        self.offers
            .record_counter(offer_id, &counter, &item_ids, now)
            .await?;
        info!(offer_id = %offer_id, counter_id = %counter.offer_id, "offer countered");

        self.notifications.notify_later(
            &other_party,
            "You received a counter-offer!".to_string(),
            None,
        );
        Ok(counter)
    }

    pub async fn get_offers_by_ids(
        &self,
        caller_id: &str,
        offer_ids: &[String],
    ) -> Result<Vec<OfferInfo>, AppError> {
        let mut infos = Vec::with_capacity(offer_ids.len());
        for offer_id in offer_ids {
            let offer = self
                .offers
                .get_offer(offer_id)
                .await?
                .ok_or_else(|| AppError::not_found("offer", offer_id))?;
            if !offer.is_party(caller_id) {
                return Err(AppError::unauthorized(format!(
                    "User {caller_id} is not a party to offer {offer_id}"
                )));
            }
            infos.push(self.enrich(caller_id, offer).await?);
        }
        Ok(infos)
    }

    pub async fn get_offers_with_user(&self, caller_id: &str) -> Result<Vec<OfferInfo>, AppError> {
        let offers = self.offers.get_offers_with_user(caller_id).await?;
        let mut infos = Vec::with_capacity(offers.len());
        for offer in offers {
            infos.push(self.enrich(caller_id, offer).await?);
        }
        Ok(infos)
    }

    pub async fn get_offers_with_item(
        &self,
        caller_id: &str,
        item_id: &str,
    ) -> Result<Vec<OfferInfo>, AppError> {
        let offers = self.offers.get_offers_with_item(item_id).await?;
        let mut infos = Vec::new();
        for offer in offers {
            if !offer.is_party(caller_id) {
                continue;
            }
            infos.push(self.enrich(caller_id, offer).await?);
        }
        Ok(infos)
    }

    /// Rebuilds the enriched shape: both manifests with the caller's
    /// interaction state, never counting views (this is reconstruction, not
    /// browsing).
    async fn enrich(&self, caller_id: &str, offer: Offer) -> Result<OfferInfo, AppError> {
        let item_ids = self.offers.get_offer_item_ids(&offer.offer_id).await?;
        let infos = self
            .items
            .get_items_by_ids(caller_id, &item_ids, None, true)
            .await?;
        let mut from_items: Vec<ItemInfo> = Vec::new();
        let mut to_items: Vec<ItemInfo> = Vec::new();
        for info in infos {
            if info.item.user_id == offer.from_id {
                from_items.push(info);
            } else if info.item.user_id == offer.to_id {
                to_items.push(info);
            }
            // Items whose ownership moved since the offer was drawn up are
            // attributable to neither side and are dropped.
        }
        Ok(OfferInfo {
            offer,
            from_items,
            to_items,
        })
    }

    async fn pending_offer_for_party(
        &self,
        caller_id: &str,
        offer_id: &str,
    ) -> Result<Offer, AppError> {
        let offer = self
            .offers
            .get_offer(offer_id)
            .await?
            .ok_or_else(|| AppError::not_found("offer", offer_id))?;
        if !offer.is_party(caller_id) {
            return Err(AppError::unauthorized(format!(
                "User {caller_id} is not a party to offer {offer_id}"
            )));
        }
        if !offer.is_pending() {
            return Err(AppError::invalid_input(format!(
                "Offer {offer_id} has already been responded to"
            )));
        }
        Ok(offer)
    }

    /// Fails fast on payment or ownership violations before anything is
    /// written.
    async fn validate_manifest(
        &self,
        from_id: &str,
        to_id: &str,
        from_item_ids: &[String],
        to_item_ids: &[String],
        from_payment: i64,
        to_payment: i64,
    ) -> Result<ValidatedManifest, AppError> {
        if from_payment < 0 || to_payment < 0 {
            return Err(AppError::invalid_input("Payment amounts cannot be negative"));
        }
        if from_item_ids.is_empty() && to_item_ids.is_empty() {
            return Err(AppError::invalid_input("Offer contains no items"));
        }
        let mut seen: HashSet<&str> = HashSet::new();
        for item_id in from_item_ids.iter().chain(to_item_ids.iter()) {
            if !seen.insert(item_id.as_str()) {
                return Err(AppError::invalid_input(format!(
                    "Item {item_id} appears more than once in the offer"
                )));
            }
        }

        let from_items = self.owned_items(from_item_ids, from_id).await?;
        self.owned_items(to_item_ids, to_id).await?;

        let first_image = from_items
            .iter()
            .find_map(|item| item.images.first().cloned());
        Ok(ValidatedManifest { first_image })
    }

    async fn owned_items(&self, item_ids: &[String], owner_id: &str) -> Result<Vec<Item>, AppError> {
        let mut items = Vec::with_capacity(item_ids.len());
        for item_id in item_ids {
            let item = self
                .items
                .get_item_record(item_id)
                .await?
                .ok_or_else(|| AppError::not_found("item", item_id))?;
            if item.user_id != owner_id {
                return Err(AppError::invalid_input(format!(
                    "Item {item_id} is not owned by user {owner_id}"
                )));
            }
            items.push(item);
        }
        Ok(items)
    }
}

struct ValidatedManifest {
    first_image: Option<String>,
}

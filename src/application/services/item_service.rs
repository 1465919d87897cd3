use crate::application::ports::repositories::{
    InteractionRepository, ItemRepository, UserRepository,
};
use crate::domain::entities::item::{Item, ItemDraft, ItemInfo};
use crate::domain::value_objects::{Coordinates, ItemFilterRequest};
use crate::shared::error::AppError;
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

/// Catalog CRUD plus the discovery queries. Every item-returning query goes
/// out enriched with the caller's interaction state, and browsing someone
/// else's items silently stamps a view.
pub struct ItemService {
    users: Arc<dyn UserRepository>,
    items: Arc<dyn ItemRepository>,
    interactions: Arc<dyn InteractionRepository>,
}

impl ItemService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        items: Arc<dyn ItemRepository>,
        interactions: Arc<dyn InteractionRepository>,
    ) -> Self {
        Self {
            users,
            items,
            interactions,
        }
    }

    pub async fn create_item(&self, caller_id: &str, draft: ItemDraft) -> Result<Item, AppError> {
        if draft.min_price < 0 {
            return Err(AppError::invalid_input("Minimum price cannot be negative"));
        }
        let owner = self
            .users
            .get_user(caller_id)
            .await?
            .ok_or_else(|| AppError::not_found("user", caller_id))?;
        if !owner.coordinates().is_valid() {
            return Err(AppError::invalid_input(format!(
                "User {caller_id} has an invalid location"
            )));
        }
        let item = Item::new(&owner, draft);
        self.items.create_item(&item).await?;
        info!(item_id = %item.item_id, user_id = %caller_id, "item created");
        Ok(item)
    }

    /// Owner-only full update. The floor price may only move while no likes
    /// are active, in which case the whole ladder resets to it.
    pub async fn update_item(
        &self,
        caller_id: &str,
        item_id: &str,
        draft: ItemDraft,
    ) -> Result<Item, AppError> {
        if draft.min_price < 0 {
            return Err(AppError::invalid_input("Minimum price cannot be negative"));
        }
        let mut item = self
            .items
            .get_item_record(item_id)
            .await?
            .ok_or_else(|| AppError::not_found("item", item_id))?;
        if item.user_id != caller_id {
            return Err(AppError::unauthorized(format!(
                "User {caller_id} does not own item {item_id}"
            )));
        }
        let owner = self
            .users
            .get_user(caller_id)
            .await?
            .ok_or_else(|| AppError::not_found("user", caller_id))?;
        if !owner.coordinates().is_valid() {
            return Err(AppError::invalid_input(format!(
                "User {caller_id} has an invalid location"
            )));
        }

        if draft.min_price != item.min_price {
            let active = self.interactions.get_active_likes(item_id).await?;
            if !active.is_empty() {
                return Err(AppError::invalid_input(format!(
                    "Cannot change the floor price of item {item_id} while it has active likes"
                )));
            }
            // The store re-checks the no-active-likes condition inside the
            // statement, so a like racing this edit loses cleanly.
            self.items.reset_price_floor(item_id, draft.min_price).await?;
            item.min_price = draft.min_price;
            item.last_price = draft.min_price;
            item.current_price = draft.min_price;
        }
        item.apply_draft(&owner, draft);
        self.items.update_item(&item).await?;
        Ok(item)
    }

    pub async fn delete_item(&self, caller_id: &str, item_id: &str) -> Result<(), AppError> {
        let item = self
            .items
            .get_item_record(item_id)
            .await?
            .ok_or_else(|| AppError::not_found("item", item_id))?;
        if item.user_id != caller_id {
            return Err(AppError::unauthorized(format!(
                "User {caller_id} does not own item {item_id}"
            )));
        }
        self.items.delete_item(item_id).await?;
        info!(item_id = %item_id, "item deleted");
        Ok(())
    }

    pub async fn get_item(
        &self,
        caller_id: &str,
        item_id: &str,
        origin: Option<Coordinates>,
    ) -> Result<ItemInfo, AppError> {
        let info = self
            .items
            .get_item(caller_id, item_id, origin)
            .await?
            .ok_or_else(|| AppError::not_found("item", item_id))?;
        self.track_views(caller_id, std::slice::from_ref(&info)).await?;
        Ok(info)
    }

    pub async fn get_items(
        &self,
        caller_id: &str,
        item_ids: &[String],
        origin: Option<Coordinates>,
    ) -> Result<Vec<ItemInfo>, AppError> {
        let infos = self
            .items
            .get_items_by_ids(caller_id, item_ids, origin, false)
            .await?;
        self.track_views(caller_id, &infos).await?;
        Ok(infos)
    }

    pub async fn get_user_items(
        &self,
        caller_id: &str,
        target_user_id: &str,
        origin: Option<Coordinates>,
    ) -> Result<Vec<ItemInfo>, AppError> {
        let infos = self
            .items
            .get_user_items(caller_id, target_user_id, origin)
            .await?;
        self.track_views(caller_id, &infos).await?;
        Ok(infos)
    }

    pub async fn get_liked_items(
        &self,
        caller_id: &str,
        origin: Option<Coordinates>,
    ) -> Result<Vec<ItemInfo>, AppError> {
        let infos = self.items.get_liked_items(caller_id, origin).await?;
        self.track_views(caller_id, &infos).await?;
        Ok(infos)
    }

    pub async fn get_filtered_items(
        &self,
        caller_id: &str,
        request: ItemFilterRequest,
        origin: Option<Coordinates>,
    ) -> Result<Vec<ItemInfo>, AppError> {
        let query = request.into_query();
        if query.needs_coordinates() && origin.is_none() {
            return Err(AppError::invalid_input(
                "Filter has a distance but no coordinates were given",
            ));
        }
        let infos = self
            .items
            .get_filtered_items(caller_id, &query, origin)
            .await?;
        self.track_views(caller_id, &infos).await?;
        Ok(infos)
    }

    /// Stamps views for every returned item the caller does not own.
    async fn track_views(&self, caller_id: &str, infos: &[ItemInfo]) -> Result<(), AppError> {
        let viewed: Vec<String> = infos
            .iter()
            .filter(|info| info.item.user_id != caller_id)
            .map(|info| info.item.item_id.clone())
            .collect();
        if viewed.is_empty() {
            return Ok(());
        }
        let now = Utc::now().timestamp_millis();
        self.items.record_views(caller_id, &viewed, now).await
    }
}

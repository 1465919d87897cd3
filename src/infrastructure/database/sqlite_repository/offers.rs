use super::mapper::map_offer_row;
use super::queries::{
    INSERT_OFFER, INSERT_OFFER_ITEM, RECORD_OFFER_RESPONSE, REJECT_FOR_COUNTER, SELECT_OFFERS_WITH_ITEM,
    SELECT_OFFERS_WITH_USER, SELECT_OFFER_BY_ID, SELECT_OFFER_ITEM_IDS,
};
use super::SqliteRepository;
use crate::application::ports::repositories::OfferRepository;
use crate::domain::entities::offer::{Offer, OfferResponse};
use crate::shared::error::AppError;
use async_trait::async_trait;
use sqlx::Row;

#[async_trait]
impl OfferRepository for SqliteRepository {
    async fn create_offer(&self, offer: &Offer, item_ids: &[String]) -> Result<(), AppError> {
        let mut tx = self.pool.get_pool().begin().await?;
        sqlx::query(INSERT_OFFER)
            .bind(&offer.offer_id)
            .bind(&offer.from_id)
            .bind(&offer.to_id)
            .bind(offer.from_payment)
            .bind(offer.to_payment)
            .bind(offer.offer_time)
            .execute(&mut *tx)
            .await?;
        for item_id in item_ids {
            sqlx::query(INSERT_OFFER_ITEM)
                .bind(&offer.offer_id)
                .bind(item_id)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn get_offer(&self, offer_id: &str) -> Result<Option<Offer>, AppError> {
        let row = sqlx::query(SELECT_OFFER_BY_ID)
            .bind(offer_id)
            .fetch_optional(self.pool.get_pool())
            .await?;
        match row {
            Some(row) => Ok(Some(map_offer_row(&row)?)),
            None => Ok(None),
        }
    }

    async fn get_offers_with_user(&self, user_id: &str) -> Result<Vec<Offer>, AppError> {
        let rows = sqlx::query(SELECT_OFFERS_WITH_USER)
            .bind(user_id)
            .fetch_all(self.pool.get_pool())
            .await?;
        rows.iter().map(map_offer_row).collect()
    }

    async fn get_offers_with_item(&self, item_id: &str) -> Result<Vec<Offer>, AppError> {
        let rows = sqlx::query(SELECT_OFFERS_WITH_ITEM)
            .bind(item_id)
            .fetch_all(self.pool.get_pool())
            .await?;
        rows.iter().map(map_offer_row).collect()
    }

    async fn get_offer_item_ids(&self, offer_id: &str) -> Result<Vec<String>, AppError> {
        let rows = sqlx::query(SELECT_OFFER_ITEM_IDS)
            .bind(offer_id)
            .fetch_all(self.pool.get_pool())
            .await?;
        let mut ids = Vec::with_capacity(rows.len());
        for row in rows {
            ids.push(row.try_get("item_id")?);
        }
        Ok(ids)
    }

    async fn record_response(
        &self,
        offer_id: &str,
        response: OfferResponse,
        response_time: i64,
        exchange_id: Option<&str>,
    ) -> Result<(), AppError> {
        let result = sqlx::query(RECORD_OFFER_RESPONSE)
            .bind(offer_id)
            .bind(response.as_str())
            .bind(response_time)
            .bind(exchange_id)
            .execute(self.pool.get_pool())
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::conflict(format!(
                "Offer {offer_id} was already responded to"
            )));
        }
        Ok(())
    }

    async fn record_counter(
        &self,
        original_id: &str,
        counter: &Offer,
        item_ids: &[String],
        response_time: i64,
    ) -> Result<(), AppError> {
        let mut tx = self.pool.get_pool().begin().await?;
        let rejected = sqlx::query(REJECT_FOR_COUNTER)
            .bind(original_id)
            .bind(response_time)
            .bind(&counter.offer_id)
            .execute(&mut *tx)
            .await?;
        if rejected.rows_affected() == 0 {
            return Err(AppError::conflict(format!(
                "Offer {original_id} was already responded to"
            )));
        }
        sqlx::query(INSERT_OFFER)
            .bind(&counter.offer_id)
            .bind(&counter.from_id)
            .bind(&counter.to_id)
            .bind(counter.from_payment)
            .bind(counter.to_payment)
            .bind(counter.offer_time)
            .execute(&mut *tx)
            .await?;
        for item_id in item_ids {
            sqlx::query(INSERT_OFFER_ITEM)
                .bind(&counter.offer_id)
                .bind(item_id)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }
}

use super::mapper::map_interaction_row;
use super::queries::{
    APPLY_LIKE_TO_ITEM, APPLY_UNLIKE_TO_ITEM, BUMP_FAV_COUNT, CLEAR_FAVORITE, CLEAR_LIKE,
    SELECT_ACTIVE_LIKES, SELECT_INTERACTION, SELECT_ITEM_LADDER, UPSERT_FAVORITE, UPSERT_LIKE,
};
use super::SqliteRepository;
use crate::application::ports::repositories::{InteractionRepository, LikeOutcome, UnlikeOutcome};
use crate::domain::entities::Interaction;
use crate::domain::pricing::{self, ActiveLike, PriceRollback};
use crate::shared::config::PricingPolicy;
use crate::shared::error::AppError;
use async_trait::async_trait;
use sqlx::{Row, Sqlite, Transaction};

struct ItemLadder {
    min_price: i64,
    last_price: i64,
    current_price: i64,
}

async fn fetch_ladder(
    tx: &mut Transaction<'_, Sqlite>,
    item_id: &str,
) -> Result<ItemLadder, AppError> {
    let row = sqlx::query(SELECT_ITEM_LADDER)
        .bind(item_id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| AppError::not_found("item", item_id))?;
    Ok(ItemLadder {
        min_price: row.try_get("min_price")?,
        last_price: row.try_get("last_price")?,
        current_price: row.try_get("current_price")?,
    })
}

/// Active likes inside the transaction, highest lock-in price first.
async fn fetch_active_likes(
    tx: &mut Transaction<'_, Sqlite>,
    item_id: &str,
) -> Result<Vec<ActiveLike>, AppError> {
    let rows = sqlx::query(SELECT_ACTIVE_LIKES)
        .bind(item_id)
        .fetch_all(&mut **tx)
        .await?;
    let mut likes = Vec::with_capacity(rows.len());
    for row in rows {
        let like_time: Option<i64> = row.try_get("like_time")?;
        let like_price: Option<i64> = row.try_get("like_price")?;
        // The ledger invariant says these are set together; a row that
        // violates it would corrupt the ladder, so fail loudly.
        let (Some(like_time), Some(like_price)) = (like_time, like_price) else {
            return Err(AppError::Internal(format!(
                "Ledger row for item {item_id} has a like without a price"
            )));
        };
        likes.push(ActiveLike {
            user_id: row.try_get("user_id")?,
            like_time,
            like_price,
        });
    }
    Ok(likes)
}

#[async_trait]
impl InteractionRepository for SqliteRepository {
    async fn apply_like(
        &self,
        user_id: &str,
        item_id: &str,
        policy: &PricingPolicy,
        now: i64,
    ) -> Result<LikeOutcome, AppError> {
        let mut tx = self.pool.get_pool().begin().await?;
        let ladder = fetch_ladder(&mut tx, item_id).await?;
        let likes = fetch_active_likes(&mut tx, item_id).await?;

        // Already the top bidder: idempotent no-op, nothing escalates.
        if pricing::holds_top_bid(user_id, &likes) {
            let top = &likes[0];
            return Ok(LikeOutcome {
                changed: false,
                like_time: top.like_time,
                like_price: top.like_price,
                last_price: ladder.last_price,
                current_price: ladder.current_price,
            });
        }

        let like_price = ladder.current_price;
        let new_current = pricing::increase_price(like_price, policy);

        sqlx::query(UPSERT_LIKE)
            .bind(user_id)
            .bind(item_id)
            .bind(now)
            .bind(like_price)
            .execute(&mut *tx)
            .await?;
        sqlx::query(APPLY_LIKE_TO_ITEM)
            .bind(item_id)
            .bind(like_price)
            .bind(new_current)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(LikeOutcome {
            changed: true,
            like_time: now,
            like_price,
            last_price: like_price,
            current_price: new_current,
        })
    }

    async fn apply_unlike(&self, user_id: &str, item_id: &str) -> Result<UnlikeOutcome, AppError> {
        let mut tx = self.pool.get_pool().begin().await?;
        let ladder = fetch_ladder(&mut tx, item_id).await?;
        let likes = fetch_active_likes(&mut tx, item_id).await?;

        let rollback = pricing::rollback_on_unlike(user_id, &likes).ok_or_else(|| {
            AppError::invalid_input(format!("User {user_id} has no active like on item {item_id}"))
        })?;
        let (last_price, current_price) = match rollback {
            PriceRollback::ResetToFloor => (ladder.min_price, ladder.min_price),
            PriceRollback::StepBack {
                last_price,
                current_price,
            } => (last_price, current_price),
            PriceRollback::Unchanged => (ladder.last_price, ladder.current_price),
        };

        sqlx::query(CLEAR_LIKE)
            .bind(user_id)
            .bind(item_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query(APPLY_UNLIKE_TO_ITEM)
            .bind(item_id)
            .bind(last_price)
            .bind(current_price)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(UnlikeOutcome {
            last_price,
            current_price,
        })
    }

    async fn set_favorite(
        &self,
        user_id: &str,
        item_id: &str,
        now: i64,
    ) -> Result<bool, AppError> {
        let mut tx = self.pool.get_pool().begin().await?;
        let existing = sqlx::query(SELECT_INTERACTION)
            .bind(user_id)
            .bind(item_id)
            .fetch_optional(&mut *tx)
            .await?;
        let already = match &existing {
            Some(row) => row.try_get::<Option<i64>, _>("fav_time")?.is_some(),
            None => false,
        };
        if already {
            return Ok(false);
        }

        sqlx::query(UPSERT_FAVORITE)
            .bind(user_id)
            .bind(item_id)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        sqlx::query(BUMP_FAV_COUNT)
            .bind(item_id)
            .bind(1i64)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(true)
    }

    async fn clear_favorite(&self, user_id: &str, item_id: &str) -> Result<bool, AppError> {
        let mut tx = self.pool.get_pool().begin().await?;
        let existing = sqlx::query(SELECT_INTERACTION)
            .bind(user_id)
            .bind(item_id)
            .fetch_optional(&mut *tx)
            .await?;
        let had_favorite = match &existing {
            Some(row) => row.try_get::<Option<i64>, _>("fav_time")?.is_some(),
            None => false,
        };
        if !had_favorite {
            return Ok(false);
        }

        sqlx::query(CLEAR_FAVORITE)
            .bind(user_id)
            .bind(item_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query(BUMP_FAV_COUNT)
            .bind(item_id)
            .bind(-1i64)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(true)
    }

    async fn get_active_likes(&self, item_id: &str) -> Result<Vec<Interaction>, AppError> {
        let rows = sqlx::query(SELECT_ACTIVE_LIKES)
            .bind(item_id)
            .fetch_all(self.pool.get_pool())
            .await?;
        rows.iter().map(map_interaction_row).collect()
    }

    async fn get_interaction(
        &self,
        user_id: &str,
        item_id: &str,
    ) -> Result<Option<Interaction>, AppError> {
        let row = sqlx::query(SELECT_INTERACTION)
            .bind(user_id)
            .bind(item_id)
            .fetch_optional(self.pool.get_pool())
            .await?;
        match row {
            Some(row) => Ok(Some(map_interaction_row(&row)?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_util::{repository, seed_item, seed_user};
    use super::*;
    use crate::application::ports::repositories::ItemRepository;
    use crate::domain::pricing::replay_ladder;

    fn policy() -> PricingPolicy {
        PricingPolicy::default()
    }

    async fn ladder_of(repo: &SqliteRepository, item_id: &str) -> (i64, i64, i64, i64) {
        let item = repo.get_item_record(item_id).await.unwrap().unwrap();
        (
            item.min_price,
            item.last_price,
            item.current_price,
            item.like_count,
        )
    }

    #[tokio::test]
    async fn first_like_takes_the_dollar_branch() {
        let repo = repository().await;
        let seller = seed_user(&repo, "seller", 43.65, -79.38).await;
        seed_user(&repo, "a", 43.66, -79.39).await;
        let item = seed_item(&repo, &seller, "Denim Jacket", 1000).await;

        let outcome = repo.apply_like("a", &item.item_id, &policy(), 10).await.unwrap();
        assert!(outcome.changed);
        assert_eq!(outcome.like_price, 1000);
        assert_eq!(outcome.last_price, 1000);
        assert_eq!(outcome.current_price, 1250);

        assert_eq!(ladder_of(&repo, &item.item_id).await, (1000, 1000, 1250, 1));
    }

    #[tokio::test]
    async fn top_bidder_relike_is_a_noop() {
        let repo = repository().await;
        let seller = seed_user(&repo, "seller", 43.65, -79.38).await;
        seed_user(&repo, "a", 43.66, -79.39).await;
        let item = seed_item(&repo, &seller, "Denim Jacket", 1000).await;

        let first = repo.apply_like("a", &item.item_id, &policy(), 10).await.unwrap();
        let second = repo.apply_like("a", &item.item_id, &policy(), 99).await.unwrap();

        assert!(!second.changed);
        assert_eq!(second.like_time, first.like_time);
        assert_eq!(second.current_price, first.current_price);
        assert_eq!(ladder_of(&repo, &item.item_id).await, (1000, 1000, 1250, 1));
    }

    #[tokio::test]
    async fn second_liker_locks_the_raised_price() {
        let repo = repository().await;
        let seller = seed_user(&repo, "seller", 43.65, -79.38).await;
        seed_user(&repo, "a", 43.66, -79.39).await;
        seed_user(&repo, "b", 43.67, -79.40).await;
        let item = seed_item(&repo, &seller, "Denim Jacket", 1000).await;

        repo.apply_like("a", &item.item_id, &policy(), 10).await.unwrap();
        let outcome = repo.apply_like("b", &item.item_id, &policy(), 20).await.unwrap();

        assert_eq!(outcome.like_price, 1250);
        assert_eq!(outcome.last_price, 1250);
        // max(ceil(1250 * 1.05), 1250 + 250) = max(1313, 1500).
        assert_eq!(outcome.current_price, 1500);
        assert_eq!(ladder_of(&repo, &item.item_id).await, (1000, 1250, 1500, 2));
    }

    #[tokio::test]
    async fn unlike_of_sole_liker_resets_to_floor() {
        let repo = repository().await;
        let seller = seed_user(&repo, "seller", 43.65, -79.38).await;
        seed_user(&repo, "a", 43.66, -79.39).await;
        let item = seed_item(&repo, &seller, "Denim Jacket", 1000).await;

        repo.apply_like("a", &item.item_id, &policy(), 10).await.unwrap();
        let outcome = repo.apply_unlike("a", &item.item_id).await.unwrap();

        assert_eq!(outcome.last_price, 1000);
        assert_eq!(outcome.current_price, 1000);
        assert_eq!(ladder_of(&repo, &item.item_id).await, (1000, 1000, 1000, 0));

        let row = repo.get_interaction("a", &item.item_id).await.unwrap().unwrap();
        assert!(row.like_time.is_none());
        assert!(row.like_price.is_none());
    }

    #[tokio::test]
    async fn unlike_of_non_top_liker_leaves_prices_alone() {
        let repo = repository().await;
        let seller = seed_user(&repo, "seller", 43.65, -79.38).await;
        seed_user(&repo, "a", 43.66, -79.39).await;
        seed_user(&repo, "b", 43.67, -79.40).await;
        let item = seed_item(&repo, &seller, "Denim Jacket", 1000).await;

        repo.apply_like("a", &item.item_id, &policy(), 10).await.unwrap();
        repo.apply_like("b", &item.item_id, &policy(), 20).await.unwrap();
        let outcome = repo.apply_unlike("a", &item.item_id).await.unwrap();

        assert_eq!(outcome.last_price, 1250);
        assert_eq!(outcome.current_price, 1500);
        assert_eq!(ladder_of(&repo, &item.item_id).await, (1000, 1250, 1500, 1));
    }

    #[tokio::test]
    async fn unlike_of_top_liker_steps_the_ladder_back() {
        let repo = repository().await;
        let seller = seed_user(&repo, "seller", 43.65, -79.38).await;
        seed_user(&repo, "a", 43.66, -79.39).await;
        seed_user(&repo, "b", 43.67, -79.40).await;
        let item = seed_item(&repo, &seller, "Denim Jacket", 1000).await;

        repo.apply_like("a", &item.item_id, &policy(), 10).await.unwrap();
        repo.apply_like("b", &item.item_id, &policy(), 20).await.unwrap();
        let outcome = repo.apply_unlike("b", &item.item_id).await.unwrap();

        // B's vacated lock-in becomes current; A's lock-in becomes last.
        assert_eq!(outcome.current_price, 1250);
        assert_eq!(outcome.last_price, 1000);
        assert_eq!(ladder_of(&repo, &item.item_id).await, (1000, 1000, 1250, 1));
    }

    #[tokio::test]
    async fn like_then_unlike_round_trips_exactly() {
        let repo = repository().await;
        let seller = seed_user(&repo, "seller", 43.65, -79.38).await;
        seed_user(&repo, "a", 43.66, -79.39).await;
        let item = seed_item(&repo, &seller, "Denim Jacket", 1000).await;
        let before = ladder_of(&repo, &item.item_id).await;

        repo.apply_like("a", &item.item_id, &policy(), 10).await.unwrap();
        repo.apply_unlike("a", &item.item_id).await.unwrap();

        assert_eq!(ladder_of(&repo, &item.item_id).await, before);
    }

    #[tokio::test]
    async fn unlike_without_a_like_is_invalid() {
        let repo = repository().await;
        let seller = seed_user(&repo, "seller", 43.65, -79.38).await;
        seed_user(&repo, "a", 43.66, -79.39).await;
        let item = seed_item(&repo, &seller, "Denim Jacket", 1000).await;

        let err = repo.apply_unlike("a", &item.item_id).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
        assert_eq!(ladder_of(&repo, &item.item_id).await, (1000, 1000, 1000, 0));
    }

    #[tokio::test]
    async fn item_row_always_matches_the_replayed_ladder() {
        let repo = repository().await;
        let seller = seed_user(&repo, "seller", 43.65, -79.38).await;
        for user in ["a", "b", "c"] {
            seed_user(&repo, user, 43.66, -79.39).await;
        }
        let item = seed_item(&repo, &seller, "Denim Jacket", 1000).await;

        repo.apply_like("a", &item.item_id, &policy(), 10).await.unwrap();
        repo.apply_like("b", &item.item_id, &policy(), 20).await.unwrap();
        repo.apply_like("c", &item.item_id, &policy(), 30).await.unwrap();
        repo.apply_unlike("b", &item.item_id).await.unwrap();

        let likes = fetch_likes(&repo, &item.item_id).await;
        let (last, current) = replay_ladder(1000, &likes, &policy());
        let (_, item_last, item_current, like_count) = ladder_of(&repo, &item.item_id).await;
        assert_eq!((item_last, item_current), (last, current));
        assert_eq!(like_count, 2);
    }

    #[tokio::test]
    async fn relike_after_losing_the_top_locks_the_new_price() {
        let repo = repository().await;
        let seller = seed_user(&repo, "seller", 43.65, -79.38).await;
        seed_user(&repo, "a", 43.66, -79.39).await;
        seed_user(&repo, "b", 43.67, -79.40).await;
        let item = seed_item(&repo, &seller, "Denim Jacket", 1000).await;

        repo.apply_like("a", &item.item_id, &policy(), 10).await.unwrap();
        repo.apply_like("b", &item.item_id, &policy(), 20).await.unwrap();
        // A re-likes at the raised price; the row is overwritten, not
        // duplicated, and the count still steps.
        let outcome = repo.apply_like("a", &item.item_id, &policy(), 30).await.unwrap();

        assert!(outcome.changed);
        assert_eq!(outcome.like_price, 1500);
        let likes = fetch_likes(&repo, &item.item_id).await;
        assert_eq!(likes.len(), 2);
        assert_eq!(likes[0].user_id, "a");
        assert_eq!(likes[0].like_price, 1500);
    }

    #[tokio::test]
    async fn favorites_round_trip_idempotently() {
        let repo = repository().await;
        let seller = seed_user(&repo, "seller", 43.65, -79.38).await;
        seed_user(&repo, "a", 43.66, -79.39).await;
        let item = seed_item(&repo, &seller, "Denim Jacket", 1000).await;

        assert!(repo.set_favorite("a", &item.item_id, 10).await.unwrap());
        assert!(!repo.set_favorite("a", &item.item_id, 20).await.unwrap());
        let record = repo.get_item_record(&item.item_id).await.unwrap().unwrap();
        assert_eq!(record.fav_count, 1);

        assert!(repo.clear_favorite("a", &item.item_id).await.unwrap());
        assert!(!repo.clear_favorite("a", &item.item_id).await.unwrap());
        let record = repo.get_item_record(&item.item_id).await.unwrap().unwrap();
        assert_eq!(record.fav_count, 0);
    }

    async fn fetch_likes(repo: &SqliteRepository, item_id: &str) -> Vec<ActiveLike> {
        repo.get_active_likes(item_id)
            .await
            .unwrap()
            .into_iter()
            .map(|row| ActiveLike {
                user_id: row.user_id,
                like_time: row.like_time.unwrap(),
                like_price: row.like_price.unwrap(),
            })
            .collect()
    }
}

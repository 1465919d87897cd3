use super::mapper::{delivery_methods_json, map_item_info_row, map_item_row, string_list_json};
use super::queries::{
    DELETE_ITEM, INCREMENT_VIEW_COUNT, INSERT_ITEM, ITEMS_WITH_VIEWER_BASE, RESET_PRICE_FLOOR,
    SELECT_ITEMS_BY_OWNER, SELECT_ITEM_BY_ID, SELECT_ITEM_FOR_VIEWER, SELECT_LIKED_ITEMS,
    UPDATE_ITEM, UPSERT_VIEW,
};
use super::SqliteRepository;
use crate::application::ports::repositories::ItemRepository;
use crate::domain::entities::item::{Item, ItemInfo};
use crate::domain::value_objects::item_filter::{ItemFilter, ItemOrdering, ItemQuery};
use crate::domain::value_objects::Coordinates;
use crate::shared::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite};
use std::cmp::Ordering;

#[async_trait]
impl ItemRepository for SqliteRepository {
    async fn create_item(&self, item: &Item) -> Result<(), AppError> {
        let now = Utc::now().timestamp_millis();
        sqlx::query(INSERT_ITEM)
            .bind(&item.item_id)
            .bind(&item.user_id)
            .bind(&item.name)
            .bind(&item.description)
            .bind(item.category.as_str())
            .bind(item.gender.as_str())
            .bind(&item.size)
            .bind(item.fit.as_str())
            .bind(item.condition.as_str())
            .bind(item.min_price)
            .bind(item.last_price)
            .bind(item.current_price)
            .bind(string_list_json(&item.images))
            .bind(&item.country)
            .bind(&item.region)
            .bind(item.latitude)
            .bind(item.longitude)
            .bind(delivery_methods_json(&item.delivery_methods))
            .bind(string_list_json(&item.styles))
            .bind(string_list_json(&item.keywords))
            .bind(item.view_count)
            .bind(item.like_count)
            .bind(item.fav_count)
            .bind(item.is_visible)
            .bind(now)
            .bind(now)
            .execute(self.pool.get_pool())
            .await?;
        Ok(())
    }

    async fn update_item(&self, item: &Item) -> Result<(), AppError> {
        let result = sqlx::query(UPDATE_ITEM)
            .bind(&item.item_id)
            .bind(&item.name)
            .bind(&item.description)
            .bind(item.category.as_str())
            .bind(item.gender.as_str())
            .bind(&item.size)
            .bind(item.fit.as_str())
            .bind(item.condition.as_str())
            .bind(string_list_json(&item.images))
            .bind(&item.country)
            .bind(&item.region)
            .bind(item.latitude)
            .bind(item.longitude)
            .bind(delivery_methods_json(&item.delivery_methods))
            .bind(string_list_json(&item.styles))
            .bind(string_list_json(&item.keywords))
            .bind(item.is_visible)
            .bind(Utc::now().timestamp_millis())
            .execute(self.pool.get_pool())
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found("item", &item.item_id));
        }
        Ok(())
    }

    async fn reset_price_floor(&self, item_id: &str, min_price: i64) -> Result<(), AppError> {
        let result = sqlx::query(RESET_PRICE_FLOOR)
            .bind(item_id)
            .bind(min_price)
            .bind(Utc::now().timestamp_millis())
            .execute(self.pool.get_pool())
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::conflict(format!(
                "Floor price of item {item_id} cannot move while likes are active"
            )));
        }
        Ok(())
    }

    async fn delete_item(&self, item_id: &str) -> Result<(), AppError> {
        let result = sqlx::query(DELETE_ITEM)
            .bind(item_id)
            .execute(self.pool.get_pool())
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found("item", item_id));
        }
        Ok(())
    }

    async fn get_item_record(&self, item_id: &str) -> Result<Option<Item>, AppError> {
        let row = sqlx::query(SELECT_ITEM_BY_ID)
            .bind(item_id)
            .fetch_optional(self.pool.get_pool())
            .await?;
        match row {
            Some(row) => Ok(Some(map_item_row(&row)?)),
            None => Ok(None),
        }
    }

    async fn get_item(
        &self,
        viewer_id: &str,
        item_id: &str,
        origin: Option<Coordinates>,
    ) -> Result<Option<ItemInfo>, AppError> {
        let row = sqlx::query(SELECT_ITEM_FOR_VIEWER)
            .bind(viewer_id)
            .bind(item_id)
            .fetch_optional(self.pool.get_pool())
            .await?;
        match row {
            Some(row) => Ok(Some(map_item_info_row(&row, origin)?)),
            None => Ok(None),
        }
    }

    async fn get_items_by_ids(
        &self,
        viewer_id: &str,
        item_ids: &[String],
        origin: Option<Coordinates>,
        bypass_visibility: bool,
    ) -> Result<Vec<ItemInfo>, AppError> {
        if item_ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(ITEMS_WITH_VIEWER_BASE);
        builder.push_bind(viewer_id);
        builder.push(" WHERE items.item_id IN (");
        {
            let mut separated = builder.separated(", ");
            for item_id in item_ids {
                separated.push_bind(item_id);
            }
        }
        builder.push(")");
        if !bypass_visibility {
            builder.push(" AND (items.is_visible = 1 OR items.user_id = ");
            builder.push_bind(viewer_id);
            builder.push(")");
        }

        let rows = builder.build().fetch_all(self.pool.get_pool()).await?;
        rows.iter().map(|row| map_item_info_row(row, origin)).collect()
    }

    async fn get_user_items(
        &self,
        viewer_id: &str,
        owner_id: &str,
        origin: Option<Coordinates>,
    ) -> Result<Vec<ItemInfo>, AppError> {
        let rows = sqlx::query(SELECT_ITEMS_BY_OWNER)
            .bind(viewer_id)
            .bind(owner_id)
            .fetch_all(self.pool.get_pool())
            .await?;
        rows.iter().map(|row| map_item_info_row(row, origin)).collect()
    }

    async fn get_liked_items(
        &self,
        viewer_id: &str,
        origin: Option<Coordinates>,
    ) -> Result<Vec<ItemInfo>, AppError> {
        let rows = sqlx::query(SELECT_LIKED_ITEMS)
            .bind(viewer_id)
            .fetch_all(self.pool.get_pool())
            .await?;
        rows.iter().map(|row| map_item_info_row(row, origin)).collect()
    }

    async fn get_filtered_items(
        &self,
        viewer_id: &str,
        query: &ItemQuery,
        origin: Option<Coordinates>,
    ) -> Result<Vec<ItemInfo>, AppError> {
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(ITEMS_WITH_VIEWER_BASE);
        builder.push_bind(viewer_id);
        // Hidden items never surface, whatever the caller asked for.
        builder.push(" WHERE items.is_visible = 1");

        for filter in &query.filters {
            match filter {
                ItemFilter::DistanceInKm(km) => {
                    let Some(from) = origin else {
                        return Err(AppError::invalid_input(
                            "Filter has a distance but no coordinates were given",
                        ));
                    };
                    let bounds = from.bounding_box(*km);
                    builder.push(" AND items.latitude BETWEEN ");
                    builder.push_bind(bounds.min_latitude);
                    builder.push(" AND ");
                    builder.push_bind(bounds.max_latitude);
                    builder.push(" AND items.longitude BETWEEN ");
                    builder.push_bind(bounds.min_longitude);
                    builder.push(" AND ");
                    builder.push_bind(bounds.max_longitude);
                }
                ItemFilter::Categories(categories) => {
                    let values = categories.iter().map(|c| c.as_str().to_string()).collect();
                    push_membership(&mut builder, "items.category", values);
                }
                ItemFilter::Sizes(sizes) => {
                    push_membership(&mut builder, "items.size", sizes.clone());
                }
                ItemFilter::Conditions(conditions) => {
                    let values = conditions.iter().map(|c| c.as_str().to_string()).collect();
                    push_membership(&mut builder, "items.condition", values);
                }
                ItemFilter::Genders(genders) => {
                    let values = genders.iter().map(|g| g.as_str().to_string()).collect();
                    push_membership(&mut builder, "items.gender", values);
                }
                ItemFilter::Keywords(words) => {
                    push_overlap(&mut builder, "items.keywords", words.clone());
                }
                ItemFilter::DeliveryMethods(methods) => {
                    let values = methods.iter().map(|m| m.as_str().to_string()).collect();
                    push_overlap(&mut builder, "items.delivery_methods", values);
                }
                ItemFilter::PriceRange(lo, hi) => {
                    builder.push(" AND items.current_price BETWEEN ");
                    builder.push_bind(*lo);
                    builder.push(" AND ");
                    builder.push_bind(*hi);
                }
                ItemFilter::Country(country) => {
                    builder.push(" AND items.country = ");
                    builder.push_bind(country.clone());
                }
                ItemFilter::Region(region) => {
                    builder.push(" AND items.region = ");
                    builder.push_bind(region.clone());
                }
                // Applied after ordering, below.
                ItemFilter::Limit(_) => {}
            }
        }

        let rows = builder.build().fetch_all(self.pool.get_pool()).await?;
        let mut infos: Vec<ItemInfo> = rows
            .iter()
            .map(|row| map_item_info_row(row, origin))
            .collect::<Result<_, _>>()?;

        // The bounding box over-approximates; apply the exact radius.
        if let (Some(km), Some(from)) = (query.radius_km(), origin) {
            infos.retain(|info| from.distance_m(&info.item.coordinates()) <= km * 1000.0);
        }

        order_results(&mut infos, &query.ordering(), origin);
        if let Some(limit) = query.limit() {
            infos.truncate(limit);
        }
        Ok(infos)
    }

    async fn record_views(
        &self,
        viewer_id: &str,
        item_ids: &[String],
        now: i64,
    ) -> Result<(), AppError> {
        if item_ids.is_empty() {
            return Ok(());
        }
        let mut tx = self.pool.get_pool().begin().await?;
        for item_id in item_ids {
            sqlx::query(UPSERT_VIEW)
                .bind(viewer_id)
                .bind(item_id)
                .bind(now)
                .execute(&mut *tx)
                .await?;
            sqlx::query(INCREMENT_VIEW_COUNT)
                .bind(item_id)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }
}

fn push_membership(builder: &mut QueryBuilder<'_, Sqlite>, column: &str, values: Vec<String>) {
    // An empty membership list matches nothing, same as the store's
    // `IN ()` semantics would.
    if values.is_empty() {
        builder.push(" AND 0 = 1");
        return;
    }
    builder.push(format!(" AND {column} IN ("));
    {
        let mut separated = builder.separated(", ");
        for value in values {
            separated.push_bind(value);
        }
    }
    builder.push(")");
}

/// Set-intersection predicate over a JSON-array column.
fn push_overlap(builder: &mut QueryBuilder<'_, Sqlite>, column: &str, values: Vec<String>) {
    if values.is_empty() {
        builder.push(" AND 0 = 1");
        return;
    }
    builder.push(format!(
        " AND EXISTS (SELECT 1 FROM json_each({column}) WHERE json_each.value IN ("
    ));
    {
        let mut separated = builder.separated(", ");
        for value in values {
            separated.push_bind(value);
        }
    }
    builder.push("))");
}

fn order_results(infos: &mut [ItemInfo], ordering: &ItemOrdering, origin: Option<Coordinates>) {
    match ordering {
        ItemOrdering::KeywordOverlap(words) => {
            infos.sort_by(|a, b| {
                keyword_overlap(&b.item, words).cmp(&keyword_overlap(&a.item, words))
            });
        }
        ItemOrdering::DistanceAscending => {
            if let Some(from) = origin {
                infos.sort_by(|a, b| {
                    let da = from.distance_m(&a.item.coordinates());
                    let db = from.distance_m(&b.item.coordinates());
                    da.partial_cmp(&db).unwrap_or(Ordering::Equal)
                });
            }
        }
        ItemOrdering::PriceAscending => {
            infos.sort_by_key(|info| info.item.current_price);
        }
        ItemOrdering::Unordered => {}
    }
}

fn keyword_overlap(item: &Item, words: &[String]) -> usize {
    item.keywords
        .iter()
        .filter(|keyword| words.contains(*keyword))
        .count()
}

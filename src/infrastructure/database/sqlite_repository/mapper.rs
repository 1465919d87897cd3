use crate::domain::entities::item::{
    DeliveryMethod, Item, ItemCategory, ItemCondition, ItemFit, ItemGender, ItemInfo,
};
use crate::domain::entities::offer::{Offer, OfferResponse};
use crate::domain::entities::user::{User, UserGender};
use crate::domain::entities::Interaction;
use crate::domain::value_objects::{display_km, Coordinates};
use crate::shared::error::AppError;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

pub(super) fn map_user_row(row: &SqliteRow) -> Result<User, AppError> {
    let gender: String = row.try_get("gender")?;
    Ok(User {
        user_id: row.try_get("user_id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        gender: UserGender::parse(&gender),
        birth_day: row.try_get("birth_day")?,
        birth_month: row.try_get("birth_month")?,
        birth_year: row.try_get("birth_year")?,
        country: row.try_get("country")?,
        region: row.try_get("region")?,
        latitude: row.try_get("latitude")?,
        longitude: row.try_get("longitude")?,
        push_token: row.try_get("push_token")?,
    })
}

pub(super) fn map_item_row(row: &SqliteRow) -> Result<Item, AppError> {
    let category: String = row.try_get("category")?;
    let gender: String = row.try_get("gender")?;
    let fit: String = row.try_get("fit")?;
    let condition: String = row.try_get("condition")?;
    let images: String = row.try_get("images")?;
    let delivery_methods: String = row.try_get("delivery_methods")?;
    let styles: String = row.try_get("styles")?;
    let keywords: String = row.try_get("keywords")?;

    Ok(Item {
        item_id: row.try_get("item_id")?,
        user_id: row.try_get("user_id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        category: ItemCategory::parse(&category),
        gender: ItemGender::parse(&gender),
        size: row.try_get("size")?,
        fit: ItemFit::parse(&fit),
        condition: ItemCondition::parse(&condition),
        min_price: row.try_get("min_price")?,
        last_price: row.try_get("last_price")?,
        current_price: row.try_get("current_price")?,
        images: parse_string_list(&images),
        country: row.try_get("country")?,
        region: row.try_get("region")?,
        latitude: row.try_get("latitude")?,
        longitude: row.try_get("longitude")?,
        delivery_methods: parse_delivery_methods(&delivery_methods),
        styles: parse_string_list(&styles),
        keywords: parse_string_list(&keywords),
        view_count: row.try_get("view_count")?,
        like_count: row.try_get("like_count")?,
        fav_count: row.try_get("fav_count")?,
        is_visible: row.try_get("is_visible")?,
    })
}

/// Item row joined with the viewer's own interaction columns, plus the
/// distance from `origin` when given.
pub(super) fn map_item_info_row(
    row: &SqliteRow,
    origin: Option<Coordinates>,
) -> Result<ItemInfo, AppError> {
    let item = map_item_row(row)?;
    let distance = origin.map(|from| display_km(from.distance_m(&item.coordinates())));
    Ok(ItemInfo {
        distance,
        view_time: row.try_get("viewer_view_time")?,
        like_time: row.try_get("viewer_like_time")?,
        fav_time: row.try_get("viewer_fav_time")?,
        like_price: row.try_get("viewer_like_price")?,
        item,
    })
}

pub(super) fn map_interaction_row(row: &SqliteRow) -> Result<Interaction, AppError> {
    Ok(Interaction {
        user_id: row.try_get("user_id")?,
        item_id: row.try_get("item_id")?,
        view_time: row.try_get("view_time")?,
        like_time: row.try_get("like_time")?,
        fav_time: row.try_get("fav_time")?,
        like_price: row.try_get("like_price")?,
    })
}

pub(super) fn map_offer_row(row: &SqliteRow) -> Result<Offer, AppError> {
    let response_type: Option<String> = row.try_get("response_type")?;
    Ok(Offer {
        offer_id: row.try_get("offer_id")?,
        from_id: row.try_get("from_id")?,
        to_id: row.try_get("to_id")?,
        from_payment: row.try_get("from_payment")?,
        to_payment: row.try_get("to_payment")?,
        offer_time: row.try_get("offer_time")?,
        response_type: response_type.as_deref().and_then(OfferResponse::parse),
        response_time: row.try_get("response_time")?,
        counter_offer_id: row.try_get("counter_offer_id")?,
        exchange_id: row.try_get("exchange_id")?,
    })
}

pub(super) fn string_list_json(values: &[String]) -> String {
    serde_json::to_string(values).unwrap_or_else(|_| "[]".to_string())
}

pub(super) fn delivery_methods_json(methods: &[DeliveryMethod]) -> String {
    serde_json::to_string(methods).unwrap_or_else(|_| "[]".to_string())
}

fn parse_string_list(json: &str) -> Vec<String> {
    serde_json::from_str(json).unwrap_or_default()
}

fn parse_delivery_methods(json: &str) -> Vec<DeliveryMethod> {
    serde_json::from_str(json).unwrap_or_default()
}

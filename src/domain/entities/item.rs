use crate::domain::entities::user::User;
use crate::domain::value_objects::coords::Coordinates;
use crate::domain::value_objects::keywords::extract_keywords;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ItemCategory {
    Top,
    Bottom,
    Dress,
    Outerwear,
    Accessory,
    Jewelry,
    Shoes,
    Other,
    #[serde(rename = "")]
    #[default]
    Unset,
}

impl ItemCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemCategory::Top => "top",
            ItemCategory::Bottom => "bottom",
            ItemCategory::Dress => "dress",
            ItemCategory::Outerwear => "outerwear",
            ItemCategory::Accessory => "accessory",
            ItemCategory::Jewelry => "jewelry",
            ItemCategory::Shoes => "shoes",
            ItemCategory::Other => "other",
            ItemCategory::Unset => "",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "top" => ItemCategory::Top,
            "bottom" => ItemCategory::Bottom,
            "dress" => ItemCategory::Dress,
            "outerwear" => ItemCategory::Outerwear,
            "accessory" => ItemCategory::Accessory,
            "jewelry" => ItemCategory::Jewelry,
            "shoes" => ItemCategory::Shoes,
            "other" => ItemCategory::Other,
            _ => ItemCategory::Unset,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ItemGender {
    Women,
    Men,
    Unisex,
    #[serde(rename = "")]
    #[default]
    Unset,
}

impl ItemGender {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemGender::Women => "women",
            ItemGender::Men => "men",
            ItemGender::Unisex => "unisex",
            ItemGender::Unset => "",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "women" => ItemGender::Women,
            "men" => ItemGender::Men,
            "unisex" => ItemGender::Unisex,
            _ => ItemGender::Unset,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ItemFit {
    Small,
    Proper,
    Large,
    #[serde(rename = "")]
    #[default]
    Unset,
}

impl ItemFit {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemFit::Small => "small",
            ItemFit::Proper => "proper",
            ItemFit::Large => "large",
            ItemFit::Unset => "",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "small" => ItemFit::Small,
            "proper" => ItemFit::Proper,
            "large" => ItemFit::Large,
            _ => ItemFit::Unset,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ItemCondition {
    New,
    Good,
    Fair,
    Poor,
    #[serde(rename = "")]
    #[default]
    Unset,
}

impl ItemCondition {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemCondition::New => "new",
            ItemCondition::Good => "good",
            ItemCondition::Fair => "fair",
            ItemCondition::Poor => "poor",
            ItemCondition::Unset => "",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "new" => ItemCondition::New,
            "good" => ItemCondition::Good,
            "fair" => ItemCondition::Fair,
            "poor" => ItemCondition::Poor,
            _ => ItemCondition::Unset,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMethod {
    Pickup,
    Meetup,
    Dropoff,
}

impl DeliveryMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryMethod::Pickup => "pickup",
            DeliveryMethod::Meetup => "meetup",
            DeliveryMethod::Dropoff => "dropoff",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pickup" => Some(DeliveryMethod::Pickup),
            "meetup" => Some(DeliveryMethod::Meetup),
            "dropoff" => Some(DeliveryMethod::Dropoff),
            _ => None,
        }
    }
}

/// A listing. Prices are cents; `current_price >= last_price >= min_price`
/// holds after every mutation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    #[serde(rename = "itemID")]
    pub item_id: String,
    #[serde(rename = "userID")]
    pub user_id: String,
    pub name: String,
    pub description: String,
    pub category: ItemCategory,
    pub gender: ItemGender,
    pub size: String,
    pub fit: ItemFit,
    pub condition: ItemCondition,
    pub min_price: i64,
    pub last_price: i64,
    pub current_price: i64,
    pub images: Vec<String>,
    pub country: String,
    pub region: String,
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "long")]
    pub longitude: f64,
    pub delivery_methods: Vec<DeliveryMethod>,
    pub styles: Vec<String>,
    pub keywords: Vec<String>,
    pub view_count: i64,
    pub like_count: i64,
    pub fav_count: i64,
    pub is_visible: bool,
}

/// Seller-supplied fields of a listing; everything else is derived
/// server-side. `is_visible` here is the seller's intent, not the stored
/// flag.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ItemDraft {
    pub name: String,
    pub description: String,
    pub category: ItemCategory,
    pub gender: ItemGender,
    pub size: String,
    pub fit: ItemFit,
    pub condition: ItemCondition,
    pub min_price: i64,
    pub images: Vec<String>,
    pub delivery_methods: Vec<DeliveryMethod>,
    pub styles: Vec<String>,
    pub is_visible: bool,
}

impl Item {
    pub const MAX_STYLES: usize = 10;

    /// Builds a fresh listing for `owner`. The server assigns the id, copies
    /// country/region/coordinates from the owner profile, and floors the
    /// price ladder at the draft's minimum.
    pub fn new(owner: &User, draft: ItemDraft) -> Self {
        let mut item = Self {
            item_id: Uuid::new_v4().to_string(),
            user_id: owner.user_id.clone(),
            name: draft.name,
            description: draft.description,
            category: draft.category,
            gender: draft.gender,
            size: draft.size,
            fit: draft.fit,
            condition: draft.condition,
            min_price: draft.min_price,
            last_price: draft.min_price,
            current_price: draft.min_price,
            images: draft.images,
            country: owner.country.clone(),
            region: owner.region.clone(),
            latitude: owner.latitude,
            longitude: owner.longitude,
            delivery_methods: draft.delivery_methods,
            styles: draft.styles,
            keywords: Vec::new(),
            view_count: 0,
            like_count: 0,
            fav_count: 0,
            is_visible: false,
        };
        item.refresh_derived(draft.is_visible);
        item
    }

    /// Replaces the seller-editable fields and re-derives keywords,
    /// visibility, and the owner-bound location. Counters and the price
    /// ladder are left to the pricing engine; `min_price` handling is the
    /// caller's responsibility.
    pub fn apply_draft(&mut self, owner: &User, draft: ItemDraft) {
        self.name = draft.name;
        self.description = draft.description;
        self.category = draft.category;
        self.gender = draft.gender;
        self.size = draft.size;
        self.fit = draft.fit;
        self.condition = draft.condition;
        self.images = draft.images;
        self.delivery_methods = draft.delivery_methods;
        self.styles = draft.styles;
        self.country = owner.country.clone();
        self.region = owner.region.clone();
        self.latitude = owner.latitude;
        self.longitude = owner.longitude;
        self.refresh_derived(draft.is_visible);
    }

    /// Publishability predicate. The stored `is_visible` is this AND the
    /// seller's intent.
    pub fn is_valid(&self) -> bool {
        !self.name.is_empty()
            && self.category != ItemCategory::Unset
            && self.gender != ItemGender::Unset
            && !self.size.is_empty()
            && self.fit != ItemFit::Unset
            && self.condition != ItemCondition::Unset
            && !self.images.is_empty()
            && self.min_price >= 0
            && self.styles.len() <= Self::MAX_STYLES
            && !self.country.is_empty()
            && !self.user_id.is_empty()
    }

    pub fn refresh_derived(&mut self, intent_visible: bool) {
        self.keywords = extract_keywords(&self.keyword_source());
        self.is_visible = intent_visible && self.is_valid();
    }

    fn keyword_source(&self) -> String {
        let mut parts = vec![
            self.name.clone(),
            self.category.as_str().to_string(),
            self.gender.as_str().to_string(),
            self.country.clone(),
            self.region.clone(),
        ];
        parts.extend(self.styles.iter().cloned());
        parts.join(" ")
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}

/// An item as returned to a caller: the listing plus the caller's own
/// interaction state and an optional whole-km distance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ItemInfo {
    pub item: Item,
    pub distance: Option<i64>,
    pub view_time: Option<i64>,
    pub like_time: Option<i64>,
    pub fav_time: Option<i64>,
    pub like_price: Option<i64>,
}

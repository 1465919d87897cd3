use serde::{Deserialize, Serialize};

/// One ledger row per (user, item). Timestamps are epoch milliseconds and
/// independently nullable; `like_time` and `like_price` are set and cleared
/// together.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Interaction {
    #[serde(rename = "userID")]
    pub user_id: String,
    #[serde(rename = "itemID")]
    pub item_id: String,
    pub view_time: Option<i64>,
    pub like_time: Option<i64>,
    pub fav_time: Option<i64>,
    pub like_price: Option<i64>,
}

impl Interaction {
    pub fn has_active_like(&self) -> bool {
        self.like_time.is_some()
    }

    pub fn has_favorite(&self) -> bool {
        self.fav_time.is_some()
    }
}

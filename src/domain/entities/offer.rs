use crate::domain::entities::item::ItemInfo;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OfferResponse {
    Accepted,
    Rejected,
}

impl OfferResponse {
    pub fn as_str(&self) -> &'static str {
        match self {
            OfferResponse::Accepted => "accepted",
            OfferResponse::Rejected => "rejected",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "accepted" => Some(OfferResponse::Accepted),
            "rejected" => Some(OfferResponse::Rejected),
            _ => None,
        }
    }
}

/// A barter offer between two users. Payments are cents; after netting at
/// most one side pays.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    #[serde(rename = "offerID")]
    pub offer_id: String,
    #[serde(rename = "fromID")]
    pub from_id: String,
    #[serde(rename = "toID")]
    pub to_id: String,
    pub from_payment: i64,
    pub to_payment: i64,
    pub offer_time: i64,
    pub response_type: Option<OfferResponse>,
    pub response_time: Option<i64>,
    #[serde(rename = "counterOfferID")]
    pub counter_offer_id: Option<String>,
    #[serde(rename = "exchangeID")]
    pub exchange_id: Option<String>,
}

impl Offer {
    pub fn new(
        offer_id: impl Into<String>,
        from_id: impl Into<String>,
        to_id: impl Into<String>,
        from_payment: i64,
        to_payment: i64,
        offer_time: i64,
    ) -> Self {
        let (from_payment, to_payment) = Self::net_payments(from_payment, to_payment);
        Self {
            offer_id: offer_id.into(),
            from_id: from_id.into(),
            to_id: to_id.into(),
            from_payment,
            to_payment,
            offer_time,
            response_type: None,
            response_time: None,
            counter_offer_id: None,
            exchange_id: None,
        }
    }

    /// Cancels the smaller top-up against the larger so only one side pays.
    pub fn net_payments(from_payment: i64, to_payment: i64) -> (i64, i64) {
        if from_payment >= to_payment {
            (from_payment - to_payment, 0)
        } else {
            (0, to_payment - from_payment)
        }
    }

    pub fn is_pending(&self) -> bool {
        self.response_type.is_none()
    }

    pub fn is_party(&self, user_id: &str) -> bool {
        self.from_id == user_id || self.to_id == user_id
    }

    pub fn other_party(&self, user_id: &str) -> Option<&str> {
        if self.from_id == user_id {
            Some(self.to_id.as_str())
        } else if self.to_id == user_id {
            Some(self.from_id.as_str())
        } else {
            None
        }
    }
}

/// The enriched shape every offer query resolves to: the offer plus both
/// sides' item manifests.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OfferInfo {
    pub offer: Offer,
    pub from_items: Vec<ItemInfo>,
    pub to_items: Vec<ItemInfo>,
}

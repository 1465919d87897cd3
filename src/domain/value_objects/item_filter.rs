use crate::domain::entities::item::{DeliveryMethod, ItemCategory, ItemCondition, ItemGender};
use serde::{Deserialize, Serialize};

/// The sparse filter object as it arrives from a caller. Every key is
/// independently optional; `into_query` lowers it to the closed variant set.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ItemFilterRequest {
    #[serde(rename = "distanceInKM")]
    pub distance_in_km: Option<f64>,
    pub category: Option<Vec<ItemCategory>>,
    pub size: Option<Vec<String>>,
    pub condition: Option<Vec<ItemCondition>>,
    pub keywords: Option<Vec<String>>,
    pub gender: Option<Vec<ItemGender>>,
    pub price_range: Option<Vec<i64>>,
    pub country: Option<String>,
    pub region: Option<String>,
    pub delivery_methods: Option<Vec<DeliveryMethod>>,
    pub limit: Option<usize>,
}

impl ItemFilterRequest {
    pub fn into_query(self) -> ItemQuery {
        let mut filters = Vec::new();
        if let Some(km) = self.distance_in_km {
            filters.push(ItemFilter::DistanceInKm(km));
        }
        if let Some(categories) = self.category {
            filters.push(ItemFilter::Categories(categories));
        }
        if let Some(sizes) = self.size {
            filters.push(ItemFilter::Sizes(sizes));
        }
        if let Some(conditions) = self.condition {
            filters.push(ItemFilter::Conditions(conditions));
        }
        if let Some(keywords) = self.keywords {
            filters.push(ItemFilter::Keywords(keywords));
        }
        if let Some(genders) = self.gender {
            filters.push(ItemFilter::Genders(genders));
        }
        if let Some(range) = self.price_range {
            // A malformed pair is ignored, not an error.
            if range.len() == 2 {
                filters.push(ItemFilter::PriceRange(range[0], range[1]));
            }
        }
        if let Some(country) = self.country {
            filters.push(ItemFilter::Country(country));
        }
        if let Some(region) = self.region {
            filters.push(ItemFilter::Region(region));
        }
        if let Some(methods) = self.delivery_methods {
            filters.push(ItemFilter::DeliveryMethods(methods));
        }
        if let Some(limit) = self.limit {
            filters.push(ItemFilter::Limit(limit));
        }
        ItemQuery { filters }
    }
}

/// One recognized filter key. Adding a key means adding a variant, and the
/// compiler then points at every place that must handle it.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemFilter {
    DistanceInKm(f64),
    Categories(Vec<ItemCategory>),
    Sizes(Vec<String>),
    Conditions(Vec<ItemCondition>),
    Keywords(Vec<String>),
    Genders(Vec<ItemGender>),
    PriceRange(i64, i64),
    Country(String),
    Region(String),
    DeliveryMethods(Vec<DeliveryMethod>),
    Limit(usize),
}

/// First ordering rule that applies wins; otherwise results are unordered.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemOrdering {
    KeywordOverlap(Vec<String>),
    DistanceAscending,
    PriceAscending,
    Unordered,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ItemQuery {
    pub filters: Vec<ItemFilter>,
}

impl ItemQuery {
    /// A distance radius can only be evaluated against caller coordinates.
    pub fn needs_coordinates(&self) -> bool {
        self.radius_km().is_some()
    }

    pub fn radius_km(&self) -> Option<f64> {
        self.filters.iter().find_map(|filter| match filter {
            ItemFilter::DistanceInKm(km) => Some(*km),
            _ => None,
        })
    }

    pub fn limit(&self) -> Option<usize> {
        self.filters.iter().find_map(|filter| match filter {
            ItemFilter::Limit(limit) => Some(*limit),
            _ => None,
        })
    }

    pub fn keywords(&self) -> Option<&[String]> {
        self.filters.iter().find_map(|filter| match filter {
            ItemFilter::Keywords(words) => Some(words.as_slice()),
            _ => None,
        })
    }

    pub fn price_range(&self) -> Option<(i64, i64)> {
        self.filters.iter().find_map(|filter| match filter {
            ItemFilter::PriceRange(lo, hi) => Some((*lo, *hi)),
            _ => None,
        })
    }

    pub fn ordering(&self) -> ItemOrdering {
        if let Some(words) = self.keywords() {
            if !words.is_empty() {
                return ItemOrdering::KeywordOverlap(words.to_vec());
            }
        }
        if self.radius_km().is_some() {
            return ItemOrdering::DistanceAscending;
        }
        if self.price_range().is_some() {
            return ItemOrdering::PriceAscending;
        }
        ItemOrdering::Unordered
    }
}

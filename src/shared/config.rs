use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub pricing: PricingPolicy,
    pub push: PushConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://./data/threadswap.db?mode=rwc".to_string(),
            max_connections: 5,
        }
    }
}

/// How the percent branch of a price increase lands on whole cents.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PriceRounding {
    #[default]
    CeilCent,
    NearestCent,
}

/// Knobs of the ascending-auction price ladder. Amounts are cents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingPolicy {
    pub percent_increase: f64,
    pub dollar_increase: i64,
    #[serde(default)]
    pub rounding: PriceRounding,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            percent_increase: 1.05,
            dollar_increase: 250,
            rounding: PriceRounding::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushConfig {
    pub endpoint: String,
    pub timeout_secs: u64,
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://exp.host/--/api/v2/push/send".to_string(),
            timeout_secs: 5,
        }
    }
}

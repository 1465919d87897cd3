pub mod config;
pub mod error;

pub use config::{AppConfig, DatabaseConfig, PriceRounding, PricingPolicy, PushConfig};
pub use error::{AppError, Result};

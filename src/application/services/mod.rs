pub mod item_service;
pub mod notifier;
pub mod offer_service;
pub mod pricing_service;
pub mod user_service;

pub use item_service::ItemService;
pub use notifier::NotificationService;
pub use offer_service::{CounterOfferRequest, OfferService, SendOfferRequest};
pub use pricing_service::PricingService;
pub use user_service::UserService;

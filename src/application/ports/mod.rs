pub mod identity;
pub mod notifications;
pub mod repositories;

pub use identity::IdentityResolver;
pub use notifications::{PushMessage, PushSender};
pub use repositories::{
    InteractionRepository, ItemRepository, LikeOutcome, OfferRepository, UnlikeOutcome,
    UserRepository,
};

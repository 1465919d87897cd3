pub mod interaction;
pub mod item;
pub mod offer;
pub mod user;

pub use interaction::Interaction;
pub use item::{
    DeliveryMethod, Item, ItemCategory, ItemCondition, ItemDraft, ItemFit, ItemGender, ItemInfo,
};
pub use offer::{Offer, OfferInfo, OfferResponse};
pub use user::{User, UserDraft, UserGender};

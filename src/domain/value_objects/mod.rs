pub mod coords;
pub mod item_filter;
pub mod keywords;

pub use coords::{display_km, BoundingBox, Coordinates};
pub use item_filter::{ItemFilter, ItemFilterRequest, ItemOrdering, ItemQuery};
pub use keywords::extract_keywords;

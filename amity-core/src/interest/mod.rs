//! Interest catalog.
//!
//! Each user owns an ordered list of categories, each holding ordered,
//! rated items. Catalogs are replaced wholesale by their owner and shown
//! on friend profiles.

mod manager;
pub mod types;

pub use manager::InterestCatalog;
pub use types::{Interest, InterestItem, MAX_RATING, MIN_RATING};

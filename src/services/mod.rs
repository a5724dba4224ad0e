pub mod notifier;
pub mod providers;
pub mod selector;
pub mod session;

pub use providers::{CatalogProvider, QualityFilter, SortStrategy};
pub use selector::RecommendationSelector;
pub use session::{BrowseSession, SessionMap};

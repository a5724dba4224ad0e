pub mod collections;
pub mod postgres;
pub mod preferences;

pub use collections::{CollectionStore, PgCollectionStore};
pub use postgres::create_pool;
pub use preferences::{PgPreferenceStore, PreferenceStore};

#[cfg(test)]
pub use collections::MockCollectionStore;
#[cfg(test)]
pub use preferences::MockPreferenceStore;

use crate::{
    error::AppResult,
    models::{AddOutcome, CollectionEntry, CollectionKind, ContentType, RemoveOutcome},
};
use sqlx::PgPool;

impl CollectionKind {
    /// Backing table for this collection. Watchlist and favorites share a
    /// schema but live in separate tables.
    fn table(&self) -> &'static str {
        match self {
            CollectionKind::Watchlist => "watchlist_entries",
            CollectionKind::Favorites => "favorite_entries",
        }
    }
}

/// Persistence interface for the two bookmark lists.
///
/// Add is idempotent on the `(user_id, content_type, item_id)` key; a
/// duplicate reports `AlreadyExists` rather than failing. Remove on a
/// missing key reports `NotFound`.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CollectionStore: Send + Sync {
    async fn add(
        &self,
        kind: CollectionKind,
        user_id: i64,
        content_type: ContentType,
        item_id: i64,
        title: &str,
        poster_path: Option<String>,
    ) -> AppResult<AddOutcome>;

    async fn remove(
        &self,
        kind: CollectionKind,
        user_id: i64,
        content_type: ContentType,
        item_id: i64,
    ) -> AppResult<RemoveOutcome>;

    /// Entries for one user, newest `date_added` first
    async fn list(
        &self,
        kind: CollectionKind,
        user_id: i64,
        offset: i64,
        limit: i64,
    ) -> AppResult<Vec<CollectionEntry>>;

    async fn count(&self, kind: CollectionKind, user_id: i64) -> AppResult<i64>;

    async fn contains(
        &self,
        kind: CollectionKind,
        user_id: i64,
        content_type: ContentType,
        item_id: i64,
    ) -> AppResult<bool>;
}

/// PostgreSQL-backed collection store
#[derive(Clone)]
pub struct PgCollectionStore {
    pool: PgPool,
}

impl PgCollectionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl CollectionStore for PgCollectionStore {
    async fn add(
        &self,
        kind: CollectionKind,
        user_id: i64,
        content_type: ContentType,
        item_id: i64,
        title: &str,
        poster_path: Option<String>,
    ) -> AppResult<AddOutcome> {
        let sql = format!(
            "INSERT INTO {} (user_id, content_type, item_id, title, poster_path, date_added) \
             VALUES ($1, $2, $3, $4, $5, now()) \
             ON CONFLICT (user_id, content_type, item_id) DO NOTHING",
            kind.table()
        );

        let result = sqlx::query(&sql)
            .bind(user_id)
            .bind(content_type.as_str())
            .bind(item_id)
            .bind(title)
            .bind(poster_path)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            tracing::debug!(
                user_id,
                item_id,
                list = kind.as_str(),
                "Duplicate add ignored"
            );
            Ok(AddOutcome::AlreadyExists)
        } else {
            Ok(AddOutcome::Inserted)
        }
    }

    async fn remove(
        &self,
        kind: CollectionKind,
        user_id: i64,
        content_type: ContentType,
        item_id: i64,
    ) -> AppResult<RemoveOutcome> {
        let sql = format!(
            "DELETE FROM {} WHERE user_id = $1 AND content_type = $2 AND item_id = $3",
            kind.table()
        );

        let result = sqlx::query(&sql)
            .bind(user_id)
            .bind(content_type.as_str())
            .bind(item_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            Ok(RemoveOutcome::NotFound)
        } else {
            Ok(RemoveOutcome::Removed)
        }
    }

    async fn list(
        &self,
        kind: CollectionKind,
        user_id: i64,
        offset: i64,
        limit: i64,
    ) -> AppResult<Vec<CollectionEntry>> {
        let sql = format!(
            "SELECT user_id, content_type, item_id, title, poster_path, date_added \
             FROM {} WHERE user_id = $1 \
             ORDER BY date_added DESC OFFSET $2 LIMIT $3",
            kind.table()
        );

        let entries = sqlx::query_as::<_, CollectionEntry>(&sql)
            .bind(user_id)
            .bind(offset)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(entries)
    }

    async fn count(&self, kind: CollectionKind, user_id: i64) -> AppResult<i64> {
        let sql = format!("SELECT COUNT(*) FROM {} WHERE user_id = $1", kind.table());

        let count: i64 = sqlx::query_scalar(&sql)
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn contains(
        &self,
        kind: CollectionKind,
        user_id: i64,
        content_type: ContentType,
        item_id: i64,
    ) -> AppResult<bool> {
        let sql = format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE user_id = $1 AND content_type = $2 AND item_id = $3)",
            kind.table()
        );

        let exists: bool = sqlx::query_scalar(&sql)
            .bind(user_id)
            .bind(content_type.as_str())
            .bind(item_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }
}

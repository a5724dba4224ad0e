use crate::{
    error::AppResult,
    models::{ContentFilter, Frequency, NotificationPreference},
};
use sqlx::PgPool;

/// Persistence interface for notification preferences, one row per user
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PreferenceStore: Send + Sync {
    async fn get(&self, user_id: i64) -> AppResult<Option<NotificationPreference>>;

    async fn upsert(&self, user_id: i64, pref: NotificationPreference) -> AppResult<()>;

    /// All users whose notifications are enabled, with their preferences
    async fn enabled_users(&self) -> AppResult<Vec<(i64, NotificationPreference)>>;
}

#[derive(Debug, sqlx::FromRow)]
struct PreferenceRow {
    user_id: i64,
    enabled: bool,
    frequency: String,
    content_type: String,
}

impl PreferenceRow {
    fn into_pref(self) -> NotificationPreference {
        // Unknown stored values fall back to the defaults rather than erroring
        NotificationPreference {
            enabled: self.enabled,
            frequency: Frequency::parse(&self.frequency).unwrap_or(Frequency::Weekly),
            content_filter: ContentFilter::parse(&self.content_type).unwrap_or(ContentFilter::Both),
        }
    }
}

/// PostgreSQL-backed preference store
#[derive(Clone)]
pub struct PgPreferenceStore {
    pool: PgPool,
}

impl PgPreferenceStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl PreferenceStore for PgPreferenceStore {
    async fn get(&self, user_id: i64) -> AppResult<Option<NotificationPreference>> {
        let row = sqlx::query_as::<_, PreferenceRow>(
            "SELECT user_id, enabled, frequency, content_type \
             FROM notification_preferences WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(PreferenceRow::into_pref))
    }

    async fn upsert(&self, user_id: i64, pref: NotificationPreference) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO notification_preferences (user_id, enabled, frequency, content_type) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (user_id) DO UPDATE \
             SET enabled = $2, frequency = $3, content_type = $4",
        )
        .bind(user_id)
        .bind(pref.enabled)
        .bind(pref.frequency.as_str())
        .bind(pref.content_filter.as_str())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn enabled_users(&self) -> AppResult<Vec<(i64, NotificationPreference)>> {
        let rows = sqlx::query_as::<_, PreferenceRow>(
            "SELECT user_id, enabled, frequency, content_type \
             FROM notification_preferences WHERE enabled = true",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| (row.user_id, row.into_pref()))
            .collect())
    }
}

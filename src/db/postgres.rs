use sqlx::{postgres::PgPoolOptions, PgPool};

/// Creates a PostgreSQL connection pool and applies pending migrations
///
/// The pool automatically manages connection lifecycle and limits. The
/// bookmark tables and the notification preference table are created by
/// the bundled migrations on first start.
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

use std::sync::Arc;
use std::time::Duration;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use wiseflix::{
    api::{create_router, AppState},
    bot::{handlers::Deps, ChatTransport, RateLimiter, TelegramTransport},
    config::Config,
    db::{create_pool, PgCollectionStore, PgPreferenceStore},
    services::{
        notifier::spawn_notification_loop, providers::tmdb::TmdbProvider, CatalogProvider,
        RecommendationSelector, SessionMap,
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    info!("Configuration loaded");

    let pool = create_pool(&config.database_url).await?;
    info!("Database connected, migrations applied");

    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()?;

    let provider: Arc<dyn CatalogProvider> = Arc::new(TmdbProvider::new(
        http_client.clone(),
        config.tmdb_api_key.clone(),
        config.tmdb_api_url.clone(),
    ));
    let selector = RecommendationSelector::new(Arc::clone(&provider));

    let collections = Arc::new(PgCollectionStore::new(pool.clone()));
    let preferences = Arc::new(PgPreferenceStore::new(pool));

    let transport: Arc<dyn ChatTransport> = Arc::new(TelegramTransport::new(
        http_client,
        config.telegram_bot_token.clone(),
        config.telegram_api_url.clone(),
    ));

    spawn_notification_loop(
        selector.clone(),
        preferences.clone(),
        Arc::clone(&transport),
    );

    let deps = Deps {
        provider,
        selector,
        collections,
        preferences,
        sessions: SessionMap::new(),
    };

    let state = AppState::new(
        deps,
        transport,
        RateLimiter::new(config.rate_limit_enabled),
        &config.webhook_secret,
    );
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "Server listening");
    axum::serve(listener, app).await?;

    Ok(())
}

use std::sync::Arc;

use recipe_api::{
    config::Config,
    db::{create_pool, create_redis_client, run_migrations, Cache},
    routes::{create_router, AppState},
    services::{
        catalog::{CachedCategories, Lookups, PgCatalog},
        TagNormalizer,
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("recipe_api=info,tower_http=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    run_migrations(&pool).await?;

    let catalog = Arc::new(PgCatalog::new(pool));
    let mut lookups = Lookups::from_catalog(catalog.clone());

    let cache_handle = match &config.redis_url {
        Some(redis_url) => {
            let (cache, handle) = Cache::new(create_redis_client(redis_url)?);
            lookups = lookups.with_categories(Arc::new(CachedCategories::new(
                catalog,
                cache,
                config.category_cache_ttl,
            )));
            tracing::info!(ttl_secs = config.category_cache_ttl, "Category cache enabled");
            Some(handle)
        }
        None => None,
    };

    let state = Arc::new(AppState::new(
        lookups,
        TagNormalizer::new(config.synonym_table()),
        config.default_recommendation_limit,
        config.max_recommendation_limit,
    ));

    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = cache_handle {
        handle.shutdown().await;
    }

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}

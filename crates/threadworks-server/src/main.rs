mod api;
mod middleware;
mod refresh;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, default_rate_limit_state, AppState},
    middleware::AuthState,
};

/// Cap on in-process cache entries when running memory-only or as the
/// fallback tier behind Redis. Not config-exposed — revisit if a
/// deployment needs to tune it.
const CACHE_MEMORY_MAX_ENTRIES: usize = 10_000;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(threadworks_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = threadworks_db::PoolConfig::from_app_config(&config);
    let pool = threadworks_db::connect_pool(&config.database_url, pool_config).await?;
    threadworks_db::run_migrations(&pool).await?;

    let cache = Arc::new(match &config.redis_url {
        Some(url) => {
            threadworks_cache::TieredCache::connect_or_memory_only(url, CACHE_MEMORY_MAX_ENTRIES)
                .await
        }
        None => {
            tracing::info!("cache: no redis_url configured, running memory-only");
            threadworks_cache::TieredCache::new(None, CACHE_MEMORY_MAX_ENTRIES)
        }
    });

    let lookup = Arc::new(threadworks_core::SharedSnapshot::new(
        threadworks_db::load_lookup_snapshot(&pool).await?,
    ));
    let synonyms = Arc::new(threadworks_core::SharedSnapshot::new(
        threadworks_db::load_synonym_snapshot(&pool).await?,
    ));

    let _scheduler = refresh::build_scheduler(
        pool.clone(),
        Arc::clone(&config),
        Arc::clone(&lookup),
        Arc::clone(&synonyms),
    )
    .await?;

    let auth =
        AuthState::from_config(&config, matches!(config.env, threadworks_core::Environment::Development))?;
    let state = AppState { pool, cache, config: Arc::clone(&config), lookup, synonyms };
    let app = build_app(state, auth, default_rate_limit_state());

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}

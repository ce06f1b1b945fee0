mod search;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "threadworks-cli")]
#[command(about = "threadworks command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database management commands
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// Reload the lookup and synonym snapshots and report their sizes
    WarmLookups,
    /// Invalidate cached search artifacts under a given key prefix
    Invalidate {
        /// One of "listing", "aggregation", "count", "price_range", "detail",
        /// or "all" to clear every kind
        kind: String,
    },
    /// Run a search against the catalog and print the listing response
    Search(search::SearchArgs),
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Test the database connection
    Ping,
    /// Run pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| {
        let level = std::env::var("THREADWORKS_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        EnvFilter::try_new(level)
    })?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Db { command }) => match command {
            DbCommands::Ping => run_db_health_check().await?,
            DbCommands::Migrate => run_db_migrate().await?,
        },
        Some(Commands::WarmLookups) => run_warm_lookups().await?,
        Some(Commands::Invalidate { kind }) => run_invalidate(&kind).await?,
        Some(Commands::Search(args)) => search::run(args).await?,
        None => println!("threadworks-cli scaffold ready"),
    }

    Ok(())
}

async fn run_db_health_check() -> anyhow::Result<()> {
    let pool = connect_or_exit().await;
    threadworks_db::health_check(&pool).await?;
    println!("database is healthy");
    Ok(())
}

async fn run_db_migrate() -> anyhow::Result<()> {
    let pool = connect_or_exit().await;
    let applied = threadworks_db::run_migrations(&pool).await?;
    if applied == 0 {
        println!("0 pending migrations — database is up to date");
    } else {
        println!("applied {applied} migration(s) successfully");
    }
    Ok(())
}

async fn run_warm_lookups() -> anyhow::Result<()> {
    let pool = connect_or_exit().await;
    let lookup = threadworks_db::load_lookup_snapshot(&pool).await?;
    let synonyms = threadworks_db::load_synonym_snapshot(&pool).await?;
    println!("brands: {}", lookup.brands.len());
    println!("product types: {}", lookup.product_types.len());
    println!("colours: {}", lookup.colours.len());
    println!("style keywords: {}", lookup.style_keywords.len());
    println!("synonyms: {}", synonyms.len());
    Ok(())
}

const ALL_CACHE_KINDS: &[&str] = &["listing", "aggregation", "count", "price_range", "detail"];

async fn run_invalidate(kind: &str) -> anyhow::Result<()> {
    let config = load_config_or_exit();
    let cache = match &config.redis_url {
        Some(url) => threadworks_cache::TieredCache::connect_or_memory_only(url, 1).await,
        None => {
            eprintln!("warning: no redis_url configured; invalidating a transient memory-only cache has no effect on a running server");
            threadworks_cache::TieredCache::new(None, 1)
        }
    };

    let kinds: Vec<&str> =
        if kind == "all" { ALL_CACHE_KINDS.to_vec() } else { vec![kind] };

    for kind in kinds {
        let prefix = threadworks_core::cache_key::cache_key_prefix(kind);
        let removed = cache.invalidate_prefix(&prefix).await;
        println!("{kind}: removed {removed} key(s)");
    }
    Ok(())
}

fn load_config_or_exit() -> threadworks_core::AppConfig {
    threadworks_core::load_app_config().unwrap_or_else(|e| {
        eprintln!("error: invalid configuration: {e}");
        std::process::exit(1);
    })
}

async fn connect_or_exit() -> sqlx::PgPool {
    threadworks_db::connect_pool_from_env().await.unwrap_or_else(|e| {
        eprintln!("error: failed to connect to database: {e}");
        eprintln!("hint: ensure DATABASE_URL is set and postgres is reachable");
        std::process::exit(1);
    })
}

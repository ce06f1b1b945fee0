//! `threadworks-cli search`: drive the same parse -> predicate -> fetch
//! pipeline the HTTP listing endpoint uses, without a running server —
//! handy for checking how a query resolves against the live catalog.

use clap::Args;
use rust_decimal::Decimal;
use threadworks_core::query::parse_query;
use threadworks_core::search_predicate::build_search_predicate;
use threadworks_core::types::FilterSet;

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Free-text query, e.g. "navy polo"
    pub query: Option<String>,

    #[arg(long)]
    pub brand: Option<String>,

    #[arg(long)]
    pub price_min: Option<Decimal>,

    #[arg(long)]
    pub price_max: Option<Decimal>,

    #[arg(long, default_value_t = 1)]
    pub page: u32,

    #[arg(long, default_value_t = 24)]
    pub limit: u32,
}

pub async fn run(args: SearchArgs) -> anyhow::Result<()> {
    let config = crate::load_config_or_exit();
    let pool_config = threadworks_db::PoolConfig::from_app_config(&config);
    let pool = threadworks_db::connect_pool(&config.database_url, pool_config).await?;

    let lookup = threadworks_db::load_lookup_snapshot(&pool).await?;
    let synonyms = threadworks_db::load_synonym_snapshot(&pool).await?;

    let raw_query = args.query.clone().unwrap_or_default();
    let parsed = parse_query(&raw_query, &lookup, &synonyms);

    let filters = FilterSet {
        brand: args.brand,
        price_min: args.price_min,
        price_max: args.price_max,
        page: args.page.max(1),
        limit: args.limit.clamp(1, config.max_page_limit),
        ..Default::default()
    };

    let search_predicate = build_search_predicate(
        &parsed,
        &lookup,
        &config.relevance_weights,
        &config.short_query_weights,
    );

    let deadline = std::time::Duration::from_secs(config.deadlines.listing_secs);
    let response = threadworks_db::with_deadline(
        deadline,
        "fetch_listing_page",
        threadworks_db::fetch_listing_page(&pool, &filters, &search_predicate),
    )
    .await?;

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

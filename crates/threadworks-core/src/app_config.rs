use std::net::SocketAddr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Relevance weights for the hybrid search scorer (spec §4.D).
///
/// Exposed as configuration per spec §9's design note: "the relevance
/// weights are empirical and likely to be tuned."
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelevanceWeights {
    pub exact_code: i32,
    pub prefix_code: i32,
    pub name_regex: i32,
    pub fulltext: i32,
    pub colour_overlap: i32,
    pub fabric_overlap: i32,
    pub neckline_overlap: i32,
    pub sleeve_overlap: i32,
    pub style_keyword_overlap: i32,
}

impl Default for RelevanceWeights {
    fn default() -> Self {
        Self {
            exact_code: 100,
            prefix_code: 80,
            name_regex: 70,
            fulltext: 60,
            colour_overlap: 30,
            fabric_overlap: 30,
            neckline_overlap: 20,
            sleeve_overlap: 20,
            style_keyword_overlap: 15,
        }
    }
}

/// Short-query relevance weights (spec §4.D: queries of length <= 2).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShortQueryWeights {
    pub exact_code: i32,
    pub prefix_code: i32,
}

impl Default for ShortQueryWeights {
    fn default() -> Self {
        Self {
            exact_code: 100,
            prefix_code: 50,
        }
    }
}

/// Cache TTLs per spec §4.H, one per cached artifact kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheTtls {
    pub listing_secs: u64,
    pub aggregation_secs: u64,
    pub count_secs: u64,
    pub price_range_secs: u64,
    pub detail_secs: u64,
}

impl Default for CacheTtls {
    fn default() -> Self {
        Self {
            listing_secs: 60,
            aggregation_secs: 1_800,
            count_secs: 7_200,
            price_range_secs: 7_200,
            detail_secs: 86_400,
        }
    }
}

/// Request-scoped deadlines per spec §5.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadlines {
    pub listing_secs: u64,
    pub detail_secs: u64,
    pub facet_subquery_secs: u64,
    pub lookup_refresh_secs: u64,
}

impl Default for Deadlines {
    fn default() -> Self {
        Self {
            listing_secs: 20,
            detail_secs: 10,
            facet_subquery_secs: 15,
            lookup_refresh_secs: 5,
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub api_key_hash_salt: Option<String>,
    pub redis_url: Option<String>,

    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,

    pub relevance_weights: RelevanceWeights,
    pub short_query_weights: ShortQueryWeights,
    pub cache_ttls: CacheTtls,
    pub deadlines: Deadlines,

    pub lookup_refresh_interval_secs: u64,
    pub synonym_refresh_interval_secs: u64,
    pub facet_fanout_limit: usize,
    pub facet_cross_filter_excludes_own_dimension: bool,

    pub default_page_limit: u32,
    pub max_page_limit: u32,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field(
                "api_key_hash_salt",
                &self.api_key_hash_salt.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "redis_url",
                &self.redis_url.as_ref().map(|_| "[redacted]"),
            )
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("relevance_weights", &self.relevance_weights)
            .field("cache_ttls", &self.cache_ttls)
            .field("deadlines", &self.deadlines)
            .field(
                "lookup_refresh_interval_secs",
                &self.lookup_refresh_interval_secs,
            )
            .field(
                "synonym_refresh_interval_secs",
                &self.synonym_refresh_interval_secs,
            )
            .field("facet_fanout_limit", &self.facet_fanout_limit)
            .field(
                "facet_cross_filter_excludes_own_dimension",
                &self.facet_cross_filter_excludes_own_dimension,
            )
            .field("default_page_limit", &self.default_page_limit)
            .field("max_page_limit", &self.max_page_limit)
            .finish()
    }
}

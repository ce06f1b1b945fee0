//! Component A loader (spec §4.A): reads every lookup table into a fresh
//! [`LookupSnapshot`]. Called on startup and on the periodic refresh
//! schedule by `threadworks-server::refresh`; never on the request path.

use sqlx::PgPool;
use threadworks_core::lookup::{
    normalize_lookup_key, LookupDict, LookupEntry, LookupSnapshot, SizeEntry, StyleKeywordEntry,
    StyleKeywordType,
};

use crate::DbError;

#[derive(Debug, sqlx::FromRow)]
struct NameSlugRow {
    slug: String,
    name: String,
}

async fn load_dict(pool: &PgPool, table: &str) -> Result<LookupDict, DbError> {
    let query = format!("SELECT slug, name FROM {table} ORDER BY name ASC");
    let rows: Vec<NameSlugRow> = sqlx::query_as(&query).fetch_all(pool).await?;
    Ok(rows
        .into_iter()
        .map(|r| (normalize_lookup_key(&r.name), LookupEntry { slug: r.slug, name: r.name }))
        .collect())
}

#[derive(Debug, sqlx::FromRow)]
struct SizeRow {
    slug: String,
    name: String,
    sort_order: i32,
}

async fn load_sizes(pool: &PgPool) -> Result<std::collections::HashMap<String, SizeEntry>, DbError> {
    let rows: Vec<SizeRow> =
        sqlx::query_as("SELECT slug, name, sort_order FROM sizes ORDER BY sort_order ASC")
            .fetch_all(pool)
            .await?;
    Ok(rows
        .into_iter()
        .map(|r| {
            (
                normalize_lookup_key(&r.name),
                SizeEntry { slug: r.slug, name: r.name, sort_order: r.sort_order },
            )
        })
        .collect())
}

#[derive(Debug, sqlx::FromRow)]
struct StyleKeywordRow {
    slug: String,
    name: String,
    keyword_type: String,
}

async fn load_style_keywords(
    pool: &PgPool,
) -> Result<std::collections::HashMap<String, StyleKeywordEntry>, DbError> {
    let rows: Vec<StyleKeywordRow> =
        sqlx::query_as("SELECT slug, name, keyword_type FROM style_keywords ORDER BY name ASC")
            .fetch_all(pool)
            .await?;
    Ok(rows
        .into_iter()
        .map(|r| {
            let kind = match r.keyword_type.as_str() {
                "occasion" => StyleKeywordType::Occasion,
                "trend" => StyleKeywordType::Trend,
                _ => StyleKeywordType::Cut,
            };
            (
                normalize_lookup_key(&r.name),
                StyleKeywordEntry { slug: r.slug, name: r.name, kind },
            )
        })
        .collect())
}

/// Load a complete, current [`LookupSnapshot`] from the database.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any of the underlying queries fail.
pub async fn load_lookup_snapshot(pool: &PgPool) -> Result<LookupSnapshot, DbError> {
    Ok(LookupSnapshot {
        brands: load_dict(pool, "brands").await?,
        product_types: load_dict(pool, "product_types").await?,
        genders: load_dict(pool, "genders").await?,
        age_groups: load_dict(pool, "age_groups").await?,
        tags: load_dict(pool, "tags").await?,
        sectors: load_dict(pool, "related_sectors").await?,
        sports: load_dict(pool, "related_sports").await?,
        fits: load_dict(pool, "fits").await?,
        sleeves: load_dict(pool, "sleeves").await?,
        necklines: load_dict(pool, "necklines").await?,
        fabrics: load_dict(pool, "fabrics").await?,
        colours: load_dict(pool, "colours").await?,
        weight_ranges: load_dict(pool, "weight_ranges").await?,
        accreditations: load_dict(pool, "accreditations").await?,
        effects: load_dict(pool, "effects").await?,
        flags: load_dict(pool, "special_flags").await?,
        sizes: load_sizes(pool).await?,
        style_keywords: load_style_keywords(pool).await?,
    })
}

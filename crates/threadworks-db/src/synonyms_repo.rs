//! Component B loader (spec §4.B): reads the `synonyms` table into a
//! [`SynonymSnapshot`], falling back to the compiled-in fallback table
//! when the database has none yet.

use sqlx::PgPool;
use threadworks_core::synonyms::{fallback_synonyms, SynonymEntry, SynonymSnapshot, SynonymType};

use crate::DbError;

#[derive(Debug, sqlx::FromRow)]
struct SynonymRow {
    alias: String,
    canonical_slug: String,
    synonym_type: String,
}

fn parse_synonym_type(raw: &str) -> Option<SynonymType> {
    match raw {
        "brand" => Some(SynonymType::Brand),
        "product_type" => Some(SynonymType::ProductType),
        "sport" => Some(SynonymType::Sport),
        "fit" => Some(SynonymType::Fit),
        "sleeve" => Some(SynonymType::Sleeve),
        "neckline" => Some(SynonymType::Neckline),
        "fabric" => Some(SynonymType::Fabric),
        "sector" => Some(SynonymType::Sector),
        "colour" => Some(SynonymType::Colour),
        "feature" => Some(SynonymType::Feature),
        _ => None,
    }
}

/// Load the current synonym table. If the table is empty, seeds from
/// [`fallback_synonyms`] so the parser still resolves common aliases
/// before an operator has populated the table (spec §4.B).
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn load_synonym_snapshot(pool: &PgPool) -> Result<SynonymSnapshot, DbError> {
    let rows: Vec<SynonymRow> =
        sqlx::query_as("SELECT alias, canonical_slug, synonym_type FROM synonyms")
            .fetch_all(pool)
            .await?;

    if rows.is_empty() {
        return Ok(SynonymSnapshot::from_entries(fallback_synonyms()));
    }

    let entries: Vec<SynonymEntry> = rows
        .into_iter()
        .filter_map(|r| {
            let synonym_type = parse_synonym_type(&r.synonym_type)?;
            Some(SynonymEntry { alias: r.alias, canonical_slug: r.canonical_slug, synonym_type })
        })
        .collect();

    Ok(SynonymSnapshot::from_entries(entries))
}

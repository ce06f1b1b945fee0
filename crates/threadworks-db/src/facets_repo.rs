//! Component G (spec §4.G): facet aggregation.
//!
//! Dispatches one subquery per facetable dimension, each against the same
//! filtered base set (minus that dimension's own selection, when
//! `facet_cross_filter_excludes_own_dimension` is set), bounded by a
//! `tokio::sync::Semaphore` fan-out limit rather than issued as a single
//! UNION-ALL statement — see `DESIGN.md` for why.

use std::collections::HashMap;
use std::sync::Arc;

use sqlx::{PgPool, Postgres, QueryBuilder};
use tokio::sync::Semaphore;
use threadworks_core::facets::{FacetKind, ALL_FACET_DIMENSIONS};
use threadworks_core::filter_predicate::{build_filter_predicate, build_filter_predicate_excluding};
use threadworks_core::lookup::{LookupDict, LookupSnapshot};
use threadworks_core::types::{FacetValue, FilterSet};

use crate::predicate_sql::push_predicate;
use crate::projection::FacetCountRow;
use crate::DbError;

pub type FacetAggregationError = DbError;

async fn count_scalar_dimension(
    pool: &PgPool,
    column: &str,
    predicate: &threadworks_core::predicate::Predicate,
) -> Result<Vec<FacetCountRow>, DbError> {
    let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(format!(
        "SELECT {column} AS slug, COUNT(*) AS count \
         FROM search_projection WHERE {column} IS NOT NULL AND "
    ));
    push_predicate(&mut builder, predicate);
    builder.push(format!(" GROUP BY {column} ORDER BY count DESC"));

    let rows: Vec<FacetCountRow> = builder.build_query_as().fetch_all(pool).await?;
    Ok(rows)
}

async fn count_array_dimension(
    pool: &PgPool,
    column: &str,
    predicate: &threadworks_core::predicate::Predicate,
) -> Result<Vec<FacetCountRow>, DbError> {
    let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(format!(
        "SELECT value AS slug, COUNT(*) AS count \
         FROM search_projection, LATERAL unnest({column}) AS value \
         WHERE "
    ));
    push_predicate(&mut builder, predicate);
    builder.push(" GROUP BY value ORDER BY count DESC");

    let rows: Vec<FacetCountRow> = builder.build_query_as().fetch_all(pool).await?;
    Ok(rows)
}

/// Find the display name for a slug in the dictionary backing `dimension_key`.
///
/// Covers every entry in `ALL_FACET_DIMENSIONS`, not just the
/// [`LookupSnapshot::PROBE_ORDER`] subset `dict_by_dimension` serves the
/// parser — facets surface dimensions (gender, size, style keywords, ...)
/// the parser never probes for. `feature` has no dedicated lookup table yet
/// and is resolved against `accreditations`, same as the parser's probe for
/// that dimension; see `DESIGN.md`.
fn find_name(dimension_key: &str, lookup: &LookupSnapshot, slug: &str) -> Option<String> {
    let by_slug = |dict: &LookupDict| dict.values().find(|e| e.slug == slug).map(|e| e.name.clone());
    match dimension_key {
        "brand" => by_slug(&lookup.brands),
        "product_type" => by_slug(&lookup.product_types),
        "gender" => by_slug(&lookup.genders),
        "age_group" => by_slug(&lookup.age_groups),
        "tag" => by_slug(&lookup.tags),
        "primary_colour" | "colour_shade" | "colour" => by_slug(&lookup.colours),
        "sleeve" => by_slug(&lookup.sleeves),
        "neckline" => by_slug(&lookup.necklines),
        "fabric" => by_slug(&lookup.fabrics),
        "weight" => by_slug(&lookup.weight_ranges),
        "fit" => by_slug(&lookup.fits),
        "feature" | "accreditation" => by_slug(&lookup.accreditations),
        "effect" => by_slug(&lookup.effects),
        "sector" => by_slug(&lookup.sectors),
        "sport" => by_slug(&lookup.sports),
        "flag" => by_slug(&lookup.flags),
        "size" => lookup.sizes.values().find(|e| e.slug == slug).map(|e| e.name.clone()),
        "style" => lookup.style_keywords.values().find(|e| e.slug == slug).map(|e| e.name.clone()),
        _ => None,
    }
}

/// The raw SQL queries only know slugs; resolve each row's display name
/// from the matching lookup dictionary so facet values show the same name
/// the parser and filter validator use (spec §8: facet display names must
/// agree with the lookup snapshot). Falls back to the slug itself when a
/// dictionary has no matching entry yet.
fn resolve_display_names(
    dimension_key: &str,
    lookup: &LookupSnapshot,
    rows: Vec<FacetCountRow>,
) -> Vec<FacetValue> {
    rows.into_iter()
        .map(|r| {
            let name = find_name(dimension_key, lookup, &r.slug).unwrap_or_else(|| r.slug.clone());
            FacetValue { slug: r.slug, name, count: r.count }
        })
        .collect()
}

/// Aggregate facet counts for every dimension, bounded to at most
/// `fanout_limit` concurrent subqueries.
///
/// When `exclude_own_dimension` is true, a dimension's own selected values
/// are dropped from its own count query (so a selected colour doesn't
/// shrink its own facet options to just itself) while still constraining
/// every other dimension's counts.
///
/// # Errors
///
/// Returns the first [`DbError`] encountered; other in-flight subqueries
/// are allowed to finish but their results are discarded.
pub async fn aggregate_facets(
    pool: &PgPool,
    filters: &FilterSet,
    lookup: &LookupSnapshot,
    fanout_limit: usize,
    exclude_own_dimension: bool,
) -> Result<HashMap<String, Vec<FacetValue>>, FacetAggregationError> {
    let semaphore = Arc::new(Semaphore::new(fanout_limit.max(1)));

    let tasks = ALL_FACET_DIMENSIONS.iter().map(|dim| {
        let semaphore = Arc::clone(&semaphore);
        let predicate = if exclude_own_dimension {
            build_filter_predicate_excluding(filters, dim.key)
        } else {
            build_filter_predicate(filters)
        };
        async move {
            let _permit = semaphore.acquire().await.expect("semaphore not closed");
            let rows = match dim.kind {
                FacetKind::Scalar => count_scalar_dimension(pool, dim.column, &predicate).await,
                FacetKind::Array => count_array_dimension(pool, dim.column, &predicate).await,
            }?;
            Ok::<_, DbError>((dim.key, resolve_display_names(dim.key, lookup, rows)))
        }
    });

    let results = futures::future::join_all(tasks).await;

    let mut facets = HashMap::with_capacity(ALL_FACET_DIMENSIONS.len());
    for result in results {
        let (key, values) = result?;
        facets.insert(key.to_string(), values);
    }
    Ok(facets)
}

#[cfg(test)]
mod tests {
    use threadworks_core::lookup::LookupEntry;

    use super::*;

    fn snapshot_with_one_brand() -> LookupSnapshot {
        let mut snapshot = LookupSnapshot::default();
        snapshot.brands.insert(
            "acme".to_string(),
            LookupEntry { slug: "acme".to_string(), name: "Acme".to_string() },
        );
        snapshot
    }

    #[test]
    fn resolve_display_names_finds_known_slug() {
        let snapshot = snapshot_with_one_brand();
        let rows = vec![FacetCountRow { slug: "acme".to_string(), count: 5 }];
        let values = resolve_display_names("brand", &snapshot, rows);
        assert_eq!(values, vec![FacetValue { slug: "acme".into(), name: "Acme".into(), count: 5 }]);
    }

    #[test]
    fn resolve_display_names_falls_back_to_slug_when_unknown() {
        let snapshot = LookupSnapshot::default();
        let rows = vec![FacetCountRow { slug: "ghost".to_string(), count: 1 }];
        let values = resolve_display_names("brand", &snapshot, rows);
        assert_eq!(values, vec![FacetValue { slug: "ghost".into(), name: "ghost".into(), count: 1 }]);
    }

    #[test]
    fn find_name_covers_every_facet_dimension() {
        let snapshot = LookupSnapshot::default();
        for dim in ALL_FACET_DIMENSIONS {
            // Must not panic on an unknown slug for any dimension key.
            assert!(find_name(dim.key, &snapshot, "not-present").is_none());
        }
    }
}

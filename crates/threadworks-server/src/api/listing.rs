//! `GET /api/v1/products` (spec §6): parses query params into a
//! [`FilterSet`], runs the free-text parser and relevance scorer, probes
//! the listing cache, and falls through to Postgres on a miss.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::{Extension, Json};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;
use std::time::Duration;
use threadworks_core::cache_key::cache_key;
use threadworks_core::query::parse_query;
use threadworks_core::search_predicate::build_search_predicate;
use threadworks_core::types::{FilterSet, ListingResponse, SortMode, SortOrder};

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};
use crate::middleware::RequestId;

/// Raw query-string shape for the listing endpoint. Array-valued
/// dimensions are accepted as comma-separated lists (spec §4.E).
#[derive(Debug, Deserialize, Default)]
pub struct ListingQuery {
    pub q: Option<String>,
    pub brand: Option<String>,
    pub product_type: Option<String>,
    pub gender: Option<String>,
    pub age_group: Option<String>,
    pub tag: Option<String>,
    pub primary_colour: Option<String>,
    pub colour_shade: Option<String>,
    pub sleeve: Option<String>,
    pub neckline: Option<String>,
    pub fabric: Option<String>,
    pub size: Option<String>,
    pub style: Option<String>,
    pub colour: Option<String>,
    pub weight: Option<String>,
    pub fit: Option<String>,
    pub feature: Option<String>,
    pub effect: Option<String>,
    pub accreditation: Option<String>,
    pub sector: Option<String>,
    pub sport: Option<String>,
    pub flag: Option<String>,
    pub price_min: Option<Decimal>,
    pub price_max: Option<Decimal>,
    pub is_best_seller: Option<bool>,
    pub is_recommended: Option<bool>,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

fn split_csv(value: &Option<String>) -> Vec<String> {
    value
        .as_deref()
        .map(|v| v.split(',').map(str::trim).filter(|s| !s.is_empty()).map(String::from).collect())
        .unwrap_or_default()
}

pub(super) fn into_filter_set(query: ListingQuery, default_limit: u32, max_limit: u32) -> FilterSet {
    FilterSet {
        q: query.q.filter(|s| !s.trim().is_empty()),
        brand: query.brand,
        product_type: query.product_type,
        gender: query.gender,
        age_group: query.age_group,
        tag: query.tag,
        primary_colour: query.primary_colour,
        colour_shade: query.colour_shade,
        sleeve: split_csv(&query.sleeve),
        neckline: split_csv(&query.neckline),
        fabric: split_csv(&query.fabric),
        size: split_csv(&query.size),
        style: split_csv(&query.style),
        colour: split_csv(&query.colour),
        weight: split_csv(&query.weight),
        fit: split_csv(&query.fit),
        feature: split_csv(&query.feature),
        effect: split_csv(&query.effect),
        accreditation: split_csv(&query.accreditation),
        sector: split_csv(&query.sector),
        sport: split_csv(&query.sport),
        flag: split_csv(&query.flag),
        price_min: query.price_min,
        price_max: query.price_max,
        is_best_seller: query.is_best_seller,
        is_recommended: query.is_recommended,
        sort: query.sort.as_deref().and_then(|s| SortMode::from_str(s).ok()).unwrap_or_default(),
        order: query.order.as_deref().and_then(|s| SortOrder::from_str(s).ok()).unwrap_or_default(),
        page: query.page.unwrap_or(1).max(1),
        limit: query.limit.unwrap_or(default_limit).clamp(1, max_limit),
    }
}

/// Merge a parsed query's dictionary matches into the scalar filter
/// dimensions they correspond to, so a word like "nike" in free text
/// constrains the same column a `?brand=nike` query param would (spec
/// §4.C: dictionary matches feed both filtering and, for a subset of
/// dimensions, relevance scoring).
pub(super) fn merge_dictionary_matches(filters: &mut FilterSet, matches: &[(&'static str, String)]) {
    for (dimension, slug) in matches {
        match *dimension {
            "brand" if filters.brand.is_none() => filters.brand = Some(slug.clone()),
            "product_type" if filters.product_type.is_none() => {
                filters.product_type = Some(slug.clone());
            }
            "sport" if !filters.sport.contains(slug) => filters.sport.push(slug.clone()),
            "fit" if !filters.fit.contains(slug) => filters.fit.push(slug.clone()),
            "sleeve" if !filters.sleeve.contains(slug) => filters.sleeve.push(slug.clone()),
            "neckline" if !filters.neckline.contains(slug) => filters.neckline.push(slug.clone()),
            "fabric" if !filters.fabric.contains(slug) => filters.fabric.push(slug.clone()),
            "sector" if !filters.sector.contains(slug) => filters.sector.push(slug.clone()),
            "colour" if !filters.colour.contains(slug) => filters.colour.push(slug.clone()),
            "feature" if !filters.feature.contains(slug) => filters.feature.push(slug.clone()),
            _ => {}
        }
    }
}

pub async fn list_products(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ListingQuery>,
) -> impl IntoResponse {
    let mut filters =
        into_filter_set(query, state.config.default_page_limit, state.config.max_page_limit);

    let lookup = state.lookup.load();
    let synonyms = state.synonyms.load();

    let raw_query = filters.q.clone().unwrap_or_default();
    let parsed = parse_query(&raw_query, &lookup, &synonyms);
    merge_dictionary_matches(&mut filters, &parsed.dictionary_matches);

    let search_predicate = build_search_predicate(
        &parsed,
        &lookup,
        &state.config.relevance_weights,
        &state.config.short_query_weights,
    );

    let key = cache_key("listing", &filters);
    if let Some(cached) = state.cache.get::<ListingResponse>(&key).await {
        return Json(ApiResponse { data: cached, meta: ResponseMeta::new(req_id.0) }).into_response();
    }

    let deadline = Duration::from_secs(state.config.deadlines.listing_secs);
    match threadworks_db::with_deadline(
        deadline,
        "fetch_listing_page",
        threadworks_db::fetch_listing_page(&state.pool, &filters, &search_predicate),
    )
    .await
    {
        Ok(response) => {
            let ttl = Duration::from_secs(state.config.cache_ttls.listing_secs);
            state.cache.set(&key, &response, ttl).await;
            Json(ApiResponse { data: response, meta: ResponseMeta::new(req_id.0) }).into_response()
        }
        Err(error) => map_db_error(req_id.0, &error).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_split_trims_and_drops_empties() {
        let value = Some("red, blue,, green".to_string());
        assert_eq!(split_csv(&value), vec!["red", "blue", "green"]);
    }

    #[test]
    fn csv_split_of_none_is_empty() {
        assert_eq!(split_csv(&None), Vec::<String>::new());
    }

    #[test]
    fn merge_dictionary_matches_fills_unset_scalar_and_dedupes_array() {
        let mut filters = FilterSet { fit: vec!["slim".to_string()], ..Default::default() };
        merge_dictionary_matches(
            &mut filters,
            &[("brand", "nike".to_string()), ("fit", "slim".to_string())],
        );
        assert_eq!(filters.brand, Some("nike".to_string()));
        assert_eq!(filters.fit, vec!["slim".to_string()]);
    }

    #[test]
    fn merge_dictionary_matches_does_not_override_explicit_filter() {
        let mut filters = FilterSet { brand: Some("adidas".to_string()), ..Default::default() };
        merge_dictionary_matches(&mut filters, &[("brand", "nike".to_string())]);
        assert_eq!(filters.brand, Some("adidas".to_string()));
    }

    #[test]
    fn into_filter_set_clamps_limit_and_defaults_page() {
        let query = ListingQuery { limit: Some(1000), ..Default::default() };
        let filters = into_filter_set(query, 50, 200);
        assert_eq!(filters.limit, 200);
        assert_eq!(filters.page, 1);
    }

    #[test]
    fn into_filter_set_blank_q_is_none() {
        let query = ListingQuery { q: Some("   ".to_string()), ..Default::default() };
        let filters = into_filter_set(query, 50, 200);
        assert_eq!(filters.q, None);
    }
}

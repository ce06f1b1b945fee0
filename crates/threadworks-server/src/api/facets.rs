//! `GET /api/v1/facets` (spec §6/§4.G): facet counts for the current
//! filter selection, cached under the `aggregation` kind since it changes
//! less often than a single listing page.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::{Extension, Json};
use std::collections::HashMap;
use std::time::Duration;
use threadworks_core::cache_key::cache_key;
use threadworks_core::query::parse_query;
use threadworks_core::types::FacetValue;

use super::listing::{into_filter_set, merge_dictionary_matches, ListingQuery};
use super::{map_db_error, ApiResponse, AppState, ResponseMeta};
use crate::middleware::RequestId;

pub async fn list_facets(
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

    let key = cache_key("aggregation", &filters);
    if let Some(cached) = state.cache.get::<HashMap<String, Vec<FacetValue>>>(&key).await {
        return Json(ApiResponse { data: cached, meta: ResponseMeta::new(req_id.0) }).into_response();
    }

    let deadline = Duration::from_secs(state.config.deadlines.facet_subquery_secs);
    let result = threadworks_db::with_deadline(
        deadline,
        "aggregate_facets",
        threadworks_db::aggregate_facets(
            &state.pool,
            &filters,
            &lookup,
            state.config.facet_fanout_limit,
            state.config.facet_cross_filter_excludes_own_dimension,
        ),
    )
    .await;

    match result {
        Ok(facets) => {
            let ttl = Duration::from_secs(state.config.cache_ttls.aggregation_secs);
            state.cache.set(&key, &facets, ttl).await;
            Json(ApiResponse { data: facets, meta: ResponseMeta::new(req_id.0) }).into_response()
        }
        Err(error) => map_db_error(req_id.0, &error).into_response(),
    }
}

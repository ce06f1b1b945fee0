//! `POST /api/v1/admin/cache/invalidate` (spec §6): manual cache bust,
//! used after a catalog import or lookup/synonym correction so stale
//! listings/facets/details don't linger out to their full TTL.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use threadworks_core::cache_key::cache_key_prefix;

use super::{ApiResponse, AppState, ResponseMeta};
use crate::middleware::RequestId;

const ALL_KINDS: &[&str] = &["listing", "aggregation", "count", "price_range", "detail"];

/// Optional list of artifact kinds to invalidate (one of `ALL_KINDS`).
/// An empty or absent list invalidates every kind.
#[derive(Debug, Deserialize, Default)]
pub struct InvalidateRequest {
    #[serde(default)]
    pub kinds: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct InvalidateResult {
    pub kind: String,
    pub removed: u64,
}

pub async fn invalidate_cache(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Option<Json<InvalidateRequest>>,
) -> impl IntoResponse {
    let requested = body.map(|Json(b)| b.kinds).unwrap_or_default();
    let kinds: Vec<&str> = if requested.is_empty() {
        ALL_KINDS.to_vec()
    } else {
        ALL_KINDS.iter().copied().filter(|k| requested.iter().any(|r| r == k)).collect()
    };

    let mut results = Vec::with_capacity(kinds.len());
    for kind in kinds {
        let removed = state.cache.invalidate_prefix(&cache_key_prefix(kind)).await;
        results.push(InvalidateResult { kind: kind.to_string(), removed });
    }

    Json(ApiResponse { data: results, meta: ResponseMeta::new(req_id.0) })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_kinds_match_the_cache_key_kind_strings() {
        assert_eq!(ALL_KINDS, &["listing", "aggregation", "count", "price_range", "detail"]);
    }
}

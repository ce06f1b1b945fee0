//! `GET /api/v1/products/{code}` (spec §6): single-product detail, cached
//! under the `detail` kind with the longest TTL of any cached artifact
//! since a product's attributes change far less often than its ranking.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::{Extension, Json};
use std::time::Duration;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};
use crate::middleware::RequestId;

fn detail_cache_key(code: &str) -> String {
    format!("detail:{code}")
}

pub async fn get_product_detail(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(code): Path<String>,
) -> impl IntoResponse {
    let key = detail_cache_key(&code);

    if let Some(cached) = state.cache.get::<threadworks_core::types::DetailResponse>(&key).await {
        return Json(ApiResponse { data: cached, meta: ResponseMeta::new(req_id.0) }).into_response();
    }

    let deadline = Duration::from_secs(state.config.deadlines.detail_secs);
    let result = threadworks_db::with_deadline(
        deadline,
        "fetch_product_detail",
        threadworks_db::fetch_product_detail(&state.pool, &code),
    )
    .await;

    match result {
        Ok(Some(detail)) => {
            let ttl = Duration::from_secs(state.config.cache_ttls.detail_secs);
            state.cache.set(&key, &detail, ttl).await;
            Json(ApiResponse { data: detail, meta: ResponseMeta::new(req_id.0) }).into_response()
        }
        Ok(None) => {
            ApiError::new(req_id.0, "not_found", format!("no product with code {code}"))
                .into_response()
        }
        Err(error) => map_db_error(req_id.0, &error).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_cache_key_is_namespaced_by_code() {
        assert_eq!(detail_cache_key("AB123"), "detail:AB123");
    }
}

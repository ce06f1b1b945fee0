//! Per-product pricing overrides (spec §4.F.8, §9 Open Question 3): a
//! product's markup tier or quantity price-break schedule can be
//! overridden individually; absent an override, both fall back to the
//! global defaults.

use rust_decimal::Decimal;
use sqlx::PgPool;
use threadworks_core::pricing::{PriceBreakTier, DEFAULT_PRICE_BREAKS};

use crate::DbError;

/// Load a product's markup override, if one has been configured.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] on a query failure.
pub async fn load_product_markup_override(
    pool: &PgPool,
    code: &str,
) -> Result<Option<Decimal>, DbError> {
    let markup: Option<Decimal> = sqlx::query_scalar(
        "SELECT markup FROM product_markup_overrides WHERE product_code = $1",
    )
    .bind(code)
    .fetch_optional(pool)
    .await?;
    Ok(markup)
}

#[derive(Debug, Clone, sqlx::FromRow)]
struct PriceBreakOverrideRow {
    min_qty: i32,
    max_qty: Option<i32>,
    discount_percent: i32,
}

/// Load the raw per-product price-break override rows, if any exist. An
/// empty result means the product has no override and the caller should
/// fall back to [`DEFAULT_PRICE_BREAKS`] (see [`load_price_break_schedule`]).
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] on a query failure.
pub async fn load_product_price_overrides(
    pool: &PgPool,
    code: &str,
) -> Result<Vec<PriceBreakTier>, DbError> {
    let rows: Vec<PriceBreakOverrideRow> = sqlx::query_as(
        "SELECT min_qty, max_qty, discount_percent \
         FROM product_price_break_overrides \
         WHERE product_code = $1 \
         ORDER BY min_qty ASC",
    )
    .bind(code)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| PriceBreakTier {
            min: u32::try_from(r.min_qty).unwrap_or(0),
            max: r.max_qty.map(|m| u32::try_from(m).unwrap_or(0)),
            discount_percent: u32::try_from(r.discount_percent).unwrap_or(0),
        })
        .collect())
}

/// Resolve the effective price-break schedule for a product: its override
/// schedule if one exists, otherwise the compiled-in global default.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] on a query failure.
pub async fn load_price_break_schedule(
    pool: &PgPool,
    code: &str,
) -> Result<Vec<PriceBreakTier>, DbError> {
    let overrides = load_product_price_overrides(pool, code).await?;
    if overrides.is_empty() {
        Ok(DEFAULT_PRICE_BREAKS.to_vec())
    } else {
        Ok(overrides)
    }
}

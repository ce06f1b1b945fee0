//! Component F (spec §4.F): the two-phase listing paginator and the
//! detail-page loader.
//!
//! Phase 1 ranks style codes on a narrow projection (code + score only);
//! phase 2 hydrates the full row plus colour variants for just the codes
//! on the requested page. Every query here runs against the
//! `sku_status = 'Live'` slice of the projection (spec §3 invariant); colour
//! and price filters are enforced once, at the SQL predicate level, so
//! nothing needs re-checking after hydration.

use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};
use threadworks_core::filter_predicate::build_filter_predicate;
use threadworks_core::predicate::Predicate;
use threadworks_core::pricing::{build_price_breaks, derive_markup};
use threadworks_core::search_predicate::{ScoreTerm, SearchPredicate};
use threadworks_core::types::{
    ColourVariant, DetailAttributes, DetailImage, DetailResponse, FilterSet, ImageKind,
    ListingItem, ListingResponse, PriceRange, SortMode, SortOrder,
};

use crate::overrides_repo::{load_price_break_schedule, load_product_markup_override};
use crate::predicate_sql::push_predicate;
use crate::projection::{ColourVariantRow, DetailImageRow, RankedCodeRow, SearchProjectionRow};
use crate::DbError;

fn score_case(term: &ScoreTerm) -> (String, Vec<String>, i32) {
    match term {
        ScoreTerm::ExactCode { code, weight } => {
            ("code = {}".to_string(), vec![code.clone()], *weight)
        }
        ScoreTerm::PrefixCode { code, weight } => {
            ("code ILIKE {}".to_string(), vec![format!("{code}%")], *weight)
        }
        ScoreTerm::NameRegex { pattern, weight } => {
            ("name ~* {}".to_string(), vec![pattern.clone()], *weight)
        }
        ScoreTerm::FullText { query, weight } => (
            "name_tsv @@ plainto_tsquery('english', {})".to_string(),
            vec![query.clone()],
            *weight,
        ),
        ScoreTerm::ColourOverlap { values, weight } => {
            ("colour_slugs && {}::text[]".to_string(), values.clone(), *weight)
        }
        ScoreTerm::FabricOverlap { values, weight } => {
            ("fabric_slugs && {}::text[]".to_string(), values.clone(), *weight)
        }
        ScoreTerm::NecklineOverlap { values, weight } => {
            ("neckline_slugs && {}::text[]".to_string(), values.clone(), *weight)
        }
        ScoreTerm::SleeveOverlap { values, weight } => {
            ("sleeve_slugs && {}::text[]".to_string(), values.clone(), *weight)
        }
        ScoreTerm::StyleKeywordOverlap { values, weight } => {
            ("style_slugs && {}::text[]".to_string(), values.clone(), *weight)
        }
    }
}

/// Push a `(CASE WHEN ... THEN weight ELSE 0 END) + ...` relevance score
/// expression built from `score_terms`, or the literal `0` if there are
/// none.
fn push_score_expression(builder: &mut QueryBuilder<'_, Postgres>, score_terms: &[ScoreTerm]) {
    if score_terms.is_empty() {
        builder.push("0");
        return;
    }
    for (i, term) in score_terms.iter().enumerate() {
        if i > 0 {
            builder.push(" + ");
        }
        let (template, binds, weight) = score_case(term);
        builder.push("(CASE WHEN ");
        // Each template has exactly one `{}` placeholder for a single bind,
        // except the array-overlap templates which also bind a single Vec.
        let mut parts = template.splitn(2, "{}");
        builder.push(parts.next().unwrap());
        if binds.len() == 1 && !template.contains("::text[]") {
            builder.push_bind(binds.into_iter().next().unwrap());
        } else {
            builder.push_bind(binds);
        }
        builder.push(parts.next().unwrap());
        builder.push(" THEN ").push_bind(weight).push(" ELSE 0 END)");
    }
}

fn order_by_clause(sort: SortMode, order: SortOrder, has_score: bool) -> &'static str {
    let dir = match order {
        SortOrder::Asc => "ASC",
        SortOrder::Desc => "DESC",
    };
    match (sort, has_score) {
        (SortMode::Newest, true) => "score DESC, created_at DESC",
        (SortMode::Newest, false) => "created_at DESC",
        (SortMode::Price, _) if matches!(dir, "ASC") => "sell_price ASC, score DESC",
        (SortMode::Price, _) => "sell_price DESC, score DESC",
        (SortMode::Name, _) if matches!(dir, "ASC") => "name ASC",
        (SortMode::Name, _) => "name DESC",
        (SortMode::Brand, _) if matches!(dir, "ASC") => "brand_slug ASC, name ASC",
        (SortMode::Brand, _) => "brand_slug DESC, name ASC",
        (SortMode::Code, _) if matches!(dir, "ASC") => "code ASC",
        (SortMode::Code, _) => "code DESC",
        (SortMode::Best, _) => "is_best_seller DESC, score DESC",
        (SortMode::Recommended, _) => "is_recommended DESC, score DESC",
    }
}

async fn count_and_price_range(
    pool: &PgPool,
    predicate: &Predicate,
) -> Result<(i64, Decimal, Decimal), DbError> {
    let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(
        "SELECT COUNT(*) AS total, \
         COALESCE(MIN(sell_price), 0) AS price_min, \
         COALESCE(MAX(sell_price), 0) AS price_max \
         FROM search_projection WHERE ",
    );
    push_predicate(&mut builder, predicate);

    #[derive(sqlx::FromRow)]
    struct Row {
        total: i64,
        price_min: Decimal,
        price_max: Decimal,
    }
    let row: Row = builder.build_query_as().fetch_one(pool).await?;
    Ok((row.total, row.price_min, row.price_max))
}

async fn rank_codes_page(
    pool: &PgPool,
    predicate: &Predicate,
    score_terms: &[ScoreTerm],
    sort: SortMode,
    order: SortOrder,
    page: u32,
    limit: u32,
) -> Result<Vec<RankedCodeRow>, DbError> {
    let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new("SELECT code, (");
    push_score_expression(&mut builder, score_terms);
    builder.push(") AS score FROM search_projection WHERE ");
    push_predicate(&mut builder, predicate);
    builder.push(format!(
        " ORDER BY {} LIMIT ",
        order_by_clause(sort, order, !score_terms.is_empty())
    ));
    builder.push_bind(i64::from(limit));
    builder.push(" OFFSET ");
    builder.push_bind(i64::from(page.saturating_sub(1)) * i64::from(limit));

    Ok(builder.build_query_as().fetch_all(pool).await?)
}

async fn fetch_colour_variants(
    pool: &PgPool,
    codes: &[String],
) -> Result<std::collections::HashMap<String, Vec<ColourVariant>>, DbError> {
    let rows: Vec<ColourVariantRow> = sqlx::query_as(
        "SELECT product_code, name, main_hex, thumb_hex \
         FROM product_colour_variants WHERE product_code = ANY($1)",
    )
    .bind(codes)
    .fetch_all(pool)
    .await?;

    let mut by_code: std::collections::HashMap<String, Vec<ColourVariant>> =
        std::collections::HashMap::new();
    for row in rows {
        by_code.entry(row.product_code).or_default().push(ColourVariant {
            name: row.name,
            main: row.main_hex,
            thumb: row.thumb_hex,
        });
    }
    Ok(by_code)
}

async fn hydrate_rows(pool: &PgPool, codes: &[String]) -> Result<Vec<SearchProjectionRow>, DbError> {
    if codes.is_empty() {
        return Ok(Vec::new());
    }
    let rows: Vec<SearchProjectionRow> =
        sqlx::query_as("SELECT * FROM search_projection WHERE code = ANY($1)")
            .bind(codes)
            .fetch_all(pool)
            .await?;
    Ok(rows)
}

/// Fetch one page of listing results for `filters` + `search_predicate`.
///
/// # Errors
///
/// Returns [`DbError`] on any underlying query failure.
pub async fn fetch_listing_page(
    pool: &PgPool,
    filters: &FilterSet,
    search_predicate: &SearchPredicate,
) -> Result<ListingResponse, DbError> {
    let combined = Predicate::and(vec![
        build_filter_predicate(filters),
        search_predicate.predicate.clone(),
    ]);

    let (total, price_min, price_max) = count_and_price_range(pool, &combined).await?;

    let ranked = rank_codes_page(
        pool,
        &combined,
        &search_predicate.score_terms,
        filters.sort,
        filters.order,
        filters.page,
        filters.limit,
    )
    .await?;

    let codes: Vec<String> = ranked.iter().map(|r| r.code.clone()).collect();
    let rows = hydrate_rows(pool, &codes).await?;
    let colours = fetch_colour_variants(pool, &codes).await?;

    let mut rows_by_code: std::collections::HashMap<String, SearchProjectionRow> =
        rows.into_iter().map(|r| (r.code.clone(), r)).collect();

    let mut items = Vec::with_capacity(ranked.len());

    for ranked_row in &ranked {
        let Some(row) = rows_by_code.remove(&ranked_row.code) else {
            continue;
        };

        let markup_override = load_product_markup_override(pool, &row.code).await?;
        let (markup_tier, markup_source) =
            derive_markup(row.base_price, row.sell_price, markup_override);
        let schedule = load_price_break_schedule(pool, &row.code).await?;
        let price_breaks = build_price_breaks(row.sell_price, &schedule);

        items.push(ListingItem {
            code: row.code.clone(),
            name: row.name,
            brand: row.brand_name,
            price: row.sell_price,
            carton_price: row.carton_price,
            image: row.image_url,
            colors: colours.get(&row.code).cloned().unwrap_or_default(),
            sizes: row.size_slugs,
            customization: row.feature_slugs,
            price_breaks,
            markup_tier,
            markup_source,
            display_order: row.display_order,
        });
    }

    Ok(ListingResponse {
        items,
        total,
        price_range: PriceRange { min: price_min, max: price_max },
    })
}

/// Fetch the full detail payload for a single style code.
///
/// # Errors
///
/// Returns [`DbError`] on any underlying query failure.
pub async fn fetch_product_detail(
    pool: &PgPool,
    code: &str,
) -> Result<Option<DetailResponse>, DbError> {
    let row: Option<SearchProjectionRow> = sqlx::query_as(
        "SELECT * FROM search_projection WHERE code = $1 AND sku_status = 'Live'",
    )
    .bind(code)
    .fetch_optional(pool)
    .await?;
    let Some(row) = row else {
        return Ok(None);
    };

    let codes = vec![row.code.clone()];
    let colours = fetch_colour_variants(pool, &codes).await?;
    let colors = colours.get(&row.code).cloned().unwrap_or_default();

    let image_rows: Vec<DetailImageRow> = sqlx::query_as(
        "SELECT product_code, url, kind FROM product_images WHERE product_code = $1 ORDER BY url ASC",
    )
    .bind(&row.code)
    .fetch_all(pool)
    .await?;
    let images = image_rows
        .into_iter()
        .map(|r| DetailImage {
            url: r.url,
            kind: if r.kind == "main" { ImageKind::Main } else { ImageKind::Thumb },
        })
        .collect();

    let markup_override = load_product_markup_override(pool, &row.code).await?;
    let (markup_tier, _source) = derive_markup(row.base_price, row.sell_price, markup_override);
    let schedule = load_price_break_schedule(pool, &row.code).await?;
    let price_breaks = build_price_breaks(row.sell_price, &schedule);

    Ok(Some(DetailResponse {
        code: row.code,
        name: row.name,
        brand: row.brand_name,
        product_type: row.product_type_slug,
        price: row.sell_price,
        base_price: row.base_price,
        sell_price: row.sell_price,
        carton_price: row.carton_price,
        markup_tier,
        price_breaks,
        colors,
        sizes: row.size_slugs,
        images,
        description: row.description,
        details: DetailAttributes {
            fit: row.fit_slugs,
            fabric: row.fabric_slugs,
            weight: row.weight_slugs,
            care: row.care_instructions,
        },
        customization: row.feature_slugs,
    }))
}

//! Row types for the `search_projection` view (spec §3): the flattened,
//! query-optimized read model the listing/facet/detail queries run
//! against. This is deliberately NOT the authoritative product/catalog
//! schema — see `migrations/` and `DESIGN.md` for the boundary.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// One row of `search_projection`, one row per SKU (style code).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SearchProjectionRow {
    pub code: String,
    pub created_at: DateTime<Utc>,
    pub name: String,
    pub brand_slug: String,
    pub brand_name: String,
    pub product_type_slug: Option<String>,
    pub gender_slug: Option<String>,
    pub age_group_slug: Option<String>,
    pub tag_slug: Option<String>,
    pub primary_colour_slug: Option<String>,
    pub colour_shade_slug: Option<String>,

    pub sleeve_slugs: Vec<String>,
    pub neckline_slugs: Vec<String>,
    pub fabric_slugs: Vec<String>,
    pub size_slugs: Vec<String>,
    pub style_slugs: Vec<String>,
    pub colour_slugs: Vec<String>,
    pub weight_slugs: Vec<String>,
    pub fit_slugs: Vec<String>,
    pub feature_slugs: Vec<String>,
    pub effect_slugs: Vec<String>,
    pub accreditation_slugs: Vec<String>,
    pub sector_slugs: Vec<String>,
    pub sport_slugs: Vec<String>,
    pub flag_slugs: Vec<String>,

    pub base_price: Decimal,
    pub sell_price: Decimal,
    pub carton_price: Option<Decimal>,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub care_instructions: Option<String>,
    pub display_order: Option<i32>,
    pub is_best_seller: bool,
    pub is_recommended: bool,
}

/// A style code and its relevance score — the narrow phase-1 projection
/// the two-phase paginator ranks on (spec §4.F: "rank style-codes on a
/// narrow projection, then hydrate SKUs for the page only").
#[derive(Debug, Clone, sqlx::FromRow, PartialEq)]
pub struct RankedCodeRow {
    pub code: String,
    pub score: i32,
}

/// One colour-variant row, joined in separately from the main projection
/// (spec §3: `colors: [{name, main, thumb}]`).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ColourVariantRow {
    pub product_code: String,
    pub name: String,
    pub main_hex: String,
    pub thumb_hex: String,
}

/// One detail-page image row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DetailImageRow {
    pub product_code: String,
    pub url: String,
    pub kind: String,
}

/// One facet count row for a single dimension. Display names aren't
/// queried here — `search_projection` only carries slugs for most
/// dimensions — they're resolved afterwards from a `LookupSnapshot`.
#[derive(Debug, Clone, sqlx::FromRow, PartialEq)]
pub struct FacetCountRow {
    pub slug: String,
    pub count: i64,
}

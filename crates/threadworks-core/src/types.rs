//! Shared DTOs that cross the core/db/server boundary.
//!
//! These are the shapes described in spec §3 (search projection) and §6
//! (listing/facet/detail responses). Nothing here touches SQL or HTTP.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// `sort` values accepted by the listing endpoint (§6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    Newest,
    Price,
    Name,
    Brand,
    Code,
    Best,
    Recommended,
}

impl Default for SortMode {
    fn default() -> Self {
        Self::Newest
    }
}

impl std::str::FromStr for SortMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newest" => Ok(Self::Newest),
            "price" => Ok(Self::Price),
            "name" => Ok(Self::Name),
            "brand" => Ok(Self::Brand),
            "code" => Ok(Self::Code),
            "best" => Ok(Self::Best),
            "recommended" => Ok(Self::Recommended),
            _ => Err(()),
        }
    }
}

/// `order` values accepted by the listing endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl Default for SortOrder {
    fn default() -> Self {
        Self::Desc
    }
}

impl std::str::FromStr for SortOrder {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ASC" => Ok(Self::Asc),
            "DESC" => Ok(Self::Desc),
            _ => Err(()),
        }
    }
}

/// The full set of filter dimensions from spec §4.E, each optional.
///
/// Array-valued dimensions accept multiple selections (overlap semantics);
/// scalar dimensions accept a single value. `q` carries the free-text query
/// that feeds the parser (§4.C) and the search predicate builder (§4.D).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSet {
    pub q: Option<String>,
    pub brand: Option<String>,
    pub product_type: Option<String>,
    pub gender: Option<String>,
    pub age_group: Option<String>,
    pub tag: Option<String>,
    pub primary_colour: Option<String>,
    pub colour_shade: Option<String>,

    pub sleeve: Vec<String>,
    pub neckline: Vec<String>,
    pub fabric: Vec<String>,
    pub size: Vec<String>,
    pub style: Vec<String>,
    pub colour: Vec<String>,
    pub weight: Vec<String>,
    pub fit: Vec<String>,
    pub feature: Vec<String>,
    pub effect: Vec<String>,
    pub accreditation: Vec<String>,
    pub sector: Vec<String>,
    pub sport: Vec<String>,
    pub flag: Vec<String>,

    pub price_min: Option<Decimal>,
    pub price_max: Option<Decimal>,
    pub is_best_seller: Option<bool>,
    pub is_recommended: Option<bool>,

    pub sort: SortMode,
    pub order: SortOrder,
    pub page: u32,
    pub limit: u32,
}

/// A colour variant as returned on a listing/detail item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ColourVariant {
    pub name: String,
    pub main: String,
    pub thumb: String,
}

/// One row of `priceBreaks` (spec §3/§4.F.8).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceBreak {
    pub min: u32,
    /// `None` represents the open-ended top tier ("covers `[1, ∞)`" in §3).
    pub max: Option<u32>,
    pub price: Decimal,
    pub percentage: Decimal,
}

/// Distinguishes where a product's markup tier came from (spec §9 Open
/// Question 3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkupSource {
    Override,
    Global,
}

/// A single listing item, per spec §6's listing response shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListingItem {
    pub code: String,
    pub name: String,
    pub brand: String,
    pub price: Decimal,
    pub carton_price: Option<Decimal>,
    pub image: Option<String>,
    pub colors: Vec<ColourVariant>,
    pub sizes: Vec<String>,
    pub customization: Vec<String>,
    pub price_breaks: Vec<PriceBreak>,
    pub markup_tier: Decimal,
    pub markup_source: MarkupSource,
    pub display_order: Option<i32>,
}

/// `priceRange` block on the listing response.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PriceRange {
    pub min: Decimal,
    pub max: Decimal,
}

/// Top-level listing endpoint response (spec §6).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListingResponse {
    pub items: Vec<ListingItem>,
    pub total: i64,
    pub price_range: PriceRange,
}

/// One facet value row (spec §4.G): `{slug, name, count}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FacetValue {
    pub slug: String,
    pub name: String,
    pub count: i64,
}

/// An image entry on the detail endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DetailImage {
    pub url: String,
    #[serde(rename = "type")]
    pub kind: ImageKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageKind {
    Main,
    Thumb,
}

/// `details` block on the detail endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DetailAttributes {
    pub fit: Vec<String>,
    pub fabric: Vec<String>,
    pub weight: Vec<String>,
    pub care: Option<String>,
}

/// Full detail endpoint response (spec §6).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DetailResponse {
    pub code: String,
    pub name: String,
    pub brand: String,
    pub product_type: Option<String>,
    pub price: Decimal,
    pub base_price: Decimal,
    pub sell_price: Decimal,
    pub carton_price: Option<Decimal>,
    pub markup_tier: Decimal,
    pub price_breaks: Vec<PriceBreak>,
    pub colors: Vec<ColourVariant>,
    pub sizes: Vec<String>,
    pub images: Vec<DetailImage>,
    pub description: Option<String>,
    pub details: DetailAttributes,
    pub customization: Vec<String>,
}

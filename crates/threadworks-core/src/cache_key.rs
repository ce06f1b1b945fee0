//! Component H support (spec §4.H): stable cache-key construction.
//!
//! `std::collections::hash_map::DefaultHasher` is randomly seeded per
//! process, so it can't be used here — two requests hitting different
//! server instances (or the same instance after a restart) must compute
//! the same key for the same filters. FNV-1a has no seed and is cheap
//! enough to run per request.

use crate::types::{FilterSet, SortOrder};

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// FNV-1a, 32-bit variant.
#[must_use]
pub fn fnv1a_32(data: &[u8]) -> u32 {
    let mut hash = FNV_OFFSET_BASIS;
    for &byte in data {
        hash ^= u32::from(byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Canonically encode a [`FilterSet`] as `dim:value|dim:value|...` with
/// dimensions in a fixed order and array values sorted, so two
/// semantically-equal filter sets (e.g. `colour=red,blue` vs
/// `colour=blue,red`) produce the same string.
#[must_use]
pub fn canonical_filter_string(filters: &FilterSet) -> String {
    let mut parts = Vec::new();

    let mut push_scalar = |key: &str, value: &Option<String>| {
        if let Some(v) = value {
            parts.push(format!("{key}:{v}"));
        }
    };
    push_scalar("q", &filters.q);
    push_scalar("brand", &filters.brand);
    push_scalar("product_type", &filters.product_type);
    push_scalar("gender", &filters.gender);
    push_scalar("age_group", &filters.age_group);
    push_scalar("tag", &filters.tag);
    push_scalar("primary_colour", &filters.primary_colour);
    push_scalar("colour_shade", &filters.colour_shade);

    let mut push_array = |key: &str, values: &[String]| {
        if !values.is_empty() {
            let mut sorted = values.to_vec();
            sorted.sort_unstable();
            parts.push(format!("{key}:{}", sorted.join(",")));
        }
    };
    push_array("sleeve", &filters.sleeve);
    push_array("neckline", &filters.neckline);
    push_array("fabric", &filters.fabric);
    push_array("size", &filters.size);
    push_array("style", &filters.style);
    push_array("colour", &filters.colour);
    push_array("weight", &filters.weight);
    push_array("fit", &filters.fit);
    push_array("feature", &filters.feature);
    push_array("effect", &filters.effect);
    push_array("accreditation", &filters.accreditation);
    push_array("sector", &filters.sector);
    push_array("sport", &filters.sport);
    push_array("flag", &filters.flag);

    if let Some(min) = filters.price_min {
        parts.push(format!("price_min:{min}"));
    }
    if let Some(max) = filters.price_max {
        parts.push(format!("price_max:{max}"));
    }
    if let Some(v) = filters.is_best_seller {
        parts.push(format!("best:{v}"));
    }
    if let Some(v) = filters.is_recommended {
        parts.push(format!("recommended:{v}"));
    }

    parts.push(format!("sort:{:?}", filters.sort));
    parts.push(format!(
        "order:{}",
        match filters.order {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    ));
    parts.push(format!("page:{}", filters.page));
    parts.push(format!("limit:{}", filters.limit));

    parts.join("|")
}

/// Build the final cache key string for a given artifact `kind` (one of
/// `listing`, `aggregation`, `count`, `price_range`, `detail` — spec
/// §4.H), e.g. `"listing:1a2b3c4d"`.
#[must_use]
pub fn cache_key(kind: &str, filters: &FilterSet) -> String {
    let canonical = canonical_filter_string(filters);
    let hash = fnv1a_32(canonical.as_bytes());
    format!("{kind}:{hash:08x}")
}

/// The invalidation prefix for all cache keys of a given artifact kind,
/// used for bulk invalidation after a lookup/synonym refresh (spec §4.H).
#[must_use]
pub fn cache_key_prefix(kind: &str) -> String {
    format!("{kind}:")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fnv1a_is_deterministic() {
        assert_eq!(fnv1a_32(b"hello"), fnv1a_32(b"hello"));
    }

    #[test]
    fn fnv1a_differs_for_different_input() {
        assert_ne!(fnv1a_32(b"hello"), fnv1a_32(b"world"));
    }

    #[test]
    fn canonical_string_is_stable_for_reordered_array_values() {
        let a = FilterSet { colour: vec!["red".into(), "blue".into()], ..Default::default() };
        let b = FilterSet { colour: vec!["blue".into(), "red".into()], ..Default::default() };
        assert_eq!(canonical_filter_string(&a), canonical_filter_string(&b));
    }

    #[test]
    fn cache_key_differs_for_different_filters() {
        let a = FilterSet { brand: Some("nike".into()), ..Default::default() };
        let b = FilterSet { brand: Some("adidas".into()), ..Default::default() };
        assert_ne!(cache_key("listing", &a), cache_key("listing", &b));
    }

    #[test]
    fn cache_key_is_stable_across_calls() {
        let filters = FilterSet { brand: Some("nike".into()), page: 2, limit: 24, ..Default::default() };
        assert_eq!(cache_key("listing", &filters), cache_key("listing", &filters));
    }

    #[test]
    fn cache_key_prefix_matches_cache_key_start() {
        let filters = FilterSet::default();
        let key = cache_key("aggregation", &filters);
        assert!(key.starts_with(&cache_key_prefix("aggregation")));
    }

    #[test]
    fn cache_key_distinguishes_page_and_limit() {
        let a = FilterSet { page: 1, limit: 24, ..Default::default() };
        let b = FilterSet { page: 2, limit: 24, ..Default::default() };
        assert_ne!(cache_key("listing", &a), cache_key("listing", &b));
    }
}

//! Component A (spec §4.A): in-memory lookup tables used by the query
//! parser and filter validator, kept current by a periodic background
//! refresh rather than hit on every request.
//!
//! The refresh job (in `threadworks-server::refresh`) loads a fresh
//! [`LookupSnapshot`] from the database and swaps it into a
//! [`SharedSnapshot`] with a single atomic pointer write, so readers never
//! block on — or observe a partially-updated — refresh.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// One resolved lookup entry: the canonical display name plus its URL/
/// filter-param slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupEntry {
    pub slug: String,
    pub name: String,
}

/// A named dictionary keyed by normalized name (spec §4.C: the parser
/// probes these dictionaries in a fixed order).
pub type LookupDict = HashMap<String, LookupEntry>;

/// A size entry carries a sort order in addition to slug/name (spec §4.E:
/// sizes are not alphabetically sortable — `S, M, L, XL` needs an explicit
/// order column).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeEntry {
    pub slug: String,
    pub name: String,
    pub sort_order: i32,
}

/// Distinguishes a style keyword's semantic role (spec §4.A: style keywords
/// feed the relevance scorer's `style_keyword_overlap` term, not a
/// standalone filter dimension).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleKeywordType {
    Cut,
    Occasion,
    Trend,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleKeywordEntry {
    pub slug: String,
    pub name: String,
    pub kind: StyleKeywordType,
}

/// The full set of dictionaries the parser and filter validator consult.
///
/// Field names intentionally mirror the filter dimensions in
/// [`crate::types::FilterSet`].
#[derive(Debug, Clone, Default)]
pub struct LookupSnapshot {
    pub brands: LookupDict,
    pub product_types: LookupDict,
    pub genders: LookupDict,
    pub age_groups: LookupDict,
    pub tags: LookupDict,
    pub sectors: LookupDict,
    pub sports: LookupDict,
    pub fits: LookupDict,
    pub sleeves: LookupDict,
    pub necklines: LookupDict,
    pub fabrics: LookupDict,
    pub colours: LookupDict,
    pub weight_ranges: LookupDict,
    pub accreditations: LookupDict,
    pub effects: LookupDict,
    pub flags: LookupDict,
    pub sizes: HashMap<String, SizeEntry>,
    pub style_keywords: HashMap<String, StyleKeywordEntry>,
}

impl LookupSnapshot {
    /// Look up a dictionary by the probe-order name used in spec §4.C:
    /// `{brand, product_type, sport, fit, sleeve, neckline, fabric,
    /// sector, colour, feature}`.
    #[must_use]
    pub fn dict_by_dimension(&self, dimension: &str) -> Option<&LookupDict> {
        match dimension {
            "brand" => Some(&self.brands),
            "product_type" => Some(&self.product_types),
            "sport" => Some(&self.sports),
            "fit" => Some(&self.fits),
            "sleeve" => Some(&self.sleeves),
            "neckline" => Some(&self.necklines),
            "fabric" => Some(&self.fabrics),
            "sector" => Some(&self.sectors),
            "colour" => Some(&self.colours),
            "feature" => Some(&self.accreditations),
            _ => None,
        }
    }

    /// The fixed probe order from spec §4.C.
    pub const PROBE_ORDER: &'static [&'static str] = &[
        "brand",
        "product_type",
        "sport",
        "fit",
        "sleeve",
        "neckline",
        "fabric",
        "sector",
        "colour",
        "feature",
    ];
}

/// Strip trademark/registration glyphs and fold case/whitespace so lookup
/// keys are stable regardless of how a brand name is typed or stored
/// upstream (spec §4.A: "lookups normalize away trademark glyphs and
/// casing/spacing differences before keying").
#[must_use]
pub fn normalize_lookup_key(input: &str) -> String {
    input
        .chars()
        .filter(|c| !matches!(c, '™' | '®' | '©'))
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// An atomically-swappable snapshot container.
///
/// Readers call [`SharedSnapshot::load`] and get a cheap `Arc` clone of
/// whatever was current at that instant; the refresh job calls
/// [`SharedSnapshot::store`] to publish a new snapshot with one write lock
/// acquisition, never blocking readers for longer than a pointer swap.
#[derive(Debug)]
pub struct SharedSnapshot<T> {
    inner: RwLock<Arc<T>>,
}

impl<T> SharedSnapshot<T> {
    #[must_use]
    pub fn new(initial: T) -> Self {
        Self {
            inner: RwLock::new(Arc::new(initial)),
        }
    }

    /// Get the current snapshot without blocking a concurrent refresh for
    /// longer than it takes to clone an `Arc`.
    #[must_use]
    pub fn load(&self) -> Arc<T> {
        Arc::clone(&self.inner.read().expect("snapshot lock poisoned"))
    }

    /// Publish a new snapshot, replacing whatever was current.
    pub fn store(&self, new: T) {
        *self.inner.write().expect("snapshot lock poisoned") = Arc::new(new);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_trademark_glyphs() {
        assert_eq!(normalize_lookup_key("Nike™"), "nike");
        assert_eq!(normalize_lookup_key("Acme®"), "acme");
        assert_eq!(normalize_lookup_key("Brand©"), "brand");
    }

    #[test]
    fn normalize_folds_case_and_collapses_whitespace() {
        assert_eq!(normalize_lookup_key("  HI   VIS  "), "hi vis");
        assert_eq!(normalize_lookup_key("Hi-Vis"), "hi-vis");
    }

    #[test]
    fn normalize_is_idempotent() {
        let once = normalize_lookup_key("Nike™  Pro");
        let twice = normalize_lookup_key(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn probe_order_matches_dict_by_dimension_coverage() {
        let snapshot = LookupSnapshot::default();
        for dim in LookupSnapshot::PROBE_ORDER {
            assert!(
                snapshot.dict_by_dimension(dim).is_some(),
                "missing dict for dimension {dim}"
            );
        }
    }

    #[test]
    fn dict_by_dimension_unknown_returns_none() {
        let snapshot = LookupSnapshot::default();
        assert!(snapshot.dict_by_dimension("not-a-real-dimension").is_none());
    }

    #[test]
    fn shared_snapshot_load_reflects_latest_store() {
        let shared = SharedSnapshot::new(1u32);
        assert_eq!(*shared.load(), 1);
        shared.store(2);
        assert_eq!(*shared.load(), 2);
    }

    #[test]
    fn shared_snapshot_load_returns_independent_arc() {
        let shared = SharedSnapshot::new(vec![1, 2, 3]);
        let first = shared.load();
        shared.store(vec![4, 5, 6]);
        let second = shared.load();
        assert_eq!(*first, vec![1, 2, 3]);
        assert_eq!(*second, vec![4, 5, 6]);
    }
}

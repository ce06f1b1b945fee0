//! Component B (spec §4.B): synonym resolution that maps free-text tokens
//! onto canonical dictionary slugs before the parser probes the lookup
//! dictionaries — e.g. `"tee"` -> `product_type:t-shirt`, `"hi vis"` ->
//! `feature:high-visibility`.
//!
//! Synonyms are DB-backed (refreshed on the same cadence as
//! [`crate::lookup::LookupSnapshot`]) with a small hardcoded fallback table
//! so the parser still does something sensible before the first refresh
//! completes or if the synonyms table is empty.

use std::collections::HashMap;

use crate::lookup::normalize_lookup_key;

/// Which dictionary a synonym's canonical slug belongs to — reuses the same
/// dimension names as [`crate::lookup::LookupSnapshot::PROBE_ORDER`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SynonymType {
    Brand,
    ProductType,
    Sport,
    Fit,
    Sleeve,
    Neckline,
    Fabric,
    Sector,
    Colour,
    Feature,
}

impl SynonymType {
    #[must_use]
    pub fn dimension_name(self) -> &'static str {
        match self {
            SynonymType::Brand => "brand",
            SynonymType::ProductType => "product_type",
            SynonymType::Sport => "sport",
            SynonymType::Fit => "fit",
            SynonymType::Sleeve => "sleeve",
            SynonymType::Neckline => "neckline",
            SynonymType::Fabric => "fabric",
            SynonymType::Sector => "sector",
            SynonymType::Colour => "colour",
            SynonymType::Feature => "feature",
        }
    }
}

/// One synonym mapping row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynonymEntry {
    pub alias: String,
    pub canonical_slug: String,
    pub synonym_type: SynonymType,
}

/// The resolvable synonym table, keyed by normalized alias. Multi-word
/// aliases ("hi vis") are looked up whole, matching the phrase-length
/// descending consumption the parser uses for dictionary terms.
#[derive(Debug, Clone, Default)]
pub struct SynonymSnapshot {
    entries: HashMap<String, SynonymEntry>,
}

impl SynonymSnapshot {
    #[must_use]
    pub fn from_entries(entries: Vec<SynonymEntry>) -> Self {
        let mut map = HashMap::with_capacity(entries.len());
        for entry in entries {
            map.insert(normalize_lookup_key(&entry.alias), entry);
        }
        Self { entries: map }
    }

    /// Resolve a single (already normalized) token or phrase to its
    /// canonical dimension + slug, if a synonym exists for it.
    #[must_use]
    pub fn resolve(&self, phrase: &str) -> Option<&SynonymEntry> {
        self.entries.get(&normalize_lookup_key(phrase))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A small built-in fallback used before the first DB-backed refresh
/// completes (spec §4.B: "the service must remain usable, with degraded
/// recall, before synonyms have been loaded").
#[must_use]
pub fn fallback_synonyms() -> Vec<SynonymEntry> {
    vec![
        SynonymEntry {
            alias: "tee".into(),
            canonical_slug: "t-shirt".into(),
            synonym_type: SynonymType::ProductType,
        },
        SynonymEntry {
            alias: "tees".into(),
            canonical_slug: "t-shirt".into(),
            synonym_type: SynonymType::ProductType,
        },
        SynonymEntry {
            alias: "hoody".into(),
            canonical_slug: "hoodie".into(),
            synonym_type: SynonymType::ProductType,
        },
        SynonymEntry {
            alias: "hi vis".into(),
            canonical_slug: "high-visibility".into(),
            synonym_type: SynonymType::Feature,
        },
        SynonymEntry {
            alias: "hivis".into(),
            canonical_slug: "high-visibility".into(),
            synonym_type: SynonymType::Feature,
        },
        SynonymEntry {
            alias: "football".into(),
            canonical_slug: "soccer".into(),
            synonym_type: SynonymType::Sport,
        },
        SynonymEntry {
            alias: "sleeveless".into(),
            canonical_slug: "vest".into(),
            synonym_type: SynonymType::Sleeve,
        },
        SynonymEntry {
            alias: "crew neck".into(),
            canonical_slug: "crew".into(),
            synonym_type: SynonymType::Neckline,
        },
        SynonymEntry {
            alias: "v neck".into(),
            canonical_slug: "v-neck".into(),
            synonym_type: SynonymType::Neckline,
        },
        SynonymEntry {
            alias: "navy".into(),
            canonical_slug: "navy-blue".into(),
            synonym_type: SynonymType::Colour,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_finds_single_word_alias() {
        let snap = SynonymSnapshot::from_entries(fallback_synonyms());
        let entry = snap.resolve("tee").expect("tee should resolve");
        assert_eq!(entry.canonical_slug, "t-shirt");
        assert_eq!(entry.synonym_type, SynonymType::ProductType);
    }

    #[test]
    fn resolve_finds_multi_word_alias() {
        let snap = SynonymSnapshot::from_entries(fallback_synonyms());
        let entry = snap.resolve("hi vis").expect("hi vis should resolve");
        assert_eq!(entry.canonical_slug, "high-visibility");
    }

    #[test]
    fn resolve_is_case_and_spacing_insensitive() {
        let snap = SynonymSnapshot::from_entries(fallback_synonyms());
        assert_eq!(
            snap.resolve("HI   VIS").map(|e| e.canonical_slug.as_str()),
            snap.resolve("hi vis").map(|e| e.canonical_slug.as_str())
        );
    }

    #[test]
    fn resolve_unknown_alias_returns_none() {
        let snap = SynonymSnapshot::from_entries(fallback_synonyms());
        assert!(snap.resolve("not-a-real-alias").is_none());
    }

    #[test]
    fn empty_snapshot_resolves_nothing() {
        let snap = SynonymSnapshot::default();
        assert!(snap.is_empty());
        assert!(snap.resolve("tee").is_none());
    }

    #[test]
    fn dimension_name_matches_probe_order_vocabulary() {
        for ty in [
            SynonymType::Brand,
            SynonymType::ProductType,
            SynonymType::Sport,
            SynonymType::Fit,
            SynonymType::Sleeve,
            SynonymType::Neckline,
            SynonymType::Fabric,
            SynonymType::Sector,
            SynonymType::Colour,
            SynonymType::Feature,
        ] {
            assert!(crate::lookup::LookupSnapshot::PROBE_ORDER.contains(&ty.dimension_name()));
        }
    }
}

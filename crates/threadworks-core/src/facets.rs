//! Component G support types (spec §4.G): metadata describing each
//! facetable dimension, used by both the aggregator (to know which SQL
//! shape to emit per dimension) and the server layer (to know which query
//! params map to which facet).

/// Whether a dimension's projection column is a scalar (`Eq`/`GROUP BY`) or
/// an array (`unnest` + join) column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacetKind {
    Scalar,
    Array,
}

/// One facetable dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FacetDimension {
    /// The query-param / `FilterSet` field name (spec §4.E).
    pub key: &'static str,
    /// The search-projection column backing this dimension.
    pub column: &'static str,
    pub kind: FacetKind,
}

/// Every facetable dimension in projection-column order. Used by the
/// aggregator to dispatch one subquery per dimension, bounded by
/// `facet_fanout_limit` (spec §5 Concurrency).
pub const ALL_FACET_DIMENSIONS: &[FacetDimension] = &[
    FacetDimension { key: "brand", column: "brand_slug", kind: FacetKind::Scalar },
    FacetDimension { key: "product_type", column: "product_type_slug", kind: FacetKind::Scalar },
    FacetDimension { key: "gender", column: "gender_slug", kind: FacetKind::Scalar },
    FacetDimension { key: "age_group", column: "age_group_slug", kind: FacetKind::Scalar },
    FacetDimension { key: "tag", column: "tag_slug", kind: FacetKind::Scalar },
    FacetDimension { key: "primary_colour", column: "primary_colour_slug", kind: FacetKind::Scalar },
    FacetDimension { key: "colour_shade", column: "colour_shade_slug", kind: FacetKind::Scalar },
    FacetDimension { key: "sleeve", column: "sleeve_slugs", kind: FacetKind::Array },
    FacetDimension { key: "neckline", column: "neckline_slugs", kind: FacetKind::Array },
    FacetDimension { key: "fabric", column: "fabric_slugs", kind: FacetKind::Array },
    FacetDimension { key: "size", column: "size_slugs", kind: FacetKind::Array },
    FacetDimension { key: "style", column: "style_slugs", kind: FacetKind::Array },
    FacetDimension { key: "colour", column: "colour_slugs", kind: FacetKind::Array },
    FacetDimension { key: "weight", column: "weight_slugs", kind: FacetKind::Array },
    FacetDimension { key: "fit", column: "fit_slugs", kind: FacetKind::Array },
    FacetDimension { key: "feature", column: "feature_slugs", kind: FacetKind::Array },
    FacetDimension { key: "effect", column: "effect_slugs", kind: FacetKind::Array },
    FacetDimension { key: "accreditation", column: "accreditation_slugs", kind: FacetKind::Array },
    FacetDimension { key: "sector", column: "sector_slugs", kind: FacetKind::Array },
    FacetDimension { key: "sport", column: "sport_slugs", kind: FacetKind::Array },
    FacetDimension { key: "flag", column: "flag_slugs", kind: FacetKind::Array },
];

/// Look up a dimension's metadata by its `FilterSet` field key.
#[must_use]
pub fn dimension_by_key(key: &str) -> Option<&'static FacetDimension> {
    ALL_FACET_DIMENSIONS.iter().find(|d| d.key == key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_dimension_keys_are_unique() {
        let mut keys: Vec<_> = ALL_FACET_DIMENSIONS.iter().map(|d| d.key).collect();
        let before = keys.len();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), before, "duplicate facet dimension key");
    }

    #[test]
    fn dimension_by_key_finds_known_dimension() {
        let dim = dimension_by_key("colour").expect("colour dimension should exist");
        assert_eq!(dim.column, "colour_slugs");
        assert_eq!(dim.kind, FacetKind::Array);
    }

    #[test]
    fn dimension_by_key_unknown_returns_none() {
        assert!(dimension_by_key("not-a-real-dimension").is_none());
    }

    #[test]
    fn scalar_dimensions_have_singular_slug_columns() {
        for dim in ALL_FACET_DIMENSIONS.iter().filter(|d| d.kind == FacetKind::Scalar) {
            assert!(dim.column.ends_with("_slug"), "{} should end in _slug", dim.column);
        }
    }

    #[test]
    fn array_dimensions_have_plural_slug_columns() {
        for dim in ALL_FACET_DIMENSIONS.iter().filter(|d| d.kind == FacetKind::Array) {
            assert!(dim.column.ends_with("_slugs"), "{} should end in _slugs", dim.column);
        }
    }
}

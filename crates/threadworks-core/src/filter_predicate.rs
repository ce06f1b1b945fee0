//! Component E (spec §4.E): renders a [`FilterSet`] into a hard
//! [`Predicate`] tree. Every field maps to exactly one predicate leaf;
//! scalar fields become `Eq`, array fields become `Overlap`, and the price
//! range becomes a `Gte`/`Lte` pair. Absent fields contribute nothing.

use crate::predicate::{Predicate, PredicateValue};
use crate::types::FilterSet;

/// Build the hard filter predicate for a [`FilterSet`]. The free-text `q`
/// field is not handled here — see [`crate::search_predicate`].
#[must_use]
pub fn build_filter_predicate(filters: &FilterSet) -> Predicate {
    let mut clauses = vec![Predicate::Eq {
        column: "sku_status",
        value: PredicateValue::Text("Live".to_string()),
    }];

    macro_rules! scalar_eq {
        ($field:expr, $column:expr) => {
            if let Some(value) = &$field {
                clauses.push(Predicate::Eq {
                    column: $column,
                    value: PredicateValue::Text(value.clone()),
                });
            }
        };
    }

    macro_rules! array_overlap {
        ($field:expr, $column:expr) => {
            if !$field.is_empty() {
                clauses.push(Predicate::Overlap {
                    column: $column,
                    values: $field.clone(),
                });
            }
        };
    }

    scalar_eq!(filters.brand, "brand_slug");
    scalar_eq!(filters.product_type, "product_type_slug");
    scalar_eq!(filters.gender, "gender_slug");
    scalar_eq!(filters.age_group, "age_group_slug");
    scalar_eq!(filters.tag, "tag_slug");
    scalar_eq!(filters.primary_colour, "primary_colour_slug");
    scalar_eq!(filters.colour_shade, "colour_shade_slug");

    array_overlap!(filters.sleeve, "sleeve_slugs");
    array_overlap!(filters.neckline, "neckline_slugs");
    array_overlap!(filters.fabric, "fabric_slugs");
    array_overlap!(filters.size, "size_slugs");
    array_overlap!(filters.style, "style_slugs");
    array_overlap!(filters.colour, "colour_slugs");
    array_overlap!(filters.weight, "weight_slugs");
    array_overlap!(filters.fit, "fit_slugs");
    array_overlap!(filters.feature, "feature_slugs");
    array_overlap!(filters.effect, "effect_slugs");
    array_overlap!(filters.accreditation, "accreditation_slugs");
    array_overlap!(filters.sector, "sector_slugs");
    array_overlap!(filters.sport, "sport_slugs");
    array_overlap!(filters.flag, "flag_slugs");

    if let Some(min) = filters.price_min {
        clauses.push(Predicate::Gte { column: "sell_price", value: PredicateValue::Decimal(min) });
    }
    if let Some(max) = filters.price_max {
        clauses.push(Predicate::Lte { column: "sell_price", value: PredicateValue::Decimal(max) });
    }
    if let Some(flag) = filters.is_best_seller {
        clauses.push(Predicate::Eq { column: "is_best_seller", value: PredicateValue::Bool(flag) });
    }
    if let Some(flag) = filters.is_recommended {
        clauses.push(Predicate::Eq { column: "is_recommended", value: PredicateValue::Bool(flag) });
    }

    Predicate::and(clauses)
}

/// Build the filter predicate for every dimension *except* the one named,
/// used by the facet aggregator's cross-filter counts (spec §4.G / §9 Open
/// Question: "should a dimension's own selected values constrain its own
/// facet counts?"). See `DESIGN.md` for the resolution.
#[must_use]
pub fn build_filter_predicate_excluding(filters: &FilterSet, excluded_dimension: &str) -> Predicate {
    let mut reduced = filters.clone();
    match excluded_dimension {
        "brand" => reduced.brand = None,
        "product_type" => reduced.product_type = None,
        "gender" => reduced.gender = None,
        "age_group" => reduced.age_group = None,
        "tag" => reduced.tag = None,
        "primary_colour" => reduced.primary_colour = None,
        "colour_shade" => reduced.colour_shade = None,
        "sleeve" => reduced.sleeve = Vec::new(),
        "neckline" => reduced.neckline = Vec::new(),
        "fabric" => reduced.fabric = Vec::new(),
        "size" => reduced.size = Vec::new(),
        "style" => reduced.style = Vec::new(),
        "colour" => reduced.colour = Vec::new(),
        "weight" => reduced.weight = Vec::new(),
        "fit" => reduced.fit = Vec::new(),
        "feature" => reduced.feature = Vec::new(),
        "effect" => reduced.effect = Vec::new(),
        "accreditation" => reduced.accreditation = Vec::new(),
        "sector" => reduced.sector = Vec::new(),
        "sport" => reduced.sport = Vec::new(),
        "flag" => reduced.flag = Vec::new(),
        _ => {}
    }
    build_filter_predicate(&reduced)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn sku_status_live() -> Predicate {
        Predicate::Eq { column: "sku_status", value: PredicateValue::Text("Live".to_string()) }
    }

    #[test]
    fn empty_filter_set_produces_only_sku_status_predicate() {
        let filters = FilterSet::default();
        assert_eq!(build_filter_predicate(&filters), sku_status_live());
    }

    #[test]
    fn scalar_field_becomes_eq_conjoined_with_sku_status_first() {
        let filters = FilterSet { brand: Some("nike".to_string()), ..Default::default() };
        let predicate = build_filter_predicate(&filters);
        match predicate {
            Predicate::And(children) => {
                assert_eq!(children[0], sku_status_live());
                assert!(children.iter().any(|p| matches!(
                    p,
                    Predicate::Eq { column: "brand_slug", .. }
                )));
            }
            other => panic!("expected And, got {other:?}"),
        }
    }

    #[test]
    fn array_field_becomes_overlap_conjoined_with_sku_status_first() {
        let filters = FilterSet { colour: vec!["navy-blue".to_string()], ..Default::default() };
        let predicate = build_filter_predicate(&filters);
        match predicate {
            Predicate::And(children) => {
                assert_eq!(children[0], sku_status_live());
                assert!(children.iter().any(|p| matches!(
                    p,
                    Predicate::Overlap { column: "colour_slugs", .. }
                )));
            }
            other => panic!("expected And, got {other:?}"),
        }
    }

    #[test]
    fn price_range_becomes_gte_and_lte() {
        let filters = FilterSet {
            price_min: Some(Decimal::new(1000, 2)),
            price_max: Some(Decimal::new(5000, 2)),
            ..Default::default()
        };
        let predicate = build_filter_predicate(&filters);
        match predicate {
            Predicate::And(children) => {
                assert_eq!(children[0], sku_status_live());
                assert!(children.iter().any(|p| matches!(p, Predicate::Gte { column: "sell_price", .. })));
                assert!(children.iter().any(|p| matches!(p, Predicate::Lte { column: "sell_price", .. })));
            }
            other => panic!("expected And, got {other:?}"),
        }
    }

    #[test]
    fn multiple_filters_combine_with_and() {
        let filters = FilterSet {
            brand: Some("nike".to_string()),
            colour: vec!["navy-blue".to_string()],
            ..Default::default()
        };
        let predicate = build_filter_predicate(&filters);
        assert!(matches!(predicate, Predicate::And(ref children) if children.len() == 3));
    }

    #[test]
    fn excluding_dimension_drops_only_that_field() {
        let filters = FilterSet {
            brand: Some("nike".to_string()),
            colour: vec!["navy-blue".to_string()],
            ..Default::default()
        };
        let predicate = build_filter_predicate_excluding(&filters, "brand");
        match predicate {
            Predicate::And(children) => {
                assert_eq!(children[0], sku_status_live());
                assert!(children.iter().any(|p| matches!(
                    p,
                    Predicate::Overlap { column: "colour_slugs", .. }
                )));
                assert!(!children.iter().any(|p| matches!(p, Predicate::Eq { column: "brand_slug", .. })));
            }
            other => panic!("expected And, got {other:?}"),
        }
    }

    #[test]
    fn excluding_unknown_dimension_is_a_no_op() {
        let filters = FilterSet { brand: Some("nike".to_string()), ..Default::default() };
        let predicate = build_filter_predicate_excluding(&filters, "not-a-real-dimension");
        assert_eq!(predicate, build_filter_predicate(&filters));
    }
}

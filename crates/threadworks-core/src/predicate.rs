//! A DB-agnostic predicate model for the search/filter layer (spec §9
//! Design Notes: "the predicate model is kept separate from the SQL
//! emitter so the WHERE tree can be built, logged, and tested without a
//! live connection").
//!
//! [`crate::search_predicate`] and [`crate::filter_predicate`] build trees
//! of [`Predicate`]; `threadworks-db::predicate_sql` renders the tree into a
//! parameterized `sqlx::QueryBuilder<Postgres>` statement. Nothing in this
//! module knows about SQL syntax or placeholder numbering.

use rust_decimal::Decimal;

/// A column value bound into a predicate leaf.
#[derive(Debug, Clone, PartialEq)]
pub enum PredicateValue {
    Text(String),
    TextArray(Vec<String>),
    Decimal(Decimal),
    Bool(bool),
    Int(i64),
}

/// A node in the WHERE-clause tree.
///
/// `Overlap`/`ContainsAny` target array-valued projection columns (spec
/// §4.E's array dimensions); `Eq`/`Gte`/`Lte` target scalar columns.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Predicate {
    /// Column equals a scalar value.
    Eq { column: &'static str, value: PredicateValue },
    /// Column >= value (inclusive lower bound, e.g. `price_min`).
    Gte { column: &'static str, value: PredicateValue },
    /// Column <= value (inclusive upper bound, e.g. `price_max`).
    Lte { column: &'static str, value: PredicateValue },
    /// Array column overlaps (`&&`) the given set of values.
    Overlap { column: &'static str, values: Vec<String> },
    /// Full-text search against a `tsvector` column.
    FullText { column: &'static str, query: String },
    /// Case-insensitive prefix match (`ILIKE 'value%'`).
    Prefix { column: &'static str, value: String },
    /// Regex match against a text column (Postgres `~*`).
    Regex { column: &'static str, pattern: String },
    /// Logical AND of all children.
    And(Vec<Predicate>),
    /// Logical OR of all children.
    Or(Vec<Predicate>),
    /// Always-true predicate; used as an AND-identity when no filters apply.
    #[default]
    True,
}

impl Predicate {
    #[must_use]
    pub fn and(children: Vec<Predicate>) -> Predicate {
        let children: Vec<_> = children.into_iter().filter(|p| *p != Predicate::True).collect();
        match children.len() {
            0 => Predicate::True,
            1 => children.into_iter().next().unwrap(),
            _ => Predicate::And(children),
        }
    }

    #[must_use]
    pub fn or(children: Vec<Predicate>) -> Predicate {
        let children: Vec<_> = children.into_iter().filter(|p| *p != Predicate::True).collect();
        match children.len() {
            0 => Predicate::True,
            1 => children.into_iter().next().unwrap(),
            _ => Predicate::Or(children),
        }
    }

    /// True if this predicate contributes no actual constraint.
    #[must_use]
    pub fn is_trivial(&self) -> bool {
        matches!(self, Predicate::True)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn and_of_empty_is_true() {
        assert_eq!(Predicate::and(vec![]), Predicate::True);
    }

    #[test]
    fn and_of_one_unwraps() {
        let p = Predicate::Eq {
            column: "brand_slug",
            value: PredicateValue::Text("nike".into()),
        };
        assert_eq!(Predicate::and(vec![p.clone()]), p);
    }

    #[test]
    fn and_drops_trivial_children() {
        let p = Predicate::Eq {
            column: "brand_slug",
            value: PredicateValue::Text("nike".into()),
        };
        let combined = Predicate::and(vec![Predicate::True, p.clone(), Predicate::True]);
        assert_eq!(combined, p);
    }

    #[test]
    fn and_of_many_wraps_in_and_node() {
        let a = Predicate::Eq { column: "a", value: PredicateValue::Int(1) };
        let b = Predicate::Eq { column: "b", value: PredicateValue::Int(2) };
        let combined = Predicate::and(vec![a.clone(), b.clone()]);
        assert_eq!(combined, Predicate::And(vec![a, b]));
    }

    #[test]
    fn is_trivial_only_for_true() {
        assert!(Predicate::True.is_trivial());
        assert!(!Predicate::Eq { column: "a", value: PredicateValue::Int(1) }.is_trivial());
    }
}

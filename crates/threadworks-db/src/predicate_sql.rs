//! Renders the DB-agnostic [`Predicate`] tree into a parameterized
//! `WHERE` clause via [`sqlx::QueryBuilder`] (spec §9 Design Notes: the
//! predicate model and the SQL emitter are kept separate so the emitter —
//! not the caller — computes placeholder/parameter indices).

use sqlx::{Postgres, QueryBuilder};
use threadworks_core::predicate::{Predicate, PredicateValue};

/// Push `predicate` onto `builder` as a boolean SQL expression. Does not
/// add a leading `WHERE` — callers push that themselves so the same
/// renderer can be reused for `WHERE`, `AND`, and subquery contexts.
pub fn push_predicate(builder: &mut QueryBuilder<'_, Postgres>, predicate: &Predicate) {
    match predicate {
        Predicate::True => {
            builder.push("TRUE");
        }
        Predicate::Eq { column, value } => {
            builder.push(*column).push(" = ");
            push_value(builder, value);
        }
        Predicate::Gte { column, value } => {
            builder.push(*column).push(" >= ");
            push_value(builder, value);
        }
        Predicate::Lte { column, value } => {
            builder.push(*column).push(" <= ");
            push_value(builder, value);
        }
        Predicate::Overlap { column, values } => {
            builder.push(*column).push(" && ").push_bind(values.clone()).push("::text[]");
        }
        Predicate::FullText { column, query } => {
            builder
                .push(*column)
                .push(" @@ plainto_tsquery('english', ")
                .push_bind(query.clone())
                .push(")");
        }
        Predicate::Prefix { column, value } => {
            builder
                .push(*column)
                .push(" ILIKE ")
                .push_bind(format!("{value}%"));
        }
        Predicate::Regex { column, pattern } => {
            builder.push(*column).push(" ~* ").push_bind(pattern.clone());
        }
        Predicate::And(children) => push_joined(builder, children, " AND "),
        Predicate::Or(children) => push_joined(builder, children, " OR "),
    }
}

fn push_joined(builder: &mut QueryBuilder<'_, Postgres>, children: &[Predicate], joiner: &str) {
    if children.is_empty() {
        builder.push("TRUE");
        return;
    }
    builder.push("(");
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            builder.push(joiner);
        }
        builder.push("(");
        push_predicate(builder, child);
        builder.push(")");
    }
    builder.push(")");
}

fn push_value(builder: &mut QueryBuilder<'_, Postgres>, value: &PredicateValue) {
    match value {
        PredicateValue::Text(s) => {
            builder.push_bind(s.clone());
        }
        PredicateValue::TextArray(v) => {
            builder.push_bind(v.clone());
        }
        PredicateValue::Decimal(d) => {
            builder.push_bind(*d);
        }
        PredicateValue::Bool(b) => {
            builder.push_bind(*b);
        }
        PredicateValue::Int(i) => {
            builder.push_bind(*i);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn true_predicate_renders_literal() {
        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new("SELECT 1 WHERE ");
        push_predicate(&mut builder, &Predicate::True);
        assert_eq!(builder.sql(), "SELECT 1 WHERE TRUE");
    }

    #[test]
    fn eq_predicate_renders_column_and_placeholder() {
        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new("SELECT 1 WHERE ");
        push_predicate(
            &mut builder,
            &Predicate::Eq { column: "brand_slug", value: PredicateValue::Text("nike".into()) },
        );
        assert_eq!(builder.sql(), "SELECT 1 WHERE brand_slug = $1");
    }

    #[test]
    fn and_predicate_wraps_children_in_parens() {
        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new("SELECT 1 WHERE ");
        let predicate = Predicate::And(vec![
            Predicate::Eq { column: "a", value: PredicateValue::Int(1) },
            Predicate::Eq { column: "b", value: PredicateValue::Int(2) },
        ]);
        push_predicate(&mut builder, &predicate);
        assert_eq!(builder.sql(), "SELECT 1 WHERE ((a = $1) AND (b = $2))");
    }

    #[test]
    fn overlap_predicate_uses_array_operator() {
        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new("SELECT 1 WHERE ");
        push_predicate(
            &mut builder,
            &Predicate::Overlap { column: "colour_slugs", values: vec!["red".into()] },
        );
        assert_eq!(builder.sql(), "SELECT 1 WHERE colour_slugs && $1::text[]");
    }
}

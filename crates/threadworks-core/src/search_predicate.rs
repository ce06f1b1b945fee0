//! Component D (spec §4.D): turns a [`ParsedQuery`] into both a hard
//! predicate (rows that don't match anything here are excluded entirely)
//! and a set of additive relevance-score terms.
//!
//! Dictionary matches for filter dimensions (brand, product type, ...) are
//! merged into the caller's [`crate::types::FilterSet`] before this runs —
//! this module only scores/filters on the *query text itself*: the
//! style-code candidate, the leftover free text, and the subset of
//! dictionary matches that double as relevance signals (colour, fabric,
//! neckline, sleeve, style keywords).

use crate::app_config::{RelevanceWeights, ShortQueryWeights};
use crate::lookup::{normalize_lookup_key, LookupSnapshot};
use crate::predicate::{Predicate, PredicateValue};
use crate::query::ParsedQuery;

/// A single additive term in the hybrid relevance score (spec §4.D).
#[derive(Debug, Clone, PartialEq)]
pub enum ScoreTerm {
    ExactCode { code: String, weight: i32 },
    PrefixCode { code: String, weight: i32 },
    NameRegex { pattern: String, weight: i32 },
    FullText { query: String, weight: i32 },
    ColourOverlap { values: Vec<String>, weight: i32 },
    FabricOverlap { values: Vec<String>, weight: i32 },
    NecklineOverlap { values: Vec<String>, weight: i32 },
    SleeveOverlap { values: Vec<String>, weight: i32 },
    StyleKeywordOverlap { values: Vec<String>, weight: i32 },
}

/// A hard predicate plus the score terms it's built from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchPredicate {
    pub predicate: Predicate,
    pub score_terms: Vec<ScoreTerm>,
}

/// Spec §4.D: queries of two characters or fewer are in the "short" regime —
/// they match on `style_code` exact/prefix only, using [`ShortQueryWeights`]
/// instead of the full [`RelevanceWeights`], and skip full-text, name-regex,
/// and dictionary-overlap terms entirely (a 2-character query is too short
/// for any of those to mean anything).
fn is_short_query(parsed: &ParsedQuery) -> bool {
    parsed.raw.chars().count() <= 2
}

/// Build the search predicate + score terms for a parsed query.
#[must_use]
pub fn build_search_predicate(
    parsed: &ParsedQuery,
    lookup: &LookupSnapshot,
    weights: &RelevanceWeights,
    short_weights: &ShortQueryWeights,
) -> SearchPredicate {
    let mut hard_predicates = Vec::new();
    let mut score_terms = Vec::new();
    let short = is_short_query(parsed);

    if let Some(code) = &parsed.style_code_candidate {
        let (exact_weight, prefix_weight) = if short {
            (short_weights.exact_code, short_weights.prefix_code)
        } else {
            (weights.exact_code, weights.prefix_code)
        };

        hard_predicates.push(Predicate::Eq {
            column: "code",
            value: PredicateValue::Text(code.clone()),
        });
        hard_predicates.push(Predicate::Prefix {
            column: "code",
            value: code.clone(),
        });
        score_terms.push(ScoreTerm::ExactCode { code: code.clone(), weight: exact_weight });
        score_terms.push(ScoreTerm::PrefixCode { code: code.clone(), weight: prefix_weight });
    }

    if !short {
        if !parsed.remaining_text.is_empty() {
            hard_predicates.push(Predicate::FullText {
                column: "name_tsv",
                query: parsed.remaining_text.clone(),
            });
            hard_predicates.push(Predicate::Regex {
                column: "name",
                pattern: regex_escape_as_substring(&parsed.remaining_text),
            });
            score_terms.push(ScoreTerm::FullText {
                query: parsed.remaining_text.clone(),
                weight: weights.fulltext,
            });
            score_terms.push(ScoreTerm::NameRegex {
                pattern: regex_escape_as_substring(&parsed.remaining_text),
                weight: weights.name_regex,
            });
        }

        for (dimension, slug) in &parsed.dictionary_matches {
            let values = hyphen_variants(slug);
            match *dimension {
                "colour" => {
                    hard_predicates.push(Predicate::Overlap { column: "colour_slugs", values: values.clone() });
                    score_terms.push(ScoreTerm::ColourOverlap { values, weight: weights.colour_overlap });
                }
                "fabric" => {
                    hard_predicates.push(Predicate::Overlap { column: "fabric_slugs", values: values.clone() });
                    score_terms.push(ScoreTerm::FabricOverlap { values, weight: weights.fabric_overlap });
                }
                "neckline" => {
                    hard_predicates.push(Predicate::Overlap { column: "neckline_slugs", values: values.clone() });
                    score_terms.push(ScoreTerm::NecklineOverlap { values, weight: weights.neckline_overlap });
                }
                "sleeve" => {
                    hard_predicates.push(Predicate::Overlap { column: "sleeve_slugs", values: values.clone() });
                    score_terms.push(ScoreTerm::SleeveOverlap { values, weight: weights.sleeve_overlap });
                }
                _ => {}
            }
        }

        let style_keyword_matches = match_style_keywords(parsed, lookup);
        if !style_keyword_matches.is_empty() {
            score_terms.push(ScoreTerm::StyleKeywordOverlap {
                values: style_keyword_matches,
                weight: weights.style_keyword_overlap,
            });
        }
    }

    SearchPredicate {
        predicate: Predicate::or(hard_predicates),
        score_terms,
    }
}

/// Style keywords are a soft ranking signal, not a filter dimension (spec
/// §4.A) — a hit here never excludes a row, it only adds score.
fn match_style_keywords(parsed: &ParsedQuery, lookup: &LookupSnapshot) -> Vec<String> {
    let mut matches = Vec::new();
    for token in parsed.remaining_text.split_whitespace() {
        let key = normalize_lookup_key(token);
        if let Some(entry) = lookup.style_keywords.get(&key) {
            matches.push(entry.slug.clone());
        }
    }
    matches
}

/// Escape a free-text phrase for use as a Postgres `~*` substring pattern,
/// treating spaces and hyphens as interchangeable (spec §4.D(d)): "tshirt"
/// must match "t-shirt", "t shirt", and "t-shirts" alike. Each literal
/// character is escaped and re-joined with an optional `[ -]` separator, so
/// existing separators in the query text don't have to line up with the
/// stored name's.
fn regex_escape_as_substring(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .map(|c| regex::escape(&c.to_string()))
        .collect::<Vec<_>>()
        .join("[ -]?")
}

/// Expand a dictionary slug into its hyphen/no-hyphen variants (spec
/// §4.D(e)): a canonical slug like "v-neck" must also match rows stored
/// with the dehyphenated form "vneck", and vice versa.
fn hyphen_variants(slug: &str) -> Vec<String> {
    if slug.contains('-') {
        vec![slug.to_string(), slug.replace('-', "")]
    } else {
        vec![slug.to_string()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::{LookupSnapshot, StyleKeywordEntry, StyleKeywordType};
    use crate::query::parse_query;
    use crate::synonyms::SynonymSnapshot;
    use regex::Regex;

    #[test]
    fn style_code_produces_exact_and_prefix_terms() {
        let lookup = LookupSnapshot::default();
        let synonyms = SynonymSnapshot::default();
        let parsed = parse_query("AB123", &lookup, &synonyms);
        let weights = RelevanceWeights::default();
        let short = ShortQueryWeights::default();
        let sp = build_search_predicate(&parsed, &lookup, &weights, &short);
        assert!(sp.score_terms.iter().any(|t| matches!(t, ScoreTerm::ExactCode { .. })));
        assert!(sp.score_terms.iter().any(|t| matches!(t, ScoreTerm::PrefixCode { .. })));
    }

    #[test]
    fn short_query_uses_short_weights() {
        let lookup = LookupSnapshot::default();
        let synonyms = SynonymSnapshot::default();
        let parsed = parse_query("A1", &lookup, &synonyms);
        let weights = RelevanceWeights::default();
        let short = ShortQueryWeights { exact_code: 999, prefix_code: 111 };
        let sp = build_search_predicate(&parsed, &lookup, &weights, &short);
        let exact = sp.score_terms.iter().find_map(|t| match t {
            ScoreTerm::ExactCode { weight, .. } => Some(*weight),
            _ => None,
        });
        assert_eq!(exact, Some(999));
    }

    #[test]
    fn short_query_emits_only_style_code_terms() {
        let mut lookup = LookupSnapshot::default();
        lookup.style_keywords.insert(
            "a1".to_string(),
            StyleKeywordEntry {
                slug: "a1".to_string(),
                name: "A1".to_string(),
                kind: StyleKeywordType::Trend,
            },
        );
        let synonyms = SynonymSnapshot::default();
        let parsed = parse_query("A1", &lookup, &synonyms);
        let weights = RelevanceWeights::default();
        let short = ShortQueryWeights::default();
        let sp = build_search_predicate(&parsed, &lookup, &weights, &short);
        assert!(sp
            .score_terms
            .iter()
            .all(|t| matches!(t, ScoreTerm::ExactCode { .. } | ScoreTerm::PrefixCode { .. })));
    }

    #[test]
    fn long_query_is_not_classified_short() {
        let lookup = LookupSnapshot::default();
        let synonyms = SynonymSnapshot::default();
        let parsed = parse_query("AB123", &lookup, &synonyms);
        let weights = RelevanceWeights::default();
        let short = ShortQueryWeights { exact_code: 999, prefix_code: 111 };
        let sp = build_search_predicate(&parsed, &lookup, &weights, &short);
        let exact = sp.score_terms.iter().find_map(|t| match t {
            ScoreTerm::ExactCode { weight, .. } => Some(*weight),
            _ => None,
        });
        assert_eq!(exact, Some(weights.exact_code));
    }

    #[test]
    fn empty_query_has_no_predicate_and_no_terms() {
        let lookup = LookupSnapshot::default();
        let synonyms = SynonymSnapshot::default();
        let parsed = parse_query("", &lookup, &synonyms);
        let weights = RelevanceWeights::default();
        let short = ShortQueryWeights::default();
        let sp = build_search_predicate(&parsed, &lookup, &weights, &short);
        assert_eq!(sp.predicate, Predicate::True);
        assert!(sp.score_terms.is_empty());
    }

    #[test]
    fn remaining_text_produces_fulltext_and_regex_terms() {
        let lookup = LookupSnapshot::default();
        let synonyms = SynonymSnapshot::default();
        let parsed = parse_query("some random text", &lookup, &synonyms);
        let weights = RelevanceWeights::default();
        let short = ShortQueryWeights::default();
        let sp = build_search_predicate(&parsed, &lookup, &weights, &short);
        assert!(sp.score_terms.iter().any(|t| matches!(t, ScoreTerm::FullText { .. })));
        assert!(sp.score_terms.iter().any(|t| matches!(t, ScoreTerm::NameRegex { .. })));
    }

    #[test]
    fn colour_dictionary_match_produces_overlap_term_and_predicate() {
        let lookup = LookupSnapshot::default();
        let parsed = ParsedQuery {
            dictionary_matches: vec![("colour", "navy-blue".to_string())],
            style_code_candidate: None,
            remaining_text: String::new(),
            raw: "navy blue".to_string(),
        };
        let weights = RelevanceWeights::default();
        let short = ShortQueryWeights::default();
        let sp = build_search_predicate(&parsed, &lookup, &weights, &short);
        let overlap_values = sp.score_terms.iter().find_map(|t| match t {
            ScoreTerm::ColourOverlap { values, .. } => Some(values.clone()),
            _ => None,
        });
        assert_eq!(overlap_values, Some(vec!["navy-blue".to_string(), "navyblue".to_string()]));
        assert_ne!(sp.predicate, Predicate::True);
    }

    #[test]
    fn regex_escape_as_substring_allows_hyphen_space_interchange() {
        let pattern = regex_escape_as_substring("tshirt");
        let re = Regex::new(&format!("(?i){pattern}")).unwrap();
        assert!(re.is_match("t-shirt"));
        assert!(re.is_match("t shirt"));
        assert!(re.is_match("t-shirts"));
        assert!(re.is_match("tshirt"));
    }

    #[test]
    fn hyphen_variants_expands_hyphenated_slug() {
        assert_eq!(
            hyphen_variants("v-neck"),
            vec!["v-neck".to_string(), "vneck".to_string()]
        );
    }

    #[test]
    fn hyphen_variants_is_identity_for_unhyphenated_slug() {
        assert_eq!(hyphen_variants("navy"), vec!["navy".to_string()]);
    }

    #[test]
    fn style_keyword_hit_adds_soft_score_without_hard_predicate_contribution() {
        let mut lookup = LookupSnapshot::default();
        lookup.style_keywords.insert(
            "retro".to_string(),
            StyleKeywordEntry {
                slug: "retro".to_string(),
                name: "Retro".to_string(),
                kind: StyleKeywordType::Trend,
            },
        );
        let synonyms = SynonymSnapshot::default();
        let parsed = parse_query("retro polo", &lookup, &synonyms);
        let weights = RelevanceWeights::default();
        let short = ShortQueryWeights::default();
        let sp = build_search_predicate(&parsed, &lookup, &weights, &short);
        assert!(sp
            .score_terms
            .iter()
            .any(|t| matches!(t, ScoreTerm::StyleKeywordOverlap { values, .. } if values == &vec!["retro".to_string()])));
    }
}

use regex::Regex;

use crate::lookup::LookupSnapshot;
use crate::synonyms::SynonymSnapshot;

/// The result of parsing a free-text query (spec §4.C).
///
/// `dictionary_matches` carries `(dimension, slug)` pairs consumed from the
/// query by dictionary/synonym lookup; `style_code_candidate` is set when
/// the whole query (with whitespace stripped) matches the style-code shape;
/// `remaining_text` is whatever wasn't consumed, fed to full-text/fuzzy
/// scoring in [`crate::search_predicate`]. `raw` is the trimmed original
/// query, used there to classify the short-query regime (spec §4.D: queries
/// of two characters or fewer).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedQuery {
    pub dictionary_matches: Vec<(&'static str, String)>,
    pub style_code_candidate: Option<String>,
    pub remaining_text: String,
    pub raw: String,
}

/// A style code is 2-10 alphanumerics containing at least one letter and
/// one digit (spec §4.C) — distinguishes `"AB123"` from a plain word like
/// `"polo"` or a plain number like `"100"`.
fn looks_like_style_code(token: &str) -> bool {
    let re = Regex::new(r"^[A-Za-z0-9]{2,10}$").expect("valid style code regex");
    if !re.is_match(token) {
        return false;
    }
    let has_letter = token.chars().any(|c| c.is_ascii_alphabetic());
    let has_digit = token.chars().any(|c| c.is_ascii_digit());
    has_letter && has_digit
}

/// Parse a free-text query against the current lookup/synonym snapshots.
///
/// Consumes phrases of descending length (3, 2, 1 words) against the fixed
/// dictionary probe order in [`LookupSnapshot::PROBE_ORDER`], checking
/// synonyms first so aliases take priority over a literal dictionary slug
/// of the same word. Whatever tokens survive become `remaining_text`.
#[must_use]
pub fn parse_query(
    raw: &str,
    lookup: &LookupSnapshot,
    synonyms: &SynonymSnapshot,
) -> ParsedQuery {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return ParsedQuery::default();
    }

    let style_code_candidate = {
        let compact: String = trimmed.split_whitespace().collect();
        if !compact.contains(' ') && looks_like_style_code(&compact) {
            Some(compact)
        } else {
            None
        }
    };

    let tokens: Vec<&str> = trimmed.split_whitespace().collect();
    let mut consumed = vec![false; tokens.len()];
    let mut dictionary_matches = Vec::new();

    for phrase_len in (1..=3usize).rev() {
        let mut start = 0;
        while start + phrase_len <= tokens.len() {
            if consumed[start..start + phrase_len].iter().any(|&c| c) {
                start += 1;
                continue;
            }
            let phrase = tokens[start..start + phrase_len].join(" ");

            if let Some(entry) = synonyms.resolve(&phrase) {
                dictionary_matches.push((entry.synonym_type.dimension_name(), entry.canonical_slug.clone()));
                for slot in &mut consumed[start..start + phrase_len] {
                    *slot = true;
                }
                start += phrase_len;
                continue;
            }

            let normalized = crate::lookup::normalize_lookup_key(&phrase);
            let mut matched_dimension = None;
            for dimension in LookupSnapshot::PROBE_ORDER {
                if let Some(dict) = lookup.dict_by_dimension(dimension) {
                    if let Some(entry) = dict.get(&normalized) {
                        matched_dimension = Some((*dimension, entry.slug.clone()));
                        break;
                    }
                }
            }

            if let Some((dimension, slug)) = matched_dimension {
                dictionary_matches.push((dimension, slug));
                for slot in &mut consumed[start..start + phrase_len] {
                    *slot = true;
                }
                start += phrase_len;
            } else {
                start += 1;
            }
        }
    }

    let remaining_text = tokens
        .iter()
        .zip(consumed.iter())
        .filter(|(_, &c)| !c)
        .map(|(t, _)| *t)
        .collect::<Vec<_>>()
        .join(" ");

    ParsedQuery {
        dictionary_matches,
        style_code_candidate,
        remaining_text,
        raw: trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::{LookupEntry, LookupSnapshot};

    fn snapshot_with(dimension: &str, key: &str, slug: &str) -> LookupSnapshot {
        let mut snap = LookupSnapshot::default();
        let entry = LookupEntry { slug: slug.to_string(), name: slug.to_string() };
        let dict = match dimension {
            "brand" => &mut snap.brands,
            "product_type" => &mut snap.product_types,
            "sport" => &mut snap.sports,
            "fit" => &mut snap.fits,
            "sleeve" => &mut snap.sleeves,
            "neckline" => &mut snap.necklines,
            "fabric" => &mut snap.fabrics,
            "sector" => &mut snap.sectors,
            "colour" => &mut snap.colours,
            "feature" => &mut snap.accreditations,
            _ => panic!("unknown dimension {dimension}"),
        };
        dict.insert(key.to_string(), entry);
        snap
    }

    #[test]
    fn empty_query_parses_to_default() {
        let snap = LookupSnapshot::default();
        let synonyms = SynonymSnapshot::default();
        let parsed = parse_query("   ", &snap, &synonyms);
        assert_eq!(parsed, ParsedQuery::default());
    }

    #[test]
    fn detects_style_code_when_whole_query_matches() {
        let snap = LookupSnapshot::default();
        let synonyms = SynonymSnapshot::default();
        let parsed = parse_query("AB123", &snap, &synonyms);
        assert_eq!(parsed.style_code_candidate.as_deref(), Some("AB123"));
    }

    #[test]
    fn plain_word_is_not_a_style_code() {
        let snap = LookupSnapshot::default();
        let synonyms = SynonymSnapshot::default();
        let parsed = parse_query("polo", &snap, &synonyms);
        assert!(parsed.style_code_candidate.is_none());
    }

    #[test]
    fn plain_number_is_not_a_style_code() {
        let snap = LookupSnapshot::default();
        let synonyms = SynonymSnapshot::default();
        let parsed = parse_query("100", &snap, &synonyms);
        assert!(parsed.style_code_candidate.is_none());
    }

    #[test]
    fn multi_word_query_is_not_a_style_code() {
        let snap = LookupSnapshot::default();
        let synonyms = SynonymSnapshot::default();
        let parsed = parse_query("AB 123", &snap, &synonyms);
        assert!(parsed.style_code_candidate.is_none());
    }

    #[test]
    fn resolves_single_word_against_dictionary() {
        let snap = snapshot_with("brand", "nike", "nike");
        let synonyms = SynonymSnapshot::default();
        let parsed = parse_query("nike polo", &snap, &synonyms);
        assert_eq!(parsed.dictionary_matches, vec![("brand", "nike".to_string())]);
        assert_eq!(parsed.remaining_text, "polo");
    }

    #[test]
    fn prefers_longer_phrase_match_over_shorter() {
        let mut snap = LookupSnapshot::default();
        snap.accreditations.insert(
            "hi vis".to_string(),
            LookupEntry { slug: "high-visibility".to_string(), name: "Hi Vis".to_string() },
        );
        let synonyms = SynonymSnapshot::default();
        let parsed = parse_query("hi vis jacket", &snap, &synonyms);
        assert_eq!(
            parsed.dictionary_matches,
            vec![("feature", "high-visibility".to_string())]
        );
        assert_eq!(parsed.remaining_text, "jacket");
    }

    #[test]
    fn synonym_takes_priority_over_literal_word() {
        use crate::synonyms::{fallback_synonyms, SynonymSnapshot};
        let snap = LookupSnapshot::default();
        let synonyms = SynonymSnapshot::from_entries(fallback_synonyms());
        let parsed = parse_query("tee", &snap, &synonyms);
        assert_eq!(
            parsed.dictionary_matches,
            vec![("product_type", "t-shirt".to_string())]
        );
    }

    #[test]
    fn unmatched_tokens_become_remaining_text() {
        let snap = LookupSnapshot::default();
        let synonyms = SynonymSnapshot::default();
        let parsed = parse_query("some random query", &snap, &synonyms);
        assert!(parsed.dictionary_matches.is_empty());
        assert_eq!(parsed.remaining_text, "some random query");
    }
}

//! Component C (spec §4.C): turns a free-text search query into a
//! structured set of dictionary matches plus whatever text is left over for
//! full-text/fuzzy scoring.

mod parser;

pub use parser::{parse_query, ParsedQuery};

//! Free-text matching of search queries against catalog mod names
//!
//! The catalog's own search is fuzzy and happily returns loosely related
//! entries; this module post-filters those results with a strict conjunctive
//! substring check.

/// Strip a parenthesized suffix from a catalog name.
///
/// Catalog entries often append disambiguating text in parentheses, e.g.
/// "Fabric API (Forge)". The span removed runs from the first `(` to the
/// last `)` and must contain at least one character.
pub(crate) fn strip_parenthetical(name: &str) -> String {
    match (name.find('('), name.rfind(')')) {
        (Some(open), Some(close)) if close >= open + 2 => {
            let mut stripped = String::with_capacity(name.len());
            stripped.push_str(&name[..open]);
            stripped.push_str(&name[close + 1..]);
            stripped
        }
        _ => name.to_string(),
    }
}

/// Check whether a catalog entry name matches a free-text query.
///
/// Every whitespace-separated token of the query must be a literal substring
/// of the candidate name, compared case-insensitively with any parenthesized
/// suffix removed. No fuzzy matching and no token reordering tolerance.
pub fn matches(candidate_name: &str, query: &str) -> bool {
    let stripped = strip_parenthetical(candidate_name).to_lowercase();
    query
        .to_lowercase()
        .split_whitespace()
        .all(|token| stripped.contains(token))
}

//! Name autocomplete over the known-names universe.

use std::collections::HashSet;

/// Suggest known names matching a free-text query.
///
/// Case-insensitive substring containment, no fuzzy matching. Names already
/// in `excluded` (typically the session's pending selection) are filtered
/// out, and the result is sorted ascending so suggestions are deterministic.
/// An empty or whitespace query yields no suggestions.
pub fn suggest(query: &str, known_names: &[String], excluded: &HashSet<String>) -> Vec<String> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    let mut matches: Vec<String> = known_names
        .iter()
        .filter(|name| !excluded.contains(*name))
        .filter(|name| name.to_lowercase().contains(&needle))
        .cloned()
        .collect();
    matches.sort();
    matches
}

use regex::Regex;
use std::collections::HashSet;

/// Tokens too generic to count as meaningful overlap between disease names.
const IGNORE_TOKENS: [&str; 5] = ["acute", "chronic", "type", "syndrome", "disease"];

/// Normalize a disease name for comparison: lowercase, drop parenthetical
/// qualifiers, map everything outside [a-z ] to a space, collapse whitespace.
/// Idempotent: normalizing an already-normalized name is a no-op.
pub fn normalize(name: &str) -> String {
    let mut normalized = name.to_lowercase();

    // Drop parenthetical qualifiers like "(type 2)"
    let re = Regex::new(r"\(.*?\)").unwrap();
    normalized = re.replace_all(&normalized, "").to_string();

    // Everything that isn't a lowercase letter becomes a space
    let re = Regex::new(r"[^a-z\s]").unwrap();
    normalized = re.replace_all(&normalized, " ").to_string();

    // Collapse runs of whitespace
    let re = Regex::new(r"\s+").unwrap();
    normalized = re.replace_all(&normalized, " ").to_string();

    normalized.trim().to_string()
}

/// Loose comparison of two disease names: true if either normalized form
/// contains the other, or if they share a meaningful token (generic words
/// like "chronic" or "disease" don't count).
///
/// This is a general matching primitive; seed-user selection deliberately
/// uses exact equality instead (see `UserDirectory::find_seed_users`).
pub fn fuzzy_match(a: &str, b: &str) -> bool {
    let a_norm = normalize(a);
    let b_norm = normalize(b);

    if a_norm.contains(&b_norm) || b_norm.contains(&a_norm) {
        return true;
    }

    let a_tokens: HashSet<&str> = a_norm.split_whitespace().collect();
    let b_tokens: HashSet<&str> = b_norm.split_whitespace().collect();

    a_tokens
        .intersection(&b_tokens)
        .any(|t| !IGNORE_TOKENS.contains(t))
}

//! PATH list parsing and comparison.
//!
//! The machine PATH is a single delimited string; this module owns the split
//! into an ordered entry list, the join back, and the normalized comparison
//! used for duplicate detection. Order is meaningful (lookup precedence) and
//! is never changed for pre-existing entries.

/// Platform path-list separator: `;` on Windows, `:` elsewhere.
pub const SEPARATOR: char = if cfg!(windows) { ';' } else { ':' };
const SEPARATOR_STR: &str = if cfg!(windows) { ";" } else { ":" };

/// Split a raw PATH string into entries, dropping empty segments.
pub fn split(raw: &str) -> Vec<String> {
    raw.split(SEPARATOR)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// Join entries back into a raw PATH string.
pub fn join(parts: &[String]) -> String {
    parts.join(SEPARATOR_STR)
}

/// Normalize an entry for duplicate comparison.
///
/// PATH entries compare case-insensitively regardless of platform, matching
/// common practice for this family of tools. Trailing separators are trimmed
/// and, on Windows, forward slashes fold to backslashes. `%VAR%` tokens are
/// compared literally, not expanded.
pub fn normalize_for_compare(entry: &str) -> String {
    let mut normalized = entry.trim().to_lowercase();
    if cfg!(windows) {
        normalized = normalized.replace('/', "\\");
    }
    while normalized.len() > 1 && (normalized.ends_with('\\') || normalized.ends_with('/')) {
        normalized.pop();
    }
    normalized
}

/// True when `candidate` is already present in `list` under the normalized
/// comparison.
pub fn contains(list: &[String], candidate: &str) -> bool {
    let needle = normalize_for_compare(candidate);
    list.iter().any(|p| normalize_for_compare(p) == needle)
}

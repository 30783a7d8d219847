/*!
 * Wildcard pattern matching for path filters
 *
 * A single `*` splits a pattern into a required prefix and suffix. Patterns
 * without a wildcard are substring tests, so `test` matches `unittest`.
 */

/// The wildcard character understood by [`match_pattern`]
pub const WILDCARD: char = '*';

/// Check whether `candidate` matches `pattern`
///
/// - an empty pattern never matches
/// - `*` alone matches any non-empty candidate
/// - `prefix*suffix` matches when the candidate starts with `prefix`, ends with
///   `suffix` and is long enough to hold both without overlap
/// - a pattern without `*` matches when it occurs anywhere in the candidate
///
/// Patterns holding more than one `*` are not supported and are compared as a
/// literal substring. Matching is case-sensitive and `*` also spans `/`.
pub fn match_pattern(candidate: &str, pattern: &str) -> bool {
    if pattern.is_empty() {
        return false;
    }

    if pattern == "*" {
        return !candidate.is_empty();
    }

    match wildcard_count(pattern) {
        0 => candidate.contains(pattern),
        1 => {
            let (prefix, suffix) = pattern.split_once(WILDCARD).unwrap_or((pattern, ""));
            candidate.len() >= prefix.len() + suffix.len()
                && candidate.starts_with(prefix)
                && candidate.ends_with(suffix)
        }
        _ => candidate.contains(pattern),
    }
}

/// Number of wildcards in a pattern
pub fn wildcard_count(pattern: &str) -> usize {
    pattern.matches(WILDCARD).count()
}

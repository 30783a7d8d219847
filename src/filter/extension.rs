/*!
 * Extension-list exclusion (`*.o, *.a, *.lib`)
 */

/// Parse a comma-separated extension list into bare extensions such as `.o`
///
/// Each token is trimmed and loses an optional leading `*`. Empty tokens are dropped.
pub fn parse_extension_list(extension_list: &str) -> Vec<String> {
    extension_list
        .split(',')
        .map(|token| token.trim())
        .map(|token| token.strip_prefix('*').unwrap_or(token))
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Extension of the final path segment, from its last `.` (dot included)
///
/// Returns an empty string when the final segment has no dot.
pub fn extension_of(path: &str) -> &str {
    let segment = path.rsplit(['/', '\\']).next().unwrap_or(path);
    segment.rfind('.').map(|idx| &segment[idx..]).unwrap_or("")
}

/// Check whether the extension of `path` appears in `extension_list`
pub fn is_excluded(path: &str, extension_list: &str) -> bool {
    has_listed_extension(path, &parse_extension_list(extension_list))
}

/// Check a path against an already parsed extension list
pub fn has_listed_extension(path: &str, extensions: &[String]) -> bool {
    let ext = extension_of(path);
    !ext.is_empty() && extensions.iter().any(|listed| listed == ext)
}

/// Whether a pattern reads as an extension list (`*.ext[, *.ext...]`)
///
/// Every token must be `*.` followed by a bare extension without further dots,
/// wildcards or separators.
pub fn is_extension_list(pattern: &str) -> bool {
    let mut tokens = pattern.split(',').map(str::trim).peekable();
    if tokens.peek().is_none() {
        return false;
    }

    tokens.all(|token| match token.strip_prefix("*.") {
        Some(ext) => {
            !ext.is_empty()
                && !ext
                    .chars()
                    .any(|c| matches!(c, '.' | '*' | '/' | '\\') || c.is_whitespace())
        }
        None => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_excluded_extensions() {
        let path = "/tmp/test.o";
        assert!(is_excluded(path, "*.o"));
        assert!(!is_excluded(path, "*.cpp"));
        assert!(is_excluded(path, "*.o, *.a, *.lib"));
        assert!(!is_excluded(path, "*.cpp, *.h"));
    }

    #[test]
    fn test_empty_list_never_excludes() {
        assert!(!is_excluded("main.cpp", ""));
        assert!(!is_excluded("main.cpp", " , "));
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("src/main.rs"), ".rs");
        assert_eq!(extension_of("archive.tar.gz"), ".gz");
        assert_eq!(extension_of("dir.d/Makefile"), "");
        assert_eq!(extension_of(".gitignore"), ".gitignore");
        assert_eq!(extension_of(""), "");
    }

    #[test]
    fn test_bare_extensions_without_star() {
        assert!(is_excluded("lib/libfoo.a", ".a,.so"));
        assert!(!is_excluded("lib/libfoo.la", ".a,.so"));
    }

    #[test]
    fn test_is_extension_list() {
        assert!(is_extension_list("*.cpp"));
        assert!(is_extension_list("*.o, *.a, *.lib"));
        assert!(!is_extension_list("*build"));
        assert!(!is_extension_list("*.tar.gz"));
        assert!(!is_extension_list("test"));
        assert!(!is_extension_list("*.o, build"));
        assert!(!is_extension_list(""));
    }
}

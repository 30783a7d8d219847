/*!
 * Include/exclude filtering for scanned paths
 *
 * A [`FilterManager`] is built once per render from [`FilterCriteria`] and
 * answers one admit/reject question per path. Exclusion always wins over
 * inclusion, and caller-supplied predicates always win over string patterns.
 */

pub mod extension;
pub mod pattern;

use std::fmt;
use std::path::Path;
use std::sync::Arc;

pub use extension::{extension_of, is_excluded, is_extension_list, parse_extension_list};
pub use pattern::{match_pattern, wildcard_count};

/// Caller-supplied path predicate
pub type PathPredicate = Arc<dyn Fn(&Path) -> bool + Send + Sync>;

/// Filter configuration for a single render pass
#[derive(Clone, Default)]
pub struct FilterCriteria {
    /// Pattern a path must match to be admitted (empty: admit all)
    pub include_pattern: Option<String>,
    /// Pattern or extension list that rejects a path
    pub exclude_pattern: Option<String>,
    /// Overrides `include_pattern` when set
    pub on_include_filter: Option<PathPredicate>,
    /// Overrides `exclude_pattern` when set
    pub on_exclude_filter: Option<PathPredicate>,
}

impl FilterCriteria {
    /// Criteria built from the two CLI patterns
    pub fn from_patterns(include: Option<String>, exclude: Option<String>) -> Self {
        Self {
            include_pattern: include,
            exclude_pattern: exclude,
            ..Self::default()
        }
    }

    pub fn include(mut self, pattern: impl Into<String>) -> Self {
        self.include_pattern = Some(pattern.into());
        self
    }

    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_pattern = Some(pattern.into());
        self
    }

    /// Decide inclusion with a predicate instead of the include pattern
    pub fn include_when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Path) -> bool + Send + Sync + 'static,
    {
        self.on_include_filter = Some(Arc::new(predicate));
        self
    }

    /// Decide exclusion with a predicate instead of the exclude pattern
    pub fn exclude_when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Path) -> bool + Send + Sync + 'static,
    {
        self.on_exclude_filter = Some(Arc::new(predicate));
        self
    }
}

impl fmt::Debug for FilterCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterCriteria")
            .field("include_pattern", &self.include_pattern)
            .field("exclude_pattern", &self.exclude_pattern)
            .field("on_include_filter", &self.on_include_filter.is_some())
            .field("on_exclude_filter", &self.on_exclude_filter.is_some())
            .finish()
    }
}

/// A single matching strategy, chosen once per role at construction time
#[derive(Clone)]
pub enum Matcher {
    /// Wildcard/substring pattern, see [`match_pattern`]
    Pattern(String),
    /// Bare extensions such as `.o`, compared against the path's extension
    Extensions(Vec<String>),
    /// Caller-supplied predicate
    Custom(PathPredicate),
}

impl Matcher {
    /// Matcher for the include role: predicate first, then a non-empty pattern
    pub fn for_include(criteria: &FilterCriteria) -> Option<Self> {
        if let Some(predicate) = &criteria.on_include_filter {
            return Some(Self::Custom(Arc::clone(predicate)));
        }
        non_empty(&criteria.include_pattern).map(|p| Self::Pattern(p.to_string()))
    }

    /// Matcher for the exclude role: predicate first, then an extension list or pattern
    pub fn for_exclude(criteria: &FilterCriteria) -> Option<Self> {
        if let Some(predicate) = &criteria.on_exclude_filter {
            return Some(Self::Custom(Arc::clone(predicate)));
        }
        non_empty(&criteria.exclude_pattern).map(|p| {
            if is_extension_list(p) {
                Self::Extensions(parse_extension_list(p))
            } else {
                Self::Pattern(p.to_string())
            }
        })
    }

    /// Test a path against this matcher
    pub fn matches(&self, path: &Path) -> bool {
        match self {
            Self::Pattern(pattern) => match_pattern(&candidate(path), pattern),
            Self::Extensions(extensions) => {
                extension::has_listed_extension(&candidate(path), extensions)
            }
            Self::Custom(predicate) => predicate(path),
        }
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pattern(pattern) => f.debug_tuple("Pattern").field(pattern).finish(),
            Self::Extensions(exts) => f.debug_tuple("Extensions").field(exts).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Admit/reject decisions for scanned paths
#[derive(Debug, Clone, Default)]
pub struct FilterManager {
    include: Option<Matcher>,
    exclude: Option<Matcher>,
}

impl FilterManager {
    /// Resolve the include and exclude matchers for `criteria`
    pub fn new(criteria: &FilterCriteria) -> Self {
        Self {
            include: Matcher::for_include(criteria),
            exclude: Matcher::for_exclude(criteria),
        }
    }

    /// Whether `path` is admitted into the report
    ///
    /// Exclusion is checked first; an included-by-default verdict applies when
    /// no include matcher is configured.
    pub fn is_matching_filters(&self, path: &Path) -> bool {
        if self.exclude.as_ref().is_some_and(|m| m.matches(path)) {
            return false;
        }

        match &self.include {
            Some(matcher) => matcher.matches(path),
            None => true,
        }
    }

    pub fn include_matcher(&self) -> Option<&Matcher> {
        self.include.as_ref()
    }

    pub fn exclude_matcher(&self) -> Option<&Matcher> {
        self.exclude.as_ref()
    }
}

fn non_empty(pattern: &Option<String>) -> Option<&str> {
    pattern.as_deref().filter(|p| !p.is_empty())
}

/// Path as a matching candidate, always with `/` separators
fn candidate(path: &Path) -> String {
    let text = path.to_string_lossy();
    if std::path::MAIN_SEPARATOR == '/' {
        text.into_owned()
    } else {
        text.replace(std::path::MAIN_SEPARATOR, "/")
    }
}

use crate::sbom_generation::domain::{Component, ComponentIdentity, DependencyGraph};
use crate::shared::Result;
use std::cell::Cell;
use std::collections::BTreeSet;

/// Maximum number of exclude patterns to prevent DoS attacks
const MAX_EXCLUDE_PATTERNS: usize = 64;

/// Maximum length of a single exclude pattern to prevent DoS attacks
const MAX_PATTERN_LENGTH: usize = 255;

/// ComponentFilter - Removes components matching exclusion patterns
///
/// A pattern is compared case-insensitively against a component's name and
/// against `name@version`. `*` matches zero or more characters.
#[derive(Debug)]
pub struct ComponentFilter {
    patterns: Vec<ExcludePattern>,
}

impl ComponentFilter {
    /// Creates a new ComponentFilter from raw pattern strings
    ///
    /// # Errors
    /// - Too many patterns (> MAX_EXCLUDE_PATTERNS)
    /// - Invalid pattern format (length, characters)
    pub fn new(patterns: Vec<String>) -> Result<Self> {
        if patterns.len() > MAX_EXCLUDE_PATTERNS {
            anyhow::bail!(
                "Too many exclusion patterns: {} (maximum: {})",
                patterns.len(),
                MAX_EXCLUDE_PATTERNS
            );
        }

        let patterns = patterns
            .into_iter()
            .map(ExcludePattern::new)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { patterns })
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Removes matching components from the graph, along with components that
    /// were only reachable through them. The root is never removed.
    ///
    /// # Returns
    /// Number of components removed
    pub fn apply(&self, graph: &mut DependencyGraph) -> usize {
        if self.patterns.is_empty() {
            return 0;
        }

        let reachable_before = graph.reachable_from_root(|_| true);

        let matched: BTreeSet<ComponentIdentity> = graph
            .components()
            .filter(|c| c.identity != *graph.root() && self.matches(c))
            .map(|c| c.identity.clone())
            .collect();
        let mut removed = graph.remove_components(&matched);

        let reachable_after = graph.reachable_from_root(|_| true);
        let stranded: BTreeSet<ComponentIdentity> = reachable_before
            .difference(&reachable_after)
            .cloned()
            .collect();
        removed += graph.remove_components(&stranded);

        removed
    }

    /// Checks if a component matches any exclusion pattern
    fn matches(&self, component: &Component) -> bool {
        let name = component.name.to_lowercase();
        let qualified = component
            .version
            .as_deref()
            .map(|version| format!("{}@{}", name, version.to_lowercase()));

        self.patterns.iter().any(|p| {
            p.matches(&name) || qualified.as_deref().is_some_and(|q| p.matches(q))
        })
    }

    /// Returns the patterns that did not match any component
    ///
    /// Call after [`ComponentFilter::apply`].
    pub fn unmatched_patterns(&self) -> Vec<String> {
        self.patterns
            .iter()
            .filter(|p| !p.matched.get())
            .map(|p| p.original.clone())
            .collect()
    }
}

/// Represents a single exclusion pattern with its compiled matcher
#[derive(Debug)]
struct ExcludePattern {
    original: String,
    matcher: PatternMatcher,
    matched: Cell<bool>,
}

impl ExcludePattern {
    fn new(pattern: String) -> Result<Self> {
        validate_pattern(&pattern)?;

        let matcher = compile_pattern(&pattern.to_lowercase());

        Ok(Self {
            original: pattern,
            matcher,
            matched: Cell::new(false),
        })
    }

    /// Checks a lowercased candidate and remembers that the pattern was used
    fn matches(&self, candidate: &str) -> bool {
        let is_match = self.matcher.matches(candidate);
        if is_match {
            self.matched.set(true);
        }
        is_match
    }
}

/// Pattern matcher types for efficient matching
#[derive(Debug)]
enum PatternMatcher {
    /// Exact match: "serilog"
    Exact(String),
    /// Leading wildcard: "*.tests"
    EndsWith(String),
    /// Trailing wildcard: "microsoft.*"
    StartsWith(String),
    /// Wildcards on both ends: "*analyzers*"
    Contains(String),
    /// General case, anchored at both ends: "system.*.json", "a*b*c*"
    Glob(Vec<String>),
}

impl PatternMatcher {
    fn matches(&self, candidate: &str) -> bool {
        match self {
            PatternMatcher::Exact(s) => candidate == s,
            PatternMatcher::EndsWith(suffix) => candidate.ends_with(suffix.as_str()),
            PatternMatcher::StartsWith(prefix) => candidate.starts_with(prefix.as_str()),
            PatternMatcher::Contains(middle) => candidate.contains(middle.as_str()),
            PatternMatcher::Glob(parts) => glob_matches(parts, candidate),
        }
    }
}

/// `parts` is the pattern split on `*`, empty segments included, so the first
/// segment must be a prefix and the last a suffix.
fn glob_matches(parts: &[String], candidate: &str) -> bool {
    let Some((first, rest)) = parts.split_first() else {
        return candidate.is_empty();
    };
    let Some((last, middle)) = rest.split_last() else {
        return candidate == first;
    };

    let Some(after_prefix) = candidate.strip_prefix(first.as_str()) else {
        return false;
    };
    let Some(mut body) = after_prefix.strip_suffix(last.as_str()) else {
        return false;
    };

    for part in middle.iter().filter(|p| !p.is_empty()) {
        match body.find(part.as_str()) {
            Some(pos) => body = &body[pos + part.len()..],
            None => return false,
        }
    }
    true
}

fn validate_pattern(pattern: &str) -> Result<()> {
    if pattern.is_empty() {
        anyhow::bail!("Exclusion pattern cannot be empty");
    }

    if pattern.len() > MAX_PATTERN_LENGTH {
        anyhow::bail!(
            "Exclusion pattern is too long: '{}' ({} chars). Maximum: {} chars",
            pattern,
            pattern.len(),
            MAX_PATTERN_LENGTH
        );
    }

    if let Some(ch) = pattern.chars().find(|c| !is_valid_pattern_char(*c)) {
        anyhow::bail!(
            "Exclusion pattern contains invalid character '{}' in pattern '{}'. \
             Only alphanumeric, hyphens, underscores, dots, plus, brackets, '@' and asterisks (*) are allowed.",
            ch,
            pattern
        );
    }

    if pattern.chars().all(|c| c == '*') {
        anyhow::bail!(
            "Exclusion pattern cannot contain only wildcards: '{}'",
            pattern
        );
    }

    Ok(())
}

fn is_valid_pattern_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | '+' | '[' | ']' | '@' | '*')
}

/// Compiles a lowercased pattern into a matcher
fn compile_pattern(pattern: &str) -> PatternMatcher {
    let inner = pattern.trim_start_matches('*').trim_end_matches('*');
    let leading = pattern.starts_with('*');
    let trailing = pattern.ends_with('*');

    if inner.contains('*') {
        return PatternMatcher::Glob(pattern.split('*').map(str::to_string).collect());
    }

    match (leading, trailing) {
        (false, false) => PatternMatcher::Exact(pattern.to_string()),
        (true, false) => PatternMatcher::EndsWith(inner.to_string()),
        (false, true) => PatternMatcher::StartsWith(inner.to_string()),
        (true, true) => PatternMatcher::Contains(inner.to_string()),
    }
}

//! Rule types shared by the translator and compiler

use serde::Serialize;

/// Whether a rule includes or excludes matching paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sense {
    Include,
    Exclude,
}

impl Sense {
    /// The rsync filter prefix character for this sense.
    pub fn marker(&self) -> char {
        match self {
            Self::Include => '+',
            Self::Exclude => '-',
        }
    }
}

/// One parsed gitignore line.
///
/// `pattern` is unescaped but not yet placed in its prefix context; that
/// happens in [`IgnoreRule::to_filter_rules`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoreRule {
    pub sense: Sense,
    pub pattern: String,
    pub prefix: Option<String>,
}

/// One rsync filter rule, rendered as `+ pattern` or `- pattern`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FilterRule {
    pub sense: Sense,
    pub pattern: String,
}

impl FilterRule {
    pub fn new(sense: Sense, pattern: impl Into<String>) -> Self {
        Self {
            sense,
            pattern: pattern.into(),
        }
    }

    pub fn exclude(pattern: impl Into<String>) -> Self {
        Self::new(Sense::Exclude, pattern)
    }

    pub fn include(pattern: impl Into<String>) -> Self {
        Self::new(Sense::Include, pattern)
    }
}

impl std::fmt::Display for FilterRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.sense.marker(), self.pattern)
    }
}

/// Pattern excluding version-control metadata at any depth.
pub const VCS_EXCLUDE_PATTERN: &str = ".git";

/// An ordered list of filter rules.
///
/// rsync applies the first matching rule, so order is significant and is
/// preserved exactly as rules are appended. Every set begins with the
/// version-control metadata exclusion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FilterSet {
    rules: Vec<FilterRule>,
}

impl Default for FilterSet {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterSet {
    /// Create a set holding only the version-control metadata exclusion.
    pub fn new() -> Self {
        Self {
            rules: vec![FilterRule::exclude(VCS_EXCLUDE_PATTERN)],
        }
    }

    /// Append rules, keeping their order.
    pub fn extend(&mut self, rules: impl IntoIterator<Item = FilterRule>) {
        self.rules.extend(rules);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FilterRule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Always false: the metadata exclusion is never removed.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules in rsync filter syntax, one per element.
    pub fn to_lines(&self) -> Vec<String> {
        self.rules.iter().map(ToString::to_string).collect()
    }
}

impl<'a> IntoIterator for &'a FilterSet {
    type Item = &'a FilterRule;
    type IntoIter = std::slice::Iter<'a, FilterRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

/// Newline-delimited rsync filter list.
impl std::fmt::Display for FilterSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for rule in &self.rules {
            writeln!(f, "{}", rule)?;
        }
        Ok(())
    }
}

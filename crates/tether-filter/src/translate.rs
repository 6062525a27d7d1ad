//! gitignore line to rsync filter rule translation

use std::borrow::Cow;

use crate::expand::{ANY_DEPTH, expand_any_depth, expand_char_groups};
use crate::rule::{FilterRule, IgnoreRule, Sense};

impl IgnoreRule {
    /// Parse one gitignore line.
    ///
    /// Returns `None` for blank lines, comments and lines whose pattern
    /// names nothing (`!`, `/`, `**/`). `prefix` is the anchored directory
    /// (`/sub/dir`) of the ignore file the line came from, or `None` for
    /// root-level sources.
    pub fn parse(line: &str, prefix: Option<&str>) -> Option<Self> {
        let line = strip_trailing_whitespace(line);
        if line.is_empty() || line.starts_with('#') {
            return None;
        }

        let (sense, rest) = match line.strip_prefix('!') {
            Some(rest) => (Sense::Include, rest),
            None => (Sense::Exclude, &line[..]),
        };

        let rest = rest
            .strip_prefix('\\')
            .filter(|r| r.starts_with(['!', '#']))
            .unwrap_or(rest);
        let pattern = rest.replace("\\\\", "\\");
        if names_nothing(&pattern) {
            tracing::debug!(line = %line, "Ignoring pattern without a name");
            return None;
        }

        Some(Self {
            sense,
            pattern,
            prefix: prefix.filter(|p| !p.is_empty()).map(str::to_string),
        })
    }

    /// The pattern relative to its prefix context, before expansion.
    ///
    /// An anchored pattern follows the prefix directly; one starting with
    /// `**/` gets a separating slash; anything else matches at any depth
    /// below the prefix. Without a prefix the pattern is unchanged.
    fn relative_pattern(&self) -> Cow<'_, str> {
        if self.prefix.is_none() || self.pattern.starts_with('/') {
            Cow::Borrowed(&self.pattern)
        } else if self.pattern.starts_with(ANY_DEPTH) {
            Cow::Owned(format!("/{}", self.pattern))
        } else {
            Cow::Owned(format!("/{ANY_DEPTH}{}", self.pattern))
        }
    }

    /// Expand into rsync filter rules.
    ///
    /// Any-depth variants are produced first, then each is expanded over
    /// its character groups. The prefix is attached afterwards so its
    /// directory names are never expanded.
    pub fn to_filter_rules(&self) -> Vec<FilterRule> {
        let prefix = self.prefix.as_deref();
        expand_any_depth(&self.relative_pattern())
            .iter()
            .flat_map(|pattern| expand_char_groups(pattern))
            .filter(|pattern| !pattern.is_empty())
            .map(|pattern| FilterRule::new(self.sense, under_prefix(prefix, &pattern)))
            .collect()
    }
}

/// True when a pattern has no name component left once `/` and `**/` are
/// removed. git matches nothing with such a pattern.
fn names_nothing(pattern: &str) -> bool {
    pattern.replace(ANY_DEPTH, "").trim_matches('/').is_empty()
}

/// Join `prefix` and `pattern`, escaping `*`, `?` and `[` in the prefix.
///
/// rsync honors backslash escapes only in patterns holding a wildcard, so
/// a backslash in the prefix is doubled only when the result has one.
fn under_prefix(prefix: Option<&str>, pattern: &str) -> String {
    let Some(prefix) = prefix else {
        return pattern.to_string();
    };

    let has_wildcard = |s: &str| s.contains(['*', '?', '[']);
    let escape_backslash = has_wildcard(prefix) || has_wildcard(pattern);

    let mut out = String::with_capacity(prefix.len() + pattern.len() + 4);
    for c in prefix.chars() {
        match c {
            '*' | '?' | '[' => {
                out.push('\\');
                out.push(c);
            }
            '\\' if escape_backslash => out.push_str("\\\\"),
            c => out.push(c),
        }
    }
    out.push_str(pattern);
    out
}

/// Translate one gitignore line into the rsync filter rules it stands for.
///
/// Comments and blank lines yield nothing.
///
/// ```
/// use tether_filter::translate_line;
///
/// let rules: Vec<String> = translate_line("build[0-1]/", Some("/sub"))
///     .iter()
///     .map(|r| r.to_string())
///     .collect();
/// assert_eq!(
///     rules,
///     vec!["- /sub/**/build0/", "- /sub/**/build1/", "- /sub/build0/", "- /sub/build1/"]
/// );
/// ```
pub fn translate_line(line: &str, prefix: Option<&str>) -> Vec<FilterRule> {
    IgnoreRule::parse(line, prefix)
        .map(|rule| rule.to_filter_rules())
        .unwrap_or_default()
}

/// Strip trailing whitespace, keeping one backslash-escaped trailing space.
///
/// `foo\ ` keeps its space (as `foo `); `foo ` does not.
fn strip_trailing_whitespace(line: &str) -> Cow<'_, str> {
    let trimmed = line.trim_end();
    let escaped_space = line[trimmed.len()..].starts_with(' ')
        && trimmed.chars().rev().take_while(|c| *c == '\\').count() % 2 == 1;

    if escaped_space {
        Cow::Owned(format!("{} ", &trimmed[..trimmed.len() - 1]))
    } else {
        Cow::Borrowed(trimmed)
    }
}

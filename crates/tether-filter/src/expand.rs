//! Pattern expansion into concrete variants
//!
//! Each function maps one pattern to a finite, ordered list of patterns.
//! They compose left to right: any-depth expansion first, then character
//! groups on every result.

use regex::Regex;
use std::sync::LazyLock;

/// The any-depth token.
pub const ANY_DEPTH: &str = "**/";

/// Most variants a single expansion step may produce for one line.
pub const MAX_VARIANTS: usize = 1024;

/// First bracket group with at least one character. An unclosed `[` never
/// matches and stays literal.
static CHAR_GROUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]").expect("Invalid character group regex"));

/// Expand every `**/` into a kept and an elided variant.
///
/// gitignore's `**/` matches zero or more segments while rsync's needs at
/// least one, so `k` occurrences yield `2^k` variants. For each occurrence
/// the variants keeping it come before those eliding it. Past
/// [`MAX_VARIANTS`] only the fully kept form is returned.
///
/// ```
/// use tether_filter::expand::expand_any_depth;
///
/// assert_eq!(
///     expand_any_depth("a/**/b/**/c"),
///     vec!["a/**/b/**/c", "a/**/b/c", "a/b/**/c", "a/b/c"]
/// );
/// ```
pub fn expand_any_depth(pattern: &str) -> Vec<String> {
    let tokens = pattern.matches(ANY_DEPTH).count();
    let within_limit = u32::try_from(tokens)
        .ok()
        .and_then(|k| 1usize.checked_shl(k))
        .is_some_and(|count| count <= MAX_VARIANTS);
    if !within_limit {
        tracing::warn!(
            pattern,
            tokens,
            limit = MAX_VARIANTS,
            "Too many any-depth tokens, zero-segment matches are not expanded"
        );
        return vec![pattern.to_string()];
    }
    any_depth_variants(pattern)
}

fn any_depth_variants(pattern: &str) -> Vec<String> {
    let Some(at) = pattern.find(ANY_DEPTH) else {
        return vec![pattern.to_string()];
    };

    let head = &pattern[..at];
    let tails = any_depth_variants(&pattern[at + ANY_DEPTH.len()..]);

    let kept = tails.iter().map(|tail| format!("{head}{ANY_DEPTH}{tail}"));
    let elided = tails.iter().map(|tail| format!("{head}{tail}"));
    kept.chain(elided).collect()
}

/// Expand every bracket character group into one variant per character.
///
/// Ranges such as `0-2` are enumerated first. Groups multiply: sizes `m`
/// and `n` give `m * n` variants, ordered by the first group's characters.
/// When the product would exceed [`MAX_VARIANTS`], every group becomes a
/// `?` wildcard instead.
///
/// ```
/// use tether_filter::expand::expand_char_groups;
///
/// assert_eq!(expand_char_groups("v[12].[ch]"), vec!["v1.c", "v1.h", "v2.c", "v2.h"]);
/// ```
pub fn expand_char_groups(pattern: &str) -> Vec<String> {
    let bound = CHAR_GROUP
        .captures_iter(pattern)
        .filter_map(|caps| caps.get(1))
        .fold(1usize, |count, body| {
            let size = if negated(body.as_str()).is_some() {
                1
            } else {
                group_size_bound(body.as_str())
            };
            count.saturating_mul(size)
        });

    if bound > MAX_VARIANTS {
        tracing::warn!(
            pattern,
            limit = MAX_VARIANTS,
            "Too many character group variants, approximated by single-character wildcards"
        );
        return vec![CHAR_GROUP.replace_all(pattern, "?").into_owned()];
    }
    char_group_variants(pattern)
}

fn char_group_variants(pattern: &str) -> Vec<String> {
    let Some(caps) = CHAR_GROUP.captures(pattern) else {
        return vec![pattern.to_string()];
    };
    let (Some(group), Some(body)) = (caps.get(0), caps.get(1)) else {
        return vec![pattern.to_string()];
    };

    let head = &pattern[..group.start()];
    let tails = char_group_variants(&pattern[group.end()..]);
    let body = body.as_str();

    if let Some(excluded) = negated(body) {
        // A negated class has no finite enumeration
        tracing::warn!(
            pattern,
            excluded,
            "Negated character class approximated by single-character wildcard"
        );
        return tails.iter().map(|tail| format!("{head}?{tail}")).collect();
    }

    let mut variants = Vec::new();
    for c in group_chars(body) {
        for tail in &tails {
            variants.push(format!("{head}{c}{tail}"));
        }
    }
    variants
}

/// The excluded characters of a `[!..]` or `[^..]` group body.
fn negated(body: &str) -> Option<&str> {
    body.strip_prefix(['!', '^']).filter(|rest| !rest.is_empty())
}

/// One element of a group body: an inclusive character range, a single
/// character being a one-character range.
fn group_items(body: &str) -> Vec<(char, char)> {
    let chars: Vec<char> = body.chars().collect();
    let mut items = Vec::with_capacity(chars.len());

    let mut i = 0;
    while i < chars.len() {
        if i + 2 < chars.len() && chars[i + 1] == '-' {
            let (start, end) = (chars[i], chars[i + 2]);
            if start <= end {
                items.push((start, end));
            } else {
                items.extend([(start, start), ('-', '-'), (end, end)]);
            }
            i += 3;
        } else {
            items.push((chars[i], chars[i]));
            i += 1;
        }
    }
    items
}

/// Upper bound of a group's size, counting duplicates.
fn group_size_bound(body: &str) -> usize {
    group_items(body)
        .iter()
        .map(|&(start, end)| (end as usize).saturating_sub(start as usize) + 1)
        .fold(0usize, usize::saturating_add)
}

/// Characters of a group body with `x-y` ranges enumerated.
///
/// A reversed range is kept as its three literal characters. Duplicates
/// are dropped, keeping first occurrence order.
pub fn group_chars(body: &str) -> Vec<char> {
    let mut out: Vec<char> = Vec::new();
    for (start, end) in group_items(body) {
        for c in start..=end {
            if !out.contains(&c) {
                out.push(c);
            }
        }
    }
    out
}

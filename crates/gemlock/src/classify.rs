//! Type inference for the value part of a lockfile line.

use crate::tree::Leaf;
use regex::Regex;
use std::sync::OnceLock;

/// A whole-word hexadecimal token, as used for git revisions.
const REVISION_PATTERN: &str = r"\b[0-9a-f]{7,40}\b";

fn revision_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(REVISION_PATTERN).expect("revision pattern is valid"))
}

/// Infers a [`Leaf`] from a trimmed line value.
///
/// Rules are tried in order and the first match wins:
///
/// 1. contains `/`: `path`
/// 2. contains `(`: `version`, plus `outsourced` for a trailing `!`
/// 3. contains a 7 to 40 character lowercase hex word: `sha`
/// 4. anything else: an empty leaf
#[must_use]
pub fn classify_value(value: &str) -> Leaf {
    if value.contains('/') {
        return Leaf {
            path: Some(value.to_string()),
            ..Leaf::default()
        };
    }

    if value.contains('(') {
        return classify_parenthesized(value);
    }

    if revision_regex().is_match(value) {
        return Leaf {
            sha: Some(value.to_string()),
            ..Leaf::default()
        };
    }

    Leaf::default()
}

fn classify_parenthesized(value: &str) -> Leaf {
    let mut leaf = Leaf::default();

    let value = match value.strip_suffix('!') {
        Some(pinned) => {
            leaf.outsourced = true;
            pinned
        }
        None => value,
    };

    // Drop the first and last character: "(1.2.3)" -> "1.2.3".
    let mut chars = value.chars();
    chars.next();
    let closes_immediately = chars.clone().next() == Some(')');
    chars.next_back();
    let inner = chars.as_str();

    if !closes_immediately && !inner.trim().is_empty() {
        leaf.version = Some(inner.to_string());
    }

    leaf
}

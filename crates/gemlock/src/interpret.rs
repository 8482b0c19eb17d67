//! Indentation-driven tree interpreter for `Gemfile.lock` text.
//!
//! The interpreter is deliberately forgiving. It never rejects a document on
//! account of its shape: irregular indentation is flattened into whatever the
//! depth stack produces, and a missing canonical section only raises a
//! [`StructuralWarning`].

use crate::classify::classify_value;
use crate::error::LockfileError;
use crate::tree::{Entry, Leaf, Node};
use std::fmt;
use tracing::warn;

/// Sections every Bundler lockfile is expected to contain.
pub const CANONICAL_SECTIONS: [&str; 3] = ["GEM", "DEPENDENCIES", "PLATFORMS"];

/// Top-level key whose single child is collapsed into a scalar.
pub const BUNDLED_WITH: &str = "BUNDLED WITH";

/// Raised when a parsed tree lacks one or more [`CANONICAL_SECTIONS`].
///
/// This is a diagnostic, not an error: the tree is still returned in full.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuralWarning {
    /// The canonical sections that were not found at the top level.
    pub missing: Vec<&'static str>,
}

impl fmt::Display for StructuralWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "input does not look like a Gemfile.lock (missing {}); parsed it anyway",
            self.missing.join(", ")
        )
    }
}

/// Byte-order mark some editors write at the start of a file.
const BYTE_ORDER_MARK: char = '\u{feff}';

/// Ancestor record for the line currently being placed.
struct DepthFrame<'a> {
    key: &'a str,
    depth: usize,
}

/// Interprets lockfile text into a tree of nested [`Node`]s.
///
/// Logs a [`StructuralWarning`] through `tracing` when any of the
/// [`CANONICAL_SECTIONS`] is absent. A leading byte-order mark is ignored.
#[must_use]
pub fn interpret(text: &str) -> Node {
    let text = text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(text);
    let mut root = Node::new();
    let mut stack: Vec<DepthFrame<'_>> = Vec::new();
    let mut previous_indent: Option<usize> = None;

    for line in text.split('\n') {
        let indent = indent_width(line);

        if previous_indent.is_some_and(|previous| indent <= previous) {
            while stack.last().is_some_and(|frame| indent <= frame.depth) {
                stack.pop();
            }
        }
        previous_indent = Some(indent);

        let (key, value) = split_line(line);
        if key.is_empty() {
            continue;
        }

        place(&mut root, &stack, key, classify_value(value));

        stack.push(DepthFrame { key, depth: indent });
    }

    if let Some(warning) = missing_sections(&root) {
        warn!(missing = ?warning.missing, "{warning}");
    }

    collapse_bundled_with(&mut root);
    root
}

/// Interprets raw bytes, which must be UTF-8 encoded.
///
/// # Errors
///
/// Returns [`LockfileError::InvalidInput`] if `bytes` is not valid UTF-8.
pub fn interpret_bytes(bytes: &[u8]) -> Result<Node, LockfileError> {
    let text = std::str::from_utf8(bytes)?;
    Ok(interpret(text))
}

/// Checks the top level of `tree` for the [`CANONICAL_SECTIONS`].
#[must_use]
pub fn missing_sections(tree: &Node) -> Option<StructuralWarning> {
    let missing: Vec<&'static str> = CANONICAL_SECTIONS
        .into_iter()
        .filter(|section| !tree.contains_key(section))
        .collect();

    if missing.is_empty() {
        None
    } else {
        Some(StructuralWarning { missing })
    }
}

/// Number of leading whitespace characters.
fn indent_width(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

/// Splits a line into its key (up to the first `:` or `(`) and its value.
///
/// Colons directly after the key are consumed, so `remote: x` yields `x` while
/// `rake (13.0.6)` keeps the parenthesis in the value.
fn split_line(line: &str) -> (&str, &str) {
    let content = line.trim_start();
    let split = content.find([':', '(']).unwrap_or(content.len());
    let (key, rest) = content.split_at(split);

    let value = rest.trim_start().trim_start_matches(':').trim();
    (key.trim(), value)
}

/// Inserts `leaf` under `key`, walking from `level` along the frames whose
/// keys exist at each level.
///
/// A frame whose key is missing is skipped rather than created, so lines under
/// an ancestor that was never placed land at the nearest existing level.
fn place(level: &mut Node, stack: &[DepthFrame<'_>], key: &str, leaf: Leaf) {
    let Some((frame, rest)) = stack.split_first() else {
        level.insert(key, leaf);
        return;
    };

    match level.get_mut(frame.key) {
        Some(entry) => place(entry.make_node(), rest, key, leaf),
        None => place(level, rest, key, leaf),
    }
}

/// Replaces a `BUNDLED WITH` node by the name of its first child.
///
/// A `BUNDLED WITH` key without children is left untouched.
fn collapse_bundled_with(root: &mut Node) {
    let version = root
        .get(BUNDLED_WITH)
        .and_then(Entry::as_node)
        .and_then(|node| node.keys().next())
        .map(str::to_string);

    if let Some(version) = version {
        root.insert(BUNDLED_WITH, Entry::Scalar(version));
    }
}

//! Emoticon notation matcher.
//!
//! A notation is a short token in curly braces: `{:)}`, `{;)}`, `{(y)}`,
//! `{(*r)}`. Matches fall into two classes depending on the characters
//! immediately around the braces:
//!
//! - plain: `{:)}` with no `[` right before and no `]` right after
//! - escaped: `[{:)}]` with both brackets adjacent
//!
//! A notation with only one adjacent bracket (`[{:)}` or `{:)}]`) belongs to
//! neither class and is never rewritten.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

/// Notation body without the surrounding braces.
const NOTATION_BODY: &str = r"(?::[()DP]|;\)|\((?:[ynix!+\-?*/]|on|off|\*[rgby])\))";

/// Braced notation anywhere in a document.
static NOTATION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"(?im)\{{{NOTATION_BODY}\}}")).unwrap());

/// Bare notation body, whole string.
static NOTATION_EXACT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"(?i)\A{NOTATION_BODY}\z")).unwrap());

/// Which of the two pattern classes a match belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotationKind {
    /// `{:)}` to be replaced by an image.
    Plain,
    /// `[{:)}]` to be shown literally.
    Escaped,
}

/// A classified notation occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotationMatch<'a> {
    /// Match class.
    pub kind: NotationKind,
    /// Byte range of the whole match, brackets included for escaped matches.
    pub span: Range<usize>,
    /// The braced token, e.g. `{:)}`.
    pub token: &'a str,
}

impl<'a> NotationMatch<'a> {
    /// Notation text without braces, e.g. `:)`.
    #[must_use]
    pub fn notation(&self) -> &'a str {
        strip_braces(self.token)
    }
}

/// Find every notation in `html`, left to right, without overlaps.
///
/// Half-bracketed notations are skipped.
pub fn find_notations(html: &str) -> impl Iterator<Item = NotationMatch<'_>> {
    NOTATION_PATTERN
        .find_iter(html)
        .filter_map(move |m| classify(html, m.range()))
}

/// Find plain notations only.
pub fn plain_notations(html: &str) -> impl Iterator<Item = NotationMatch<'_>> {
    find_notations(html).filter(|m| m.kind == NotationKind::Plain)
}

/// Find escaped notations only.
pub fn escaped_notations(html: &str) -> impl Iterator<Item = NotationMatch<'_>> {
    find_notations(html).filter(|m| m.kind == NotationKind::Escaped)
}

/// Check whether `text` is a bare notation such as `:)` or `(*r)`.
#[must_use]
pub fn is_notation(text: &str) -> bool {
    NOTATION_EXACT.is_match(text)
}

/// Strip one pair of enclosing braces, if present.
#[must_use]
pub fn strip_braces(token: &str) -> &str {
    token
        .strip_prefix('{')
        .and_then(|t| t.strip_suffix('}'))
        .unwrap_or(token)
}

fn classify(html: &str, token: Range<usize>) -> Option<NotationMatch<'_>> {
    let opened = html[..token.start].ends_with('[');
    let closed = html[token.end..].starts_with(']');
    let kind = match (opened, closed) {
        (false, false) => NotationKind::Plain,
        (true, true) => NotationKind::Escaped,
        _ => {
            tracing::trace!(
                offset = token.start,
                "Skipping notation with a single adjacent bracket"
            );
            return None;
        }
    };
    let span = match kind {
        NotationKind::Plain => token.clone(),
        NotationKind::Escaped => token.start - 1..token.end + 1,
    };
    Some(NotationMatch {
        kind,
        span,
        token: &html[token],
    })
}

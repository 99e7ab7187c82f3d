//! Two-stage notation rewriting.
//!
//! Stage A ([`translate`]) turns plain notations into image tags. Stage B
//! ([`unescape`]) strips the brackets from escaped notations. Stage B must run
//! on stage A's output: the bracket exclusion in stage A is what keeps escaped
//! notations from being translated.
//!
//! Both stages copy the input once, left to right, splicing replacements in
//! between untouched spans.

use std::ops::Range;

use crate::mapping::MappingTable;
use crate::notation::{escaped_notations, plain_notations};

/// Result of stage A.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Translation {
    /// HTML with mapped notations replaced by image tags.
    pub html: String,
    /// Number of notations replaced.
    pub translated: usize,
    /// Plain notations without a mapping entry, left as written.
    pub unresolved: Vec<String>,
}

impl Translation {
    /// Stage A output that leaves `html` as is.
    #[must_use]
    pub fn untouched(html: &str) -> Self {
        Self {
            html: html.to_owned(),
            ..Self::default()
        }
    }
}

/// Result of stage B.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Unescaped {
    /// HTML with escaped notations unwrapped.
    pub html: String,
    /// Number of notations unwrapped.
    pub unescaped: usize,
}

/// Image tag emitted for a translated notation.
#[must_use]
pub fn image_tag(image: &str) -> String {
    format!("<img src='{image}'/>")
}

/// Stage A: replace each plain notation with the image mapped to it.
///
/// Notations missing from `table` are left untranslated and listed in
/// [`Translation::unresolved`].
#[must_use]
pub fn translate(html: &str, table: &MappingTable) -> Translation {
    if !html.contains('{') {
        return Translation::untouched(html);
    }

    let mut splice = Splice::new(html);
    let mut translated = 0;
    let mut unresolved = Vec::new();

    for m in plain_notations(html) {
        match table.image_for(m.notation()) {
            Ok(image) => {
                splice.replace(m.span, &image_tag(image));
                translated += 1;
            }
            Err(e) => {
                tracing::debug!(notation = m.token, error = %e, "Leaving notation untranslated");
                unresolved.push(m.token.to_owned());
            }
        }
    }

    Translation {
        html: splice.finish(),
        translated,
        unresolved,
    }
}

/// Stage B: replace each escaped notation `[{:)}]` with the bare `{:)}`.
#[must_use]
pub fn unescape(html: &str) -> Unescaped {
    if !html.contains("[{") {
        return Unescaped {
            html: html.to_owned(),
            unescaped: 0,
        };
    }

    let mut splice = Splice::new(html);
    let mut unescaped = 0;
    for m in escaped_notations(html) {
        splice.replace(m.span, m.token);
        unescaped += 1;
    }

    Unescaped {
        html: splice.finish(),
        unescaped,
    }
}

/// Builds a new string from a source and a series of ascending, disjoint
/// span replacements.
struct Splice<'a> {
    source: &'a str,
    output: String,
    cursor: usize,
}

impl<'a> Splice<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            output: String::with_capacity(source.len()),
            cursor: 0,
        }
    }

    fn replace(&mut self, span: Range<usize>, with: &str) {
        debug_assert!(span.start >= self.cursor, "spans must ascend");
        self.output.push_str(&self.source[self.cursor..span.start]);
        self.output.push_str(with);
        self.cursor = span.end;
    }

    fn finish(mut self) -> String {
        self.output.push_str(&self.source[self.cursor..]);
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn table() -> MappingTable {
        MappingTable::from_entries([(":)", "smile.png"), ("(*r)", "rose.png"), (":(", "sad.png")])
            .unwrap()
    }

    #[test]
    fn test_translate_plain() {
        let out = translate("<p>Hi {:)} and {(*r)}</p>", &table());
        assert_eq!(
            out.html,
            "<p>Hi <img src='smile.png'/> and <img src='rose.png'/></p>"
        );
        assert_eq!(out.translated, 2);
        assert!(out.unresolved.is_empty());
    }

    #[test]
    fn test_translate_skips_escaped() {
        let out = translate("[{:)}] {:)}", &table());
        assert_eq!(out.html, "[{:)}] <img src='smile.png'/>");
        assert_eq!(out.translated, 1);
    }

    #[test]
    fn test_translate_unmapped_left_as_is() {
        let out = translate("wink {;)} smile {:)}", &table());
        assert_eq!(out.html, "wink {;)} smile <img src='smile.png'/>");
        assert_eq!(out.unresolved, vec!["{;)}".to_owned()]);
    }

    #[test]
    fn test_translate_case_folded_match_needs_exact_entry() {
        let out = translate("{:d}", &table());
        assert_eq!(out.html, "{:d}");
        assert_eq!(out.unresolved, vec!["{:d}".to_owned()]);
    }

    #[test]
    fn test_translate_repeated_notation() {
        let out = translate("{:)}{:)}{:)}", &table());
        assert_eq!(out.html, "<img src='smile.png'/>".repeat(3));
        assert_eq!(out.translated, 3);
    }

    #[test]
    fn test_translate_no_braces_fast_path() {
        let out = translate("<p>nothing here</p>", &table());
        assert_eq!(out, Translation::untouched("<p>nothing here</p>"));
    }

    #[test]
    fn test_translate_preserves_multibyte_text() {
        let out = translate("日本 {:(} ✓", &table());
        assert_eq!(out.html, "日本 <img src='sad.png'/> ✓");
    }

    #[test]
    fn test_unescape() {
        let out = unescape("Type [{:)}] or [{(*r)}].");
        assert_eq!(out.html, "Type {:)} or {(*r)}.");
        assert_eq!(out.unescaped, 2);
    }

    #[test]
    fn test_unescape_leaves_plain_and_half_bracketed() {
        let out = unescape("{:)} [{:)} {:)}] [x]");
        assert_eq!(out.html, "{:)} [{:)} {:)}] [x]");
        assert_eq!(out.unescaped, 0);
    }

    #[test]
    fn test_unescape_strips_only_one_bracket_pair() {
        let out = unescape("[[{:)}]]");
        assert_eq!(out.html, "[{:)}]");
    }

    #[test]
    fn test_unescape_idempotent_on_own_output() {
        let once = unescape("[{:)}] [{;)}]");
        let twice = unescape(&once.html);
        assert_eq!(twice.html, once.html);
        assert_eq!(twice.unescaped, 0);
    }

    #[test]
    fn test_image_tag() {
        assert_eq!(image_tag("a/b.png"), "<img src='a/b.png'/>");
        assert_eq!(image_tag(""), "<img src=''/>");
    }
}

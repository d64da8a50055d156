// ── Whitespace-annotated rendering ────────────────────────────────────────────
//
// Turns document text into a sequence of visual tokens in which every ASCII
// space, every full-width space (U+3000) and every tab is its own marked unit.
// The view is a pure function of the text: `annotate(text)` is the reference,
// and `RenderedView::splice` re-annotates only the lines touched by an edit.
//
// No terminal or platform imports; hosts decide how each token is drawn.

pub(crate) mod markup;

pub(crate) use markup::{is_markup, strip_markup};

// ── Recognized whitespace ─────────────────────────────────────────────────────

pub(crate) const HALF_WIDTH_SPACE: char = ' ';
pub(crate) const FULL_WIDTH_SPACE: char = '\u{3000}';
pub(crate) const TAB: char = '\t';

// ── Token ─────────────────────────────────────────────────────────────────────

/// One visual unit of a rendered line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    /// A maximal run of characters that are shown as-is.
    Text(String),
    /// A single U+0020.
    HalfWidthSpace,
    /// A single U+3000.
    FullWidthSpace,
    /// A single horizontal tab, shown as an arrow.
    Tab,
}

impl Token {
    /// The character this token stands for, if it is a whitespace marker.
    pub(crate) fn marked_char(&self) -> Option<char> {
        match self {
            Self::Text(_) => None,
            Self::HalfWidthSpace => Some(HALF_WIDTH_SPACE),
            Self::FullWidthSpace => Some(FULL_WIDTH_SPACE),
            Self::Tab => Some(TAB),
        }
    }

    fn push_plain(&self, out: &mut String) {
        match self {
            Self::Text(s) => out.push_str(s),
            other => {
                if let Some(c) = other.marked_char() {
                    out.push(c);
                }
            }
        }
    }

    /// Length in bytes of the source text this token covers.
    pub(crate) fn source_len(&self) -> usize {
        match self {
            Self::Text(s) => s.len(),
            other => other.marked_char().map_or(0, char::len_utf8),
        }
    }
}

fn marker_for(c: char) -> Option<Token> {
    match c {
        HALF_WIDTH_SPACE => Some(Token::HalfWidthSpace),
        FULL_WIDTH_SPACE => Some(Token::FullWidthSpace),
        TAB => Some(Token::Tab),
        _ => None,
    }
}

// ── RenderedLine ──────────────────────────────────────────────────────────────

/// The tokens of one line, without its terminating line break.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct RenderedLine {
    pub(crate) tokens: Vec<Token>,
}

impl RenderedLine {
    pub(crate) fn plain_text(&self) -> String {
        let mut out = String::new();
        for token in &self.tokens {
            token.push_plain(&mut out);
        }
        out
    }
}

/// Annotate a single line.  `line` must not contain `'\n'`.
///
/// Matching runs over the source characters, never over already-emitted
/// tokens, so marker glyphs can't be re-matched.
pub(crate) fn annotate_line(line: &str) -> RenderedLine {
    debug_assert!(!line.contains('\n'));
    let mut tokens = Vec::new();
    let mut run_start = 0;
    for (i, c) in line.char_indices() {
        if let Some(marker) = marker_for(c) {
            if run_start < i {
                tokens.push(Token::Text(line[run_start..i].to_owned()));
            }
            tokens.push(marker);
            run_start = i + c.len_utf8();
        }
    }
    if run_start < line.len() {
        tokens.push(Token::Text(line[run_start..].to_owned()));
    }
    RenderedLine { tokens }
}

// ── RenderedView ──────────────────────────────────────────────────────────────

/// Whitespace-annotated projection of a whole document, one entry per line.
///
/// There is always at least one line; the empty document renders as a single
/// empty line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RenderedView {
    lines: Vec<RenderedLine>,
}

impl Default for RenderedView {
    fn default() -> Self {
        annotate("")
    }
}

/// Annotate a whole document.  Total over all input, including `""`.
pub(crate) fn annotate(text: &str) -> RenderedView {
    RenderedView {
        lines: text.split('\n').map(annotate_line).collect(),
    }
}

impl RenderedView {
    pub(crate) fn lines(&self) -> &[RenderedLine] {
        &self.lines
    }

    pub(crate) fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Replace the rendered lines `old_lines` with freshly annotated `new_lines`.
    ///
    /// `new_lines` is the text of the replacement lines joined by `'\n'`
    /// (so `n` line breaks produce `n + 1` lines).
    pub(crate) fn splice(&mut self, old_lines: std::ops::RangeInclusive<usize>, new_lines: &str) {
        let last = (*old_lines.end()).min(self.lines.len().saturating_sub(1));
        let first = (*old_lines.start()).min(last);
        self.lines
            .splice(first..=last, new_lines.split('\n').map(annotate_line));
    }

    /// The plain text this view represents: markers replaced by the characters
    /// they stand for, lines joined by `'\n'`.
    pub(crate) fn plain_text(&self) -> String {
        let mut out = String::new();
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(&line.plain_text());
        }
        out
    }

    /// Serialize the view as HTML-like markup (see `markup`).
    pub(crate) fn to_markup(&self) -> String {
        markup::to_markup(self)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_without_whitespace_is_unchanged() {
        let view = annotate("hello,world");
        assert_eq!(view.line_count(), 1);
        assert_eq!(view.lines()[0].tokens, vec![Token::Text("hello,world".into())]);
        assert_eq!(view.to_markup(), "hello,world");
    }

    #[test]
    fn each_space_is_its_own_marker() {
        let line = annotate_line("a  b");
        assert_eq!(
            line.tokens,
            vec![
                Token::Text("a".into()),
                Token::HalfWidthSpace,
                Token::HalfWidthSpace,
                Token::Text("b".into()),
            ]
        );
    }

    #[test]
    fn full_width_space_and_tab_are_marked() {
        let line = annotate_line("\u{3000}x\t");
        assert_eq!(
            line.tokens,
            vec![Token::FullWidthSpace, Token::Text("x".into()), Token::Tab]
        );
    }

    #[test]
    fn other_unicode_whitespace_passes_through() {
        let line = annotate_line("a\u{00A0}b\u{2003}c");
        assert_eq!(line.tokens, vec![Token::Text("a\u{00A0}b\u{2003}c".into())]);
    }

    #[test]
    fn empty_text_is_one_empty_line() {
        let view = annotate("");
        assert_eq!(view.line_count(), 1);
        assert!(view.lines()[0].tokens.is_empty());
        assert_eq!(view.plain_text(), "");
    }

    #[test]
    fn trailing_newline_starts_an_empty_line() {
        let view = annotate("a\nb\n");
        assert_eq!(view.line_count(), 3);
        assert!(view.lines()[2].tokens.is_empty());
    }

    #[test]
    fn plain_text_round_trips() {
        let samples = [
            "",
            "\n",
            "plain",
            " leading and trailing ",
            "\t\tindent\n  \u{3000}mixed\t \n",
            "日本語\u{3000}テキスト\r\nwith crlf",
            "<b>&amp;</b>",
        ];
        for text in samples {
            assert_eq!(annotate(text).plain_text(), text, "text {text:?}");
        }
    }

    #[test]
    fn splice_matches_full_annotation() {
        let mut view = annotate("one\ntwo three\nfour");
        // Replace line 1 with two lines.
        view.splice(1..=1, "two\tthree\nand a half");
        assert_eq!(view, annotate("one\ntwo\tthree\nand a half\nfour"));

        // Collapse lines 0..=2 into one.
        view.splice(0..=2, "joined");
        assert_eq!(view, annotate("joined\nfour"));
    }

    #[test]
    fn source_len_covers_the_line() {
        let line = annotate_line("ab\u{3000} \tc");
        let total: usize = line.tokens.iter().map(Token::source_len).sum();
        assert_eq!(total, "ab\u{3000} \tc".len());
    }
}

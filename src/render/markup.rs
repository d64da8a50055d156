// ── Markup form of the rendered view ──────────────────────────────────────────
//
// HTML-like serialization for hosts that display markup (a web view, a rich
// text control).  Line breaks are `<br>` elements; each whitespace marker is a
// `<span>` whose class names the character it stands for, so stripping the
// markup recovers the original text exactly, tabs included.

use super::{RenderedView, Token, FULL_WIDTH_SPACE, HALF_WIDTH_SPACE, TAB};

const CLASS_HALF_WIDTH: &str = "half-width-space";
const CLASS_FULL_WIDTH: &str = "full-width-space";
const CLASS_TAB: &str = "tab";

/// Glyph shown inside the tab marker.
pub(crate) const TAB_GLYPH: char = '\u{2192}'; // →

pub(crate) fn to_markup(view: &RenderedView) -> String {
    let mut out = String::new();
    for (i, line) in view.lines().iter().enumerate() {
        if i > 0 {
            out.push_str("<br>");
        }
        for token in &line.tokens {
            match token {
                Token::Text(s) => escape_into(s, &mut out),
                Token::HalfWidthSpace => {
                    out.push_str("<span class=\"half-width-space\"> </span>");
                }
                Token::FullWidthSpace => {
                    out.push_str("<span class=\"full-width-space\">\u{3000}</span>");
                }
                Token::Tab => {
                    out.push_str("<span class=\"tab\">");
                    out.push(TAB_GLYPH);
                    out.push_str("</span>");
                }
            }
        }
    }
    out
}

fn escape_into(s: &str, out: &mut String) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

// ── Stripping ─────────────────────────────────────────────────────────────────

/// Recover plain text from markup produced by `to_markup` (or by a host that
/// edited it): `<br>` becomes `'\n'`, marker spans become the character named
/// by their class, any other tag is dropped and its inner text kept.
pub(crate) fn strip_markup(markup: &str) -> String {
    let mut out = String::with_capacity(markup.len());
    let mut rest = markup;

    while let Some(c) = rest.chars().next() {
        match c {
            '<' => {
                let Some(close) = rest.find('>') else {
                    // Not a tag: keep the remainder literally.
                    out.push_str(rest);
                    break;
                };
                let tag = &rest[1..close];
                rest = &rest[close + 1..];

                let name = tag_name(tag);
                if name.eq_ignore_ascii_case("br") {
                    out.push('\n');
                } else if name.eq_ignore_ascii_case("span") && !tag.starts_with('/') {
                    if let Some(marked) = marker_class(tag) {
                        out.push(marked);
                        // The glyph inside a marker carries no information.
                        rest = skip_past_span_close(rest);
                    }
                }
            }
            '&' => {
                let (decoded, consumed) = decode_entity(rest);
                out.push_str(decoded);
                rest = &rest[consumed..];
            }
            _ => {
                out.push(c);
                rest = &rest[c.len_utf8()..];
            }
        }
    }
    out
}

/// `true` if `text` is exactly what `to_markup` produces for some text and
/// carries at least one marker span, i.e. it was copied from a rendering.
/// Hand-written HTML that merely uses the same classes is not matched.
pub(crate) fn is_markup(text: &str) -> bool {
    has_marker_span(text) && to_markup(&super::annotate(&strip_markup(text))) == text
}

fn has_marker_span(text: &str) -> bool {
    let mut rest = text;
    while let Some(at) = rest.find("<span") {
        rest = &rest[at + 1..];
        let tag = &rest[..rest.find('>').unwrap_or(rest.len())];
        if marker_class(tag).is_some() {
            return true;
        }
    }
    false
}

fn tag_name(tag: &str) -> &str {
    let tag = tag.trim_start_matches('/').trim_start();
    let end = tag
        .find(|c: char| c.is_whitespace() || c == '/')
        .unwrap_or(tag.len());
    &tag[..end]
}

fn marker_class(tag: &str) -> Option<char> {
    let at = tag.find("class=")?;
    let value = &tag[at + "class=".len()..];
    let quote = value.chars().next().filter(|q| *q == '"' || *q == '\'')?;
    let value = &value[1..];
    let value = &value[..value.find(quote)?];
    value.split_whitespace().find_map(|class| match class {
        CLASS_HALF_WIDTH => Some(HALF_WIDTH_SPACE),
        CLASS_FULL_WIDTH => Some(FULL_WIDTH_SPACE),
        CLASS_TAB => Some(TAB),
        _ => None,
    })
}

fn skip_past_span_close(rest: &str) -> &str {
    match rest.find("</span>") {
        Some(at) => &rest[at + "</span>".len()..],
        None => "",
    }
}

/// Decode the entity at the start of `rest`.  Returns the replacement and the
/// number of bytes consumed; unknown entities are kept verbatim.
fn decode_entity(rest: &str) -> (&str, usize) {
    const ENTITIES: [(&str, &str); 6] = [
        ("&amp;", "&"),
        ("&lt;", "<"),
        ("&gt;", ">"),
        ("&quot;", "\""),
        ("&#39;", "'"),
        ("&nbsp;", "\u{00A0}"),
    ];
    ENTITIES
        .iter()
        .find(|(entity, _)| rest.starts_with(entity))
        .map(|(entity, text)| (*text, entity.len()))
        .unwrap_or(("&", 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::annotate;

    #[test]
    fn markers_use_distinct_wrappers() {
        let markup = annotate(" \u{3000}\t").to_markup();
        assert_eq!(
            markup,
            "<span class=\"half-width-space\"> </span>\
             <span class=\"full-width-space\">\u{3000}</span>\
             <span class=\"tab\">\u{2192}</span>"
        );
    }

    #[test]
    fn newlines_become_line_break_elements() {
        assert_eq!(annotate("a\nb\n").to_markup(), "a<br>b<br>");
    }

    #[test]
    fn markup_characters_are_escaped() {
        assert_eq!(annotate("a<b>&c").to_markup(), "a&lt;b&gt;&amp;c");
    }

    #[test]
    fn strip_recovers_original_text() {
        let samples = [
            "",
            "no whitespace",
            "\ttab first",
            "a \u{3000} b\t\tc",
            "\n\n",
            "x<span class=\"tab\">y</span>&amp;",
            "trailing space \nnext\t",
        ];
        for text in samples {
            let markup = annotate(text).to_markup();
            assert_eq!(strip_markup(&markup), text, "markup {markup:?}");
        }
    }

    #[test]
    fn strip_accepts_host_variants() {
        assert_eq!(strip_markup("a<br/>b<BR>c"), "a\nb\nc");
        assert_eq!(strip_markup("<div>x</div><b>y</b>"), "xy");
        assert_eq!(strip_markup("<span class='tab extra'>→</span>"), "\t");
        assert_eq!(strip_markup("1 &lt 2 & 3"), "1 &lt 2 & 3");
        assert_eq!(strip_markup("a < b"), "a < b");
    }

    #[test]
    fn detects_marker_spans() {
        assert!(is_markup(&annotate("a b").to_markup()));
        assert!(is_markup(&annotate("x\ty\n\u{3000}&<").to_markup()));
        assert!(!is_markup("plain <span>text</span>"));
        assert!(!is_markup("<span class=\"tab\">x</span>"));
        assert!(!is_markup("<div><span class=\"half-width-space\"> </span></div>"));
        assert!(!is_markup("a < b"));
    }
}

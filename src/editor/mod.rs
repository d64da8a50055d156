// ── Document buffer ───────────────────────────────────────────────────────────
//
// `Document` is the single source of truth for the text being edited.  Hosts
// report mutations as `Edit`s; the document applies them, keeps its line index
// current, and maps the caret through each edit.  No host imports here.

pub(crate) mod line_index;

use std::ops::Range;

use serde::{Deserialize, Serialize};

use line_index::LineIndex;

// ── Edit ──────────────────────────────────────────────────────────────────────

/// Replace the bytes in `range` with `text`.
///
/// Insertions have an empty range; deletions have empty text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Edit {
    pub(crate) range: Range<usize>,
    pub(crate) text: String,
}

impl Edit {
    pub(crate) fn insert(at: usize, text: impl Into<String>) -> Self {
        Self {
            range: at..at,
            text: text.into(),
        }
    }

    pub(crate) fn delete(range: Range<usize>) -> Self {
        Self {
            range,
            text: String::new(),
        }
    }
}

/// The lines an applied edit touched: `old` in the pre-edit line numbering,
/// `new` in the post-edit numbering.  Both start at the same line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LineChange {
    pub(crate) old: std::ops::RangeInclusive<usize>,
    pub(crate) new: std::ops::RangeInclusive<usize>,
}

// ── Caret policy ──────────────────────────────────────────────────────────────

/// Where the caret goes after an input edit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum CaretPolicy {
    /// Map the caret through the edit so typing continues where it was.
    #[default]
    Preserve,
    /// Relocate the caret to the end of the document after every input.
    End,
}

// ── Document ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub(crate) struct Document {
    text: String,
    lines: LineIndex,
    /// Byte offset of the caret, always on a char boundary.
    caret: usize,
}

impl Document {
    /// A document holding `text`, caret at the end of content.
    pub(crate) fn from_text(text: String) -> Self {
        let lines = LineIndex::new(&text);
        let caret = text.len();
        Self { text, lines, caret }
    }

    pub(crate) fn text(&self) -> &str {
        &self.text
    }

    pub(crate) fn caret(&self) -> usize {
        self.caret
    }

    pub(crate) fn line_count(&self) -> usize {
        self.lines.line_count()
    }

    /// Text of `line` without its terminating '\n'.
    pub(crate) fn line(&self, line: usize) -> &str {
        &self.text[self.lines.line_range(line, self.text.len())]
    }

    /// Zero-based (line, byte column) of the caret.
    pub(crate) fn caret_line_col(&self) -> (usize, usize) {
        let line = self.lines.line_of(self.caret);
        (line, self.caret - self.lines.line_start(line))
    }

    /// Apply `edit` and map the caret through it.
    ///
    /// Range ends that are out of bounds or inside a character are clamped
    /// to the nearest preceding boundary.
    pub(crate) fn apply(&mut self, edit: &Edit) -> LineChange {
        let end = self.floor_boundary(edit.range.end);
        let start = self.floor_boundary(edit.range.start.min(end));
        let range = start..end;

        let first_line = self.lines.line_of(start);
        let old_last = self.lines.line_of(end);

        self.text.replace_range(range.clone(), &edit.text);
        self.lines.apply(range.clone(), &edit.text);

        let new_end = start + edit.text.len();
        let new_last = self.lines.line_of(new_end);

        self.caret = if self.caret >= range.end {
            self.caret - (range.end - range.start) + edit.text.len()
        } else if self.caret > range.start {
            new_end
        } else {
            self.caret
        };

        LineChange {
            old: first_line..=old_last,
            new: first_line..=new_last,
        }
    }

    /// Text of lines `lines`, joined by '\n'.
    pub(crate) fn lines_text(&self, lines: std::ops::RangeInclusive<usize>) -> &str {
        let len = self.text.len();
        let start = self.lines.line_range(*lines.start(), len).start;
        let end = self.lines.line_range(*lines.end(), len).end;
        &self.text[start..end]
    }

    // ── Caret motion ──────────────────────────────────────────────────────────

    #[cfg(test)]
    pub(crate) fn set_caret(&mut self, offset: usize) {
        self.caret = self.floor_boundary(offset);
    }

    pub(crate) fn caret_to_end(&mut self) {
        self.caret = self.text.len();
    }

    pub(crate) fn caret_to_start(&mut self) {
        self.caret = 0;
    }

    /// Byte offset of the character before the caret, if any.
    pub(crate) fn prev_boundary(&self) -> Option<usize> {
        self.text[..self.caret]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
    }

    /// Byte offset just past the character after the caret, if any.
    pub(crate) fn next_boundary(&self) -> Option<usize> {
        self.text[self.caret..]
            .chars()
            .next()
            .map(|c| self.caret + c.len_utf8())
    }

    pub(crate) fn caret_left(&mut self) {
        if let Some(prev) = self.prev_boundary() {
            self.caret = prev;
        }
    }

    pub(crate) fn caret_right(&mut self) {
        if let Some(next) = self.next_boundary() {
            self.caret = next;
        }
    }

    pub(crate) fn caret_line_start(&mut self) {
        let (line, _) = self.caret_line_col();
        self.caret = self.lines.line_start(line);
    }

    pub(crate) fn caret_line_end(&mut self) {
        let (line, _) = self.caret_line_col();
        self.caret = self.lines.line_range(line, self.text.len()).end;
    }

    /// Move the caret `delta` lines, keeping its character column where the
    /// target line is long enough.
    pub(crate) fn caret_vertical(&mut self, delta: isize) {
        let (line, col) = self.caret_line_col();
        let target = line.saturating_add_signed(delta).min(self.line_count() - 1);
        if target == line {
            return;
        }
        let chars = self.line(line)[..col].chars().count();
        let range = self.lines.line_range(target, self.text.len());
        let offset = self.text[range.clone()]
            .char_indices()
            .nth(chars)
            .map_or(range.end, |(i, _)| range.start + i);
        self.caret = offset;
    }

    fn floor_boundary(&self, offset: usize) -> usize {
        let mut offset = offset.min(self.text.len());
        while !self.text.is_char_boundary(offset) {
            offset -= 1;
        }
        offset
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

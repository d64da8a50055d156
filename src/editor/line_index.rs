// ── Line index ────────────────────────────────────────────────────────────────
//
// Sorted byte offsets of every '\n' in the document.  Edits patch the index in
// place instead of rescanning the whole text.

use std::ops::Range;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct LineIndex {
    breaks: Vec<usize>,
}

impl LineIndex {
    pub(crate) fn new(text: &str) -> Self {
        Self {
            breaks: newline_offsets(text, 0).collect(),
        }
    }

    /// Number of lines; a trailing '\n' starts a new, empty line.
    pub(crate) fn line_count(&self) -> usize {
        self.breaks.len() + 1
    }

    /// Zero-based line containing byte `offset`.
    ///
    /// An offset sitting on a '\n' belongs to the line that break ends.
    pub(crate) fn line_of(&self, offset: usize) -> usize {
        self.breaks.partition_point(|&b| b < offset)
    }

    /// Byte offset of the first character of `line`.
    pub(crate) fn line_start(&self, line: usize) -> usize {
        match line {
            0 => 0,
            n => self.breaks.get(n - 1).map_or(usize::MAX, |b| b + 1),
        }
    }

    /// Byte range of `line`, excluding its terminating '\n'.
    pub(crate) fn line_range(&self, line: usize, text_len: usize) -> Range<usize> {
        let start = self.line_start(line).min(text_len);
        let end = self.breaks.get(line).copied().unwrap_or(text_len);
        start..end
    }

    /// Patch the index for `range` having been replaced by `inserted`.
    pub(crate) fn apply(&mut self, range: Range<usize>, inserted: &str) {
        let first = self.breaks.partition_point(|&b| b < range.start);
        let last = self.breaks.partition_point(|&b| b < range.end);
        let removed = range.end - range.start;

        for b in &mut self.breaks[last..] {
            *b = *b - removed + inserted.len();
        }
        self.breaks
            .splice(first..last, newline_offsets(inserted, range.start));
    }
}

fn newline_offsets(text: &str, base: usize) -> impl Iterator<Item = usize> + '_ {
    text.bytes()
        .enumerate()
        .filter(|&(_, b)| b == b'\n')
        .map(move |(i, _)| base + i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_lines() {
        assert_eq!(LineIndex::new("").line_count(), 1);
        assert_eq!(LineIndex::new("a\nb").line_count(), 2);
        assert_eq!(LineIndex::new("a\nb\n").line_count(), 3);
        assert_eq!(LineIndex::new("\r\n").line_count(), 2);
    }

    #[test]
    fn line_of_and_ranges() {
        let text = "ab\ncd\n\nef";
        let idx = LineIndex::new(text);
        assert_eq!(idx.line_of(0), 0);
        assert_eq!(idx.line_of(2), 0); // the '\n' itself
        assert_eq!(idx.line_of(3), 1);
        assert_eq!(idx.line_of(6), 2);
        assert_eq!(idx.line_of(text.len()), 3);
        assert_eq!(idx.line_range(0, text.len()), 0..2);
        assert_eq!(idx.line_range(2, text.len()), 6..6);
        assert_eq!(idx.line_range(3, text.len()), 7..9);
    }

    #[test]
    fn apply_matches_rebuild() {
        let mut text = String::from("one\ntwo\nthree");
        let mut idx = LineIndex::new(&text);

        let edits: [(Range<usize>, &str); 5] = [
            (3..3, "\nnew"),
            (0..4, ""),
            (2..9, "x\ny\nz"),
            (0..0, "\n\n"),
            (5..7, ""),
        ];
        for (range, inserted) in edits {
            text.replace_range(range.clone(), inserted);
            idx.apply(range, inserted);
            assert_eq!(idx, LineIndex::new(&text), "after edit, text {text:?}");
        }
    }
}

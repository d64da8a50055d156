// ── Line-number gutter ────────────────────────────────────────────────────────
//
// Pure Rust state mirroring the line-number column beside the editor.
// No host calls here; hosts read `labels()` and draw them.

/// Number of lines in `content`: the count of '\n'-delimited segments.
///
/// A trailing '\n' starts a new, empty line, so `"a\nb\n"` has three lines
/// and `""` has one.
pub(crate) fn line_count(content: &str) -> usize {
    content.bytes().filter(|&b| b == b'\n').count() + 1
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Gutter {
    labels: Vec<String>,
}

impl Default for Gutter {
    fn default() -> Self {
        let mut gutter = Self { labels: Vec::new() };
        gutter.resize(1);
        gutter
    }
}

impl Gutter {
    /// Clear and rebuild one label per line of `content`, starting at 1.
    pub(crate) fn recompute(&mut self, content: &str) {
        self.labels.clear();
        self.resize(line_count(content));
    }

    /// Grow or shrink to `lines` labels without rebuilding the kept ones.
    pub(crate) fn resize(&mut self, lines: usize) {
        let lines = lines.max(1);
        self.labels.truncate(lines);
        let next = self.labels.len() + 1;
        self.labels.extend((next..=lines).map(|n| n.to_string()));
    }

    pub(crate) fn labels(&self) -> &[String] {
        &self.labels
    }

    pub(crate) fn len(&self) -> usize {
        self.labels.len()
    }

    /// Width in columns of the widest label.
    pub(crate) fn width(&self) -> usize {
        self.labels.last().map_or(1, String::len)
    }
}

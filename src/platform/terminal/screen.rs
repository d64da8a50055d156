// ── Screen drawing ────────────────────────────────────────────────────────────
//
// Draws the gutter, the annotated view and the status row.  Layout (cells,
// columns, scrolling) is pure and tested; only `draw` touches the terminal.

use std::io::{self, Write};

use crossterm::{
    cursor,
    style::{self, Attribute, Color},
    terminal::{self, ClearType},
    QueueableCommand,
};
use unicode_width::UnicodeWidthChar;

use crate::{
    app::App,
    render::{markup::TAB_GLYPH, RenderedLine, Token},
};

/// Visible stand-in for U+0020.
const SPACE_GLYPH: char = '\u{00B7}'; // ·

// ── Cells ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CellKind {
    Text,
    HalfWidthSpace,
    FullWidthSpace,
    Tab,
}

/// One drawn glyph and the source byte it starts at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Cell {
    pub(crate) glyph: char,
    pub(crate) width: usize,
    pub(crate) kind: CellKind,
    pub(crate) offset: usize,
}

/// Lay out a rendered line.  Control characters (a CR before the LF) take
/// no cell.
pub(crate) fn cells(line: &RenderedLine) -> Vec<Cell> {
    let mut out = Vec::new();
    let mut offset = 0;
    for token in &line.tokens {
        let (glyph, kind) = match token {
            Token::Text(text) => {
                for (i, c) in text.char_indices() {
                    if !c.is_control() {
                        out.push(Cell {
                            glyph: c,
                            width: c.width().unwrap_or(0),
                            kind: CellKind::Text,
                            offset: offset + i,
                        });
                    }
                }
                offset += text.len();
                continue;
            }
            Token::HalfWidthSpace => (SPACE_GLYPH, CellKind::HalfWidthSpace),
            Token::FullWidthSpace => ('\u{3000}', CellKind::FullWidthSpace),
            Token::Tab => (TAB_GLYPH, CellKind::Tab),
        };
        out.push(Cell {
            glyph,
            width: glyph.width().unwrap_or(1),
            kind,
            offset,
        });
        offset += token.source_len();
    }
    out
}

/// Screen column of the caret sitting at byte `byte_col` of `line`.
pub(crate) fn display_column(line: &RenderedLine, byte_col: usize) -> usize {
    cells(line)
        .iter()
        .take_while(|cell| cell.offset < byte_col)
        .map(|cell| cell.width)
        .sum()
}

// ── Viewport ──────────────────────────────────────────────────────────────────

/// Top line and left column currently scrolled into view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Viewport {
    pub(crate) top: usize,
    pub(crate) left: usize,
}

impl Viewport {
    /// Scroll the minimum needed to keep (`row`, `col`) inside a
    /// `rows` x `cols` area.
    pub(crate) fn follow(&mut self, row: usize, col: usize, rows: usize, cols: usize) {
        let rows = rows.max(1);
        let cols = cols.max(1);
        if row < self.top {
            self.top = row;
        } else if row >= self.top + rows {
            self.top = row + 1 - rows;
        }
        if col < self.left {
            self.left = col;
        } else if col >= self.left + cols {
            self.left = col + 1 - cols;
        }
    }
}

/// Truncate `text` to at most `width` columns and pad it to exactly `width`.
pub(crate) fn fit(text: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.extend(std::iter::repeat(' ').take(width - used));
    out
}

// ── Drawing ───────────────────────────────────────────────────────────────────

pub(crate) fn draw(
    out: &mut impl Write,
    app: &App,
    status: &str,
    viewport: &mut Viewport,
) -> io::Result<()> {
    let (width, height) = terminal::size()?;
    let (width, height) = (width as usize, height as usize);
    let text_rows = height.saturating_sub(1);
    let gutter = app.gutter();
    let text_x = gutter.width() + 2;
    let text_cols = width.saturating_sub(text_x);

    let lines = app.view().lines();
    let (caret_line, caret_byte) = app.document().caret_line_col();
    let caret_col = lines
        .get(caret_line)
        .map_or(0, |line| display_column(line, caret_byte));
    viewport.follow(caret_line, caret_col, text_rows, text_cols);

    out.queue(cursor::Hide)?;
    out.queue(terminal::SetTitle(app.window_title()))?;

    for row in 0..text_rows {
        let idx = viewport.top + row;
        out.queue(cursor::MoveTo(0, row as u16))?;
        out.queue(terminal::Clear(ClearType::CurrentLine))?;

        let Some(label) = gutter.labels().get(idx) else {
            out.queue(style::SetForegroundColor(Color::DarkGrey))?;
            out.queue(style::Print("~"))?;
            out.queue(style::ResetColor)?;
            continue;
        };
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(style::Print(format!("{label:>w$}\u{2502} ", w = gutter.width())))?;
        out.queue(style::ResetColor)?;

        if let Some(line) = lines.get(idx) {
            draw_line(out, line, viewport.left, text_cols)?;
        }
    }

    out.queue(cursor::MoveTo(0, text_rows as u16))?;
    out.queue(style::SetAttribute(Attribute::Reverse))?;
    out.queue(style::Print(fit(status, width)))?;
    out.queue(style::SetAttribute(Attribute::Reset))?;

    let caret_x = text_x + caret_col - viewport.left;
    let caret_y = caret_line - viewport.top;
    out.queue(cursor::MoveTo(caret_x as u16, caret_y as u16))?;
    out.queue(cursor::Show)?;
    out.flush()
}

fn draw_line(out: &mut impl Write, line: &RenderedLine, left: usize, cols: usize) -> io::Result<()> {
    let mut col = 0;
    for cell in cells(line) {
        let start = col;
        col += cell.width;
        if start < left {
            continue;
        }
        if col > left + cols {
            break;
        }
        match cell.kind {
            CellKind::Text => {
                out.queue(style::Print(cell.glyph))?;
            }
            CellKind::HalfWidthSpace | CellKind::Tab => {
                out.queue(style::SetForegroundColor(Color::DarkGrey))?;
                out.queue(style::Print(cell.glyph))?;
                out.queue(style::ResetColor)?;
            }
            CellKind::FullWidthSpace => {
                out.queue(style::SetBackgroundColor(Color::DarkGrey))?;
                out.queue(style::Print(cell.glyph))?;
                out.queue(style::ResetColor)?;
            }
        }
    }
    Ok(())
}

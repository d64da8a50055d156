// ── Editing session & top-level state ─────────────────────────────────────────
//
// A single `App` is created on startup and owned by the host for the lifetime
// of the editor.  It keeps three things consistent after every event: the
// document text, its whitespace-annotated view, and the line-number gutter.
// Every operation takes `&mut self` and file-service calls complete before it
// returns, so a load can never interleave with an edit against stale content.

use std::path::PathBuf;

use crate::{
    editor::{CaretPolicy, Document, Edit},
    error::Result,
    files::{EolMode, FileService},
    gutter::{self, Gutter},
    keymap::{self, Command, KeyChord},
    render::{self, RenderedView},
    settings::Settings,
};

const APP_NAME: &str = "Spacemark";

// ── Composition ───────────────────────────────────────────────────────────────

/// Input-method composition state.  Edits are rendered only while `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Composition {
    Idle,
    Composing,
}

// ── Font size ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FontSize {
    px: u16,
    min: u16,
    max: u16,
}

impl FontSize {
    pub(crate) fn new(px: u16, min: u16, max: u16) -> Self {
        let max = max.max(min);
        Self {
            px: px.clamp(min, max),
            min,
            max,
        }
    }

    pub(crate) fn px(self) -> u16 {
        self.px
    }

    fn increase(&mut self) {
        self.px = self.px.saturating_add(1).min(self.max);
    }

    fn decrease(&mut self) {
        self.px = self.px.saturating_sub(1).max(self.min);
    }
}

// ── Host interface ────────────────────────────────────────────────────────────

/// Everything a host can tell the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum HostEvent {
    /// A key press; only shortcuts from `keymap` are acted on.
    Key(KeyChord),
    /// The editing surface changed the content.
    Input(Edit),
    /// Text pasted at the caret.
    Paste(String),
    /// Files dropped on the window; only the first is opened.
    FileDrop(Vec<PathBuf>),
    // Input-method hosts report these; a terminal delivers committed text as
    // ordinary keys.
    #[allow(dead_code)]
    CompositionStart,
    #[allow(dead_code)]
    CompositionEnd,
}

/// What an event did, so the host knows what to redraw or report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Update {
    /// View and gutter were brought up to date with the document.
    Rendered,
    /// The document changed but rendering waits for the composition to end.
    Deferred,
    Loaded(PathBuf),
    Saved(PathBuf),
    /// A dialog was dismissed without a selection.
    Cancelled,
    FontSize(u16),
    Quit,
    /// The event is not handled here; the host applies its default.
    Ignored,
    /// Internal state changed, nothing visible did.
    Unchanged,
}

/// Caret motions for hosts without a native editing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Motion {
    Left,
    Right,
    Up,
    Down,
    LineStart,
    LineEnd,
    DocumentStart,
    DocumentEnd,
}

// ── App ───────────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub(crate) struct App {
    doc: Document,
    view: RenderedView,
    gutter: Gutter,
    /// Save target, `None` for an untitled buffer.
    path: Option<PathBuf>,
    composition: Composition,
    /// `true` when edits made during a composition have not been rendered.
    stale: bool,
    font: FontSize,
    caret_policy: CaretPolicy,
    /// `true` when the buffer contains changes not yet saved to disk.
    dirty: bool,
    eol: EolMode,
}

impl App {
    /// A fresh session with an untitled, empty document (one empty line).
    pub(crate) fn new(settings: &Settings) -> Self {
        let doc = Document::default();
        let mut app = Self {
            view: render::annotate(doc.text()),
            doc,
            gutter: Gutter::default(),
            path: None,
            composition: Composition::Idle,
            stale: false,
            font: FontSize::new(
                settings.font_size,
                settings.min_font_size,
                settings.max_font_size,
            ),
            caret_policy: settings.caret,
            dirty: false,
            eol: EolMode::Lf,
        };
        app.recompute_gutter();
        app
    }

    pub(crate) fn document(&self) -> &Document {
        &self.doc
    }

    pub(crate) fn view(&self) -> &RenderedView {
        &self.view
    }

    pub(crate) fn gutter(&self) -> &Gutter {
        &self.gutter
    }

    pub(crate) fn path(&self) -> Option<&std::path::Path> {
        self.path.as_deref()
    }

    pub(crate) fn composition(&self) -> Composition {
        self.composition
    }

    pub(crate) fn font_size(&self) -> u16 {
        self.font.px()
    }

    pub(crate) fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(crate) fn eol(&self) -> EolMode {
        self.eol
    }

    /// The text that a save writes: the plain-text projection of the view.
    pub(crate) fn plain_text(&self) -> &str {
        self.doc.text()
    }

    /// Title for the host window or status line.
    ///
    /// | State | Title |
    /// |---|---|
    /// | No path, clean | `"Spacemark"` |
    /// | Path set, clean | `"notes.txt — Spacemark"` |
    /// | Any, dirty | `"*notes.txt — Spacemark"` / `"*Untitled — Spacemark"` |
    pub(crate) fn window_title(&self) -> String {
        if self.path.is_none() && !self.dirty {
            return APP_NAME.to_owned();
        }
        let name = self
            .path
            .as_deref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Untitled".to_owned());
        let dirty = if self.dirty { "*" } else { "" };
        format!("{dirty}{name} \u{2014} {APP_NAME}")
    }

    // ── Event dispatch ────────────────────────────────────────────────────────

    pub(crate) fn handle(&mut self, event: HostEvent, files: &mut impl FileService) -> Result<Update> {
        match event {
            HostEvent::Key(chord) => match keymap::resolve(&chord) {
                Some(command) => self.execute(command, files),
                None => Ok(Update::Ignored),
            },
            HostEvent::Input(edit) => Ok(self.on_input(&edit)),
            HostEvent::Paste(text) => Ok(self.paste(text)),
            HostEvent::FileDrop(paths) => self.drop_files(paths, files),
            HostEvent::CompositionStart => Ok(self.composition_start()),
            HostEvent::CompositionEnd => Ok(self.composition_end()),
        }
    }

    pub(crate) fn execute(&mut self, command: Command, files: &mut impl FileService) -> Result<Update> {
        match command {
            Command::IncreaseFontSize => {
                self.font.increase();
                tracing::debug!(font_size = self.font.px(), "font size increased");
                Ok(Update::FontSize(self.font.px()))
            }
            Command::DecreaseFontSize => {
                self.font.decrease();
                tracing::debug!(font_size = self.font.px(), "font size decreased");
                Ok(Update::FontSize(self.font.px()))
            }
            Command::Open => self.open_dialog(files),
            Command::Save => self.save(files),
            Command::SaveAs => self.save_as(files),
            Command::InsertLineBreak => {
                let line_break = match self.eol {
                    EolMode::Crlf => "\r\n",
                    // A lone CR is not a line break for the gutter.
                    EolMode::Lf | EolMode::Cr => "\n",
                };
                Ok(self.on_input(&Edit::insert(self.doc.caret(), line_break)))
            }
            Command::Quit => Ok(Update::Quit),
        }
    }

    // ── File open ─────────────────────────────────────────────────────────────

    /// Replace the document wholesale with the contents of `path`.
    ///
    /// On a read error nothing changes and the error is returned to the host.
    pub(crate) fn load(&mut self, path: PathBuf, files: &mut impl FileService) -> Result<Update> {
        let text = files.read(&path)?;

        self.eol = EolMode::detect(&text);
        self.doc = Document::from_text(text);
        self.view = render::annotate(self.doc.text());
        self.stale = false;
        self.composition = Composition::Idle;
        self.recompute_gutter();
        self.doc.caret_to_end();
        self.dirty = false;

        tracing::info!(
            path = %path.display(),
            lines = self.gutter.len(),
            eol = self.eol.as_str(),
            "file loaded"
        );
        self.path = Some(path.clone());
        Ok(Update::Loaded(path))
    }

    pub(crate) fn open_dialog(&mut self, files: &mut impl FileService) -> Result<Update> {
        match files.open_dialog() {
            Some(path) => self.load(path, files),
            None => Ok(Update::Cancelled),
        }
    }

    /// Open the first of `paths`; an empty drop does nothing.
    pub(crate) fn drop_files(&mut self, paths: Vec<PathBuf>, files: &mut impl FileService) -> Result<Update> {
        tracing::debug!(count = paths.len(), "files dropped");
        match paths.into_iter().next() {
            Some(path) => self.load(path, files),
            None => Ok(Update::Unchanged),
        }
    }

    // ── File save ─────────────────────────────────────────────────────────────

    /// Write the document to the remembered path, asking for one first if the
    /// buffer is untitled.  Cancelling the dialog changes nothing.
    pub(crate) fn save(&mut self, files: &mut impl FileService) -> Result<Update> {
        match self.path.clone() {
            Some(path) => self.write_to(path, files),
            None => self.save_as(files),
        }
    }

    /// Always ask for a path; the chosen one becomes the save target.
    pub(crate) fn save_as(&mut self, files: &mut impl FileService) -> Result<Update> {
        let Some(path) = files.save_dialog() else {
            tracing::debug!("save dialog cancelled");
            return Ok(Update::Cancelled);
        };
        self.path = Some(path.clone());
        self.write_to(path, files)
    }

    /// A failed write keeps the remembered path so the save can be retried.
    fn write_to(&mut self, path: PathBuf, files: &mut impl FileService) -> Result<Update> {
        debug_assert!(self.stale || self.view.plain_text() == self.doc.text());
        files.write(&path, self.plain_text())?;
        self.dirty = false;
        tracing::info!(path = %path.display(), bytes = self.doc.text().len(), "file saved");
        Ok(Update::Saved(path))
    }

    // ── Editing ───────────────────────────────────────────────────────────────

    /// Apply an edit from the editing surface.
    ///
    /// While composing, the text changes but the view and gutter wait; the
    /// first input after the composition ends re-renders everything once.
    pub(crate) fn on_input(&mut self, edit: &Edit) -> Update {
        let change = self.doc.apply(edit);
        self.dirty = true;

        if self.composition == Composition::Composing {
            self.stale = true;
            return Update::Deferred;
        }

        if self.stale {
            self.view = render::annotate(self.doc.text());
            self.stale = false;
        } else {
            self.view.splice(change.old, self.doc.lines_text(change.new));
        }
        self.gutter.resize(self.doc.line_count());
        debug_assert_eq!(self.gutter.len(), gutter::line_count(self.doc.text()));
        debug_assert_eq!(self.view.line_count(), self.gutter.len());

        if self.caret_policy == CaretPolicy::End {
            self.doc.caret_to_end();
        }
        Update::Rendered
    }

    /// Insert pasted text at the caret.  Markup copied from a rendering is
    /// stripped back to the text it shows.
    pub(crate) fn paste(&mut self, text: String) -> Update {
        let text = if render::is_markup(&text) {
            tracing::info!("pasted markup stripped to plain text");
            render::strip_markup(&text)
        } else {
            text
        };
        self.on_input(&Edit::insert(self.doc.caret(), text))
    }

    /// Clear and rebuild the gutter from the current text.
    pub(crate) fn recompute_gutter(&mut self) {
        self.gutter.recompute(self.doc.text());
    }

    pub(crate) fn composition_start(&mut self) -> Update {
        if self.composition == Composition::Idle {
            tracing::trace!("composition started");
        }
        self.composition = Composition::Composing;
        Update::Unchanged
    }

    pub(crate) fn composition_end(&mut self) -> Update {
        if self.composition == Composition::Composing {
            tracing::trace!(stale = self.stale, "composition ended");
        }
        self.composition = Composition::Idle;
        Update::Unchanged
    }

    pub(crate) fn move_caret(&mut self, motion: Motion) {
        match motion {
            Motion::Left => self.doc.caret_left(),
            Motion::Right => self.doc.caret_right(),
            Motion::Up => self.doc.caret_vertical(-1),
            Motion::Down => self.doc.caret_vertical(1),
            Motion::LineStart => self.doc.caret_line_start(),
            Motion::LineEnd => self.doc.caret_line_end(),
            Motion::DocumentStart => self.doc.caret_to_start(),
            Motion::DocumentEnd => self.doc.caret_to_end(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

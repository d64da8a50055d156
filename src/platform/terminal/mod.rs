// ── Terminal host ─────────────────────────────────────────────────────────────
//
// Drives an `App` from crossterm events: raw mode on the alternate screen,
// bracketed paste for text and dropped files, a status row for messages.
// Events are handled one at a time, so every file operation finishes before
// the next keystroke is read.

mod input;
// Windows shows the native dialogs instead.
#[cfg_attr(windows, allow(dead_code))]
mod prompt;
mod screen;

use std::{
    io::{self, Write},
    path::{Path, PathBuf},
};

use crossterm::{event, execute, terminal};

use crate::{
    app::{App, Composition, Update},
    error::Result,
    files::{DiskFiles, Encoding, FileService},
};

use self::{
    input::Action,
    screen::Viewport,
};

// ── Terminal setup ────────────────────────────────────────────────────────────

/// Restores the terminal on drop, including when the loop exits with an error.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let guard = Self;
        execute!(
            io::stdout(),
            terminal::EnterAlternateScreen,
            event::EnableBracketedPaste
        )?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(
            io::stdout(),
            event::DisableBracketedPaste,
            terminal::LeaveAlternateScreen
        );
        let _ = terminal::disable_raw_mode();
    }
}

// ── File service ──────────────────────────────────────────────────────────────

/// Disk I/O plus the dialogs this host can show.
#[derive(Debug)]
struct TerminalFiles {
    disk: DiskFiles,
    /// Last path read or written, offered as the default save name.
    current: Option<PathBuf>,
}

impl TerminalFiles {
    fn new() -> Self {
        Self {
            disk: DiskFiles::new(),
            current: None,
        }
    }

    fn encoding_of(&self, path: Option<&Path>) -> Encoding {
        path.map(|p| self.disk.encoding_of(p)).unwrap_or_default()
    }
}

impl FileService for TerminalFiles {
    fn read(&mut self, path: &Path) -> Result<String> {
        let text = self.disk.read(path)?;
        self.current = Some(path.to_owned());
        Ok(text)
    }

    fn write(&mut self, path: &Path, content: &str) -> Result<()> {
        self.disk.write(path, content)?;
        self.current = Some(path.to_owned());
        Ok(())
    }

    #[cfg(windows)]
    fn open_dialog(&mut self) -> Option<PathBuf> {
        crate::platform::win32::dialogs::show_open_dialog()
    }

    #[cfg(not(windows))]
    fn open_dialog(&mut self) -> Option<PathBuf> {
        prompt::ask("Open file: ", None)
    }

    #[cfg(windows)]
    fn save_dialog(&mut self) -> Option<PathBuf> {
        crate::platform::win32::dialogs::show_save_dialog(self.current.as_deref())
    }

    #[cfg(not(windows))]
    fn save_dialog(&mut self) -> Option<PathBuf> {
        prompt::ask("Save as: ", self.current.as_deref())
    }
}

// ── Status line ───────────────────────────────────────────────────────────────

fn status_line(app: &App, encoding: Encoding, message: Option<&str>) -> String {
    let doc = app.document();
    let (line, byte_col) = doc.caret_line_col();
    let col = doc.line(line)[..byte_col].chars().count();
    let mut status = format!(
        " {}  Ln {}, Col {}  {}px  {}  {}",
        app.window_title(),
        line + 1,
        col + 1,
        app.font_size(),
        app.eol().as_str(),
        encoding.as_str(),
    );
    if app.composition() == Composition::Composing {
        status.push_str("  [composing]");
    }
    if let Some(message) = message {
        status.push_str("  | ");
        status.push_str(message);
    }
    status
}

/// What to tell the user about a finished operation.
fn describe(update: &Update) -> Option<String> {
    match update {
        Update::Loaded(path) => Some(format!("opened {}", path.display())),
        Update::Saved(path) => Some(format!("saved {}", path.display())),
        Update::Cancelled => Some("cancelled".to_owned()),
        Update::FontSize(px) => Some(format!("font size {px}px")),
        Update::Deferred => Some("composing".to_owned()),
        Update::Rendered | Update::Quit | Update::Ignored | Update::Unchanged => None,
    }
}

const QUIT_WARNING: &str = "unsaved changes; press Ctrl+Q again to quit";

// ── Event loop ────────────────────────────────────────────────────────────────

/// Run the editor until the user quits.  `initial` is opened first as if it
/// had been dropped on the window.
pub(crate) fn run(app: &mut App, initial: Option<PathBuf>) -> Result<()> {
    let _guard = TerminalGuard::enter()?;
    let mut out = io::stdout();
    let mut files = TerminalFiles::new();
    let mut viewport = Viewport::default();
    let mut message: Option<String> = None;
    let mut quit_armed = false;

    if let Some(path) = initial {
        message = report(app.drop_files(vec![path], &mut files));
    }

    loop {
        let status = status_line(app, files.encoding_of(app.path()), message.as_deref());
        screen::draw(&mut out, app, &status, &mut viewport)?;

        let action = input::translate(event::read()?, app.document());
        let was_armed = std::mem::take(&mut quit_armed);
        match action {
            Action::Host(host_event) => match app.handle(host_event, &mut files) {
                Ok(Update::Quit) if app.is_dirty() && !was_armed => {
                    quit_armed = true;
                    message = Some(QUIT_WARNING.to_owned());
                }
                Ok(Update::Quit) => break,
                result => message = report(result),
            },
            Action::Move(motion) => app.move_caret(motion),
            Action::Redraw => execute!(out, terminal::Clear(terminal::ClearType::All))?,
            Action::Nothing => quit_armed = was_armed,
        }
    }

    tracing::info!(dirty = app.is_dirty(), "editor closed");
    out.flush()?;
    Ok(())
}

/// Turn an operation result into a status message; errors are logged too.
fn report(result: Result<Update>) -> Option<String> {
    match result {
        Ok(update) => describe(&update),
        Err(e) => {
            tracing::warn!(error = %e, "operation failed");
            Some(e.to_string())
        }
    }
}

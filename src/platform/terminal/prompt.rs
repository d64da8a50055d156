// ── Modal path prompt ─────────────────────────────────────────────────────────
//
// The terminal stand-in for the open/save common dialogs: a one-line input on
// the status row with its own nested event loop.  Returns `None` when the
// user cancels (Esc, Ctrl+C, or an empty answer).

use std::{
    io::{self, Write},
    path::{Path, PathBuf},
};

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    style::{self, Attribute},
    terminal::{self, ClearType},
    QueueableCommand,
};

/// Outcome of feeding one event to a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Step {
    Continue,
    Accept(PathBuf),
    Cancel,
}

/// Line-editing state of the prompt, independent of the terminal.
#[derive(Debug, Default)]
pub(crate) struct PathPrompt {
    input: String,
}

impl PathPrompt {
    /// A prompt pre-filled with `initial`.
    pub(crate) fn new(initial: Option<&Path>) -> Self {
        Self {
            input: initial.map(|p| p.display().to_string()).unwrap_or_default(),
        }
    }

    pub(crate) fn input(&self) -> &str {
        &self.input
    }

    pub(crate) fn step(&mut self, event: &Event) -> Step {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => {
                let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
                match key.code {
                    KeyCode::Esc => Step::Cancel,
                    KeyCode::Char('c') if ctrl => Step::Cancel,
                    KeyCode::Char('u') if ctrl => {
                        self.input.clear();
                        Step::Continue
                    }
                    KeyCode::Enter => match expand_path(self.input.trim()) {
                        Some(path) => Step::Accept(path),
                        None => Step::Cancel,
                    },
                    KeyCode::Backspace => {
                        self.input.pop();
                        Step::Continue
                    }
                    KeyCode::Char(c) if !ctrl => {
                        self.input.push(c);
                        Step::Continue
                    }
                    _ => Step::Continue,
                }
            }
            // A file dropped while the prompt is open fills it in.
            Event::Paste(text) => {
                self.input.push_str(text.trim().trim_matches('\''));
                Step::Continue
            }
            _ => Step::Continue,
        }
    }
}

/// `~/` is expanded against `$HOME`; an empty answer means cancel.
fn expand_path(input: &str) -> Option<PathBuf> {
    if input.is_empty() {
        return None;
    }
    if let Some(rest) = input.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return Some(PathBuf::from(home).join(rest));
        }
    }
    Some(PathBuf::from(input))
}

/// Ask for a path on the bottom row, starting from `initial`.  I/O errors
/// count as a cancel.
pub(crate) fn ask(label: &str, initial: Option<&Path>) -> Option<PathBuf> {
    match run(label, initial) {
        Ok(answer) => answer,
        Err(e) => {
            tracing::warn!(error = %e, "path prompt failed");
            None
        }
    }
}

fn run(label: &str, initial: Option<&Path>) -> io::Result<Option<PathBuf>> {
    let mut prompt = PathPrompt::new(initial);
    let mut out = io::stdout();
    loop {
        draw(&mut out, label, prompt.input())?;
        match prompt.step(&event::read()?) {
            Step::Continue => {}
            Step::Accept(path) => return Ok(Some(path)),
            Step::Cancel => return Ok(None),
        }
    }
}

fn draw(out: &mut impl Write, label: &str, input: &str) -> io::Result<()> {
    let (_, height) = terminal::size()?;
    let row = height.saturating_sub(1);
    out.queue(cursor::MoveTo(0, row))?;
    out.queue(terminal::Clear(ClearType::CurrentLine))?;
    out.queue(style::SetAttribute(Attribute::Bold))?;
    out.queue(style::Print(label))?;
    out.queue(style::SetAttribute(Attribute::Reset))?;
    out.queue(style::Print(input))?;
    out.queue(cursor::Show)?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyEvent;

    use super::*;

    fn press(prompt: &mut PathPrompt, code: KeyCode) -> Step {
        prompt.step(&Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    fn type_str(prompt: &mut PathPrompt, text: &str) {
        for c in text.chars() {
            assert_eq!(press(prompt, KeyCode::Char(c)), Step::Continue);
        }
    }

    #[test]
    fn enter_accepts_typed_path() {
        let mut prompt = PathPrompt::default();
        type_str(&mut prompt, "/tmp/notes.txx");
        press(&mut prompt, KeyCode::Backspace);
        type_str(&mut prompt, "t");
        assert_eq!(
            press(&mut prompt, KeyCode::Enter),
            Step::Accept(PathBuf::from("/tmp/notes.txt"))
        );
    }

    #[test]
    fn empty_answer_cancels() {
        let mut prompt = PathPrompt::default();
        type_str(&mut prompt, "   ");
        assert_eq!(press(&mut prompt, KeyCode::Enter), Step::Cancel);
    }

    #[test]
    fn escape_and_ctrl_c_cancel() {
        let mut prompt = PathPrompt::default();
        type_str(&mut prompt, "x");
        assert_eq!(press(&mut prompt, KeyCode::Esc), Step::Cancel);
        let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(prompt.step(&ctrl_c), Step::Cancel);
    }

    #[test]
    fn ctrl_u_clears_input() {
        let mut prompt = PathPrompt::default();
        type_str(&mut prompt, "abc");
        let ctrl_u = Event::Key(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
        assert_eq!(prompt.step(&ctrl_u), Step::Continue);
        assert_eq!(prompt.input(), "");
    }

    #[test]
    fn starts_from_initial_path() {
        let mut prompt = PathPrompt::new(Some(Path::new("/tmp/a.txt")));
        assert_eq!(prompt.input(), "/tmp/a.txt");
        press(&mut prompt, KeyCode::Backspace);
        assert_eq!(
            press(&mut prompt, KeyCode::Enter),
            Step::Accept(PathBuf::from("/tmp/a.tx"))
        );
    }

    #[test]
    fn paste_fills_in_dropped_path() {
        let mut prompt = PathPrompt::default();
        prompt.step(&Event::Paste("'/tmp/a b.txt' ".into()));
        assert_eq!(prompt.input(), "/tmp/a b.txt");
    }

    #[test]
    fn tilde_expands_to_home() {
        if let Some(home) = std::env::var_os("HOME") {
            assert_eq!(expand_path("~/x.txt"), Some(PathBuf::from(home).join("x.txt")));
        }
        assert_eq!(expand_path("rel/x.txt"), Some(PathBuf::from("rel/x.txt")));
    }
}

// ── Terminal input translation ────────────────────────────────────────────────
//
// Maps crossterm events onto session events.  The terminal has no native
// editing surface, so plain keys are turned into `Edit`s here, the way a
// content-editable control would report them.

use std::path::PathBuf;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::{
    app::{HostEvent, Motion},
    editor::{Document, Edit},
    keymap::{self, Key, KeyChord},
};

/// What the event loop should do with one terminal event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Action {
    Host(HostEvent),
    Move(Motion),
    Redraw,
    Nothing,
}

pub(crate) fn chord(key: &KeyEvent) -> KeyChord {
    // Windows reports AltGr as Ctrl+Alt; the character it produces is text.
    let alt_gr = matches!(key.code, KeyCode::Char(_))
        && key.modifiers.contains(KeyModifiers::CONTROL | KeyModifiers::ALT);
    let command = !alt_gr
        && key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::SUPER | KeyModifiers::META);
    let key_code = match key.code {
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Enter => Key::Enter,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::Tab => Key::Tab,
        KeyCode::Esc => Key::Esc,
        _ => Key::Other,
    };
    KeyChord {
        key: key_code,
        command,
        shift: key.modifiers.contains(KeyModifiers::SHIFT),
    }
}

pub(crate) fn translate(event: Event, doc: &Document) -> Action {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => translate_key(&key, doc),
        Event::Paste(text) => match dropped_paths(&text) {
            Some(paths) => Action::Host(HostEvent::FileDrop(paths)),
            None => Action::Host(HostEvent::Paste(normalize_newlines(&text))),
        },
        Event::Resize(..) => Action::Redraw,
        _ => Action::Nothing,
    }
}

fn translate_key(key: &KeyEvent, doc: &Document) -> Action {
    let chord = chord(key);
    if keymap::resolve(&chord).is_some() {
        return Action::Host(HostEvent::Key(chord));
    }
    if chord.command {
        return match chord.key {
            Key::Home => Action::Move(Motion::DocumentStart),
            Key::End => Action::Move(Motion::DocumentEnd),
            _ => Action::Nothing,
        };
    }
    let caret = doc.caret();
    match chord.key {
        Key::Char(c) => Action::Host(HostEvent::Input(Edit::insert(caret, c.to_string()))),
        Key::Tab => Action::Host(HostEvent::Input(Edit::insert(caret, "\t"))),
        Key::Backspace => match doc.prev_boundary() {
            Some(prev) => Action::Host(HostEvent::Input(Edit::delete(prev..caret))),
            None => Action::Nothing,
        },
        Key::Delete => match doc.next_boundary() {
            Some(next) => Action::Host(HostEvent::Input(Edit::delete(caret..next))),
            None => Action::Nothing,
        },
        Key::Left => Action::Move(Motion::Left),
        Key::Right => Action::Move(Motion::Right),
        Key::Up => Action::Move(Motion::Up),
        Key::Down => Action::Move(Motion::Down),
        Key::Home => Action::Move(Motion::LineStart),
        Key::End => Action::Move(Motion::LineEnd),
        Key::Enter | Key::Esc | Key::Other => Action::Nothing,
    }
}

/// Terminals deliver pasted line breaks as '\r'.
fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

// ── Drag and drop ─────────────────────────────────────────────────────────────

/// Dropping files on a terminal pastes their paths.  Treat a paste as a drop
/// when every token is an absolute path to an existing file.
pub(crate) fn dropped_paths(text: &str) -> Option<Vec<PathBuf>> {
    let paths: Vec<PathBuf> = split_shell_words(text.trim())?
        .into_iter()
        .map(|word| {
            let word = word.strip_prefix("file://").map(str::to_owned).unwrap_or(word);
            PathBuf::from(word)
        })
        .collect();
    let all_files = !paths.is_empty()
        && paths
            .iter()
            .all(|p| p.is_absolute() && p.is_file());
    all_files.then_some(paths)
}

/// Split on whitespace, honouring single quotes, double quotes and
/// backslash escapes.  Returns `None` for an unterminated quote.
fn split_shell_words(text: &str) -> Option<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        match c {
            '\'' | '"' => {
                in_word = true;
                loop {
                    match chars.next()? {
                        q if q == c => break,
                        '\\' if c == '"' => current.push(chars.next()?),
                        other => current.push(other),
                    }
                }
            }
            '\\' => {
                in_word = true;
                current.push(chars.next()?);
            }
            c if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            c => {
                in_word = true;
                current.push(c);
            }
        }
    }
    if in_word {
        words.push(current);
    }
    Some(words)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn typing_becomes_an_insert_at_caret() {
        let doc = Document::from_text("ab".into());
        assert_eq!(
            translate(key(KeyCode::Char('c'), KeyModifiers::NONE), &doc),
            Action::Host(HostEvent::Input(Edit::insert(2, "c")))
        );
        assert_eq!(
            translate(key(KeyCode::Tab, KeyModifiers::NONE), &doc),
            Action::Host(HostEvent::Input(Edit::insert(2, "\t")))
        );
    }

    #[test]
    fn shortcuts_go_through_the_keymap() {
        let doc = Document::default();
        assert_eq!(
            translate(key(KeyCode::Char('s'), KeyModifiers::CONTROL), &doc),
            Action::Host(HostEvent::Key(KeyChord::command(Key::Char('s'))))
        );
        assert_eq!(
            translate(key(KeyCode::Enter, KeyModifiers::NONE), &doc),
            Action::Host(HostEvent::Key(KeyChord::plain(Key::Enter)))
        );
        // Unbound Ctrl chords never type their letter.
        assert_eq!(translate(key(KeyCode::Char('x'), KeyModifiers::CONTROL), &doc), Action::Nothing);
    }

    #[test]
    fn alt_gr_characters_are_typed() {
        let doc = Document::default();
        let alt_gr = KeyModifiers::CONTROL | KeyModifiers::ALT;
        for c in ['@', '{', '\\', '\u{20AC}'] {
            assert_eq!(
                translate(key(KeyCode::Char(c), alt_gr), &doc),
                Action::Host(HostEvent::Input(Edit::insert(0, c.to_string())))
            );
        }
        // Plain Ctrl shortcuts still resolve.
        assert_eq!(
            translate(key(KeyCode::Char('o'), KeyModifiers::CONTROL), &doc),
            Action::Host(HostEvent::Key(KeyChord::command(Key::Char('o'))))
        );
    }

    #[test]
    fn backspace_and_delete_remove_one_char() {
        let mut doc = Document::from_text("aé".into());
        assert_eq!(
            translate(key(KeyCode::Backspace, KeyModifiers::NONE), &doc),
            Action::Host(HostEvent::Input(Edit::delete(1..3)))
        );
        assert_eq!(translate(key(KeyCode::Delete, KeyModifiers::NONE), &doc), Action::Nothing);
        doc.caret_to_start();
        assert_eq!(translate(key(KeyCode::Backspace, KeyModifiers::NONE), &doc), Action::Nothing);
        assert_eq!(
            translate(key(KeyCode::Delete, KeyModifiers::NONE), &doc),
            Action::Host(HostEvent::Input(Edit::delete(0..1)))
        );
    }

    #[test]
    fn arrows_move_the_caret() {
        let doc = Document::default();
        assert_eq!(translate(key(KeyCode::Up, KeyModifiers::NONE), &doc), Action::Move(Motion::Up));
        assert_eq!(translate(key(KeyCode::End, KeyModifiers::NONE), &doc), Action::Move(Motion::LineEnd));
        assert_eq!(
            translate(key(KeyCode::Home, KeyModifiers::CONTROL), &doc),
            Action::Move(Motion::DocumentStart)
        );
    }

    #[test]
    fn pasted_text_is_normalized() {
        let doc = Document::default();
        assert_eq!(
            translate(Event::Paste("a\r\nb\rc".into()), &doc),
            Action::Host(HostEvent::Paste("a\nb\nc".into()))
        );
    }

    #[test]
    fn shell_words() {
        assert_eq!(
            split_shell_words(r#"/a/b '/c d/e' "/f\"g" /h\ i"#),
            Some(vec!["/a/b".into(), "/c d/e".into(), "/f\"g".into(), "/h i".into()])
        );
        assert_eq!(split_shell_words("'open"), None);
        assert_eq!(split_shell_words("   "), Some(vec![]));
    }

    #[test]
    fn pasted_paths_of_existing_files_are_a_drop() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first file.txt");
        let second = dir.path().join("second.txt");
        std::fs::write(&first, "1").unwrap();
        std::fs::write(&second, "2").unwrap();

        let pasted = format!("'{}' {}\n", first.display(), second.display());
        assert_eq!(dropped_paths(&pasted), Some(vec![first.clone(), second]));

        let uri = format!("file://{}", dir.path().join("second.txt").display());
        assert_eq!(dropped_paths(&uri).map(|p| p.len()), Some(1));
    }

    #[test]
    fn ordinary_text_is_not_a_drop() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(dropped_paths("hello world"), None);
        assert_eq!(dropped_paths(""), None);
        // Directories and missing files don't count.
        assert_eq!(dropped_paths(&dir.path().display().to_string()), None);
        assert_eq!(dropped_paths(&dir.path().join("nope").display().to_string()), None);
    }
}

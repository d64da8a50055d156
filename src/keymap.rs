// ── Keyboard shortcuts ────────────────────────────────────────────────────────
//
// Host-neutral key chords and the fixed table of shortcuts the editor
// intercepts.  Everything not listed here keeps the host's default behavior.

/// A key, independent of any host's key-code type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Key {
    Char(char),
    Enter,
    Backspace,
    Delete,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    Tab,
    Esc,
    Other,
}

/// A key together with its modifiers.  `command` is Ctrl, or Cmd on macOS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct KeyChord {
    pub(crate) key: Key,
    pub(crate) command: bool,
    pub(crate) shift: bool,
}

#[cfg(test)]
impl KeyChord {
    pub(crate) fn plain(key: Key) -> Self {
        Self {
            key,
            command: false,
            shift: false,
        }
    }

    pub(crate) fn command(key: Key) -> Self {
        Self {
            key,
            command: true,
            shift: false,
        }
    }
}

/// What an intercepted shortcut does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Command {
    IncreaseFontSize,
    DecreaseFontSize,
    Open,
    Save,
    SaveAs,
    /// Insert exactly one line break at the caret.
    InsertLineBreak,
    Quit,
}

/// Map `chord` to the shortcut it triggers, if any.
pub(crate) fn resolve(chord: &KeyChord) -> Option<Command> {
    if chord.key == Key::Enter && !chord.command {
        return Some(Command::InsertLineBreak);
    }
    if !chord.command {
        return None;
    }
    let Key::Char(c) = chord.key else {
        return None;
    };
    // Terminals report Shift+s as 'S'; treat the case as the shift flag.
    let shift = chord.shift || c.is_ascii_uppercase();
    match c.to_ascii_lowercase() {
        '=' | '+' => Some(Command::IncreaseFontSize),
        '-' => Some(Command::DecreaseFontSize),
        'o' => Some(Command::Open),
        's' if shift => Some(Command::SaveAs),
        's' => Some(Command::Save),
        'q' => Some(Command::Quit),
        _ => None,
    }
}

// ── File service ──────────────────────────────────────────────────────────────
//
// The boundary between the editing session and the filesystem.  The session
// only ever calls the four operations of `FileService`; hosts decide how the
// dialogs are shown.  `DiskFiles` is the std::fs-backed read/write half that
// every host shares.

pub(crate) mod encoding;

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

pub(crate) use encoding::{Encoding, EolMode};

use crate::error::{Result, SpacemarkError};

/// Operations the session needs from the outside world.
///
/// `read` and `write` report failures as errors and never return partial
/// content.  The dialogs return `None` when the user cancels.
pub(crate) trait FileService {
    fn read(&mut self, path: &Path) -> Result<String>;
    fn write(&mut self, path: &Path, content: &str) -> Result<()>;
    fn open_dialog(&mut self) -> Option<PathBuf>;
    fn save_dialog(&mut self) -> Option<PathBuf>;
}

// ── DiskFiles ─────────────────────────────────────────────────────────────────

/// Reads and writes files on the local filesystem.
///
/// Remembers the encoding each file was read with so that saving writes the
/// same encoding (and BOM) back.  Paths never read are written as UTF-8.
#[derive(Debug, Default)]
pub(crate) struct DiskFiles {
    encodings: HashMap<PathBuf, Encoding>,
}

impl DiskFiles {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Encoding that a write to `path` will use.
    pub(crate) fn encoding_of(&self, path: &Path) -> Encoding {
        self.encodings.get(path).copied().unwrap_or_default()
    }

    pub(crate) fn read(&mut self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).map_err(|source| SpacemarkError::Read {
            path: path.to_owned(),
            source,
        })?;
        let (encoding, text) = Encoding::detect_and_decode(&bytes)
            .ok_or_else(|| SpacemarkError::NotText { path: path.to_owned() })?;
        tracing::debug!(
            path = %path.display(),
            bytes = bytes.len(),
            encoding = encoding.as_str(),
            "file read"
        );
        self.encodings.insert(path.to_owned(), encoding);
        Ok(text)
    }

    /// Overwrite `path` with `content`, no confirmation.
    pub(crate) fn write(&mut self, path: &Path, content: &str) -> Result<()> {
        let encoding = self.encoding_of(path);
        fs::write(path, encoding.encode(content)).map_err(|source| SpacemarkError::Write {
            path: path.to_owned(),
            source,
        })?;
        tracing::debug!(
            path = %path.display(),
            encoding = encoding.as_str(),
            "file written"
        );
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut files = DiskFiles::new();
        let err = files.read(&dir.path().join("missing.txt")).unwrap_err();
        assert!(matches!(err, SpacemarkError::Read { .. }));
    }

    #[test]
    fn read_binary_file_is_not_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blob.bin");
        fs::write(&path, [0x00, 0x9F, 0xFF, 0x80]).unwrap();
        let err = DiskFiles::new().read(&path).unwrap_err();
        assert!(matches!(err, SpacemarkError::NotText { .. }));
    }

    #[test]
    fn write_then_read_preserves_whitespace() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ws.txt");
        let text = "\tindent\n two\u{3000}spaces \n";
        let mut files = DiskFiles::new();
        files.write(&path, text).unwrap();
        assert_eq!(files.read(&path).unwrap(), text);
        assert_eq!(fs::read(&path).unwrap(), text.as_bytes());
    }

    #[test]
    fn write_keeps_encoding_seen_on_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wide.txt");
        fs::write(&path, Encoding::Utf16Le.encode("old")).unwrap();

        let mut files = DiskFiles::new();
        assert_eq!(files.read(&path).unwrap(), "old");
        files.write(&path, "new").unwrap();

        assert_eq!(files.encoding_of(&path), Encoding::Utf16Le);
        assert_eq!(fs::read(&path).unwrap(), Encoding::Utf16Le.encode("new"));
    }

    #[test]
    fn write_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no/such/dir/file.txt");
        let err = DiskFiles::new().write(&path, "x").unwrap_err();
        assert!(matches!(err, SpacemarkError::Write { .. }));
    }
}

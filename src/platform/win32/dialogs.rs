// ── Native file dialogs ───────────────────────────────────────────────────────
//
// GetOpenFileNameW / GetSaveFileNameW, shown unowned on top of the console.
// Both return `None` when the user cancels or the dialog fails.

#![allow(unsafe_code)]

use std::path::{Path, PathBuf};

use windows::{
    core::{PCWSTR, PWSTR},
    Win32::{
        Foundation::HWND,
        UI::Controls::Dialogs::{
            GetOpenFileNameW, GetSaveFileNameW, OFN_FILEMUSTEXIST, OFN_HIDEREADONLY,
            OFN_NOCHANGEDIR, OFN_OVERWRITEPROMPT, OFN_PATHMUSTEXIST, OPENFILENAMEW,
            OPEN_FILENAME_FLAGS,
        },
    },
};

/// Capacity of the file-name buffer in `WCHAR`s; long enough for `\\?\` paths.
const PATH_BUF_LEN: usize = 32_768;

/// Text files first so the dialog opens on them.
const FILTER: &str = "Text Files (*.txt)\0*.txt\0All Files (*.*)\0*.*\0\0";

#[derive(Clone, Copy)]
enum Kind {
    Open,
    Save,
}

pub(crate) fn show_open_dialog() -> Option<PathBuf> {
    run(Kind::Open, None)
}

/// `current` seeds the file-name field with the buffer's existing name.
pub(crate) fn show_save_dialog(current: Option<&Path>) -> Option<PathBuf> {
    run(Kind::Save, current)
}

fn run(kind: Kind, current: Option<&Path>) -> Option<PathBuf> {
    let mut buf = initial_buffer(current);
    let filter: Vec<u16> = FILTER.encode_utf16().collect();
    let default_ext: Vec<u16> = "txt\0".encode_utf16().collect();

    let flags: OPEN_FILENAME_FLAGS = match kind {
        Kind::Open => OFN_FILEMUSTEXIST | OFN_PATHMUSTEXIST | OFN_HIDEREADONLY,
        Kind::Save => OFN_OVERWRITEPROMPT | OFN_PATHMUSTEXIST,
    } | OFN_NOCHANGEDIR;

    let mut ofn = OPENFILENAMEW {
        lStructSize: std::mem::size_of::<OPENFILENAMEW>() as u32,
        hwndOwner: HWND::default(),
        lpstrFilter: PCWSTR(filter.as_ptr()),
        lpstrFile: PWSTR(buf.as_mut_ptr()),
        nMaxFile: PATH_BUF_LEN as u32,
        lpstrDefExt: PCWSTR(default_ext.as_ptr()),
        Flags: flags,
        ..Default::default()
    };

    // SAFETY: `buf`, `filter` and `default_ext` are NUL-terminated and live
    // until after the call returns; `nMaxFile` matches the length of `buf`.
    let chosen = unsafe {
        match kind {
            Kind::Open => GetOpenFileNameW(&mut ofn),
            Kind::Save => GetSaveFileNameW(&mut ofn),
        }
    };

    if chosen.as_bool() {
        let path = path_from_buf(&buf);
        tracing::debug!(path = %path.display(), "dialog selection");
        Some(path)
    } else {
        None
    }
}

/// A zeroed buffer holding `current`'s file name, if any.
fn initial_buffer(current: Option<&Path>) -> Vec<u16> {
    let mut buf = vec![0u16; PATH_BUF_LEN];
    if let Some(name) = current.and_then(Path::file_name) {
        for (slot, unit) in buf[..PATH_BUF_LEN - 1]
            .iter_mut()
            .zip(name.to_string_lossy().encode_utf16())
        {
            *slot = unit;
        }
    }
    buf
}

fn path_from_buf(buf: &[u16]) -> PathBuf {
    let len = buf.iter().position(|&c| c == 0).unwrap_or(buf.len());
    PathBuf::from(String::from_utf16_lossy(&buf[..len]))
}

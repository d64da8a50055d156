// ── Platform layer ────────────────────────────────────────────────────────────
//
// The host that drives `App`: a crossterm terminal UI on every OS, with native
// common dialogs on Windows.  FFI stays inside `win32` and never leaks out.

pub(crate) mod terminal;

#[cfg(windows)]
pub(crate) mod win32;

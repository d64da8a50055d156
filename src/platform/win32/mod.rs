// ── Win32 helpers ─────────────────────────────────────────────────────────────
//
// The only module where `unsafe` is permitted.  Every `unsafe` block carries a
// `// SAFETY:` comment naming the invariant that makes it sound.

#![allow(unsafe_code)]

pub(crate) mod dialogs;

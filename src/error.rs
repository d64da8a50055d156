// ── Central error type ────────────────────────────────────────────────────────
//
// All fallible operations in Spacemark return `error::Result<T>`.  No panics
// in production paths; load/save errors surface on the host's status line,
// startup errors are printed by `main()`.

use std::path::PathBuf;

/// Every error that Spacemark can produce.
#[derive(Debug, thiserror::Error)]
pub(crate) enum SpacemarkError {
    /// Reading a file through the file service failed.
    #[error("cannot open {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing a file through the file service failed.
    #[error("cannot save {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file exists but is not decodable as text.
    #[error("{} is not a text file", path.display())]
    NotText { path: PathBuf },

    /// The settings file could not be encoded.
    #[error("settings error: {0}")]
    Settings(#[from] serde_json::Error),

    /// Terminal setup, drawing or event reading failed.
    #[error("terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub(crate) type Result<T> = std::result::Result<T, SpacemarkError>;

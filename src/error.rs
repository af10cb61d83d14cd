// src/error.rs
//
// Error taxonomy for the search flow and its edges.
// Every variant is caught at the frontend boundary and turned into a
// status line (GUI) or an eyre report (CLI); none of them is fatal.

use std::{fmt, io, path::PathBuf};

use thiserror::Error;

/// Which remote endpoint a failure came from. Drives user-facing wording.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Primary,
    Fallback,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Primary => write!(f, "Search"),
            Stage::Fallback => write!(f, "Extended search"),
        }
    }
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Enter a name, location or technology, or attach a file")]
    Validation,

    #[error("Could not read spreadsheet: {0}")]
    Decode(#[from] DecodeError),

    #[error("{stage} failed: {source}")]
    Remote {
        stage: Stage,
        #[source]
        source: RemoteFailure,
    },

    #[error("Extended search is only available after a search with no results")]
    FallbackUnavailable,
}

impl SearchError {
    pub fn remote(stage: Stage, source: RemoteFailure) -> Self {
        SearchError::Remote { stage, source }
    }
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("malformed delimited text: {0}")]
    Csv(#[from] csv::Error),

    #[error("unreadable workbook: {0}")]
    Workbook(String),

    #[error("workbook has no sheets")]
    NoSheets,
}

#[derive(Debug, Error)]
pub enum RemoteFailure {
    #[error("server returned HTTP {0}")]
    Status(u16),

    #[error("network error: {0}")]
    Network(String),

    #[error("unexpected response: {0}")]
    Payload(String),
}

impl From<reqwest::Error> for RemoteFailure {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => RemoteFailure::Status(status.as_u16()),
            None if e.is_decode() => RemoteFailure::Payload(e.to_string()),
            None => RemoteFailure::Network(e.to_string()),
        }
    }
}

/// Non-fatal: the attachment could not be cached for the session.
/// Searching still works with the in-memory copy.
#[derive(Debug, Error)]
pub enum StorageWarning {
    #[error("file is too large to keep for this session ({size} bytes, limit {limit})")]
    TooLarge { size: usize, limit: usize },

    #[error("could not update session cache: {0}")]
    Io(#[from] io::Error),

    #[error("session cache is unreadable: {0}")]
    Corrupt(String),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("workbook export failed: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),

    #[error("document export failed: {0}")]
    Document(String),

    #[error("no PDF font has a glyph for {ch:?} (U+{code:04X}); set export.pdf_font to a font that does")]
    MissingGlyph { ch: char, code: u32 },

    #[error("cannot use font {path}: {reason}")]
    Font { path: PathBuf, reason: String },
}

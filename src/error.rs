//! Structured error types for sheetpress.
//!
//! Pagination itself cannot fail once its configuration has been validated;
//! everything user-facing comes from configuration checks, page-number misuse,
//! JSON input, or the export step's encoding and disk I/O.

use std::path::PathBuf;

use thiserror::Error;

/// The unified error type returned by all public sheetpress API functions.
#[derive(Debug, Error)]
pub enum Error {
    /// A layout plan or settings value that cannot be honoured, e.g. a
    /// column set naming a section kind nothing knows how to build.
    #[error("configuration error: {0}")]
    Config(String),

    /// A page number outside `1..=count` was requested.
    #[error("invalid page number {page} (document has {count} pages)")]
    InvalidPage { page: usize, count: usize },

    /// Reading input, or removing, creating or writing an output file, failed.
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A raster encoder rejected a rendered page.
    #[error("unable to encode page as {format}: {source}")]
    Encode {
        format: &'static str,
        #[source]
        source: image::ImageError,
    },

    /// JSON input failed to parse as a document or settings file.
    #[error("failed to parse input: {source}{}", hint_suffix(.hint))]
    Parse {
        #[source]
        source: serde_json::Error,
        hint: String,
    },
}

fn hint_suffix(hint: &str) -> String {
    if hint.is_empty() {
        String::new()
    } else {
        format!("\n  Hint: {}", hint)
    }
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "Check for trailing commas, missing quotes, or unescaped characters.".to_string()
            }
            serde_json::error::Category::Data => {
                "The JSON is valid but doesn't match the expected schema. Check field names and types.".to_string()
            }
            serde_json::error::Category::Eof => {
                "Unexpected end of input. Is the JSON truncated?".to_string()
            }
            serde_json::error::Category::Io => String::new(),
        };
        Error::Parse { source: e, hint }
    }
}

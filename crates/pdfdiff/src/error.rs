use std::path::PathBuf;

use thiserror::Error;

/// Exit code for mismatching documents.
pub const EXIT_DIFFERENT: u8 = 1;
/// Exit code for invalid arguments or configuration.
pub const EXIT_USAGE: u8 = 2;
/// Exit code for failures reading, rendering or writing documents.
pub const EXIT_DOCUMENT: u8 = 3;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to load the PDFium library: {0}")]
    Library(String),

    #[error("Error opening {}: {message}", path.display())]
    Open { path: PathBuf, message: String },

    #[error("failed to render page {page}: {message}")]
    Render { page: usize, message: String },

    #[error("failed to write {}: {message}", path.display())]
    Output { path: PathBuf, message: String },

    #[error("failed to write report {}", path.display())]
    Report {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Process exit code. Argument errors never reach this type, so every
    /// variant is a document failure.
    pub fn exit_code(&self) -> u8 {
        EXIT_DOCUMENT
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

use thiserror::Error;

/// Failure of one stage of the thumbnail pipeline.
///
/// Every variant is terminal for the selection that produced it: the
/// renderer logs it and leaves the canvas cleared.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ThumbnailError {
    #[error("Failed to read selected file: {0}")]
    FileRead(String),

    #[error("Selected file is not a PDF (type {0:?})")]
    NotPdf(String),

    #[error("Error loading PDF document: {0}")]
    DocumentLoad(String),

    #[error("Error getting page {page}: {reason}")]
    PageFetch { page: u32, reason: String },

    #[error("Invalid page geometry: {width}x{height}")]
    InvalidPage { width: f64, height: f64 },

    #[error("Error rendering page: {0}")]
    Render(String),
}

impl ThumbnailError {
    /// Pipeline stage the error was raised in
    pub fn stage(&self) -> Stage {
        match self {
            ThumbnailError::FileRead(_) => Stage::Read,
            ThumbnailError::NotPdf(_) => Stage::Select,
            ThumbnailError::DocumentLoad(_) => Stage::Load,
            ThumbnailError::PageFetch { .. } | ThumbnailError::InvalidPage { .. } => Stage::Page,
            ThumbnailError::Render(_) => Stage::Render,
        }
    }
}

/// Stages of the thumbnail pipeline, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Select,
    Read,
    Load,
    Page,
    Render,
}

/// Errors from row bookkeeping.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RowError {
    #[error("At least one file input must remain")]
    LastRow,

    #[error("Row {0} is not part of the form")]
    UnknownRow(u32),

    #[error("Host operation failed: {0}")]
    Host(String),
}

/// Errors that abort form setup.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SetupError {
    #[error("PDF.js library not loaded: {0}")]
    EngineMissing(String),

    #[error("Required element not found: #{0}")]
    ElementMissing(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Host operation failed: {0}")]
    Host(String),
}

impl From<RowError> for SetupError {
    fn from(err: RowError) -> Self {
        match err {
            RowError::Host(msg) => SetupError::Host(msg),
            other => SetupError::Host(other.to_string()),
        }
    }
}

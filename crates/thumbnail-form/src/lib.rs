//! Upload form helpers for the PDF merge page
//!
//! Manages the list of file-input rows and renders a first-page thumbnail
//! for every selected PDF. Platform-free: the DOM and the PDF engine are
//! reached through the traits in [`engine`] and [`rows::RowHost`], which the
//! `pdfmerge-wasm` crate implements for the browser.
//!
//! - [`FormRowManager`]: add/remove rows, always keeping at least one
//! - [`ThumbnailRenderer`]: file → document → page 1 → fit scale → canvas

pub mod config;
pub mod engine;
pub mod error;
pub mod rows;
pub mod scale;
pub mod thumbnail;

pub use config::{FormConfig, PDF_MIME_TYPE};
pub use engine::{PdfEngine, SelectedFile, ThumbnailSurface, Viewport};
pub use error::{RowError, SetupError, Stage, ThumbnailError};
pub use rows::{FormRowManager, RowDescriptor, RowHost, RowId};
pub use scale::{fit_scale, CanvasSize, PageSize};
pub use thumbnail::{ThumbnailRenderer, ThumbnailState, THUMBNAIL_PAGE};

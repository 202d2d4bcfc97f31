//! Seams to the browser and the PDF engine
//!
//! The renderer never touches PDF.js or the DOM directly. The wasm crate
//! implements these traits over `web_sys` and the injected `pdfjsLib`
//! object; tests implement them with in-memory fakes.
//!
//! Futures are not required to be `Send`: everything runs on the browser's
//! single UI thread.

#![allow(async_fn_in_trait)]

use crate::scale::{CanvasSize, PageSize};

/// A file picked in a row's file input
pub trait SelectedFile {
    /// Browser-reported MIME type (may be empty)
    fn mime_type(&self) -> String;

    fn name(&self) -> String;

    /// Read the full file contents
    async fn read_bytes(&self) -> Result<Vec<u8>, String>;
}

/// The canvas a thumbnail is drawn into
pub trait ThumbnailSurface {
    fn size(&self) -> CanvasSize;

    /// Clear the whole drawing area
    fn clear(&self);
}

/// Viewport computed by the engine for a page at a given scale
pub trait Viewport {
    fn scale(&self) -> f64;

    /// Size of the page in pixels at this viewport's scale
    fn size(&self) -> PageSize;
}

/// Promise-based PDF engine: load document, get page, viewport, render.
///
/// Errors are engine-specific and carried as strings; the renderer wraps
/// them in the stage-specific [`ThumbnailError`](crate::ThumbnailError).
pub trait PdfEngine {
    type Document;
    type Page;
    type Viewport: Viewport;
    type Canvas: ThumbnailSurface;

    async fn load_document(&self, data: Vec<u8>) -> Result<Self::Document, String>;

    /// Fetch a page (1-indexed)
    async fn get_page(&self, document: &Self::Document, page_num: u32)
        -> Result<Self::Page, String>;

    fn viewport(&self, page: &Self::Page, scale: f64) -> Result<Self::Viewport, String>;

    async fn render(
        &self,
        page: &Self::Page,
        canvas: &Self::Canvas,
        viewport: &Self::Viewport,
    ) -> Result<(), String>;
}

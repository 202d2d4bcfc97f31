//! First-page thumbnail pipeline
//!
//! read file → load document → get page 1 → fit scale → render.
//! Each stage fails into its own [`ThumbnailError`]; failures are logged and
//! end the pipeline with the canvas left cleared.

use tracing::{debug, error, warn};

use crate::config::PDF_MIME_TYPE;
use crate::engine::{PdfEngine, SelectedFile, ThumbnailSurface, Viewport};
use crate::error::{Stage, ThumbnailError};
use crate::scale::{fit_scale, PageSize};

/// Page rendered into the thumbnail (1-indexed)
pub const THUMBNAIL_PAGE: u32 = 1;

/// Visible state of a row's thumbnail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThumbnailState {
    /// Canvas cleared: nothing selected, or not a PDF
    Empty,
    Loading,
    Rendered,
    /// Canvas cleared after a failed stage
    Failed(Stage),
}

/// Renders page 1 of a selected PDF into a row's canvas
pub struct ThumbnailRenderer<E> {
    engine: E,
}

impl<E: PdfEngine> ThumbnailRenderer<E> {
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Handle a file selection for one row.
    ///
    /// Never fails: errors are logged and reported through the returned
    /// state. Concurrent calls for the same canvas are not cancelled; the
    /// last one to finish drawing wins.
    pub async fn handle_selection<F: SelectedFile>(
        &self,
        file: Option<&F>,
        canvas: &E::Canvas,
    ) -> ThumbnailState {
        self.handle_selection_observed(file, canvas, |_| {}).await
    }

    /// Like [`handle_selection`](Self::handle_selection), reporting every
    /// state transition to `observe` (including the final one).
    pub async fn handle_selection_observed<F, O>(
        &self,
        file: Option<&F>,
        canvas: &E::Canvas,
        mut observe: O,
    ) -> ThumbnailState
    where
        F: SelectedFile,
        O: FnMut(ThumbnailState),
    {
        canvas.clear();

        let Some(file) = file else {
            observe(ThumbnailState::Empty);
            return ThumbnailState::Empty;
        };

        let mime_type = file.mime_type();
        if mime_type != PDF_MIME_TYPE {
            warn!(file = %file.name(), "{}", ThumbnailError::NotPdf(mime_type));
            observe(ThumbnailState::Empty);
            return ThumbnailState::Empty;
        }

        debug!(file = %file.name(), "Loading thumbnail");
        observe(ThumbnailState::Loading);

        let state = match self.render_first_page(file, canvas).await {
            Ok(scale) => {
                debug!(file = %file.name(), scale, "Thumbnail rendered");
                ThumbnailState::Rendered
            }
            Err(err) => {
                error!(file = %file.name(), "{}", err);
                ThumbnailState::Failed(err.stage())
            }
        };
        observe(state);
        state
    }

    /// Run the pipeline, returning the scale the page was drawn at
    pub async fn render_first_page<F: SelectedFile>(
        &self,
        file: &F,
        canvas: &E::Canvas,
    ) -> Result<f64, ThumbnailError> {
        let data = file.read_bytes().await.map_err(ThumbnailError::FileRead)?;

        let document = self
            .engine
            .load_document(data)
            .await
            .map_err(ThumbnailError::DocumentLoad)?;

        let page = self
            .engine
            .get_page(&document, THUMBNAIL_PAGE)
            .await
            .map_err(|reason| ThumbnailError::PageFetch {
                page: THUMBNAIL_PAGE,
                reason,
            })?;

        let unit = self
            .engine
            .viewport(&page, 1.0)
            .map_err(|reason| ThumbnailError::PageFetch {
                page: THUMBNAIL_PAGE,
                reason,
            })?;
        let page_size: PageSize = unit.size();
        let scale = fit_scale(canvas.size(), page_size)?;

        let viewport = self
            .engine
            .viewport(&page, scale)
            .map_err(ThumbnailError::Render)?;

        self.engine
            .render(&page, canvas, &viewport)
            .await
            .map_err(ThumbnailError::Render)?;

        Ok(scale)
    }
}

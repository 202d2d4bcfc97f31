//! Thumbnail geometry
//!
//! Fits a PDF page into a fixed-size canvas with a single uniform scale.

use serde::{Deserialize, Serialize};

use crate::error::ThumbnailError;

/// Canvas size in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Page size in PDF points at scale 1 (1 point = 1/72 inch)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

impl PageSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// US Letter, 612 x 792 points
    pub fn letter() -> Self {
        Self::new(612.0, 792.0)
    }

    /// A4, 595 x 842 points
    pub fn a4() -> Self {
        Self::new(595.0, 842.0)
    }

    /// Dimensions after applying `scale`
    pub fn scaled(&self, scale: f64) -> PageSize {
        PageSize::new(self.width * scale, self.height * scale)
    }

    fn is_renderable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Largest uniform scale at which `page` fits inside `canvas`.
///
/// `min(canvas.width / page.width, canvas.height / page.height)`, so the
/// page keeps its aspect ratio and never overflows either canvas edge.
pub fn fit_scale(canvas: CanvasSize, page: PageSize) -> Result<f64, ThumbnailError> {
    if !page.is_renderable() {
        return Err(ThumbnailError::InvalidPage {
            width: page.width,
            height: page.height,
        });
    }

    let by_width = f64::from(canvas.width) / page.width;
    let by_height = f64::from(canvas.height) / page.height;
    Ok(by_width.min(by_height))
}

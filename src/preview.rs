//! Page preview seam.
//!
//! Rasterizing pages is left to an external [`PageRenderer`]; this module
//! only defines the boundary and the box-fitting arithmetic every renderer
//! needs. A renderer is a pure function of page content and target box and
//! never touches the structure.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{PageRef, PageSize};

/// Target area for a preview, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewBox {
    /// Maximum width in pixels
    pub width: u32,
    /// Maximum height in pixels
    pub height: u32,
}

impl PreviewBox {
    /// Create a preview box.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for PreviewBox {
    /// Size of a page card's image area.
    fn default() -> Self {
        Self::new(160, 200)
    }
}

/// An RGB raster produced by a renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Row-major RGB samples, `width * height * 3` bytes
    pub samples: Vec<u8>,
}

impl Raster {
    /// Create a raster filled with white.
    pub fn blank(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            samples: vec![0xFF; width as usize * height as usize * 3],
        }
    }

    /// Check that the sample buffer matches the dimensions.
    pub fn is_well_formed(&self) -> bool {
        self.samples.len() == self.width as usize * self.height as usize * 3
    }
}

/// Produces preview images for pages.
pub trait PageRenderer {
    /// Render `page` to fit inside `target`.
    fn render(&self, page: &PageRef, target: PreviewBox) -> Result<Raster>;
}

/// Scale `page` to the largest size that fits in `target`, keeping its
/// aspect ratio. Never returns a zero dimension for a non-empty box.
pub fn fit_within(page: PageSize, target: PreviewBox) -> (u32, u32) {
    if target.width == 0 || target.height == 0 {
        return (0, 0);
    }
    if page.width <= 0.0 || page.height <= 0.0 {
        return (target.width, target.height);
    }

    let scale = (target.width as f32 / page.width).min(target.height as f32 / page.height);
    let width = ((page.width * scale).round() as u32).clamp(1, target.width);
    let height = ((page.height * scale).round() as u32).clamp(1, target.height);
    (width, height)
}

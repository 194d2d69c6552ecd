//! Page-level types.

use super::{PageId, SourceId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque handle to a page's content inside its source document.
///
/// For lopdf-backed sources this is the page object id
/// `(object number, generation number)`. The content itself stays owned by
/// the source; the handle is only meaningful to the provider that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageHandle(pub u32, pub u16);

impl From<(u32, u16)> for PageHandle {
    fn from((number, generation): (u32, u16)) -> Self {
        Self(number, generation)
    }
}

impl From<PageHandle> for (u32, u16) {
    fn from(handle: PageHandle) -> Self {
        (handle.0, handle.1)
    }
}

/// Immutable reference to one page of one loaded source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageRef {
    /// Session-unique page identity
    pub id: PageId,

    /// Source document the page belongs to
    pub source: SourceId,

    /// 0-based ordinal within the source document (provenance, never renumbered)
    pub original_page_number: u32,

    /// Handle to the page content owned by the source
    pub handle: PageHandle,
}

impl PageRef {
    /// Create a new page reference.
    pub fn new(id: PageId, source: SourceId, original_page_number: u32, handle: PageHandle) -> Self {
        Self {
            id,
            source,
            original_page_number,
            handle,
        }
    }
}

impl fmt::Display for PageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:p.{}", self.source, self.original_page_number)
    }
}

/// Page dimensions in points (1 point = 1/72 inch).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    /// Width in points
    pub width: f32,

    /// Height in points
    pub height: f32,
}

impl PageSize {
    /// Create a page size.
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// US Letter (8.5 x 11 inches).
    pub fn letter() -> Self {
        Self::new(612.0, 792.0)
    }

    /// A4 (210 x 297 mm).
    pub fn a4() -> Self {
        Self::new(595.0, 842.0)
    }

    /// Check if the page is in landscape orientation.
    pub fn is_landscape(&self) -> bool {
        self.width > self.height
    }

    /// Swap width and height for pages rotated by 90 or 270 degrees.
    pub fn rotated(self, degrees: i64) -> Self {
        if degrees.rem_euclid(180) == 90 {
            Self::new(self.height, self.width)
        } else {
            self
        }
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::letter()
    }
}

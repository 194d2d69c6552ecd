//! Source provider abstraction layer.
//!
//! Isolates the concrete PDF library from the structure model: the session
//! only sees page counts, page handles and display names.

use std::path::Path;

use crate::error::Result;
use crate::model::{PageHandle, PageSize};

/// A loaded source document that can hand out page handles.
pub trait PageSource {
    /// Name shown next to the document's pages (usually the file name).
    fn display_name(&self) -> &str;

    /// Number of pages the document contributes.
    fn page_count(&self) -> u32;

    /// Content handle of the page at the 0-based `page_number`.
    fn page_handle(&self, page_number: u32) -> Option<PageHandle>;

    /// Page dimensions, if known.
    fn page_size(&self, _page_number: u32) -> Option<PageSize> {
        None
    }

    /// Format version string (e.g. "1.7"), if known.
    fn version(&self) -> Option<&str> {
        None
    }
}

/// Opens source documents from paths.
///
/// Failing to open or parse a file is an error for that load attempt
/// only; the session state is left as it was.
pub trait SourceProvider {
    /// Document type produced by this provider.
    type Source: PageSource;

    /// Open the document at `path`.
    fn open(&self, path: &Path) -> Result<Self::Source>;
}

impl<P: SourceProvider + ?Sized> SourceProvider for &P {
    type Source = P::Source;

    fn open(&self, path: &Path) -> Result<Self::Source> {
        (**self).open(path)
    }
}

/// Display name for a path: its final component, or the whole path.
pub fn display_name_for(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

//! # pdfsplice
//!
//! Assemble a single PDF from pages of several source documents.
//!
//! Pages are arranged as a sequence of *structure elements*, each a run of
//! one or more pages. Elements can be reordered, split into single pages
//! (expand), merged (collapse) and excluded from the export. Every element
//! keeps a stable id for its whole life, so a presentation layer can refer
//! to it regardless of where it currently sits.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfsplice::{LoadMode, Session};
//!
//! fn main() -> pdfsplice::Result<()> {
//!     let mut session = Session::new();
//!
//!     // One card for the whole report, one card per page of the appendix
//!     let report = session.add_source("report.pdf", LoadMode::Grouped)?;
//!     let appendix = session.add_source("appendix.pdf", LoadMode::Flat)?;
//!
//!     // Put the appendix's last page first and drop its first page
//!     session.move_element(appendix[appendix.len() - 1].id(), 0)?;
//!     session.toggle_exclude(appendix[0].id());
//!
//!     // Split the report into single pages
//!     let pages = session.expand(report[0].id());
//!     println!("{} pages now addressable", pages.len());
//!
//!     pdfsplice::export_to_file(&session, "combined.pdf")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Stable identities**: expand and collapse create new elements instead
//!   of editing existing ones
//! - **Selection-ordered merges**: collapsed pages follow the order the
//!   elements were picked in
//! - **Provider seam**: loading is behind [`SourceProvider`], with a lopdf
//!   implementation included
//! - **Export**: rebuilds a page tree from the export order and prunes
//!   everything else

pub mod detect;
pub mod error;
pub mod export;
pub mod model;
pub mod preview;
pub mod session;
pub mod source;
pub mod structure;

// Re-export commonly used types
pub use detect::{detect_format_from_bytes, detect_format_from_path, is_pdf, PdfFormat};
pub use error::{Error, Result};
pub use export::{ExportOptions, ExportSummary, PdfExporter};
pub use model::{
    ElementId, IdAllocator, PageHandle, PageId, PageRef, PageSize, SourceId, StructureElement,
};
pub use preview::{fit_within, PageRenderer, PreviewBox, Raster};
pub use session::{Operation, Outcome, Session, SourceInfo};
pub use source::{
    ErrorMode, LoadMode, LoadOptions, LopdfProvider, LopdfSource, PageSource, SourceProvider,
};
pub use structure::StructureManager;

use std::path::Path;

/// Load every file in `paths` with `mode` into a new session.
///
/// # Example
///
/// ```no_run
/// use pdfsplice::{open_session, LoadMode};
///
/// let session = open_session(&["a.pdf", "b.pdf"], LoadMode::Grouped).unwrap();
/// println!("{}", session);
/// ```
pub fn open_session<P: AsRef<Path> + Sync>(paths: &[P], mode: LoadMode) -> Result<Session> {
    let mut session = Session::new();
    session.add_sources(paths, &LoadOptions::new().with_mode(mode))?;
    Ok(session)
}

/// Export a session's included pages to `path` with default options.
pub fn export_to_file<P: AsRef<Path>>(session: &Session, path: P) -> Result<ExportSummary> {
    PdfExporter::new(session, ExportOptions::default()).save(path)
}

/// Concatenate whole files into `output`, one after another.
///
/// # Example
///
/// ```no_run
/// let summary = pdfsplice::merge_files(&["a.pdf", "b.pdf"], "merged.pdf").unwrap();
/// assert!(summary.pages > 0);
/// ```
pub fn merge_files<P: AsRef<Path> + Sync, Q: AsRef<Path>>(
    inputs: &[P],
    output: Q,
) -> Result<ExportSummary> {
    let session = open_session(inputs, LoadMode::Grouped)?;
    export_to_file(&session, output)
}

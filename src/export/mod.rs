//! PDF export.
//!
//! Writes the pages of a session's export order, in order, into a fresh
//! PDF document. Each contributing source is copied once with its objects
//! renumbered; the page tree and catalog are rebuilt around the exported
//! pages and everything unreachable is dropped.
//!
//! # Example
//!
//! ```no_run
//! use pdfsplice::export::{ExportOptions, PdfExporter};
//! use pdfsplice::{LoadMode, Session};
//!
//! fn main() -> pdfsplice::Result<()> {
//!     let mut session = Session::new();
//!     session.add_source("a.pdf", LoadMode::Flat)?;
//!     session.add_source("b.pdf", LoadMode::Grouped)?;
//!
//!     let summary = PdfExporter::new(&session, ExportOptions::default()).save("out.pdf")?;
//!     println!("{} pages written", summary.pages);
//!     Ok(())
//! }
//! ```

mod options;
mod writer;

pub use options::ExportOptions;
pub use writer::{ExportSummary, PdfExporter};

//! Source document loading.
//!
//! A [`SourceProvider`] turns a path into a [`PageSource`]; the session
//! registers the source and wraps its pages into structure elements
//! according to [`LoadOptions`].

mod lopdf_source;
mod options;
mod provider;

pub use lopdf_source::{LopdfProvider, LopdfSource};
pub use options::{ErrorMode, LoadMode, LoadOptions};
pub use provider::{display_name_for, PageSource, SourceProvider};

pub(crate) use lopdf_source::{inherited_attribute, INHERITABLE_KEYS};

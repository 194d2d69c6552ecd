//! Loading options and configuration.

use serde::{Deserialize, Serialize};

/// How a newly loaded document is split into structure elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadMode {
    /// One single-page element per page
    Flat,
    /// One element wrapping every page of the document
    #[default]
    Grouped,
}

/// Error handling mode during loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail on any unresolvable page
    #[default]
    Strict,
    /// Skip unresolvable pages and continue
    Lenient,
}

/// Options for adding a source document to a session.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Element layout for the new pages
    pub mode: LoadMode,

    /// Insertion slot (end of the structure if `None`)
    pub position: Option<usize>,

    /// Error handling mode
    pub error_mode: ErrorMode,
}

impl LoadOptions {
    /// Create new load options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the load mode.
    pub fn with_mode(mut self, mode: LoadMode) -> Self {
        self.mode = mode;
        self
    }

    /// One element per page.
    pub fn flat(mut self) -> Self {
        self.mode = LoadMode::Flat;
        self
    }

    /// One element for the whole document.
    pub fn grouped(mut self) -> Self {
        self.mode = LoadMode::Grouped;
        self
    }

    /// Insert the new elements at `position`.
    pub fn at(mut self, position: usize) -> Self {
        self.position = Some(position);
        self
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (skip unresolvable pages).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }
}

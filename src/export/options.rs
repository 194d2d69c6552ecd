//! Export options and configuration.

/// Options for writing the assembled document.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Compress content streams of the output
    pub compress: bool,

    /// Drop objects no exported page refers to
    pub prune: bool,

    /// Title written to the document info dictionary
    pub title: Option<String>,

    /// Producer written to the document info dictionary
    pub producer: String,
}

impl ExportOptions {
    /// Create new export options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable stream compression.
    pub fn with_compression(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Enable or disable pruning of unreachable objects.
    pub fn with_prune(mut self, prune: bool) -> Self {
        self.prune = prune;
        self
    }

    /// Set the document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the producer string.
    pub fn with_producer(mut self, producer: impl Into<String>) -> Self {
        self.producer = producer.into();
        self
    }
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            compress: true,
            prune: true,
            title: None,
            producer: concat!("pdfsplice ", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

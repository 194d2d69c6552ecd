//! Editing session: loaded sources plus the structure built from them.
//!
//! [`Session`] is the surface a presentation layer talks to. It opens
//! source documents through a [`SourceProvider`], turns their pages into
//! structure elements and forwards every structure edit to the
//! [`StructureManager`]. Operations return the affected elements so the
//! caller can refresh its previews.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{ElementId, IdAllocator, PageHandle, PageId, PageRef, SourceId, StructureElement};
use crate::source::{ErrorMode, LoadMode, LoadOptions, LopdfProvider, PageSource, SourceProvider};
use crate::structure::StructureManager;

/// Registry entry for a loaded source document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceInfo {
    /// Session-scoped id
    pub id: SourceId,

    /// Display name (file name)
    pub name: String,

    /// File the source was opened from
    pub path: Option<PathBuf>,

    /// Number of pages contributed to the structure
    pub page_count: u32,

    /// PDF version, if the provider reports one
    pub version: Option<String>,
}

struct LoadedSource<S> {
    info: SourceInfo,
    document: S,
}

/// One editing session ending in an export.
pub struct Session<P: SourceProvider = LopdfProvider> {
    provider: P,
    sources: BTreeMap<SourceId, LoadedSource<P::Source>>,
    structure: StructureManager,
    source_ids: IdAllocator<SourceId>,
    page_ids: IdAllocator<PageId>,
}

impl Session<LopdfProvider> {
    /// Create a session that opens PDF files with lopdf.
    pub fn new() -> Self {
        Self::with_provider(LopdfProvider::new())
    }
}

impl Default for Session<LopdfProvider> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: SourceProvider> Session<P> {
    /// Create a session around a custom source provider.
    pub fn with_provider(provider: P) -> Self {
        Self {
            provider,
            sources: BTreeMap::new(),
            structure: StructureManager::new(),
            source_ids: IdAllocator::new(),
            page_ids: IdAllocator::new(),
        }
    }

    /// Open `path` and append its pages to the structure.
    pub fn add_source<Q: AsRef<Path>>(
        &mut self,
        path: Q,
        mode: LoadMode,
    ) -> Result<Vec<StructureElement>> {
        self.add_source_with_options(path, &LoadOptions::new().with_mode(mode))
    }

    /// Open `path` and insert its pages at `position`.
    pub fn add_source_at<Q: AsRef<Path>>(
        &mut self,
        path: Q,
        mode: LoadMode,
        position: usize,
    ) -> Result<Vec<StructureElement>> {
        self.add_source_with_options(path, &LoadOptions::new().with_mode(mode).at(position))
    }

    /// Open `path` and add its pages according to `options`.
    ///
    /// On any failure the session is left exactly as it was.
    pub fn add_source_with_options<Q: AsRef<Path>>(
        &mut self,
        path: Q,
        options: &LoadOptions,
    ) -> Result<Vec<StructureElement>> {
        let path = path.as_ref();
        self.check_position(options.position)?;
        let document = self.provider.open(path)?;
        self.add_document(document, Some(path.to_path_buf()), options)
    }

    /// Register an already opened document and add its pages.
    pub fn add_document(
        &mut self,
        document: P::Source,
        path: Option<PathBuf>,
        options: &LoadOptions,
    ) -> Result<Vec<StructureElement>> {
        self.check_position(options.position)?;
        let handles = collect_handles(&document, options.error_mode)?;
        self.register(document, path, handles, options.mode, options.position)
    }

    /// Open several files and add them in argument order.
    ///
    /// Files are parsed concurrently when the `parallel` feature is on.
    /// If any file fails to load nothing is added.
    pub fn add_sources<Q>(&mut self, paths: &[Q], options: &LoadOptions) -> Result<Vec<StructureElement>>
    where
        Q: AsRef<Path> + Sync,
        P: Sync,
        P::Source: Send,
    {
        self.check_position(options.position)?;

        #[cfg(feature = "parallel")]
        let opened: Vec<Result<P::Source>> = {
            use rayon::prelude::*;
            paths
                .par_iter()
                .map(|path| self.provider.open(path.as_ref()))
                .collect()
        };
        #[cfg(not(feature = "parallel"))]
        let opened: Vec<Result<P::Source>> = paths
            .iter()
            .map(|path| self.provider.open(path.as_ref()))
            .collect();

        let mut prepared = Vec::with_capacity(opened.len());
        for (path, document) in paths.iter().zip(opened) {
            let document = document?;
            let handles = collect_handles(&document, options.error_mode)?;
            prepared.push((document, path.as_ref().to_path_buf(), handles));
        }

        let mut added = Vec::new();
        let mut position = options.position;
        for (document, path, handles) in prepared {
            let elements = self.register(document, Some(path), handles, options.mode, position)?;
            position = position.map(|p| p + elements.len());
            added.extend(elements);
        }
        Ok(added)
    }

    fn check_position(&self, position: Option<usize>) -> Result<()> {
        match position {
            Some(position) if position > self.structure.len() => Err(Error::PositionOutOfRange {
                position,
                len: self.structure.len(),
            }),
            _ => Ok(()),
        }
    }

    fn register(
        &mut self,
        document: P::Source,
        path: Option<PathBuf>,
        handles: Vec<(u32, PageHandle)>,
        mode: LoadMode,
        position: Option<usize>,
    ) -> Result<Vec<StructureElement>> {
        let source = self.source_ids.allocate();
        let pages: Vec<PageRef> = handles
            .into_iter()
            .map(|(number, handle)| PageRef::new(self.page_ids.allocate(), source, number, handle))
            .collect();
        let page_count = pages.len() as u32;

        let elements: Vec<StructureElement> = match mode {
            LoadMode::Flat => pages
                .into_iter()
                .filter_map(|page| self.structure.create_element(vec![page]))
                .collect(),
            LoadMode::Grouped => self.structure.create_element(pages).into_iter().collect(),
        };
        self.structure.insert(elements.clone(), position)?;

        let info = SourceInfo {
            id: source,
            name: document.display_name().to_string(),
            path,
            page_count,
            version: document.version().map(str::to_string),
        };
        log::info!(
            "loaded '{}' as {} ({} page(s), {} element(s))",
            info.name,
            source,
            page_count,
            elements.len()
        );
        self.sources.insert(source, LoadedSource { info, document });
        Ok(elements)
    }

    /// Move an element to its final slot `position`. See
    /// [`StructureManager::move_element`].
    pub fn move_element(&mut self, id: ElementId, position: usize) -> Result<bool> {
        self.structure.move_element(id, position)
    }

    /// Split a grouped element into single pages.
    pub fn expand(&mut self, id: ElementId) -> Vec<StructureElement> {
        self.structure.expand(id)
    }

    /// Merge elements, pages ordered as the ids are given.
    pub fn collapse(&mut self, ids: &[ElementId]) -> Option<StructureElement> {
        self.structure.collapse(ids)
    }

    /// Flip an element's exclusion flag.
    pub fn toggle_exclude(&mut self, id: ElementId) -> Option<bool> {
        self.structure.toggle_exclude(id)
    }

    /// Look up an element.
    pub fn get(&self, id: ElementId) -> Option<&StructureElement> {
        self.structure.get(id)
    }

    /// Current position of an element.
    pub fn index_of(&self, id: ElementId) -> Option<usize> {
        self.structure.index_of(id)
    }

    /// Ordered elements, for layout.
    pub fn snapshot(&self) -> &[StructureElement] {
        self.structure.snapshot()
    }

    /// Pages that an export would write, in order.
    pub fn export_order(&self) -> Vec<PageRef> {
        self.structure.export_order()
    }

    /// The underlying structure.
    pub fn structure(&self) -> &StructureManager {
        &self.structure
    }

    /// Registry entry for a source.
    pub fn source(&self, id: SourceId) -> Option<&SourceInfo> {
        self.sources.get(&id).map(|loaded| &loaded.info)
    }

    /// All loaded sources in load order.
    pub fn sources(&self) -> impl Iterator<Item = &SourceInfo> {
        self.sources.values().map(|loaded| &loaded.info)
    }

    /// The provider document behind a source.
    pub fn source_document(&self, id: SourceId) -> Option<&P::Source> {
        self.sources.get(&id).map(|loaded| &loaded.document)
    }

    /// Label shown on a page card, e.g. `"table.pdf p.2"`.
    pub fn page_label(&self, page: &PageRef) -> String {
        match self.source(page.source) {
            Some(info) => format!("{} p.{}", info.name, page.original_page_number),
            None => format!("{} p.{}", page.source, page.original_page_number),
        }
    }

    /// Execute a single [`Operation`].
    pub fn apply(&mut self, operation: Operation) -> Result<Outcome> {
        log::debug!("applying {:?}", operation);
        Ok(match operation {
            Operation::AddSource {
                path,
                mode,
                position,
            } => {
                let options = LoadOptions {
                    mode,
                    position,
                    ..LoadOptions::default()
                };
                Outcome::Added(self.add_source_with_options(path, &options)?)
            }
            Operation::Move { element, position } => {
                Outcome::Moved(self.move_element(element, position)?)
            }
            Operation::Expand { element } => Outcome::Expanded(self.expand(element)),
            Operation::Collapse { elements } => Outcome::Collapsed(self.collapse(&elements)),
            Operation::ToggleExclude { element } => {
                Outcome::Toggled(self.toggle_exclude(element))
            }
        })
    }

    /// Execute operations in order, stopping at the first error.
    pub fn apply_all<I>(&mut self, operations: I) -> Result<Vec<Outcome>>
    where
        I: IntoIterator<Item = Operation>,
    {
        operations.into_iter().map(|op| self.apply(op)).collect()
    }
}

impl<P: SourceProvider> fmt::Display for Session<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.structure, f)
    }
}

fn collect_handles<S: PageSource>(document: &S, error_mode: ErrorMode) -> Result<Vec<(u32, PageHandle)>> {
    let mut handles = Vec::with_capacity(document.page_count() as usize);
    for number in 0..document.page_count() {
        match document.page_handle(number) {
            Some(handle) => handles.push((number, handle)),
            None if error_mode == ErrorMode::Lenient => {
                log::warn!(
                    "skipping unresolvable page {} of '{}'",
                    number,
                    document.display_name()
                );
            }
            None => {
                return Err(Error::PageNotFound(
                    number,
                    document.display_name().to_string(),
                ))
            }
        }
    }
    if handles.is_empty() {
        return Err(Error::EmptyDocument(document.display_name().to_string()));
    }
    Ok(handles)
}

/// A structure edit, as issued by a presentation layer or a script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    /// Load a source document
    AddSource {
        /// File to open
        path: PathBuf,
        /// Element layout for its pages
        #[serde(default)]
        mode: LoadMode,
        /// Insertion slot (end if absent)
        #[serde(default)]
        position: Option<usize>,
    },
    /// Move an element to a final slot
    Move {
        /// Element to move
        element: ElementId,
        /// Final slot after removal
        position: usize,
    },
    /// Split a grouped element
    Expand {
        /// Element to split
        element: ElementId,
    },
    /// Merge elements
    Collapse {
        /// Elements in the page order wanted
        elements: Vec<ElementId>,
    },
    /// Flip exclusion
    ToggleExclude {
        /// Element to flip
        element: ElementId,
    },
}

impl Operation {
    /// Resolve a relative `AddSource` path against `base`.
    pub fn relative_to(self, base: &Path) -> Self {
        match self {
            Operation::AddSource {
                path,
                mode,
                position,
            } if path.is_relative() => Operation::AddSource {
                path: base.join(path),
                mode,
                position,
            },
            other => other,
        }
    }

    /// Parse a JSON array of operations.
    pub fn parse_script(json: &str) -> Result<Vec<Operation>> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Result of [`Session::apply`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", content = "value", rename_all = "snake_case")]
pub enum Outcome {
    /// Elements created for a new source
    Added(Vec<StructureElement>),
    /// Whether the element was found and moved
    Moved(bool),
    /// Elements replacing the expanded one (empty if nothing happened)
    Expanded(Vec<StructureElement>),
    /// The merged element, if any input matched
    Collapsed(Option<StructureElement>),
    /// New exclusion flag, if the element was found
    Toggled(Option<bool>),
}

impl Outcome {
    /// Elements the presentation layer should (re)render.
    pub fn affected(&self) -> Vec<ElementId> {
        match self {
            Outcome::Added(elements) | Outcome::Expanded(elements) => {
                elements.iter().map(StructureElement::id).collect()
            }
            Outcome::Collapsed(element) => element.iter().map(StructureElement::id).collect(),
            Outcome::Moved(_) | Outcome::Toggled(_) => Vec::new(),
        }
    }
}

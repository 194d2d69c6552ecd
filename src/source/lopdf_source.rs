//! Source documents backed by lopdf.

use std::path::{Path, PathBuf};

use lopdf::{Document as LopdfDocument, Object, ObjectId};

use crate::detect::detect_format_from_path;
use crate::error::{Error, Result};
use crate::model::{PageHandle, PageSize};

use super::provider::{display_name_for, PageSource, SourceProvider};

/// Page attributes a page may inherit from its ancestors in the page tree.
pub(crate) const INHERITABLE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Opens PDF files with lopdf.
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfProvider;

impl LopdfProvider {
    /// Create a new provider.
    pub fn new() -> Self {
        Self
    }
}

impl SourceProvider for LopdfProvider {
    type Source = LopdfSource;

    fn open(&self, path: &Path) -> Result<LopdfSource> {
        LopdfSource::load_file(path)
    }
}

/// A PDF document loaded into memory.
#[derive(Debug)]
pub struct LopdfSource {
    name: String,
    path: Option<PathBuf>,
    doc: LopdfDocument,
    pages: Vec<ObjectId>,
}

impl LopdfSource {
    /// Load from a file path.
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        // Verify it's a PDF before handing it to the parser
        detect_format_from_path(path)?;

        let doc = LopdfDocument::load(path)?;
        let mut source = Self::from_document(display_name_for(path), doc)?;
        source.path = Some(path.to_path_buf());
        Ok(source)
    }

    /// Load from an in-memory byte slice.
    pub fn load_bytes(name: impl Into<String>, data: &[u8]) -> Result<Self> {
        let doc = LopdfDocument::load_mem(data)?;
        Self::from_document(name.into(), doc)
    }

    /// Wrap an already parsed document.
    pub fn from_document(name: String, doc: LopdfDocument) -> Result<Self> {
        if doc.is_encrypted() {
            return Err(Error::Encrypted);
        }
        // get_pages is keyed by 1-based page number, so values are in page order
        let pages: Vec<ObjectId> = doc.get_pages().into_values().collect();
        log::debug!("parsed '{}': {} page(s)", name, pages.len());
        Ok(Self {
            name,
            path: None,
            doc,
            pages,
        })
    }

    /// File the document was loaded from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Direct access to the underlying `lopdf::Document`.
    pub fn raw_doc(&self) -> &LopdfDocument {
        &self.doc
    }

    /// Page object ids in page order.
    pub fn page_ids(&self) -> &[ObjectId] {
        &self.pages
    }
}

impl PageSource for LopdfSource {
    fn display_name(&self) -> &str {
        &self.name
    }

    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page_handle(&self, page_number: u32) -> Option<PageHandle> {
        let id = *self.pages.get(page_number as usize)?;
        // The page tree may list ids that do not resolve to a dictionary
        self.doc.get_dictionary(id).ok()?;
        Some(PageHandle::from(id))
    }

    fn page_size(&self, page_number: u32) -> Option<PageSize> {
        let id = *self.pages.get(page_number as usize)?;
        let media_box = inherited_attribute(&self.doc, id, b"MediaBox")?;
        let array = resolve(&self.doc, media_box).as_array().ok()?;
        if array.len() < 4 {
            return None;
        }
        let coords: Vec<f32> = array
            .iter()
            .map(|o| resolve(&self.doc, o).as_float().unwrap_or(0.0))
            .collect();
        let size = PageSize::new((coords[2] - coords[0]).abs(), (coords[3] - coords[1]).abs());

        let rotation = inherited_attribute(&self.doc, id, b"Rotate")
            .and_then(|o| resolve(&self.doc, o).as_i64().ok())
            .unwrap_or(0);
        Some(size.rotated(rotation))
    }

    fn version(&self) -> Option<&str> {
        Some(self.doc.version.as_str())
    }
}

/// Follow a single indirect reference, returning the object itself otherwise.
pub(crate) fn resolve<'a>(doc: &'a LopdfDocument, object: &'a Object) -> &'a Object {
    match object {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(object),
        _ => object,
    }
}

/// Look up `key` on a page, walking up `Parent` links when absent.
pub(crate) fn inherited_attribute<'a>(
    doc: &'a LopdfDocument,
    page_id: ObjectId,
    key: &[u8],
) -> Option<&'a Object> {
    let mut current = doc.get_dictionary(page_id).ok()?;
    // Bounded walk: malformed files can contain Parent cycles
    for _ in 0..64 {
        if let Ok(value) = current.get(key) {
            return Some(value);
        }
        let parent = current.get(b"Parent").ok()?.as_reference().ok()?;
        current = doc.get_dictionary(parent).ok()?;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{dictionary, Stream};

    fn sample_document() -> LopdfDocument {
        let mut doc = LopdfDocument::with_version("1.5");
        let pages_id = doc.new_object_id();
        let mut kids: Vec<Object> = Vec::new();
        for width in [300, 400] {
            let content_id = doc.add_object(Stream::new(dictionary! {}, Vec::new()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "MediaBox" => vec![0.into(), 0.into(), width.into(), 500.into()],
            });
            kids.push(page_id.into());
        }
        let rotated_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Rotate" => 90,
        });
        kids.push(rotated_id.into());
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => 3,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc
    }

    #[test]
    fn test_pages_in_order() {
        let source = LopdfSource::from_document("sample.pdf".into(), sample_document()).unwrap();
        assert_eq!(source.display_name(), "sample.pdf");
        assert_eq!(source.page_count(), 3);
        assert!(source.page_handle(0).is_some());
        assert!(source.page_handle(3).is_none());
        assert_eq!(source.version(), Some("1.5"));
    }

    #[test]
    fn test_page_size_from_page_and_parent() {
        let source = LopdfSource::from_document("sample.pdf".into(), sample_document()).unwrap();
        assert_eq!(source.page_size(0), Some(PageSize::new(300.0, 500.0)));
        assert_eq!(source.page_size(1), Some(PageSize::new(400.0, 500.0)));
        // Inherited A4 box, rotated a quarter turn
        assert_eq!(source.page_size(2), Some(PageSize::new(842.0, 595.0)));
    }

    #[test]
    fn test_load_bytes_rejects_garbage() {
        assert!(LopdfSource::load_bytes("bad.pdf", b"not a pdf").is_err());
    }

    #[test]
    fn test_load_file_rejects_non_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.pdf");
        std::fs::write(&path, "<!DOCTYPE html><html></html>").unwrap();

        let err = LopdfProvider::new().open(&path).unwrap_err();
        assert!(matches!(err, Error::UnknownFormat));
    }
}

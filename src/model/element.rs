//! Structure elements: the user-visible cards of the output document.

use super::{ElementId, PageRef};
use serde::Serialize;
use std::fmt;

/// A named, identified run of one or more pages.
///
/// The page sequence is fixed at construction. Grouping and ungrouping
/// replace elements instead of editing them, so an observer holding an
/// element knows its shape is current as long as its id is still in the
/// structure. Only the `excluded` flag changes in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructureElement {
    id: ElementId,
    pages: Vec<PageRef>,
    excluded: bool,
}

impl StructureElement {
    /// Build an element from a non-empty page sequence.
    ///
    /// # Panics
    ///
    /// Panics if `pages` is empty. Public operations never construct an
    /// empty element.
    pub(crate) fn new(id: ElementId, pages: Vec<PageRef>) -> Self {
        assert!(
            !pages.is_empty(),
            "structure element {} constructed without pages",
            id
        );
        Self {
            id,
            pages,
            excluded: false,
        }
    }

    /// Stable identifier.
    pub fn id(&self) -> ElementId {
        self.id
    }

    /// Pages in their fixed internal order.
    pub fn pages(&self) -> &[PageRef] {
        &self.pages
    }

    /// First page, used as the card's preview.
    pub fn first_page(&self) -> &PageRef {
        &self.pages[0]
    }

    /// Number of pages (always at least one).
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// True iff the element holds more than one page.
    pub fn is_grouped(&self) -> bool {
        self.pages.len() > 1
    }

    /// Whether the element is left out of the export.
    pub fn is_excluded(&self) -> bool {
        self.excluded
    }

    pub(crate) fn set_excluded(&mut self, excluded: bool) {
        self.excluded = excluded;
    }

    pub(crate) fn into_pages(self) -> Vec<PageRef> {
        self.pages
    }
}

impl fmt::Display for StructureElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}", self.id.get())?;
        if self.is_grouped() {
            write!(f, ":grouped")?;
        }
        if self.excluded {
            write!(f, ":excluded")?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PageHandle, PageId, SourceId};

    fn page(n: u32) -> PageRef {
        PageRef::new(PageId(n as u64), SourceId(0), n, PageHandle(n + 3, 0))
    }

    #[test]
    fn test_single_page_is_not_grouped() {
        let element = StructureElement::new(ElementId(0), vec![page(0)]);
        assert!(!element.is_grouped());
        assert_eq!(element.page_count(), 1);
        assert!(!element.is_excluded());
    }

    #[test]
    fn test_multi_page_is_grouped() {
        let element = StructureElement::new(ElementId(1), vec![page(0), page(1)]);
        assert!(element.is_grouped());
        assert_eq!(element.first_page().original_page_number, 0);
    }

    #[test]
    #[should_panic(expected = "without pages")]
    fn test_empty_element_panics() {
        let _ = StructureElement::new(ElementId(2), Vec::new());
    }

    #[test]
    fn test_display() {
        let mut element = StructureElement::new(ElementId(4), vec![page(0), page(1)]);
        assert_eq!(element.to_string(), "[4:grouped]");
        element.set_excluded(true);
        assert_eq!(element.to_string(), "[4:grouped:excluded]");

        let single = StructureElement::new(ElementId(5), vec![page(2)]);
        assert_eq!(single.to_string(), "[5]");
    }
}

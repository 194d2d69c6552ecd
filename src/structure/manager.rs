//! Ordered element storage with an id → position index.

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::error::{Error, Result};
use crate::model::{ElementId, IdAllocator, PageId, PageRef, StructureElement};

/// Owns the ordered sequence of structure elements.
///
/// The order of `structure` is the order pages are exported in. `index`
/// maps every element id to its current slot and is rebuilt after each
/// positional mutation, so `index[e.id] == i` iff `structure[i].id == e.id`.
/// `placed` holds the id of every page in the structure; each page belongs
/// to exactly one element.
///
/// Lookups of ids that are not in the structure are never errors: they
/// return `None`, an empty list or `Ok(false)`. Positions outside the
/// structure are errors and are never clamped.
#[derive(Debug, Default)]
pub struct StructureManager {
    structure: Vec<StructureElement>,
    index: HashMap<ElementId, usize>,
    placed: HashSet<PageId>,
    ids: IdAllocator<ElementId>,
}

impl StructureManager {
    /// Create an empty structure with a fresh id allocator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty structure drawing element ids from `ids`.
    pub fn with_allocator(ids: IdAllocator<ElementId>) -> Self {
        Self {
            structure: Vec::new(),
            index: HashMap::new(),
            placed: HashSet::new(),
            ids,
        }
    }

    /// Build a new element around `pages` with a freshly allocated id.
    ///
    /// The element is not inserted. Returns `None` if `pages` is empty.
    pub fn create_element(&mut self, pages: Vec<PageRef>) -> Option<StructureElement> {
        if pages.is_empty() {
            return None;
        }
        Some(self.new_element(pages))
    }

    fn new_element(&mut self, pages: Vec<PageRef>) -> StructureElement {
        StructureElement::new(self.ids.allocate(), pages)
    }

    /// Insert freshly created elements at `position` (end if `None`).
    ///
    /// Fails without mutating if `position > len`, if any element id is
    /// already present in the structure (or repeated within `elements`), or
    /// if any page is already placed in another element.
    pub fn insert(
        &mut self,
        elements: Vec<StructureElement>,
        position: Option<usize>,
    ) -> Result<()> {
        let len = self.structure.len();
        let position = position.unwrap_or(len);
        if position > len {
            return Err(Error::PositionOutOfRange { position, len });
        }

        let mut seen = HashSet::with_capacity(elements.len());
        let mut pages = HashSet::new();
        for element in &elements {
            if self.index.contains_key(&element.id()) || !seen.insert(element.id()) {
                return Err(Error::DuplicateElement(element.id()));
            }
            for page in element.pages() {
                if self.placed.contains(&page.id) || !pages.insert(page.id) {
                    return Err(Error::DuplicatePage(page.id));
                }
            }
        }
        self.placed.extend(pages);

        log::debug!("inserting {} element(s) at {}", elements.len(), position);
        let tail = self.structure.split_off(position);
        self.structure.extend(elements);
        self.structure.extend(tail);
        self.rebuild_index();
        Ok(())
    }

    /// Append elements to the end of the structure.
    pub fn append(&mut self, elements: Vec<StructureElement>) -> Result<()> {
        self.insert(elements, None)
    }

    /// Move an element so that it ends up at `new_position`.
    ///
    /// `new_position` is the element's final slot, counted in the sequence
    /// after the element has been taken out, so valid values are
    /// `0..len`. Returns `Ok(false)` and leaves everything untouched if
    /// `id` is not in the structure.
    pub fn move_element(&mut self, id: ElementId, new_position: usize) -> Result<bool> {
        let Some(&old_position) = self.index.get(&id) else {
            log::debug!("move of unknown element {} ignored", id);
            return Ok(false);
        };

        let len = self.structure.len();
        if new_position >= len {
            return Err(Error::PositionOutOfRange {
                position: new_position,
                len,
            });
        }

        if old_position != new_position {
            let element = self.structure.remove(old_position);
            self.structure.insert(new_position, element);
            self.rebuild_index();
        }
        log::debug!("moved {} from {} to {}", id, old_position, new_position);
        Ok(true)
    }

    /// Split a grouped element into one element per page, in place.
    ///
    /// Returns the new elements in page order. Single-page and unknown
    /// elements are left alone and yield an empty list. The new elements
    /// start out included.
    pub fn expand(&mut self, id: ElementId) -> Vec<StructureElement> {
        let Some(&position) = self.index.get(&id) else {
            log::debug!("expand of unknown element {} ignored", id);
            return Vec::new();
        };
        if !self.structure[position].is_grouped() {
            return Vec::new();
        }

        let grouped = self.structure.remove(position);
        let new_elements: Vec<StructureElement> = grouped
            .into_pages()
            .into_iter()
            .map(|page| self.new_element(vec![page]))
            .collect();

        let tail = self.structure.split_off(position);
        self.structure.extend(new_elements.iter().cloned());
        self.structure.extend(tail);
        self.rebuild_index();
        log::debug!(
            "expanded {} into {} element(s) at {}",
            id,
            new_elements.len(),
            position
        );
        new_elements
    }

    /// Merge the given elements into one new element.
    ///
    /// Pages are concatenated in the order the ids are supplied, not in
    /// structure order. The merged element takes the slot of the
    /// lowest-positioned input and starts out included. Ids not in the
    /// structure are skipped and repeated ids count once.
    ///
    /// If exactly one id matches, that element is returned unchanged and
    /// nothing is mutated. If none match, returns `None`.
    pub fn collapse(&mut self, ids: &[ElementId]) -> Option<StructureElement> {
        let mut seen = HashSet::with_capacity(ids.len());
        let positions: Vec<usize> = ids
            .iter()
            .filter(|id| seen.insert(**id))
            .filter_map(|id| self.index.get(id).copied())
            .collect();

        match positions.len() {
            0 => {
                log::debug!("collapse matched no elements");
                return None;
            }
            1 => return Some(self.structure[positions[0]].clone()),
            _ => {}
        }

        let target = positions.iter().copied().min().unwrap_or(0);

        let mut removed: Vec<Option<StructureElement>> = positions.iter().map(|_| None).collect();
        let mut by_position: Vec<(usize, usize)> = positions
            .iter()
            .enumerate()
            .map(|(order, &position)| (position, order))
            .collect();
        by_position.sort_unstable_by(|a, b| b.0.cmp(&a.0));
        for (position, order) in by_position {
            removed[order] = Some(self.structure.remove(position));
        }

        let pages: Vec<PageRef> = removed
            .into_iter()
            .flatten()
            .flat_map(StructureElement::into_pages)
            .collect();

        let merged = self.new_element(pages);
        self.structure.insert(target, merged.clone());
        self.rebuild_index();
        log::debug!(
            "collapsed {} element(s) into {} at {}",
            positions.len(),
            merged.id(),
            target
        );
        Some(merged)
    }

    /// Flip the exclusion flag. Returns the new value, or `None` if the id
    /// is not in the structure.
    pub fn toggle_exclude(&mut self, id: ElementId) -> Option<bool> {
        let position = *self.index.get(&id)?;
        let element = &mut self.structure[position];
        let excluded = !element.is_excluded();
        element.set_excluded(excluded);
        log::debug!("{} excluded = {}", id, excluded);
        Some(excluded)
    }

    /// Set the exclusion flag. Returns the previous value, or `None` if the
    /// id is not in the structure.
    pub fn set_excluded(&mut self, id: ElementId, excluded: bool) -> Option<bool> {
        let position = *self.index.get(&id)?;
        let element = &mut self.structure[position];
        let previous = element.is_excluded();
        element.set_excluded(excluded);
        Some(previous)
    }

    /// Look up an element by id.
    pub fn get(&self, id: ElementId) -> Option<&StructureElement> {
        self.index.get(&id).map(|&position| &self.structure[position])
    }

    /// Current position of an element.
    pub fn index_of(&self, id: ElementId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    /// Check whether an element is in the structure.
    pub fn contains(&self, id: ElementId) -> bool {
        self.index.contains_key(&id)
    }

    /// Read-only ordered view of the structure.
    pub fn snapshot(&self) -> &[StructureElement] {
        &self.structure
    }

    /// Iterate elements in document order.
    pub fn iter(&self) -> std::slice::Iter<'_, StructureElement> {
        self.structure.iter()
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.structure.len()
    }

    /// Check if the structure has no elements.
    pub fn is_empty(&self) -> bool {
        self.structure.is_empty()
    }

    /// Total number of pages across all elements, excluded or not.
    pub fn page_count(&self) -> usize {
        self.structure.iter().map(StructureElement::page_count).sum()
    }

    /// Pages of every non-excluded element, flattened in document order.
    pub fn export_order(&self) -> Vec<PageRef> {
        self.structure
            .iter()
            .filter(|element| !element.is_excluded())
            .flat_map(|element| element.pages().iter().copied())
            .collect()
    }

    /// Number of pages [`export_order`](Self::export_order) would yield.
    pub fn exported_page_count(&self) -> usize {
        self.structure
            .iter()
            .filter(|element| !element.is_excluded())
            .map(StructureElement::page_count)
            .sum()
    }

    fn rebuild_index(&mut self) {
        self.index.clear();
        self.index.extend(
            self.structure
                .iter()
                .enumerate()
                .map(|(position, element)| (element.id(), position)),
        );
    }
}

impl fmt::Display for StructureManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for element in &self.structure {
            write!(f, "{}", element)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a StructureManager {
    type Item = &'a StructureElement;
    type IntoIter = std::slice::Iter<'a, StructureElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.structure.iter()
    }
}

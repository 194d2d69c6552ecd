//! Document structure model types.
//!
//! Page references point into loaded source documents; structure elements
//! bundle one or more of them into the units the user reorders, groups and
//! excludes.

mod element;
mod ids;
mod page;

pub use element::StructureElement;
pub use ids::{ElementId, IdAllocator, PageId, SourceId};
pub use page::{PageHandle, PageRef, PageSize};

//! Document structure management.
//!
//! [`StructureManager`] owns the ordered list of [`StructureElement`]s that
//! make up the output document and keeps an id → position index in step
//! with it.
//!
//! [`StructureElement`]: crate::model::StructureElement

mod manager;

pub use manager::StructureManager;

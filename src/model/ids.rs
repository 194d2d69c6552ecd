//! Identifier types and session-scoped id allocation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// Raw numeric value.
            pub fn get(self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

define_id!(
    /// Identifies one loaded source document.
    SourceId,
    "s"
);

define_id!(
    /// Identifies one page reference within a session.
    PageId,
    "p"
);

define_id!(
    /// Stable handle of a structure element. Never reused within a session.
    ElementId,
    "e"
);

/// Monotonic id allocator.
///
/// Each allocator hands out `0, 1, 2, ...` independently of every other
/// allocator, so two sessions (or two tests) never share counter state.
#[derive(Debug, Clone)]
pub struct IdAllocator<T> {
    next: u64,
    _marker: PhantomData<fn() -> T>,
}

impl<T: From<u64>> IdAllocator<T> {
    /// Create an allocator starting at zero.
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    /// Create an allocator whose first id is `first`.
    pub fn starting_at(first: u64) -> Self {
        Self {
            next: first,
            _marker: PhantomData,
        }
    }

    /// Allocate the next id.
    pub fn allocate(&mut self) -> T {
        let id = self.next;
        self.next += 1;
        T::from(id)
    }

    /// Value the next call to [`allocate`](Self::allocate) will return.
    pub fn peek(&self) -> u64 {
        self.next
    }
}

impl<T: From<u64>> Default for IdAllocator<T> {
    fn default() -> Self {
        Self::new()
    }
}

//! Object handles
//!
//! Every object stored in a drawing carries a handle, a file-wide identifier
//! that is distinct from the object's byte offset. The object map links the
//! two.

use std::fmt;

/// Identifier of a stored object. Handle 0 means "no object".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Handle(u64);

impl Handle {
    /// The null handle, used for absent references
    pub const NULL: Handle = Handle(0);

    #[inline]
    pub const fn new(value: u64) -> Self {
        Handle(value)
    }

    #[inline]
    pub const fn value(&self) -> u64 {
        self.0
    }

    #[inline]
    pub const fn is_null(&self) -> bool {
        self.0 == 0
    }

    /// The handle numerically following this one.
    ///
    /// Objects written without explicit entity links are chained by
    /// consecutive handles.
    #[inline]
    pub const fn next(&self) -> Handle {
        Handle(self.0.wrapping_add(1))
    }

    /// Apply a signed offset, wrapping like the on-disk arithmetic does.
    #[inline]
    pub const fn offset_by(&self, delta: i64) -> Handle {
        Handle(self.0.wrapping_add(delta as u64))
    }
}

impl From<u64> for Handle {
    fn from(value: u64) -> Self {
        Handle(value)
    }
}

impl From<Handle> for u64 {
    fn from(handle: Handle) -> Self {
        handle.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#X}", self.0)
    }
}

impl fmt::UpperHex for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::UpperHex::fmt(&self.0, f)
    }
}

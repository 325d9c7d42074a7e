//! Handle reference codes.
//!
//! On disk a handle is `|CODE (4 bits)|COUNTER (4 bits)|COUNTER bytes|`.
//! Codes 2..=5 carry an absolute handle; codes 6, 8, 0xA and 0xC are
//! relative to the handle of the object being decoded.

use crate::types::Handle;

/// Handle reference code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DwgReferenceType {
    /// Code 0, the object's own handle and the object map use it
    Undefined = 0,
    SoftOwnership = 2,
    HardOwnership = 3,
    SoftPointer = 4,
    HardPointer = 5,
    /// Reference handle + 1
    PlusOne = 6,
    /// Reference handle - 1
    MinusOne = 8,
    /// Reference handle + offset
    PlusOffset = 0xA,
    /// Reference handle - offset
    MinusOffset = 0xC,
}

impl DwgReferenceType {
    /// Map a raw 4-bit code; codes 1, 7, 9, 0xB, 0xD..=0xF are not defined.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Undefined),
            2 => Some(Self::SoftOwnership),
            3 => Some(Self::HardOwnership),
            4 => Some(Self::SoftPointer),
            5 => Some(Self::HardPointer),
            6 => Some(Self::PlusOne),
            8 => Some(Self::MinusOne),
            0xA => Some(Self::PlusOffset),
            0xC => Some(Self::MinusOffset),
            _ => None,
        }
    }

    /// Whether the stored value is an absolute handle.
    pub fn is_absolute(self) -> bool {
        (self as u8) <= 5
    }
}

/// A handle reference as stored, before resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandleReference {
    pub reference_type: DwgReferenceType,
    /// Absolute handle or offset, depending on the code.
    pub value: u64,
}

impl HandleReference {
    pub fn new(reference_type: DwgReferenceType, value: u64) -> Self {
        Self { reference_type, value }
    }

    /// Resolve against the handle of the object that contains the reference.
    pub fn resolve(&self, owner: Handle) -> Handle {
        match self.reference_type {
            DwgReferenceType::PlusOne => owner.next(),
            DwgReferenceType::MinusOne => Handle::new(owner.value().wrapping_sub(1)),
            DwgReferenceType::PlusOffset => Handle::new(owner.value().wrapping_add(self.value)),
            DwgReferenceType::MinusOffset => Handle::new(owner.value().wrapping_sub(self.value)),
            _ => Handle::new(self.value),
        }
    }
}

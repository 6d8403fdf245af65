//! Identifier newtypes shared across Javelin crates.
//!
//! Ids are opaque handles allocated by whichever type universe produced them;
//! they carry no meaning across universes.

use serde::{Deserialize, Serialize};

/// Identity of a raw (erased) class in a type universe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClassId(u32);

impl ClassId {
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    pub const fn index(self) -> u32 {
        self.0
    }
}

/// Identity of a declared type variable.
///
/// Unique per declaring context (class or method) within one universe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeVarId(u32);

impl TypeVarId {
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    pub const fn index(self) -> u32 {
        self.0
    }
}

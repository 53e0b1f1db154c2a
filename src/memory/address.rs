//! Simulated memory addresses
//!
//! An [`Address`] is an index into the interpreter's flat byte store, never
//! a host pointer. Program values are plain `i32`s; converting one into an
//! address is the only way the evaluator reaches memory through a pointer.

use crate::interpreter::constants::ADDRESS_START;
use std::fmt;

/// Address in the simulated byte store
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address(u32);

impl Address {
    /// The first address handed out by the allocator
    pub const START: Address = Address(ADDRESS_START);

    pub const fn new(raw: u32) -> Self {
        Address(raw)
    }

    pub fn raw(self) -> u32 {
        self.0
    }

    /// Interpret a program value as an address
    ///
    /// Negative values have no address; they come back as `None`.
    pub fn from_value(value: i32) -> Option<Self> {
        u32::try_from(value).ok().map(Address)
    }

    /// The program-visible integer for this address
    pub fn to_value(self) -> i32 {
        self.0 as i32
    }

    /// Address `bytes` past this one
    pub fn offset(self, bytes: usize) -> Self {
        Address(self.0.wrapping_add(bytes as u32))
    }

    /// True for addresses in the reserved range below [`Address::START`]
    pub fn is_reserved(self) -> bool {
        self.0 < ADDRESS_START
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_value() {
        assert_eq!(Address::from_value(1004), Some(Address::new(1004)));
        assert_eq!(Address::from_value(-1), None);
        assert!(Address::from_value(0).unwrap().is_reserved());
        assert!(!Address::START.is_reserved());
    }

    #[test]
    fn test_offset_and_value() {
        let addr = Address::START.offset(4);
        assert_eq!(addr.raw(), 1004);
        assert_eq!(addr.to_value(), 1004);
        assert_eq!(addr.to_string(), "1004");
    }
}

//! Memory model for the interpreter
//!
//! This module provides the core memory abstractions:
//! - [`address`]: the opaque [`address::Address`] type
//! - [`heap`]: the flat byte store with its bump allocator
//! - [`stack`]: symbol tables and the call stack of local frames
//! - [`strings`]: the string literal pool
//!
//! # Type Sizes
//!
//! Sizes are fixed and platform-independent:
//! - `int`: 4 bytes, little-endian
//! - `char`: 1 byte
//! - `pointer`: 4 bytes (regardless of pointee type)
//! - `void`: no storage
//!
//! # Pointer Arithmetic
//!
//! A pointer is just an `int` holding an address. `p + 1` is the next byte,
//! not the next element; there is no scaling by pointee size.

pub mod address;
pub mod heap;
pub mod stack;
pub mod strings;

use crate::interpreter::constants::{CHAR_SIZE, INT_SIZE, POINTER_SIZE};
use crate::parser::ast::{BaseType, Type};

/// Calculate the storage size of a type in bytes
///
/// Returns `None` for `void`, which has no storage.
pub fn sizeof_type(t: &Type) -> Option<usize> {
    if t.is_pointer() {
        return Some(POINTER_SIZE);
    }

    match t.base {
        BaseType::Int => Some(INT_SIZE),
        BaseType::Char => Some(CHAR_SIZE),
        BaseType::Void => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sizeof() {
        let int = Type::new(BaseType::Int);
        let char_ = Type::new(BaseType::Char);
        let void = Type::new(BaseType::Void);

        assert_eq!(sizeof_type(&int), Some(4));
        assert_eq!(sizeof_type(&char_), Some(1));
        assert_eq!(sizeof_type(&void), None);
        assert_eq!(sizeof_type(&char_.with_pointer()), Some(4));
        assert_eq!(sizeof_type(&void.with_pointer()), Some(4));
        assert_eq!(sizeof_type(&int.with_pointer().with_pointer()), Some(4));
    }
}

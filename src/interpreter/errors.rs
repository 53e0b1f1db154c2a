//! Runtime error types for the interpreter
//!
//! This module defines [`RuntimeError`], which represents all errors that can occur
//! during program execution (as opposed to lexer or parse errors).
//!
//! All runtime errors are fatal - the first one aborts the run.

use crate::memory::address::Address;
use crate::memory::heap::MemoryError;
use crate::parser::ast::SourceLocation;
use std::fmt;

/// Runtime errors that can occur during execution
#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeError {
    /// Undefined variable reference
    UndefinedVariable {
        name: String,
        location: SourceLocation,
    },

    /// Undefined function call
    UndefinedFunction {
        name: String,
        location: SourceLocation,
    },

    /// Function argument count mismatch
    ArgumentCountMismatch {
        function: String,
        expected: usize,
        got: usize,
        location: SourceLocation,
    },

    /// Assignment target is neither a variable nor `*expr`
    InvalidLvalue { location: SourceLocation },

    /// `&` applied to something other than a plain variable
    InvalidAddressOf { location: SourceLocation },

    /// Write to a reserved or unallocated address, or a negative pointer value
    InvalidAddress {
        address: i64,
        message: String,
        location: SourceLocation,
    },

    /// Strict read of memory that was never written
    UninitializedRead {
        address: Address,
        location: SourceLocation,
    },

    /// Byte write with a value outside 0-255
    ByteOutOfRange {
        value: i32,
        location: SourceLocation,
    },

    /// Variable of a type with no storage (`void`)
    UnsizedType {
        type_name: String,
        location: SourceLocation,
    },

    /// Division by zero
    DivisionByZero { location: SourceLocation },

    /// Call depth ceiling exceeded
    StackExhausted {
        depth: usize,
        location: SourceLocation,
    },

    /// A node that cannot appear where it was found, e.g. a nested function
    UnsupportedOperation {
        message: String,
        location: SourceLocation,
    },

    /// Main function not found
    NoMainFunction,
}

impl RuntimeError {
    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            RuntimeError::UndefinedVariable { location, .. } => Some(location),
            RuntimeError::UndefinedFunction { location, .. } => Some(location),
            RuntimeError::ArgumentCountMismatch { location, .. } => Some(location),
            RuntimeError::InvalidLvalue { location } => Some(location),
            RuntimeError::InvalidAddressOf { location } => Some(location),
            RuntimeError::InvalidAddress { location, .. } => Some(location),
            RuntimeError::UninitializedRead { location, .. } => Some(location),
            RuntimeError::ByteOutOfRange { location, .. } => Some(location),
            RuntimeError::UnsizedType { location, .. } => Some(location),
            RuntimeError::DivisionByZero { location } => Some(location),
            RuntimeError::StackExhausted { location, .. } => Some(location),
            RuntimeError::UnsupportedOperation { location, .. } => Some(location),
            RuntimeError::NoMainFunction => None,
        }
    }

    /// Attach a source location to a heap error
    pub(crate) fn from_memory(err: MemoryError, location: SourceLocation) -> Self {
        match err {
            MemoryError::ReservedAddress(addr) | MemoryError::Unallocated(addr) => {
                RuntimeError::InvalidAddress {
                    address: i64::from(addr.raw()),
                    message: err.to_string(),
                    location,
                }
            }
            MemoryError::Uninitialized(address) => {
                RuntimeError::UninitializedRead { address, location }
            }
            MemoryError::ByteOutOfRange { value, .. } => {
                RuntimeError::ByteOutOfRange { value, location }
            }
        }
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeError::UndefinedVariable { name, location } => {
                write!(f, "Undefined variable '{}' at line {}", name, location.line)
            }
            RuntimeError::UndefinedFunction { name, location } => {
                write!(f, "Undefined function '{}' at line {}", name, location.line)
            }
            RuntimeError::ArgumentCountMismatch {
                function,
                expected,
                got,
                location,
            } => {
                write!(
                    f,
                    "Function '{}' expects {} argument{}, got {} at line {}",
                    function,
                    expected,
                    if *expected == 1 { "" } else { "s" },
                    got,
                    location.line
                )
            }
            RuntimeError::InvalidLvalue { location } => {
                write!(f, "Invalid lvalue in assignment at line {}", location.line)
            }
            RuntimeError::InvalidAddressOf { location } => {
                write!(
                    f,
                    "'&' can only be applied to a variable at line {}",
                    location.line
                )
            }
            RuntimeError::InvalidAddress {
                address,
                message,
                location,
            } => {
                write!(
                    f,
                    "Invalid address {}: {} at line {}",
                    address, message, location.line
                )
            }
            RuntimeError::UninitializedRead { address, location } => {
                write!(
                    f,
                    "Invalid or uninitialized access at address {} at line {}",
                    address, location.line
                )
            }
            RuntimeError::ByteOutOfRange { value, location } => {
                write!(
                    f,
                    "Byte value {} out of range 0-255 at line {}",
                    value, location.line
                )
            }
            RuntimeError::UnsizedType {
                type_name,
                location,
            } => {
                write!(
                    f,
                    "Type '{}' has no storage size at line {}",
                    type_name, location.line
                )
            }
            RuntimeError::DivisionByZero { location } => {
                write!(f, "Division by zero at line {}", location.line)
            }
            RuntimeError::StackExhausted { depth, location } => {
                write!(
                    f,
                    "Stack exhausted: call depth limit {} reached at line {}",
                    depth, location.line
                )
            }
            RuntimeError::UnsupportedOperation { message, location } => {
                write!(f, "{} at line {}", message, location.line)
            }
            RuntimeError::NoMainFunction => {
                write!(f, "No main() function found")
            }
        }
    }
}

impl std::error::Error for RuntimeError {}

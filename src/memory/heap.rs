//! Flat simulated memory with a bump allocator
//!
//! Every variable, parameter and string literal lives here. The store is a
//! single contiguous run of bytes starting at [`Address::START`]:
//! - [`Heap::allocate`] zero-fills fresh bytes at the cursor and advances it
//! - nothing is ever freed or reused
//!
//! # Read/Write Rules
//!
//! - Writes below `Address::START`, or outside the allocated run, fail.
//! - [`Heap::read_int`] is strict: all four bytes must lie inside the
//!   allocated run, otherwise the read is an uninitialized access.
//! - [`Heap::read_byte`] is lenient: a byte outside the run reads as `0`, so
//!   string scanning terminates instead of failing.

use super::address::Address;
use crate::interpreter::constants::INT_SIZE;
use std::fmt;

/// Errors raised by the byte store
///
/// The interpreter attaches a source location when converting these into
/// runtime errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoryError {
    /// Write into the reserved range below `Address::START`
    ReservedAddress(Address),
    /// Write outside any allocation
    Unallocated(Address),
    /// Strict read of a byte that was never written
    Uninitialized(Address),
    /// Byte write with a value outside `0..=255`
    ByteOutOfRange { address: Address, value: i32 },
}

impl fmt::Display for MemoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemoryError::ReservedAddress(addr) => {
                write!(f, "write to reserved address {}", addr)
            }
            MemoryError::Unallocated(addr) => {
                write!(f, "write to unallocated address {}", addr)
            }
            MemoryError::Uninitialized(addr) => {
                write!(f, "invalid or uninitialized access at address {}", addr)
            }
            MemoryError::ByteOutOfRange { address, value } => {
                write!(
                    f,
                    "byte value {} out of range 0-255 at address {}",
                    value, address
                )
            }
        }
    }
}

impl std::error::Error for MemoryError {}

/// The simulated heap
#[derive(Debug, Clone)]
pub struct Heap {
    data: Vec<u8>, // data[i] holds the byte at Address::START + i
    next_address: Address,
}

impl Heap {
    pub fn new() -> Self {
        Heap {
            data: Vec::new(),
            next_address: Address::START,
        }
    }

    /// Allocate `size` zero-filled bytes and return the first address
    pub fn allocate(&mut self, size: usize) -> Address {
        let addr = self.next_address;
        self.data.resize(self.data.len() + size, 0);
        self.next_address = addr.offset(size);
        log::trace!("allocated {} bytes at {}", size, addr);
        addr
    }

    /// The address the next allocation will return
    pub fn next_free(&self) -> Address {
        self.next_address
    }

    /// Number of bytes handed out so far
    pub fn allocated_bytes(&self) -> usize {
        self.data.len()
    }

    /// Write a 4-byte little-endian integer
    pub fn write_int(&mut self, addr: Address, value: i32) -> Result<(), MemoryError> {
        let offset = self.writable_offset(addr, INT_SIZE)?;
        self.data[offset..offset + INT_SIZE].copy_from_slice(&value.to_le_bytes());
        Ok(())
    }

    /// Read a 4-byte little-endian integer
    pub fn read_int(&self, addr: Address) -> Result<i32, MemoryError> {
        let mut bytes = [0u8; INT_SIZE];
        for (i, byte) in bytes.iter_mut().enumerate() {
            let at = addr.offset(i);
            *byte = self
                .offset_of(at)
                .map(|offset| self.data[offset])
                .ok_or(MemoryError::Uninitialized(at))?;
        }
        Ok(i32::from_le_bytes(bytes))
    }

    /// Write a single byte; `value` must be in `0..=255`
    pub fn write_byte(&mut self, addr: Address, value: i32) -> Result<(), MemoryError> {
        let byte = u8::try_from(value).map_err(|_| MemoryError::ByteOutOfRange {
            address: addr,
            value,
        })?;
        let offset = self.writable_offset(addr, 1)?;
        self.data[offset] = byte;
        Ok(())
    }

    /// Read a single byte, `0` if the address was never written
    pub fn read_byte(&self, addr: Address) -> u8 {
        self.offset_of(addr).map_or(0, |offset| self.data[offset])
    }

    /// Write raw bytes, e.g. a string literal plus its terminator
    pub fn write_bytes(&mut self, addr: Address, bytes: &[u8]) -> Result<(), MemoryError> {
        let offset = self.writable_offset(addr, bytes.len())?;
        self.data[offset..offset + bytes.len()].copy_from_slice(bytes);
        Ok(())
    }

    /// Read the null-terminated byte run starting at `addr`
    ///
    /// Bytes are decoded as UTF-8, replacing invalid sequences.
    pub fn read_string(&self, addr: Address) -> String {
        let mut bytes = Vec::new();
        let mut current = addr;
        loop {
            let byte = self.read_byte(current);
            if byte == 0 {
                break;
            }
            bytes.push(byte);
            current = current.offset(1);
        }
        String::from_utf8_lossy(&bytes).into_owned()
    }

    /// Index into `data` for an allocated address
    fn offset_of(&self, addr: Address) -> Option<usize> {
        if addr.is_reserved() || addr >= self.next_address {
            return None;
        }
        Some((addr.raw() - Address::START.raw()) as usize)
    }

    /// Index into `data` for a write of `len` bytes, checking the whole range
    fn writable_offset(&self, addr: Address, len: usize) -> Result<usize, MemoryError> {
        if addr.is_reserved() {
            return Err(MemoryError::ReservedAddress(addr));
        }
        let offset = self.offset_of(addr).ok_or(MemoryError::Unallocated(addr))?;
        if offset + len > self.data.len() {
            return Err(MemoryError::Unallocated(addr.offset(self.data.len() - offset)));
        }
        Ok(offset)
    }
}

impl Default for Heap {
    fn default() -> Self {
        Self::new()
    }
}

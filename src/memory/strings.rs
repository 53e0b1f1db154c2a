//! String literal pool
//!
//! Each distinct literal text is written into the heap once, as its UTF-8
//! bytes followed by a single zero byte. Every later occurrence of the same
//! text resolves to that first address.

use super::address::Address;
use super::heap::{Heap, MemoryError};
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Default)]
pub struct StringPool {
    addresses: FxHashMap<String, Address>,
}

impl StringPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Address of `text`, allocating and writing it on first sight
    pub fn intern(&mut self, heap: &mut Heap, text: &str) -> Result<Address, MemoryError> {
        if let Some(&addr) = self.addresses.get(text) {
            return Ok(addr);
        }

        let mut bytes = Vec::with_capacity(text.len() + 1);
        bytes.extend_from_slice(text.as_bytes());
        bytes.push(0);

        let addr = heap.allocate(bytes.len());
        heap.write_bytes(addr, &bytes)?;
        self.addresses.insert(text.to_string(), addr);
        Ok(addr)
    }

    /// Address of an already interned literal
    pub fn get(&self, text: &str) -> Option<Address> {
        self.addresses.get(text).copied()
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_text_shares_address() {
        let mut heap = Heap::new();
        let mut pool = StringPool::new();

        let a = pool.intern(&mut heap, "Hello").unwrap();
        let b = pool.intern(&mut heap, "Hello").unwrap();
        let c = pool.intern(&mut heap, "World").unwrap();

        assert_eq!(a, b);
        assert_eq!(c, a.offset(6)); // "Hello" plus terminator
        assert_eq!(pool.len(), 2);
        assert_eq!(heap.next_free(), c.offset(6));
    }

    #[test]
    fn test_layout_is_null_terminated() {
        let mut heap = Heap::new();
        let mut pool = StringPool::new();

        let addr = pool.intern(&mut heap, "Hi").unwrap();
        assert_eq!(heap.read_byte(addr), b'H');
        assert_eq!(heap.read_byte(addr.offset(1)), b'i');
        assert_eq!(heap.read_byte(addr.offset(2)), 0);
        assert_eq!(heap.read_string(addr), "Hi");
        assert_eq!(pool.get("Hi"), Some(addr));
        assert_eq!(pool.get("nope"), None);
    }

    #[test]
    fn test_empty_literal_gets_its_own_byte() {
        let mut heap = Heap::new();
        let mut pool = StringPool::new();

        let empty = pool.intern(&mut heap, "").unwrap();
        let next = pool.intern(&mut heap, "x").unwrap();
        assert_eq!(next, empty.offset(1));
        assert_eq!(heap.read_string(empty), "");
    }
}

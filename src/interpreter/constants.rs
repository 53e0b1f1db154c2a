// Constants for the interpreter

/// First valid address; everything below is reserved
/// A pointer holding 0 (or any value below this) is never dereferenceable
pub const ADDRESS_START: u32 = 1000;

/// Storage width of an `int`
pub const INT_SIZE: usize = 4;

/// Storage width of a `char`
pub const CHAR_SIZE: usize = 1;

/// Storage width of a pointer of any target type (it holds an address)
pub const POINTER_SIZE: usize = 4;

/// Default ceiling on simultaneously active user function calls
pub const DEFAULT_MAX_CALL_DEPTH: usize = 256;

/// Remaining host stack below which evaluation switches to a fresh segment
pub const STACK_RED_ZONE: usize = 128 * 1024;

/// Size of each additional host stack segment
pub const STACK_GROW_SIZE: usize = 4 * 1024 * 1024;

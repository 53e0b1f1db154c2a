//! Console front end for the `bytescope` binary
//!
//! - **[`console`]**: [`ConsoleHost`], the [`Host`] that prints program
//!   output to stdout and breakpoint tables to stderr
//! - **[`theme`]**: color palette used when styling is enabled
//!
//! Not part of the stable library API.
//!
//! [`Host`]: crate::snapshot::Host

pub mod console;
pub mod theme;

pub use console::ConsoleHost;

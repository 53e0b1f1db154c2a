//! Tree-walking interpreter
//!
//! This module provides the core execution logic:
//! - [`engine`]: interpreter context, static registration, call protocol
//! - [`statements`]: statement execution and return unwinding
//! - [`expressions`]: expression evaluation
//! - [`builtins`]: `print` and `debug`
//! - [`errors`]: runtime error types
//! - [`constants`]: address space and type size constants
//!
//! # Execution Model
//!
//! A run has two phases. Static registration records every function, gives
//! each global its storage and interns every reachable string literal. The
//! second phase invokes `main` with no arguments and walks its body.
//!
//! All state lives in one [`engine::Interpreter`] value owned by the caller;
//! two interpreters never share memory, symbols or string pools.

pub mod builtins;
pub mod constants;
pub mod engine;
pub mod errors;
pub mod expressions;
pub mod statements;

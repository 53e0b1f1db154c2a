//! Source parser
//!
//! This module transforms source text into an Abstract Syntax Tree (AST):
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`parser`]: Parsing (tokens → AST)
//! - [`ast`]: AST node definitions
//!
//! # Supported Language
//!
//! A small C-like teaching language:
//! - Types: `int`, `char`, `void`, with any pointer depth
//! - Top level: global variable declarations and function definitions
//! - Statements: declarations (optionally initialized), assignment to a
//!   variable or through a dereferenced pointer, `print(expr);`, `debug;`,
//!   `if (...) { } else { }`, `return expr;`, call statements
//! - Expressions: `== != < >`, `+ -`, `* /`, unary `&` and `*`, literals,
//!   variables, calls, parentheses
//! - No loops, arrays, structs, or escape sequences in string literals
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent parser with a fixed precedence ladder.
//! No external parser generator dependencies.

pub mod ast;
pub mod lexer;
pub mod parser;

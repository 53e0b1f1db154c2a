//! # Introduction
//!
//! bytescope runs programs written in a tiny C-like teaching language over a
//! simulated, byte-addressable memory, so that every variable, parameter and
//! string literal has a concrete address that can be printed and inspected.
//!
//! ## Execution pipeline
//!
//! ```text
//! Source → Lexer → Parser → AST → Interpreter → Host (output + breakpoints)
//! ```
//!
//! 1. [`parser`]: tokenises the source and builds an AST.
//! 2. [`interpreter`]: registers functions and globals, then walks `main`.
//! 3. [`memory`]: the flat byte store starting at address 1000, symbol
//!    tables and the string literal pool.
//! 4. [`snapshot`]: the [`snapshot::Host`] boundary, breakpoint
//!    [`snapshot::Snapshot`]s and the recording [`snapshot::MockTerminal`].
//! 5. [`ui`]: console rendering used by the binary.
//!
//! ## Supported language
//!
//! Types: `int`, `char`, `void` and pointers to them.
//! Statements: declarations, assignment, `print`, `debug`, `if/else`, `return`,
//! call statements.
//! Operators: `+ - * /`, `== != < >`, unary `&` and `*`.

pub mod interpreter;
pub mod memory;
pub mod parser;
pub mod snapshot;
pub mod ui;

use interpreter::engine::{Interpreter, InterpreterConfig};
use interpreter::errors::RuntimeError;
use parser::parser::{ParseError, Parser};
use snapshot::Host;
use std::fmt;

/// Any failure of the parse-then-run pipeline
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Lexical or syntax error; nothing was executed
    Parse(ParseError),
    /// Runtime error; output produced before it has already reached the host
    Runtime(RuntimeError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Parse(e) => write!(f, "{}", e),
            Error::Runtime(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Parse(e) => Some(e),
            Error::Runtime(e) => Some(e),
        }
    }
}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        Error::Parse(err)
    }
}

impl From<RuntimeError> for Error {
    fn from(err: RuntimeError) -> Self {
        Error::Runtime(err)
    }
}

/// Parse `source` and run it against `host`
///
/// The first error from any stage aborts the rest of the pipeline.
pub fn run_source<H: Host>(source: &str, host: &mut H, config: InterpreterConfig) -> Result<(), Error> {
    let program = Parser::new(source)?.parse_program()?;
    log::debug!("parsed {} top-level declarations", program.nodes.len());

    let mut interpreter = Interpreter::with_config(program, host, config);
    interpreter.run()?;
    Ok(())
}

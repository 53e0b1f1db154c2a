//! Built-in statements
//!
//! - `print(expr)`: integer or string output, chosen statically
//! - `debug;`: breakpoint notice plus a [`Snapshot`] for the debug sink
//!
//! `print` treats its argument as a string address when the argument is a
//! string literal or a variable declared `char*` (any depth). Every other
//! expression prints as an integer, even when its value is an address. A
//! string address that is negative or reserved prints an error message in
//! place of the text and execution continues.

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::address::Address;
use crate::parser::ast::AstNode;
use crate::snapshot::{Host, Snapshot};

impl<H: Host> Interpreter<H> {
    pub(crate) fn builtin_print(&mut self, expr: &AstNode) -> Result<(), RuntimeError> {
        let value = self.evaluate_expr(expr)?;

        let is_string = match expr {
            AstNode::StringLiteral(..) => true,
            AstNode::Variable(name, loc) => self.lookup(name, *loc)?.var_type.is_char_pointer(),
            _ => false,
        };

        if !is_string {
            self.emit(&format!("[INT OUTPUT] {}", value));
            return Ok(());
        }

        let text = match Address::from_value(value).filter(|addr| !addr.is_reserved()) {
            Some(address) => self.heap.read_string(address),
            None => {
                log::warn!("print of invalid string address {}", value);
                format!("Error: Invalid string address {}", value)
            }
        };
        self.emit(&format!("[STRING OUTPUT] {}", text));
        Ok(())
    }

    pub(crate) fn builtin_debug(&mut self) {
        log::debug!("breakpoint at line {}", self.current_location.line);
        self.emit(">>> Breakpoint <<<");

        let snapshot = Snapshot::capture(&self.globals, self.stack.current_frame(), &self.heap);
        self.host.breakpoint(&snapshot);
    }
}

//! Symbol tables and the call stack
//!
//! This module provides name resolution state for execution:
//! - [`Symbol`]: a variable's declared type and its address in the heap
//! - [`SymbolTable`]: name → symbol, remembering declaration order
//! - [`StackFrame`]: one function call's local symbol table
//! - [`Stack`]: the call stack of frames
//!
//! Values never live here; a symbol only says where in the simulated heap
//! its bytes are.

use super::address::Address;
use crate::parser::ast::Type;
use rustc_hash::FxHashMap;

/// A declared variable: its type and where it lives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Symbol {
    pub var_type: Type,
    pub address: Address,
}

impl Symbol {
    pub fn new(var_type: Type, address: Address) -> Self {
        Symbol { var_type, address }
    }
}

/// Name → symbol map that iterates in declaration order
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    symbols: FxHashMap<String, Symbol>,
    insertion_order: Vec<String>, // Track order of variable declarations
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name`, replacing any earlier binding of the same name
    ///
    /// A redeclared name keeps its original position in declaration order.
    pub fn declare(&mut self, name: String, symbol: Symbol) {
        if self.symbols.insert(name.clone(), symbol).is_none() {
            self.insertion_order.push(name);
        }
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    /// Symbols in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Symbol)> {
        self.insertion_order
            .iter()
            .filter_map(|name| self.symbols.get(name).map(|sym| (name.as_str(), sym)))
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Stack frame for a function call
#[derive(Debug, Clone)]
pub struct StackFrame {
    pub function_name: String,
    pub locals: SymbolTable,
}

impl StackFrame {
    pub fn new(function_name: String) -> Self {
        StackFrame {
            function_name,
            locals: SymbolTable::new(),
        }
    }
}

/// The call stack
#[derive(Debug, Clone, Default)]
pub struct Stack {
    frames: Vec<StackFrame>,
}

impl Stack {
    pub fn new() -> Self {
        Stack { frames: Vec::new() }
    }

    /// Push a prepared stack frame
    pub fn push_frame(&mut self, frame: StackFrame) {
        self.frames.push(frame);
    }

    /// Pop the top stack frame
    pub fn pop_frame(&mut self) -> Option<StackFrame> {
        self.frames.pop()
    }

    /// Get the current (top) frame
    pub fn current_frame(&self) -> Option<&StackFrame> {
        self.frames.last()
    }

    /// Get a mutable reference to the current frame
    pub fn current_frame_mut(&mut self) -> Option<&mut StackFrame> {
        self.frames.last_mut()
    }

    /// Get the depth of the call stack
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Check if stack is empty
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast::BaseType;

    fn int_at(raw: u32) -> Symbol {
        Symbol::new(Type::new(BaseType::Int), Address::new(raw))
    }

    #[test]
    fn test_declaration_order() {
        let mut table = SymbolTable::new();
        table.declare("b".to_string(), int_at(1000));
        table.declare("a".to_string(), int_at(1004));
        table.declare("b".to_string(), int_at(1008));

        let names: Vec<&str> = table.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("b").map(|s| s.address), Some(Address::new(1008)));
    }

    #[test]
    fn test_frames() {
        let mut stack = Stack::new();
        assert!(stack.current_frame().is_none());

        stack.push_frame(StackFrame::new("main".to_string()));
        let mut callee = StackFrame::new("f".to_string());
        callee.locals.declare("x".to_string(), int_at(1000));
        stack.push_frame(callee);

        assert_eq!(stack.depth(), 2);
        let top = stack.current_frame().unwrap();
        assert_eq!(top.function_name, "f");
        assert!(top.locals.get("x").is_some());

        stack.pop_frame();
        assert_eq!(stack.current_frame().unwrap().function_name, "main");
        assert!(stack.current_frame().unwrap().locals.is_empty());
    }
}

// Host boundary: output lines and breakpoint snapshots

use crate::memory::address::Address;
use crate::memory::heap::Heap;
use crate::memory::stack::{StackFrame, Symbol, SymbolTable};
use crate::memory::sizeof_type;
use crate::parser::ast::Type;

/// The two callbacks through which a running program reaches its host
///
/// Both are called synchronously, in program order, on the evaluating
/// thread. Execution resumes when the call returns.
pub trait Host {
    /// One logical line of program output, without a trailing newline
    fn output(&mut self, line: &str);

    /// A `debug;` statement was reached
    fn breakpoint(&mut self, snapshot: &Snapshot);
}

impl<H: Host + ?Sized> Host for &mut H {
    fn output(&mut self, line: &str) {
        (**self).output(line)
    }

    fn breakpoint(&mut self, snapshot: &Snapshot) {
        (**self).breakpoint(snapshot)
    }
}

/// Adapts a pair of closures to [`Host`]
pub struct Callbacks<O, D> {
    pub output: O,
    pub debug: D,
}

impl<O, D> Host for Callbacks<O, D>
where
    O: FnMut(&str),
    D: FnMut(&Snapshot),
{
    fn output(&mut self, line: &str) {
        (self.output)(line)
    }

    fn breakpoint(&mut self, snapshot: &Snapshot) {
        (self.debug)(snapshot)
    }
}

/// Mock terminal capturing program output and breakpoints
#[derive(Debug, Clone, Default)]
pub struct MockTerminal {
    pub lines: Vec<String>,
    pub breakpoints: Vec<Snapshot>,
}

impl MockTerminal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all output lines
    pub fn get_output(&self) -> &[String] {
        &self.lines
    }

    /// Output lines produced by `print`, with their `[... OUTPUT]` tag removed
    pub fn printed(&self) -> Vec<&str> {
        self.lines
            .iter()
            .filter_map(|line| {
                line.strip_prefix("[INT OUTPUT] ")
                    .or_else(|| line.strip_prefix("[STRING OUTPUT] "))
            })
            .collect()
    }
}

impl Host for MockTerminal {
    fn output(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }

    fn breakpoint(&mut self, snapshot: &Snapshot) {
        self.breakpoints.push(snapshot.clone());
    }
}

/// One symbol as seen at a breakpoint
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolSnapshot {
    pub name: String,
    pub var_type: Type,
    pub address: Address,
    pub size: usize,
    /// Current value, `None` when the bytes cannot be read as a value
    pub value: Option<i32>,
    /// For `char*` symbols, the string the pointer currently refers to
    pub pointee: Option<String>,
}

impl SymbolSnapshot {
    fn capture(name: &str, symbol: &Symbol, heap: &Heap) -> Self {
        let value = if symbol.var_type.is_plain_char() {
            Some(i32::from(heap.read_byte(symbol.address)))
        } else {
            heap.read_int(symbol.address).ok()
        };

        let pointee = if symbol.var_type.is_char_pointer() {
            value
                .and_then(Address::from_value)
                .filter(|addr| !addr.is_reserved())
                .map(|addr| heap.read_string(addr))
        } else {
            None
        };

        SymbolSnapshot {
            name: name.to_string(),
            var_type: symbol.var_type,
            address: symbol.address,
            size: sizeof_type(&symbol.var_type).unwrap_or(0),
            value,
            pointee,
        }
    }
}

/// Point-in-time copy of the global table and the innermost local table
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Function whose frame `locals` describes, `None` outside any call
    pub function_name: Option<String>,
    pub globals: Vec<SymbolSnapshot>,
    pub locals: Vec<SymbolSnapshot>,
    pub next_free: Address,
}

impl Snapshot {
    pub fn capture(globals: &SymbolTable, frame: Option<&StackFrame>, heap: &Heap) -> Self {
        let collect = |table: &SymbolTable| {
            table
                .iter()
                .map(|(name, symbol)| SymbolSnapshot::capture(name, symbol, heap))
                .collect::<Vec<_>>()
        };

        Snapshot {
            function_name: frame.map(|f| f.function_name.clone()),
            globals: collect(globals),
            locals: frame.map(|f| collect(&f.locals)).unwrap_or_default(),
            next_free: heap.next_free(),
        }
    }

    pub fn global(&self, name: &str) -> Option<&SymbolSnapshot> {
        self.globals.iter().find(|s| s.name == name)
    }

    pub fn local(&self, name: &str) -> Option<&SymbolSnapshot> {
        self.locals.iter().find(|s| s.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast::BaseType;

    #[test]
    fn test_capture_reads_values_and_strings() {
        let mut heap = Heap::new();
        let text = heap.allocate(3);
        heap.write_bytes(text, b"ok\0").unwrap();

        let mut globals = SymbolTable::new();
        let count = heap.allocate(4);
        heap.write_int(count, 42).unwrap();
        globals.declare("count".to_string(), Symbol::new(Type::new(BaseType::Int), count));
        let msg = heap.allocate(4);
        heap.write_int(msg, text.to_value()).unwrap();
        let char_ptr = Type::new(BaseType::Char).with_pointer();
        globals.declare("msg".to_string(), Symbol::new(char_ptr, msg));

        let snapshot = Snapshot::capture(&globals, None, &heap);

        assert_eq!(snapshot.function_name, None);
        assert!(snapshot.locals.is_empty());
        assert_eq!(snapshot.global("count").and_then(|s| s.value), Some(42));
        let msg = snapshot.global("msg").unwrap();
        assert_eq!(msg.size, 4);
        assert_eq!(msg.pointee.as_deref(), Some("ok"));
    }

    #[test]
    fn test_null_char_pointer_has_no_pointee() {
        let mut heap = Heap::new();
        let mut frame = StackFrame::new("main".to_string());
        let p = heap.allocate(4);
        frame
            .locals
            .declare("p".to_string(), Symbol::new(Type::new(BaseType::Char).with_pointer(), p));

        let snapshot = Snapshot::capture(&SymbolTable::new(), Some(&frame), &heap);

        assert_eq!(snapshot.function_name.as_deref(), Some("main"));
        let p = snapshot.local("p").unwrap();
        assert_eq!(p.value, Some(0));
        assert_eq!(p.pointee, None);
    }

    #[test]
    fn test_callbacks_forward() {
        let mut lines = Vec::new();
        let mut hits = 0;
        {
            let mut host = Callbacks {
                output: |line: &str| lines.push(line.to_string()),
                debug: |_: &Snapshot| hits += 1,
            };
            host.output("hello");
            host.breakpoint(&Snapshot::capture(&SymbolTable::new(), None, &Heap::new()));
        }
        assert_eq!(lines, vec!["hello"]);
        assert_eq!(hits, 1);
    }
}

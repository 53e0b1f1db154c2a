// Execution engine for the interpreter

use crate::interpreter::constants::{
    DEFAULT_MAX_CALL_DEPTH, INT_SIZE, STACK_GROW_SIZE, STACK_RED_ZONE,
};
use crate::interpreter::errors::RuntimeError;
use crate::memory::address::Address;
use crate::memory::heap::Heap;
use crate::memory::sizeof_type;
use crate::memory::stack::{Stack, StackFrame, Symbol, SymbolTable};
use crate::memory::strings::StringPool;
use crate::parser::ast::*;
use crate::snapshot::Host;
use rustc_hash::FxHashMap;
use std::rc::Rc;

/// Interpreter settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterpreterConfig {
    /// Maximum number of simultaneously active user function calls
    pub max_call_depth: usize,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        InterpreterConfig {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }
}

/// Outcome of executing a statement or statement list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ControlFlow {
    Normal,
    Return(i32),
}

/// The interpreter context: every piece of mutable execution state
pub struct Interpreter<H: Host> {
    /// Parsed program, consumed by static registration
    program: Program,

    /// Whether static registration has run
    registered: bool,

    /// Global initializers waiting to run, in declaration order
    pending_initializers: Vec<(Symbol, Box<AstNode>)>,

    /// Function definitions (name -> FunctionDef)
    pub(crate) function_defs: FxHashMap<String, Rc<FunctionDef>>,

    /// Global symbol table
    pub(crate) globals: SymbolTable,

    /// Call stack of local frames
    pub(crate) stack: Stack,

    /// Simulated memory
    pub(crate) heap: Heap,

    /// Interned string literals
    pub(crate) strings: StringPool,

    /// Output and debug sinks
    pub(crate) host: H,

    pub(crate) config: InterpreterConfig,

    /// Current source location being executed
    pub(crate) current_location: SourceLocation,
}

impl<H: Host> Interpreter<H> {
    /// Create a new interpreter with the parsed program
    pub fn new(program: Program, host: H) -> Self {
        Self::with_config(program, host, InterpreterConfig::default())
    }

    pub fn with_config(program: Program, host: H, config: InterpreterConfig) -> Self {
        Interpreter {
            program,
            registered: false,
            pending_initializers: Vec::new(),
            function_defs: FxHashMap::default(),
            globals: SymbolTable::new(),
            stack: Stack::new(),
            heap: Heap::new(),
            strings: StringPool::new(),
            host,
            config,
            current_location: SourceLocation::new(1, 1),
        }
    }

    /// Run the program: static registration, global initializers, then `main`
    ///
    /// Without a `main` nothing executes, not even global initializers.
    pub fn run(&mut self) -> Result<(), RuntimeError> {
        self.register()?;

        let main_fn = self
            .function_defs
            .get("main")
            .cloned()
            .ok_or(RuntimeError::NoMainFunction)?;

        self.run_global_initializers()?;

        log::debug!("executing main");
        self.emit("--- Executing main ---");

        if let ControlFlow::Return(value) = self.invoke(&main_fn, Vec::new(), main_fn.location)? {
            log::warn!("main returned {}, value ignored", value);
            self.emit(&format!("Warning: main returned {}, value ignored", value));
        }

        self.emit("--- Finished ---");
        Ok(())
    }

    /// Register functions and globals and run global initializers, without
    /// invoking `main`
    pub fn prepare(&mut self) -> Result<(), RuntimeError> {
        self.register()?;
        self.run_global_initializers()
    }

    /// Static registration: register functions, allocate globals and intern
    /// every reachable string literal
    ///
    /// Runs no user code. Idempotent.
    fn register(&mut self) -> Result<(), RuntimeError> {
        if self.registered {
            return Ok(());
        }
        self.registered = true;

        let program = std::mem::take(&mut self.program);

        for node in program.nodes {
            self.current_location = *node.location();
            match node {
                AstNode::FunctionDef(def) => {
                    for stmt in &def.body {
                        self.intern_literals(stmt)?;
                    }
                    if self.function_defs.insert(def.name.clone(), Rc::new(def)).is_some() {
                        log::debug!("function redefined, later definition wins");
                    }
                }
                AstNode::VarDecl {
                    name,
                    var_type,
                    init,
                    location,
                } => {
                    let symbol = self.declare_variable(&name, var_type, location)?;
                    if let Some(init) = init {
                        self.intern_literals(&init)?;
                        self.pending_initializers.push((symbol, init));
                    }
                }
                other => {
                    self.intern_literals(&other)?;
                    log::warn!(
                        "ignoring top-level statement at line {}",
                        other.location().line
                    );
                }
            }
        }

        log::debug!(
            "registered {} functions, {} globals, {} string literals",
            self.function_defs.len(),
            self.globals.len(),
            self.strings.len()
        );
        Ok(())
    }

    /// Evaluate global initializers in declaration order, each at most once
    fn run_global_initializers(&mut self) -> Result<(), RuntimeError> {
        for (symbol, init) in std::mem::take(&mut self.pending_initializers) {
            let value = self.evaluate_expr(&init)?;
            self.store_symbol(&symbol, value, *init.location())?;
        }
        Ok(())
    }

    /// Call a user function by name with already evaluated arguments
    ///
    /// Yields `None` for a `void` function that falls off its end, `0` for
    /// any other function that does.
    pub(crate) fn call_function(
        &mut self,
        name: &str,
        args: Vec<i32>,
        location: SourceLocation,
    ) -> Result<Option<i32>, RuntimeError> {
        let func = self
            .function_defs
            .get(name)
            .cloned()
            .ok_or_else(|| RuntimeError::UndefinedFunction {
                name: name.to_string(),
                location,
            })?;

        match self.invoke(&func, args, location)? {
            ControlFlow::Return(value) => Ok(Some(value)),
            ControlFlow::Normal if func.return_type.is_void() => Ok(None),
            ControlFlow::Normal => Ok(Some(0)),
        }
    }

    /// Bind parameters in a fresh frame and run the body
    ///
    /// The host stack is grown on demand, so the call-depth ceiling is what
    /// stops runaway recursion regardless of the calling thread's stack size.
    fn invoke(
        &mut self,
        func: &FunctionDef,
        args: Vec<i32>,
        location: SourceLocation,
    ) -> Result<ControlFlow, RuntimeError> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || {
            self.invoke_inner(func, args, location)
        })
    }

    fn invoke_inner(
        &mut self,
        func: &FunctionDef,
        args: Vec<i32>,
        location: SourceLocation,
    ) -> Result<ControlFlow, RuntimeError> {
        if args.len() != func.params.len() {
            return Err(RuntimeError::ArgumentCountMismatch {
                function: func.name.clone(),
                expected: func.params.len(),
                got: args.len(),
                location,
            });
        }

        if self.stack.depth() >= self.config.max_call_depth {
            return Err(RuntimeError::StackExhausted {
                depth: self.config.max_call_depth,
                location,
            });
        }

        let mut frame = StackFrame::new(func.name.clone());
        for (param, value) in func.params.iter().zip(args) {
            let address = self.heap.allocate(INT_SIZE);
            self.heap
                .write_int(address, value)
                .map_err(|e| RuntimeError::from_memory(e, param.location))?;
            frame
                .locals
                .declare(param.name.clone(), Symbol::new(Type::new(BaseType::Int), address));
        }

        log::trace!("call {} (depth {})", func.name, self.stack.depth() + 1);
        self.stack.push_frame(frame);
        let flow = self.execute_block(&func.body);
        self.stack.pop_frame();
        flow
    }

    /// Allocate storage for a variable and bind it in the current scope
    ///
    /// Binds into the innermost frame when a call is active, otherwise into
    /// the global table. Fresh storage reads as zero.
    pub(crate) fn declare_variable(
        &mut self,
        name: &str,
        var_type: Type,
        location: SourceLocation,
    ) -> Result<Symbol, RuntimeError> {
        let size = sizeof_type(&var_type).ok_or_else(|| RuntimeError::UnsizedType {
            type_name: var_type.to_string(),
            location,
        })?;

        let symbol = Symbol::new(var_type, self.heap.allocate(size));
        match self.stack.current_frame_mut() {
            Some(frame) => frame.locals.declare(name.to_string(), symbol),
            None => self.globals.declare(name.to_string(), symbol),
        }
        Ok(symbol)
    }

    /// Resolve a name: innermost frame first, then globals
    pub(crate) fn lookup(&self, name: &str, location: SourceLocation) -> Result<Symbol, RuntimeError> {
        self.stack
            .current_frame()
            .and_then(|frame| frame.locals.get(name))
            .or_else(|| self.globals.get(name))
            .copied()
            .ok_or_else(|| RuntimeError::UndefinedVariable {
                name: name.to_string(),
                location,
            })
    }

    /// Read a variable's value with its storage width
    pub(crate) fn load_symbol(&self, symbol: &Symbol, location: SourceLocation) -> Result<i32, RuntimeError> {
        if symbol.var_type.is_plain_char() {
            return Ok(i32::from(self.heap.read_byte(symbol.address)));
        }
        self.heap
            .read_int(symbol.address)
            .map_err(|e| RuntimeError::from_memory(e, location))
    }

    /// Write a variable's value with its storage width
    pub(crate) fn store_symbol(
        &mut self,
        symbol: &Symbol,
        value: i32,
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        let result = if symbol.var_type.is_plain_char() {
            self.heap.write_byte(symbol.address, value)
        } else {
            self.heap.write_int(symbol.address, value)
        };
        result.map_err(|e| RuntimeError::from_memory(e, location))
    }

    /// Convert a program value into an address
    pub(crate) fn to_address(&self, value: i32, location: SourceLocation) -> Result<Address, RuntimeError> {
        Address::from_value(value).ok_or_else(|| RuntimeError::InvalidAddress {
            address: i64::from(value),
            message: "negative pointer value".to_string(),
            location,
        })
    }

    /// Send one line to the output sink
    pub(crate) fn emit(&mut self, line: &str) {
        log::trace!("output: {}", line);
        self.host.output(line);
    }

    fn intern_literals(&mut self, node: &AstNode) -> Result<(), RuntimeError> {
        let mut literals = Vec::new();
        node.for_each_string_literal(&mut |s| literals.push(s.to_string()));

        let location = self.current_location;
        for text in literals {
            self.strings
                .intern(&mut self.heap, &text)
                .map_err(|e| RuntimeError::from_memory(e, location))?;
        }
        Ok(())
    }

    // ===== Accessors =====

    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    pub fn globals(&self) -> &SymbolTable {
        &self.globals
    }

    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    pub fn strings(&self) -> &StringPool {
        &self.strings
    }

    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    pub fn current_location(&self) -> SourceLocation {
        self.current_location
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parser::Parser;
    use crate::snapshot::MockTerminal;

    fn interpreter(source: &str) -> Interpreter<MockTerminal> {
        let program = Parser::new(source).unwrap().parse_program().unwrap();
        Interpreter::new(program, MockTerminal::new())
    }

    #[test]
    fn test_globals_allocated_in_order() {
        let mut interp = interpreter("int a; char c; int *p; int b;");
        interp.prepare().unwrap();

        let addr = |name: &str| interp.globals().get(name).unwrap().address.raw();
        assert_eq!(addr("a"), 1000);
        assert_eq!(addr("c"), 1004);
        assert_eq!(addr("p"), 1005);
        assert_eq!(addr("b"), 1009);
        assert_eq!(interp.heap().next_free(), Address::new(1013));
    }

    #[test]
    fn test_literals_interned_during_registration() {
        let mut interp = interpreter(
            r#"
            void f() { print("a"); if (1) { print("b"); } }
            void main() { print("a"); }
            "#,
        );
        interp.prepare().unwrap();

        assert_eq!(interp.strings().len(), 2);
        assert_eq!(interp.strings().get("a"), Some(Address::new(1000)));
        assert_eq!(interp.strings().get("b"), Some(Address::new(1002)));
        assert!(interp.host().lines.is_empty());
    }

    #[test]
    fn test_void_global_rejected() {
        let mut interp = interpreter("void v;");
        assert!(matches!(
            interp.prepare(),
            Err(RuntimeError::UnsizedType { ref type_name, .. }) if type_name == "void"
        ));
    }

    #[test]
    fn test_missing_main() {
        let mut interp = interpreter("int helper() { return 1; }");
        assert_eq!(interp.run(), Err(RuntimeError::NoMainFunction));
        assert!(interp.host().lines.is_empty());
    }

    #[test]
    fn test_missing_main_skips_global_initializers() {
        let mut interp = interpreter("int noisy() { print(77); return 1; } int g = noisy();");
        assert_eq!(interp.run(), Err(RuntimeError::NoMainFunction));
        assert!(interp.host().lines.is_empty());
        // Storage is allocated but never written
        let g = interp.globals().get("g").unwrap().address;
        assert_eq!(interp.heap().read_int(g), Ok(0));
    }

    #[test]
    fn test_initializers_run_once() {
        let mut interp = interpreter("int noisy() { print(5); return 1; } int g = noisy(); void main() { }");
        interp.prepare().unwrap();
        interp.run().unwrap();
        assert_eq!(interp.host().printed(), vec!["5"]);
    }

    #[test]
    fn test_call_depth_ceiling() {
        let program = Parser::new("int f(int n) { return f(n + 1); } void main() { f(0); }")
            .unwrap()
            .parse_program()
            .unwrap();
        let config = InterpreterConfig { max_call_depth: 16 };
        let mut interp = Interpreter::with_config(program, MockTerminal::new(), config);

        match interp.run() {
            Err(RuntimeError::StackExhausted { depth, .. }) => assert_eq!(depth, 16),
            other => panic!("Expected stack exhaustion, got {:?}", other),
        }
    }

    #[test]
    fn test_frames_popped_after_call() {
        let mut interp = interpreter("int id(int x) { return x; } void main() { print(id(3)); }");
        interp.run().unwrap();
        assert!(interp.stack().is_empty());
    }
}

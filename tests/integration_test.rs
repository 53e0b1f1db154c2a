// Integration tests for the interpreter

use bytescope::interpreter::engine::Interpreter;
use bytescope::interpreter::errors::RuntimeError;
use bytescope::memory::address::Address;
use bytescope::parser::parser::Parser;
use bytescope::snapshot::{Callbacks, MockTerminal};

fn run(source: &str) -> (Result<(), RuntimeError>, Interpreter<MockTerminal>) {
    let mut parser = Parser::new(source).expect("Parser creation failed");
    let program = parser.parse_program().expect("Parsing failed");

    let mut interpreter = Interpreter::new(program, MockTerminal::new());
    let result = interpreter.run();
    (result, interpreter)
}

#[test]
fn test_globals_and_string_print() {
    let source = r#"
        int val;
        char *msg;

        void main() {
            val = 123;
            msg = "Hello";
            print(val);
            print(msg);
        }
    "#;

    let (result, interpreter) = run(source);
    assert!(result.is_ok(), "Execution failed: {:?}", result);
    assert_eq!(
        interpreter.host().get_output(),
        &[
            "--- Executing main ---",
            "[INT OUTPUT] 123",
            "[STRING OUTPUT] Hello",
            "--- Finished ---",
        ]
    );
}

#[test]
fn test_return_from_if_skips_else() {
    let source = r#"
        int choose() {
            if (1 == 1) {
                return 5;
            } else {
                print(0);
                return 9;
            }
        }

        void main() {
            print(choose());
        }
    "#;

    let (result, interpreter) = run(source);
    assert!(result.is_ok(), "Execution failed: {:?}", result);
    assert_eq!(interpreter.host().printed(), vec!["5"]);
}

#[test]
fn test_consecutive_int_addresses() {
    let source = r#"
        int first;
        int second;

        void main() {
            print(&first);
            print(&second);
            print(&second - &first);
        }
    "#;

    let (result, interpreter) = run(source);
    assert!(result.is_ok(), "Execution failed: {:?}", result);
    assert_eq!(interpreter.host().printed(), vec!["1000", "1004", "4"]);
}

#[test]
fn test_debug_inside_call() {
    let source = r#"
        int total = 10;

        void inspect() {
            int x = 7;
            debug;
        }

        void main() {
            inspect();
        }
    "#;

    let (result, interpreter) = run(source);
    assert!(result.is_ok(), "Execution failed: {:?}", result);

    let term = interpreter.host();
    assert_eq!(term.breakpoints.len(), 1);
    let snapshot = &term.breakpoints[0];

    assert_eq!(snapshot.function_name.as_deref(), Some("inspect"));
    assert_eq!(snapshot.locals.len(), 1);
    let x = &snapshot.locals[0];
    assert_eq!(x.name, "x");
    assert!(x.address >= Address::START);
    assert_eq!(x.size, 4);
    assert_eq!(x.value, Some(7));

    assert_eq!(snapshot.globals.len(), 1);
    assert_eq!(snapshot.global("total").and_then(|s| s.value), Some(10));
}

#[test]
fn test_debug_through_callbacks() {
    let source = r#"
        char *greeting = "hey";
        void main() { debug; print(greeting); }
    "#;
    let program = Parser::new(source).unwrap().parse_program().unwrap();

    let mut lines = Vec::new();
    let mut seen = Vec::new();
    let host = Callbacks {
        output: |line: &str| lines.push(line.to_string()),
        debug: |snapshot: &bytescope::snapshot::Snapshot| {
            seen.push(snapshot.global("greeting").and_then(|s| s.pointee.clone()))
        },
    };

    let mut interpreter = Interpreter::new(program, host);
    interpreter.run().unwrap();
    drop(interpreter);

    assert_eq!(seen, vec![Some("hey".to_string())]);
    assert_eq!(
        lines,
        vec![
            "--- Executing main ---",
            ">>> Breakpoint <<<",
            "[STRING OUTPUT] hey",
            "--- Finished ---",
        ]
    );
}

#[test]
fn test_string_interning() {
    let source = r#"
        char *a;
        char *b;
        char *c;

        void main() {
            a = "same";
            b = "same";
            c = "other";
            print(a == b);
            print(a == c);
            print(c - a);
        }
    "#;

    let (result, interpreter) = run(source);
    assert!(result.is_ok(), "Execution failed: {:?}", result);
    // "same" plus terminator occupies five bytes
    assert_eq!(interpreter.host().printed(), vec!["1", "0", "5"]);
    assert_eq!(interpreter.strings().len(), 2);
}

#[test]
fn test_parameters_are_fresh_locals() {
    let source = r#"
        int bump(int n) {
            n = n + 1;
            return n;
        }

        void main() {
            int x = 1;
            print(bump(x));
            print(x);
        }
    "#;

    let (result, interpreter) = run(source);
    assert!(result.is_ok(), "Execution failed: {:?}", result);
    assert_eq!(interpreter.host().printed(), vec!["2", "1"]);
}

#[test]
fn test_each_call_gets_new_storage() {
    let source = r#"
        int locate(int n) {
            int local = n;
            print(&n);
            print(&local);
            return 0;
        }

        void main() {
            locate(1);
            locate(2);
        }
    "#;

    let (result, interpreter) = run(source);
    assert!(result.is_ok(), "Execution failed: {:?}", result);

    let addresses: Vec<i32> = interpreter
        .host()
        .printed()
        .iter()
        .map(|line| line.parse().unwrap())
        .collect();
    assert_eq!(addresses, vec![1000, 1004, 1008, 1012]);
    // Memory is never reclaimed, so the second call lands past the first
    assert!(addresses[2] > addresses[0]);
    assert!(addresses[3] > addresses[1]);
    assert_eq!(interpreter.heap().next_free(), Address::new(1016));
}

#[test]
fn test_pointer_out_parameter() {
    let source = r#"
        void set(int p, int value) {
            *p = value;
        }

        void main() {
            int target;
            set(&target, 42);
            print(target);
        }
    "#;

    let (result, interpreter) = run(source);
    assert!(result.is_ok(), "Execution failed: {:?}", result);
    assert_eq!(interpreter.host().printed(), vec!["42"]);
}

#[test]
fn test_recursion() {
    let source = r#"
        int fact(int n) {
            if (n < 2) {
                return 1;
            }
            return n * fact(n - 1);
        }

        void main() {
            print(fact(10));
        }
    "#;

    let (result, interpreter) = run(source);
    assert!(result.is_ok(), "Execution failed: {:?}", result);
    assert_eq!(interpreter.host().printed(), vec!["3628800"]);
}

#[test]
fn test_falling_off_non_void_function_yields_zero() {
    let source = r#"
        int nothing() { }
        void quiet() { }

        void main() {
            print(nothing());
            print(quiet());
        }
    "#;

    let (result, interpreter) = run(source);
    assert!(result.is_ok(), "Execution failed: {:?}", result);
    assert_eq!(interpreter.host().printed(), vec!["0", "0"]);
}

#[test]
fn test_main_return_value_is_ignored() {
    let (result, interpreter) = run("int main() { return 3; }");
    assert!(result.is_ok(), "Execution failed: {:?}", result);
    assert_eq!(
        interpreter.host().get_output(),
        &[
            "--- Executing main ---",
            "Warning: main returned 3, value ignored",
            "--- Finished ---",
        ]
    );
}

#[test]
fn test_global_initializers_run_before_main() {
    let source = r#"
        int base = 40;
        int derived = base + 2;
        char *name = "init";

        void main() {
            print(derived);
            print(name);
        }
    "#;

    let (result, interpreter) = run(source);
    assert!(result.is_ok(), "Execution failed: {:?}", result);
    assert_eq!(interpreter.host().printed(), vec!["42", "init"]);
}

#[test]
fn test_comments_ignored() {
    let source = r#"
        // line comment
        int x; /* block
                  comment */
        void main() {
            x = 2; // trailing
            print(x /* inline */ * 3);
        }
    "#;

    let (result, interpreter) = run(source);
    assert!(result.is_ok(), "Execution failed: {:?}", result);
    assert_eq!(interpreter.host().printed(), vec!["6"]);
}

//! Console host
//!
//! Program output goes to stdout, one line per output event. Breakpoints are
//! rendered to stderr as two symbol tables:
//!
//! ```text
//! >>> Global Symbols
//!   int count (Addr: 1000, Size: 4B) = 3
//!   char* msg (Addr: 1004, Size: 4B) = 1010 -> "Hello"
//! >>> Local Symbols: main()
//!   int x (Addr: 1016, Size: 4B) = 7
//! >>> Next free address: 1020
//! ```

use super::theme::DEFAULT_THEME;
use crate::snapshot::{Host, Snapshot, SymbolSnapshot};
use crossterm::style::{style, Color, Stylize};
use std::fmt::Display;

/// Applies theme colors, or nothing when color is off
#[derive(Debug, Clone, Copy)]
pub struct Painter {
    color: bool,
}

impl Painter {
    pub fn new(color: bool) -> Self {
        Painter { color }
    }

    pub fn paint(&self, text: impl Display, color: Color) -> String {
        if self.color {
            style(text).with(color).to_string()
        } else {
            text.to_string()
        }
    }

    /// Color an output-sink line by its kind
    pub fn output_line(&self, line: &str) -> String {
        let theme = &DEFAULT_THEME;
        if let Some(n) = line.strip_prefix("[INT OUTPUT] ") {
            format!("{} {}", self.paint("[INT OUTPUT]", theme.primary), self.paint(n, theme.number))
        } else if let Some(s) = line.strip_prefix("[STRING OUTPUT] ") {
            format!("{} {}", self.paint("[STRING OUTPUT]", theme.primary), self.paint(s, theme.string))
        } else if line.starts_with(">>>") {
            self.paint(line, theme.function)
        } else if line.starts_with("Warning:") {
            self.paint(line, theme.secondary)
        } else if line == "--- Finished ---" {
            self.paint(line, theme.success)
        } else if line.starts_with("---") {
            self.paint(line, theme.comment)
        } else {
            self.paint(line, theme.fg)
        }
    }

    /// `[ERROR] <message>`
    pub fn error_line(&self, message: impl Display) -> String {
        format!("{} {}", self.paint("[ERROR]", DEFAULT_THEME.error), message)
    }

    /// Render a breakpoint snapshot as the two symbol tables
    pub fn snapshot(&self, snapshot: &Snapshot) -> String {
        let theme = &DEFAULT_THEME;
        let mut out = String::new();

        out.push_str(&self.paint(">>> Global Symbols", theme.primary));
        out.push('\n');
        self.push_symbols(&mut out, &snapshot.globals);

        let header = match &snapshot.function_name {
            Some(name) => format!(
                "{} {}",
                self.paint(">>> Local Symbols:", theme.primary),
                self.paint(format!("{}()", name), theme.function)
            ),
            None => self.paint(">>> Local Symbols", theme.primary),
        };
        out.push_str(&header);
        out.push('\n');
        self.push_symbols(&mut out, &snapshot.locals);

        out.push_str(&format!(
            "{} {}\n",
            self.paint(">>> Next free address:", theme.primary),
            self.paint(snapshot.next_free, theme.address)
        ));
        out
    }

    fn push_symbols(&self, out: &mut String, symbols: &[SymbolSnapshot]) {
        if symbols.is_empty() {
            out.push_str(&format!("  {}\n", self.paint("(none)", DEFAULT_THEME.comment)));
            return;
        }
        for symbol in symbols {
            out.push_str("  ");
            out.push_str(&self.symbol(symbol));
            out.push('\n');
        }
    }

    fn symbol(&self, symbol: &SymbolSnapshot) -> String {
        let theme = &DEFAULT_THEME;
        let value = match symbol.value {
            Some(v) => self.paint(v, theme.number),
            None => self.paint("<unreadable>", theme.error),
        };
        let mut line = format!(
            "{} {} {} = {}",
            self.paint(symbol.var_type, theme.type_name),
            self.paint(&symbol.name, theme.fg),
            self.paint(
                format!("(Addr: {}, Size: {}B)", symbol.address, symbol.size),
                theme.address
            ),
            value
        );
        if let Some(text) = &symbol.pointee {
            line.push_str(" -> ");
            line.push_str(&self.paint(format!("\"{}\"", text), theme.string));
        }
        line
    }
}

/// Host that writes to the process's standard streams
pub struct ConsoleHost {
    painter: Painter,
}

impl ConsoleHost {
    pub fn new(color: bool) -> Self {
        ConsoleHost {
            painter: Painter::new(color),
        }
    }

    pub fn painter(&self) -> Painter {
        self.painter
    }
}

impl Host for ConsoleHost {
    fn output(&mut self, line: &str) {
        println!("{}", self.painter.output_line(line));
    }

    fn breakpoint(&mut self, snapshot: &Snapshot) {
        eprint!("{}", self.painter.snapshot(snapshot));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::address::Address;
    use crate::parser::ast::{BaseType, Type};

    fn symbol(name: &str, var_type: Type, addr: u32, value: Option<i32>) -> SymbolSnapshot {
        SymbolSnapshot {
            name: name.to_string(),
            var_type,
            address: Address::new(addr),
            size: 4,
            value,
            pointee: None,
        }
    }

    #[test]
    fn test_plain_snapshot_rendering() {
        let mut msg = symbol("msg", Type::new(BaseType::Char).with_pointer(), 1004, Some(1010));
        msg.pointee = Some("Hello".to_string());

        let snapshot = Snapshot {
            function_name: Some("main".to_string()),
            globals: vec![symbol("count", Type::new(BaseType::Int), 1000, Some(3)), msg],
            locals: Vec::new(),
            next_free: Address::new(1016),
        };

        let text = Painter::new(false).snapshot(&snapshot);
        assert_eq!(
            text,
            ">>> Global Symbols\n\
             \x20 int count (Addr: 1000, Size: 4B) = 3\n\
             \x20 char* msg (Addr: 1004, Size: 4B) = 1010 -> \"Hello\"\n\
             >>> Local Symbols: main()\n\
             \x20 (none)\n\
             >>> Next free address: 1016\n"
        );
    }

    #[test]
    fn test_plain_lines_unchanged() {
        let painter = Painter::new(false);
        assert_eq!(painter.output_line("[INT OUTPUT] 5"), "[INT OUTPUT] 5");
        assert_eq!(painter.output_line("--- Finished ---"), "--- Finished ---");
        assert_eq!(painter.error_line("boom"), "[ERROR] boom");
    }

    #[test]
    fn test_colored_lines_keep_text() {
        let painter = Painter::new(true);
        let line = painter.output_line("[STRING OUTPUT] hi");
        assert!(line.contains("[STRING OUTPUT]"));
        assert!(line.contains("hi"));
    }
}

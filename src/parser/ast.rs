// AST (Abstract Syntax Tree) definitions for the interpreter

use std::fmt;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Base types supported by the interpreter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseType {
    Int,
    Char,
    Void,
}

/// Declared type: a base type plus pointer depth
///
/// Displays the way declarations are written without spaces, e.g. `char*`
/// or `int**`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Type {
    pub base: BaseType,
    pub pointer_depth: usize, // 0 = not pointer, 1 = *, 2 = **, etc.
}

impl Type {
    pub fn new(base: BaseType) -> Self {
        Type {
            base,
            pointer_depth: 0,
        }
    }

    pub fn with_pointer(mut self) -> Self {
        self.pointer_depth += 1;
        self
    }

    pub fn is_pointer(&self) -> bool {
        self.pointer_depth > 0
    }

    /// `char` with no indirection, stored in a single byte
    pub fn is_plain_char(&self) -> bool {
        self.base == BaseType::Char && self.pointer_depth == 0
    }

    /// True for `char*`, `char**`, ... (printed as strings)
    pub fn is_char_pointer(&self) -> bool {
        self.base == BaseType::Char && self.pointer_depth > 0
    }

    pub fn is_void(&self) -> bool {
        self.base == BaseType::Void && self.pointer_depth == 0
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let base = match self.base {
            BaseType::Int => "int",
            BaseType::Char => "char",
            BaseType::Void => "void",
        };
        write!(f, "{}{}", base, "*".repeat(self.pointer_depth))
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    // Comparison
    Eq,
    Ne,
    Lt,
    Gt,
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Deref,  // *x
    AddrOf, // &x
}

/// Function parameter
///
/// Parameters are always bound as 4-byte `int` locals, so only the name is
/// kept.
#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub location: SourceLocation,
}

/// Function definition, shared between the AST and the function table
#[derive(Debug, Clone)]
pub struct FunctionDef {
    pub name: String,
    pub params: Vec<Param>,
    pub body: Vec<AstNode>,
    pub return_type: Type,
    pub location: SourceLocation,
}

/// AST nodes representing declarations, statements and expressions
#[derive(Debug, Clone)]
pub enum AstNode {
    // Top-level declarations
    FunctionDef(FunctionDef),

    // Statements
    VarDecl {
        name: String,
        var_type: Type,
        init: Option<Box<AstNode>>,
        location: SourceLocation,
    },
    Assignment {
        lhs: Box<AstNode>,
        rhs: Box<AstNode>,
        location: SourceLocation,
    },
    Return {
        expr: Box<AstNode>,
        location: SourceLocation,
    },
    If {
        condition: Box<AstNode>,
        then_branch: Vec<AstNode>,
        else_branch: Option<Vec<AstNode>>,
        location: SourceLocation,
    },
    Print {
        expr: Box<AstNode>,
        location: SourceLocation,
    },
    Debug {
        location: SourceLocation,
    },

    // Expressions
    IntLiteral(i32, SourceLocation),
    StringLiteral(String, SourceLocation),
    Variable(String, SourceLocation),
    BinaryOp {
        op: BinOp,
        left: Box<AstNode>,
        right: Box<AstNode>,
        location: SourceLocation,
    },
    UnaryOp {
        op: UnOp,
        operand: Box<AstNode>,
        location: SourceLocation,
    },
    FunctionCall {
        name: String,
        args: Vec<AstNode>,
        location: SourceLocation,
    },
}

impl AstNode {
    /// Get the source location of this node
    pub fn location(&self) -> &SourceLocation {
        match self {
            AstNode::FunctionDef(def) => &def.location,
            AstNode::VarDecl { location, .. } => location,
            AstNode::Assignment { location, .. } => location,
            AstNode::Return { location, .. } => location,
            AstNode::If { location, .. } => location,
            AstNode::Print { location, .. } => location,
            AstNode::Debug { location } => location,
            AstNode::IntLiteral(_, loc) => loc,
            AstNode::StringLiteral(_, loc) => loc,
            AstNode::Variable(_, loc) => loc,
            AstNode::BinaryOp { location, .. } => location,
            AstNode::UnaryOp { location, .. } => location,
            AstNode::FunctionCall { location, .. } => location,
        }
    }

    /// Visit every string literal reachable from this node, in source order
    pub fn for_each_string_literal<F: FnMut(&str)>(&self, f: &mut F) {
        match self {
            AstNode::StringLiteral(s, _) => f(s),
            AstNode::FunctionDef(def) => {
                for stmt in &def.body {
                    stmt.for_each_string_literal(f);
                }
            }
            AstNode::VarDecl { init, .. } => {
                if let Some(init) = init {
                    init.for_each_string_literal(f);
                }
            }
            AstNode::Assignment { lhs, rhs, .. } => {
                lhs.for_each_string_literal(f);
                rhs.for_each_string_literal(f);
            }
            AstNode::Return { expr, .. } | AstNode::Print { expr, .. } => {
                expr.for_each_string_literal(f)
            }
            AstNode::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                condition.for_each_string_literal(f);
                for stmt in then_branch {
                    stmt.for_each_string_literal(f);
                }
                for stmt in else_branch.iter().flatten() {
                    stmt.for_each_string_literal(f);
                }
            }
            AstNode::BinaryOp { left, right, .. } => {
                left.for_each_string_literal(f);
                right.for_each_string_literal(f);
            }
            AstNode::UnaryOp { operand, .. } => operand.for_each_string_literal(f),
            AstNode::FunctionCall { args, .. } => {
                for arg in args {
                    arg.for_each_string_literal(f);
                }
            }
            AstNode::Debug { .. } | AstNode::IntLiteral(..) | AstNode::Variable(..) => {}
        }
    }
}

/// Top-level program structure
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub nodes: Vec<AstNode>, // All top-level declarations (FunctionDef, VarDecl)
}

impl Program {
    pub fn new() -> Self {
        Program::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_display() {
        let t = Type::new(BaseType::Char).with_pointer();
        assert_eq!(t.to_string(), "char*");
        assert_eq!(Type::new(BaseType::Int).with_pointer().with_pointer().to_string(), "int**");
        assert!(t.is_char_pointer());
        assert!(!t.is_plain_char());
    }

    #[test]
    fn test_string_literal_walk() {
        let loc = SourceLocation::new(1, 1);
        let node = AstNode::If {
            condition: Box::new(AstNode::IntLiteral(1, loc)),
            then_branch: vec![AstNode::Print {
                expr: Box::new(AstNode::StringLiteral("a".to_string(), loc)),
                location: loc,
            }],
            else_branch: Some(vec![AstNode::Print {
                expr: Box::new(AstNode::StringLiteral("b".to_string(), loc)),
                location: loc,
            }]),
            location: loc,
        };

        let mut seen = Vec::new();
        node.for_each_string_literal(&mut |s| seen.push(s.to_string()));
        assert_eq!(seen, vec!["a", "b"]);
    }
}

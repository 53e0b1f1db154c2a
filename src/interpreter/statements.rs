//! Statement execution
//!
//! Every statement runs through [`Interpreter::execute_statement`], which
//! reports [`ControlFlow::Return`] when a `return` fires. Statement lists
//! stop at the first such signal and hand it outward unchanged, so a
//! `return` nested in any number of `if` blocks unwinds straight to the
//! call boundary in [`Interpreter::call_function`].
//!
//! `if` blocks share the enclosing frame: a declaration inside a branch
//! lands in the current function's locals.

use crate::interpreter::engine::{ControlFlow, Interpreter};
use crate::interpreter::errors::RuntimeError;
use crate::parser::ast::*;
use crate::snapshot::Host;

impl<H: Host> Interpreter<H> {
    /// Execute statements in order until one returns
    pub(crate) fn execute_block(&mut self, stmts: &[AstNode]) -> Result<ControlFlow, RuntimeError> {
        for stmt in stmts {
            if let ControlFlow::Return(value) = self.execute_statement(stmt)? {
                return Ok(ControlFlow::Return(value));
            }
        }
        Ok(ControlFlow::Normal)
    }

    pub(crate) fn execute_statement(&mut self, stmt: &AstNode) -> Result<ControlFlow, RuntimeError> {
        self.current_location = *stmt.location();

        match stmt {
            AstNode::VarDecl {
                name,
                var_type,
                init,
                location,
            } => {
                self.execute_var_decl(name, *var_type, init.as_deref(), *location)?;
                Ok(ControlFlow::Normal)
            }

            AstNode::Assignment { lhs, rhs, location } => {
                self.execute_assignment(lhs, rhs, *location)?;
                Ok(ControlFlow::Normal)
            }

            AstNode::Return { expr, .. } => {
                let value = self.evaluate_expr(expr)?;
                Ok(ControlFlow::Return(value))
            }

            AstNode::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                if self.evaluate_expr(condition)? != 0 {
                    self.execute_block(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.execute_block(else_branch)
                } else {
                    Ok(ControlFlow::Normal)
                }
            }

            AstNode::Print { expr, .. } => {
                self.builtin_print(expr)?;
                Ok(ControlFlow::Normal)
            }

            AstNode::Debug { .. } => {
                self.builtin_debug();
                Ok(ControlFlow::Normal)
            }

            AstNode::FunctionDef(def) => Err(RuntimeError::UnsupportedOperation {
                message: format!("Nested function definition '{}'", def.name),
                location: def.location,
            }),

            // Expression statement; the value is discarded
            _ => {
                self.evaluate_expr(stmt)?;
                Ok(ControlFlow::Normal)
            }
        }
    }

    fn execute_var_decl(
        &mut self,
        name: &str,
        var_type: Type,
        init: Option<&AstNode>,
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        let symbol = self.declare_variable(name, var_type, location)?;

        if let Some(init) = init {
            let value = self.evaluate_expr(init)?;
            self.store_symbol(&symbol, value, *init.location())?;
        }
        Ok(())
    }

    /// Assign to `name` or `*expr`; the right-hand side is evaluated first
    fn execute_assignment(
        &mut self,
        lhs: &AstNode,
        rhs: &AstNode,
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        let value = self.evaluate_expr(rhs)?;

        match lhs {
            AstNode::Variable(name, loc) => {
                let symbol = self.lookup(name, *loc)?;
                self.store_symbol(&symbol, value, location)
            }
            AstNode::UnaryOp {
                op: UnOp::Deref,
                operand,
                location: deref_loc,
            } => {
                let target = self.evaluate_expr(operand)?;
                let address = self.to_address(target, *deref_loc)?;
                self.heap
                    .write_int(address, value)
                    .map_err(|e| RuntimeError::from_memory(e, location))
            }
            _ => Err(RuntimeError::InvalidLvalue { location }),
        }
    }
}

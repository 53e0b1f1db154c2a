//! Expression evaluation
//!
//! Every expression produces a plain `i32`. Pointers are integers holding an
//! address, comparisons produce `1` or `0`, and there is no runtime type tag.
//!
//! # Arithmetic
//!
//! `+ - *` wrap on overflow. `/` truncates toward zero, fails on a zero
//! divisor, and wraps for `i32::MIN / -1`.

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::parser::ast::*;
use crate::snapshot::Host;

impl<H: Host> Interpreter<H> {
    pub(crate) fn evaluate_expr(&mut self, expr: &AstNode) -> Result<i32, RuntimeError> {
        match expr {
            AstNode::IntLiteral(n, _) => Ok(*n),

            AstNode::StringLiteral(s, loc) => {
                // Interned during registration; interning again is a lookup
                let addr = self
                    .strings
                    .intern(&mut self.heap, s)
                    .map_err(|e| RuntimeError::from_memory(e, *loc))?;
                Ok(addr.to_value())
            }

            AstNode::Variable(name, loc) => {
                let symbol = self.lookup(name, *loc)?;
                self.load_symbol(&symbol, *loc)
            }

            AstNode::BinaryOp {
                op,
                left,
                right,
                location,
            } => {
                let lhs = self.evaluate_expr(left)?;
                let rhs = self.evaluate_expr(right)?;
                Self::evaluate_binary_op(*op, lhs, rhs, *location)
            }

            AstNode::UnaryOp {
                op,
                operand,
                location,
            } => self.evaluate_unary_op(*op, operand, *location),

            AstNode::FunctionCall {
                name,
                args,
                location,
            } => {
                // Arguments are evaluated before the callee is looked up
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    values.push(self.evaluate_expr(arg)?);
                }
                // A void call used as a value reads as 0
                Ok(self.call_function(name, values, *location)?.unwrap_or(0))
            }

            other => Err(RuntimeError::UnsupportedOperation {
                message: "Statement used as an expression".to_string(),
                location: *other.location(),
            }),
        }
    }

    fn evaluate_binary_op(
        op: BinOp,
        lhs: i32,
        rhs: i32,
        location: SourceLocation,
    ) -> Result<i32, RuntimeError> {
        let result = match op {
            BinOp::Add => lhs.wrapping_add(rhs),
            BinOp::Sub => lhs.wrapping_sub(rhs),
            BinOp::Mul => lhs.wrapping_mul(rhs),
            BinOp::Div => {
                if rhs == 0 {
                    return Err(RuntimeError::DivisionByZero { location });
                }
                lhs.wrapping_div(rhs)
            }
            BinOp::Eq => i32::from(lhs == rhs),
            BinOp::Ne => i32::from(lhs != rhs),
            BinOp::Lt => i32::from(lhs < rhs),
            BinOp::Gt => i32::from(lhs > rhs),
        };
        Ok(result)
    }

    fn evaluate_unary_op(
        &mut self,
        op: UnOp,
        operand: &AstNode,
        location: SourceLocation,
    ) -> Result<i32, RuntimeError> {
        match op {
            UnOp::AddrOf => match operand {
                AstNode::Variable(name, loc) => Ok(self.lookup(name, *loc)?.address.to_value()),
                _ => Err(RuntimeError::InvalidAddressOf { location }),
            },
            UnOp::Deref => {
                let value = self.evaluate_expr(operand)?;
                let address = self.to_address(value, location)?;
                self.heap
                    .read_int(address)
                    .map_err(|e| RuntimeError::from_memory(e, location))
            }
        }
    }
}

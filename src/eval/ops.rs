//! Operator application.
//!
//! Pure numeric semantics: comparisons and logical operators yield
//! 1.0/0.0, `Mod` truncates both operands before taking the remainder,
//! and division or modulo by zero is an error rather than an infinity
//! or NaN.

use crate::stream::Operator;
use super::types::{EvalError, EvalResult};

#[inline]
fn truth(condition: bool) -> f64 {
    if condition {
        1.0
    } else {
        0.0
    }
}

/// Apply a binary operator to its operands.
pub(super) fn apply_binary(op: Operator, lhs: f64, rhs: f64) -> EvalResult<f64> {
    let value = match op {
        Operator::And => truth(lhs != 0.0 && rhs != 0.0),
        Operator::Or => truth(lhs != 0.0 || rhs != 0.0),
        Operator::Le => truth(lhs <= rhs),
        Operator::Lt => truth(lhs < rhs),
        Operator::Ge => truth(lhs >= rhs),
        Operator::Gt => truth(lhs > rhs),
        Operator::Eq => truth(lhs == rhs),
        Operator::Ne => truth(lhs != rhs),
        Operator::Add => lhs + rhs,
        Operator::Sub => lhs - rhs,
        Operator::Mul => lhs * rhs,
        Operator::Div => {
            if rhs == 0.0 {
                return Err(EvalError::DivideByZero);
            }
            lhs / rhs
        }
        Operator::Mod => {
            let (dividend, modulus) = (lhs.trunc(), rhs.trunc());
            if modulus == 0.0 {
                return Err(EvalError::DivideByZero);
            }
            dividend % modulus
        }
        // Unary; routed through apply_unary by the step loop.
        Operator::Negate => return Err(EvalError::Syntax),
    };
    Ok(value)
}

/// Apply the unary operator.
#[inline]
pub(super) fn apply_unary(operand: f64) -> f64 {
    -operand
}

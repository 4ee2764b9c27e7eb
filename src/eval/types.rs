//! Type definitions for the evaluator.
//!
//! This module contains the core types used throughout evaluation:
//! - EvalError: error codes returned to the host
//! - EvalConfig: evaluator configuration options
//! - Slot: one evaluation-stack entry

use crate::pool::{PoolToken, DEFAULT_POOL_CAPACITY};

/// Result of an evaluation step or call
pub type EvalResult<T> = Result<T, EvalError>;

/// Expressions longer than this are rejected before tokenization.
pub const MAX_EXPR_LEN: usize = 512;

/// Inline capacity of the evaluation stack before it spills to the heap.
pub const STACK_INLINE_DEPTH: usize = 16;

/// Errors reported to the host from `evaluate`
///
/// Every error is terminal for the current call; the host decides
/// whether a failed conditional counts as false, skips the line, or
/// logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalError {
    /// Input exceeds the expression length cap
    OutOfMemory,
    /// Malformed postfix stream: an operator found too few operands
    StackUnderflow,
    /// Evaluation stack exceeded the configured bound
    StackOverflow,
    /// Division or modulo by zero
    DivideByZero,
    /// Stream left zero or more than one final result, or a command
    /// invocation failed
    Syntax,
    /// Execution context rejected by the host
    BadObjectPointer,
}

impl std::fmt::Display for EvalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutOfMemory => write!(f, "Expression exceeds length cap"),
            Self::StackUnderflow => write!(f, "Stack underflow"),
            Self::StackOverflow => write!(f, "Stack overflow"),
            Self::DivideByZero => write!(f, "Division by zero"),
            Self::Syntax => write!(f, "Syntax error"),
            Self::BadObjectPointer => write!(f, "Bad object pointer"),
        }
    }
}

impl std::error::Error for EvalError {}

/// Configuration for the evaluator
#[derive(Debug, Clone)]
pub struct EvalConfig {
    /// Maximum expression bytecode length accepted
    pub max_expr_len: usize,
    /// Maximum evaluation stack depth
    pub max_stack: usize,
    /// Transient token pool slab capacity
    pub pool_capacity: usize,
    /// Enable per-token tracing
    pub trace: bool,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            max_expr_len: MAX_EXPR_LEN,
            max_stack: 256,
            pool_capacity: DEFAULT_POOL_CAPACITY,
            trace: false,
        }
    }
}

/// One evaluation-stack entry.
///
/// Stream operands are referenced by index so the cached stream is never
/// copied; operator and command results are transients owned by the
/// stack and released the moment they are consumed.
#[derive(Debug)]
pub enum Slot {
    /// Index of an `Operand` token in the stream being evaluated
    Stream(usize),
    /// Transient result token from the pool
    Transient(PoolToken),
}

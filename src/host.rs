//! External collaborator interface
//!
//! The evaluator does not understand the script engine's bytecode
//! encoding, literal syntax, or command system. All three concerns are
//! delegated to the host through the [`Host`] trait: lexical-unit
//! extraction, numeric-literal classification, and command invocation.

use crate::eval::types::EvalResult;
use crate::stream::Operator;

/// One lexical unit pulled out of the expression bytecode.
#[derive(Debug, Clone)]
pub struct RawUnit {
    /// Bytes consumed from the cursor by this unit. Must be at least 1;
    /// exhaustion is signalled by returning `None` from
    /// [`Host::next_unit`].
    pub consumed: usize,
    /// Classified payload
    pub kind: RawUnitKind,
}

/// Payload of a lexical unit.
#[derive(Debug, Clone)]
pub enum RawUnitKind {
    /// The unit's code denotes an operator.
    Operator(Operator),
    /// The unit is an operand; the text still has to be classified as a
    /// numeric literal or a command reference.
    Operand(String),
}

/// The host script engine, seen from the evaluator.
///
/// One implementation is expected per embedding. The associated
/// `Context` is the execution context threaded through command
/// invocations (calling object, containing object, owning script,
/// variable scope); the evaluator treats it as opaque.
pub trait Host {
    /// Execution context handed to [`Host::invoke`].
    type Context;

    /// Extract the next lexical unit starting at `cursor` within `code`.
    ///
    /// Returns `Ok(None)` when the bytecode is exhausted. A fatal
    /// extractor error aborts tokenization and is propagated to the
    /// `evaluate` caller unchanged.
    fn next_unit(&self, code: &[u8], cursor: usize) -> EvalResult<Option<RawUnit>>;

    /// Whether `text` is an integer literal.
    fn is_integer(&self, text: &str) -> bool;

    /// Whether `text` is a floating-point literal.
    fn is_float(&self, text: &str) -> bool;

    /// Invoke the command referenced at `offset` within the expression
    /// bytecode, returning its numeric result or `None` on failure.
    ///
    /// May have arbitrary side effects on game state. The evaluator
    /// guarantees it is never called for tokens skipped by
    /// short-circuiting.
    fn invoke(&self, offset: usize, ctx: &mut Self::Context) -> Option<f64>;
}

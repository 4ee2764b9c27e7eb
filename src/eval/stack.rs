//! Stack operations for the evaluator.
//!
//! The evaluation stack holds slots that either point back into the
//! cached stream (literal operands) or own a pooled transient. Every
//! path that removes a transient slot releases it back to the pool,
//! including the error drain.

use tracing::trace;

use crate::host::Host;
use crate::stream::{ShortCircuit, Token, TokenStream};
use super::types::{EvalError, EvalResult, Slot};
use super::Evaluator;

impl<H: Host> Evaluator<H> {
    /// Push a slot, releasing it instead if the stack is at its bound.
    #[inline]
    pub(super) fn push_slot(&mut self, slot: Slot) -> EvalResult<()> {
        if self.stack.len() >= self.config.max_stack {
            self.release_slot(slot);
            return Err(EvalError::StackOverflow);
        }
        self.stack.push(slot);
        Ok(())
    }

    #[inline]
    pub(super) fn pop_slot(&mut self) -> EvalResult<Slot> {
        self.stack.pop().ok_or(EvalError::StackUnderflow)
    }

    /// Return a transient slot's token to the pool; stream slots are
    /// borrowed from the cache and need no bookkeeping.
    #[inline]
    pub(super) fn release_slot(&mut self, slot: Slot) {
        if let Slot::Transient(handle) = slot {
            self.pool.release(handle);
        }
    }

    /// Token behind a slot.
    #[inline]
    pub(super) fn slot_token<'a>(&'a self, stream: &'a TokenStream, slot: &'a Slot) -> &'a Token {
        match slot {
            Slot::Stream(index) => &stream[*index],
            Slot::Transient(handle) => self.pool.get(handle),
        }
    }

    /// Numeric value and short-circuit metadata behind a slot.
    ///
    /// Stack slots only ever hold operand tokens, so a missing value is
    /// a malformed stream surfaced as a syntax error by the caller.
    pub(super) fn slot_parts(&self, stream: &TokenStream, slot: &Slot) -> (f64, ShortCircuit) {
        let token = self.slot_token(stream, slot);
        (token.value().unwrap_or(0.0), token.short_circuit())
    }

    /// Collapse `cleanup` stack entries into the surviving top after a
    /// short-circuit triggers: the top keeps its place as the chain's
    /// result, everything else consumed by the skipped operator is
    /// released.
    pub(super) fn collapse(&mut self, cleanup: u8) -> EvalResult<()> {
        debug_assert!(cleanup >= 1, "short-circuit cleanup is always 1 or 2");
        let top = self.pop_slot()?;
        for _ in 1..cleanup {
            let below = match self.pop_slot() {
                Ok(slot) => slot,
                Err(err) => {
                    self.release_slot(top);
                    return Err(err);
                }
            };
            self.release_slot(below);
        }
        // Re-pushing what was just popped cannot exceed the bound.
        self.stack.push(top);
        Ok(())
    }

    /// Release every remaining slot. Runs after any error so the stack
    /// is empty and the pool idle before `evaluate` returns.
    pub(super) fn drain_stack(&mut self) {
        if !self.stack.is_empty() {
            trace!(target: "fastcond::eval::stack", depth = self.stack.len(), "draining stack");
        }
        while let Some(slot) = self.stack.pop() {
            self.release_slot(slot);
        }
    }
}

//! Conditional-expression evaluator
//!
//! The evaluator walks an analyzed token stream with a bounded operand
//! stack, calling out to the host for command references and honoring
//! the precomputed short-circuit table so skipped commands are never
//! invoked.
//!
//! This module is organized into submodules by functionality:
//! - `types`: core type definitions (EvalError, EvalConfig, Slot)
//! - `stack`: stack manipulation and the short-circuit collapse
//! - `ops`: numeric operator semantics
//!
//! An [`Evaluator`] owns all per-thread mutable state — the stream
//! cache, the transient token pool, and the evaluation stack — so one
//! instance per host thread gives lock-free operation; instances must
//! not be shared between threads.

use std::rc::Rc;

use smallvec::SmallVec;
use tracing::trace;

use crate::analyzer::analyze;
use crate::cache::{CacheStats, StreamCache, StreamKey};
use crate::host::Host;
use crate::pool::{PoolStats, TokenPool};
use crate::stream::{ShortCircuitKind, Token, TokenKind, TokenStream};
use crate::tokenizer::tokenize;

// === Submodules ===

mod ops;
mod stack;
pub mod types;


// === Re-exports ===

pub use types::{EvalConfig, EvalError, EvalResult, Slot, MAX_EXPR_LEN, STACK_INLINE_DEPTH};

use ops::{apply_binary, apply_unary};

// === Evaluator Struct ===

/// Per-thread conditional-expression evaluator.
#[derive(Debug)]
pub struct Evaluator<H: Host> {
    /// External collaborators: extractor, classifier, command dispatch
    host: H,

    /// Analyzed streams keyed by bytecode location
    cache: StreamCache,

    /// Slab allocator for transient result tokens
    pool: TokenPool,

    /// Operand stack, inline up to `STACK_INLINE_DEPTH` entries
    stack: SmallVec<[Slot; STACK_INLINE_DEPTH]>,

    /// Evaluator configuration
    config: EvalConfig,
}

impl<H: Host> Evaluator<H> {
    // === Constructors ===

    /// Create an evaluator with the default configuration.
    pub fn new(host: H) -> Self {
        Self::with_config(host, EvalConfig::default())
    }

    /// Create an evaluator with a custom configuration.
    pub fn with_config(host: H, config: EvalConfig) -> Self {
        Evaluator {
            host,
            cache: StreamCache::new(),
            pool: TokenPool::new(config.pool_capacity),
            stack: SmallVec::new(),
            config,
        }
    }

    // === Accessors ===

    /// The host this evaluator calls out to.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Stream cache counters (for diagnostics and tests).
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Number of cached streams on this evaluator's thread.
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Token pool occupancy counters (for diagnostics and tests).
    pub fn pool_stats(&self) -> PoolStats {
        self.pool.stats()
    }

    // === Entry Point ===

    /// Evaluate the expression bytecode at `code`, returning its numeric
    /// result.
    ///
    /// The stream for a given bytecode location is tokenized and
    /// analyzed on first sight and reused from the cache afterwards; the
    /// cache key is the location of the bytes, not their content. Any
    /// error aborts the call, with the stack drained and every transient
    /// returned to the pool before this returns.
    pub fn evaluate(&mut self, code: &[u8], ctx: &mut H::Context) -> EvalResult<f64> {
        if code.len() > self.config.max_expr_len {
            return Err(EvalError::OutOfMemory);
        }
        let stream = self.stream_for(code)?;
        self.run(&stream, ctx)
    }

    /// Fetch or build the analyzed stream for a bytecode location.
    fn stream_for(&mut self, code: &[u8]) -> EvalResult<Rc<TokenStream>> {
        let key = code.as_ptr() as StreamKey;
        if let Some(stream) = self.cache.lookup(key) {
            return Ok(stream);
        }

        // Miss: tokenizer and analyzer run exactly once for this key.
        // A failed build is not stored, so the next call retries.
        let mut stream = tokenize(&self.host, code)?;
        analyze(&mut stream);
        let stream = Rc::new(stream);
        self.cache.store(key, Rc::clone(&stream));
        Ok(stream)
    }

    // === Execution ===

    /// Run one evaluation over an analyzed stream.
    pub(crate) fn run(&mut self, stream: &TokenStream, ctx: &mut H::Context) -> EvalResult<f64> {
        debug_assert!(self.stack.is_empty(), "stack must be empty between evaluations");
        let outcome = self.run_inner(stream, ctx);
        if outcome.is_err() {
            self.drain_stack();
        }
        debug_assert!(self.stack.is_empty());
        outcome
    }

    fn run_inner(&mut self, stream: &TokenStream, ctx: &mut H::Context) -> EvalResult<f64> {
        let mut index = 0usize;

        while index < stream.len() {
            let token = &stream[index];
            if self.config.trace {
                trace!(
                    target: "fastcond::eval::step",
                    index,
                    token = ?token.kind(),
                    stack_depth = self.stack.len()
                );
            }

            match token.kind() {
                TokenKind::Operand(_) => {
                    self.push_slot(Slot::Stream(index))?;
                }

                TokenKind::CommandRef(offset) => {
                    // Side effects happen here; short-circuited tokens
                    // never reach this call.
                    let value = self.host.invoke(offset, ctx).ok_or(EvalError::Syntax)?;
                    let handle = self
                        .pool
                        .alloc(Token::transient(value, token.short_circuit()));
                    self.push_slot(Slot::Transient(handle))?;
                }

                TokenKind::Operator(op) if op.is_unary() => {
                    let operand = self.pop_slot()?;
                    let (value, _) = self.slot_parts(stream, &operand);
                    self.release_slot(operand);

                    let handle = self
                        .pool
                        .alloc(Token::transient(apply_unary(value), token.short_circuit()));
                    self.push_slot(Slot::Transient(handle))?;
                }

                TokenKind::Operator(op) => {
                    let rhs = self.pop_slot()?;
                    let lhs = match self.pop_slot() {
                        Ok(slot) => slot,
                        Err(err) => {
                            self.release_slot(rhs);
                            return Err(err);
                        }
                    };
                    let (rhs_value, _) = self.slot_parts(stream, &rhs);
                    let (lhs_value, _) = self.slot_parts(stream, &lhs);
                    let result = apply_binary(op, lhs_value, rhs_value);
                    self.release_slot(lhs);
                    self.release_slot(rhs);

                    let handle = self
                        .pool
                        .alloc(Token::transient(result?, token.short_circuit()));
                    self.push_slot(Slot::Transient(handle))?;
                }
            }

            // Every branch above pushed a value; its metadata decides
            // whether the enclosing logical chain is already settled.
            if let Some(top) = self.stack.last() {
                let (value, sc) = self.slot_parts(stream, top);
                let triggered = match sc.kind {
                    ShortCircuitKind::And => value == 0.0,
                    ShortCircuitKind::Or => value != 0.0,
                    ShortCircuitKind::None => false,
                };
                if triggered {
                    if self.config.trace {
                        trace!(
                            target: "fastcond::eval::step",
                            index,
                            kind = ?sc.kind,
                            distance = sc.distance,
                            cleanup = sc.cleanup,
                            "short-circuit"
                        );
                    }
                    // Jump lands on the furthest ancestor; the increment
                    // below steps past it, so nothing in the chain runs.
                    index += sc.distance;
                    self.collapse(sc.cleanup)?;
                }
            }

            index += 1;
        }

        if self.stack.len() != 1 {
            return Err(EvalError::Syntax);
        }
        let top = self.pop_slot()?;
        let (value, _) = self.slot_parts(stream, &top);
        self.release_slot(top);
        Ok(value)
    }
}

//! Fastcond - cached short-circuit evaluator for script conditionals
//!
//! This library evaluates the boolean/arithmetic sub-expressions of an
//! embedded game-script language (the kind used in conditional lines
//! such as `if X > Y && Z`). The host engine runs these expressions for
//! every active script, potentially every simulation tick, so the
//! pipeline is built around three rules: parse each distinct expression
//! exactly once, allocate nothing on the hot path, and never evaluate an
//! operand whose enclosing `&&`/`||` chain is already settled.
//!
//! # Architecture
//!
//! Evaluation runs in two stages:
//!
//! 1. **Stream construction** (`tokenizer` + `analyzer` modules, once
//!    per bytecode location)
//!    - Pulls lexical units from the host extractor
//!    - Classifies literals through the host classifier, everything
//!      else becomes a command reference by byte offset
//!    - Stamps every token with its short-circuit jump table entry
//!    - The result is frozen and memoized by the per-thread `cache`
//!
//! 2. **Evaluation** (`eval` module, every call)
//!    - Walks the postfix stream with a bounded operand stack
//!    - Invokes host commands only for tokens that survive
//!      short-circuiting
//!    - Draws transient result tokens from the `pool` slab
//!
//! # Example
//!
//! ```no_run
//! use fastcond::{Evaluator, Host, RawUnit};
//! # struct EngineHost;
//! # impl Host for EngineHost {
//! #     type Context = ();
//! #     fn next_unit(&self, _: &[u8], _: usize) -> fastcond::EvalResult<Option<RawUnit>> { Ok(None) }
//! #     fn is_integer(&self, _: &str) -> bool { false }
//! #     fn is_float(&self, _: &str) -> bool { false }
//! #     fn invoke(&self, _: usize, _: &mut ()) -> Option<f64> { None }
//! # }
//!
//! // One evaluator per script thread; nothing is shared or locked.
//! let mut evaluator = Evaluator::new(EngineHost);
//! let bytecode: &[u8] = b"...compiled conditional...";
//! let mut ctx = ();
//! match evaluator.evaluate(bytecode, &mut ctx) {
//!     Ok(value) => println!("condition value: {value}"),
//!     Err(code) => println!("condition failed: {code}"),
//! }
//! ```
//!
//! # Threading
//!
//! An [`Evaluator`] owns every mutable structure (stream cache, token
//! pool, operand stack) and is meant to be created once per host
//! thread. Cached streams are keyed by bytecode location identity and
//! never invalidated; a host that rewrites a location in place must
//! drop the owning evaluator (see the `cache` module docs).

pub mod analyzer;
pub mod cache;
pub mod eval;
pub mod host;
pub mod pool;
pub mod stream;
pub mod tokenizer;

pub use analyzer::analyze;
pub use cache::{CacheStats, StreamCache, StreamKey};
pub use eval::{EvalConfig, EvalError, EvalResult, Evaluator, MAX_EXPR_LEN};
pub use host::{Host, RawUnit, RawUnitKind};
pub use pool::{PoolStats, PoolToken, TokenPool, DEFAULT_POOL_CAPACITY};
pub use stream::{
    Operator, ShortCircuit, ShortCircuitKind, Token, TokenKind, TokenStream,
};
pub use tokenizer::tokenize;

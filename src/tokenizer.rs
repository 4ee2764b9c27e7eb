//! Expression tokenization
//!
//! Turns one expression's bytecode into a [`TokenStream`] by pulling
//! lexical units from the host extractor and classifying operand text
//! through the host's literal classifier. Runs at most once per distinct
//! bytecode location per thread; the cache keeps the result.

use tracing::trace;

use crate::eval::types::{EvalError, EvalResult};
use crate::host::{Host, RawUnitKind};
use crate::stream::{Token, TokenStream};

/// Tokenize `code` into a fresh, not-yet-analyzed stream.
///
/// Operand text accepted by the host as an integer or float literal
/// becomes an `Operand` token; anything else becomes a `CommandRef`
/// carrying the unit's byte offset so the evaluator can hand it back to
/// the host at invocation time. Extractor errors abort tokenization and
/// propagate unchanged.
pub fn tokenize<H: Host>(host: &H, code: &[u8]) -> EvalResult<TokenStream> {
    let mut stream = TokenStream::with_capacity(code.len() / 2);
    let mut cursor = 0usize;

    while cursor < code.len() {
        let unit = match host.next_unit(code, cursor)? {
            Some(unit) => unit,
            None => break,
        };
        debug_assert!(unit.consumed > 0, "extractor returned a zero-length unit");

        let offset = cursor;
        cursor += unit.consumed;

        match unit.kind {
            RawUnitKind::Operator(op) => {
                trace!(target: "fastcond::tokenizer", offset, op = op.mnemonic(), "operator unit");
                stream.push(Token::operator(op));
            }
            RawUnitKind::Operand(text) => {
                if host.is_integer(&text) || host.is_float(&text) {
                    let value: f64 = text.parse().map_err(|_| EvalError::Syntax)?;
                    trace!(target: "fastcond::tokenizer", offset, value, "literal unit");
                    stream.push(Token::operand(value));
                } else {
                    trace!(target: "fastcond::tokenizer", offset, text = %text, "command unit");
                    stream.push(Token::command_ref(offset));
                }
            }
        }
    }

    Ok(stream)
}

//! Short-circuit analysis
//!
//! A single forward pass over a freshly tokenized stream that
//! precomputes, for every token, whether an enclosing `&&`/`||` can skip
//! past it and where the skip lands. The evaluator then never has to
//! search the stream at runtime; it reads the stamped metadata after
//! every push.

use tracing::trace;

use crate::stream::{Operator, ShortCircuit, ShortCircuitKind, Token, TokenKind, TokenStream};

/// Stamp short-circuit metadata onto every token of `stream`.
///
/// After this returns the stream is complete and must not change again.
pub fn analyze(stream: &mut TokenStream) {
    for index in 0..stream.len() {
        let sc = short_circuit_for(stream.tokens(), index);
        if sc.kind != ShortCircuitKind::None {
            trace!(
                target: "fastcond::analyzer",
                index,
                kind = ?sc.kind,
                distance = sc.distance,
                cleanup = sc.cleanup,
                "short-circuit entry"
            );
        }
        stream.tokens_mut()[index].set_short_circuit(sc);
    }
}

/// Find the position of the operator that will consume the value
/// produced at `position`.
///
/// Forward balance scan: operands and command references push a pending
/// value (+1); a binary operator consumes two and produces one (−1);
/// `Negate` is net zero. The consumer is the operator at which the
/// balance returns to zero — or any operator met while the balance is
/// already zero, which takes the scanned value directly.
fn immediate_parent(tokens: &[Token], position: usize) -> Option<usize> {
    let mut balance: usize = 0;
    for (j, token) in tokens.iter().enumerate().skip(position + 1) {
        match token.kind() {
            TokenKind::Operand(_) | TokenKind::CommandRef(_) => balance += 1,
            TokenKind::Operator(op) => {
                if balance == 0 {
                    return Some(j);
                }
                if !op.is_unary() {
                    balance -= 1;
                    if balance == 0 {
                        return Some(j);
                    }
                }
            }
        }
    }
    None
}

fn logical_kind(tokens: &[Token], position: usize) -> Option<Operator> {
    match tokens[position].kind() {
        TokenKind::Operator(op) if op.is_logical() => Some(op),
        _ => None,
    }
}

/// Compute the metadata for the token at `position`.
fn short_circuit_for(tokens: &[Token], position: usize) -> ShortCircuit {
    let Some(parent) = immediate_parent(tokens, position) else {
        // Final result of the stream; nothing encloses it.
        return ShortCircuit::default();
    };
    let Some(op) = logical_kind(tokens, parent) else {
        return ShortCircuit::default();
    };

    // Climb runs of the same logical operator so a decided operand jumps
    // past the whole chain, not just its own pair.
    let mut furthest = parent;
    while let Some(grandparent) = immediate_parent(tokens, furthest) {
        if logical_kind(tokens, grandparent) != Some(op) {
            break;
        }
        furthest = grandparent;
    }

    ShortCircuit {
        kind: match op {
            Operator::And => ShortCircuitKind::And,
            _ => ShortCircuitKind::Or,
        },
        distance: furthest - position,
        cleanup: if position + 1 == parent { 2 } else { 1 },
    }
}

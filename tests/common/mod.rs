//! Test utilities for the end-to-end evaluator tests.
//!
//! Provides `WordHost`, a mock script engine whose expression bytecode
//! is whitespace-separated ASCII words: operator mnemonics become
//! operator units, everything else is operand text that the classifier
//! either accepts as a literal or leaves to the command table. The host
//! keeps its own copy of the script storage so command invocation can
//! resolve a byte offset back to a command name, the way the real
//! engine resolves offsets against its loaded scripts.

use std::cell::Cell;
use std::collections::HashMap;

use fastcond::{EvalError, EvalResult, Host, Operator, RawUnit, RawUnitKind};

/// Execution context threaded through command invocations.
#[derive(Debug, Default)]
pub struct ScriptCtx {
    /// Names of every command actually invoked, in order.
    pub invoked: Vec<String>,
}

/// Mock host: word-based extractor, digit/dot classifier, table-driven
/// command dispatch.
pub struct WordHost {
    code: Vec<u8>,
    commands: HashMap<String, f64>,
    extract_calls: Cell<usize>,
    extract_error: Option<EvalError>,
}

impl WordHost {
    pub fn new(code: &[u8], commands: &[(&str, f64)]) -> Self {
        WordHost {
            code: code.to_vec(),
            commands: commands
                .iter()
                .map(|(name, value)| (name.to_string(), *value))
                .collect(),
            extract_calls: Cell::new(0),
            extract_error: None,
        }
    }

    /// Host whose extractor fails with `error` on the first unit.
    #[allow(dead_code)]
    pub fn failing(code: &[u8], error: EvalError) -> Self {
        let mut host = Self::new(code, &[]);
        host.extract_error = Some(error);
        host
    }

    /// How many lexical units the evaluator has asked for.
    #[allow(dead_code)]
    pub fn extract_calls(&self) -> usize {
        self.extract_calls.get()
    }

    fn word_bounds(code: &[u8], cursor: usize) -> Option<(usize, usize)> {
        let mut start = cursor;
        while start < code.len() && code[start].is_ascii_whitespace() {
            start += 1;
        }
        if start >= code.len() {
            return None;
        }
        let mut end = start;
        while end < code.len() && !code[end].is_ascii_whitespace() {
            end += 1;
        }
        Some((start, end))
    }

    /// End of the unit including its trailing separator, so the next
    /// cursor lands exactly on the next unit's first byte and command
    /// offsets identify unit starts.
    fn unit_end(code: &[u8], end: usize) -> usize {
        let mut trail = end;
        while trail < code.len() && code[trail].is_ascii_whitespace() {
            trail += 1;
        }
        trail
    }

    fn operator_for(word: &str) -> Option<Operator> {
        let op = match word {
            "&&" => Operator::And,
            "||" => Operator::Or,
            "<=" => Operator::Le,
            "<" => Operator::Lt,
            ">=" => Operator::Ge,
            ">" => Operator::Gt,
            "==" => Operator::Eq,
            "!=" => Operator::Ne,
            "-" => Operator::Sub,
            "+" => Operator::Add,
            "*" => Operator::Mul,
            "/" => Operator::Div,
            "%" => Operator::Mod,
            "neg" => Operator::Negate,
            _ => return None,
        };
        Some(op)
    }

    fn word_at(&self, offset: usize) -> Option<&str> {
        let (start, end) = Self::word_bounds(&self.code, offset)?;
        std::str::from_utf8(&self.code[start..end]).ok()
    }
}

impl Host for WordHost {
    type Context = ScriptCtx;

    fn next_unit(&self, code: &[u8], cursor: usize) -> EvalResult<Option<RawUnit>> {
        self.extract_calls.set(self.extract_calls.get() + 1);
        if let Some(error) = self.extract_error {
            return Err(error);
        }

        let Some((start, end)) = Self::word_bounds(code, cursor) else {
            return Ok(None);
        };
        let word = std::str::from_utf8(&code[start..end]).map_err(|_| EvalError::Syntax)?;
        let kind = match Self::operator_for(word) {
            Some(op) => RawUnitKind::Operator(op),
            None => RawUnitKind::Operand(word.to_string()),
        };
        let consumed = Self::unit_end(code, end) - cursor;
        Ok(Some(RawUnit { consumed, kind }))
    }

    fn is_integer(&self, text: &str) -> bool {
        !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
    }

    fn is_float(&self, text: &str) -> bool {
        text.contains('.') && text.parse::<f64>().is_ok()
    }

    fn invoke(&self, offset: usize, ctx: &mut ScriptCtx) -> Option<f64> {
        let name = self.word_at(offset)?;
        ctx.invoked.push(name.to_string());
        self.commands.get(name).copied()
    }
}

/// Install a subscriber so failing tests can be rerun with output.
#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

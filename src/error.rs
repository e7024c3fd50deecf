use std::sync::atomic::{AtomicBool, Ordering};

use crate::object::Object;
use crate::token::{Token, Type};

static HAD_ERROR: AtomicBool = AtomicBool::new(false);
static HAD_RUNTIME_ERROR: AtomicBool = AtomicBool::new(false);

/// Checks if a scan, parse, or resolve error occurred.
pub fn did_error() -> bool {
    HAD_ERROR.load(Ordering::Relaxed)
}

/// Checks if a runtime error occurred.
pub fn did_runtime_error() -> bool {
    HAD_RUNTIME_ERROR.load(Ordering::Relaxed)
}

/// Resets both error flags. Used between REPL lines so one bad line doesn't
/// poison the ones that follow.
pub fn reset_error() {
    HAD_ERROR.store(false, Ordering::Relaxed);
    HAD_RUNTIME_ERROR.store(false, Ordering::Relaxed);
}

/// Every compile-time error type implements this: printing is the side
/// effect that also latches the relevant `HAD_*` flag the driver checks
/// after each phase (spec.md §7).
pub trait Error {
    fn throw(&self);
}

/// A lexical error: an unexpected character or an unterminated string.
#[derive(Debug)]
pub struct ScanError {
    pub line: usize,
    pub message: String,
}

impl Error for ScanError {
    fn throw(&self) {
        eprintln!("[line {}] Error: {}", self.line, self.message);
        HAD_ERROR.store(true, Ordering::Relaxed);
    }
}

/// A syntax error raised by the parser at a specific token.
#[derive(Debug)]
pub struct ParseError {
    pub token: Token,
    pub message: String,
}

impl Error for ParseError {
    fn throw(&self) {
        if self.token.r#type == Type::EOF {
            eprintln!("[line {}] Error at end: {}", self.token.line(), self.message);
        } else {
            eprintln!(
                "[line {}] Error at '{}': {}",
                self.token.line(),
                self.token.lexeme,
                self.message
            );
        }
        HAD_ERROR.store(true, Ordering::Relaxed);
    }
}

/// A static-scope error raised by the resolver (e.g. reading a variable in
/// its own initializer, `this` outside a class). Shares the parser's
/// diagnostic shape since both surface as compile errors.
#[derive(Debug)]
pub struct ResolveError {
    pub token: Token,
    pub message: String,
}

impl Error for ResolveError {
    fn throw(&self) {
        eprintln!(
            "[line {}] Error at '{}': {}",
            self.token.line(),
            self.token.lexeme,
            self.message
        );
        HAD_ERROR.store(true, Ordering::Relaxed);
    }
}

/// A runtime error, carrying the offending token so the driver can report
/// its line. Propagated as a normal `Result::Err` through evaluation
/// (wrapped in [`crate::interpreter::Unwind`]) rather than thrown eagerly —
/// only the top-level driver prints it, once, after the unwind reaches it.
#[derive(Debug, Clone)]
pub struct RuntimeError {
    pub token: Token,
    pub message: String,
}

impl Error for RuntimeError {
    fn throw(&self) {
        eprintln!("{}\n[line {}]", self.message, self.token.line());
        HAD_RUNTIME_ERROR.store(true, Ordering::Relaxed);
    }
}

/// The two non-local exits the tree walk can take (spec.md §5). `Return` is
/// ordinary control flow, not an error — it is caught only by the call-site
/// code that invoked the enclosing function; it must never reach the
/// top-level driver (the resolver's static check guarantees this for any
/// program that resolves cleanly).
pub enum Unwind {
    Error(RuntimeError),
    Return(Object),
}

impl From<RuntimeError> for Unwind {
    fn from(error: RuntimeError) -> Self {
        Unwind::Error(error)
    }
}

#![allow(clippy::needless_return)]

//! Lox is a dynamically typed, class-based scripting language with lexical
//! scoping, first-class functions, closures, and single inheritance. This
//! crate is a tree-walking interpreter for it: source text goes in one end,
//! observable program behavior (stdout, exit code) comes out the other.
//!
//! Lox is dynamically typed: the type of a variable is determined at
//! runtime rather than checked ahead of time. It is interpreted by walking
//! the abstract syntax tree directly rather than compiling to bytecode —
//! slower than a bytecode VM, but considerably simpler to get right, which
//! is the whole point of working through
//! [Crafting Interpreters](https://craftinginterpreters.com/).
//!
//! ## Scanning
//! The first step is scanning: turning a string of characters into a list
//! of tokens. For example, `1 + 2` becomes:
//! ```text
//! [Number(1), Plus, Number(2)]
//! ```
//! The scanner is implemented in the [`scanner`](scanner) module as a
//! single pass over the source with up to two characters of lookahead. It
//! reports lexical errors as a [`ScanError`](error::ScanError) — an
//! unterminated string, an unexpected character — but keeps scanning past
//! them, so a file with several typos gets all of them reported in one run
//! rather than one at a time.
//!
//! ## Parsing
//! The second step is parsing: turning the token list into an abstract
//! syntax tree. The parser is implemented in the [`parser`](parser) module
//! as a hand-written recursive-descent parser. It produces
//! [`Expressions`](expr::Expr), which evaluate to an
//! [`Object`](object::Object), and [`Statements`](stmt::Stmt), which don't
//! produce a value but perform a side effect instead — a variable
//! declaration, an `if`, a loop.
//!
//! For example, `print 1 + 2;` parses into roughly:
//! ```text
//! Print(Binary(Literal(1), Plus, Literal(2)))
//! ```
//! The parser reports syntax errors as a [`ParseError`](error::ParseError)
//! and recovers by synchronizing to the next likely statement boundary, so
//! it too can surface more than one error per run.
//!
//! ## Resolving
//! The third step is a static pass over the already-parsed tree that
//! figures out, for every variable reference, exactly how many enclosing
//! scopes up it's declared in. This has to run as a full pre-pass — not
//! inline during evaluation — because naive lexical scoping at evaluation
//! time reuses whatever binding is live *right now*, not the one that was
//! live when a closure was declared; that bug is only visible once a block
//! can shadow an outer variable after a closure over it has already been
//! created. The resolver is implemented in the [`resolver`](resolver)
//! module and reports its findings as a [`ResolveError`](error::ResolveError)
//! — these are syntactically fine but semantically broken programs, e.g.
//! reading a variable from inside its own initializer:
//! ```text
//! { var a = a; }
//! ```
//!
//! ## Interpreting
//! The final step walks the resolved tree and evaluates it. The
//! interpreter is implemented in the [`interpreter`](interpreter) module.
//! Having already scanned, parsed, and resolved, it can assume the tree is
//! well-formed and concentrate on producing values and side effects. Errors
//! that can only be caught by actually running the code — e.g. adding a
//! string to a number — surface as a [`RuntimeError`](error::RuntimeError):
//! ```text
//! var a = "123";
//! var b = a + 123;
//! ```
//! The interpreter owns the [`environment`](environment) chain that maps
//! variable names to values scope by scope, which is how it implements
//! lexical scoping and closures.

use std::io::Write;
use std::{fs, process};

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

pub mod ast;
pub mod class;
pub mod environment;
pub mod error;
pub mod expr;
pub mod function;
pub mod interpreter;
pub mod literal;
pub mod object;
pub mod parser;
pub mod resolver;
pub mod scanner;
pub mod stmt;
pub mod token;

use ast::ASTPrinter;
use error::Error;
use interpreter::Interpreter;
use parser::Parser;
use resolver::Resolver;
use scanner::Scanner;
use stmt::{PrintData, Stmt};

/// Exit code for a compile-time failure (scan, parse, or resolve error),
/// matching the Lox book's convention (spec.md §6).
pub const EX_COMPILE_ERROR: i32 = 65;
/// Exit code for a runtime failure.
pub const EX_RUNTIME_ERROR: i32 = 70;
/// Exit code for a CLI usage error (unknown subcommand, wrong arg count).
pub const EX_USAGE: i32 = 64;

/// The name of the REPL's on-disk history file, resolved relative to the
/// user's home directory via the `home` crate.
const HISTORY_FILE: &str = ".lox_history";

/// The driver that owns the long-lived interpreter state (the `globals`
/// environment and everything reachable from it) across a whole CLI
/// invocation — a single file run, or a whole REPL session where later
/// lines can still see variables and functions defined by earlier ones.
pub struct Lox {
    interpreter: Interpreter,
}

impl Lox {
    pub fn new() -> Self {
        Lox { interpreter: Interpreter::new() }
    }

    /// Builds a driver whose `print` output goes to `output` instead of
    /// stdout — how tests observe program output without spawning a
    /// subprocess (spec.md's "ambient" test tooling).
    pub fn with_output(output: impl Write + 'static) -> Self {
        Lox { interpreter: Interpreter::with_output(output) }
    }

    /// `tokenize <file>`: scan only, printing one token per line in the
    /// form `<KIND> <lexeme> <literal>`, with a trailing `EOF  null`.
    pub fn tokenize(&self, source: &str) {
        for token in Scanner::new(source).scan_tokens() {
            println!("{token}");
        }
    }

    /// `parse <file>`: scan and parse a single expression, printing its
    /// Lisp-like AST form.
    pub fn parse(&self, source: &str) {
        let tokens = Scanner::new(source).scan_tokens();
        if error::did_error() {
            return;
        }

        match Parser::new(tokens).parse_expression() {
            Ok(expr) => println!("{}", ASTPrinter.print(&expr)),
            Err(err) => err.throw(),
        }
    }

    /// `run <file>`: scan, parse, resolve, and evaluate the input strictly
    /// as a program of statements.
    pub fn run(&mut self, source: &str) {
        self.execute(source, false);
    }

    /// `evaluate <file>`: like [`Lox::run`], but if the input is a single
    /// bare expression with no statement terminator, evaluate it and print
    /// its value (spec.md §6) instead of reporting "Expect ';'".
    pub fn evaluate(&mut self, source: &str) {
        self.execute(source, true);
    }

    /// Shared pipeline behind `run`/`evaluate`/the REPL. `allow_expression`
    /// mirrors the original implementation's `parseExpr` flag: when the
    /// program parse produces zero statements and did error, the same
    /// tokens are retried as a single expression wrapped in an implicit
    /// `print` (confirmed by `stmtParser.cpp`'s `parse`, which this
    /// generalizes from C++ exceptions to a two-phase parse + retry).
    fn execute(&mut self, source: &str, allow_expression: bool) {
        let tokens = Scanner::new(source).scan_tokens();
        if error::did_error() {
            return;
        }

        let mut statements = Parser::new(tokens.clone()).parse();

        if allow_expression && statements.is_empty() && error::did_error() {
            error::reset_error();
            if let Ok(expr) = Parser::new(tokens).parse_expression() {
                statements = vec![Stmt::Print(PrintData { expr })];
            }
        }

        if error::did_error() {
            return;
        }

        let mut resolver = Resolver::new(&mut self.interpreter);
        resolver.resolve(&statements);
        if error::did_error() {
            return;
        }

        self.interpreter.interpret(&statements);
    }

    /// The interactive REPL: each line runs through [`Lox::evaluate`]'s
    /// dual-parse pipeline, and the error flags are reset after every line
    /// so a mistyped line doesn't poison the ones that follow.
    pub fn run_prompt(&mut self) -> rustyline::Result<()> {
        let history_path = home::home_dir().map(|home| home.join(HISTORY_FILE));

        let mut editor = DefaultEditor::new()?;
        if let Some(path) = &history_path {
            let _ = editor.load_history(path);
        }

        loop {
            match editor.readline("> ") {
                Ok(line) => {
                    let _ = editor.add_history_entry(line.as_str());
                    self.evaluate(&line);
                    error::reset_error();
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(err) => {
                    eprintln!("{err}");
                    break;
                }
            }
        }

        if let Some(path) = &history_path {
            let _ = editor.save_history(path);
        }

        Ok(())
    }
}

impl Default for Lox {
    fn default() -> Self {
        Self::new()
    }
}

/// Reads a source file, exiting with [`EX_USAGE`] on failure — the one
/// place in the crate that treats a plain IO error as fatal, since there is
/// no recovery path for a CLI subcommand whose input file doesn't exist.
pub fn read_source_file(path: &str) -> String {
    fs::read_to_string(path).unwrap_or_else(|err| {
        eprintln!("lox: couldn't read '{path}': {err}");
        process::exit(EX_USAGE);
    })
}

//! # pcse
//!
//! pcse is a tree-walking interpreter for CAIE-style exam pseudocode. It
//! lexes a source text into tokens (interning identifiers and fusing
//! `d/m/y` date constants), parses them into a syntax tree, and evaluates
//! the tree against an environment with call-frame scoping, exact rational
//! REAL arithmetic, and arrays with arbitrary bounds.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic
)]
#![allow(clippy::missing_errors_doc)]

use std::io::{BufRead, Write};

use crate::{
    error::Error,
    interpreter::{evaluator::core::Env, lexer::Lexer, parser::core::Parser},
};

/// Defines the structure of parsed code.
///
/// This module declares the `Program`, `Block`, `Stmt`, and `Expr` types
/// that represent source code as a tree. The AST is built by the parser and
/// walked by the evaluator; it refers to identifiers only by their interned
/// IDs.
///
/// # Responsibilities
/// - Defines statement and expression nodes for all language constructs.
/// - Attaches source lines to every node for error reporting.
pub mod ast;
/// Provides the error types for every pipeline stage.
///
/// Lex, parse, type, and runtime errors are distinct at the boundary but
/// all abort the run. Each carries a message and, where available, the
/// offending position or token.
///
/// # Responsibilities
/// - Defines one error enum per stage, plus the aggregates the evaluator
///   and the driver use.
/// - Formats errors as `<ErrorKind>: <message>` for the command line.
pub mod error;
/// Orchestrates the entire process of running a program.
///
/// This module ties together the lexer, parser, evaluator, and value types
/// to provide a complete runtime for pseudocode source.
///
/// # Responsibilities
/// - Coordinates the pipeline stages and the flow of data between them.
/// - Exposes the building blocks the command-line driver composes.
pub mod interpreter;
/// General utilities for safe numeric conversion.
///
/// # Responsibilities
/// - Narrows `i64` values to smaller machine types without silent
///   truncation.
pub mod util;

/// Runs a pseudocode source text against the given input and output
/// streams.
///
/// The pipeline is strictly linear: the source is tokenized, the tokens are
/// parsed into a program, and the program is interpreted. INPUT statements
/// read lines from `input`; OUTPUT statements write to `output`. Output
/// produced before an error stays written.
///
/// # Errors
/// Returns the first lex, parse, type, or runtime error encountered.
///
/// # Examples
/// ```
/// use pcse::run_source;
///
/// let mut output = Vec::new();
/// run_source("OUTPUT 2 + 3 * 4", &mut std::io::empty(), &mut output).unwrap();
/// assert_eq!(output, b"14\n");
///
/// // An undeclared variable is a runtime error.
/// let result = run_source("OUTPUT x", &mut std::io::empty(), &mut Vec::new());
/// assert!(result.is_err());
/// ```
pub fn run_source(source: &str,
                  input: &mut dyn BufRead,
                  output: &mut dyn Write)
                  -> Result<(), Error> {
    let lexer = Lexer::lex(source)?;
    let program = Parser::parse(&lexer.tokens)?;
    let mut env = Env::new(&lexer, input, output);
    env.run(&program)?;
    Ok(())
}

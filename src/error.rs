/// Lexical errors.
///
/// Defines the errors the tokenizer can raise: stray bytes, unterminated
/// strings, oversized number literals, and malformed date constants. Each
/// carries the line and column of the offending byte.
pub mod lex_error;
/// Parsing errors.
///
/// Defines the errors raised while turning tokens into a syntax tree:
/// unexpected tokens, premature end of input, and structural limits.
pub mod parse_error;
/// Runtime errors.
///
/// Contains the errors that can only be detected while a program runs:
/// undefined variables, out-of-bounds indexes, division by zero, overflow,
/// and bad or exhausted input.
pub mod runtime_error;
/// Type errors.
///
/// Contains the mismatches the interpreter's type checking detects: wrong
/// operand types, incomparable values, array misuse, redeclaration, and
/// functions that fail to return.
pub mod type_error;

pub use lex_error::LexError;
pub use parse_error::ParseError;
pub use runtime_error::RuntimeError;
pub use type_error::TypeError;

/// An error raised while interpreting: either a type mismatch or a true
/// runtime failure. The two are distinct at the boundary but share one
/// result type inside the evaluator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    /// A type mismatch.
    Type(TypeError),
    /// A runtime failure.
    Runtime(RuntimeError),
}

impl From<TypeError> for EvalError {
    fn from(error: TypeError) -> Self {
        Self::Type(error)
    }
}

impl From<RuntimeError> for EvalError {
    fn from(error: RuntimeError) -> Self {
        Self::Runtime(error)
    }
}

impl std::fmt::Display for EvalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Type(e) => write!(f, "TypeError: {e}"),
            Self::Runtime(e) => write!(f, "RuntimeError: {e}"),
        }
    }
}

impl std::error::Error for EvalError {}

/// Any error the pipeline can produce, tagged by stage.
///
/// The driver prints this as `<ErrorKind>: <message>` and exits non-zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The source text could not be tokenized.
    Lex(LexError),
    /// The token stream could not be parsed.
    Parse(ParseError),
    /// The program is type-incorrect.
    Type(TypeError),
    /// The program failed while running.
    Runtime(RuntimeError),
}

impl From<LexError> for Error {
    fn from(error: LexError) -> Self {
        Self::Lex(error)
    }
}

impl From<ParseError> for Error {
    fn from(error: ParseError) -> Self {
        Self::Parse(error)
    }
}

impl From<EvalError> for Error {
    fn from(error: EvalError) -> Self {
        match error {
            EvalError::Type(e) => Self::Type(e),
            EvalError::Runtime(e) => Self::Runtime(e),
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lex(e) => write!(f, "LexError: {e}"),
            Self::Parse(e) => write!(f, "ParseError: {e}"),
            Self::Type(e) => write!(f, "TypeError: {e}"),
            Self::Runtime(e) => write!(f, "RuntimeError: {e}"),
        }
    }
}

impl std::error::Error for Error {}

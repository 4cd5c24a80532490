/// Represents all errors that can occur while parsing the token stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Found a token that does not fit the grammar at this point.
    UnexpectedToken {
        /// What the parser was looking for.
        expected: String,
        /// The token encountered, formatted for display.
        found:    String,
        /// The source line where the error occurred.
        line:     usize,
        /// The column where the error occurred.
        col:      usize,
    },
    /// Reached the end of input while a construct was still open.
    UnexpectedEndOfInput {
        /// What the parser was looking for.
        expected: String,
        /// The source line where the error occurred.
        line:     usize,
        /// The column where the error occurred.
        col:      usize,
    },
    /// A procedure or function header with more than 64 parameters.
    TooManyParameters {
        /// The source line where the error occurred.
        line: usize,
        /// The column where the error occurred.
        col:  usize,
    },
    /// A RETURN statement outside a FUNCTION body.
    ReturnOutsideFunction {
        /// The source line where the error occurred.
        line: usize,
        /// The column where the error occurred.
        col:  usize,
    },
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnexpectedToken { expected,
                                    found,
                                    line,
                                    col, } => {
                write!(f, "line {line}:{col}: expected {expected}, found {found}.")
            },
            Self::UnexpectedEndOfInput { expected, line, col } => {
                write!(f, "line {line}:{col}: expected {expected}, found end of input.")
            },
            Self::TooManyParameters { line, col } => {
                write!(f, "line {line}:{col}: at most 64 parameters are allowed.")
            },
            Self::ReturnOutsideFunction { line, col } => {
                write!(f, "line {line}:{col}: RETURN is only allowed inside a FUNCTION.")
            },
        }
    }
}

impl std::error::Error for ParseError {}

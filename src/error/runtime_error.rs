/// Represents all errors that can only be detected while the program runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    /// Tried to read or write a variable that is not in scope.
    UndefinedVariable {
        /// The name of the variable.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// Called a function or procedure that has not been defined.
    UnknownFunction {
        /// The name of the function.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// The wrong number of arguments was supplied to a call.
    ArgumentCountMismatch {
        /// The name of the function.
        name:     String,
        /// The declared parameter count.
        expected: usize,
        /// The number of arguments supplied.
        found:    usize,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// An array index outside the declared bounds.
    IndexOutOfBounds {
        /// The index that was requested.
        index: i64,
        /// The smallest valid index.
        lo:    i64,
        /// The largest valid index.
        hi:    i64,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// Division (or MOD / DIV) by zero.
    DivisionByZero {
        /// The source line where the error occurred.
        line: usize,
    },
    /// Arithmetic overflowed the value representation.
    Overflow {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A BYREF parameter was declared; passing by reference is reserved.
    ByRefUnsupported {
        /// The source line where the error occurred.
        line: usize,
    },
    /// INPUT was executed but the input stream had no more lines.
    InputExhausted {
        /// The source line where the error occurred.
        line: usize,
    },
    /// An INPUT line could not be parsed as the target's type.
    BadInput {
        /// The type the line had to parse as.
        expected: String,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// A builtin received an argument outside its domain.
    InvalidArgument {
        /// Details about why the argument is invalid.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// The input or output stream failed.
    Io {
        /// The underlying I/O error, formatted.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
    },
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UndefinedVariable { name, line } => {
                write!(f, "line {line}: undefined variable '{name}'.")
            },
            Self::UnknownFunction { name, line } => {
                write!(f, "line {line}: unknown function '{name}'.")
            },
            Self::ArgumentCountMismatch { name,
                                          expected,
                                          found,
                                          line, } => write!(f,
                                                            "line {line}: '{name}' takes {expected} argument(s), but {found} were supplied."),
            Self::IndexOutOfBounds { index, lo, hi, line } => {
                write!(f, "line {line}: index {index} is outside the bounds {lo}:{hi}.")
            },
            Self::DivisionByZero { line } => write!(f, "line {line}: division by zero."),
            Self::Overflow { line } => {
                write!(f, "line {line}: arithmetic overflow while computing result.")
            },
            Self::ByRefUnsupported { line } => {
                write!(f, "line {line}: BYREF parameters are not supported.")
            },
            Self::InputExhausted { line } => {
                write!(f, "line {line}: no more input to read.")
            },
            Self::BadInput { expected, line } => {
                write!(f, "line {line}: input line could not be read as {expected}.")
            },
            Self::InvalidArgument { details, line } => {
                write!(f, "line {line}: invalid argument: {details}.")
            },
            Self::Io { details, line } => write!(f, "line {line}: stream failure: {details}."),
        }
    }
}

impl std::error::Error for RuntimeError {}

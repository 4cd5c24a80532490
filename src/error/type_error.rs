/// Represents type mismatches detected while interpreting.
///
/// The interpreter checks types as it walks the tree, so these surface at
/// run time, but they describe static properties of the program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeError {
    /// A value or expression had the wrong type for its context.
    Mismatch {
        /// The type the context required.
        expected: String,
        /// The type that was found.
        found:    String,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// The two sides of a comparison have incompatible types.
    CannotCompare {
        /// The left-hand type.
        left:  String,
        /// The right-hand type.
        right: String,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// Arrays cannot be compared.
    ArrayComparison {
        /// The source line where the error occurred.
        line: usize,
    },
    /// Arrays cannot appear in a CASE selector or case value.
    ArrayInCase {
        /// The source line where the error occurred.
        line: usize,
    },
    /// Arrays cannot be written with OUTPUT.
    ArrayOutput {
        /// The source line where the error occurred.
        line: usize,
    },
    /// Arrays cannot be read with INPUT.
    ArrayInput {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A variable was declared twice.
    Redeclared {
        /// The name of the variable.
        name:     String,
        /// The type it already has.
        previous: String,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// A procedure was called where a value was required.
    ProcedureAsValue {
        /// The name of the procedure.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// A function finished without executing a RETURN.
    MissingReturn {
        /// The name of the function.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// Array bounds with a start index above the end index.
    InvalidBounds {
        /// The start index.
        lo:   i64,
        /// The end index.
        hi:   i64,
        /// The source line where the error occurred.
        line: usize,
    },
    /// An index list whose length does not match the array's dimensions.
    IndexCountMismatch {
        /// How many dimensions the variable has.
        expected: usize,
        /// How many indexes were written.
        found:    usize,
        /// The source line where the error occurred.
        line:     usize,
    },
}

impl std::fmt::Display for TypeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mismatch { expected, found, line } => {
                write!(f, "line {line}: bad type {found}, expected {expected}.")
            },
            Self::CannotCompare { left, right, line } => {
                write!(f, "line {line}: cannot compare {left} with {right}.")
            },
            Self::ArrayComparison { line } => {
                write!(f, "line {line}: arrays cannot be compared.")
            },
            Self::ArrayInCase { line } => {
                write!(f, "line {line}: arrays cannot be used in CASE OF.")
            },
            Self::ArrayOutput { line } => write!(f, "line {line}: arrays cannot be OUTPUT."),
            Self::ArrayInput { line } => write!(f, "line {line}: arrays cannot be INPUT."),
            Self::Redeclared { name, previous, line } => write!(f,
                                                                "line {line}: '{name}' already has type {previous} and cannot be redeclared."),
            Self::ProcedureAsValue { name, line } => write!(f,
                                                            "line {line}: '{name}' is a procedure and does not produce a value."),
            Self::MissingReturn { name, line } => {
                write!(f, "line {line}: function '{name}' did not RETURN a value.")
            },
            Self::InvalidBounds { lo, hi, line } => write!(f,
                                                           "line {line}: array start index {lo} is greater than end index {hi}."),
            Self::IndexCountMismatch { expected, found, line } => write!(f,
                                                                         "line {line}: {found} index(es) applied to a variable with {expected} dimension(s)."),
        }
    }
}

impl std::error::Error for TypeError {}

/// Represents all errors that can occur while tokenizing source text.
///
/// Every variant carries the 1-based line and byte column of the first
/// offending byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    /// A byte that starts no token.
    StrayCharacter {
        /// The offending character.
        found: char,
        /// The source line where the error occurred.
        line:  usize,
        /// The column where the error occurred.
        col:   usize,
    },
    /// A string literal with no closing quote before end of input.
    UnterminatedString {
        /// The source line where the error occurred.
        line: usize,
        /// The column where the error occurred.
        col:  usize,
    },
    /// A character literal that does not contain exactly one byte.
    BadCharLiteral {
        /// The source line where the error occurred.
        line: usize,
        /// The column where the error occurred.
        col:  usize,
    },
    /// An integer literal with too many digits to be stored safely.
    IntegerTooLarge {
        /// The source line where the error occurred.
        line: usize,
        /// The column where the error occurred.
        col:  usize,
    },
    /// A real literal whose digits overflow the rational numerator.
    RealTooLarge {
        /// The source line where the error occurred.
        line: usize,
        /// The column where the error occurred.
        col:  usize,
    },
    /// A letter directly after a number, such as `12e2`.
    LetterAfterNumber {
        /// The source line where the error occurred.
        line: usize,
        /// The column where the error occurred.
        col:  usize,
    },
    /// A date constant with a field outside its storage range.
    DateOutOfRange {
        /// The source line where the error occurred.
        line: usize,
        /// The column where the error occurred.
        col:  usize,
    },
    /// A date constant that is not a valid calendar date.
    InvalidDate {
        /// The source line where the error occurred.
        line: usize,
        /// The column where the error occurred.
        col:  usize,
    },
}

/// The error logos reports for unmatched input; the lexer driver fills in the
/// real position and character before surfacing it.
impl Default for LexError {
    fn default() -> Self {
        Self::StrayCharacter { found: '\0',
                               line:  0,
                               col:   0, }
    }
}

impl std::fmt::Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StrayCharacter { found, line, col } => {
                write!(f, "line {line}:{col}: stray '{found}' in program.")
            },
            Self::UnterminatedString { line, col } => {
                write!(f, "line {line}:{col}: unterminated string literal.")
            },
            Self::BadCharLiteral { line, col } => {
                write!(f, "line {line}:{col}: character literal must hold exactly one character.")
            },
            Self::IntegerTooLarge { line, col } => {
                write!(f, "line {line}:{col}: integer constant too large.")
            },
            Self::RealTooLarge { line, col } => {
                write!(f, "line {line}:{col}: real constant too large.")
            },
            Self::LetterAfterNumber { line, col } => {
                write!(f, "line {line}:{col}: unexpected character after number.")
            },
            Self::DateOutOfRange { line, col } => write!(f,
                                                         "line {line}:{col}: date constant too large. Note: if you mean division, use parentheses."),
            Self::InvalidDate { line, col } => {
                write!(f, "line {line}:{col}: not a valid calendar date.")
            },
        }
    }
}

impl std::error::Error for LexError {}

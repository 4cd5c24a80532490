use std::{collections::HashMap, rc::Rc};

use logos::Logos;

use crate::{
    error::LexError,
    interpreter::value::{date::Date, fraction::Fraction},
    util::num::{i64_to_u8_checked, i64_to_u16_checked},
};

/// Number literals with this many digits or more are rejected outright, so
/// that arithmetic on them cannot overflow after one or two operations. This
/// is the digit count of `i64::MAX`.
pub const MAX_LITERAL_DIGITS: usize = 19;

/// Represents a lexical token in the source input.
///
/// One variant per punctuation mark and reserved word, plus the
/// literal-carrying constant variants. Reserved words are case-sensitive and
/// all uppercase, so `if` is an identifier while `IF` is a keyword.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(extras = LexerExtras)]
#[logos(error = LexError)]
pub enum Token {
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `[`
    #[token("[")]
    LBracket,
    /// `]`
    #[token("]")]
    RBracket,
    /// `,`
    #[token(",")]
    Comma,
    /// `+`
    #[token("+")]
    Plus,
    /// `-`
    #[token("-")]
    Minus,
    /// `*`
    #[token("*")]
    Star,
    /// `/`; also the separator inside fused date constants
    #[token("/")]
    Slash,
    /// `:`
    #[token(":")]
    Colon,
    /// `=`
    #[token("=")]
    Eq,
    /// `<-`
    #[token("<-")]
    Assign,
    /// `<`
    #[token("<")]
    Lt,
    /// `<=`
    #[token("<=")]
    LtEq,
    /// `<>`
    #[token("<>")]
    LtGt,
    /// `>`
    #[token(">")]
    Gt,
    /// `>=`
    #[token(">=")]
    GtEq,

    /// `AND`
    #[token("AND")]
    And,
    /// `OR`
    #[token("OR")]
    Or,
    /// `NOT`
    #[token("NOT")]
    Not,
    /// `IF`
    #[token("IF")]
    If,
    /// `THEN`
    #[token("THEN")]
    Then,
    /// `ELSE`
    #[token("ELSE")]
    Else,
    /// `ENDIF`
    #[token("ENDIF")]
    EndIf,
    /// `DECLARE`
    #[token("DECLARE")]
    Declare,
    /// `FOR`
    #[token("FOR")]
    For,
    /// `TO`
    #[token("TO")]
    To,
    /// `STEP`
    #[token("STEP")]
    Step,
    /// `NEXT`
    #[token("NEXT")]
    Next,
    /// `WHILE`
    #[token("WHILE")]
    While,
    /// `DO`
    #[token("DO")]
    Do,
    /// `ENDWHILE`
    #[token("ENDWHILE")]
    EndWhile,
    /// `REPEAT`
    #[token("REPEAT")]
    Repeat,
    /// `UNTIL`
    #[token("UNTIL")]
    Until,
    /// `CONSTANT`
    #[token("CONSTANT")]
    Constant,
    /// `INPUT`
    #[token("INPUT")]
    Input,
    /// `OUTPUT`
    #[token("OUTPUT")]
    Output,
    /// `CASE`
    #[token("CASE")]
    Case,
    /// `OF`
    #[token("OF")]
    Of,
    /// `OTHERWISE`
    #[token("OTHERWISE")]
    Otherwise,
    /// `ENDCASE`
    #[token("ENDCASE")]
    EndCase,
    /// `PROCEDURE`
    #[token("PROCEDURE")]
    Procedure,
    /// `BYREF`
    #[token("BYREF")]
    ByRef,
    /// `ENDPROCEDURE`
    #[token("ENDPROCEDURE")]
    EndProcedure,
    /// `CALL`
    #[token("CALL")]
    Call,
    /// `FUNCTION`
    #[token("FUNCTION")]
    Function,
    /// `RETURNS`
    #[token("RETURNS")]
    Returns,
    /// `RETURN`
    #[token("RETURN")]
    Return,
    /// `ENDFUNCTION`
    #[token("ENDFUNCTION")]
    EndFunction,
    /// `INTEGER`
    #[token("INTEGER")]
    Integer,
    /// `REAL`
    #[token("REAL")]
    Real,
    /// `STRING`
    #[token("STRING")]
    String,
    /// `ARRAY`
    #[token("ARRAY")]
    Array,
    /// `CHAR`
    #[token("CHAR")]
    Char,
    /// `BOOLEAN`
    #[token("BOOLEAN")]
    Boolean,
    /// `DATE`
    #[token("DATE")]
    Date,
    /// `TRUE`
    #[token("TRUE")]
    True,
    /// `FALSE`
    #[token("FALSE")]
    False,
    /// `MOD`
    #[token("MOD")]
    Mod,
    /// `DIV`
    #[token("DIV")]
    Div,

    /// Integer constant tokens, such as `42`.
    #[regex(r"[0-9]+", lex_int)]
    IntConst(i64),
    /// Real constant tokens, such as `4.999`, stored as an exact fraction.
    /// A digit is required on both sides of the dot, and exponent suffixes
    /// like `12.2e2` are rejected.
    #[regex(r"[0-9]+\.[0-9]+", lex_real)]
    RealConst(Fraction),
    /// String constant tokens. The body is interned; embedded newlines are
    /// legal and counted against the line number.
    #[regex(r#""[^"]*""#, lex_string)]
    #[regex(r#""[^"]*"#, lex_unterminated_string)]
    StrConst(Rc<str>),
    /// Character constant tokens; exactly one byte between single quotes.
    #[regex(r"'[^']*'", lex_char)]
    CharConst(u8),
    /// Date constant tokens. Never produced by a single lexeme: the lexer
    /// fuses the five-token run `INT / INT / INT` into one of these.
    DateConst(Date),
    /// Identifier tokens, carrying the interned identifier ID.
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", lex_identifier)]
    Identifier(i64),

    /// `// comments`, consumed through to the newline.
    #[regex(r"//[^\n]*", logos::skip)]
    Comment,
    /// Newlines; recorded as byte offsets so positions can be recovered.
    #[token("\n", |lex| {
        lex.extras.line_loc.push(lex.span().start);
        logos::Skip
    })]
    Newline,
    /// Spaces, tabs, and carriage returns.
    #[regex(r"[ \t\r]+", logos::skip)]
    Whitespace,

    /// The end-of-stream sentinel. Never lexed; appended once after the last
    /// real token.
    Invalid,
}

/// State carried by the lexer during tokenization: the newline offsets used
/// to recover line/column positions, and the identifier interner.
pub struct LexerExtras {
    /// Byte offsets of every `\n` seen so far, in increasing order.
    pub line_loc:    Vec<usize>,
    /// Maps each identifier lexeme to its ID.
    pub identifiers: HashMap<String, i64>,
    /// Maps each ID back to its lexeme. Index 0 is a placeholder: ID 0 is
    /// reserved to mean "no identifier".
    pub names:       Vec<String>,
}

impl Default for LexerExtras {
    fn default() -> Self {
        Self { line_loc:    Vec::new(),
               identifiers: HashMap::new(),
               names:       vec![String::new()], }
    }
}

impl LexerExtras {
    /// Recovers the 1-based (line, column) of a byte position by binary
    /// search over the recorded newline offsets.
    #[must_use]
    pub fn position(&self, pos: usize) -> (usize, usize) {
        let line = self.line_loc.partition_point(|&offset| offset < pos) + 1;
        let col = match line.checked_sub(2).and_then(|index| self.line_loc.get(index)) {
            Some(&offset) => pos - offset,
            None => pos + 1,
        };
        (line, col)
    }

    /// Interns an identifier lexeme, assigning consecutive IDs from 1.
    /// Repeated lexemes get the same ID back.
    #[allow(clippy::cast_possible_wrap)]
    fn intern(&mut self, lexeme: &str) -> i64 {
        if let Some(&id) = self.identifiers.get(lexeme) {
            return id;
        }
        let id = self.names.len() as i64;
        self.identifiers.insert(lexeme.to_string(), id);
        self.names.push(lexeme.to_string());
        id
    }
}

/// A token together with the 1-based line and column of its first byte.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    /// The 1-based source line.
    pub line:  usize,
    /// The 1-based byte column within the line.
    pub col:   usize,
    /// The token itself.
    pub token: Token,
}

/// The result of tokenizing one source text.
///
/// Besides the tokens this keeps everything later stages need: the newline
/// offsets for diagnostics, and the identifier table in both directions. The
/// parser and interpreter refer to identifiers only by ID.
pub struct Lexer {
    /// The tokens, ending with one `Token::Invalid` sentinel.
    pub tokens:           Vec<Spanned>,
    /// Byte offsets of every newline in the source.
    pub line_loc:         Vec<usize>,
    /// How many distinct identifiers were interned.
    pub identifier_count: i64,
    /// Maps each identifier lexeme to its ID (1-based).
    pub identifiers:      HashMap<String, i64>,
    /// Maps each ID back to its lexeme; index 0 is a placeholder.
    pub names:            Vec<String>,
}

impl Lexer {
    /// Tokenizes a whole source text in one pass.
    ///
    /// Runs of `INT / INT / INT` are fused into single date constants as the
    /// tokens are produced; anything else interrupting that pattern resets
    /// the fusion. An `Invalid` sentinel is appended after the last token.
    ///
    /// ## Errors
    /// Returns the first `LexError` encountered: a stray byte, an
    /// unterminated string, an oversized number, a letter directly after a
    /// number, or an invalid date constant.
    #[allow(clippy::cast_possible_wrap)]
    pub fn lex(source: &str) -> Result<Self, LexError> {
        let mut lexer = Token::lexer(source);
        let mut tokens = Vec::new();
        let mut date_stage = 0_u8;
        while let Some(result) = lexer.next() {
            match result {
                Ok(token) => {
                    let (line, col) = lexer.extras.position(lexer.span().start);
                    tokens.push(Spanned { line, col, token });
                    date_stage = advance_date_stage(date_stage, &mut tokens)?;
                },
                Err(error) => return Err(locate(error, &lexer)),
            }
        }
        let (line, col) = lexer.extras.position(source.len());
        tokens.push(Spanned { line,
                              col,
                              token: Token::Invalid });
        let extras = lexer.extras;
        Ok(Self { tokens,
                  line_loc: extras.line_loc,
                  identifier_count: extras.names.len() as i64 - 1,
                  identifiers: extras.identifiers,
                  names: extras.names })
    }
}

/// Steps the date recogniser after one emitted token.
///
/// The stage records progress through `INT / INT / INT`: even stages expect
/// an integer, odd stages a slash. Completing the pattern replaces the last
/// five tokens with one date constant. An interrupting integer restarts the
/// pattern at stage one, anything else resets it. Division of integer
/// literals is therefore shadowed; programs that mean division write
/// parentheses.
fn advance_date_stage(stage: u8, tokens: &mut Vec<Spanned>) -> Result<u8, LexError> {
    let is_int = matches!(tokens.last(), Some(Spanned { token: Token::IntConst(_), .. }));
    let is_slash = matches!(tokens.last(), Some(Spanned { token: Token::Slash, .. }));
    if stage % 2 == 0 {
        if is_int {
            if stage == 4 {
                fuse_date(tokens)?;
                return Ok(0);
            }
            return Ok(stage + 1);
        }
        Ok(0)
    } else if is_slash {
        Ok(stage + 1)
    } else if is_int {
        // An interrupting integer can itself start a fresh pattern.
        Ok(1)
    } else {
        Ok(0)
    }
}

/// Replaces the trailing `INT / INT / INT` run with one `DateConst` token
/// positioned at the run's first byte.
fn fuse_date(tokens: &mut Vec<Spanned>) -> Result<(), LexError> {
    let len = tokens.len();
    if len < 5 {
        return Ok(());
    }
    let (line, col) = (tokens[len - 5].line, tokens[len - 5].col);
    let out_of_range = LexError::DateOutOfRange { line, col };
    let day = i64_to_u8_checked(int_value(&tokens[len - 5]), out_of_range.clone())?;
    let month = i64_to_u8_checked(int_value(&tokens[len - 3]), out_of_range.clone())?;
    let year = i64_to_u16_checked(int_value(&tokens[len - 1]), out_of_range)?;
    let date = Date::new(day, month, year).ok_or(LexError::InvalidDate { line, col })?;
    tokens.truncate(len - 5);
    tokens.push(Spanned { line,
                          col,
                          token: Token::DateConst(date) });
    Ok(())
}

fn int_value(spanned: &Spanned) -> i64 {
    if let Token::IntConst(value) = spanned.token { value } else { 0 }
}

/// Fills in the position and offending character of the placeholder error
/// logos produces for unmatched input.
fn locate(error: LexError, lexer: &logos::Lexer<Token>) -> LexError {
    match error {
        LexError::StrayCharacter { line: 0, .. } => {
            let (line, col) = lexer.extras.position(lexer.span().start);
            let found = lexer.slice().chars().next().unwrap_or('\0');
            LexError::StrayCharacter { found, line, col }
        },
        other => other,
    }
}

/// Rejects a letter or underscore directly after a number, so that forms
/// like `12e2` and `12.2e2` are errors instead of two tokens.
fn reject_trailing_letter(lex: &logos::Lexer<Token>) -> Result<(), LexError> {
    match lex.remainder().bytes().next() {
        Some(byte) if byte.is_ascii_alphabetic() || byte == b'_' => {
            let (line, col) = lex.extras.position(lex.span().end);
            Err(LexError::LetterAfterNumber { line, col })
        },
        _ => Ok(()),
    }
}

/// Parses an integer constant from the current token slice, rejecting
/// trailing letters and oversized literals.
fn lex_int(lex: &mut logos::Lexer<Token>) -> Result<i64, LexError> {
    reject_trailing_letter(lex)?;
    let slice = lex.slice();
    let (line, col) = lex.extras.position(lex.span().start);
    if slice.len() >= MAX_LITERAL_DIGITS {
        return Err(LexError::IntegerTooLarge { line, col });
    }
    slice.parse().map_err(|_| LexError::IntegerTooLarge { line, col })
}

/// Parses a real constant such as `4.999` into the exact fraction
/// `4999/1000`, rejecting trailing letters and literals whose digits would
/// overflow the numerator.
fn lex_real(lex: &mut logos::Lexer<Token>) -> Result<Fraction, LexError> {
    reject_trailing_letter(lex)?;
    let slice = lex.slice();
    let (line, col) = lex.extras.position(lex.span().start);
    let too_large = LexError::RealTooLarge { line, col };
    if slice.len() - 1 >= MAX_LITERAL_DIGITS {
        return Err(too_large);
    }
    let dot = slice.find('.').unwrap_or(slice.len());
    let mut digits = String::with_capacity(slice.len() - 1);
    digits.push_str(&slice[..dot]);
    digits.push_str(&slice[dot + 1..]);
    let numerator: i64 = digits.parse().map_err(|_| too_large.clone())?;
    let places = u32::try_from(slice.len() - 1 - dot).map_err(|_| too_large.clone())?;
    let denominator = 10_i64.checked_pow(places).ok_or_else(|| too_large.clone())?;
    Fraction::new(numerator, denominator).ok_or(too_large)
}

/// Interns a string constant's body, recording any newlines inside it.
fn lex_string(lex: &mut logos::Lexer<Token>) -> Rc<str> {
    let slice = lex.slice();
    let start = lex.span().start;
    for (offset, byte) in slice.bytes().enumerate() {
        if byte == b'\n' {
            lex.extras.line_loc.push(start + offset);
        }
    }
    Rc::from(&slice[1..slice.len() - 1])
}

/// A string constant that reached end of input before its closing quote.
fn lex_unterminated_string(lex: &mut logos::Lexer<Token>) -> Result<Rc<str>, LexError> {
    let (line, col) = lex.extras.position(lex.span().start);
    Err(LexError::UnterminatedString { line, col })
}

/// Parses a character constant; the quotes must hold exactly one byte.
fn lex_char(lex: &mut logos::Lexer<Token>) -> Result<u8, LexError> {
    let slice = lex.slice().as_bytes();
    if slice.len() == 3 {
        Ok(slice[1])
    } else {
        let (line, col) = lex.extras.position(lex.span().start);
        Err(LexError::BadCharLiteral { line, col })
    }
}

/// Interns an identifier and returns its ID.
fn lex_identifier(lex: &mut logos::Lexer<Token>) -> i64 {
    let slice = lex.slice();
    lex.extras.intern(slice)
}

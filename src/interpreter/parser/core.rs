use crate::{
    ast::Program,
    error::ParseError,
    interpreter::lexer::{Spanned, Token},
};

/// Result type used by the parser.
pub type ParseResult<T> = Result<T, ParseError>;

/// A single-pass, LL(1) recursive-descent parser over a spanned token slice.
///
/// The cursor never runs off the end: positions at or past the final
/// `Token::Invalid` sentinel keep yielding the sentinel, so every production
/// can simply ask for the next token and report what it found.
pub struct Parser<'t> {
    pub(in crate::interpreter::parser) tokens: &'t [Spanned],
    pub(in crate::interpreter::parser) curr:   usize,
}

impl<'t> Parser<'t> {
    /// Parses a whole token stream into a program.
    ///
    /// ## Errors
    /// Returns the first `ParseError` encountered; there is no recovery.
    pub fn parse(tokens: &'t [Spanned]) -> ParseResult<Program> {
        if tokens.is_empty() {
            return Ok(Program { stmts: Vec::new() });
        }
        let mut parser = Self { tokens, curr: 0 };
        let mut stmts = Vec::new();
        while !parser.done() {
            stmts.push(parser.parse_top_statement()?);
        }
        Ok(Program { stmts })
    }

    /// The current token, or the sentinel once input is exhausted.
    pub(in crate::interpreter::parser) fn peek(&self) -> &'t Spanned {
        &self.tokens[self.curr.min(self.tokens.len() - 1)]
    }

    /// Consumes and returns the current token.
    pub(in crate::interpreter::parser) fn next(&mut self) -> &'t Spanned {
        let spanned = self.peek();
        self.curr += 1;
        spanned
    }

    /// True once the cursor has reached the sentinel.
    pub(in crate::interpreter::parser) fn done(&self) -> bool {
        matches!(self.peek().token, Token::Invalid)
    }

    /// Consumes the current token if it equals `token`.
    pub(in crate::interpreter::parser) fn eat(&mut self, token: &Token) -> bool {
        if self.peek().token == *token {
            self.curr += 1;
            true
        } else {
            false
        }
    }

    /// Consumes the current token if it equals `token`, or fails describing
    /// what was expected.
    pub(in crate::interpreter::parser) fn expect(&mut self,
                                                 token: &Token,
                                                 expected: &str)
                                                 -> ParseResult<()> {
        if self.eat(token) { Ok(()) } else { Err(self.unexpected(expected)) }
    }

    /// Consumes an identifier token and returns its ID and line.
    pub(in crate::interpreter::parser) fn expect_identifier(&mut self)
                                                            -> ParseResult<(i64, usize)> {
        let spanned = self.peek();
        if let Token::Identifier(id) = spanned.token {
            self.curr += 1;
            Ok((id, spanned.line))
        } else {
            Err(self.unexpected("an identifier"))
        }
    }

    /// A parse error at the current token.
    pub(in crate::interpreter::parser) fn unexpected(&self, expected: &str) -> ParseError {
        Self::unexpected_at(self.peek(), expected)
    }

    /// A parse error at a specific token, usually one already consumed.
    pub(in crate::interpreter::parser) fn unexpected_at(spanned: &Spanned,
                                                        expected: &str)
                                                        -> ParseError {
        if matches!(spanned.token, Token::Invalid) {
            ParseError::UnexpectedEndOfInput { expected: expected.to_string(),
                                               line:     spanned.line,
                                               col:      spanned.col, }
        } else {
            ParseError::UnexpectedToken { expected: expected.to_string(),
                                          found: format!("{:?}", spanned.token),
                                          line: spanned.line,
                                          col: spanned.col }
        }
    }
}

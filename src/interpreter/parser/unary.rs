use std::rc::Rc;

use crate::{
    ast::{Expr, LValue, Literal, UnaryOperator},
    interpreter::{
        lexer::Token,
        parser::core::{ParseResult, Parser},
    },
};

impl Parser<'_> {
    /// Parses a unary expression.
    ///
    /// Supports the prefix operators `NOT` and `-`, which may nest, so
    /// `NOT NOT a` and `--x` both parse. With no prefix operator present the
    /// function delegates to [`Self::parse_primary`].
    ///
    /// Grammar:
    /// ```text
    ///     unary := ("NOT" | "-") unary
    ///            | primary
    /// ```
    pub(in crate::interpreter::parser) fn parse_unary(&mut self) -> ParseResult<Expr> {
        let op = match self.peek().token {
            Token::Not => UnaryOperator::Not,
            Token::Minus => UnaryOperator::Negate,
            _ => return self.parse_primary(),
        };
        let line = self.next().line;
        let expr = self.parse_unary()?;
        Ok(Expr::Unary { op,
                         expr: Box::new(expr),
                         line })
    }

    /// Parses a primary (atomic) expression.
    ///
    /// Primaries are the leaves of the expression grammar:
    /// - literal constants (INTEGER, REAL, STRING, CHAR, DATE, TRUE, FALSE)
    /// - lvalue reads, with optional index lists
    /// - function calls, when an identifier is directly followed by `(`
    /// - parenthesised expressions
    ///
    /// Grammar (simplified):
    /// ```text
    ///     primary := literal
    ///              | identifier "(" arguments ")"
    ///              | identifier ("[" indexes "]")*
    ///              | "(" expression ")"
    /// ```
    fn parse_primary(&mut self) -> ParseResult<Expr> {
        let spanned = self.next();
        let line = spanned.line;
        let value = match &spanned.token {
            Token::IntConst(value) => Literal::Integer(*value),
            Token::RealConst(value) => Literal::Real(*value),
            Token::StrConst(value) => Literal::Str(Rc::clone(value)),
            Token::CharConst(value) => Literal::Char(*value),
            Token::DateConst(value) => Literal::Date(*value),
            Token::True => Literal::Boolean(true),
            Token::False => Literal::Boolean(false),
            Token::Identifier(id) => {
                if self.eat(&Token::LParen) {
                    let args = self.parse_call_args()?;
                    return Ok(Expr::Call { id: *id, args, line });
                }
                return Ok(Expr::LValue(self.parse_lvalue_from(*id, line)?));
            },
            Token::LParen => {
                let expr = self.parse_expression()?;
                self.expect(&Token::RParen, "')'")?;
                return Ok(expr);
            },
            _ => return Err(Self::unexpected_at(spanned, "an expression")),
        };
        Ok(Expr::Literal { value, line })
    }

    /// Parses a call's argument list, the opening `(` already consumed.
    /// `()` is a valid empty list.
    pub(in crate::interpreter::parser) fn parse_call_args(&mut self) -> ParseResult<Vec<Expr>> {
        let mut args = Vec::new();
        if self.eat(&Token::RParen) {
            return Ok(args);
        }
        loop {
            args.push(self.parse_expression()?);
            if self.eat(&Token::Comma) {
                continue;
            }
            self.expect(&Token::RParen, "')'")?;
            return Ok(args);
        }
    }

    /// Parses an lvalue starting at an identifier token.
    pub(in crate::interpreter::parser) fn parse_lvalue(&mut self) -> ParseResult<LValue> {
        let (id, line) = self.expect_identifier()?;
        self.parse_lvalue_from(id, line)
    }

    /// Parses the index part of an lvalue whose identifier has already been
    /// consumed. Indexes may be written comma-separated in one bracket pair
    /// (`grid[1, 2]`) or as chained bracket pairs (`grid[1][2]`); both
    /// flatten into one index list.
    pub(in crate::interpreter::parser) fn parse_lvalue_from(&mut self,
                                                            id: i64,
                                                            line: usize)
                                                            -> ParseResult<LValue> {
        let mut indexes = Vec::new();
        while self.eat(&Token::LBracket) {
            loop {
                indexes.push(self.parse_expression()?);
                if self.eat(&Token::Comma) {
                    continue;
                }
                self.expect(&Token::RBracket, "']'")?;
                break;
            }
        }
        Ok(LValue { id, indexes, line })
    }
}

use crate::{
    ast::{BinaryOperator, Expr},
    interpreter::{
        lexer::Token,
        parser::core::{ParseResult, Parser},
    },
};

/// Maps a token to its corresponding binary operator.
///
/// Returns `Some(BinaryOperator)` for the arithmetic, comparison, and
/// logical operator tokens, and `None` for everything else.
#[must_use]
pub const fn token_to_binary_operator(token: &Token) -> Option<BinaryOperator> {
    match token {
        Token::Or => Some(BinaryOperator::Or),
        Token::And => Some(BinaryOperator::And),
        Token::Eq => Some(BinaryOperator::Eq),
        Token::LtGt => Some(BinaryOperator::NotEq),
        Token::Lt => Some(BinaryOperator::Lt),
        Token::LtEq => Some(BinaryOperator::LtEq),
        Token::Gt => Some(BinaryOperator::Gt),
        Token::GtEq => Some(BinaryOperator::GtEq),
        Token::Plus => Some(BinaryOperator::Add),
        Token::Minus => Some(BinaryOperator::Sub),
        Token::Star => Some(BinaryOperator::Mul),
        Token::Slash => Some(BinaryOperator::Div),
        Token::Mod => Some(BinaryOperator::Mod),
        Token::Div => Some(BinaryOperator::IntDiv),
        _ => None,
    }
}

impl Parser<'_> {
    /// Parses a full expression.
    ///
    /// This is the entry point for expression parsing. It begins at the
    /// loosest precedence tier, logical OR, and descends through the tiers
    /// by recursion. All binary operators are left-associative.
    ///
    /// Grammar: `expression := or`
    pub(in crate::interpreter::parser) fn parse_expression(&mut self) -> ParseResult<Expr> {
        self.parse_or()
    }

    /// Consumes the next token if it maps to an operator in `tier`,
    /// returning the operator and its line.
    fn eat_tier(&mut self, tier: &[BinaryOperator]) -> Option<(BinaryOperator, usize)> {
        let spanned = self.peek();
        let op = token_to_binary_operator(&spanned.token)?;
        if tier.contains(&op) {
            let line = spanned.line;
            self.next();
            Some((op, line))
        } else {
            None
        }
    }

    /// Parses a left-associative chain of OR expressions.
    ///
    /// Grammar: `or := and ("OR" and)*`
    fn parse_or(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_and()?;
        while let Some((op, line)) = self.eat_tier(&[BinaryOperator::Or]) {
            let right = self.parse_and()?;
            left = Expr::Binary { left: Box::new(left),
                                  op,
                                  right: Box::new(right),
                                  line };
        }
        Ok(left)
    }

    /// Parses a left-associative chain of AND expressions.
    ///
    /// Grammar: `and := comparison ("AND" comparison)*`
    fn parse_and(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_comparison()?;
        while let Some((op, line)) = self.eat_tier(&[BinaryOperator::And]) {
            let right = self.parse_comparison()?;
            left = Expr::Binary { left: Box::new(left),
                                  op,
                                  right: Box::new(right),
                                  line };
        }
        Ok(left)
    }

    /// Parses the comparison tier: `=`, `<>`, `<`, `<=`, `>`, `>=`.
    ///
    /// Grammar: `comparison := additive (("=" | "<>" | "<" | "<=" | ">" | ">=") additive)*`
    fn parse_comparison(&mut self) -> ParseResult<Expr> {
        const TIER: &[BinaryOperator] = &[BinaryOperator::Eq,
                                          BinaryOperator::NotEq,
                                          BinaryOperator::Lt,
                                          BinaryOperator::LtEq,
                                          BinaryOperator::Gt,
                                          BinaryOperator::GtEq];
        let mut left = self.parse_additive()?;
        while let Some((op, line)) = self.eat_tier(TIER) {
            let right = self.parse_additive()?;
            left = Expr::Binary { left: Box::new(left),
                                  op,
                                  right: Box::new(right),
                                  line };
        }
        Ok(left)
    }

    /// Parses addition and subtraction.
    ///
    /// Grammar: `additive := multiplicative (("+" | "-") multiplicative)*`
    fn parse_additive(&mut self) -> ParseResult<Expr> {
        const TIER: &[BinaryOperator] = &[BinaryOperator::Add, BinaryOperator::Sub];
        let mut left = self.parse_multiplicative()?;
        while let Some((op, line)) = self.eat_tier(TIER) {
            let right = self.parse_multiplicative()?;
            left = Expr::Binary { left: Box::new(left),
                                  op,
                                  right: Box::new(right),
                                  line };
        }
        Ok(left)
    }

    /// Parses the tightest binary tier: `*`, `/`, `MOD`, `DIV`.
    ///
    /// Grammar: `multiplicative := unary (("*" | "/" | "MOD" | "DIV") unary)*`
    fn parse_multiplicative(&mut self) -> ParseResult<Expr> {
        const TIER: &[BinaryOperator] = &[BinaryOperator::Mul,
                                          BinaryOperator::Div,
                                          BinaryOperator::Mod,
                                          BinaryOperator::IntDiv];
        let mut left = self.parse_unary()?;
        while let Some((op, line)) = self.eat_tier(TIER) {
            let right = self.parse_unary()?;
            left = Expr::Binary { left: Box::new(left),
                                  op,
                                  right: Box::new(right),
                                  line };
        }
        Ok(left)
    }
}

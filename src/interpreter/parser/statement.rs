use crate::{
    ast::{Block, CaseArm, Param, Stmt, TypeExpr},
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::core::{ParseResult, Parser},
        value::core::Primitive,
    },
};

/// The most parameters a procedure or function may declare.
const MAX_PARAMETERS: usize = 64;

/// True for tokens that can begin an inner statement. Blocks extend as long
/// as the next token passes this test.
const fn starts_statement(token: &Token) -> bool {
    matches!(token,
             Token::Identifier(_)
             | Token::Input
             | Token::Output
             | Token::If
             | Token::Case
             | Token::For
             | Token::Repeat
             | Token::While
             | Token::Call
             | Token::Return)
}

impl Parser<'_> {
    /// Parses one top-level statement.
    ///
    /// DECLARE, CONSTANT, PROCEDURE, and FUNCTION may only appear here; any
    /// other valid statement start falls through to the inner-statement
    /// parser.
    pub(in crate::interpreter::parser) fn parse_top_statement(&mut self) -> ParseResult<Stmt> {
        match self.peek().token {
            Token::Declare => self.parse_declare(),
            Token::Constant => self.parse_constant(),
            Token::Procedure => self.parse_procedure(),
            Token::Function => self.parse_function(),
            _ => self.parse_statement(false),
        }
    }

    /// `DECLARE id : Type`
    fn parse_declare(&mut self) -> ParseResult<Stmt> {
        let line = self.next().line;
        let (id, _) = self.expect_identifier()?;
        self.expect(&Token::Colon, "':'")?;
        let typ = self.parse_type()?;
        Ok(Stmt::Declare { id, typ, line })
    }

    /// `CONSTANT id = Expr`
    fn parse_constant(&mut self) -> ParseResult<Stmt> {
        let line = self.next().line;
        let (id, _) = self.expect_identifier()?;
        self.expect(&Token::Eq, "'='")?;
        let expr = self.parse_expression()?;
        Ok(Stmt::Constant { id, expr, line })
    }

    /// `PROCEDURE id [(params)] Block ENDPROCEDURE`
    fn parse_procedure(&mut self) -> ParseResult<Stmt> {
        let line = self.next().line;
        let (id, _) = self.expect_identifier()?;
        let params = if self.eat(&Token::LParen) { self.parse_params()? } else { Vec::new() };
        let body = self.parse_block(false)?;
        self.expect(&Token::EndProcedure, "ENDPROCEDURE")?;
        Ok(Stmt::Procedure { id, params, body, line })
    }

    /// `FUNCTION id [(params)] RETURNS Type Block ENDFUNCTION`
    ///
    /// The body block (and every block nested inside it) permits RETURN.
    fn parse_function(&mut self) -> ParseResult<Stmt> {
        let line = self.next().line;
        let (id, _) = self.expect_identifier()?;
        let params = if self.eat(&Token::LParen) { self.parse_params()? } else { Vec::new() };
        self.expect(&Token::Returns, "RETURNS")?;
        let ret = self.parse_type()?;
        let body = self.parse_block(true)?;
        self.expect(&Token::EndFunction, "ENDFUNCTION")?;
        Ok(Stmt::Function { id,
                            params,
                            ret,
                            body,
                            line })
    }

    /// Parses one inner statement, dispatching on its first token.
    ///
    /// `is_func` is true inside FUNCTION bodies and gates RETURN.
    fn parse_statement(&mut self, is_func: bool) -> ParseResult<Stmt> {
        let spanned = self.next();
        let line = spanned.line;
        match &spanned.token {
            Token::Identifier(id) => {
                let target = self.parse_lvalue_from(*id, line)?;
                self.expect(&Token::Assign, "'<-'")?;
                let expr = self.parse_expression()?;
                Ok(Stmt::Assign { target, expr, line })
            },
            Token::Input => {
                let target = self.parse_lvalue()?;
                Ok(Stmt::Input { target, line })
            },
            Token::Output => {
                let mut exprs = vec![self.parse_expression()?];
                while self.eat(&Token::Comma) {
                    exprs.push(self.parse_expression()?);
                }
                Ok(Stmt::Output { exprs, line })
            },
            Token::If => {
                let cond = self.parse_expression()?;
                self.expect(&Token::Then, "THEN")?;
                let then_block = self.parse_block(is_func)?;
                let else_block =
                    if self.eat(&Token::Else) { Some(self.parse_block(is_func)?) } else { None };
                self.expect(&Token::EndIf, "ENDIF")?;
                Ok(Stmt::If { cond,
                              then_block,
                              else_block,
                              line })
            },
            Token::Case => self.parse_case(is_func, line),
            Token::For => {
                let (id, _) = self.expect_identifier()?;
                self.expect(&Token::Assign, "'<-'")?;
                let from = self.parse_expression()?;
                self.expect(&Token::To, "TO")?;
                let to = self.parse_expression()?;
                let step =
                    if self.eat(&Token::Step) { Some(self.parse_expression()?) } else { None };
                let body = self.parse_block(is_func)?;
                self.expect(&Token::Next, "NEXT")?;
                Ok(Stmt::For { id,
                               from,
                               to,
                               step,
                               body,
                               line })
            },
            Token::Repeat => {
                let body = self.parse_block(is_func)?;
                self.expect(&Token::Until, "UNTIL")?;
                let until = self.parse_expression()?;
                Ok(Stmt::Repeat { body, until, line })
            },
            Token::While => {
                let cond = self.parse_expression()?;
                self.expect(&Token::Do, "DO")?;
                let body = self.parse_block(is_func)?;
                self.expect(&Token::EndWhile, "ENDWHILE")?;
                Ok(Stmt::While { cond, body, line })
            },
            Token::Call => {
                let (id, _) = self.expect_identifier()?;
                let args =
                    if self.eat(&Token::LParen) { self.parse_call_args()? } else { Vec::new() };
                Ok(Stmt::Call { id, args, line })
            },
            Token::Return => {
                if !is_func {
                    return Err(ParseError::ReturnOutsideFunction { line, col: spanned.col });
                }
                let expr = self.parse_expression()?;
                Ok(Stmt::Return { expr, line })
            },
            _ => Err(Self::unexpected_at(spanned, "the start of a statement")),
        }
    }

    /// `CASE OF LValue { Expr : Block } [OTHERWISE Block] ENDCASE`
    ///
    /// At least one arm is required; OTHERWISE, when present, must be last.
    fn parse_case(&mut self, is_func: bool, line: usize) -> ParseResult<Stmt> {
        self.expect(&Token::Of, "OF")?;
        let selector = self.parse_lvalue()?;
        let mut arms = Vec::new();
        let mut otherwise = None;
        loop {
            let value = self.parse_expression()?;
            self.expect(&Token::Colon, "':'")?;
            let body = self.parse_block(is_func)?;
            arms.push(CaseArm { value, body });
            if self.eat(&Token::Otherwise) {
                otherwise = Some(self.parse_block(is_func)?);
                self.expect(&Token::EndCase, "ENDCASE")?;
                break;
            }
            if self.eat(&Token::EndCase) {
                break;
            }
        }
        Ok(Stmt::Case { selector,
                        arms,
                        otherwise,
                        line })
    }

    /// Parses statements until the next token cannot start one.
    fn parse_block(&mut self, is_func: bool) -> ParseResult<Block> {
        let mut stmts = Vec::new();
        while starts_statement(&self.peek().token) {
            stmts.push(self.parse_statement(is_func)?);
        }
        Ok(Block { stmts, is_func })
    }

    /// Parses a parameter list, the opening `(` already consumed.
    ///
    /// Each parameter is `[BYREF] id : Type`. At most [`MAX_PARAMETERS`] are
    /// accepted.
    fn parse_params(&mut self) -> ParseResult<Vec<Param>> {
        let mut params = Vec::new();
        if self.eat(&Token::RParen) {
            return Ok(params);
        }
        loop {
            let line = self.peek().line;
            let byref = self.eat(&Token::ByRef);
            let (id, _) = self.expect_identifier()?;
            self.expect(&Token::Colon, "':'")?;
            let typ = self.parse_type()?;
            params.push(Param { byref, id, typ, line });
            if params.len() > MAX_PARAMETERS {
                let spanned = self.peek();
                return Err(ParseError::TooManyParameters { line: spanned.line,
                                                           col:  spanned.col, });
            }
            if self.eat(&Token::Comma) {
                continue;
            }
            self.expect(&Token::RParen, "')'")?;
            return Ok(params);
        }
    }

    /// Parses a type: a type keyword, or `ARRAY [ Expr : Expr ] OF Type`.
    /// Each ARRAY layer adds one dimension; bounds are arbitrary expressions
    /// checked and evaluated at declaration time.
    fn parse_type(&mut self) -> ParseResult<TypeExpr> {
        let spanned = self.next();
        let line = spanned.line;
        let primitive = match spanned.token {
            Token::Array => {
                self.expect(&Token::LBracket, "'['")?;
                let lo = self.parse_expression()?;
                self.expect(&Token::Colon, "':'")?;
                let hi = self.parse_expression()?;
                self.expect(&Token::RBracket, "']'")?;
                self.expect(&Token::Of, "OF")?;
                let element = self.parse_type()?;
                return Ok(TypeExpr::Array { lo:      Box::new(lo),
                                            hi:      Box::new(hi),
                                            element: Box::new(element),
                                            line });
            },
            Token::Integer => Primitive::Integer,
            Token::Real => Primitive::Real,
            Token::String => Primitive::String,
            Token::Char => Primitive::Char,
            Token::Boolean => Primitive::Boolean,
            Token::Date => Primitive::Date,
            _ => return Err(Self::unexpected_at(spanned, "a type name")),
        };
        Ok(TypeExpr::Primitive { primitive, line })
    }
}

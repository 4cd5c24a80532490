use std::rc::Rc;

use crate::interpreter::value::{core::Primitive, date::Date, fraction::Fraction};

/// A literal constant as it appears in source code.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// An integer constant such as `42`.
    Integer(i64),
    /// A real constant such as `4.999`, stored exactly.
    Real(Fraction),
    /// A string constant; the body is interned by the lexer.
    Str(Rc<str>),
    /// A character constant such as `'#'`.
    Char(u8),
    /// `TRUE` or `FALSE`.
    Boolean(bool),
    /// A date constant such as `21/11/2019`.
    Date(Date),
}

/// A storage location: an identifier with an optional index list.
///
/// `a` names a whole variable; `a[2]` or `grid[1, 2]` name one element. The
/// identifier is the lexer's interned ID, never a name.
#[derive(Debug, Clone, PartialEq)]
pub struct LValue {
    /// The interned identifier ID.
    pub id:      i64,
    /// One index expression per array dimension; empty for plain variables.
    pub indexes: Vec<Expr>,
    /// Line number in the source code.
    pub line:    usize,
}

/// An expression tree node.
///
/// Binary operators are folded left-associatively by the parser, so `a-b-c`
/// arrives as `(a-b)-c`. Every node records the line it started on.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal constant.
    Literal {
        /// The constant value.
        value: Literal,
        /// Line number in the source code.
        line:  usize,
    },
    /// A read of a variable or array element.
    LValue(LValue),
    /// A function call used as a value, such as `sq(5)`.
    Call {
        /// The interned identifier ID of the function.
        id:   i64,
        /// The argument expressions, in order.
        args: Vec<Expr>,
        /// Line number in the source code.
        line: usize,
    },
    /// A prefix operation: `NOT` or unary minus.
    Unary {
        /// The operator.
        op:   UnaryOperator,
        /// The operand, which may itself be unary.
        expr: Box<Expr>,
        /// Line number in the source code.
        line: usize,
    },
    /// A binary operation.
    Binary {
        /// Left operand.
        left:  Box<Expr>,
        /// The operator.
        op:    BinaryOperator,
        /// Right operand.
        right: Box<Expr>,
        /// Line number in the source code.
        line:  usize,
    },
}

impl Expr {
    /// Gets the line number from `self`.
    #[must_use]
    pub const fn line_number(&self) -> usize {
        match self {
            Self::Literal { line, .. }
            | Self::Call { line, .. }
            | Self::Unary { line, .. }
            | Self::Binary { line, .. } => *line,
            Self::LValue(lvalue) => lvalue.line,
        }
    }
}

/// A binary operator, grouped into five precedence tiers by the parser:
/// `OR`; `AND`; comparisons; `+ -`; `* / MOD DIV` (tightest).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    /// Logical or (`OR`)
    Or,
    /// Logical and (`AND`)
    And,
    /// Equal (`=`)
    Eq,
    /// Not equal (`<>`)
    NotEq,
    /// Less than (`<`)
    Lt,
    /// Less than or equal (`<=`)
    LtEq,
    /// Greater than (`>`)
    Gt,
    /// Greater than or equal (`>=`)
    GtEq,
    /// Addition (`+`)
    Add,
    /// Subtraction (`-`)
    Sub,
    /// Multiplication (`*`)
    Mul,
    /// Division (`/`), always producing REAL
    Div,
    /// Integer remainder (`MOD`)
    Mod,
    /// Truncating integer quotient (`DIV`)
    IntDiv,
}

impl std::fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let operator = match self {
            Self::Or => "OR",
            Self::And => "AND",
            Self::Eq => "=",
            Self::NotEq => "<>",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "MOD",
            Self::IntDiv => "DIV",
        };
        write!(f, "{operator}")
    }
}

/// A unary prefix operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    /// Logical not (`NOT`)
    Not,
    /// Arithmetic negation (`-`)
    Negate,
}

/// A type as written in source: a type keyword, or nested `ARRAY [lo:hi] OF`
/// layers whose bounds are arbitrary expressions evaluated at declaration
/// time.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    /// A primitive type keyword.
    Primitive {
        /// The primitive named by the keyword.
        primitive: Primitive,
        /// Line number in the source code.
        line:      usize,
    },
    /// One `ARRAY [lo:hi] OF element` layer.
    Array {
        /// The start-index expression.
        lo:      Box<Expr>,
        /// The end-index expression.
        hi:      Box<Expr>,
        /// The element type, possibly another array layer.
        element: Box<TypeExpr>,
        /// Line number in the source code.
        line:    usize,
    },
}

/// A declared procedure or function parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    /// Whether the parameter was marked BYREF.
    pub byref: bool,
    /// The interned identifier ID of the parameter.
    pub id:    i64,
    /// The declared type.
    pub typ:   TypeExpr,
    /// Line number in the source code.
    pub line:  usize,
}

/// One `value : block` arm of a CASE statement.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseArm {
    /// The expression compared against the selector.
    pub value: Expr,
    /// The statements executed on a match.
    pub body:  Block,
}

/// A single statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `DECLARE id : Type`
    Declare {
        /// The interned identifier ID.
        id:   i64,
        /// The declared type.
        typ:  TypeExpr,
        /// Line number in the source code.
        line: usize,
    },
    /// `CONSTANT id = Expr`
    Constant {
        /// The interned identifier ID.
        id:   i64,
        /// The value expression, evaluated at declaration time.
        expr: Expr,
        /// Line number in the source code.
        line: usize,
    },
    /// `PROCEDURE id [(params)] ... ENDPROCEDURE`
    Procedure {
        /// The interned identifier ID of the procedure.
        id:     i64,
        /// The declared parameters.
        params: Vec<Param>,
        /// The body.
        body:   Block,
        /// Line number in the source code.
        line:   usize,
    },
    /// `FUNCTION id [(params)] RETURNS Type ... ENDFUNCTION`
    Function {
        /// The interned identifier ID of the function.
        id:     i64,
        /// The declared parameters.
        params: Vec<Param>,
        /// The declared return type.
        ret:    TypeExpr,
        /// The body; RETURN is permitted inside it.
        body:   Block,
        /// Line number in the source code.
        line:   usize,
    },
    /// `LValue <- Expr`
    Assign {
        /// The target location.
        target: LValue,
        /// The value expression.
        expr:   Expr,
        /// Line number in the source code.
        line:   usize,
    },
    /// `INPUT LValue`
    Input {
        /// The target location.
        target: LValue,
        /// Line number in the source code.
        line:   usize,
    },
    /// `OUTPUT Expr {, Expr}`
    Output {
        /// The expressions printed in order, with no separator.
        exprs: Vec<Expr>,
        /// Line number in the source code.
        line:  usize,
    },
    /// `IF Expr THEN ... [ELSE ...] ENDIF`
    If {
        /// The condition; must be BOOLEAN.
        cond:       Expr,
        /// The THEN branch.
        then_block: Block,
        /// The optional ELSE branch.
        else_block: Option<Block>,
        /// Line number in the source code.
        line:       usize,
    },
    /// `CASE OF LValue { Expr : ... } [OTHERWISE ...] ENDCASE`
    Case {
        /// The selector location.
        selector:  LValue,
        /// The arms, scanned in order; the first match wins.
        arms:      Vec<CaseArm>,
        /// The optional OTHERWISE block.
        otherwise: Option<Block>,
        /// Line number in the source code.
        line:      usize,
    },
    /// `FOR id <- Expr TO Expr [STEP Expr] ... NEXT`
    For {
        /// The interned identifier ID of the loop variable.
        id:   i64,
        /// The start expression.
        from: Expr,
        /// The end expression.
        to:   Expr,
        /// The optional step expression; defaults to 1.
        step: Option<Expr>,
        /// The loop body.
        body: Block,
        /// Line number in the source code.
        line: usize,
    },
    /// `REPEAT ... UNTIL Expr`
    Repeat {
        /// The loop body, executed at least once.
        body:  Block,
        /// The exit condition; must be BOOLEAN.
        until: Expr,
        /// Line number in the source code.
        line:  usize,
    },
    /// `WHILE Expr DO ... ENDWHILE`
    While {
        /// The condition; must be BOOLEAN.
        cond: Expr,
        /// The loop body.
        body: Block,
        /// Line number in the source code.
        line: usize,
    },
    /// `CALL id [(args)]`
    Call {
        /// The interned identifier ID of the callee.
        id:   i64,
        /// The argument expressions, in order.
        args: Vec<Expr>,
        /// Line number in the source code.
        line: usize,
    },
    /// `RETURN Expr`, only inside FUNCTION bodies.
    Return {
        /// The returned expression, evaluated in the callee's frame.
        expr: Expr,
        /// Line number in the source code.
        line: usize,
    },
}

/// A sequence of inner statements, such as a loop body or an IF branch.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// The statements, in order.
    pub stmts:   Vec<Stmt>,
    /// Whether RETURN statements are permitted inside this block. Set for
    /// every block nested in a FUNCTION body.
    pub is_func: bool,
}

/// A whole parsed program: the ordered top-level statements.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    /// The top-level statements, in order.
    pub stmts: Vec<Stmt>,
}

use std::rc::Rc;

use crate::{
    error::TypeError,
    interpreter::{
        evaluator::core::EvalResult,
        value::{date::Date, fraction::Fraction},
    },
};

/// The primitive kinds of the language.
///
/// `Invalid` marks a variable slot that has been allocated but never
/// declared, or whose declaration went out of scope. It is also used as the
/// "return type" of procedures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    /// A 64-bit signed integer.
    Integer,
    /// An exact rational number.
    Real,
    /// An immutable byte string.
    String,
    /// A single ASCII byte.
    Char,
    /// `TRUE` or `FALSE`.
    Boolean,
    /// A calendar date.
    Date,
    /// No type. Marks undeclared slots and procedure "returns".
    Invalid,
}

impl std::fmt::Display for Primitive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Integer => "INTEGER",
            Self::Real => "REAL",
            Self::String => "STRING",
            Self::Char => "CHAR",
            Self::Boolean => "BOOLEAN",
            Self::Date => "DATE",
            Self::Invalid => "INVALID",
        };
        write!(f, "{name}")
    }
}

/// A full type descriptor: a primitive, optionally wrapped in array bounds.
///
/// `bounds` holds one `(lo, hi)` pair per array dimension, outermost first;
/// an empty list means a plain primitive.
#[derive(Debug, Clone)]
pub struct EType {
    /// Inclusive `(lo, hi)` index bounds, one pair per dimension.
    pub bounds:    Vec<(i64, i64)>,
    /// The element primitive (or the scalar itself).
    pub primitive: Primitive,
}

impl EType {
    /// A scalar type with no array dimensions.
    #[must_use]
    pub const fn scalar(primitive: Primitive) -> Self {
        Self { bounds: Vec::new(),
               primitive }
    }

    /// Returns `true` if this type has at least one array dimension.
    #[must_use]
    pub fn is_array(&self) -> bool {
        !self.bounds.is_empty()
    }

    /// Returns `true` if this is the unset marker type.
    #[must_use]
    pub fn is_invalid(&self) -> bool {
        !self.is_array() && self.primitive == Primitive::Invalid
    }
}

impl From<Primitive> for EType {
    fn from(primitive: Primitive) -> Self {
        Self::scalar(primitive)
    }
}

impl PartialEq for EType {
    /// Two types are equal iff their primitives match, their dimension counts
    /// match, and each dimension has the same *length*. The bounds themselves
    /// do not have to line up: the pseudocode guide explicitly makes
    ///
    /// ```text
    /// DECLARE arr: ARRAY[0:1] OF INTEGER
    /// DECLARE bar: ARRAY[1:2] OF INTEGER
    /// bar <- arr
    /// ```
    ///
    /// legal, because both arrays hold two integers.
    fn eq(&self, other: &Self) -> bool {
        self.primitive == other.primitive
        && self.bounds.len() == other.bounds.len()
        && self.bounds
               .iter()
               .zip(&other.bounds)
               .all(|(&(a_lo, a_hi), &(b_lo, b_hi))| a_hi - a_lo == b_hi - b_lo)
    }
}

impl PartialEq<Primitive> for EType {
    fn eq(&self, other: &Primitive) -> bool {
        !self.is_array() && self.primitive == *other
    }
}

impl std::fmt::Display for EType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for &(lo, hi) in &self.bounds {
            write!(f, "ARRAY[{lo}:{hi}] OF ")?;
        }
        write!(f, "{}", self.primitive)
    }
}

/// A runtime value.
///
/// The variant always agrees with the `EType` of the slot or expression that
/// produced it. Arrays are trees of vectors, one level per dimension, and
/// `Clone` is a deep copy, which is exactly the language's array assignment
/// semantics.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A 64-bit signed integer.
    Integer(i64),
    /// An exact rational.
    Real(Fraction),
    /// An interned, immutable string.
    Str(Rc<str>),
    /// A single ASCII byte.
    Char(u8),
    /// A boolean.
    Boolean(bool),
    /// A calendar date.
    Date(Date),
    /// A dense array of values, one vector level per dimension.
    Array(Vec<Value>),
}

impl Value {
    /// The zero value used for freshly declared variables: `0`, `0/1`, the
    /// empty string, the NUL byte, `FALSE`, the epoch date, or a
    /// recursively zeroed array.
    #[must_use]
    pub fn zero_of(ty: &EType) -> Self {
        if let Some((&(lo, hi), rest)) = ty.bounds.split_first() {
            let len = hi.checked_sub(lo)
                        .and_then(|d| d.checked_add(1))
                        .and_then(|len| usize::try_from(len).ok())
                        .unwrap_or(0);
            let element = EType { bounds:    rest.to_vec(),
                                  primitive: ty.primitive, };
            return Self::Array(vec![Self::zero_of(&element); len]);
        }
        match ty.primitive {
            Primitive::Real => Self::Real(Fraction::from(0)),
            Primitive::String => Self::Str(Rc::from("")),
            Primitive::Char => Self::Char(0),
            Primitive::Boolean => Self::Boolean(false),
            Primitive::Date => Self::Date(Date::EPOCH),
            Primitive::Integer | Primitive::Invalid => Self::Integer(0),
        }
    }

    /// The display name of the value's kind, for error messages.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Integer(_) => "INTEGER",
            Self::Real(_) => "REAL",
            Self::Str(_) => "STRING",
            Self::Char(_) => "CHAR",
            Self::Boolean(_) => "BOOLEAN",
            Self::Date(_) => "DATE",
            Self::Array(_) => "ARRAY",
        }
    }

    /// Unwraps an `Integer`, or reports what was found instead.
    pub fn as_integer(&self, line: usize) -> EvalResult<i64> {
        match self {
            Self::Integer(n) => Ok(*n),
            other => Err(mismatch("INTEGER", other, line)),
        }
    }

    /// Unwraps a `Real`, or reports what was found instead.
    pub fn as_real(&self, line: usize) -> EvalResult<Fraction> {
        match self {
            Self::Real(r) => Ok(*r),
            other => Err(mismatch("REAL", other, line)),
        }
    }

    /// Unwraps a `Boolean`, or reports what was found instead.
    pub fn as_bool(&self, line: usize) -> EvalResult<bool> {
        match self {
            Self::Boolean(b) => Ok(*b),
            other => Err(mismatch("BOOLEAN", other, line)),
        }
    }

    /// Promotes an `Integer` to a `Fraction`, passes a `Real` through.
    pub fn as_number(&self, line: usize) -> EvalResult<Fraction> {
        match self {
            Self::Integer(n) => Ok(Fraction::from(*n)),
            Self::Real(r) => Ok(*r),
            other => Err(mismatch("INTEGER or REAL", other, line)),
        }
    }
}

fn mismatch(expected: &str, found: &Value, line: usize) -> crate::error::EvalError {
    TypeError::Mismatch { expected: expected.to_string(),
                          found: found.type_name().to_string(),
                          line }.into()
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<Fraction> for Value {
    fn from(value: Fraction) -> Self {
        Self::Real(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<Date> for Value {
    fn from(value: Date) -> Self {
        Self::Date(value)
    }
}

impl std::fmt::Display for Value {
    /// Formats a value the way OUTPUT prints it: integers in decimal, reals
    /// as the closest double, booleans as `TRUE`/`FALSE`, chars as their
    /// byte, strings verbatim, dates as `d/m/y`. Arrays render bracketed for
    /// debugging; OUTPUT rejects them before formatting.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Real(r) => write!(f, "{}", r.to_f64()),
            Self::Str(s) => write!(f, "{s}"),
            Self::Char(c) => write!(f, "{}", *c as char),
            Self::Boolean(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            Self::Date(d) => write!(f, "{d}"),
            Self::Array(items) => {
                write!(f, "[")?;
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            },
        }
    }
}

use std::cmp::Ordering;

use crate::{
    ast::{BinaryOperator, Expr},
    error::{RuntimeError, TypeError},
    interpreter::{
        evaluator::core::{Env, EvalResult, expect_numeric, expect_primitive, is_numeric},
        value::{
            core::{EType, Primitive, Value},
            fraction::Fraction,
        },
    },
};

impl<'a> Env<'a> {
    /// Computes the result type of a binary expression.
    ///
    /// - OR and AND take two BOOLEANs and give BOOLEAN.
    /// - The comparisons give BOOLEAN; INTEGER and REAL mix freely, any
    ///   other pairing must be of one type, and arrays never compare.
    /// - `+ - *` give REAL if either side is REAL, else INTEGER.
    /// - `/` always gives REAL.
    /// - MOD and DIV take two INTEGERs and give INTEGER.
    pub(in crate::interpreter::evaluator) fn binary_type(&self,
                                                         left: &Expr,
                                                         op: BinaryOperator,
                                                         right: &Expr,
                                                         line: usize)
                                                         -> EvalResult<EType> {
        let left_ty = self.type_of(left)?;
        let right_ty = self.type_of(right)?;
        match op {
            BinaryOperator::Or | BinaryOperator::And => {
                expect_primitive(&left_ty, Primitive::Boolean, line)?;
                expect_primitive(&right_ty, Primitive::Boolean, line)?;
                Ok(EType::scalar(Primitive::Boolean))
            },
            BinaryOperator::Eq
            | BinaryOperator::NotEq
            | BinaryOperator::Lt
            | BinaryOperator::LtEq
            | BinaryOperator::Gt
            | BinaryOperator::GtEq => {
                if left_ty.is_array() || right_ty.is_array() {
                    return Err(TypeError::ArrayComparison { line }.into());
                }
                if !(is_numeric(&left_ty) && is_numeric(&right_ty)) && left_ty != right_ty {
                    return Err(TypeError::CannotCompare { left:  left_ty.to_string(),
                                                          right: right_ty.to_string(),
                                                          line, }.into());
                }
                Ok(EType::scalar(Primitive::Boolean))
            },
            BinaryOperator::Add | BinaryOperator::Sub | BinaryOperator::Mul => {
                expect_numeric(&left_ty, line)?;
                expect_numeric(&right_ty, line)?;
                if left_ty == Primitive::Real || right_ty == Primitive::Real {
                    Ok(EType::scalar(Primitive::Real))
                } else {
                    Ok(EType::scalar(Primitive::Integer))
                }
            },
            BinaryOperator::Div => {
                expect_numeric(&left_ty, line)?;
                expect_numeric(&right_ty, line)?;
                Ok(EType::scalar(Primitive::Real))
            },
            BinaryOperator::Mod | BinaryOperator::IntDiv => {
                expect_primitive(&left_ty, Primitive::Integer, line)?;
                expect_primitive(&right_ty, Primitive::Integer, line)?;
                Ok(EType::scalar(Primitive::Integer))
            },
        }
    }

    /// Evaluates a binary expression. Operands evaluate left to right; AND
    /// and OR do not short-circuit.
    pub(in crate::interpreter::evaluator) fn eval_binary(&mut self,
                                                         left: &'a Expr,
                                                         op: BinaryOperator,
                                                         right: &'a Expr,
                                                         line: usize)
                                                         -> EvalResult<Value> {
        let left_val = self.eval(left)?;
        let right_val = self.eval(right)?;
        match op {
            BinaryOperator::Or => {
                Ok(Value::Boolean(left_val.as_bool(line)? | right_val.as_bool(line)?))
            },
            BinaryOperator::And => {
                Ok(Value::Boolean(left_val.as_bool(line)? & right_val.as_bool(line)?))
            },
            BinaryOperator::Eq
            | BinaryOperator::NotEq
            | BinaryOperator::Lt
            | BinaryOperator::LtEq
            | BinaryOperator::Gt
            | BinaryOperator::GtEq => {
                Ok(Value::Boolean(compare_values(op, &left_val, &right_val, line)?))
            },
            BinaryOperator::Add | BinaryOperator::Sub | BinaryOperator::Mul => {
                eval_arithmetic(op, &left_val, &right_val, line)
            },
            BinaryOperator::Div => {
                let divisor = right_val.as_number(line)?;
                if divisor.is_zero() {
                    return Err(RuntimeError::DivisionByZero { line }.into());
                }
                left_val.as_number(line)?
                        .checked_div(divisor)
                        .map(Value::Real)
                        .ok_or_else(|| RuntimeError::Overflow { line }.into())
            },
            BinaryOperator::Mod | BinaryOperator::IntDiv => {
                let dividend = left_val.as_integer(line)?;
                let divisor = right_val.as_integer(line)?;
                if divisor == 0 {
                    return Err(RuntimeError::DivisionByZero { line }.into());
                }
                let result = if matches!(op, BinaryOperator::IntDiv) {
                    dividend.checked_div(divisor)
                } else {
                    dividend.checked_rem(divisor)
                };
                result.map(Value::Integer)
                      .ok_or_else(|| RuntimeError::Overflow { line }.into())
            },
        }
    }
}

/// `+`, `-`, and `*` over two numeric values. Two INTEGERs stay INTEGER
/// with overflow checking; any REAL operand promotes the other side and the
/// result is exact rational.
fn eval_arithmetic(op: BinaryOperator,
                   left: &Value,
                   right: &Value,
                   line: usize)
                   -> EvalResult<Value> {
    if let (Value::Integer(a), Value::Integer(b)) = (left, right) {
        let result = match op {
            BinaryOperator::Add => a.checked_add(*b),
            BinaryOperator::Sub => a.checked_sub(*b),
            _ => a.checked_mul(*b),
        };
        return result.map(Value::Integer)
                     .ok_or_else(|| RuntimeError::Overflow { line }.into());
    }
    let a = left.as_number(line)?;
    let b = right.as_number(line)?;
    let result = match op {
        BinaryOperator::Add => a.checked_add(b),
        BinaryOperator::Sub => a.checked_sub(b),
        _ => a.checked_mul(b),
    };
    result.map(Value::Real).ok_or_else(|| RuntimeError::Overflow { line }.into())
}

/// Compares two values under one of the six comparison operators.
///
/// INTEGER and REAL mix by promoting the integer side; every other pairing
/// must match exactly. Strings compare by bytes, dates by (year, month,
/// day). Shared with CASE arm matching.
pub(in crate::interpreter::evaluator) fn compare_values(op: BinaryOperator,
                                                        left: &Value,
                                                        right: &Value,
                                                        line: usize)
                                                        -> EvalResult<bool> {
    let ordering = match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => a.cmp(b),
        (Value::Real(a), Value::Real(b)) => a.cmp(b),
        (Value::Integer(a), Value::Real(b)) => Fraction::from(*a).cmp(b),
        (Value::Real(a), Value::Integer(b)) => a.cmp(&Fraction::from(*b)),
        (Value::Str(a), Value::Str(b)) => a.as_ref().cmp(b.as_ref()),
        (Value::Char(a), Value::Char(b)) => a.cmp(b),
        (Value::Boolean(a), Value::Boolean(b)) => a.cmp(b),
        (Value::Date(a), Value::Date(b)) => a.cmp(b),
        (Value::Array(_), _) | (_, Value::Array(_)) => {
            return Err(TypeError::ArrayComparison { line }.into());
        },
        (a, b) => {
            return Err(TypeError::CannotCompare { left:  a.type_name().to_string(),
                                                  right: b.type_name().to_string(),
                                                  line, }.into());
        },
    };
    Ok(apply_comparison(op, ordering))
}

const fn apply_comparison(op: BinaryOperator, ordering: Ordering) -> bool {
    match op {
        BinaryOperator::Eq => matches!(ordering, Ordering::Equal),
        BinaryOperator::NotEq => !matches!(ordering, Ordering::Equal),
        BinaryOperator::Lt => matches!(ordering, Ordering::Less),
        BinaryOperator::LtEq => !matches!(ordering, Ordering::Greater),
        BinaryOperator::Gt => matches!(ordering, Ordering::Greater),
        BinaryOperator::GtEq => !matches!(ordering, Ordering::Less),
        _ => false,
    }
}

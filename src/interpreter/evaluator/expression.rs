use std::rc::Rc;

use crate::{
    ast::{Expr, LValue, Literal, UnaryOperator},
    error::{RuntimeError, TypeError},
    interpreter::{
        evaluator::core::{Env, EvalResult, expect_numeric, expect_primitive},
        value::core::{EType, Primitive, Value},
    },
    util::num::i64_to_usize_checked,
};

/// The primitive kind a literal constant carries.
const fn literal_primitive(literal: &Literal) -> Primitive {
    match literal {
        Literal::Integer(_) => Primitive::Integer,
        Literal::Real(_) => Primitive::Real,
        Literal::Str(_) => Primitive::String,
        Literal::Char(_) => Primitive::Char,
        Literal::Boolean(_) => Primitive::Boolean,
        Literal::Date(_) => Primitive::Date,
    }
}

fn literal_value(literal: &Literal) -> Value {
    match literal {
        Literal::Integer(value) => Value::Integer(*value),
        Literal::Real(value) => Value::Real(*value),
        Literal::Str(value) => Value::Str(Rc::clone(value)),
        Literal::Char(value) => Value::Char(*value),
        Literal::Boolean(value) => Value::Boolean(*value),
        Literal::Date(value) => Value::Date(*value),
    }
}

/// The internal-inconsistency error for index chains that outrun the value
/// tree. Index counts are checked against the declared type first, so this
/// only fires if storage and type ever disagree.
fn dimension_error(line: usize) -> crate::error::EvalError {
    TypeError::Mismatch { expected: "ARRAY".to_string(),
                          found: "a scalar".to_string(),
                          line }.into()
}

/// Follows a chain of precomputed element offsets down a value tree.
fn descend<'v>(mut value: &'v Value, offsets: &[usize]) -> Option<&'v Value> {
    for &offset in offsets {
        match value {
            Value::Array(items) => value = items.get(offset)?,
            _ => return None,
        }
    }
    Some(value)
}

impl<'a> Env<'a> {
    /// Computes an expression's type, checking the whole subtree.
    ///
    /// Fails with a `TypeError` on any inconsistency; never evaluates, so
    /// it has no side effects beyond reading the environment.
    pub fn type_of(&self, expr: &Expr) -> EvalResult<EType> {
        match expr {
            Expr::Literal { value, .. } => Ok(EType::scalar(literal_primitive(value))),
            Expr::LValue(lvalue) => self.lvalue_type(lvalue),
            Expr::Call { id, line, .. } => {
                let func = self.functions
                               .get(id)
                               .ok_or_else(|| RuntimeError::UnknownFunction { name: self.name(*id),
                                                                              line: *line, })?;
                if func.ret.is_invalid() {
                    return Err(TypeError::ProcedureAsValue { name: self.name(*id),
                                                             line: *line, }.into());
                }
                Ok(func.ret.clone())
            },
            Expr::Unary { op, expr, line } => match op {
                UnaryOperator::Not => {
                    expect_primitive(&self.type_of(expr)?, Primitive::Boolean, *line)?;
                    Ok(EType::scalar(Primitive::Boolean))
                },
                UnaryOperator::Negate => {
                    let ty = self.type_of(expr)?;
                    expect_numeric(&ty, *line)?;
                    Ok(ty)
                },
            },
            Expr::Binary { left, op, right, line } => self.binary_type(left, *op, right, *line),
        }
    }

    /// Evaluates an expression to a value.
    ///
    /// Assumes `type_of` has been consulted for the same subtree, but still
    /// re-checks value kinds as it goes; runtime-only failures (bounds,
    /// division by zero, overflow, undefined variables) surface here.
    pub fn eval(&mut self, expr: &'a Expr) -> EvalResult<Value> {
        match expr {
            Expr::Literal { value, .. } => Ok(literal_value(value)),
            Expr::LValue(lvalue) => self.lvalue_value(lvalue),
            Expr::Call { id, args, line } => {
                let result = self.call_function(*id, args, *line)?;
                result.ok_or_else(|| {
                          TypeError::ProcedureAsValue { name: self.name(*id),
                                                        line: *line, }.into()
                      })
            },
            Expr::Unary { op, expr, line } => self.eval_unary(*op, expr, *line),
            Expr::Binary { left, op, right, line } => self.eval_binary(left, *op, right, *line),
        }
    }

    fn eval_unary(&mut self, op: UnaryOperator, expr: &'a Expr, line: usize) -> EvalResult<Value> {
        match op {
            UnaryOperator::Not => {
                let value = self.eval(expr)?.as_bool(line)?;
                Ok(Value::Boolean(!value))
            },
            UnaryOperator::Negate => match self.eval(expr)? {
                Value::Integer(n) => {
                    n.checked_neg()
                     .map(Value::Integer)
                     .ok_or_else(|| RuntimeError::Overflow { line }.into())
                },
                Value::Real(r) => {
                    r.checked_neg()
                     .map(Value::Real)
                     .ok_or_else(|| RuntimeError::Overflow { line }.into())
                },
                other => Err(TypeError::Mismatch { expected: "INTEGER or REAL".to_string(),
                                                   found: other.type_name().to_string(),
                                                   line }.into()),
            },
        }
    }

    /// The type an lvalue read produces: the variable's own type, or the
    /// element primitive once a full index list is applied. Checks that the
    /// index count matches the dimension count and that every index
    /// expression is INTEGER.
    pub(in crate::interpreter::evaluator) fn lvalue_type(&self,
                                                         lvalue: &LValue)
                                                         -> EvalResult<EType> {
        let ty = self.get_type(lvalue.id);
        if lvalue.indexes.is_empty() {
            return Ok(ty.clone());
        }
        if ty.bounds.len() != lvalue.indexes.len() {
            return Err(TypeError::IndexCountMismatch { expected: ty.bounds.len(),
                                                       found:    lvalue.indexes.len(),
                                                       line:     lvalue.line, }.into());
        }
        let primitive = ty.primitive;
        for index in &lvalue.indexes {
            expect_primitive(&self.type_of(index)?, Primitive::Integer, index.line_number())?;
        }
        Ok(EType::scalar(primitive))
    }

    /// Evaluates the index expressions of an indexed lvalue into zero-based
    /// element offsets, bounds-checking each against the declared type.
    fn index_offsets(&mut self, lvalue: &'a LValue) -> EvalResult<Vec<usize>> {
        let ty = self.get_type(lvalue.id).clone();
        if ty.is_invalid() {
            return Err(RuntimeError::UndefinedVariable { name: self.name(lvalue.id),
                                                         line: lvalue.line, }.into());
        }
        if ty.bounds.len() != lvalue.indexes.len() {
            return Err(TypeError::IndexCountMismatch { expected: ty.bounds.len(),
                                                       found:    lvalue.indexes.len(),
                                                       line:     lvalue.line, }.into());
        }
        let mut offsets = Vec::with_capacity(lvalue.indexes.len());
        for (index, &(lo, hi)) in lvalue.indexes.iter().zip(&ty.bounds) {
            expect_primitive(&self.type_of(index)?, Primitive::Integer, index.line_number())?;
            let position = self.eval(index)?.as_integer(index.line_number())?;
            if position < lo || position > hi {
                return Err(RuntimeError::IndexOutOfBounds { index: position,
                                                            lo,
                                                            hi,
                                                            line: lvalue.line }.into());
            }
            offsets.push(i64_to_usize_checked(position - lo,
                                              RuntimeError::IndexOutOfBounds { index: position,
                                                                               lo,
                                                                               hi,
                                                                               line: lvalue.line })?);
        }
        Ok(offsets)
    }

    /// Reads an lvalue. Whole variables (arrays included) are deep-copied
    /// out; indexed reads descend to one element.
    pub(in crate::interpreter::evaluator) fn lvalue_value(&mut self,
                                                          lvalue: &'a LValue)
                                                          -> EvalResult<Value> {
        if lvalue.indexes.is_empty() {
            return Ok(self.get_value(lvalue.id, lvalue.line)?.clone());
        }
        let offsets = self.index_offsets(lvalue)?;
        let root = self.get_value(lvalue.id, lvalue.line)?;
        descend(root, &offsets).cloned().ok_or_else(|| dimension_error(lvalue.line))
    }

    /// Resolves an lvalue to its storage slot for assignment or INPUT.
    /// Index expressions are evaluated first, then the slot is found.
    pub(in crate::interpreter::evaluator) fn lvalue_slot(&mut self,
                                                         lvalue: &'a LValue)
                                                         -> EvalResult<&mut Value> {
        let offsets =
            if lvalue.indexes.is_empty() { Vec::new() } else { self.index_offsets(lvalue)? };
        let mut value = self.value_mut(lvalue.id, lvalue.line)?;
        for &offset in &offsets {
            value = match value {
                Value::Array(items) => {
                    items.get_mut(offset).ok_or_else(|| dimension_error(lvalue.line))?
                },
                _ => return Err(dimension_error(lvalue.line)),
            };
        }
        Ok(value)
    }
}

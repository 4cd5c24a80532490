use std::{io::Write, rc::Rc};

use crate::{
    ast::{BinaryOperator, Block, CaseArm, Expr, LValue, Stmt, TypeExpr},
    error::{RuntimeError, TypeError},
    interpreter::{
        evaluator::{
            binary::compare_values,
            core::{Env, EvalResult, GLOBAL_LEVEL, expect_primitive, expect_type_equal, is_numeric},
        },
        lexer::MAX_LITERAL_DIGITS,
        value::{
            core::{EType, Primitive, Value},
            date::Date,
            fraction::Fraction,
        },
    },
};

impl<'a> Env<'a> {
    /// Executes one statement.
    ///
    /// Returns `Some(expr)` when a RETURN was reached, handing the
    /// still-unevaluated return expression up through the enclosing blocks
    /// to the call site; `None` otherwise.
    pub fn exec_stmt(&mut self, stmt: &'a Stmt) -> EvalResult<Option<&'a Expr>> {
        match stmt {
            Stmt::Declare { id, typ, line } => {
                let ty = self.resolve_type(typ)?;
                let zero = Value::zero_of(&ty);
                self.init_var(*id, GLOBAL_LEVEL, ty, zero, *line)?;
                Ok(None)
            },
            Stmt::Constant { id, expr, line } => {
                let ty = self.type_of(expr)?;
                let value = self.eval(expr)?;
                self.init_var(*id, GLOBAL_LEVEL, ty, value, *line)?;
                Ok(None)
            },
            Stmt::Procedure { id, params, body, line } => {
                self.define_function(*id, params, None, body, *line)?;
                Ok(None)
            },
            Stmt::Function { id,
                             params,
                             ret,
                             body,
                             line, } => {
                self.define_function(*id, params, Some(ret), body, *line)?;
                Ok(None)
            },
            Stmt::Assign { target, expr, line } => self.exec_assign(target, expr, *line),
            Stmt::Input { target, line } => self.exec_input(target, *line),
            Stmt::Output { exprs, line } => self.exec_output(exprs, *line),
            Stmt::If { cond,
                       then_block,
                       else_block,
                       line, } => {
                expect_primitive(&self.type_of(cond)?, Primitive::Boolean, *line)?;
                if self.eval(cond)?.as_bool(*line)? {
                    self.exec_block(then_block)
                } else if let Some(block) = else_block {
                    self.exec_block(block)
                } else {
                    Ok(None)
                }
            },
            Stmt::Case { selector,
                         arms,
                         otherwise,
                         line, } => self.exec_case(selector, arms, otherwise.as_ref(), *line),
            Stmt::For { id,
                        from,
                        to,
                        step,
                        body,
                        line, } => self.exec_for(*id, from, to, step.as_ref(), body, *line),
            Stmt::Repeat { body, until, line } => {
                expect_primitive(&self.type_of(until)?, Primitive::Boolean, *line)?;
                loop {
                    if let Some(ret) = self.exec_block(body)? {
                        return Ok(Some(ret));
                    }
                    if self.eval(until)?.as_bool(*line)? {
                        return Ok(None);
                    }
                }
            },
            Stmt::While { cond, body, line } => {
                expect_primitive(&self.type_of(cond)?, Primitive::Boolean, *line)?;
                while self.eval(cond)?.as_bool(*line)? {
                    if let Some(ret) = self.exec_block(body)? {
                        return Ok(Some(ret));
                    }
                }
                Ok(None)
            },
            Stmt::Call { id, args, line } => {
                self.call_function(*id, args, *line)?;
                Ok(None)
            },
            Stmt::Return { expr, .. } => Ok(Some(expr)),
        }
    }

    /// Executes the statements of a block in order, stopping early and
    /// propagating when one of them returns.
    pub fn exec_block(&mut self, block: &'a Block) -> EvalResult<Option<&'a Expr>> {
        for stmt in &block.stmts {
            if let Some(ret) = self.exec_stmt(stmt)? {
                return Ok(Some(ret));
            }
        }
        Ok(None)
    }

    /// Resolves a source-level type to a descriptor, evaluating array
    /// bounds. Bounds must be INTEGER expressions with `lo <= hi` and an
    /// addressable length.
    pub(in crate::interpreter::evaluator) fn resolve_type(&mut self,
                                                          typ: &'a TypeExpr)
                                                          -> EvalResult<EType> {
        match typ {
            TypeExpr::Primitive { primitive, .. } => Ok(EType::scalar(*primitive)),
            TypeExpr::Array { lo, hi, element, line } => {
                expect_primitive(&self.type_of(lo)?, Primitive::Integer, *line)?;
                expect_primitive(&self.type_of(hi)?, Primitive::Integer, *line)?;
                let lo_value = self.eval(lo)?.as_integer(*line)?;
                let hi_value = self.eval(hi)?.as_integer(*line)?;
                let length = hi_value.checked_sub(lo_value)
                                     .and_then(|d| d.checked_add(1))
                                     .and_then(|len| usize::try_from(len).ok());
                if lo_value > hi_value || length.is_none() {
                    return Err(TypeError::InvalidBounds { lo:   lo_value,
                                                          hi:   hi_value,
                                                          line: *line, }.into());
                }
                let mut ty = self.resolve_type(element)?;
                ty.bounds.insert(0, (lo_value, hi_value));
                Ok(ty)
            },
        }
    }

    /// `LValue <- Expr`. The expression's type must equal the target's,
    /// with one coercion: an INTEGER expression is accepted into a REAL
    /// target. Arrays deep-copy.
    fn exec_assign(&mut self,
                   target: &'a LValue,
                   expr: &'a Expr,
                   line: usize)
                   -> EvalResult<Option<&'a Expr>> {
        if self.get_type(target.id).is_invalid() {
            return Err(RuntimeError::UndefinedVariable { name: self.name(target.id),
                                                         line }.into());
        }
        let target_ty = self.lvalue_type(target)?;
        let expr_ty = self.type_of(expr)?;
        if target_ty == Primitive::Real && expr_ty == Primitive::Integer {
            let promoted = Fraction::from(self.eval(expr)?.as_integer(line)?);
            *self.lvalue_slot(target)? = Value::Real(promoted);
        } else {
            expect_type_equal(&expr_ty, &target_ty, line)?;
            let value = self.eval(expr)?;
            *self.lvalue_slot(target)? = value;
        }
        Ok(None)
    }

    /// `INPUT LValue`: reads one line and parses it as the target's
    /// primitive type. Arrays cannot be INPUT.
    fn exec_input(&mut self, target: &'a LValue, line: usize) -> EvalResult<Option<&'a Expr>> {
        if self.get_type(target.id).is_invalid() {
            return Err(RuntimeError::UndefinedVariable { name: self.name(target.id),
                                                         line }.into());
        }
        let ty = self.lvalue_type(target)?;
        if ty.is_array() {
            return Err(TypeError::ArrayInput { line }.into());
        }
        let text = self.read_input_line(line)?;
        let value = parse_input(&text, ty.primitive, line)?;
        *self.lvalue_slot(target)? = value;
        Ok(None)
    }

    /// Blocking read of one line from the input stream, with the trailing
    /// newline stripped.
    fn read_input_line(&mut self, line: usize) -> EvalResult<String> {
        let mut buffer = String::new();
        let read = self.input
                       .read_line(&mut buffer)
                       .map_err(|e| RuntimeError::Io { details: e.to_string(),
                                                       line })?;
        if read == 0 {
            return Err(RuntimeError::InputExhausted { line }.into());
        }
        if buffer.ends_with('\n') {
            buffer.pop();
            if buffer.ends_with('\r') {
                buffer.pop();
            }
        }
        Ok(buffer)
    }

    /// `OUTPUT Expr {, Expr}`: writes each value with no separator, then
    /// one newline. Arrays cannot be OUTPUT.
    fn exec_output(&mut self, exprs: &'a [Expr], line: usize) -> EvalResult<Option<&'a Expr>> {
        for expr in exprs {
            if self.type_of(expr)?.is_array() {
                return Err(TypeError::ArrayOutput { line }.into());
            }
            let value = self.eval(expr)?;
            write!(self.output, "{value}").map_err(|e| RuntimeError::Io { details: e.to_string(),
                                                                          line })?;
        }
        writeln!(self.output).map_err(|e| RuntimeError::Io { details: e.to_string(),
                                                             line })?;
        Ok(None)
    }

    /// `CASE OF`: evaluates the selector once, then scans the arms in
    /// order and runs the first whose value equals it, or OTHERWISE.
    fn exec_case(&mut self,
                 selector: &'a LValue,
                 arms: &'a [CaseArm],
                 otherwise: Option<&'a Block>,
                 line: usize)
                 -> EvalResult<Option<&'a Expr>> {
        let selector_ty = self.lvalue_type(selector)?;
        if selector_ty.is_array() {
            return Err(TypeError::ArrayInCase { line }.into());
        }
        let selector_val = self.lvalue_value(selector)?;
        for arm in arms {
            let arm_ty = self.type_of(&arm.value)?;
            if arm_ty.is_array() {
                return Err(TypeError::ArrayInCase { line }.into());
            }
            if !(is_numeric(&arm_ty) && is_numeric(&selector_ty)) && arm_ty != selector_ty {
                return Err(TypeError::CannotCompare { left:  selector_ty.to_string(),
                                                      right: arm_ty.to_string(),
                                                      line, }.into());
            }
            let arm_val = self.eval(&arm.value)?;
            if compare_values(BinaryOperator::Eq, &selector_val, &arm_val, line)? {
                return self.exec_block(&arm.body);
            }
        }
        match otherwise {
            Some(block) => self.exec_block(block),
            None => Ok(None),
        }
    }
}

/// Parses one input line according to the target primitive:
/// INTEGER as signed decimal, REAL as signed decimal with at most one dot,
/// BOOLEAN as exactly `TRUE`/`FALSE`, CHAR as the first byte, DATE as
/// `d/m/y`, STRING as the whole line.
fn parse_input(text: &str, primitive: Primitive, line: usize) -> EvalResult<Value> {
    let bad = || RuntimeError::BadInput { expected: primitive.to_string(),
                                          line };
    match primitive {
        Primitive::Integer => text.trim().parse().map(Value::Integer).map_err(|_| bad().into()),
        Primitive::Real => parse_real_input(text.trim()).map(Value::Real)
                                                        .ok_or_else(|| bad().into()),
        Primitive::Boolean => match text.trim() {
            "TRUE" => Ok(Value::Boolean(true)),
            "FALSE" => Ok(Value::Boolean(false)),
            _ => Err(bad().into()),
        },
        Primitive::Char => text.as_bytes().first().map(|&b| Value::Char(b))
                                                  .ok_or_else(|| bad().into()),
        Primitive::Date => text.trim().parse::<Date>().map(Value::Date).map_err(|_| bad().into()),
        Primitive::String => Ok(Value::Str(Rc::from(text))),
        Primitive::Invalid => Err(bad().into()),
    }
}

/// A signed decimal with at most one dot, parsed to an exact fraction.
/// Oversized digit strings are rejected the same way literals are.
fn parse_real_input(text: &str) -> Option<Fraction> {
    let negative = text.starts_with('-');
    let unsigned = text.strip_prefix('-').or_else(|| text.strip_prefix('+')).unwrap_or(text);
    let (whole, frac) = match unsigned.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (unsigned, ""),
    };
    if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if !frac.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if whole.len() + frac.len() >= MAX_LITERAL_DIGITS {
        return None;
    }
    let digits: i64 = format!("{whole}{frac}").parse().ok()?;
    let denominator = 10_i64.checked_pow(u32::try_from(frac.len()).ok()?)?;
    let fraction = Fraction::new(digits, denominator)?;
    if negative { fraction.checked_neg() } else { Some(fraction) }
}

use crate::{
    ast::{Block, Expr},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Env, EvalResult, expect_numeric},
        value::{
            core::{EType, Primitive, Value},
            fraction::Fraction,
        },
    },
};

impl<'a> Env<'a> {
    /// Executes `FOR id <- from TO to [STEP step] body NEXT`.
    ///
    /// All three header expressions must be INTEGER or REAL and are
    /// evaluated once, up front. The loop variable's effective type is REAL
    /// iff any of them is REAL. Whatever binding `id` had before the loop
    /// is saved and put back on every exit, including when the body
    /// returns; the loop's own binding lives in the current call frame.
    ///
    /// The termination test depends on direction: counting up runs while
    /// `var <= to`, counting down while `var >= to`. `STEP 0` never
    /// terminates.
    pub(in crate::interpreter::evaluator) fn exec_for(&mut self,
                                                      id: i64,
                                                      from: &'a Expr,
                                                      to: &'a Expr,
                                                      step: Option<&'a Expr>,
                                                      body: &'a Block,
                                                      line: usize)
                                                      -> EvalResult<Option<&'a Expr>> {
        let from_ty = self.type_of(from)?;
        expect_numeric(&from_ty, line)?;
        let to_ty = self.type_of(to)?;
        expect_numeric(&to_ty, line)?;
        let mut real_loop = from_ty == Primitive::Real || to_ty == Primitive::Real;
        if let Some(expr) = step {
            let step_ty = self.type_of(expr)?;
            expect_numeric(&step_ty, line)?;
            real_loop |= step_ty == Primitive::Real;
        }

        let from_val = self.eval(from)?;
        let to_val = self.eval(to)?;
        let step_val = match step {
            Some(expr) => Some(self.eval(expr)?),
            None => None,
        };

        let saved = self.save_slot(id);
        self.delete_var(id);
        let loop_ty =
            EType::scalar(if real_loop { Primitive::Real } else { Primitive::Integer });
        let initial = Value::zero_of(&loop_ty);
        self.init_var(id, self.call_number, loop_ty, initial, line)?;

        let result = if real_loop {
            self.run_real_for(id, &from_val, &to_val, step_val.as_ref(), body, line)
        } else {
            self.run_integer_for(id, &from_val, &to_val, step_val.as_ref(), body, line)
        };

        self.restore_slot(id, saved);
        result
    }

    fn run_integer_for(&mut self,
                       id: i64,
                       from: &Value,
                       to: &Value,
                       step: Option<&Value>,
                       body: &'a Block,
                       line: usize)
                       -> EvalResult<Option<&'a Expr>> {
        let from = from.as_integer(line)?;
        let to = to.as_integer(line)?;
        let step = match step {
            Some(value) => value.as_integer(line)?,
            None => 1,
        };
        let ascending = from <= to;
        let mut current = from;
        while in_range(ascending, &current, &to) {
            *self.value_mut(id, line)? = Value::Integer(current);
            if let Some(ret) = self.exec_block(body)? {
                return Ok(Some(ret));
            }
            current = current.checked_add(step).ok_or(RuntimeError::Overflow { line })?;
        }
        Ok(None)
    }

    fn run_real_for(&mut self,
                    id: i64,
                    from: &Value,
                    to: &Value,
                    step: Option<&Value>,
                    body: &'a Block,
                    line: usize)
                    -> EvalResult<Option<&'a Expr>> {
        let from = from.as_number(line)?;
        let to = to.as_number(line)?;
        let step = match step {
            Some(value) => value.as_number(line)?,
            None => Fraction::from(1),
        };
        let ascending = from <= to;
        let mut current = from;
        while in_range(ascending, &current, &to) {
            *self.value_mut(id, line)? = Value::Real(current);
            if let Some(ret) = self.exec_block(body)? {
                return Ok(Some(ret));
            }
            current = current.checked_add(step).ok_or(RuntimeError::Overflow { line })?;
        }
        Ok(None)
    }
}

/// The direction-dependent continuation test: counting up runs while
/// `current <= to`, counting down while `current >= to`.
fn in_range<T: PartialOrd>(ascending: bool, current: &T, to: &T) -> bool {
    if ascending { current <= to } else { current >= to }
}

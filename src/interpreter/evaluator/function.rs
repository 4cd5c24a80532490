use crate::{
    ast::{Block, Expr, Param, TypeExpr},
    error::{RuntimeError, TypeError},
    interpreter::{
        evaluator::core::{Env, EvalResult, Function, FunctionKind, expect_type_equal},
        value::core::{EType, Primitive, Value},
    },
};

impl<'a> Env<'a> {
    /// Records a procedure or function in the function table.
    ///
    /// Parameter and return types are resolved against the environment now,
    /// at definition time, so array bounds in them see the variables in
    /// scope here. BYREF parameters are reserved and rejected.
    pub(in crate::interpreter::evaluator) fn define_function(&mut self,
                                                             id: i64,
                                                             params: &'a [Param],
                                                             ret: Option<&'a TypeExpr>,
                                                             body: &'a Block,
                                                             line: usize)
                                                             -> EvalResult<()> {
        let mut resolved = Vec::with_capacity(params.len());
        for param in params {
            if param.byref {
                return Err(RuntimeError::ByRefUnsupported { line: param.line }.into());
            }
            let ty = self.resolve_type(&param.typ)?;
            resolved.push((param.id, ty));
        }
        let ret = match ret {
            Some(typ) => self.resolve_type(typ)?,
            None => EType::scalar(Primitive::Invalid),
        };
        self.functions.insert(id, Function { params: resolved,
                                             ret,
                                             kind: FunctionKind::Runtime(body) });
        Ok(())
    }

    /// Invokes a function or procedure with unevaluated argument
    /// expressions.
    ///
    /// Each argument is type-checked against its declared parameter type
    /// and evaluated, left to right. For a user-defined callee the call
    /// protocol then runs:
    ///
    /// 1. save each parameter ID's (type, value, level) triple,
    /// 2. enter a new call frame and bind the arguments into the parameter
    ///    IDs at that level,
    /// 3. execute the body; a RETURN hands its expression back here, where
    ///    it is checked against the return type and evaluated still inside
    ///    the callee's frame,
    /// 4. leave the frame and restore every saved triple, whether the body
    ///    completed, returned early, or failed.
    ///
    /// Returns `Some(value)` for functions and `None` for procedures.
    pub fn call_function(&mut self,
                         id: i64,
                         args: &'a [Expr],
                         line: usize)
                         -> EvalResult<Option<Value>> {
        let func = self.functions
                       .get(&id)
                       .cloned()
                       .ok_or_else(|| RuntimeError::UnknownFunction { name: self.name(id),
                                                                      line })?;
        if args.len() != func.params.len() {
            return Err(RuntimeError::ArgumentCountMismatch { name: self.name(id),
                                                             expected: func.params.len(),
                                                             found: args.len(),
                                                             line }.into());
        }
        let mut arg_values = Vec::with_capacity(args.len());
        for (arg, param) in args.iter().zip(&func.params) {
            expect_type_equal(&self.type_of(arg)?, &param.1, arg.line_number())?;
            arg_values.push(self.eval(arg)?);
        }
        match &func.kind {
            FunctionKind::Builtin(handler) => {
                let result = handler(self, &arg_values, line)?;
                Ok(if func.ret.is_invalid() { None } else { Some(result) })
            },
            FunctionKind::Runtime(body) => {
                let body = *body;
                let saved: Vec<_> = func.params
                                        .iter()
                                        .map(|&(param_id, _)| (param_id, self.save_slot(param_id)))
                                        .collect();
                self.call_number += 1;
                let result = self.run_function_body(id, &func, arg_values, body, line);
                self.call_number -= 1;
                for (param_id, snapshot) in saved {
                    self.restore_slot(param_id, snapshot);
                }
                result
            },
        }
    }

    /// Binds the arguments into the parameter slots at the current (new)
    /// call level and runs the body to its return.
    fn run_function_body(&mut self,
                         id: i64,
                         func: &Function<'a>,
                         arg_values: Vec<Value>,
                         body: &'a Block,
                         line: usize)
                         -> EvalResult<Option<Value>> {
        for (param, value) in func.params.iter().zip(arg_values) {
            self.delete_var(param.0);
            self.init_var(param.0, self.call_number, param.1.clone(), value, line)?;
        }
        match self.exec_block(body)? {
            Some(expr) => {
                expect_type_equal(&self.type_of(expr)?, &func.ret, expr.line_number())?;
                Ok(Some(self.eval(expr)?))
            },
            None if func.ret.is_invalid() => Ok(None),
            None => Err(TypeError::MissingReturn { name: self.name(id),
                                                   line }.into()),
        }
    }
}

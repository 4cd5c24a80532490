use rand::Rng;

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::{BuiltinFn, Env, EvalResult, Function, FunctionKind},
        lexer::Lexer,
        value::{
            core::{EType, Primitive, Value},
            fraction::Fraction,
        },
    },
};

/// One builtin's name, declared signature, and handler.
struct BuiltinDef {
    name:   &'static str,
    params: &'static [Primitive],
    ret:    Primitive,
    func:   BuiltinFn,
}

static BUILTINS: &[BuiltinDef] = &[BuiltinDef { name:   "RND",
                                                params: &[],
                                                ret:    Primitive::Real,
                                                func:   rnd, },
                                   BuiltinDef { name:   "RANDOMBETWEEN",
                                                params: &[Primitive::Integer,
                                                          Primitive::Integer],
                                                ret:    Primitive::Integer,
                                                func:   randombetween, },
                                   BuiltinDef { name:   "INT",
                                                params: &[Primitive::Real],
                                                ret:    Primitive::Integer,
                                                func:   int_trunc, }];

/// Registers every builtin whose name the source actually mentions, keyed
/// by the interned identifier ID. Builtin parameters have no identifier, so
/// their IDs are 0, the reserved "no identifier" value.
pub(in crate::interpreter::evaluator) fn register(env: &mut Env<'_>, lexer: &Lexer) {
    for def in BUILTINS {
        if let Some(&id) = lexer.identifiers.get(def.name) {
            let params = def.params.iter().map(|&p| (0, EType::scalar(p))).collect();
            env.functions.insert(id, Function { params,
                                                ret: EType::scalar(def.ret),
                                                kind: FunctionKind::Builtin(def.func) });
        }
    }
}

fn arg<'v>(args: &'v [Value], index: usize, line: usize) -> EvalResult<&'v Value> {
    args.get(index)
        .ok_or_else(|| RuntimeError::InvalidArgument { details: format!("missing argument {index}"),
                                                       line }.into())
}

/// `RND()`: a uniform REAL in [0, 1], drawn as k/65535 for a uniform
/// integer k.
fn rnd(env: &mut Env<'_>, _args: &[Value], line: usize) -> EvalResult<Value> {
    let numerator = env.rng.gen_range(0..=65_535_i64);
    Fraction::new(numerator, 65_535).map(Value::Real)
                                    .ok_or_else(|| RuntimeError::Overflow { line }.into())
}

/// `RANDOMBETWEEN(a, b)`: a uniform INTEGER in [a, b] inclusive.
fn randombetween(env: &mut Env<'_>, args: &[Value], line: usize) -> EvalResult<Value> {
    let lo = arg(args, 0, line)?.as_integer(line)?;
    let hi = arg(args, 1, line)?.as_integer(line)?;
    if lo > hi {
        return Err(RuntimeError::InvalidArgument { details: format!("lower bound {lo} is greater than upper bound {hi}"),
                                                   line }.into());
    }
    Ok(Value::Integer(env.rng.gen_range(lo..=hi)))
}

/// `INT(x)`: truncates a REAL toward zero.
fn int_trunc(_env: &mut Env<'_>, args: &[Value], line: usize) -> EvalResult<Value> {
    Ok(Value::Integer(arg(args, 0, line)?.as_real(line)?.trunc()))
}

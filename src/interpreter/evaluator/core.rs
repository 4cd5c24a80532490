use std::{
    collections::HashMap,
    io::{BufRead, Write},
};

use rand::{SeedableRng, rngs::StdRng};

use crate::{
    ast::{Block, Program},
    error::{EvalError, RuntimeError, TypeError},
    interpreter::{
        evaluator::builtin,
        lexer::Lexer,
        value::core::{EType, Primitive, Value},
    },
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or an
/// `EvalError` describing the type mismatch or runtime failure.
pub type EvalResult<T> = Result<T, EvalError>;

/// The call level of global variables. Call frames count up from 1.
pub const GLOBAL_LEVEL: i32 = 0;

/// The signature of a builtin function handler: the environment (for the
/// random source), the evaluated arguments, and the call's line number.
pub type BuiltinFn = for<'a> fn(&mut Env<'a>, &[Value], usize) -> EvalResult<Value>;

/// How a function is implemented: a parsed body in the program tree, or a
/// native handler.
#[derive(Clone)]
pub enum FunctionKind<'a> {
    /// A user-defined body; evaluated with the call protocol.
    Runtime(&'a Block),
    /// A native handler; no call frame is needed.
    Builtin(BuiltinFn),
}

/// One entry of the function table.
#[derive(Clone)]
pub struct Function<'a> {
    /// The parameter IDs and their resolved types, in order.
    pub params: Vec<(i64, EType)>,
    /// The return type; `INVALID` marks a procedure.
    pub ret:    EType,
    /// The implementation.
    pub kind:   FunctionKind<'a>,
}

/// The runtime environment: every variable slot, the function table, and
/// the world the program talks to.
///
/// Variable storage is three parallel arrays indexed by identifier ID. A
/// slot is visible iff its call level is 0 (global) or equal to the current
/// call number; this one rule implements parameter shadowing without a
/// scope chain. The environment borrows the program's input and output
/// streams and owns the random source the builtins draw from.
pub struct Env<'a> {
    types:  Vec<EType>,
    values: Vec<Value>,
    levels: Vec<i32>,
    /// The current call frame number. 1 is the global frame; each call
    /// increments it and decrements it again on return.
    pub call_number: i32,
    /// All defined functions and procedures, keyed by identifier ID.
    pub functions: HashMap<i64, Function<'a>>,
    names: Vec<String>,
    pub(in crate::interpreter::evaluator) rng: StdRng,
    pub(in crate::interpreter::evaluator) input: &'a mut dyn BufRead,
    pub(in crate::interpreter::evaluator) output: &'a mut dyn Write,
}

fn slot(id: i64) -> usize {
    usize::try_from(id).unwrap_or(0)
}

impl<'a> Env<'a> {
    /// Creates an environment sized for the lexer's identifier table, with
    /// the builtins registered under whichever of their names the source
    /// actually used.
    #[must_use]
    pub fn new(lexer: &Lexer, input: &'a mut dyn BufRead, output: &'a mut dyn Write) -> Self {
        let slots = lexer.names.len();
        let mut env = Self { types: vec![EType::scalar(Primitive::Invalid); slots],
                             values: vec![Value::Integer(0); slots],
                             levels: vec![GLOBAL_LEVEL; slots],
                             call_number: 1,
                             functions: HashMap::new(),
                             names: lexer.names.clone(),
                             rng: StdRng::from_entropy(),
                             input,
                             output };
        builtin::register(&mut env, lexer);
        env
    }

    /// Runs every top-level statement of a program in order.
    ///
    /// The first error aborts the run; partial output already written stays
    /// on the output stream.
    pub fn run(&mut self, program: &'a Program) -> EvalResult<()> {
        for stmt in &program.stmts {
            self.exec_stmt(stmt)?;
        }
        Ok(())
    }

    /// The lexeme behind an identifier ID, for error messages.
    #[must_use]
    pub fn name(&self, id: i64) -> String {
        self.names.get(slot(id)).cloned().unwrap_or_default()
    }

    /// The declared type of a slot. Total: undeclared slots read INVALID.
    #[must_use]
    pub fn get_type(&self, id: i64) -> &EType {
        &self.types[slot(id)]
    }

    /// Whether the slot's call level makes it visible right now.
    #[must_use]
    pub fn level_visible(&self, id: i64) -> bool {
        let level = self.levels[slot(id)];
        level == GLOBAL_LEVEL || level == self.call_number
    }

    /// Reads a slot's value; fails if the slot belongs to another call
    /// frame or was never declared.
    pub fn get_value(&self, id: i64, line: usize) -> EvalResult<&Value> {
        if !self.level_visible(id) || self.get_type(id).is_invalid() {
            return Err(RuntimeError::UndefinedVariable { name: self.name(id),
                                                         line }.into());
        }
        Ok(&self.values[slot(id)])
    }

    /// Mutable access to a slot's value, with the same visibility rule as
    /// [`Self::get_value`].
    pub fn value_mut(&mut self, id: i64, line: usize) -> EvalResult<&mut Value> {
        if !self.level_visible(id) || self.get_type(id).is_invalid() {
            return Err(RuntimeError::UndefinedVariable { name: self.name(id),
                                                         line }.into());
        }
        Ok(&mut self.values[slot(id)])
    }

    /// Gives a slot its type; fails with a redeclaration error if the slot
    /// already has one.
    pub fn set_type(&mut self, id: i64, ty: EType, line: usize) -> EvalResult<()> {
        let existing = &self.types[slot(id)];
        if !existing.is_invalid() {
            return Err(TypeError::Redeclared { name: self.name(id),
                                               previous: existing.to_string(),
                                               line }.into());
        }
        self.types[slot(id)] = ty;
        Ok(())
    }

    /// Initializes a slot: type, value, and call level in one step. Fails
    /// if the slot is already declared.
    pub fn init_var(&mut self,
                    id: i64,
                    level: i32,
                    ty: EType,
                    value: Value,
                    line: usize)
                    -> EvalResult<()> {
        self.set_type(id, ty, line)?;
        self.levels[slot(id)] = level;
        self.values[slot(id)] = value;
        Ok(())
    }

    /// Marks a slot undeclared. The value and level become unreachable.
    pub fn delete_var(&mut self, id: i64) {
        self.types[slot(id)] = EType::scalar(Primitive::Invalid);
    }

    /// Snapshots a slot's (type, value, level) triple, declared or not.
    pub(in crate::interpreter::evaluator) fn save_slot(&self, id: i64) -> (EType, Value, i32) {
        (self.types[slot(id)].clone(), self.values[slot(id)].clone(), self.levels[slot(id)])
    }

    /// Writes a snapshot back, undoing any shadowing since it was taken.
    pub(in crate::interpreter::evaluator) fn restore_slot(&mut self,
                                                          id: i64,
                                                          saved: (EType, Value, i32)) {
        let (ty, value, level) = saved;
        self.types[slot(id)] = ty;
        self.values[slot(id)] = value;
        self.levels[slot(id)] = level;
    }
}

/// Fails unless the two types compare equal (array types compare by
/// dimension lengths).
pub fn expect_type_equal(found: &EType, expected: &EType, line: usize) -> EvalResult<()> {
    if found == expected {
        Ok(())
    } else {
        Err(TypeError::Mismatch { expected: expected.to_string(),
                                  found: found.to_string(),
                                  line }.into())
    }
}

/// Fails unless the type is exactly the given scalar primitive.
pub fn expect_primitive(found: &EType, expected: Primitive, line: usize) -> EvalResult<()> {
    if *found == expected {
        Ok(())
    } else {
        Err(TypeError::Mismatch { expected: expected.to_string(),
                                  found: found.to_string(),
                                  line }.into())
    }
}

/// True for the two numeric scalar types.
#[must_use]
pub fn is_numeric(ty: &EType) -> bool {
    *ty == Primitive::Integer || *ty == Primitive::Real
}

/// Fails unless the type is INTEGER or REAL.
pub fn expect_numeric(found: &EType, line: usize) -> EvalResult<()> {
    if is_numeric(found) {
        Ok(())
    } else {
        Err(TypeError::Mismatch { expected: "INTEGER or REAL".to_string(),
                                  found: found.to_string(),
                                  line }.into())
    }
}

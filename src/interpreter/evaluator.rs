/// The environment and core evaluation state.
///
/// Holds the `Env` struct: variable slots with call-level scoping, the
/// function table, the random source, and the program's input and output
/// streams. Also provides the type-expectation helpers shared by the rest
/// of the evaluator.
pub mod core;

/// Expression evaluation.
///
/// `type_of` and `eval` for literals, lvalue reads (with index typing and
/// bounds checks), calls in value position, and unary operators.
pub mod expression;

/// Binary operator evaluation.
///
/// Typing and evaluation for the five operator tiers, including the
/// INTEGER-to-REAL promotion rules, exact division, and the shared
/// comparison routine CASE reuses.
pub mod binary;

/// Statement execution.
///
/// Declarations, assignment, INPUT/OUTPUT, IF, CASE, REPEAT, WHILE, CALL,
/// and block execution with RETURN unwinding.
pub mod statement;

/// FOR loop execution.
///
/// Loop-variable save and restore, the REAL-vs-INTEGER loop split, and the
/// direction-dependent termination condition.
pub mod for_loop;

/// Procedure and function machinery.
///
/// Definition-time parameter resolution and the call protocol: argument
/// checking, call-frame numbering, parameter shadowing, and return typing.
pub mod function;

/// Builtin functions.
///
/// The builtin table (`RND`, `RANDOMBETWEEN`, `INT`) and its registration
/// against the identifier table.
pub mod builtin;

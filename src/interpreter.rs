/// The evaluator executes AST nodes against the environment.
///
/// The evaluator walks the syntax tree, checking types at each node as it
/// goes, evaluates expressions exactly (REAL never rounds), drives control
/// flow, and performs INPUT and OUTPUT against the program's streams. It is
/// the core execution engine of the interpreter.
///
/// # Responsibilities
/// - Evaluates expressions and executes statements, enforcing the type
///   rules at every node.
/// - Manages variable slots, call-frame scoping, and the function table.
/// - Reports type errors and runtime errors such as out-of-bounds indexes
///   or division by zero.
pub mod evaluator;
/// The lexer tokenizes source text for the parser.
///
/// The lexer reads the raw source and produces a vector of tokens with line
/// and column positions, interning identifiers to integer IDs as it goes.
/// Runs of `INT / INT / INT` are fused into single date constants. This is
/// the first stage of interpretation.
///
/// # Responsibilities
/// - Converts the byte stream into positioned tokens.
/// - Handles number, string, char, and date constants and the reserved
///   words.
/// - Assigns every distinct identifier a stable ID used by all later
///   stages.
/// - Reports lexical errors with exact positions.
pub mod lexer;
/// The parser builds the abstract syntax tree from tokens.
///
/// A single-pass LL(1) recursive-descent parser with precedence climbing
/// over five binary operator tiers. It produces the `Program` tree the
/// evaluator walks, enforcing purely syntactic rules such as where RETURN
/// may appear.
///
/// # Responsibilities
/// - Converts tokens into statements, blocks, and expressions.
/// - Validates the grammar and reports errors with the offending token.
pub mod parser;
/// The value module defines the runtime data types.
///
/// Declares the primitive kinds, the type descriptor used for variables and
/// arrays, the tagged runtime value, exact rational numbers, and calendar
/// dates.
///
/// # Responsibilities
/// - Defines `Primitive`, `EType`, and `Value`.
/// - Implements exact REAL arithmetic and DATE validation and ordering.
/// - Provides deep copying for arrays via `Clone`.
pub mod value;

/// The token cursor and parse entry point.
///
/// Holds the `Parser` struct: an LL(1) cursor over the spanned token slice
/// with `peek`/`next`/`eat`/`expect`, and the `parse` function that drives
/// top-level statements until the end-of-stream sentinel.
pub mod core;

/// Binary expression parsing.
///
/// The five precedence tiers, loosest to tightest: `OR`; `AND`; the six
/// comparisons; `+ -`; `* / MOD DIV`. Each tier is one left-folding
/// function, giving precedence climbing by plain recursion.
pub mod binary;

/// Unary and primary expression parsing.
///
/// Prefix `NOT` and `-` (which nest), literals, lvalues with index lists,
/// call argument lists, and parenthesised expressions.
pub mod unary;

/// Statement parsing.
///
/// Top-level statement dispatch (DECLARE, CONSTANT, PROCEDURE, FUNCTION),
/// inner statements, parameter lists, type syntax, and block parsing with
/// the RETURN-permission flag.
pub mod statement;

/// Numeric conversion helpers.
///
/// This module provides safe functions for narrowing integers without silent
/// truncation. Use these helpers whenever an `i64` coming from the language
/// level (an array bound, a date field, an index offset) has to become a
/// smaller machine type.
///
/// All functions return a `Result`, which is `Ok` if the conversion is exact,
/// or the caller-supplied error if the value is out of range.
pub mod num;

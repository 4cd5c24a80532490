/// Safely converts an `i64` to a `usize` if and only if it is exactly
/// representable.
///
/// ## Errors
/// Returns `Err(error)` if the value is negative or exceeds the maximum
/// representable `usize`.
///
/// ## Parameters
/// - `value`: The integer to convert.
/// - `error`: The error to return if conversion is not exact.
///
/// ## Example
/// ```
/// use pcse::util::num::i64_to_usize_checked;
///
/// assert_eq!(i64_to_usize_checked(42, "negative!"), Ok(42));
/// assert!(i64_to_usize_checked(-1, "negative!").is_err());
/// ```
pub fn i64_to_usize_checked<E>(value: i64, error: E) -> Result<usize, E> {
    usize::try_from(value).map_err(|_| error)
}

/// Safely converts an `i64` to a `u8` if and only if it is exactly
/// representable.
///
/// ## Errors
/// Returns `Err(error)` if the value is outside `0..=255`.
///
/// ## Parameters
/// - `value`: The integer to convert.
/// - `error`: The error to return if conversion is not exact.
pub fn i64_to_u8_checked<E>(value: i64, error: E) -> Result<u8, E> {
    u8::try_from(value).map_err(|_| error)
}

/// Safely converts an `i64` to a `u16` if and only if it is exactly
/// representable.
///
/// ## Errors
/// Returns `Err(error)` if the value is outside `0..=65535`.
///
/// ## Parameters
/// - `value`: The integer to convert.
/// - `error`: The error to return if conversion is not exact.
///
/// ## Example
/// ```
/// use pcse::util::num::i64_to_u16_checked;
///
/// assert_eq!(i64_to_u16_checked(2019, "too large!"), Ok(2019));
/// assert!(i64_to_u16_checked(70_000, "too large!").is_err());
/// ```
pub fn i64_to_u16_checked<E>(value: i64, error: E) -> Result<u16, E> {
    u16::try_from(value).map_err(|_| error)
}

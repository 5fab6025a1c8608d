use core::fmt;

/// A pair of an actual and an expected value, used in error messages when the two differ.
///
/// Mirrors the "got vs. expected" shape used throughout the execution error taxonomy (receipt
/// root mismatches, bloom mismatches, gas-used mismatches).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GotExpected<T> {
    /// The value that was actually computed.
    pub got: T,
    /// The value that was expected.
    pub expected: T,
}

impl<T: fmt::Display> fmt::Display for GotExpected<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "got {} expected {}", self.got, self.expected)
    }
}

impl<T> GotExpected<T> {
    /// Creates a new `GotExpected` pair.
    pub const fn new(got: T, expected: T) -> Self {
        Self { got, expected }
    }
}

/// Boxed variant of [`GotExpected`], used when `T` is large and the error type otherwise blows up
/// in size (clippy's `result_large_err`).
pub type GotExpectedBoxed<T> = GotExpected<Box<T>>;

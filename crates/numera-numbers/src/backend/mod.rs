//! The numeral backend contract.
//!
//! A backend is a concrete arithmetic library behind one flat set of
//! operations. Exactly one backend is compiled into a build, selected by Cargo
//! feature, and exposed as [`ActiveBackend`].
//!
//! Backend operations are only called with arguments that already satisfy the
//! shared edge-case policy (non-zero divisors, arguments inside the domain,
//! integer operands for integer-only operations). That policy lives in
//! [`Numeral`](crate::Numeral), so every backend honors it identically.

use std::cmp::Ordering;
use std::fmt::Debug;

use crate::error::NumeralResult;
use crate::precision::{Precision, Radix};
use crate::text::NumeralText;

#[cfg(feature = "backend-dashu")]
pub mod dashu;
#[cfg(feature = "backend-native")]
pub mod native;

#[cfg(all(feature = "backend-dashu", feature = "backend-native"))]
compile_error!("features `backend-dashu` and `backend-native` are mutually exclusive; enable exactly one numeral backend");

#[cfg(not(any(feature = "backend-dashu", feature = "backend-native")))]
compile_error!("no numeral backend selected; enable `backend-dashu` or `backend-native`");

/// The backend compiled into this build.
#[cfg(all(feature = "backend-dashu", not(feature = "backend-native")))]
pub type ActiveBackend = dashu::DashuBackend;

/// The backend compiled into this build.
#[cfg(all(feature = "backend-native", not(feature = "backend-dashu")))]
pub type ActiveBackend = native::NativeBackend;

/// A concrete arithmetic library.
///
/// Backends are stateless marker types; all operations are associated
/// functions over [`Backend::Value`]. Every backend distinguishes exact
/// integers from floats.
///
/// Preconditions noted on each method are guaranteed by the caller.
pub trait Backend: 'static {
    /// The backend's value representation.
    type Value: Clone + Debug;

    /// Backend name, for diagnostics.
    const NAME: &'static str;

    /// Whether fractional points and exponents (`1.5e-10`) are supported.
    const SUPPORTS_MANTISSA: bool;

    // === Conversion ===

    /// Builds a value from lexed numeral text.
    ///
    /// # Errors
    ///
    /// Fails if the value cannot be represented by this backend.
    fn from_text(text: &NumeralText<'_>, precision: Precision) -> NumeralResult<Self::Value>;

    /// Builds an exact integer.
    fn from_i64(value: i64) -> Self::Value;

    /// Renders a value in `radix`.
    fn render(value: &Self::Value, radix: Radix) -> String;

    /// Returns the value as an `i64` if it is an exact integer in range.
    fn to_i64(value: &Self::Value) -> Option<i64>;

    // === Classification ===

    /// Returns true for exact integers.
    fn is_integer(value: &Self::Value) -> bool;

    /// Compares the value to zero.
    fn signum(value: &Self::Value) -> Ordering;

    /// Compares two values exactly.
    fn compare(a: &Self::Value, b: &Self::Value) -> Ordering;

    // === Arithmetic ===

    /// Returns `a + b`.
    fn add(a: &Self::Value, b: &Self::Value, precision: Precision) -> NumeralResult<Self::Value>;

    /// Returns `a * b`.
    fn multiply(a: &Self::Value, b: &Self::Value, precision: Precision)
        -> NumeralResult<Self::Value>;

    /// Adds `a * b` into `target`. Neither operand is modified.
    fn multiply_add(
        target: &mut Self::Value,
        a: &Self::Value,
        b: &Self::Value,
        precision: Precision,
    ) -> NumeralResult<()> {
        let product = Self::multiply(a, b, precision)?;
        *target = Self::add(target, &product, precision)?;
        Ok(())
    }

    /// Returns `-a`.
    fn negate(a: &Self::Value) -> NumeralResult<Self::Value>;

    /// Returns `|a|`.
    fn abs(a: &Self::Value) -> NumeralResult<Self::Value>;

    /// Returns `a / b`. Requires `b != 0`.
    fn divide(a: &Self::Value, b: &Self::Value, precision: Precision) -> NumeralResult<Self::Value>;

    /// Returns `a ^ b`.
    ///
    /// Requires `a != 0` when `b < 0`, and `b` integral when `a < 0`.
    fn power(a: &Self::Value, b: &Self::Value, precision: Precision) -> NumeralResult<Self::Value>;

    /// Returns the greatest integer not above `a`.
    fn floor(a: &Self::Value) -> NumeralResult<Self::Value>;

    /// Returns the least integer not below `a`.
    fn ceil(a: &Self::Value) -> NumeralResult<Self::Value>;

    /// Returns `floor(a / b)`. Requires `b != 0`.
    fn quotient(a: &Self::Value, b: &Self::Value) -> NumeralResult<Self::Value>;

    /// Returns `a - b * floor(a / b)`. Requires `b != 0`.
    fn modulo(a: &Self::Value, b: &Self::Value) -> NumeralResult<Self::Value>;

    /// Returns the non-negative gcd. Requires integers.
    fn gcd(a: &Self::Value, b: &Self::Value) -> NumeralResult<Self::Value>;

    /// Returns `sqrt(a)`. Requires `a >= 0`.
    fn sqrt(a: &Self::Value, precision: Precision) -> NumeralResult<Self::Value>;

    /// Returns `n!`. Requires a non-negative integer.
    fn factorial(n: &Self::Value, precision: Precision) -> NumeralResult<Self::Value>;

    // === Transcendental ===

    /// Returns `sin(a)`.
    fn sin(a: &Self::Value, precision: Precision) -> NumeralResult<Self::Value>;

    /// Returns `cos(a)`.
    fn cos(a: &Self::Value, precision: Precision) -> NumeralResult<Self::Value>;

    /// Returns `tan(a)`.
    fn tan(a: &Self::Value, precision: Precision) -> NumeralResult<Self::Value>;

    /// Returns `arcsin(a)`. Requires `|a| <= 1`.
    fn arc_sin(a: &Self::Value, precision: Precision) -> NumeralResult<Self::Value>;

    /// Returns `arccos(a)`. Requires `|a| <= 1`.
    fn arc_cos(a: &Self::Value, precision: Precision) -> NumeralResult<Self::Value>;

    /// Returns `arctan(a)`.
    fn arc_tan(a: &Self::Value, precision: Precision) -> NumeralResult<Self::Value>;

    /// Returns `e^a`.
    fn exp(a: &Self::Value, precision: Precision) -> NumeralResult<Self::Value>;

    /// Returns `ln(a)`. Requires `a > 0`.
    fn ln(a: &Self::Value, precision: Precision) -> NumeralResult<Self::Value>;

    /// Returns π.
    fn pi(precision: Precision) -> NumeralResult<Self::Value>;

    // === Bitwise ===

    /// Shifts left by `by` bits, or right (flooring) when `by` is negative.
    /// Requires an integer.
    fn shift(a: &Self::Value, by: i64) -> NumeralResult<Self::Value>;

    /// Two's-complement `a & b`. Requires integers.
    fn bit_and(a: &Self::Value, b: &Self::Value) -> NumeralResult<Self::Value>;

    /// Two's-complement `a | b`. Requires integers.
    fn bit_or(a: &Self::Value, b: &Self::Value) -> NumeralResult<Self::Value>;

    /// Two's-complement `a ^ b`. Requires integers.
    fn bit_xor(a: &Self::Value, b: &Self::Value) -> NumeralResult<Self::Value>;
}

//! String-addressed numeral operations.
//!
//! Every function here parses its text operands in base 10, calls the
//! matching [`Numeral`] method, renders the result in base 10 and interns it.
//! [`from_base`] and [`to_base`] are the exceptions: they read or write one
//! side in another radix. No arithmetic happens in this module, so results
//! always agree with the value-level API.
//!
//! ```
//! use numera_core::AtomTable;
//! use numera_numbers::{api, Precision};
//!
//! let atoms = AtomTable::new();
//! let sum = api::add("123", "0.5", &atoms, Precision::new(10)).unwrap();
//! assert_eq!(&*atoms.text(sum).unwrap(), "123.5");
//! ```

use numera_core::{AtomHandle, AtomTable};

use crate::error::{NumeralError, NumeralResult};
use crate::numeral::Numeral;
use crate::precision::{Precision, Radix};

fn numeral(text: &str, precision: Precision) -> NumeralResult<Numeral> {
    Numeral::parse(text, Radix::DECIMAL, precision)
}

/// Interns the base-10 text of `value`.
#[must_use]
pub fn number_to_atom(value: &Numeral, atoms: &AtomTable) -> AtomHandle {
    atoms.lookup(&value.to_string())
}

/// Parses the numeral text behind `handle`.
///
/// # Errors
///
/// Returns a parse error if the atom is unknown or is not a numeral.
pub fn atom_to_number(handle: AtomHandle, atoms: &AtomTable, precision: Precision) -> NumeralResult<Numeral> {
    let text = atoms
        .text(handle)
        .ok_or_else(|| NumeralError::parse(&handle.to_string(), "unknown atom"))?;
    numeral(&text, precision)
}

macro_rules! unary {
    ($($(#[$doc:meta])* $name:ident;)*) => {$(
        $(#[$doc])*
        ///
        /// # Errors
        ///
        /// Returns the error of the underlying [`Numeral`] operation, or a
        /// parse error for malformed operands.
        pub fn $name(x: &str, atoms: &AtomTable, precision: Precision) -> NumeralResult<AtomHandle> {
            let result = numeral(x, precision)?.$name(precision)?;
            Ok(number_to_atom(&result, atoms))
        }
    )*};
}

macro_rules! binary {
    ($($(#[$doc:meta])* $name:ident;)*) => {$(
        $(#[$doc])*
        ///
        /// # Errors
        ///
        /// Returns the error of the underlying [`Numeral`] operation, or a
        /// parse error for malformed operands.
        pub fn $name(x: &str, y: &str, atoms: &AtomTable, precision: Precision) -> NumeralResult<AtomHandle> {
            let result = numeral(x, precision)?.$name(&numeral(y, precision)?, precision)?;
            Ok(number_to_atom(&result, atoms))
        }
    )*};
}

macro_rules! exact_binary {
    ($($(#[$doc:meta])* $name:ident;)*) => {$(
        $(#[$doc])*
        ///
        /// # Errors
        ///
        /// Returns the error of the underlying [`Numeral`] operation, or a
        /// parse error for malformed operands.
        pub fn $name(x: &str, y: &str, atoms: &AtomTable, precision: Precision) -> NumeralResult<AtomHandle> {
            let result = numeral(x, precision)?.$name(&numeral(y, precision)?)?;
            Ok(number_to_atom(&result, atoms))
        }
    )*};
}

binary! {
    /// `x + y`.
    add;
    /// `x - y`.
    subtract;
    /// `x * y`.
    multiply;
    /// `x / y`.
    divide;
    /// `x ^ y`.
    power;
}

exact_binary! {
    /// Greatest common divisor of two integers.
    gcd;
    /// `x mod y`, floored.
    modulo;
    /// `floor(x / y)`.
    quotient;
    /// Shifts `x` left by `y` bits.
    shift_left;
    /// Shifts `x` right by `y` bits.
    shift_right;
    /// Two's-complement `x & y`.
    bit_and;
    /// Two's-complement `x | y`.
    bit_or;
    /// Two's-complement `x ^ y`.
    bit_xor;
}

unary! {
    /// Square root.
    sqrt;
    /// Sine.
    sin;
    /// Cosine.
    cos;
    /// Tangent.
    tan;
    /// Inverse sine.
    arc_sin;
    /// Inverse cosine.
    arc_cos;
    /// Inverse tangent.
    arc_tan;
    /// Exponential.
    exp;
    /// Natural logarithm.
    ln;
}

/// `x * y + z`, without modifying any operand.
///
/// # Errors
///
/// Returns a parse error for malformed operands, or the error of the product.
pub fn multiply_add(x: &str, y: &str, z: &str, atoms: &AtomTable, precision: Precision) -> NumeralResult<AtomHandle> {
    let mut acc = numeral(z, precision)?;
    acc.accumulate_product(&numeral(x, precision)?, &numeral(y, precision)?, precision)?;
    Ok(number_to_atom(&acc, atoms))
}

/// `-x`.
///
/// # Errors
///
/// Returns a parse error for malformed operands.
pub fn negate(x: &str, atoms: &AtomTable, precision: Precision) -> NumeralResult<AtomHandle> {
    let result = numeral(x, precision)?.negate()?;
    Ok(number_to_atom(&result, atoms))
}

/// `|x|`.
///
/// # Errors
///
/// Returns a parse error for malformed operands.
pub fn abs(x: &str, atoms: &AtomTable, precision: Precision) -> NumeralResult<AtomHandle> {
    let result = numeral(x, precision)?.abs()?;
    Ok(number_to_atom(&result, atoms))
}

/// Greatest integer not above `x`.
///
/// # Errors
///
/// Returns a parse error for malformed operands.
pub fn floor(x: &str, atoms: &AtomTable, precision: Precision) -> NumeralResult<AtomHandle> {
    let result = numeral(x, precision)?.floor()?;
    Ok(number_to_atom(&result, atoms))
}

/// Least integer not below `x`.
///
/// # Errors
///
/// Returns a parse error for malformed operands.
pub fn ceil(x: &str, atoms: &AtomTable, precision: Precision) -> NumeralResult<AtomHandle> {
    let result = numeral(x, precision)?.ceil()?;
    Ok(number_to_atom(&result, atoms))
}

/// Parses and re-renders `x` in canonical form.
///
/// # Errors
///
/// Returns a parse error for malformed operands.
pub fn plus(x: &str, atoms: &AtomTable, precision: Precision) -> NumeralResult<AtomHandle> {
    Ok(number_to_atom(&numeral(x, precision)?, atoms))
}

/// `x!`. The operand is interned and parsed only once.
///
/// # Errors
///
/// Returns a domain error for negative or fractional operands.
pub fn factorial(x: &str, atoms: &AtomTable, precision: Precision) -> NumeralResult<AtomHandle> {
    let result = Numeral::factorial(atoms.lookup(x), atoms, precision)?;
    Ok(number_to_atom(&result, atoms))
}

/// π.
///
/// # Errors
///
/// Fails if the backend cannot honor `precision`.
pub fn pi(atoms: &AtomTable, precision: Precision) -> NumeralResult<AtomHandle> {
    Ok(number_to_atom(&Numeral::pi(precision)?, atoms))
}

/// Reads `x` as a numeral written in radix `base` and interns its base-10
/// text.
///
/// # Errors
///
/// Returns a domain error for a radix outside 2..=36, or a parse error if a
/// digit is not valid in the radix.
pub fn from_base(x: &str, base: &str, atoms: &AtomTable, precision: Precision) -> NumeralResult<AtomHandle> {
    let result = Numeral::parse(x, Radix::from_text(base)?, precision)?;
    Ok(number_to_atom(&result, atoms))
}

/// Interns the text of `x` written in radix `base`, with letters for digits
/// from ten up.
///
/// # Errors
///
/// Returns a domain error for a radix outside 2..=36, or a parse error for a
/// malformed operand.
pub fn to_base(x: &str, base: &str, atoms: &AtomTable, precision: Precision) -> NumeralResult<AtomHandle> {
    let radix = Radix::from_text(base)?;
    Ok(atoms.lookup(&numeral(x, precision)?.to_string_radix(radix)))
}

/// `x > y`.
///
/// # Errors
///
/// Returns a parse error for malformed operands.
pub fn greater_than(x: &str, y: &str, precision: Precision) -> NumeralResult<bool> {
    Ok(numeral(x, precision)?.greater_than(&numeral(y, precision)?))
}

/// `x < y`.
///
/// # Errors
///
/// Returns a parse error for malformed operands.
pub fn less_than(x: &str, y: &str, precision: Precision) -> NumeralResult<bool> {
    Ok(numeral(x, precision)?.less_than(&numeral(y, precision)?))
}

//! Reference-counted numeral values.
//!
//! [`Numeral`] is the value handle the evaluator passes around. It wraps a
//! backend value in an [`Rc`], so clones share one value and the last drop
//! frees it. Every operation checks the shared edge-case policy (zero
//! divisors, argument domains, integer-only operands) before dispatching to
//! the backend.

use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

use numera_core::{AtomHandle, AtomTable};

use crate::backend::{ActiveBackend, Backend};
use crate::error::{NumeralError, NumeralResult};
use crate::precision::{Precision, Radix};
use crate::text::NumeralText;

/// A numeral value held by reference count.
///
/// Numerals are immutable except through
/// [`accumulate_product`](Self::accumulate_product), which copies the value
/// first if it is shared.
pub struct Numeral<B: Backend = ActiveBackend> {
    value: Rc<B::Value>,
}

impl<B: Backend> Numeral<B> {
    fn wrap(value: B::Value) -> Self {
        Self {
            value: Rc::new(value),
        }
    }

    // === Construction ===

    /// Parses numeral text written in `radix`.
    ///
    /// # Errors
    ///
    /// Returns a parse error for malformed text, or
    /// [`NumeralError::PrecisionUnsupported`] if the text has a fractional
    /// part or exponent and the backend has no mantissa support.
    pub fn parse(text: &str, radix: Radix, precision: Precision) -> NumeralResult<Self> {
        let lexed = NumeralText::parse(text, radix)?;
        if lexed.is_float() && !B::SUPPORTS_MANTISSA {
            return Err(NumeralError::unsupported(B::NAME, "fractional numerals"));
        }
        B::from_text(&lexed, precision).map(Self::wrap)
    }

    /// Creates an exact integer.
    #[must_use]
    pub fn from_i64(value: i64) -> Self {
        Self::wrap(B::from_i64(value))
    }

    /// Returns π.
    ///
    /// # Errors
    ///
    /// Fails if the backend cannot honor `precision`.
    pub fn pi(precision: Precision) -> NumeralResult<Self> {
        B::pi(precision).map(Self::wrap)
    }

    // === Inspection ===

    /// Returns the backend value.
    #[must_use]
    pub fn value(&self) -> &B::Value {
        &self.value
    }

    /// Returns the number of handles sharing this value.
    #[must_use]
    pub fn ref_count(&self) -> usize {
        Rc::strong_count(&self.value)
    }

    /// Returns an independent copy that shares nothing with `self`.
    #[must_use]
    pub fn deep_copy(&self) -> Self {
        Self::wrap(B::Value::clone(&self.value))
    }

    /// Returns true for exact integers.
    #[must_use]
    pub fn is_integer(&self) -> bool {
        B::is_integer(&self.value)
    }

    /// Compares the value to zero.
    #[must_use]
    pub fn signum(&self) -> Ordering {
        B::signum(&self.value)
    }

    /// Returns true if the value is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.signum() == Ordering::Equal
    }

    /// Returns the value as an `i64` if it is an exact integer in range.
    #[must_use]
    pub fn to_i64(&self) -> Option<i64> {
        B::to_i64(&self.value)
    }

    /// Renders the value in `radix`.
    #[must_use]
    pub fn to_string_radix(&self, radix: Radix) -> String {
        B::render(&self.value, radix)
    }

    // === Comparison ===

    /// Returns true if `self > other`. Exact, independent of precision.
    #[must_use]
    pub fn greater_than(&self, other: &Self) -> bool {
        B::compare(&self.value, &other.value) == Ordering::Greater
    }

    /// Returns true if `self < other`. Exact, independent of precision.
    #[must_use]
    pub fn less_than(&self, other: &Self) -> bool {
        B::compare(&self.value, &other.value) == Ordering::Less
    }

    // === Arithmetic ===

    /// Returns `self + other`.
    ///
    /// # Errors
    ///
    /// Fails if the backend cannot represent the result.
    pub fn add(&self, other: &Self, precision: Precision) -> NumeralResult<Self> {
        B::add(&self.value, &other.value, precision).map(Self::wrap)
    }

    /// Returns `self - other`.
    ///
    /// # Errors
    ///
    /// Fails if the backend cannot represent the result.
    pub fn subtract(&self, other: &Self, precision: Precision) -> NumeralResult<Self> {
        let negated = B::negate(&other.value)?;
        B::add(&self.value, &negated, precision).map(Self::wrap)
    }

    /// Returns `self * other`.
    ///
    /// # Errors
    ///
    /// Fails if the backend cannot represent the result.
    pub fn multiply(&self, other: &Self, precision: Precision) -> NumeralResult<Self> {
        B::multiply(&self.value, &other.value, precision).map(Self::wrap)
    }

    /// Adds `x * y` into this accumulator.
    ///
    /// If the value is shared it is copied first, so other handles and the
    /// operands never observe the change.
    ///
    /// # Errors
    ///
    /// Fails if the backend cannot represent the result.
    pub fn accumulate_product(&mut self, x: &Self, y: &Self, precision: Precision) -> NumeralResult<()> {
        let target = Rc::make_mut(&mut self.value);
        B::multiply_add(target, &x.value, &y.value, precision)
    }

    /// Returns `-self`.
    ///
    /// # Errors
    ///
    /// Fails if the backend cannot represent the result.
    pub fn negate(&self) -> NumeralResult<Self> {
        B::negate(&self.value).map(Self::wrap)
    }

    /// Returns `|self|`.
    ///
    /// # Errors
    ///
    /// Fails if the backend cannot represent the result.
    pub fn abs(&self) -> NumeralResult<Self> {
        B::abs(&self.value).map(Self::wrap)
    }

    /// Returns `self / other`, exactly when the quotient is exact.
    ///
    /// # Errors
    ///
    /// Returns [`NumeralError::DivisionByZero`] if `other` is zero.
    pub fn divide(&self, other: &Self, precision: Precision) -> NumeralResult<Self> {
        other.require_nonzero()?;
        B::divide(&self.value, &other.value, precision).map(Self::wrap)
    }

    /// Returns `self ^ exponent`.
    ///
    /// # Errors
    ///
    /// Returns [`NumeralError::DivisionByZero`] for zero to a negative power,
    /// and a domain error for a negative base with a fractional exponent.
    pub fn power(&self, exponent: &Self, precision: Precision) -> NumeralResult<Self> {
        if self.is_zero() && exponent.signum() == Ordering::Less {
            return Err(NumeralError::DivisionByZero);
        }
        if self.signum() == Ordering::Less && !exponent.is_whole()? {
            return Err(NumeralError::domain("power", "negative base with fractional exponent"));
        }
        B::power(&self.value, &exponent.value, precision).map(Self::wrap)
    }

    /// Returns the greatest integer not above the value.
    ///
    /// # Errors
    ///
    /// Fails if the backend cannot represent the result.
    pub fn floor(&self) -> NumeralResult<Self> {
        B::floor(&self.value).map(Self::wrap)
    }

    /// Returns the least integer not below the value.
    ///
    /// # Errors
    ///
    /// Fails if the backend cannot represent the result.
    pub fn ceil(&self) -> NumeralResult<Self> {
        B::ceil(&self.value).map(Self::wrap)
    }

    /// Returns `floor(self / other)` as an exact integer.
    ///
    /// # Errors
    ///
    /// Returns [`NumeralError::DivisionByZero`] if `other` is zero.
    pub fn quotient(&self, other: &Self) -> NumeralResult<Self> {
        other.require_nonzero()?;
        B::quotient(&self.value, &other.value).map(Self::wrap)
    }

    /// Returns `self - other * floor(self / other)`.
    ///
    /// # Errors
    ///
    /// Returns [`NumeralError::DivisionByZero`] if `other` is zero.
    pub fn modulo(&self, other: &Self) -> NumeralResult<Self> {
        other.require_nonzero()?;
        B::modulo(&self.value, &other.value).map(Self::wrap)
    }

    /// Returns the non-negative greatest common divisor.
    ///
    /// # Errors
    ///
    /// Returns a type error unless both operands are exact integers.
    pub fn gcd(&self, other: &Self) -> NumeralResult<Self> {
        self.require_integer("gcd")?;
        other.require_integer("gcd")?;
        B::gcd(&self.value, &other.value).map(Self::wrap)
    }

    /// Returns the square root; exact for perfect squares.
    ///
    /// # Errors
    ///
    /// Returns a domain error for negative values.
    pub fn sqrt(&self, precision: Precision) -> NumeralResult<Self> {
        if self.signum() == Ordering::Less {
            return Err(NumeralError::domain("sqrt", "negative argument"));
        }
        B::sqrt(&self.value, precision).map(Self::wrap)
    }

    /// Returns `n!` for the interned numeral text behind `operand`.
    ///
    /// The operand is parsed here rather than by the caller, so huge integer
    /// literals are only parsed once.
    ///
    /// # Errors
    ///
    /// Returns a parse error for unknown atoms or malformed text, and a domain
    /// error for negative or fractional operands.
    pub fn factorial(operand: AtomHandle, atoms: &AtomTable, precision: Precision) -> NumeralResult<Self> {
        let text = atoms
            .text(operand)
            .ok_or_else(|| NumeralError::parse(&operand.to_string(), "unknown atom"))?;
        let n = Self::parse(&text, Radix::DECIMAL, precision)?;
        if n.signum() == Ordering::Less {
            return Err(NumeralError::domain("factorial", "negative argument"));
        }
        let n = if n.is_integer() {
            n
        } else if n.is_whole()? {
            n.floor()?
        } else {
            return Err(NumeralError::domain("factorial", "non-integer argument"));
        };
        B::factorial(&n.value, precision).map(Self::wrap)
    }

    // === Transcendental ===

    /// Returns `sin(self)`.
    ///
    /// # Errors
    ///
    /// Fails if the backend cannot honor `precision`.
    pub fn sin(&self, precision: Precision) -> NumeralResult<Self> {
        if self.is_exact_zero() {
            return Ok(Self::from_i64(0));
        }
        B::sin(&self.value, precision).map(Self::wrap)
    }

    /// Returns `cos(self)`.
    ///
    /// # Errors
    ///
    /// Fails if the backend cannot honor `precision`.
    pub fn cos(&self, precision: Precision) -> NumeralResult<Self> {
        if self.is_exact_zero() {
            return Ok(Self::from_i64(1));
        }
        B::cos(&self.value, precision).map(Self::wrap)
    }

    /// Returns `tan(self)`.
    ///
    /// # Errors
    ///
    /// Fails if the backend cannot honor `precision`.
    pub fn tan(&self, precision: Precision) -> NumeralResult<Self> {
        if self.is_exact_zero() {
            return Ok(Self::from_i64(0));
        }
        B::tan(&self.value, precision).map(Self::wrap)
    }

    /// Returns `arcsin(self)`.
    ///
    /// # Errors
    ///
    /// Returns a domain error outside [-1, 1].
    pub fn arc_sin(&self, precision: Precision) -> NumeralResult<Self> {
        self.require_unit_interval("arcsin")?;
        if self.is_exact_zero() {
            return Ok(Self::from_i64(0));
        }
        B::arc_sin(&self.value, precision).map(Self::wrap)
    }

    /// Returns `arccos(self)`.
    ///
    /// # Errors
    ///
    /// Returns a domain error outside [-1, 1].
    pub fn arc_cos(&self, precision: Precision) -> NumeralResult<Self> {
        self.require_unit_interval("arccos")?;
        B::arc_cos(&self.value, precision).map(Self::wrap)
    }

    /// Returns `arctan(self)`.
    ///
    /// # Errors
    ///
    /// Fails if the backend cannot honor `precision`.
    pub fn arc_tan(&self, precision: Precision) -> NumeralResult<Self> {
        if self.is_exact_zero() {
            return Ok(Self::from_i64(0));
        }
        B::arc_tan(&self.value, precision).map(Self::wrap)
    }

    /// Returns `e^self`.
    ///
    /// # Errors
    ///
    /// Fails if the backend cannot represent the result.
    pub fn exp(&self, precision: Precision) -> NumeralResult<Self> {
        if self.is_exact_zero() {
            return Ok(Self::from_i64(1));
        }
        B::exp(&self.value, precision).map(Self::wrap)
    }

    /// Returns the natural logarithm.
    ///
    /// # Errors
    ///
    /// Returns a domain error for non-positive values.
    pub fn ln(&self, precision: Precision) -> NumeralResult<Self> {
        if self.signum() != Ordering::Greater {
            return Err(NumeralError::domain("ln", "non-positive argument"));
        }
        if self.is_integer() && self.to_i64() == Some(1) {
            return Ok(Self::from_i64(0));
        }
        B::ln(&self.value, precision).map(Self::wrap)
    }

    // === Bitwise ===

    /// Shifts left by `bits`; a negative count shifts right.
    ///
    /// # Errors
    ///
    /// Returns a type error unless both operands are exact integers.
    pub fn shift_left(&self, bits: &Self) -> NumeralResult<Self> {
        let by = self.shift_amount(bits, "shift_left")?;
        B::shift(&self.value, by).map(Self::wrap)
    }

    /// Shifts right by `bits`, rounding toward negative infinity; a negative
    /// count shifts left.
    ///
    /// # Errors
    ///
    /// Returns a type error unless both operands are exact integers.
    pub fn shift_right(&self, bits: &Self) -> NumeralResult<Self> {
        let by = self.shift_amount(bits, "shift_right")?;
        let by = by
            .checked_neg()
            .ok_or_else(|| NumeralError::unsupported(B::NAME, "a shift this large"))?;
        B::shift(&self.value, by).map(Self::wrap)
    }

    /// Two's-complement `self & other`.
    ///
    /// # Errors
    ///
    /// Returns a type error unless both operands are exact integers.
    pub fn bit_and(&self, other: &Self) -> NumeralResult<Self> {
        self.require_integers(other, "bit_and")?;
        B::bit_and(&self.value, &other.value).map(Self::wrap)
    }

    /// Two's-complement `self | other`.
    ///
    /// # Errors
    ///
    /// Returns a type error unless both operands are exact integers.
    pub fn bit_or(&self, other: &Self) -> NumeralResult<Self> {
        self.require_integers(other, "bit_or")?;
        B::bit_or(&self.value, &other.value).map(Self::wrap)
    }

    /// Two's-complement `self ^ other`.
    ///
    /// # Errors
    ///
    /// Returns a type error unless both operands are exact integers.
    pub fn bit_xor(&self, other: &Self) -> NumeralResult<Self> {
        self.require_integers(other, "bit_xor")?;
        B::bit_xor(&self.value, &other.value).map(Self::wrap)
    }

    // === Policy checks ===

    fn is_exact_zero(&self) -> bool {
        self.is_integer() && self.is_zero()
    }

    /// True if the value has no fractional part.
    fn is_whole(&self) -> NumeralResult<bool> {
        if self.is_integer() {
            return Ok(true);
        }
        let floor = B::floor(&self.value)?;
        Ok(B::compare(&floor, &self.value) == Ordering::Equal)
    }

    fn require_nonzero(&self) -> NumeralResult<()> {
        if self.is_zero() {
            Err(NumeralError::DivisionByZero)
        } else {
            Ok(())
        }
    }

    fn require_integer(&self, operation: &'static str) -> NumeralResult<()> {
        if self.is_integer() {
            Ok(())
        } else {
            Err(NumeralError::not_integer(operation))
        }
    }

    fn require_integers(&self, other: &Self, operation: &'static str) -> NumeralResult<()> {
        self.require_integer(operation)?;
        other.require_integer(operation)
    }

    fn require_unit_interval(&self, operation: &'static str) -> NumeralResult<()> {
        let magnitude = B::abs(&self.value)?;
        if B::compare(&magnitude, &B::from_i64(1)) == Ordering::Greater {
            return Err(NumeralError::domain(operation, "argument outside [-1, 1]"));
        }
        Ok(())
    }

    fn shift_amount(&self, bits: &Self, operation: &'static str) -> NumeralResult<i64> {
        self.require_integers(bits, operation)?;
        bits.to_i64()
            .ok_or_else(|| NumeralError::unsupported(B::NAME, "a shift this large"))
    }
}

impl<B: Backend> Clone for Numeral<B> {
    fn clone(&self) -> Self {
        Self {
            value: Rc::clone(&self.value),
        }
    }
}

impl<B: Backend> PartialEq for Numeral<B> {
    fn eq(&self, other: &Self) -> bool {
        B::compare(&self.value, &other.value) == Ordering::Equal
    }
}

impl<B: Backend> fmt::Debug for Numeral<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Numeral").field(&*self.value).finish()
    }
}

impl<B: Backend> fmt::Display for Numeral<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_radix(Radix::DECIMAL))
    }
}

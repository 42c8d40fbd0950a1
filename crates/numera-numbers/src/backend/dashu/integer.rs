//! Arbitrary precision integers.
//!
//! This module provides a wrapper around `dashu::IBig` with the exact
//! operations the numeral contract needs: floored division, integer square
//! roots, two's-complement bit operations, radix rendering and factorials.

use dashu::base::{Abs, BitTest, Gcd, Signed as DashuSigned};
use dashu::integer::IBig;
use num_traits::{One, Zero};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, BitAnd, BitOr, BitXor, Div, Mul, Neg, Rem, Sub};

/// Products of fewer factors than this are multiplied sequentially.
const PRODUCT_LEAF: u64 = 16;

/// An arbitrary precision integer.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Integer(IBig);

impl Integer {
    /// Creates a new integer from an i64.
    #[must_use]
    pub fn new(value: i64) -> Self {
        Self(IBig::from(value))
    }

    /// Creates an integer from a string in the given base.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid integer.
    pub fn from_str_radix(s: &str, radix: u32) -> Result<Self, dashu::base::error::ParseError> {
        IBig::from_str_radix(s, radix).map(Self)
    }

    /// Returns `10^exp`.
    #[must_use]
    pub fn pow10(exp: usize) -> Self {
        Self(IBig::from(10u8).pow(exp))
    }

    /// Returns `base^exp`.
    #[must_use]
    pub fn power_of(base: u32, exp: usize) -> Self {
        Self(IBig::from(base).pow(exp))
    }

    /// Returns the absolute value.
    #[must_use]
    pub fn abs(&self) -> Self {
        Self(self.0.clone().abs())
    }

    /// Returns the sign: -1, 0, or 1.
    #[must_use]
    pub fn signum(&self) -> i8 {
        if self.0.is_zero() {
            0
        } else if DashuSigned::is_positive(&self.0) {
            1
        } else {
            -1
        }
    }

    /// Returns the sign as an ordering against zero.
    #[must_use]
    pub fn sign_ordering(&self) -> Ordering {
        self.signum().cmp(&0)
    }

    /// Returns true if this integer is negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        DashuSigned::is_negative(&self.0)
    }

    /// Returns true if this integer is even.
    #[must_use]
    pub fn is_even(&self) -> bool {
        !self.0.bit(0)
    }

    /// Returns the number of bits needed to represent the magnitude.
    #[must_use]
    pub fn bit_len(&self) -> usize {
        self.0.bit_len()
    }

    /// Returns the number of decimal digits in the magnitude (1 for zero).
    #[must_use]
    pub fn decimal_digits(&self) -> usize {
        let magnitude = self.abs();
        let bits = magnitude.bit_len();
        if bits <= 1 {
            return 1;
        }
        // A lower bound from the bit length, corrected upward.
        let mut digits = ((bits - 1) as f64 * std::f64::consts::LOG10_2) as usize + 1;
        while Self::pow10(digits) <= magnitude {
            digits += 1;
        }
        while digits > 1 && Self::pow10(digits - 1) > magnitude {
            digits -= 1;
        }
        digits
    }

    /// Computes the greatest common divisor.
    #[must_use]
    pub fn gcd(&self, other: &Self) -> Self {
        Self(IBig::from(self.0.clone().gcd(other.0.clone())))
    }

    /// Returns the floored quotient `floor(self / other)`.
    ///
    /// # Panics
    ///
    /// Panics if `other` is zero.
    #[must_use]
    pub fn floor_div(&self, other: &Self) -> Self {
        let q = &self.0 / &other.0;
        let r = &self.0 % &other.0;
        if !r.is_zero() && (self.is_negative() != other.is_negative()) {
            Self(q - IBig::ONE)
        } else {
            Self(q)
        }
    }

    /// Returns `self - other * floor(self / other)`, which has the sign of `other`.
    ///
    /// # Panics
    ///
    /// Panics if `other` is zero.
    #[must_use]
    pub fn floor_mod(&self, other: &Self) -> Self {
        let r = &self.0 % &other.0;
        if !r.is_zero() && (self.is_negative() != other.is_negative()) {
            Self(r + &other.0)
        } else {
            Self(r)
        }
    }

    /// Returns true if `other` divides `self`.
    #[must_use]
    pub fn is_divisible_by(&self, other: &Self) -> bool {
        (&self.0 % &other.0).is_zero()
    }

    /// Returns `self * 2^bits`.
    #[must_use]
    pub fn shl(&self, bits: usize) -> Self {
        Self(self.0.clone() << bits)
    }

    /// Returns `floor(self / 2^bits)`.
    #[must_use]
    pub fn shr_floor(&self, bits: usize) -> Self {
        if self.is_negative() {
            // floor(-m / 2^k) = -ceil(m / 2^k)
            let magnitude = self.abs().0;
            let bias = (IBig::ONE << bits) - IBig::ONE;
            Self(-((magnitude + bias) >> bits))
        } else {
            Self(self.0.clone() >> bits)
        }
    }

    /// Returns `floor(sqrt(self))` for a non-negative integer.
    #[must_use]
    pub fn isqrt(&self) -> Self {
        if self.signum() <= 0 {
            return Self::zero();
        }
        let mut x = Self::one().shl((self.bit_len() + 1) / 2);
        loop {
            let y = (&x + &(self / &x)).shr_floor(1);
            if y >= x {
                return x;
            }
            x = y;
        }
    }

    /// Returns the integer nearest to `self / other`, ties away from zero.
    #[must_use]
    pub fn div_round(&self, other: &Self) -> Self {
        let negative = self.is_negative() != other.is_negative();
        let (n, d) = (self.abs(), other.abs());
        let q = &n / &d;
        let r = &n % &d;
        let q = if r.shl(1) >= d { q + Self::one() } else { q };
        if negative {
            -q
        } else {
            q
        }
    }

    /// Renders the integer in `radix` with lowercase digits.
    #[must_use]
    pub fn to_string_radix(&self, radix: u32) -> String {
        if radix == 10 {
            return self.0.to_string();
        }
        if self.0.is_zero() {
            return "0".to_string();
        }

        // Peel off chunks of `width` digits that fit comfortably in an i64.
        let mut width = 1usize;
        let mut chunk = i64::from(radix);
        while chunk.checked_mul(i64::from(radix)).map_or(false, |c| c < (1i64 << 62)) {
            chunk *= i64::from(radix);
            width += 1;
        }
        let divisor = Self::new(chunk);

        let mut magnitude = self.abs();
        let mut chunks = Vec::new();
        while !magnitude.is_zero() {
            let rest = (&magnitude % &divisor).to_i64().unwrap_or(0);
            chunks.push(rest);
            magnitude = &magnitude / &divisor;
        }

        let mut out = String::with_capacity(chunks.len() * width + 1);
        if self.is_negative() {
            out.push('-');
        }
        for (i, chunk) in chunks.iter().rev().enumerate() {
            let digits = chunk_digits(*chunk, radix);
            if i > 0 {
                out.extend(std::iter::repeat('0').take(width - digits.len()));
            }
            out.push_str(&digits);
        }
        out
    }

    /// Attempts to convert to an i64.
    ///
    /// Returns `None` if the value doesn't fit in an i64.
    #[must_use]
    pub fn to_i64(&self) -> Option<i64> {
        self.0.clone().try_into().ok()
    }

    /// Attempts to convert to a u64.
    #[must_use]
    pub fn to_u64(&self) -> Option<u64> {
        self.0.clone().try_into().ok()
    }

    /// Computes self^exp.
    #[must_use]
    pub fn pow(&self, exp: usize) -> Self {
        Self(self.0.pow(exp))
    }

    /// Computes `n!` by splitting the product into a balanced tree.
    #[must_use]
    pub fn factorial(n: u64) -> Self {
        if n < 2 {
            return Self::one();
        }
        product_range(2, n)
    }
}

/// Product of all integers in `lo..=hi`.
fn product_range(lo: u64, hi: u64) -> Integer {
    if lo > hi {
        return Integer::one();
    }
    if hi - lo < PRODUCT_LEAF {
        let mut acc = IBig::ONE;
        for k in lo..=hi {
            acc *= IBig::from(k);
        }
        return Integer(acc);
    }
    let mid = lo + (hi - lo) / 2;
    product_range(lo, mid) * product_range(mid + 1, hi)
}

fn chunk_digits(mut chunk: i64, radix: u32) -> String {
    if chunk == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while chunk > 0 {
        let d = (chunk % i64::from(radix)) as u32;
        digits.push(char::from_digit(d, radix).unwrap_or('?'));
        chunk /= i64::from(radix);
    }
    digits.iter().rev().collect()
}

impl Zero for Integer {
    fn zero() -> Self {
        Self(IBig::ZERO)
    }

    fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl One for Integer {
    fn one() -> Self {
        Self(IBig::ONE)
    }

    fn is_one(&self) -> bool {
        self.0 == IBig::ONE
    }
}

impl fmt::Debug for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Integer({})", self.0)
    }
}

impl fmt::Display for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Arithmetic operations, forwarded to `IBig` for owned and borrowed operands.
macro_rules! forward_binop {
    ($($trait:ident :: $method:ident),* $(,)?) => {$(
        impl $trait for Integer {
            type Output = Integer;

            fn $method(self, rhs: Integer) -> Integer {
                Integer($trait::$method(self.0, rhs.0))
            }
        }

        impl $trait<&Integer> for Integer {
            type Output = Integer;

            fn $method(self, rhs: &Integer) -> Integer {
                Integer($trait::$method(self.0, &rhs.0))
            }
        }

        impl $trait<&Integer> for &Integer {
            type Output = Integer;

            fn $method(self, rhs: &Integer) -> Integer {
                Integer($trait::$method(&self.0, &rhs.0))
            }
        }
    )*};
}

forward_binop!(
    Add::add,
    Sub::sub,
    Mul::mul,
    Div::div,
    Rem::rem,
    BitAnd::bitand,
    BitOr::bitor,
    BitXor::bitxor,
);

impl Neg for Integer {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Neg for &Integer {
    type Output = Integer;

    fn neg(self) -> Self::Output {
        Integer(-&self.0)
    }
}

impl From<u64> for Integer {
    fn from(value: u64) -> Self {
        Self(IBig::from(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(s: &str) -> Integer {
        Integer::from_str_radix(s, 10).unwrap()
    }

    #[test]
    fn test_basic_ops() {
        let a = Integer::new(10);
        let b = Integer::new(3);

        assert_eq!((a.clone() + b.clone()).to_i64(), Some(13));
        assert_eq!((a.clone() - b.clone()).to_i64(), Some(7));
        assert_eq!((a.clone() * b.clone()).to_i64(), Some(30));
        assert_eq!((a.clone() / b.clone()).to_i64(), Some(3));
        assert_eq!((a % b).to_i64(), Some(1));
    }

    #[test]
    fn test_floored_division() {
        let cases = [(7, 2, 3, 1), (-7, 2, -4, 1), (7, -2, -4, -1), (-7, -2, 3, -1), (6, 3, 2, 0)];
        for (a, b, q, r) in cases {
            let (a, b) = (Integer::new(a), Integer::new(b));
            assert_eq!(a.floor_div(&b).to_i64(), Some(q), "{a} div {b}");
            assert_eq!(a.floor_mod(&b).to_i64(), Some(r), "{a} mod {b}");
        }
    }

    #[test]
    fn test_gcd() {
        let a = Integer::new(48);
        let b = Integer::new(-18);
        assert_eq!(a.gcd(&b).to_i64(), Some(6));
    }

    #[test]
    fn test_shifts() {
        assert_eq!(Integer::new(1).shl(3).to_i64(), Some(8));
        assert_eq!(Integer::new(9).shr_floor(1).to_i64(), Some(4));
        assert_eq!(Integer::new(-9).shr_floor(1).to_i64(), Some(-5));
        assert_eq!(Integer::new(-1).shr_floor(10).to_i64(), Some(-1));
    }

    #[test]
    fn test_isqrt() {
        assert_eq!(Integer::new(0).isqrt().to_i64(), Some(0));
        assert_eq!(Integer::new(15).isqrt().to_i64(), Some(3));
        assert_eq!(Integer::new(16).isqrt().to_i64(), Some(4));
        let big = int("123456789012345678901234567890");
        let root = big.isqrt();
        assert!(&root * &root <= big);
        let next = &root + &Integer::one();
        assert!(&next * &next > big);
    }

    #[test]
    fn test_decimal_digits() {
        assert_eq!(Integer::new(0).decimal_digits(), 1);
        assert_eq!(Integer::new(9).decimal_digits(), 1);
        assert_eq!(Integer::new(10).decimal_digits(), 2);
        assert_eq!(Integer::new(-999).decimal_digits(), 3);
        assert_eq!(Integer::pow10(40).decimal_digits(), 41);
    }

    #[test]
    fn test_radix_rendering() {
        assert_eq!(Integer::new(255).to_string_radix(16), "ff");
        assert_eq!(Integer::new(-5).to_string_radix(2), "-101");
        assert_eq!(Integer::new(0).to_string_radix(36), "0");
        let big = int("340282366920938463463374607431768211456");
        assert_eq!(big.to_string_radix(16), format!("1{}", "0".repeat(32)));
        assert_eq!(Integer::from_str_radix(&big.to_string_radix(7), 7).unwrap(), big);
    }

    #[test]
    fn test_factorial() {
        assert_eq!(Integer::factorial(0).to_i64(), Some(1));
        assert_eq!(Integer::factorial(5).to_i64(), Some(120));
        assert_eq!(
            Integer::factorial(25).to_string(),
            "15511210043330985984000000"
        );
    }

    #[test]
    fn test_div_round() {
        assert_eq!(Integer::new(7).div_round(&Integer::new(2)).to_i64(), Some(4));
        assert_eq!(Integer::new(-7).div_round(&Integer::new(2)).to_i64(), Some(-4));
        assert_eq!(Integer::new(5).div_round(&Integer::new(3)).to_i64(), Some(2));
    }

    #[test]
    fn test_large_numbers() {
        let a = int("123456789012345678901234567890");
        let b = int("987654321098765432109876543210");
        let sum = a + b;
        assert_eq!(sum.to_string(), "1111111110111111111011111111100");
    }
}

//! Arbitrary precision decimal floats.
//!
//! A [`Decimal`] is the exact value `mantissa × 10^exponent`. Addition,
//! subtraction and multiplication are exact; callers round the result to the
//! requested precision. Base-10 text converts to and from a `Decimal` without
//! loss.

use num_traits::{One, Zero};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use super::integer::Integer;
use crate::precision::Precision;
use crate::text::layout_decimal;

/// Trailing zeros are stripped in chunks of this many digits first.
const STRIP_CHUNK: usize = 16;

/// An exact decimal float.
///
/// Invariant: the mantissa has no trailing decimal zeros, and zero is stored
/// with exponent 0, so equal values have equal representations.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Decimal {
    mantissa: Integer,
    exponent: i64,
}

impl Decimal {
    /// Creates `mantissa × 10^exponent`.
    #[must_use]
    pub fn new(mantissa: Integer, exponent: i64) -> Self {
        if mantissa.is_zero() {
            return Self::zero();
        }
        let mut mantissa = mantissa;
        let mut exponent = exponent;

        let chunk = Integer::pow10(STRIP_CHUNK);
        while mantissa.is_divisible_by(&chunk) {
            mantissa = &mantissa / &chunk;
            exponent += STRIP_CHUNK as i64;
        }
        let ten = Integer::new(10);
        while mantissa.is_divisible_by(&ten) {
            mantissa = &mantissa / &ten;
            exponent += 1;
        }
        Self { mantissa, exponent }
    }

    /// Creates a decimal equal to an integer.
    #[must_use]
    pub fn from_integer(n: Integer) -> Self {
        Self::new(n, 0)
    }

    /// Creates `num / den`, exactly if the quotient terminates in base 10 and
    /// rounded to `precision` otherwise.
    ///
    /// # Panics
    ///
    /// Panics if `den` is zero.
    #[must_use]
    pub fn from_ratio(num: &Integer, den: &Integer, precision: Precision) -> Self {
        assert!(!den.is_zero(), "denominator cannot be zero");
        let g = num.gcd(den);
        let (mut num, mut den) = (num / &g, den / &g);
        if den.is_negative() {
            num = -num;
            den = -den;
        }

        let two = Integer::new(2);
        let five = Integer::new(5);
        let (mut twos, mut fives) = (0usize, 0usize);
        let mut rest = den.clone();
        while rest.is_divisible_by(&two) {
            rest = &rest / &two;
            twos += 1;
        }
        while rest.is_divisible_by(&five) {
            rest = &rest / &five;
            fives += 1;
        }

        if rest.is_one() {
            let k = twos.max(fives);
            let scale = Integer::power_of(2, k - twos) * Integer::power_of(5, k - fives);
            Self::new(num * scale, -(k as i64))
        } else {
            Self::from_integer(num).divide(&Self::from_integer(den), precision)
        }
    }

    /// Creates `n × 2^exp2`, rounded to `precision`.
    #[must_use]
    pub fn from_binary(n: &Integer, exp2: i64, precision: Precision) -> Self {
        if n.is_zero() {
            return Self::zero();
        }
        if exp2 >= 0 {
            return Self::from_integer(n.shl(exp2 as usize)).round(precision);
        }

        let shift = exp2.unsigned_abs() as usize;
        let lost = (shift as f64 * std::f64::consts::LOG10_2).ceil() as i64;
        let wanted = i64::from(precision.digits()) + 3 + lost - n.decimal_digits() as i64;
        let k = wanted.max(0) as usize;

        let scaled = n.abs() * Integer::pow10(k);
        let mut q = scaled.shr_floor(shift);
        let mut exponent = -(k as i64);
        if q.shl(shift) != scaled {
            // Sticky digit so rounding sees the discarded remainder.
            q = q * Integer::new(10) + Integer::one();
            exponent -= 1;
        }
        let q = if n.is_negative() { -q } else { q };
        Self::new(q, exponent).round(precision)
    }

    /// Returns the mantissa.
    #[must_use]
    pub fn mantissa(&self) -> &Integer {
        &self.mantissa
    }

    /// Returns the decimal exponent.
    #[must_use]
    pub fn exponent(&self) -> i64 {
        self.exponent
    }

    /// Returns true if negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.mantissa.is_negative()
    }

    /// Returns the sign as an ordering against zero.
    #[must_use]
    pub fn sign_ordering(&self) -> Ordering {
        self.mantissa.sign_ordering()
    }

    /// Returns true if the value is a whole number.
    #[must_use]
    pub fn is_integral(&self) -> bool {
        self.exponent >= 0
    }

    /// Returns `e` such that `|self|` lies in `[10^e, 10^(e+1))`.
    ///
    /// Zero reports 0.
    #[must_use]
    pub fn magnitude(&self) -> i64 {
        if self.is_zero() {
            return 0;
        }
        self.mantissa.decimal_digits() as i64 + self.exponent - 1
    }

    /// Returns the absolute value.
    #[must_use]
    pub fn abs(&self) -> Self {
        Self {
            mantissa: self.mantissa.abs(),
            exponent: self.exponent,
        }
    }

    /// Rounds to `precision` significant digits, ties away from zero.
    #[must_use]
    pub fn round(&self, precision: Precision) -> Self {
        let digits = self.mantissa.decimal_digits();
        let keep = precision.digits() as usize;
        if digits <= keep {
            return self.clone();
        }
        let drop = digits - keep;
        let q = self.mantissa.div_round(&Integer::pow10(drop));
        Self::new(q, self.exponent + drop as i64)
    }

    /// Returns `self / other` rounded to `precision`.
    ///
    /// # Panics
    ///
    /// Panics if `other` is zero.
    #[must_use]
    pub fn divide(&self, other: &Self, precision: Precision) -> Self {
        assert!(!other.is_zero(), "division by zero");
        if self.is_zero() {
            return Self::zero();
        }
        let negative = self.is_negative() != other.is_negative();
        let (a, b) = (self.mantissa.abs(), other.mantissa.abs());

        let wanted = i64::from(precision.digits()) + 2 + b.decimal_digits() as i64
            - a.decimal_digits() as i64;
        let k = wanted.max(0) as usize;

        let scaled = a * Integer::pow10(k);
        let mut q = &scaled / &b;
        let mut exponent = self.exponent - other.exponent - k as i64;
        if !scaled.is_divisible_by(&b) {
            q = q * Integer::new(10) + Integer::one();
            exponent -= 1;
        }
        let q = if negative { -q } else { q };
        Self::new(q, exponent).round(precision)
    }

    /// Returns the greatest integer not above the value.
    #[must_use]
    pub fn floor(&self) -> Integer {
        if self.exponent >= 0 {
            return &self.mantissa * &Integer::pow10(self.exponent as usize);
        }
        self.mantissa
            .floor_div(&Integer::pow10(self.exponent.unsigned_abs() as usize))
    }

    /// Returns the least integer not below the value.
    #[must_use]
    pub fn ceil(&self) -> Integer {
        -(-self).floor()
    }

    /// Returns the value as an integer if it is a whole number.
    #[must_use]
    pub fn to_integer(&self) -> Option<Integer> {
        self.is_integral().then(|| self.floor())
    }

    /// Returns both mantissas scaled to the smaller exponent, and that exponent.
    #[must_use]
    pub fn align(&self, other: &Self) -> (Integer, Integer, i64) {
        let exponent = self.exponent.min(other.exponent);
        let a = &self.mantissa * &Integer::pow10((self.exponent - exponent) as usize);
        let b = &other.mantissa * &Integer::pow10((other.exponent - exponent) as usize);
        (a, b, exponent)
    }

    /// Returns `floor(self / other)`.
    ///
    /// # Panics
    ///
    /// Panics if `other` is zero.
    #[must_use]
    pub fn floor_div(&self, other: &Self) -> Integer {
        let (a, b, _) = self.align(other);
        a.floor_div(&b)
    }

    /// Returns `value × 2^bits`, truncated to an integer.
    #[must_use]
    pub fn to_fixed(&self, bits: usize) -> Integer {
        if self.exponent >= 0 {
            (&self.mantissa * &Integer::pow10(self.exponent as usize)).shl(bits)
        } else {
            &self.mantissa.shl(bits) / &Integer::pow10(self.exponent.unsigned_abs() as usize)
        }
    }

    /// Returns `(m, e)` with `m × 2^e` approximating the value to at least
    /// `bits` significant bits.
    #[must_use]
    pub fn to_binary(&self, bits: usize) -> (Integer, i64) {
        if self.exponent >= 0 {
            return (&self.mantissa * &Integer::pow10(self.exponent as usize), 0);
        }
        let den = Integer::pow10(self.exponent.unsigned_abs() as usize);
        let shift = (bits + den.bit_len()).saturating_sub(self.mantissa.bit_len());
        (&self.mantissa.shl(shift) / &den, -(shift as i64))
    }

    /// Renders the value in `radix`.
    ///
    /// Non-decimal radixes use positional notation with as many fractional
    /// digits as the mantissa carries information for.
    #[must_use]
    pub fn to_string_radix(&self, radix: u32) -> String {
        if radix == 10 {
            return self.to_string();
        }
        let sign = if self.is_negative() { "-" } else { "" };
        if self.exponent >= 0 {
            return format!("{sign}{}.0", self.floor().abs().to_string_radix(radix));
        }

        let magnitude = self.mantissa.abs();
        let scale = Integer::pow10(self.exponent.unsigned_abs() as usize);
        let mut whole = &magnitude / &scale;
        let rest = &magnitude % &scale;

        let per_digit = std::f64::consts::LN_10 / f64::from(radix).ln();
        let width = (magnitude.decimal_digits() as f64 * per_digit).ceil() as usize + 1;
        let unit = Integer::power_of(radix, width);
        let mut fraction = (&rest * &unit).div_round(&scale);
        if fraction == unit {
            whole = whole + Integer::one();
            fraction = Integer::zero();
        }

        let digits = fraction.to_string_radix(radix);
        let mut frac = "0".repeat(width - digits.len());
        frac.push_str(&digits);
        let frac = frac.trim_end_matches('0');
        let frac = if frac.is_empty() { "0" } else { frac };
        format!("{sign}{}.{frac}", whole.to_string_radix(radix))
    }
}

impl Zero for Decimal {
    fn zero() -> Self {
        Self {
            mantissa: Integer::zero(),
            exponent: 0,
        }
    }

    fn is_zero(&self) -> bool {
        self.mantissa.is_zero()
    }
}

impl One for Decimal {
    fn one() -> Self {
        Self {
            mantissa: Integer::one(),
            exponent: 0,
        }
    }
}

impl Ord for Decimal {
    fn cmp(&self, other: &Self) -> Ordering {
        let sign = self.sign_ordering();
        if sign != other.sign_ordering() {
            return sign.cmp(&other.sign_ordering());
        }
        if sign == Ordering::Equal {
            return Ordering::Equal;
        }
        // Same non-zero sign: order of magnitude decides unless it ties.
        let by_magnitude = self.magnitude().cmp(&other.magnitude());
        if by_magnitude != Ordering::Equal {
            return if sign == Ordering::Greater {
                by_magnitude
            } else {
                by_magnitude.reverse()
            };
        }
        let (a, b, _) = self.align(other);
        a.cmp(&b)
    }
}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Decimal({}e{})", self.mantissa, self.exponent)
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.mantissa.abs().to_string();
        let sci_exponent = digits.len() as i64 + self.exponent - 1;
        f.write_str(&layout_decimal(self.is_negative(), &digits, sci_exponent))
    }
}

impl Add for &Decimal {
    type Output = Decimal;

    fn add(self, rhs: Self) -> Decimal {
        let (a, b, exponent) = self.align(rhs);
        Decimal::new(a + b, exponent)
    }
}

impl Add for Decimal {
    type Output = Decimal;

    fn add(self, rhs: Self) -> Decimal {
        &self + &rhs
    }
}

impl Sub for &Decimal {
    type Output = Decimal;

    fn sub(self, rhs: Self) -> Decimal {
        let (a, b, exponent) = self.align(rhs);
        Decimal::new(a - b, exponent)
    }
}

impl Mul for &Decimal {
    type Output = Decimal;

    fn mul(self, rhs: Self) -> Decimal {
        Decimal::new(&self.mantissa * &rhs.mantissa, self.exponent + rhs.exponent)
    }
}

impl Mul for Decimal {
    type Output = Decimal;

    fn mul(self, rhs: Self) -> Decimal {
        &self * &rhs
    }
}

impl Neg for &Decimal {
    type Output = Decimal;

    fn neg(self) -> Decimal {
        Decimal {
            mantissa: -&self.mantissa,
            exponent: self.exponent,
        }
    }
}

impl Neg for Decimal {
    type Output = Decimal;

    fn neg(self) -> Decimal {
        -&self
    }
}

impl From<Integer> for Decimal {
    fn from(n: Integer) -> Self {
        Self::from_integer(n)
    }
}

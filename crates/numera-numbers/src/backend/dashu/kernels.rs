//! Transcendental kernels.
//!
//! All series run on binary fixed-point integers: an [`Integer`] `n` at `bits`
//! fractional bits stands for `n / 2^bits`. Each public function converts its
//! [`Decimal`] argument to fixed point with enough guard bits, runs the kernel,
//! and rounds the result back to the requested decimal precision.
//!
//! Working precision is the requested precision in bits plus [`GUARD_BITS`],
//! plus the bits lost to argument magnitude (range reduction of large
//! arguments) and to cancellation near zero.

use num_traits::{One, Zero};

use super::decimal::Decimal;
use super::integer::Integer;
use crate::error::{NumeralError, NumeralResult};
use crate::precision::Precision;

use super::NAME;

/// Extra bits carried through every kernel.
const GUARD_BITS: usize = 40;

/// Number of argument halvings before the exp and arctan series.
const HALVINGS: usize = 8;

/// exp rejects arguments of 10^(MAX_EXP_MAGNITUDE + 1) and beyond; the
/// result alone would need tens of millions of bits.
const MAX_EXP_MAGNITUDE: i64 = 6;

/// sin, cos and tan reject arguments of 10^(MAX_TRIG_MAGNITUDE + 1) and
/// beyond; reducing them needs π to as many bits as the argument has.
const MAX_TRIG_MAGNITUDE: i64 = 1000;

/// Upper bound on the widening rounds of the quarter-turn reduction.
const MAX_REDUCTION_ROUNDS: usize = 8;

fn working_bits(precision: Precision, extra: usize) -> usize {
    precision.bits() + GUARD_BITS + extra
}

/// Bits needed for the integer part of `x`.
fn integer_bits(x: &Decimal) -> usize {
    let magnitude = x.magnitude();
    if x.is_zero() || magnitude < 0 {
        0
    } else {
        ((magnitude + 1) as f64 * std::f64::consts::LOG2_10).ceil() as usize + 1
    }
}

/// Bits lost to cancellation when the result scales like `x` near zero.
fn small_bits(x: &Decimal) -> usize {
    let magnitude = x.magnitude();
    if x.is_zero() || magnitude >= 0 {
        0
    } else {
        (magnitude.unsigned_abs() as f64 * std::f64::consts::LOG2_10).ceil() as usize + 4
    }
}

fn to_decimal(n: &Integer, bits: usize, precision: Precision) -> Decimal {
    Decimal::from_binary(n, -(bits as i64), precision)
}

// === Fixed-point primitives ===

fn one(bits: usize) -> Integer {
    Integer::one().shl(bits)
}

fn mul(a: &Integer, b: &Integer, bits: usize) -> Integer {
    (a * b).shr_floor(bits)
}

fn div(a: &Integer, b: &Integer, bits: usize) -> Integer {
    &a.shl(bits) / b
}

fn sqrt(a: &Integer, bits: usize) -> Integer {
    a.shl(bits).isqrt()
}

/// Sums `±x^(2k+1) / (2k+1)` until the terms vanish.
///
/// With `alternate` this is the arctan series, otherwise artanh.
fn odd_power_series(x: &Integer, bits: usize, alternate: bool) -> Integer {
    let x2 = mul(x, x, bits);
    let mut power = x.clone();
    let mut sum = Integer::zero();
    let mut k = 0i64;
    loop {
        let term = &power / &Integer::new(2 * k + 1);
        if term.is_zero() {
            return sum;
        }
        sum = if alternate && k % 2 == 1 {
            sum - term
        } else {
            sum + term
        };
        power = mul(&power, &x2, bits);
        k += 1;
    }
}

/// `arctan(1/n)` or `artanh(1/n)` for a small integer `n`.
fn inverse_series(n: u32, bits: usize, alternate: bool) -> Integer {
    let x = &one(bits) / &Integer::from(u64::from(n));
    odd_power_series(&x, bits, alternate)
}

/// π by Machin's formula: 16·arctan(1/5) − 4·arctan(1/239).
fn pi_fixed(bits: usize) -> Integer {
    let wide = bits + 8;
    let a = inverse_series(5, wide, true) * Integer::new(16);
    let b = inverse_series(239, wide, true) * Integer::new(4);
    (a - b).shr_floor(8)
}

/// ln 2 = 2·artanh(1/3).
fn ln2_fixed(bits: usize) -> Integer {
    let wide = bits + 8;
    (inverse_series(3, wide, false) * Integer::new(2)).shr_floor(8)
}

/// e^r for |r| below one, by halving, Taylor series and repeated squaring.
fn exp_fixed(r: &Integer, bits: usize) -> Integer {
    // Read at `wide` bits, r stands for r / 2^HALVINGS.
    let wide = bits + HALVINGS;
    let mut sum = one(wide);
    let mut term = one(wide);
    let mut k = 1i64;
    loop {
        term = &mul(&term, r, wide) / &Integer::new(k);
        if term.is_zero() {
            break;
        }
        sum = sum + &term;
        k += 1;
    }
    for _ in 0..HALVINGS {
        sum = mul(&sum, &sum, wide);
    }
    sum.shr_floor(HALVINGS)
}

/// ln f for f in [1, 2), as 2·artanh((f − 1)/(f + 1)).
fn ln_unit(f: &Integer, bits: usize) -> Integer {
    let unit = one(bits);
    let z = div(&(f - &unit), &(f + &unit), bits);
    odd_power_series(&z, bits, false) * Integer::new(2)
}

/// sin r and cos r by Taylor series, for |r| at most about π/4.
fn sin_cos_series(r: &Integer, bits: usize) -> (Integer, Integer) {
    let r2 = mul(r, r, bits);
    let series = |first: Integer, mut n: i64| {
        let mut sum = Integer::zero();
        let mut term = first;
        while !term.is_zero() {
            sum = sum + &term;
            term = -(&mul(&term, &r2, bits) / &Integer::new((n + 1) * (n + 2)));
            n += 2;
        }
        sum
    };
    (series(r.clone(), 1), series(one(bits), 0))
}

/// arctan x for any fixed-point x.
fn atan_fixed(x: &Integer, bits: usize) -> Integer {
    let unit = one(bits);
    let negative = x.is_negative();
    let mut x = x.abs();
    let invert = x > unit;
    if invert {
        x = div(&unit, &x, bits);
    }
    // arctan x = 2·arctan(x / (1 + sqrt(1 + x²)))
    for _ in 0..HALVINGS {
        let root = sqrt(&(&unit + &mul(&x, &x, bits)), bits);
        x = div(&x, &(&unit + &root), bits);
    }
    let mut result = odd_power_series(&x, bits, true).shl(HALVINGS);
    if invert {
        result = pi_fixed(bits).shr_floor(1) - result;
    }
    if negative {
        -result
    } else {
        result
    }
}

/// arcsin x for |x| <= 1.
fn asin_fixed(x: &Integer, bits: usize) -> Integer {
    let unit = one(bits);
    let root = sqrt(&(&unit - &mul(x, x, bits)), bits);
    if root.is_zero() {
        let half_pi = pi_fixed(bits).shr_floor(1);
        return if x.is_negative() { -half_pi } else { half_pi };
    }
    atan_fixed(&div(x, &root, bits), bits)
}

/// Reduces `x` modulo π/2. Returns the remainder, the fractional bits it is
/// held at, and the quadrant.
///
/// Near a multiple of π/2 the subtraction cancels the leading bits of the
/// remainder, so the reduction is repeated with that many more bits until at
/// least `bits` significant bits survive, give or take the guard.
fn reduce_quarter_turns(x: &Decimal, bits: usize) -> (Integer, usize, i64) {
    let extra = integer_bits(x);
    let mut lost = 0;
    let mut round = 0;
    loop {
        let wide = bits + lost + extra;
        let fixed = x.to_fixed(wide);
        let half_pi = pi_fixed(wide).shr_floor(1);
        let q = fixed.div_round(&half_pi);
        let r = (fixed - &q * &half_pi).shr_floor(extra);
        let quadrant = q.floor_mod(&Integer::new(4)).to_i64().unwrap_or(0);

        round += 1;
        let significant = r.bit_len();
        if q.is_zero() || significant + GUARD_BITS / 2 >= bits || round == MAX_REDUCTION_ROUNDS {
            return (r, bits + lost, quadrant);
        }
        lost = bits + lost - significant;
    }
}

/// sin and cos of `x`, held at the returned number of fractional bits.
fn sin_cos_fixed(x: &Decimal, bits: usize) -> (Integer, Integer, usize) {
    let (r, bits, quadrant) = reduce_quarter_turns(x, bits);
    let (s, c) = sin_cos_series(&r, bits);
    let (s, c) = match quadrant {
        0 => (s, c),
        1 => (c, -s),
        2 => (-s, -c),
        _ => (-c, s),
    };
    (s, c, bits)
}

fn check_trig_argument(x: &Decimal) -> NumeralResult<()> {
    if x.magnitude() > MAX_TRIG_MAGNITUDE {
        return Err(NumeralError::unsupported(NAME, "a trigonometric argument this large"));
    }
    Ok(())
}

// === Decimal entry points ===

/// π to `precision` digits.
pub(crate) fn pi(precision: Precision) -> Decimal {
    let bits = working_bits(precision, 0);
    to_decimal(&pi_fixed(bits), bits, precision)
}

/// e^x.
pub(crate) fn exp(x: &Decimal, precision: Precision) -> NumeralResult<Decimal> {
    if x.magnitude() > MAX_EXP_MAGNITUDE {
        return Err(NumeralError::unsupported(NAME, "an exponential this large"));
    }
    let bits = working_bits(precision, integer_bits(x));
    let x = x.to_fixed(bits);
    let ln2 = ln2_fixed(bits);
    let k = x.div_round(&ln2);
    let r = x - &k * &ln2;
    let e = exp_fixed(&r, bits);
    let k = k
        .to_i64()
        .ok_or_else(|| NumeralError::unsupported(NAME, "an exponential this large"))?;
    Ok(Decimal::from_binary(&e, k - bits as i64, precision))
}

/// ln x for x > 0.
pub(crate) fn ln(x: &Decimal, precision: Precision) -> Decimal {
    let near_one = x - &Decimal::one();
    let bits = working_bits(precision, small_bits(&near_one));

    let (man, exp2) = x.to_binary(bits + 8);
    let top = man.bit_len() as i64 - 1;
    let k = top + exp2;
    let f = if top <= bits as i64 {
        man.shl(bits - top as usize)
    } else {
        man.shr_floor(top as usize - bits)
    };
    let ln_f = ln_unit(&f, bits);

    if k == 0 {
        return to_decimal(&ln_f, bits, precision);
    }
    let k_bits = 64 - k.unsigned_abs().leading_zeros() as usize;
    let wide = bits + k_bits;
    let total = ln_f.shl(k_bits) + Integer::new(k) * ln2_fixed(wide);
    to_decimal(&total, wide, precision)
}

/// sin x.
pub(crate) fn sin(x: &Decimal, precision: Precision) -> NumeralResult<Decimal> {
    check_trig_argument(x)?;
    let (s, _, bits) = sin_cos_fixed(x, working_bits(precision, small_bits(x)));
    Ok(to_decimal(&s, bits, precision))
}

/// cos x.
pub(crate) fn cos(x: &Decimal, precision: Precision) -> NumeralResult<Decimal> {
    check_trig_argument(x)?;
    let (_, c, bits) = sin_cos_fixed(x, working_bits(precision, 0));
    Ok(to_decimal(&c, bits, precision))
}

/// tan x.
pub(crate) fn tan(x: &Decimal, precision: Precision) -> NumeralResult<Decimal> {
    check_trig_argument(x)?;
    let (s, c, bits) = sin_cos_fixed(x, working_bits(precision, small_bits(x)));
    if c.is_zero() {
        return Err(NumeralError::DivisionByZero);
    }
    Ok(to_decimal(&div(&s, &c, bits), bits, precision))
}

/// arcsin x for |x| <= 1.
pub(crate) fn arc_sin(x: &Decimal, precision: Precision) -> Decimal {
    let edge = &Decimal::one() - &x.abs();
    let bits = working_bits(precision, small_bits(x) + small_bits(&edge));
    to_decimal(&asin_fixed(&x.to_fixed(bits), bits), bits, precision)
}

/// arccos x for |x| <= 1.
pub(crate) fn arc_cos(x: &Decimal, precision: Precision) -> Decimal {
    let edge = &Decimal::one() - x;
    let bits = working_bits(precision, small_bits(&edge) * 2);
    let half_pi = pi_fixed(bits).shr_floor(1);
    let result = half_pi - asin_fixed(&x.to_fixed(bits), bits);
    to_decimal(&result, bits, precision)
}

/// arctan x.
pub(crate) fn arc_tan(x: &Decimal, precision: Precision) -> Decimal {
    let bits = working_bits(precision, small_bits(x));
    to_decimal(&atan_fixed(&x.to_fixed(bits), bits), bits, precision)
}

/// a^b for a > 0, as e^(b·ln a).
pub(crate) fn pow_positive(a: &Decimal, b: &Decimal, precision: Precision) -> NumeralResult<Decimal> {
    // The absolute error of b·ln a becomes the relative error of the result.
    let scale = b.magnitude().max(0) + decimal_width(a.magnitude());
    let inner = precision.widen(10 + scale as u32);
    let t = (&ln(a, inner) * b).round(inner);
    exp(&t, precision)
}

/// sqrt x for x >= 0, from the integer square root of the scaled mantissa.
pub(crate) fn square_root(x: &Decimal, precision: Precision) -> Decimal {
    if x.is_zero() {
        return Decimal::zero();
    }
    let digits = x.mantissa().decimal_digits() as i64;
    let mut k = (2 * (i64::from(precision.digits()) + 3) - digits).max(0);
    if (x.exponent() - k) % 2 != 0 {
        k += 1;
    }
    let n = x.mantissa() * &Integer::pow10(k as usize);
    let mut root = n.isqrt();
    let mut exponent = (x.exponent() - k) / 2;
    if &root * &root != n {
        root = root * Integer::new(10) + Integer::one();
        exponent -= 1;
    }
    Decimal::new(root, exponent).round(precision)
}

/// base^exponent by repeated squaring, carrying extra digits through the
/// intermediate products.
pub(crate) fn pow_integer(base: &Decimal, exponent: u64, precision: Precision) -> Decimal {
    let inner = precision.widen(10 + exponent.checked_ilog10().unwrap_or(0));
    let mut result = Decimal::one();
    let mut square = base.clone();
    let mut rest = exponent;
    while rest > 0 {
        if rest & 1 == 1 {
            result = (&result * &square).round(inner);
        }
        rest >>= 1;
        if rest > 0 {
            square = (&square * &square).round(inner);
        }
    }
    result.round(precision)
}

/// Number of decimal digits in |n|, plus one.
fn decimal_width(n: i64) -> i64 {
    n.unsigned_abs().checked_ilog10().map_or(1, |d| i64::from(d) + 2)
}

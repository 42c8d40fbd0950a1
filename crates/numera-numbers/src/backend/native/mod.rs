//! Hardware backend: `i128` integers and `f64` floats.
//!
//! Exact integer arithmetic is checked; results outside `i128` fail with
//! [`NumeralError::PrecisionUnsupported`] rather than wrapping. Float results
//! are rounded to the requested precision, which may not exceed
//! [`MAX_FLOAT_DIGITS`].

use std::cmp::Ordering;

use super::Backend;
use crate::error::{NumeralError, NumeralResult};
use crate::precision::{Precision, Radix};
use crate::text::{layout_decimal, NumeralText};

const NAME: &str = "native";

/// Most significant digits an `f64` result can honor.
pub const MAX_FLOAT_DIGITS: u32 = 15;

/// A numeral value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NativeValue {
    /// An exact integer.
    Integer(i128),
    /// A hardware float.
    Float(f64),
}

impl NativeValue {
    #[allow(clippy::cast_precision_loss)]
    fn to_f64(self) -> f64 {
        match self {
            Self::Integer(n) => n as f64,
            Self::Float(x) => x,
        }
    }

    fn integer(self, operation: &'static str) -> NumeralResult<i128> {
        match self {
            Self::Integer(n) => Ok(n),
            Self::Float(_) => Err(NumeralError::not_integer(operation)),
        }
    }
}

/// The hardware backend.
#[derive(Clone, Copy, Debug, Default)]
pub struct NativeBackend;

fn overflow() -> NumeralError {
    NumeralError::unsupported(NAME, "an integer outside i128")
}

fn check_precision(precision: Precision) -> NumeralResult<()> {
    if precision.digits() > MAX_FLOAT_DIGITS {
        return Err(NumeralError::unsupported(
            NAME,
            format!("{precision} significant digits"),
        ));
    }
    Ok(())
}

/// Rounds `x` to `precision` significant digits.
fn float(x: f64, precision: Precision) -> NumeralResult<NativeValue> {
    check_precision(precision)?;
    if !x.is_finite() {
        return Err(NumeralError::unsupported(NAME, "a float outside f64 range"));
    }
    let digits = precision.digits() as usize - 1;
    let rounded = format!("{x:.digits$e}").parse().unwrap_or(x);
    Ok(NativeValue::Float(rounded))
}

/// Applies `exact` to integer pairs and `rounded` to anything else.
fn combine(
    a: NativeValue,
    b: NativeValue,
    precision: Precision,
    exact: impl FnOnce(i128, i128) -> Option<i128>,
    rounded: impl FnOnce(f64, f64) -> f64,
) -> NumeralResult<NativeValue> {
    match (a, b) {
        (NativeValue::Integer(x), NativeValue::Integer(y)) => {
            exact(x, y).map(NativeValue::Integer).ok_or_else(overflow)
        }
        _ => float(rounded(a.to_f64(), b.to_f64()), precision),
    }
}

fn to_integer(x: f64) -> NumeralResult<NativeValue> {
    #[allow(clippy::cast_precision_loss)]
    let limit = i128::MAX as f64;
    if !x.is_finite() || x.abs() >= limit {
        return Err(overflow());
    }
    #[allow(clippy::cast_possible_truncation)]
    let n = x as i128;
    Ok(NativeValue::Integer(n))
}

/// `a - b * floor(a / b)`, with the sign of `b`.
fn floor_mod(a: i128, b: i128) -> Option<i128> {
    if b == -1 {
        return Some(0);
    }
    let r = a.checked_rem(b)?;
    if r != 0 && (r < 0) != (b < 0) {
        r.checked_add(b)
    } else {
        Some(r)
    }
}

fn floor_div(a: i128, b: i128) -> Option<i128> {
    let q = a.checked_div(b)?;
    if a % b != 0 && (a < 0) != (b < 0) {
        Some(q - 1)
    } else {
        Some(q)
    }
}

fn integer_sqrt(n: i128) -> Option<i128> {
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    let mut root = (n as f64).sqrt() as i128;
    while root.checked_mul(root).map_or(true, |sq| sq > n) {
        root -= 1;
    }
    while (root + 1).checked_mul(root + 1).is_some_and(|sq| sq <= n) {
        root += 1;
    }
    (root * root == n).then_some(root)
}

fn render_integer(n: i128, radix: u32) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    let mut rest = n.unsigned_abs();
    while rest > 0 {
        let d = (rest % u128::from(radix)) as u32;
        digits.push(char::from_digit(d, radix).unwrap_or('?'));
        rest /= u128::from(radix);
    }
    if n < 0 {
        digits.push('-');
    }
    digits.iter().rev().collect()
}

fn render_float(x: f64, radix: u32) -> String {
    if x == 0.0 {
        return "0.0".to_string();
    }
    if radix == 10 {
        let sci = format!("{x:e}");
        let (mantissa, exponent) = sci.split_once('e').unwrap_or((&sci, "0"));
        let negative = mantissa.starts_with('-');
        let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
        let digits = digits.trim_end_matches('0');
        let digits = if digits.is_empty() { "0" } else { digits };
        return layout_decimal(negative, digits, exponent.parse().unwrap_or(0));
    }

    let base = f64::from(radix);
    let mut whole = x.abs().trunc();
    let mut fraction = x.abs() - whole;

    let mut int_digits = Vec::new();
    while whole >= 1.0 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let d = whole.rem_euclid(base) as u32;
        int_digits.push(char::from_digit(d, radix).unwrap_or('?'));
        whole = (whole / base).floor();
    }
    if int_digits.is_empty() {
        int_digits.push('0');
    }

    // Enough digits to carry every mantissa bit.
    let width = (f64::from(f64::MANTISSA_DIGITS) / base.log2()).ceil() as usize;
    let mut frac_digits = String::new();
    for _ in 0..width {
        if fraction == 0.0 {
            break;
        }
        fraction *= base;
        let d = fraction.trunc();
        fraction -= d;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        frac_digits.push(char::from_digit(d as u32, radix).unwrap_or('?'));
    }
    let frac = frac_digits.trim_end_matches('0');
    let frac = if frac.is_empty() { "0" } else { frac };

    let sign = if x < 0.0 { "-" } else { "" };
    let int: String = int_digits.iter().rev().collect();
    format!("{sign}{int}.{frac}")
}

impl Backend for NativeBackend {
    type Value = NativeValue;

    const NAME: &'static str = NAME;
    const SUPPORTS_MANTISSA: bool = true;

    fn from_text(text: &NumeralText<'_>, _precision: Precision) -> NumeralResult<NativeValue> {
        let radix = text.radix.get();
        if !text.is_float() {
            let magnitude = i128::from_str_radix(text.integer_digits, radix).map_err(|_| overflow())?;
            return Ok(NativeValue::Integer(if text.negative { -magnitude } else { magnitude }));
        }

        let value = if radix == 10 {
            let int = if text.integer_digits.is_empty() { "0" } else { text.integer_digits };
            let frac = if text.fraction_digits.is_empty() { "0" } else { text.fraction_digits };
            let exponent = text.exponent.unwrap_or(0);
            format!("{int}.{frac}e{exponent}")
                .parse::<f64>()
                .map_err(|_| NumeralError::parse(text.integer_digits, "not a float"))?
        } else {
            let base = f64::from(radix);
            let mantissa = text
                .all_digits()
                .chars()
                .filter_map(|c| c.to_digit(radix))
                .fold(0.0, |acc, d| acc * base + f64::from(d));
            let scale = i32::try_from(text.scale())
                .map_err(|_| NumeralError::unsupported(NAME, "an exponent this large"))?;
            mantissa * base.powi(scale)
        };
        if !value.is_finite() {
            return Err(NumeralError::unsupported(NAME, "a float outside f64 range"));
        }
        Ok(NativeValue::Float(if text.negative { -value } else { value }))
    }

    fn from_i64(value: i64) -> NativeValue {
        NativeValue::Integer(i128::from(value))
    }

    fn render(value: &NativeValue, radix: Radix) -> String {
        match *value {
            NativeValue::Integer(n) => render_integer(n, radix.get()),
            NativeValue::Float(x) => render_float(x, radix.get()),
        }
    }

    fn to_i64(value: &NativeValue) -> Option<i64> {
        match *value {
            NativeValue::Integer(n) => i64::try_from(n).ok(),
            NativeValue::Float(_) => None,
        }
    }

    fn is_integer(value: &NativeValue) -> bool {
        matches!(value, NativeValue::Integer(_))
    }

    fn signum(value: &NativeValue) -> Ordering {
        match *value {
            NativeValue::Integer(n) => n.cmp(&0),
            NativeValue::Float(x) => x.partial_cmp(&0.0).unwrap_or(Ordering::Equal),
        }
    }

    fn compare(a: &NativeValue, b: &NativeValue) -> Ordering {
        match (*a, *b) {
            (NativeValue::Integer(x), NativeValue::Integer(y)) => x.cmp(&y),
            (x, y) => x.to_f64().partial_cmp(&y.to_f64()).unwrap_or(Ordering::Equal),
        }
    }

    fn add(a: &NativeValue, b: &NativeValue, precision: Precision) -> NumeralResult<NativeValue> {
        combine(*a, *b, precision, i128::checked_add, |x, y| x + y)
    }

    fn multiply(a: &NativeValue, b: &NativeValue, precision: Precision) -> NumeralResult<NativeValue> {
        combine(*a, *b, precision, i128::checked_mul, |x, y| x * y)
    }

    fn negate(a: &NativeValue) -> NumeralResult<NativeValue> {
        match *a {
            NativeValue::Integer(n) => n.checked_neg().map(NativeValue::Integer).ok_or_else(overflow),
            NativeValue::Float(x) => Ok(NativeValue::Float(-x)),
        }
    }

    fn abs(a: &NativeValue) -> NumeralResult<NativeValue> {
        match *a {
            NativeValue::Integer(n) => n.checked_abs().map(NativeValue::Integer).ok_or_else(overflow),
            NativeValue::Float(x) => Ok(NativeValue::Float(x.abs())),
        }
    }

    fn divide(a: &NativeValue, b: &NativeValue, precision: Precision) -> NumeralResult<NativeValue> {
        if let (NativeValue::Integer(x), NativeValue::Integer(y)) = (*a, *b) {
            if x.checked_rem(y) == Some(0) {
                return x.checked_div(y).map(NativeValue::Integer).ok_or_else(overflow);
            }
        }
        float(a.to_f64() / b.to_f64(), precision)
    }

    fn power(a: &NativeValue, b: &NativeValue, precision: Precision) -> NumeralResult<NativeValue> {
        match (*a, *b) {
            (NativeValue::Integer(x), NativeValue::Integer(y)) if y >= 0 => {
                let exponent = u32::try_from(y).map_err(|_| overflow())?;
                x.checked_pow(exponent).map(NativeValue::Integer).ok_or_else(overflow)
            }
            (base, NativeValue::Integer(y)) => {
                let exponent = i32::try_from(y)
                    .map_err(|_| NumeralError::unsupported(NAME, "an exponent this large"))?;
                float(base.to_f64().powi(exponent), precision)
            }
            (base, exponent) => float(base.to_f64().powf(exponent.to_f64()), precision),
        }
    }

    fn floor(a: &NativeValue) -> NumeralResult<NativeValue> {
        match *a {
            NativeValue::Integer(_) => Ok(*a),
            NativeValue::Float(x) => to_integer(x.floor()),
        }
    }

    fn ceil(a: &NativeValue) -> NumeralResult<NativeValue> {
        match *a {
            NativeValue::Integer(_) => Ok(*a),
            NativeValue::Float(x) => to_integer(x.ceil()),
        }
    }

    fn quotient(a: &NativeValue, b: &NativeValue) -> NumeralResult<NativeValue> {
        match (*a, *b) {
            (NativeValue::Integer(x), NativeValue::Integer(y)) => {
                floor_div(x, y).map(NativeValue::Integer).ok_or_else(overflow)
            }
            (x, y) => to_integer((x.to_f64() / y.to_f64()).floor()),
        }
    }

    fn modulo(a: &NativeValue, b: &NativeValue) -> NumeralResult<NativeValue> {
        match (*a, *b) {
            (NativeValue::Integer(x), NativeValue::Integer(y)) => {
                floor_mod(x, y).map(NativeValue::Integer).ok_or_else(overflow)
            }
            (x, y) => {
                let (x, y) = (x.to_f64(), y.to_f64());
                float(x - y * (x / y).floor(), Precision::new(MAX_FLOAT_DIGITS))
            }
        }
    }

    fn gcd(a: &NativeValue, b: &NativeValue) -> NumeralResult<NativeValue> {
        let (mut x, mut y) = (a.integer("gcd")?.unsigned_abs(), b.integer("gcd")?.unsigned_abs());
        while y != 0 {
            (x, y) = (y, x % y);
        }
        i128::try_from(x).map(NativeValue::Integer).map_err(|_| overflow())
    }

    fn sqrt(a: &NativeValue, precision: Precision) -> NumeralResult<NativeValue> {
        if let NativeValue::Integer(n) = *a {
            if let Some(root) = integer_sqrt(n) {
                return Ok(NativeValue::Integer(root));
            }
        }
        float(a.to_f64().sqrt(), precision)
    }

    fn factorial(n: &NativeValue, _precision: Precision) -> NumeralResult<NativeValue> {
        let n = n.integer("factorial")?;
        (2..=n)
            .try_fold(1i128, i128::checked_mul)
            .map(NativeValue::Integer)
            .ok_or_else(overflow)
    }

    fn sin(a: &NativeValue, precision: Precision) -> NumeralResult<NativeValue> {
        float(a.to_f64().sin(), precision)
    }

    fn cos(a: &NativeValue, precision: Precision) -> NumeralResult<NativeValue> {
        float(a.to_f64().cos(), precision)
    }

    fn tan(a: &NativeValue, precision: Precision) -> NumeralResult<NativeValue> {
        float(a.to_f64().tan(), precision)
    }

    fn arc_sin(a: &NativeValue, precision: Precision) -> NumeralResult<NativeValue> {
        float(a.to_f64().asin(), precision)
    }

    fn arc_cos(a: &NativeValue, precision: Precision) -> NumeralResult<NativeValue> {
        float(a.to_f64().acos(), precision)
    }

    fn arc_tan(a: &NativeValue, precision: Precision) -> NumeralResult<NativeValue> {
        float(a.to_f64().atan(), precision)
    }

    fn exp(a: &NativeValue, precision: Precision) -> NumeralResult<NativeValue> {
        float(a.to_f64().exp(), precision)
    }

    fn ln(a: &NativeValue, precision: Precision) -> NumeralResult<NativeValue> {
        float(a.to_f64().ln(), precision)
    }

    fn pi(precision: Precision) -> NumeralResult<NativeValue> {
        float(std::f64::consts::PI, precision)
    }

    fn shift(a: &NativeValue, by: i64) -> NumeralResult<NativeValue> {
        let n = a.integer("shift")?;
        if by < 0 {
            let by = u32::try_from(by.unsigned_abs().min(127)).unwrap_or(127);
            return Ok(NativeValue::Integer(n >> by));
        }
        if n == 0 {
            return Ok(*a);
        }
        // One bit is reserved for the sign.
        let room = if n < 0 { (!n).leading_zeros() } else { n.leading_zeros() } - 1;
        match u32::try_from(by) {
            Ok(by) if by <= room => Ok(NativeValue::Integer(n << by)),
            _ => Err(overflow()),
        }
    }

    fn bit_and(a: &NativeValue, b: &NativeValue) -> NumeralResult<NativeValue> {
        Ok(NativeValue::Integer(a.integer("bitand")? & b.integer("bitand")?))
    }

    fn bit_or(a: &NativeValue, b: &NativeValue) -> NumeralResult<NativeValue> {
        Ok(NativeValue::Integer(a.integer("bitor")? | b.integer("bitor")?))
    }

    fn bit_xor(a: &NativeValue, b: &NativeValue) -> NumeralResult<NativeValue> {
        Ok(NativeValue::Integer(a.integer("bitxor")? ^ b.integer("bitxor")?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> NativeValue {
        let lexed = NumeralText::parse(text, Radix::DECIMAL).unwrap();
        NativeBackend::from_text(&lexed, Precision::DEFAULT).unwrap()
    }

    fn show(value: &NativeValue) -> String {
        NativeBackend::render(value, Radix::DECIMAL)
    }

    #[test]
    fn test_text() {
        assert_eq!(parse("-42"), NativeValue::Integer(-42));
        assert_eq!(show(&parse("1.50")), "1.5");
        assert_eq!(show(&parse("15e24")), "1.5e25");
        assert_eq!(show(&parse("2.0")), "2.0");
        assert_eq!(NativeBackend::render(&parse("255"), Radix::HEX), "ff");
        assert_eq!(NativeBackend::render(&parse("-1.5"), Radix::BINARY), "-1.1");
    }

    #[test]
    fn test_precision_ceiling() {
        let p = Precision::new(10);
        let sum = NativeBackend::add(&parse("123"), &parse("0.5"), p).unwrap();
        assert_eq!(show(&sum), "123.5");
        assert!(matches!(
            NativeBackend::add(&parse("1.0"), &parse("1"), Precision::new(30)),
            Err(NumeralError::PrecisionUnsupported { .. })
        ));
        // Exact integer results ignore precision.
        assert!(NativeBackend::add(&parse("1"), &parse("1"), Precision::new(30)).is_ok());
    }

    #[test]
    fn test_integer_overflow() {
        let big = NativeValue::Integer(i128::MAX);
        assert!(NativeBackend::add(&big, &parse("1"), Precision::DEFAULT).is_err());
        assert!(NativeBackend::factorial(&parse("34"), Precision::DEFAULT).is_err());
        assert!(NativeBackend::factorial(&parse("33"), Precision::DEFAULT).is_ok());
        assert!(NativeBackend::shift(&parse("1"), 127).is_err());
        assert_eq!(NativeBackend::shift(&parse("1"), 126).unwrap(), NativeValue::Integer(1 << 126));
    }

    #[test]
    fn test_floored_division() {
        assert_eq!(NativeBackend::quotient(&parse("-7"), &parse("2")).unwrap(), NativeValue::Integer(-4));
        assert_eq!(NativeBackend::modulo(&parse("-7"), &parse("2")).unwrap(), NativeValue::Integer(1));
        assert_eq!(NativeBackend::modulo(&parse("7"), &parse("-2")).unwrap(), NativeValue::Integer(-1));
    }

    #[test]
    fn test_modulo_at_the_edges() {
        let min = NativeValue::Integer(i128::MIN);
        let max = NativeValue::Integer(i128::MAX);
        assert_eq!(NativeBackend::modulo(&min, &parse("3")).unwrap(), NativeValue::Integer(1));
        assert_eq!(NativeBackend::modulo(&min, &parse("-7")).unwrap(), NativeValue::Integer(-2));
        assert_eq!(NativeBackend::modulo(&min, &parse("-1")).unwrap(), NativeValue::Integer(0));
        assert_eq!(NativeBackend::modulo(&max, &parse("-5")).unwrap(), NativeValue::Integer(-3));
        assert_eq!(NativeBackend::modulo(&max, &min).unwrap(), NativeValue::Integer(-1));

        // The float remainder is rounded like every other float result.
        assert_eq!(show(&NativeBackend::modulo(&parse("0.3"), &parse("0.1")).unwrap()), "0.1");
        assert_eq!(show(&NativeBackend::modulo(&parse("-5.5"), &parse("2")).unwrap()), "0.5");
    }

    #[test]
    fn test_rounding() {
        let p = Precision::new(5);
        let third = NativeBackend::divide(&parse("1"), &parse("3"), p).unwrap();
        assert_eq!(show(&third), "0.33333");
        let root = NativeBackend::sqrt(&parse("2"), p).unwrap();
        assert_eq!(show(&root), "1.4142");
        assert_eq!(NativeBackend::sqrt(&parse("49"), p).unwrap(), NativeValue::Integer(7));
    }

    #[test]
    fn test_bits() {
        assert_eq!(NativeBackend::bit_and(&parse("-4"), &parse("7")).unwrap(), NativeValue::Integer(4));
        assert_eq!(NativeBackend::shift(&parse("-5"), -1).unwrap(), NativeValue::Integer(-3));
        assert!(NativeBackend::gcd(&parse("1.5"), &parse("3")).is_err());
    }
}

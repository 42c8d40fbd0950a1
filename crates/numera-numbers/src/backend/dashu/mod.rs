//! Arbitrary precision backend built on `dashu`.
//!
//! Values are either exact [`Integer`]s or exact [`Decimal`] floats. Integer
//! arithmetic stays exact; any float operand makes the result a float rounded
//! to the requested number of significant digits.

pub mod decimal;
pub mod integer;
mod kernels;

pub use decimal::Decimal;
pub use integer::Integer;

use num_traits::{One, Zero};
use std::cmp::Ordering;

use super::Backend;
use crate::error::{NumeralError, NumeralResult};
use crate::precision::{Precision, Radix};
use crate::text::NumeralText;

const NAME: &str = "dashu";

/// Largest exponent accepted in numeral text.
const MAX_TEXT_EXPONENT: i64 = 1 << 20;

/// Largest exact integer result, in bits.
const MAX_EXACT_BITS: u64 = 1 << 26;

/// Largest argument to an exact factorial.
const MAX_FACTORIAL: u64 = 1 << 20;

/// A numeral value.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum DashuValue {
    /// An exact integer.
    Integer(Integer),
    /// A decimal float.
    Float(Decimal),
}

impl DashuValue {
    /// Returns the value as a decimal.
    #[must_use]
    pub fn to_decimal(&self) -> Decimal {
        match self {
            Self::Integer(n) => Decimal::from_integer(n.clone()),
            Self::Float(d) => d.clone(),
        }
    }

    fn integer(&self, operation: &'static str) -> NumeralResult<&Integer> {
        match self {
            Self::Integer(n) => Ok(n),
            Self::Float(_) => Err(NumeralError::not_integer(operation)),
        }
    }
}

/// The `dashu` backend.
#[derive(Clone, Copy, Debug, Default)]
pub struct DashuBackend;

fn too_large(what: &str) -> NumeralError {
    NumeralError::unsupported(NAME, format!("an exact {what} this large"))
}

/// Applies `exact` to integer pairs and `rounded` to anything else.
fn combine(
    a: &DashuValue,
    b: &DashuValue,
    precision: Precision,
    exact: impl FnOnce(&Integer, &Integer) -> Integer,
    rounded: impl FnOnce(&Decimal, &Decimal) -> Decimal,
) -> DashuValue {
    match (a, b) {
        (DashuValue::Integer(x), DashuValue::Integer(y)) => DashuValue::Integer(exact(x, y)),
        _ => DashuValue::Float(rounded(&a.to_decimal(), &b.to_decimal()).round(precision)),
    }
}

fn exact_power(base: &Integer, exponent: u64) -> NumeralResult<Integer> {
    if base.abs() <= Integer::one() {
        return Ok(if base.is_negative() && exponent % 2 == 1 {
            -Integer::one()
        } else if base.is_zero() && exponent > 0 {
            Integer::zero()
        } else {
            Integer::one()
        });
    }
    let bits = (base.bit_len() as u64).saturating_mul(exponent);
    if bits > MAX_EXACT_BITS {
        return Err(too_large("power"));
    }
    Ok(base.pow(exponent as usize))
}

/// a^b where b is a whole number.
fn whole_power(a: &DashuValue, b: &Integer, precision: Precision) -> NumeralResult<DashuValue> {
    let magnitude = b
        .abs()
        .to_u64()
        .ok_or_else(|| NumeralError::unsupported(NAME, "an exponent this large"))?;
    match a {
        DashuValue::Integer(x) if !b.is_negative() => Ok(DashuValue::Integer(exact_power(x, magnitude)?)),
        DashuValue::Integer(x) => {
            let den = exact_power(x, magnitude)?;
            Ok(DashuValue::Float(Decimal::from_ratio(&Integer::one(), &den, precision)))
        }
        DashuValue::Float(x) if !b.is_negative() => {
            Ok(DashuValue::Float(kernels::pow_integer(x, magnitude, precision)))
        }
        DashuValue::Float(x) => {
            let inner = precision.widen(10);
            let den = kernels::pow_integer(x, magnitude, inner);
            Ok(DashuValue::Float(Decimal::one().divide(&den, precision)))
        }
    }
}

impl Backend for DashuBackend {
    type Value = DashuValue;

    const NAME: &'static str = NAME;
    const SUPPORTS_MANTISSA: bool = true;

    fn from_text(text: &NumeralText<'_>, precision: Precision) -> NumeralResult<DashuValue> {
        let radix = text.radix.get();
        let mut mantissa = Integer::from_str_radix(&text.all_digits(), radix)
            .map_err(|_| NumeralError::parse(text.integer_digits, "digit not valid in radix"))?;
        if text.negative {
            mantissa = -mantissa;
        }
        if !text.is_float() {
            return Ok(DashuValue::Integer(mantissa));
        }

        let exponent = text.exponent.unwrap_or(0);
        if exponent.abs() > MAX_TEXT_EXPONENT {
            return Err(NumeralError::unsupported(NAME, "an exponent this large"));
        }
        let scale = text.scale();
        let value = if radix == 10 {
            Decimal::new(mantissa, scale)
        } else if scale >= 0 {
            Decimal::from_integer(mantissa * Integer::power_of(radix, scale as usize))
        } else {
            let den = Integer::power_of(radix, scale.unsigned_abs() as usize);
            Decimal::from_ratio(&mantissa, &den, precision)
        };
        Ok(DashuValue::Float(value))
    }

    fn from_i64(value: i64) -> DashuValue {
        DashuValue::Integer(Integer::new(value))
    }

    fn render(value: &DashuValue, radix: Radix) -> String {
        match value {
            DashuValue::Integer(n) => n.to_string_radix(radix.get()),
            DashuValue::Float(d) => d.to_string_radix(radix.get()),
        }
    }

    fn to_i64(value: &DashuValue) -> Option<i64> {
        match value {
            DashuValue::Integer(n) => n.to_i64(),
            DashuValue::Float(_) => None,
        }
    }

    fn is_integer(value: &DashuValue) -> bool {
        matches!(value, DashuValue::Integer(_))
    }

    fn signum(value: &DashuValue) -> Ordering {
        match value {
            DashuValue::Integer(n) => n.sign_ordering(),
            DashuValue::Float(d) => d.sign_ordering(),
        }
    }

    fn compare(a: &DashuValue, b: &DashuValue) -> Ordering {
        match (a, b) {
            (DashuValue::Integer(x), DashuValue::Integer(y)) => x.cmp(y),
            _ => a.to_decimal().cmp(&b.to_decimal()),
        }
    }

    fn add(a: &DashuValue, b: &DashuValue, precision: Precision) -> NumeralResult<DashuValue> {
        Ok(combine(a, b, precision, |x, y| x + y, |x, y| x + y))
    }

    fn multiply(a: &DashuValue, b: &DashuValue, precision: Precision) -> NumeralResult<DashuValue> {
        Ok(combine(a, b, precision, |x, y| x * y, |x, y| x * y))
    }

    fn negate(a: &DashuValue) -> NumeralResult<DashuValue> {
        Ok(match a {
            DashuValue::Integer(n) => DashuValue::Integer(-n),
            DashuValue::Float(d) => DashuValue::Float(-d),
        })
    }

    fn abs(a: &DashuValue) -> NumeralResult<DashuValue> {
        Ok(match a {
            DashuValue::Integer(n) => DashuValue::Integer(n.abs()),
            DashuValue::Float(d) => DashuValue::Float(d.abs()),
        })
    }

    fn divide(a: &DashuValue, b: &DashuValue, precision: Precision) -> NumeralResult<DashuValue> {
        Ok(match (a, b) {
            (DashuValue::Integer(x), DashuValue::Integer(y)) if x.is_divisible_by(y) => {
                DashuValue::Integer(x / y)
            }
            (DashuValue::Integer(x), DashuValue::Integer(y)) => {
                DashuValue::Float(Decimal::from_ratio(x, y, precision))
            }
            _ => DashuValue::Float(a.to_decimal().divide(&b.to_decimal(), precision)),
        })
    }

    fn power(a: &DashuValue, b: &DashuValue, precision: Precision) -> NumeralResult<DashuValue> {
        let exponent = match b {
            DashuValue::Integer(n) => return whole_power(a, n, precision),
            DashuValue::Float(d) => d,
        };
        let base = a.to_decimal();

        if let Some(whole) = exponent.to_integer() {
            if whole.to_i64().is_some() {
                let result = whole_power(&DashuValue::Float(base), &whole, precision)?;
                return Ok(result);
            }
            // Too large to square out; only the sign of a negative base survives.
            let magnitude = kernels::pow_positive(&base.abs(), exponent, precision)?;
            let odd = base.is_negative() && !whole.is_even();
            return Ok(DashuValue::Float(if odd { -magnitude } else { magnitude }));
        }

        if base.is_zero() {
            return Ok(DashuValue::Float(Decimal::zero()));
        }
        Ok(DashuValue::Float(kernels::pow_positive(&base, exponent, precision)?))
    }

    fn floor(a: &DashuValue) -> NumeralResult<DashuValue> {
        Ok(match a {
            DashuValue::Integer(n) => DashuValue::Integer(n.clone()),
            DashuValue::Float(d) => DashuValue::Integer(d.floor()),
        })
    }

    fn ceil(a: &DashuValue) -> NumeralResult<DashuValue> {
        Ok(match a {
            DashuValue::Integer(n) => DashuValue::Integer(n.clone()),
            DashuValue::Float(d) => DashuValue::Integer(d.ceil()),
        })
    }

    fn quotient(a: &DashuValue, b: &DashuValue) -> NumeralResult<DashuValue> {
        Ok(DashuValue::Integer(match (a, b) {
            (DashuValue::Integer(x), DashuValue::Integer(y)) => x.floor_div(y),
            _ => a.to_decimal().floor_div(&b.to_decimal()),
        }))
    }

    fn modulo(a: &DashuValue, b: &DashuValue) -> NumeralResult<DashuValue> {
        Ok(match (a, b) {
            (DashuValue::Integer(x), DashuValue::Integer(y)) => DashuValue::Integer(x.floor_mod(y)),
            _ => {
                let (x, y) = (a.to_decimal(), b.to_decimal());
                let q = Decimal::from_integer(x.floor_div(&y));
                DashuValue::Float(&x - &(&y * &q))
            }
        })
    }

    fn gcd(a: &DashuValue, b: &DashuValue) -> NumeralResult<DashuValue> {
        let (x, y) = (a.integer("gcd")?, b.integer("gcd")?);
        Ok(DashuValue::Integer(x.gcd(y)))
    }

    fn sqrt(a: &DashuValue, precision: Precision) -> NumeralResult<DashuValue> {
        if let DashuValue::Integer(n) = a {
            let root = n.isqrt();
            if &(&root * &root) == n {
                return Ok(DashuValue::Integer(root));
            }
        }
        Ok(DashuValue::Float(kernels::square_root(&a.to_decimal(), precision)))
    }

    fn factorial(n: &DashuValue, _precision: Precision) -> NumeralResult<DashuValue> {
        let n = n
            .integer("factorial")?
            .to_u64()
            .ok_or_else(|| NumeralError::domain("factorial", "negative argument"))?;
        if n > MAX_FACTORIAL {
            return Err(too_large("factorial"));
        }
        Ok(DashuValue::Integer(Integer::factorial(n)))
    }

    fn sin(a: &DashuValue, precision: Precision) -> NumeralResult<DashuValue> {
        kernels::sin(&a.to_decimal(), precision).map(DashuValue::Float)
    }

    fn cos(a: &DashuValue, precision: Precision) -> NumeralResult<DashuValue> {
        kernels::cos(&a.to_decimal(), precision).map(DashuValue::Float)
    }

    fn tan(a: &DashuValue, precision: Precision) -> NumeralResult<DashuValue> {
        kernels::tan(&a.to_decimal(), precision).map(DashuValue::Float)
    }

    fn arc_sin(a: &DashuValue, precision: Precision) -> NumeralResult<DashuValue> {
        Ok(DashuValue::Float(kernels::arc_sin(&a.to_decimal(), precision)))
    }

    fn arc_cos(a: &DashuValue, precision: Precision) -> NumeralResult<DashuValue> {
        Ok(DashuValue::Float(kernels::arc_cos(&a.to_decimal(), precision)))
    }

    fn arc_tan(a: &DashuValue, precision: Precision) -> NumeralResult<DashuValue> {
        Ok(DashuValue::Float(kernels::arc_tan(&a.to_decimal(), precision)))
    }

    fn exp(a: &DashuValue, precision: Precision) -> NumeralResult<DashuValue> {
        kernels::exp(&a.to_decimal(), precision).map(DashuValue::Float)
    }

    fn ln(a: &DashuValue, precision: Precision) -> NumeralResult<DashuValue> {
        Ok(DashuValue::Float(kernels::ln(&a.to_decimal(), precision)))
    }

    fn pi(precision: Precision) -> NumeralResult<DashuValue> {
        Ok(DashuValue::Float(kernels::pi(precision)))
    }

    fn shift(a: &DashuValue, by: i64) -> NumeralResult<DashuValue> {
        let n = a.integer("shift")?;
        if by >= 0 {
            if (n.bit_len() as u64).saturating_add(by.unsigned_abs()) > MAX_EXACT_BITS {
                return Err(too_large("shift"));
            }
            return Ok(DashuValue::Integer(n.shl(by as usize)));
        }
        let by = by.unsigned_abs().min(n.bit_len() as u64 + 1);
        Ok(DashuValue::Integer(n.shr_floor(by as usize)))
    }

    fn bit_and(a: &DashuValue, b: &DashuValue) -> NumeralResult<DashuValue> {
        Ok(DashuValue::Integer(a.integer("bitand")? & b.integer("bitand")?))
    }

    fn bit_or(a: &DashuValue, b: &DashuValue) -> NumeralResult<DashuValue> {
        Ok(DashuValue::Integer(a.integer("bitor")? | b.integer("bitor")?))
    }

    fn bit_xor(a: &DashuValue, b: &DashuValue) -> NumeralResult<DashuValue> {
        Ok(DashuValue::Integer(a.integer("bitxor")? ^ b.integer("bitxor")?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> DashuValue {
        parse_radix(text, Radix::DECIMAL)
    }

    fn parse_radix(text: &str, radix: Radix) -> DashuValue {
        let lexed = NumeralText::parse(text, radix).unwrap();
        DashuBackend::from_text(&lexed, Precision::DEFAULT).unwrap()
    }

    fn show(value: &DashuValue) -> String {
        DashuBackend::render(value, Radix::DECIMAL)
    }

    #[test]
    fn test_text_kinds() {
        assert!(DashuBackend::is_integer(&parse("-42")));
        assert!(!DashuBackend::is_integer(&parse("42.0")));
        assert!(!DashuBackend::is_integer(&parse("42e0")));
        assert_eq!(show(&parse("1.50")), "1.5");
        assert_eq!(show(&parse("15e24")), "1.5e25");
        assert_eq!(show(&parse("-0.0")), "0.0");
    }

    #[test]
    fn test_radix_text() {
        assert_eq!(show(&parse_radix("ff", Radix::HEX)), "255");
        assert_eq!(show(&parse_radix("-1.1", Radix::BINARY)), "-1.5");
        assert_eq!(show(&parse_radix("1e3", Radix::BINARY)), "8.0");
        assert_eq!(show(&parse_radix("0.1", Radix::new(3).unwrap())), "0.33333333333333333333");
    }

    #[test]
    fn test_exact_integer_arithmetic() {
        let p = Precision::new(5);
        let big = parse("123456789012345678901234567890");
        let sum = DashuBackend::add(&big, &parse("1"), p).unwrap();
        assert_eq!(show(&sum), "123456789012345678901234567891");
        let product = DashuBackend::multiply(&big, &big, p).unwrap();
        assert!(DashuBackend::is_integer(&product));
    }

    #[test]
    fn test_division_exactness() {
        let p = Precision::new(10);
        let div = |a: &str, b: &str| show(&DashuBackend::divide(&parse(a), &parse(b), p).unwrap());
        assert_eq!(div("10", "2"), "5");
        assert_eq!(div("1", "8"), "0.125");
        assert_eq!(div("1", "3"), "0.3333333333");
        assert_eq!(div("1.0", "4"), "0.25");
    }

    #[test]
    fn test_float_rounding() {
        let p = Precision::new(3);
        let sum = DashuBackend::add(&parse("1.2345"), &parse("1"), p).unwrap();
        assert_eq!(show(&sum), "2.23");
    }

    #[test]
    fn test_power() {
        let p = Precision::new(10);
        let pow = |a: &str, b: &str| show(&DashuBackend::power(&parse(a), &parse(b), p).unwrap());
        assert_eq!(pow("2", "100"), "1267650600228229401496703205376");
        assert_eq!(pow("2", "-2"), "0.25");
        assert_eq!(pow("-2", "3"), "-8");
        assert_eq!(pow("-2", "3.0"), "-8.0");
        assert_eq!(pow("4", "0.5"), "2.0");
        assert_eq!(pow("1.5", "2"), "2.25");
        assert_eq!(pow("0", "0"), "1");
        assert_eq!(pow("0.0", "2.5"), "0.0");
    }

    #[test]
    fn test_floor_division() {
        let q = |a: &str, b: &str| show(&DashuBackend::quotient(&parse(a), &parse(b)).unwrap());
        let m = |a: &str, b: &str| show(&DashuBackend::modulo(&parse(a), &parse(b)).unwrap());
        assert_eq!(q("-7", "2"), "-4");
        assert_eq!(m("-7", "2"), "1");
        assert_eq!(q("7.5", "2"), "3");
        assert_eq!(m("7.5", "2"), "1.5");
        assert_eq!(m("-7.5", "2"), "0.5");
        assert_eq!(show(&DashuBackend::floor(&parse("-2.5")).unwrap()), "-3");
        assert_eq!(show(&DashuBackend::ceil(&parse("2.1")).unwrap()), "3");
    }

    #[test]
    fn test_sqrt() {
        let p = Precision::new(10);
        assert_eq!(show(&DashuBackend::sqrt(&parse("144"), p).unwrap()), "12");
        assert_eq!(show(&DashuBackend::sqrt(&parse("2"), p).unwrap()), "1.414213562");
        assert_eq!(show(&DashuBackend::sqrt(&parse("2.25"), p).unwrap()), "1.5");
    }

    #[test]
    fn test_factorial() {
        let p = Precision::DEFAULT;
        assert_eq!(show(&DashuBackend::factorial(&parse("25"), p).unwrap()), "15511210043330985984000000");
        assert!(matches!(
            DashuBackend::factorial(&parse("2.0"), p),
            Err(NumeralError::Type { .. })
        ));
    }

    #[test]
    fn test_bits() {
        let and = DashuBackend::bit_and(&parse("-4"), &parse("7")).unwrap();
        assert_eq!(show(&and), "4");
        let xor = DashuBackend::bit_xor(&parse("12"), &parse("10")).unwrap();
        assert_eq!(show(&xor), "6");
        assert_eq!(show(&DashuBackend::shift(&parse("3"), 4).unwrap()), "48");
        assert_eq!(show(&DashuBackend::shift(&parse("-5"), -1).unwrap()), "-3");
        assert_eq!(show(&DashuBackend::shift(&parse("5"), -100).unwrap()), "0");
        assert!(DashuBackend::bit_or(&parse("1.0"), &parse("1")).is_err());
    }

    #[test]
    fn test_compare_mixed() {
        assert_eq!(DashuBackend::compare(&parse("2"), &parse("2.0")), Ordering::Equal);
        assert_eq!(DashuBackend::compare(&parse("2"), &parse("1.999")), Ordering::Greater);
        assert_eq!(DashuBackend::signum(&parse("-0.001")), Ordering::Less);
    }
}

//! Numeral text format.
//!
//! Numerals are written as
//!
//! ```text
//! [+-] digits [ '.' digits ] [ ('e' | 'E') [+-] decimal-digits ]
//! ```
//!
//! with digits `0-9a-z` (case-insensitive) valid in the radix. At least one
//! mantissa digit is required. The exponent marker is only recognized when the
//! radix is at most 14, since `e` is a digit in larger radixes, and it scales
//! the mantissa by `radix^exponent`.
//!
//! Backends share this lexer so every backend accepts exactly the same text.

use crate::error::{NumeralError, NumeralResult};
use crate::precision::Radix;

/// The lexical parts of a numeral.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NumeralText<'a> {
    /// True if the numeral had a leading minus sign.
    pub negative: bool,
    /// Digits before the fractional point.
    pub integer_digits: &'a str,
    /// Digits after the fractional point.
    pub fraction_digits: &'a str,
    /// True if a fractional point was present.
    pub has_point: bool,
    /// The exponent, if an exponent marker was present.
    pub exponent: Option<i64>,
    /// The radix the digits are written in.
    pub radix: Radix,
}

impl<'a> NumeralText<'a> {
    /// Splits `text` into its lexical parts.
    ///
    /// # Errors
    ///
    /// Returns a parse error if the text does not follow the numeral grammar.
    pub fn parse(text: &'a str, radix: Radix) -> NumeralResult<Self> {
        let (negative, unsigned) = match text.as_bytes().first() {
            Some(b'-') => (true, &text[1..]),
            Some(b'+') => (false, &text[1..]),
            Some(_) => (false, text),
            None => return Err(NumeralError::parse(text, "empty numeral")),
        };

        let (mantissa, exponent) = if radix.allows_exponent() {
            match unsigned.find(['e', 'E']) {
                Some(at) => (&unsigned[..at], Some(parse_exponent(text, &unsigned[at + 1..])?)),
                None => (unsigned, None),
            }
        } else {
            (unsigned, None)
        };

        let (integer_digits, fraction_digits, has_point) = match mantissa.split_once('.') {
            Some((int, frac)) => {
                if frac.contains('.') {
                    return Err(NumeralError::parse(text, "more than one fractional point"));
                }
                (int, frac, true)
            }
            None => (mantissa, "", false),
        };

        if integer_digits.is_empty() && fraction_digits.is_empty() {
            return Err(NumeralError::parse(text, "no digits"));
        }

        for c in integer_digits.chars().chain(fraction_digits.chars()) {
            match digit_value(c) {
                Some(d) if d < radix.get() => {}
                _ => return Err(NumeralError::parse(text, "digit not valid in radix")),
            }
        }

        Ok(Self {
            negative,
            integer_digits,
            fraction_digits,
            has_point,
            exponent,
            radix,
        })
    }

    /// Returns true if the numeral is written as a float rather than an integer.
    #[must_use]
    pub fn is_float(&self) -> bool {
        self.has_point || self.exponent.is_some()
    }

    /// Returns all mantissa digits with the fractional point removed.
    #[must_use]
    pub fn all_digits(&self) -> String {
        let mut digits = String::with_capacity(self.integer_digits.len() + self.fraction_digits.len());
        digits.push_str(self.integer_digits);
        digits.push_str(self.fraction_digits);
        if digits.is_empty() {
            digits.push('0');
        }
        digits
    }

    /// Returns the power of the radix that scales [`all_digits`](Self::all_digits)
    /// to the numeral's value.
    #[must_use]
    pub fn scale(&self) -> i64 {
        self.exponent.unwrap_or(0) - self.fraction_digits.len() as i64
    }
}

fn parse_exponent(text: &str, exponent: &str) -> NumeralResult<i64> {
    let digits = exponent.strip_prefix(['+', '-']).unwrap_or(exponent);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(NumeralError::parse(text, "malformed exponent"));
    }
    exponent
        .parse()
        .map_err(|_| NumeralError::parse(text, "exponent out of range"))
}

/// Returns the value of a digit character in radix 36.
#[must_use]
pub fn digit_value(c: char) -> Option<u32> {
    c.to_digit(36)
}

/// Lays out a base-10 float.
///
/// `digits` are the significant digits without leading or trailing zeros (or
/// `"0"` for zero) and the value is `d.ddd × 10^sci_exponent`. Positional
/// notation is used when the exponent lies in [-7, 20]; integral values get a
/// trailing `.0` so they still read back as floats.
#[must_use]
pub fn layout_decimal(negative: bool, digits: &str, sci_exponent: i64) -> String {
    let mut out = String::with_capacity(digits.len() + 8);
    if negative {
        out.push('-');
    }

    if (-7..=20).contains(&sci_exponent) {
        if sci_exponent >= 0 {
            let point = sci_exponent as usize + 1;
            if digits.len() > point {
                out.push_str(&digits[..point]);
                out.push('.');
                out.push_str(&digits[point..]);
            } else {
                out.push_str(digits);
                out.extend(std::iter::repeat('0').take(point - digits.len()));
                out.push_str(".0");
            }
        } else {
            out.push_str("0.");
            out.extend(std::iter::repeat('0').take((-sci_exponent - 1) as usize));
            out.push_str(digits);
        }
    } else {
        out.push_str(&digits[..1]);
        if digits.len() > 1 {
            out.push('.');
            out.push_str(&digits[1..]);
        }
        out.push('e');
        out.push_str(&sci_exponent.to_string());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(text: &str) -> NumeralResult<NumeralText<'_>> {
        NumeralText::parse(text, Radix::DECIMAL)
    }

    #[test]
    fn test_integer_text() {
        let t = lex("-123").unwrap();
        assert!(t.negative);
        assert_eq!(t.integer_digits, "123");
        assert!(!t.is_float());
        assert_eq!(t.scale(), 0);
    }

    #[test]
    fn test_float_text() {
        let t = lex("12.50e-3").unwrap();
        assert_eq!(t.all_digits(), "1250");
        assert_eq!(t.exponent, Some(-3));
        assert_eq!(t.scale(), -5);
        assert!(t.is_float());

        let t = lex(".5").unwrap();
        assert_eq!(t.all_digits(), "5");
        assert_eq!(t.scale(), -1);

        let t = lex("5.").unwrap();
        assert!(t.is_float());
        assert_eq!(t.scale(), 0);
    }

    #[test]
    fn test_malformed_text() {
        for bad in ["", "-", ".", "1..2", "1.2.3", "12a", "1e", "1e+", "1ee2", " 1", "1_0"] {
            assert!(
                matches!(lex(bad), Err(NumeralError::Parse { .. })),
                "{bad:?} should not parse"
            );
        }
    }

    #[test]
    fn test_radix_digits() {
        let t = NumeralText::parse("fF.8", Radix::HEX).unwrap();
        assert_eq!(t.all_digits(), "fF8");
        assert_eq!(t.exponent, None);

        // `e` is a digit in base 16.
        let t = NumeralText::parse("1e2", Radix::HEX).unwrap();
        assert!(!t.is_float());

        assert!(NumeralText::parse("102", Radix::BINARY).is_err());
    }

    #[test]
    fn test_layout() {
        assert_eq!(layout_decimal(false, "1235", 2), "123.5");
        assert_eq!(layout_decimal(false, "5", -1), "0.5");
        assert_eq!(layout_decimal(true, "25", 2), "-250.0");
        assert_eq!(layout_decimal(false, "0", 0), "0.0");
        assert_eq!(layout_decimal(false, "15", 25), "1.5e25");
        assert_eq!(layout_decimal(false, "1", -20), "1e-20");
        assert_eq!(layout_decimal(false, "1", -7), "0.0000001");
    }
}

//! Precision and radix parameters.

use std::fmt;

use crate::error::{NumeralError, NumeralResult};

/// log2(10), used to convert decimal digits to binary bits.
const LOG2_10: f64 = std::f64::consts::LOG2_10;

/// A requested number of significant decimal digits.
///
/// Precision is passed to each operation and never stored on a value.
/// Exact results ignore it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Precision(u32);

impl Precision {
    /// The precision used when a caller has no preference.
    pub const DEFAULT: Precision = Precision(20);

    /// Creates a precision of `digits` significant digits, at least one.
    #[must_use]
    pub const fn new(digits: u32) -> Self {
        if digits == 0 {
            Self(1)
        } else {
            Self(digits)
        }
    }

    /// Returns the number of significant decimal digits.
    #[must_use]
    pub const fn digits(self) -> u32 {
        self.0
    }

    /// Returns the number of binary digits carrying the same information.
    #[must_use]
    pub fn bits(self) -> usize {
        (f64::from(self.0) * LOG2_10).ceil() as usize
    }

    /// Returns this precision widened by `extra` digits.
    #[must_use]
    pub const fn widen(self, extra: u32) -> Self {
        Self(self.0.saturating_add(extra))
    }
}

impl Default for Precision {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<u32> for Precision {
    fn from(digits: u32) -> Self {
        Self::new(digits)
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A numeral radix between 2 and 36.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Radix(u32);

impl Radix {
    /// Base 2.
    pub const BINARY: Radix = Radix(2);
    /// Base 8.
    pub const OCTAL: Radix = Radix(8);
    /// Base 10.
    pub const DECIMAL: Radix = Radix(10);
    /// Base 16.
    pub const HEX: Radix = Radix(16);

    /// Creates a radix.
    ///
    /// # Errors
    ///
    /// Returns a domain error if `radix` is outside 2..=36.
    pub fn new(radix: u32) -> NumeralResult<Self> {
        if (2..=36).contains(&radix) {
            Ok(Self(radix))
        } else {
            Err(NumeralError::domain("radix", "radix must lie in 2..=36"))
        }
    }

    /// Parses a radix written as a decimal integer.
    ///
    /// # Errors
    ///
    /// Returns a parse error for non-numeric text and a domain error for an
    /// out-of-range radix.
    pub fn from_text(text: &str) -> NumeralResult<Self> {
        let radix: u32 = text
            .parse()
            .map_err(|_| NumeralError::parse(text, "radix must be a small decimal integer"))?;
        Self::new(radix)
    }

    /// Returns the radix value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Returns true if an `e` exponent marker cannot be mistaken for a digit.
    #[must_use]
    pub const fn allows_exponent(self) -> bool {
        self.0 <= 14
    }
}

impl Default for Radix {
    fn default() -> Self {
        Self::DECIMAL
    }
}

impl fmt::Display for Radix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precision_floor() {
        assert_eq!(Precision::new(0).digits(), 1);
        assert_eq!(Precision::new(30).digits(), 30);
        assert_eq!(Precision::from(5), Precision::new(5));
    }

    #[test]
    fn test_precision_bits() {
        assert_eq!(Precision::new(1).bits(), 4);
        assert_eq!(Precision::new(10).bits(), 34);
    }

    #[test]
    fn test_radix_bounds() {
        assert!(Radix::new(1).is_err());
        assert!(Radix::new(37).is_err());
        assert_eq!(Radix::new(36).map(Radix::get), Ok(36));
        assert!(Radix::DECIMAL.allows_exponent());
        assert!(!Radix::HEX.allows_exponent());
    }

    #[test]
    fn test_radix_from_text() {
        assert_eq!(Radix::from_text("16"), Ok(Radix::HEX));
        assert!(matches!(
            Radix::from_text("x"),
            Err(NumeralError::Parse { .. })
        ));
        assert!(matches!(
            Radix::from_text("40"),
            Err(NumeralError::Domain { .. })
        ));
    }
}

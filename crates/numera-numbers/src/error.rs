//! Errors reported by numeral operations.

use thiserror::Error;

/// Errors that can occur while parsing or operating on numerals.
///
/// Every variant is a recoverable failure returned to the caller; the evaluator
/// decides whether to surface it as a language-level error value.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum NumeralError {
    /// The numeral text is malformed.
    #[error("malformed numeral `{text}`: {reason}")]
    Parse {
        /// The offending text.
        text: String,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// A division, modulus or integer quotient by zero.
    #[error("division by zero")]
    DivisionByZero,

    /// An argument outside the domain of the operation.
    #[error("{operation}: argument outside domain ({reason})")]
    Domain {
        /// The operation that rejected its argument.
        operation: &'static str,
        /// Why the argument is outside the domain.
        reason: &'static str,
    },

    /// An exact-integer-only operation received a non-integer operand.
    #[error("{operation} requires exact integer operands")]
    Type {
        /// The operation that rejected its operand.
        operation: &'static str,
    },

    /// The active backend cannot represent the requested result.
    #[error("backend `{backend}` cannot honor {detail}")]
    PrecisionUnsupported {
        /// Name of the active backend.
        backend: &'static str,
        /// What was requested.
        detail: String,
    },
}

impl NumeralError {
    /// Creates a parse error for `text`.
    pub fn parse(text: &str, reason: &'static str) -> Self {
        Self::Parse {
            text: text.to_string(),
            reason,
        }
    }

    /// Creates a domain error.
    #[must_use]
    pub fn domain(operation: &'static str, reason: &'static str) -> Self {
        Self::Domain { operation, reason }
    }

    /// Creates a type error.
    #[must_use]
    pub fn not_integer(operation: &'static str) -> Self {
        Self::Type { operation }
    }

    /// Creates an unsupported-precision error for `backend`.
    pub fn unsupported(backend: &'static str, detail: impl Into<String>) -> Self {
        Self::PrecisionUnsupported {
            backend,
            detail: detail.into(),
        }
    }
}

/// Result type for numeral operations.
pub type NumeralResult<T> = Result<T, NumeralError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            NumeralError::parse("1..2", "more than one fractional point").to_string(),
            "malformed numeral `1..2`: more than one fractional point"
        );
        assert_eq!(NumeralError::DivisionByZero.to_string(), "division by zero");
        assert_eq!(
            NumeralError::domain("ln", "non-positive argument").to_string(),
            "ln: argument outside domain (non-positive argument)"
        );
        assert_eq!(
            NumeralError::not_integer("gcd").to_string(),
            "gcd requires exact integer operands"
        );
    }
}

//! Identity of the backend compiled into this build.
//!
//! The backend is chosen once, by Cargo feature, and never switched at run
//! time. These functions only report which one it is.

use std::fmt;

use crate::backend::{ActiveBackend, Backend};

/// Returns the active backend's name.
#[must_use]
pub fn backend_name() -> &'static str {
    ActiveBackend::NAME
}

/// Returns true if the active backend accepts fractional points and exponents.
#[must_use]
pub fn supports_mantissa() -> bool {
    ActiveBackend::SUPPORTS_MANTISSA
}

/// A summary of the active backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BackendInfo {
    /// Backend name.
    pub name: &'static str,
    /// Whether fractional numerals are supported.
    pub supports_mantissa: bool,
}

impl BackendInfo {
    /// Describes the backend compiled into this build.
    #[must_use]
    pub fn active() -> Self {
        Self {
            name: backend_name(),
            supports_mantissa: supports_mantissa(),
        }
    }
}

impl fmt::Display for BackendInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mantissa = if self.supports_mantissa { "with" } else { "without" };
        write!(f, "{} ({mantissa} mantissa support)", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_backend() {
        let info = BackendInfo::active();
        assert_eq!(info.name, backend_name());
        assert!(info.supports_mantissa);
        #[cfg(feature = "backend-dashu")]
        assert_eq!(info.to_string(), "dashu (with mantissa support)");
        #[cfg(feature = "backend-native")]
        assert_eq!(info.name, "native");
    }
}

//! Property-based tests for numerals and the string-addressed API.

#[cfg(test)]
mod tests {
    use numera_core::AtomTable;
    use proptest::prelude::*;

    use crate::{api, Numeral, NumeralError, Precision, Radix};

    const P: Precision = Precision::new(12);

    fn num(text: &str) -> Numeral {
        Numeral::parse(text, Radix::DECIMAL, P).unwrap()
    }

    // Strategy for integer numeral text
    fn int_text() -> impl Strategy<Value = String> {
        any::<i64>().prop_map(|n| n.to_string())
    }

    // Strategy for short decimal float text such as "-12.034"
    fn float_text() -> impl Strategy<Value = String> {
        (-100_000i64..100_000i64, 1u32..6).prop_map(|(n, places)| {
            let scale = 10i64.pow(places);
            let sign = if n < 0 { "-" } else { "" };
            let n = n.unsigned_abs();
            format!("{sign}{}.{:0width$}", n / scale as u64, n % scale as u64, width = places as usize)
        })
    }

    fn any_text() -> impl Strategy<Value = String> {
        prop_oneof![int_text(), float_text()]
    }

    proptest! {
        // Round trip

        #[test]
        fn integer_text_round_trips(n in any::<i64>()) {
            prop_assert_eq!(num(&n.to_string()).to_string(), n.to_string());
        }

        #[test]
        fn float_text_round_trips(text in float_text()) {
            let value = num(&text);
            prop_assert!(!value.is_integer());
            prop_assert_eq!(num(&value.to_string()), value);
        }

        #[test]
        fn rendering_is_canonical(text in any_text()) {
            let once = num(&text).to_string();
            prop_assert_eq!(num(&once).to_string(), once);
        }

        // Arithmetic laws

        #[test]
        fn add_commutative(a in any_text(), b in any_text()) {
            let (a, b) = (num(&a), num(&b));
            prop_assert_eq!(a.add(&b, P).unwrap(), b.add(&a, P).unwrap());
        }

        #[test]
        fn add_zero_identity(a in any_text()) {
            let a = num(&a);
            prop_assert_eq!(a.add(&num("0"), P).unwrap(), a);
        }

        #[test]
        fn integer_arithmetic_is_exact(a in -1_000_000i64..1_000_000, b in -1_000_000i64..1_000_000) {
            let sum = num(&a.to_string()).add(&num(&b.to_string()), Precision::new(1)).unwrap();
            prop_assert!(sum.is_integer());
            prop_assert_eq!(sum.to_i64(), Some(a + b));
            let product = num(&a.to_string()).multiply(&num(&b.to_string()), Precision::new(1)).unwrap();
            prop_assert_eq!(product.to_i64(), Some(a * b));
        }

        #[test]
        fn floored_division_identity(a in -10_000i64..10_000, b in prop_oneof![-100i64..=-1, 1i64..=100]) {
            let (x, y) = (num(&a.to_string()), num(&b.to_string()));
            let q = x.quotient(&y).unwrap().to_i64().unwrap();
            let r = x.modulo(&y).unwrap().to_i64().unwrap();
            prop_assert_eq!(b * q + r, a);
            prop_assert!(r == 0 || (r < 0) == (b < 0));
            prop_assert!(r.abs() < b.abs());
        }

        #[test]
        fn comparison_matches_integers(a in any::<i64>(), b in any::<i64>()) {
            let (x, y) = (num(&a.to_string()), num(&b.to_string()));
            prop_assert_eq!(x.greater_than(&y), a > b);
            prop_assert_eq!(x.less_than(&y), a < b);
        }

        // Error policy

        #[test]
        fn division_by_zero_is_reported(a in any_text()) {
            let a = num(&a);
            prop_assert_eq!(a.divide(&num("0"), P), Err(NumeralError::DivisionByZero));
            prop_assert_eq!(a.modulo(&num("0.0")), Err(NumeralError::DivisionByZero));
            prop_assert_eq!(a.quotient(&num("0")), Err(NumeralError::DivisionByZero));
        }

        // Two call surfaces

        #[test]
        fn string_api_matches_values(a in any_text(), b in any_text()) {
            let atoms = AtomTable::new();
            let (x, y) = (num(&a), num(&b));
            let via_api = |h: crate::NumeralResult<numera_core::AtomHandle>| {
                h.map(|h| atoms.text(h).unwrap().to_string())
            };

            prop_assert_eq!(via_api(api::add(&a, &b, &atoms, P)), x.add(&y, P).map(|v| v.to_string()));
            prop_assert_eq!(via_api(api::multiply(&a, &b, &atoms, P)), x.multiply(&y, P).map(|v| v.to_string()));
            prop_assert_eq!(via_api(api::divide(&a, &b, &atoms, P)), x.divide(&y, P).map(|v| v.to_string()));
            prop_assert_eq!(api::greater_than(&a, &b, P).unwrap(), x.greater_than(&y));
        }

        // Base conversion

        #[test]
        fn base_conversion_round_trips(n in any::<i64>(), radix in 2u32..=36) {
            let atoms = AtomTable::new();
            let base = radix.to_string();
            let written = api::to_base(&n.to_string(), &base, &atoms, P).unwrap();
            let written = atoms.text(written).unwrap().to_string();
            let back = api::from_base(&written, &base, &atoms, P).unwrap();
            let expected = n.to_string();
            prop_assert_eq!(&*atoms.text(back).unwrap(), expected.as_str());
        }
    }
}

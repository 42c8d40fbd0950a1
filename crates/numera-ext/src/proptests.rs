//! Property-based tests for the environment and the core built-ins.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use numera_core::{AtomHandle, AtomTable};
    use numera_numbers::{api, Precision};
    use proptest::collection::vec;
    use proptest::prelude::*;

    use crate::{BuiltinFn, CallError, Environment, EnvironmentConfig, CORE_OWNER};

    fn zero(env: &Environment, _: &[AtomHandle]) -> Result<AtomHandle, CallError> {
        Ok(env.atoms().lookup("0"))
    }

    fn env(precision: u32) -> Environment {
        let config = EnvironmentConfig {
            precision: Precision::new(precision),
        };
        Environment::with_core_builtins(Arc::new(AtomTable::new()), config)
    }

    fn number() -> impl Strategy<Value = String> {
        prop_oneof![
            any::<i32>().prop_map(|n| n.to_string()),
            (-10_000i32..10_000, 1u32..1000).prop_map(|(n, d)| format!("{n}.{d}")),
        ]
    }

    proptest! {
        #[test]
        fn batch_registration_is_all_or_nothing(names in vec("[A-Z][a-z]{0,3}", 1..8)) {
            let mut env = env(10);
            let before = env.len();
            let entries: Vec<(String, BuiltinFn)> = names.iter().map(|n| (n.clone(), zero as BuiltinFn)).collect();

            match env.register_all("plugin", entries) {
                Ok(count) => {
                    prop_assert_eq!(env.len(), before + count);
                    prop_assert_eq!(env.unregister_owner("plugin"), count);
                }
                Err(_) => prop_assert!(env.names_owned_by("plugin").is_empty()),
            }
            prop_assert_eq!(env.len(), before);
            prop_assert_eq!(env.names_owned_by(CORE_OWNER).len(), before);
        }

        #[test]
        fn builtins_match_api(a in number(), b in number(), digits in 1u32..30) {
            let env = env(digits);
            let p = Precision::new(digits);
            let atoms = env.atoms();
            let expected = |h: numera_numbers::NumeralResult<AtomHandle>| h.map(|h| atoms.text(h).unwrap());

            prop_assert_eq!(
                env.call_text("Add", &[&a, &b]).map_err(|_| ()),
                expected(api::add(&a, &b, atoms, p)).map_err(|_| ())
            );
            prop_assert_eq!(
                env.call_text("Divide", &[&a, &b]).map_err(|_| ()),
                expected(api::divide(&a, &b, atoms, p)).map_err(|_| ())
            );
        }
    }
}

//! A sample extension module for Numera.
//!
//! Built as a `cdylib`, it exports `make_numera_sample` and binds two
//! built-ins:
//!
//! - `SampleDouble[x]` = `2 x`
//! - `SampleHypot[x, y]` = `sqrt(x^2 + y^2)`

use numera_core::AtomHandle;
use numera_ext::{export_plugin, CallError, EnvError, Environment, Plugin, Registrar};
use numera_numbers::{api, Numeral, Radix};

/// Name under which [`SamplePlugin`] identifies itself.
pub const PLUGIN_NAME: &str = "numera-sample";

/// The sample plugin.
#[derive(Debug, Default)]
pub struct SamplePlugin;

fn sample_double(env: &Environment, args: &[AtomHandle]) -> Result<AtomHandle, CallError> {
    let [x] = env.operands::<1>("SampleDouble", args)?;
    Ok(api::multiply(&x, "2", env.atoms(), env.precision())?)
}

fn sample_hypot(env: &Environment, args: &[AtomHandle]) -> Result<AtomHandle, CallError> {
    let [x, y] = env.operands::<2>("SampleHypot", args)?;
    let p = env.precision();
    let x = Numeral::parse(&x, Radix::DECIMAL, p)?;
    let y = Numeral::parse(&y, Radix::DECIMAL, p)?;

    let mut sum = x.multiply(&x, p)?;
    sum.accumulate_product(&y, &y, p)?;
    Ok(api::number_to_atom(&sum.sqrt(p)?, env.atoms()))
}

impl Plugin for SamplePlugin {
    fn name(&self) -> &str {
        PLUGIN_NAME
    }

    fn add(&self, registrar: &mut Registrar<'_>) -> Result<(), EnvError> {
        registrar.register("SampleDouble", sample_double)?;
        registrar.register("SampleHypot", sample_hypot)
    }
}

export_plugin!(make_numera_sample, SamplePlugin);

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use numera_core::AtomTable;
    use numera_ext::EnvironmentConfig;
    use numera_numbers::Precision;

    use super::*;

    fn open() -> Environment {
        let config = EnvironmentConfig {
            precision: Precision::new(10),
        };
        let mut env = Environment::with_core_builtins(Arc::new(AtomTable::new()), config);
        let mut registrar = Registrar::new(&mut env, "numera_sample");
        SamplePlugin.add(&mut registrar).unwrap();
        assert_eq!(registrar.commit(), Ok(2));
        env
    }

    #[test]
    fn test_builtins() {
        let env = open();
        assert_eq!(&*env.call_text("SampleDouble", &["21"]).unwrap(), "42");
        assert_eq!(&*env.call_text("SampleDouble", &["0.25"]).unwrap(), "0.5");
        assert_eq!(&*env.call_text("SampleHypot", &["3", "4"]).unwrap(), "5");
        assert_eq!(&*env.call_text("SampleHypot", &["1", "1"]).unwrap(), "1.414213562");
    }

    #[test]
    fn test_errors() {
        let env = open();
        assert!(matches!(
            env.call_text("SampleHypot", &["1"]),
            Err(CallError::Arity { expected: 2, found: 1, .. })
        ));
        assert!(matches!(
            env.call_text("SampleDouble", &["one"]),
            Err(CallError::Numeral(_))
        ));
    }

    #[test]
    fn test_factory() {
        // SAFETY: the factory returns a pointer from `Box::into_raw`.
        let plugin = unsafe { Box::from_raw(make_numera_sample()) };
        assert_eq!(plugin.name(), PLUGIN_NAME);
    }

    #[test]
    fn test_remove_unbinds() {
        let mut env = open();
        SamplePlugin.remove(&mut Registrar::new(&mut env, "numera_sample"));
        assert!(!env.contains("SampleDouble"));
        assert!(env.contains("Add"));
    }
}

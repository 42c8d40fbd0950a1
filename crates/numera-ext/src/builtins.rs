//! Core numeric built-ins.
//!
//! Each built-in reads its operands from the atom table and forwards to the
//! string-addressed numeral API at the environment's precision.

use numera_core::AtomHandle;
use numera_numbers::api;

use crate::environment::{BuiltinFn, Environment};
use crate::error::CallError;

/// Owner of the core built-ins.
pub const CORE_OWNER: &str = "core";

/// Atom returned by true comparisons.
pub const TRUE_ATOM: &str = "True";

/// Atom returned by false comparisons.
pub const FALSE_ATOM: &str = "False";

type CallResult = Result<AtomHandle, CallError>;

macro_rules! nullary {
    ($($fn_name:ident => $op:path;)*) => {$(
        fn $fn_name(env: &Environment, args: &[AtomHandle]) -> CallResult {
            let [] = env.operands::<0>(stringify!($fn_name), args)?;
            Ok($op(env.atoms(), env.precision())?)
        }
    )*};
}

macro_rules! unary {
    ($($fn_name:ident => $op:path;)*) => {$(
        fn $fn_name(env: &Environment, args: &[AtomHandle]) -> CallResult {
            let [x] = env.operands::<1>(stringify!($fn_name), args)?;
            Ok($op(&x, env.atoms(), env.precision())?)
        }
    )*};
}

macro_rules! binary {
    ($($fn_name:ident => $op:path;)*) => {$(
        fn $fn_name(env: &Environment, args: &[AtomHandle]) -> CallResult {
            let [x, y] = env.operands::<2>(stringify!($fn_name), args)?;
            Ok($op(&x, &y, env.atoms(), env.precision())?)
        }
    )*};
}

macro_rules! comparison {
    ($($fn_name:ident => $op:path;)*) => {$(
        fn $fn_name(env: &Environment, args: &[AtomHandle]) -> CallResult {
            let [x, y] = env.operands::<2>(stringify!($fn_name), args)?;
            let holds = $op(&x, &y, env.precision())?;
            Ok(env.atoms().lookup(if holds { TRUE_ATOM } else { FALSE_ATOM }))
        }
    )*};
}

nullary! {
    pi => api::pi;
}

unary! {
    negate => api::negate;
    abs => api::abs;
    floor => api::floor;
    ceil => api::ceil;
    sqrt => api::sqrt;
    factorial => api::factorial;
    sin => api::sin;
    cos => api::cos;
    tan => api::tan;
    arc_sin => api::arc_sin;
    arc_cos => api::arc_cos;
    arc_tan => api::arc_tan;
    exp => api::exp;
    ln => api::ln;
    plus => api::plus;
}

binary! {
    add => api::add;
    subtract => api::subtract;
    multiply => api::multiply;
    divide => api::divide;
    power => api::power;
    gcd => api::gcd;
    modulo => api::modulo;
    quotient => api::quotient;
    shift_left => api::shift_left;
    shift_right => api::shift_right;
    bit_and => api::bit_and;
    bit_or => api::bit_or;
    bit_xor => api::bit_xor;
    from_base => api::from_base;
    to_base => api::to_base;
}

comparison! {
    greater_than => api::greater_than;
    less_than => api::less_than;
}

fn multiply_add(env: &Environment, args: &[AtomHandle]) -> CallResult {
    let [x, y, z] = env.operands::<3>("multiply_add", args)?;
    Ok(api::multiply_add(&x, &y, &z, env.atoms(), env.precision())?)
}

/// The core built-ins, by evaluator name.
pub const CORE_BUILTINS: &[(&str, BuiltinFn)] = &[
    ("Add", add),
    ("Subtract", subtract),
    ("Multiply", multiply),
    ("MultiplyAdd", multiply_add),
    ("Divide", divide),
    ("Power", power),
    ("Negate", negate),
    ("Abs", abs),
    ("Plus", plus),
    ("Gcd", gcd),
    ("Mod", modulo),
    ("Div", quotient),
    ("Floor", floor),
    ("Ceil", ceil),
    ("Sqrt", sqrt),
    ("Factorial", factorial),
    ("Pi", pi),
    ("Sin", sin),
    ("Cos", cos),
    ("Tan", tan),
    ("ArcSin", arc_sin),
    ("ArcCos", arc_cos),
    ("ArcTan", arc_tan),
    ("Exp", exp),
    ("Ln", ln),
    ("ShiftLeft", shift_left),
    ("ShiftRight", shift_right),
    ("BitAnd", bit_and),
    ("BitOr", bit_or),
    ("BitXor", bit_xor),
    ("FromBase", from_base),
    ("ToBase", to_base),
    ("GreaterThan", greater_than),
    ("LessThan", less_than),
];

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use numera_core::AtomTable;
    use numera_numbers::{NumeralError, Precision};

    use super::*;
    use crate::config::EnvironmentConfig;

    fn env() -> Environment {
        let config = EnvironmentConfig {
            precision: Precision::new(10),
        };
        Environment::with_core_builtins(Arc::new(AtomTable::new()), config)
    }

    #[test]
    fn test_core_builtins_are_owned_by_core() {
        let env = env();
        assert_eq!(env.len(), CORE_BUILTINS.len());
        assert!(CORE_BUILTINS
            .iter()
            .all(|(name, _)| env.owner_of(name) == Some(CORE_OWNER)));
    }

    #[test]
    fn test_calls() {
        let env = env();
        assert_eq!(&*env.call_text("Add", &["123", "0.5"]).unwrap(), "123.5");
        assert_eq!(&*env.call_text("ShiftLeft", &["1", "3"]).unwrap(), "8");
        assert_eq!(&*env.call_text("GreaterThan", &["10", "9"]).unwrap(), TRUE_ATOM);
        assert_eq!(&*env.call_text("LessThan", &["10", "9"]).unwrap(), FALSE_ATOM);
        assert_eq!(&*env.call_text("MultiplyAdd", &["3", "4", "10"]).unwrap(), "22");
        assert_eq!(&*env.call_text("Factorial", &["5"]).unwrap(), "120");
        assert_eq!(&*env.call_text("Pi", &[]).unwrap(), "3.141592654");
    }

    #[test]
    fn test_errors() {
        let env = env();
        assert_eq!(
            env.call_text("Divide", &["1", "0"]),
            Err(CallError::Numeral(NumeralError::DivisionByZero))
        );
        assert!(matches!(
            env.call_text("Sin", &[]),
            Err(CallError::Arity { expected: 1, found: 0, .. })
        ));
    }

    #[test]
    fn test_precision_follows_environment() {
        let mut env = env();
        env.set_precision(Precision::new(3));
        assert_eq!(&*env.call_text("Divide", &["2", "3"]).unwrap(), "0.667");
    }
}

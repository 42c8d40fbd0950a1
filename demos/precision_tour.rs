//! A tour of exactness and precision in Numera.
//!
//! Shows which results stay exact, how precision shapes floats, how edge
//! cases surface as errors, and how built-ins are extended at runtime.
//!
//! Run with: cargo run --example precision_tour
//!
//! Set NUMERA_PLUGIN_PATH to the directory holding the built
//! `numera-sample-plugin` library to include the extension section.

use std::sync::Arc;

use numera::prelude::*;

fn num(text: &str, p: Precision) -> Numeral {
    Numeral::parse(text, Radix::DECIMAL, p).unwrap()
}

fn show(label: &str, result: Result<Numeral, NumeralError>) {
    match result {
        Ok(value) => {
            let kind = if value.is_integer() { "exact" } else { "float" };
            println!("  {label:<28} = {value} ({kind})");
        }
        Err(err) => println!("  {label:<28} ! {err}"),
    }
}

fn section(title: &str) {
    println!("\n═══════════════════════════════════════════════════════════════════");
    println!("{title}");
    println!("═══════════════════════════════════════════════════════════════════");
}

fn main() {
    println!("╔══════════════════════════════════════════════════════════════════╗");
    println!("║        Numera: A Tour of Exactness and Precision                 ║");
    println!("╚══════════════════════════════════════════════════════════════════╝");
    println!("\nBackend: {}", BackendInfo::active());

    section("1. Exact results ignore precision");
    let p = Precision::new(5);
    show("2^100", num("2", p).power(&num("100", p), p));
    show("1 / 8", num("1", p).divide(&num("8", p), p));
    show("-7 div 2", num("-7", p).quotient(&num("2", p)));
    show("-7 mod 2", num("-7", p).modulo(&num("2", p)));
    show("sqrt(144)", num("144", p).sqrt(p));
    show("cos(0)", num("0", p).cos(p));

    section("2. Floats round to the requested digits");
    for digits in [5, 15, 40] {
        let p = Precision::new(digits);
        show(&format!("pi @ {digits}"), Numeral::pi(p));
        show(&format!("1 / 3 @ {digits}"), num("1", p).divide(&num("3", p), p));
        show(&format!("exp(1) @ {digits}"), num("1.0", p).exp(p));
    }

    section("3. Edge cases are errors, not panics");
    let p = Precision::new(10);
    show("1 / 0", num("1", p).divide(&num("0", p), p));
    show("ln(-1)", num("-1", p).ln(p));
    show("arcsin(2)", num("2", p).arc_sin(p));
    show("gcd(1.5, 2)", num("1.5", p).gcd(&num("2", p)));
    show("(-8)^0.5", num("-8", p).power(&num("0.5", p), p));

    section("4. Bases and bits");
    show("ff read in base 16", Numeral::parse("ff", Radix::HEX, p));
    println!("  {:<28} = {}", "48879 written in base 16", num("48879", p).to_string_radix(Radix::HEX));
    show("-6 & 3", num("-6", p).bit_and(&num("3", p)));
    show("1 << 70", num("1", p).shift_left(&num("70", p)));
    println!("  {:<28} = {}", "255 in base 2", num("255", p).to_string_radix(Radix::new(2).unwrap()));

    section("5. The built-in environment");
    let mut env = Environment::with_core_builtins(Arc::new(AtomTable::new()), EnvironmentConfig::from_env());
    env.set_precision(p);
    for (name, args) in [
        ("Add", &["123", "0.5"][..]),
        ("ShiftLeft", &["1", "3"][..]),
        ("GreaterThan", &["10", "9"][..]),
        ("Factorial", &["30"][..]),
    ] {
        match env.call_text(name, args) {
            Ok(text) => println!("  {name}{args:?} = {text}"),
            Err(err) => println!("  {name}{args:?} ! {err}"),
        }
    }

    section("6. Native extensions");
    let mut registry = ExtensionRegistry::from_env();
    match registry.open_named("numera_sample", &mut env) {
        Ok(module) => {
            println!("  opened `{module}`: {:?}", env.names_owned_by(&module));
            for (name, args) in [("SampleDouble", &["21"][..]), ("SampleHypot", &["1", "1"][..])] {
                match env.call_text(name, args) {
                    Ok(text) => println!("  {name}{args:?} = {text}"),
                    Err(err) => println!("  {name}{args:?} ! {err}"),
                }
            }
            registry.close_all(&mut env);
            if let Err(err) = registry.unload(&module) {
                println!("  unload failed: {err}");
            }
        }
        Err(err) => println!("  skipped: {err}"),
    }
}

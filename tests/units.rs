use qformula::{
    check_convertibility,
    error::UnitError,
    parse_unit, split_number_and_unit,
    units::{conversion::UnitConversionRules, lexer::tokenize, parser::parse, unit::Unit},
};

fn unit(text: &str) -> Unit {
    parse_unit(text).unwrap_or_else(|| panic!("'{text}' should be a valid unit"))
}

fn factor(from: &str, to: &str) -> f64 {
    let result = check_convertibility(&unit(from), &unit(to));
    assert!(result.convertible, "'{from}' should convert to '{to}'");
    result.cfactor
}

fn assert_factor(from: &str, to: &str, expected: f64) {
    let cfactor = factor(from, to);
    assert!((cfactor - expected).abs() <= expected.abs() * 1e-12,
            "1 {from} = {cfactor} {to}, expected {expected}");
}

#[test]
fn unit_grammar() {
    let cases = [("m", "m"),
                 ("kg", "kg"),
                 ("m/s", "m s^-1"),
                 ("m / s", "m s^-1"),
                 ("  m  /  s  ", "m s^-1"),
                 ("m\ts", "m s"),
                 ("kg m/s", "kg m s^-1"),
                 ("kg m/s^2", "kg m s^-2"),
                 ("kg m s^-2", "kg m s^-2"),
                 ("m^2", "m^2"),
                 ("m ^ 2", "m^2"),
                 ("m^-2", "m^-2"),
                 ("m^(-2)", "m^-2"),
                 ("m^(+2)", "m^2"),
                 ("m^(2)", "m^2"),
                 ("m^-1 s^(+2)", "m^-1 s^2"),
                 ("kg^12", "kg^12"),
                 ("s^-1", "s^-1"),
                 ("m^2/s", "m^2 s^-1"),
                 ("m/s^-1", "m s"),
                 ("m/(s)", "m s^-1"),
                 ("km/h", "km h^-1"),
                 ("mol/L", "mol L^-1"),
                 ("N m", "N m"),
                 ("J / (m K)", "J m^-1 K^-1"),
                 ("J/(mol K)", "J mol^-1 K^-1"),
                 ("W/(m^2 K^4)", "W m^-2 K^-4"),
                 ("m m", "m^2"),
                 ("m s / m", "s"),
                 ("µm", "µm"),
                 ("μm", "μm"),
                 ("Ω", "Ω"),
                 ("°C", "°C"),
                 ("m m^-1", ""),
                 ("m^0", ""),
                 ("", ""),
                 ("   ", "")];

    for (text, expected) in cases {
        assert_eq!(unit(text).to_string(), expected, "unit '{text}'");
    }

    assert_eq!(unit("µm").factors(), &[("µm".to_string(), 1)]);
    assert!(unit("").is_empty());
}

#[test]
fn rejected_units() {
    let cases = ["m*s",
                 "kg*m/s",
                 "J / m*K",
                 "m**2",
                 "m^^2",
                 "m//s",
                 "m/s/K",
                 "kg m/s /K",
                 "m^2^3",
                 "m^-2^2",
                 "m^1.5",
                 "m^+2",
                 "m^--2",
                 "m^(+-2)",
                 "m^(2",
                 "m^()",
                 "m^(-)",
                 "m^",
                 "s^-",
                 "m^x",
                 "m^99999999999",
                 "^2",
                 "/s",
                 "m)",
                 "(m",
                 "(m s)",
                 "(m/s)^2",
                 "m/",
                 "m/(s",
                 "m/()",
                 "m/(s/K)",
                 "m/s K",
                 "1/s",
                 "2 m",
                 "m 2",
                 "m^2 3",
                 "1000 g m/s",
                 "m-s",
                 "m+s",
                 "m.s",
                 "m,s",
                 "m%",
                 "m $"];

    for text in cases {
        assert!(parse_unit(text).is_none(), "'{text}' should be rejected");
    }
}

#[test]
fn unit_errors() {
    assert_eq!(parse("m^").unwrap_err(), UnitError::UnexpectedEnd);
    assert!(matches!(parse("m*s"), Err(UnitError::UnexpectedInput { offset: 1, .. })));
    assert!(tokenize("m $").is_err());
}

#[test]
fn prefixed_and_derived_conversions() {
    assert_factor("kg m/s", "g m/s", 1000.0);
    assert_factor("km/h", "m/s", 1.0 / 3.6);
    assert_factor("min", "s", 60.0);
    assert_factor("h", "min", 60.0);
    assert_factor("L", "m^3", 0.001);
    assert_factor("mL", "cm^3", 1.0);
    assert_factor("mm^2", "m^2", 1e-6);
    assert_factor("N", "kg m/s^2", 1.0);
    assert_factor("kJ", "N m", 1000.0);
    assert_factor("W", "J/s", 1.0);
    assert_factor("bar", "kPa", 100.0);
    assert_factor("µs", "ns", 1000.0);
    assert_factor("dam", "m", 10.0);
    assert_factor("h", "s", 3600.0);
    assert_factor("N", "kg m s^-2", 1.0);
    assert_factor("cd", "cd", 1.0);
    assert_factor("", "", 1.0);
}

#[test]
fn split_unit_converts() {
    let (number, unit_text) = split_number_and_unit("1000 g m/s");
    assert_eq!(number, "1000");
    assert_factor("kg m/s", &unit_text, 1000.0);
}

#[test]
fn incompatible_or_unknown_units() {
    for (from, to) in [("m", "s"), ("m", ""), ("xyz", "m"), ("kg", "kg m"), ("bar", "kbar"), ("N", "kg m/s"), ("km/h", "m/s^2")] {
        let result = check_convertibility(&unit(from), &unit(to));
        assert!(!result.convertible, "'{from}' should not convert to '{to}'");
        assert_eq!(result.cfactor, 0.0);
    }
}

#[test]
fn builtin_rules_load() {
    let rules = UnitConversionRules::builtin().unwrap_or_else(|e| panic!("built-in rules failed: {e}"));

    for symbol in ["m", "kg", "g", "s", "min", "h", "N", "J", "W", "Pa", "bar", "L", "cd", "km", "µs", "eV"] {
        assert!(rules.is_known(symbol), "'{symbol}' should be a built-in unit");
    }
    assert_eq!(rules, UnitConversionRules::new());
}

#[test]
fn custom_rules() {
    let mut rules = UnitConversionRules::new();
    assert!(!rules.is_known("inch"));

    rules.add_rules("1 inch = 0.0254 m; 1 ft = 12 inch").unwrap();
    assert!(rules.is_known("inch"));

    let result = rules.check_convertibility(&unit("ft"), &unit("cm"));
    assert!(result.convertible);
    assert!((result.cfactor - 30.48).abs() < 1e-9);

    assert!(matches!(rules.add_rules("garbage"), Err(UnitError::InvalidRule { .. })));
    assert!(matches!(rules.add_rules("1 x = 2 parsec"), Err(UnitError::UnknownUnit { .. })));
    assert!(UnitConversionRules::empty().resolve(&unit("m")).is_err());
}

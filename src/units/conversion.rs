use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::{
    error::UnitError,
    units::{parser::parse, unit::Unit},
};

/// SI prefixes with their scale factors.
pub const SI_PREFIXES: &[(&str, f64)] = &[("f", 1e-15),
                                          ("p", 1e-12),
                                          ("n", 1e-9),
                                          ("u", 1e-6),
                                          ("µ", 1e-6),
                                          ("m", 1e-3),
                                          ("c", 1e-2),
                                          ("d", 1e-1),
                                          ("da", 1e1),
                                          ("h", 1e2),
                                          ("k", 1e3),
                                          ("M", 1e6),
                                          ("G", 1e9),
                                          ("T", 1e12),
                                          ("P", 1e15)];

/// The built-in rule set. Base units come first, then units defined in
/// terms of them.
const DEFAULT_RULES: &str = "
    m: f p n u µ m c d da h k M G T P;
    g: f p n u µ m c d da h k M G T P;
    s: f p n u µ m c d da h k M G T P;
    A: f p n u µ m c d da h k M G T P;
    K: f p n u µ m c d da h k M G T P;
    mol: f p n u µ m c d da h k M G T P;
    cd: f p n u µ m c d da h k M G T P;
    1 N = 1000 g m s^-2;
    1 J = 1 N m;
    1 W = 1 J/s;
    1 Pa = 1 N/m^2;
    1 Hz = 1 s^-1;
    1 C = 1 A s;
    1 V = 1 W/A;
    1 Ω = 1 V/A;
    1 Ohm = 1 V/A;
    1 F = 1 C/V;
    1 L = 0.001 m^3;
    1 bar = 100000 Pa;
    1 eV = 1.602176634e-19 J;
    1 t = 1000000 g;
    1 min = 60 s;
    1 h = 3600 s;
    N: f p n u µ m c d da h k M G T P;
    J: f p n u µ m c d da h k M G T P;
    W: f p n u µ m c d da h k M G T P;
    Pa: f p n u µ m c d da h k M G T P;
    Hz: f p n u µ m c d da h k M G T P;
    C: f p n u µ m c d da h k M G T P;
    V: f p n u µ m c d da h k M G T P;
    Ω: f p n u µ m c d da h k M G T P;
    F: f p n u µ m c d da h k M G T P;
    L: f p n u µ m c d da h k M G T P;
    bar: m;
    eV: k M G T;
";

lazy_static! {
    static ref PREFIX_FACTORS: HashMap<&'static str, f64> = SI_PREFIXES.iter().copied().collect();
    static ref DEFAULT_CONVERSION_RULES: Result<UnitConversionRules, UnitError> = {
        let mut rules = UnitConversionRules::empty();
        rules.add_rules(DEFAULT_RULES).map(|()| rules)
    };
}

/// What one unit symbol stands for.
#[derive(Debug, Clone, PartialEq)]
struct UnitDefinition {
    /// Scale relative to the base units.
    factor:   f64,
    /// The symbol expressed in base units.
    base:     Unit,
    /// Prefixes the symbol accepts.
    prefixes: Vec<String>,
}

/// Outcome of comparing two units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Convertibility {
    /// Whether both units measure the same dimension.
    pub convertible: bool,
    /// `1 from = cfactor to`; zero when the units are not convertible.
    pub cfactor:     f64,
}

/// A table of unit symbols, their relations and the prefixes they accept.
///
/// Rules are written as `;`-separated statements:
/// - `sym: p1 p2 ...` declares `sym` a base unit (unless it is already
///   defined) accepting the listed SI prefixes;
/// - `1 sym = factor unit` defines `sym` in terms of known units.
///
/// Symbols are resolved exactly first, so `min` is minutes and `h` hours,
/// and only then as a prefix followed by a known symbol (`km`, `ms`).
///
/// # Example
/// ```
/// use qformula::units::{conversion::UnitConversionRules, parser::parse};
///
/// let rules = UnitConversionRules::new();
/// let result = rules.check_convertibility(&parse("km/h").unwrap(), &parse("m/s").unwrap());
///
/// assert!(result.convertible);
/// assert!((result.cfactor - 1.0 / 3.6).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct UnitConversionRules {
    units: HashMap<String, UnitDefinition>,
}

impl Default for UnitConversionRules {
    fn default() -> Self {
        Self::new()
    }
}

impl UnitConversionRules {
    /// A table with the built-in SI rules, or an empty table if they fail
    /// to load. [`UnitConversionRules::builtin`] reports that failure.
    #[must_use]
    pub fn new() -> Self {
        Self::builtin().unwrap_or_else(|_| Self::empty())
    }

    /// The built-in SI rules.
    ///
    /// # Errors
    /// The first rule of the built-in table that fails to load.
    pub fn builtin() -> Result<Self, UnitError> {
        DEFAULT_CONVERSION_RULES.clone()
    }

    /// A table without any units.
    #[must_use]
    pub fn empty() -> Self {
        Self { units: HashMap::new() }
    }

    /// Adds rules written in the rule syntax. Rules already applied stay
    /// in place if a later rule fails.
    ///
    /// # Errors
    /// `InvalidRule` for statements that follow neither form, and the
    /// resolution error of a definition referring to unknown units.
    pub fn add_rules(&mut self, text: &str) -> Result<(), UnitError> {
        for rule in text.split(';').map(str::trim).filter(|r| !r.is_empty()) {
            if let Some((left, right)) = rule.split_once('=') {
                self.add_definition(rule, left, right)?;
            } else if let Some((symbol, prefixes)) = rule.split_once(':') {
                self.add_prefixes(rule, symbol.trim(), prefixes)?;
            } else {
                return Err(UnitError::InvalidRule { rule: rule.to_string() });
            }
        }
        Ok(())
    }

    fn add_definition(&mut self, rule: &str, left: &str, right: &str) -> Result<(), UnitError> {
        let invalid = || UnitError::InvalidRule { rule: rule.to_string() };

        let symbol = match left.split_whitespace().collect::<Vec<_>>().as_slice() {
            ["1", symbol] if is_symbol(symbol) => (*symbol).to_string(),
            _ => return Err(invalid()),
        };
        let right = right.trim();
        let (factor, unit) = right.split_once(char::is_whitespace).unwrap_or((right, ""));
        let factor = factor.parse::<f64>()
                           .ok()
                           .filter(|f| f.is_finite() && *f > 0.0)
                           .ok_or_else(invalid)?;

        let (scale, base) = self.resolve(&parse(unit)?)?;
        let prefixes = self.units
                           .get(&symbol)
                           .map(|existing| existing.prefixes.clone())
                           .unwrap_or_default();
        self.units.insert(symbol,
                          UnitDefinition { factor: factor * scale,
                                           base,
                                           prefixes });
        Ok(())
    }

    fn add_prefixes(&mut self, rule: &str, symbol: &str, prefixes: &str) -> Result<(), UnitError> {
        if !is_symbol(symbol) {
            return Err(UnitError::InvalidRule { rule: rule.to_string() });
        }
        let prefixes = prefixes.split_whitespace()
                               .map(|p| {
                                   if PREFIX_FACTORS.contains_key(p) {
                                       Ok(p.to_string())
                                   } else {
                                       Err(UnitError::InvalidRule { rule: rule.to_string() })
                                   }
                               })
                               .collect::<Result<Vec<_>, _>>()?;

        let definition = self.units.entry(symbol.to_string()).or_insert_with(|| {
                                                                 let mut base = Unit::new();
                                                                 base.multiply(symbol, 1);
                                                                 UnitDefinition { factor: 1.0,
                                                                                  base,
                                                                                  prefixes: Vec::new() }
                                                             });
        definition.prefixes = prefixes;
        Ok(())
    }

    /// Returns `true` if `symbol` is a known unit, with or without prefix.
    #[must_use]
    pub fn is_known(&self, symbol: &str) -> bool {
        self.lookup(symbol).is_some()
    }

    /// Finds the definition of a symbol and the scale of its prefix.
    fn lookup(&self, symbol: &str) -> Option<(f64, &UnitDefinition)> {
        if let Some(definition) = self.units.get(symbol) {
            return Some((1.0, definition));
        }

        SI_PREFIXES.iter()
                   .filter(|(prefix, _)| symbol.len() > prefix.len() && symbol.starts_with(prefix))
                   .find_map(|(prefix, scale)| {
                       self.units
                           .get(&symbol[prefix.len()..])
                           .filter(|definition| definition.prefixes.iter().any(|p| p == prefix))
                           .map(|definition| (*scale, definition))
                   })
    }

    /// Expresses a unit in base units, returning the scale factor and the
    /// base unit: `1 unit = scale base`.
    ///
    /// # Errors
    /// `UnknownUnit` for the first symbol that cannot be resolved.
    pub fn resolve(&self, unit: &Unit) -> Result<(f64, Unit), UnitError> {
        let mut scale = 1.0;
        let mut base = Unit::new();

        for (symbol, exponent) in unit.factors() {
            let (prefix, definition) = self.lookup(symbol)
                                           .ok_or_else(|| UnitError::UnknownUnit { symbol: symbol.clone() })?;
            scale *= (prefix * definition.factor).powi(*exponent);
            base.multiply_unit(&definition.base, *exponent);
        }

        Ok((scale, base))
    }

    /// Checks whether `from` can be converted into `to` and with which
    /// factor: `1 from = cfactor to`.
    ///
    /// Units with unknown symbols are never convertible.
    ///
    /// # Example
    /// ```
    /// use qformula::units::{conversion::UnitConversionRules, parser::parse};
    ///
    /// let rules = UnitConversionRules::new();
    /// let result = rules.check_convertibility(&parse("kg m/s").unwrap(), &parse("g m/s").unwrap());
    /// assert!(result.convertible);
    /// assert!((result.cfactor - 1000.0).abs() < 1e-9);
    ///
    /// assert!(!rules.check_convertibility(&parse("m").unwrap(), &parse("s").unwrap()).convertible);
    /// ```
    #[must_use]
    pub fn check_convertibility(&self, from: &Unit, to: &Unit) -> Convertibility {
        match (self.resolve(from), self.resolve(to)) {
            (Ok((from_scale, from_base)), Ok((to_scale, to_base))) if from_base.same_dimension(&to_base) => {
                Convertibility { convertible: true,
                                 cfactor:     from_scale / to_scale, }
            },
            _ => Convertibility { convertible: false,
                                  cfactor:     0.0, },
        }
    }
}

fn is_symbol(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_alphabetic() || c == '°' || c == '_')
}

/// A normalized unit: symbols with their integer exponents.
///
/// Factors keep the order in which their symbols first appear. Repeated
/// symbols are merged and factors whose exponents cancel are dropped, so
/// `m s / m` and `s` are the same unit. The empty unit means "no unit".
///
/// # Example
/// ```
/// use qformula::units::unit::Unit;
///
/// let mut unit = Unit::new();
/// unit.multiply("m", 1);
/// unit.multiply("s", -1);
/// unit.multiply("m", 1);
///
/// assert_eq!(unit.factors(), &[("m".to_string(), 2), ("s".to_string(), -1)]);
/// assert_eq!(unit.to_string(), "m^2 s^-1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Unit {
    factors: Vec<(String, i32)>,
}

impl Unit {
    /// The empty unit.
    #[must_use]
    pub const fn new() -> Self {
        Self { factors: Vec::new() }
    }

    /// Multiplies by `symbol^exponent`.
    pub fn multiply(&mut self, symbol: &str, exponent: i32) {
        match self.factors.iter().position(|(s, _)| s == symbol) {
            Some(i) => {
                self.factors[i].1 = self.factors[i].1.saturating_add(exponent);
                if self.factors[i].1 == 0 {
                    self.factors.remove(i);
                }
            },
            None if exponent != 0 => self.factors.push((symbol.to_string(), exponent)),
            None => {},
        }
    }

    /// Multiplies by every factor of `other` raised to `power`.
    pub fn multiply_unit(&mut self, other: &Self, power: i32) {
        for (symbol, exponent) in &other.factors {
            self.multiply(symbol, exponent.saturating_mul(power));
        }
    }

    /// The factors in order of first appearance.
    #[must_use]
    pub fn factors(&self) -> &[(String, i32)] {
        &self.factors
    }

    /// Exponent of `symbol`, zero if absent.
    #[must_use]
    pub fn exponent(&self, symbol: &str) -> i32 {
        self.factors
            .iter()
            .find(|(s, _)| s == symbol)
            .map_or(0, |(_, e)| *e)
    }

    /// Returns `true` for the dimensionless empty unit.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }

    /// Returns `true` if both units have the same factors in any order.
    #[must_use]
    pub fn same_dimension(&self, other: &Self) -> bool {
        self.factors.len() == other.factors.len()
        && self.factors.iter().all(|(symbol, exponent)| other.exponent(symbol) == *exponent)
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts = self.factors
                        .iter()
                        .map(|(symbol, exponent)| {
                            if *exponent == 1 { symbol.clone() } else { format!("{symbol}^{exponent}") }
                        })
                        .collect::<Vec<_>>();
        write!(f, "{}", parts.join(" "))
    }
}

//! Canonical dimension algebra
//!
//! Every physical quantity has a dimension: a product of named atomic
//! dimensions raised to rational powers. Products are kept in a canonical
//! form — unique names, no zero powers, sorted by power then name — so two
//! dimensions are equal exactly when their canonical sequences are equal,
//! regardless of how they were built up.

use std::fmt;
use std::ops::{Div, Mul};

use serde::{Deserialize, Serialize};

use crate::rational::{power, power_ratio, Power};
use crate::symbol::Symbol;

/// One named dimension raised to a rational power.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AtomicDimension {
    /// Dimension name, e.g. `M`, `L`, `T`.
    pub name: Symbol,
    /// Rational exponent; never zero in a canonical sequence.
    pub power: Power,
}

impl AtomicDimension {
    /// A named dimension at the given power.
    #[inline]
    pub fn new(name: Symbol, power: Power) -> Self {
        Self { name, power }
    }
}

/// A canonical product of atomic dimensions.
///
/// Invariants: no two entries share a name, no entry has power zero, and
/// entries are sorted by (power, name). The empty product is the
/// dimensionless dimension.
///
/// Derived dimensions fall out of arithmetic:
/// - Velocity = L T⁻¹
/// - Force = M L T⁻²
/// - Concentration = M L⁻³
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Dimensions {
    atoms: Vec<AtomicDimension>,
}

impl Dimensions {
    /// The dimensionless dimension (empty product).
    #[inline]
    pub fn dimensionless() -> Self {
        Self { atoms: Vec::new() }
    }

    /// A single atomic dimension at power one.
    pub fn base(name: Symbol) -> Self {
        Self {
            atoms: vec![AtomicDimension::new(name, power(1))],
        }
    }

    /// Build from an arbitrary atom list, canonicalizing: powers of
    /// equal-named atoms are summed, zero powers dropped, and the result
    /// sorted by (power, name).
    pub fn from_atoms(atoms: impl IntoIterator<Item = AtomicDimension>) -> Self {
        let mut merged: Vec<AtomicDimension> = Vec::new();
        for atom in atoms {
            match merged.iter_mut().find(|a| a.name == atom.name) {
                Some(existing) => existing.power += atom.power,
                None => merged.push(atom),
            }
        }
        merged.retain(|a| a.power != power(0));
        merged.sort_by(canonical_order);
        Self { atoms: merged }
    }

    /// The canonical atom sequence.
    #[inline]
    pub fn atoms(&self) -> &[AtomicDimension] {
        &self.atoms
    }

    /// Check if dimensionless.
    #[inline]
    pub fn is_dimensionless(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Raise to a rational power (multiplies every atomic power).
    ///
    /// Raising to zero yields the dimensionless dimension.
    pub fn pow(&self, exponent: Power) -> Self {
        if exponent == power(0) {
            return Self::dimensionless();
        }
        let mut atoms: Vec<AtomicDimension> = self
            .atoms
            .iter()
            .map(|a| AtomicDimension::new(a.name, a.power * exponent))
            .collect();
        atoms.sort_by(canonical_order);
        Self { atoms }
    }

    /// Raise to an integer power. Type-stable specialization of [`pow`].
    ///
    /// [`pow`]: Dimensions::pow
    #[inline]
    pub fn powi(&self, exponent: i32) -> Self {
        self.pow(power(exponent))
    }

    /// Reciprocal (negate all exponents).
    #[inline]
    pub fn recip(&self) -> Self {
        self.pow(power(-1))
    }

    /// Square root (halve exponents). Always defined: powers are rational.
    #[inline]
    pub fn sqrt(&self) -> Self {
        self.pow(power_ratio(1, 2))
    }

    /// Cube root.
    #[inline]
    pub fn cbrt(&self) -> Self {
        self.pow(power_ratio(1, 3))
    }
}

/// Canonical total order: descending power, then ascending name. Positive
/// powers come first, which keeps `M L T⁻²`-style renderings stable.
fn canonical_order(a: &AtomicDimension, b: &AtomicDimension) -> std::cmp::Ordering {
    b.power.cmp(&a.power).then(a.name.cmp(&b.name))
}

impl Mul for &Dimensions {
    type Output = Dimensions;

    fn mul(self, rhs: &Dimensions) -> Dimensions {
        Dimensions::from_atoms(self.atoms.iter().chain(rhs.atoms.iter()).copied())
    }
}

impl Mul for Dimensions {
    type Output = Dimensions;

    #[inline]
    fn mul(self, rhs: Dimensions) -> Dimensions {
        &self * &rhs
    }
}

impl Div for &Dimensions {
    type Output = Dimensions;

    fn div(self, rhs: &Dimensions) -> Dimensions {
        self * &rhs.recip()
    }
}

impl Div for Dimensions {
    type Output = Dimensions;

    #[inline]
    fn div(self, rhs: Dimensions) -> Dimensions {
        &self / &rhs
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_dimensionless() {
            return write!(f, "1");
        }
        for (i, atom) in self.atoms.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", atom.name)?;
            write_power(f, atom.power)?;
        }
        Ok(())
    }
}

/// Write a rational exponent after a name: nothing for 1, unicode
/// superscripts for other integers, `^n/d` for fractional powers.
pub(crate) fn write_power(f: &mut fmt::Formatter<'_>, p: Power) -> fmt::Result {
    if p == power(1) {
        Ok(())
    } else if p.is_integer() {
        write!(f, "{}", superscript(p.to_integer()))
    } else {
        write!(f, "^{}/{}", p.numer(), p.denom())
    }
}

/// Convert an integer to a superscript string.
fn superscript(n: i32) -> String {
    let digits: Vec<char> = n.unsigned_abs().to_string().chars().collect();
    let mut result = String::new();

    for d in digits {
        result.push(match d {
            '0' => '⁰',
            '1' => '¹',
            '2' => '²',
            '3' => '³',
            '4' => '⁴',
            '5' => '⁵',
            '6' => '⁶',
            '7' => '⁷',
            '8' => '⁸',
            '9' => '⁹',
            _ => d,
        });
    }

    if n < 0 {
        format!("⁻{}", result)
    } else {
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dim(name: &str) -> Dimensions {
        Dimensions::base(Symbol::intern(name))
    }

    #[test]
    fn test_force_from_mass_and_acceleration() {
        // M × (L T⁻²) = M L T⁻²
        let acceleration = &dim("L") / &dim("T").powi(2);
        let force = &dim("M") * &acceleration;
        let expected = &(&dim("M") * &dim("L")) / &dim("T").powi(2);
        assert_eq!(force, expected);
    }

    #[test]
    fn test_velocity_from_length_and_time() {
        let velocity = &dim("L") / &dim("T");
        assert_eq!(velocity.atoms().len(), 2);
        assert!(!velocity.is_dimensionless());
    }

    #[test]
    fn test_cancellation() {
        let ratio = &dim("L") / &dim("L");
        assert!(ratio.is_dimensionless());
        assert_eq!(ratio, Dimensions::dimensionless());
    }

    #[test]
    fn test_commutative_canonical_form() {
        let a = &(&dim("M") * &dim("L")) * &dim("T").powi(-2);
        let b = &(&dim("T").powi(-2) * &dim("L")) * &dim("M");
        assert_eq!(a, b);
        assert_eq!(a.atoms(), b.atoms());
    }

    #[test]
    fn test_sqrt_of_area() {
        let area = dim("L").powi(2);
        assert_eq!(area.sqrt(), dim("L"));
    }

    #[test]
    fn test_fractional_power_survives() {
        // sqrt(L) has power 1/2, not zero
        let half = dim("L").sqrt();
        assert_eq!(half.atoms()[0].power, power_ratio(1, 2));
        assert_eq!(half.powi(2), dim("L"));
    }

    #[test]
    fn test_recip() {
        let frequency = dim("T").recip();
        assert_eq!(frequency.atoms()[0].power, power(-1));
        assert_eq!(frequency.recip(), dim("T"));
    }

    #[test]
    fn test_pow_zero_is_dimensionless() {
        assert!(dim("M").powi(0).is_dimensionless());
    }

    #[test]
    fn test_display() {
        let force = &(&dim("M") * &dim("L")) / &dim("T").powi(2);
        assert_eq!(format!("{}", force), "L M T⁻²");
        assert_eq!(format!("{}", Dimensions::dimensionless()), "1");
        assert_eq!(format!("{}", dim("L").sqrt()), "L^1/2");
    }
}

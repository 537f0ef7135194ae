//! Canonical unit algebra
//!
//! Units are products of atomic units, each carrying a power-of-ten prefix
//! exponent and a rational power, kept in a canonical form mirroring the
//! dimension algebra. A `Units` value additionally carries one of three
//! promotion flavors:
//!
//! - **Free**: promotion target looked up dynamically in the preference
//!   table.
//! - **Context**: carries an explicit preferred `Units` baked in at
//!   construction.
//! - **Fixed**: refuses implicit conversion to any other unit, even a
//!   dimensionally equal one.
//!
//! Canonical-form determinism guarantees that algebraically equal unit
//! expressions (`m/s * kg/s` vs `kg m s⁻²`) produce structurally identical
//! `Units` values, so equality checks never need numeric comparison.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Div, Mul};

use serde::{Deserialize, Serialize};

use crate::dimension::{write_power, Dimensions};
use crate::error::{Result, UnitError};
use crate::rational::{power, power_ratio, Power};
use crate::registry;
use crate::si::prefixes;
use crate::symbol::Symbol;

/// One named unit with a power-of-ten prefix exponent and a rational power.
///
/// `tens` is the prefix exponent: `km` is the meter atom with `tens = 3`.
/// The registry maps `name` to the unit's dimension and conversion factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AtomicUnit {
    pub name: Symbol,
    pub tens: i32,
    pub power: Power,
}

impl AtomicUnit {
    #[inline]
    pub fn new(name: Symbol, tens: i32, power: Power) -> Self {
        Self { name, tens, power }
    }
}

/// Promotion flavor of a `Units` value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Flavor {
    /// Promotion consults the global preference table.
    #[default]
    Free,
    /// Promotion uses the carried preferred units directly.
    Context(Box<Units>),
    /// No implicit conversion at all; only identical units combine.
    Fixed,
}

/// A canonical product of atomic units, tagged with a promotion flavor.
///
/// Invariants: atoms sharing (name, tens) are merged, zero powers dropped,
/// atoms sorted by (power, tens, name), and `dims` always equals the folded
/// dimension of the atoms — maintained by construction, never by runtime
/// assertion.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Units {
    atoms: Vec<AtomicUnit>,
    dims: Dimensions,
    flavor: Flavor,
}

impl Units {
    /// The unit of dimensionless quantities (empty product).
    pub fn dimensionless() -> Self {
        Self {
            atoms: Vec::new(),
            dims: Dimensions::dimensionless(),
            flavor: Flavor::Free,
        }
    }

    /// A single registered atomic unit at power one. Fails for unknown
    /// names and for affine (offset) names, which cannot participate in
    /// unit products.
    pub fn atom(name: &str) -> Result<Self> {
        registry::unit(name)
    }

    /// Canonicalize an atom list against a known dimension value.
    ///
    /// `dims` must be the folded dimension of `atoms`; callers in this
    /// crate obtain it from the operands (products multiply, powers raise),
    /// which keeps the invariant without a registry lookup per operation.
    pub(crate) fn from_parts(atoms: Vec<AtomicUnit>, dims: Dimensions, flavor: Flavor) -> Self {
        let mut merged: Vec<AtomicUnit> = Vec::new();
        for atom in atoms {
            match merged
                .iter_mut()
                .find(|a| a.name == atom.name && a.tens == atom.tens)
            {
                Some(existing) => existing.power += atom.power,
                None => merged.push(atom),
            }
        }
        merged.retain(|a| a.power != power(0));
        merged.sort_by(canonical_order);
        Self {
            atoms: merged,
            dims,
            flavor,
        }
    }

    /// The canonical atom sequence.
    #[inline]
    pub fn atoms(&self) -> &[AtomicUnit] {
        &self.atoms
    }

    /// The dimension these units measure.
    #[inline]
    pub fn dimensions(&self) -> &Dimensions {
        &self.dims
    }

    /// The promotion flavor.
    #[inline]
    pub fn flavor(&self) -> &Flavor {
        &self.flavor
    }

    #[inline]
    pub fn is_dimensionless(&self) -> bool {
        self.dims.is_dimensionless()
    }

    /// Atom-wise identity, ignoring flavor. This is the equality that
    /// matters for arithmetic fast paths and Fixed-unit identity.
    pub fn same_units(&self, other: &Self) -> bool {
        self.atoms == other.atoms
    }

    /// Free projection: same atoms, promotion metadata dropped.
    pub fn free(mut self) -> Self {
        self.flavor = Flavor::Free;
        self
    }

    /// Fixed flavor: refuse all implicit conversion.
    pub fn fixed(mut self) -> Self {
        self.flavor = Flavor::Fixed;
        self
    }

    /// Context flavor carrying an explicit preferred unit, which must be of
    /// the same dimension.
    pub fn with_context(mut self, preferred: Units) -> Result<Self> {
        if self.dims != *preferred.dimensions() {
            return Err(UnitError::DimensionMismatch {
                left: self.to_string(),
                right: preferred.to_string(),
            });
        }
        self.flavor = Flavor::Context(Box::new(preferred.free()));
        Ok(self)
    }

    /// The unit this value contributes to a Context preferred-product: its
    /// carried preferred units, or itself for Free/Fixed.
    fn preferred_projection(&self) -> Units {
        match &self.flavor {
            Flavor::Context(preferred) => (**preferred).clone(),
            _ => self.clone().free(),
        }
    }

    /// Apply a power-of-ten prefix to a single atomic unit. `km` is
    /// `meter.prefixed(3)`. Composite units cannot take a prefix.
    pub fn prefixed(&self, tens: i32) -> Result<Self> {
        if self.atoms.len() != 1 {
            return Err(UnitError::InvalidPrefix {
                unit: self.to_string(),
                tens,
                reason: "prefixes attach to a single atomic unit",
            });
        }
        let mut atom = self.atoms[0];
        atom.tens += tens;
        Ok(Self {
            atoms: vec![atom],
            dims: self.dims.clone(),
            flavor: self.flavor.clone(),
        })
    }

    /// Raise to a rational power: every atomic power (and, for Context
    /// units, the preferred units) scales by the exponent.
    pub fn pow(&self, exponent: Power) -> Self {
        let atoms = self
            .atoms
            .iter()
            .map(|a| AtomicUnit::new(a.name, a.tens, a.power * exponent))
            .collect();
        let flavor = match &self.flavor {
            Flavor::Context(preferred) => Flavor::Context(Box::new(preferred.pow(exponent))),
            other => other.clone(),
        };
        Self::from_parts(atoms, self.dims.pow(exponent), flavor)
    }

    /// Integer power, type-stable.
    #[inline]
    pub fn powi(&self, exponent: i32) -> Self {
        self.pow(power(exponent))
    }

    #[inline]
    pub fn recip(&self) -> Self {
        self.pow(power(-1))
    }

    #[inline]
    pub fn sqrt(&self) -> Self {
        self.pow(power_ratio(1, 2))
    }

    #[inline]
    pub fn cbrt(&self) -> Self {
        self.pow(power_ratio(1, 3))
    }
}

/// Canonical total order for unit atoms: descending power, then descending
/// prefix exponent, then ascending name.
fn canonical_order(a: &AtomicUnit, b: &AtomicUnit) -> Ordering {
    b.power
        .cmp(&a.power)
        .then(b.tens.cmp(&a.tens))
        .then(a.name.cmp(&b.name))
}

/// Flavor of a unit product: any Fixed operand forfeits promotion
/// metadata; otherwise Context operands carry a preferred-unit product
/// built the same way, with Free operands contributing themselves.
fn combine_flavor(a: &Units, b: &Units) -> Flavor {
    match (&a.flavor, &b.flavor) {
        (Flavor::Fixed, _) | (_, Flavor::Fixed) => Flavor::Fixed,
        (Flavor::Free, Flavor::Free) => Flavor::Free,
        _ => Flavor::Context(Box::new(
            a.preferred_projection() * b.preferred_projection(),
        )),
    }
}

impl Mul for &Units {
    type Output = Units;

    fn mul(self, rhs: &Units) -> Units {
        let flavor = combine_flavor(self, rhs);
        let atoms = self.atoms.iter().chain(rhs.atoms.iter()).copied().collect();
        Units::from_parts(atoms, self.dims.clone() * rhs.dims.clone(), flavor)
    }
}

impl Mul for Units {
    type Output = Units;

    #[inline]
    fn mul(self, rhs: Units) -> Units {
        &self * &rhs
    }
}

impl Div for &Units {
    type Output = Units;

    fn div(self, rhs: &Units) -> Units {
        self * &rhs.recip()
    }
}

impl Div for Units {
    type Output = Units;

    #[inline]
    fn div(self, rhs: Units) -> Units {
        &self / &rhs
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, atom) in self.atoms.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            match prefixes::symbol_for(atom.tens) {
                Some(prefix) => write!(f, "{}", prefix)?,
                None if atom.tens != 0 => write!(f, "10^{}·", atom.tens)?,
                None => {}
            }
            write!(f, "{}", registry::abbr_of(atom.name).unwrap_or(atom.name))?;
            write_power(f, atom.power)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::si;

    #[test]
    fn test_canonical_product_is_order_independent() {
        let si = si::si();
        // m/s * kg/s vs kg * m / s^2
        let a = &(&si.meter / &si.second) * &(&si.kilogram / &si.second);
        let b = &(&si.kilogram * &si.meter) / &si.second.powi(2);
        assert_eq!(a, b);
        assert!(a.same_units(&b));
    }

    #[test]
    fn test_cancellation_to_dimensionless() {
        let si = si::si();
        let ratio = &si.meter / &si.meter;
        assert!(ratio.is_dimensionless());
        assert!(ratio.atoms().is_empty());
    }

    #[test]
    fn test_prefix_does_not_merge_across_tens() {
        let si = si::si();
        // m / km keeps both atoms: same name, different prefix
        let u = &si.meter / &si.kilometer;
        assert_eq!(u.atoms().len(), 2);
        assert!(u.is_dimensionless());
    }

    #[test]
    fn test_prefixed_rejects_composites() {
        let si = si::si();
        let speed = &si.meter / &si.second;
        assert!(matches!(
            speed.prefixed(3),
            Err(UnitError::InvalidPrefix { .. })
        ));
    }

    #[test]
    fn test_sqrt_round_trip() {
        let si = si::si();
        let area = si.meter.powi(2);
        assert_eq!(area.sqrt(), si.meter);
    }

    #[test]
    fn test_fixed_propagates_through_products() {
        let si = si::si();
        let fixed = si.meter.clone().fixed();
        let product = &fixed * &si.second;
        assert_eq!(*product.flavor(), Flavor::Fixed);
    }

    #[test]
    fn test_context_preferred_product() {
        let si = si::si();
        let ctx = si
            .kilometer
            .clone()
            .with_context(si.meter.clone())
            .unwrap();
        let product = &ctx * &si.second;
        match product.flavor() {
            Flavor::Context(preferred) => {
                assert!(preferred.same_units(&(&si.meter * &si.second)));
            }
            other => panic!("expected Context flavor, got {:?}", other),
        }
    }

    #[test]
    fn test_with_context_checks_dimension() {
        let si = si::si();
        assert!(si
            .meter
            .clone()
            .with_context(si.second.clone())
            .is_err());
    }

    #[test]
    fn test_display() {
        let si = si::si();
        let newton_ish = &(&si.kilogram * &si.meter) / &si.second.powi(2);
        assert_eq!(format!("{}", newton_ish), "kg m s⁻²");
        assert_eq!(format!("{}", si.kilometer), "km");
        assert_eq!(format!("{}", Units::dimensionless()), "");
    }
}

//! Promotion policy
//!
//! When an operation needs a single result unit for operands of equal
//! dimension but different composition (addition, ordering, min/max), the
//! policy picks the target:
//!
//! 1. Both Fixed and identical → that unit; both Fixed and different →
//!    conversion prohibited.
//! 2. One Fixed → the Fixed unit wins (nothing converts the Fixed side).
//! 3. Both Context agreeing on a preferred unit → that preferred unit.
//! 4. Context/Context disagreement or Context/Free → fall through to 5 on
//!    the free projections.
//! 5. Both Free → the preference-table product: each atomic dimension maps
//!    to its registered preferred unit, raised to the dimension's power.

use crate::dimension::Dimensions;
use crate::error::{Result, UnitError};
use crate::registry;
use crate::unit::{AtomicUnit, Flavor, Units};

/// The preference-table projection of a dimension: the canonical product of
/// each atomic dimension's preferred unit at that dimension's power. This
/// is the default SI-like target for Free-unit promotion.
pub fn preferred(dims: &Dimensions) -> Result<Units> {
    let mut atoms = Vec::with_capacity(dims.atoms().len());
    for dim in dims.atoms() {
        let pref = registry::preferred_atom(dim.name).ok_or_else(|| UnitError::NoPreferredUnit {
            dimension: dim.name.to_string(),
        })?;
        atoms.push(AtomicUnit::new(pref.name, pref.tens, dim.power));
    }
    Ok(Units::from_parts(atoms, dims.clone(), Flavor::Free))
}

/// For atom-identical operands, the winning flavor: Fixed dominates
/// Context dominates Free; ties keep the left operand.
pub(crate) fn dominant_units(a: &Units, b: &Units) -> Units {
    fn rank(f: &Flavor) -> u8 {
        match f {
            Flavor::Fixed => 2,
            Flavor::Context(_) => 1,
            Flavor::Free => 0,
        }
    }
    if rank(b.flavor()) > rank(a.flavor()) {
        b.clone()
    } else {
        a.clone()
    }
}

/// Pick the unit in which an operation over both operands is carried out.
/// Callers guarantee equal dimensions.
pub(crate) fn promote(a: &Units, b: &Units) -> Result<Units> {
    debug_assert_eq!(a.dimensions(), b.dimensions());
    if a.same_units(b) {
        return Ok(dominant_units(a, b));
    }
    match (a.flavor(), b.flavor()) {
        (Flavor::Fixed, Flavor::Fixed) => {
            if a.same_units(b) {
                Ok(a.clone())
            } else {
                Err(UnitError::ConversionProhibited {
                    from: a.to_string(),
                    to: b.to_string(),
                })
            }
        }
        (Flavor::Fixed, _) => Ok(a.clone()),
        (_, Flavor::Fixed) => Ok(b.clone()),
        (Flavor::Context(pa), Flavor::Context(pb)) if pa.same_units(pb) => Ok((**pa).clone()),
        _ => preferred(a.dimensions()),
    }
}

impl Units {
    /// The preference-table projection of these units' dimension.
    pub fn preferred(&self) -> Result<Units> {
        preferred(self.dimensions())
    }
}

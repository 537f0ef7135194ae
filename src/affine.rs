//! Affine (offset) units
//!
//! Relative scales like Celsius place their zero away from the absolute
//! zero of the dimension. An [`AffineUnits`] pairs a display name with its
//! absolute counterpart unit and an offset expressed in that counterpart:
//! Celsius is kelvin with offset 273.15, Fahrenheit is rankine with offset
//! 459.67. The scale factor of an affine unit is its counterpart's factor
//! by construction.
//!
//! Affine quantities follow interval arithmetic on an absolute scale:
//! adding or subtracting a linear quantity shifts the point and stays
//! affine; subtracting two affine quantities yields a linear difference (a
//! temperature difference, not a temperature); adding two affine
//! quantities has no meaning and fails. Offsets do not compose under
//! multiplication, so `AffineUnits` is deliberately not a `Units` value
//! and affine names are refused as atoms of composite products.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, UnitError};
use crate::factor::convert;
use crate::quantity::Quantity;
use crate::symbol::Symbol;
use crate::unit::Units;

/// A unit with a nonzero zero-point relative to its absolute counterpart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffineUnits {
    name: Symbol,
    abbr: Symbol,
    absolute: Units,
    offset: f64,
}

impl AffineUnits {
    pub(crate) fn new(name: Symbol, abbr: Symbol, absolute: Units, offset: f64) -> Self {
        Self {
            name,
            abbr,
            absolute,
            offset,
        }
    }

    #[inline]
    pub fn name(&self) -> Symbol {
        self.name
    }

    /// The absolute counterpart unit sharing this unit's scale factor.
    #[inline]
    pub fn absolute(&self) -> &Units {
        &self.absolute
    }

    /// Zero-point in the absolute counterpart unit.
    #[inline]
    pub fn offset(&self) -> f64 {
        self.offset
    }
}

impl fmt::Display for AffineUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbr)
    }
}

/// A numeric value on an affine scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffineQuantity {
    value: f64,
    units: AffineUnits,
}

impl AffineQuantity {
    #[inline]
    pub fn new(value: f64, units: AffineUnits) -> Self {
        Self { value, units }
    }

    #[inline]
    pub fn value(&self) -> f64 {
        self.value
    }

    #[inline]
    pub fn units(&self) -> &AffineUnits {
        &self.units
    }

    /// Re-express on the absolute scale: `0 °C` becomes `273.15 K`.
    pub fn to_absolute(&self) -> Quantity {
        Quantity::new(self.value + self.units.offset, self.units.absolute.clone())
    }

    /// Shift by a linear quantity of the same dimension; the point stays on
    /// this affine scale (`0 °C + 5 K = 5 °C`).
    pub fn try_add(&self, delta: &Quantity) -> Result<Self> {
        let delta = convert(&self.units.absolute, delta)?;
        Ok(Self::new(self.value + delta.value(), self.units.clone()))
    }

    /// Shift down by a linear quantity; stays affine.
    pub fn try_sub(&self, delta: &Quantity) -> Result<Self> {
        let delta = convert(&self.units.absolute, delta)?;
        Ok(Self::new(self.value - delta.value(), self.units.clone()))
    }

    /// The difference of two affine points: a linear quantity in this
    /// scale's absolute counterpart unit. `0 °C - 0 °C` is `0 K`.
    pub fn try_sub_affine(&self, other: &Self) -> Result<Quantity> {
        let other = convert_affine(&self.units, other)?;
        Ok(Quantity::new(
            self.value - other.value,
            self.units.absolute.clone(),
        ))
    }

    /// Adding two points of absolute scales is meaningless and fails.
    pub fn try_add_affine(&self, other: &Self) -> Result<Quantity> {
        Err(UnitError::AffineSum {
            left: self.to_string(),
            right: other.to_string(),
        })
    }
}

/// Convert between affine scales of the same dimension through the
/// absolute scale: out = (in + from_offset) · from_scale / to_scale −
/// to_offset.
pub fn convert_affine(to: &AffineUnits, quantity: &AffineQuantity) -> Result<AffineQuantity> {
    let absolute = quantity.to_absolute();
    let in_target_scale = convert(&to.absolute, &absolute)?;
    Ok(AffineQuantity::new(
        in_target_scale.value() - to.offset,
        to.clone(),
    ))
}

/// Re-express a linear (absolute-scale) quantity on an affine scale:
/// `273.15 K` becomes `0 °C`.
pub fn to_affine(to: &AffineUnits, quantity: &Quantity) -> Result<AffineQuantity> {
    let in_target_scale = convert(&to.absolute, quantity)?;
    Ok(AffineQuantity::new(
        in_target_scale.value() - to.offset,
        to.clone(),
    ))
}

impl fmt::Display for AffineQuantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.units)
    }
}

//! Logarithmic quantities: levels and gains
//!
//! A [`Level`] expresses a quantity as a logarithmic ratio against a
//! reference quantity under a named scale (decibel, neper, …). A scale is
//! parameterized by its logarithm base, a prefactor applied to the log of
//! the *power* ratio, and a root-power flag recording whether the scale's
//! native quantity is power-like or amplitude-like.
//!
//! Ratios of root-power (amplitude-like) quantities are squared into the
//! power-ratio convention before taking the logarithm, which is where the
//! familiar `20 log₁₀` for voltage ratios comes from.
//!
//! A [`Gain`] is a bare logarithmic ratio without a reference; multiplying
//! a quantity by a gain attaches the reference and produces a level.

use std::fmt;
use std::ops::Mul;

use serde::{Deserialize, Serialize};

use crate::error::{Result, UnitError};
use crate::factor::convert;
use crate::quantity::Quantity;
use crate::symbol::Symbol;

/// Whether a ratio is of power-like or amplitude-like (root-power)
/// quantities. Dimensionless ratios carry no hint of their own, so the
/// caller always states this explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RatioKind {
    Power,
    RootPower,
}

/// A named logarithmic scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogScale {
    pub name: Symbol,
    pub abbr: Symbol,
    /// Logarithm base.
    pub base: f64,
    /// Multiplier applied to the log of the power ratio.
    pub prefactor: f64,
    /// True when the scale's native quantity is amplitude-like.
    pub root_power: bool,
}

impl LogScale {
    pub fn new(name: &str, abbr: &str, base: f64, prefactor: f64, root_power: bool) -> Self {
        Self {
            name: Symbol::intern(name),
            abbr: Symbol::intern(abbr),
            base,
            prefactor,
            root_power,
        }
    }

    /// The decibel: base 10, prefactor 10 on power ratios.
    pub fn decibel() -> Self {
        Self::new("decibel", "dB", 10.0, 10.0, false)
    }

    /// The neper: base e, amplitude-native; prefactor 1/2 on the power
    /// ratio is ln of the amplitude ratio.
    pub fn neper() -> Self {
        Self::new("neper", "Np", std::f64::consts::E, 0.5, true)
    }

    /// Log value for a power ratio on this scale.
    fn from_power_ratio(&self, ratio: f64) -> f64 {
        self.prefactor * ratio.log(self.base)
    }

    /// Power ratio for a log value on this scale.
    fn to_power_ratio(&self, value: f64) -> f64 {
        self.base.powf(value / self.prefactor)
    }
}

/// A ratio value under a logarithmic scale, relative to a reference
/// quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    scale: LogScale,
    kind: RatioKind,
    reference: Quantity,
    value: f64,
}

impl Level {
    /// Build a level from a numerator/denominator quantity pair. The two
    /// must share a dimension; the denominator becomes the reference.
    pub fn from_ratio(
        scale: LogScale,
        kind: RatioKind,
        numerator: &Quantity,
        reference: &Quantity,
    ) -> Result<Self> {
        if numerator.dimensions() != reference.dimensions() {
            return Err(UnitError::DimensionMismatch {
                left: numerator.to_string(),
                right: reference.to_string(),
            });
        }
        let numerator = convert(reference.units(), numerator)?;
        let ratio = numerator.value() / reference.value();
        let power_ratio = match kind {
            RatioKind::Power => ratio,
            RatioKind::RootPower => ratio * ratio,
        };
        Ok(Self {
            scale,
            kind,
            reference: reference.clone(),
            value: scale.from_power_ratio(power_ratio),
        })
    }

    /// The logarithmic value, e.g. `20.0` for 100 W over 1 W in decibels.
    #[inline]
    pub fn value(&self) -> f64 {
        self.value
    }

    #[inline]
    pub fn scale(&self) -> &LogScale {
        &self.scale
    }

    #[inline]
    pub fn reference(&self) -> &Quantity {
        &self.reference
    }

    /// Back to a linear quantity: reference times the (de-squared, for
    /// root-power ratios) ratio.
    pub fn linear(&self) -> Quantity {
        let power_ratio = self.scale.to_power_ratio(self.value);
        let ratio = match self.kind {
            RatioKind::Power => power_ratio,
            RatioKind::RootPower => power_ratio.sqrt(),
        };
        self.reference.clone() * ratio
    }

    /// Shift a level by a gain on the same scale and kind.
    pub fn try_add_gain(&self, gain: &Gain) -> Result<Self> {
        self.check_scale(gain)?;
        Ok(Self {
            value: self.value + gain.value,
            ..self.clone()
        })
    }

    /// The gain between two levels sharing a scale, kind, and reference.
    pub fn try_sub(&self, other: &Self) -> Result<Gain> {
        if self.scale != other.scale
            || self.kind != other.kind
            || self.reference != other.reference
        {
            return Err(UnitError::ScaleMismatch {
                expected: format!("{} re {}", self.scale.abbr, self.reference),
                found: format!("{} re {}", other.scale.abbr, other.reference),
            });
        }
        Ok(Gain::new(self.scale, self.kind, self.value - other.value))
    }

    fn check_scale(&self, gain: &Gain) -> Result<()> {
        if self.scale != gain.scale || self.kind != gain.kind {
            return Err(UnitError::ScaleMismatch {
                expected: self.scale.abbr.to_string(),
                found: gain.scale.abbr.to_string(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} (re {})", self.value, self.scale.abbr, self.reference)
    }
}

/// A bare logarithmic ratio: a scale, a ratio kind, and a log value, with
/// no reference attached yet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gain {
    scale: LogScale,
    kind: RatioKind,
    value: f64,
}

impl Gain {
    pub fn new(scale: LogScale, kind: RatioKind, value: f64) -> Self {
        Self { scale, kind, value }
    }

    #[inline]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Combine two gains on the same scale (ratios multiply, log values
    /// add).
    pub fn try_add(&self, other: &Self) -> Result<Self> {
        if self.scale != other.scale || self.kind != other.kind {
            return Err(UnitError::ScaleMismatch {
                expected: self.scale.abbr.to_string(),
                found: other.scale.abbr.to_string(),
            });
        }
        Ok(Self::new(self.scale, self.kind, self.value + other.value))
    }
}

impl fmt::Display for Gain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.scale.abbr)
    }
}

/// Attaching a reference quantity to a gain produces a level.
impl Mul<Gain> for Quantity {
    type Output = Level;

    fn mul(self, gain: Gain) -> Level {
        Level {
            scale: gain.scale,
            kind: gain.kind,
            reference: self,
            value: gain.value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::si;

    #[test]
    fn test_decibel_power_ratio() {
        let si = si::si();
        let level = Level::from_ratio(
            LogScale::decibel(),
            RatioKind::Power,
            &(100.0 * &si.watt),
            &(1.0 * &si.watt),
        )
        .unwrap();
        assert!((level.value() - 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_decibel_root_power_squares() {
        let si = si::si();
        let level = Level::from_ratio(
            LogScale::decibel(),
            RatioKind::RootPower,
            &(10.0 * &si.volt),
            &(1.0 * &si.volt),
        )
        .unwrap();
        assert!((level.value() - 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_level_requires_equal_dimensions() {
        let si = si::si();
        assert!(matches!(
            Level::from_ratio(
                LogScale::decibel(),
                RatioKind::Power,
                &(1.0 * &si.watt),
                &(1.0 * &si.volt),
            ),
            Err(UnitError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_linear_round_trip() {
        let si = si::si();
        let reference = 1.0 * &si.watt;
        let level = Level::from_ratio(
            LogScale::decibel(),
            RatioKind::Power,
            &(100.0 * &si.watt),
            &reference,
        )
        .unwrap();
        let back = level.linear();
        assert!((back.value() - 100.0).abs() < 1e-9);
        assert!(back.units().same_units(reference.units()));
    }

    #[test]
    fn test_neper_amplitude() {
        let si = si::si();
        let ratio = std::f64::consts::E;
        let level = Level::from_ratio(
            LogScale::neper(),
            RatioKind::RootPower,
            &(ratio * &si.volt),
            &(1.0 * &si.volt),
        )
        .unwrap();
        assert!((level.value() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_gain_times_quantity() {
        let si = si::si();
        let gain = Gain::new(LogScale::decibel(), RatioKind::Power, 20.0);
        let level = (1.0 * &si.watt) * gain;
        assert_eq!(level.value(), 20.0);
        assert!((level.linear().value() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_gain_addition() {
        let a = Gain::new(LogScale::decibel(), RatioKind::Power, 3.0);
        let b = Gain::new(LogScale::decibel(), RatioKind::Power, 7.0);
        assert_eq!(a.try_add(&b).unwrap().value(), 10.0);
        let neper = Gain::new(LogScale::neper(), RatioKind::RootPower, 1.0);
        assert!(matches!(
            a.try_add(&neper),
            Err(UnitError::ScaleMismatch { .. })
        ));
    }

    #[test]
    fn test_mixed_unit_ratio_converts() {
        let si = si::si();
        // 1 kW over 1 W is 30 dB
        let level = Level::from_ratio(
            LogScale::decibel(),
            RatioKind::Power,
            &(1.0 * &si.kilowatt),
            &(1.0 * &si.watt),
        )
        .unwrap();
        assert!((level.value() - 30.0).abs() < 1e-12);
    }
}

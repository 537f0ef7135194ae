//! Conversion factor engine
//!
//! Relates any two units of equal dimension through a scalar factor. The
//! factor is maintained as an (inexact float, exact rational) pair so that
//! round-trip integer conversions (km → m → km) stay bit-exact while
//! inherently irrational factors (degree → radian) still work. The exact
//! and inexact components are accumulated separately across a unit product
//! and only collapse at application time.

use num_traits::CheckedMul;
use serde::{Deserialize, Serialize};

use crate::error::{Result, UnitError};
use crate::quantity::Quantity;
use crate::rational::{
    checked_pow, checked_pow10, exact_to_f64, power_to_f64, split_power, Exact, Power,
};
use crate::registry;
use crate::unit::{AtomicUnit, Flavor, Units};

/// A conversion factor split into exact and inexact parts. The true factor
/// is the product `inexact * exact`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConversionFactor {
    inexact: f64,
    exact: Exact,
}

impl ConversionFactor {
    /// The identity factor.
    pub fn one() -> Self {
        Self {
            inexact: 1.0,
            exact: Exact::from_integer(1),
        }
    }

    pub fn new(inexact: f64, exact: Exact) -> Self {
        Self { inexact, exact }
    }

    /// True when the factor is a pure rational (no float residue).
    #[inline]
    pub fn is_exact(&self) -> bool {
        self.inexact == 1.0
    }

    /// The (inexact, exact) pair, for re-registration of collapsed factors.
    #[inline]
    pub(crate) fn into_parts(self) -> (f64, Exact) {
        (self.inexact, self.exact)
    }

    /// The factor collapsed to a float.
    pub fn value(&self) -> f64 {
        if self.is_exact() {
            exact_to_f64(self.exact)
        } else {
            self.inexact * exact_to_f64(self.exact)
        }
    }

    /// Multiply two factors. The exact components fold exactly while the
    /// i128 arithmetic holds; on overflow the rational parts demote to the
    /// float component.
    pub fn mul(&self, other: &Self) -> Self {
        match self.exact.checked_mul(&other.exact) {
            Some(exact) => Self {
                inexact: self.inexact * other.inexact,
                exact,
            },
            None => Self {
                inexact: self.value() * other.value(),
                exact: Exact::from_integer(1),
            },
        }
    }

    pub fn recip(&self) -> Self {
        Self {
            inexact: if self.is_exact() {
                1.0
            } else {
                self.inexact.recip()
            },
            exact: self.exact.recip(),
        }
    }

    pub fn div(&self, other: &Self) -> Self {
        self.mul(&other.recip())
    }

    /// Raise to a rational power. Integral exponents keep the exact
    /// component when representable. A fractional exponent splits into its
    /// integer floor (kept exact when possible) and a fractional remainder
    /// that necessarily moves to float space — isolating the representable
    /// exact sub-factor minimizes precision loss.
    pub fn pow(&self, exponent: Power) -> Self {
        if exponent.is_integer() {
            let n = exponent.to_integer();
            return match checked_pow(self.exact, n) {
                Some(exact) => Self {
                    inexact: if self.is_exact() {
                        1.0
                    } else {
                        self.inexact.powi(n)
                    },
                    exact,
                },
                None => Self {
                    inexact: self.value().powi(n),
                    exact: Exact::from_integer(1),
                },
            };
        }
        let (floor, frac) = split_power(exponent);
        match checked_pow(self.exact, floor) {
            Some(exact) => Self {
                inexact: self.inexact.powf(power_to_f64(exponent))
                    * exact_to_f64(self.exact).powf(power_to_f64(frac)),
                exact,
            },
            None => Self {
                inexact: self.value().powf(power_to_f64(exponent)),
                exact: Exact::from_integer(1),
            },
        }
    }

    /// Scale a numeric value by this factor, applying the exact numerator
    /// and denominator separately so integer values convert exactly.
    pub fn apply(&self, value: f64) -> f64 {
        let scaled = value * *self.exact.numer() as f64 / *self.exact.denom() as f64;
        if self.is_exact() {
            scaled
        } else {
            scaled * self.inexact
        }
    }
}

/// Factor of one atomic unit relative to the reference scale of its
/// dimension: the registered per-name factor, times the power-of-ten
/// prefix, all raised to the atom's power.
pub fn basefactor_atom(atom: &AtomicUnit) -> Result<ConversionFactor> {
    let (inexact, exact) = registry::factor_of(atom.name)?;
    let registered = ConversionFactor::new(inexact, exact);
    let prefix = match checked_pow10(atom.tens) {
        Some(tens) => ConversionFactor::new(1.0, tens),
        None => ConversionFactor::new(10f64.powi(atom.tens), Exact::from_integer(1)),
    };
    Ok(registered.mul(&prefix).pow(atom.power))
}

/// Factor of a composite unit: the product of its atoms' factors, exact
/// and inexact parts accumulated separately.
pub fn basefactor(units: &Units) -> Result<ConversionFactor> {
    let mut acc = ConversionFactor::one();
    for atom in units.atoms() {
        acc = acc.mul(&basefactor_atom(atom)?);
    }
    Ok(acc)
}

/// Convert a quantity to the given target units.
///
/// Requires equal dimensions, else `DimensionMismatch`. Fixed-to-Fixed
/// conversion between non-identical units fails unconditionally — there is
/// no unchecked escape in this crate.
pub fn convert(to: &Units, quantity: &Quantity) -> Result<Quantity> {
    let from = quantity.units();
    if from.same_units(to) {
        return Ok(Quantity::from_parts(quantity.value(), to.clone()));
    }
    if from.dimensions() != to.dimensions() {
        return Err(UnitError::DimensionMismatch {
            left: quantity.to_string(),
            right: to.to_string(),
        });
    }
    if matches!(from.flavor(), Flavor::Fixed) && matches!(to.flavor(), Flavor::Fixed) {
        return Err(UnitError::ConversionProhibited {
            from: from.to_string(),
            to: to.to_string(),
        });
    }
    let factor = basefactor(from)?.div(&basefactor(to)?);
    Ok(Quantity::from_parts(
        factor.apply(quantity.value()),
        to.clone(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rational::{exact, power_ratio};
    use crate::si;

    #[test]
    fn test_exact_multiplication() {
        let a = ConversionFactor::new(1.0, exact(1000, 1));
        let b = ConversionFactor::new(1.0, exact(1, 60));
        let c = a.mul(&b);
        assert!(c.is_exact());
        assert_eq!(c.value(), 1000.0 / 60.0);
    }

    #[test]
    fn test_overflow_demotes_to_float() {
        let big = ConversionFactor::new(1.0, exact(i128::MAX / 2, 1));
        let c = big.mul(&big);
        assert!(!c.is_exact());
        assert!(c.value().is_finite());
    }

    #[test]
    fn test_pow_integral_stays_exact() {
        let km = ConversionFactor::new(1.0, exact(1000, 1));
        let cubed = km.pow(crate::rational::power(3));
        assert!(cubed.is_exact());
        assert_eq!(cubed.value(), 1e9);
    }

    #[test]
    fn test_pow_fractional_keeps_integer_floor_exact() {
        let f = ConversionFactor::new(1.0, exact(1000, 1));
        let p = f.pow(power_ratio(3, 2));
        // floor(3/2) = 1 keeps one exact factor of 1000
        assert!((p.value() - 1000f64.powf(1.5)).abs() < 1e-3);
    }

    #[test]
    fn test_km_to_m_is_exact() {
        let si = si::si();
        let km = basefactor(&si.kilometer).unwrap();
        let m = basefactor(&si.meter).unwrap();
        let ratio = km.div(&m);
        assert!(ratio.is_exact());
        assert_eq!(ratio.apply(1.0), 1000.0);
    }

    #[test]
    fn test_degree_factor_is_inexact() {
        let si = si::si();
        let deg = basefactor(&si.degree).unwrap();
        assert!(!deg.is_exact());
        assert!((deg.value() - std::f64::consts::PI / 180.0).abs() < 1e-15);
    }

    #[test]
    fn test_convert_km_round_trip_bit_exact() {
        let si = si::si();
        let q = Quantity::new(1000.0, si.meter.clone());
        let km = convert(&si.kilometer, &q).unwrap();
        assert_eq!(km.value(), 1.0);
        let back = convert(&si.meter, &km).unwrap();
        assert_eq!(back.value(), 1000.0);
    }

    #[test]
    fn test_convert_dimension_mismatch() {
        let si = si::si();
        let q = Quantity::new(1.0, si.meter.clone());
        assert!(matches!(
            convert(&si.second, &q),
            Err(UnitError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_fixed_to_fixed_prohibited() {
        let si = si::si();
        let q = Quantity::new(1.0, si.meter.clone().fixed());
        let target = si.kilometer.clone().fixed();
        assert!(matches!(
            convert(&target, &q),
            Err(UnitError::ConversionProhibited { .. })
        ));
        // identical fixed units are fine
        assert!(convert(&si.meter.clone().fixed(), &q).is_ok());
    }

    #[test]
    fn test_hour_to_second() {
        let si = si::si();
        let q = Quantity::new(2.0, si.hour.clone());
        let s = convert(&si.second, &q).unwrap();
        assert_eq!(s.value(), 7200.0);
    }
}

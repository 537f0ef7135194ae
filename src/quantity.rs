//! Quantities: numeric values paired with units
//!
//! A `Quantity` is an immutable f64 value tagged with canonical `Units`.
//! Arithmetic enforces dimensional compatibility: addition, subtraction,
//! and ordering require equal dimensions and consult the promotion policy
//! when the concrete units disagree; multiplication and division compose
//! units instead and are always legal.
//!
//! Operations that can fail dimensionally are explicit `try_*` methods
//! returning [`Result`]; infallible operations use the standard operator
//! traits.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Div, Mul, Neg};

use serde::{Deserialize, Serialize};

use crate::dimension::Dimensions;
use crate::error::{Result, UnitError};
use crate::factor::{basefactor, convert};
use crate::promote::{dominant_units, promote};
use crate::rational::{power_to_f64, Power};
use crate::unit::{Flavor, Units};

/// A numeric value with units.
///
/// The units carry their dimension, so `dimensions() ==
/// dimension_of(units())` holds by construction.
///
/// # Examples
///
/// ```ignore
/// let si = metron::si::si();
/// let distance = 3.0 * &si.kilometer;
/// let time = 120.0 * &si.second;
/// let speed = distance / time;          // 0.025 km/s
/// let total = distance.try_add(&(500.0 * &si.meter))?;  // 3500 m
/// ```
#[derive(Clone, Serialize, Deserialize)]
pub struct Quantity {
    value: f64,
    units: Units,
}

impl Quantity {
    /// Create a quantity from a value and units.
    #[inline]
    pub fn new(value: f64, units: Units) -> Self {
        Self { value, units }
    }

    /// A bare number as a dimensionless quantity.
    #[inline]
    pub fn dimensionless(value: f64) -> Self {
        Self {
            value,
            units: Units::dimensionless(),
        }
    }

    /// Internal constructor used when units were already computed.
    #[inline]
    pub(crate) fn from_parts(value: f64, units: Units) -> Self {
        Self { value, units }
    }

    /// The raw numeric value in this quantity's own units. Lossy: the unit
    /// tag is dropped.
    #[inline]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Consume into the raw numeric value. Lossy, like [`value`].
    ///
    /// [`value`]: Quantity::value
    #[inline]
    pub fn into_value(self) -> f64 {
        self.value
    }

    /// The units of this quantity.
    #[inline]
    pub fn units(&self) -> &Units {
        &self.units
    }

    /// The dimension of this quantity.
    #[inline]
    pub fn dimensions(&self) -> &Dimensions {
        self.units.dimensions()
    }

    /// Project a dimensionless quantity onto a bare number, resolving any
    /// residual scale (e.g. `100 cm/m` → `1.0`). Fails for dimensioned
    /// quantities.
    pub fn as_scalar(&self) -> Result<f64> {
        Ok(convert(&Units::dimensionless(), self)?.value)
    }

    // ======================================================================
    // Addition / subtraction
    // ======================================================================

    /// Add two quantities of equal dimension, converting through the
    /// promoted unit when the concrete units differ.
    pub fn try_add(&self, rhs: &Self) -> Result<Self> {
        self.linear_op(rhs, |a, b| a + b)
    }

    /// Subtract, with the same promotion rules as [`try_add`].
    ///
    /// [`try_add`]: Quantity::try_add
    pub fn try_sub(&self, rhs: &Self) -> Result<Self> {
        self.linear_op(rhs, |a, b| a - b)
    }

    fn linear_op(&self, rhs: &Self, op: impl Fn(f64, f64) -> f64) -> Result<Self> {
        if self.units.same_units(&rhs.units) {
            let units = dominant_units(&self.units, &rhs.units);
            return Ok(Self::from_parts(op(self.value, rhs.value), units));
        }
        if self.dimensions() != rhs.dimensions() {
            return Err(UnitError::DimensionMismatch {
                left: self.to_string(),
                right: rhs.to_string(),
            });
        }
        let target = promote(&self.units, &rhs.units)?;
        let a = convert(&target, self)?;
        let b = convert(&target, rhs)?;
        Ok(Self::from_parts(op(a.value, b.value), target))
    }

    // ======================================================================
    // Exponentiation
    // ======================================================================

    /// Integer power. Specializes 0, 1 and -1 so small powers never take
    /// the general exponentiation path.
    pub fn powi(&self, n: i32) -> Self {
        match n {
            0 => Self::dimensionless(1.0),
            1 => self.clone(),
            -1 => self.recip(),
            _ => Self::from_parts(self.value.powi(n), self.units.powi(n)),
        }
    }

    /// Rational power.
    pub fn pow(&self, p: Power) -> Self {
        if p.is_integer() {
            self.powi(p.to_integer())
        } else {
            Self::from_parts(self.value.powf(power_to_f64(p)), self.units.pow(p))
        }
    }

    /// Square root: `sqrt(m²)` is exactly `m`, canonical form included.
    pub fn sqrt(&self) -> Self {
        Self::from_parts(self.value.sqrt(), self.units.sqrt())
    }

    /// Cube root.
    pub fn cbrt(&self) -> Self {
        Self::from_parts(self.value.cbrt(), self.units.cbrt())
    }

    /// Reciprocal.
    pub fn recip(&self) -> Self {
        Self::from_parts(self.value.recip(), self.units.recip())
    }

    // ======================================================================
    // Comparison
    // ======================================================================

    /// Compare two quantities of equal dimension, converting to the
    /// promoted unit when the concrete units differ. `None` only when a
    /// value is NaN. Dimensional disagreement is an error: there is no
    /// sensible ordering answer across dimensions.
    pub fn try_partial_cmp(&self, other: &Self) -> Result<Option<Ordering>> {
        if self.units.same_units(&other.units) {
            return Ok(self.value.partial_cmp(&other.value));
        }
        if self.dimensions() != other.dimensions() {
            return Err(UnitError::DimensionMismatch {
                left: self.to_string(),
                right: other.to_string(),
            });
        }
        let target = promote(&self.units, &other.units)?;
        let a = convert(&target, self)?;
        let b = convert(&target, other)?;
        Ok(a.value.partial_cmp(&b.value))
    }

    pub fn try_lt(&self, other: &Self) -> Result<bool> {
        Ok(self.try_partial_cmp(other)? == Some(Ordering::Less))
    }

    pub fn try_le(&self, other: &Self) -> Result<bool> {
        Ok(matches!(
            self.try_partial_cmp(other)?,
            Some(Ordering::Less | Ordering::Equal)
        ))
    }

    pub fn try_gt(&self, other: &Self) -> Result<bool> {
        Ok(self.try_partial_cmp(other)? == Some(Ordering::Greater))
    }

    pub fn try_ge(&self, other: &Self) -> Result<bool> {
        Ok(matches!(
            self.try_partial_cmp(other)?,
            Some(Ordering::Greater | Ordering::Equal)
        ))
    }

    /// Approximate equality under a relative tolerance, compared on a
    /// common scale. Always false across differing dimensions.
    pub fn approx_eq(&self, other: &Self, rtol: f64) -> bool {
        if self.dimensions() != other.dimensions() {
            return false;
        }
        let (Ok(fa), Ok(fb)) = (basefactor(&self.units), basefactor(&other.units)) else {
            return false;
        };
        let a = fa.apply(self.value);
        let b = fb.apply(other.value);
        (a - b).abs() <= rtol * a.abs().max(b.abs())
    }

    /// The smaller operand, returned as it was passed in: the chosen
    /// quantity keeps its own units, only the comparison converts.
    pub fn try_min(&self, other: &Self) -> Result<Self> {
        match self.try_partial_cmp(other)? {
            Some(Ordering::Greater) => Ok(other.clone()),
            _ => Ok(self.clone()),
        }
    }

    /// The larger operand, preserving its unit identity like [`try_min`].
    ///
    /// [`try_min`]: Quantity::try_min
    pub fn try_max(&self, other: &Self) -> Result<Self> {
        match self.try_partial_cmp(other)? {
            Some(Ordering::Less) => Ok(other.clone()),
            _ => Ok(self.clone()),
        }
    }

    /// Clamp into `[min, max]` under converted comparison.
    pub fn try_clamp(&self, min: &Self, max: &Self) -> Result<Self> {
        self.try_max(min)?.try_min(max)
    }

    // ======================================================================
    // Fused multiply-add
    // ======================================================================

    /// `self * y + z` in one fused step. Requires
    /// `dimensions(self) * dimensions(y) == dimensions(z)`; the sum is
    /// computed in the natural product unit of `self` and `y` and the
    /// result expressed in the promotion of that product unit with `z`'s.
    pub fn try_mul_add(&self, y: &Self, z: &Self) -> Result<Self> {
        let prod_units = &self.units * &y.units;
        if prod_units.dimensions() != z.dimensions() {
            return Err(UnitError::DimensionMismatch {
                left: format!("{} × {}", self, y),
                right: z.to_string(),
            });
        }
        let z_conv = convert(&prod_units, z)?;
        let value = self.value.mul_add(y.value, z_conv.value);
        let target = promote(&prod_units, &z.units)?;
        convert(&target, &Self::from_parts(value, prod_units))
    }

    // ======================================================================
    // Float operations
    // ======================================================================

    #[inline]
    pub fn abs(&self) -> Self {
        Self::from_parts(self.value.abs(), self.units.clone())
    }

    #[inline]
    pub fn floor(&self) -> Self {
        Self::from_parts(self.value.floor(), self.units.clone())
    }

    #[inline]
    pub fn ceil(&self) -> Self {
        Self::from_parts(self.value.ceil(), self.units.clone())
    }

    #[inline]
    pub fn round(&self) -> Self {
        Self::from_parts(self.value.round(), self.units.clone())
    }

    #[inline]
    pub fn trunc(&self) -> Self {
        Self::from_parts(self.value.trunc(), self.units.clone())
    }

    #[inline]
    pub fn signum(&self) -> f64 {
        self.value.signum()
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.value == 0.0
    }

    #[inline]
    pub fn is_positive(&self) -> bool {
        self.value > 0.0
    }

    #[inline]
    pub fn is_negative(&self) -> bool {
        self.value < 0.0
    }

    #[inline]
    pub fn is_nan(&self) -> bool {
        self.value.is_nan()
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.value.is_finite()
    }
}

// ==========================================================================
// Equality
// ==========================================================================

/// Equality is a total predicate: operands of differing dimension are
/// unequal rather than erroring, and differing Fixed compositions compare
/// unequal conservatively. Equal-dimension operands compare on a common
/// scale, exactly when both factors are exact.
impl PartialEq for Quantity {
    fn eq(&self, other: &Self) -> bool {
        if self.units.same_units(&other.units) {
            return self.value == other.value;
        }
        if self.dimensions() != other.dimensions() {
            return false;
        }
        if matches!(self.units.flavor(), Flavor::Fixed)
            && matches!(other.units.flavor(), Flavor::Fixed)
        {
            return false;
        }
        let (Ok(fa), Ok(fb)) = (basefactor(&self.units), basefactor(&other.units)) else {
            return false;
        };
        fa.apply(self.value) == fb.apply(other.value)
    }
}

// ==========================================================================
// Operators
// ==========================================================================

impl Mul for &Quantity {
    type Output = Quantity;

    fn mul(self, rhs: &Quantity) -> Quantity {
        Quantity::from_parts(self.value * rhs.value, &self.units * &rhs.units)
    }
}

impl Mul for Quantity {
    type Output = Quantity;

    #[inline]
    fn mul(self, rhs: Quantity) -> Quantity {
        &self * &rhs
    }
}

impl Div for &Quantity {
    type Output = Quantity;

    fn div(self, rhs: &Quantity) -> Quantity {
        Quantity::from_parts(self.value / rhs.value, &self.units / &rhs.units)
    }
}

impl Div for Quantity {
    type Output = Quantity;

    #[inline]
    fn div(self, rhs: Quantity) -> Quantity {
        &self / &rhs
    }
}

impl Neg for Quantity {
    type Output = Quantity;

    fn neg(self) -> Quantity {
        Quantity::from_parts(-self.value, self.units)
    }
}

impl Mul<f64> for Quantity {
    type Output = Quantity;

    fn mul(self, rhs: f64) -> Quantity {
        Quantity::from_parts(self.value * rhs, self.units)
    }
}

impl Mul<Quantity> for f64 {
    type Output = Quantity;

    fn mul(self, rhs: Quantity) -> Quantity {
        Quantity::from_parts(self * rhs.value, rhs.units)
    }
}

impl Div<f64> for Quantity {
    type Output = Quantity;

    fn div(self, rhs: f64) -> Quantity {
        Quantity::from_parts(self.value / rhs, self.units)
    }
}

impl Div<Quantity> for f64 {
    type Output = Quantity;

    fn div(self, rhs: Quantity) -> Quantity {
        Quantity::from_parts(self / rhs.value, rhs.units.recip())
    }
}

/// Quantities are created by multiplying a bare number by a `Units` value.
impl Mul<Units> for f64 {
    type Output = Quantity;

    fn mul(self, rhs: Units) -> Quantity {
        Quantity::new(self, rhs)
    }
}

impl Mul<&Units> for f64 {
    type Output = Quantity;

    fn mul(self, rhs: &Units) -> Quantity {
        Quantity::new(self, rhs.clone())
    }
}

impl Mul<f64> for Units {
    type Output = Quantity;

    fn mul(self, rhs: f64) -> Quantity {
        Quantity::new(rhs, self)
    }
}

impl From<f64> for Quantity {
    fn from(value: f64) -> Self {
        Quantity::dimensionless(value)
    }
}

// ==========================================================================
// Display and Debug
// ==========================================================================

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.units.atoms().is_empty() {
            write!(f, "{}", self.value)
        } else {
            write!(f, "{} {}", self.value, self.units)
        }
    }
}

impl fmt::Debug for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Quantity")
            .field("value", &self.value)
            .field("units", &format_args!("{}", self.units))
            .field("dimensions", &format_args!("{}", self.dimensions()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::si;

    #[test]
    fn test_construction_by_multiplication() {
        let si = si::si();
        let q = 70.0 * &si.kilogram;
        assert_eq!(q.value(), 70.0);
        assert_eq!(format!("{}", q), "70 kg");
    }

    #[test]
    fn test_add_same_units() {
        let si = si::si();
        let sum = (50.0 * &si.kilogram).try_add(&(20.0 * &si.kilogram)).unwrap();
        assert_eq!(sum.value(), 70.0);
    }

    #[test]
    fn test_add_mixed_units_promotes() {
        let si = si::si();
        let sum = (1.0 * &si.meter).try_add(&(1.0 * &si.centimeter)).unwrap();
        assert!(sum.units().same_units(&si.meter));
        assert_eq!(sum.value(), 1.01);
    }

    #[test]
    fn test_add_dimension_mismatch() {
        let si = si::si();
        let err = (1.0 * &si.meter).try_add(&(1.0 * &si.second));
        assert!(matches!(err, Err(UnitError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_mul_composes_units() {
        let si = si::si();
        let force = (2.0 * &si.kilogram) * (3.0 * &(&si.meter / &si.second.powi(2)));
        assert_eq!(force.value(), 6.0);
        assert!(force
            .units()
            .same_units(&(&(&si.kilogram * &si.meter) / &si.second.powi(2))));
    }

    #[test]
    fn test_div_cancels() {
        let si = si::si();
        let ratio = (10.0 * &si.meter) / (2.0 * &si.meter);
        assert!(ratio.units().is_dimensionless());
        assert_eq!(ratio.value(), 5.0);
    }

    #[test]
    fn test_powi_special_cases() {
        let si = si::si();
        let q = 3.0 * &si.meter;
        assert!(q.powi(0).units().is_dimensionless());
        assert_eq!(q.powi(1), q);
        assert_eq!(q.powi(-1).value(), 1.0 / 3.0);
        assert_eq!(q.powi(2).value(), 9.0);
    }

    #[test]
    fn test_sqrt_restores_canonical_unit() {
        let si = si::si();
        let area = 9.0 * &si.meter.powi(2);
        let side = area.sqrt();
        assert_eq!(side.value(), 3.0);
        assert!(side.units().same_units(&si.meter));
    }

    #[test]
    fn test_equality_across_units() {
        let si = si::si();
        assert_eq!(1.0 * &si.kilometer, 1000.0 * &si.meter);
        assert_ne!(1.0 * &si.kilometer, 999.0 * &si.meter);
        // total predicate across dimensions
        assert_ne!(1.0 * &si.meter, 1.0 * &si.second);
    }

    #[test]
    fn test_equality_fixed_conservative() {
        let si = si::si();
        let a = 1.0 * &si.kilometer.clone().fixed();
        let b = 1000.0 * &si.meter.clone().fixed();
        assert_ne!(a, b);
    }

    #[test]
    fn test_ordering_requires_dimension() {
        let si = si::si();
        assert!((1.0 * &si.meter).try_lt(&(1.0 * &si.second)).is_err());
        assert!((1.0 * &si.meter)
            .try_lt(&(200.0 * &si.centimeter))
            .unwrap());
    }

    #[test]
    fn test_min_preserves_operand_identity() {
        let si = si::si();
        let a = 1.0 * &si.kilometer;
        let b = 900.0 * &si.meter;
        let min = a.try_min(&b).unwrap();
        assert!(min.units().same_units(&si.meter));
        assert_eq!(min.value(), 900.0);
        let max = a.try_max(&b).unwrap();
        assert!(max.units().same_units(&si.kilometer));
    }

    #[test]
    fn test_min_fixed_differing_is_conservative() {
        let si = si::si();
        let a = 1.0 * &si.kilometer.clone().fixed();
        let b = 900.0 * &si.meter.clone().fixed();
        assert!(matches!(
            a.try_min(&b),
            Err(UnitError::ConversionProhibited { .. })
        ));
    }

    #[test]
    fn test_mul_add() {
        let si = si::si();
        // 2 m/s * 3 s + 4 m = 10 m
        let v = 2.0 * &(&si.meter / &si.second);
        let t = 3.0 * &si.second;
        let d = 4.0 * &si.meter;
        let result = v.try_mul_add(&t, &d).unwrap();
        assert_eq!(result.value(), 10.0);
        assert!(result.units().same_units(&si.meter));
    }

    #[test]
    fn test_mul_add_dimension_check() {
        let si = si::si();
        let v = 2.0 * &(&si.meter / &si.second);
        let t = 3.0 * &si.second;
        let wrong = 4.0 * &si.second;
        assert!(matches!(
            v.try_mul_add(&t, &wrong),
            Err(UnitError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_as_scalar_resolves_residual_scale() {
        let si = si::si();
        let ratio = (100.0 * &si.centimeter) / (1.0 * &si.meter);
        assert_eq!(ratio.as_scalar().unwrap(), 1.0);
        assert!((1.0 * &si.meter).as_scalar().is_err());
    }

    #[test]
    fn test_approx_eq() {
        let si = si::si();
        let a = 1.0 * &si.kilometer;
        let b = 1000.0000001 * &si.meter;
        assert!(a.approx_eq(&b, 1e-9));
        assert!(!a.approx_eq(&b, 1e-12));
        assert!(!a.approx_eq(&(1.0 * &si.second), 1.0));
    }

    #[test]
    fn test_float_ops() {
        let si = si::si();
        let q = -10.4 * &si.meter;
        assert_eq!(q.abs().value(), 10.4);
        assert_eq!(q.round().value(), -10.0);
        assert_eq!(q.floor().value(), -11.0);
        assert_eq!(q.ceil().value(), -10.0);
        assert!(q.is_negative());
        assert!(q.is_finite());
    }

    #[test]
    fn test_strip_units() {
        let si = si::si();
        let q = 42.0 * &si.second;
        assert_eq!(q.value(), 42.0);
        assert_eq!(q.into_value(), 42.0);
    }
}

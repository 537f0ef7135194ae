//! Rational exponents and exact factor components
//!
//! Dimension and unit powers are rationals so that `sqrt(m²) == m` holds
//! structurally, not just numerically. Exact conversion-factor components
//! are wide rationals that demote to floating point only when the integer
//! arithmetic would overflow.

use num_rational::Ratio;
use num_traits::CheckedMul;

/// Exponent type for dimension and unit powers.
pub type Power = Ratio<i32>;

/// Exact component of a conversion factor.
pub type Exact = Ratio<i128>;

/// An integral exponent as a `Power`.
#[inline]
pub fn power(n: i32) -> Power {
    Ratio::from_integer(n)
}

/// Shorthand for a rational exponent `n/d`.
#[inline]
pub fn power_ratio(n: i32, d: i32) -> Power {
    Ratio::new(n, d)
}

/// The exact rational `n/d`.
#[inline]
pub fn exact(n: i128, d: i128) -> Exact {
    Ratio::new(n, d)
}

/// Lossy view of an exact rational as a float.
#[inline]
pub fn exact_to_f64(r: Exact) -> f64 {
    *r.numer() as f64 / *r.denom() as f64
}

/// Lossy view of a power as a float, for fractional exponentiation.
#[inline]
pub fn power_to_f64(p: Power) -> f64 {
    *p.numer() as f64 / *p.denom() as f64
}

/// `base^exp` without overflow: `None` signals the caller to fall back to
/// floating point. Negative exponents invert first, so the result stays a
/// reduced rational throughout.
pub fn checked_pow(base: Exact, exp: i32) -> Option<Exact> {
    if exp == 0 {
        return Some(Ratio::from_integer(1));
    }
    let positive = if exp < 0 { base.recip() } else { base };
    let mut acc = Ratio::from_integer(1);
    for _ in 0..exp.unsigned_abs() {
        acc = acc.checked_mul(&positive)?;
    }
    Some(acc)
}

/// `10^tens` as an exact rational, when it fits in an `i128`.
pub fn checked_pow10(tens: i32) -> Option<Exact> {
    // i128 holds 10^38; beyond that the factor is carried in float space.
    if tens.unsigned_abs() > 38 {
        return None;
    }
    let mag: i128 = (0..tens.unsigned_abs()).fold(1i128, |acc, _| acc * 10);
    if tens >= 0 {
        Some(Ratio::from_integer(mag))
    } else {
        Some(Ratio::new(1, mag))
    }
}

/// Split a rational exponent into its integer floor and fractional
/// remainder, `p == i + f` with `0 <= f < 1`.
pub fn split_power(p: Power) -> (i32, Power) {
    let floor = p.floor();
    (floor.to_integer(), p - floor)
}

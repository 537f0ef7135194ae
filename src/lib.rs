//! Physical quantity arithmetic with runtime-checked dimensions
//!
//! Values carry a dimension (mass, length, time, …) and a concrete unit
//! (meter, second, …). Operations combining incompatible dimensions fail
//! with a [`UnitError`]; unit products and powers simplify to a canonical
//! form; conversion factors stay exact rationals whenever mathematically
//! possible and fall back to floating point otherwise. Prevents errors
//! like the Mars Climate Orbiter's unit mismatch at the point of the
//! offending operation instead of producing a silently wrong number.
//!
//! # Key features
//!
//! - **Canonical dimensions and units**: algebraically equal expressions
//!   compare structurally equal (`sqrt(m²)` *is* `m`)
//! - **Exactness-preserving conversion**: `1000 m → 1 km → 1000 m` is
//!   bit-exact; π-derived factors degrade gracefully to floats
//! - **Promotion policy**: Free, Context, and Fixed unit flavors control
//!   how mixed-unit arithmetic picks its result unit
//! - **Open registration**: new dimensions and units register into
//!   process-wide tables at initialization, grouped into named provider
//!   modules
//! - **Affine and logarithmic scales**: Celsius/Fahrenheit offsets,
//!   decibel/neper levels and gains
//!
//! # Example
//!
//! ```ignore
//! use metron::si;
//!
//! let si = si::si();
//! let distance = 3.0 * &si.kilometer;
//! let time = 90.0 * &si.second;
//! let speed = distance / time;
//!
//! // 1 m + 1 cm promotes to the preferred unit (meter)
//! let length = (1.0 * &si.meter).try_add(&(1.0 * &si.centimeter))?;
//! assert_eq!(length.value(), 1.01);
//!
//! // 1 m + 1 s fails with a DimensionMismatch
//! assert!((1.0 * &si.meter).try_add(&(1.0 * &si.second)).is_err());
//! ```

pub mod affine;
pub mod dimension;
pub mod error;
pub mod factor;
pub mod level;
pub mod promote;
pub mod quantity;
pub mod registry;
pub mod si;
pub mod symbol;
pub mod unit;

mod rational;

// Re-exports
pub use affine::{convert_affine, to_affine, AffineQuantity, AffineUnits};
pub use dimension::{AtomicDimension, Dimensions};
pub use error::{Result, UnitError};
pub use factor::{basefactor, convert, ConversionFactor};
pub use level::{Gain, Level, LogScale, RatioKind};
pub use promote::preferred;
pub use quantity::Quantity;
pub use rational::{Exact, Power};
pub use registry::{
    lookup_symbol, register_affine_unit, register_constant, register_dimension, register_unit,
    set_preferred, Resolved,
};
pub use symbol::Symbol;
pub use unit::{AtomicUnit, Flavor, Units};

/// Prelude for common imports
pub mod prelude {
    pub use crate::affine::{AffineQuantity, AffineUnits};
    pub use crate::dimension::Dimensions;
    pub use crate::error::{Result, UnitError};
    pub use crate::factor::convert;
    pub use crate::level::{Gain, Level, LogScale, RatioKind};
    pub use crate::quantity::Quantity;
    pub use crate::si::si;
    pub use crate::unit::Units;
}

//! Error types for unit and quantity operations
//!
//! One dominant error kind (dimension mismatch), a refusal kind for fixed
//! units, and a registration-time kind for preferred-unit conflicts. All
//! errors propagate synchronously to the caller; nothing is retried.

use thiserror::Error;

/// Errors raised by the unit algebra, conversion engine, and quantity
/// arithmetic.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UnitError {
    /// Two operands disagree in dimension where equality is required.
    /// Carries both operand renderings for diagnostics.
    #[error("dimension mismatch: `{left}` is not compatible with `{right}`")]
    DimensionMismatch { left: String, right: String },

    /// Fixed-flavored units of differing composition were combined or
    /// compared without an explicit conversion.
    #[error("automatic conversion prohibited: fixed units `{from}` and `{to}` differ")]
    ConversionProhibited { from: String, to: String },

    /// `set_preferred` received a unit that cannot serve as a preferred
    /// unit, or one that collides with an existing registration.
    #[error("preference conflict for dimension `{dimension}`: {reason}")]
    PreferenceConflict { dimension: String, reason: String },

    /// Promotion needed a preferred unit for a dimension that has none.
    #[error("no preferred unit registered for dimension `{dimension}`")]
    NoPreferredUnit { dimension: String },

    /// A unit name with no registry entry.
    #[error("unknown unit `{0}`")]
    UnknownUnit(String),

    /// A dimension name with no registry entry.
    #[error("unknown dimension `{0}`")]
    UnknownDimension(String),

    /// An offset (affine) unit was used where only absolute units are
    /// meaningful, e.g. as a factor in a composite product.
    #[error("affine unit `{0}` cannot appear in a composite unit")]
    AffineComposition(String),

    /// Affine quantities of absolute scales cannot be summed.
    #[error("cannot add two affine quantities (`{left}` + `{right}`)")]
    AffineSum { left: String, right: String },

    /// A power-of-ten prefix was applied where it cannot attach.
    #[error("cannot prefix `{unit}` with 10^{tens}: {reason}")]
    InvalidPrefix {
        unit: String,
        tens: i32,
        reason: &'static str,
    },

    /// Two logarithmic values from different scales (or ratio kinds) were
    /// combined.
    #[error("logarithmic scale mismatch: expected `{expected}`, found `{found}`")]
    ScaleMismatch { expected: String, found: String },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, UnitError>;

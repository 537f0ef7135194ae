//! The built-in SI unit module
//!
//! Registers the SI vocabulary into the global registry on first use and
//! exposes the registered values through a lazily initialized table. All
//! symbols are registered under the provider module `"si"` and are also
//! resolvable through [`crate::registry::lookup_symbol`].

use once_cell::sync::Lazy;

use crate::affine::AffineUnits;
use crate::dimension::Dimensions;
use crate::unit::Units;

mod base;
mod derived;
pub mod prefixes;

/// Name of the built-in provider module.
pub const MODULE: &str = "si";

/// The registered SI vocabulary.
pub struct Si {
    // Base dimensions
    pub mass: Dimensions,
    pub length: Dimensions,
    pub time: Dimensions,
    pub current: Dimensions,
    pub temperature: Dimensions,
    pub amount: Dimensions,
    pub luminosity: Dimensions,

    // Base and prefixed units
    pub gram: Units,
    pub kilogram: Units,
    pub milligram: Units,
    pub meter: Units,
    pub kilometer: Units,
    pub centimeter: Units,
    pub millimeter: Units,
    pub second: Units,
    pub millisecond: Units,
    pub ampere: Units,
    pub kelvin: Units,
    pub mole: Units,
    pub candela: Units,

    // Named derived and accepted units
    pub newton: Units,
    pub joule: Units,
    pub watt: Units,
    pub kilowatt: Units,
    pub pascal: Units,
    pub hertz: Units,
    pub coulomb: Units,
    pub volt: Units,
    pub ohm: Units,
    pub liter: Units,
    pub milliliter: Units,
    pub minute: Units,
    pub hour: Units,
    pub day: Units,
    pub bar: Units,
    pub electronvolt: Units,
    pub radian: Units,
    pub degree: Units,

    // Temperature scales
    pub rankine: Units,
    pub celsius: AffineUnits,
    pub fahrenheit: AffineUnits,
}

static SI: Lazy<Si> = Lazy::new(register);

/// The SI table, registering it on first access.
pub fn si() -> &'static Si {
    &SI
}

fn register() -> Si {
    let base = base::register(MODULE);
    let derived = derived::register(MODULE, &base);

    let single = "single-atom unit takes a prefix";
    Si {
        mass: base.mass,
        length: base.length,
        time: base.time,
        current: base.current,
        temperature: base.temperature,
        amount: base.amount,
        luminosity: base.luminosity,

        milligram: base.gram.prefixed(-3).expect(single),
        kilometer: base.meter.prefixed(3).expect(single),
        centimeter: base.meter.prefixed(-2).expect(single),
        millimeter: base.meter.prefixed(-3).expect(single),
        millisecond: base.second.prefixed(-3).expect(single),
        kilowatt: derived.watt.prefixed(3).expect(single),
        milliliter: derived.liter.prefixed(-3).expect(single),

        gram: base.gram,
        kilogram: base.kilogram,
        meter: base.meter,
        second: base.second,
        ampere: base.ampere,
        kelvin: base.kelvin,
        mole: base.mole,
        candela: base.candela,

        newton: derived.newton,
        joule: derived.joule,
        watt: derived.watt,
        pascal: derived.pascal,
        hertz: derived.hertz,
        coulomb: derived.coulomb,
        volt: derived.volt,
        ohm: derived.ohm,
        liter: derived.liter,
        minute: derived.minute,
        hour: derived.hour,
        day: derived.day,
        bar: derived.bar,
        electronvolt: derived.electronvolt,
        radian: derived.radian,
        degree: derived.degree,

        rankine: derived.rankine,
        celsius: derived.celsius,
        fahrenheit: derived.fahrenheit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{self, Resolved};

    #[test]
    fn test_lookup_by_abbreviation() {
        let _ = si();
        match registry::lookup_symbol(&[MODULE], "m") {
            Some(Resolved::Units(u)) => assert!(u.same_units(&si().meter)),
            other => panic!("expected meter, got {:?}", other),
        }
    }

    #[test]
    fn test_lookup_affine() {
        let _ = si();
        assert!(matches!(
            registry::lookup_symbol(&[MODULE], "°C"),
            Some(Resolved::Affine(_))
        ));
    }

    #[test]
    fn test_lookup_dimension() {
        let _ = si();
        assert!(matches!(
            registry::lookup_symbol(&[MODULE], "Θ"),
            Some(Resolved::Dimensions(_))
        ));
    }

    #[test]
    fn test_newton_measures_force() {
        let si = si();
        let force = &(&si.mass * &si.length) / &si.time.powi(2);
        assert_eq!(*si.newton.dimensions(), force);
    }

    #[test]
    fn test_kilogram_is_prefixed_gram() {
        let si = si();
        assert_eq!(si.kilogram.atoms()[0].name, si.gram.atoms()[0].name);
        assert_eq!(si.kilogram.atoms()[0].tens, 3);
        assert_eq!(format!("{}", si.kilogram), "kg");
    }
}

//! SI base dimensions and units
//!
//! Registers the 7 base quantities — M (mass), L (length), T (time),
//! I (electric current), Θ (thermodynamic temperature), N (amount of
//! substance), J (luminous intensity) — their coherent units, and the
//! default preferred units used by promotion.
//!
//! The mass reference scale is the kilogram, so the gram registers with an
//! exact factor of 1/1000 and `kg` is the gram atom under a `kilo` prefix.

use crate::dimension::Dimensions;
use crate::rational::exact;
use crate::registry;
use crate::unit::Units;

pub(super) struct Base {
    pub mass: Dimensions,
    pub length: Dimensions,
    pub time: Dimensions,
    pub current: Dimensions,
    pub temperature: Dimensions,
    pub amount: Dimensions,
    pub luminosity: Dimensions,

    pub gram: Units,
    pub kilogram: Units,
    pub meter: Units,
    pub second: Units,
    pub ampere: Units,
    pub kelvin: Units,
    pub mole: Units,
    pub candela: Units,
}

pub(super) fn register(module: &str) -> Base {
    let mass = registry::register_dimension(module, "M");
    let length = registry::register_dimension(module, "L");
    let time = registry::register_dimension(module, "T");
    let current = registry::register_dimension(module, "I");
    let temperature = registry::register_dimension(module, "Θ");
    let amount = registry::register_dimension(module, "N");
    let luminosity = registry::register_dimension(module, "J");

    let one = exact(1, 1);
    let gram = registry::register_unit(module, "gram", "g", &mass, 1.0, exact(1, 1000));
    let meter = registry::register_unit(module, "meter", "m", &length, 1.0, one);
    let second = registry::register_unit(module, "second", "s", &time, 1.0, one);
    let ampere = registry::register_unit(module, "ampere", "A", &current, 1.0, one);
    let kelvin = registry::register_unit(module, "kelvin", "K", &temperature, 1.0, one);
    let mole = registry::register_unit(module, "mole", "mol", &amount, 1.0, one);
    let candela = registry::register_unit(module, "candela", "cd", &luminosity, 1.0, one);

    let kilogram = gram.prefixed(3).expect("gram is a single atom");

    for (dim, unit) in [
        ("M", &kilogram),
        ("L", &meter),
        ("T", &second),
        ("I", &ampere),
        ("Θ", &kelvin),
        ("N", &mole),
        ("J", &candela),
    ] {
        registry::set_preferred(dim, unit).expect("base preferences are consistent");
    }

    Base {
        mass,
        length,
        time,
        current,
        temperature,
        amount,
        luminosity,
        gram,
        kilogram,
        meter,
        second,
        ampere,
        kelvin,
        mole,
        candela,
    }
}

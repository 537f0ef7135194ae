//! Named SI derived and accepted units
//!
//! Mechanical and electrical units coherent with the base scale register
//! with a factor of one; accepted non-coherent units (liter, minute, hour,
//! bar, electronvolt) carry exact rational factors. The degree's π/180
//! factor is irrational and registers through the inexact component. The
//! temperature group registers rankine (exactly 5/9 kelvin) and the two
//! affine scales over kelvin and rankine.

use std::f64::consts::PI;

use crate::affine::AffineUnits;
use crate::dimension::Dimensions;
use crate::rational::exact;
use crate::registry;
use crate::unit::Units;

use super::base::Base;

pub(super) struct Derived {
    pub newton: Units,
    pub joule: Units,
    pub watt: Units,
    pub pascal: Units,
    pub hertz: Units,
    pub coulomb: Units,
    pub volt: Units,
    pub ohm: Units,
    pub liter: Units,
    pub minute: Units,
    pub hour: Units,
    pub day: Units,
    pub bar: Units,
    pub electronvolt: Units,
    pub radian: Units,
    pub degree: Units,
    pub rankine: Units,
    pub celsius: AffineUnits,
    pub fahrenheit: AffineUnits,
}

pub(super) fn register(module: &str, base: &Base) -> Derived {
    let one = exact(1, 1);

    let force = &(&base.mass * &base.length) / &base.time.powi(2);
    let energy = &force * &base.length;
    let power = &energy / &base.time;
    let pressure = &force / &base.length.powi(2);
    let frequency = base.time.recip();
    let charge = &base.current * &base.time;
    let potential = &power / &base.current;
    let resistance = &potential / &base.current;
    let volume = base.length.powi(3);

    let newton = registry::register_unit(module, "newton", "N", &force, 1.0, one);
    let joule = registry::register_unit(module, "joule", "J", &energy, 1.0, one);
    let watt = registry::register_unit(module, "watt", "W", &power, 1.0, one);
    let pascal = registry::register_unit(module, "pascal", "Pa", &pressure, 1.0, one);
    let hertz = registry::register_unit(module, "hertz", "Hz", &frequency, 1.0, one);
    let coulomb = registry::register_unit(module, "coulomb", "C", &charge, 1.0, one);
    let volt = registry::register_unit(module, "volt", "V", &potential, 1.0, one);
    let ohm = registry::register_unit(module, "ohm", "Ω", &resistance, 1.0, one);

    let liter = registry::register_unit(module, "liter", "l", &volume, 1.0, exact(1, 1000));
    let minute = registry::register_unit(module, "minute", "min", &base.time, 1.0, exact(60, 1));
    let hour = registry::register_unit(module, "hour", "h", &base.time, 1.0, exact(3600, 1));
    let day = registry::register_unit(module, "day", "d", &base.time, 1.0, exact(86400, 1));
    let bar = registry::register_unit(module, "bar", "bar", &pressure, 1.0, exact(100_000, 1));
    let electronvolt = registry::register_unit(
        module,
        "electronvolt",
        "eV",
        &energy,
        1.0,
        exact(1_602_176_634, 10_000_000_000_000_000_000_000_000_000),
    );

    // Angle is dimensionless; the degree's factor is inherently irrational.
    let dimensionless = Dimensions::dimensionless();
    let radian = registry::register_unit(module, "radian", "rad", &dimensionless, 1.0, one);
    let degree = registry::register_unit(module, "degree", "°", &dimensionless, PI / 180.0, one);

    let rankine =
        registry::register_unit(module, "rankine", "Ra", &base.temperature, 1.0, exact(5, 9));
    let celsius =
        registry::register_affine_unit(module, "degreeCelsius", "°C", &base.kelvin, 273.15)
            .expect("kelvin is registered");
    let fahrenheit =
        registry::register_affine_unit(module, "degreeFahrenheit", "°F", &rankine, 459.67)
            .expect("rankine is registered");

    Derived {
        newton,
        joule,
        watt,
        pascal,
        hertz,
        coulomb,
        volt,
        ohm,
        liter,
        minute,
        hour,
        day,
        bar,
        electronvolt,
        radian,
        degree,
        rankine,
        celsius,
        fahrenheit,
    }
}

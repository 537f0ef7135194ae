//! SI prefixes
//!
//! Power-of-ten prefix exponents and their symbols, plus helpers for
//! applying common prefixes to single-atom units.

use crate::error::Result;
use crate::unit::Units;

/// The full SI prefix ladder: (tens exponent, name, symbol).
pub const PREFIXES: &[(i32, &str, &str)] = &[
    (30, "quetta", "Q"),
    (27, "ronna", "R"),
    (24, "yotta", "Y"),
    (21, "zetta", "Z"),
    (18, "exa", "E"),
    (15, "peta", "P"),
    (12, "tera", "T"),
    (9, "giga", "G"),
    (6, "mega", "M"),
    (3, "kilo", "k"),
    (2, "hecto", "h"),
    (1, "deka", "da"),
    (-1, "deci", "d"),
    (-2, "centi", "c"),
    (-3, "milli", "m"),
    (-6, "micro", "µ"),
    (-9, "nano", "n"),
    (-12, "pico", "p"),
    (-15, "femto", "f"),
    (-18, "atto", "a"),
    (-21, "zepto", "z"),
    (-24, "yocto", "y"),
    (-27, "ronto", "r"),
    (-30, "quecto", "q"),
];

/// Display symbol for a prefix exponent. `None` for zero (no prefix) and
/// for exponents outside the standard ladder.
pub fn symbol_for(tens: i32) -> Option<&'static str> {
    PREFIXES
        .iter()
        .find(|(t, _, _)| *t == tens)
        .map(|(_, _, sym)| *sym)
}

/// Prefix exponent for a symbol, e.g. `"k"` → 3.
pub fn tens_for(symbol: &str) -> Option<i32> {
    PREFIXES
        .iter()
        .find(|(_, _, sym)| *sym == symbol)
        .map(|(t, _, _)| *t)
}

pub fn kilo(unit: &Units) -> Result<Units> {
    unit.prefixed(3)
}

pub fn mega(unit: &Units) -> Result<Units> {
    unit.prefixed(6)
}

pub fn giga(unit: &Units) -> Result<Units> {
    unit.prefixed(9)
}

pub fn centi(unit: &Units) -> Result<Units> {
    unit.prefixed(-2)
}

pub fn milli(unit: &Units) -> Result<Units> {
    unit.prefixed(-3)
}

pub fn micro(unit: &Units) -> Result<Units> {
    unit.prefixed(-6)
}

pub fn nano(unit: &Units) -> Result<Units> {
    unit.prefixed(-9)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::si;

    #[test]
    fn test_symbol_lookup() {
        assert_eq!(symbol_for(3), Some("k"));
        assert_eq!(symbol_for(-6), Some("µ"));
        assert_eq!(symbol_for(0), None);
        assert_eq!(symbol_for(4), None);
        assert_eq!(tens_for("k"), Some(3));
        assert_eq!(tens_for("da"), Some(1));
    }

    #[test]
    fn test_prefix_application() {
        let si = si::si();
        let km = kilo(&si.meter).unwrap();
        assert_eq!(km, si.kilometer);
        let mm = milli(&si.meter).unwrap();
        assert_eq!(format!("{}", mm), "mm");
    }

    #[test]
    fn test_prefixes_stack() {
        let si = si::si();
        // kilo(milli(m)) collapses back to m
        let back = kilo(&milli(&si.meter).unwrap()).unwrap();
        assert_eq!(back, si.meter);
    }
}

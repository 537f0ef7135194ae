//! Interned names for dimensions and units
//!
//! Dimension and unit names form an open, user-extensible set, but each name
//! is registered once and then compared and sorted constantly during
//! canonicalization. Interning gives every name a `'static` lifetime so the
//! atomic building blocks stay `Copy`.

use std::fmt;
use std::sync::Mutex;

use once_cell::sync::Lazy;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

static INTERNER: Lazy<Mutex<FxHashSet<&'static str>>> =
    Lazy::new(|| Mutex::new(FxHashSet::default()));

/// An interned name. Ordering and equality follow string content, so
/// canonical sort orders are stable across processes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(&'static str);

impl Symbol {
    /// Intern a name, returning the shared handle for it.
    ///
    /// Interned strings live for the rest of the process. Names come from
    /// unit/dimension registration, which is bounded, so this never grows
    /// past the registered vocabulary.
    pub fn intern(name: &str) -> Self {
        let mut table = match INTERNER.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(existing) = table.get(name) {
            return Symbol(existing);
        }
        let leaked: &'static str = Box::leak(name.to_owned().into_boxed_str());
        table.insert(leaked);
        Symbol(leaked)
    }

    /// The interned string.
    #[inline]
    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl From<&str> for Symbol {
    fn from(name: &str) -> Self {
        Symbol::intern(name)
    }
}

impl Serialize for Symbol {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.0)
    }
}

impl<'de> Deserialize<'de> for Symbol {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Symbol::intern(&name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_dedup() {
        let a = Symbol::intern("meter");
        let b = Symbol::intern("meter");
        assert_eq!(a, b);
        assert!(std::ptr::eq(a.as_str(), b.as_str()));
    }

    #[test]
    fn test_ordering_is_lexicographic() {
        let l = Symbol::intern("L");
        let m = Symbol::intern("M");
        let t = Symbol::intern("T");
        assert!(l < m && m < t);
    }

    #[test]
    fn test_serde_round_trip() {
        let s = Symbol::intern("kelvin");
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(json, "\"kelvin\"");
        let back: Symbol = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }
}

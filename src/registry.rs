//! Process-wide unit and dimension registration
//!
//! The conversion engine is parameterized by two pieces of shared state:
//! the per-atomic-unit factor table and the preference table consulted
//! during promotion. Both live here, behind a single `RwLock`: writers
//! (registration) take the write lock, readers copy small values out under
//! the read lock, so no caller can observe a partial update. Registration
//! normally happens during module initialization; afterwards the tables
//! are read-mostly.
//!
//! Units are grouped into named modules (providers). Symbol lookup
//! consults modules in most-recently-registered-wins order and warns,
//! non-fatally, on ambiguous collisions.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use crate::affine::AffineUnits;
use crate::dimension::Dimensions;
use crate::error::{Result, UnitError};
use crate::factor;
use crate::quantity::Quantity;
use crate::rational::{power, Exact};
use crate::symbol::Symbol;
use crate::unit::{AtomicUnit, Flavor, Units};

/// Registered data for one atomic unit name.
#[derive(Debug, Clone)]
pub(crate) struct UnitDef {
    pub abbr: Symbol,
    pub dims: Dimensions,
    pub inexact: f64,
    pub exact: Exact,
    /// Zero-point for affine scales, in the absolute counterpart unit.
    /// Offset-carrying names never appear as atoms of composite units.
    pub offset: Option<f64>,
}

/// A value resolved from a textual name.
#[derive(Debug, Clone)]
pub enum Resolved {
    Units(Units),
    Affine(AffineUnits),
    Dimensions(Dimensions),
    Quantity(Quantity),
}

struct UnitModule {
    name: Symbol,
    symbols: FxHashMap<Symbol, Resolved>,
}

#[derive(Default)]
struct Registry {
    units: FxHashMap<Symbol, UnitDef>,
    /// Abbreviation aliases back to canonical names.
    abbrs: FxHashMap<Symbol, Symbol>,
    dimensions: FxHashMap<Symbol, Dimensions>,
    preferred: FxHashMap<Symbol, AtomicUnit>,
    modules: Vec<UnitModule>,
}

static REGISTRY: Lazy<RwLock<Registry>> = Lazy::new(|| RwLock::new(Registry::default()));

fn read() -> RwLockReadGuard<'static, Registry> {
    match REGISTRY.read() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

fn write() -> RwLockWriteGuard<'static, Registry> {
    match REGISTRY.write() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

impl Registry {
    fn module_mut(&mut self, name: Symbol) -> &mut UnitModule {
        if let Some(idx) = self.modules.iter().position(|m| m.name == name) {
            return &mut self.modules[idx];
        }
        self.modules.push(UnitModule {
            name,
            symbols: FxHashMap::default(),
        });
        self.modules.last_mut().expect("just pushed")
    }
}

/// Introduce a new atomic dimension symbol, returning it as a `Dimensions`
/// value at power one. Re-registration is idempotent.
pub fn register_dimension(module: &str, name: &str) -> Dimensions {
    let sym = Symbol::intern(name);
    let dims = Dimensions::base(sym);
    let mut reg = write();
    reg.dimensions.insert(sym, dims.clone());
    reg.module_mut(Symbol::intern(module))
        .symbols
        .insert(sym, Resolved::Dimensions(dims.clone()));
    debug!(module, dimension = name, "registered dimension");
    dims
}

/// Add or overwrite an atomic-unit factor entry. The factor pair relates
/// one of this unit to the reference scale of its dimension; `exact` holds
/// the rational part and `inexact` any irrational residue (1.0 when the
/// factor is fully rational).
pub fn register_unit(
    module: &str,
    name: &str,
    abbr: &str,
    dims: &Dimensions,
    inexact: f64,
    exact: Exact,
) -> Units {
    let sym = Symbol::intern(name);
    let abbr_sym = Symbol::intern(abbr);
    let units = Units::from_parts(
        vec![AtomicUnit::new(sym, 0, power(1))],
        dims.clone(),
        Flavor::Free,
    );
    let mut reg = write();
    reg.units.insert(
        sym,
        UnitDef {
            abbr: abbr_sym,
            dims: dims.clone(),
            inexact,
            exact,
            offset: None,
        },
    );
    reg.abbrs.insert(abbr_sym, sym);
    let module_entry = reg.module_mut(Symbol::intern(module));
    module_entry
        .symbols
        .insert(sym, Resolved::Units(units.clone()));
    module_entry
        .symbols
        .insert(abbr_sym, Resolved::Units(units.clone()));
    debug!(module, unit = name, abbr, "registered unit");
    units
}

/// Register an affine (offset) unit over an absolute counterpart. The
/// affine unit's scale factor is the absolute unit's factor by
/// construction; `offset` is its zero-point expressed in that absolute
/// unit (Celsius: kelvin, 273.15).
pub fn register_affine_unit(
    module: &str,
    name: &str,
    abbr: &str,
    absolute: &Units,
    offset: f64,
) -> Result<AffineUnits> {
    let (inexact, exact) = factor::basefactor(absolute)?.into_parts();
    let sym = Symbol::intern(name);
    let abbr_sym = Symbol::intern(abbr);
    let affine = AffineUnits::new(sym, abbr_sym, absolute.clone(), offset);
    let mut reg = write();
    reg.units.insert(
        sym,
        UnitDef {
            abbr: abbr_sym,
            dims: absolute.dimensions().clone(),
            inexact,
            exact,
            offset: Some(offset),
        },
    );
    reg.abbrs.insert(abbr_sym, sym);
    let module_entry = reg.module_mut(Symbol::intern(module));
    module_entry
        .symbols
        .insert(sym, Resolved::Affine(affine.clone()));
    module_entry
        .symbols
        .insert(abbr_sym, Resolved::Affine(affine.clone()));
    debug!(module, unit = name, abbr, offset, "registered affine unit");
    Ok(affine)
}

/// Register a named constant quantity, resolvable through `lookup_symbol`.
pub fn register_constant(module: &str, name: &str, quantity: &Quantity) {
    let sym = Symbol::intern(name);
    let mut reg = write();
    reg.module_mut(Symbol::intern(module))
        .symbols
        .insert(sym, Resolved::Quantity(quantity.clone()));
    debug!(module, constant = name, "registered constant");
}

/// Set the preferred unit for an atomic dimension, consulted by promotion
/// for Free units.
///
/// Constraints enforced here, at registration time: the unit must be a
/// single atomic unit at power one whose dimension is exactly the named
/// atomic dimension at power one; affine units are rejected; a dimension
/// that already has a different preferred unit conflicts.
pub fn set_preferred(dimension: &str, unit: &Units) -> Result<()> {
    let dim_sym = Symbol::intern(dimension);
    let rendered = unit.to_string();
    let atom = match unit.atoms() {
        [single] if single.power == power(1) => *single,
        _ => {
            return Err(UnitError::PreferenceConflict {
                dimension: dimension.to_owned(),
                reason: format!("`{rendered}` is not a single atomic unit at power 1"),
            })
        }
    };
    if *unit.dimensions() != Dimensions::base(dim_sym) {
        return Err(UnitError::PreferenceConflict {
            dimension: dimension.to_owned(),
            reason: format!(
                "`{rendered}` measures {}, not the atomic dimension {dimension}",
                unit.dimensions()
            ),
        });
    }
    let mut reg = write();
    if reg
        .units
        .get(&atom.name)
        .is_some_and(|def| def.offset.is_some())
    {
        return Err(UnitError::PreferenceConflict {
            dimension: dimension.to_owned(),
            reason: format!("affine unit `{rendered}` cannot be a preferred unit"),
        });
    }
    match reg.preferred.get(&dim_sym) {
        Some(existing) if *existing != atom => Err(UnitError::PreferenceConflict {
            dimension: dimension.to_owned(),
            reason: format!("dimension already has a preferred unit `{}`", existing.name),
        }),
        _ => {
            reg.preferred.insert(dim_sym, atom);
            Ok(())
        }
    }
}

/// The preferred atomic unit for a dimension name, if registered.
pub(crate) fn preferred_atom(dimension: Symbol) -> Option<AtomicUnit> {
    read().preferred.get(&dimension).copied()
}

/// The registered factor pair for a unit name.
pub(crate) fn factor_of(name: Symbol) -> Result<(f64, Exact)> {
    read()
        .units
        .get(&name)
        .map(|def| (def.inexact, def.exact))
        .ok_or_else(|| UnitError::UnknownUnit(name.to_string()))
}

/// Display abbreviation for a unit name.
pub(crate) fn abbr_of(name: Symbol) -> Option<Symbol> {
    read().units.get(&name).map(|def| def.abbr)
}

/// Resolve a registered dimension name.
pub fn dimension(name: &str) -> Result<Dimensions> {
    let sym = Symbol::intern(name);
    read()
        .dimensions
        .get(&sym)
        .cloned()
        .ok_or_else(|| UnitError::UnknownDimension(name.to_owned()))
}

/// Resolve a unit name or abbreviation to a single-atom `Units` value.
/// Affine names are refused: offsets cannot enter unit products.
pub fn unit(name: &str) -> Result<Units> {
    let sym = Symbol::intern(name);
    let (canonical, def) = {
        let reg = read();
        let canonical = match reg.units.get(&sym) {
            Some(_) => sym,
            None => *reg
                .abbrs
                .get(&sym)
                .ok_or_else(|| UnitError::UnknownUnit(name.to_owned()))?,
        };
        let def = reg
            .units
            .get(&canonical)
            .ok_or_else(|| UnitError::UnknownUnit(name.to_owned()))?
            .clone();
        (canonical, def)
    };
    if def.offset.is_some() {
        return Err(UnitError::AffineComposition(name.to_owned()));
    }
    Ok(Units::from_parts(
        vec![AtomicUnit::new(canonical, 0, power(1))],
        def.dims,
        Flavor::Free,
    ))
}

/// Resolve a textual name against the given modules, most recently
/// registered first. Ambiguous collisions warn (non-fatally) and resolve
/// to the most recent registration.
pub fn lookup_symbol(context: &[&str], name: &str) -> Option<Resolved> {
    let sym = Symbol::intern(name);
    let context: Vec<Symbol> = context.iter().map(|m| Symbol::intern(m)).collect();
    let reg = read();
    let mut hits: Vec<(Symbol, Resolved)> = Vec::new();
    for module in reg.modules.iter().rev() {
        if !context.contains(&module.name) {
            continue;
        }
        if let Some(resolved) = module.symbols.get(&sym) {
            hits.push((module.name, resolved.clone()));
        }
    }
    drop(reg);
    if hits.len() > 1 {
        let providers: Vec<&str> = hits.iter().map(|(m, _)| m.as_str()).collect();
        warn!(
            symbol = name,
            ?providers,
            "ambiguous symbol; resolving to most recent registration"
        );
    }
    hits.into_iter().next().map(|(_, resolved)| resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rational::exact;
    use crate::si;

    #[test]
    fn test_register_and_resolve_custom_unit() {
        let si = si::si();
        // furlong: 201.168 m exactly = 25146/125 m
        let furlong = register_unit(
            "test_registry",
            "furlong_test",
            "fur_t",
            &si.length,
            1.0,
            exact(25146, 125),
        );
        let by_name = unit("furlong_test").unwrap();
        let by_abbr = unit("fur_t").unwrap();
        assert!(furlong.same_units(&by_name));
        assert!(furlong.same_units(&by_abbr));
    }

    #[test]
    fn test_unknown_unit() {
        assert!(matches!(
            unit("no_such_unit"),
            Err(UnitError::UnknownUnit(_))
        ));
    }

    #[test]
    fn test_dimension_resolution() {
        let si = si::si();
        assert_eq!(dimension("L").unwrap(), si.length);
        assert!(matches!(
            dimension("no_such_dim"),
            Err(UnitError::UnknownDimension(_))
        ));
    }

    #[test]
    fn test_affine_name_refused_as_atom() {
        let _ = si::si();
        assert!(matches!(
            unit("degreeCelsius"),
            Err(UnitError::AffineComposition(_))
        ));
    }

    #[test]
    fn test_set_preferred_rejects_composite() {
        let si = si::si();
        let speed = &si.meter / &si.second;
        assert!(matches!(
            set_preferred("L", &speed),
            Err(UnitError::PreferenceConflict { .. })
        ));
    }

    #[test]
    fn test_set_preferred_rejects_powered() {
        let si = si::si();
        assert!(matches!(
            set_preferred("L", &si.meter.powi(2)),
            Err(UnitError::PreferenceConflict { .. })
        ));
    }

    #[test]
    fn test_set_preferred_idempotent_for_same_unit() {
        let si = si::si();
        assert!(set_preferred("L", &si.meter).is_ok());
    }

    #[test]
    fn test_set_preferred_conflict_on_duplicate() {
        let si = si::si();
        assert!(matches!(
            set_preferred("L", &si.kilometer),
            Err(UnitError::PreferenceConflict { .. })
        ));
    }

    #[test]
    fn test_lookup_most_recent_wins() {
        let si = si::si();
        let older = Quantity::new(9.80665, &si.meter / &si.second.powi(2));
        let newer = Quantity::new(9.81, &si.meter / &si.second.powi(2));
        register_constant("test_lookup_a", "g0_test", &older);
        register_constant("test_lookup_b", "g0_test", &newer);
        let resolved = lookup_symbol(&["test_lookup_a", "test_lookup_b"], "g0_test");
        match resolved {
            Some(Resolved::Quantity(q)) => assert_eq!(q.value(), 9.81),
            other => panic!("expected constant, got {:?}", other),
        }
    }

    #[test]
    fn test_lookup_respects_context() {
        let si = si::si();
        register_unit(
            "test_ctx_only",
            "cubit_test",
            "cb_t",
            &si.length,
            1.0,
            exact(4572, 10000),
        );
        assert!(lookup_symbol(&["si"], "cubit_test").is_none());
        assert!(lookup_symbol(&["test_ctx_only"], "cubit_test").is_some());
    }
}

use std::collections::HashSet;

use javelin_ids::{ClassId, TypeVarId};

use crate::bindings::VariableBindingMap;
use crate::descriptor::{ParameterizedType, TypeDescriptor, WildcardType};
use crate::store::{ClassKind, TypeUniverse};

/// Depth budget for assignability recursion. Generic bound graphs may be
/// self-referential (`T extends Comparable<T>`), so every recursive path
/// burns fuel and degrades permissively at zero instead of diverging.
pub(crate) const ASSIGN_FUEL: usize = 64;

/// Step budget for one super-type chain walk.
const WALK_BUDGET: usize = 256;

/// Generic assignability: `source` may be used where `target` is expected.
///
/// This is stronger than raw-class assignability — parameterized targets
/// compare their arguments invariantly, with wildcard targets relaxed to
/// bound satisfaction — but keeps erasure compatibility: a raw use of a
/// generic class accepts (and is accepted by) any of its parameterizations.
pub fn is_assignable_from(
    universe: &dyn TypeUniverse,
    target: &TypeDescriptor,
    source: &TypeDescriptor,
) -> bool {
    assignable(universe, target, source, ASSIGN_FUEL)
}

/// Mirror of [`is_assignable_from`] with the receiver on the source side.
pub fn is_assignable_to(
    universe: &dyn TypeUniverse,
    source: &TypeDescriptor,
    target: &TypeDescriptor,
) -> bool {
    assignable(universe, target, source, ASSIGN_FUEL)
}

pub(crate) fn assignable(
    universe: &dyn TypeUniverse,
    target: &TypeDescriptor,
    source: &TypeDescriptor,
    fuel: usize,
) -> bool {
    if target == source {
        return true;
    }
    let Some(fuel) = fuel.checked_sub(1) else {
        // Past the ceiling the check is approximated as unbounded.
        return true;
    };
    match target {
        TypeDescriptor::Wildcard(w) => satisfies_wildcard(universe, source, w, fuel),
        TypeDescriptor::Variable(var) => variable_accepts(universe, *var, source, fuel),
        TypeDescriptor::GenericArray(component) => {
            array_accepts(universe, component, source, fuel)
        }
        TypeDescriptor::Raw(class) => raw_accepts(universe, *class, source, fuel),
        TypeDescriptor::Parameterized(p) => parameterized_accepts(universe, p, source, fuel),
    }
}

/// `candidate` fits within the wildcard's bounds: assignable-to every upper
/// bound (implicitly `Object` when the list is empty) and assignable-from
/// every lower bound.
pub(crate) fn satisfies_wildcard(
    universe: &dyn TypeUniverse,
    candidate: &TypeDescriptor,
    wildcard: &WildcardType,
    fuel: usize,
) -> bool {
    let object = TypeDescriptor::Raw(universe.well_known().object);
    let uppers: &[TypeDescriptor] = if wildcard.upper.is_empty() {
        std::slice::from_ref(&object)
    } else {
        &wildcard.upper
    };
    uppers
        .iter()
        .all(|upper| assignable(universe, upper, candidate, fuel))
        && wildcard
            .lower
            .iter()
            .all(|lower| assignable(universe, candidate, lower, fuel))
}

/// A type variable only accepts itself or a variable whose declared bounds
/// reach it; matching concrete types against a variable is instantiation's
/// job, not assignability's.
fn variable_accepts(
    universe: &dyn TypeUniverse,
    var: TypeVarId,
    source: &TypeDescriptor,
    fuel: usize,
) -> bool {
    let TypeDescriptor::Variable(src) = source else {
        return false;
    };
    if *src == var {
        return true;
    }
    universe.type_param(*src).is_some_and(|param| {
        param
            .upper_bounds
            .iter()
            .any(|bound| assignable(universe, &TypeDescriptor::Variable(var), bound, fuel))
    })
}

fn array_accepts(
    universe: &dyn TypeUniverse,
    component: &TypeDescriptor,
    source: &TypeDescriptor,
    fuel: usize,
) -> bool {
    match source {
        // Reference arrays are covariant in their component.
        TypeDescriptor::GenericArray(src) => assignable(universe, component, src, fuel),
        TypeDescriptor::Raw(class) => match universe.class(*class).and_then(|def| def.component) {
            Some(src_component) => {
                assignable(universe, component, &TypeDescriptor::Raw(src_component), fuel)
            }
            None => false,
        },
        _ => false,
    }
}

fn raw_accepts(
    universe: &dyn TypeUniverse,
    target: ClassId,
    source: &TypeDescriptor,
    fuel: usize,
) -> bool {
    let wk = universe.well_known();
    match source {
        TypeDescriptor::Raw(src) => raw_class_assignable(universe, target, *src, fuel),
        // Erasure compatibility: any parameterization of a subtype fits.
        TypeDescriptor::Parameterized(p) => raw_class_assignable(universe, target, p.raw, fuel),
        TypeDescriptor::Variable(var) => match universe.type_param(*var) {
            Some(param) if !param.upper_bounds.is_empty() => param
                .upper_bounds
                .iter()
                .any(|bound| assignable(universe, &TypeDescriptor::Raw(target), bound, fuel)),
            _ => target == wk.object,
        },
        TypeDescriptor::Wildcard(w) => {
            if w.upper.is_empty() {
                target == wk.object
            } else {
                w.upper
                    .iter()
                    .any(|bound| assignable(universe, &TypeDescriptor::Raw(target), bound, fuel))
            }
        }
        TypeDescriptor::GenericArray(component) => {
            if target == wk.object || target == wk.cloneable || target == wk.serializable {
                return true;
            }
            match universe.class(target).and_then(|def| def.component) {
                Some(target_component) => {
                    assignable(universe, &TypeDescriptor::Raw(target_component), component, fuel)
                }
                None => false,
            }
        }
    }
}

fn raw_class_assignable(
    universe: &dyn TypeUniverse,
    target: ClassId,
    source: ClassId,
    fuel: usize,
) -> bool {
    if target == source {
        return true;
    }
    let wk = universe.well_known();
    // Primitive/wrapper pairs are cross-assignable in both directions.
    if wk.boxed(source) == Some(target) || wk.unboxed(source) == Some(target) {
        return true;
    }
    let Some(src_def) = universe.class(source) else {
        return false;
    };
    if src_def.kind == ClassKind::Primitive {
        return false;
    }
    if target == wk.object {
        return true;
    }
    if let Some(src_component) = src_def.component {
        if target == wk.cloneable || target == wk.serializable {
            return true;
        }
        // Raw array covariance.
        return match universe.class(target).and_then(|def| def.component) {
            Some(target_component) => raw_class_assignable(
                universe,
                target_component,
                src_component,
                fuel.saturating_sub(1),
            ),
            None => false,
        };
    }
    super_chain_contains(universe, source, target, fuel)
}

fn super_chain_contains(
    universe: &dyn TypeUniverse,
    from: ClassId,
    target: ClassId,
    fuel: usize,
) -> bool {
    if fuel == 0 {
        return true;
    }
    let Some(def) = universe.class(from) else {
        return false;
    };
    let mut supers: Vec<ClassId> = Vec::new();
    if let Some(super_class) = &def.super_class {
        supers.extend(super_class.raw_class());
    }
    for iface in &def.interfaces {
        supers.extend(iface.raw_class());
    }
    supers
        .iter()
        .any(|s| *s == target || super_chain_contains(universe, *s, target, fuel - 1))
}

fn parameterized_accepts(
    universe: &dyn TypeUniverse,
    target: &ParameterizedType,
    source: &TypeDescriptor,
    fuel: usize,
) -> bool {
    match source {
        TypeDescriptor::Raw(_) | TypeDescriptor::Parameterized(_) => {}
        TypeDescriptor::Variable(var) => {
            let target = TypeDescriptor::Parameterized(target.clone());
            return universe.type_param(*var).is_some_and(|param| {
                param
                    .upper_bounds
                    .iter()
                    .any(|bound| assignable(universe, &target, bound, fuel))
            });
        }
        TypeDescriptor::Wildcard(w) => {
            let target = TypeDescriptor::Parameterized(target.clone());
            return w
                .upper
                .iter()
                .any(|bound| assignable(universe, &target, bound, fuel));
        }
        TypeDescriptor::GenericArray(_) => return false,
    }

    let Some(viewed) = view_as(universe, source, target.raw) else {
        return false;
    };
    match viewed {
        // The source reaches the target's raw class only in raw (erased)
        // form; legacy raw usage is compatible with any instantiation.
        TypeDescriptor::Raw(_) => true,
        TypeDescriptor::Parameterized(p) => {
            target.args.len() == p.args.len()
                && target
                    .args
                    .iter()
                    .zip(&p.args)
                    .all(|(t, s)| argument_compatible(universe, t, s, fuel))
        }
        _ => false,
    }
}

/// Generic arguments are invariant; only a wildcard target relaxes identity
/// to bound satisfaction.
fn argument_compatible(
    universe: &dyn TypeUniverse,
    target_arg: &TypeDescriptor,
    source_arg: &TypeDescriptor,
    fuel: usize,
) -> bool {
    if target_arg == source_arg {
        return true;
    }
    match target_arg {
        TypeDescriptor::Wildcard(w) => satisfies_wildcard(universe, source_arg, w, fuel),
        _ => false,
    }
}

/// View `source` as an instantiation of `target` by walking its super-type
/// chain (superclass first, then interfaces, depth-first), substituting type
/// arguments along the way. Raw instantiations stay raw — their supertype
/// arguments cannot be recovered.
fn view_as(
    universe: &dyn TypeUniverse,
    source: &TypeDescriptor,
    target: ClassId,
) -> Option<TypeDescriptor> {
    let object = universe.well_known().object;
    let mut stack: Vec<TypeDescriptor> = vec![source.clone()];
    let mut seen: HashSet<TypeDescriptor> = HashSet::new();
    let mut steps = WALK_BUDGET;

    while let Some(current) = stack.pop() {
        if steps == 0 {
            return None;
        }
        steps -= 1;

        let (raw, args) = match &current {
            TypeDescriptor::Raw(class) => (*class, &[][..]),
            TypeDescriptor::Parameterized(p) => (p.raw, &p.args[..]),
            _ => continue,
        };
        if !seen.insert(current.clone()) {
            continue;
        }
        if raw == target {
            return Some(current);
        }
        let Some(def) = universe.class(raw) else {
            continue;
        };

        // Push order is reversed so the superclass pops first, then the
        // interfaces in declaration order, then the implicit Object supertype
        // of interfaces (JLS 4.10.2).
        if def.kind == ClassKind::Interface {
            stack.push(TypeDescriptor::Raw(object));
        }

        if args.is_empty() && !def.type_params.is_empty() {
            // Raw usage: walk supertypes erased.
            for iface in def.interfaces.iter().rev() {
                if let Some(class) = iface.raw_class() {
                    stack.push(TypeDescriptor::Raw(class));
                }
            }
            if let Some(class) = def.super_class.as_ref().and_then(|sc| sc.raw_class()) {
                stack.push(TypeDescriptor::Raw(class));
            }
            continue;
        }

        let mut subst = VariableBindingMap::new();
        for (formal, actual) in def.type_params.iter().zip(args) {
            subst.add(*formal, actual.clone());
        }
        for iface in def.interfaces.iter().rev() {
            stack.push(subst.substitute(universe, iface));
        }
        if let Some(super_class) = &def.super_class {
            stack.push(subst.substitute(universe, super_class));
        }
    }
    None
}

/// True iff the receiver's super-type chain (the receiver included) contains
/// a member with `candidate`'s raw class whose arguments are compatible with
/// `candidate`'s. Terminates on self-referential bound declarations via the
/// walk budget.
pub fn has_generic_super_type(
    universe: &dyn TypeUniverse,
    ty: &TypeDescriptor,
    candidate: &TypeDescriptor,
) -> bool {
    let Some(target_raw) = candidate.raw_class() else {
        return false;
    };
    let Some(viewed) = view_as(universe, ty, target_raw) else {
        return false;
    };
    match candidate {
        TypeDescriptor::Raw(_) => true,
        TypeDescriptor::Parameterized(p) => match viewed {
            TypeDescriptor::Raw(_) => true,
            TypeDescriptor::Parameterized(v) => {
                p.args.len() == v.args.len()
                    && p.args
                        .iter()
                        .zip(&v.args)
                        .all(|(c, s)| argument_compatible(universe, c, s, ASSIGN_FUEL))
            }
            _ => false,
        },
        _ => false,
    }
}

pub fn is_generic_super_type_of(
    universe: &dyn TypeUniverse,
    ty: &TypeDescriptor,
    sub: &TypeDescriptor,
) -> bool {
    has_generic_super_type(universe, sub, ty)
}

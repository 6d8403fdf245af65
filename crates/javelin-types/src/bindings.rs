use indexmap::IndexMap;
use javelin_ids::TypeVarId;
use serde::{Deserialize, Serialize};

use crate::descriptor::{ParameterizedType, TypeDescriptor, WildcardType};
use crate::store::TypeUniverse;
use crate::TypeError;

/// Depth budget when collecting bindings along a super-type chain.
const SUPER_CHAIN_FUEL: usize = 16;

/// Insertion-ordered mapping from type variables to the descriptors that
/// instantiate them.
///
/// Built up incrementally by one instantiation attempt and then consumed
/// read-only by [`VariableBindingMap::substitute`]; maps are never merged
/// destructively — callers start fresh per attempt.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableBindingMap {
    map: IndexMap<TypeVarId, TypeDescriptor>,
}

impl VariableBindingMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn get(&self, var: TypeVarId) -> Option<&TypeDescriptor> {
        self.map.get(&var)
    }

    pub fn contains(&self, var: TypeVarId) -> bool {
        self.map.contains_key(&var)
    }

    /// Iterate bindings in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (TypeVarId, &TypeDescriptor)> + '_ {
        self.map.iter().map(|(var, ty)| (*var, ty))
    }

    /// Insert a binding; a later `add` for the same variable overwrites the
    /// value but keeps the variable's original position. No constraint
    /// checking happens here — bound satisfaction is the consumer's concern.
    pub fn add(&mut self, var: TypeVarId, ty: TypeDescriptor) {
        self.map.insert(var, ty);
    }

    /// Pairwise insert; the sequences must have equal length.
    pub fn add_all(
        &mut self,
        variables: &[TypeVarId],
        types: &[TypeDescriptor],
    ) -> Result<(), TypeError> {
        if variables.len() != types.len() {
            return Err(TypeError::InvalidArgument(format!(
                "length mismatch: {} variables, {} types",
                variables.len(),
                types.len()
            )));
        }
        for (var, ty) in variables.iter().zip(types) {
            self.add(*var, ty.clone());
        }
        Ok(())
    }

    /// Bulk insert from another map, in its insertion order.
    pub fn add_all_bindings(&mut self, other: &VariableBindingMap) {
        for (var, ty) in other.iter() {
            self.add(var, ty.clone());
        }
    }

    /// Rewrite `ty`, replacing bound variables with their bindings.
    ///
    /// Unbound variables become the unbounded wildcard rather than failing:
    /// their declared bounds may be self-referential, so they are deliberately
    /// not re-substituted here. This keeps substitution total over recursive
    /// bound graphs.
    pub fn substitute(&self, universe: &dyn TypeUniverse, ty: &TypeDescriptor) -> TypeDescriptor {
        match ty {
            TypeDescriptor::Raw(_) => ty.clone(),
            TypeDescriptor::Variable(var) => match self.map.get(var) {
                Some(bound) => bound.clone(),
                None => TypeDescriptor::Wildcard(WildcardType::unbounded(
                    universe.well_known().object,
                )),
            },
            TypeDescriptor::Parameterized(p) => TypeDescriptor::Parameterized(ParameterizedType {
                raw: p.raw,
                args: self.substitute_all(universe, &p.args),
                owner: p
                    .owner
                    .as_ref()
                    .map(|owner| Box::new(self.substitute(universe, owner))),
            }),
            TypeDescriptor::Wildcard(w) => TypeDescriptor::Wildcard(WildcardType {
                upper: self.substitute_all(universe, &w.upper),
                lower: self.substitute_all(universe, &w.lower),
            }),
            TypeDescriptor::GenericArray(component) => {
                TypeDescriptor::generic_array(self.substitute(universe, component))
            }
        }
    }

    /// Element-wise [`VariableBindingMap::substitute`], preserving order and
    /// length.
    pub fn substitute_all(
        &self,
        universe: &dyn TypeUniverse,
        types: &[TypeDescriptor],
    ) -> Vec<TypeDescriptor> {
        types.iter().map(|ty| self.substitute(universe, ty)).collect()
    }

    /// The bindings visible on a descriptor: its own arguments zipped against
    /// the declared parameters, plus bindings contributed by the owner type
    /// and the super-type chain (substituted through the chain). The nearest
    /// declaration wins when a variable appears more than once.
    pub fn from_descriptor(universe: &dyn TypeUniverse, ty: &TypeDescriptor) -> Self {
        let mut out = Self::new();
        collect_bindings(universe, ty, &mut out, SUPER_CHAIN_FUEL);
        out
    }
}

fn collect_bindings(
    universe: &dyn TypeUniverse,
    ty: &TypeDescriptor,
    out: &mut VariableBindingMap,
    fuel: usize,
) {
    if fuel == 0 {
        return;
    }
    let TypeDescriptor::Parameterized(p) = ty else {
        return;
    };
    if let Some(owner) = &p.owner {
        collect_bindings(universe, owner, out, fuel - 1);
    }
    let Some(def) = universe.class(p.raw) else {
        return;
    };

    let mut local = VariableBindingMap::new();
    for (formal, actual) in def.type_params.iter().zip(&p.args) {
        local.add(*formal, actual.clone());
        if !out.contains(*formal) {
            out.add(*formal, actual.clone());
        }
    }

    if let Some(super_class) = &def.super_class {
        collect_bindings(universe, &local.substitute(universe, super_class), out, fuel - 1);
    }
    for iface in &def.interfaces {
        collect_bindings(universe, &local.substitute(universe, iface), out, fuel - 1);
    }
}

use std::collections::VecDeque;

use javelin_ids::TypeVarId;

use crate::assign::{assignable, satisfies_wildcard, ASSIGN_FUEL};
use crate::bindings::VariableBindingMap;
use crate::descriptor::{variable_display, ParameterizedType, TypeDescriptor, WildcardType};
use crate::store::TypeUniverse;
use crate::TypeError;

/// Bounds a sampled candidate has to satisfy, with any outer bindings already
/// substituted in.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BoundConstraint {
    pub upper: Vec<TypeDescriptor>,
    pub lower: Vec<TypeDescriptor>,
}

/// Source of candidate concrete types for open positions.
///
/// Instantiation re-queries the sampler until a candidate satisfies the
/// constraint or the sampler returns `None`; the selection policy (random,
/// seeded, exhaustive) lives entirely behind this trait.
pub trait CandidateSampler {
    fn next_candidate(
        &mut self,
        universe: &dyn TypeUniverse,
        constraint: &BoundConstraint,
    ) -> Option<TypeDescriptor>;
}

/// Deterministic sampler that hands out a fixed sequence of candidates,
/// ignoring the constraint. Rejected candidates are consumed.
#[derive(Clone, Debug, Default)]
pub struct SequenceSampler {
    candidates: VecDeque<TypeDescriptor>,
}

impl SequenceSampler {
    pub fn new(candidates: impl IntoIterator<Item = TypeDescriptor>) -> Self {
        Self {
            candidates: candidates.into_iter().collect(),
        }
    }
}

impl CandidateSampler for SequenceSampler {
    fn next_candidate(
        &mut self,
        _universe: &dyn TypeUniverse,
        _constraint: &BoundConstraint,
    ) -> Option<TypeDescriptor> {
        self.candidates.pop_front()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InstantiationConfig {
    /// Nesting depth past which open positions are erased instead of sampled,
    /// so that self-referential declarations like `Enum<E extends Enum<E>>`
    /// terminate.
    pub recursion_ceiling: usize,
}

impl Default for InstantiationConfig {
    fn default() -> Self {
        Self {
            recursion_ceiling: 3,
        }
    }
}

/// Whether `candidate` satisfies every declared bound of `var`, with `outer`
/// bindings (plus `var -> candidate` itself) substituted into the bounds
/// before checking. Binding the variable to the candidate first is what makes
/// self-referential bounds like `E extends Enum<E>` checkable.
pub fn satisfies_variable_bounds(
    universe: &dyn TypeUniverse,
    candidate: &TypeDescriptor,
    var: TypeVarId,
    outer: Option<&VariableBindingMap>,
) -> bool {
    let Some(param) = universe.type_param(var) else {
        // Unknown declarations constrain nothing.
        return true;
    };
    let mut map = outer.cloned().unwrap_or_default();
    map.add(var, candidate.clone());

    param.upper_bounds.iter().all(|bound| {
        let bound = map.substitute(universe, bound);
        assignable(universe, &bound, candidate, ASSIGN_FUEL)
    }) && param.lower_bound.as_ref().is_none_or(|bound| {
        let bound = map.substitute(universe, bound);
        assignable(universe, candidate, &bound, ASSIGN_FUEL)
    })
}

/// Wildcard analogue of [`satisfies_variable_bounds`].
pub fn satisfies_wildcard_bounds(
    universe: &dyn TypeUniverse,
    candidate: &TypeDescriptor,
    wildcard: &WildcardType,
    outer: Option<&VariableBindingMap>,
) -> bool {
    let substituted = match outer {
        Some(map) => WildcardType {
            upper: map.substitute_all(universe, &wildcard.upper),
            lower: map.substitute_all(universe, &wildcard.lower),
        },
        None => wildcard.clone(),
    };
    satisfies_wildcard(universe, candidate, &substituted, ASSIGN_FUEL)
}

/// Resolve every open position of `ty` to a concrete type.
///
/// Variables already present in `bindings` keep their binding (it still has
/// to satisfy the declared bounds); new variables and wildcards are filled by
/// querying `sampler` until a bound-satisfying candidate appears. A variable
/// met twice resolves to the same type both times. Nesting beyond
/// `config.recursion_ceiling` degrades to the erased form instead of sampling
/// further.
pub fn generic_instantiation(
    universe: &dyn TypeUniverse,
    sampler: &mut dyn CandidateSampler,
    ty: &TypeDescriptor,
    bindings: Option<&VariableBindingMap>,
    config: InstantiationConfig,
) -> Result<TypeDescriptor, TypeError> {
    let mut map = bindings.cloned().unwrap_or_default();
    instantiate(universe, sampler, ty, &mut map, config, 0)
}

fn instantiate(
    universe: &dyn TypeUniverse,
    sampler: &mut dyn CandidateSampler,
    ty: &TypeDescriptor,
    map: &mut VariableBindingMap,
    config: InstantiationConfig,
    level: usize,
) -> Result<TypeDescriptor, TypeError> {
    match ty {
        TypeDescriptor::Raw(class) => {
            let formals = universe
                .class(*class)
                .map(|def| def.type_params.clone())
                .unwrap_or_default();
            if formals.is_empty() {
                return Ok(ty.clone());
            }
            // A raw use of a generic class gets its parameters instantiated.
            let mut args = Vec::with_capacity(formals.len());
            for formal in &formals {
                args.push(resolve_variable(
                    universe,
                    sampler,
                    *formal,
                    map,
                    config,
                    level + 1,
                )?);
            }
            Ok(TypeDescriptor::parameterized(*class, args))
        }
        TypeDescriptor::Variable(var) => {
            resolve_variable(universe, sampler, *var, map, config, level)
        }
        TypeDescriptor::Wildcard(w) => {
            let constraint = BoundConstraint {
                upper: map.substitute_all(universe, &w.upper),
                lower: map.substitute_all(universe, &w.lower),
            };
            let snapshot: &VariableBindingMap = map;
            sample_concrete(universe, sampler, &constraint, |candidate| {
                satisfies_wildcard_bounds(universe, candidate, w, Some(snapshot))
            })
        }
        TypeDescriptor::Parameterized(p) => {
            if !ty.has_wildcard_or_type_variables() {
                return Ok(ty.clone());
            }
            if level > config.recursion_ceiling {
                tracing::debug!(
                    ty = %ty.display(universe),
                    level,
                    "recursion ceiling reached; erasing nested parameterization"
                );
                return Ok(ty.erased(universe));
            }
            let mut args = Vec::with_capacity(p.args.len());
            for arg in &p.args {
                args.push(instantiate(universe, sampler, arg, map, config, level + 1)?);
            }
            let owner = match &p.owner {
                Some(owner) => Some(Box::new(instantiate(
                    universe,
                    sampler,
                    owner,
                    map,
                    config,
                    level + 1,
                )?)),
                None => None,
            };
            Ok(TypeDescriptor::Parameterized(ParameterizedType {
                raw: p.raw,
                args,
                owner,
            }))
        }
        TypeDescriptor::GenericArray(component) => Ok(TypeDescriptor::generic_array(
            instantiate(universe, sampler, component, map, config, level)?,
        )),
    }
}

fn resolve_variable(
    universe: &dyn TypeUniverse,
    sampler: &mut dyn CandidateSampler,
    var: TypeVarId,
    map: &mut VariableBindingMap,
    config: InstantiationConfig,
    level: usize,
) -> Result<TypeDescriptor, TypeError> {
    if let Some(existing) = map.get(var).cloned() {
        // Consistency: a pre-bound or previously resolved variable keeps its
        // value, but only if that value actually fits the declaration.
        return if satisfies_variable_bounds(universe, &existing, var, Some(map)) {
            Ok(existing)
        } else {
            Err(TypeError::ConstructionFailed(format!(
                "binding {} for variable {} violates its declared bounds",
                existing.display(universe),
                variable_display(universe, var)
            )))
        };
    }

    if level > config.recursion_ceiling {
        let erased = TypeDescriptor::Variable(var).erased(universe);
        tracing::debug!(
            var = %variable_display(universe, var),
            level,
            erased = %erased.display(universe),
            "recursion ceiling reached; erasing variable"
        );
        map.add(var, erased.clone());
        return Ok(erased);
    }

    let bounds = universe
        .type_param(var)
        .map(|param| (param.upper_bounds.clone(), param.lower_bound.clone()))
        .unwrap_or_default();
    let constraint = BoundConstraint {
        upper: map.substitute_all(universe, &bounds.0),
        lower: bounds
            .1
            .as_ref()
            .map(|lower| vec![map.substitute(universe, lower)])
            .unwrap_or_default(),
    };
    let candidate = {
        let snapshot: &VariableBindingMap = map;
        sample_concrete(universe, sampler, &constraint, |candidate| {
            satisfies_variable_bounds(universe, candidate, var, Some(snapshot))
        })?
    };
    map.add(var, candidate.clone());
    Ok(candidate)
}

fn sample_concrete(
    universe: &dyn TypeUniverse,
    sampler: &mut dyn CandidateSampler,
    constraint: &BoundConstraint,
    satisfies: impl Fn(&TypeDescriptor) -> bool,
) -> Result<TypeDescriptor, TypeError> {
    while let Some(candidate) = sampler.next_candidate(universe, constraint) {
        if candidate.has_wildcard_or_type_variables() {
            return Err(TypeError::UnsupportedShape(format!(
                "sampled candidate {} is not concrete",
                candidate.display(universe)
            )));
        }
        if satisfies(&candidate) {
            return Ok(candidate);
        }
        tracing::trace!(
            candidate = %candidate.display(universe),
            "candidate rejected by bounds; re-querying sampler"
        );
    }
    Err(TypeError::ConstructionFailed(
        "candidate sampler exhausted before a bound-satisfying type was found".to_string(),
    ))
}

/// Whether some instantiation of the receiver could be assignable to `other`.
/// Closed types answer via plain assignability; open types fall back to
/// erasure-level compatibility, which over-approximates on purpose.
pub fn can_be_instantiated_to(
    universe: &dyn TypeUniverse,
    ty: &TypeDescriptor,
    other: &TypeDescriptor,
) -> bool {
    if assignable(universe, other, ty, ASSIGN_FUEL) {
        return true;
    }
    if !ty.has_wildcard_or_type_variables() {
        return false;
    }
    if let TypeDescriptor::Variable(var) = ty {
        return universe.type_param(*var).is_some_and(|param| {
            param
                .upper_bounds
                .iter()
                .any(|bound| can_be_instantiated_to(universe, bound, other))
        });
    }
    let erased = ty.erased(universe);
    let other_erased = other.erased(universe);
    match (erased.raw_class(), other_erased.raw_class()) {
        (Some(a), Some(b)) => assignable(
            universe,
            &TypeDescriptor::Raw(b),
            &TypeDescriptor::Raw(a),
            ASSIGN_FUEL,
        ),
        _ => false,
    }
}

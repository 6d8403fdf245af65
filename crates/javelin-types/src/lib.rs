//! Reflective generic type model for generating well-typed Java values.
//!
//! `javelin-types` represents (possibly open) Java types as immutable
//! [`TypeDescriptor`] trees and implements the algorithms a test-input
//! generator needs on top of them: substitution through a
//! [`VariableBindingMap`], generic assignability, declared-bound
//! satisfaction, and bounded-recursion instantiation of open type variables
//! behind an injected [`CandidateSampler`].
//!
//! The crate performs no discovery and no I/O: class metadata comes from a
//! [`TypeUniverse`] (see [`TypeStore`] for the batteries-included
//! implementation used by tests and embedders) and candidate concrete types
//! come from the sampler. Retry policy on construction failure belongs to the
//! caller.

#![forbid(unsafe_code)]

mod assign;
mod bindings;
mod descriptor;
mod instantiate;
mod store;

use thiserror::Error;

pub use assign::{
    has_generic_super_type, is_assignable_from, is_assignable_to, is_generic_super_type_of,
};
pub use bindings::VariableBindingMap;
pub use descriptor::{ClassRebinder, ParameterizedType, TypeDescriptor, WildcardType};
pub use instantiate::{
    can_be_instantiated_to, generic_instantiation, satisfies_variable_bounds,
    satisfies_wildcard_bounds, BoundConstraint, CandidateSampler, InstantiationConfig,
    SequenceSampler,
};
pub use store::{
    ClassDef, ClassKind, PrimitiveClasses, TypeParamDef, TypeStore, TypeUniverse,
    WellKnownClasses, WrapperClasses,
};

pub use javelin_ids::{ClassId, TypeVarId};

/// Errors surfaced by the fallible operations of this crate.
///
/// Everything is reported synchronously to the immediate caller; there is no
/// internal retry. Note that bound-unsatisfiable situations during plain
/// substitution are deliberately *not* errors — they degrade to the unbounded
/// wildcard so substitution stays total over recursive bound graphs.
#[derive(Debug, Error)]
pub enum TypeError {
    /// A required argument was malformed, e.g. paired sequences of different
    /// lengths.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// A descriptor shape outside the ones an operation is defined over, e.g.
    /// a sampler handing back a candidate that is not concrete.
    #[error("unsupported type shape: {0}")]
    UnsupportedShape(String),
    /// Instantiation could not produce a bound-satisfying concrete type
    /// within the recursion ceiling.
    #[error("construction failed: {0}")]
    ConstructionFailed(String),
}

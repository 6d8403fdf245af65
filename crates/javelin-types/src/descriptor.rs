use javelin_ids::{ClassId, TypeVarId};
use serde::{Deserialize, Serialize};

use crate::store::{ClassKind, TypeUniverse};

/// Fallback depth for erasure over malformed (cyclic) variable bound chains.
const ERASURE_FUEL: usize = 32;

/// One node of a (possibly generic) type expression tree.
///
/// Descriptors are immutable values: every transformation returns a new tree,
/// so they can be shared freely across threads and instantiation attempts.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeDescriptor {
    /// A concrete nominal type: class, interface, enum, primitive, or raw
    /// array class. No free variables.
    Raw(ClassId),
    /// A generic instantiation such as `List<String>` or `Outer<A>.Inner<B>`.
    Parameterized(ParameterizedType),
    /// An unresolved type parameter. Declared bounds live on the
    /// [`crate::TypeParamDef`] reachable through the universe, which keeps the
    /// identity unique per declaring context.
    Variable(TypeVarId),
    /// An unnamed type standing for "some unknown type within bounds".
    Wildcard(WildcardType),
    /// An array whose component type is itself open.
    GenericArray(Box<TypeDescriptor>),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParameterizedType {
    pub raw: ClassId,
    pub args: Vec<TypeDescriptor>,
    /// Enclosing type for member classes. `None` is a distinct state from
    /// "owner substituted to itself" and is preserved by every rewrite.
    pub owner: Option<Box<TypeDescriptor>>,
}

/// Wildcard bounds. At most one of the lists is meaningful per Java usage;
/// empty upper bounds mean an implicit `java.lang.Object` bound.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WildcardType {
    pub upper: Vec<TypeDescriptor>,
    pub lower: Vec<TypeDescriptor>,
}

impl WildcardType {
    pub fn extends(upper: Vec<TypeDescriptor>) -> Self {
        Self {
            upper,
            lower: Vec::new(),
        }
    }

    pub fn super_of(lower: Vec<TypeDescriptor>) -> Self {
        Self {
            upper: Vec::new(),
            lower,
        }
    }

    /// The explicit form of the unbounded wildcard: `? extends Object`.
    pub fn unbounded(object: ClassId) -> Self {
        Self {
            upper: vec![TypeDescriptor::Raw(object)],
            lower: Vec::new(),
        }
    }
}

impl TypeDescriptor {
    pub fn raw(class: ClassId) -> Self {
        Self::Raw(class)
    }

    pub fn parameterized(raw: ClassId, args: Vec<TypeDescriptor>) -> Self {
        Self::Parameterized(ParameterizedType {
            raw,
            args,
            owner: None,
        })
    }

    pub fn parameterized_in(owner: TypeDescriptor, raw: ClassId, args: Vec<TypeDescriptor>) -> Self {
        Self::Parameterized(ParameterizedType {
            raw,
            args,
            owner: Some(Box::new(owner)),
        })
    }

    pub fn variable(var: TypeVarId) -> Self {
        Self::Variable(var)
    }

    pub fn generic_array(component: TypeDescriptor) -> Self {
        Self::GenericArray(Box::new(component))
    }

    pub fn is_raw(&self) -> bool {
        matches!(self, Self::Raw(_))
    }

    pub fn is_parameterized_type(&self) -> bool {
        matches!(self, Self::Parameterized(_))
    }

    pub fn is_type_variable(&self) -> bool {
        matches!(self, Self::Variable(_))
    }

    pub fn is_wildcard_type(&self) -> bool {
        matches!(self, Self::Wildcard(_))
    }

    pub fn is_generic_array(&self) -> bool {
        matches!(self, Self::GenericArray(_))
    }

    /// Depth-first search over the whole tree, including wildcard bounds and
    /// owner types.
    fn any_node(&self, pred: &mut dyn FnMut(&TypeDescriptor) -> bool) -> bool {
        if pred(self) {
            return true;
        }
        match self {
            Self::Raw(_) | Self::Variable(_) => false,
            Self::Parameterized(p) => {
                for arg in &p.args {
                    if arg.any_node(pred) {
                        return true;
                    }
                }
                match &p.owner {
                    Some(owner) => owner.any_node(pred),
                    None => false,
                }
            }
            Self::Wildcard(w) => {
                for bound in w.upper.iter().chain(&w.lower) {
                    if bound.any_node(pred) {
                        return true;
                    }
                }
                false
            }
            Self::GenericArray(component) => component.any_node(pred),
        }
    }

    pub fn has_type_variables(&self) -> bool {
        self.any_node(&mut |ty| matches!(ty, TypeDescriptor::Variable(_)))
    }

    pub fn has_wildcard_types(&self) -> bool {
        self.any_node(&mut |ty| matches!(ty, TypeDescriptor::Wildcard(_)))
    }

    /// True iff the descriptor still contains anything that needs resolving
    /// before it describes one concrete type.
    pub fn has_wildcard_or_type_variables(&self) -> bool {
        self.any_node(&mut |ty| {
            matches!(
                ty,
                TypeDescriptor::Variable(_) | TypeDescriptor::Wildcard(_)
            )
        })
    }

    /// The raw class identity of class-shaped descriptors.
    pub fn raw_class(&self) -> Option<ClassId> {
        match self {
            Self::Raw(class) => Some(*class),
            Self::Parameterized(p) => Some(p.raw),
            _ => None,
        }
    }

    fn class_kind(&self, universe: &dyn TypeUniverse) -> Option<ClassKind> {
        self.raw_class()
            .and_then(|class| universe.class(class))
            .map(|def| def.kind)
    }

    pub fn is_primitive(&self, universe: &dyn TypeUniverse) -> bool {
        self.class_kind(universe) == Some(ClassKind::Primitive)
    }

    pub fn is_enum(&self, universe: &dyn TypeUniverse) -> bool {
        self.class_kind(universe) == Some(ClassKind::Enum)
    }

    pub fn is_interface(&self, universe: &dyn TypeUniverse) -> bool {
        self.class_kind(universe) == Some(ClassKind::Interface)
    }

    pub fn is_class(&self, universe: &dyn TypeUniverse) -> bool {
        self.class_kind(universe) == Some(ClassKind::Class)
    }

    pub fn is_array(&self, universe: &dyn TypeUniverse) -> bool {
        match self {
            Self::GenericArray(_) => true,
            Self::Raw(class) => universe
                .class(*class)
                .is_some_and(|def| def.component.is_some()),
            _ => false,
        }
    }

    pub fn is_abstract(&self, universe: &dyn TypeUniverse) -> bool {
        self.raw_class()
            .and_then(|class| universe.class(class))
            .is_some_and(|def| def.is_abstract)
    }

    pub fn is_anonymous(&self, universe: &dyn TypeUniverse) -> bool {
        self.raw_class()
            .and_then(|class| universe.class(class))
            .is_some_and(|def| def.is_anonymous)
    }

    pub fn is_object(&self, universe: &dyn TypeUniverse) -> bool {
        *self == Self::Raw(universe.well_known().object)
    }

    pub fn is_string(&self, universe: &dyn TypeUniverse) -> bool {
        *self == Self::Raw(universe.well_known().string)
    }

    pub fn is_void(&self, universe: &dyn TypeUniverse) -> bool {
        *self == Self::Raw(universe.well_known().primitives.void)
    }

    pub fn is_wrapper_type(&self, universe: &dyn TypeUniverse) -> bool {
        self.raw_class()
            .is_some_and(|class| universe.well_known().unboxed(class).is_some())
    }

    /// Component type of array-shaped descriptors.
    pub fn component_type(&self, universe: &dyn TypeUniverse) -> Option<TypeDescriptor> {
        match self {
            Self::GenericArray(component) => Some((**component).clone()),
            Self::Raw(class) => universe.class(*class)?.component.map(Self::Raw),
            _ => None,
        }
    }

    pub fn owner_type(&self) -> Option<&TypeDescriptor> {
        match self {
            Self::Parameterized(p) => p.owner.as_deref(),
            _ => None,
        }
    }

    pub fn has_owner_type(&self) -> bool {
        self.owner_type().is_some()
    }

    /// Actual type arguments; empty for anything but a parameterized type.
    pub fn parameter_types(&self) -> &[TypeDescriptor] {
        match self {
            Self::Parameterized(p) => &p.args,
            _ => &[],
        }
    }

    pub fn num_parameters(&self) -> usize {
        self.parameter_types().len()
    }

    /// Type variables declared by the raw class of this descriptor.
    pub fn type_variables(&self, universe: &dyn TypeUniverse) -> Vec<TypeVarId> {
        self.raw_class()
            .and_then(|class| universe.class(class))
            .map(|def| def.type_params.clone())
            .unwrap_or_default()
    }

    /// Declared upper bounds of a variable, or the upper bounds of a wildcard.
    pub fn generic_bounds(&self, universe: &dyn TypeUniverse) -> Vec<TypeDescriptor> {
        match self {
            Self::Variable(var) => universe
                .type_param(*var)
                .map(|param| param.upper_bounds.clone())
                .unwrap_or_default(),
            Self::Wildcard(w) => w.upper.clone(),
            _ => Vec::new(),
        }
    }

    /// Replace the component of an array-shaped descriptor, normalizing to the
    /// [`TypeDescriptor::GenericArray`] shape.
    ///
    /// Component replacement is a no-op on non-array shapes; callers that care
    /// should check [`TypeDescriptor::is_array`] first.
    pub fn with_component(
        &self,
        universe: &dyn TypeUniverse,
        component: TypeDescriptor,
    ) -> TypeDescriptor {
        if self.is_array(universe) {
            Self::generic_array(component)
        } else {
            self.clone()
        }
    }

    /// Replace the argument list, turning a raw class into a parameterized
    /// type if needed.
    ///
    /// The argument count is deliberately not validated against the declared
    /// parameter count; intermediate construction steps rely on that.
    pub fn with_parameters(&self, args: Vec<TypeDescriptor>) -> TypeDescriptor {
        match self {
            Self::Raw(class) => Self::parameterized(*class, args),
            Self::Parameterized(p) => Self::Parameterized(ParameterizedType {
                raw: p.raw,
                args,
                owner: p.owner.clone(),
            }),
            _ => self.clone(),
        }
    }

    /// Every declared parameter replaced by an unbounded wildcard.
    pub fn with_wildcard_parameters(&self, universe: &dyn TypeUniverse) -> TypeDescriptor {
        let Some(raw) = self.raw_class() else {
            return self.clone();
        };
        let count = universe
            .class(raw)
            .map(|def| def.type_params.len())
            .unwrap_or(0);
        if count == 0 {
            return self.clone();
        }
        let object = universe.well_known().object;
        let args = (0..count)
            .map(|_| Self::Wildcard(WildcardType::unbounded(object)))
            .collect();
        self.with_parameters(args)
    }

    /// The erased form: the raw class for parameterizations, the erasure of
    /// the first upper bound for variables and wildcards (`Object` if there is
    /// none). Used when bounded recursion gives up on a nested
    /// parameterization.
    pub fn erased(&self, universe: &dyn TypeUniverse) -> TypeDescriptor {
        self.erased_at(universe, ERASURE_FUEL)
    }

    fn erased_at(&self, universe: &dyn TypeUniverse, fuel: usize) -> TypeDescriptor {
        let object = || Self::Raw(universe.well_known().object);
        if fuel == 0 {
            return object();
        }
        match self {
            Self::Raw(_) => self.clone(),
            Self::Parameterized(p) => Self::Raw(p.raw),
            Self::Variable(var) => match universe
                .type_param(*var)
                .and_then(|param| param.upper_bounds.first().cloned())
            {
                Some(bound) => bound.erased_at(universe, fuel - 1),
                None => object(),
            },
            Self::Wildcard(w) => match w.upper.first() {
                Some(bound) => bound.erased_at(universe, fuel - 1),
                None => object(),
            },
            Self::GenericArray(component) => {
                Self::generic_array(component.erased_at(universe, fuel - 1))
            }
        }
    }

    /// The wrapper counterpart for primitives; the receiver unchanged when
    /// there is none.
    pub fn boxed_type(&self, universe: &dyn TypeUniverse) -> TypeDescriptor {
        match self.raw_class().and_then(|class| universe.well_known().boxed(class)) {
            Some(boxed) => Self::Raw(boxed),
            None => self.clone(),
        }
    }

    /// The primitive counterpart for wrappers; the receiver unchanged when
    /// there is none.
    pub fn unboxed_type(&self, universe: &dyn TypeUniverse) -> TypeDescriptor {
        match self.raw_class().and_then(|class| universe.well_known().unboxed(class)) {
            Some(unboxed) => Self::Raw(unboxed),
            None => self.clone(),
        }
    }

    /// Rebind every raw-class-bearing node through `rebinder`, producing a new
    /// tree. Nodes the rebinder cannot resolve keep their current identity
    /// (best-effort, like a class-loader change).
    pub fn rebind(&self, rebinder: &dyn ClassRebinder) -> TypeDescriptor {
        match self {
            Self::Raw(class) => Self::Raw(rebind_class(rebinder, *class)),
            Self::Parameterized(p) => Self::Parameterized(ParameterizedType {
                raw: rebind_class(rebinder, p.raw),
                args: p.args.iter().map(|arg| arg.rebind(rebinder)).collect(),
                owner: p.owner.as_ref().map(|o| Box::new(o.rebind(rebinder))),
            }),
            Self::Variable(var) => Self::Variable(*var),
            Self::Wildcard(w) => Self::Wildcard(WildcardType {
                upper: w.upper.iter().map(|b| b.rebind(rebinder)).collect(),
                lower: w.lower.iter().map(|b| b.rebind(rebinder)).collect(),
            }),
            Self::GenericArray(component) => Self::generic_array(component.rebind(rebinder)),
        }
    }

    /// Fully qualified name of the raw class, if there is one.
    pub fn class_name(&self, universe: &dyn TypeUniverse) -> Option<String> {
        self.raw_class()
            .and_then(|class| universe.class(class))
            .map(|def| def.name.clone())
    }

    pub fn simple_name(&self, universe: &dyn TypeUniverse) -> Option<String> {
        self.class_name(universe)
            .map(|name| simple_name_of(&name).to_string())
    }

    /// Render a Java-like name, e.g. `java.util.List<? extends java.lang.Number>`.
    pub fn display(&self, universe: &dyn TypeUniverse) -> String {
        match self {
            Self::Raw(class) => class_display(universe, *class),
            Self::Parameterized(p) => {
                let mut out = match &p.owner {
                    Some(owner) => {
                        let raw_name = class_display(universe, p.raw);
                        format!("{}.{}", owner.display(universe), simple_name_of(&raw_name))
                    }
                    None => class_display(universe, p.raw),
                };
                if !p.args.is_empty() {
                    let args: Vec<String> =
                        p.args.iter().map(|arg| arg.display(universe)).collect();
                    out.push('<');
                    out.push_str(&args.join(", "));
                    out.push('>');
                }
                out
            }
            Self::Variable(var) => variable_display(universe, *var),
            Self::Wildcard(w) => {
                let mut out = String::from("?");
                if !w.upper.is_empty() {
                    out.push_str(" extends ");
                    let bounds: Vec<String> =
                        w.upper.iter().map(|b| b.display(universe)).collect();
                    out.push_str(&bounds.join(" & "));
                }
                if !w.lower.is_empty() {
                    out.push_str(" super ");
                    let bounds: Vec<String> =
                        w.lower.iter().map(|b| b.display(universe)).collect();
                    out.push_str(&bounds.join(" & "));
                }
                out
            }
            Self::GenericArray(component) => format!("{}[]", component.display(universe)),
        }
    }
}

/// Re-resolves raw class identities under a different loading context.
///
/// The core does not interpret the mapping beyond applying it to every
/// raw-class-bearing node; `None` means the identity has no counterpart in
/// the new context.
pub trait ClassRebinder {
    fn rebind(&self, class: ClassId) -> Option<ClassId>;
}

fn rebind_class(rebinder: &dyn ClassRebinder, class: ClassId) -> ClassId {
    match rebinder.rebind(class) {
        Some(rebound) => rebound,
        None => {
            tracing::warn!(
                class = class.index(),
                "class has no identity in the new loading context; keeping the old one"
            );
            class
        }
    }
}

fn class_display(universe: &dyn TypeUniverse, class: ClassId) -> String {
    universe
        .class(class)
        .map(|def| def.name.clone())
        .unwrap_or_else(|| format!("<class#{}>", class.index()))
}

pub(crate) fn variable_display(universe: &dyn TypeUniverse, var: TypeVarId) -> String {
    universe
        .type_param(var)
        .map(|param| param.name.clone())
        .unwrap_or_else(|| format!("<var#{}>", var.index()))
}

fn simple_name_of(name: &str) -> &str {
    name.rsplit(['.', '$']).next().unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::TypeStore;

    #[test]
    fn structural_predicates_match_variants() {
        let store = TypeStore::with_minimal_jdk();
        let list = store.class_id("java.util.List").unwrap();
        let string = store.well_known().string;

        let raw = TypeDescriptor::raw(string);
        assert!(raw.is_raw());
        assert!(!raw.has_wildcard_or_type_variables());

        let list_string = TypeDescriptor::parameterized(list, vec![raw.clone()]);
        assert!(list_string.is_parameterized_type());
        assert_eq!(list_string.num_parameters(), 1);
        assert!(!list_string.has_wildcard_or_type_variables());

        let open = TypeDescriptor::parameterized(
            list,
            vec![TypeDescriptor::Wildcard(WildcardType::default())],
        );
        assert!(open.has_wildcard_types());
        assert!(!open.has_type_variables());
        assert!(open.has_wildcard_or_type_variables());
    }

    #[test]
    fn with_parameters_turns_raw_into_parameterized() {
        let store = TypeStore::with_minimal_jdk();
        let list = store.class_id("java.util.List").unwrap();
        let string = TypeDescriptor::raw(store.well_known().string);

        let parameterized = TypeDescriptor::raw(list).with_parameters(vec![string.clone()]);
        assert_eq!(parameterized, TypeDescriptor::parameterized(list, vec![string]));
    }

    #[test]
    fn with_component_is_a_no_op_on_non_arrays() {
        let store = TypeStore::with_minimal_jdk();
        let string = TypeDescriptor::raw(store.well_known().string);
        let integer = TypeDescriptor::raw(store.well_known().wrappers.int);

        assert_eq!(string.with_component(&store, integer.clone()), string);

        let array = TypeDescriptor::generic_array(string.clone());
        assert_eq!(
            array.with_component(&store, integer.clone()),
            TypeDescriptor::generic_array(integer)
        );
    }

    #[test]
    fn boxing_table_is_bidirectional() {
        let store = TypeStore::with_minimal_jdk();
        let int = TypeDescriptor::raw(store.well_known().primitives.int);
        let integer = TypeDescriptor::raw(store.well_known().wrappers.int);
        let string = TypeDescriptor::raw(store.well_known().string);

        assert_eq!(int.boxed_type(&store), integer);
        assert_eq!(integer.unboxed_type(&store), int);
        assert!(integer.is_wrapper_type(&store));
        // No counterpart: receiver unchanged.
        assert_eq!(string.boxed_type(&store), string);
        assert_eq!(string.unboxed_type(&store), string);
    }

    #[test]
    fn display_renders_java_like_names() {
        let store = TypeStore::with_minimal_jdk();
        let list = store.class_id("java.util.List").unwrap();
        let number = store.well_known().number;

        let ty = TypeDescriptor::parameterized(
            list,
            vec![TypeDescriptor::Wildcard(WildcardType::extends(vec![
                TypeDescriptor::raw(number),
            ]))],
        );
        assert_eq!(
            ty.display(&store),
            "java.util.List<? extends java.lang.Number>"
        );
        assert_eq!(
            TypeDescriptor::generic_array(TypeDescriptor::raw(number)).display(&store),
            "java.lang.Number[]"
        );
    }

    #[test]
    fn descriptors_round_trip_through_serde() {
        let store = TypeStore::with_minimal_jdk();
        let list = store.class_id("java.util.List").unwrap();
        let ty = TypeDescriptor::parameterized(
            list,
            vec![TypeDescriptor::Wildcard(WildcardType::unbounded(
                store.well_known().object,
            ))],
        );

        let json = serde_json::to_string(&ty).unwrap();
        let back: TypeDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ty);
    }
}

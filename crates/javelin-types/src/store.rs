use std::collections::HashMap;

use javelin_ids::{ClassId, TypeVarId};
use serde::{Deserialize, Serialize};

use crate::descriptor::TypeDescriptor;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClassKind {
    Class,
    Interface,
    Enum,
    Primitive,
}

/// Declared metadata for one raw class identity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDef {
    pub name: String,
    pub kind: ClassKind,
    pub type_params: Vec<TypeVarId>,
    pub super_class: Option<TypeDescriptor>,
    pub interfaces: Vec<TypeDescriptor>,
    /// `Some` for raw array classes such as `java.lang.String[]`.
    pub component: Option<ClassId>,
    pub is_abstract: bool,
    pub is_anonymous: bool,
}

impl ClassDef {
    pub fn class(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: ClassKind::Class,
            type_params: Vec::new(),
            super_class: None,
            interfaces: Vec::new(),
            component: None,
            is_abstract: false,
            is_anonymous: false,
        }
    }

    pub fn interface(name: &str) -> Self {
        Self {
            kind: ClassKind::Interface,
            is_abstract: true,
            ..Self::class(name)
        }
    }

    pub fn primitive(name: &str) -> Self {
        Self {
            kind: ClassKind::Primitive,
            ..Self::class(name)
        }
    }
}

/// A declared type parameter: upper bounds from the declaration site, plus an
/// optional lower bound for capture-style variables.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeParamDef {
    pub name: String,
    pub upper_bounds: Vec<TypeDescriptor>,
    pub lower_bound: Option<TypeDescriptor>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimitiveClasses {
    pub boolean: ClassId,
    pub byte: ClassId,
    pub short: ClassId,
    pub char: ClassId,
    pub int: ClassId,
    pub long: ClassId,
    pub float: ClassId,
    pub double: ClassId,
    pub void: ClassId,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrapperClasses {
    pub boolean: ClassId,
    pub byte: ClassId,
    pub short: ClassId,
    pub char: ClassId,
    pub int: ClassId,
    pub long: ClassId,
    pub float: ClassId,
    pub double: ClassId,
    pub void: ClassId,
}

/// Classes every universe is expected to know about.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WellKnownClasses {
    pub object: ClassId,
    pub string: ClassId,
    pub number: ClassId,
    pub comparable: ClassId,
    pub cloneable: ClassId,
    pub serializable: ClassId,
    pub primitives: PrimitiveClasses,
    pub wrappers: WrapperClasses,
}

impl WellKnownClasses {
    fn pairs(&self) -> [(ClassId, ClassId); 9] {
        let p = &self.primitives;
        let w = &self.wrappers;
        [
            (p.boolean, w.boolean),
            (p.byte, w.byte),
            (p.short, w.short),
            (p.char, w.char),
            (p.int, w.int),
            (p.long, w.long),
            (p.float, w.float),
            (p.double, w.double),
            (p.void, w.void),
        ]
    }

    /// Fixed primitive-to-wrapper correspondence.
    pub fn boxed(&self, class: ClassId) -> Option<ClassId> {
        self.pairs()
            .iter()
            .find(|(primitive, _)| *primitive == class)
            .map(|(_, wrapper)| *wrapper)
    }

    /// Fixed wrapper-to-primitive correspondence.
    pub fn unboxed(&self, class: ClassId) -> Option<ClassId> {
        self.pairs()
            .iter()
            .find(|(_, wrapper)| *wrapper == class)
            .map(|(primitive, _)| *primitive)
    }

    fn placeholder() -> Self {
        let zero = ClassId::new(0);
        let prim = PrimitiveClasses {
            boolean: zero,
            byte: zero,
            short: zero,
            char: zero,
            int: zero,
            long: zero,
            float: zero,
            double: zero,
            void: zero,
        };
        Self {
            object: zero,
            string: zero,
            number: zero,
            comparable: zero,
            cloneable: zero,
            serializable: zero,
            primitives: prim,
            wrappers: WrapperClasses {
                boolean: zero,
                byte: zero,
                short: zero,
                char: zero,
                int: zero,
                long: zero,
                float: zero,
                double: zero,
                void: zero,
            },
        }
    }
}

/// Narrow resolver interface the algorithms consume: declared parameter
/// counts, super types, and type-variable declarations with bounds.
pub trait TypeUniverse {
    fn class(&self, id: ClassId) -> Option<&ClassDef>;
    fn type_param(&self, id: TypeVarId) -> Option<&TypeParamDef>;
    fn lookup_class(&self, name: &str) -> Option<ClassId>;
    fn well_known(&self) -> &WellKnownClasses;
}

/// In-memory [`TypeUniverse`] used by tests and embedders that build their
/// universe up front.
#[derive(Clone, Debug)]
pub struct TypeStore {
    classes: Vec<ClassDef>,
    type_params: Vec<TypeParamDef>,
    by_name: HashMap<String, ClassId>,
    well_known: WellKnownClasses,
}

impl TypeStore {
    /// A universe with `java.lang`/`java.util` staples: `Object`, `String`,
    /// `Number`, `Comparable<T>`, the collection interfaces with a couple of
    /// implementations, `Enum<E extends Enum<E>>`, and the primitive/wrapper
    /// pairs.
    pub fn with_minimal_jdk() -> Self {
        let mut store = TypeStore {
            classes: Vec::new(),
            type_params: Vec::new(),
            by_name: HashMap::new(),
            well_known: WellKnownClasses::placeholder(),
        };

        let object = store.add_class(ClassDef::class("java.lang.Object"));
        let object_ty = TypeDescriptor::Raw(object);

        let serializable = store.add_class(ClassDef::interface("java.io.Serializable"));
        let cloneable = store.add_class(ClassDef::interface("java.lang.Cloneable"));
        let char_sequence = store.add_class(ClassDef::interface("java.lang.CharSequence"));

        let comparable_t = store.add_type_param("T", vec![object_ty.clone()]);
        let comparable = store.add_class(ClassDef {
            type_params: vec![comparable_t],
            ..ClassDef::interface("java.lang.Comparable")
        });

        let number = store.add_class(ClassDef {
            super_class: Some(object_ty.clone()),
            interfaces: vec![TypeDescriptor::Raw(serializable)],
            is_abstract: true,
            ..ClassDef::class("java.lang.Number")
        });

        let string = store.add_class(ClassDef {
            super_class: Some(object_ty.clone()),
            interfaces: vec![
                TypeDescriptor::Raw(serializable),
                TypeDescriptor::Raw(char_sequence),
            ],
            ..ClassDef::class("java.lang.String")
        });
        if let Some(def) = store.class_mut(string) {
            def.interfaces.push(TypeDescriptor::parameterized(
                comparable,
                vec![TypeDescriptor::Raw(string)],
            ));
        }

        // Collections.
        let iterable_t = store.add_type_param("T", vec![object_ty.clone()]);
        let iterable = store.add_class(ClassDef {
            type_params: vec![iterable_t],
            ..ClassDef::interface("java.lang.Iterable")
        });

        let collection_e = store.add_type_param("E", vec![object_ty.clone()]);
        let collection = store.add_class(ClassDef {
            type_params: vec![collection_e],
            interfaces: vec![TypeDescriptor::parameterized(
                iterable,
                vec![TypeDescriptor::Variable(collection_e)],
            )],
            ..ClassDef::interface("java.util.Collection")
        });

        let list_e = store.add_type_param("E", vec![object_ty.clone()]);
        let list = store.add_class(ClassDef {
            type_params: vec![list_e],
            interfaces: vec![TypeDescriptor::parameterized(
                collection,
                vec![TypeDescriptor::Variable(list_e)],
            )],
            ..ClassDef::interface("java.util.List")
        });

        let set_e = store.add_type_param("E", vec![object_ty.clone()]);
        let set = store.add_class(ClassDef {
            type_params: vec![set_e],
            interfaces: vec![TypeDescriptor::parameterized(
                collection,
                vec![TypeDescriptor::Variable(set_e)],
            )],
            ..ClassDef::interface("java.util.Set")
        });

        let array_list_e = store.add_type_param("E", vec![object_ty.clone()]);
        store.add_class(ClassDef {
            type_params: vec![array_list_e],
            super_class: Some(object_ty.clone()),
            interfaces: vec![
                TypeDescriptor::parameterized(list, vec![TypeDescriptor::Variable(array_list_e)]),
                TypeDescriptor::Raw(cloneable),
                TypeDescriptor::Raw(serializable),
            ],
            ..ClassDef::class("java.util.ArrayList")
        });

        let linked_list_e = store.add_type_param("E", vec![object_ty.clone()]);
        store.add_class(ClassDef {
            type_params: vec![linked_list_e],
            super_class: Some(object_ty.clone()),
            interfaces: vec![TypeDescriptor::parameterized(
                list,
                vec![TypeDescriptor::Variable(linked_list_e)],
            )],
            ..ClassDef::class("java.util.LinkedList")
        });

        let hash_set_e = store.add_type_param("E", vec![object_ty.clone()]);
        store.add_class(ClassDef {
            type_params: vec![hash_set_e],
            super_class: Some(object_ty.clone()),
            interfaces: vec![TypeDescriptor::parameterized(
                set,
                vec![TypeDescriptor::Variable(hash_set_e)],
            )],
            ..ClassDef::class("java.util.HashSet")
        });

        let map_k = store.add_type_param("K", vec![object_ty.clone()]);
        let map_v = store.add_type_param("V", vec![object_ty.clone()]);
        let map = store.add_class(ClassDef {
            type_params: vec![map_k, map_v],
            ..ClassDef::interface("java.util.Map")
        });

        let hash_map_k = store.add_type_param("K", vec![object_ty.clone()]);
        let hash_map_v = store.add_type_param("V", vec![object_ty.clone()]);
        store.add_class(ClassDef {
            type_params: vec![hash_map_k, hash_map_v],
            super_class: Some(object_ty.clone()),
            interfaces: vec![TypeDescriptor::parameterized(
                map,
                vec![
                    TypeDescriptor::Variable(hash_map_k),
                    TypeDescriptor::Variable(hash_map_v),
                ],
            )],
            ..ClassDef::class("java.util.HashMap")
        });

        // Enum with its self-referential parameter: E extends Enum<E>.
        let enum_e = store.add_type_param("E", vec![object_ty.clone()]);
        let enum_class = store.add_class(ClassDef {
            type_params: vec![enum_e],
            super_class: Some(object_ty.clone()),
            interfaces: vec![
                TypeDescriptor::parameterized(comparable, vec![TypeDescriptor::Variable(enum_e)]),
                TypeDescriptor::Raw(serializable),
            ],
            is_abstract: true,
            ..ClassDef::class("java.lang.Enum")
        });
        if let Some(param) = store.type_param_mut(enum_e) {
            param.upper_bounds = vec![TypeDescriptor::parameterized(
                enum_class,
                vec![TypeDescriptor::Variable(enum_e)],
            )];
        }

        let time_unit = store.add_class(ClassDef {
            kind: ClassKind::Enum,
            super_class: Some(object_ty.clone()),
            ..ClassDef::class("java.util.concurrent.TimeUnit")
        });
        if let Some(def) = store.class_mut(time_unit) {
            def.super_class = Some(TypeDescriptor::parameterized(
                enum_class,
                vec![TypeDescriptor::Raw(time_unit)],
            ));
        }

        // Primitives and their wrappers.
        let primitives = PrimitiveClasses {
            boolean: store.add_class(ClassDef::primitive("boolean")),
            byte: store.add_class(ClassDef::primitive("byte")),
            short: store.add_class(ClassDef::primitive("short")),
            char: store.add_class(ClassDef::primitive("char")),
            int: store.add_class(ClassDef::primitive("int")),
            long: store.add_class(ClassDef::primitive("long")),
            float: store.add_class(ClassDef::primitive("float")),
            double: store.add_class(ClassDef::primitive("double")),
            void: store.add_class(ClassDef::primitive("void")),
        };

        let mut wrapper = |store: &mut TypeStore, name: &str, numeric: bool| {
            let mut def = ClassDef::class(name);
            def.super_class = Some(if numeric {
                TypeDescriptor::Raw(number)
            } else {
                object_ty.clone()
            });
            def.interfaces.push(TypeDescriptor::Raw(serializable));
            let id = store.add_class(def);
            if let Some(def) = store.class_mut(id) {
                def.interfaces.push(TypeDescriptor::parameterized(
                    comparable,
                    vec![TypeDescriptor::Raw(id)],
                ));
            }
            id
        };
        let wrappers = WrapperClasses {
            boolean: wrapper(&mut store, "java.lang.Boolean", false),
            byte: wrapper(&mut store, "java.lang.Byte", true),
            short: wrapper(&mut store, "java.lang.Short", true),
            char: wrapper(&mut store, "java.lang.Character", false),
            int: wrapper(&mut store, "java.lang.Integer", true),
            long: wrapper(&mut store, "java.lang.Long", true),
            float: wrapper(&mut store, "java.lang.Float", true),
            double: wrapper(&mut store, "java.lang.Double", true),
            void: store.add_class(ClassDef {
                super_class: Some(object_ty.clone()),
                ..ClassDef::class("java.lang.Void")
            }),
        };

        // One raw array class, enough to exercise the array-shaped paths.
        store.add_class(ClassDef {
            super_class: Some(object_ty),
            interfaces: vec![
                TypeDescriptor::Raw(cloneable),
                TypeDescriptor::Raw(serializable),
            ],
            component: Some(string),
            ..ClassDef::class("java.lang.String[]")
        });

        store.well_known = WellKnownClasses {
            object,
            string,
            number,
            comparable,
            cloneable,
            serializable,
            primitives,
            wrappers,
        };
        store
    }

    pub fn add_class(&mut self, def: ClassDef) -> ClassId {
        let id = ClassId::new(self.classes.len() as u32);
        self.by_name.insert(def.name.clone(), id);
        self.classes.push(def);
        id
    }

    pub fn add_type_param(&mut self, name: &str, upper_bounds: Vec<TypeDescriptor>) -> TypeVarId {
        let id = TypeVarId::new(self.type_params.len() as u32);
        self.type_params.push(TypeParamDef {
            name: name.to_string(),
            upper_bounds,
            lower_bound: None,
        });
        id
    }

    pub fn class_id(&self, name: &str) -> Option<ClassId> {
        self.by_name.get(name).copied()
    }

    pub fn class_mut(&mut self, id: ClassId) -> Option<&mut ClassDef> {
        self.classes.get_mut(id.index() as usize)
    }

    pub fn type_param_mut(&mut self, id: TypeVarId) -> Option<&mut TypeParamDef> {
        self.type_params.get_mut(id.index() as usize)
    }
}

impl TypeUniverse for TypeStore {
    fn class(&self, id: ClassId) -> Option<&ClassDef> {
        self.classes.get(id.index() as usize)
    }

    fn type_param(&self, id: TypeVarId) -> Option<&TypeParamDef> {
        self.type_params.get(id.index() as usize)
    }

    fn lookup_class(&self, name: &str) -> Option<ClassId> {
        self.class_id(name)
    }

    fn well_known(&self) -> &WellKnownClasses {
        &self.well_known
    }
}

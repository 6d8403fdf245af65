use std::collections::HashMap;

use javelin_types::{
    has_generic_super_type, is_generic_super_type_of, ClassId, ClassRebinder, TypeDescriptor,
    TypeStore, TypeUniverse, VariableBindingMap, WildcardType,
};

#[test]
fn super_type_search_substitutes_along_the_chain() {
    let store = TypeStore::with_minimal_jdk();
    let array_list = store.class_id("java.util.ArrayList").unwrap();
    let iterable = store.class_id("java.lang.Iterable").unwrap();
    let string = TypeDescriptor::raw(store.well_known().string);

    // ArrayList<String> -> List<String> -> Collection<String> -> Iterable<String>.
    let ty = TypeDescriptor::parameterized(array_list, vec![string.clone()]);
    let iterable_string = TypeDescriptor::parameterized(iterable, vec![string]);

    assert!(has_generic_super_type(&store, &ty, &iterable_string));
    assert!(is_generic_super_type_of(&store, &iterable_string, &ty));
    assert!(!is_generic_super_type_of(&store, &ty, &iterable_string));
}

#[test]
fn interfaces_implicitly_extend_object() {
    let store = TypeStore::with_minimal_jdk();
    let list = store.class_id("java.util.List").unwrap();
    let object = TypeDescriptor::raw(store.well_known().object);
    let string = TypeDescriptor::raw(store.well_known().string);

    let ty = TypeDescriptor::parameterized(list, vec![string]);
    assert!(has_generic_super_type(&store, &ty, &object));
}

#[test]
fn raw_candidate_matches_any_instantiation() {
    let store = TypeStore::with_minimal_jdk();
    let array_list = store.class_id("java.util.ArrayList").unwrap();
    let collection = store.class_id("java.util.Collection").unwrap();
    let string = TypeDescriptor::raw(store.well_known().string);

    let ty = TypeDescriptor::parameterized(array_list, vec![string]);
    assert!(has_generic_super_type(&store, &ty, &TypeDescriptor::raw(collection)));
}

#[test]
fn raw_receiver_matches_parameterized_candidates_by_erasure() {
    let store = TypeStore::with_minimal_jdk();
    let array_list = store.class_id("java.util.ArrayList").unwrap();
    let collection = store.class_id("java.util.Collection").unwrap();
    let string = TypeDescriptor::raw(store.well_known().string);

    // A raw ArrayList loses its supertype arguments, so any instantiation of
    // Collection is reachable at erasure level.
    let ty = TypeDescriptor::raw(array_list);
    let collection_string = TypeDescriptor::parameterized(collection, vec![string]);
    assert!(has_generic_super_type(&store, &ty, &collection_string));
}

#[test]
fn wildcarded_candidate_arguments_are_checked_against_bounds() {
    let store = TypeStore::with_minimal_jdk();
    let array_list = store.class_id("java.util.ArrayList").unwrap();
    let collection = store.class_id("java.util.Collection").unwrap();
    let wk = store.well_known();
    let integer = TypeDescriptor::raw(wk.wrappers.int);
    let number = TypeDescriptor::raw(wk.number);
    let string = TypeDescriptor::raw(wk.string);

    let ty = TypeDescriptor::parameterized(array_list, vec![integer]);
    let extends_number = TypeDescriptor::parameterized(
        collection,
        vec![TypeDescriptor::Wildcard(WildcardType::extends(vec![number]))],
    );
    assert!(has_generic_super_type(&store, &ty, &extends_number));

    let ty = TypeDescriptor::parameterized(array_list, vec![string]);
    assert!(!has_generic_super_type(&store, &ty, &extends_number));
}

#[test]
fn self_referential_enum_bound_terminates() {
    let store = TypeStore::with_minimal_jdk();
    let enum_class = store.class_id("java.lang.Enum").unwrap();
    let time_unit = store.class_id("java.util.concurrent.TimeUnit").unwrap();

    let ty = TypeDescriptor::raw(time_unit);
    let enum_of_self =
        TypeDescriptor::parameterized(enum_class, vec![TypeDescriptor::raw(time_unit)]);
    assert!(has_generic_super_type(&store, &ty, &enum_of_self));
    assert!(!has_generic_super_type(
        &store,
        &ty,
        &TypeDescriptor::parameterized(
            enum_class,
            vec![TypeDescriptor::raw(store.well_known().string)],
        ),
    ));
}

#[test]
fn binding_map_from_descriptor_feeds_substitution() {
    let store = TypeStore::with_minimal_jdk();
    let hash_map = store.class_id("java.util.HashMap").unwrap();
    let map_class = store.class_id("java.util.Map").unwrap();
    let string = TypeDescriptor::raw(store.well_known().string);
    let number = TypeDescriptor::raw(store.well_known().number);

    let ty = TypeDescriptor::parameterized(hash_map, vec![string.clone(), number.clone()]);
    let bindings = VariableBindingMap::from_descriptor(&store, &ty);

    // Substituting Map<K, V> through the collected bindings recovers the
    // arguments seen from the HashMap instantiation.
    let map_params = store.class(map_class).unwrap().type_params.clone();
    let open = TypeDescriptor::parameterized(
        map_class,
        map_params.iter().copied().map(TypeDescriptor::variable).collect(),
    );
    assert_eq!(
        bindings.substitute(&store, &open),
        TypeDescriptor::parameterized(map_class, vec![string, number]),
    );
}

struct TableRebinder {
    table: HashMap<ClassId, ClassId>,
}

impl ClassRebinder for TableRebinder {
    fn rebind(&self, class: ClassId) -> Option<ClassId> {
        self.table.get(&class).copied()
    }
}

#[test]
fn rebinding_rewrites_every_class_bearing_node() {
    let store = TypeStore::with_minimal_jdk();
    let list = store.class_id("java.util.List").unwrap();
    let set = store.class_id("java.util.Set").unwrap();
    let wk = store.well_known();
    let string = wk.string;
    let number = wk.number;

    let rebinder = TableRebinder {
        table: HashMap::from([(list, set), (string, number)]),
    };

    let ty = TypeDescriptor::parameterized(
        list,
        vec![TypeDescriptor::generic_array(TypeDescriptor::raw(string))],
    );
    assert_eq!(
        ty.rebind(&rebinder),
        TypeDescriptor::parameterized(
            set,
            vec![TypeDescriptor::generic_array(TypeDescriptor::raw(number))],
        ),
    );

    // Unmapped identities survive untouched.
    let object = TypeDescriptor::raw(wk.object);
    assert_eq!(object.rebind(&rebinder), object);
}

use javelin_types::{
    is_assignable_from, is_assignable_to, TypeDescriptor, TypeStore, TypeUniverse, WildcardType,
};

#[test]
fn subtype_chain_reaches_through_interfaces() {
    let store = TypeStore::with_minimal_jdk();
    let array_list = store.class_id("java.util.ArrayList").unwrap();
    let iterable = store.class_id("java.lang.Iterable").unwrap();
    let collection = store.class_id("java.util.Collection").unwrap();
    let object = TypeDescriptor::raw(store.well_known().object);

    let src = TypeDescriptor::raw(array_list);
    assert!(is_assignable_from(&store, &TypeDescriptor::raw(collection), &src));
    assert!(is_assignable_from(&store, &TypeDescriptor::raw(iterable), &src));
    assert!(is_assignable_from(&store, &object, &src));
    assert!(!is_assignable_from(&store, &src, &TypeDescriptor::raw(collection)));
}

#[test]
fn interfaces_are_assignable_to_object() {
    let store = TypeStore::with_minimal_jdk();
    let list = store.class_id("java.util.List").unwrap();
    let object = TypeDescriptor::raw(store.well_known().object);
    let string = TypeDescriptor::raw(store.well_known().string);

    assert!(is_assignable_from(&store, &object, &TypeDescriptor::raw(list)));
    assert!(is_assignable_from(
        &store,
        &object,
        &TypeDescriptor::parameterized(list, vec![string]),
    ));
}

#[test]
fn parameterized_super_interface_accepts_parameterized_subtype() {
    let store = TypeStore::with_minimal_jdk();
    let array_list = store.class_id("java.util.ArrayList").unwrap();
    let iterable = store.class_id("java.lang.Iterable").unwrap();
    let string = TypeDescriptor::raw(store.well_known().string);
    let number = TypeDescriptor::raw(store.well_known().number);

    let src = TypeDescriptor::parameterized(array_list, vec![string.clone()]);
    let iterable_string = TypeDescriptor::parameterized(iterable, vec![string]);
    let iterable_number = TypeDescriptor::parameterized(iterable, vec![number]);

    assert!(is_assignable_from(&store, &iterable_string, &src));
    assert!(is_assignable_to(&store, &src, &iterable_string));
    assert!(!is_assignable_from(&store, &iterable_number, &src));
}

#[test]
fn wildcard_lower_bounds_constrain_from_below() {
    let store = TypeStore::with_minimal_jdk();
    let list = store.class_id("java.util.List").unwrap();
    let wk = store.well_known();
    let integer = TypeDescriptor::raw(wk.wrappers.int);
    let number = TypeDescriptor::raw(wk.number);
    let object = TypeDescriptor::raw(wk.object);
    let string = TypeDescriptor::raw(wk.string);

    let list_super_integer = TypeDescriptor::parameterized(
        list,
        vec![TypeDescriptor::Wildcard(WildcardType::super_of(vec![integer.clone()]))],
    );
    // Number and Object sit above Integer; String does not.
    for ok in [integer, number, object] {
        let src = TypeDescriptor::parameterized(list, vec![ok]);
        assert!(is_assignable_from(&store, &list_super_integer, &src));
    }
    let src = TypeDescriptor::parameterized(list, vec![string]);
    assert!(!is_assignable_from(&store, &list_super_integer, &src));
}

#[test]
fn unbounded_wildcard_argument_accepts_anything() {
    let store = TypeStore::with_minimal_jdk();
    let list = store.class_id("java.util.List").unwrap();
    let wk = store.well_known();

    let list_any = TypeDescriptor::parameterized(
        list,
        vec![TypeDescriptor::Wildcard(WildcardType::default())],
    );
    for arg in [
        TypeDescriptor::raw(wk.string),
        TypeDescriptor::raw(wk.number),
        TypeDescriptor::generic_array(TypeDescriptor::raw(wk.string)),
    ] {
        let src = TypeDescriptor::parameterized(list, vec![arg]);
        assert!(is_assignable_from(&store, &list_any, &src));
    }
}

#[test]
fn variable_source_assigns_through_its_upper_bounds() {
    let mut store = TypeStore::with_minimal_jdk();
    let number = TypeDescriptor::raw(store.well_known().number);
    let string = TypeDescriptor::raw(store.well_known().string);
    let object = TypeDescriptor::raw(store.well_known().object);
    let t = store.add_type_param("T", vec![number.clone()]);
    let unbounded = store.add_type_param("U", vec![]);

    let var = TypeDescriptor::variable(t);
    assert!(is_assignable_from(&store, &number, &var));
    assert!(is_assignable_from(&store, &object, &var));
    assert!(!is_assignable_from(&store, &string, &var));
    // A variable with no declared bound only reaches Object.
    let loose = TypeDescriptor::variable(unbounded);
    assert!(is_assignable_from(&store, &object, &loose));
    assert!(!is_assignable_from(&store, &number, &loose));
}

#[test]
fn comparable_implementations_reach_their_instantiation() {
    let store = TypeStore::with_minimal_jdk();
    let comparable = store.class_id("java.lang.Comparable").unwrap();
    let wk = store.well_known();
    let string = TypeDescriptor::raw(wk.string);
    let integer = TypeDescriptor::raw(wk.wrappers.int);

    let comparable_string = TypeDescriptor::parameterized(comparable, vec![string.clone()]);
    assert!(is_assignable_from(&store, &comparable_string, &string));
    assert!(!is_assignable_from(&store, &comparable_string, &integer));
}

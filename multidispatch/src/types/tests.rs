use super::builtins::*;
use super::*;
use multidispatch_runtime::{ClassRef, NativeKind, Value};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};

fn hash_of(ty: &Type) -> u64 {
    let mut hasher = DefaultHasher::new();
    ty.hash(&mut hasher);
    hasher.finish()
}

fn list_of(item: &Type) -> Type {
    LIST.parameterize(item.clone()).unwrap()
}

fn dict_of(key: &Type, value: &Type) -> Type {
    DICT.parameterize(Type::product([key.clone(), value.clone()]))
        .unwrap()
}

fn sample_types() -> Vec<Type> {
    let shape = ClassRef::new("Shape", []);
    vec![
        ANY.clone(),
        WILDCARD.clone(),
        NEVER.clone(),
        INT.clone(),
        BOOL.clone(),
        STR.clone(),
        LIST.clone(),
        list_of(&INT),
        dict_of(&STR, &INT),
        Type::product([INT.clone(), STR.clone()]),
        Type::union([INT.clone(), STR.clone()]),
        Type::phantom("Meters", FLOAT.clone()),
        Type::int_range(Some(0), None),
        Type::literal([LiteralValue::Int(1), LiteralValue::Str("a".into())]),
        Type::class(&shape),
    ]
}

// ==================== Poset laws ====================

#[test]
fn test_reflexivity() {
    for ty in sample_types() {
        assert!(ty.is_subtype_of(&ty), "{} <= {} should hold", ty, ty);
    }
}

#[test]
fn test_absorption() {
    for ty in sample_types() {
        assert!(ty.is_subtype_of(&ANY), "{} <= Any should hold", ty);
        let absorbed = Type::union([ANY.clone(), ty.clone()]);
        assert!(absorbed.ptr_eq(&ANY), "Any | {} should be Any", ty);
    }
}

#[test]
fn test_wildcard_is_bidirectional() {
    for ty in sample_types() {
        assert!(WILDCARD.is_subtype_of(&ty), "? <= {} should hold", ty);
        assert!(ty.is_subtype_of(&WILDCARD), "{} <= ? should hold", ty);
    }
}

#[test]
fn test_never_is_bottom() {
    for ty in sample_types() {
        assert!(NEVER.is_subtype_of(&ty), "Never <= {} should hold", ty);
    }
    assert!(!INT.is_subtype_of(&NEVER));
    assert!(!NEVER.test_instance(&Value::None));
}

// ==================== Sum canonicalization ====================

#[test]
fn test_sum_collapse() {
    assert_eq!(Type::union([INT.clone()]), *INT);
    assert_eq!(Type::union([INT.clone(), INT.clone()]), *INT);
    assert!(Type::union([INT.clone()]).ptr_eq(&INT));
}

#[test]
fn test_sum_flattens_and_dedupes() {
    let inner = Type::union([INT.clone(), STR.clone()]);
    let outer = Type::union([inner, FLOAT.clone(), INT.clone()]);
    assert_eq!(outer.alternatives().map(<[Type]>::len), Some(3));
}

#[test]
fn test_sum_equality_ignores_order() {
    let a = Type::union([INT.clone(), STR.clone()]);
    let b = Type::union([STR.clone(), INT.clone()]);
    assert_eq!(a, b);
    assert_eq!(hash_of(&a), hash_of(&b));

    let mut set = HashSet::new();
    set.insert(a);
    assert!(set.contains(&b));
}

#[test]
fn test_sum_ordering() {
    let int_or_str = Type::union([INT.clone(), STR.clone()]);
    assert!(INT.is_subtype_of(&int_or_str));
    assert!(BOOL.is_subtype_of(&int_or_str));
    assert!(!FLOAT.is_subtype_of(&int_or_str));
    assert!(!int_or_str.is_subtype_of(&INT));
    assert!(int_or_str.is_subtype_of(&Type::union([
        INT.clone(),
        STR.clone(),
        FLOAT.clone()
    ])));
}

// ==================== Generics & variance ====================

#[test]
fn test_covariant_containers() {
    assert!(list_of(&INT).is_subtype_of(&list_of(&ANY)));
    assert!(list_of(&INT).is_subtype_of(&LIST));
    assert!(list_of(&BOOL).is_subtype_of(&list_of(&INT)));
    assert!(!list_of(&INT).is_subtype_of(&list_of(&STR)));
    assert!(!list_of(&INT).is_subtype_of(&list_of(&BOOL)));
}

#[test]
fn test_invariant_containers() {
    let invariant = LIST.with_variance(Variance::Invariant);
    let ints = invariant.parameterize(INT.clone()).unwrap();
    let bools = invariant.parameterize(BOOL.clone()).unwrap();
    assert!(BOOL.is_subtype_of(&INT));
    assert!(ints.is_subtype_of(&ints));
    assert!(!bools.is_subtype_of(&ints));
    // The wildcard item matches under invariance too
    let anything = invariant.parameterize(WILDCARD.clone()).unwrap();
    assert!(ints.is_subtype_of(&anything));
}

#[test]
fn test_contravariant_containers() {
    let sink = Type::generic(
        Type::atomic(NativeKind::Callable),
        ANY.clone(),
        Variance::Contravariant,
    );
    let int_sink = sink.parameterize(INT.clone()).unwrap();
    let bool_sink = sink.parameterize(BOOL.clone()).unwrap();
    assert!(int_sink.is_subtype_of(&bool_sink));
    assert!(!bool_sink.is_subtype_of(&int_sink));
}

#[test]
fn test_variance_not_part_of_identity() {
    let invariant = LIST.with_variance(Variance::Invariant);
    assert_eq!(invariant, *LIST);
    assert_eq!(hash_of(&invariant), hash_of(&LIST));
}

#[test]
fn test_generic_vs_atomic() {
    let bare_list = Type::atomic(NativeKind::List);
    assert!(list_of(&INT).is_subtype_of(&bare_list));
    assert!(list_of(&INT).is_subtype_of(&Type::atomic(NativeKind::Sequence)));
    assert!(bare_list.is_subtype_of(&LIST));
    assert!(!bare_list.is_subtype_of(&list_of(&INT)));
}

#[test]
fn test_mappings() {
    assert!(dict_of(&STR, &BOOL).is_subtype_of(&dict_of(&STR, &INT)));
    assert!(dict_of(&STR, &INT).is_subtype_of(&MAPPING));
    assert!(dict_of(&STR, &INT).is_subtype_of(&DICT));
    assert!(!dict_of(&STR, &INT).is_subtype_of(&dict_of(&INT, &INT)));
    assert!(!DICT.is_subtype_of(&SEQUENCE));
}

#[test]
fn test_parameterize_checks_bound() {
    let ints = list_of(&INT);
    assert!(ints.parameterize(BOOL.clone()).is_ok());
    let err = ints.parameterize(STR.clone()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "cannot parameterize List[Int] with Str: not a subtype of Int"
    );
    assert!(matches!(
        INT.parameterize(STR.clone()),
        Err(TypeError::NotGeneric { .. })
    ));
}

// ==================== Products ====================

#[test]
fn test_products() {
    let int_str = Type::product([INT.clone(), STR.clone()]);
    let bool_str = Type::product([BOOL.clone(), STR.clone()]);
    assert!(bool_str.is_subtype_of(&int_str));
    assert!(!int_str.is_subtype_of(&bool_str));
    assert!(!int_str.is_subtype_of(&Type::product([INT.clone()])));
    assert!(int_str.is_subtype_of(&TUPLE));
    assert!(int_str.is_subtype_of(&SEQUENCE));
    assert!(!int_str.is_subtype_of(&LIST));

    let ints = TUPLE.parameterize(INT.clone()).unwrap();
    assert!(Type::product([INT.clone(), BOOL.clone()]).is_subtype_of(&ints));
    assert!(!int_str.is_subtype_of(&ints));
}

// ==================== Phantoms ====================

#[test]
fn test_phantom_transparency() {
    let meters = Type::phantom("Meters", FLOAT.clone());
    assert!(meters.is_subtype_of(&FLOAT));
    assert!(FLOAT.is_subtype_of(&meters));
    assert!(meters.is_subtype_of(&Type::phantom_root("Meters")));
    assert!(meters.is_subtype_of(&NUMBER));
    assert!(!meters.is_subtype_of(&INT));

    let wrapped_sum = Type::phantom("Tagged", Type::union([INT.clone(), STR.clone()]));
    assert!(wrapped_sum.is_subtype_of(&Type::union([INT.clone(), STR.clone()])));
}

#[test]
fn test_phantom_pairs() {
    let ints = Type::phantom("Id", INT.clone());
    let bools = Type::phantom("Id", BOOL.clone());
    assert!(bools.is_subtype_of(&ints));
    assert!(!ints.is_subtype_of(&bools));
    assert!(ints.is_subtype_of(&Type::phantom("Other", INT.clone())));
    assert_ne!(ints, Type::phantom("Other", INT.clone()));
}

// ==================== Constraints ====================

#[test]
fn test_constraint_only_below_base() {
    let natural = Type::int_range(Some(0), None);
    assert!(natural.is_subtype_of(&INT));
    assert!(natural.is_subtype_of(&NUMBER));
    assert!(natural.is_subtype_of(&Type::union([INT.clone(), STR.clone()])));
    assert!(!INT.is_subtype_of(&natural));
    assert!(!BOOL.is_subtype_of(&natural));
}

#[test]
fn test_constraints_compare_by_identity() {
    let a = Type::int_range(Some(0), None);
    let b = Type::int_range(Some(0), None);
    assert_ne!(a, b);
    assert!(!a.is_subtype_of(&b));
    assert!(a.is_subtype_of(&a.clone()));
}

#[test]
fn test_constraint_refinement_merges() {
    let positive = Type::int_range(Some(1), None);
    let small = Type::constrained(
        positive,
        [Predicate::new("even", |v| v.as_int().is_some_and(|n| n % 2 == 0))],
    );
    assert_eq!(small.to_string(), "Int(min=1, even)");
    assert!(small.test_instance(&Value::Int(4)));
    assert!(!small.test_instance(&Value::Int(3)));
    assert!(!small.test_instance(&Value::Int(0)));
}

#[test]
fn test_string_constraints() {
    let code = Type::str_matching("[A-Z]{3}").unwrap();
    assert!(code.test_instance(&Value::str("ABC")));
    assert!(!code.test_instance(&Value::str("ABCD")));
    assert!(!code.test_instance(&Value::Int(1)));
    assert!(matches!(
        Type::str_matching("("),
        Err(TypeError::InvalidPattern(_))
    ));

    let short = Type::str_length(None, Some(2));
    assert!(short.test_instance(&Value::str("hé")));
    assert!(!short.test_instance(&Value::str("abc")));
}

// ==================== Literals ====================

#[test]
fn test_literals() {
    let one_two = Type::literal([LiteralValue::Int(1), LiteralValue::Int(2)]);
    let one = Type::literal([LiteralValue::Int(1)]);
    assert!(one_two.is_subtype_of(&INT));
    assert!(one.is_subtype_of(&one_two));
    assert!(!one_two.is_subtype_of(&one));
    assert!(!INT.is_subtype_of(&one_two));
    let mixed = Type::literal([LiteralValue::Int(1), LiteralValue::Str("a".into())]);
    assert!(mixed.is_subtype_of(&Type::union([INT.clone(), STR.clone()])));
    assert!(!Type::literal([LiteralValue::Bool(true)]).test_instance(&Value::Int(1)));
}

// ==================== Conformance ====================

#[test]
fn test_atomic_conformance() {
    assert!(INT.test_instance(&Value::Int(1)));
    assert!(INT.test_instance(&Value::Bool(true)));
    assert!(!INT.test_instance(&Value::Float(1.0)));
    assert!(NUMBER.test_instance(&Value::Float(1.0)));
    assert!(ANY.test_instance(&Value::None));
    assert!(WILDCARD.test_instance(&Value::str("x")));

    let shape = ClassRef::new("Shape", []);
    let circle = ClassRef::new("Circle", [shape.clone()]);
    let value = circle.instantiate([("r", Value::Int(1))]);
    assert!(Type::class(&shape).test_instance(&value));
    assert!(!Type::class(&circle).test_instance(&shape.instantiate(Vec::<(String, Value)>::new())));
}

#[test]
fn test_container_conformance() {
    let ints = list_of(&INT);
    assert!(ints.test_instance(&Value::list([Value::Int(1), Value::Bool(false)])));
    assert!(!ints.test_instance(&Value::list([Value::Int(1), Value::str("x")])));
    assert!(!ints.test_instance(&Value::tuple([Value::Int(1)])));
    assert!(list_of(&WILDCARD).test_instance(&Value::list([Value::None])));

    let seq_str = SEQUENCE.parameterize(STR.clone()).unwrap();
    assert!(seq_str.test_instance(&Value::str("abc")));
    let seq_int = SEQUENCE.parameterize(INT.clone()).unwrap();
    assert!(!seq_int.test_instance(&Value::str("abc")));
    assert!(seq_int.test_instance(&Value::Bytes(vec![1, 2])));
}

#[test]
fn test_product_conformance() {
    let pair = Type::product([INT.clone(), STR.clone()]);
    assert!(pair.test_instance(&Value::tuple([Value::Int(1), Value::str("a")])));
    assert!(!pair.test_instance(&Value::tuple([Value::Int(1)])));
    assert!(!pair.test_instance(&Value::list([Value::Int(1), Value::str("a")])));
}

#[test]
fn test_validate_reports_nested_path() {
    let ty = dict_of(&STR, &list_of(&INT));
    let value = Value::dict([
        (Value::str("a"), Value::list([Value::Int(1)])),
        (Value::str("b"), Value::list([Value::Int(2), Value::str("x")])),
    ]);
    let err = ty.validate_instance(&value).unwrap_err();
    assert_eq!(err.failed_value, Value::str("x"));
    assert_eq!(err.failed_type, *INT);
    assert_eq!(
        err.path,
        vec![PathSegment::Entry(Value::str("b")), PathSegment::Index(1)]
    );
    assert_eq!(err.path_string(), "[\"b\"][1]");
}

#[test]
fn test_validate_reports_bad_key() {
    let ty = dict_of(&STR, &INT);
    let value = Value::dict([(Value::Int(1), Value::Int(1))]);
    let err = ty.validate_instance(&value).unwrap_err();
    assert_eq!(err.path, vec![PathSegment::Key(Value::Int(1))]);
    assert_eq!(err.failed_type, *STR);
}

#[test]
fn test_pair_items_split_only_for_mappings() {
    let pairs = ITERABLE
        .parameterize(Type::product([INT.clone(), STR.clone()]))
        .unwrap();
    let tuple_keys = Value::dict([(
        Value::tuple([Value::Int(1), Value::str("a")]),
        Value::Int(5),
    )]);
    let plain_keys = Value::dict([(Value::Int(1), Value::str("a"))]);
    assert!(pairs.test_instance(&tuple_keys));
    assert!(!pairs.test_instance(&plain_keys));

    let err = pairs.validate_instance(&plain_keys).unwrap_err();
    assert_eq!(err.path, vec![PathSegment::Key(Value::Int(1))]);
    assert_eq!(err.failed_type, Type::product([INT.clone(), STR.clone()]));

    let mapping = dict_of(&INT, &STR);
    assert!(mapping.test_instance(&plain_keys));
    assert!(!mapping.test_instance(&tuple_keys));

    let float_pairs = ITERABLE
        .parameterize(Type::product([FLOAT.clone(), STR.clone()]))
        .unwrap();
    assert_eq!(
        float_pairs.cast(&tuple_keys).unwrap(),
        Value::dict([(
            Value::tuple([Value::Float(1.0), Value::str("a")]),
            Value::Int(5),
        )])
    );
}

#[test]
fn test_mismatch_message() {
    let err = list_of(&INT)
        .validate_instance(&Value::list([Value::Int(1), Value::str("x")]))
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "expected value of type List[Int], instead got [1, \"x\"]\n\n    \
         failed on item[1]: \"x\", expected type Int"
    );

    let err = INT.validate_instance(&Value::str("a")).unwrap_err();
    assert_eq!(err.to_string(), "expected value of type Int, instead got \"a\"");
}

#[test]
fn test_sum_mismatch_reports_whole_sum() {
    let ty = Type::union([INT.clone(), STR.clone()]);
    let err = ty.validate_instance(&Value::None).unwrap_err();
    assert_eq!(err.failed_type, ty);
    assert!(err.path.is_empty());
}

// ==================== Sampling ====================

#[test]
fn test_random_sampler_bounds() {
    let sampler = RandomSampler::new(5, 42);
    assert_eq!(sampler.sample(5), None);
    let indices = sampler.sample(100).unwrap();
    assert_eq!(indices.len(), 5);
    assert!(indices.windows(2).all(|w| w[0] < w[1]));
    assert!(indices.iter().all(|&i| i < 100));
    assert_eq!(sampler.sample(100), Some(indices));
}

#[test]
fn test_zero_limit_sampler_checks_everything() {
    let sampler = RandomSampler::new(0, 1);
    assert_eq!(sampler.sample(10), None);
    assert!(!list_of(&INT).test_instance_sampled(&Value::list([Value::str("x")]), &sampler));
}

#[test]
fn test_sampled_conformance_skips_unsampled_elements() {
    let sampler = RandomSampler::new(3, 7);
    let checked = sampler.sample(50).unwrap();
    let unchecked = (0..50).find(|i| !checked.contains(i)).unwrap();

    let mut items = vec![Value::Int(0); 50];
    items[unchecked] = Value::str("bad");
    let value = Value::List(items);

    let ints = list_of(&INT);
    assert!(ints.test_instance_sampled(&value, &sampler));
    assert!(!ints.test_instance(&value));

    let mut items = vec![Value::Int(0); 50];
    items[checked[0]] = Value::str("bad");
    assert!(!ints.test_instance_sampled(&Value::List(items), &sampler));
}

// ==================== Display ====================

#[test]
fn test_display() {
    assert_eq!(ANY.to_string(), "Any");
    assert_eq!(WILDCARD.to_string(), "?");
    assert_eq!(NEVER.to_string(), "Never");
    assert_eq!(LIST.to_string(), "List");
    assert_eq!(DICT.to_string(), "Dict");
    assert_eq!(list_of(&INT).to_string(), "List[Int]");
    assert_eq!(dict_of(&STR, &INT).to_string(), "Dict[Str, Int]");
    assert_eq!(
        Type::product([INT.clone(), STR.clone()]).to_string(),
        "Tuple[Int, Str]"
    );
    assert_eq!(
        SEQUENCE.parameterize(WILDCARD.clone()).unwrap().to_string(),
        "Sequence[?]"
    );
    assert_eq!(Type::optional(INT.clone()).to_string(), "Int | None");
    assert_eq!(
        Type::literal([LiteralValue::Int(1), LiteralValue::Str("a".into())]).to_string(),
        "Literal[1, \"a\"]"
    );
}

//! End-to-end dispatch over a small class hierarchy.

use std::f64::consts::PI;

use multidispatch::prelude::*;
use multidispatch_runtime::{RuntimeResult, ValueKind};

fn field(value: &Value, name: &str) -> RuntimeResult<f64> {
    let instance = value
        .as_instance()
        .ok_or_else(|| RuntimeError::type_error(format!("{} is not an object", value)))?;
    let field = instance.field(name)?;
    field
        .as_float()
        .ok_or_else(|| RuntimeError::type_error(format!("field {} is not numeric", name)))
}

struct Shapes {
    group: Dispatcher,
    area: MultiMethod,
    circle: ClassRef,
    square: ClassRef,
    triangle: ClassRef,
}

fn shapes() -> Shapes {
    let mut group = Dispatcher::new();
    group.define_class("Shape", &[]).unwrap();
    let circle = group.define_class("Circle", &["Shape"]).unwrap();
    let square = group.define_class("Square", &["Shape"]).unwrap();
    let triangle = group.define_class("Triangle", &["Shape"]).unwrap();

    let area = group
        .register(
            "area",
            &[Param::annotated("shape", "Shape")],
            |_| Ok(Value::str("unknown")),
            0,
        )
        .unwrap();
    group
        .register(
            "area",
            &[Param::annotated("shape", "Circle")],
            |args| {
                let r = field(&args[0], "r")?;
                Ok(Value::Float(PI * r * r))
            },
            0,
        )
        .unwrap();
    group
        .register(
            "area",
            &[Param::annotated("shape", "Square")],
            |args| {
                let s = field(&args[0], "s")?;
                Ok(Value::Float(s * s))
            },
            0,
        )
        .unwrap();

    Shapes {
        group,
        area,
        circle,
        square,
        triangle,
    }
}

#[test]
fn test_area_per_shape() {
    let shapes = shapes();
    let circle = shapes.circle.instantiate([("r", Value::Float(2.0))]);
    let square = shapes.square.instantiate([("s", Value::Int(3))]);
    let triangle = shapes
        .triangle
        .instantiate([("a", Value::Int(3)), ("b", Value::Int(4))]);

    assert_eq!(shapes.area.call(&[circle]).unwrap(), Value::Float(PI * 4.0));
    assert_eq!(shapes.area.call(&[square]).unwrap(), Value::Float(9.0));
    assert_eq!(shapes.area.call(&[triangle]).unwrap(), Value::str("unknown"));
}

#[test]
fn test_non_shapes_do_not_match() {
    let shapes = shapes();
    let err = shapes.area.call(&[Value::Int(3)]).unwrap_err();
    match err {
        Error::Dispatch(multidispatch::DispatchError::NoMatchingSignature { arg_types, .. }) => {
            assert_eq!(arg_types, vec![ValueKind::from(multidispatch_runtime::NativeKind::Int)]);
        }
        other => panic!("expected no match, got {:?}", other),
    }
}

#[test]
fn test_repeat_calls_hit_cache_per_class() {
    let shapes = shapes();
    let c1 = shapes.circle.instantiate([("r", Value::Float(1.0))]);
    let c2 = shapes.circle.instantiate([("r", Value::Float(5.0))]);
    let sq = shapes.square.instantiate([("s", Value::Float(1.0))]);
    shapes.area.call(&[c1]).unwrap();
    shapes.area.call(&[c2]).unwrap();
    shapes.area.call(&[sq]).unwrap();
    let stats = shapes.area.stats();
    assert_eq!(stats.walks, 2);
    assert_eq!(stats.cache_hits, 1);
}

#[test]
fn test_subclass_registered_later_takes_over() {
    let mut shapes = shapes();
    let unit = shapes
        .group
        .define_class("UnitCircle", &["Circle"])
        .unwrap();
    let value = unit.instantiate([("r", Value::Float(1.0))]);
    assert_eq!(shapes.area.call(&[value.clone()]).unwrap(), Value::Float(PI));

    shapes
        .group
        .register(
            "area",
            &[Param::annotated("shape", "UnitCircle")],
            |_| Ok(Value::Float(PI)),
            0,
        )
        .unwrap();
    let (signature, _) = shapes.area.resolve(&[value]).unwrap();
    assert_eq!(signature.to_string(), "(UnitCircle)");
}

#[test]
fn test_missing_field_is_runtime_error() {
    let shapes = shapes();
    let bad = shapes.circle.instantiate([("radius", Value::Float(1.0))]);
    let err = shapes.area.call(&[bad]).unwrap_err();
    assert!(matches!(err, Error::Runtime(_)));
}

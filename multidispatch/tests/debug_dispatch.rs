//! Dispatch with verbose tracing switched on.
//!
//! Kept in its own test binary: the debug flag is read once per process.

use multidispatch::prelude::*;

#[test]
fn test_dispatch_with_debug_flag() {
    std::env::set_var("MULTIDISPATCH_DEBUG", "1");

    let mut group = Dispatcher::new();
    let describe = group
        .register("describe", &[Param::annotated("x", "int")], |_| Ok(Value::str("int")), 0)
        .unwrap();
    group
        .register("describe", &[Param::annotated("x", "Any")], |_| Ok(Value::str("any")), 0)
        .unwrap();

    assert_eq!(describe.call(&[Value::Int(1)]).unwrap(), Value::str("int"));
    assert_eq!(describe.call(&[Value::str("a")]).unwrap(), Value::str("any"));
    assert!(group.call("describe", &[]).is_err());
}
